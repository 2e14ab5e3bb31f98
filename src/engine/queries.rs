use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::model::*;
use crate::observability::{availability_label, AVAILABILITY_CHECKS_TOTAL, CONFLICTS_TOTAL};
use crate::time::day_of_week;

use super::{availability, capacity, conflict, slots, Calendar};

/// One staff member's day on a branch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffAgenda {
    pub staff_id: String,
    pub name: String,
    pub staff_type: StaffType,
    pub hours: Option<Span>,
    pub room_id: Option<String>,
    pub room_hours: Option<Span>,
    /// Active bookings, earliest first.
    pub bookings: Vec<Booking>,
    pub open_slots: Vec<String>,
    pub free: Vec<Span>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAgenda {
    pub slot_id: String,
    pub service_name: String,
    pub room_id: String,
    pub instructor_staff_id: Option<String>,
    pub window: Span,
    pub remaining: u32,
    pub total: u32,
    pub occupied: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAgenda {
    pub branch_id: String,
    pub date: NaiveDate,
    pub staff: Vec<StaffAgenda>,
    pub slots: Vec<SlotAgenda>,
}

impl Calendar {
    pub fn is_staff_available(&self, staff_id: &str, date: NaiveDate, window: &Span) -> Availability {
        let result = availability::is_staff_available(&self.directory.staff, staff_id, date, window);
        metrics::counter!(AVAILABILITY_CHECKS_TOTAL, "result" => availability_label(&result))
            .increment(1);
        result
    }

    pub async fn find_conflict(
        &self,
        staff_id: &str,
        date: NaiveDate,
        window: &Span,
        exclude_id: Option<&str>,
    ) -> Option<Booking> {
        let guard = self.bookings.read().await;
        let hit = conflict::find_conflict(&guard, staff_id, date, window, exclude_id).cloned();
        if hit.is_some() {
            metrics::counter!(CONFLICTS_TOTAL).increment(1);
        }
        hit
    }

    pub async fn staff_available_capacity(&self, staff_id: &str, time: &NaiveDateTime) -> Option<u32> {
        let guard = self.bookings.read().await;
        capacity::staff_available_capacity(&self.directory.staff, staff_id, time, &guard)
    }

    pub async fn saturated_windows(&self, staff_id: &str, date: NaiveDate) -> Vec<Span> {
        let Some(staff) = self.directory.staff_member(staff_id) else {
            return Vec::new();
        };
        let guard = self.bookings.read().await;
        capacity::saturated_windows(staff, &guard, date)
    }

    pub async fn is_room_available(&self, room_id: &str, date: NaiveDate, window: &Span) -> Availability {
        let guard = self.bookings.read().await;
        let result =
            capacity::is_room_available(&self.directory.rooms, room_id, &guard, date, window, None);
        metrics::counter!(AVAILABILITY_CHECKS_TOTAL, "result" => availability_label(&result))
            .increment(1);
        result
    }

    pub fn slots_for_date(&self, branch_id: &str, date: NaiveDate) -> Vec<&StaticServiceSlot> {
        slots::slots_for_date(&self.directory.slots, &self.directory.time_off, branch_id, date)
    }

    pub async fn slot_remaining(&self, slot_id: &str, date: NaiveDate) -> SlotOccupancy {
        let guard = self.bookings.read().await;
        slots::slot_remaining(&guard, &self.directory.slots, slot_id, date)
    }

    pub async fn available_time_slots(
        &self,
        staff_id: &str,
        date: NaiveDate,
        slot_duration: Minutes,
    ) -> Vec<String> {
        let guard = self.bookings.read().await;
        availability::available_time_slots(&self.directory.staff, &guard, staff_id, date, slot_duration)
    }

    pub async fn free_windows(&self, staff_id: &str, date: NaiveDate) -> Vec<Span> {
        let guard = self.bookings.read().await;
        availability::free_windows(
            &self.directory.staff,
            &guard,
            &self.directory.time_off,
            staff_id,
            date,
        )
    }

    /// Everything a day view of `branch_id` shows, from a single snapshot.
    pub async fn day_agenda(&self, branch_id: &str, date: NaiveDate, slot_duration: Minutes) -> DayAgenda {
        let guard = self.bookings.read().await;
        let dir = &self.directory;
        let day = day_of_week(date);

        let staff = dir
            .staff
            .iter()
            .filter(|s| s.branch_id == branch_id)
            .map(|s| {
                let mut bookings: Vec<Booking> = guard
                    .iter()
                    .filter(|b| b.is_active() && b.staff_id == s.id && b.date() == date)
                    .cloned()
                    .collect();
                bookings.sort_by_key(|b| b.start);
                let assignment = s.room_assignment_for(day);
                StaffAgenda {
                    staff_id: s.id.clone(),
                    name: s.name.clone(),
                    staff_type: s.staff_type,
                    hours: availability::working_window(&dir.staff, &s.id, date),
                    room_id: assignment.map(|a| a.room_id.clone()),
                    room_hours: assignment.map(|a| a.window()),
                    bookings,
                    open_slots: availability::available_time_slots(
                        &dir.staff,
                        &guard,
                        &s.id,
                        date,
                        slot_duration,
                    ),
                    free: availability::free_windows(&dir.staff, &guard, &dir.time_off, &s.id, date),
                }
            })
            .collect();

        let mut offered = slots::slots_for_date(&dir.slots, &dir.time_off, branch_id, date);
        offered.sort_by_key(|s| s.start_time);
        let slots = offered
            .into_iter()
            .map(|slot| {
                let occ = slots::slot_remaining(&guard, &dir.slots, &slot.id, date);
                SlotAgenda {
                    slot_id: slot.id.clone(),
                    service_name: slot.service_name.clone(),
                    room_id: slot.room_id.clone(),
                    instructor_staff_id: slot.instructor_staff_id.clone(),
                    window: slot.window(),
                    remaining: occ.remaining,
                    total: occ.total,
                    occupied: occ.occupied,
                }
            })
            .collect();

        DayAgenda {
            branch_id: branch_id.to_string(),
            date,
            staff,
            slots,
        }
    }
}
