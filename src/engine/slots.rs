use chrono::NaiveDate;

use crate::model::*;

use super::time_off::blocking_time_off;

/// Slots of `branch_id` offered on `date`, minus those whose instructor is
/// away on approved time-off during the slot.
pub fn slots_for_date<'a>(
    slots: &'a [StaticServiceSlot],
    time_off: &[TimeOffRequest],
    branch_id: &str,
    date: NaiveDate,
) -> Vec<&'a StaticServiceSlot> {
    slots
        .iter()
        .filter(|slot| slot.branch_id == branch_id && slot.offered_on(date))
        .filter(|slot| match &slot.instructor_staff_id {
            Some(instructor) => {
                blocking_time_off(time_off, instructor, date, &slot.window()).is_none()
            }
            None => true,
        })
        .collect()
}

/// Seats taken in `slot_id` on `date`: party sizes of active bookings.
pub fn count_slot_occupancy(bookings: &[Booking], slot_id: &str, date: NaiveDate) -> u32 {
    occupancy_excluding(bookings, slot_id, date, None)
}

pub(crate) fn occupancy_excluding(
    bookings: &[Booking],
    slot_id: &str,
    date: NaiveDate,
    exclude_id: Option<&str>,
) -> u32 {
    bookings
        .iter()
        .filter(|b| b.is_active() && Some(b.id.as_str()) != exclude_id)
        .filter(|b| b.slot_id.as_deref() == Some(slot_id) && b.date() == date)
        .map(Booking::occupancy)
        .sum()
}

/// Capacity, seats taken, and seats left; an unknown slot has capacity 0.
pub fn slot_remaining(
    bookings: &[Booking],
    slots: &[StaticServiceSlot],
    slot_id: &str,
    date: NaiveDate,
) -> SlotOccupancy {
    let total = slots
        .iter()
        .find(|s| s.id == slot_id)
        .map_or(0, |s| s.capacity);
    let occupied = count_slot_occupancy(bookings, slot_id, date);
    SlotOccupancy {
        remaining: total.saturating_sub(occupied),
        total,
        occupied,
    }
}
