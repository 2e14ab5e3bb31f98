use chrono::{NaiveDate, NaiveDateTime};

use crate::limits::*;
use crate::model::*;

use super::availability::is_staff_available;
use super::capacity::{is_room_available, saturated_windows_excluding};
use super::slots::{occupancy_excluding, slots_for_date};
use super::time_off::blocking_time_off;
use super::EngineError;

/// First active booking of `staff_id` on `date` that collides with `window`,
/// skipping `exclude_id` (the booking being edited). Input order decides
/// which booking is reported when several collide.
pub fn find_conflict<'a>(
    bookings: &'a [Booking],
    staff_id: &str,
    date: NaiveDate,
    window: &Span,
    exclude_id: Option<&str>,
) -> Option<&'a Booking> {
    bookings.iter().find(|b| {
        b.is_active()
            && b.staff_id == staff_id
            && b.date() == date
            && Some(b.id.as_str()) != exclude_id
            && window.collides_with(&b.span())
    })
}

pub fn has_conflict(
    bookings: &[Booking],
    staff_id: &str,
    date: NaiveDate,
    window: &Span,
    exclude_id: Option<&str>,
) -> bool {
    find_conflict(bookings, staff_id, date, window, exclude_id).is_some()
}

/// Start and end of a booking: ordered, same calendar day, bounded length.
pub(crate) fn validate_window(start: &NaiveDateTime, end: &NaiveDateTime) -> Result<(), EngineError> {
    if end <= start {
        return Err(EngineError::InvalidWindow("end must be after start"));
    }
    if end.date() != start.date() {
        return Err(EngineError::InvalidWindow("booking must end on the day it starts"));
    }
    if (*end - *start).num_minutes() > MAX_BOOKING_MINUTES as i64 {
        return Err(EngineError::LimitExceeded("booking too long"));
    }
    Ok(())
}

pub(crate) fn validate_draft(draft: &BookingDraft) -> Result<(), EngineError> {
    validate_window(&draft.start, &draft.end)?;
    if draft.party_size == 0 || draft.party_size > MAX_PARTY_SIZE {
        return Err(EngineError::LimitExceeded("party size out of range"));
    }
    if draft.notes.as_ref().is_some_and(|n| n.len() > MAX_NOTES_LEN) {
        return Err(EngineError::LimitExceeded("notes too long"));
    }
    if draft.id.as_ref().is_some_and(|id| id.is_empty() || id.len() > MAX_ID_LEN) {
        return Err(EngineError::LimitExceeded("booking id length"));
    }
    Ok(())
}

/// Admission check for an active booking against the directory and the
/// current bookings. `exclude_id` is the booking being replaced, if any.
///
/// Slot bookings are checked against the slot alone: they must keep its
/// times and instructor, and it must be offered on the day with room for
/// the party. Other bookings need working hours,
/// no blocking time-off, and a free place with the staff member and room.
pub(crate) fn check_booking(
    directory: &Directory,
    bookings: &[Booking],
    candidate: &Booking,
    exclude_id: Option<&str>,
) -> Result<(), EngineError> {
    let date = candidate.date();
    let window = candidate.span();

    if let Some(slot_id) = candidate.slot_id.as_deref() {
        let slot = directory
            .slot(slot_id)
            .ok_or_else(|| EngineError::SlotNotFound(slot_id.to_string()))?;
        if window != slot.window() {
            return Err(EngineError::InvalidWindow("booking must match its slot's times"));
        }
        if let Some(instructor) = slot.instructor_staff_id.as_deref()
            && instructor != candidate.staff_id
        {
            return Err(EngineError::InstructorMismatch {
                slot_id: slot_id.to_string(),
                staff_id: candidate.staff_id.clone(),
            });
        }
        let offered = slots_for_date(&directory.slots, &directory.time_off, &slot.branch_id, date)
            .iter()
            .any(|s| s.id == slot_id);
        if !offered {
            return Err(EngineError::SlotNotOffered(slot_id.to_string()));
        }
        let occupied = occupancy_excluding(bookings, slot_id, date, exclude_id);
        let remaining = slot.capacity.saturating_sub(occupied);
        if remaining < candidate.occupancy() {
            return Err(EngineError::SlotFull {
                slot_id: slot_id.to_string(),
                remaining,
                requested: candidate.occupancy(),
            });
        }
        tracing::debug!(slot_id, remaining, "slot booking admitted");
        return Ok(());
    }

    let staff_id = candidate.staff_id.as_str();
    let staff = directory
        .staff_member(staff_id)
        .ok_or_else(|| EngineError::StaffNotFound(staff_id.to_string()))?;

    if let Availability::Unavailable(reason) =
        is_staff_available(&directory.staff, staff_id, date, &window)
    {
        return Err(EngineError::Unavailable(reason));
    }
    if blocking_time_off(&directory.time_off, staff_id, date, &window).is_some() {
        return Err(EngineError::TimeOff(staff_id.to_string()));
    }

    if staff.staff_type == StaffType::Dynamic && staff.max_concurrent() > 1 {
        let saturated = saturated_windows_excluding(staff, bookings, date, exclude_id);
        if saturated.iter().any(|s| s.overlaps(&window)) {
            return Err(EngineError::CapacityExceeded(staff.max_concurrent()));
        }
    } else if let Some(existing) = find_conflict(bookings, staff_id, date, &window, exclude_id) {
        return Err(EngineError::Conflict(existing.id.clone()));
    }

    if let Some(room_id) = candidate.room_id.as_deref() {
        match is_room_available(&directory.rooms, room_id, bookings, date, &window, exclude_id) {
            Availability::Available => {}
            Availability::Unavailable(UnavailableReason::RoomNotFound) => {
                return Err(EngineError::RoomNotFound(room_id.to_string()));
            }
            Availability::Unavailable(reason) => return Err(EngineError::Unavailable(reason)),
        }
    }

    tracing::debug!(staff_id, %window, "booking admitted");
    Ok(())
}
