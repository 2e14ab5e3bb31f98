use chrono::{NaiveDate, NaiveDateTime};

use crate::model::*;

use super::availability::merge_overlapping;

/// Concurrent bookings `staff_id` can still take at `time`.
///
/// `None` for unknown staff and for static staff, whose capacity lives on
/// their slots instead.
pub fn staff_available_capacity(
    staff: &[Staff],
    staff_id: &str,
    time: &NaiveDateTime,
    bookings: &[Booking],
) -> Option<u32> {
    let member = staff.iter().find(|s| s.id == staff_id)?;
    if member.staff_type != StaffType::Dynamic {
        return None;
    }
    let concurrent = bookings
        .iter()
        .filter(|b| b.is_active() && b.staff_id == staff_id && b.covers(time))
        .count() as u32;
    Some(member.max_concurrent().saturating_sub(concurrent))
}

pub fn capacity_color(available: u32) -> CapacityColor {
    match available {
        0 => CapacityColor::Error,
        1 => CapacityColor::Warning,
        _ => CapacityColor::Success,
    }
}

/// Windows of `date` in which `staff` is at full concurrency.
pub fn saturated_windows(staff: &Staff, bookings: &[Booking], date: NaiveDate) -> Vec<Span> {
    saturated_windows_excluding(staff, bookings, date, None)
}

pub(crate) fn saturated_windows_excluding(
    staff: &Staff,
    bookings: &[Booking],
    date: NaiveDate,
    exclude_id: Option<&str>,
) -> Vec<Span> {
    let allocs = active_spans(
        bookings
            .iter()
            .filter(|b| b.staff_id == staff.id && b.date() == date),
        exclude_id,
    );
    compute_saturated_spans(&allocs, staff.max_concurrent())
}

/// Check that `room_id` has a free place for the whole `window` on `date`.
pub fn is_room_available(
    rooms: &[Room],
    room_id: &str,
    bookings: &[Booking],
    date: NaiveDate,
    window: &Span,
    exclude_id: Option<&str>,
) -> Availability {
    let Some(room) = rooms.iter().find(|r| r.id == room_id) else {
        return Availability::Unavailable(UnavailableReason::RoomNotFound);
    };
    if room.capacity == 0 {
        return Availability::Unavailable(UnavailableReason::RoomNoCapacity);
    }
    let allocs = active_spans(
        bookings
            .iter()
            .filter(|b| b.room_id.as_deref() == Some(room_id) && b.date() == date),
        exclude_id,
    );
    let saturated = compute_saturated_spans(&allocs, room.capacity);
    if saturated.iter().any(|s| s.overlaps(window)) {
        return Availability::Unavailable(UnavailableReason::RoomFull);
    }
    Availability::Available
}

/// Non-empty spans of active bookings, sorted by start.
fn active_spans<'a>(
    bookings: impl Iterator<Item = &'a Booking>,
    exclude_id: Option<&str>,
) -> Vec<Span> {
    let mut spans: Vec<Span> = bookings
        .filter(|b| b.is_active() && Some(b.id.as_str()) != exclude_id)
        .map(Booking::span)
        .filter(|s| s.start < s.end)
        .collect();
    spans.sort_by_key(|s| s.start);
    spans
}

/// Sweep-line algorithm: find time ranges where allocation count >= capacity.
/// Returns sorted, merged spans representing fully-saturated time ranges.
pub fn compute_saturated_spans(allocs: &[Span], capacity: u32) -> Vec<Span> {
    if allocs.is_empty() || capacity == 0 {
        return Vec::new();
    }
    if capacity == 1 {
        return merge_overlapping(allocs);
    }

    // +1 at start, -1 at end; ends sort before starts at the same minute
    let mut events: Vec<(Minutes, i32)> = Vec::with_capacity(allocs.len() * 2);
    for a in allocs {
        events.push((a.start, 1));
        events.push((a.end, -1));
    }
    events.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut result = Vec::new();
    let mut count: u32 = 0;
    let mut saturated_start: Option<Minutes> = None;

    for (time, delta) in &events {
        if *delta > 0 {
            count += *delta as u32;
        } else {
            count -= (-*delta) as u32;
        }

        if count >= capacity && saturated_start.is_none() {
            saturated_start = Some(*time);
        } else if count < capacity
            && let Some(start) = saturated_start.take()
            && *time > start {
                result.push(Span::new(start, *time));
            }
    }

    result
}
