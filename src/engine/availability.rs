use chrono::NaiveDate;

use crate::model::*;
use crate::time::{day_of_week, format_hhmm};

use super::time_off::blocked_spans;

// ── Weekly schedule check ─────────────────────────────────────────

/// Check `window` against the weekly working hours of `staff_id` on `date`.
///
/// Only the recurring week is consulted. Time-off and existing bookings are
/// separate checks that callers compose.
pub fn is_staff_available(
    staff: &[Staff],
    staff_id: &str,
    date: NaiveDate,
    window: &Span,
) -> Availability {
    let Some(member) = staff.iter().find(|s| s.id == staff_id) else {
        return Availability::Unavailable(UnavailableReason::StaffNotFound);
    };
    let Some(day) = member.schedule_for(day_of_week(date)) else {
        return Availability::Unavailable(UnavailableReason::NoSchedule);
    };
    if !day.is_available {
        return Availability::Unavailable(UnavailableReason::NotWorking);
    }
    let hours = day.window();
    if !hours.contains_span(window) {
        return Availability::Unavailable(UnavailableReason::OutsideWorkingHours(hours));
    }
    Availability::Available
}

/// Working hours of `staff_id` on `date`, if they work that day.
pub fn working_window(staff: &[Staff], staff_id: &str, date: NaiveDate) -> Option<Span> {
    let member = staff.iter().find(|s| s.id == staff_id)?;
    let day = member.schedule_for(day_of_week(date))?;
    day.is_available.then(|| day.window())
}

/// Active bookings of `staff_id` on `date`, in input order.
pub(crate) fn staff_day_bookings<'a>(
    bookings: &'a [Booking],
    staff_id: &'a str,
    date: NaiveDate,
) -> impl Iterator<Item = &'a Booking> {
    bookings
        .iter()
        .filter(move |b| b.is_active() && b.staff_id == staff_id && b.date() == date)
}

// ── Slot enumeration ──────────────────────────────────────────────

/// Start times (`"HH:MM"`, earliest first) of every `slot_duration`-minute
/// window inside the working hours that collides with no active booking.
pub fn available_time_slots(
    staff: &[Staff],
    bookings: &[Booking],
    staff_id: &str,
    date: NaiveDate,
    slot_duration: Minutes,
) -> Vec<String> {
    let Some(hours) = working_window(staff, staff_id, date) else {
        return Vec::new();
    };
    if slot_duration <= 0 {
        return Vec::new();
    }
    let taken: Vec<Span> = staff_day_bookings(bookings, staff_id, date)
        .map(Booking::span)
        .collect();

    let mut slots = Vec::new();
    let mut start = hours.start;
    while let Some(end) = start.checked_add(slot_duration)
        && end <= hours.end
    {
        let candidate = Span::new(start, end);
        if !taken.iter().any(|b| candidate.collides_with(b)) {
            slots.push(format_hhmm(start));
        }
        start = end;
    }
    slots
}

/// Open stretches of the working day: hours minus active bookings and
/// approved time-off, as sorted disjoint spans.
pub fn free_windows(
    staff: &[Staff],
    bookings: &[Booking],
    time_off: &[TimeOffRequest],
    staff_id: &str,
    date: NaiveDate,
) -> Vec<Span> {
    let Some(hours) = working_window(staff, staff_id, date) else {
        return Vec::new();
    };
    if hours.start >= hours.end {
        return Vec::new();
    }

    let mut busy: Vec<Span> = staff_day_bookings(bookings, staff_id, date)
        .map(Booking::span)
        .filter(|s| s.start < s.end)
        .collect();
    busy.extend(blocked_spans(time_off, staff_id, date, &hours));
    busy.sort_by_key(|s| s.start);
    let busy = merge_overlapping(&busy);

    subtract_intervals(&[hours], &busy)
}

// ── Interval arithmetic ───────────────────────────────────────────

/// Merge sorted overlapping/adjacent intervals into disjoint intervals.
pub fn merge_overlapping(sorted: &[Span]) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::new();
    for &span in sorted {
        if let Some(last) = merged.last_mut()
            && span.start <= last.end {
                last.end = last.end.max(span.end);
                continue;
            }
        merged.push(span);
    }
    merged
}

/// `base` minus `to_remove`; both sorted by start.
pub fn subtract_intervals(base: &[Span], to_remove: &[Span]) -> Vec<Span> {
    let mut result = Vec::new();
    let mut ri = 0;

    for &b in base {
        let mut current_start = b.start;
        let current_end = b.end;

        while ri < to_remove.len() && to_remove[ri].end <= current_start {
            ri += 1;
        }

        let mut j = ri;
        while j < to_remove.len() && to_remove[j].start < current_end {
            let r = &to_remove[j];
            if r.start > current_start {
                result.push(Span::new(current_start, r.start));
            }
            current_start = current_start.max(r.end);
            j += 1;
        }

        if current_start < current_end {
            result.push(Span::new(current_start, current_end));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::at_minutes;

    const H: Minutes = 60;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
    }

    fn staff_member(id: &str, days: &[(DayOfWeek, bool, Minutes, Minutes)]) -> Staff {
        Staff {
            id: id.into(),
            name: id.into(),
            branch_id: "branch-1".into(),
            staff_type: StaffType::Dynamic,
            schedule: days
                .iter()
                .map(|&(day, is_available, start_time, end_time)| DaySchedule {
                    day,
                    is_available,
                    start_time,
                    end_time,
                })
                .collect(),
            max_concurrent_bookings: None,
            room_assignments: Vec::new(),
        }
    }

    fn booking(id: &str, staff_id: &str, start: Minutes, end: Minutes, status: BookingStatus) -> Booking {
        BookingDraft {
            status,
            ..BookingDraft::new(
                staff_id,
                at_minutes(monday(), start).unwrap(),
                at_minutes(monday(), end).unwrap(),
            )
        }
        .into_booking(id.into())
    }

    fn nine_to_five() -> Vec<Staff> {
        vec![staff_member(
            "Staff-1",
            &[(DayOfWeek::Mon, true, 9 * H, 17 * H), (DayOfWeek::Tue, false, 9 * H, 17 * H)],
        )]
    }

    // ── is_staff_available ────────────────────────────────

    #[test]
    fn exact_working_hours_are_available() {
        let staff = nine_to_five();
        let a = is_staff_available(&staff, "Staff-1", monday(), &Span::new(9 * H, 17 * H));
        assert!(a.is_available());
        assert_eq!(a.reason(), None);
    }

    #[test]
    fn one_minute_outside_is_unavailable() {
        let staff = nine_to_five();
        let early = is_staff_available(&staff, "Staff-1", monday(), &Span::new(9 * H - 1, 10 * H));
        let late = is_staff_available(&staff, "Staff-1", monday(), &Span::new(16 * H, 17 * H + 1));
        assert!(!early.is_available());
        assert!(!late.is_available());
        assert_eq!(
            early.reason().unwrap().to_string(),
            "Staff working hours are 09:00 - 17:00"
        );
    }

    #[test]
    fn before_opening_reports_working_hours() {
        let staff = nine_to_five();
        let a = is_staff_available(&staff, "Staff-1", monday(), &Span::new(8 * H, 9 * H));
        assert_eq!(
            a,
            Availability::Unavailable(UnavailableReason::OutsideWorkingHours(Span::new(9 * H, 17 * H)))
        );
    }

    #[test]
    fn unknown_staff() {
        let a = is_staff_available(&nine_to_five(), "nobody", monday(), &Span::new(600, 660));
        assert_eq!(a.reason().unwrap().to_string(), "Staff member not found");
    }

    #[test]
    fn day_without_schedule_entry() {
        let wednesday = monday() + chrono::Days::new(2);
        let a = is_staff_available(&nine_to_five(), "Staff-1", wednesday, &Span::new(600, 660));
        assert_eq!(a.reason().unwrap().to_string(), "No schedule found for this day");
    }

    #[test]
    fn day_marked_off() {
        let tuesday = monday() + chrono::Days::new(1);
        let a = is_staff_available(&nine_to_five(), "Staff-1", tuesday, &Span::new(600, 660));
        assert_eq!(
            a.reason().unwrap().to_string(),
            "Staff member is not working on this day"
        );
    }

    // ── available_time_slots ──────────────────────────────

    #[test]
    fn slots_skip_booked_windows() {
        let staff = vec![staff_member("Staff-1", &[(DayOfWeek::Mon, true, 9 * H, 12 * H)])];
        let bookings = vec![booking("b1", "Staff-1", 10 * H, 11 * H, BookingStatus::Confirmed)];
        let slots = available_time_slots(&staff, &bookings, "Staff-1", monday(), 30);
        assert_eq!(slots, vec!["09:00", "09:30", "11:00", "11:30"]);
    }

    #[test]
    fn slots_ignore_cancelled_and_other_staff() {
        let staff = vec![staff_member("Staff-1", &[(DayOfWeek::Mon, true, 9 * H, 10 * H)])];
        let bookings = vec![
            booking("b1", "Staff-1", 9 * H, 10 * H, BookingStatus::Cancelled),
            booking("b2", "Staff-2", 9 * H, 10 * H, BookingStatus::Confirmed),
        ];
        let slots = available_time_slots(&staff, &bookings, "Staff-1", monday(), 30);
        assert_eq!(slots, vec!["09:00", "09:30"]);
    }

    #[test]
    fn slots_must_fit_inside_hours() {
        let staff = vec![staff_member("Staff-1", &[(DayOfWeek::Mon, true, 9 * H, 10 * H + 15)])];
        let slots = available_time_slots(&staff, &[], "Staff-1", monday(), 30);
        assert_eq!(slots, vec!["09:00", "09:30"]);
    }

    #[test]
    fn slots_empty_when_duration_exceeds_day() {
        let staff = nine_to_five();
        assert!(available_time_slots(&staff, &[], "Staff-1", monday(), i32::MAX).is_empty());
        assert!(available_time_slots(&staff, &[], "Staff-1", monday(), 8 * H + 1).is_empty());
        assert_eq!(
            available_time_slots(&staff, &[], "Staff-1", monday(), 8 * H),
            vec!["09:00"]
        );
    }

    #[test]
    fn slots_empty_without_schedule() {
        let staff = nine_to_five();
        let sunday = monday() - chrono::Days::new(1);
        assert!(available_time_slots(&staff, &[], "Staff-1", sunday, 30).is_empty());
        assert!(available_time_slots(&staff, &[], "nobody", monday(), 30).is_empty());
        assert!(available_time_slots(&staff, &[], "Staff-1", monday(), 0).is_empty());
    }

    #[test]
    fn slots_unaligned_booking_blocks_both_neighbours() {
        let staff = vec![staff_member("Staff-1", &[(DayOfWeek::Mon, true, 9 * H, 11 * H)])];
        let bookings = vec![booking("b1", "Staff-1", 9 * H + 45, 10 * H + 15, BookingStatus::Pending)];
        let slots = available_time_slots(&staff, &bookings, "Staff-1", monday(), 30);
        assert_eq!(slots, vec!["09:00", "10:30"]);
    }

    // ── free_windows ──────────────────────────────────────

    #[test]
    fn free_windows_subtract_bookings_and_time_off() {
        let staff = nine_to_five();
        let bookings = vec![
            booking("b1", "Staff-1", 10 * H, 11 * H, BookingStatus::Confirmed),
            booking("b2", "Staff-1", 10 * H + 30, 12 * H, BookingStatus::Confirmed),
            booking("b3", "Staff-1", 14 * H, 15 * H, BookingStatus::Cancelled),
        ];
        let time_off = vec![TimeOffRequest {
            id: "t1".into(),
            staff_id: "Staff-1".into(),
            start_date: monday(),
            end_date: monday(),
            approved: true,
            all_day: false,
            start_time: Some(16 * H),
            end_time: Some(18 * H),
            reason: None,
        }];
        let free = free_windows(&staff, &bookings, &time_off, "Staff-1", monday());
        assert_eq!(
            free,
            vec![Span::new(9 * H, 10 * H), Span::new(12 * H, 16 * H)]
        );
    }

    #[test]
    fn free_windows_empty_on_all_day_time_off() {
        let staff = nine_to_five();
        let time_off = vec![TimeOffRequest {
            id: "t1".into(),
            staff_id: "Staff-1".into(),
            start_date: monday(),
            end_date: monday(),
            approved: true,
            all_day: true,
            start_time: None,
            end_time: None,
            reason: None,
        }];
        assert!(free_windows(&staff, &[], &time_off, "Staff-1", monday()).is_empty());
    }

    // ── subtract_intervals ────────────────────────────────

    #[test]
    fn subtract_no_overlap() {
        let base = vec![Span::new(100, 200), Span::new(300, 400)];
        let remove = vec![Span::new(200, 300)];
        assert_eq!(subtract_intervals(&base, &remove), base);
    }

    #[test]
    fn subtract_full_overlap() {
        let base = vec![Span::new(100, 200)];
        let remove = vec![Span::new(50, 250)];
        assert!(subtract_intervals(&base, &remove).is_empty());
    }

    #[test]
    fn subtract_middle_punch() {
        let base = vec![Span::new(100, 300)];
        let remove = vec![Span::new(150, 200)];
        assert_eq!(
            subtract_intervals(&base, &remove),
            vec![Span::new(100, 150), Span::new(200, 300)]
        );
    }

    #[test]
    fn subtract_multiple_punches() {
        let base = vec![Span::new(0, 1000)];
        let remove = vec![Span::new(100, 200), Span::new(400, 500), Span::new(800, 900)];
        assert_eq!(
            subtract_intervals(&base, &remove),
            vec![
                Span::new(0, 100),
                Span::new(200, 400),
                Span::new(500, 800),
                Span::new(900, 1000),
            ]
        );
    }

    // ── merge_overlapping ────────────────────────────────

    #[test]
    fn merge_overlapping_basic() {
        let spans = vec![Span::new(100, 300), Span::new(200, 400), Span::new(500, 600)];
        assert_eq!(
            merge_overlapping(&spans),
            vec![Span::new(100, 400), Span::new(500, 600)]
        );
    }

    #[test]
    fn merge_overlapping_adjacent() {
        let spans = vec![Span::new(100, 200), Span::new(200, 300)];
        assert_eq!(merge_overlapping(&spans), vec![Span::new(100, 300)]);
    }
}
