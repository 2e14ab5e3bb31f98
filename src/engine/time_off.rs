use chrono::NaiveDate;

use crate::model::*;

/// Whether an approved request takes `window` away on `date`.
///
/// All-day and multi-day requests block the whole date; a single-day
/// partial request blocks only where its times overlap `window`.
pub fn blocks(req: &TimeOffRequest, date: NaiveDate, window: &Span) -> bool {
    if !req.approved || !req.covers(date) {
        return false;
    }
    match req.blocked_window() {
        None => true,
        Some(off) => off.overlaps(window),
    }
}

/// First approved time-off request of `staff_id` that blocks `window` on `date`.
pub fn blocking_time_off<'a>(
    time_off: &'a [TimeOffRequest],
    staff_id: &str,
    date: NaiveDate,
    window: &Span,
) -> Option<&'a TimeOffRequest> {
    time_off
        .iter()
        .filter(|req| req.staff_id == staff_id)
        .find(|req| blocks(req, date, window))
}

/// Time-off of `staff_id` on `date` as spans clamped to `day`, sorted by start.
pub(crate) fn blocked_spans(
    time_off: &[TimeOffRequest],
    staff_id: &str,
    date: NaiveDate,
    day: &Span,
) -> Vec<Span> {
    let mut spans: Vec<Span> = time_off
        .iter()
        .filter(|req| req.staff_id == staff_id && req.approved && req.covers(date))
        .map(|req| match req.blocked_window() {
            None => *day,
            Some(off) => Span::new(off.start.max(day.start), off.end.min(day.end)),
        })
        .filter(|s| s.start < s.end)
        .collect();
    spans.sort_by_key(|s| s.start);
    spans
}
