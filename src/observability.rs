use crate::model::{Availability, UnavailableReason};

// ── Query metrics ───────────────────────────────────────────────

/// Counter: availability checks answered. Labels: result.
pub const AVAILABILITY_CHECKS_TOTAL: &str = "slotwise_availability_checks_total";

/// Counter: conflict checks that found a colliding booking.
pub const CONFLICTS_TOTAL: &str = "slotwise_conflicts_total";

// ── Mutation metrics ────────────────────────────────────────────

/// Counter: booking mutations. Labels: op, status.
pub const BOOKING_MUTATIONS_TOTAL: &str = "slotwise_booking_mutations_total";

/// Gauge: bookings held by the calendar.
pub const BOOKINGS_HELD: &str = "slotwise_bookings_held";

/// Map an availability answer to a short label for metrics.
pub fn availability_label(availability: &Availability) -> &'static str {
    match availability {
        Availability::Available => "available",
        Availability::Unavailable(reason) => reason_label(reason),
    }
}

pub fn reason_label(reason: &UnavailableReason) -> &'static str {
    match reason {
        UnavailableReason::StaffNotFound => "staff_not_found",
        UnavailableReason::NoSchedule => "no_schedule",
        UnavailableReason::NotWorking => "not_working",
        UnavailableReason::OutsideWorkingHours(_) => "outside_hours",
        UnavailableReason::RoomNotFound => "room_not_found",
        UnavailableReason::RoomNoCapacity => "room_no_capacity",
        UnavailableReason::RoomFull => "room_full",
    }
}

pub fn record_mutation(op: &'static str, ok: bool) {
    let status = if ok { "ok" } else { "rejected" };
    metrics::counter!(BOOKING_MUTATIONS_TOTAL, "op" => op, "status" => status).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Span;

    #[test]
    fn labels_are_stable() {
        assert_eq!(availability_label(&Availability::Available), "available");
        assert_eq!(
            availability_label(&Availability::Unavailable(UnavailableReason::OutsideWorkingHours(
                Span::new(540, 1020)
            ))),
            "outside_hours"
        );
    }
}
