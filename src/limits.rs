use crate::model::Minutes;

/// Longest bookable window within one day.
pub const MAX_BOOKING_MINUTES: Minutes = 24 * 60;

/// Smallest step accepted for slot enumeration.
pub const MIN_SLOT_DURATION_MINUTES: Minutes = 5;

pub const MAX_PARTY_SIZE: u32 = 100;

pub const MAX_NOTES_LEN: usize = 2_000;

pub const MAX_ID_LEN: usize = 128;

/// Cap on bookings held by a single calendar.
pub const MAX_BOOKINGS: usize = 100_000;
