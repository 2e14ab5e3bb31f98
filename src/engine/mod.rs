mod availability;
mod capacity;
mod conflict;
mod error;
mod mutations;
mod queries;
mod slots;
mod time_off;

pub use availability::{
    available_time_slots, free_windows, is_staff_available, merge_overlapping, subtract_intervals,
    working_window,
};
pub use capacity::{
    capacity_color, compute_saturated_spans, is_room_available, saturated_windows,
    staff_available_capacity,
};
pub use conflict::{find_conflict, has_conflict};
pub use error::EngineError;
pub use queries::{DayAgenda, SlotAgenda, StaffAgenda};
pub use slots::{count_slot_occupancy, slot_remaining, slots_for_date};
pub use time_off::{blocking_time_off, blocks};

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::*;
use crate::notify::NotifyHub;

/// In-memory calendar: a read-only directory snapshot plus the live booking
/// list. Queries delegate to the pure functions above; mutations run the
/// admission check and append under the write lock.
pub struct Calendar {
    directory: Directory,
    bookings: RwLock<Vec<Booking>>,
    pub notify: Arc<NotifyHub>,
}

impl Calendar {
    /// Takes ownership of the snapshot; its bookings become the live list.
    /// Bookings with an unusable window are dropped with a warning.
    pub fn new(mut directory: Directory, notify: Arc<NotifyHub>) -> Self {
        let mut bookings = std::mem::take(&mut directory.bookings);
        bookings.retain(|b| match conflict::validate_window(&b.start, &b.end) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(id = %b.id, staff_id = %b.staff_id, error = %e, "dropping snapshot booking");
                false
            }
        });
        tracing::info!(
            staff = directory.staff.len(),
            rooms = directory.rooms.len(),
            slots = directory.slots.len(),
            time_off = directory.time_off.len(),
            bookings = bookings.len(),
            "calendar loaded"
        );
        metrics::gauge!(crate::observability::BOOKINGS_HELD).set(bookings.len() as f64);
        Self {
            directory,
            bookings: RwLock::new(bookings),
            notify,
        }
    }

    /// Staff, rooms, slots and time-off. Its `bookings` field is always empty.
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.bookings.read().await.clone()
    }

    pub async fn get_booking(&self, id: &str) -> Option<Booking> {
        self.bookings.read().await.iter().find(|b| b.id == id).cloned()
    }

    fn publish(&self, staff_id: &str, event: BookingEvent) {
        self.notify.send(staff_id, &event);
    }
}
