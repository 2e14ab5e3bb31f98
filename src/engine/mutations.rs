use tracing::{info, warn};
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;
use crate::observability::{record_mutation, BOOKINGS_HELD};

use super::conflict::{check_booking, validate_draft};
use super::{Calendar, EngineError};

impl Calendar {
    /// Admit a new booking. The id is a fresh ULID unless the draft names one.
    pub async fn create_booking(&self, draft: BookingDraft) -> Result<Booking, EngineError> {
        let result = self.try_create(draft).await;
        self.finish("create", &result);
        result
    }

    async fn try_create(&self, draft: BookingDraft) -> Result<Booking, EngineError> {
        validate_draft(&draft)?;
        let mut guard = self.bookings.write().await;
        if guard.len() >= MAX_BOOKINGS {
            return Err(EngineError::LimitExceeded("too many bookings"));
        }
        let id = draft.id.clone().unwrap_or_else(|| Ulid::new().to_string());
        if guard.iter().any(|b| b.id == id) {
            return Err(EngineError::AlreadyExists(id));
        }

        let booking = draft.into_booking(id);
        if booking.is_active() {
            check_booking(&self.directory, &guard, &booking, None)?;
        }
        guard.push(booking.clone());
        metrics::gauge!(BOOKINGS_HELD).set(guard.len() as f64);
        drop(guard);

        self.publish(&booking.staff_id, BookingEvent::Created(booking.clone()));
        Ok(booking)
    }

    /// Replace booking `id` with `draft`, re-checking it against everything
    /// except its own previous version.
    pub async fn update_booking(&self, id: &str, draft: BookingDraft) -> Result<Booking, EngineError> {
        let result = self.try_update(id, draft).await;
        self.finish("update", &result);
        result
    }

    async fn try_update(&self, id: &str, draft: BookingDraft) -> Result<Booking, EngineError> {
        validate_draft(&draft)?;
        let mut guard = self.bookings.write().await;
        let pos = guard
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| EngineError::BookingNotFound(id.to_string()))?;

        let after = draft.into_booking(id.to_string());
        if after.is_active() {
            check_booking(&self.directory, &guard, &after, Some(id))?;
        }
        let before = std::mem::replace(&mut guard[pos], after.clone());
        drop(guard);

        let event = BookingEvent::Updated {
            before: before.clone(),
            after: after.clone(),
        };
        if before.staff_id != after.staff_id {
            self.publish(&before.staff_id, event.clone());
        }
        self.publish(&after.staff_id, event);
        Ok(after)
    }

    pub async fn cancel_booking(&self, id: &str) -> Result<Booking, EngineError> {
        let result = self.try_cancel(id).await;
        self.finish("cancel", &result);
        result
    }

    async fn try_cancel(&self, id: &str) -> Result<Booking, EngineError> {
        let mut guard = self.bookings.write().await;
        let booking = guard
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| EngineError::BookingNotFound(id.to_string()))?;
        if !booking.is_active() {
            return Err(EngineError::AlreadyCancelled(id.to_string()));
        }
        booking.status = BookingStatus::Cancelled;
        let cancelled = booking.clone();
        drop(guard);

        self.publish(&cancelled.staff_id, BookingEvent::Cancelled(cancelled.clone()));
        Ok(cancelled)
    }

    /// Move a booking to `status`. Reviving a cancelled booking re-runs the
    /// admission check, since its place may have been taken meanwhile.
    pub async fn set_status(&self, id: &str, status: BookingStatus) -> Result<Booking, EngineError> {
        if status == BookingStatus::Cancelled {
            return self.cancel_booking(id).await;
        }
        let result = self.try_set_status(id, status).await;
        self.finish("set_status", &result);
        result
    }

    async fn try_set_status(&self, id: &str, status: BookingStatus) -> Result<Booking, EngineError> {
        let mut guard = self.bookings.write().await;
        let pos = guard
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| EngineError::BookingNotFound(id.to_string()))?;

        if !guard[pos].is_active() {
            let mut revived = guard[pos].clone();
            revived.status = status;
            check_booking(&self.directory, &guard, &revived, Some(id))?;
        }
        guard[pos].status = status;
        let updated = guard[pos].clone();
        drop(guard);

        self.publish(
            &updated.staff_id,
            BookingEvent::StatusChanged {
                id: updated.id.clone(),
                staff_id: updated.staff_id.clone(),
                status,
            },
        );
        Ok(updated)
    }

    pub async fn set_payment_status(
        &self,
        id: &str,
        payment_status: PaymentStatus,
    ) -> Result<Booking, EngineError> {
        let result = self.try_set_payment(id, payment_status).await;
        self.finish("set_payment", &result);
        result
    }

    async fn try_set_payment(
        &self,
        id: &str,
        payment_status: PaymentStatus,
    ) -> Result<Booking, EngineError> {
        let mut guard = self.bookings.write().await;
        let booking = guard
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| EngineError::BookingNotFound(id.to_string()))?;
        booking.payment_status = payment_status;
        let updated = booking.clone();
        drop(guard);

        self.publish(
            &updated.staff_id,
            BookingEvent::PaymentChanged {
                id: updated.id.clone(),
                staff_id: updated.staff_id.clone(),
                payment_status,
            },
        );
        Ok(updated)
    }

    fn finish(&self, op: &'static str, result: &Result<Booking, EngineError>) {
        match result {
            Ok(booking) => {
                info!(op, id = %booking.id, staff_id = %booking.staff_id, status = booking.status.as_str(), "booking mutation");
            }
            Err(e) => warn!(op, error = %e, "booking mutation rejected"),
        }
        record_mutation(op, result.is_ok());
    }
}
