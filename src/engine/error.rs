use thiserror::Error;

use crate::model::UnavailableReason;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("staff member not found: {0}")]
    StaffNotFound(String),
    #[error("slot not found: {0}")]
    SlotNotFound(String),
    #[error("room not found: {0}")]
    RoomNotFound(String),
    #[error("booking not found: {0}")]
    BookingNotFound(String),
    #[error("booking already exists: {0}")]
    AlreadyExists(String),
    #[error("booking already cancelled: {0}")]
    AlreadyCancelled(String),
    #[error("{0}")]
    Unavailable(UnavailableReason),
    #[error("conflict with booking: {0}")]
    Conflict(String),
    #[error("capacity {0} exceeded: all concurrent bookings taken")]
    CapacityExceeded(u32),
    #[error("slot {slot_id} has {remaining} places left, {requested} requested")]
    SlotFull {
        slot_id: String,
        remaining: u32,
        requested: u32,
    },
    #[error("slot {slot_id} is not taught by {staff_id}")]
    InstructorMismatch { slot_id: String, staff_id: String },
    #[error("slot {0} is not offered on this date")]
    SlotNotOffered(String),
    #[error("staff member {0} has approved time off")]
    TimeOff(String),
    #[error("invalid window: {0}")]
    InvalidWindow(&'static str),
    #[error("limit exceeded: {0}")]
    LimitExceeded(&'static str),
}
