use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::model::BookingEvent;

const CHANNEL_CAPACITY: usize = 256;

/// Broadcast hub for booking changes, one channel per staff member.
pub struct NotifyHub {
    channels: DashMap<String, broadcast::Sender<BookingEvent>>,
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to changes for a staff member. Creates the channel if needed.
    pub fn subscribe(&self, staff_id: &str) -> broadcast::Receiver<BookingEvent> {
        let sender = self
            .channels
            .entry(staff_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Send a notification. No-op if nobody is listening.
    pub fn send(&self, staff_id: &str, event: &BookingEvent) {
        if let Some(sender) = self.channels.get(staff_id) {
            let _ = sender.send(event.clone());
        }
    }

    pub fn remove(&self, staff_id: &str) {
        self.channels.remove(staff_id);
    }

    pub fn subscriber_count(&self, staff_id: &str) -> usize {
        self.channels
            .get(staff_id)
            .map_or(0, |sender| sender.receiver_count())
    }
}
