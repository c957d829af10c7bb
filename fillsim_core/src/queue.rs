// fillsim_core/src/queue.rs

//! FIFO event backbone shared by all components.
//!
//! Built on `std::sync::mpsc` so push/pop stay atomic: the single-threaded
//! backtest loop needs no locking, and a future live variant with a broker
//! callback thread can push from another thread without an interface change.
//! The driving loop owns the `EventQueue`; producers hold `EventSender`
//! handles and can only append.

use crate::event;

/// Push-only handle onto the shared queue. Cheap to clone; one per
/// producing component.
#[derive(Clone)]
pub struct EventSender {
    sender: std::sync::mpsc::Sender<event::Event>,
}

impl EventSender {
    pub fn push(&self, event: event::Event) -> anyhow::Result<()> {
        self.sender
            .send(event)
            .map_err(|e| anyhow::anyhow!("Event queue disconnected: {}", e))
    }

}

/// Strictly ordered event queue. `pop` yields events in exactly the
/// order they were pushed; no priority, no deduplication.
pub struct EventQueue {
    sender: std::sync::mpsc::Sender<event::Event>,
    receiver: std::sync::mpsc::Receiver<event::Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (sender, receiver) = std::sync::mpsc::channel();
        Self { sender, receiver }
    }

    /// Creates a push-only handle for a producing component.
    pub fn handle(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Appends an event directly (the owning loop's side).
    pub fn push(&self, event: event::Event) -> anyhow::Result<()> {
        self.sender
            .send(event)
            .map_err(|e| anyhow::anyhow!("Event queue disconnected: {}", e))
    }

    /// Removes and returns the oldest event, or `None` when the queue
    /// is drained for this turn.
    pub fn pop(&self) -> Option<event::Event> {
        self.receiver.try_recv().ok()
    }

}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
