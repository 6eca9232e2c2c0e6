//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] carries validated [`IpcMessage`] envelopes between the
//! shell, the execution host bridge, and the registry service. It is
//! designed to be shared via `Arc<EventBus>` across the application.

use tokio::sync::broadcast;

use opsdeck_core::boundary::message::IpcMessage;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out bus for IPC envelopes.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published message.
pub struct EventBus {
    sender: broadcast::Sender<IpcMessage>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are
    /// dropped and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a message to all current subscribers.
    ///
    /// If there are no active subscribers the message is silently
    /// dropped.
    pub fn publish(&self, message: IpcMessage) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(message);
    }

    /// Subscribe to all messages published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<IpcMessage> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
