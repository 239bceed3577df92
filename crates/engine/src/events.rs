//! In-process sync event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`SyncBus`] is how the engine reports outcomes to the presentation layer
//! without the layers knowing about each other. It is designed to be shared
//! via `Arc<SyncBus>` across the cache and the reconcilers.

use tokio::sync::broadcast;

use alertsync_core::action::AlertAction;
use alertsync_core::registration::RegistrationId;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// An outcome the presentation layer may want to react to.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A fresh server list replaced the cached one; views should recompute.
    ListRefreshed { count: usize },

    /// A single action was confirmed by the server.
    ActionApplied {
        id: RegistrationId,
        action: AlertAction,
    },

    /// A single action was rejected, locally or by the server.
    ActionFailed {
        id: RegistrationId,
        action: AlertAction,
        reason: String,
    },

    /// A batch wave finished settling.
    BatchSettled {
        action: AlertAction,
        attempted: usize,
        failed: usize,
    },
}

/// In-process fan-out bus for [`SyncEvent`]s.
///
/// If there are no active subscribers an event is silently dropped; the
/// engine never depends on anyone listening.
pub struct SyncBus {
    sender: broadcast::Sender<SyncEvent>,
}

impl SyncBus {
    /// Create a bus with a specific channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: SyncEvent) {
        // Ignore the SendError, it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.sender.subscribe()
    }
}

impl Default for SyncBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
