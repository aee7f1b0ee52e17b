//! Status bus: fans service state changes out to the tray's listeners.

use std::future::Future;

use tokio::sync::broadcast;

use svctray_domain::error::HelperError;
use svctray_domain::event::StatusEvent;

use crate::ports::StatusPublisher;

/// Broadcasts every [`StatusEvent`] to whoever currently listens, such as the
/// status menu and the notification popup.
///
/// A listener that falls more than `capacity` events behind loses the oldest
/// ones and is told so with [`broadcast::error::RecvError::Lagged`]. It can
/// then resynchronise from the next event, since every event carries the
/// full target state.
pub struct InProcessStatusBus {
    sender: broadcast::Sender<StatusEvent>,
}

impl InProcessStatusBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Listen for changes published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.sender.subscribe()
    }
}

impl StatusPublisher for InProcessStatusBus {
    fn publish(&self, event: StatusEvent) -> impl Future<Output = Result<(), HelperError>> + Send {
        // No listener yet (menu not built) is not an error.
        let _ = self.sender.send(event);
        async { Ok(()) }
    }
}
