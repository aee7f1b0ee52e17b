//! Event bus port — publish/subscribe for service state changes.

use std::future::Future;

use svctray_domain::error::HelperError;
use svctray_domain::event::StatusEvent;

/// Publishes status events to interested subscribers.
pub trait StatusPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: StatusEvent) -> impl Future<Output = Result<(), HelperError>> + Send;
}

impl<T: StatusPublisher + Send + Sync> StatusPublisher for std::sync::Arc<T> {
    fn publish(&self, event: StatusEvent) -> impl Future<Output = Result<(), HelperError>> + Send {
        (**self).publish(event)
    }
}
