//! Service control port — carries out lifecycle actions on the managed service.
//!
//! Implementations wrap whatever the platform offers (launchd, the Windows
//! service manager, a simulated service). Each action future resolves once
//! the action has finished, successfully or not.

use std::future::Future;

use svctray_domain::error::HelperError;
use svctray_domain::service_state::Observation;

/// Drives and inspects the managed service.
pub trait ServiceControl {
    fn start(&self) -> impl Future<Output = Result<(), HelperError>> + Send;

    fn stop(&self) -> impl Future<Output = Result<(), HelperError>> + Send;

    fn restart(&self) -> impl Future<Output = Result<(), HelperError>> + Send;

    /// Report the raw facts the current state is derived from.
    fn observe(&self) -> impl Future<Output = Result<Observation, HelperError>> + Send;
}

impl<T: ServiceControl + Send + Sync> ServiceControl for std::sync::Arc<T> {
    fn start(&self) -> impl Future<Output = Result<(), HelperError>> + Send {
        (**self).start()
    }

    fn stop(&self) -> impl Future<Output = Result<(), HelperError>> + Send {
        (**self).stop()
    }

    fn restart(&self) -> impl Future<Output = Result<(), HelperError>> + Send {
        (**self).restart()
    }

    fn observe(&self) -> impl Future<Output = Result<Observation, HelperError>> + Send {
        (**self).observe()
    }
}
