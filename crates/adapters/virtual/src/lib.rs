//! # svctray-adapter-virtual
//!
//! A simulated managed service implementing the `ServiceControl` port.
//!
//! ## Behaviour
//!
//! | Action | Effect |
//! |--------|--------|
//! | `start` | migrates if needed, then runs with the current configuration |
//! | `stop` | stops the process |
//! | `restart` | reloads the configuration; fails when not running |
//!
//! [`VirtualService::fail_next`] makes the next matching action fail, and
//! [`VirtualService::change_config`] makes a running service fall out of
//! sync, so every state of the tray can be reached without a real service.
//!
//! ## Dependency rule
//!
//! Depends on `svctray-app` (port traits) and `svctray-domain` only.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use svctray_app::ports::ServiceControl;
use svctray_domain::error::HelperError;
use svctray_domain::service_state::{Observation, ServiceAction};

/// Failures of the simulated service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VirtualError {
    #[error("simulated {0} failure")]
    Injected(ServiceAction),

    #[error("service is not running")]
    NotRunning,
}

impl From<VirtualError> for HelperError {
    fn from(err: VirtualError) -> Self {
        Self::Control(Box::new(err))
    }
}

#[derive(Debug)]
struct Simulation {
    observation: Observation,
    fail_next: Option<ServiceAction>,
}

/// In-memory stand-in for the managed service.
#[derive(Debug)]
pub struct VirtualService {
    sim: Mutex<Simulation>,
    delay: Duration,
}

impl Default for VirtualService {
    /// Installed, migrated and stopped.
    fn default() -> Self {
        Self::new(Observation {
            migrated: true,
            running: false,
            in_sync: true,
        })
    }
}

impl VirtualService {
    #[must_use]
    pub fn new(observation: Observation) -> Self {
        Self {
            sim: Mutex::new(Simulation {
                observation,
                fail_next: None,
            }),
            delay: Duration::ZERO,
        }
    }

    /// Make every action take `delay` before it completes.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Simulation> {
        self.sim.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next `action` fail without changing anything.
    pub fn fail_next(&self, action: ServiceAction) {
        self.lock().fail_next = Some(action);
    }

    /// The user saved a new configuration.
    pub fn change_config(&self) {
        let mut sim = self.lock();
        if sim.observation.running {
            sim.observation.in_sync = false;
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Observation {
        self.lock().observation
    }

    async fn perform(
        &self,
        action: ServiceAction,
        apply: impl FnOnce(&mut Observation) -> Result<(), VirtualError>,
    ) -> Result<(), HelperError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let mut sim = self.lock();
        if sim.fail_next == Some(action) {
            sim.fail_next = None;
            tracing::debug!(%action, "injected failure");
            return Err(VirtualError::Injected(action).into());
        }
        apply(&mut sim.observation)?;
        tracing::debug!(%action, observation = ?sim.observation, "virtual service updated");
        Ok(())
    }
}

impl ServiceControl for VirtualService {
    async fn start(&self) -> Result<(), HelperError> {
        self.perform(ServiceAction::Start, |obs| {
            obs.migrated = true;
            obs.running = true;
            obs.in_sync = true;
            Ok(())
        })
        .await
    }

    async fn stop(&self) -> Result<(), HelperError> {
        self.perform(ServiceAction::Stop, |obs| {
            obs.running = false;
            Ok(())
        })
        .await
    }

    async fn restart(&self) -> Result<(), HelperError> {
        self.perform(ServiceAction::Restart, |obs| {
            if !obs.running {
                return Err(VirtualError::NotRunning);
            }
            obs.in_sync = true;
            Ok(())
        })
        .await
    }

    async fn observe(&self) -> Result<Observation, HelperError> {
        Ok(self.snapshot())
    }
}
