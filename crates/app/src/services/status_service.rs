//! Status service — runs lifecycle actions through the service state machine.

use std::sync::{Mutex, MutexGuard, PoisonError};

use svctray_domain::error::HelperError;
use svctray_domain::event::StatusEvent;
use svctray_domain::quick_config::GeneralConfig;
use svctray_domain::service_state::{Outcome, ServiceAction, ServiceState, TransitionError};

use crate::ports::{ServiceControl, StatusPublisher};

/// Application service owning the current [`ServiceState`].
///
/// Every change is published as a [`StatusEvent`]. The state lock is never
/// held across a controller call.
pub struct StatusService<C, P> {
    control: C,
    publisher: P,
    state: Mutex<ServiceState>,
}

impl<C: ServiceControl, P: StatusPublisher> StatusService<C, P> {
    /// Create a service in the [`ServiceState::Unknown`] state.
    pub fn new(control: C, publisher: P) -> Self {
        Self {
            control,
            publisher,
            state: Mutex::new(ServiceState::Unknown),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The state as last recorded.
    pub fn current(&self) -> ServiceState {
        *self.lock()
    }

    /// Start the service.
    ///
    /// `config` is validated first unless the service is waiting for an
    /// upgrade, which starts without a config check. The check is made
    /// against the same state the action begins from.
    ///
    /// # Errors
    ///
    /// Returns [`HelperError::Validation`] (state unchanged) when `config` is
    /// incomplete, [`HelperError::Transition`] when starting is not possible
    /// from the current state, or the controller's error after settling to
    /// [`ServiceState::Stopped`].
    #[tracing::instrument(skip(self, config), fields(role = ?config.role))]
    pub async fn start(&self, config: &GeneralConfig) -> Result<ServiceState, HelperError> {
        self.run(|from| checked_start(from, config)).await
    }

    /// Stop the service.
    ///
    /// # Errors
    ///
    /// Returns [`HelperError::Transition`] when stopping is not possible, or
    /// the controller's error after settling to [`ServiceState::Unknown`].
    #[tracing::instrument(skip(self))]
    pub async fn stop(&self) -> Result<ServiceState, HelperError> {
        self.run(|_| Ok(ServiceAction::Stop)).await
    }

    /// Restart a running service.
    ///
    /// # Errors
    ///
    /// Returns [`HelperError::Transition`] unless the service is running, or
    /// the controller's error after settling to [`ServiceState::Stopped`].
    #[tracing::instrument(skip(self))]
    pub async fn restart(&self) -> Result<ServiceState, HelperError> {
        self.run(|_| Ok(ServiceAction::Restart)).await
    }

    /// The status menu's start/stop entry: start when stopped, stop otherwise.
    ///
    /// # Errors
    ///
    /// See [`start`](Self::start) and [`stop`](Self::stop).
    pub async fn toggle(&self, config: &GeneralConfig) -> Result<ServiceState, HelperError> {
        self.run(|from| match from.toggle_action() {
            ServiceAction::Start => checked_start(from, config),
            ServiceAction::Stop | ServiceAction::Restart => Ok(ServiceAction::Stop),
        })
        .await
    }

    /// Save-and-start from the Quick Config dialog: validate, then start a
    /// stopped service or restart a running one.
    ///
    /// # Errors
    ///
    /// Returns [`HelperError::Validation`] when `config` is incomplete,
    /// otherwise as [`start`](Self::start) / [`restart`](Self::restart).
    #[tracing::instrument(skip(self, config), fields(role = ?config.role))]
    pub async fn apply_quick_config(
        &self,
        config: &GeneralConfig,
    ) -> Result<ServiceState, HelperError> {
        config.validate()?;
        self.run(|from| {
            Ok(if from.is_stopped() {
                ServiceAction::Start
            } else {
                ServiceAction::Restart
            })
        })
        .await
    }

    /// Poll the controller and record the observed state.
    ///
    /// While an action is in flight the poll is skipped and the pending state
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the controller's error; the recorded state is left unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> Result<ServiceState, HelperError> {
        let current = self.current();
        if current.is_transitional() {
            tracing::debug!(state = %current, "action in flight, skipping status poll");
            return Ok(current);
        }

        let observed = ServiceState::from(self.control.observe().await?);
        let from = {
            let mut state = self.lock();
            if state.is_transitional() {
                return Ok(*state);
            }
            std::mem::replace(&mut *state, observed)
        };
        if from != observed {
            self.announce(from, observed).await;
        }
        Ok(observed)
    }

    /// Pick the action from the current state and move to its pending state,
    /// in one critical section, then drive the controller and settle.
    async fn run<F>(&self, plan: F) -> Result<ServiceState, HelperError>
    where
        F: FnOnce(ServiceState) -> Result<ServiceAction, HelperError>,
    {
        let (action, from, pending) = {
            let mut state = self.lock();
            let from = *state;
            let action = plan(from)?;
            let pending = from.begin(action)?;
            *state = pending;
            (action, from, pending)
        };
        let guard = PendingAction::new(&self.state, action);
        self.announce(from, pending).await;

        let result = match action {
            ServiceAction::Start => self.control.start().await,
            ServiceAction::Stop => self.control.stop().await,
            ServiceAction::Restart => self.control.restart().await,
        };
        let outcome = match &result {
            Ok(()) => Outcome::Succeeded,
            Err(err) => {
                tracing::error!(%action, error = %err, "service action failed");
                Outcome::Failed
            }
        };

        let settled = guard.settle(outcome)?;
        self.announce(pending, settled).await;

        result.map(|()| settled)
    }

    /// Log and publish a change. A failed publish never stops the action.
    async fn announce(&self, from: ServiceState, to: ServiceState) {
        tracing::info!(%from, %to, "service state changed");
        if let Err(err) = self.publisher.publish(StatusEvent::new(from, to)).await {
            tracing::warn!(%from, %to, error = %err, "status event not delivered");
        }
    }
}

fn checked_start(from: ServiceState, config: &GeneralConfig) -> Result<ServiceAction, HelperError> {
    if !from.needs_migration() {
        config.validate()?;
    }
    Ok(ServiceAction::Start)
}

/// A begun action that has not settled yet.
///
/// Dropping it unsettled (the caller gave up on the future) settles the state
/// as failed, so the service never stays transitional.
struct PendingAction<'a> {
    state: &'a Mutex<ServiceState>,
    action: ServiceAction,
    armed: bool,
}

impl<'a> PendingAction<'a> {
    fn new(state: &'a Mutex<ServiceState>, action: ServiceAction) -> Self {
        Self {
            state,
            action,
            armed: true,
        }
    }

    fn settle(mut self, outcome: Outcome) -> Result<ServiceState, TransitionError> {
        self.armed = false;
        settle(self.state, outcome)
    }
}

impl Drop for PendingAction<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match settle(self.state, Outcome::Failed) {
            Ok(settled) => {
                tracing::warn!(action = %self.action, state = %settled, "service action abandoned");
            }
            Err(err) => {
                tracing::error!(action = %self.action, error = %err, "abandoned action left unsettled");
            }
        }
    }
}

fn settle(state: &Mutex<ServiceState>, outcome: Outcome) -> Result<ServiceState, TransitionError> {
    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    let settled = state.settle(outcome)?;
    *state = settled;
    Ok(settled)
}
