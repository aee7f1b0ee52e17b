//! Service state — the lifecycle state machine of the managed service.
//!
//! Exactly one [`ServiceState`] is active at a time. A user action
//! ([`ServiceAction`]) moves a settled state into a transitional one, and the
//! controller's [`Outcome`] settles it again.

use serde::{Deserialize, Serialize};

use crate::message::LocalizedString;

/// Translation context holding the state labels.
pub const LABEL_CONTEXT: &str = "AbstractService";

/// Current lifecycle state of the managed service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    #[default]
    Unknown,
    Stopped,
    Starting,
    Running,
    Stopping,
    Restarting,
    /// Running, but the active configuration lags behind the user's.
    ToRestart,
    /// Stopped, and the installation must be migrated before it can run.
    ToUpgrade,
}

/// A user-initiated lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
}

/// How a controller action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
}

/// Raw facts reported by a service controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// The installation layout is current (no upgrade pending).
    pub migrated: bool,
    /// The service process is up.
    pub running: bool,
    /// The active configuration matches the user's configuration.
    pub in_sync: bool,
}

/// Reasons a state change was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot {action} while {state}")]
    Busy {
        state: ServiceState,
        action: ServiceAction,
    },

    #[error("{action} is not allowed from {state}")]
    NotAllowed {
        state: ServiceState,
        action: ServiceAction,
    },

    #[error("{0} has no pending action to settle")]
    NothingToSettle(ServiceState),
}

impl ServiceState {
    /// Every state, in label-table order.
    pub const ALL: [Self; 8] = [
        Self::ToUpgrade,
        Self::Stopped,
        Self::Stopping,
        Self::Restarting,
        Self::Starting,
        Self::ToRestart,
        Self::Unknown,
        Self::Running,
    ];

    #[must_use]
    pub fn is_stopped(self) -> bool {
        matches!(self, Self::Stopped | Self::ToUpgrade)
    }

    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running | Self::ToRestart)
    }

    /// A controller action is in flight.
    #[must_use]
    pub fn is_transitional(self) -> bool {
        matches!(self, Self::Starting | Self::Stopping | Self::Restarting)
    }

    #[must_use]
    pub fn needs_migration(self) -> bool {
        matches!(self, Self::ToUpgrade)
    }

    /// Source-language label, also the translation key in [`LABEL_CONTEXT`].
    #[must_use]
    pub fn source_label(self) -> &'static str {
        match self {
            Self::ToUpgrade => "To Upgrade",
            Self::Stopped => "Stopped",
            Self::Stopping => "Stopping",
            Self::Restarting => "Restarting",
            Self::Starting => "Starting",
            Self::ToRestart => "To Restart",
            Self::Unknown => "Unknown",
            Self::Running => "Running",
        }
    }

    /// Translatable label for this state.
    #[must_use]
    pub fn label(self) -> LocalizedString {
        LocalizedString::new(LABEL_CONTEXT, self.source_label())
    }

    /// The action behind the status menu's single start/stop entry.
    #[must_use]
    pub fn toggle_action(self) -> ServiceAction {
        if self.is_stopped() {
            ServiceAction::Start
        } else {
            ServiceAction::Stop
        }
    }

    /// Enter the transitional state for `action`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Busy`] while another action is in flight and
    /// [`TransitionError::NotAllowed`] when `action` makes no sense from here.
    pub fn begin(self, action: ServiceAction) -> Result<Self, TransitionError> {
        if self.is_transitional() {
            return Err(TransitionError::Busy {
                state: self,
                action,
            });
        }
        match action {
            ServiceAction::Start if self.is_stopped() => Ok(Self::Starting),
            ServiceAction::Stop if self.is_running() || self == Self::Unknown => {
                Ok(Self::Stopping)
            }
            ServiceAction::Restart if self.is_running() => Ok(Self::Restarting),
            _ => Err(TransitionError::NotAllowed {
                state: self,
                action,
            }),
        }
    }

    /// Leave a transitional state once the controller reports back.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NothingToSettle`] if no action is pending.
    pub fn settle(self, outcome: Outcome) -> Result<Self, TransitionError> {
        let next = match (self, outcome) {
            (Self::Starting | Self::Restarting, Outcome::Succeeded) => Self::Running,
            (Self::Starting | Self::Restarting, Outcome::Failed)
            | (Self::Stopping, Outcome::Succeeded) => Self::Stopped,
            (Self::Stopping, Outcome::Failed) => Self::Unknown,
            _ => return Err(TransitionError::NothingToSettle(self)),
        };
        Ok(next)
    }
}

impl From<Observation> for ServiceState {
    fn from(obs: Observation) -> Self {
        match obs {
            Observation {
                migrated: false, ..
            } => Self::ToUpgrade,
            Observation {
                running: true,
                in_sync: true,
                ..
            } => Self::Running,
            Observation {
                running: true,
                in_sync: false,
                ..
            } => Self::ToRestart,
            Observation { running: false, .. } => Self::Stopped,
        }
    }
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            Self::Stopped => f.write_str("stopped"),
            Self::Starting => f.write_str("starting"),
            Self::Running => f.write_str("running"),
            Self::Stopping => f.write_str("stopping"),
            Self::Restarting => f.write_str("restarting"),
            Self::ToRestart => f.write_str("to_restart"),
            Self::ToUpgrade => f.write_str("to_upgrade"),
        }
    }
}

impl std::fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Stop => f.write_str("stop"),
            Self::Restart => f.write_str("restart"),
        }
    }
}
