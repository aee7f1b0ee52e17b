//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HelperError`]
//! via `#[from]` (domain errors) or by boxing (adapter errors).

use crate::quick_config::ValidationError;
use crate::service_state::TransitionError;

/// Base error for every port and use-case in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum HelperError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("state transition rejected")]
    Transition(#[from] TransitionError),

    /// A translation source (file, directory, …) failed.
    #[error("translation source error")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The service controller failed to carry out an action.
    #[error("service control error")]
    Control(#[source] Box<dyn std::error::Error + Send + Sync>),
}
