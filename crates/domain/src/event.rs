//! Status events — records of service state changes.

use serde::{Deserialize, Serialize};

use crate::id::EventId;
use crate::service_state::ServiceState;
use crate::time::{Timestamp, now};

/// Emitted every time the service state changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub id: EventId,
    pub from: ServiceState,
    pub to: ServiceState,
    pub at: Timestamp,
}

impl StatusEvent {
    /// Record a change happening now.
    #[must_use]
    pub fn new(from: ServiceState, to: ServiceState) -> Self {
        Self {
            id: EventId::new(),
            from,
            to,
            at: now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_record_states_and_fresh_id() {
        let a = StatusEvent::new(ServiceState::Stopped, ServiceState::Starting);
        let b = StatusEvent::new(ServiceState::Stopped, ServiceState::Starting);
        assert_eq!(a.from, ServiceState::Stopped);
        assert_eq!(a.to, ServiceState::Starting);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn should_serialize_states_in_snake_case() {
        let event = StatusEvent::new(ServiceState::Running, ServiceState::ToRestart);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["from"], "running");
        assert_eq!(json["to"], "to_restart");
    }
}
