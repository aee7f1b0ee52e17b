//! View models — what the status menu and the Quick Config dialog show for
//! a given [`ServiceState`]. Labels stay untranslated here; the app layer
//! renders them for the current locale.

use crate::message::LocalizedString;
use crate::quick_config::DIALOG_CONTEXT;
use crate::service_state::{ServiceAction, ServiceState};

/// Translation context of the status menu.
pub const MENU_CONTEXT: &str = "Status";

/// A labelled, possibly disabled, action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionView {
    pub label: LocalizedString,
    pub enabled: bool,
}

/// Status submenu: title plus start/stop and restart entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMenuView {
    pub title: LocalizedString,
    /// Action bound to the start/stop entry.
    pub toggle_action: ServiceAction,
    pub toggle: ActionView,
    pub restart: ActionView,
}

/// Confirm/cancel buttons of the Quick Config dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogButtonsView {
    /// Action the confirm button triggers, when enabled.
    pub confirm_action: Option<ServiceAction>,
    pub confirm: ActionView,
    pub cancel: ActionView,
}

fn menu_label(source: &str) -> LocalizedString {
    LocalizedString::new(MENU_CONTEXT, source)
}

fn dialog_label(source: &str) -> LocalizedString {
    LocalizedString::new(DIALOG_CONTEXT, source)
}

impl StatusMenuView {
    /// `status_label` is the state's label already rendered for display.
    #[must_use]
    pub fn for_state(state: ServiceState, status_label: impl Into<String>) -> Self {
        let toggle_action = state.toggle_action();
        let toggle_source = match toggle_action {
            ServiceAction::Start => "Start",
            ServiceAction::Stop | ServiceAction::Restart => "Stop",
        };
        Self {
            title: menu_label("Status ({status})").with_param("status", status_label),
            toggle_action,
            toggle: ActionView {
                label: menu_label(toggle_source),
                enabled: !state.is_transitional(),
            },
            restart: ActionView {
                label: menu_label("Restart"),
                enabled: state.is_running(),
            },
        }
    }
}

impl DialogButtonsView {
    #[must_use]
    pub fn for_state(state: ServiceState) -> Self {
        let (source, confirm_action) = if state.is_running() {
            ("Restart", Some(ServiceAction::Restart))
        } else if state.is_stopped() {
            ("Start", Some(ServiceAction::Start))
        } else {
            ("Start", None)
        };
        Self {
            confirm_action,
            confirm: ActionView {
                label: dialog_label(source),
                enabled: confirm_action.is_some(),
            },
            cancel: ActionView {
                label: dialog_label("Cancel"),
                enabled: true,
            },
        }
    }
}
