//! Quick Config — the "General" page rules of the settings dialog.
//!
//! The page picks a [`ServerRole`] and collects the fields that role needs.
//! Validation runs before the service is started from either the status
//! menu or the dialog.

use serde::{Deserialize, Serialize};

use crate::message::LocalizedString;

/// Translation context of the validation messages and error notices.
pub const CONFIG_CONTEXT: &str = "GPUStackConfig";
/// Translation context of the General page field hints.
pub const PAGE_CONTEXT: &str = "GeneralConfigPage";
/// Translation context of the Quick Config dialog.
pub const DIALOG_CONTEXT: &str = "QuickConfig";

const DEFAULT_HTTP_PORT: u16 = 80;
const DEFAULT_HTTPS_PORT: u16 = 443;

/// Which parts of the stack this machine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerRole {
    /// Server and worker together.
    #[default]
    All,
    /// Worker joining a remote server.
    Worker,
    /// Server without a local worker.
    ServerOnly,
}

/// Settings edited on the General page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub role: ServerRole,
    pub server_url: Option<String>,
    pub token: Option<String>,
    pub port: Option<u16>,
    pub ssl_certfile: Option<String>,
    pub ssl_keyfile: Option<String>,
}

/// Why a [`GeneralConfig`] cannot be used to start the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Server URL is required when running as Worker")]
    ServerUrlRequired,

    #[error("Token is required when running as Worker")]
    TokenRequired,
}

/// Where a validation failure is reported from; picks the notice title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeOrigin {
    /// Starting from the status menu.
    StatusMenu,
    /// Saving the Quick Config dialog.
    Dialog,
}

/// A user-facing warning: title and body, both translatable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: LocalizedString,
    pub body: LocalizedString,
}

/// Enabled state and placeholder for the role-dependent fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHints {
    pub server_url_enabled: bool,
    pub port_enabled: bool,
    pub server_url_placeholder: Option<LocalizedString>,
    pub token_placeholder: LocalizedString,
}

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

impl ServerRole {
    #[must_use]
    pub fn is_worker(self) -> bool {
        matches!(self, Self::Worker)
    }
}

impl GeneralConfig {
    /// Check the role's required fields.
    ///
    /// # Errors
    ///
    /// For [`ServerRole::Worker`], returns
    /// [`ValidationError::ServerUrlRequired`] if the server URL is blank, then
    /// [`ValidationError::TokenRequired`] if the token is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.role.is_worker() {
            return Ok(());
        }
        if is_blank(self.server_url.as_ref()) {
            return Err(ValidationError::ServerUrlRequired);
        }
        if is_blank(self.token.as_ref()) {
            return Err(ValidationError::TokenRequired);
        }
        Ok(())
    }

    /// Drop fields the selected role does not use.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if !self.role.is_worker() {
            self.server_url = None;
        }
        self
    }

    #[must_use]
    pub fn is_tls(&self) -> bool {
        self.ssl_certfile.is_some() && self.ssl_keyfile.is_some()
    }

    /// Port the server listens on and whether it serves TLS.
    ///
    /// An unset or zero port means the scheme default (443 with TLS, else 80).
    #[must_use]
    pub fn effective_port(&self) -> (u16, bool) {
        let tls = self.is_tls();
        let port = match self.port {
            Some(port) if port != 0 => port,
            _ if tls => DEFAULT_HTTPS_PORT,
            _ => DEFAULT_HTTP_PORT,
        };
        (port, tls)
    }
}

impl ValidationError {
    /// Translatable form of this error.
    #[must_use]
    pub fn message(self) -> LocalizedString {
        LocalizedString::new(CONFIG_CONTEXT, self.to_string())
    }

    /// Notice shown to the user; `error` is the already-translated message.
    #[must_use]
    pub fn notice(origin: NoticeOrigin, error: impl Into<String>) -> Notice {
        let (context, title) = match origin {
            NoticeOrigin::StatusMenu => (CONFIG_CONTEXT, "Configuration Error"),
            NoticeOrigin::Dialog => (DIALOG_CONTEXT, "Validation failed"),
        };
        Notice {
            title: LocalizedString::new(context, title),
            body: LocalizedString::new(context, "{error}").with_param("error", error),
        }
    }
}

impl FieldHints {
    #[must_use]
    pub fn for_role(role: ServerRole) -> Self {
        let required = LocalizedString::new(PAGE_CONTEXT, "Required");
        let worker = role.is_worker();
        Self {
            server_url_enabled: worker,
            port_enabled: !worker,
            server_url_placeholder: worker.then(|| required.clone()),
            token_placeholder: if worker {
                required
            } else {
                LocalizedString::new(PAGE_CONTEXT, "Optional")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker(server_url: Option<&str>, token: Option<&str>) -> GeneralConfig {
        GeneralConfig {
            role: ServerRole::Worker,
            server_url: server_url.map(str::to_string),
            token: token.map(str::to_string),
            ..GeneralConfig::default()
        }
    }

    #[test]
    fn should_accept_server_roles_without_fields() {
        assert!(GeneralConfig::default().validate().is_ok());
        let config = GeneralConfig {
            role: ServerRole::ServerOnly,
            ..GeneralConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_require_server_url_first_for_worker() {
        assert_eq!(
            worker(None, None).validate(),
            Err(ValidationError::ServerUrlRequired)
        );
        assert_eq!(
            worker(Some("   "), Some("t")).validate(),
            Err(ValidationError::ServerUrlRequired)
        );
    }

    #[test]
    fn should_require_token_for_worker() {
        assert_eq!(
            worker(Some("http://10.0.0.1"), Some(" ")).validate(),
            Err(ValidationError::TokenRequired)
        );
    }

    #[test]
    fn should_accept_complete_worker() {
        assert!(worker(Some("http://10.0.0.1"), Some("secret")).validate().is_ok());
    }

    #[test]
    fn should_clear_server_url_when_not_worker() {
        let mut config = worker(Some("http://10.0.0.1"), Some("secret"));
        config.role = ServerRole::All;
        let normalized = config.normalized();
        assert!(normalized.server_url.is_none());
        assert_eq!(normalized.token.as_deref(), Some("secret"));
    }

    #[test]
    fn should_default_port_by_scheme() {
        let mut config = GeneralConfig::default();
        assert_eq!(config.effective_port(), (80, false));
        config.port = Some(0);
        assert_eq!(config.effective_port(), (80, false));
        config.ssl_certfile = Some("cert.pem".to_string());
        config.ssl_keyfile = Some("key.pem".to_string());
        assert_eq!(config.effective_port(), (443, true));
        config.port = Some(8443);
        assert_eq!(config.effective_port(), (8443, true));
    }

    #[test]
    fn should_need_both_tls_files() {
        let config = GeneralConfig {
            ssl_certfile: Some("cert.pem".to_string()),
            ..GeneralConfig::default()
        };
        assert_eq!(config.effective_port(), (80, false));
    }

    #[test]
    fn should_use_source_text_as_message_key() {
        let msg = ValidationError::TokenRequired.message();
        assert_eq!(msg.context, "GPUStackConfig");
        assert_eq!(msg.source, "Token is required when running as Worker");
    }

    #[test]
    fn should_title_notice_by_origin() {
        let menu = ValidationError::notice(NoticeOrigin::StatusMenu, "boom");
        assert_eq!(menu.title.source, "Configuration Error");
        assert_eq!(menu.body.render_source(), "boom");

        let dialog = ValidationError::notice(NoticeOrigin::Dialog, "boom");
        assert_eq!(dialog.title.context, "QuickConfig");
        assert_eq!(dialog.title.source, "Validation failed");
    }

    #[test]
    fn should_hint_fields_for_worker() {
        let hints = FieldHints::for_role(ServerRole::Worker);
        assert!(hints.server_url_enabled);
        assert!(!hints.port_enabled);
        assert_eq!(hints.token_placeholder.source, "Required");
        assert_eq!(
            hints.server_url_placeholder.map(|p| p.source),
            Some("Required".to_string())
        );
    }

    #[test]
    fn should_hint_fields_for_server() {
        let hints = FieldHints::for_role(ServerRole::All);
        assert!(!hints.server_url_enabled);
        assert!(hints.port_enabled);
        assert_eq!(hints.token_placeholder.source, "Optional");
        assert!(hints.server_url_placeholder.is_none());
    }

    #[test]
    fn should_deserialize_with_defaults() {
        let config: GeneralConfig =
            serde_json::from_str(r#"{"role":"worker","token":"t"}"#).unwrap();
        assert_eq!(config.role, ServerRole::Worker);
        assert_eq!(config.token.as_deref(), Some("t"));
        assert!(config.port.is_none());
    }
}
