//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `svctray.toml` in the working directory unless another path is
//! given. Every field has a default so the file is optional. Environment
//! variables take precedence over file values, and command-line flags over
//! both.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use svctray_domain::locale::{Locale, parse_preference_list};

/// Default config file name, resolved against the working directory.
pub const DEFAULT_PATH: &str = "svctray.toml";

/// Variables consulted, in order, for the system locale.
const SYSTEM_LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub translations: TranslationsConfig,
    pub locale: LocaleConfig,
    pub logging: LoggingConfig,
}

/// Where the `.ts` files live.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TranslationsConfig {
    pub dir: PathBuf,
}

/// Display language preferences.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Most preferred first. Empty means "follow the system locale".
    pub preferred: Vec<Locale>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Values given on the command line; they win over the file and the
/// environment.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub translations: Option<PathBuf>,
    /// Comma or colon separated locale list.
    pub locale: Option<String>,
}

impl Config {
    /// Load configuration from `path` (or `svctray.toml`) if present, apply
    /// environment-variable overrides then `cli`, and validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is malformed, or the result
    /// fails validation.
    pub fn load(path: Option<&Path>, cli: CliOverrides) -> Result<Self, ConfigError> {
        Self::from_file(path.unwrap_or_else(|| Path::new(DEFAULT_PATH)))?
            .resolve(|key| std::env::var(key).ok(), cli)
    }

    fn resolve(
        mut self,
        var: impl Fn(&str) -> Option<String>,
        cli: CliOverrides,
    ) -> Result<Self, ConfigError> {
        self.apply_overrides(var);
        if let Some(dir) = cli.translations {
            self.translations.dir = dir;
        }
        if let Some(list) = cli.locale.as_deref() {
            self.set_preferred(list);
        }
        self.validate()?;
        Ok(self)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply overrides read through `var` (the process environment outside
    /// tests).
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("SVCTRAY_TRANSLATIONS") {
            self.translations.dir = PathBuf::from(val);
        }
        if let Some(val) = var("SVCTRAY_LOCALE") {
            self.set_preferred(&val);
        }
        if self.locale.preferred.is_empty() {
            let system = SYSTEM_LOCALE_VARS
                .iter()
                .filter_map(|key| var(key))
                .find(|val| !val.trim().is_empty());
            if let Some(val) = system {
                self.set_preferred(&val);
            }
        }
        if let Some(val) = var("SVCTRAY_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    /// Replace the preferred locales with a comma or colon separated list.
    /// Entries that are not locales (`C`, `POSIX`) are dropped.
    fn set_preferred(&mut self, list: &str) {
        self.locale.preferred = parse_preference_list(list);
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.translations.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "translations directory must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Preferred locales, falling back to the source language.
    #[must_use]
    pub fn preferred_locales(&self) -> Vec<Locale> {
        if self.locale.preferred.is_empty() {
            vec![Locale::source()]
        } else {
            self.locale.preferred.clone()
        }
    }
}

impl Default for TranslationsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("translations"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "svctray=info,svctray_app=info,svctray_adapter_ts=warn".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn tags(config: &Config) -> Vec<&str> {
        config.locale.preferred.iter().map(Locale::as_str).collect()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.translations.dir, PathBuf::from("translations"));
        assert!(config.locale.preferred.is_empty());
        assert_eq!(config.preferred_locales(), vec![Locale::source()]);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.translations.dir, PathBuf::from("translations"));
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [translations]
            dir = '/usr/share/svctray'

            [locale]
            preferred = ['zh-CN', 'en_US.UTF-8']

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.translations.dir, PathBuf::from("/usr/share/svctray"));
        assert_eq!(tags(&config), vec!["zh_CN", "en_US"]);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_report_parse_error_for_invalid_locale() {
        let result: Result<Config, _> = toml::from_str("[locale]\npreferred = ['1234']");
        assert!(result.is_err());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent.toml")).unwrap();
        assert_eq!(config.translations.dir, PathBuf::from("translations"));
    }

    #[test]
    fn should_override_from_environment() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("SVCTRAY_TRANSLATIONS", "/opt/ts"),
            ("SVCTRAY_LOCALE", "zh_CN,en_US"),
            ("SVCTRAY_LOG", "svctray=debug"),
        ]));
        assert_eq!(config.translations.dir, PathBuf::from("/opt/ts"));
        assert_eq!(tags(&config), vec!["zh_CN", "en_US"]);
        assert_eq!(config.logging.filter, "svctray=debug");
    }

    #[test]
    fn should_prefer_rust_log_over_svctray_log() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("SVCTRAY_LOG", "info"), ("RUST_LOG", "trace")]));
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_follow_system_locale_when_none_configured() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("LC_ALL", ""), ("LANG", "zh_CN.UTF-8")]));
        assert_eq!(tags(&config), vec!["zh_CN"]);
    }

    #[test]
    fn should_keep_configured_locale_over_system_locale() {
        let mut config: Config = toml::from_str("[locale]\npreferred = ['en_US']").unwrap();
        config.apply_overrides(env(&[("LANG", "zh_CN.UTF-8")]));
        assert_eq!(tags(&config), vec!["en_US"]);
    }

    #[test]
    fn should_fall_back_to_source_for_posix_locale() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("LANG", "C")]));
        assert_eq!(config.preferred_locales(), vec![Locale::source()]);
    }

    #[test]
    fn should_reject_empty_translations_dir() {
        let mut config = Config::default();
        config.translations.dir = PathBuf::new();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_let_command_line_win_over_environment() {
        let cli = CliOverrides {
            translations: Some(PathBuf::from("/srv/ts")),
            locale: Some("en_US".to_string()),
        };
        let config = Config::default()
            .resolve(env(&[("SVCTRAY_TRANSLATIONS", "/opt/ts"), ("SVCTRAY_LOCALE", "zh_CN")]), cli)
            .unwrap();
        assert_eq!(config.translations.dir, PathBuf::from("/srv/ts"));
        assert_eq!(tags(&config), vec!["en_US"]);
    }

    #[test]
    fn should_validate_command_line_translations_dir() {
        let cli = CliOverrides {
            translations: Some(PathBuf::new()),
            ..CliOverrides::default()
        };
        let result = Config::default().resolve(env(&[]), cli);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
