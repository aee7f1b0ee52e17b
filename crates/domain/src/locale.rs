//! Locale identifiers (`en_US`, `zh_CN`, …).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A normalized `language[_REGION]` identifier.
///
/// The language subtag is lowercase, the region uppercase, joined by `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

/// A tag that cannot be read as a locale.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid locale tag {0:?}")]
pub struct LocaleError(pub String);

impl Locale {
    /// Parse a locale from any common spelling: `zh-CN`, `zh_CN.UTF-8`,
    /// `en-us`, `zh_CN@calendar=gregorian`, `de`.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError`] when no alphabetic language subtag of two or
    /// three letters is present.
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        let trimmed = tag.trim();
        let base = trimmed
            .split(['.', '@'])
            .next()
            .unwrap_or_default();
        let mut parts = base.split(['_', '-']);
        let language = parts.next().unwrap_or_default();
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(LocaleError(tag.to_string()));
        }
        let mut normalized = language.to_ascii_lowercase();
        // Script subtags (`zh-Hans-CN`) are four letters; skip to the region.
        let region = parts.find(|p| p.len() != 4);
        if let Some(region) = region {
            if region.is_empty() || !region.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(LocaleError(tag.to_string()));
            }
            normalized.push('_');
            normalized.push_str(&region.to_ascii_uppercase());
        }
        Ok(Self(normalized))
    }

    /// `en_US` for the source language of the message tables.
    #[must_use]
    pub fn source() -> Self {
        Self("en_US".to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The language subtag (`zh` for `zh_CN`).
    #[must_use]
    pub fn language(&self) -> &str {
        self.0.split('_').next().unwrap_or(&self.0)
    }

    /// The region subtag, if any.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.0.split_once('_').map(|(_, region)| region)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

/// Parse a comma/colon separated preference list (`LANGUAGE` style), skipping
/// entries that are not locales (`C`, `POSIX`, empty).
#[must_use]
pub fn parse_preference_list(raw: &str) -> Vec<Locale> {
    raw.split([',', ':'])
        .filter_map(|tag| Locale::parse(tag).ok())
        .collect()
}
