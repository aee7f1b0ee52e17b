//! Localized strings — a message key plus the parameters to render it with.

use serde::{Deserialize, Serialize};

use crate::template;

/// Identifies a message: the context it belongs to, its source text and
/// the disambiguation comment, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageKey {
    pub context: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl MessageKey {
    #[must_use]
    pub fn new(context: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
            comment: None,
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{:?}", self.context, self.source)?;
        if let Some(comment) = &self.comment {
            write!(f, " ({comment})")?;
        }
        Ok(())
    }
}

/// A translatable message resolved against a translation table at display time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedString {
    pub context: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<(String, String)>,
}

impl LocalizedString {
    #[must_use]
    pub fn new(context: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
            params: Vec::new(),
        }
    }

    /// Attach a parameter, replacing any earlier value with the same name.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    #[must_use]
    pub fn key(&self) -> MessageKey {
        MessageKey::new(self.context.clone(), self.source.clone())
    }

    /// Render `translated` (or the source text) with this string's parameters.
    #[must_use]
    pub fn render_with(&self, translated: Option<&str>) -> String {
        template::render(translated.unwrap_or(&self.source), &self.params)
    }

    /// Render against the source language only.
    #[must_use]
    pub fn render_source(&self) -> String {
        self.render_with(None)
    }
}
