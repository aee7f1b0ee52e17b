//! Translation tables — the in-memory form of a Qt Linguist `.ts` file.
//!
//! A [`TranslationTable`] holds one locale's messages grouped by
//! [`Context`]. The source text is the lookup key; the order of contexts and
//! messages is kept so a table can be written back unchanged.

mod audit;

pub use audit::{AuditReport, LocaleFindings, PlaceholderMismatch, audit};

use serde::{Deserialize, Serialize};

use crate::locale::Locale;
use crate::message::MessageKey;

/// Format version written by current Qt Linguist tools.
pub const TS_VERSION: &str = "2.1";

/// One locale's translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationTable {
    pub version: String,
    /// The `sourcelanguage` attribute, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    pub language: Locale,
    pub contexts: Vec<Context>,
}

/// Messages belonging to one UI component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    pub messages: Vec<Message>,
}

/// A single source string and its translation.
///
/// Only `source`, `comment` and `translation` take part in lookups. The notes
/// are carried so a table can be written back without losing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    pub source: String,
    /// Source text before the last `lupdate` changed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_source: Option<String>,
    /// Disambiguation comment; two messages may share a source if this differs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_comment: Option<String>,
    /// Note from the developer to translators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_comment: Option<String>,
    /// Note left by a translator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translator_comment: Option<String>,
    /// Plural message: the translation lives in [`Translation::forms`].
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub numerus: bool,
    pub translation: Translation,
}

/// Where a message is referenced in the UI sources.
///
/// Both attributes are optional: `lupdate -locations relative` omits the
/// file name when it repeats and writes lines as offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineRef>,
}

/// Value of a `<location line="..">` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRef {
    /// `line="52"`
    Absolute(u32),
    /// `line="+104"` or `line="-3"`, relative to the previous location.
    Relative(i32),
}

impl LineRef {
    /// Parse an attribute value. A leading sign marks an offset.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.as_bytes().first()? {
            b'+' | b'-' => value.parse().ok().map(Self::Relative),
            _ => value.parse().ok().map(Self::Absolute),
        }
    }
}

impl std::fmt::Display for LineRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absolute(line) => write!(f, "{line}"),
            Self::Relative(offset) => write!(f, "{offset:+}"),
        }
    }
}

/// Translated text and its review status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
    /// `<numerusform>` texts of a plural message, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forms: Vec<String>,
    #[serde(default)]
    pub status: TranslationStatus,
}

/// Value of the `type` attribute on `<translation>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    #[default]
    Finished,
    Unfinished,
    Vanished,
    Obsolete,
}

impl TranslationStatus {
    /// The attribute value, or `None` for finished translations (no attribute).
    #[must_use]
    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Vanished => Some("vanished"),
            Self::Obsolete => Some("obsolete"),
        }
    }

    /// Parse a `type` attribute value; unknown values yield `None`.
    #[must_use]
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "unfinished" => Some(Self::Unfinished),
            "vanished" => Some(Self::Vanished),
            "obsolete" => Some(Self::Obsolete),
            _ => None,
        }
    }
}

impl Translation {
    #[must_use]
    pub fn finished(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn unfinished() -> Self {
        Self {
            status: TranslationStatus::Unfinished,
            ..Self::default()
        }
    }

    /// Text to display, if this translation may be shown at all.
    ///
    /// Only finished, non-empty translations are usable; anything else falls
    /// back to the source string. Plural translations show their first form.
    #[must_use]
    pub fn usable(&self) -> Option<&str> {
        let text = self.forms.first().unwrap_or(&self.text);
        (self.status == TranslationStatus::Finished && !text.is_empty()).then_some(text.as_str())
    }
}

impl Message {
    #[must_use]
    pub fn new(source: impl Into<String>, translation: Translation) -> Self {
        Self {
            locations: Vec::new(),
            source: source.into(),
            old_source: None,
            comment: None,
            old_comment: None,
            extra_comment: None,
            translator_comment: None,
            numerus: false,
            translation,
        }
    }

    #[must_use]
    pub fn with_location(mut self, filename: impl Into<String>, line: u32) -> Self {
        self.locations.push(Location {
            filename: Some(filename.into()),
            line: Some(LineRef::Absolute(line)),
        });
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The audit key: context, source and disambiguation comment.
    #[must_use]
    pub fn key(&self, context: &str) -> MessageKey {
        let key = MessageKey::new(context, self.source.clone());
        match &self.comment {
            Some(comment) => key.with_comment(comment.clone()),
            None => key,
        }
    }
}

impl Context {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

impl TranslationTable {
    #[must_use]
    pub fn new(language: Locale) -> Self {
        Self {
            version: TS_VERSION.to_string(),
            source_language: None,
            language,
            contexts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.contexts.push(context);
        self
    }

    #[must_use]
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|ctx| ctx.name == name)
    }

    /// Find the message for `source` in `context` with the given
    /// disambiguation comment.
    #[must_use]
    pub fn find(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&Message> {
        self.context(context)?
            .messages
            .iter()
            .find(|msg| msg.source == source && msg.comment.as_deref() == comment)
    }

    /// Usable translation for `source`, if any.
    #[must_use]
    pub fn lookup(&self, context: &str, source: &str) -> Option<&str> {
        self.find(context, source, None)?.translation.usable()
    }

    /// Translation of `source`, falling back to `source` itself.
    #[must_use]
    pub fn translate<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        self.lookup(context, source).unwrap_or(source)
    }

    /// Every message key in this table, in document order.
    pub fn keys(&self) -> impl Iterator<Item = MessageKey> + '_ {
        self.contexts
            .iter()
            .flat_map(|ctx| ctx.messages.iter().map(move |msg| msg.key(&ctx.name)))
    }

    /// `(context, source, translation text)` for every message.
    pub fn triples(&self) -> impl Iterator<Item = (&str, &str, &str)> + '_ {
        self.contexts.iter().flat_map(|ctx| {
            ctx.messages.iter().map(move |msg| {
                (
                    ctx.name.as_str(),
                    msg.source.as_str(),
                    msg.translation.text.as_str(),
                )
            })
        })
    }

    #[must_use]
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|ctx| ctx.messages.len()).sum()
    }
}
