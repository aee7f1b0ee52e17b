//! `.ts` document reader.
//!
//! Everything `lupdate` writes for a message is kept: locations, source and
//! old source, the three kinds of comment, plural forms and the translation
//! itself. Anything else is skipped and listed in [`Document::skipped`], so a
//! caller about to rewrite the file can tell it would lose content.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use svctray_domain::catalog::{
    Context, LineRef, Location, Message, TS_VERSION, Translation, TranslationStatus,
    TranslationTable,
};
use svctray_domain::locale::Locale;

use crate::error::TsError;

/// Element whose text is being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Source,
    OldSource,
    Comment,
    OldComment,
    ExtraComment,
    TranslatorComment,
    Translation,
    NumerusForm,
}

impl Field {
    fn of(name: &[u8]) -> Option<Self> {
        Some(match name {
            b"name" => Self::Name,
            b"source" => Self::Source,
            b"oldsource" => Self::OldSource,
            b"comment" => Self::Comment,
            b"oldcomment" => Self::OldComment,
            b"extracomment" => Self::ExtraComment,
            b"translatorcomment" => Self::TranslatorComment,
            b"translation" => Self::Translation,
            b"numerusform" => Self::NumerusForm,
            _ => return None,
        })
    }
}

/// A parsed `.ts` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub table: TranslationTable,
    /// Elements (`name`) and attributes (`element@name`) the table cannot
    /// hold, once each, in document order. Empty when writing the table back
    /// loses nothing.
    pub skipped: Vec<String>,
}

impl Document {
    #[must_use]
    pub fn is_lossless(&self) -> bool {
        self.skipped.is_empty()
    }
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, TsError> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn location(element: &BytesStart<'_>) -> Result<Location, TsError> {
    let filename = attribute(element, b"filename")?;
    let line = attribute(element, b"line")?
        .map(|raw| LineRef::parse(&raw).ok_or(TsError::InvalidLine(raw)))
        .transpose()?;
    Ok(Location { filename, line })
}

fn translation_status(element: &BytesStart<'_>) -> Result<TranslationStatus, TsError> {
    Ok(attribute(element, b"type")?
        .as_deref()
        .and_then(TranslationStatus::from_attr)
        .unwrap_or_default())
}

fn header(element: &BytesStart<'_>) -> Result<TranslationTable, TsError> {
    let language = attribute(element, b"language")?.ok_or(TsError::MissingAttribute {
        element: "TS",
        attribute: "language",
    })?;
    let mut table = TranslationTable::new(Locale::parse(&language)?);
    table.version = attribute(element, b"version")?.unwrap_or_else(|| TS_VERSION.to_string());
    table.source_language = attribute(element, b"sourcelanguage")?;
    Ok(table)
}

const TS_ATTRIBUTES: &[&[u8]] = &[b"version", b"language", b"sourcelanguage"];
const MESSAGE_ATTRIBUTES: &[&[u8]] = &[b"numerus"];
const LOCATION_ATTRIBUTES: &[&[u8]] = &[b"filename", b"line"];
const TRANSLATION_ATTRIBUTES: &[&[u8]] = &[b"type"];

/// Attributes each kept element may carry.
fn known_attributes(element: &[u8]) -> &'static [&'static [u8]] {
    match element {
        b"TS" => TS_ATTRIBUTES,
        b"message" => MESSAGE_ATTRIBUTES,
        b"location" => LOCATION_ATTRIBUTES,
        b"translation" => TRANSLATION_ATTRIBUTES,
        _ => &[],
    }
}

/// Reader state while walking the event stream.
#[derive(Debug, Default)]
struct Builder {
    table: Option<TranslationTable>,
    context: Option<Context>,
    message: Option<Message>,
    field: Option<Field>,
    text: String,
    skipped: Vec<String>,
}

impl Builder {
    fn skip(&mut self, what: String) {
        if !self.skipped.contains(&what) {
            tracing::debug!(%what, "skipping unsupported content");
            self.skipped.push(what);
        }
    }

    fn check_attributes(&mut self, element: &BytesStart<'_>) -> Result<(), TsError> {
        let name = element.name();
        let known = known_attributes(name.as_ref());
        for attr in element.attributes() {
            let attr = attr?;
            if !known.contains(&attr.key.as_ref()) {
                self.skip(format!(
                    "{}@{}",
                    String::from_utf8_lossy(name.as_ref()),
                    String::from_utf8_lossy(attr.key.as_ref())
                ));
            }
        }
        Ok(())
    }

    fn open(&mut self, element: &BytesStart<'_>, empty: bool) -> Result<(), TsError> {
        let name = element.name();
        match name.as_ref() {
            b"TS" => self.table = Some(header(element)?),
            b"context" => self.context = Some(Context::new(String::new())),
            b"message" => {
                let mut message = Message::new(String::new(), Translation::unfinished());
                message.numerus = attribute(element, b"numerus")?.as_deref() == Some("yes");
                self.message = Some(message);
            }
            b"location" if self.message.is_some() => {
                let location = location(element)?;
                if let Some(message) = self.message.as_mut() {
                    message.locations.push(location);
                }
            }
            b"name" if self.message.is_none() => self.begin_text(Field::Name),
            b"translation" if self.message.is_some() => {
                let status = translation_status(element)?;
                if let Some(message) = self.message.as_mut() {
                    message.translation = Translation {
                        status,
                        ..Translation::default()
                    };
                }
                self.begin_text(Field::Translation);
            }
            other => match Field::of(other) {
                Some(field) if field != Field::Name && self.message.is_some() => {
                    self.begin_text(field);
                }
                _ => self.skip(String::from_utf8_lossy(other).into_owned()),
            },
        }
        self.check_attributes(element)?;
        if empty {
            self.close(name.as_ref())?;
        }
        Ok(())
    }

    fn begin_text(&mut self, field: Field) {
        self.field = Some(field);
        self.text.clear();
    }

    fn push_text(&mut self, text: &str) {
        if self.field.is_some() {
            self.text.push_str(text);
        }
    }

    fn take_text(&mut self, field: Field) -> Option<String> {
        (self.field == Some(field)).then(|| {
            self.field = None;
            std::mem::take(&mut self.text)
        })
    }

    fn close(&mut self, name: &[u8]) -> Result<(), TsError> {
        match name {
            b"message" => {
                let message = self.message.take().ok_or(TsError::UnexpectedEof("message"))?;
                let context = self.context.as_mut().ok_or(TsError::UnexpectedEof("context"))?;
                context.messages.push(message);
            }
            b"context" => {
                let context = self.context.take().ok_or(TsError::UnexpectedEof("context"))?;
                self.table
                    .as_mut()
                    .ok_or(TsError::UnexpectedEof("TS"))?
                    .contexts
                    .push(context);
            }
            b"name" => {
                if let (Some(text), Some(context)) = (self.take_text(Field::Name), self.context.as_mut()) {
                    context.name = text;
                }
            }
            other => {
                let Some(field) = Field::of(other) else {
                    return Ok(());
                };
                if let (Some(text), Some(message)) = (self.take_text(field), self.message.as_mut()) {
                    store(message, field, text);
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Document, TsError> {
        if self.message.is_some() {
            return Err(TsError::UnexpectedEof("message"));
        }
        if self.context.is_some() {
            return Err(TsError::UnexpectedEof("context"));
        }
        let table = self.table.ok_or(TsError::UnexpectedEof("TS"))?;
        Ok(Document {
            table,
            skipped: self.skipped,
        })
    }
}

fn store(message: &mut Message, field: Field, text: String) {
    match field {
        Field::Source => message.source = text,
        Field::OldSource => message.old_source = Some(text),
        Field::Comment => message.comment = Some(text),
        Field::OldComment => message.old_comment = Some(text),
        Field::ExtraComment => message.extra_comment = Some(text),
        Field::TranslatorComment => message.translator_comment = Some(text),
        Field::Translation => message.translation.text = text,
        Field::NumerusForm => message.translation.forms.push(text),
        Field::Name => {}
    }
}

/// Parse a `.ts` document, keeping track of what was skipped.
///
/// Contexts and messages keep their document order. A message without a
/// `<translation>` element is treated as unfinished.
///
/// # Errors
///
/// Returns [`TsError`] when the XML is malformed, the `<TS>` root or its
/// `language` attribute is missing, or a `<location>` carries a bad line
/// number.
pub fn parse_document(input: &str) -> Result<Document, TsError> {
    let mut reader = Reader::from_str(input);
    let mut builder = Builder::default();

    loop {
        match reader.read_event()? {
            Event::Start(element) => builder.open(&element, false)?,
            Event::Empty(element) => builder.open(&element, true)?,
            Event::End(element) => builder.close(element.name().as_ref())?,
            Event::Text(text) => builder.push_text(&text.unescape()?),
            Event::CData(data) => {
                let raw = data.into_inner();
                builder.push_text(&String::from_utf8_lossy(&raw));
            }
            Event::Eof => break,
            Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => {}
        }
    }

    let document = builder.finish()?;
    tracing::debug!(
        locale = %document.table.language,
        messages = document.table.message_count(),
        skipped = document.skipped.len(),
        "translation table parsed"
    );
    Ok(document)
}

/// Parse a `.ts` document into a table.
///
/// Unsupported content is logged at `warn` and left out.
///
/// # Errors
///
/// See [`parse_document`].
pub fn parse(input: &str) -> Result<TranslationTable, TsError> {
    let document = parse_document(input)?;
    if !document.is_lossless() {
        tracing::warn!(
            locale = %document.table.language,
            skipped = ?document.skipped,
            "unsupported .ts content ignored"
        );
    }
    Ok(document.table)
}
