//! Errors raised while reading or writing `.ts` files.

use std::path::PathBuf;

use svctray_domain::error::HelperError;
use svctray_domain::locale::LocaleError;

#[derive(Debug, thiserror::Error)]
pub enum TsError {
    /// The document is not well-formed XML.
    #[error("malformed XML")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("<{element}> is missing the {attribute:?} attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// The document ended inside an element, or had no `<TS>` root.
    #[error("unexpected end of document inside <{0}>")]
    UnexpectedEof(&'static str),

    #[error("invalid line number {0:?}")]
    InvalidLine(String),

    #[error("invalid language")]
    Locale(#[from] LocaleError),

    #[error("cannot access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any of the above, tagged with the file it came from.
    #[error("cannot load {}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<TsError>,
    },
}

impl TsError {
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Self::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

impl From<TsError> for HelperError {
    fn from(err: TsError) -> Self {
        Self::Source(Box::new(err))
    }
}
