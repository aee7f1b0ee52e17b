//! # svctray-adapter-ts
//!
//! Qt Linguist `.ts` files as translation tables.
//!
//! ## Responsibilities
//! - Parse a `.ts` document into a [`TranslationTable`](svctray_domain::catalog::TranslationTable)
//! - Write a table back in the layout `lupdate` produces, so regenerated
//!   files diff cleanly
//! - Implement the `TranslationSource` port over a directory of `.ts` files
//!
//! ## Dependency rule
//! Depends on `svctray-app` (for port traits) and `svctray-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod directory;
pub mod error;
pub mod parser;
pub mod writer;

pub use directory::{DirectoryTranslationSource, read_file, write_file};
pub use error::TsError;
pub use parser::{Document, parse, parse_document};
pub use writer::to_string;
