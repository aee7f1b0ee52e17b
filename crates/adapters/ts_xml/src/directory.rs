//! A directory of `.ts` files as a [`TranslationSource`].

use std::path::{Path, PathBuf};

use svctray_app::ports::TranslationSource;
use svctray_domain::catalog::TranslationTable;
use svctray_domain::error::HelperError;
use svctray_domain::locale::Locale;

use crate::error::TsError;
use crate::parser::parse;
use crate::writer::to_string;

const EXTENSION: &str = "ts";

/// Read and parse one `.ts` file.
///
/// # Errors
///
/// Returns [`TsError::File`] wrapping the IO or parse failure.
pub async fn read_file(path: &Path) -> Result<TranslationTable, TsError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TsError::Io {
            path: path.to_path_buf(),
            source,
        })
        .map_err(|err| err.in_file(path))?;
    parse(&content).map_err(|err| err.in_file(path))
}

/// Write `table` to `path` in `lupdate` layout.
///
/// # Errors
///
/// Returns [`TsError::Io`] when the file cannot be written.
pub async fn write_file(path: &Path, table: &TranslationTable) -> Result<(), TsError> {
    tokio::fs::write(path, to_string(table))
        .await
        .map_err(|source| TsError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Loads every `*.ts` file found directly inside a directory.
#[derive(Debug, Clone)]
pub struct DirectoryTranslationSource {
    dir: PathBuf,
}

impl DirectoryTranslationSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths of the `.ts` files, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`TsError::Io`] when the directory cannot be listed.
    pub async fn files(&self) -> Result<Vec<PathBuf>, TsError> {
        let io_error = |source| TsError::Io {
            path: self.dir.clone(),
            source,
        };
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(io_error)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Load every table, in file name order.
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be read or parsed.
    pub async fn load(&self) -> Result<Vec<TranslationTable>, TsError> {
        let mut tables = Vec::new();
        for path in self.files().await? {
            let table = read_file(&path).await?;
            warn_on_name_mismatch(&path, &table);
            tables.push(table);
        }
        tracing::info!(dir = %self.dir.display(), count = tables.len(), "translations loaded");
        Ok(tables)
    }
}

/// The `language` attribute wins over the file name.
fn warn_on_name_mismatch(path: &Path, table: &TranslationTable) {
    let named = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| Locale::parse(stem).ok());
    if let Some(named) = named
        && named != table.language
    {
        tracing::warn!(
            file = %path.display(),
            language = %table.language,
            "file name does not match the table language"
        );
    }
}

impl TranslationSource for DirectoryTranslationSource {
    async fn load_all(&self) -> Result<Vec<TranslationTable>, HelperError> {
        Ok(self.load().await?)
    }
}
