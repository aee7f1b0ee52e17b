//! Translation source port — where translation tables come from.

use std::future::Future;

use svctray_domain::catalog::TranslationTable;
use svctray_domain::error::HelperError;

/// Loads every available translation table.
pub trait TranslationSource {
    /// Load all tables, one per locale.
    fn load_all(&self) -> impl Future<Output = Result<Vec<TranslationTable>, HelperError>> + Send;
}
