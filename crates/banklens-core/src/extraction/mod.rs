pub mod pdftotext;
pub mod table;
pub mod workbook;

use crate::error::BankLensError;

/// Trait for report-to-text backends.
pub trait TextSource: Send + Sync {
    /// Extract the plain text of a document, pages separated by form feeds.
    fn extract_text(&self, bytes: &[u8]) -> Result<String, BankLensError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
