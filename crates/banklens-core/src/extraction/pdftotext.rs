use crate::error::BankLensError;
use crate::extraction::TextSource;
use std::io::Write;
use std::process::Command;

/// Text backend using pdftotext (from poppler-utils).
///
/// `-layout` keeps the column alignment of statement tables, which the
/// account-code extractor relies on to keep a code and its amount on one line.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSource for PdftotextExtractor {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, BankLensError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| BankLensError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| BankLensError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg("-enc")
            .arg("UTF-8")
            .arg(tmpfile.path())
            .arg("-")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BankLensError::PdftotextNotFound
                } else {
                    BankLensError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(BankLensError::PdftotextFailed { code, stderr });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::info!(
            backend = self.backend_name(),
            pages = text.split('\x0c').filter(|p| !p.trim().is_empty()).count(),
            chars = text.chars().count(),
            "extracted text"
        );
        Ok(text)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}
