//! Resume ingestion: turns an uploaded PDF, DOCX or plain-text file into text.

use bytes::Bytes;
use thiserror::Error;

mod docx;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file type '{0}'. Upload a .pdf, .docx or .txt resume.")]
    UnsupportedType(String),

    #[error("The uploaded resume contains no readable text.")]
    Empty,

    #[error("Could not read the resume: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    /// Picks the decoder from the file extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, IngestError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::Text),
            _ => Err(IngestError::UnsupportedType(filename.to_string())),
        }
    }
}

/// Extracts the plain text of an uploaded resume.
///
/// PDF parsing runs on the blocking pool; a parser panic surfaces as `Parse`.
pub async fn extract_text(filename: &str, bytes: Bytes) -> Result<String, IngestError> {
    let kind = DocumentKind::from_filename(filename)?;
    let text = match kind {
        DocumentKind::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes)
        })
        .await
        .map_err(|e| IngestError::Parse(format!("PDF parser aborted: {e}")))?
        .map_err(|e| IngestError::Parse(format!("PDF extraction error: {e}")))?,
        DocumentKind::Docx => docx::extract_text(&bytes)?,
        DocumentKind::Text => String::from_utf8_lossy(&bytes)
            .trim_start_matches('\u{feff}')
            .to_string(),
    };

    if text.trim().is_empty() {
        return Err(IngestError::Empty);
    }
    tracing::debug!(filename, kind = ?kind, chars = text.len(), "resume text extracted");
    Ok(text)
}
