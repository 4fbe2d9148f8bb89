pub mod chunker;
mod docx;
mod pdf;
mod txt;

use std::path::Path;

use docqa_core::Segment;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported file type: '{0}' (expected .pdf, .docx or .txt)")]
    UnsupportedFormat(String),
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("DOCX extraction failed: {0}")]
    Docx(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The closed set of formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Text,
}

/// Filename suffix → format. Matching is case-sensitive.
const FORMATS: &[(&str, DocumentFormat)] = &[
    (".pdf", DocumentFormat::Pdf),
    (".docx", DocumentFormat::Docx),
    (".txt", DocumentFormat::Text),
];

impl DocumentFormat {
    pub fn from_filename(filename: &str) -> Result<Self, LoadError> {
        FORMATS
            .iter()
            .find(|(suffix, _)| filename.ends_with(suffix))
            .map(|(_, format)| *format)
            .ok_or_else(|| {
                let ext = filename.rsplit_once('.').map_or("", |(_, ext)| ext);
                LoadError::UnsupportedFormat(ext.to_string())
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Text => "txt",
        }
    }

    /// Extract `(page, text)` pairs from raw file bytes.
    fn extract(&self, bytes: &[u8]) -> Result<Vec<(Option<usize>, String)>, LoadError> {
        match self {
            DocumentFormat::Pdf => pdf::extract_pdf(bytes),
            DocumentFormat::Docx => docx::extract_docx(bytes),
            DocumentFormat::Text => txt::extract_txt(bytes),
        }
    }
}

/// Load a file from disk into segments. The format is chosen from the path's
/// filename; the file must already exist (see `staging` for uploads).
pub fn load(path: &Path) -> Result<Vec<Segment>, LoadError> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let format = DocumentFormat::from_filename(&filename)?;
    let bytes = std::fs::read(path)?;
    load_bytes(&bytes, &filename, format)
}

/// Turn already-read bytes into segments attributed to `source`.
pub fn load_bytes(
    bytes: &[u8],
    source: &str,
    format: DocumentFormat,
) -> Result<Vec<Segment>, LoadError> {
    let segments: Vec<Segment> = format
        .extract(bytes)?
        .into_iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(page, text)| Segment {
            source: source.to_string(),
            page,
            text,
        })
        .collect();

    if segments.is_empty() {
        warn!(source, format = format.as_str(), "no extractable text");
    } else {
        info!(
            source,
            format = format.as_str(),
            segments = segments.len(),
            chars = segments.iter().map(|s| s.text.chars().count()).sum::<usize>(),
            "loaded document"
        );
    }
    Ok(segments)
}
