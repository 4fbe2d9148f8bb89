use serde::{Deserialize, Serialize};

/// A file handed to the pipeline: declared name plus raw bytes.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// A unit of loaded text with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Filename of the upload this text came from.
    pub source: String,
    /// 1-based page number (PDF pages). `None` for formats without pages.
    pub page: Option<usize>,
    pub text: String,
}

/// A bounded window of segment text used as the retrieval unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// 0-based position within the upload batch.
    pub index: usize,
    pub content: String,
    pub source: String,
    pub page: Option<usize>,
    /// Character offset of the chunk inside its parent segment.
    pub char_offset: usize,
}

impl Chunk {
    /// Length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Human-readable provenance, e.g. `report.pdf p.3`.
    pub fn citation(&self) -> String {
        match self.page {
            Some(page) => format!("{} p.{}", self.source, page),
            None => self.source.clone(),
        }
    }
}
