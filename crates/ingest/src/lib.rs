pub mod document;
pub mod embedding;
pub mod staging;

pub use document::chunker::{chunk_segments, ChunkConfig};
pub use document::{load, DocumentFormat, LoadError};
pub use embedding::{build_embedder, Embedder, EmbeddingError};
pub use staging::{load_upload, stage_upload, StagedFile};
