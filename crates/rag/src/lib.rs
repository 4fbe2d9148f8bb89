pub mod index;
pub mod language;
pub mod retriever;
pub mod session;

pub use index::{IndexBuildError, ScoredChunk, SearchError, VectorIndex};
pub use language::AnswerLanguage;
pub use retriever::{RetrievedSet, Retriever};
pub use session::{Answer, IngestReport, Query, RejectedUpload, Session, SessionError, SessionOptions};

#[cfg(test)]
pub(crate) mod test_support;
