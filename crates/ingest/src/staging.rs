//! Scratch storage for uploads: every upload is written to its own fresh
//! temporary directory before loading, and the directory is removed when the
//! [`StagedFile`] is dropped.

use std::path::{Path, PathBuf};

use docqa_core::{Segment, Upload};
use tempfile::TempDir;
use tracing::debug;

use crate::document::{self, DocumentFormat, LoadError};

/// An upload written to scratch storage.
#[derive(Debug)]
pub struct StagedFile {
    dir: TempDir,
    path: PathBuf,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the scratch directory now, reporting failures instead of
    /// swallowing them as `Drop` would.
    pub fn cleanup(self) -> std::io::Result<()> {
        self.dir.close()
    }
}

/// Write an upload's bytes to a fresh temp directory, keeping only the final
/// component of its declared name.
pub fn stage_upload(upload: &Upload) -> std::io::Result<StagedFile> {
    let filename = Path::new(&upload.name)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "upload".into());
    let dir = tempfile::Builder::new().prefix("docqa-upload-").tempdir()?;
    let path = dir.path().join(filename);
    std::fs::write(&path, &upload.bytes)?;
    debug!(path = %path.display(), bytes = upload.bytes.len(), "staged upload");
    Ok(StagedFile { dir, path })
}

/// Stage, load and clean up a single upload. Unsupported formats are
/// rejected before anything touches the disk.
pub fn load_upload(upload: &Upload) -> Result<Vec<Segment>, LoadError> {
    DocumentFormat::from_filename(&upload.name)?;
    let staged = stage_upload(upload)?;
    let segments = document::load(staged.path());
    if let Err(e) = staged.cleanup() {
        tracing::warn!(upload = %upload.name, error = %e, "failed to remove scratch directory");
    }
    segments
}
