use std::path::Path;

use anyhow::{Context, Result};
use docqa_core::Upload;

/// Read each file into an upload named after its final path component.
pub fn read_uploads(paths: &[impl AsRef<Path>]) -> Result<Vec<Upload>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .with_context(|| format!("'{}' is not a file path", path.display()))?;
            let bytes =
                std::fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
            Ok(Upload::new(name, bytes))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_come_from_the_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let uploads = read_uploads(&[&path]).unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].name, "notes.txt");
        assert_eq!(uploads[0].bytes, b"hello");
    }

    #[test]
    fn missing_file_is_an_error_with_path() {
        let err = read_uploads(&["/definitely/not/here.pdf"]).unwrap_err();
        assert!(format!("{err:#}").contains("here.pdf"));
    }
}
