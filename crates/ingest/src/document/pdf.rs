use super::LoadError;

/// One entry per non-empty page, numbered from 1.
pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<(Option<usize>, String)>, LoadError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| LoadError::Pdf(e.to_string()))?;
    let total = pages.len();

    let pages: Vec<_> = pages
        .into_iter()
        .enumerate()
        .filter_map(|(i, text)| {
            let text = text.trim();
            (!text.is_empty()).then(|| (Some(i + 1), text.to_string()))
        })
        .collect();

    if pages.is_empty() {
        // Scanned/image PDF without a text layer.
        tracing::warn!(pages = total, "PDF has no text layer; nothing to index");
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_an_error() {
        let err = extract_pdf(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, LoadError::Pdf(_)));
    }
}
