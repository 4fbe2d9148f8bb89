use super::LoadError;

pub fn extract_txt(bytes: &[u8]) -> Result<Vec<(Option<usize>, String)>, LoadError> {
    // Try UTF-8 first, fall back to lossy conversion
    let text = String::from_utf8(bytes.to_vec())
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned());

    Ok(vec![(None, text.trim().to_string())])
}
