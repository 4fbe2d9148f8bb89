use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::LoadError;

/// The main document part inside the OOXML zip container.
const DOCUMENT_PART: &str = "word/document.xml";

/// Extract body text from a .docx file as a single unpaged entry.
/// Paragraphs are separated by blank lines; tabs and line breaks are kept.
pub fn extract_docx(bytes: &[u8]) -> Result<Vec<(Option<usize>, String)>, LoadError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| LoadError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| LoadError::Docx(format!("{DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)?;

    let text = document_xml_to_text(&xml)?;
    Ok(vec![(None, text.trim().to_string())])
}

fn document_xml_to_text(xml: &str) -> Result<String, LoadError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_run_text = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push_str("\n\n"),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                b"p" => text.push_str("\n\n"),
                _ => {}
            },
            Ok(Event::Text(t)) if in_run_text => {
                let unescaped = t.unescape().map_err(|e| LoadError::Docx(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(LoadError::Docx(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCUMENT_PART, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn paragraphs_in_order() {
        let bytes = docx_with_body(
            "<w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Second </w:t></w:r><w:r><w:t>paragraph.</w:t></w:r></w:p>",
        );
        let pages = extract_docx(&bytes).unwrap();
        assert_eq!(pages, vec![(None, "First paragraph.\n\nSecond paragraph.".to_string())]);
    }

    #[test]
    fn tabs_breaks_and_entities() {
        let bytes = docx_with_body(
            "<w:p><w:r><w:t>A</w:t><w:tab/><w:t>B</w:t><w:br/><w:t>Fish &amp; chips</w:t></w:r></w:p>",
        );
        let pages = extract_docx(&bytes).unwrap();
        assert_eq!(pages[0].1, "A\tB\nFish & chips");
    }

    #[test]
    fn ignores_text_outside_runs() {
        let bytes = docx_with_body(
            "<w:p><w:pPr><w:pStyle w:val=\"Heading1\"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>",
        );
        let pages = extract_docx(&bytes).unwrap();
        assert_eq!(pages[0].1, "Title");
    }

    #[test]
    fn not_a_zip_is_an_error() {
        let err = extract_docx(b"plain text pretending").unwrap_err();
        assert!(matches!(err, LoadError::Docx(_)));
    }

    #[test]
    fn zip_without_document_part_is_an_error() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract_docx(&bytes).unwrap_err();
        assert!(matches!(err, LoadError::Docx(msg) if msg.contains(DOCUMENT_PART)));
    }
}
