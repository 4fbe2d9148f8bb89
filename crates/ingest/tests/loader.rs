//! Loading real files of every supported format through the public API.

use std::io::{Cursor, Write};

use docqa_core::Upload;
use docqa_ingest::{chunk_segments, load_upload, ChunkConfig, LoadError};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// PDF with one page per entry, each holding one line of Courier text.
fn pdf_bytes(lines: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for line in lines {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

#[test]
fn pdf_docx_and_txt_all_yield_segments() {
    let uploads = vec![
        Upload::new("brochure.pdf", pdf_bytes(&["Hello from the brochure"])),
        Upload::new("minutes.docx", docx_bytes(&["Meeting opened.", "Budget approved."])),
        Upload::new("facts.txt", "The capital of France is Paris."),
    ];

    let mut all = Vec::new();
    for upload in &uploads {
        let segments = load_upload(upload).unwrap();
        assert!(!segments.is_empty(), "{} produced no segments", upload.name);
        assert!(segments.iter().all(|s| s.source == upload.name));
        all.extend(segments);
    }

    let pdf = &all[0];
    assert_eq!(pdf.page, Some(1));
    assert!(pdf.text.contains("Hello"), "pdf text was {:?}", pdf.text);

    let docx = all.iter().find(|s| s.source == "minutes.docx").unwrap();
    assert_eq!(docx.text, "Meeting opened.\n\nBudget approved.");
    assert_eq!(docx.page, None);

    let chunks = chunk_segments(&all, &ChunkConfig::default());
    assert!(chunks.len() >= 3);
    assert!(chunks.iter().any(|c| c.content.contains("Paris")));
}

#[test]
fn pdf_pages_become_separate_numbered_segments() {
    let upload = Upload::new(
        "report.pdf",
        pdf_bytes(&["First page text", "Second page text", "Third page"]),
    );
    let segments = load_upload(&upload).unwrap();

    let pages: Vec<Option<usize>> = segments.iter().map(|s| s.page).collect();
    assert_eq!(pages, vec![Some(1), Some(2), Some(3)]);
    assert!(segments[0].text.contains("First page text"));
    assert!(!segments[0].text.contains("Second"), "pages glued: {:?}", segments[0].text);
    assert!(segments[1].text.contains("Second page text"));
    assert!(segments[2].text.contains("Third page"));

    let chunks = chunk_segments(&segments, &ChunkConfig::default());
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[2].page, Some(3));
}

#[test]
fn unsupported_upload_is_rejected_and_others_unaffected() {
    let exe = Upload::new("installer.exe", b"MZ\x90\x00".to_vec());
    assert!(matches!(load_upload(&exe), Err(LoadError::UnsupportedFormat(ext)) if ext == "exe"));

    let txt = Upload::new("still-fine.txt", "Still loads.");
    assert_eq!(load_upload(&txt).unwrap()[0].text, "Still loads.");
}
