// ABOUTME: Integration tests for document ingestion across mixed batches of uploads.
// ABOUTME: Builds a real DOCX in memory and checks that bad files never stop the batch.

use std::io::{Cursor, Write};

use meeting_assistant::documents::{Upload, context, expand_pattern, extract, ingest_paths, ingest_patterns};
use meeting_assistant::session::Meeting;
use meeting_assistant::session::meeting::MeetingDefaults;

const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Lease term: 36 months.</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Early exit </w:t></w:r><w:r><w:t>costs 3 months rent.</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

fn ingest(uploads: &[Upload]) -> String {
    context(&uploads.iter().map(extract).collect::<Vec<_>>())
}

fn docx_bytes() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(DOCUMENT_XML.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

#[test]
fn mixed_batch_keeps_every_section_in_order() {
    let uploads = vec![
        Upload::new("notes.txt", b"plain text".to_vec()),
        Upload::new("lease.docx", docx_bytes()),
        Upload::new("scan.pdf", b"%PDF-garbage".to_vec()),
    ];

    let context = ingest(&uploads);

    let notes = context.find("=== notes.txt ===\n[unsupported format: notes.txt]").unwrap();
    let lease = context
        .find("=== lease.docx ===\nLease term: 36 months.\nEarly exit costs 3 months rent.")
        .unwrap();
    let scan = context.find("=== scan.pdf ===\n[failed to read scan.pdf:").unwrap();
    assert!(notes < lease);
    assert!(lease < scan);
}

#[test]
fn docx_without_document_part_is_placeholder() {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/styles.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"<styles/>").unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    let context = ingest(&[Upload::new("empty.docx", bytes)]);
    assert!(context.starts_with("=== empty.docx ===\n[failed to read empty.docx:"));
}

#[test]
fn attaching_from_disk_feeds_document_context() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("lease.docx"), docx_bytes()).unwrap();
    std::fs::write(tmp.path().join("memo.txt"), "memo").unwrap();

    let pattern = tmp.path().join("*.docx").display().to_string();
    let paths = expand_pattern(&pattern).unwrap();
    assert_eq!(paths.len(), 1);

    let mut meeting = Meeting::new(MeetingDefaults::default());
    let extracted = meeting.attach_paths(&[
        tmp.path().join("lease.docx").display().to_string(),
        tmp.path().join("missing.pdf").display().to_string(),
    ]);
    assert!(extracted[0].ok);
    assert!(!extracted[1].ok);

    let context = meeting.document_context().unwrap();
    assert!(context.contains("Lease term: 36 months."));
    assert!(context.contains("[failed to read"));

    meeting.clear_attachments();
    assert!(meeting.document_context().is_none());
}

#[test]
fn unreadable_path_becomes_placeholder() {
    let extracted = ingest_paths(&["/definitely/not/here.xlsx".into()]);
    assert_eq!(extracted.len(), 1);
    assert!(!extracted[0].ok);
    assert!(extracted[0].text.starts_with("[failed to read /definitely/not/here.xlsx:"));
}

#[test]
fn malformed_pattern_leaves_the_rest_of_the_attach_intact() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("lease.docx"), docx_bytes()).unwrap();

    let extracted = ingest_patterns(&[
        tmp.path().join("lease.docx").display().to_string(),
        tmp.path().join("draft[.pdf").display().to_string(),
    ]);

    assert_eq!(extracted.len(), 2);
    assert!(extracted[0].ok);
    assert!(extracted[0].text.contains("Lease term: 36 months."));
    assert!(!extracted[1].ok);
    assert!(extracted[1].text.contains("invalid pattern"));
}

#[test]
fn bracketed_file_name_on_disk_is_attached() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("minutes[1].docx"), docx_bytes()).unwrap();

    let extracted = ingest_patterns(&[tmp.path().join("minutes[1].docx").display().to_string()]);
    assert_eq!(extracted.len(), 1);
    assert_eq!(extracted[0].name, "minutes[1].docx");
    assert!(extracted[0].ok);
}
