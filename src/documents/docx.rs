// ABOUTME: DOCX text extraction — reads word/document.xml from the zip container.
// ABOUTME: Emits one line per paragraph; tabs and line breaks inside runs are preserved.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{MeetingError, Result};

const DOCUMENT_XML: &str = "word/document.xml";

pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| MeetingError::parse("DOCX", e))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| MeetingError::parse("DOCX", e))?
        .read_to_string(&mut xml)?;
    paragraphs_from_xml(&xml)
}

/// Collect the text runs of a WordprocessingML body, one paragraph per line.
/// Paragraphs nested inside another (text boxes) are emitted when they close,
/// ahead of the paragraph that contains them.
pub fn paragraphs_from_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:p" => open.push(String::new()),
                _ => {}
            },
            Ok(Event::Empty(e)) => match (e.name().as_ref(), open.last_mut()) {
                (b"w:tab", Some(current)) => current.push('\t'),
                (b"w:br" | b"w:cr", Some(current)) => current.push('\n'),
                (b"w:p", _) => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(|e| MeetingError::parse("DOCX", e))?;
                if let Some(current) = open.last_mut() {
                    current.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    if let Some(done) = open.pop() {
                        paragraphs.push(done);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(MeetingError::parse("DOCX", e)),
            _ => {}
        }
    }
    paragraphs.extend(open.into_iter().rev());

    Ok(paragraphs.join("\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_become_lines() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Quarterly</w:t></w:r><w:r><w:t xml:space="preserve"> review</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>Revenue</w:t><w:tab/><w:t>R&amp;D</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let text = paragraphs_from_xml(xml).unwrap();
        assert_eq!(text, "Quarterly review\n\nRevenue\tR&D");
    }

    #[test]
    fn text_box_paragraphs_keep_the_surrounding_text() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:t>Before box.</w:t></w:r><w:r><w:txbxContent><w:p><w:r><w:t>Inside box.</w:t></w:r></w:p></w:txbxContent></w:r><w:r><w:t xml:space="preserve"> After box.</w:t></w:r></w:p>
</w:body></w:document>"#;
        let text = paragraphs_from_xml(xml).unwrap();
        assert_eq!(text, "Inside box.\nBefore box. After box.");
    }

    #[test]
    fn non_zip_bytes_are_parse_error() {
        let err = extract_text(b"definitely not a zip").unwrap_err();
        assert!(err.to_string().contains("DOCX"));
    }
}
