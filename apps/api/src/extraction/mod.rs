//! Text extraction from uploaded resume documents (PDF, DOCX, TXT).
//!
//! Dispatches on the file extension. A document that opens but yields no text is not an
//! error here; the parser refuses blank text downstream.

use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::resume::parser::normalize_text;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file format: {0:?} (expected .pdf, .docx or .txt)")]
    UnsupportedFormat(String),

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not read DOCX: {0}")]
    Docx(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractionError> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::Txt),
            _ => Err(ExtractionError::UnsupportedFormat(file_name.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub format: DocumentFormat,
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Extracts text from an in-memory document, choosing the reader by `file_name`'s extension.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
    let format = DocumentFormat::from_file_name(file_name)?;
    let text = match format {
        DocumentFormat::Pdf => extract_pdf(bytes)?,
        DocumentFormat::Docx => extract_docx(bytes)?,
        DocumentFormat::Txt => String::from_utf8_lossy(bytes).trim().to_string(),
    };
    debug!("Extracted {} chars from {file_name} ({format:?})", text.len());
    Ok(ExtractedText { text, format })
}

// ────────────────────────────────────────────────────────────────────────────
// Format readers
// ────────────────────────────────────────────────────────────────────────────

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
    Ok(normalize_text(&raw).trim().to_string())
}

/// Paragraph properties (skipped, they hold tab-stop definitions), text runs, line breaks
/// and tabs, in document order.
static DOCX_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<w:pPr>.*?</w:pPr>|<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:(?:br|cr)\b[^>]*/>|<w:tab\b[^>]*/>",
    )
    .expect("docx run pattern is valid")
});

static XML_ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#x([0-9A-Fa-f]+)|#([0-9]+)|(lt|gt|quot|apos|amp));")
        .expect("xml entity pattern is valid")
});

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractionError::Docx(e.to_string()))?
        .read_to_string(&mut xml)?;

    Ok(document_xml_to_text(&xml))
}

/// One output line per `<w:p>` paragraph. Soft breaks inside a paragraph become `\n`,
/// tabs become `\t`.
fn document_xml_to_text(xml: &str) -> String {
    xml.split("</w:p>")
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn paragraph_text(paragraph: &str) -> String {
    let mut out = String::new();
    for caps in DOCX_RUN_RE.captures_iter(paragraph) {
        let token = &caps[0];
        if let Some(text) = caps.get(1) {
            out.push_str(&unescape_xml(text.as_str()));
        } else if token.starts_with("<w:tab") {
            out.push('\t');
        } else if token.starts_with("<w:br") || token.starts_with("<w:cr") {
            out.push('\n');
        }
    }
    out
}

/// Decodes the predefined entities and numeric character references in one pass.
/// References to invalid code points are left as written.
fn unescape_xml(s: &str) -> String {
    XML_ENTITY_RE
        .replace_all(s, |caps: &regex::Captures| {
            let decoded = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = caps.get(2) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match &caps[3] {
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    _ => Some('&'),
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::resume::parser::parse_resume;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_file_name("cv.PDF").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_file_name("a/b/cv.docx").unwrap(), DocumentFormat::Docx);
        assert_eq!(DocumentFormat::from_file_name("cv.txt").unwrap(), DocumentFormat::Txt);
        assert!(matches!(
            DocumentFormat::from_file_name("cv.odt"),
            Err(ExtractionError::UnsupportedFormat(_))
        ));
        assert!(DocumentFormat::from_file_name("README").is_err());
    }

    #[test]
    fn test_txt_is_trimmed() {
        let out = extract_text("cv.txt", b"\n  Jane Doe\nSkills\n").unwrap();
        assert_eq!(out.text, "Jane Doe\nSkills");
        assert_eq!(out.format, DocumentFormat::Txt);
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let xml = r#"<w:document><w:body>
<w:p><w:r><w:t>Jane </w:t></w:r><w:r><w:t xml:space="preserve">Doe</w:t></w:r></w:p>
<w:p><w:r><w:t>R&amp;D &lt;lead&gt;</w:t></w:r></w:p>
</w:body></w:document>"#;
        let out = extract_text("cv.docx", &docx_bytes(xml)).unwrap();
        assert_eq!(out.text, "Jane Doe\nR&D <lead>");
        assert_eq!(out.format, DocumentFormat::Docx);
    }

    #[test]
    fn test_docx_without_document_part_fails() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", zip::write::FileOptions::default())
            .unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        assert!(matches!(extract_text("cv.docx", &bytes), Err(ExtractionError::Docx(_))));
    }

    #[test]
    fn test_corrupt_docx_fails() {
        assert!(matches!(
            extract_text("cv.docx", b"definitely not a zip"),
            Err(ExtractionError::Docx(_))
        ));
    }

    #[test]
    fn test_corrupt_pdf_fails() {
        assert!(matches!(
            extract_text("cv.pdf", b"definitely not a pdf"),
            Err(ExtractionError::Pdf(_))
        ));
    }

    #[test]
    fn test_docx_breaks_and_tabs_keep_sections_apart() {
        let xml = r#"<w:document><w:body>
<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>EXPERIENCE</w:t><w:br/><w:t>Built APIs</w:t></w:r></w:p>
<w:p><w:r><w:t>SKILLS</w:t><w:cr/><w:t>Languages:</w:t><w:tab/><w:t>Python, SQL</w:t></w:r></w:p>
</w:body></w:document>"#;
        let out = extract_text("cv.docx", &docx_bytes(xml)).unwrap();
        assert_eq!(
            out.text,
            "Jane Doe\nEXPERIENCE\nBuilt APIs\nSKILLS\nLanguages:\tPython, SQL"
        );

        let parsed = parse_resume(&out.text).unwrap();
        assert_eq!(parsed.name, "Jane Doe");
        assert_eq!(parsed.experience, vec!["Built APIs".to_string()]);
        assert_eq!(parsed.skills, vec!["Python".to_string(), "SQL".to_string()]);
    }

    #[test]
    fn test_unescape_numeric_references() {
        assert_eq!(unescape_xml("O&#8217;Brien &#x2022; R&amp;D"), "O\u{2019}Brien \u{2022} R&D");
        // decoded once, not recursively
        assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
        assert_eq!(unescape_xml("bad &#xD800; &#99999999999;"), "bad &#xD800; &#99999999999;");
    }
}
