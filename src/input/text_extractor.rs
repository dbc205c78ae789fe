//! Text extraction from raw document bytes

use crate::error::{RelevanceError, Result};
use crate::input::file_detector::FileType;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::sync::OnceLock;

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            RelevanceError::Extraction(format!("Failed to extract text from PDF: {}", e))
        })
    }
}

/// Concatenates the text runs of every top-level paragraph, one line per paragraph.
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let docx = docx_rs::read_docx(bytes).map_err(|e| {
            RelevanceError::Extraction(format!("Failed to read DOCX document: {:?}", e))
        })?;

        let mut lines = Vec::new();
        for child in docx.document.children {
            if let DocumentChild::Paragraph(paragraph) = child {
                let mut line = String::new();
                for paragraph_child in paragraph.children {
                    if let ParagraphChild::Run(run) = paragraph_child {
                        for run_child in run.children {
                            if let RunChild::Text(text) = run_child {
                                line.push_str(&text.text);
                            }
                        }
                    }
                }
                lines.push(line);
            }
        }

        Ok(lines.join("\n"))
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown_content = String::from_utf8_lossy(bytes);

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Ok(self.html_to_text(&html_output))
    }
}

impl MarkdownExtractor {
    fn html_to_text(&self, html: &str) -> String {
        static TAG_RE: OnceLock<Regex> = OnceLock::new();
        let tag_re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

        let text = html
            .replace("<br>", "\n")
            .replace("<li>", "\n• ")
            .replace("</p>", "\n\n")
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'");

        let clean_text = tag_re.replace_all(&text, "");

        let lines: Vec<String> = clean_text
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        lines.join("\n")
    }
}

/// Route bytes to the extractor for `file_type`.
pub fn extract_bytes(file_type: FileType, bytes: &[u8]) -> Result<String> {
    match file_type {
        FileType::Pdf => PdfExtractor.extract(bytes),
        FileType::Docx => DocxExtractor.extract(bytes),
        FileType::Text => PlainTextExtractor.extract(bytes),
        FileType::Markdown => MarkdownExtractor.extract(bytes),
        FileType::Unknown => Err(RelevanceError::UnsupportedFormat(
            "unknown file type".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn docx_bytes(lines: &[&str]) -> Vec<u8> {
        let mut docx = docx_rs::Docx::new();
        for line in lines {
            docx = docx.add_paragraph(
                docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text(*line)),
            );
        }
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let bytes = docx_bytes(&["Jane Doe", "Skills: Rust, Python"]);
        let text = DocxExtractor.extract(&bytes).unwrap();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Skills: Rust, Python"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_corrupt_docx_is_extraction_error() {
        let result = DocxExtractor.extract(b"definitely not a zip archive");
        assert!(matches!(result, Err(RelevanceError::Extraction(_))));
    }

    #[test]
    fn test_markdown_strips_formatting() {
        let text = MarkdownExtractor
            .extract(b"## Requirements\n\n- **Python**\n- Django")
            .unwrap();
        assert!(text.contains("Requirements"));
        assert!(text.contains("Python"));
        assert!(!text.contains("**"));
        assert!(!text.contains("##"));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = extract_bytes(FileType::Unknown, b"data");
        assert!(matches!(result, Err(RelevanceError::UnsupportedFormat(_))));
    }
}
