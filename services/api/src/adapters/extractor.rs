//! services/api/src/adapters/extractor.rs
//!
//! This module contains the document text extractor. It implements the
//! `TextExtractionService` port using `pdf-extract` for PDFs and `docx-rs` for
//! Word documents.

use async_trait::async_trait;
use docx_rs::{read_docx, DocumentChild};
use legal_shield_core::{
    ports::{PortError, PortResult, TextExtractionService},
    validation::file_extension,
};
use tracing::debug;

/// Decodes uploaded contracts into plain text, dispatching on the file extension.
#[derive(Clone, Default)]
pub struct DocumentTextExtractor;

impl DocumentTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_blocking(data: &[u8], filename: &str) -> Result<String, String> {
        let text = match file_extension(filename).as_str() {
            ".pdf" => pdf_extract::extract_text_from_mem(data).map_err(|e| e.to_string())?,
            ".docx" | ".doc" => extract_docx_text(data)?,
            ".txt" => String::from_utf8(data.to_vec()).map_err(|e| e.to_string())?,
            _ => return Err(format!("Unsupported file type: {}", filename)),
        };
        Ok(text.trim().to_string())
    }
}

/// Joins the text of every top-level paragraph with newlines.
fn extract_docx_text(data: &[u8]) -> Result<String, String> {
    let docx = read_docx(data).map_err(|e| e.to_string())?;
    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            text.push_str(&paragraph.raw_text());
            text.push('\n');
        }
    }
    Ok(text)
}

#[async_trait]
impl TextExtractionService for DocumentTextExtractor {
    async fn extract_text(&self, data: Vec<u8>, filename: &str) -> PortResult<String> {
        let name = filename.to_string();
        // Decoders are CPU-bound and may panic on malformed input; a panic
        // surfaces here as a JoinError.
        let outcome =
            tokio::task::spawn_blocking(move || Self::extract_blocking(&data, &name)).await;

        let text = match outcome {
            Ok(result) => result,
            Err(join_error) => Err(join_error.to_string()),
        }
        .map_err(|e| PortError::InvalidInput(format!("Error extracting text from file: {}", e)))?;

        debug!(filename, chars = text.chars().count(), "Extracted document text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::Cursor;

    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[tokio::test]
    async fn extracts_and_trims_plain_text() {
        let extractor = DocumentTextExtractor::new();
        let text = extractor
            .extract_text(b"\n  This lease begins on May 1.  \n".to_vec(), "lease.TXT")
            .await
            .unwrap();
        assert_eq!(text, "This lease begins on May 1.");
    }

    #[tokio::test]
    async fn invalid_utf8_is_bad_input() {
        let extractor = DocumentTextExtractor::new();
        let err = extractor
            .extract_text(vec![0xff, 0xfe, 0xfd], "broken.txt")
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().starts_with("Error extracting text from file:"));
    }

    #[tokio::test]
    async fn unsupported_extension_is_bad_input() {
        let extractor = DocumentTextExtractor::new();
        let err = extractor
            .extract_text(b"a,b,c".to_vec(), "sheet.csv")
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn extracts_docx_paragraphs_in_order() {
        let extractor = DocumentTextExtractor::new();
        let data = docx_bytes(&["Section 1. Term.", "Section 2. Rent."]);
        let text = extractor.extract_text(data, "contract.docx").await.unwrap();
        assert_eq!(text, "Section 1. Term.\nSection 2. Rent.");
    }

    #[tokio::test]
    async fn extracts_every_pdf_page_in_order() {
        let extractor = DocumentTextExtractor::new();
        let data = include_bytes!("../../tests/fixtures/two_pages.pdf").to_vec();
        let text = extractor.extract_text(data, "lease.pdf").await.unwrap();

        let first = text.find("Section 1 Term of lease").unwrap();
        let second = text.find("Section 2 Rent and deposit").unwrap();
        assert!(first < second);
        assert_eq!(text, text.trim());
    }

    #[tokio::test]
    async fn garbage_pdf_is_bad_input() {
        let extractor = DocumentTextExtractor::new();
        let err = extractor
            .extract_text(b"definitely not a pdf".to_vec(), "scan.pdf")
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn garbage_docx_is_bad_input() {
        let extractor = DocumentTextExtractor::new();
        let err = extractor
            .extract_text(b"PK not really a zip".to_vec(), "legacy.doc")
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }
}
