//! crates/legal_shield_core/src/validation.rs
//!
//! Input checks applied before any text is extracted or sent to the model.
//! Every rejection is a `PortError::InvalidInput`.

use std::path::Path;

use crate::ports::{PortError, PortResult};

/// The limits an uploaded document or submitted contract must satisfy.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    /// Lowercase extensions including the leading dot, e.g. `.pdf`.
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    /// When false, `validate_content_type` accepts anything.
    pub check_content_type: bool,
    pub max_file_size: usize,
    pub min_contract_length: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            allowed_extensions: [".txt", ".pdf", ".docx", ".doc"]
                .into_iter()
                .map(String::from)
                .collect(),
            allowed_content_types: [
                "application/pdf",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                "application/msword",
                "text/plain",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            check_content_type: false,
            max_file_size: 10 * 1024 * 1024,
            min_contract_length: 100,
        }
    }
}

/// Returns the lowercase extension of `filename` with its leading dot, or an
/// empty string when there is none.
pub fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

impl ValidationRules {
    pub fn validate_extension(&self, filename: &str) -> PortResult<()> {
        let extension = file_extension(filename);
        if self.allowed_extensions.iter().any(|allowed| *allowed == extension) {
            Ok(())
        } else {
            Err(PortError::InvalidInput(format!(
                "Unsupported file type. Allowed: {}",
                self.allowed_extensions.join(", ")
            )))
        }
    }

    pub fn validate_file_size(&self, size: usize) -> PortResult<()> {
        if size > self.max_file_size {
            return Err(PortError::InvalidInput(format!(
                "File too large ({} bytes). Maximum size is {} bytes",
                size, self.max_file_size
            )));
        }
        Ok(())
    }

    /// Checks the declared MIME type of an upload. Parts that declare no type
    /// are let through; the extension check still applies to them.
    pub fn validate_content_type(&self, content_type: Option<&str>) -> PortResult<()> {
        if !self.check_content_type {
            return Ok(());
        }
        let Some(content_type) = content_type else {
            return Ok(());
        };
        // Drop parameters such as "; charset=utf-8".
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if self.allowed_content_types.iter().any(|allowed| *allowed == essence) {
            Ok(())
        } else {
            Err(PortError::InvalidInput(format!(
                "Unsupported content type '{}'. Allowed: {}",
                essence,
                self.allowed_content_types.join(", ")
            )))
        }
    }

    pub fn validate_contract_text(&self, text: &str) -> PortResult<()> {
        if text.trim().chars().count() < self.min_contract_length {
            return Err(PortError::InvalidInput(format!(
                "Contract text too short for meaningful analysis (minimum {} characters)",
                self.min_contract_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_extensions_in_any_case() {
        let rules = ValidationRules::default();
        for name in ["lease.pdf", "nda.docx", "old.doc", "plain.txt", "SCAN.PDF", "a.b.Docx"] {
            assert!(rules.validate_extension(name).is_ok(), "{} should pass", name);
        }
    }

    #[test]
    fn rejects_unsupported_or_missing_extensions() {
        let rules = ValidationRules::default();
        for name in ["setup.exe", "contract", "table.csv", ".pdf.zip"] {
            let err = rules.validate_extension(name).unwrap_err();
            assert!(err.is_client_error());
            assert!(err.to_string().contains(".txt, .pdf, .docx, .doc"));
        }
    }

    #[test]
    fn minimum_length_boundary() {
        let rules = ValidationRules::default();
        assert!(rules.validate_contract_text(&"x".repeat(99)).is_err());
        assert!(rules.validate_contract_text(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn length_ignores_surrounding_whitespace() {
        let rules = ValidationRules::default();
        let padded = format!("   {}\n\n", "x".repeat(99));
        assert!(rules.validate_contract_text(&padded).is_err());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let rules = ValidationRules::default();
        assert!(rules.validate_contract_text(&"é".repeat(99)).is_err());
        assert!(rules.validate_contract_text(&"é".repeat(100)).is_ok());
    }

    #[test]
    fn file_size_ceiling() {
        let rules = ValidationRules::default();
        assert!(rules.validate_file_size(10 * 1024 * 1024).is_ok());
        assert!(rules.validate_file_size(10 * 1024 * 1024 + 1).is_err());
    }

    #[test]
    fn content_type_check_is_opt_in() {
        let mut rules = ValidationRules::default();
        assert!(rules.validate_content_type(Some("application/x-msdownload")).is_ok());

        rules.check_content_type = true;
        assert!(rules.validate_content_type(Some("application/x-msdownload")).is_err());
        assert!(rules.validate_content_type(Some("text/plain; charset=utf-8")).is_ok());
        assert!(rules.validate_content_type(Some("Application/PDF")).is_ok());
        assert!(rules.validate_content_type(None).is_ok());
    }
}
