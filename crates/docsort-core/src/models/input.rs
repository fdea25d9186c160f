//! Inputs handed over by text acquisition.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Text produced by the acquisition stage for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TextSource {
    /// Text was extracted.
    Extracted {
        text: String,
        /// Acquisition confidence (0 - 100), e.g. from OCR.
        #[serde(
            default,
            rename = "sourceConfidence",
            skip_serializing_if = "Option::is_none"
        )]
        source_confidence: Option<u8>,
    },
    /// No text could be produced; analysis falls back to the filename.
    Unavailable { reason: String },
}

impl TextSource {
    /// Extracted text without a confidence score.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Extracted {
            text: text.into(),
            source_confidence: None,
        }
    }

    /// No content, with the reason reported by acquisition.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Pre-extracted candidate facts supplied by text acquisition.
///
/// Only `companies` influences the analysis (template matching); the other
/// fields are carried for callers that produce them anyway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StructuredHints {
    pub amounts: Vec<f64>,
    pub dates: Vec<String>,
    pub codes: HintCodes,
    /// Lowercase company names recognized in the text.
    pub companies: Vec<String>,
}

/// Identifier codes found by acquisition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HintCodes {
    pub fiscal_codes: Vec<String>,
    pub ibans: Vec<String>,
}

impl StructuredHints {
    /// Whether the hint list names `company` (case-insensitive, exact).
    pub fn has_company(&self, company: &str) -> bool {
        let company = company.to_lowercase();
        self.companies.iter().any(|c| c.to_lowercase() == company)
    }
}

/// One document to analyze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    /// File name including extension, without directories.
    pub filename: String,
    /// Name of the directory holding the file, used in filename-only mode.
    #[serde(default)]
    pub parent_dir: Option<String>,
    pub text: TextSource,
    #[serde(default)]
    pub hints: StructuredHints,
}

impl DocumentInput {
    /// Create an input from extracted text.
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            parent_dir: None,
            text: TextSource::text(text),
            hints: StructuredHints::default(),
        }
    }

    /// Create an input for a document whose text could not be acquired.
    pub fn without_text(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            parent_dir: None,
            text: TextSource::unavailable(reason),
            hints: StructuredHints::default(),
        }
    }

    pub fn with_parent_dir(mut self, parent_dir: impl Into<String>) -> Self {
        self.parent_dir = Some(parent_dir.into());
        self
    }

    pub fn with_hints(mut self, hints: StructuredHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_source_confidence(mut self, confidence: u8) -> Self {
        if let TextSource::Extracted {
            source_confidence, ..
        } = &mut self.text
        {
            *source_confidence = Some(confidence);
        }
        self
    }

    /// Reject inputs that are not decoded text.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.filename.contains('\0') {
            return Err(InputError::BinaryContent("filename"));
        }
        if let TextSource::Extracted {
            text,
            source_confidence,
        } = &self.text
        {
            if text.contains('\0') {
                return Err(InputError::BinaryContent("text"));
            }
            if let Some(confidence) = *source_confidence {
                if confidence > 100 {
                    return Err(InputError::SourceConfidence(confidence));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validate_rejects_binary_text() {
        let input = DocumentInput::new("scan.pdf", "%PDF-1.4\0\0stream");
        assert_eq!(input.validate(), Err(InputError::BinaryContent("text")));
    }

    #[test]
    fn test_validate_rejects_confidence_over_100() {
        let input = DocumentInput::new("scan.png", "testo").with_source_confidence(140);
        assert_eq!(input.validate(), Err(InputError::SourceConfidence(140)));
    }

    #[test]
    fn test_source_confidence_ignored_without_text() {
        let input = DocumentInput::without_text("foto.jpg", "no OCR").with_source_confidence(80);
        assert!(matches!(input.text, TextSource::Unavailable { .. }));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_has_company_is_exact_and_case_insensitive() {
        let hints = StructuredHints {
            companies: vec!["enel".to_string(), "tre".to_string()],
            ..Default::default()
        };
        assert!(hints.has_company("ENEL"));
        assert!(!hints.has_company("WIND TRE"));
    }

    #[test]
    fn test_input_json_uses_camel_case() {
        let input = DocumentInput::new("enel.pdf", "ENEL")
            .with_parent_dir("bollette")
            .with_source_confidence(80);
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["parentDir"], "bollette");
        assert_eq!(json["text"]["status"], "extracted");
        assert_eq!(json["text"]["sourceConfidence"], 80);
        assert!(json.get("parent_dir").is_none());

        let parsed: DocumentInput = serde_json::from_str(
            r#"{"filename": "f24.pdf", "parentDir": "tasse",
                "text": {"status": "extracted", "text": "IMU", "sourceConfidence": 70},
                "hints": {"codes": {"fiscalCodes": ["RSSMRA80A01H501U"]}}}"#,
        )
        .unwrap();
        assert_eq!(parsed.parent_dir.as_deref(), Some("tasse"));
        assert_eq!(
            parsed.text,
            TextSource::Extracted {
                text: "IMU".to_string(),
                source_confidence: Some(70),
            }
        );
        assert_eq!(parsed.hints.codes.fiscal_codes, vec!["RSSMRA80A01H501U"]);
    }
}
