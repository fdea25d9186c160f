//! Analysis result models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Outcome of keyword classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// Winning category id, or the fallback id.
    pub category: String,
    /// Confidence score (0 - 100).
    pub confidence: u8,
    /// Raw score of the winning category.
    pub score: f64,
    /// Keywords and aliases of the winner that matched, deduplicated.
    pub matched_keywords: Vec<String>,
}

/// Best issuer template for a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMatch {
    pub template_id: String,
    pub company: String,
    pub category: String,
    /// Raw template score.
    pub score: u32,
    /// Confidence score (0 - 100).
    pub confidence: u8,
    pub matched_indicators: Vec<String>,
    pub matched_fields: Vec<String>,
    /// Pattern name to captured value.
    pub extracted_values: BTreeMap<String, String>,
}

/// Facts extracted from the text. `None` always means "no matches".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amounts: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    /// Dates as `D/M/YYYY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_codes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_numbers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_numbers: Option<Vec<String>>,
}

impl Metadata {
    /// True when no field found anything.
    pub fn is_empty(&self) -> bool {
        self.amounts.is_none()
            && self.dates.is_none()
            && self.fiscal_codes.is_none()
            && self.bank_account_numbers.is_none()
            && self.protocol_numbers.is_none()
    }
}

/// Which stage decided the final category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySource {
    /// Nothing matched; the fallback bucket was used.
    Fallback,
    /// Keyword classification.
    Keywords,
    /// An issuer template overrode keyword classification.
    Template,
}

/// Whether the analysis ran on real text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ContentStatus {
    Extracted,
    /// Acquisition produced no text; the record is based on the filename.
    Unavailable { reason: String },
}

/// Final, immutable result of analyzing one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub filename: String,
    /// Sanitized, truncated text.
    pub excerpt: String,
    pub category: String,
    /// Confidence score (0 - 100).
    pub confidence: u8,
    /// Keywords found by classification, kept when a template wins.
    pub keywords: Vec<String>,
    /// Issuer company, or `"unknown"`.
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub extracted_values: BTreeMap<String, String>,
    /// Four-digit year.
    pub year: String,
    pub metadata: Metadata,
    pub category_source: CategorySource,
    /// Category chosen by keyword classification alone.
    pub keyword_category: String,
    pub content: ContentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_confidence: Option<u8>,
}

impl AnalysisRecord {
    /// True when the record was built from the filename alone.
    pub fn is_degraded(&self) -> bool {
        matches!(self.content, ContentStatus::Unavailable { .. })
    }
}
