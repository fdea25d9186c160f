//! Core library for classifying Italian household documents.
//!
//! This crate provides:
//! - Category and issuer template registries (built-in or loaded from JSON)
//! - Weighted keyword classification and issuer template matching
//! - Metadata extraction (amounts, dates, fiscal codes, IBANs, protocol numbers)
//! - Year resolution and the combined analysis record

pub mod analyzer;
pub mod classify;
pub mod error;
pub mod filename;
pub mod models;
pub mod registry;
pub mod rules;

pub use analyzer::{CategoryResolution, DocumentAnalyzer, UNKNOWN_COMPANY};
pub use classify::{KeywordClassifier, TemplateMatcher, template_confidence};
pub use error::{DocsortError, InputError, RegistryError, Result};
pub use filename::{filename_text, sanitize_excerpt};
pub use models::{
    AnalysisRecord, CategorySource, ClassificationResult, ContentStatus, DocsortConfig,
    DocumentInput, HintCodes, Metadata, StructuredHints, TemplateMatch, TextSource,
};
pub use registry::{FALLBACK_CATEGORY, Registries, RegistryFile, TemplateStats};
pub use rules::{detect_hints, extract_metadata, resolve_year};
