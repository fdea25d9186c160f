//! Data models for inputs, results and configuration.

pub mod config;
pub mod input;
pub mod record;

pub use config::DocsortConfig;
pub use input::{DocumentInput, HintCodes, StructuredHints, TextSource};
pub use record::{
    AnalysisRecord, CategorySource, ClassificationResult, ContentStatus, Metadata, TemplateMatch,
};
