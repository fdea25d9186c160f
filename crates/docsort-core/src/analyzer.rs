//! Document analysis: classification, template matching, metadata and year
//! combined into one record.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, info};

use crate::classify::{KeywordClassifier, TemplateMatcher};
use crate::error::Result;
use crate::filename::{filename_text, sanitize_excerpt};
use crate::models::config::{AnalyzerConfig, DocsortConfig};
use crate::models::input::{DocumentInput, TextSource};
use crate::models::record::{
    AnalysisRecord, CategorySource, ClassificationResult, ContentStatus, TemplateMatch,
};
use crate::registry::{FALLBACK_CATEGORY, Registries, TemplateStats};
use crate::rules::{MetadataExtractor, current_year, patterns, resolve_year};

/// Company reported when no template matched.
pub const UNKNOWN_COMPANY: &str = "unknown";

/// How the final category was decided.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryResolution {
    /// No keyword matched.
    Fallback(ClassificationResult),
    /// Keyword classification stands.
    Keywords(ClassificationResult),
    /// A template overrides category and company.
    Template {
        base: ClassificationResult,
        template: TemplateMatch,
    },
}

impl CategoryResolution {
    /// Merge keyword classification with an optional template match.
    pub fn resolve(base: ClassificationResult, template: Option<TemplateMatch>) -> Self {
        match template {
            Some(template) => Self::Template { base, template },
            None if base.category == FALLBACK_CATEGORY => Self::Fallback(base),
            None => Self::Keywords(base),
        }
    }

    fn base(&self) -> &ClassificationResult {
        match self {
            Self::Fallback(base) | Self::Keywords(base) => base,
            Self::Template { base, .. } => base,
        }
    }

    pub fn category(&self) -> &str {
        match self {
            Self::Template { template, .. } => &template.category,
            _ => &self.base().category,
        }
    }

    pub fn company(&self) -> &str {
        match self {
            Self::Template { template, .. } => &template.company,
            _ => UNKNOWN_COMPANY,
        }
    }

    /// Template confidence can only raise the keyword confidence.
    pub fn confidence(&self) -> u8 {
        match self {
            Self::Template { base, template } => base.confidence.max(template.confidence),
            _ => self.base().confidence,
        }
    }

    pub fn source(&self) -> CategorySource {
        match self {
            Self::Fallback(_) => CategorySource::Fallback,
            Self::Keywords(_) => CategorySource::Keywords,
            Self::Template { .. } => CategorySource::Template,
        }
    }

    fn into_parts(self) -> (ClassificationResult, Option<TemplateMatch>) {
        match self {
            Self::Fallback(base) | Self::Keywords(base) => (base, None),
            Self::Template { base, template } => (base, Some(template)),
        }
    }
}

/// Analyzes documents against shared, read-only registries.
#[derive(Debug, Clone)]
pub struct DocumentAnalyzer {
    classifier: KeywordClassifier,
    matcher: TemplateMatcher,
    metadata: MetadataExtractor,
    config: AnalyzerConfig,
}

impl DocumentAnalyzer {
    /// Create an analyzer from compiled registries and settings.
    pub fn new(registries: Registries, config: &DocsortConfig) -> Self {
        patterns::init();
        Self {
            classifier: KeywordClassifier::new(registries.categories, config.classification.clone()),
            matcher: TemplateMatcher::new(registries.templates, config.templates.clone()),
            metadata: MetadataExtractor::new(&config.extraction),
            config: config.analyzer.clone(),
        }
    }

    /// Create an analyzer, loading the registry file named by the config.
    pub fn from_config(config: &DocsortConfig) -> Result<Self> {
        let registries = Registries::load(config.registry_path.as_deref())?;
        Ok(Self::new(registries, config))
    }

    /// Analyzer with built-in registries and default settings.
    pub fn builtin() -> Result<Self> {
        Self::from_config(&DocsortConfig::default())
    }

    pub fn classifier(&self) -> &KeywordClassifier {
        &self.classifier
    }

    pub fn matcher(&self) -> &TemplateMatcher {
        &self.matcher
    }

    pub fn template_stats(&self) -> TemplateStats {
        self.matcher.registry().stats()
    }

    /// Year used when resolving document years.
    pub fn reference_year(&self) -> i32 {
        self.config.reference_year.unwrap_or_else(current_year)
    }

    /// Analyze extracted text.
    pub fn analyze_text(&self, filename: &str, text: &str) -> Result<AnalysisRecord> {
        self.analyze(&DocumentInput::new(filename, text))
    }

    /// Analyze one document.
    pub fn analyze(&self, input: &DocumentInput) -> Result<AnalysisRecord> {
        let start = Instant::now();
        input.validate()?;

        let (text, content, source_confidence) = match &input.text {
            TextSource::Extracted {
                text,
                source_confidence,
            } => (text.clone(), ContentStatus::Extracted, *source_confidence),
            TextSource::Unavailable { reason } => {
                debug!("No text for {} ({}), using filename", input.filename, reason);
                let text = filename_text(
                    &input.filename,
                    input.parent_dir.as_deref(),
                    &self.config.inbox_folder,
                );
                let content = ContentStatus::Unavailable {
                    reason: reason.clone(),
                };
                (text, content, None)
            }
        };

        let base = self.classifier.classify(&text, &input.filename);
        let template = self
            .matcher
            .match_template(&text, &input.filename, Some(&input.hints));
        let resolution = CategoryResolution::resolve(base, template);

        let category = resolution.category().to_string();
        let company = resolution.company().to_string();
        let confidence = resolution.confidence();
        let category_source = resolution.source();
        let (base, template) = resolution.into_parts();

        let (template_id, extracted_values) = match template {
            Some(t) => (Some(t.template_id), t.extracted_values),
            None => (None, BTreeMap::new()),
        };

        let metadata = self.metadata.extract(&text);
        let year = resolve_year(&text, &input.filename, self.reference_year());

        info!(
            "Analyzed {} -> {} ({}%, {:?}) in {}ms",
            input.filename,
            category,
            confidence,
            category_source,
            start.elapsed().as_millis()
        );

        Ok(AnalysisRecord {
            filename: input.filename.clone(),
            excerpt: sanitize_excerpt(&text, self.config.excerpt_length),
            category,
            confidence,
            keywords: base.matched_keywords,
            company,
            template: template_id,
            extracted_values,
            year,
            metadata,
            category_source,
            keyword_category: base.category,
            content,
            source_confidence,
        })
    }
}
