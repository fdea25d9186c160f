//! Configuration structures for the analysis pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DocsortError, Result};

/// Main configuration for the docsort pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsortConfig {
    /// Keyword classification configuration.
    pub classification: ClassificationConfig,

    /// Issuer template matching configuration.
    pub templates: TemplateConfig,

    /// Metadata extraction configuration.
    pub extraction: ExtractionConfig,

    /// Record assembly configuration.
    pub analyzer: AnalyzerConfig,

    /// Optional JSON file with custom category and template tables.
    /// The built-in tables are used when unset.
    pub registry_path: Option<PathBuf>,
}

/// Scoring and confidence parameters for keyword classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Multiplier for keyword hits in the filename.
    pub filename_keyword_multiplier: f64,

    /// Multiplier for alias hits in the text.
    pub text_alias_multiplier: f64,

    /// Multiplier for alias hits in the filename.
    pub filename_alias_multiplier: f64,

    /// Factor turning a raw score into a confidence percentage.
    pub confidence_per_point: f64,

    /// Lowest reported confidence.
    pub min_confidence: u8,

    /// Highest reported confidence.
    pub max_confidence: u8,

    /// Bonus when a matched keyword also appears in the filename.
    pub filename_boost: u8,

    /// The filename bonus only applies below this confidence.
    pub filename_boost_below: u8,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            filename_keyword_multiplier: 4.0,
            text_alias_multiplier: 0.8,
            filename_alias_multiplier: 3.0,
            confidence_per_point: 12.0,
            min_confidence: 25,
            max_confidence: 95,
            filename_boost: 10,
            filename_boost_below: 85,
        }
    }
}

/// Issuer template matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Points per indicator phrase found.
    pub indicator_points: u32,

    /// Points per required-field phrase found.
    pub required_field_points: u32,

    /// Points per named pattern that matches.
    pub pattern_points: u32,

    /// Minimum score for a template to be selected.
    pub min_score: u32,

    /// Highest reported template confidence.
    pub max_confidence: u8,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            indicator_points: 10,
            required_field_points: 5,
            pattern_points: 8,
            min_score: 15,
            max_confidence: 95,
        }
    }
}

/// Metadata extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Drop IBAN matches that fail the mod-97 checksum.
    pub validate_iban: bool,
}

/// Record assembly configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Maximum number of characters kept in the text excerpt.
    pub excerpt_length: usize,

    /// Year used as "now" by the year resolver. Reads the local clock when unset.
    pub reference_year: Option<i32>,

    /// Name of the inbox folder; it is not used as a hint in filename-only mode.
    pub inbox_folder: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            excerpt_length: 500,
            reference_year: None,
            inbox_folder: "documentstoorganize".to_string(),
        }
    }
}

impl DocsortConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let c = &self.classification;
        if c.min_confidence > c.max_confidence || c.max_confidence > 100 {
            return Err(DocsortError::Config(format!(
                "classification confidence range {}..={} is invalid",
                c.min_confidence, c.max_confidence
            )));
        }
        if self.templates.max_confidence > 100 {
            return Err(DocsortError::Config(format!(
                "template max_confidence {} exceeds 100",
                self.templates.max_confidence
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = DocsortConfig::default();
        config.analyzer.reference_year = Some(2025);
        config.save(&path).unwrap();

        let loaded = DocsortConfig::from_file(&path).unwrap();
        assert_eq!(loaded.analyzer.reference_year, Some(2025));
        assert_eq!(loaded.templates.min_score, 15);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: DocsortConfig =
            serde_json::from_str(r#"{"templates": {"min_score": 20}}"#).unwrap();
        assert_eq!(config.templates.min_score, 20);
        assert_eq!(config.templates.pattern_points, 8);
        assert_eq!(config.classification.max_confidence, 95);
    }

    #[test]
    fn test_invalid_confidence_range() {
        let mut config = DocsortConfig::default();
        config.classification.min_confidence = 99;
        assert!(config.validate().is_err());
    }
}
