//! Category and issuer template registries.
//!
//! Registries are built once, validated, and then shared read-only
//! (`Arc`) by every analysis call.

pub mod categories;
pub mod templates;

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

pub use categories::{Category, CategoryDef, CategoryRegistry, Term, default_categories};
pub use templates::{
    IssuerTemplate, PatternDef, TemplateDef, TemplateRegistry, TemplateStats, default_templates,
};

use crate::error::{RegistryError, Result};

/// Category id used when nothing matches.
pub const FALLBACK_CATEGORY: &str = "Altri_Documenti";

/// On-disk form of a custom registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryFile {
    pub categories: Vec<CategoryDef>,
    pub templates: Vec<TemplateDef>,
}

impl RegistryFile {
    /// The built-in tables.
    pub fn builtin() -> Self {
        Self {
            categories: default_categories(),
            templates: default_templates(),
        }
    }
}

/// Compiled category and template registries.
#[derive(Debug, Clone)]
pub struct Registries {
    pub categories: Arc<CategoryRegistry>,
    pub templates: Arc<TemplateRegistry>,
}

impl Registries {
    /// Compile a registry file.
    pub fn from_defs(file: RegistryFile) -> std::result::Result<Self, RegistryError> {
        let categories = CategoryRegistry::new(file.categories)?;
        let templates = TemplateRegistry::new(file.templates, &categories)?;
        Ok(Self {
            categories: Arc::new(categories),
            templates: Arc::new(templates),
        })
    }

    /// The built-in registries.
    pub fn builtin() -> std::result::Result<Self, RegistryError> {
        Self::from_defs(RegistryFile::builtin())
    }

    /// Load and compile a JSON registry file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: RegistryFile = serde_json::from_str(&content)?;
        let registries = Self::from_defs(file)?;
        info!(
            "Loaded {} categories and {} templates from {}",
            registries.categories.len(),
            registries.templates.len(),
            path.display()
        );
        Ok(registries)
    }

    /// Registries from `path` when given, built-in otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()?),
        }
    }
}
