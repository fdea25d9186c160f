//! Category table: keywords, aliases and weights per taxonomy bucket.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Serializable category definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDef {
    pub id: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl CategoryDef {
    fn new(id: &str, keywords: &[&str], aliases: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            weight: default_weight(),
        }
    }
}

/// A keyword or alias with its whole-word matcher.
#[derive(Debug, Clone)]
pub struct Term {
    text: String,
    matcher: Regex,
}

impl Term {
    fn compile(category: &str, raw: &str) -> Result<Self, RegistryError> {
        let text = raw.trim().to_lowercase();
        if text.is_empty() {
            return Err(RegistryError::EmptyKeyword(category.to_string()));
        }
        // \b is Unicode-aware, so accented letters count as word characters.
        let matcher = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&text))).map_err(
            |source| RegistryError::InvalidPattern {
                template: category.to_string(),
                name: text.clone(),
                source,
            },
        )?;
        Ok(Self { text, matcher })
    }

    /// Lowercased term.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of whole-word, case-insensitive occurrences.
    pub fn count(&self, haystack: &str) -> usize {
        self.matcher.find_iter(haystack).count()
    }
}

/// A compiled category.
#[derive(Debug, Clone)]
pub struct Category {
    pub id: String,
    pub weight: f64,
    pub keywords: Vec<Term>,
    pub aliases: Vec<Term>,
}

/// Ordered, immutable set of categories. Order decides ties.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Validate and compile category definitions.
    pub fn new(defs: Vec<CategoryDef>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(defs.len());

        for def in defs {
            if !seen.insert(def.id.clone()) || def.id == super::FALLBACK_CATEGORY {
                return Err(RegistryError::DuplicateCategory(def.id));
            }
            if !def.weight.is_finite() || def.weight <= 0.0 {
                return Err(RegistryError::InvalidWeight {
                    id: def.id,
                    weight: def.weight,
                });
            }

            let keywords = def
                .keywords
                .iter()
                .map(|k| Term::compile(&def.id, k))
                .collect::<Result<Vec<_>, _>>()?;
            let aliases = def
                .aliases
                .iter()
                .map(|a| Term::compile(&def.id, a))
                .collect::<Result<Vec<_>, _>>()?;

            categories.push(Category {
                id: def.id,
                weight: def.weight,
                keywords,
                aliases,
            });
        }

        Ok(Self { categories })
    }

    /// Registry with the built-in household document categories.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(default_categories())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Whether `id` is a registered category or the fallback bucket.
    pub fn is_known(&self, id: &str) -> bool {
        id == super::FALLBACK_CATEGORY || self.get(id).is_some()
    }

    /// Definitions of every category, in registry order.
    pub fn definitions(&self) -> Vec<CategoryDef> {
        self.categories
            .iter()
            .map(|c| CategoryDef {
                id: c.id.clone(),
                keywords: c.keywords.iter().map(|k| k.as_str().to_string()).collect(),
                aliases: c.aliases.iter().map(|a| a.as_str().to_string()).collect(),
                weight: c.weight,
            })
            .collect()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Built-in category definitions in registry order.
pub fn default_categories() -> Vec<CategoryDef> {
    vec![
        CategoryDef::new(
            "IMU",
            &["imu", "imposta municipale", "comune", "ravvedimento", "f24", "tributi", "ici"],
            &["ici", "imposta comunale"],
        ),
        CategoryDef::new(
            "TARI",
            &["tari", "rifiuti", "tarsu", "tariffa rifiuti", "tassa rifiuti", "igiene urbana"],
            &["tarsu", "tia"],
        ),
        CategoryDef::new(
            "Bollette_Energia",
            &[
                "energia elettrica",
                "enel",
                "eni",
                "edison",
                "acea energia",
                "kw",
                "kwh",
                "bolletta luce",
                "elettrica",
            ],
            &["luce", "corrente elettrica"],
        ),
        CategoryDef::new(
            "Bollette_Gas",
            &["gas", "metano", "smc", "metro cubo", "bolletta gas", "eni gas"],
            &["gas naturale", "metano"],
        ),
        CategoryDef::new(
            "Bollette_Acqua",
            &["acqua", "acea", "acquedotto", "bolletta acqua", "idrico", "servizio idrico"],
            &["idrica", "acquedotto"],
        ),
        CategoryDef::new(
            "Bollette_Telefono",
            &[
                "telefono",
                "telefonia",
                "telecom",
                "tim",
                "vodafone",
                "wind",
                "traffico",
                "linea telefonica",
            ],
            &["cellulare", "fibra"],
        ),
        CategoryDef::new(
            "Contratti",
            &["contratto", "accordo", "clausola", "firma", "locazione", "affitto", "canone"],
            &["accordo", "patto"],
        ),
        CategoryDef::new(
            "Banca",
            &[
                "banca",
                "conto corrente",
                "iban",
                "bonifico",
                "estratto conto",
                "movimento",
                "unicredit",
                "intesa",
            ],
            &["bancario", "finanziario"],
        ),
        CategoryDef::new(
            "Assicurazioni",
            &[
                "assicurazione",
                "polizza",
                "rc auto",
                "kasko",
                "copertura assicurativa",
                "premio",
            ],
            &["polizza", "copertura"],
        ),
    ]
}
