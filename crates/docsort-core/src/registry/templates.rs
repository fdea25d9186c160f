//! Issuer template table: per-sender indicator phrases and field patterns.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::categories::CategoryRegistry;
use crate::error::RegistryError;

/// Named field pattern in a template definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDef {
    pub name: String,
    pub regex: String,
}

/// Serializable issuer template definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDef {
    pub id: String,
    pub company: String,
    pub category: String,
    pub indicators: Vec<String>,
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<PatternDef>,
    #[serde(default)]
    pub confidence_boost: u32,
}

/// A compiled issuer template.
#[derive(Debug, Clone)]
pub struct IssuerTemplate {
    pub id: String,
    pub company: String,
    pub category: String,
    /// Lowercased indicator phrases.
    pub indicators: Vec<String>,
    /// Lowercased required-field phrases.
    pub required_fields: Vec<String>,
    /// Named patterns in definition order.
    pub patterns: Vec<(String, Regex)>,
    pub confidence_boost: u32,
}

/// Summary of a template registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStats {
    pub total_templates: usize,
    pub categories: Vec<String>,
    pub companies: Vec<String>,
}

/// Ordered, immutable set of issuer templates. Order decides ties.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: Vec<IssuerTemplate>,
}

impl TemplateRegistry {
    /// Validate and compile template definitions against a category registry.
    pub fn new(defs: Vec<TemplateDef>, categories: &CategoryRegistry) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        let mut templates = Vec::with_capacity(defs.len());

        for def in defs {
            if !seen.insert(def.id.clone()) {
                return Err(RegistryError::DuplicateTemplate(def.id));
            }
            if !categories.is_known(&def.category) {
                return Err(RegistryError::UnknownCategory {
                    template: def.id,
                    category: def.category,
                });
            }

            let mut patterns = Vec::with_capacity(def.patterns.len());
            for pattern in &def.patterns {
                let regex = Regex::new(&pattern.regex).map_err(|source| {
                    RegistryError::InvalidPattern {
                        template: def.id.clone(),
                        name: pattern.name.clone(),
                        source,
                    }
                })?;
                patterns.push((pattern.name.clone(), regex));
            }

            templates.push(IssuerTemplate {
                indicators: lowercase_all(&def.indicators),
                required_fields: lowercase_all(&def.required_fields),
                id: def.id,
                company: def.company,
                category: def.category,
                patterns,
                confidence_boost: def.confidence_boost,
            });
        }

        Ok(Self { templates })
    }

    /// Registry with the built-in Italian issuer templates.
    pub fn builtin(categories: &CategoryRegistry) -> Result<Self, RegistryError> {
        Self::new(default_templates(), categories)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IssuerTemplate> {
        self.templates.iter()
    }

    pub fn get(&self, id: &str) -> Option<&IssuerTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template count plus distinct categories and companies, in registry order.
    pub fn stats(&self) -> TemplateStats {
        let mut categories: Vec<String> = Vec::new();
        let mut companies: Vec<String> = Vec::new();
        for template in &self.templates {
            if !categories.contains(&template.category) {
                categories.push(template.category.clone());
            }
            if !companies.contains(&template.company) {
                companies.push(template.company.clone());
            }
        }
        TemplateStats {
            total_templates: self.templates.len(),
            categories,
            companies,
        }
    }
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}

fn template(
    id: &str,
    company: &str,
    category: &str,
    indicators: &[&str],
    required_fields: &[&str],
    patterns: &[(&str, &str)],
    confidence_boost: u32,
) -> TemplateDef {
    TemplateDef {
        id: id.to_string(),
        company: company.to_string(),
        category: category.to_string(),
        indicators: indicators.iter().map(|s| s.to_string()).collect(),
        required_fields: required_fields.iter().map(|s| s.to_string()).collect(),
        patterns: patterns
            .iter()
            .map(|(name, regex)| PatternDef {
                name: name.to_string(),
                regex: regex.to_string(),
            })
            .collect(),
        confidence_boost,
    }
}

const PHONE_PATTERN: &str = r"(\d{3}[\s\-]?\d{3}[\s\-]?\d{4})";

/// Built-in template definitions in registry order.
pub fn default_templates() -> Vec<TemplateDef> {
    vec![
        template(
            "enel",
            "ENEL",
            "Bollette_Energia",
            &["enel", "energia elettrica", "e-distribuzione"],
            &["codice cliente", "kwh", "periodo"],
            &[
                ("amount", r"(?i)totale da pagare[:\s]*€?\s*(\d[\d.,]*)"),
                ("code", r"(?i)codice cliente[:\s]*(\w+)"),
                ("period", r"(?i)periodo[:\s]*dal[:\s]*([\d/]+)[:\s]*al[:\s]*([\d/]+)"),
            ],
            20,
        ),
        template(
            "eni",
            "ENI",
            "Bollette_Gas",
            &["eni", "gas e luce", "eni gas"],
            &["cliente", "smc", "gas"],
            &[
                ("amount", r"(?i)importo totale[:\s]*€?\s*(\d[\d.,]*)"),
                ("consumption", r"(?i)consumo[:\s]*(\d[\d.,]*)\s*smc"),
            ],
            20,
        ),
        template(
            "acea",
            "ACEA",
            "Bollette_Acqua",
            &["acea", "acqua", "servizio idrico"],
            &["utenza", "mc", "acqua"],
            &[
                ("amount", r"(?i)totale[:\s]*€?\s*(\d[\d.,]*)"),
                ("consumption", r"(\d[\d.,]*)\s*mc\b"),
            ],
            20,
        ),
        template(
            "tim",
            "TIM",
            "Bollette_Telefono",
            &["tim", "telecom", "telefono"],
            &["linea", "traffico"],
            &[
                ("amount", r"(?i)totale fattura[:\s]*€?\s*(\d[\d.,]*)"),
                ("phone", PHONE_PATTERN),
            ],
            20,
        ),
        template(
            "imu",
            "Comune",
            "IMU",
            &["imu", "imposta municipale", "tributi", "f24"],
            &["codice tributo", "immobile"],
            &[
                ("amount", r"€\s*(\d[\d.,]*)"),
                ("year", r"(20\d{2})"),
                ("code", r"(?i)codice tributo[:\s]*(\d+)"),
            ],
            25,
        ),
        template(
            "tari",
            "Comune",
            "TARI",
            &["tari", "rifiuti", "tarsu", "tassa rifiuti"],
            &["superficie", "rifiuti"],
            &[
                ("amount", r"€\s*(\d[\d.,]*)"),
                ("surface", r"(?i)superficie[:\s]*(\d[\d.,]*)\s*mq"),
            ],
            25,
        ),
        template(
            "vodafone",
            "VODAFONE",
            "Bollette_Telefono",
            &["vodafone", "mobile", "telefonia"],
            &["numero", "piano"],
            &[
                ("amount", r"(?i)totale[:\s]*€?\s*(\d[\d.,]*)"),
                ("phone", PHONE_PATTERN),
            ],
            20,
        ),
        template(
            "wind",
            "WIND TRE",
            "Bollette_Telefono",
            &["wind", "wind tre", "windtre"],
            &["utenza", "traffico"],
            &[
                ("amount", r"(?i)importo[:\s]*€?\s*(\d[\d.,]*)"),
                ("phone", PHONE_PATTERN),
            ],
            20,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn categories() -> CategoryRegistry {
        CategoryRegistry::builtin().unwrap()
    }

    #[test]
    fn test_builtin_templates_compile() {
        let registry = TemplateRegistry::builtin(&categories()).unwrap();
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.iter().next().map(|t| t.id.as_str()), Some("enel"));
    }

    #[test]
    fn test_stats() {
        let stats = TemplateRegistry::builtin(&categories()).unwrap().stats();
        assert_eq!(stats.total_templates, 8);
        assert_eq!(
            stats.categories,
            vec![
                "Bollette_Energia",
                "Bollette_Gas",
                "Bollette_Acqua",
                "Bollette_Telefono",
                "IMU",
                "TARI"
            ]
        );
        assert_eq!(
            stats.companies,
            vec!["ENEL", "ENI", "ACEA", "TIM", "Comune", "VODAFONE", "WIND TRE"]
        );
    }

    #[test]
    fn test_unknown_category_rejected() {
        let defs = vec![template("x", "X", "Nope", &["x"], &[], &[], 0)];
        assert!(matches!(
            TemplateRegistry::new(defs, &categories()),
            Err(RegistryError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_fallback_category_allowed() {
        let defs = vec![template("x", "X", "Altri_Documenti", &["x"], &[], &[], 0)];
        assert!(TemplateRegistry::new(defs, &categories()).is_ok());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let defs = vec![template("x", "X", "IMU", &["x"], &[], &[("bad", "(unclosed")], 0)];
        match TemplateRegistry::new(defs, &categories()) {
            Err(RegistryError::InvalidPattern { template, name, .. }) => {
                assert_eq!(template, "x");
                assert_eq!(name, "bad");
            }
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_template_rejected() {
        let defs = vec![
            template("x", "X", "IMU", &["x"], &[], &[], 0),
            template("x", "Y", "TARI", &["y"], &[], &[], 0),
        ];
        assert!(matches!(
            TemplateRegistry::new(defs, &categories()),
            Err(RegistryError::DuplicateTemplate(_))
        ));
    }
}
