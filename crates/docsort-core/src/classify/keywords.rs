//! Keyword and alias scoring against the category registry.

use std::sync::Arc;

use tracing::debug;

use crate::models::config::ClassificationConfig;
use crate::models::record::ClassificationResult;
use crate::registry::{Category, CategoryRegistry, FALLBACK_CATEGORY};

/// Score of one category for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScore {
    pub category: String,
    pub score: f64,
    pub matched: Vec<String>,
}

/// Weighted whole-word keyword classifier.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    registry: Arc<CategoryRegistry>,
    config: ClassificationConfig,
}

impl KeywordClassifier {
    pub fn new(registry: Arc<CategoryRegistry>, config: ClassificationConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Scores for every category, in registry order.
    pub fn score_all(&self, text: &str, filename: &str) -> Vec<CategoryScore> {
        self.registry
            .iter()
            .map(|category| self.score_category(category, text, filename))
            .collect()
    }

    /// Pick the best category and compute its confidence.
    pub fn classify(&self, text: &str, filename: &str) -> ClassificationResult {
        let mut best: Option<CategoryScore> = None;
        for candidate in self.score_all(text, filename) {
            let best_score = best.as_ref().map_or(0.0, |b| b.score);
            if candidate.score > best_score {
                best = Some(candidate);
            }
        }

        let (category, score, matched_keywords) = match best {
            Some(best) => (best.category, best.score, best.matched),
            None => (FALLBACK_CATEGORY.to_string(), 0.0, Vec::new()),
        };
        let confidence = self.confidence(score, &matched_keywords, filename);

        debug!(
            "Keyword classification: {} (score {:.2}, confidence {}%, {} keywords)",
            category,
            score,
            confidence,
            matched_keywords.len()
        );

        ClassificationResult {
            category,
            confidence,
            score,
            matched_keywords,
        }
    }

    fn score_category(&self, category: &Category, text: &str, filename: &str) -> CategoryScore {
        let weight = category.weight;
        let mut score = 0.0;
        let mut matched: Vec<String> = Vec::new();

        let passes = [
            (&category.keywords, 1.0, self.config.filename_keyword_multiplier),
            (
                &category.aliases,
                self.config.text_alias_multiplier,
                self.config.filename_alias_multiplier,
            ),
        ];

        for (terms, text_multiplier, filename_multiplier) in passes {
            for term in terms {
                let in_text = term.count(text);
                let in_filename = term.count(filename);
                if in_text == 0 && in_filename == 0 {
                    continue;
                }
                score += in_text as f64 * text_multiplier * weight
                    + in_filename as f64 * filename_multiplier * weight;
                if !matched.iter().any(|m| m == term.as_str()) {
                    matched.push(term.as_str().to_string());
                }
            }
        }

        CategoryScore {
            category: category.id.clone(),
            score,
            matched,
        }
    }

    /// Map a raw score to a percentage, then apply the filename bonus.
    ///
    /// The bonus only applies below `filename_boost_below`, so with the
    /// default settings the result never exceeds the ceiling; it is still
    /// clamped so custom settings cannot push it past `max_confidence`.
    fn confidence(&self, score: f64, matched: &[String], filename: &str) -> u8 {
        let min = f64::from(self.config.min_confidence);
        let max = f64::from(self.config.max_confidence);
        let mut confidence = (score * self.config.confidence_per_point).max(min).min(max);

        let filename = filename.to_lowercase();
        let in_filename = matched.iter().any(|k| filename.contains(k.as_str()));
        if in_filename && confidence < f64::from(self.config.filename_boost_below) {
            confidence += f64::from(self.config.filename_boost);
        }

        confidence.round().min(max) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CategoryDef;
    use pretty_assertions::assert_eq;

    fn classifier() -> KeywordClassifier {
        KeywordClassifier::new(
            Arc::new(CategoryRegistry::builtin().unwrap()),
            ClassificationConfig::default(),
        )
    }

    #[test]
    fn test_imu_whole_word() {
        let result = classifier().classify("IMU 2023", "");
        assert_eq!(result.category, "IMU");
        assert_eq!(result.matched_keywords, vec!["imu"]);
        // score 1 * 12 is below the floor
        assert_eq!(result.confidence, 25);
    }

    #[test]
    fn test_substring_does_not_match() {
        let result = classifier().classify("animu", "");
        assert_eq!(result.category, FALLBACK_CATEGORY);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn test_empty_input_is_fallback_at_floor() {
        let result = classifier().classify("", "");
        assert_eq!(result.category, FALLBACK_CATEGORY);
        assert_eq!(result.confidence, 25);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_score_formula() {
        // text: rifiuti x2, tari x1; filename: tari x1; alias tarsu in text x1
        let text = "Avviso TARI - tassa sui rifiuti, rifiuti urbani, ex tarsu";
        // "_" is a word character, so a dash keeps "tari" a separate word
        let scores = classifier().score_all(text, "avviso-tari.pdf");
        let tari = scores.iter().find(|s| s.category == "TARI").unwrap();
        // keywords: tari 1 + 4, rifiuti 2, tarsu 1; alias tarsu 0.8
        assert!((tari.score - 8.8).abs() < 1e-9);
        assert_eq!(tari.matched, vec!["tari", "rifiuti", "tarsu"]);
    }

    #[test]
    fn test_filename_boost() {
        // keyword hit in filename: 4 points -> 48, plus 10 -> 58
        let result = classifier().classify("", "contratto.pdf");
        assert_eq!(result.category, "Contratti");
        assert_eq!(result.confidence, 58);
    }

    #[test]
    fn test_no_boost_at_or_above_threshold() {
        // keyword 2 * 4 plus alias 2 * 3 -> far above the ceiling, bonus skipped
        let result = classifier().classify("", "polizza polizza.pdf");
        assert_eq!(result.category, "Assicurazioni");
        assert_eq!(result.confidence, 95);
    }

    #[test]
    fn test_confidence_bounds() {
        let text = "banca ".repeat(50);
        let result = classifier().classify(&text, "banca.pdf");
        assert_eq!(result.confidence, 95);
    }

    #[test]
    fn test_confidence_stays_in_range() {
        let cases: Vec<(String, &str)> = vec![
            (String::new(), ""),
            (String::new(), "scan_0001.jpg"),
            ("imu".to_string(), ""),
            (String::new(), "imu.pdf"),
            ("bolletta".to_string(), "bolletta.pdf"),
            ("contratto contratto".to_string(), "affitto.pdf"),
            ("banca ".repeat(3), "banca.pdf"),
            ("fattura bolletta enel luce energia elettrica kwh".to_string(), "bolletta_enel.pdf"),
            ("assicurazione polizza premio ".repeat(40), "polizza.pdf"),
            ("tari rifiuti ".repeat(500), "tari tari tari.pdf"),
        ];
        let classifier = classifier();
        for (text, filename) in &cases {
            let confidence = classifier.classify(text, filename).confidence;
            assert!(
                (25..=95).contains(&confidence),
                "{confidence} out of range for {text:?} / {filename:?}"
            );
        }
    }

    #[test]
    fn test_boost_at_threshold_edge() {
        // score 7 -> 84, just under 85, so the boost still applies
        let registry = CategoryRegistry::new(vec![CategoryDef {
            id: "Prova".to_string(),
            keywords: vec!["alfa".to_string()],
            aliases: vec![],
            weight: 1.0,
        }])
        .unwrap();
        let classifier = KeywordClassifier::new(Arc::new(registry), ClassificationConfig::default());
        let result = classifier.classify("alfa alfa alfa", "alfa.pdf");
        assert_eq!(result.score, 7.0);
        assert_eq!(result.confidence, 94);
    }

    #[test]
    fn test_tie_keeps_registry_order() {
        let registry = CategoryRegistry::new(vec![
            CategoryDef {
                id: "Primo".to_string(),
                keywords: vec!["alfa".to_string()],
                aliases: vec![],
                weight: 1.0,
            },
            CategoryDef {
                id: "Secondo".to_string(),
                keywords: vec!["beta".to_string()],
                aliases: vec![],
                weight: 1.0,
            },
        ])
        .unwrap();
        let classifier = KeywordClassifier::new(Arc::new(registry), ClassificationConfig::default());
        assert_eq!(classifier.classify("beta alfa", "").category, "Primo");
    }

    #[test]
    fn test_weight_scales_score() {
        let registry = CategoryRegistry::new(vec![
            CategoryDef {
                id: "Leggero".to_string(),
                keywords: vec!["avviso".to_string()],
                aliases: vec![],
                weight: 1.0,
            },
            CategoryDef {
                id: "Pesante".to_string(),
                keywords: vec!["avviso".to_string()],
                aliases: vec![],
                weight: 2.0,
            },
        ])
        .unwrap();
        let classifier = KeywordClassifier::new(Arc::new(registry), ClassificationConfig::default());
        let result = classifier.classify("avviso", "");
        assert_eq!(result.category, "Pesante");
        assert_eq!(result.score, 2.0);
    }

    #[test]
    fn test_custom_ceiling_caps_boost() {
        let config = ClassificationConfig {
            filename_boost: 80,
            filename_boost_below: 100,
            ..ClassificationConfig::default()
        };
        let classifier =
            KeywordClassifier::new(Arc::new(CategoryRegistry::builtin().unwrap()), config);
        assert_eq!(classifier.classify("", "contratto.pdf").confidence, 95);
    }
}
