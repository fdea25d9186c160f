//! Issuer template scoring and field extraction.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::models::config::TemplateConfig;
use crate::models::input::StructuredHints;
use crate::models::record::TemplateMatch;
use crate::registry::{IssuerTemplate, TemplateRegistry};

/// Raw score of one template before threshold selection.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateScore {
    pub template_id: String,
    pub score: u32,
    pub matched_indicators: Vec<String>,
    pub matched_fields: Vec<String>,
    pub extracted_values: BTreeMap<String, String>,
}

/// Matches documents against known issuer templates.
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    registry: Arc<TemplateRegistry>,
    config: TemplateConfig,
}

impl TemplateMatcher {
    pub fn new(registry: Arc<TemplateRegistry>, config: TemplateConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Best template scoring at least `min_score`, if any.
    pub fn match_template(
        &self,
        text: &str,
        filename: &str,
        hints: Option<&StructuredHints>,
    ) -> Option<TemplateMatch> {
        let lower_text = text.to_lowercase();
        let lower_filename = filename.to_lowercase();

        let mut best: Option<(&IssuerTemplate, TemplateScore)> = None;
        for template in self.registry.iter() {
            let candidate = self.score(template, text, &lower_text, &lower_filename, hints);
            let best_score = best.as_ref().map_or(0, |(_, b)| b.score);
            if candidate.score > best_score && candidate.score >= self.config.min_score {
                best = Some((template, candidate));
            }
        }

        let (template, scored) = best?;
        let confidence = template_confidence(
            scored.score,
            template.confidence_boost,
            self.config.max_confidence,
        );

        debug!(
            "Template match: {} ({}) score {}, confidence {}%",
            template.id, template.company, scored.score, confidence
        );

        Some(TemplateMatch {
            template_id: scored.template_id,
            company: template.company.clone(),
            category: template.category.clone(),
            score: scored.score,
            confidence,
            matched_indicators: scored.matched_indicators,
            matched_fields: scored.matched_fields,
            extracted_values: scored.extracted_values,
        })
    }

    /// Scores for every template, in registry order, without thresholding.
    pub fn score_all(
        &self,
        text: &str,
        filename: &str,
        hints: Option<&StructuredHints>,
    ) -> Vec<TemplateScore> {
        let lower_text = text.to_lowercase();
        let lower_filename = filename.to_lowercase();
        self.registry
            .iter()
            .map(|t| self.score(t, text, &lower_text, &lower_filename, hints))
            .collect()
    }

    fn score(
        &self,
        template: &IssuerTemplate,
        text: &str,
        lower_text: &str,
        lower_filename: &str,
        hints: Option<&StructuredHints>,
    ) -> TemplateScore {
        let mut score = 0;

        let matched_indicators: Vec<String> = template
            .indicators
            .iter()
            .filter(|i| lower_text.contains(i.as_str()) || lower_filename.contains(i.as_str()))
            .cloned()
            .collect();
        score += matched_indicators.len() as u32 * self.config.indicator_points;

        let matched_fields: Vec<String> = template
            .required_fields
            .iter()
            .filter(|f| lower_text.contains(f.as_str()))
            .cloned()
            .collect();
        score += matched_fields.len() as u32 * self.config.required_field_points;

        let mut extracted_values = BTreeMap::new();
        for (name, pattern) in &template.patterns {
            if let Some(caps) = pattern.captures(text) {
                if let Some(value) = caps.get(1).or_else(|| caps.get(0)) {
                    extracted_values.insert(name.clone(), value.as_str().to_string());
                }
                score += self.config.pattern_points;
            }
        }

        if hints.is_some_and(|h| h.has_company(&template.company)) {
            score += template.confidence_boost;
        }

        TemplateScore {
            template_id: template.id.clone(),
            score,
            matched_indicators,
            matched_fields,
            extracted_values,
        }
    }
}

/// Confidence of a selected template: `min(max, score + boost)`.
///
/// When the company hint matched, `score` already contains the boost, so the
/// boost is counted twice. Kept as is; any change belongs here.
pub fn template_confidence(score: u32, confidence_boost: u32, max_confidence: u8) -> u8 {
    score
        .saturating_add(confidence_boost)
        .min(u32::from(max_confidence)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{CategoryRegistry, PatternDef, TemplateDef};
    use pretty_assertions::assert_eq;

    fn matcher() -> TemplateMatcher {
        let categories = CategoryRegistry::builtin().unwrap();
        TemplateMatcher::new(
            Arc::new(TemplateRegistry::builtin(&categories).unwrap()),
            TemplateConfig::default(),
        )
    }

    #[test]
    fn test_enel_match() {
        let text = "ENEL Energia - fornitura di energia elettrica\nCodice cliente 12345";
        let m = matcher().match_template(text, "bolletta.pdf", None).unwrap();
        assert_eq!(m.template_id, "enel");
        assert_eq!(m.company, "ENEL");
        assert_eq!(m.category, "Bollette_Energia");
        // 2 indicators + 1 required field + code pattern
        assert_eq!(m.score, 33);
        assert_eq!(m.confidence, 53);
        assert_eq!(m.matched_indicators, vec!["enel", "energia elettrica"]);
        assert_eq!(m.matched_fields, vec!["codice cliente"]);
        assert_eq!(m.extracted_values.get("code").map(String::as_str), Some("12345"));
    }

    #[test]
    fn test_below_threshold_is_none() {
        // a single indicator is worth 10
        assert!(matcher().match_template("Spett.le cliente ACEA", "", None).is_none());
    }

    #[test]
    fn test_indicator_in_filename() {
        let m = matcher()
            .match_template("fornitura di energia elettrica", "enel_2024.pdf", None)
            .unwrap();
        assert_eq!(m.template_id, "enel");
        assert_eq!(m.score, 20);
    }

    #[test]
    fn test_company_hint_boost_counts_twice() {
        let hints = StructuredHints {
            companies: vec!["acea".to_string()],
            ..Default::default()
        };
        let text = "ACEA Ato 2 - servizio idrico";
        let m = matcher().match_template(text, "", Some(&hints)).unwrap();
        assert_eq!(m.template_id, "acea");
        // indicators acea + servizio idrico = 20, hint boost 20
        assert_eq!(m.score, 40);
        assert_eq!(m.confidence, 60);
    }

    #[test]
    fn test_confidence_capped() {
        assert_eq!(template_confidence(90, 25, 95), 95);
        assert_eq!(template_confidence(15, 20, 95), 35);
        assert_eq!(template_confidence(u32::MAX, 25, 95), 95);
    }

    const FULL_ENEL: &str = "ENEL Energia elettrica - rete e-distribuzione\n\
        Codice cliente 12345\n\
        Periodo dal 01/01/2024 al 31/01/2024\n\
        Consumo 230 kWh\n\
        Totale da pagare: € 87,40";

    #[test]
    fn test_full_template_without_hint() {
        let m = matcher().match_template(FULL_ENEL, "", None).unwrap();
        // 3 indicators, 3 fields, 3 patterns
        assert_eq!(m.score, 69);
        assert_eq!(m.confidence, 89);
    }

    #[test]
    fn test_hinted_template_hits_ceiling() {
        let hints = StructuredHints {
            companies: vec!["enel".to_string()],
            ..Default::default()
        };
        let m = matcher()
            .match_template(FULL_ENEL, "bolletta_enel.pdf", Some(&hints))
            .unwrap();
        assert_eq!(m.template_id, "enel");
        assert_eq!(m.score, 89);
        assert_eq!(m.confidence, 95);
    }

    #[test]
    fn test_confidence_stays_in_range() {
        let hinted = StructuredHints {
            companies: vec![
                "enel".to_string(),
                "acea".to_string(),
                "tim".to_string(),
                "comune".to_string(),
            ],
            ..Default::default()
        };
        let texts = [
            "",
            "ACEA",
            "ACEA Ato 2 - servizio idrico",
            "TIM telecom italia linea fissa",
            "tributi f24 tari tarsu imu",
            FULL_ENEL,
            "enel energia elettrica e-distribuzione codice cliente kwh periodo ",
        ];
        let matcher = matcher();
        for text in texts {
            for hints in [None, Some(&hinted)] {
                let repeated = text.repeat(20);
                for candidate in [text, repeated.as_str()] {
                    if let Some(m) = matcher.match_template(candidate, "enel_acea_tim.pdf", hints) {
                        assert!(m.confidence <= 95, "{} for {candidate:?}", m.confidence);
                        assert!(m.score >= 15);
                    }
                }
            }
        }
        for score in [0, 14, 15, 60, 75, 76, 200, u32::MAX] {
            for boost in [0, 10, 20, 25] {
                assert!(template_confidence(score, boost, 95) <= 95);
            }
        }
    }

    #[test]
    fn test_group_one_or_whole_match() {
        let categories = CategoryRegistry::builtin().unwrap();
        let defs = vec![TemplateDef {
            id: "poste".to_string(),
            company: "Poste Italiane".to_string(),
            category: "Banca".to_string(),
            indicators: vec!["poste italiane".to_string()],
            required_fields: vec![],
            patterns: vec![
                PatternDef {
                    name: "whole".to_string(),
                    regex: r"BancoPosta".to_string(),
                },
                PatternDef {
                    name: "account".to_string(),
                    regex: r"conto n\. (\d+)".to_string(),
                },
            ],
            confidence_boost: 10,
        }];
        let matcher = TemplateMatcher::new(
            Arc::new(TemplateRegistry::new(defs, &categories).unwrap()),
            TemplateConfig::default(),
        );
        let m = matcher
            .match_template("Poste Italiane BancoPosta conto n. 001234", "", None)
            .unwrap();
        assert_eq!(m.extracted_values.get("whole").map(String::as_str), Some("BancoPosta"));
        assert_eq!(m.extracted_values.get("account").map(String::as_str), Some("001234"));
        assert_eq!(m.score, 26);
    }

    #[test]
    fn test_tie_keeps_registry_order() {
        // imu and tari both reach 20 from indicators alone
        let text = "tributi f24 tari tarsu";
        let m = matcher().match_template(text, "", None).unwrap();
        assert_eq!(m.template_id, "imu");
    }
}
