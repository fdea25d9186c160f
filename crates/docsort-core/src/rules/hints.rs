//! Structured hint detection for text acquisition stages.

use lazy_static::lazy_static;
use regex::Regex;

use super::amounts::{AmountExtractor, amount_to_f64};
use super::fiscal_code::FiscalCodeExtractor;
use super::iban::IbanExtractor;
use super::patterns::DATE_FULL_YEAR;
use super::{FieldExtractor, dedup};
use crate::models::input::{HintCodes, StructuredHints};

/// Company names recognized as hints.
pub const KNOWN_COMPANIES: &[&str] = &["enel", "eni", "acea", "tim", "vodafone", "wind", "tre"];

lazy_static! {
    static ref COMPANY_WORDS: Vec<(&'static str, Regex)> = KNOWN_COMPANIES
        .iter()
        .map(|name| (*name, Regex::new(&format!(r"(?i)\b{name}\b")).unwrap()))
        .collect();
}

/// Detect hints in freshly acquired text.
pub fn detect_hints(text: &str) -> StructuredHints {
    let amounts = dedup(
        AmountExtractor::new()
            .extract_all(text)
            .into_iter()
            .filter_map(amount_to_f64)
            .collect(),
    );

    let dates = dedup(
        DATE_FULL_YEAR
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect(),
    );

    let codes = HintCodes {
        fiscal_codes: dedup(FiscalCodeExtractor::new().extract_all(text)),
        ibans: dedup(IbanExtractor::new().extract_all(text)),
    };

    let companies = COMPANY_WORDS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(name, _)| name.to_string())
        .collect();

    StructuredHints {
        amounts,
        dates,
        codes,
        companies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_hints() {
        let text = "ENEL Energia S.p.A. - fattura del 03/04/2024\n\
                    Totale da pagare: € 1.234,56\n\
                    Intestatario RSSMRA80A01H501U\n\
                    Addebito su IT60X0542811101000000123456";
        let hints = detect_hints(text);
        assert_eq!(hints.companies, vec!["enel"]);
        assert_eq!(hints.amounts, vec![1234.56]);
        assert_eq!(hints.dates, vec!["03/04/2024"]);
        assert_eq!(hints.codes.fiscal_codes, vec!["RSSMRA80A01H501U"]);
        assert_eq!(hints.codes.ibans, vec!["IT60X0542811101000000123456"]);
    }

    #[test]
    fn test_company_whole_word() {
        // "tre" inside "entrate" is not a company mention
        let hints = detect_hints("Agenzia delle Entrate");
        assert!(hints.companies.is_empty());
    }
}
