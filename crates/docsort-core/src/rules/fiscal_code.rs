//! Italian fiscal code (codice fiscale) extraction.

use super::patterns::FISCAL_CODE;
use super::{FieldExtractor, dedup};

/// Fiscal code extractor. Matches the personal 16-character layout only.
pub struct FiscalCodeExtractor;

impl FiscalCodeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FiscalCodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for FiscalCodeExtractor {
    type Output = String;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        FISCAL_CODE
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Extract distinct fiscal codes; `None` when there are none.
pub fn extract_fiscal_codes(text: &str) -> Option<Vec<String>> {
    let codes = dedup(FiscalCodeExtractor::new().extract_all(text));
    (!codes.is_empty()).then_some(codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_fiscal_code() {
        let text = "Intestatario: Mario Rossi C.F. RSSMRA80A01H501U, coobbligato RSSMRA80A01H501U";
        assert_eq!(
            extract_fiscal_codes(text),
            Some(vec!["RSSMRA80A01H501U".to_string()])
        );
    }

    #[test]
    fn test_lowercase_not_matched() {
        assert_eq!(extract_fiscal_codes("rssmra80a01h501u"), None);
    }

    #[test]
    fn test_embedded_in_longer_token_not_matched() {
        assert_eq!(extract_fiscal_codes("XRSSMRA80A01H501U"), None);
    }
}
