//! Metadata extraction: every field extractor run over one text.

use tracing::{debug, warn};

use super::amounts::{amount_to_f64, extract_amounts};
use super::dates::extract_dates;
use super::fiscal_code::extract_fiscal_codes;
use super::iban::extract_ibans;
use super::protocol::extract_protocol_numbers;
use crate::models::config::ExtractionConfig;
use crate::models::record::Metadata;

/// Runs the metadata field extractors.
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor {
    validate_iban: bool,
}

impl MetadataExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            validate_iban: config.validate_iban,
        }
    }

    pub fn extract(&self, text: &str) -> Metadata {
        let mut metadata = Metadata::default();

        if let Some(found) = extract_amounts(text) {
            let amounts: Vec<f64> = found.amounts.iter().filter_map(|a| amount_to_f64(*a)).collect();
            if amounts.len() != found.amounts.len() {
                warn!("Dropped {} amounts not representable as f64", found.amounts.len() - amounts.len());
            }
            if !amounts.is_empty() {
                metadata.total_amount = amount_to_f64(found.total);
                metadata.amounts = Some(amounts);
            }
        }

        metadata.dates = extract_dates(text);
        metadata.fiscal_codes = extract_fiscal_codes(text);
        metadata.bank_account_numbers = extract_ibans(text, self.validate_iban);
        metadata.protocol_numbers = extract_protocol_numbers(text);

        debug!(
            "Metadata: {} amounts, {} dates, {} fiscal codes, {} IBANs, {} protocol numbers",
            metadata.amounts.as_ref().map_or(0, Vec::len),
            metadata.dates.as_ref().map_or(0, Vec::len),
            metadata.fiscal_codes.as_ref().map_or(0, Vec::len),
            metadata.bank_account_numbers.as_ref().map_or(0, Vec::len),
            metadata.protocol_numbers.as_ref().map_or(0, Vec::len),
        );

        metadata
    }
}

/// Extract metadata with default settings.
pub fn extract_metadata(text: &str) -> Metadata {
    MetadataExtractor::default().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_totale() {
        let metadata = extract_metadata("Totale € 45,50");
        assert_eq!(metadata.amounts, Some(vec![45.5]));
        assert_eq!(metadata.total_amount, Some(45.5));
        assert_eq!(metadata.dates, None);
        assert_eq!(metadata.protocol_numbers, None);
    }

    #[test]
    fn test_due_date_next_to_amount() {
        let metadata = extract_metadata("Scadenza 16/06/2024 € 120,00");
        assert_eq!(metadata.amounts, Some(vec![120.0]));
        assert_eq!(metadata.total_amount, Some(120.0));
        assert_eq!(metadata.dates, Some(vec!["16/06/2024".to_string()]));

        let metadata = extract_metadata("Totale € 1 234,56");
        assert_eq!(metadata.amounts, Some(vec![1234.56]));
    }

    #[test]
    fn test_empty_text() {
        let metadata = extract_metadata("");
        assert!(metadata.is_empty());
        assert_eq!(metadata.total_amount, None);
    }

    #[test]
    fn test_full_document() {
        let text = "Avviso di pagamento prot. 2024001\n\
                    Contribuente RSSMRA80A01H501U\n\
                    Scadenza 16/06/2024 - importo € 120,00 e € 80,50\n\
                    IBAN IT60X0542811101000000123456";
        let metadata = extract_metadata(text);
        assert_eq!(metadata.amounts, Some(vec![120.0, 80.5]));
        assert_eq!(metadata.total_amount, Some(200.5));
        assert_eq!(metadata.dates, Some(vec!["16/06/2024".to_string()]));
        assert_eq!(metadata.fiscal_codes, Some(vec!["RSSMRA80A01H501U".to_string()]));
        assert_eq!(
            metadata.bank_account_numbers,
            Some(vec!["IT60X0542811101000000123456".to_string()])
        );
        assert_eq!(metadata.protocol_numbers, Some(vec!["2024001".to_string()]));
    }

    #[test]
    fn test_iban_validation_setting() {
        let extractor = MetadataExtractor::new(&ExtractionConfig { validate_iban: true });
        let metadata = extractor.extract("IBAN IT61X0542811101000000123456");
        assert_eq!(metadata.bank_account_numbers, None);
    }
}
