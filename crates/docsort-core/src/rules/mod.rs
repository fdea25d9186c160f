//! Rule-based field extractors for Italian household documents.

pub mod amounts;
pub mod dates;
pub mod fiscal_code;
pub mod hints;
pub mod iban;
pub mod metadata;
pub mod patterns;
pub mod protocol;
pub mod year;

pub use amounts::{AmountExtractor, EuroAmounts, amount_to_f64, extract_amounts, parse_italian_amount};
pub use dates::{DateExtractor, extract_dates};
pub use fiscal_code::{FiscalCodeExtractor, extract_fiscal_codes};
pub use hints::{KNOWN_COMPANIES, detect_hints};
pub use iban::{IbanExtractor, extract_ibans, format_iban, validate_iban};
pub use metadata::{MetadataExtractor, extract_metadata};
pub use protocol::{ProtocolExtractor, extract_protocol_numbers};
pub use year::{current_year, resolve_year};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract all occurrences of the field, in text order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }
}

/// Drop repeated values, keeping the first occurrence of each.
pub(crate) fn dedup<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        assert_eq!(dedup(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn test_extract_first() {
        let first = DateExtractor::new().extract("dal 01/02/2024 al 28/02/2024");
        assert_eq!(first.as_deref(), Some("01/02/2024"));
    }
}
