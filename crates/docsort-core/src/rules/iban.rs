//! Italian IBAN extraction and validation.

use super::patterns::IBAN_IT;
use super::{FieldExtractor, dedup};

/// IBAN field extractor.
pub struct IbanExtractor {
    validate: bool,
}

impl IbanExtractor {
    /// Create a new IBAN extractor that does not check checksums.
    pub fn new() -> Self {
        Self { validate: false }
    }

    /// Set whether to drop matches failing the mod-97 checksum.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

impl Default for IbanExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for IbanExtractor {
    type Output = String;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        IBAN_IT
            .find_iter(text)
            .map(|m| compact(m.as_str()))
            .filter(|iban| !self.validate || validate_iban(iban))
            .collect()
    }
}

/// Extract distinct IBANs without whitespace; `None` when there are none.
pub fn extract_ibans(text: &str, validate: bool) -> Option<Vec<String>> {
    let ibans = dedup(IbanExtractor::new().with_validation(validate).extract_all(text));
    (!ibans.is_empty()).then_some(ibans)
}

fn compact(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Validate an IBAN using the checksum algorithm.
///
/// Algorithm:
/// 1. Move first 4 characters to the end
/// 2. Replace letters with numbers (A=10, B=11, ..., Z=35)
/// 3. The resulting number mod 97 should equal 1
pub fn validate_iban(iban: &str) -> bool {
    let iban = compact(iban).to_uppercase();

    if iban.len() < 5 || !iban.is_ascii() {
        return false;
    }

    let (head, rest) = iban.split_at(4);
    if !head[..2].chars().all(|c| c.is_ascii_alphabetic())
        || !head[2..].chars().all(|c| c.is_ascii_digit())
    {
        return false;
    }

    let mut remainder: u32 = 0;
    for c in rest.chars().chain(head.chars()) {
        let value = match c {
            '0'..='9' => c as u32 - '0' as u32,
            'A'..='Z' => c as u32 - 'A' as u32 + 10,
            _ => return false,
        };
        // letters expand to two digits
        remainder = if value >= 10 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }

    remainder == 1
}

/// Format IBAN in groups of 4 characters.
pub fn format_iban(iban: &str) -> String {
    compact(iban)
        .chars()
        .collect::<Vec<char>>()
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<String>>()
        .join(" ")
}
