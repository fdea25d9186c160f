//! Protocol and reference number extraction.

use super::patterns::PROTOCOL_NUMBER;
use super::{FieldExtractor, dedup};

/// Extracts digit runs (4+) following "n.", "numero" or "prot.".
pub struct ProtocolExtractor;

impl ProtocolExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProtocolExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ProtocolExtractor {
    type Output = String;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        PROTOCOL_NUMBER
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .collect()
    }
}

/// Extract distinct protocol numbers; `None` when there are none.
pub fn extract_protocol_numbers(text: &str) -> Option<Vec<String>> {
    let numbers = dedup(ProtocolExtractor::new().extract_all(text));
    (!numbers.is_empty()).then_some(numbers)
}
