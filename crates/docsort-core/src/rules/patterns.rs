//! Common regex patterns for Italian document extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Euro amount after its marker ("€ 45,50", "EUR 1.234,56", "euro 1 234").
    // Numbers are Italian-grouped (1.234,56 / 1 234,56) or plain (45,50 / 45.50).
    pub static ref AMOUNT_AFTER_MARKER: Regex = Regex::new(
        r"(?i)(?:€|\beur(?:o)?\b)\s*(\d{1,3}(?:[ .]\d{3}\b)+(?:,\d{1,2})?|\d+(?:[.,]\d{1,2})?)"
    ).unwrap();

    // Euro amount before its marker ("12,30 €", "2 euro").
    pub static ref AMOUNT_BEFORE_MARKER: Regex = Regex::new(
        r"(?i)\b(\d{1,3}(?:[ .]\d{3}\b)+(?:,\d{1,2})?|\d+(?:[.,]\d{1,2})?)\s*(?:€|\beur(?:o)?\b)"
    ).unwrap();

    // D/M/YYYY, D-M-YY, D.M.YYYY ...
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4}|\d{2})\b"
    ).unwrap();

    // Italian personal tax code (codice fiscale)
    pub static ref FISCAL_CODE: Regex = Regex::new(
        r"\b[A-Z]{6}\d{2}[A-Z]\d{2}[A-Z]\d{3}[A-Z]\b"
    ).unwrap();

    // Italian IBAN: IT + check digits + CIN + ABI/CAB/account, optional single spaces
    pub static ref IBAN_IT: Regex = Regex::new(
        r"\bIT\d{2}\s?[A-Z]\d{3}(?:\s?\d{4}){4}\s?\d{3}\b"
    ).unwrap();

    // Protocol / reference numbers after "n.", "numero" or "prot."
    pub static ref PROTOCOL_NUMBER: Regex = Regex::new(
        r"(?i)(?:\bn\.?\s*|\bnumero\s+|\bprot\.?\s*)(\d{4,})"
    ).unwrap();

    // Year candidates
    pub static ref YEAR: Regex = Regex::new(r"20\d{2}").unwrap();

    // Full-year dates as written, for structured hints
    pub static ref DATE_FULL_YEAR: Regex = Regex::new(
        r"\b\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4}\b"
    ).unwrap();
}

/// Compile every built-in pattern now instead of on first use.
pub fn init() {
    lazy_static::initialize(&AMOUNT_AFTER_MARKER);
    lazy_static::initialize(&AMOUNT_BEFORE_MARKER);
    lazy_static::initialize(&DATE_DMY);
    lazy_static::initialize(&FISCAL_CODE);
    lazy_static::initialize(&IBAN_IT);
    lazy_static::initialize(&PROTOCOL_NUMBER);
    lazy_static::initialize(&YEAR);
    lazy_static::initialize(&DATE_FULL_YEAR);
}
