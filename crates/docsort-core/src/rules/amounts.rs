//! Euro amount extraction.

use std::ops::Range;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use super::patterns::{AMOUNT_AFTER_MARKER, AMOUNT_BEFORE_MARKER};
use super::{FieldExtractor, dedup};

/// Euro amount extractor.
///
/// Numbers following a marker are taken first; a number written before its
/// marker only counts when neither span was already used and the number is
/// not the tail of a date.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = Decimal;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut found: Vec<(Range<usize>, &str)> = AMOUNT_AFTER_MARKER
            .captures_iter(text)
            .filter_map(|caps| Some((caps.get(0)?.range(), caps.get(1)?.as_str())))
            .collect();

        for caps in AMOUNT_BEFORE_MARKER.captures_iter(text) {
            let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let span = whole.range();
            if found.iter().any(|(used, _)| overlaps(used, &span)) {
                continue;
            }
            if ends_with_date_separator(&text[..number.start()]) {
                debug!("Skipping date fragment {:?} before euro marker", number.as_str());
                continue;
            }
            found.push((span, number.as_str()));
        }

        found.sort_by_key(|(span, _)| span.start);

        let mut results = Vec::new();
        for (_, raw) in found {
            match parse_italian_amount(raw) {
                Some(amount) => results.push(amount),
                None => debug!("Skipping unparsable amount {:?}", raw),
            }
        }

        results
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// `16/06/` or `1-2-` right before a number: the number is a date's year.
fn ends_with_date_separator(prefix: &str) -> bool {
    let mut tail = prefix.chars().rev();
    matches!(
        (tail.next(), tail.next()),
        (Some('/' | '-' | '.'), Some(d)) if d.is_ascii_digit()
    )
}

/// Amounts found in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct EuroAmounts {
    /// Distinct amounts, first-seen order.
    pub amounts: Vec<Decimal>,
    /// Exact sum of `amounts`.
    pub total: Decimal,
}

/// Extract euro amounts; `None` when there are none.
pub fn extract_amounts(text: &str) -> Option<EuroAmounts> {
    let amounts = dedup(AmountExtractor::new().extract_all(text));
    if amounts.is_empty() {
        return None;
    }
    let total = amounts.iter().copied().sum();
    Some(EuroAmounts { amounts, total })
}

/// Parse an Italian-formatted amount ("1.234,56", "45,50", "45.50", "1 234,56").
///
/// A lone `.` followed by exactly three digits is a thousands separator.
pub fn parse_italian_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // 1.234,56
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        // 1,234.56
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        // 45,50
        (Some(_), None) => cleaned.replace(',', "."),
        // 1.234 or 1.234.567 vs 45.50
        (None, Some(_)) if is_dot_grouped(&cleaned) => cleaned.replace('.', ""),
        _ => cleaned,
    };

    Decimal::from_str(&normalized).ok()
}

/// Decimal to the nearest `f64`, going through the decimal string form.
pub fn amount_to_f64(amount: Decimal) -> Option<f64> {
    amount.to_string().parse().ok()
}

fn is_dot_grouped(s: &str) -> bool {
    let mut groups = s.split('.');
    let head_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()));
    head_ok && groups.all(|g| g.len() == 3)
}
