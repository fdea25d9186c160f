//! Calendar date extraction.

use super::patterns::DATE_DMY;
use super::{FieldExtractor, dedup};

/// Date field extractor producing `D/M/YYYY` strings.
///
/// Day and month are kept as written; dates are not checked against the
/// calendar.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = String;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE_DMY
            .captures_iter(text)
            .map(|caps| format!("{}/{}/{}", &caps[1], &caps[2], expand_year(&caps[3])))
            .collect()
    }
}

/// Extract distinct dates; `None` when there are none.
pub fn extract_dates(text: &str) -> Option<Vec<String>> {
    let dates = dedup(DateExtractor::new().extract_all(text));
    (!dates.is_empty()).then_some(dates)
}

/// Two-digit years are always taken as 20YY.
fn expand_year(year: &str) -> String {
    if year.len() == 2 {
        format!("20{year}")
    } else {
        year.to_string()
    }
}
