//! Document year resolution.

use chrono::Datelike;

use super::patterns::YEAR;

/// Current calendar year from the local clock.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Most recent plausible year mentioned in the text or filename.
///
/// Candidates are every `20xx` run in `text` and `filename`, limited to
/// `2000..=current_year + 1`. Falls back to `current_year`.
pub fn resolve_year(text: &str, filename: &str, current_year: i32) -> String {
    let sources = format!("{text} {filename}");

    YEAR.find_iter(&sources)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .filter(|year| (2000..=current_year + 1).contains(year))
        .max()
        .unwrap_or(current_year)
        .to_string()
}
