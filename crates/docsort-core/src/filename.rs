//! Text derived from file names, and excerpt cleanup.

use lazy_static::lazy_static;
use regex::Regex;

/// Trigger words and the synonyms appended when they occur in filename text.
pub const KEYWORD_EXPANSIONS: &[(&str, &str)] = &[
    ("bolletta", "bolletta fattura documento pagamento"),
    ("fattura", "fattura bolletta documento commerciale"),
    ("enel", "enel energia elettrica bolletta luce"),
    ("eni", "eni gas bolletta metano"),
    ("acea", "acea acqua bolletta idrico"),
    ("telecom", "telecom tim telefono bolletta"),
    ("tim", "tim telecom telefono bolletta"),
    ("wind", "wind tre telefono bolletta"),
    ("vodafone", "vodafone telefono bolletta"),
    ("contratto", "contratto accordo documento legale"),
    ("affitto", "contratto locazione affitto canone"),
    ("locazione", "contratto locazione affitto immobile"),
    ("mutuo", "banca mutuo finanziamento prestito"),
    ("prestito", "banca prestito finanziamento credito"),
    ("estratto", "banca estratto conto movimento"),
    ("bonifico", "banca bonifico pagamento trasferimento"),
    ("imu", "imu imposta municipale tasse tributi"),
    ("tari", "tari rifiuti tasse tarsu"),
    ("tassa", "tassa imposta tributo pagamento"),
    ("f24", "f24 tasse pagamento modello"),
    ("ricevuta", "ricevuta pagamento quietanza"),
    ("polizza", "assicurazione polizza copertura"),
    ("assicurazione", "assicurazione polizza protezione"),
    ("rc", "assicurazione rc auto responsabilità civile"),
    ("kasko", "assicurazione kasko auto copertura"),
];

lazy_static! {
    // `+` through `=` in ASCII keeps dates, paths and `<`.
    static ref EXCERPT_DISALLOWED: Regex =
        Regex::new(r"[^\w\s\u{00C0}-\u{017F}!?()€$%&+,\-./:;<=]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Build pseudo-text from a file name for documents without extracted text.
///
/// `filename` may carry an extension; `parent_dir` is the name of the
/// directory holding the file. The parent is skipped when it is `.` or
/// equal to `inbox_folder`.
pub fn filename_text(filename: &str, parent_dir: Option<&str>, inbox_folder: &str) -> String {
    let stem = match filename.rfind('.') {
        Some(pos) if pos > 0 => &filename[..pos],
        _ => filename,
    };

    let mut text = split_words(&stem.to_lowercase());

    if let Some(parent) = parent_dir.map(str::to_lowercase) {
        let parent = parent.trim();
        if !parent.is_empty() && parent != "." && parent != inbox_folder.to_lowercase() {
            let parent = parent.replace(['-', '_'], " ");
            text.push(' ');
            text.push_str(parent.trim());
        }
    }

    // triggers are checked against the text before any expansion
    let base = text.clone();
    for (trigger, expansion) in KEYWORD_EXPANSIONS {
        if base.contains(trigger) {
            text.push(' ');
            text.push_str(expansion);
        }
    }

    text.trim().to_string()
}

/// Separate words, letter/digit boundaries and digit groups with single spaces.
fn split_words(stem: &str) -> String {
    let mut pieces: Vec<String> = Vec::new();

    for word in stem.split(|c: char| c.is_whitespace() || c == '-' || c == '_') {
        let mut current = String::new();
        let mut current_digits = false;

        for c in word.chars() {
            let is_digit = c.is_ascii_digit();
            if !current.is_empty() && is_digit != current_digits {
                push_piece(&mut pieces, &current, current_digits);
                current.clear();
            }
            current_digits = is_digit;
            current.push(c);
        }
        if !current.is_empty() {
            push_piece(&mut pieces, &current, current_digits);
        }
    }

    pieces.join(" ")
}

fn push_piece(pieces: &mut Vec<String>, piece: &str, digits: bool) {
    if !digits {
        pieces.push(piece.to_string());
        return;
    }
    // DDMMYYYY
    if piece.len() == 8 {
        pieces.push(format!("{}/{}/{}", &piece[..2], &piece[2..4], &piece[4..]));
        return;
    }
    if piece.len() > 4 {
        let mut rest = piece;
        while rest.len() > 4 {
            pieces.push(rest[..4].to_string());
            rest = &rest[4..];
        }
        pieces.push(rest.to_string());
        return;
    }
    pieces.push(piece.to_string());
}

/// Clean text for display and cut it to `max_chars` characters.
///
/// `...` is appended when the raw text is longer than the limit.
pub fn sanitize_excerpt(text: &str, max_chars: usize) -> String {
    let cleaned = EXCERPT_DISALLOWED.replace_all(text, " ");
    let cleaned = WHITESPACE.replace_all(&cleaned, " ");
    let mut excerpt: String = cleaned.trim().chars().take(max_chars).collect();

    if text.chars().count() > max_chars {
        excerpt.push_str("...");
    }
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INBOX: &str = "documentstoorganize";

    #[test]
    fn test_filename_words_and_date() {
        let text = filename_text("Scansione_15012024.jpg", None, INBOX);
        assert_eq!(text, "scansione 15/01/2024");
    }

    #[test]
    fn test_letter_digit_split() {
        let text = filename_text("scan2023-foto.png", None, INBOX);
        assert_eq!(text, "scan 2023 foto");
    }

    #[test]
    fn test_long_digit_run_grouped() {
        let text = filename_text("doc_123456.png", None, INBOX);
        assert_eq!(text, "doc 1234 56");
    }

    #[test]
    fn test_expansions() {
        let text = filename_text("bolletta-enel-2024.jpg", None, INBOX);
        assert_eq!(
            text,
            "bolletta enel 2024 \
             bolletta fattura documento pagamento \
             enel energia elettrica bolletta luce"
        );
    }

    #[test]
    fn test_parent_dir_appended() {
        let text = filename_text("IMG_0001.jpg", Some("Spese-Casa"), INBOX);
        assert_eq!(text, "img 0001 spese casa");
    }

    #[test]
    fn test_inbox_and_dot_skipped() {
        assert_eq!(filename_text("foto.jpg", Some("DocumentsToOrganize"), INBOX), "foto");
        assert_eq!(filename_text("foto.jpg", Some("."), INBOX), "foto");
    }

    #[test]
    fn test_expansion_is_substring_based() {
        let text = filename_text("ricerca.pdf", None, INBOX);
        assert!(text.ends_with("assicurazione rc auto responsabilità civile"));
    }

    #[test]
    fn test_sanitize_excerpt() {
        assert_eq!(sanitize_excerpt("Totale:\t€ 45,50 <b>", 500), "Totale: € 45,50 <b");
        assert_eq!(sanitize_excerpt("Città  più   già", 500), "Città più già");
    }

    #[test]
    fn test_sanitize_excerpt_keeps_dates_and_separators() {
        assert_eq!(sanitize_excerpt("Scadenza 16/06/2024", 500), "Scadenza 16/06/2024");
        assert_eq!(
            sanitize_excerpt("Rif. 2024-001 @ sede {centro} a<b>", 500),
            "Rif. 2024-001 sede centro a<b"
        );
    }

    #[test]
    fn test_sanitize_excerpt_truncates() {
        assert_eq!(sanitize_excerpt("abcdefghij", 4), "abcd...");
        assert_eq!(sanitize_excerpt("abcd", 4), "abcd");
    }
}
