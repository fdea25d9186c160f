//! Text acquisition: turn a file on disk into a `DocumentInput`.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use docsort_core::rules::detect_hints;
use docsort_core::DocumentInput;

const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md", "csv", "json", "xml", "html", "htm", "eml"];
const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "tiff", "tif", "webp", "heic",
];

/// Kind of file, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Text,
    Image,
    Other,
}

impl FileKind {
    pub fn of(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Self::Pdf,
            ext if TEXT_EXTENSIONS.contains(&ext) => Self::Text,
            ext if IMAGE_EXTENSIONS.contains(&ext) => Self::Image,
            _ => Self::Other,
        }
    }
}

/// Read a document and build the analyzer input.
///
/// Files whose text cannot be obtained become `Unavailable` inputs, which the
/// analyzer classifies from the file name.
pub fn acquire(path: &Path) -> anyhow::Result<DocumentInput> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", path.display()))?
        .to_string();

    let text = match FileKind::of(path) {
        FileKind::Text => Ok(read_text(path)?),
        FileKind::Pdf => read_pdf(path),
        FileKind::Image => Err("image without OCR".to_string()),
        FileKind::Other => Err("unsupported file type".to_string()),
    };

    let mut input = match text {
        Ok(text) => {
            let hints = detect_hints(&text);
            debug!("{}: {} characters, companies {:?}", filename, text.len(), hints.companies);
            DocumentInput::new(filename, text).with_hints(hints)
        }
        Err(reason) => {
            debug!("{}: no text ({})", filename, reason);
            DocumentInput::without_text(filename, reason)
        }
    };

    if let Some(parent) = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
    {
        input = input.with_parent_dir(parent);
    }

    Ok(input)
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    let data = fs::read(path)?;
    String::from_utf8(data)
        .map_err(|_| anyhow::anyhow!("{} is not valid UTF-8 text", path.display()))
}

/// Embedded PDF text, or the reason there is none.
fn read_pdf(path: &Path) -> Result<String, String> {
    let data = fs::read(path).map_err(|e| format!("cannot read PDF: {e}"))?;

    match pdf_extract::extract_text_from_mem(&data) {
        Ok(text) if !text.trim().is_empty() => Ok(text.replace('\0', "")),
        Ok(_) => Err("PDF has no embedded text".to_string()),
        Err(e) => {
            warn!("PDF text extraction failed for {}: {}", path.display(), e);
            Err(format!("PDF text extraction failed: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsort_core::TextSource;

    #[test]
    fn test_file_kind() {
        assert_eq!(FileKind::of(Path::new("a/bolletta.PDF")), FileKind::Pdf);
        assert_eq!(FileKind::of(Path::new("nota.txt")), FileKind::Text);
        assert_eq!(FileKind::of(Path::new("scan.JPG")), FileKind::Image);
        assert_eq!(FileKind::of(Path::new("archivio.zip")), FileKind::Other);
        assert_eq!(FileKind::of(Path::new("senza_estensione")), FileKind::Other);
    }

    #[test]
    fn test_acquire_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bolletta.txt");
        fs::write(&path, "ENEL Energia - Totale € 45,50").unwrap();

        let input = acquire(&path).unwrap();
        assert_eq!(input.filename, "bolletta.txt");
        assert_eq!(input.text, TextSource::text("ENEL Energia - Totale € 45,50"));
        assert_eq!(input.hints.companies, vec!["enel".to_string()]);
        assert_eq!(input.hints.amounts, vec![45.5]);
    }

    #[test]
    fn test_acquire_image_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan_imu.jpg");
        fs::write(&path, [0xff, 0xd8, 0xff, 0xe0]).unwrap();

        let input = acquire(&path).unwrap();
        assert_eq!(input.text, TextSource::unavailable("image without OCR"));
        assert!(input.parent_dir.is_some());
    }

    #[test]
    fn test_acquire_invalid_utf8_text_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rotto.txt");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        assert!(acquire(&path).is_err());
    }
}
