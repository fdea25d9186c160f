//! WASM bindings for household document classification.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Text acquisition (PDF parsing, OCR) happens on the JavaScript side; these
//! functions take the resulting text.

use wasm_bindgen::prelude::*;

use docsort_core::models::{DocsortConfig, DocumentInput};
use docsort_core::rules::{current_year, extract_metadata as extract, resolve_year as resolve};
use docsort_core::{DocumentAnalyzer, Registries, RegistryFile};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn builtin_analyzer() -> Result<DocumentAnalyzer, JsValue> {
    DocumentAnalyzer::builtin().map_err(js_error)
}

/// Analyze document text with the built-in registries.
#[wasm_bindgen(js_name = analyzeText)]
pub fn analyze_text(text: &str, filename: &str) -> Result<JsValue, JsValue> {
    let record = builtin_analyzer()?
        .analyze_text(filename, text)
        .map_err(js_error)?;
    to_js(&record)
}

/// Keyword classification only.
#[wasm_bindgen]
pub fn classify(text: &str, filename: &str) -> Result<JsValue, JsValue> {
    let result = builtin_analyzer()?.classifier().classify(text, filename);
    to_js(&result)
}

/// Amounts, dates, fiscal codes, IBANs and protocol numbers found in text.
#[wasm_bindgen(js_name = extractMetadata)]
pub fn extract_metadata(text: &str) -> Result<JsValue, JsValue> {
    to_js(&extract(text))
}

/// Most recent plausible year in text or filename, as "YYYY".
#[wasm_bindgen(js_name = resolveYear)]
pub fn resolve_year(text: &str, filename: &str) -> String {
    resolve(text, filename, current_year())
}

/// Built-in issuer template statistics.
#[wasm_bindgen(js_name = templateStats)]
pub fn template_stats() -> Result<JsValue, JsValue> {
    to_js(&builtin_analyzer()?.template_stats())
}

/// Reusable analyzer for browser use.
#[wasm_bindgen(js_name = DocumentAnalyzer)]
pub struct Analyzer {
    inner: DocumentAnalyzer,
}

#[wasm_bindgen(js_class = DocumentAnalyzer)]
impl Analyzer {
    /// Create an analyzer; `config` is an optional configuration object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Analyzer, JsValue> {
        let config = parse_config(config)?;
        let inner = DocumentAnalyzer::from_config(&config).map_err(js_error)?;
        Ok(Self { inner })
    }

    /// Create an analyzer with custom category and template tables (JSON).
    #[wasm_bindgen(js_name = withRegistry)]
    pub fn with_registry(registry_json: &str, config: JsValue) -> Result<Analyzer, JsValue> {
        let config = parse_config(config)?;
        let file: RegistryFile = serde_json::from_str(registry_json).map_err(js_error)?;
        let registries = Registries::from_defs(file).map_err(js_error)?;
        Ok(Self {
            inner: DocumentAnalyzer::new(registries, &config),
        })
    }

    /// Analyze extracted text.
    #[wasm_bindgen]
    pub fn analyze(&self, text: &str, filename: &str) -> Result<JsValue, JsValue> {
        let record = self.inner.analyze_text(filename, text).map_err(js_error)?;
        to_js(&record)
    }

    /// Analyze a full input object (`{ filename, parentDir?, text, hints? }`).
    #[wasm_bindgen(js_name = analyzeInput)]
    pub fn analyze_input(&self, input: JsValue) -> Result<JsValue, JsValue> {
        let input: DocumentInput = serde_wasm_bindgen::from_value(input).map_err(js_error)?;
        let record = self.inner.analyze(&input).map_err(js_error)?;
        to_js(&record)
    }

    /// Analyze a document whose text could not be acquired.
    #[wasm_bindgen(js_name = analyzeFilename)]
    pub fn analyze_filename(&self, filename: &str, reason: &str) -> Result<JsValue, JsValue> {
        let record = self
            .inner
            .analyze(&DocumentInput::without_text(filename, reason))
            .map_err(js_error)?;
        to_js(&record)
    }

    #[wasm_bindgen]
    pub fn classify(&self, text: &str, filename: &str) -> Result<JsValue, JsValue> {
        to_js(&self.inner.classifier().classify(text, filename))
    }

    /// Best issuer template, or `undefined`.
    #[wasm_bindgen(js_name = matchTemplate)]
    pub fn match_template(&self, text: &str, filename: &str) -> Result<JsValue, JsValue> {
        match self.inner.matcher().match_template(text, filename, None) {
            Some(found) => to_js(&found),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    #[wasm_bindgen(js_name = templateStats)]
    pub fn template_stats(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.template_stats())
    }

    /// Category definitions in registry order.
    #[wasm_bindgen]
    pub fn categories(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.classifier().registry().definitions())
    }
}

fn parse_config(config: JsValue) -> Result<DocsortConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(DocsortConfig::default());
    }
    let config: DocsortConfig = serde_wasm_bindgen::from_value(config).map_err(js_error)?;
    config.validate().map_err(js_error)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[wasm_bindgen_test]
    fn test_resolve_year() {
        assert_eq!(resolve_year("rata 2019", "imu.pdf"), "2019");
    }

    #[wasm_bindgen_test]
    fn test_analyzer_default_config() {
        let analyzer = Analyzer::new(JsValue::UNDEFINED).unwrap();
        let record = analyzer
            .inner
            .analyze_text("bolletta.pdf", "ENEL energia elettrica, codice cliente 12345")
            .unwrap();
        assert_eq!(record.category, "Bollette_Energia");
        assert_eq!(record.company, "ENEL");
    }

    #[wasm_bindgen_test]
    fn test_analyzer_custom_registry() {
        let registry = r#"{"categories": [{"id": "Multe", "keywords": ["multa"]}]}"#;
        let analyzer = Analyzer::with_registry(registry, JsValue::NULL).unwrap();
        let record = analyzer.inner.analyze_text("verbale.pdf", "multa per sosta").unwrap();
        assert_eq!(record.category, "Multe");
    }

    #[wasm_bindgen_test]
    fn test_analyze_input_reads_camel_case_keys() {
        use serde::Serialize;

        let input = serde_json::json!({
            "filename": "scan.jpg",
            "parentDir": "bollette_enel",
            "text": {"status": "unavailable", "reason": "image without OCR"}
        });
        let value = input
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .unwrap();
        let analyzer = Analyzer::new(JsValue::UNDEFINED).unwrap();
        let record = analyzer.analyze_input(value).unwrap();
        let record: serde_json::Value = serde_wasm_bindgen::from_value(record).unwrap();
        assert_eq!(record["category"], "Bollette_Energia");
    }

    #[wasm_bindgen_test]
    fn test_binary_text_rejected() {
        assert!(analyze_text("abc\0", "scan.pdf").is_err());
    }
}
