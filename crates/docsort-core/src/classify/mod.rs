//! Document classification: keyword scoring and issuer template matching.

mod keywords;
mod templates;

pub use keywords::{CategoryScore, KeywordClassifier};
pub use templates::{TemplateMatcher, TemplateScore, template_confidence};
