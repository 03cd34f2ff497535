//! Handoff to the external document writer.
//!
//! The compiler never picks colors or fonts. [`StyleConfig`] carries the
//! caller's choices through untouched, and [`ExportBundle`] packages them
//! with the compiled slides and sizing advice.

use crate::compile::{CompileResult, SlideAdvice};
use crate::error::{Error, Result};
use crate::types::{RunStyle, SlideSpec};
use serde::{Deserialize, Serialize};

/// Colors attached to styled runs by the document writer.
///
/// Values are opaque identifiers (hex strings, theme names); the compiler
/// never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub vocabulary_color: String,
    pub question_color: String,
    pub answer_color: String,
    pub emphasis_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            vocabulary_color: "#008000".to_string(),
            question_color: "#800080".to_string(),
            answer_color: "#808080".to_string(),
            emphasis_color: "#C00000".to_string(),
        }
    }
}

impl StyleConfig {
    /// Create a config with the default colors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a config from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The color identifier for a run style. Plain text has none.
    pub fn color_for(&self, style: RunStyle) -> Option<&str> {
        match style {
            RunStyle::Plain => None,
            RunStyle::Vocabulary => Some(self.vocabulary_color.as_str()),
            RunStyle::Question => Some(self.question_color.as_str()),
            RunStyle::Answer => Some(self.answer_color.as_str()),
            RunStyle::Emphasis => Some(self.emphasis_color.as_str()),
        }
    }
}

/// Everything the document writer needs, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub slides: Vec<SlideSpec>,
    pub advice: Vec<SlideAdvice>,
    pub styles: StyleConfig,
}

impl ExportBundle {
    /// Package a compile result for export.
    ///
    /// Refused while any error finding exists; warnings do not block.
    pub fn new(result: &CompileResult, styles: StyleConfig) -> Result<Self> {
        let errors = result.errors().count();
        if errors > 0 {
            return Err(Error::ExportBlocked { errors });
        }

        Ok(Self {
            slides: result.slides.clone(),
            advice: result.advice(),
            styles,
        })
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;

    #[test]
    fn test_style_config_defaults_fill_missing_keys() {
        let config = StyleConfig::from_json(r##"{"emphasis_color": "#FF0000"}"##).unwrap();
        assert_eq!(config.emphasis_color, "#FF0000");
        assert_eq!(config.vocabulary_color, "#008000");
    }

    #[test]
    fn test_style_config_rejects_bad_json() {
        let err = StyleConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_color_for_is_pass_through() {
        let config = StyleConfig {
            question_color: "theme:accent2".to_string(),
            ..StyleConfig::default()
        };
        assert_eq!(config.color_for(RunStyle::Question), Some("theme:accent2"));
        assert_eq!(config.color_for(RunStyle::Plain), None);
    }

    #[test]
    fn test_bundle_blocked_by_errors() {
        let result = compile("Title: T\nFoo: bar\nContent: x");
        let err = ExportBundle::new(&result, StyleConfig::default()).unwrap_err();
        assert!(matches!(err, Error::ExportBlocked { errors: 1 }));
    }

    #[test]
    fn test_bundle_allowed_with_warnings() {
        let text = format!("Content: {}", "a".repeat(600));
        let result = compile(&text);
        assert!(!result.findings.is_empty());

        let bundle = ExportBundle::new(&result, StyleConfig::default()).unwrap();
        assert_eq!(bundle.slides.len(), 1);
        assert!(bundle.advice[0].regions[0].scale_factor < 1.0);

        let json = bundle.to_json().unwrap();
        assert!(json.contains("\"layout_kind\": \"Single\""));
    }
}
