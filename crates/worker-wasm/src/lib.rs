//! WASM-compatible wrapper for the lesson slide compiler.
//!
//! Exposes compilation to JavaScript so a browser editor or worker can show
//! findings and previews without a round trip.

use deck_core::{
    compile, CompileResult, ExportBundle, SlideAdvice, SlideSpec, StyleConfig, ValidationFinding,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of compiling lesson text, as seen from JavaScript.
#[derive(Debug, Serialize, Deserialize)]
pub struct LessonReport {
    /// Compiled slides in order.
    pub slides: Vec<SlideSpec>,
    /// All findings, in slide order.
    pub findings: Vec<ValidationFinding>,
    /// Sizing advice for every drawn region.
    pub advice: Vec<SlideAdvice>,
    /// Whether export is blocked.
    pub has_errors: bool,
}

impl From<CompileResult> for LessonReport {
    fn from(result: CompileResult) -> Self {
        let advice = result.advice();
        let has_errors = result.has_errors();
        Self {
            slides: result.slides,
            findings: result.findings,
            advice,
            has_errors,
        }
    }
}

/// Compile lesson text.
///
/// # Returns
/// A JavaScript object with slides, findings, advice and `has_errors`.
#[wasm_bindgen]
pub fn compile_lesson(text: &str) -> Result<JsValue, JsValue> {
    let report = LessonReport::from(compile(text));

    serde_wasm_bindgen::to_value(&report)
        .map_err(|e| js_error(&format!("Serialization error: {}", e)))
}

/// Build the export bundle for the presentation writer.
///
/// # Arguments
/// * `text` - The lesson text
/// * `styles` - Optional style configuration object; defaults when undefined
///
/// # Returns
/// The bundle object, or throws when error findings block export.
#[wasm_bindgen]
pub fn export_bundle(text: &str, styles: JsValue) -> Result<JsValue, JsValue> {
    let styles: StyleConfig = if styles.is_undefined() || styles.is_null() {
        StyleConfig::default()
    } else {
        serde_wasm_bindgen::from_value(styles)
            .map_err(|e| js_error(&format!("Invalid style configuration: {}", e)))?
    };

    let bundle = export_bundle_impl(text, styles).map_err(|e| js_error(&e))?;

    serde_wasm_bindgen::to_value(&bundle)
        .map_err(|e| js_error(&format!("Serialization error: {}", e)))
}

fn export_bundle_impl(text: &str, styles: StyleConfig) -> Result<ExportBundle, String> {
    let result = compile(text);
    ExportBundle::new(&result, styles).map_err(|e| e.to_string())
}

fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}
