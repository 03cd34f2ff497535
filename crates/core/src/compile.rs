//! Compiler entry points.

use crate::error::Result;
use crate::parser::parse_document;
use crate::sizing::{advise_slide, SizingAdvice};
use crate::types::{Severity, SlideSpec, ValidationFinding};
use crate::validate::validate;
use serde::{Deserialize, Serialize};

/// Slides plus every finding from parsing and validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileResult {
    pub slides: Vec<SlideSpec>,
    pub findings: Vec<ValidationFinding>,
}

impl CompileResult {
    /// Whether any finding blocks export.
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(ValidationFinding::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warning)
    }

    /// Sizing advice per slide, in slide order.
    pub fn advice(&self) -> Vec<SlideAdvice> {
        self.slides
            .iter()
            .map(|s| SlideAdvice {
                slide_index: s.slide_index,
                regions: advise_slide(s),
            })
            .collect()
    }
}

/// Sizing advice for the drawn regions of one slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideAdvice {
    pub slide_index: usize,
    pub regions: Vec<SizingAdvice>,
}

/// Compile lesson text into slides and findings.
///
/// Content problems never fail this call; they are returned as findings,
/// parse-time ones first and then validation ones, each in slide order.
pub fn compile(text: &str) -> CompileResult {
    let (slides, mut findings) = parse_document(text);
    findings.extend(validate(&slides));
    findings.sort_by_key(|f| f.slide_index);

    log::debug!(
        "compiled {} slide(s) with {} finding(s)",
        slides.len(),
        findings.len()
    );

    CompileResult { slides, findings }
}

/// Compile raw bytes, which must be UTF-8 text.
pub fn compile_bytes(bytes: &[u8]) -> Result<CompileResult> {
    let text = std::str::from_utf8(bytes)?;
    Ok(compile(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{FindingCode, LayoutKind, RunStyle};

    const SCENARIO: &str =
        "Slide 1\nTitle: Intro\nContent: [emphasis] Hello\nContent: [step] A\nContent: [step] B\n---";

    #[test]
    fn test_scenario_single_slide() {
        let result = compile(SCENARIO);
        assert!(result.findings.is_empty(), "{:?}", result.findings);
        assert_eq!(result.slides.len(), 1);

        let slide = &result.slides[0];
        assert_eq!(slide.layout_kind, LayoutKind::Single);
        assert_eq!(slide.title.as_deref(), Some("Intro"));
        assert_eq!(slide.regions.len(), 1);

        let lines = &slide.regions[0].lines;
        assert_eq!(lines.len(), 3);
        let styles: Vec<RunStyle> = lines.iter().map(|l| l.runs[0].style).collect();
        assert_eq!(
            styles,
            vec![RunStyle::Emphasis, RunStyle::Plain, RunStyle::Plain]
        );
        let orders: Vec<usize> = lines.iter().map(|l| l.step_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let text = "Title: A\nLeft: [bold] x^2\nRight: y\n---\nTitle: B\nFoo: bar\nContent: z";
        let first = compile(text);
        let second = compile(text);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_conflicting_fields_scenario() {
        let result = compile("Title: Mixed\nLeft: a\nRight: b\nLeftTop: c");
        assert!(result.slides.is_empty());
        assert!(result.has_errors());
        let error = result.errors().next().unwrap();
        assert_eq!(error.code, FindingCode::ConflictingLayout);
        assert!(error.message.contains("conflicting layout fields"));
    }

    #[test]
    fn test_long_single_column_warns_but_does_not_block() {
        let text = format!("Title: Long\nContent: {}", "a".repeat(501));
        let result = compile(&text);
        assert_eq!(result.slides.len(), 1);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].code, FindingCode::SingleColumnOverflow);
        assert!(!result.has_errors());
    }

    #[test]
    fn test_unknown_label_scenario() {
        let result = compile("Title: T\nContent: one\nFoo: bar\nContent: two\nNotes: n");
        assert!(result.has_errors());
        assert_eq!(result.errors().count(), 1);
        assert_eq!(result.errors().next().unwrap().code, FindingCode::UnknownLabel);

        let slide = &result.slides[0];
        assert_eq!(slide.regions[0].text(), "one\ntwo");
        assert_eq!(slide.notes.as_deref(), Some("n"));
    }

    #[test]
    fn test_math_scenario() {
        let result = compile("Title: Science\nContent: [emphasis]x^2[/emphasis] and H_2O");
        let text = result.slides[0].regions[0].text();
        assert_eq!(text, "x² and H₂O");
        assert_eq!(text.matches('²').count(), 1);
        assert_eq!(text.matches('₂').count(), 1);
    }

    #[test]
    fn test_mismatched_closer_warns() {
        let result = compile("Title: T\nContent: [emphasis]word[/vocabulary] more");
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].code, FindingCode::MalformedTag);
        assert!(!result.has_errors());
        assert_eq!(result.slides[0].regions[0].text(), "word more");
    }

    #[test]
    fn test_unknown_tag_text_matches_finding() {
        let result = compile("Title: T\nContent: see [alpha] here");
        assert_eq!(result.slides[0].regions[0].text(), "see [alpha] here");
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].code, FindingCode::UnknownTag);
        assert!(result.findings[0].message.contains("[alpha]"));
    }

    #[test]
    fn test_findings_ordered_by_slide() {
        let result = compile("Title: A\n---\nTitle: B\nFoo: x\nContent: y\n---\nContent: c");
        let indices: Vec<Option<usize>> = result.findings.iter().map(|f| f.slide_index).collect();
        let mut sorted = indices.clone();
        sorted.sort();
        assert_eq!(indices, sorted);
        assert_eq!(result.findings.len(), 3);
    }

    #[test]
    fn test_empty_input_is_one_document_error() {
        let result = compile("");
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].code, FindingCode::EmptyDocument);
    }

    #[test]
    fn test_advice_covers_drawn_regions() {
        let result = compile(&format!(
            "Title: Boxes\nLeftTop: {}\nRightTop: short",
            "w".repeat(300)
        ));
        let advice = result.advice();
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].regions.len(), 2);
        assert_eq!(advice[0].regions[0].scale_factor, 0.5);
        assert_eq!(advice[0].regions[1].scale_factor, 1.0);
    }

    #[test]
    fn test_compile_bytes_rejects_non_text() {
        let err = compile_bytes(&[0x66, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, Error::NotText(_)));

        let ok = compile_bytes(SCENARIO.as_bytes()).unwrap();
        assert_eq!(ok.slides.len(), 1);
    }

    #[test]
    fn test_decomposed_accents_count_once() {
        let composed = format!("Title: T\nContent: {}", "é".repeat(501));
        let decomposed = format!("Title: T\nContent: {}", "e\u{301}".repeat(501));
        let a = compile(&composed);
        let b = compile(&decomposed);
        assert_eq!(a.slides[0].regions[0].rendered_len(), 501);
        assert_eq!(a, b);
    }
}
