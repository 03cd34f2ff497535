//! Inline tag resolution and math-symbol substitution.
//!
//! A content value such as `I [emphasis] worked [/emphasis] hard` becomes a
//! sequence of styled [`Run`]s. Opening tags govern the text that follows them
//! up to the matching closing tag, the next style tag, or the end of the line.

use crate::types::{Run, RunStyle};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Regex for keyword-shaped bracket markers: `[word]` and `[/word]`.
static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(/?)([A-Za-z]+)\]").unwrap());

/// Regex to collapse runs of whitespace into one space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap());

static SUPERSCRIPT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^([0-9]+)").unwrap());

static SUBSCRIPT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_([0-9]+)").unwrap());

/// Named symbol aliases, matched as whole words only.
static SYMBOL_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(alpha|beta|gamma|delta|pi|theta|sigma|deg)\b").unwrap()
});

/// Two-character operator aliases.
const OPERATOR_ALIASES: &[(&str, &str)] = &[("<=", "≤"), (">=", "≥"), ("!=", "≠"), ("~=", "≈")];

/// Keyword of the sequential-reveal marker.
const STEP_KEYWORD: &str = "step";

/// The result of tokenizing one content value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenizedLine {
    /// Styled runs in order. Never contains empty runs.
    pub runs: Vec<Run>,

    /// Whether a `[step]` marker appeared anywhere in the line.
    pub is_step: bool,

    /// Bracket keywords outside the tag vocabulary, as written.
    pub unknown_tags: Vec<String>,

    /// Closing markers that did not end the open span, as written.
    pub malformed_tags: Vec<String>,
}

impl TokenizedLine {
    /// The line's rendered text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Resolve a content value into styled runs.
pub fn resolve_runs(raw: &str) -> Vec<Run> {
    tokenize_line(raw).runs
}

/// Remove all tag markers and apply math substitution, keeping only text.
pub fn strip_tags(raw: &str) -> String {
    tokenize_line(raw).text()
}

/// Tokenize one content value into runs plus line-level metadata.
pub fn tokenize_line(raw: &str) -> TokenizedLine {
    let collapsed = WHITESPACE_COLLAPSE_REGEX.replace_all(raw.trim(), " ");
    let text = collapsed.as_ref();

    let mut scanner = RunScanner::default();
    let mut last = 0;

    for caps in TAG_REGEX.captures_iter(text) {
        let Some(marker) = caps.get(0) else { continue };
        scanner.push_text(&text[last..marker.start()]);
        last = marker.end();

        let closing = !caps[1].is_empty();
        let keyword = &caps[2];

        if keyword.eq_ignore_ascii_case(STEP_KEYWORD) {
            // Step is line metadata; a closing form carries no meaning.
            if !closing {
                scanner.is_step = true;
                scanner.skip_leading_ws = true;
            }
            continue;
        }

        match RunStyle::from_tag(keyword) {
            Some(style) if closing => {
                if !scanner.close(style) {
                    scanner.malformed_tags.push(marker.as_str().to_string());
                }
            }
            Some(style) => scanner.open(style),
            None => {
                scanner.unknown_tags.push(marker.as_str().to_string());
                scanner.push_marker(marker.as_str());
            }
        }
    }
    scanner.push_text(&text[last..]);

    scanner.finish()
}

/// Apply math and symbol substitutions to plain text.
///
/// Running this on its own output is a no-op.
pub fn substitute_math(text: &str) -> String {
    let text = SUPERSCRIPT_REGEX.replace_all(text, |caps: &Captures| {
        caps[1].chars().map(superscript_digit).collect::<String>()
    });
    let text = SUBSCRIPT_REGEX.replace_all(&text, |caps: &Captures| {
        caps[1].chars().map(subscript_digit).collect::<String>()
    });

    let mut text = text.into_owned();
    for (alias, glyph) in OPERATOR_ALIASES {
        if text.contains(alias) {
            text = text.replace(alias, glyph);
        }
    }

    SYMBOL_NAME_REGEX
        .replace_all(&text, |caps: &Captures| symbol_glyph(&caps[1]).to_string())
        .into_owned()
}

fn superscript_digit(c: char) -> char {
    match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        other => other,
    }
}

fn subscript_digit(c: char) -> char {
    match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        other => other,
    }
}

fn symbol_glyph(name: &str) -> &'static str {
    match name {
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "pi" => "π",
        "theta" => "θ",
        "sigma" => "σ",
        "deg" => "°",
        _ => "",
    }
}

/// Accumulates runs while walking the markers of one line.
#[derive(Debug, Default)]
struct RunScanner {
    runs: Vec<Run>,
    buffer: String,
    style: RunStyle,
    skip_leading_ws: bool,
    is_step: bool,
    unknown_tags: Vec<String>,
    malformed_tags: Vec<String>,
}

impl RunScanner {
    fn push_text(&mut self, text: &str) {
        let text = if self.skip_leading_ws {
            text.trim_start()
        } else {
            text
        };
        if !text.is_empty() {
            self.skip_leading_ws = false;
            self.buffer.push_str(text);
        }
    }

    /// Keep a marker as literal text, outside math substitution.
    fn push_marker(&mut self, marker: &str) {
        self.flush();
        self.skip_leading_ws = false;
        self.append(marker.to_string());
    }

    /// Start a new span. Tags do not nest, so any open span ends here.
    fn open(&mut self, style: RunStyle) {
        self.flush();
        self.style = style;
        self.skip_leading_ws = true;
    }

    /// End the open span if it matches. Returns false for a closer that
    /// matches nothing; it is dropped and the open span continues.
    fn close(&mut self, style: RunStyle) -> bool {
        if self.style != style {
            return false;
        }
        self.flush();
        self.style = RunStyle::Plain;
        true
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = substitute_math(&std::mem::take(&mut self.buffer));
        self.append(text);
    }

    fn append(&mut self, text: String) {
        match self.runs.last_mut() {
            Some(last) if last.style == self.style => last.text.push_str(&text),
            _ => self.runs.push(Run::new(text, self.style)),
        }
    }

    fn finish(mut self) -> TokenizedLine {
        self.flush();

        // A marker at either edge of the line can leave a dangling space.
        if let Some(first) = self.runs.first_mut() {
            first.text = first.text.trim_start().to_string();
        }
        if let Some(last) = self.runs.last_mut() {
            last.text = last.text.trim_end().to_string();
        }
        self.runs.retain(|r| !r.text.is_empty());

        TokenizedLine {
            runs: self.runs,
            is_step: self.is_step,
            unknown_tags: self.unknown_tags,
            malformed_tags: self.malformed_tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles(runs: &[Run]) -> Vec<RunStyle> {
        runs.iter().map(|r| r.style).collect()
    }

    #[test]
    fn test_plain_text_is_single_run() {
        assert_eq!(resolve_runs("No tags here"), vec![Run::plain("No tags here")]);
    }

    #[test]
    fn test_closed_tag_pair() {
        let runs = resolve_runs("I [emphasis]worked[/emphasis] yesterday");
        assert_eq!(
            runs,
            vec![
                Run::plain("I "),
                Run::new("worked", RunStyle::Emphasis),
                Run::plain(" yesterday"),
            ]
        );
    }

    #[test]
    fn test_unclosed_tag_runs_to_end_of_line() {
        let runs = resolve_runs("[vocabulary] resilient");
        assert_eq!(runs, vec![Run::new("resilient", RunStyle::Vocabulary)]);

        let runs = resolve_runs("I [emphasis] worked yesterday");
        assert_eq!(
            runs,
            vec![Run::plain("I "), Run::new("worked yesterday", RunStyle::Emphasis)]
        );
    }

    #[test]
    fn test_next_tag_ends_open_span() {
        let runs = resolve_runs("[question] Why? [answer] Because.");
        assert_eq!(
            runs,
            vec![
                Run::new("Why? ", RunStyle::Question),
                Run::new("Because.", RunStyle::Answer),
            ]
        );
    }

    #[test]
    fn test_multiple_pairs() {
        let runs = resolve_runs(
            "Multiple [emphasis]bold[/emphasis] and [vocabulary]term[/vocabulary] tags",
        );
        assert_eq!(
            styles(&runs),
            vec![
                RunStyle::Plain,
                RunStyle::Emphasis,
                RunStyle::Plain,
                RunStyle::Vocabulary,
                RunStyle::Plain,
            ]
        );
        assert_eq!(runs[3].text, "term");
    }

    #[test]
    fn test_orphan_closing_tag_removed() {
        let line = tokenize_line("word[/emphasis] more");
        assert_eq!(line.runs, vec![Run::plain("word more")]);
        assert_eq!(line.malformed_tags, vec!["[/emphasis]"]);
    }

    #[test]
    fn test_mismatched_closer_is_recorded() {
        let line = tokenize_line("[emphasis]word[/vocabulary] more");
        assert_eq!(line.runs, vec![Run::new("word more", RunStyle::Emphasis)]);
        assert_eq!(line.malformed_tags, vec!["[/vocabulary]"]);
        assert!(line.unknown_tags.is_empty());
    }

    #[test]
    fn test_matched_closers_are_not_malformed() {
        let line = tokenize_line("[emphasis]a[/emphasis] [step] b [/step]");
        assert!(line.malformed_tags.is_empty());
    }

    #[test]
    fn test_unknown_marker_is_not_substituted() {
        let line = tokenize_line("see [alpha] here");
        assert_eq!(line.unknown_tags, vec!["[alpha]"]);
        assert_eq!(line.text(), "see [alpha] here");

        let line = tokenize_line("[pi] is pi, 90 deg is [deg]");
        assert_eq!(line.text(), "[pi] is π, 90 ° is [deg]");
    }

    #[test]
    fn test_tags_are_case_insensitive() {
        let runs = resolve_runs("[Vocabulary]term[/VOCABULARY]");
        assert_eq!(runs, vec![Run::new("term", RunStyle::Vocabulary)]);
    }

    #[test]
    fn test_step_marks_line_and_is_removed() {
        let line = tokenize_line("[step] First point");
        assert!(line.is_step);
        assert_eq!(line.runs, vec![Run::plain("First point")]);
    }

    #[test]
    fn test_step_mid_line_keeps_trailing_style() {
        let line = tokenize_line("Look [step] [emphasis] here");
        assert!(line.is_step);
        assert_eq!(
            line.runs,
            vec![Run::plain("Look "), Run::new("here", RunStyle::Emphasis)]
        );
    }

    #[test]
    fn test_unknown_keyword_is_literal() {
        let line = tokenize_line("[bold] text");
        assert_eq!(line.unknown_tags, vec!["[bold]"]);
        assert_eq!(line.runs, vec![Run::plain("[bold] text")]);
        assert!(!line.is_step);
    }

    #[test]
    fn test_non_keyword_brackets_are_plain() {
        let line = tokenize_line("See note [1] below");
        assert!(line.unknown_tags.is_empty());
        assert_eq!(line.text(), "See note [1] below");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(strip_tags("  spaced    out\ttext  "), "spaced out text");
    }

    #[test]
    fn test_empty_value_has_no_runs() {
        let line = tokenize_line("   ");
        assert!(line.runs.is_empty());
        assert!(!line.is_step);
    }

    #[test]
    fn test_superscript_and_subscript() {
        assert_eq!(substitute_math("x^2"), "x²");
        assert_eq!(substitute_math("H_2O"), "H₂O");
        assert_eq!(substitute_math("10^23"), "10²³");
    }

    #[test]
    fn test_substitution_inside_tags_applies_once() {
        let runs = resolve_runs("[emphasis]x^2[/emphasis] and H_2O");
        assert_eq!(runs[0], Run::new("x²", RunStyle::Emphasis));
        assert_eq!(runs[1], Run::plain(" and H₂O"));
    }

    #[test]
    fn test_operators_and_symbols() {
        assert_eq!(substitute_math("a <= b >= c != d ~= e"), "a ≤ b ≥ c ≠ d ≈ e");
        assert_eq!(substitute_math("alpha + beta = pi"), "α + β = π");
        assert_eq!(substitute_math("90 deg"), "90 °");
    }

    #[test]
    fn test_symbol_names_need_word_boundaries() {
        assert_eq!(substitute_math("pizza alphabet"), "pizza alphabet");
    }

    #[test]
    fn test_substitution_is_idempotent() {
        let inputs = ["x^2 + y_10", "a <= b", "theta != 0", "plain text"];
        for input in inputs {
            let once = substitute_math(input);
            assert_eq!(substitute_math(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_runs_concatenate_to_stripped_text() {
        let cases = [
            ("[emphasis]x^2[/emphasis] <= [vocabulary]pi[/vocabulary]", "x² ≤ π"),
            ("word[/emphasis] more H_2O", "word more H₂O"),
            ("Look [step] at [bold] alpha", "Look at [bold] α"),
            ("[question]x^2?[/question][answer]10^3", "x²?10³"),
            ("[emphasis]a[/vocabulary]  b   [answer] c != d", "a b c ≠ d"),
            ("[step]", ""),
        ];
        for (input, expected) in cases {
            let line = tokenize_line(input);
            let joined: String = line.runs.iter().map(|r| r.text.as_str()).collect();
            assert_eq!(joined, expected, "input: {input}");
            assert!(line.runs.iter().all(|r| !r.text.is_empty()), "input: {input}");
        }
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let input = "[question] What is x^2? [answer] It [emphasis]depends";
        assert_eq!(tokenize_line(input), tokenize_line(input));
    }
}
