//! Layout resolution: field values to ordered regions of styled lines.

use crate::parser::FieldMap;
use crate::tokenize::tokenize_line;
use crate::types::{ContentLine, LayoutKind, Region, RegionLabel};
use regex::Regex;
use std::sync::LazyLock;

/// Leading tag markers of a raw value, e.g. `[step] [question] `.
static LEADING_TAGS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\[[A-Za-z]+\]\s*)*").unwrap());

/// A question mark followed by the next numbered item.
static NEXT_QUESTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\?)\s+(\d+[.)]\s)").unwrap());

/// Bullet or numbering marker opening a list item: `•`, `-`, `*`, `1.`, `a)`
/// or `A.`.
static LIST_ITEM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[•\-*]|\d+\.|[a-z]\)|[A-Z]\.)").unwrap());

/// The removable part of a list marker, with the space after it.
static LIST_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[•\-*]|\d+\.|[a-z]\))\s*").unwrap());

/// Build the regions of a slide in the layout's fixed slot order.
///
/// Every slot is returned, including empty ones, so validation sees the
/// full shape of the slide.
pub fn resolve_layout(fields: &FieldMap, kind: LayoutKind) -> Vec<Region> {
    kind.slots()
        .iter()
        .map(|&label| {
            let raw = fields.lines(label);
            if kind == LayoutKind::Reading && label == RegionLabel::LeftBottom {
                let split: Vec<String> = raw.iter().flat_map(|l| split_questions(l)).collect();
                resolve_region(label, &split)
            } else {
                resolve_region(label, raw)
            }
        })
        .collect()
}

/// Tokenize raw values into one region, numbering step lines from 1.
pub fn resolve_region<S: AsRef<str>>(label: RegionLabel, raw_lines: &[S]) -> Region {
    let mut steps = 0;
    let lines = raw_lines
        .iter()
        .map(|raw| {
            let tokenized = tokenize_line(raw.as_ref());
            let step_order = if tokenized.is_step {
                steps += 1;
                steps
            } else {
                0
            };
            ContentLine {
                runs: tokenized.runs,
                is_step: tokenized.is_step,
                step_order,
                unknown_tags: tokenized.unknown_tags,
                malformed_tags: tokenized.malformed_tags,
            }
        })
        .collect();

    Region { label, lines }
}

/// Split a value holding several numbered questions into one per question.
///
/// `1. Who? 2. Why?` becomes `1. Who?` and `2. Why?`. Leading tag markers are
/// repeated on every piece so each question keeps its style.
pub fn split_questions(raw: &str) -> Vec<String> {
    let prefix_len = LEADING_TAGS_REGEX.find(raw).map_or(0, |m| m.end());
    let (prefix, body) = raw.split_at(prefix_len);

    let mut pieces = Vec::new();
    let mut start = 0;
    for caps in NEXT_QUESTION_REGEX.captures_iter(body) {
        let (Some(mark), Some(next)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        pieces.push(&body[start..mark.end()]);
        start = next.start();
    }

    if pieces.is_empty() {
        return vec![raw.to_string()];
    }
    pieces.push(&body[start..]);

    pieces
        .into_iter()
        .map(|piece| format!("{}{}", prefix, piece.trim()))
        .collect()
}

/// Whether a region reads as a list: at least half of its visible lines
/// open with a bullet or numbering marker.
pub fn is_list(region: &Region) -> bool {
    let texts: Vec<String> = region
        .lines
        .iter()
        .filter(|l| !l.is_blank())
        .map(ContentLine::text)
        .collect();
    if texts.is_empty() {
        return false;
    }

    let items = texts.iter().filter(|t| LIST_ITEM_REGEX.is_match(t)).count();
    items * 2 >= texts.len()
}

/// Text of a list item without its bullet or number, for writers that draw
/// their own bullets.
pub fn strip_list_marker(text: &str) -> &str {
    match LIST_MARKER_REGEX.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}
