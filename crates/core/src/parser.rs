//! Slide document parser.
//!
//! Splits lesson text into slide blocks on `---` lines, reads each block's
//! `Label: value` lines into a [`FieldMap`], and classifies the block into a
//! [`LayoutKind`]. Problems are collected as findings; parsing never stops at
//! a bad line.

use crate::layout::resolve_layout;
use crate::tokenize::strip_tags;
use crate::types::{FindingCode, LayoutKind, RegionLabel, SlideSpec, ValidationFinding};
use crate::validate::FOUR_BOX_MAX_CHARS;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// The slide delimiter line.
pub const DELIMITER: &str = "---";

/// `Label: value`, where the label is a single identifier.
static LABEL_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9]*)\s*:(.*)$").unwrap());

/// Advisory `Slide 3` header lines.
static SLIDE_HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^slide\s+\d+\b").unwrap());

/// A numbered-list item such as `1.` or `2)`.
static NUMBERED_ITEM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)](\s|$)").unwrap());

/// A passage longer than this no longer fits a quadrant box, so a LeftTop
/// passage over it (with numbered questions below) reads as a Reading slide.
pub const READING_PASSAGE_MIN_CHARS: usize = FOUR_BOX_MAX_CHARS;

/// The raw slide blocks of one input text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Block text in input order, whitespace-only blocks removed.
    pub blocks: Vec<String>,
}

impl Document {
    /// Split text on lines consisting of exactly the delimiter.
    pub fn split(text: &str) -> Self {
        let mut blocks = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            if line.trim() == DELIMITER {
                push_block(&mut blocks, &current);
                current.clear();
            } else {
                current.push(line);
            }
        }
        push_block(&mut blocks, &current);

        Self { blocks }
    }

    /// Rejoin the blocks with delimiter lines.
    pub fn to_text(&self) -> String {
        self.blocks.join(&format!("\n{}\n", DELIMITER))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

fn push_block(blocks: &mut Vec<String>, lines: &[&str]) {
    let block = lines.join("\n");
    if !block.trim().is_empty() {
        blocks.push(block);
    }
}

/// Split text into slide blocks.
pub fn split_document(text: &str) -> Document {
    Document::split(text)
}

/// A recognized field label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Notes,
    Template,
    Region(RegionLabel),
}

impl Field {
    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Title" => Some(Self::Title),
            "Notes" => Some(Self::Notes),
            "Template" => Some(Self::Template),
            _ => RegionLabel::ALL
                .into_iter()
                .find(|r| r.as_str() == label)
                .map(Self::Region),
        }
    }

    /// Canonical spelling of a label that only differs in case.
    fn suggest(label: &str) -> Option<&'static str> {
        ["Title", "Notes", "Template"]
            .into_iter()
            .chain(RegionLabel::ALL.iter().map(|r| r.as_str()))
            .find(|known| known.eq_ignore_ascii_case(label))
    }
}

/// Field values of one slide block, before layout resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldMap {
    pub title: Option<String>,
    pub template: Option<String>,
    pub notes: Vec<String>,
    regions: BTreeMap<RegionLabel, Vec<String>>,
}

impl FieldMap {
    /// Raw values recorded for a region label, in input order.
    pub fn lines(&self, label: RegionLabel) -> &[String] {
        self.regions.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the label appeared in the block at all.
    pub fn has(&self, label: RegionLabel) -> bool {
        self.regions.contains_key(&label)
    }

    /// Record one raw value under a region label.
    pub fn push(&mut self, label: RegionLabel, value: impl Into<String>) {
        self.regions.entry(label).or_default().push(value.into());
    }

    /// Labels that appeared, in declaration order.
    pub fn labels(&self) -> impl Iterator<Item = RegionLabel> + '_ {
        self.regions.keys().copied()
    }
}

/// Output of parsing one block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedBlock {
    pub fields: FieldMap,
    pub findings: Vec<ValidationFinding>,
}

/// Parse the labeled lines of one block.
pub fn parse_block(block: &str, slide_index: usize) -> ParsedBlock {
    let mut parsed = ParsedBlock::default();
    let mut open: Option<Field> = None;
    let slide = Some(slide_index);

    for (line_no, raw) in block.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || SLIDE_HEADER_REGEX.is_match(line) {
            continue;
        }

        // `https://...` and similar are text, not a label.
        let label_caps = LABEL_LINE_REGEX
            .captures(line)
            .filter(|caps| !caps[2].starts_with("//"));
        let Some(caps) = label_caps else {
            // Continuation of the most recent region or notes field.
            match open {
                Some(Field::Region(label)) => parsed.fields.push(label, line),
                Some(Field::Notes) => parsed.fields.notes.push(line.to_string()),
                _ => parsed.findings.push(ValidationFinding::warning(
                    slide,
                    FindingCode::StrayLine,
                    format!(
                        "line {} has no field label and no field to continue: '{}'",
                        line_no + 1,
                        line
                    ),
                )),
            }
            continue;
        };

        let label = &caps[1];
        let value = caps[2].trim();

        let Some(field) = Field::from_label(label) else {
            let hint = Field::suggest(label)
                .map(|known| format!(" (did you mean '{}'?)", known))
                .unwrap_or_default();
            parsed.findings.push(ValidationFinding::error(
                slide,
                FindingCode::UnknownLabel,
                format!("unknown field label '{}' on line {}{}", label, line_no + 1, hint),
            ));
            open = None;
            continue;
        };

        match field {
            Field::Title => {
                if parsed.fields.title.is_some() {
                    parsed.findings.push(ValidationFinding::warning(
                        slide,
                        FindingCode::DuplicateTitle,
                        format!("title repeated on line {}; the last one is used", line_no + 1),
                    ));
                }
                let title = strip_tags(value);
                parsed.fields.title = (!title.is_empty()).then_some(title);
                open = None;
            }
            Field::Template => {
                parsed.fields.template = (!value.is_empty()).then(|| value.to_string());
                open = None;
            }
            Field::Notes => {
                if !value.is_empty() {
                    parsed.fields.notes.push(value.to_string());
                }
                open = Some(field);
            }
            Field::Region(region) => {
                // Empty values are kept as spacer lines.
                parsed.fields.push(region, value);
                open = Some(field);
            }
        }
    }

    parsed
}

/// The label families present in a block disagree about its layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConflict {
    pub families: Vec<&'static str>,
}

impl fmt::Display for LayoutConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conflicting layout fields: {}", self.families.join(" with "))
    }
}

/// Choose the layout for a block from the labels it uses.
///
/// Checked in fixed order: Reading, FourBox, TwoColumn, Single. Reading and
/// FourBox share labels and differ only in content shape.
pub fn classify_layout(fields: &FieldMap) -> Result<LayoutKind, LayoutConflict> {
    let has_content = fields.has(RegionLabel::Content);
    let has_columns = fields.labels().any(RegionLabel::is_column);
    let has_boxes = fields.labels().any(RegionLabel::is_box);

    let families: Vec<&'static str> = [
        (has_content, "Content"),
        (has_columns, "Left/Right"),
        (has_boxes, "LeftTop/RightTop/LeftBottom/RightBottom"),
    ]
    .into_iter()
    .filter_map(|(present, name)| present.then_some(name))
    .collect();

    if families.len() > 1 {
        return Err(LayoutConflict { families });
    }

    let kind = if has_boxes && looks_like_reading(fields) {
        LayoutKind::Reading
    } else if has_boxes {
        LayoutKind::FourBox
    } else if has_columns {
        LayoutKind::TwoColumn
    } else {
        LayoutKind::Single
    };
    log::trace!("classified block as {}", kind);

    Ok(kind)
}

/// A long LeftTop passage above numbered LeftBottom questions, with no
/// right-hand boxes.
fn looks_like_reading(fields: &FieldMap) -> bool {
    if !fields.has(RegionLabel::LeftTop) || !fields.has(RegionLabel::LeftBottom) {
        return false;
    }
    if fields.has(RegionLabel::RightTop) || fields.has(RegionLabel::RightBottom) {
        return false;
    }

    let starts_numbered = fields
        .lines(RegionLabel::LeftBottom)
        .iter()
        .map(|l| strip_tags(l))
        .find(|l| !l.is_empty())
        .is_some_and(|first| NUMBERED_ITEM_REGEX.is_match(&first));

    let passage_len: usize = fields
        .lines(RegionLabel::LeftTop)
        .iter()
        .map(|l| strip_tags(l).chars().count())
        .sum();

    starts_numbered && passage_len > READING_PASSAGE_MIN_CHARS
}

/// Parse a whole lesson document into slides and parse-time findings.
pub fn parse_document(text: &str) -> (Vec<SlideSpec>, Vec<ValidationFinding>) {
    let text: String = text.nfc().collect();
    let document = Document::split(&text);

    let mut slides = Vec::with_capacity(document.len());
    let mut findings = Vec::new();

    if document.is_empty() {
        findings.push(ValidationFinding::error(
            None,
            FindingCode::EmptyDocument,
            "document contains no slides",
        ));
        return (slides, findings);
    }

    for (idx, block) in document.blocks.iter().enumerate() {
        let slide_index = idx + 1;
        let ParsedBlock {
            fields,
            findings: block_findings,
        } = parse_block(block, slide_index);
        findings.extend(block_findings);

        let layout_kind = match classify_layout(&fields) {
            Ok(kind) => kind,
            Err(conflict) => {
                findings.push(ValidationFinding::error(
                    Some(slide_index),
                    FindingCode::ConflictingLayout,
                    conflict.to_string(),
                ));
                continue;
            }
        };

        let regions = resolve_layout(&fields, layout_kind);
        log::debug!(
            "slide {}: {} layout, {} region(s)",
            slide_index,
            layout_kind,
            regions.len()
        );

        let notes = (!fields.notes.is_empty()).then(|| fields.notes.join("\n"));

        slides.push(SlideSpec {
            slide_index,
            title: fields.title,
            layout_kind,
            regions,
            notes,
            template: fields.template,
        });
    }

    (slides, findings)
}
