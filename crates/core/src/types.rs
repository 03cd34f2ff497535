//! Domain types for the compiled slide tree and its validation findings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four slide shapes a block can compile to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutKind {
    /// One content column driven by `Content:` lines.
    Single,
    /// `Left:` and `Right:` columns.
    TwoColumn,
    /// Four quadrant boxes.
    FourBox,
    /// A long passage on top with numbered questions below.
    Reading,
}

impl LayoutKind {
    /// Region slots of this layout, in placement order.
    pub fn slots(self) -> &'static [RegionLabel] {
        match self {
            Self::Single => &[RegionLabel::Content],
            Self::TwoColumn => &[RegionLabel::Left, RegionLabel::Right],
            Self::FourBox => &[
                RegionLabel::LeftTop,
                RegionLabel::RightTop,
                RegionLabel::LeftBottom,
                RegionLabel::RightBottom,
            ],
            Self::Reading => &[RegionLabel::LeftTop, RegionLabel::LeftBottom],
        }
    }

    /// Default body font size in points for this layout.
    pub fn base_font_size(self) -> f64 {
        match self {
            Self::FourBox => 18.0,
            _ => 22.0,
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::TwoColumn => write!(f, "two-column"),
            Self::FourBox => write!(f, "four-box"),
            Self::Reading => write!(f, "reading"),
        }
    }
}

/// A placement slot on a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RegionLabel {
    Content,
    Left,
    Right,
    LeftTop,
    RightTop,
    LeftBottom,
    RightBottom,
}

impl RegionLabel {
    /// Every region label, in declaration order.
    pub const ALL: [RegionLabel; 7] = [
        Self::Content,
        Self::Left,
        Self::Right,
        Self::LeftTop,
        Self::RightTop,
        Self::LeftBottom,
        Self::RightBottom,
    ];

    /// The field label used for this region in source text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Content => "Content",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::LeftTop => "LeftTop",
            Self::RightTop => "RightTop",
            Self::LeftBottom => "LeftBottom",
            Self::RightBottom => "RightBottom",
        }
    }

    /// Whether this is one of the four quadrant labels.
    pub fn is_box(self) -> bool {
        matches!(
            self,
            Self::LeftTop | Self::RightTop | Self::LeftBottom | Self::RightBottom
        )
    }

    /// Whether this is one of the two column labels.
    pub fn is_column(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl fmt::Display for RegionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic style of a run. Colors are chosen downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStyle {
    #[default]
    Plain,
    Vocabulary,
    Question,
    Answer,
    Emphasis,
}

impl RunStyle {
    /// Look up a style tag keyword, ignoring ASCII case.
    pub fn from_tag(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "vocabulary" => Some(Self::Vocabulary),
            "question" => Some(Self::Question),
            "answer" => Some(Self::Answer),
            "emphasis" => Some(Self::Emphasis),
            _ => None,
        }
    }
}

/// A contiguous span of text with one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// Text after math-symbol substitution.
    pub text: String,

    /// Style classification.
    pub style: RunStyle,
}

impl Run {
    /// Create a run with the given text and style.
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Create an unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, RunStyle::Plain)
    }
}

/// One logical line inside a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLine {
    /// Styled runs in reading order.
    pub runs: Vec<Run>,

    /// Whether the line is revealed sequentially.
    pub is_step: bool,

    /// 1-based position among the region's step lines, 0 otherwise.
    pub step_order: usize,

    /// Bracket keywords outside the tag vocabulary, kept as literal text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_tags: Vec<String>,

    /// Closing markers that matched no open span and were dropped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub malformed_tags: Vec<String>,
}

impl ContentLine {
    /// The line's rendered text: all runs concatenated.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Rendered character count.
    pub fn rendered_len(&self) -> usize {
        self.runs.iter().map(|r| r.text.chars().count()).sum()
    }

    /// A spacer line with no visible text.
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }
}

/// A placement slot with its ordered lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub label: RegionLabel,
    pub lines: Vec<ContentLine>,
}

impl Region {
    /// Create an empty region.
    pub fn new(label: RegionLabel) -> Self {
        Self {
            label,
            lines: Vec::new(),
        }
    }

    /// Rendered character count of the whole region.
    ///
    /// Counts Unicode scalar values of run text after substitution. Tag
    /// markers and line separators do not count. Validation and sizing both
    /// measure with this function.
    pub fn rendered_len(&self) -> usize {
        self.lines.iter().map(ContentLine::rendered_len).sum()
    }

    /// True when no line carries visible text.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(ContentLine::is_blank)
    }

    /// Number of step-tagged lines.
    pub fn step_count(&self) -> usize {
        self.lines.iter().filter(|l| l.is_step).count()
    }

    /// Lines revealed at once, followed by step lines in reveal order.
    pub fn reveal_groups(&self) -> (Vec<&ContentLine>, Vec<&ContentLine>) {
        let (mut steps, immediate): (Vec<_>, Vec<_>) =
            self.lines.iter().partition(|l| l.is_step);
        steps.sort_by_key(|l| l.step_order);
        (immediate, steps)
    }

    /// The region's text with one line per row.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(ContentLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One compiled slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideSpec {
    /// 1-based position in the block sequence.
    pub slide_index: usize,

    pub title: Option<String>,

    pub layout_kind: LayoutKind,

    /// Every slot of the layout, in placement order, including empty ones.
    pub regions: Vec<Region>,

    /// Speaker notes, one paragraph per `Notes:` line.
    pub notes: Option<String>,

    /// Advisory template hint from a `Template:` line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl SlideSpec {
    /// Regions that would actually be drawn.
    pub fn rendered_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| !r.is_empty())
    }

    /// Look up a region by label.
    pub fn region(&self, label: RegionLabel) -> Option<&Region> {
        self.regions.iter().find(|r| r.label == label)
    }
}

/// Whether a finding blocks export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One code per validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCode {
    TitleTooLong,
    MissingTitle,
    DuplicateTitle,
    SingleColumnOverflow,
    TwoColumnOverflow,
    FourBoxOverflow,
    ReadingPassageLength,
    EmptySlide,
    UnknownLabel,
    ConflictingLayout,
    UnknownTag,
    MalformedTag,
    TooManySteps,
    StrayLine,
    EmptyDocument,
}

impl FindingCode {
    /// Stable identifier used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TitleTooLong => "title_too_long",
            Self::MissingTitle => "missing_title",
            Self::DuplicateTitle => "duplicate_title",
            Self::SingleColumnOverflow => "single_column_overflow",
            Self::TwoColumnOverflow => "two_column_overflow",
            Self::FourBoxOverflow => "four_box_overflow",
            Self::ReadingPassageLength => "reading_passage_length",
            Self::EmptySlide => "empty_slide",
            Self::UnknownLabel => "unknown_label",
            Self::ConflictingLayout => "conflicting_layout",
            Self::UnknownTag => "unknown_tag",
            Self::MalformedTag => "malformed_tag",
            Self::TooManySteps => "too_many_steps",
            Self::StrayLine => "stray_line",
            Self::EmptyDocument => "empty_document",
        }
    }
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural problem found while compiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFinding {
    pub severity: Severity,

    /// Slide the finding belongs to; `None` for document-level findings.
    pub slide_index: Option<usize>,

    pub code: FindingCode,

    pub message: String,
}

impl ValidationFinding {
    /// Create a blocking finding.
    pub fn error(slide_index: Option<usize>, code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            slide_index,
            code,
            message: message.into(),
        }
    }

    /// Create an advisory finding.
    pub fn warning(
        slide_index: Option<usize>,
        code: FindingCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            slide_index,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slide_index {
            Some(idx) => write!(
                f,
                "slide {}: {}[{}]: {}",
                idx, self.severity, self.code, self.message
            ),
            None => write!(f, "document: {}[{}]: {}", self.severity, self.code, self.message),
        }
    }
}
