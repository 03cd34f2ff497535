//! Region geometry and font-scale advice so long content shrinks to fit.

use crate::layout::is_list;
use crate::types::{LayoutKind, Region, RegionLabel, SlideSpec};
use crate::validate::{
    FOUR_BOX_MAX_CHARS, READING_PASSAGE_CHARS, SINGLE_COLUMN_MAX_CHARS, TWO_COLUMN_MAX_CHARS,
};
use serde::{Deserialize, Serialize};

/// Smallest scale ever advised.
pub const MIN_SCALE: f64 = 0.5;

/// Scale lost per whole capacity of overflow.
const DECAY_PER_CAPACITY: f64 = 0.5;

/// Capacity of the Reading question box: the passage budget scaled to the
/// 35% of the content height that box gets.
const READING_QUESTIONS_CHARS: usize = 350;

/// Content area below the title, in inches.
pub const CONTENT_WIDTH_IN: f64 = 10.5;
pub const CONTENT_HEIGHT_IN: f64 = 5.0;

const COLUMN_GAP_IN: f64 = 0.4;
const ROW_GAP_IN: f64 = 0.3;

/// Share of the content height given to a reading passage.
const READING_PASSAGE_SHARE: f64 = 0.65;

/// Where a region sits, as fractions of the content area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Placement {
    const FULL: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Scale to inches on a content area of the given size.
    pub fn to_inches(self, area_width: f64, area_height: f64) -> Self {
        Self::new(
            self.x * area_width,
            self.y * area_height,
            self.width * area_width,
            self.height * area_height,
        )
    }
}

/// Fixed placement of a region slot within its layout.
pub fn placement(kind: LayoutKind, label: RegionLabel) -> Placement {
    let column = (CONTENT_WIDTH_IN - COLUMN_GAP_IN) / 2.0 / CONTENT_WIDTH_IN;
    let row = (CONTENT_HEIGHT_IN - ROW_GAP_IN) / 2.0 / CONTENT_HEIGHT_IN;
    let right = 1.0 - column;
    let lower = 1.0 - row;

    if kind == LayoutKind::Reading {
        let gap = ROW_GAP_IN / CONTENT_HEIGHT_IN;
        return match label {
            RegionLabel::LeftTop => Placement::new(0.0, 0.0, 1.0, READING_PASSAGE_SHARE),
            _ => Placement::new(
                0.0,
                READING_PASSAGE_SHARE + gap,
                1.0,
                1.0 - READING_PASSAGE_SHARE - gap,
            ),
        };
    }

    match label {
        RegionLabel::Content => Placement::FULL,
        RegionLabel::Left => Placement::new(0.0, 0.0, column, 1.0),
        RegionLabel::Right => Placement::new(right, 0.0, column, 1.0),
        RegionLabel::LeftTop => Placement::new(0.0, 0.0, column, row),
        RegionLabel::RightTop => Placement::new(right, 0.0, column, row),
        RegionLabel::LeftBottom => Placement::new(0.0, lower, column, row),
        RegionLabel::RightBottom => Placement::new(right, lower, column, row),
    }
}

/// Recommended placement and scale for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingAdvice {
    pub label: RegionLabel,

    /// Rendered characters, measured like validation measures them.
    pub rendered_len: usize,

    /// Reference capacity of this region in this layout.
    pub capacity: usize,

    /// Factor in `[MIN_SCALE, 1.0]` to apply to the base font size.
    pub scale_factor: f64,

    pub placement: Placement,

    /// Draw the lines as list items.
    pub is_list: bool,
}

impl SizingAdvice {
    /// Scale a base font size in points, rounded to half points.
    pub fn font_size(&self, base_pt: f64) -> f64 {
        (base_pt * self.scale_factor * 2.0).round() / 2.0
    }
}

/// Reference capacity of a region in a layout.
pub fn capacity(kind: LayoutKind, label: RegionLabel) -> usize {
    match kind {
        LayoutKind::Single => SINGLE_COLUMN_MAX_CHARS,
        LayoutKind::TwoColumn => TWO_COLUMN_MAX_CHARS,
        LayoutKind::FourBox => FOUR_BOX_MAX_CHARS,
        LayoutKind::Reading if label == RegionLabel::LeftTop => *READING_PASSAGE_CHARS.end(),
        LayoutKind::Reading => READING_QUESTIONS_CHARS,
    }
}

/// Scale factor for a length against a capacity.
///
/// 1.0 up to capacity, then a linear decay bounded at [`MIN_SCALE`].
pub fn scale_for(len: usize, capacity: usize) -> f64 {
    if capacity == 0 || len <= capacity {
        return 1.0;
    }
    let ratio = len as f64 / capacity as f64;
    (1.0 - DECAY_PER_CAPACITY * (ratio - 1.0)).max(MIN_SCALE)
}

/// Advise a scale for one region.
pub fn advise_scale(region: &Region, kind: LayoutKind) -> SizingAdvice {
    let rendered_len = region.rendered_len();
    let capacity = capacity(kind, region.label);

    SizingAdvice {
        label: region.label,
        rendered_len,
        capacity,
        scale_factor: scale_for(rendered_len, capacity),
        placement: placement(kind, region.label),
        is_list: is_list(region),
    }
}

/// Advise every region that would be drawn.
pub fn advise_slide(slide: &SlideSpec) -> Vec<SizingAdvice> {
    slide
        .rendered_regions()
        .map(|r| advise_scale(r, slide.layout_kind))
        .collect()
}
