//! Structural validation of compiled slides.
//!
//! Every rule is checked on every slide and all findings are returned; the
//! caller decides what to block on.

use crate::types::{FindingCode, LayoutKind, Region, RegionLabel, SlideSpec, ValidationFinding};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Titles longer than this are flagged.
pub const TITLE_MAX_CHARS: usize = 60;

/// Total text budget of a single-column slide.
pub const SINGLE_COLUMN_MAX_CHARS: usize = 500;

/// Per-column text budget of a two-column slide.
pub const TWO_COLUMN_MAX_CHARS: usize = 300;

/// Per-box text budget of a four-box slide.
pub const FOUR_BOX_MAX_CHARS: usize = 150;

/// Expected length of a reading passage.
pub const READING_PASSAGE_CHARS: RangeInclusive<usize> = 800..=1000;

/// More step lines than this in one region is hard to present.
pub const MAX_STEPS_PER_REGION: usize = 7;

/// Check every slide and return all findings in slide order.
pub fn validate(slides: &[SlideSpec]) -> Vec<ValidationFinding> {
    slides.iter().flat_map(validate_slide).collect()
}

/// Check one slide.
pub fn validate_slide(slide: &SlideSpec) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();
    let idx = Some(slide.slide_index);

    match &slide.title {
        None => findings.push(ValidationFinding::warning(
            idx,
            FindingCode::MissingTitle,
            "slide has no title",
        )),
        Some(title) => {
            let len = title.chars().count();
            if len > TITLE_MAX_CHARS {
                findings.push(ValidationFinding::warning(
                    idx,
                    FindingCode::TitleTooLong,
                    format!("title is {} characters (limit {})", len, TITLE_MAX_CHARS),
                ));
            }
        }
    }

    if slide.rendered_regions().next().is_none() {
        findings.push(ValidationFinding::error(
            idx,
            FindingCode::EmptySlide,
            "slide has no content",
        ));
    }

    findings.extend(check_lengths(slide));

    for region in &slide.regions {
        findings.extend(check_region_tags(slide.slide_index, region));

        let steps = region.step_count();
        if steps > MAX_STEPS_PER_REGION {
            findings.push(ValidationFinding::warning(
                idx,
                FindingCode::TooManySteps,
                format!(
                    "{} has {} step lines (more than {})",
                    region.label, steps, MAX_STEPS_PER_REGION
                ),
            ));
        }
    }

    findings
}

/// Length budgets per layout.
fn check_lengths(slide: &SlideSpec) -> Vec<ValidationFinding> {
    let idx = Some(slide.slide_index);
    let over = |code: FindingCode, region: &Region, limit: usize| {
        let len = region.rendered_len();
        (len > limit).then(|| {
            ValidationFinding::warning(
                idx,
                code,
                format!("{} has {} characters (limit {})", region.label, len, limit),
            )
        })
    };

    match slide.layout_kind {
        LayoutKind::Single => {
            let total: usize = slide.regions.iter().map(Region::rendered_len).sum();
            (total > SINGLE_COLUMN_MAX_CHARS)
                .then(|| {
                    ValidationFinding::warning(
                        idx,
                        FindingCode::SingleColumnOverflow,
                        format!(
                            "content has {} characters (limit {})",
                            total, SINGLE_COLUMN_MAX_CHARS
                        ),
                    )
                })
                .into_iter()
                .collect()
        }
        LayoutKind::TwoColumn => slide
            .regions
            .iter()
            .filter_map(|r| over(FindingCode::TwoColumnOverflow, r, TWO_COLUMN_MAX_CHARS))
            .collect(),
        LayoutKind::FourBox => slide
            .regions
            .iter()
            .filter_map(|r| over(FindingCode::FourBoxOverflow, r, FOUR_BOX_MAX_CHARS))
            .collect(),
        LayoutKind::Reading => slide
            .region(RegionLabel::LeftTop)
            .map(Region::rendered_len)
            .filter(|len| !READING_PASSAGE_CHARS.contains(len))
            .map(|len| {
                ValidationFinding::warning(
                    idx,
                    FindingCode::ReadingPassageLength,
                    format!(
                        "reading passage has {} characters (expected {} to {})",
                        len,
                        READING_PASSAGE_CHARS.start(),
                        READING_PASSAGE_CHARS.end()
                    ),
                )
            })
            .into_iter()
            .collect(),
    }
}

/// One warning per distinct unknown or malformed tag in a region.
fn check_region_tags(slide_index: usize, region: &Region) -> Vec<ValidationFinding> {
    let unknown: BTreeSet<&str> = region
        .lines
        .iter()
        .flat_map(|l| l.unknown_tags.iter().map(String::as_str))
        .collect();
    let malformed: BTreeSet<&str> = region
        .lines
        .iter()
        .flat_map(|l| l.malformed_tags.iter().map(String::as_str))
        .collect();

    let unknown = unknown.into_iter().map(|tag| {
        ValidationFinding::warning(
            Some(slide_index),
            FindingCode::UnknownTag,
            format!("unknown tag {} in {} (kept as text)", tag, region.label),
        )
    });
    let malformed = malformed.into_iter().map(|tag| {
        ValidationFinding::warning(
            Some(slide_index),
            FindingCode::MalformedTag,
            format!(
                "closing tag {} in {} matches no open tag (dropped)",
                tag, region.label
            ),
        )
    });

    unknown.chain(malformed).collect()
}
