//! Content compiler for plain-text lesson slides.
//!
//! Turns `Label: value` slide blocks separated by `---` lines into a
//! validated, layout-aware slide tree with sizing advice, ready for an
//! external presentation writer.

pub mod compile;
pub mod error;
pub mod export;
pub mod layout;
pub mod parser;
pub mod sizing;
pub mod tokenize;
pub mod types;
pub mod validate;

pub use compile::{compile, compile_bytes, CompileResult, SlideAdvice};
pub use error::{Error, Result};
pub use export::{ExportBundle, StyleConfig};
pub use layout::{is_list, resolve_layout, strip_list_marker};
pub use parser::{classify_layout, parse_document, split_document, Document, FieldMap};
pub use sizing::{advise_scale, placement, Placement, SizingAdvice};
pub use tokenize::{resolve_runs, substitute_math, tokenize_line};
pub use types::{
    ContentLine, FindingCode, LayoutKind, Region, RegionLabel, Run, RunStyle, Severity,
    SlideSpec, ValidationFinding,
};
pub use validate::validate;
