//! # richtext-core
//!
//! Value types shared by the structured rich-text engine: character ranges in
//! both addressing conventions, style attributes with per-field set/unset
//! semantics, and style sheets holding named character, paragraph and list
//! definitions.
//!
//! Nothing here owns a document tree. The mutable document, undo history and
//! caret logic live in `richtext-editor`.
//!
//! ## Quick Start
//!
//! ```rust
//! use richtext_core::{TextAttr, TextRange, StyleSheet};
//!
//! let mut base = TextAttr::new();
//! base.set_font_size(10.0);
//!
//! let mut bold = TextAttr::new();
//! bold.set_bold(true);
//!
//! let mut combined = base.clone();
//! combined.apply(&bold);
//! assert_eq!(combined.font_size(), Some(10.0));
//! assert!(combined.is_bold());
//!
//! let sheet = StyleSheet::with_standard_lists();
//! assert!(sheet.list_style("Arabic").is_some());
//!
//! let range = TextRange::new(3, 1).normalize();
//! assert_eq!(range, TextRange::new(1, 3));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]

pub mod attr;
pub mod range;
pub mod sheet;
pub mod utils;

pub use attr::{
    Alignment, BulletStyle, CharacterAttrs, Color, FontWeight, ParagraphAttrs, TextAttr,
    TextEffects, UNITS_PER_MM,
};
pub use range::{CharRange, InternalSelection, SelectionRange, TextRange};
pub use sheet::{
    CharacterStyleDefinition, ListLevel, ListStyleDefinition, NumberingKind,
    ParagraphStyleDefinition, StyleDefinition, StyleSheet, StyleSheetStack, LIST_INDENT_STEP,
    MAX_LIST_LEVELS,
};
pub use utils::{CoreError, Result};
