//! Structured rich-text document engine
//!
//! `richtext-editor` holds a document as a tree of containers, paragraphs
//! and inline objects, edits it through undoable commands and maps between
//! document positions and pixels.
//!
//! # Features
//!
//! - **Object tree**: text runs, images, fields, tables and text boxes, with
//!   nested containers addressed by path
//! - **Layered styles**: combined styles resolved from the basic style, named
//!   paragraph and character styles and direct attributes
//! - **Lists**: numbering, promotion and renumbering driven by named list
//!   styles
//! - **Undo/redo**: batching and suppression with a bounded history
//! - **Layout and hit-testing**: line wrapping against a host measurer,
//!   caret rectangles that resolve the wrap-boundary ambiguity
//! - **Editor**: caret, selection, navigation and view state behind
//!   [`RichTextEditor`]
//!
//! # Example
//!
//! ```
//! use richtext_editor::{Buffer, BufferCommandExt, TextAttr, TextRange};
//!
//! let mut buffer = Buffer::new();
//! assert!(buffer.add_paragraph("Hello"));
//!
//! let mut bold = TextAttr::new();
//! bold.set_bold(true);
//! assert!(buffer.set_style(TextRange::new(0, 5), &bold));
//! assert!(buffer.combined_style(2).is_bold());
//!
//! assert!(buffer.delete(TextRange::new(0, 5)));
//! assert_eq!(buffer.last_position(), 0);
//!
//! buffer.undo().unwrap();
//! assert_eq!(buffer.text(), "Hello");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]

pub mod commands;
pub mod core;
pub mod editor;
pub mod layout;
pub mod selection;
pub mod style;

pub use richtext_core::{
    Alignment, BulletStyle, CharRange, Color, InternalSelection, ListLevel, ListStyleDefinition,
    NumberingKind, SelectionRange, StyleSheet, TextAttr, TextEffects, TextRange,
};

pub use commands::{
    ApplyNamedStyleCommand, BatchCommand, BufferCommandExt, ClearCommand, ClearListStyleCommand,
    CommandResult, Content, DeleteRangeCommand, EditorCommand, InsertContentCommand,
    PromoteListCommand, RenumberListCommand, SetListStyleCommand, SetStyleCommand,
};
pub use core::{
    Buffer, Container, ContainerId, ContainerPath, EditPolicy, EditorError, HistoryStats,
    ImageObject, InlineObject, Paragraph, ProtectedRanges, Result, UndoManager, UndoStackConfig,
};
#[cfg(feature = "delayed-images")]
pub use core::{DecodedImage, ImageLoadQueue};
pub use editor::{EditIntent, EditorConfig, Motion, RichTextEditor};
pub use layout::{
    DocumentLayout, FixedPitchMeasurer, HitTestFlags, HitTestResult, LayoutConfig, Painter, Point,
    Rect, Size, TextMeasurer,
};
pub use selection::{Caret, Selection};
pub use style::{SetStyleFlags, StyleContext};
