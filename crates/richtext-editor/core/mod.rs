//! Core types of the document model
//!
//! This module contains the fundamental building blocks of the editor:
//! - `Buffer`: the root container plus style sheets, history and policy
//! - Containers, paragraphs and inline objects
//! - Undo history with batching and suppression
//! - Error types for editor operations

pub mod buffer;
pub mod container;
#[cfg(feature = "delayed-images")]
pub mod delayed_images;
pub mod errors;
pub mod history;
pub mod object;
pub mod policy;

// Re-export commonly used types
pub use buffer::{Buffer, Checkpoint, Edit};
pub use container::{Container, ContainerId, ContainerPath, PathStep};
#[cfg(feature = "delayed-images")]
pub use delayed_images::{DecodedImage, ImageLoadQueue};
pub use errors::{EditorError, Result};
pub use history::{
    BatchMark, HistoryEntry, HistoryStats, Operation, UndoManager, UndoStack, UndoStackConfig,
};
pub use object::{
    BoxObject, DocumentObject, FieldObject, ImageObject, InlineObject, ObjectBase, Paragraph,
    TableObject, TextRun, OBJECT_REPLACEMENT,
};
pub use policy::{AllowAll, EditPolicy, ProtectedRanges};
