//! Style resolution and application
//!
//! Combined styles are composed in increasing precedence from the basic
//! style, the paragraph's named style, the paragraph's own attributes, the
//! object's named character style and the object's own attributes. Only
//! fields a layer sets override earlier layers.

pub mod context;
pub mod resolver;

pub use context::StyleContext;
pub use resolver::{combine_layers, StyleLayers};

bitflags::bitflags! {
    /// Flags controlling how a style is written to a range
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SetStyleFlags: u32 {
        /// Record the change as an undo step
        const WITH_UNDO = 1 << 0;
        /// Skip fields the combined style already has
        const OPTIMIZE = 1 << 1;
        /// Write only the paragraph half of the style
        const PARAGRAPHS_ONLY = 1 << 2;
        /// Write only the character half of the style
        const CHARACTERS_ONLY = 1 << 3;
        /// Clear existing attributes in scope before applying
        const RESET = 1 << 4;
        /// Unset the fields the style sets instead of applying them
        const REMOVE = 1 << 5;
        /// Restart list numbering
        const RENUMBER = 1 << 6;
        /// Use the given list level instead of inferring it from indentation
        const SPECIFY_LEVEL = 1 << 7;
    }
}

impl SetStyleFlags {
    /// Flags used by the plain `set_style` entry points
    pub const DEFAULT: Self = Self::WITH_UNDO;

    /// Check whether the paragraph half is written
    #[must_use]
    pub fn writes_paragraphs(self) -> bool {
        !self.contains(Self::CHARACTERS_ONLY)
    }

    /// Check whether the character half is written
    #[must_use]
    pub fn writes_characters(self) -> bool {
        !self.contains(Self::PARAGRAPHS_ONLY)
    }
}

impl Default for SetStyleFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}
