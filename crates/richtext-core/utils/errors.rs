//! Core error type for richtext operations
//!
//! Style-sheet and range problems are mostly recovered from by the callers
//! (unknown names degrade to direct attributes, levels are clamped), so these
//! variants surface only from the fallible lookup helpers.

use core::fmt;
use thiserror::Error;

/// Errors produced by richtext-core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Named style is not defined in any style sheet
    #[error("Unknown style: {name}")]
    UnknownStyle { name: String },

    /// Range cannot be interpreted in the requested convention
    #[error("Invalid range: start {start}, end {end}")]
    InvalidRange { start: i64, end: i64 },

    /// List level outside `0..=9`
    #[error("Invalid list level {level} (valid levels are 0..={max})")]
    InvalidListLevel { level: i32, max: usize },

    /// Base-style chain loops back on itself
    #[error("Circular style inheritance involving '{name}'")]
    CircularStyleInheritance { name: String },

    /// Internal consistency error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Create an unknown style error
    pub fn unknown_style<T: fmt::Display>(name: T) -> Self {
        Self::UnknownStyle {
            name: name.to_string(),
        }
    }

    /// Create internal error (indicates a bug)
    pub fn internal<T: fmt::Display>(message: T) -> Self {
        Self::Internal(message.to_string())
    }

    /// Check if error is recoverable
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::UnknownStyle { .. }
            | Self::InvalidRange { .. }
            | Self::InvalidListLevel { .. } => true,
            Self::CircularStyleInheritance { .. } | Self::Internal(_) => false,
        }
    }
}

/// Result type alias for core operations
pub type Result<T> = core::result::Result<T, CoreError>;
