//! Error types for the richtext-editor crate
//!
//! `EditorError` wraps `CoreError` from richtext-core and adds the cases that
//! only exist once there is a mutable document: missing containers, vetoed
//! edits, undo history failures and layout queries made before a layout
//! exists.
//!
//! Command-shaped public operations do not surface these to callers; they log
//! the error and report `false`. The typed errors are available to code that
//! drives commands directly.

use core::fmt;
use richtext_core::CoreError;
use thiserror::Error;

/// Main error type for richtext-editor operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Errors from richtext-core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A container path no longer resolves to a container
    #[error("Container not found: {path}")]
    ContainerNotFound { path: String },

    /// Position out of bounds
    #[error("Position out of bounds: {position} (container length: {length})")]
    PositionOutOfBounds { position: usize, length: usize },

    /// An edit-policy hook refused the edit
    #[error("Edit vetoed by policy: {operation}")]
    EditVetoed { operation: String },

    /// No operation to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// No operation to redo
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Begin/End batch or suppress calls did not balance
    #[error("Unbalanced undo nesting: {message}")]
    UnbalancedUndo { message: String },

    /// Undo/redo operation failed
    #[error("History operation failed: {message}")]
    HistoryError { message: String },

    /// Command execution failed
    #[error("Command execution failed: {message}")]
    CommandFailed { message: String },

    /// A geometric query was made with no layout available
    #[error("Layout unavailable: {message}")]
    LayoutUnavailable { message: String },
}

impl EditorError {
    /// Create a new command failed error
    pub fn command_failed<T: fmt::Display>(message: T) -> Self {
        Self::CommandFailed {
            message: message.to_string(),
        }
    }

    /// Create a new history error
    pub fn history<T: fmt::Display>(message: T) -> Self {
        Self::HistoryError {
            message: message.to_string(),
        }
    }

    /// Create a new vetoed edit error
    pub fn vetoed<T: fmt::Display>(operation: T) -> Self {
        Self::EditVetoed {
            operation: operation.to_string(),
        }
    }

    /// Create a new unbalanced nesting error
    pub fn unbalanced<T: fmt::Display>(message: T) -> Self {
        Self::UnbalancedUndo {
            message: message.to_string(),
        }
    }

    /// Check if error is recoverable
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Core(core_err) => core_err.is_recoverable(),
            Self::ContainerNotFound { .. }
            | Self::PositionOutOfBounds { .. }
            | Self::EditVetoed { .. }
            | Self::NothingToUndo
            | Self::NothingToRedo
            | Self::HistoryError { .. }
            | Self::CommandFailed { .. }
            | Self::LayoutUnavailable { .. } => true,
            Self::UnbalancedUndo { .. } => false,
        }
    }

    /// Check if this is a position-related error
    #[must_use]
    pub const fn is_position_error(&self) -> bool {
        matches!(
            self,
            Self::PositionOutOfBounds { .. } | Self::Core(CoreError::InvalidRange { .. })
        )
    }

    /// Check if this is a history-related error
    #[must_use]
    pub const fn is_history_error(&self) -> bool {
        matches!(
            self,
            Self::HistoryError { .. }
                | Self::NothingToUndo
                | Self::NothingToRedo
                | Self::UnbalancedUndo { .. }
        )
    }

    /// Get the underlying core error if this wraps one
    #[must_use]
    pub const fn as_core_error(&self) -> Option<&CoreError> {
        match self {
            Self::Core(core_err) => Some(core_err),
            _ => None,
        }
    }
}

/// Result type alias for editor operations
pub type Result<T> = core::result::Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_conversion_from_core() {
        let core_err = CoreError::unknown_style("Heading");
        let editor_err: EditorError = core_err.clone().into();
        assert_eq!(editor_err.as_core_error(), Some(&core_err));
        assert!(editor_err.is_recoverable());
    }

    #[test]
    fn error_classification() {
        assert!(EditorError::NothingToUndo.is_history_error());
        assert!(EditorError::unbalanced("end without begin").is_history_error());
        assert!(!EditorError::unbalanced("x").is_recoverable());
        assert!(EditorError::PositionOutOfBounds {
            position: 9,
            length: 3
        }
        .is_position_error());
        assert!(!EditorError::vetoed("delete").is_position_error());
    }

    #[test]
    fn error_display() {
        let err = EditorError::vetoed("delete [0, 4)");
        assert_eq!(err.to_string(), "Edit vetoed by policy: delete [0, 4)");
    }
}
