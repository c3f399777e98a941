//! Edit-policy hooks
//!
//! The buffer asks its [`EditPolicy`] before every mutation. A `false`
//! answer vetoes the edit: the operation leaves the document unchanged and
//! reports failure to its caller.

use super::container::ContainerId;
use core::fmt;
use richtext_core::TextRange;

/// Synchronous veto hooks consulted before mutating a container
pub trait EditPolicy: fmt::Debug + Send + Sync {
    /// May content be inserted at `position` of `container`?
    fn can_insert_content(&self, container: ContainerId, position: usize) -> bool {
        let _ = (container, position);
        true
    }

    /// May `range` of `container` be deleted?
    fn can_delete_range(&self, container: ContainerId, range: TextRange) -> bool {
        let _ = (container, range);
        true
    }

    /// May the attributes of `range` be changed?
    ///
    /// Defaults to the delete check.
    fn can_modify_range(&self, container: ContainerId, range: TextRange) -> bool {
        self.can_delete_range(container, range)
    }
}

/// Policy that allows every edit
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl EditPolicy for AllowAll {}

/// Policy that protects fixed ranges of one container
///
/// Insertions strictly inside a protected range and any deletion or
/// modification touching one are vetoed.
#[derive(Debug, Clone, Default)]
pub struct ProtectedRanges {
    pub container: ContainerId,
    pub ranges: Vec<TextRange>,
}

impl ProtectedRanges {
    #[must_use]
    pub fn new(container: ContainerId, ranges: Vec<TextRange>) -> Self {
        Self { container, ranges }
    }
}

impl EditPolicy for ProtectedRanges {
    fn can_insert_content(&self, container: ContainerId, position: usize) -> bool {
        container != self.container
            || !self
                .ranges
                .iter()
                .any(|r| position > r.start && position < r.end)
    }

    fn can_delete_range(&self, container: ContainerId, range: TextRange) -> bool {
        container != self.container || !self.ranges.iter().any(|r| r.overlaps(&range))
    }
}
