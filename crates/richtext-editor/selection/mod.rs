//! Selection state and caret navigation
//!
//! A selection lives in one container and is stored in the external
//! half-open convention. "Select all" and "no selection" are states of
//! their own; they resolve against the container's length only when a
//! concrete range is needed. The internal inclusive convention is available
//! through [`Selection::internal`] and [`Selection::set_internal`].

pub mod caret;
pub mod navigation;

pub use caret::Caret;
pub use navigation::{find_next_word_position, word_range_at, Navigator};

use crate::core::ContainerPath;
use richtext_core::{InternalSelection, SelectionRange, TextRange};

/// Current selection of an editor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    /// Container the selection belongs to
    pub container: ContainerPath,
    state: SelectionRange,
    anchor: Option<usize>,
    cells: Vec<(ContainerPath, TextRange)>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected range in a container of `len` positions, never empty
    #[must_use]
    pub fn range(&self, len: usize) -> Option<TextRange> {
        self.state.resolve(len)
    }

    /// Position shift-navigation extends from
    #[must_use]
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        !self.state.is_none() || !self.cells.is_empty()
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        self.state.is_all()
    }

    /// Check if `position` is inside the selection of a container of `len`
    /// positions
    #[must_use]
    pub fn contains(&self, position: usize, len: usize) -> bool {
        self.range(len).is_some_and(|r| r.contains(position))
    }

    /// Per-cell ranges of a table block selection
    #[must_use]
    pub fn cells(&self) -> &[(ContainerPath, TextRange)] {
        &self.cells
    }

    fn replace(&mut self, state: SelectionRange) -> bool {
        let state = match state {
            SelectionRange::Span(range) => SelectionRange::span(range),
            other => other,
        };
        let changed = self.state != state || !self.cells.is_empty();
        self.state = state;
        self.cells.clear();
        changed
    }

    /// Select `range` in the current container
    ///
    /// Returns whether the selection changed.
    pub fn set_range(&mut self, range: TextRange) -> bool {
        self.anchor = Some(range.start);
        self.replace(SelectionRange::Span(range))
    }

    /// Select `[anchor, caret)` normalized
    ///
    /// Returns whether the selected range changed, so callers can repaint
    /// only the [`symmetric_difference`] of the old and new ranges.
    pub fn extend(&mut self, anchor: usize, caret: usize) -> bool {
        self.anchor = Some(anchor);
        self.replace(SelectionRange::Span(TextRange::new(anchor, caret)))
    }

    /// Select the whole container, however long it grows
    pub fn select_all(&mut self) -> bool {
        self.anchor = Some(0);
        self.replace(SelectionRange::All)
    }

    pub fn select_none(&mut self) -> bool {
        self.anchor = None;
        self.replace(SelectionRange::None)
    }

    /// Select a block of table cells, one range per cell
    pub fn select_cells(&mut self, cells: Vec<(ContainerPath, TextRange)>) -> bool {
        let changed = self.cells != cells || !self.state.is_none();
        self.state = SelectionRange::None;
        self.anchor = None;
        self.cells = cells;
        changed
    }

    /// Selection in the external convention, sentinels included
    #[must_use]
    pub fn external(&self) -> SelectionRange {
        self.state
    }

    /// Set from the external convention
    ///
    /// Sentinels are kept as given; spans are clipped to `len`.
    pub fn set_external(&mut self, selection: SelectionRange, len: usize) -> bool {
        match selection {
            SelectionRange::All => self.select_all(),
            SelectionRange::None => self.select_none(),
            SelectionRange::Span(_) => match selection.resolve(len) {
                Some(range) => self.set_range(range),
                None => self.select_none(),
            },
        }
    }

    /// Selection in the internal convention, sentinels included
    #[must_use]
    pub fn internal(&self) -> InternalSelection {
        self.state.to_internal()
    }

    /// Set from the internal convention
    ///
    /// Sentinels are kept as given; spans are clipped to `len`.
    pub fn set_internal(&mut self, selection: InternalSelection, len: usize) -> bool {
        match selection {
            InternalSelection::All => self.select_all(),
            InternalSelection::None => self.select_none(),
            InternalSelection::Span(_) => match selection.resolve(len) {
                Some(range) => self.set_range(range.into()),
                None => self.select_none(),
            },
        }
    }
}

/// Ranges covered by exactly one of `old` and `new`
#[must_use]
pub fn symmetric_difference(old: Option<TextRange>, new: Option<TextRange>) -> Vec<TextRange> {
    match (old, new) {
        (None, None) => Vec::new(),
        (Some(r), None) | (None, Some(r)) => vec![r],
        (Some(a), Some(b)) if !a.overlaps(&b) => {
            let (first, second) = if a.start <= b.start { (a, b) } else { (b, a) };
            vec![first, second]
        }
        (Some(a), Some(b)) => {
            let mut out = Vec::with_capacity(2);
            let (lo_start, hi_start) = (a.start.min(b.start), a.start.max(b.start));
            if lo_start < hi_start {
                out.push(TextRange::new(lo_start, hi_start));
            }
            let (lo_end, hi_end) = (a.end.min(b.end), a.end.max(b.end));
            if lo_end < hi_end {
                out.push(TextRange::new(lo_end, hi_end));
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extend_reports_changes() {
        let mut selection = Selection::new();
        assert!(selection.extend(5, 2));
        assert_eq!(selection.range(10), Some(TextRange::new(2, 5)));
        assert_eq!(selection.anchor(), Some(5));
        assert!(!selection.extend(5, 2));
        assert!(selection.extend(5, 5));
        assert!(!selection.has_selection());
    }

    #[test]
    fn all_and_none() {
        let mut selection = Selection::new();
        assert!(selection.select_all());
        assert!(!selection.select_all());
        assert_eq!(selection.range(6), Some(TextRange::new(0, 6)));
        assert_eq!(selection.range(9), Some(TextRange::new(0, 9)));
        assert!(selection.contains(8, 9));
        assert_eq!(selection.range(0), None);
        assert!(selection.select_none());
        assert!(!selection.select_none());
        assert!(!selection.has_selection());
    }

    #[test]
    fn conventions() {
        let mut selection = Selection::new();
        selection.set_external(SelectionRange::Span(TextRange::new(2, 4)), 10);
        assert_eq!(selection.internal().to_pair(), (2, 3));

        selection.set_internal(InternalSelection::from_pair(1, 8), 5);
        assert_eq!(selection.external().to_pair(), (1, 5));

        selection.set_external(SelectionRange::from_pair(-2, -2), 10);
        assert_eq!(selection.external(), SelectionRange::None);
        assert_eq!(selection.internal().to_pair(), InternalSelection::NONE_PAIR);
    }

    #[test]
    fn sentinels_survive_both_conventions() {
        let mut selection = Selection::new();
        selection.set_external(SelectionRange::All, 10);
        assert_eq!(selection.external(), SelectionRange::All);
        assert_eq!(selection.internal(), InternalSelection::All);
        assert_eq!(selection.external().to_pair(), SelectionRange::ALL_PAIR);
        assert_eq!(selection.internal().to_pair(), InternalSelection::ALL_PAIR);
        assert_eq!(selection.range(14), Some(TextRange::new(0, 14)));

        selection.set_internal(InternalSelection::None, 10);
        assert_eq!(selection.external(), SelectionRange::None);
        assert_eq!(selection.internal(), InternalSelection::None);

        selection.set_internal(InternalSelection::from_pair(-2, -2), 10);
        assert!(selection.is_all());
        assert_eq!(selection.external(), SelectionRange::All);
    }

    #[test]
    fn cells_replace_the_range() {
        let mut selection = Selection::new();
        selection.set_range(TextRange::new(0, 3));
        let cell = ContainerPath::root();
        assert!(selection.select_cells(vec![(cell, TextRange::new(0, 1))]));
        assert_eq!(selection.range(10), None);
        assert!(selection.has_selection());
        assert!(selection.select_none());
        assert!(selection.cells().is_empty());
    }

    #[test]
    fn repaint_regions() {
        let r = TextRange::new;
        assert_eq!(symmetric_difference(Some(r(2, 5)), Some(r(2, 8))), vec![r(5, 8)]);
        assert_eq!(
            symmetric_difference(Some(r(2, 5)), Some(r(3, 6))),
            vec![r(2, 3), r(5, 6)]
        );
        assert_eq!(
            symmetric_difference(Some(r(6, 9)), Some(r(0, 2))),
            vec![r(0, 2), r(6, 9)]
        );
        assert_eq!(symmetric_difference(None, Some(r(1, 2))), vec![r(1, 2)]);
        assert!(symmetric_difference(Some(r(1, 2)), Some(r(1, 2))).is_empty());
    }
}
