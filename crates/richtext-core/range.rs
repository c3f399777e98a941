//! Character ranges in the two addressing conventions
//!
//! Callers address text with half-open ranges (`[start, end)`, a single
//! character at `n` is `[n, n+1)`). The document internals address text with
//! inclusive ranges (`[first, last]`, a single character is `[n, n]`).
//!
//! The two conventions are separate types. Their "no selection" and "select
//! all" states are enum variants rather than magic integer pairs, so a sentinel
//! from one convention can never be read as a range in the other. Legacy
//! integer pairs are accepted only through [`SelectionRange::from_pair`] and
//! [`InternalSelection::from_pair`], which decode the sentinels by name.

use core::cmp::{max, min};
use core::fmt;

/// A half-open range `[start, end)` of character positions
///
/// An empty range denotes an insertion point, not a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRange {
    /// First included position
    pub start: usize,
    /// One past the last included position
    pub end: usize,
}

impl TextRange {
    /// Create a range as given, without normalizing
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create an empty range (insertion point) at `pos`
    #[must_use]
    pub const fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Range covering the single character at `pos`
    #[must_use]
    pub const fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    /// Swap the ends if the range is inverted
    #[must_use]
    pub fn normalize(self) -> Self {
        Self {
            start: min(self.start, self.end),
            end: max(self.start, self.end),
        }
    }

    /// Normalize, then clamp both ends to `[0, len]`
    #[must_use]
    pub fn clip(self, len: usize) -> Self {
        let range = self.normalize();
        Self {
            start: min(range.start, len),
            end: min(range.end, len),
        }
    }

    /// Check whether the range is an insertion point
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Number of characters covered
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the range covers `pos`
    #[must_use]
    pub const fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Check if `other` lies entirely inside this range
    #[must_use]
    pub const fn contains_range(&self, other: &Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Check if the ranges share at least one character
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if the ranges touch end-to-start without overlapping
    #[must_use]
    pub const fn is_adjacent(&self, other: &Self) -> bool {
        self.end == other.start || other.end == self.start
    }

    /// Smallest range containing both
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            start: min(self.start, other.start),
            end: max(self.end, other.end),
        }
    }

    /// Shared characters, if any
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = max(self.start, other.start);
        let end = min(self.end, other.end);
        (start < end).then_some(Self { start, end })
    }

    /// Shift both ends by `delta` positions towards the end of the document
    #[must_use]
    pub const fn shifted(&self, delta: usize) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    /// Convert to the internal inclusive convention
    ///
    /// Returns `None` for an empty range, which covers no character.
    #[must_use]
    pub const fn to_inclusive(&self) -> Option<CharRange> {
        if self.is_empty() {
            None
        } else {
            Some(CharRange {
                first: self.start,
                last: self.end - 1,
            })
        }
    }
}

impl From<core::ops::Range<usize>> for TextRange {
    fn from(range: core::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// An inclusive range `[first, last]` of character positions
///
/// Always covers at least one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharRange {
    /// First included position
    pub first: usize,
    /// Last included position
    pub last: usize,
}

impl CharRange {
    /// Create an inclusive range, swapping inverted ends
    #[must_use]
    pub fn new(first: usize, last: usize) -> Self {
        Self {
            first: min(first, last),
            last: max(first, last),
        }
    }

    /// Range covering the single character at `pos`
    #[must_use]
    pub const fn single(pos: usize) -> Self {
        Self {
            first: pos,
            last: pos,
        }
    }

    /// Number of characters covered
    #[must_use]
    pub const fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// Inclusive ranges are never empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Check if the range covers `pos`
    #[must_use]
    pub const fn contains(&self, pos: usize) -> bool {
        pos >= self.first && pos <= self.last
    }

    /// Check if the ranges share at least one character
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.first <= other.last && other.first <= self.last
    }

    /// Convert to the external half-open convention
    #[must_use]
    pub const fn to_exclusive(&self) -> TextRange {
        TextRange {
            start: self.first,
            end: self.last + 1,
        }
    }
}

impl From<CharRange> for TextRange {
    fn from(range: CharRange) -> Self {
        range.to_exclusive()
    }
}

impl fmt::Display for CharRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.first, self.last)
    }
}

/// A selection in the external (half-open) convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionRange {
    /// Nothing is selected
    #[default]
    None,
    /// Everything in the focused container is selected
    All,
    /// An explicit half-open span
    Span(TextRange),
}

impl SelectionRange {
    /// Legacy "select all" pair of the external convention
    pub const ALL_PAIR: (i64, i64) = (-1, -1);
    /// Legacy "no selection" pair of the external convention
    pub const NONE_PAIR: (i64, i64) = (-2, -2);

    /// Build a selection from a half-open range
    ///
    /// An empty range is an insertion point, so it maps to [`Self::None`].
    #[must_use]
    pub fn span(range: TextRange) -> Self {
        let range = range.normalize();
        if range.is_empty() {
            Self::None
        } else {
            Self::Span(range)
        }
    }

    /// Check for the "no selection" state
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Check for the "select all" state
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Resolve against a container of `len` positions
    ///
    /// Spans are normalized and clipped; a span clipped to nothing resolves
    /// to `None`.
    #[must_use]
    pub fn resolve(&self, len: usize) -> Option<TextRange> {
        match self {
            Self::None => None,
            Self::All => (len > 0).then_some(TextRange::new(0, len)),
            Self::Span(range) => {
                let clipped = range.clip(len);
                (!clipped.is_empty()).then_some(clipped)
            }
        }
    }

    /// Convert to the internal convention
    #[must_use]
    pub fn to_internal(&self) -> InternalSelection {
        match self {
            Self::None => InternalSelection::None,
            Self::All => InternalSelection::All,
            Self::Span(range) => range
                .normalize()
                .to_inclusive()
                .map_or(InternalSelection::None, InternalSelection::Span),
        }
    }

    /// Decode a legacy integer pair
    ///
    /// `(-1, -1)` selects everything; any other pair with a negative end or
    /// with equal ends carries no selection.
    #[must_use]
    pub fn from_pair(start: i64, end: i64) -> Self {
        if (start, end) == Self::ALL_PAIR {
            return Self::All;
        }
        match (usize::try_from(start), usize::try_from(end)) {
            (Ok(start), Ok(end)) => Self::span(TextRange::new(start, end)),
            _ => Self::None,
        }
    }

    /// Encode as a legacy integer pair
    #[must_use]
    pub fn to_pair(&self) -> (i64, i64) {
        match self {
            Self::None => Self::NONE_PAIR,
            Self::All => Self::ALL_PAIR,
            Self::Span(range) => (range.start as i64, range.end as i64),
        }
    }
}

impl From<InternalSelection> for SelectionRange {
    fn from(selection: InternalSelection) -> Self {
        selection.to_external()
    }
}

/// A selection in the internal (inclusive) convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InternalSelection {
    /// Nothing is selected
    #[default]
    None,
    /// Everything in the focused container is selected
    All,
    /// An explicit inclusive span
    Span(CharRange),
}

impl InternalSelection {
    /// Legacy "select all" pair of the internal convention
    pub const ALL_PAIR: (i64, i64) = (-2, -2);
    /// Legacy "no selection" pair of the internal convention
    pub const NONE_PAIR: (i64, i64) = (-1, -1);

    /// Check for the "no selection" state
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Check for the "select all" state
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Resolve against a container of `len` positions
    #[must_use]
    pub fn resolve(&self, len: usize) -> Option<CharRange> {
        match self {
            Self::None => None,
            Self::All => (len > 0).then(|| CharRange::new(0, len - 1)),
            Self::Span(range) => {
                if range.first >= len {
                    None
                } else {
                    Some(CharRange::new(range.first, min(range.last, len - 1)))
                }
            }
        }
    }

    /// Convert to the external convention
    #[must_use]
    pub fn to_external(&self) -> SelectionRange {
        match self {
            Self::None => SelectionRange::None,
            Self::All => SelectionRange::All,
            Self::Span(range) => SelectionRange::Span(range.to_exclusive()),
        }
    }

    /// Decode a legacy integer pair
    ///
    /// `(-2, -2)` selects everything; any other pair with a negative end is
    /// no selection.
    #[must_use]
    pub fn from_pair(first: i64, last: i64) -> Self {
        if (first, last) == Self::ALL_PAIR {
            return Self::All;
        }
        match (usize::try_from(first), usize::try_from(last)) {
            (Ok(first), Ok(last)) => Self::Span(CharRange::new(first, last)),
            _ => Self::None,
        }
    }

    /// Encode as a legacy integer pair
    #[must_use]
    pub fn to_pair(&self) -> (i64, i64) {
        match self {
            Self::None => Self::NONE_PAIR,
            Self::All => Self::ALL_PAIR,
            Self::Span(range) => (range.first as i64, range.last as i64),
        }
    }
}

impl From<SelectionRange> for InternalSelection {
    fn from(selection: SelectionRange) -> Self {
        selection.to_internal()
    }
}
