//! Caret position and the wrap-boundary flag

use crate::core::Container;

/// Insertion point
///
/// `position` is the index the caret sits before. At a wrap boundary the
/// same index ends one visual line and starts the next; `at_line_start`
/// says which of the two the caret is drawn on. The flag never changes the
/// logical position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Caret {
    pub position: usize,
    pub at_line_start: bool,
}

impl Caret {
    #[must_use]
    pub const fn new(position: usize) -> Self {
        Self {
            position,
            at_line_start: false,
        }
    }

    #[must_use]
    pub const fn at_line_start(position: usize) -> Self {
        Self {
            position,
            at_line_start: true,
        }
    }

    /// From the "character before the caret" convention, where -1 is the
    /// start of the buffer
    #[must_use]
    pub fn from_char_before(value: i64) -> Self {
        Self::new(usize::try_from(value.saturating_add(1)).unwrap_or(0))
    }

    /// Index of the character before the caret, -1 at the buffer start
    #[must_use]
    pub fn to_char_before(self) -> i64 {
        i64::try_from(self.position).map_or(i64::MAX, |p| p - 1)
    }

    /// Same caret clamped to the positions of `container`
    #[must_use]
    pub fn clamped(self, container: &Container) -> Self {
        let last = container.last_position();
        if self.position > last {
            Self::new(last)
        } else {
            self
        }
    }

    /// Position whose style newly typed text should take
    ///
    /// At a paragraph start that is the position itself, so text typed at
    /// the start of a paragraph takes that paragraph's style; elsewhere it is
    /// the character before the caret.
    #[must_use]
    pub fn style_position(self, container: &Container) -> usize {
        let position = self.position.min(container.last_position());
        if position == 0 || container.is_paragraph_start(position) {
            position
        } else {
            position - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::BufferCommandExt;
    use crate::core::Buffer;

    #[test]
    fn char_before_convention() {
        assert_eq!(Caret::from_char_before(-1), Caret::new(0));
        assert_eq!(Caret::from_char_before(-7), Caret::new(0));
        assert_eq!(Caret::from_char_before(4), Caret::new(5));
        assert_eq!(Caret::new(0).to_char_before(), -1);
        assert_eq!(Caret::new(5).to_char_before(), 4);
    }

    #[test]
    fn style_position_prefers_following_paragraph() {
        let mut buffer = Buffer::new();
        buffer.add_paragraph("ab");
        buffer.add_paragraph("cd");
        let root = buffer.root();
        assert_eq!(Caret::new(0).style_position(root), 0);
        assert_eq!(Caret::new(2).style_position(root), 1);
        assert_eq!(Caret::new(3).style_position(root), 3);
        assert_eq!(Caret::new(40).style_position(root), 4);
        assert_eq!(Caret::new(40).clamped(root), Caret::new(5));
    }
}
