//! Caret movement
//!
//! Every movement is a single-step primitive applied `count` times; each
//! step recomputes the wrap-boundary flag for the position it lands on.
//! Vertical moves keep a horizontal pixel target so repeated up/down
//! presses stay in the same column.

use super::caret::Caret;
use crate::core::{Container, ContainerPath};
use crate::layout::DocumentLayout;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Position reached by skipping one word from `position`
///
/// Forward moves skip the rest of the current word and the gap after it,
/// landing on the start of the next word. Backward moves skip the gap before
/// the caret and then the word, landing on that word's start.
#[must_use]
pub fn find_next_word_position(container: &Container, position: usize, forward: bool) -> usize {
    let chars: Vec<char> = container.text().chars().collect();
    let last = container.last_position();
    let word_at = |i: usize| chars.get(i).copied().is_some_and(is_word_char);
    let mut i = position.min(last);
    if forward {
        while i < last && word_at(i) {
            i += 1;
        }
        while i < last && !word_at(i) {
            i += 1;
        }
    } else {
        while i > 0 && !word_at(i - 1) {
            i -= 1;
        }
        while i > 0 && word_at(i - 1) {
            i -= 1;
        }
    }
    i
}

/// Word range around `position`, `None` when it is not in a word
#[must_use]
pub fn word_range_at(container: &Container, position: usize) -> Option<(usize, usize)> {
    let chars: Vec<char> = container.text().chars().collect();
    let word_at = |i: usize| chars.get(i).copied().is_some_and(is_word_char);
    if !word_at(position) {
        return None;
    }
    let mut start = position;
    while start > 0 && word_at(start - 1) {
        start -= 1;
    }
    let mut end = position;
    while word_at(end) {
        end += 1;
    }
    Some((start, end))
}

/// Caret movement against one container and its layout
pub struct Navigator<'a> {
    pub container: &'a Container,
    pub path: &'a ContainerPath,
    pub layout: &'a DocumentLayout,
}

impl<'a> Navigator<'a> {
    #[must_use]
    pub fn new(container: &'a Container, path: &'a ContainerPath, layout: &'a DocumentLayout) -> Self {
        Self {
            container,
            path,
            layout,
        }
    }

    fn landed(&self, position: usize) -> Caret {
        let wrapped = self
            .layout
            .container(self.path)
            .is_some_and(|c| c.is_wrapped_line_start(position));
        Caret {
            position,
            at_line_start: wrapped,
        }
    }

    /// One position right, clamped to the final mark
    #[must_use]
    pub fn forward(&self, caret: Caret) -> Caret {
        self.landed((caret.position + 1).min(self.container.last_position()))
    }

    /// One position left, clamped to the start
    #[must_use]
    pub fn back(&self, caret: Caret) -> Caret {
        self.landed(caret.position.saturating_sub(1))
    }

    #[must_use]
    pub fn move_right(&self, caret: Caret, count: usize) -> Caret {
        (0..count).fold(caret, |c, _| self.forward(c))
    }

    #[must_use]
    pub fn move_left(&self, caret: Caret, count: usize) -> Caret {
        (0..count).fold(caret, |c, _| self.back(c))
    }

    #[must_use]
    pub fn word_right(&self, caret: Caret, count: usize) -> Caret {
        (0..count).fold(caret, |c, _| {
            self.landed(find_next_word_position(self.container, c.position, true))
        })
    }

    #[must_use]
    pub fn word_left(&self, caret: Caret, count: usize) -> Caret {
        (0..count).fold(caret, |c, _| {
            self.landed(find_next_word_position(self.container, c.position, false))
        })
    }

    /// Horizontal pixel position of the caret
    #[must_use]
    pub fn caret_x(&self, caret: Caret) -> i32 {
        self.layout
            .caret_rect(self.path, caret.position, caret.at_line_start)
            .map_or(0, |r| r.x)
    }

    /// Move `delta` lines, aiming for pixel column `x`
    ///
    /// Moving above the first line goes to its start; moving below the last
    /// goes to its end.
    #[must_use]
    pub fn move_lines(&self, caret: Caret, delta: isize, x: i32) -> Caret {
        let Some(container) = self.layout.container(self.path) else {
            return caret;
        };
        let Some(current) = container.line_index_for(caret.position, caret.at_line_start) else {
            return caret;
        };
        let last_line = container.lines.len() - 1;
        let target = current as isize + delta;
        if target < 0 {
            return self.line_start(Caret::new(0));
        }
        if target as usize > last_line {
            return Caret::new(container.lines[last_line].range.end);
        }
        match self.layout.position_on_line(self.path, target as usize, x) {
            Some((position, at_start)) => Caret {
                position,
                at_line_start: at_start && self.landed(position).at_line_start,
            },
            None => caret,
        }
    }

    /// Move by whole pages of `page_height` pixels
    #[must_use]
    pub fn move_pages(&self, caret: Caret, pages: isize, page_height: i32, x: i32) -> Caret {
        let Some(container) = self.layout.container(self.path) else {
            return caret;
        };
        let Some(current) = container.line_index_for(caret.position, caret.at_line_start) else {
            return caret;
        };
        let target_y = container.lines[current].y + pages as i32 * page_height.max(1);
        let target = container
            .lines
            .iter()
            .position(|line| target_y < line.bottom())
            .unwrap_or(container.lines.len() - 1);
        self.move_lines(caret, target as isize - current as isize, x)
    }

    /// Start of the caret's visual line
    #[must_use]
    pub fn line_start(&self, caret: Caret) -> Caret {
        let Some(container) = self.layout.container(self.path) else {
            return caret;
        };
        match container.line_index_for(caret.position, caret.at_line_start) {
            Some(index) => {
                let line = &container.lines[index];
                Caret {
                    position: line.range.start,
                    at_line_start: !line.first_in_paragraph,
                }
            }
            None => caret,
        }
    }

    /// End of the caret's visual line, shown on that line
    #[must_use]
    pub fn line_end(&self, caret: Caret) -> Caret {
        let Some(container) = self.layout.container(self.path) else {
            return caret;
        };
        match container.line_index_for(caret.position, caret.at_line_start) {
            Some(index) => Caret::new(container.lines[index].range.end),
            None => caret,
        }
    }

    #[must_use]
    pub fn home(&self) -> Caret {
        Caret::new(0)
    }

    #[must_use]
    pub fn end(&self) -> Caret {
        Caret::new(self.container.last_position())
    }

    #[must_use]
    pub fn paragraph_start(&self, caret: Caret) -> Caret {
        let position = caret.position.min(self.container.last_position());
        self.container
            .paragraph_at(position)
            .map_or(caret, |p| Caret::new(p.base.range.start))
    }

    /// The paragraph's mark position
    #[must_use]
    pub fn paragraph_end(&self, caret: Caret) -> Caret {
        let position = caret.position.min(self.container.last_position());
        self.container
            .paragraph_at(position)
            .map_or(caret, |p| Caret::new(p.base.range.end - 1))
    }
}
