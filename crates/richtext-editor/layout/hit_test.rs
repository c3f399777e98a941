//! Mapping between pixels and positions

use super::engine::{ContainerLayout, DocumentLayout, LineLayout};
use super::geometry::{Point, Rect};
use crate::core::{Buffer, ContainerPath, InlineObject};
use bitflags::bitflags;

bitflags! {
    /// Where a hit landed relative to the text
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HitTestFlags: u8 {
        /// Left of the first character of the line
        const BEFORE = 1 << 0;
        /// Right of the last character of the line
        const AFTER = 1 << 1;
        /// On a character or object
        const ON = 1 << 2;
        /// Above or below every line of the container
        const OUTSIDE = 1 << 3;
    }
}

/// Result of [`DocumentLayout::hit_test`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitTestResult {
    pub container: ContainerPath,
    /// Paragraph index within the container
    pub paragraph: usize,
    /// Caret position within the container
    pub position: usize,
    /// Show the caret at the start of the hit line rather than the end of
    /// the previous one
    pub at_line_start: bool,
    pub flags: HitTestFlags,
}

impl HitTestResult {
    /// Object under the point, when the hit was on one
    #[must_use]
    pub fn object<'a>(&self, buffer: &'a Buffer) -> Option<&'a InlineObject> {
        if !self.flags.contains(HitTestFlags::ON) {
            return None;
        }
        buffer.container(&self.container).ok()?.object_at(self.object_position())
    }

    fn object_position(&self) -> usize {
        // a hit on the right half of a glyph reports the following position
        self.position.saturating_sub(usize::from(self.right_half()))
    }

    fn right_half(&self) -> bool {
        self.flags.contains(HitTestFlags::ON | HitTestFlags::AFTER)
    }
}

/// Position on `line` nearest to `x`, with the flags describing the hit
fn position_in_line(line: &LineLayout, x: i32) -> (usize, HitTestFlags) {
    if x < line.x_start {
        return (line.range.start, HitTestFlags::BEFORE);
    }
    let mut left = line.x_start;
    for (offset, advance) in line.advances.iter().enumerate() {
        let position = line.range.start + offset;
        if x < left + advance / 2 {
            return (position, HitTestFlags::ON);
        }
        if x < left + advance {
            return (position + 1, HitTestFlags::ON | HitTestFlags::AFTER);
        }
        left += advance;
    }
    (line.range.end, HitTestFlags::AFTER)
}

fn hit_container(layout: &ContainerLayout, point: Point) -> HitTestResult {
    let container = layout.innermost_at(point);
    let mut flags = HitTestFlags::empty();
    let Some(last) = container.lines.last() else {
        return HitTestResult {
            container: container.path.clone(),
            paragraph: 0,
            position: 0,
            at_line_start: true,
            flags: HitTestFlags::OUTSIDE,
        };
    };
    let line = match container.lines.iter().find(|line| point.y < line.bottom()) {
        Some(line) => {
            if point.y < line.y && line.first_in_paragraph && line.paragraph == 0 {
                flags |= HitTestFlags::OUTSIDE;
            }
            line
        }
        None => {
            flags |= HitTestFlags::OUTSIDE;
            last
        }
    };
    let (position, found) = position_in_line(line, point.x);
    let at_line_start = position == line.range.start && position != line.range.end;
    HitTestResult {
        container: container.path.clone(),
        paragraph: line.paragraph,
        position,
        at_line_start: at_line_start || line.range.is_empty(),
        flags: flags | found,
    }
}

impl DocumentLayout {
    /// Resolve a pixel point to a caret position
    ///
    /// The innermost container whose bounds hold the point wins. Points past
    /// the end of a line report the line end with
    /// [`HitTestFlags::AFTER`], so the caret lands at the end of that visual
    /// line even when the index also starts the next one.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> HitTestResult {
        hit_container(&self.root, point)
    }

    /// Caret rectangle for `position` in the container at `path`
    ///
    /// `at_line_start` resolves the wrap-boundary ambiguity.
    #[must_use]
    pub fn caret_rect(
        &self,
        path: &ContainerPath,
        position: usize,
        at_line_start: bool,
    ) -> Option<Rect> {
        let container = self.container(path)?;
        let line = &container.lines[container.line_index_for(position, at_line_start)?];
        let position = position.min(line.range.end);
        Some(Rect::new(line.x_of(position), line.y, 1, line.height))
    }

    /// Root position as `(column, line)`
    ///
    /// A wrap boundary reports column 0 of the following line.
    #[must_use]
    pub fn position_to_xy(&self, position: usize) -> Option<(usize, usize)> {
        let lines = &self.root.lines;
        let index = lines
            .iter()
            .position(|line| line.range.start == position && !line.first_in_paragraph)
            .or_else(|| lines.iter().position(|line| line.holds(position)))?;
        Some((position - lines[index].range.start, index))
    }

    /// Inverse of [`Self::position_to_xy`]
    #[must_use]
    pub fn xy_to_position(&self, column: usize, line: usize) -> Option<usize> {
        let line = self.root.lines.get(line)?;
        (column <= line.range.len()).then(|| line.range.start + column)
    }

    /// Position on line `line_index` of the container at `path` nearest to
    /// `x`, and whether the caret shows at the line start
    #[must_use]
    pub fn position_on_line(
        &self,
        path: &ContainerPath,
        line_index: usize,
        x: i32,
    ) -> Option<(usize, bool)> {
        let line = self.container(path)?.lines.get(line_index)?;
        let (position, _) = position_in_line(line, x);
        Some((position, position == line.range.start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::BufferCommandExt;
    use crate::layout::{FixedPitchMeasurer, LayoutConfig};
    use pretty_assertions::assert_eq;

    // lines [0,6) [6,16) [16,21) starting at y = 5, 21, 37
    fn wrapped() -> (Buffer, DocumentLayout) {
        let mut buffer = Buffer::new();
        buffer.add_paragraph("hello wonderful world");
        buffer.add_paragraph("end");
        let config = LayoutConfig {
            wrap_width: 100,
            ..LayoutConfig::default()
        };
        let layout = DocumentLayout::compute(&buffer, &FixedPitchMeasurer::default(), &config);
        (buffer, layout)
    }

    #[test]
    fn glyph_halves_pick_sides() {
        let (buffer, layout) = wrapped();
        let hit = layout.hit_test(Point::new(5 + 8 + 2, 8));
        assert_eq!(hit.position, 1);
        assert_eq!(hit.flags, HitTestFlags::ON);
        let hit = layout.hit_test(Point::new(5 + 8 + 6, 8));
        assert_eq!(hit.position, 2);
        assert!(hit.flags.contains(HitTestFlags::ON));
        assert_eq!(hit.object(&buffer).map(InlineObject::kind), Some("text"));
    }

    #[test]
    fn past_line_end_stays_on_line() {
        let (_, layout) = wrapped();
        let hit = layout.hit_test(Point::new(95, 8));
        assert_eq!(hit.position, 6);
        assert_eq!(hit.flags, HitTestFlags::AFTER);
        assert!(!hit.at_line_start);

        let hit = layout.hit_test(Point::new(1, 25));
        assert_eq!(hit.position, 6);
        assert!(hit.flags.contains(HitTestFlags::BEFORE));
        assert!(hit.at_line_start);
    }

    #[test]
    fn points_below_text_are_outside() {
        let (_, layout) = wrapped();
        let hit = layout.hit_test(Point::new(500, 900));
        assert!(hit.flags.contains(HitTestFlags::OUTSIDE));
        assert_eq!(hit.position, 25);
        assert_eq!(hit.paragraph, 1);
    }

    #[test]
    fn caret_rect_resolves_ambiguity() {
        let (_, layout) = wrapped();
        let root = ContainerPath::root();
        let end_of_first = layout.caret_rect(&root, 6, false);
        assert_eq!(end_of_first, Some(Rect::new(5 + 48, 5, 1, 16)));
        let start_of_second = layout.caret_rect(&root, 6, true);
        assert_eq!(start_of_second, Some(Rect::new(5, 21, 1, 16)));
    }

    #[test]
    fn xy_round_trip() {
        let (_, layout) = wrapped();
        assert_eq!(layout.position_to_xy(6), Some((0, 1)));
        assert_eq!(layout.position_to_xy(8), Some((2, 1)));
        assert_eq!(layout.position_to_xy(23), Some((1, 3)));
        assert_eq!(layout.xy_to_position(2, 1), Some(8));
        assert_eq!(layout.xy_to_position(20, 1), None);
    }

    #[test]
    fn hits_inside_table_cells() {
        let mut buffer = Buffer::new();
        buffer.write_table(0, 1, 2);
        let layout = DocumentLayout::compute(
            &buffer,
            &FixedPitchMeasurer::default(),
            &LayoutConfig::default(),
        );
        let cell = &layout.root.nested[1];
        let inside = cell.bounds.origin().offset(7, 7);
        let hit = layout.hit_test(inside);
        assert_eq!(hit.container, cell.path);
        assert_eq!(hit.position, 0);
        assert!(hit.object(&buffer).is_none());
    }
}
