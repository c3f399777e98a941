//! Line layout for containers
//!
//! Each container is laid out at its own origin and then translated into
//! place, so tables and text boxes reuse the same paragraph code as the
//! root. Lines cover the positions of one paragraph each, never its mark;
//! an empty paragraph still produces one empty line so the caret has
//! somewhere to go.

use super::geometry::{Point, Rect, Size};
use super::measurer::TextMeasurer;
use crate::core::{
    BoxObject, Buffer, Container, ContainerId, ContainerPath, InlineObject, Paragraph, PathStep,
    TableObject,
};
use crate::style::StyleLayers;
use richtext_core::{Alignment, BulletStyle, TextAttr, TextRange};
use tracing::trace;

/// Page geometry and unit conversion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutConfig {
    /// Width of the root container in pixels
    pub wrap_width: i32,
    /// Padding inside every container
    pub margin: i32,
    pub pixels_per_inch: i32,
    /// Used when the measurer reports no height
    pub default_line_height: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            wrap_width: 600,
            margin: 5,
            pixels_per_inch: 96,
            default_line_height: 16,
        }
    }
}

impl LayoutConfig {
    /// Convert tenths of a millimetre to pixels
    #[must_use]
    pub fn units_to_pixels(&self, units: i32, dimension_scale: f64) -> i32 {
        (f64::from(units) * f64::from(self.pixels_per_inch) * dimension_scale / 254.0).round()
            as i32
    }

    /// Convert pixels back to tenths of a millimetre
    #[must_use]
    pub fn pixels_to_units(&self, pixels: i32, dimension_scale: f64) -> i32 {
        if self.pixels_per_inch == 0 || dimension_scale == 0.0 {
            return 0;
        }
        (f64::from(pixels) * 254.0 / (f64::from(self.pixels_per_inch) * dimension_scale)).round()
            as i32
    }
}

/// A list bullet drawn in the indent of a paragraph's first line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bullet {
    pub text: String,
    pub origin: Point,
}

/// One visual line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLayout {
    /// Index of the paragraph in its container
    pub paragraph: usize,
    /// Container positions on this line, excluding the paragraph mark
    pub range: TextRange,
    pub first_in_paragraph: bool,
    pub ends_paragraph: bool,
    pub y: i32,
    pub height: i32,
    pub x_start: i32,
    /// Advance of every position in `range`
    pub advances: Vec<i32>,
    pub bullet: Option<Bullet>,
}

impl LineLayout {
    #[must_use]
    pub fn width(&self) -> i32 {
        self.advances.iter().sum()
    }

    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x_start, self.y, self.width(), self.height)
    }

    /// X coordinate of the left edge of `position`
    ///
    /// Positions past the line end map to its right edge.
    #[must_use]
    pub fn x_of(&self, position: usize) -> i32 {
        let offset = position.saturating_sub(self.range.start).min(self.advances.len());
        self.x_start + self.advances[..offset].iter().sum::<i32>()
    }

    /// Check whether `position` can sit on this line
    ///
    /// The end of the line counts, which makes a wrap boundary belong to two
    /// lines.
    #[must_use]
    pub fn holds(&self, position: usize) -> bool {
        position >= self.range.start && position <= self.range.end
    }
}

/// Laid-out container, positioned in document coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerLayout {
    pub id: ContainerId,
    pub path: ContainerPath,
    /// Position of the owning object in the parent container
    pub anchor: Option<usize>,
    pub bounds: Rect,
    pub lines: Vec<LineLayout>,
    pub nested: Vec<ContainerLayout>,
}

impl ContainerLayout {
    fn translate(&mut self, dx: i32, dy: i32) {
        self.bounds = self.bounds.translated(dx, dy);
        for line in &mut self.lines {
            line.x_start += dx;
            line.y += dy;
            if let Some(bullet) = line.bullet.as_mut() {
                bullet.origin = bullet.origin.offset(dx, dy);
            }
        }
        for nested in &mut self.nested {
            nested.translate(dx, dy);
        }
    }

    /// Layout of the container at `path`
    #[must_use]
    pub fn find(&self, path: &ContainerPath) -> Option<&Self> {
        if &self.path == path {
            return Some(self);
        }
        self.nested.iter().find_map(|nested| nested.find(path))
    }

    /// Deepest container whose bounds hold `point`
    #[must_use]
    pub fn innermost_at(&self, point: Point) -> &Self {
        self.nested
            .iter()
            .find(|nested| nested.bounds.contains(point))
            .map_or(self, |nested| nested.innermost_at(point))
    }

    /// Line showing `position`
    ///
    /// A wrap boundary is the end of one line and the start of the next;
    /// `at_line_start` picks the second.
    #[must_use]
    pub fn line_index_for(&self, position: usize, at_line_start: bool) -> Option<usize> {
        if at_line_start {
            if let Some(index) = self
                .lines
                .iter()
                .position(|line| line.range.start == position && !line.first_in_paragraph)
            {
                return Some(index);
            }
        }
        self.lines
            .iter()
            .position(|line| line.holds(position))
            .or_else(|| self.lines.len().checked_sub(1))
    }

    /// Check that `position` starts a line produced by wrapping
    #[must_use]
    pub fn is_wrapped_line_start(&self, position: usize) -> bool {
        self.lines
            .iter()
            .any(|line| line.range.start == position && !line.first_in_paragraph)
    }

    /// Total number of lines in this container, nested ones excluded
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

#[derive(Debug, Clone, Copy)]
struct Item {
    advance: i32,
    height: i32,
    breakable: bool,
}

/// Borrowed state for one layout pass
struct LayoutPass<'a> {
    layers: StyleLayers<'a>,
    measurer: &'a dyn TextMeasurer,
    config: &'a LayoutConfig,
    font_scale: f64,
    dimension_scale: f64,
}

/// Text drawn for a paragraph's bullet, if it has one
#[must_use]
pub fn bullet_text(style: &TextAttr) -> Option<String> {
    let para = &style.paragraph;
    let bullet = para.bullet_style?;
    if bullet.is_numbered() {
        return bullet.format_number(para.bullet_number.unwrap_or(1));
    }
    if bullet.contains(BulletStyle::SYMBOL) {
        return Some(para.bullet_text.clone().unwrap_or_else(|| "*".to_string()));
    }
    if bullet.intersects(BulletStyle::STANDARD | BulletStyle::BITMAP) {
        return Some("\u{2022}".to_string());
    }
    None
}

impl LayoutPass<'_> {
    fn px(&self, units: Option<i32>) -> i32 {
        units.map_or(0, |u| self.config.units_to_pixels(u, self.dimension_scale))
    }

    fn line_height(&self, style: &TextAttr) -> i32 {
        let height = self.measurer.line_height(style, self.font_scale);
        if height > 0 {
            height
        } else {
            self.config.default_line_height
        }
    }

    fn container(
        &self,
        container: &Container,
        path: ContainerPath,
        anchor: Option<usize>,
        width: i32,
    ) -> ContainerLayout {
        let margin = self.config.margin;
        let content_width = (width - 2 * margin).max(1);
        let mut layout = ContainerLayout {
            id: container.id,
            path,
            anchor,
            bounds: Rect::default(),
            lines: Vec::new(),
            nested: Vec::new(),
        };
        let mut y = margin;
        for (index, para) in container.paragraphs().iter().enumerate() {
            self.paragraph(&mut layout, index, para, margin, content_width, &mut y);
        }
        layout.bounds = Rect::new(0, 0, width, y + margin);
        layout
    }

    fn table(
        &self,
        table: &TableObject,
        path: &ContainerPath,
        step: PathStep,
        anchor: usize,
        width: i32,
    ) -> (Size, Vec<ContainerLayout>) {
        let cols = table.column_count().max(1) as i32;
        let cell_width = (width / cols).max(1);
        let mut cells = Vec::new();
        let mut y = 0;
        for (row, cells_in_row) in table.rows.iter().enumerate() {
            let mut laid: Vec<ContainerLayout> = cells_in_row
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let step = PathStep {
                        cell: Some((row, col)),
                        ..step
                    };
                    let mut layout =
                        self.container(cell, path.child(step), Some(anchor), cell_width);
                    layout.translate(col as i32 * cell_width, 0);
                    layout
                })
                .collect();
            let row_height = laid.iter().map(|c| c.bounds.height).max().unwrap_or(0);
            for cell in &mut laid {
                cell.translate(0, y);
                cell.bounds.height = row_height;
            }
            y += row_height;
            cells.extend(laid);
        }
        (Size::new(cell_width * cols, y), cells)
    }

    fn text_box(
        &self,
        boxed: &BoxObject,
        path: &ContainerPath,
        step: PathStep,
        anchor: usize,
        width: i32,
    ) -> (Size, ContainerLayout) {
        let width = (width / 2).max(4 * self.config.margin + 1);
        let layout = self.container(&boxed.container, path.child(step), Some(anchor), width);
        (layout.bounds.size(), layout)
    }

    fn paragraph(
        &self,
        layout: &mut ContainerLayout,
        index: usize,
        para: &Paragraph,
        content_x: i32,
        content_width: i32,
        y: &mut i32,
    ) {
        let style = self.layers.paragraph_style(para.attributes());
        let attrs = &style.paragraph;
        let left = self.px(attrs.left_indent);
        let sub = self.px(attrs.left_sub_indent);
        let right = self.px(attrs.right_indent);
        let spacing = attrs
            .line_spacing
            .filter(|s| *s > 0)
            .map_or(10, i32::from);
        let bullet = bullet_text(&style);
        let para_height = self.line_height(&style);
        let start = para.base.range.start;

        let mut items: Vec<Item> = Vec::with_capacity(para.text_len());
        let mut pending: Vec<(usize, Vec<ContainerLayout>)> = Vec::new();
        let object_width = (content_width - left - sub - right).max(1);
        for (child_index, child) in para.children.iter().enumerate() {
            let child_style = self.layers.object_style(&style, child.attributes());
            let step = PathStep {
                paragraph: index,
                child: child_index,
                cell: None,
            };
            let anchor = start + items.len();
            match child {
                InlineObject::Text(run) => {
                    let height = self.line_height(&child_style);
                    let advances = self
                        .measurer
                        .measure_text(&run.text, &child_style, self.font_scale);
                    items.extend(run.text.chars().zip(advances).map(|(ch, advance)| Item {
                        advance,
                        height,
                        breakable: ch.is_whitespace(),
                    }));
                }
                InlineObject::Table(table) => {
                    let (size, cells) =
                        self.table(table, &layout.path, step, anchor, object_width);
                    pending.push((items.len(), cells));
                    items.push(Item {
                        advance: size.width,
                        height: size.height,
                        breakable: false,
                    });
                }
                InlineObject::Box(boxed) => {
                    let (size, inner) =
                        self.text_box(boxed, &layout.path, step, anchor, object_width);
                    pending.push((items.len(), vec![inner]));
                    items.push(Item {
                        advance: size.width,
                        height: size.height,
                        breakable: false,
                    });
                }
                _ => {
                    let size = self
                        .measurer
                        .object_size(child, &child_style, self.font_scale);
                    items.push(Item {
                        advance: size.width,
                        height: size.height,
                        breakable: false,
                    });
                }
            }
        }

        *y += self.px(attrs.space_before);
        let first_line = layout.lines.len();
        let mut line_start = 0;
        loop {
            let first = line_start == 0;
            let indent = if first && bullet.is_none() { left } else { left + sub };
            let available = (content_width - indent - right).max(1);

            let mut width = 0;
            let mut end = line_start;
            let mut last_break = None;
            while end < items.len() {
                let item = items[end];
                if width + item.advance > available && end > line_start && !item.breakable {
                    break;
                }
                width += item.advance;
                if item.breakable {
                    last_break = Some(end + 1);
                }
                end += 1;
            }
            if end < items.len() {
                if let Some(after_space) = last_break {
                    end = after_space;
                    width = items[line_start..end].iter().map(|i| i.advance).sum();
                }
            }

            let natural = items[line_start..end]
                .iter()
                .map(|i| i.height)
                .max()
                .unwrap_or(para_height);
            let height = (natural * spacing / 10).max(1);
            let shift = match attrs.alignment {
                Some(Alignment::Centre) => (available - width).max(0) / 2,
                Some(Alignment::Right) => (available - width).max(0),
                _ => 0,
            };
            layout.lines.push(LineLayout {
                paragraph: index,
                range: TextRange::new(start + line_start, start + end),
                first_in_paragraph: first,
                ends_paragraph: end == items.len(),
                y: *y,
                height,
                x_start: content_x + indent + shift,
                advances: items[line_start..end].iter().map(|i| i.advance).collect(),
                bullet: bullet
                    .as_ref()
                    .filter(|_| first)
                    .map(|text| Bullet {
                        text: text.clone(),
                        origin: Point::new(content_x + left, *y),
                    }),
            });
            *y += height;
            line_start = end;
            if line_start >= items.len() {
                break;
            }
        }
        *y += self.px(attrs.space_after);

        for (item, mut nested) in pending {
            let position = start + item;
            let Some(line) = layout.lines[first_line..]
                .iter()
                .find(|line| position >= line.range.start && position < line.range.end)
            else {
                continue;
            };
            let (dx, dy) = (line.x_of(position), line.y);
            for inner in &mut nested {
                inner.translate(dx, dy);
            }
            layout.nested.extend(nested);
        }
    }
}

/// Layout of a whole buffer
///
/// Tagged with the buffer's layout generation; any edit bumps the
/// generation and makes the layout stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLayout {
    pub generation: u64,
    pub root: ContainerLayout,
}

impl DocumentLayout {
    /// Lay out every container of `buffer`
    #[must_use]
    pub fn compute(buffer: &Buffer, measurer: &dyn TextMeasurer, config: &LayoutConfig) -> Self {
        let pass = LayoutPass {
            layers: buffer.style_layers(),
            measurer,
            config,
            font_scale: buffer.font_scale(),
            dimension_scale: buffer.dimension_scale(),
        };
        let root = pass.container(buffer.root(), ContainerPath::root(), None, config.wrap_width);
        trace!(
            generation = buffer.layout_generation(),
            lines = root.lines.len(),
            height = root.bounds.height,
            "recomputed layout"
        );
        Self {
            generation: buffer.layout_generation(),
            root,
        }
    }

    #[must_use]
    pub fn is_current(&self, buffer: &Buffer) -> bool {
        self.generation == buffer.layout_generation()
    }

    /// Layout of the container at `path`
    #[must_use]
    pub fn container(&self, path: &ContainerPath) -> Option<&ContainerLayout> {
        self.root.find(path)
    }

    /// Size of the laid-out document
    #[must_use]
    pub fn size(&self) -> Size {
        self.root.bounds.size()
    }
}
