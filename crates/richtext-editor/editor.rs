//! Interactive editor: buffer, caret, selection and view in one place
//!
//! [`RichTextEditor`] is what a widget layer drives. It owns the
//! [`Buffer`], the caret and selection, an explicit [`StyleContext`] for
//! typed text and a lazily recomputed [`DocumentLayout`]. Input arrives as
//! [`EditIntent`] values already decoded into domain terms.

use crate::commands::{
    ApplyNamedStyleCommand, BatchCommand, CommandResult, DeleteRangeCommand,
    EditorCommand, InsertContentCommand, SetStyleCommand,
};
use crate::core::{Buffer, Container, ContainerPath, UndoStackConfig};
use crate::layout::{
    DocumentLayout, FixedPitchMeasurer, HitTestResult, LayoutConfig, Point, Rect, TextMeasurer,
};
use crate::selection::{word_range_at, Caret, Navigator, Selection};
use crate::style::{SetStyleFlags, StyleContext};
use richtext_core::{Alignment, TextAttr, TextEffects, TextRange};
use tracing::debug;

/// Editor configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub layout: LayoutConfig,
    /// Height of the visible area in pixels, used for paging and scrolling
    pub page_height: i32,
    /// Maximum number of root positions, `None` for no limit
    pub max_length: Option<usize>,
    pub undo: UndoStackConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            page_height: 400,
            max_length: None,
            undo: UndoStackConfig::default(),
        }
    }
}

/// Caret motions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
    LineStart,
    LineEnd,
    ParagraphStart,
    ParagraphEnd,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Input already decoded by the widget layer
#[derive(Debug, Clone, PartialEq)]
pub enum EditIntent {
    /// Move the caret; `extend` grows the selection from its anchor
    Move {
        motion: Motion,
        count: usize,
        extend: bool,
    },
    /// Click at a point in view coordinates
    Click { point: Point, extend: bool },
    /// Select the word under a point in view coordinates
    DoubleClick(Point),
    /// Type text at the caret, replacing the selection
    Type(String),
    NewLine,
    /// Delete the selection or the position before the caret
    Backspace,
    /// Delete the selection or the position after the caret
    Delete,
    SelectAll,
    Undo,
    Redo,
}

/// Rich-text editor state over one buffer
pub struct RichTextEditor {
    buffer: Buffer,
    config: EditorConfig,
    measurer: Box<dyn TextMeasurer>,
    layout: Option<DocumentLayout>,
    /// Container holding the caret
    focus: ContainerPath,
    caret: Caret,
    selection: Selection,
    /// Explicit style stack applied to typed text
    pub context: StyleContext,
    /// Character style picked with no selection, used by the next typing
    pending_style: Option<TextAttr>,
    /// Pixel column kept across vertical moves
    x_hint: Option<i32>,
    scroll: Point,
}

impl core::fmt::Debug for RichTextEditor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RichTextEditor")
            .field("focus", &self.focus)
            .field("caret", &self.caret)
            .field("selection", &self.selection)
            .field("scroll", &self.scroll)
            .finish_non_exhaustive()
    }
}

impl Default for RichTextEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl RichTextEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        Self::with_measurer(config, Box::new(FixedPitchMeasurer::default()))
    }

    /// Create an editor measuring text with a host-supplied measurer
    #[must_use]
    pub fn with_measurer(config: EditorConfig, measurer: Box<dyn TextMeasurer>) -> Self {
        let mut buffer = Buffer::with_undo_config(config.undo.clone());
        buffer.set_max_length(config.max_length);
        Self {
            buffer,
            config,
            measurer,
            layout: None,
            focus: ContainerPath::root(),
            caret: Caret::default(),
            selection: Selection::new(),
            context: StyleContext::new(),
            pending_style: None,
            x_hint: None,
            scroll: Point::default(),
        }
    }

    // Accessors

    #[must_use]
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Mutable buffer access; the caret is clamped again afterwards by
    /// every editor operation
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn caret(&self) -> Caret {
        self.caret
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Container the caret is in
    #[must_use]
    pub fn focus(&self) -> &ContainerPath {
        &self.focus
    }

    #[must_use]
    pub fn scroll_position(&self) -> Point {
        self.scroll
    }

    fn container(&self) -> &Container {
        self.buffer.container(&self.focus).unwrap_or(self.buffer.root())
    }

    /// Drop a focus path that no longer resolves and clamp the caret
    fn settle(&mut self) {
        if self.buffer.container(&self.focus).is_err() {
            debug!(path = %self.focus, "focused container vanished");
            self.focus = ContainerPath::root();
            self.selection.container = ContainerPath::root();
        }
        self.caret = self.caret.clamped(self.container());
    }

    /// Current layout, recomputed when an edit made it stale
    pub fn layout(&mut self) -> &DocumentLayout {
        #[cfg(feature = "delayed-images")]
        self.buffer.process_delayed_images();
        self.settle();
        let stale = self
            .layout
            .as_ref()
            .map_or(true, |layout| !layout.is_current(&self.buffer));
        if stale {
            self.layout = None;
        }
        let (buffer, measurer, config) = (&self.buffer, &self.measurer, &self.config.layout);
        self.layout
            .get_or_insert_with(|| DocumentLayout::compute(buffer, measurer.as_ref(), config))
    }

    fn navigate(&mut self, step: impl FnOnce(&Navigator<'_>, Caret) -> Caret) -> Caret {
        self.layout();
        let caret = self.caret;
        match &self.layout {
            Some(layout) => {
                let container = self
                    .buffer
                    .container(&self.focus)
                    .unwrap_or(self.buffer.root());
                step(&Navigator::new(container, &self.focus, layout), caret)
            }
            None => caret,
        }
    }

    // Caret and selection

    /// Place the caret, collapsing or extending the selection
    ///
    /// Returns whether the caret or the selection changed.
    pub fn move_caret(&mut self, caret: Caret, extend: bool) -> bool {
        let caret = caret.clamped(self.container());
        let selection_changed = if extend {
            let anchor = self.selection.anchor().unwrap_or(self.caret.position);
            self.selection.extend(anchor, caret.position)
        } else {
            self.selection.select_none()
        };
        let moved = caret != self.caret;
        self.caret = caret;
        self.pending_style = None;
        moved || selection_changed
    }

    fn apply_motion(&mut self, motion: Motion, count: usize) -> Caret {
        let page = self.config.page_height;
        let vertical = matches!(
            motion,
            Motion::Up | Motion::Down | Motion::PageUp | Motion::PageDown
        );
        if !vertical {
            self.x_hint = None;
        }
        let hint = self.x_hint;
        let mut x_used = 0;
        let count_signed = count as isize;
        let caret = self.navigate(|nav, caret| {
            let x = hint.unwrap_or_else(|| nav.caret_x(caret));
            x_used = x;
            match motion {
                Motion::Left => nav.move_left(caret, count),
                Motion::Right => nav.move_right(caret, count),
                Motion::Up => nav.move_lines(caret, -count_signed, x),
                Motion::Down => nav.move_lines(caret, count_signed, x),
                Motion::WordLeft => nav.word_left(caret, count),
                Motion::WordRight => nav.word_right(caret, count),
                Motion::LineStart => nav.line_start(caret),
                Motion::LineEnd => nav.line_end(caret),
                Motion::ParagraphStart => nav.paragraph_start(caret),
                Motion::ParagraphEnd => nav.paragraph_end(caret),
                Motion::Home => nav.home(),
                Motion::End => nav.end(),
                Motion::PageUp => nav.move_pages(caret, -count_signed, page, x),
                Motion::PageDown => nav.move_pages(caret, count_signed, page, x),
            }
        });
        if vertical {
            self.x_hint = Some(x_used);
        }
        caret
    }

    /// Apply a motion `count` times
    pub fn move_by(&mut self, motion: Motion, count: usize, extend: bool) -> bool {
        let caret = self.apply_motion(motion, count.max(1));
        self.move_caret(caret, extend)
    }

    pub fn move_left(&mut self, count: usize, extend: bool) -> bool {
        self.move_by(Motion::Left, count, extend)
    }

    pub fn move_right(&mut self, count: usize, extend: bool) -> bool {
        self.move_by(Motion::Right, count, extend)
    }

    pub fn move_up(&mut self, count: usize, extend: bool) -> bool {
        self.move_by(Motion::Up, count, extend)
    }

    pub fn move_down(&mut self, count: usize, extend: bool) -> bool {
        self.move_by(Motion::Down, count, extend)
    }

    pub fn word_left(&mut self, count: usize, extend: bool) -> bool {
        self.move_by(Motion::WordLeft, count, extend)
    }

    pub fn word_right(&mut self, count: usize, extend: bool) -> bool {
        self.move_by(Motion::WordRight, count, extend)
    }

    pub fn move_to_line_start(&mut self, extend: bool) -> bool {
        self.move_by(Motion::LineStart, 1, extend)
    }

    pub fn move_to_line_end(&mut self, extend: bool) -> bool {
        self.move_by(Motion::LineEnd, 1, extend)
    }

    pub fn move_to_paragraph_start(&mut self, extend: bool) -> bool {
        self.move_by(Motion::ParagraphStart, 1, extend)
    }

    pub fn move_to_paragraph_end(&mut self, extend: bool) -> bool {
        self.move_by(Motion::ParagraphEnd, 1, extend)
    }

    pub fn move_home(&mut self, extend: bool) -> bool {
        self.move_by(Motion::Home, 1, extend)
    }

    pub fn move_end(&mut self, extend: bool) -> bool {
        self.move_by(Motion::End, 1, extend)
    }

    pub fn page_up(&mut self, count: usize, extend: bool) -> bool {
        self.move_by(Motion::PageUp, count, extend)
    }

    pub fn page_down(&mut self, count: usize, extend: bool) -> bool {
        self.move_by(Motion::PageDown, count, extend)
    }

    /// Select the whole focused container
    pub fn select_all(&mut self) -> bool {
        let changed = self.selection.select_all();
        self.caret = Caret::new(self.container().last_position());
        changed
    }

    pub fn select_none(&mut self) -> bool {
        self.selection.select_none()
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.selection.has_selection()
    }

    /// Selected range resolved against the focused container
    #[must_use]
    pub fn selected_range(&self) -> Option<TextRange> {
        self.selection.range(self.container().len())
    }

    /// Fixed end of a shift-extended selection
    pub fn selection_anchor(&self) -> Option<usize> {
        self.selection.anchor()
    }

    /// Select the word at `position`, `false` when there is none
    pub fn select_word(&mut self, position: usize) -> bool {
        let Some((start, end)) = word_range_at(self.container(), position) else {
            return false;
        };
        self.selection.set_range(TextRange::new(start, end));
        self.caret = Caret::new(end);
        true
    }

    /// Selected text, empty when nothing is selected
    #[must_use]
    pub fn string_selection(&self) -> String {
        self.selected_range()
            .map(|range| self.container().text_range(range))
            .unwrap_or_default()
    }

    /// Position whose style typed text takes
    #[must_use]
    pub fn caret_position_for_default_style(&self) -> usize {
        self.caret.style_position(self.container())
    }

    // Editing

    fn finish(&mut self, result: Option<CommandResult>) -> bool {
        let Some(result) = result else {
            return false;
        };
        if let Some(caret) = result.new_caret {
            self.caret = Caret::new(caret);
        }
        self.selection.select_none();
        self.settle();
        result.success
    }

    fn execute(&mut self, command: &dyn EditorCommand) -> Option<CommandResult> {
        self.buffer.set_undo_caret(Some(self.caret.position));
        match command.execute(&mut self.buffer) {
            Ok(result) if result.success => Some(result),
            Ok(result) => {
                debug!(
                    command = command.description(),
                    message = result.message.as_deref().unwrap_or(""),
                    "editor command did not apply"
                );
                None
            }
            Err(err) => {
                debug!(command = command.description(), %err, "editor command failed");
                None
            }
        }
    }

    /// Delete the selected range
    pub fn delete_selection(&mut self) -> bool {
        let Some(range) = self.selected_range() else {
            return false;
        };
        let command = DeleteRangeCommand::new(range).in_container(self.focus.clone());
        let result = self.execute(&command);
        self.finish(result)
    }

    /// Character style typed text takes at the caret
    fn typing_style(&self) -> TextAttr {
        let mut style = self.pending_style.clone().unwrap_or_else(|| {
            let container = self.container();
            let position = self.caret.style_position(container);
            crate::style::resolver::uncombined_in(container, position, &TextAttr::new())
        });
        style.apply(&self.context.combined());
        style
    }

    /// Type text at the caret, replacing any selection as one undo step
    pub fn write_text(&mut self, text: &str) -> bool {
        let style = self.typing_style();
        let mut position = self.caret.position;
        let mut batch = BatchCommand::new("Typing".to_string());
        if let Some(range) = self.selected_range() {
            position = range.start;
            batch = batch.add_command(Box::new(
                DeleteRangeCommand::new(range).in_container(self.focus.clone()),
            ));
        }
        let insert = InsertContentCommand::text(position, text.to_string())
            .in_container(self.focus.clone())
            .with_style(style);
        batch = batch.add_command(Box::new(insert));
        let result = self.execute(&batch);
        self.pending_style = None;
        self.finish(result)
    }

    pub fn new_line(&mut self) -> bool {
        self.write_text("\n")
    }

    /// Delete the selection, or the position before the caret
    pub fn backspace(&mut self) -> bool {
        if self.has_selection() {
            return self.delete_selection();
        }
        let position = self.caret.position;
        if position == 0 {
            return false;
        }
        let command = DeleteRangeCommand::new(TextRange::new(position - 1, position))
            .in_container(self.focus.clone());
        let result = self.execute(&command);
        self.finish(result)
    }

    /// Delete the selection, or the position after the caret
    pub fn delete_forward(&mut self) -> bool {
        if self.has_selection() {
            return self.delete_selection();
        }
        let position = self.caret.position;
        let command = DeleteRangeCommand::new(TextRange::new(position, position + 1))
            .in_container(self.focus.clone());
        let result = self.execute(&command);
        self.finish(result)
    }

    pub fn undo(&mut self) -> bool {
        let result = match self.buffer.undo() {
            Ok(result) => Some(result),
            Err(err) => {
                debug!(%err, "undo unavailable");
                None
            }
        };
        self.finish(result)
    }

    pub fn redo(&mut self) -> bool {
        let result = match self.buffer.redo() {
            Ok(result) => Some(result),
            Err(err) => {
                debug!(%err, "redo unavailable");
                None
            }
        };
        self.finish(result)
    }

    // Styling

    /// Range a style toggle applies to: the selection or the caret's
    /// paragraph mark when `paragraph` is set
    fn style_target(&self, paragraph: bool) -> Option<TextRange> {
        if let Some(range) = self.selected_range() {
            return Some(range);
        }
        paragraph.then(|| TextRange::single(self.caret.position.min(self.container().last_position())))
    }

    /// Style shared by the selection, or the style typed text would take
    #[must_use]
    pub fn selection_style(&self) -> TextAttr {
        match self.selected_range() {
            Some(range) => self
                .buffer
                .style_for_range_in(&self.focus, range)
                .unwrap_or_default(),
            None => {
                let position = self.caret_position_for_default_style();
                let mut style = self
                    .buffer
                    .combined_style_in(&self.focus, position)
                    .unwrap_or_default();
                if let Some(pending) = &self.pending_style {
                    style.apply(pending);
                }
                style.apply(&self.context.combined());
                style
            }
        }
    }

    #[must_use]
    pub fn is_selection_bold(&self) -> bool {
        self.selection_style().is_bold()
    }

    #[must_use]
    pub fn is_selection_italics(&self) -> bool {
        self.selection_style().is_italic()
    }

    #[must_use]
    pub fn is_selection_underlined(&self) -> bool {
        self.selection_style().is_underlined()
    }

    #[must_use]
    pub fn does_selection_have_text_effect(&self, effect: TextEffects) -> bool {
        self.selection_style().has_text_effect(effect)
    }

    #[must_use]
    pub fn is_selection_aligned(&self, alignment: Alignment) -> bool {
        self.selection_style().alignment() == Some(alignment)
    }

    fn apply_character(&mut self, style: TextAttr) -> bool {
        match self.style_target(false) {
            Some(range) => {
                let command = SetStyleCommand::new(range, style)
                    .with_flags(
                        SetStyleFlags::WITH_UNDO
                            | SetStyleFlags::OPTIMIZE
                            | SetStyleFlags::CHARACTERS_ONLY,
                    )
                    .in_container(self.focus.clone());
                self.execute(&command).is_some()
            }
            None => {
                let mut pending = self.typing_style();
                pending.apply(&style);
                self.pending_style = Some(pending);
                true
            }
        }
    }

    pub fn apply_bold_to_selection(&mut self) -> bool {
        let mut style = TextAttr::new();
        style.set_bold(!self.is_selection_bold());
        self.apply_character(style)
    }

    pub fn apply_italic_to_selection(&mut self) -> bool {
        let mut style = TextAttr::new();
        style.set_italic(!self.is_selection_italics());
        self.apply_character(style)
    }

    pub fn apply_underline_to_selection(&mut self) -> bool {
        let mut style = TextAttr::new();
        style.set_underline(!self.is_selection_underlined());
        self.apply_character(style)
    }

    pub fn apply_text_effect_to_selection(&mut self, effect: TextEffects) -> bool {
        let mut style = TextAttr::new();
        style.set_text_effect(effect, !self.does_selection_have_text_effect(effect));
        self.apply_character(style)
    }

    /// Align the selected paragraphs, or the caret's paragraph
    pub fn apply_alignment_to_selection(&mut self, alignment: Alignment) -> bool {
        let Some(range) = self.style_target(true) else {
            return false;
        };
        let mut style = TextAttr::new();
        style.set_alignment(alignment);
        let command = SetStyleCommand::new(range, style)
            .with_flags(SetStyleFlags::WITH_UNDO | SetStyleFlags::PARAGRAPHS_ONLY)
            .in_container(self.focus.clone());
        self.execute(&command).is_some()
    }

    /// Apply a named character, paragraph or list style to the selection
    /// or the caret's paragraph
    pub fn apply_named_style(&mut self, name: &str) -> bool {
        let Some(range) = self.style_target(true) else {
            return false;
        };
        self.execute(&ApplyNamedStyleCommand::new(range, name)).is_some()
    }

    /// Make the buffer's default style the character style at the caret
    pub fn set_default_style_to_cursor_style(&mut self) -> bool {
        let container = self.container();
        let position = self.caret.style_position(container);
        let style = crate::style::resolver::uncombined_in(container, position, &TextAttr::new());
        self.buffer.set_default_style(style);
        true
    }

    // View

    /// Caret rectangle in document coordinates
    pub fn caret_rect(&mut self) -> Option<Rect> {
        let caret = self.caret;
        self.layout();
        self.layout
            .as_ref()?
            .caret_rect(&self.focus, caret.position, caret.at_line_start)
    }

    /// Resolve a point in view coordinates
    pub fn hit_test(&mut self, point: Point) -> HitTestResult {
        let logical = self.physical_to_logical(point);
        self.layout().hit_test(logical)
    }

    /// Root position as `(column, line)`
    pub fn position_to_xy(&mut self, position: usize) -> Option<(usize, usize)> {
        self.layout().position_to_xy(position)
    }

    /// Move the caret to a clicked point
    pub fn click(&mut self, point: Point, extend: bool) -> bool {
        let hit = self.hit_test(point);
        let extend = extend && hit.container == self.focus;
        if hit.container != self.focus {
            self.focus = hit.container.clone();
            self.selection = Selection::new();
            self.selection.container = hit.container;
        }
        self.x_hint = None;
        self.move_caret(
            Caret {
                position: hit.position,
                at_line_start: hit.at_line_start,
            },
            extend,
        )
    }

    #[must_use]
    pub fn logical_to_physical(&self, point: Point) -> Point {
        Point::new(point.x - self.scroll.x, point.y - self.scroll.y)
    }

    #[must_use]
    pub fn physical_to_logical(&self, point: Point) -> Point {
        Point::new(point.x + self.scroll.x, point.y + self.scroll.y)
    }

    pub fn scroll_to(&mut self, point: Point) {
        self.scroll = Point::new(point.x.max(0), point.y.max(0));
    }

    /// Scroll vertically until the caret is visible
    ///
    /// Returns whether the view scrolled.
    pub fn scroll_into_view(&mut self) -> bool {
        let Some(rect) = self.caret_rect() else {
            return false;
        };
        let page = self.config.page_height;
        let top = self.scroll.y;
        let y = if rect.y < top {
            rect.y
        } else if rect.bottom() > top + page {
            rect.bottom() - page
        } else {
            return false;
        };
        self.scroll = Point::new(self.scroll.x, y.max(0));
        true
    }

    /// Check if the caret rectangle of `position` overlaps the view
    pub fn is_position_visible(&mut self, position: usize) -> bool {
        let view = Rect::new(
            self.scroll.x,
            self.scroll.y,
            self.config.layout.wrap_width,
            self.config.page_height,
        );
        let layout = self.layout();
        layout
            .caret_rect(&ContainerPath::root(), position, false)
            .is_some_and(|rect| rect.intersects(&view))
    }

    /// First root position on a line at least partly in view
    pub fn first_visible_position(&mut self) -> usize {
        let top = self.scroll.y;
        let layout = self.layout();
        layout
            .root
            .lines
            .iter()
            .find(|line| line.bottom() > top)
            .or(layout.root.lines.last())
            .map_or(0, |line| line.range.start)
    }

    // Intents

    /// Dispatch a decoded input intent
    pub fn handle_intent(&mut self, intent: EditIntent) -> bool {
        match intent {
            EditIntent::Move {
                motion,
                count,
                extend,
            } => self.move_by(motion, count, extend),
            EditIntent::Click { point, extend } => self.click(point, extend),
            EditIntent::DoubleClick(point) => {
                self.click(point, false);
                self.select_word(self.caret.position)
            }
            EditIntent::Type(text) => self.write_text(&text),
            EditIntent::NewLine => self.new_line(),
            EditIntent::Backspace => self.backspace(),
            EditIntent::Delete => self.delete_forward(),
            EditIntent::SelectAll => self.select_all(),
            EditIntent::Undo => self.undo(),
            EditIntent::Redo => self.redo(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::BufferCommandExt;
    use pretty_assertions::assert_eq;

    fn narrow() -> RichTextEditor {
        let config = EditorConfig {
            layout: LayoutConfig {
                wrap_width: 100,
                ..LayoutConfig::default()
            },
            page_height: 32,
            ..EditorConfig::default()
        };
        let mut editor = RichTextEditor::with_config(config);
        editor.buffer_mut().add_paragraph("hello wonderful world");
        editor.buffer_mut().add_paragraph("end");
        editor
    }

    #[test]
    fn typing_moves_the_caret() {
        let mut editor = RichTextEditor::new();
        assert!(editor.handle_intent(EditIntent::Type("Hello".into())));
        assert_eq!(editor.caret(), Caret::new(5));
        assert!(editor.handle_intent(EditIntent::NewLine));
        assert!(editor.handle_intent(EditIntent::Type("World".into())));
        assert_eq!(editor.buffer().text(), "Hello\nWorld");
        assert!(editor.handle_intent(EditIntent::Backspace));
        assert_eq!(editor.buffer().text(), "Hello\nWorl");

        assert!(editor.handle_intent(EditIntent::Undo));
        assert_eq!(editor.buffer().text(), "Hello\nWorld");
    }

    #[test]
    fn shift_moves_extend_from_the_anchor() {
        let mut editor = narrow();
        editor.move_right(2, false);
        assert!(editor.move_right(3, true));
        assert_eq!(editor.selected_range(), Some(TextRange::new(2, 5)));
        assert_eq!(editor.string_selection(), "llo");
        assert!(editor.move_left(4, true));
        assert_eq!(editor.selected_range(), Some(TextRange::new(1, 2)));
        assert!(editor.move_right(1, false));
        assert!(!editor.has_selection());
    }

    #[test]
    fn typing_replaces_the_selection_in_one_step() {
        let mut editor = narrow();
        editor.select_word(8);
        assert_eq!(editor.string_selection(), "wonderful");
        assert!(editor.write_text("big"));
        assert_eq!(editor.buffer().paragraph_text(0).as_deref(), Some("hello big world"));
        assert_eq!(editor.caret(), Caret::new(9));
        assert!(editor.undo());
        assert_eq!(
            editor.buffer().paragraph_text(0).as_deref(),
            Some("hello wonderful world")
        );
    }

    #[test]
    fn toggles_follow_the_selection() {
        let mut editor = narrow();
        editor.select_word(0);
        assert!(!editor.is_selection_bold());
        assert!(editor.apply_bold_to_selection());
        assert!(editor.is_selection_bold());
        assert!(editor.buffer().combined_style(2).is_bold());
        assert!(!editor.buffer().combined_style(7).is_bold());
        assert!(editor.apply_bold_to_selection());
        assert!(!editor.buffer().combined_style(2).is_bold());
    }

    #[test]
    fn toggles_without_selection_style_the_next_typing() {
        let mut editor = narrow();
        editor.move_end(false);
        assert!(editor.apply_italic_to_selection());
        assert!(editor.is_selection_italics());
        assert!(editor.write_text("!"));
        assert!(editor.buffer().combined_style(25).is_italic());
        assert!(!editor.buffer().combined_style(24).is_italic());
        editor.move_left(1, false);
        assert!(!editor.is_selection_italics());
    }

    #[test]
    fn alignment_applies_to_the_caret_paragraph() {
        let mut editor = narrow();
        editor.move_end(false);
        assert!(editor.apply_alignment_to_selection(Alignment::Centre));
        assert!(editor.is_selection_aligned(Alignment::Centre));
        assert_eq!(editor.buffer().paragraph_style_at(0).alignment(), None);
    }

    #[test]
    fn caret_shows_on_the_wrapped_line_after_moving_forward() {
        let mut editor = narrow();
        editor.move_right(5, false);
        editor.move_right(1, false);
        assert_eq!(editor.caret(), Caret::at_line_start(6));
        assert_eq!(editor.caret_rect(), Some(Rect::new(5, 21, 1, 16)));

        // just past the first line's last glyph
        editor.click(Point::new(60, 8), false);
        assert_eq!(editor.caret(), Caret::new(6));
        assert_eq!(editor.caret_rect(), Some(Rect::new(53, 5, 1, 16)));
    }

    #[test]
    fn vertical_moves_remember_the_column() {
        let mut editor = narrow();
        editor.move_right(2, false);
        editor.move_down(1, false);
        assert_eq!(editor.caret(), Caret::new(8));
        editor.move_down(2, false);
        assert_eq!(editor.caret(), Caret::new(24));
        editor.move_up(2, false);
        assert_eq!(editor.caret(), Caret::new(8));
    }

    #[test]
    fn scrolling_follows_the_caret() {
        let mut editor = narrow();
        assert_eq!(editor.first_visible_position(), 0);
        editor.move_end(false);
        assert!(editor.scroll_into_view());
        assert_eq!(editor.scroll_position(), Point::new(0, 37));
        assert_eq!(editor.first_visible_position(), 16);
        assert!(!editor.is_position_visible(0));
        assert!(editor.is_position_visible(24));
        assert_eq!(
            editor.physical_to_logical(Point::new(3, 4)),
            Point::new(3, 41)
        );
        assert!(!editor.scroll_into_view());
    }

    #[test]
    fn double_click_selects_a_word() {
        let mut editor = narrow();
        assert!(editor.handle_intent(EditIntent::DoubleClick(Point::new(5 + 8 * 8, 24))));
        assert_eq!(editor.string_selection(), "wonderful");
        assert!(editor.handle_intent(EditIntent::Delete));
        assert_eq!(editor.buffer().paragraph_text(0).as_deref(), Some("hello  world"));
    }

    #[test]
    #[cfg(feature = "delayed-images")]
    fn decoded_images_land_before_layout() {
        use crate::core::{DecodedImage, ImageObject, InlineObject};

        let mut editor = RichTextEditor::new();
        editor.buffer_mut().add_paragraph("ab");
        assert!(editor.buffer_mut().write_image(1, ImageObject::new("cat.png")));
        editor.layout();
        let generation = editor.buffer().layout_generation();
        let stats = editor.buffer().history_stats();

        let queue = editor.buffer().image_queue();
        std::thread::spawn(move || queue.submit(DecodedImage::new("cat.png", 40, 30)))
            .join()
            .unwrap();
        let current = editor.layout().generation;
        assert_eq!(current, editor.buffer().layout_generation());

        let Some(InlineObject::Image(image)) = editor.buffer().root().object_at(1) else {
            panic!("expected an image");
        };
        assert_eq!(image.size, Some((40, 30)));
        assert_ne!(editor.buffer().layout_generation(), generation);
        assert_eq!(editor.buffer().history_stats(), stats);
    }

    #[test]
    fn select_all_covers_the_container() {
        let mut editor = narrow();
        assert!(editor.handle_intent(EditIntent::SelectAll));
        assert_eq!(editor.selected_range(), Some(TextRange::new(0, 26)));
        assert_eq!(editor.string_selection(), "hello wonderful world\nend");
        assert!(editor.delete_selection());
        assert_eq!(editor.buffer().text(), "");
        assert_eq!(editor.buffer().last_position(), 0);
    }
}
