//! The document buffer
//!
//! [`Buffer`] is the root container plus everything a document owns: the
//! style sheet stack, the basic and default styles, the undo history, the
//! edit policy, scale factors and the layout generation counter. Every
//! mutation funnels through [`Buffer::apply_edit`], which replaces a slice of
//! paragraphs in one container and records the replaced and replacing
//! paragraphs by value.

use super::container::{Container, ContainerId, ContainerPath};
use super::errors::{EditorError, Result};
use super::history::{BatchMark, HistoryStats, Operation, UndoManager, UndoStackConfig};
use super::object::Paragraph;
use super::policy::{AllowAll, EditPolicy};
use crate::commands::CommandResult;
use richtext_core::{StyleSheet, StyleSheetStack, TextAttr, TextRange};
use tracing::debug;

#[cfg(feature = "delayed-images")]
use super::delayed_images::ImageLoadQueue;

/// A paragraph-slice replacement to apply to one container
#[derive(Debug, Clone)]
pub struct Edit {
    pub container: ContainerPath,
    /// First paragraph replaced
    pub index: usize,
    /// Number of paragraphs replaced
    pub remove: usize,
    pub insert: Vec<Paragraph>,
}

/// Document state captured when a composite edit opens its batch
#[derive(Debug)]
pub struct Checkpoint {
    root: Container,
    sheets: StyleSheetStack,
    basic_style: TextAttr,
    modified: bool,
    next_container_id: u32,
    mark: BatchMark,
}

/// Root of a document
#[derive(Debug)]
pub struct Buffer {
    root: Container,
    sheets: StyleSheetStack,
    basic_style: TextAttr,
    default_style: TextAttr,
    history: UndoManager,
    policy: Box<dyn EditPolicy>,
    font_scale: f64,
    dimension_scale: f64,
    layout_generation: u64,
    modified: bool,
    next_container_id: u32,
    max_length: Option<usize>,
    #[cfg(feature = "delayed-images")]
    image_queue: ImageLoadQueue,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// Create an empty buffer with the standard list styles
    pub fn new() -> Self {
        Self::with_undo_config(UndoStackConfig::default())
    }

    /// Create an empty buffer with a custom undo configuration
    pub fn with_undo_config(config: UndoStackConfig) -> Self {
        Self {
            root: Container::new(ContainerId::ROOT),
            sheets: StyleSheetStack::default(),
            basic_style: TextAttr::new(),
            default_style: TextAttr::new(),
            history: UndoManager::with_config(config),
            policy: Box::new(AllowAll),
            font_scale: 1.0,
            dimension_scale: 1.0,
            layout_generation: 0,
            modified: false,
            next_container_id: 1,
            max_length: None,
            #[cfg(feature = "delayed-images")]
            image_queue: ImageLoadQueue::new(),
        }
    }

    // Tree access

    #[must_use]
    pub fn root(&self) -> &Container {
        &self.root
    }

    /// Resolve a container path
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ContainerNotFound`] for stale paths.
    pub fn container(&self, path: &ContainerPath) -> Result<&Container> {
        self.root
            .resolve(path)
            .ok_or_else(|| EditorError::ContainerNotFound {
                path: path.to_string(),
            })
    }

    /// Current path of the container with `id`
    #[must_use]
    pub fn path_of(&self, id: ContainerId) -> Option<ContainerPath> {
        self.root.find_path(id)
    }

    /// Hand out a fresh container id
    pub fn allocate_container_id(&mut self) -> ContainerId {
        let id = ContainerId(self.next_container_id);
        self.next_container_id += 1;
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.root.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Position of the final paragraph mark
    #[must_use]
    pub fn last_position(&self) -> usize {
        self.root.last_position()
    }

    /// Text of the root container, paragraphs joined by `\n`
    #[must_use]
    pub fn text(&self) -> String {
        self.root.text()
    }

    /// Text of a range of the root container
    #[must_use]
    pub fn text_range(&self, range: TextRange) -> String {
        self.root.text_range(range)
    }

    #[must_use]
    pub fn paragraph_count(&self) -> usize {
        self.root.paragraph_count()
    }

    /// Length of a paragraph without its mark
    #[must_use]
    pub fn paragraph_length(&self, index: usize) -> Option<usize> {
        self.root.paragraph(index).map(Paragraph::text_len)
    }

    #[must_use]
    pub fn paragraph_text(&self, index: usize) -> Option<String> {
        self.root.paragraph(index).map(Paragraph::text)
    }

    // Styles

    #[must_use]
    pub fn style_sheets(&self) -> &StyleSheetStack {
        &self.sheets
    }

    /// The top style sheet
    #[must_use]
    pub fn style_sheet(&self) -> &StyleSheet {
        self.sheets.top()
    }

    /// Replace the top style sheet, recording the change
    pub fn set_style_sheet(&mut self, sheet: StyleSheet) {
        let before = self.sheets.clone();
        self.sheets.replace_top(sheet);
        self.record_sheets(before, "Set style sheet");
    }

    /// Layer a style sheet over the current ones, recording the change
    pub fn push_style_sheet(&mut self, sheet: StyleSheet) {
        let before = self.sheets.clone();
        self.sheets.push(sheet);
        self.record_sheets(before, "Push style sheet");
    }

    /// Remove the top style sheet; the base sheet stays
    pub fn pop_style_sheet(&mut self) -> Option<StyleSheet> {
        let before = self.sheets.clone();
        let popped = self.sheets.pop()?;
        self.record_sheets(before, "Pop style sheet");
        Some(popped)
    }

    fn record_sheets(&mut self, before: StyleSheetStack, description: &str) {
        let operation = Operation::ReplaceStyleSheets {
            before: Box::new(before),
            after: Box::new(self.sheets.clone()),
        };
        self.history.record(operation, description, None, None);
        self.touch();
    }

    /// Bottom layer of every combined style
    #[must_use]
    pub fn basic_style(&self) -> &TextAttr {
        &self.basic_style
    }

    /// Replace the basic style, recording the change
    pub fn set_basic_style(&mut self, style: TextAttr) {
        if style == self.basic_style {
            return;
        }
        let before = core::mem::replace(&mut self.basic_style, style);
        let operation = Operation::ReplaceBasicStyle {
            before,
            after: self.basic_style.clone(),
        };
        self.history.record(operation, "Set basic style", None, None);
        self.touch();
    }

    /// Style given to newly inserted content when no style context is open
    #[must_use]
    pub fn default_style(&self) -> &TextAttr {
        &self.default_style
    }

    pub fn set_default_style(&mut self, style: TextAttr) {
        self.default_style = style;
    }

    // Scale, policy and state

    #[must_use]
    pub fn font_scale(&self) -> f64 {
        self.font_scale
    }

    pub fn set_font_scale(&mut self, scale: f64) {
        self.font_scale = scale;
        self.invalidate_layout();
    }

    #[must_use]
    pub fn dimension_scale(&self) -> f64 {
        self.dimension_scale
    }

    pub fn set_dimension_scale(&mut self, scale: f64) {
        self.dimension_scale = scale;
        self.invalidate_layout();
    }

    /// Install the hooks consulted before every mutation
    pub fn set_policy(&mut self, policy: Box<dyn EditPolicy>) {
        self.policy = policy;
    }

    #[must_use]
    pub fn policy(&self) -> &dyn EditPolicy {
        self.policy.as_ref()
    }

    /// Maximum number of positions in the root container
    pub fn set_max_length(&mut self, max_length: Option<usize>) {
        self.max_length = max_length;
    }

    #[must_use]
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_dirty(&mut self) {
        self.modified = true;
    }

    /// Clear the modified flag and forget undo history
    pub fn discard_edits(&mut self) {
        self.modified = false;
        self.history.clear();
    }

    /// Counter bumped by every change that affects layout
    #[must_use]
    pub fn layout_generation(&self) -> u64 {
        self.layout_generation
    }

    pub fn invalidate_layout(&mut self) {
        self.layout_generation = self.layout_generation.wrapping_add(1);
    }

    fn touch(&mut self) {
        self.modified = true;
        self.invalidate_layout();
    }

    // Undo

    #[must_use]
    pub fn history(&self) -> &UndoManager {
        &self.history
    }

    #[must_use]
    pub fn history_stats(&self) -> HistoryStats {
        self.history.stats()
    }

    /// Caret index recorded as "before" for the next history entry
    pub fn set_undo_caret(&mut self, caret: Option<usize>) {
        self.history.set_caret(caret);
    }

    /// Start grouping edits into one undo step
    pub fn begin_batch_undo(&mut self, name: &str) {
        self.history.begin_batch(name);
    }

    /// Close one batch level
    ///
    /// Returns `false` when there was no open batch.
    pub fn end_batch_undo(&mut self) -> bool {
        self.history.end_batch().is_ok()
    }

    /// Open a batch that [`Self::rollback_batch`] can undo without a trace
    pub fn begin_checkpoint(&mut self, name: &str) -> Checkpoint {
        self.history.begin_batch(name);
        Checkpoint {
            root: self.root.clone(),
            sheets: self.sheets.clone(),
            basic_style: self.basic_style.clone(),
            modified: self.modified,
            next_container_id: self.next_container_id,
            mark: self.history.batch_mark(),
        }
    }

    /// Restore the state captured by [`Self::begin_checkpoint`] and close its
    /// batch without recording anything
    pub fn rollback_batch(&mut self, checkpoint: Checkpoint) {
        self.root = checkpoint.root;
        self.sheets = checkpoint.sheets;
        self.basic_style = checkpoint.basic_style;
        self.modified = checkpoint.modified;
        self.next_container_id = checkpoint.next_container_id;
        let _ = self.history.abort_batch(checkpoint.mark);
        self.invalidate_layout();
    }

    /// Stop recording edits until the matching [`Self::end_suppress_undo`]
    pub fn begin_suppress_undo(&mut self) {
        self.history.begin_suppress();
    }

    /// Returns `false` when suppression was not active
    pub fn end_suppress_undo(&mut self) -> bool {
        self.history.end_suppress().is_ok()
    }

    /// Check that every batch and suppression has been closed
    #[must_use]
    pub fn is_undo_idle(&self) -> bool {
        self.history.is_idle()
    }

    /// Close all open batches and suppressions
    pub fn force_close_undo(&mut self) {
        self.history.force_close();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Revert the most recent undo step
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NothingToUndo`] on an empty history,
    /// [`EditorError::HistoryError`] while a batch is open or when the entry
    /// no longer fits the document.
    pub fn undo(&mut self) -> Result<CommandResult> {
        if self.history.batch_depth() > 0 {
            return Err(EditorError::history("cannot undo while a batch is open"));
        }
        let entry = self
            .history
            .pop_undo_entry()
            .ok_or(EditorError::NothingToUndo)?;
        debug!(description = %entry.description, "undo");
        if let Err(err) = self.replay(&entry.operation, false) {
            self.history.push_undo_entry(entry);
            return Err(err);
        }
        let result = CommandResult {
            success: true,
            message: Some(entry.description.clone()),
            modified_range: entry.modified_range,
            new_caret: entry.caret_before,
            content_changed: true,
        };
        self.history.push_redo_entry(entry);
        self.touch();
        Ok(result)
    }

    /// Re-apply the most recently undone step
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NothingToRedo`] on an empty redo stack.
    pub fn redo(&mut self) -> Result<CommandResult> {
        if self.history.batch_depth() > 0 {
            return Err(EditorError::history("cannot redo while a batch is open"));
        }
        let entry = self
            .history
            .pop_redo_entry()
            .ok_or(EditorError::NothingToRedo)?;
        debug!(description = %entry.description, "redo");
        if let Err(err) = self.replay(&entry.operation, true) {
            self.history.push_redo_entry(entry);
            return Err(err);
        }
        let result = CommandResult {
            success: true,
            message: Some(entry.description.clone()),
            modified_range: entry.modified_range,
            new_caret: entry.caret_after,
            content_changed: true,
        };
        self.history.push_undo_entry(entry);
        self.touch();
        Ok(result)
    }

    fn replay(&mut self, operation: &Operation, forward: bool) -> Result<()> {
        match operation {
            Operation::ReplaceParagraphs {
                container,
                index,
                removed,
                inserted,
            } => {
                let target = self.root.resolve_mut(container).ok_or_else(|| {
                    EditorError::history(format!("container {container} no longer exists"))
                })?;
                let (remove, insert) = if forward {
                    (removed.len(), inserted)
                } else {
                    (inserted.len(), removed)
                };
                target
                    .splice_paragraphs(*index, remove, insert.clone())
                    .map_err(EditorError::history)?;
            }
            Operation::ReplaceStyleSheets { before, after } => {
                self.sheets = if forward { after } else { before }.as_ref().clone();
            }
            Operation::ReplaceBasicStyle { before, after } => {
                self.basic_style = if forward { after } else { before }.clone();
            }
            Operation::Composite(operations) => {
                if forward {
                    for op in operations {
                        self.replay(op, true)?;
                    }
                } else {
                    for op in operations.iter().rev() {
                        self.replay(op, false)?;
                    }
                }
            }
        }
        Ok(())
    }

    // Mutation

    /// Replace a slice of paragraphs, optionally recording it for undo
    ///
    /// Nothing is changed or recorded when the new paragraphs equal the old
    /// ones. Returns whether the document changed.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ContainerNotFound`] for a stale path or
    /// [`EditorError::PositionOutOfBounds`] if the slice does not fit.
    pub fn apply_edit(
        &mut self,
        edit: Edit,
        description: &str,
        record: bool,
        modified_range: Option<TextRange>,
        caret_after: Option<usize>,
    ) -> Result<bool> {
        let target = self
            .root
            .resolve_mut(&edit.container)
            .ok_or_else(|| EditorError::ContainerNotFound {
                path: edit.container.to_string(),
            })?;

        let end = edit.index + edit.remove;
        if end > target.paragraph_count() {
            return Err(EditorError::PositionOutOfBounds {
                position: end,
                length: target.paragraph_count(),
            });
        }
        if unchanged(&target.paragraphs()[edit.index..end], &edit.insert, target.id) {
            return Ok(false);
        }

        let inserted_count = edit.insert.len();
        let removed = target.splice_paragraphs(edit.index, edit.remove, edit.insert)?;

        if record {
            let inserted = self
                .root
                .resolve(&edit.container)
                .map(|c| c.paragraphs()[edit.index..edit.index + inserted_count].to_vec())
                .unwrap_or_default();
            let operation = Operation::ReplaceParagraphs {
                container: edit.container,
                index: edit.index,
                removed,
                inserted,
            };
            self.history
                .record(operation, description, modified_range, caret_after);
        }
        self.touch();
        Ok(true)
    }

    // Delayed images

    /// Handle decoders use to queue decoded images from any thread
    #[cfg(feature = "delayed-images")]
    #[must_use]
    pub fn image_queue(&self) -> ImageLoadQueue {
        self.image_queue.clone()
    }

    /// Apply queued decoded images to matching image objects
    ///
    /// Not recorded for undo. Returns the number of image objects updated.
    #[cfg(feature = "delayed-images")]
    pub fn process_delayed_images(&mut self) -> usize {
        let decoded = self.image_queue.drain();
        if decoded.is_empty() {
            return 0;
        }
        let mut updated = 0;
        for image in &decoded {
            let size = (image.width, image.height);
            updated += self.root.for_each_image_mut(&mut |object| {
                if object.source == image.source && object.size != Some(size) {
                    object.size = Some(size);
                    true
                } else {
                    false
                }
            });
        }
        debug!(queued = decoded.len(), updated, "applied delayed images");
        if updated > 0 {
            self.invalidate_layout();
        }
        updated
    }
}

/// Compare paragraphs ignoring stale position bookkeeping in the replacement
fn unchanged(current: &[Paragraph], replacement: &[Paragraph], id: ContainerId) -> bool {
    current.len() == replacement.len()
        && current.iter().zip(replacement).all(|(old, new)| {
            let mut new = new.clone();
            new.update_ranges(old.base.range.start, id);
            *old == new
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paragraph(text: &str) -> Paragraph {
        Paragraph::with_text(text, TextAttr::new(), TextAttr::new())
    }

    fn insert_paragraphs(buffer: &mut Buffer, texts: &[&str]) {
        let edit = Edit {
            container: ContainerPath::root(),
            index: buffer.root().paragraph_count(),
            remove: 0,
            insert: texts.iter().map(|t| paragraph(t)).collect(),
        };
        buffer.apply_edit(edit, "Add", true, None, None).unwrap();
    }

    #[test]
    fn apply_edit_records_and_undoes() {
        let mut buffer = Buffer::new();
        insert_paragraphs(&mut buffer, &["one", "two"]);
        assert_eq!(buffer.text(), "one\ntwo");
        assert!(buffer.is_modified());

        let edit = Edit {
            container: ContainerPath::root(),
            index: 1,
            remove: 1,
            insert: vec![paragraph("TWO"), paragraph("three")],
        };
        buffer.apply_edit(edit, "Replace", true, None, None).unwrap();
        assert_eq!(buffer.text(), "one\nTWO\nthree");

        let before = buffer.root().clone();
        buffer.undo().unwrap();
        assert_eq!(buffer.text(), "one\ntwo");
        buffer.redo().unwrap();
        assert_eq!(buffer.root(), &before);
    }

    #[test]
    fn identical_edit_is_not_recorded() {
        let mut buffer = Buffer::new();
        insert_paragraphs(&mut buffer, &["same"]);
        let count = buffer.history_stats().undo_count;
        let edit = Edit {
            container: ContainerPath::root(),
            index: 0,
            remove: 1,
            insert: vec![paragraph("same")],
        };
        assert_eq!(buffer.apply_edit(edit, "Noop", true, None, None), Ok(false));
        assert_eq!(buffer.history_stats().undo_count, count);
    }

    #[test]
    fn stale_paths_and_bounds_are_errors() {
        let mut buffer = Buffer::new();
        let bad = Edit {
            container: ContainerPath::root(),
            index: 3,
            remove: 1,
            insert: Vec::new(),
        };
        assert!(buffer.apply_edit(bad, "Bad", true, None, None).is_err());
        assert_eq!(buffer.undo(), Err(EditorError::NothingToUndo));
        assert_eq!(buffer.redo(), Err(EditorError::NothingToRedo));
    }

    #[test]
    fn style_sheet_changes_are_undoable() {
        let mut buffer = Buffer::new();
        let original = buffer.style_sheets().clone();
        buffer.set_style_sheet(StyleSheet::new());
        assert!(buffer.style_sheet().is_empty());
        buffer.undo().unwrap();
        assert_eq!(buffer.style_sheets(), &original);

        buffer.push_style_sheet(StyleSheet::new());
        assert_eq!(buffer.style_sheets().depth(), 2);
        assert!(buffer.pop_style_sheet().is_some());
        assert!(buffer.pop_style_sheet().is_none());
    }

    #[test]
    fn basic_style_is_undoable() {
        let mut buffer = Buffer::new();
        let mut style = TextAttr::new();
        style.set_font_size(12.0);
        buffer.set_basic_style(style.clone());
        assert_eq!(buffer.basic_style(), &style);
        buffer.undo().unwrap();
        assert!(buffer.basic_style().is_default());
    }

    #[test]
    fn discard_edits_clears_state() {
        let mut buffer = Buffer::new();
        insert_paragraphs(&mut buffer, &["x"]);
        buffer.discard_edits();
        assert!(!buffer.is_modified());
        assert!(!buffer.can_undo());
    }
}
