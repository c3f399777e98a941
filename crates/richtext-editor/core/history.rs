//! History management for undo/redo operations
//!
//! Every recorded [`Operation`] captures document state by value: the
//! paragraphs an edit removed and inserted, or whole style sheets and basic
//! styles. Replaying one backwards or forwards therefore reproduces the exact
//! tree, list numbering and style-sheet references.
//!
//! [`UndoManager`] adds two independent nesting counters on top of the
//! [`UndoStack`]. While a batch is open, recorded operations accumulate into
//! one composite that is pushed as a single step when the outermost batch
//! ends. While suppression is active, recorded operations are dropped.

use super::container::ContainerPath;
use super::errors::{EditorError, Result};
use super::object::{InlineObject, Paragraph};
use richtext_core::{StyleSheetStack, TextAttr, TextRange};
use std::collections::VecDeque;
use tracing::{error, trace};

/// A reversible change to the document
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Paragraphs at `index` in `container` were replaced
    ReplaceParagraphs {
        container: ContainerPath,
        index: usize,
        removed: Vec<Paragraph>,
        inserted: Vec<Paragraph>,
    },
    /// The style sheet stack was replaced
    ReplaceStyleSheets {
        before: Box<StyleSheetStack>,
        after: Box<StyleSheetStack>,
    },
    /// The basic style was replaced
    ReplaceBasicStyle { before: TextAttr, after: TextAttr },
    /// Operations recorded inside one batch, in execution order
    Composite(Vec<Operation>),
}

impl Operation {
    /// Get memory usage of this operation
    pub fn memory_usage(&self) -> usize {
        let own = core::mem::size_of::<Self>();
        match self {
            Self::ReplaceParagraphs {
                container,
                removed,
                inserted,
                ..
            } => {
                own + container.depth() * core::mem::size_of::<super::container::PathStep>()
                    + removed.iter().map(paragraph_memory).sum::<usize>()
                    + inserted.iter().map(paragraph_memory).sum::<usize>()
            }
            Self::ReplaceStyleSheets { before, after } => {
                own + (before.depth() + after.depth()) * 4096
            }
            Self::ReplaceBasicStyle { .. } => own + 2 * core::mem::size_of::<TextAttr>(),
            Self::Composite(ops) => own + ops.iter().map(Self::memory_usage).sum::<usize>(),
        }
    }

    /// Check whether replaying this operation changes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Composite(ops) => ops.iter().all(Self::is_empty),
            Self::ReplaceParagraphs {
                removed, inserted, ..
            } => removed == inserted,
            Self::ReplaceStyleSheets { before, after } => before == after,
            Self::ReplaceBasicStyle { before, after } => before == after,
        }
    }
}

fn paragraph_memory(para: &Paragraph) -> usize {
    core::mem::size_of::<Paragraph>()
        + para
            .children
            .iter()
            .map(|child| {
                core::mem::size_of::<InlineObject>()
                    + match child {
                        InlineObject::Text(run) => run.text.len(),
                        InlineObject::Table(table) => table
                            .rows
                            .iter()
                            .flatten()
                            .flat_map(|cell| cell.paragraphs())
                            .map(paragraph_memory)
                            .sum(),
                        InlineObject::Box(boxed) => {
                            boxed.container.paragraphs().iter().map(paragraph_memory).sum()
                        }
                        InlineObject::Image(_) | InlineObject::Field(_) => 0,
                    }
            })
            .sum::<usize>()
}

/// A single entry in the undo/redo history
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub operation: Operation,
    pub description: String,
    /// Range affected by the operation, in the container it edited
    pub modified_range: Option<TextRange>,
    /// Caret index before the operation
    pub caret_before: Option<usize>,
    /// Caret index after the operation
    pub caret_after: Option<usize>,
    pub memory_usage: usize,
}

impl HistoryEntry {
    /// Create a new history entry
    pub fn new(
        operation: Operation,
        description: String,
        modified_range: Option<TextRange>,
        caret_before: Option<usize>,
        caret_after: Option<usize>,
    ) -> Self {
        let memory_usage = operation.memory_usage() + description.len();
        Self {
            operation,
            description,
            modified_range,
            caret_before,
            caret_after,
            memory_usage,
        }
    }
}

/// Configuration for undo stack behavior
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UndoStackConfig {
    /// Maximum number of undo entries to keep
    pub max_entries: usize,

    /// Maximum memory usage in bytes (0 = unlimited)
    pub max_memory: usize,
}

impl Default for UndoStackConfig {
    fn default() -> Self {
        Self {
            max_entries: 100,
            max_memory: 10 * 1024 * 1024,
        }
    }
}

/// Undo/redo stack with count and memory limits
///
/// The most recent entries sit at the front; limits evict from the back.
#[derive(Debug, Default)]
pub struct UndoStack {
    config: UndoStackConfig,
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: VecDeque<HistoryEntry>,
    current_memory: usize,
}

impl UndoStack {
    /// Create a new undo stack with default configuration
    pub fn new() -> Self {
        Self::with_config(UndoStackConfig::default())
    }

    /// Create a new undo stack with custom configuration
    pub fn with_config(config: UndoStackConfig) -> Self {
        Self {
            config,
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            current_memory: 0,
        }
    }

    /// Push a new entry onto the undo stack
    ///
    /// New operations invalidate previously undone ones, so the redo stack
    /// is cleared.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.clear_redo_stack();
        self.push_undo_keep_redo(entry);
    }

    /// Push onto the undo stack without touching redo (used by redo itself)
    pub fn push_undo_keep_redo(&mut self, entry: HistoryEntry) {
        self.current_memory += entry.memory_usage;
        self.undo_stack.push_front(entry);
        self.enforce_limits();
    }

    /// Pop the most recent entry from the undo stack
    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.undo_stack.pop_front()?;
        self.current_memory -= entry.memory_usage;
        Some(entry)
    }

    /// Push an entry onto the redo stack
    pub fn push_redo(&mut self, entry: HistoryEntry) {
        self.current_memory += entry.memory_usage;
        self.redo_stack.push_front(entry);
    }

    /// Pop an entry from the redo stack
    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop_front()?;
        self.current_memory -= entry.memory_usage;
        Some(entry)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Get current memory usage in bytes
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    #[must_use]
    pub fn next_undo_description(&self) -> Option<&str> {
        self.undo_stack
            .front()
            .map(|entry| entry.description.as_str())
    }

    #[must_use]
    pub fn next_redo_description(&self) -> Option<&str> {
        self.redo_stack
            .front()
            .map(|entry| entry.description.as_str())
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_memory = 0;
    }

    fn clear_redo_stack(&mut self) {
        for entry in self.redo_stack.drain(..) {
            self.current_memory -= entry.memory_usage;
        }
    }

    fn enforce_limits(&mut self) {
        while self.undo_stack.len() > self.config.max_entries {
            if let Some(entry) = self.undo_stack.pop_back() {
                self.current_memory -= entry.memory_usage;
            }
        }

        // always keep the newest entry, however large
        while self.config.max_memory > 0
            && self.current_memory > self.config.max_memory
            && self.undo_stack.len() > 1
        {
            if let Some(entry) = self.undo_stack.pop_back() {
                self.current_memory -= entry.memory_usage;
            }
        }
    }
}

/// An open batch collecting operations
#[derive(Debug)]
struct PendingBatch {
    description: String,
    operations: Vec<Operation>,
    modified_range: Option<TextRange>,
    caret_before: Option<usize>,
    caret_after: Option<usize>,
}

/// Position inside an open batch that [`UndoManager::abort_batch`] rewinds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchMark {
    operations: usize,
    modified_range: Option<TextRange>,
    caret_after: Option<usize>,
    current_caret: Option<usize>,
}

/// Coordinates recording, batching and suppression over an [`UndoStack`]
#[derive(Debug, Default)]
pub struct UndoManager {
    stack: UndoStack,
    batch_depth: usize,
    batch: Option<PendingBatch>,
    suppress_depth: usize,
    current_caret: Option<usize>,
}

impl UndoManager {
    /// Create a new undo manager
    pub fn new() -> Self {
        Self::with_config(UndoStackConfig::default())
    }

    /// Create a new undo manager with custom configuration
    pub fn with_config(config: UndoStackConfig) -> Self {
        Self {
            stack: UndoStack::with_config(config),
            ..Self::default()
        }
    }

    /// Replace the stack configuration, dropping existing history
    pub fn set_config(&mut self, config: UndoStackConfig) {
        self.stack = UndoStack::with_config(config);
    }

    /// Update the caret index recorded as "before" for the next entry
    pub fn set_caret(&mut self, caret: Option<usize>) {
        self.current_caret = caret;
    }

    /// Record an operation
    ///
    /// Returns `true` if it was kept (pushed or added to the open batch).
    pub fn record(
        &mut self,
        operation: Operation,
        description: &str,
        modified_range: Option<TextRange>,
        caret_after: Option<usize>,
    ) -> bool {
        if self.suppress_depth > 0 {
            trace!(description, "undo suppressed, operation not recorded");
            return false;
        }

        if let Some(batch) = self.batch.as_mut() {
            batch.operations.push(operation);
            batch.modified_range = match (batch.modified_range, modified_range) {
                (Some(a), Some(b)) => Some(a.union(&b)),
                (a, b) => a.or(b),
            };
            if caret_after.is_some() {
                batch.caret_after = caret_after;
            }
        } else {
            let entry = HistoryEntry::new(
                operation,
                description.to_string(),
                modified_range,
                self.current_caret,
                caret_after,
            );
            self.stack.push(entry);
        }

        if caret_after.is_some() {
            self.current_caret = caret_after;
        }
        true
    }

    /// Open a batch, or nest inside the one already open
    pub fn begin_batch(&mut self, description: &str) {
        if self.batch_depth == 0 {
            self.batch = Some(PendingBatch {
                description: description.to_string(),
                operations: Vec::new(),
                modified_range: None,
                caret_before: self.current_caret,
                caret_after: None,
            });
        }
        self.batch_depth += 1;
    }

    /// Close one batch level; closing the outermost pushes one undo step
    ///
    /// Returns `Ok(true)` when a step was pushed.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnbalancedUndo`] without a matching
    /// [`Self::begin_batch`]. Debug builds panic instead.
    pub fn end_batch(&mut self) -> Result<bool> {
        debug_assert!(self.batch_depth > 0, "end_batch without a matching begin_batch");
        if self.batch_depth == 0 {
            error!("end_batch called without a matching begin_batch; ignoring");
            return Err(EditorError::unbalanced("end_batch without begin_batch"));
        }

        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return Ok(false);
        }

        let Some(batch) = self.batch.take() else {
            return Err(EditorError::history("batch state lost"));
        };
        let entry = HistoryEntry::new(
            Operation::Composite(batch.operations),
            batch.description,
            batch.modified_range,
            batch.caret_before,
            batch.caret_after,
        );
        self.stack.push(entry);
        Ok(true)
    }

    /// Current extent of the open batch
    #[must_use]
    pub fn batch_mark(&self) -> BatchMark {
        let (operations, modified_range, caret_after) = self
            .batch
            .as_ref()
            .map_or((0, None, None), |b| (b.operations.len(), b.modified_range, b.caret_after));
        BatchMark {
            operations,
            modified_range,
            caret_after,
            current_caret: self.current_caret,
        }
    }

    /// Close one batch level, discarding what it recorded since `mark`
    ///
    /// Closing the outermost level this way pushes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnbalancedUndo`] when no batch is open.
    pub fn abort_batch(&mut self, mark: BatchMark) -> Result<()> {
        if self.batch_depth == 0 {
            error!("abort_batch called without an open batch; ignoring");
            return Err(EditorError::unbalanced("abort_batch without begin_batch"));
        }
        if let Some(batch) = self.batch.as_mut() {
            batch.operations.truncate(mark.operations);
            batch.modified_range = mark.modified_range;
            batch.caret_after = mark.caret_after;
        }
        self.current_caret = mark.current_caret;
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            self.batch = None;
        }
        Ok(())
    }

    /// Start suppressing recording
    pub fn begin_suppress(&mut self) {
        self.suppress_depth += 1;
    }

    /// Stop one level of suppression
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnbalancedUndo`] without a matching
    /// [`Self::begin_suppress`]. Debug builds panic instead.
    pub fn end_suppress(&mut self) -> Result<()> {
        debug_assert!(
            self.suppress_depth > 0,
            "end_suppress without a matching begin_suppress"
        );
        if self.suppress_depth == 0 {
            error!("end_suppress called without a matching begin_suppress; ignoring");
            return Err(EditorError::unbalanced("end_suppress without begin_suppress"));
        }
        self.suppress_depth -= 1;
        Ok(())
    }

    /// Close every open batch and suppression level
    ///
    /// Pending batched operations are pushed as one step.
    pub fn force_close(&mut self) {
        if self.batch_depth > 0 {
            error!(
                batch_depth = self.batch_depth,
                "force-closing unbalanced undo batches"
            );
            self.batch_depth = 1;
            let _ = self.end_batch();
        }
        if self.suppress_depth > 0 {
            error!(
                suppress_depth = self.suppress_depth,
                "force-closing unbalanced undo suppression"
            );
            self.suppress_depth = 0;
        }
    }

    /// Check that no batch or suppression is open
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.batch_depth == 0 && self.suppress_depth == 0
    }

    #[must_use]
    pub fn batch_depth(&self) -> usize {
        self.batch_depth
    }

    #[must_use]
    pub fn suppress_depth(&self) -> usize {
        self.suppress_depth
    }

    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.suppress_depth > 0
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.stack.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.stack.can_redo()
    }

    #[must_use]
    pub fn next_undo_description(&self) -> Option<&str> {
        self.stack.next_undo_description()
    }

    #[must_use]
    pub fn next_redo_description(&self) -> Option<&str> {
        self.stack.next_redo_description()
    }

    /// Get history statistics
    #[must_use]
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            undo_count: self.stack.undo_count(),
            redo_count: self.stack.redo_count(),
            memory_usage: self.stack.memory_usage(),
            batch_depth: self.batch_depth,
            suppress_depth: self.suppress_depth,
        }
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    #[must_use]
    pub fn stack(&self) -> &UndoStack {
        &self.stack
    }

    pub fn pop_undo_entry(&mut self) -> Option<HistoryEntry> {
        self.stack.pop_undo()
    }

    pub fn pop_redo_entry(&mut self) -> Option<HistoryEntry> {
        self.stack.pop_redo()
    }

    pub fn push_redo_entry(&mut self, entry: HistoryEntry) {
        self.current_caret = entry.caret_before;
        self.stack.push_redo(entry);
    }

    /// Return a redone entry to the undo stack
    pub fn push_undo_entry(&mut self, entry: HistoryEntry) {
        self.current_caret = entry.caret_after;
        self.stack.push_undo_keep_redo(entry);
    }
}

/// Statistics about the history system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStats {
    pub undo_count: usize,
    pub redo_count: usize,
    /// Current memory usage in bytes
    pub memory_usage: usize,
    pub batch_depth: usize,
    pub suppress_depth: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_change(size: f32) -> Operation {
        let mut after = TextAttr::new();
        after.set_font_size(size);
        Operation::ReplaceBasicStyle {
            before: TextAttr::new(),
            after,
        }
    }

    #[test]
    fn undo_stack_basic_operations() {
        let mut stack = UndoStack::new();
        assert!(!stack.can_undo());

        let entry = HistoryEntry::new(basic_change(10.0), "Test".to_string(), None, None, None);
        stack.push(entry);
        assert!(stack.can_undo());
        assert!(!stack.can_redo());

        let popped = stack.pop_undo().unwrap();
        assert_eq!(popped.description, "Test");
        assert_eq!(stack.memory_usage(), 0);
    }

    #[test]
    fn undo_stack_entry_limit() {
        let mut stack = UndoStack::with_config(UndoStackConfig {
            max_entries: 2,
            max_memory: 0,
        });
        for i in 0..5 {
            stack.push(HistoryEntry::new(
                basic_change(i as f32),
                format!("Change {i}"),
                None,
                None,
                None,
            ));
        }
        assert_eq!(stack.undo_count(), 2);
        assert_eq!(stack.next_undo_description(), Some("Change 4"));
    }

    #[test]
    fn memory_limit_keeps_newest() {
        let mut stack = UndoStack::with_config(UndoStackConfig {
            max_entries: 100,
            max_memory: 1,
        });
        stack.push(HistoryEntry::new(basic_change(1.0), "a".into(), None, None, None));
        stack.push(HistoryEntry::new(basic_change(2.0), "b".into(), None, None, None));
        assert_eq!(stack.undo_count(), 1);
        assert_eq!(stack.next_undo_description(), Some("b"));
    }

    #[test]
    fn nested_batches_push_one_step() {
        let mut manager = UndoManager::new();
        manager.begin_batch("Outer");
        manager.begin_batch("Inner");
        assert!(manager.record(basic_change(1.0), "one", None, Some(1)));
        assert_eq!(manager.end_batch(), Ok(false));
        assert!(manager.record(basic_change(2.0), "two", None, Some(2)));
        assert!(!manager.can_undo());
        assert_eq!(manager.end_batch(), Ok(true));

        assert!(manager.is_idle());
        assert_eq!(manager.stats().undo_count, 1);
        assert_eq!(manager.next_undo_description(), Some("Outer"));
        let entry = manager.pop_undo_entry().unwrap();
        assert!(matches!(&entry.operation, Operation::Composite(ops) if ops.len() == 2));
        assert_eq!(entry.caret_after, Some(2));
    }

    #[test]
    fn empty_batch_still_pushes() {
        let mut manager = UndoManager::new();
        manager.begin_batch("Nothing");
        assert_eq!(manager.end_batch(), Ok(true));
        assert_eq!(manager.stats().undo_count, 1);
    }

    #[test]
    fn aborted_batches_push_nothing() {
        let mut manager = UndoManager::new();
        manager.set_caret(Some(3));
        manager.begin_batch("Outer");
        manager.record(basic_change(1.0), "kept", None, Some(4));

        manager.begin_batch("Inner");
        let mark = manager.batch_mark();
        manager.record(basic_change(2.0), "dropped", None, Some(9));
        manager.abort_batch(mark).unwrap();
        assert_eq!(manager.batch_depth(), 1);

        assert_eq!(manager.end_batch(), Ok(true));
        let entry = manager.pop_undo_entry().unwrap();
        assert!(matches!(&entry.operation, Operation::Composite(ops) if ops.len() == 1));
        assert_eq!(entry.caret_after, Some(4));

        manager.begin_batch("Whole");
        let mark = manager.batch_mark();
        manager.record(basic_change(3.0), "dropped", None, Some(7));
        manager.abort_batch(mark).unwrap();
        assert!(manager.is_idle());
        assert!(!manager.can_undo());
        assert!(manager.abort_batch(mark).is_err());
    }

    #[test]
    fn suppression_drops_records() {
        let mut manager = UndoManager::new();
        manager.begin_suppress();
        manager.begin_suppress();
        assert!(!manager.record(basic_change(1.0), "hidden", None, None));
        manager.end_suppress().unwrap();
        assert!(!manager.is_idle());
        manager.end_suppress().unwrap();
        assert!(manager.is_idle());
        assert!(!manager.can_undo());
    }

    #[test]
    fn unbalanced_begin_is_detectable() {
        let mut manager = UndoManager::new();
        manager.begin_batch("a");
        manager.begin_batch("b");
        manager.end_batch().unwrap();
        assert!(!manager.is_idle());
        manager.force_close();
        assert!(manager.is_idle());
        assert_eq!(manager.stats().undo_count, 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "end_batch without a matching begin_batch")]
    fn unbalanced_end_panics_in_debug() {
        let mut manager = UndoManager::new();
        let _ = manager.end_batch();
    }

    #[test]
    fn operation_emptiness() {
        let same = Operation::ReplaceBasicStyle {
            before: TextAttr::new(),
            after: TextAttr::new(),
        };
        assert!(same.is_empty());
        assert!(!basic_change(3.0).is_empty());
        assert!(Operation::Composite(vec![same]).is_empty());
    }
}
