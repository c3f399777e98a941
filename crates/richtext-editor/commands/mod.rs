//! Command system for document edits
//!
//! Every mutation is an [`EditorCommand`] executed against a [`Buffer`].
//! Commands validate first (range clipping, policy hooks, length limits),
//! then build replacement paragraphs and hand them to
//! [`Buffer::apply_edit`], which records the change for undo. A command that
//! fails leaves the document untouched.
//!
//! [`BufferCommandExt`] wraps the common commands in the boolean facade
//! interactive callers use: errors are logged and reported as `false`.

pub mod content_commands;
pub mod list_commands;
pub mod style_commands;

pub use content_commands::*;
pub use list_commands::*;
pub use style_commands::*;

use crate::core::{Buffer, ImageObject, Result};
use crate::style::SetStyleFlags;
use richtext_core::{ListLevel, TextAttr, TextRange};
use tracing::debug;

/// Result of executing a command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    /// Whether the command was successfully executed
    pub success: bool,

    /// Optional message about the operation
    pub message: Option<String>,

    /// The range that was modified, in the edited container
    pub modified_range: Option<TextRange>,

    /// Caret index after the command
    pub new_caret: Option<usize>,

    /// Whether the document content was changed
    pub content_changed: bool,
}

impl CommandResult {
    /// Create a successful command result
    pub fn success() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// Create a successful result with content change
    pub fn success_with_change(range: TextRange, caret: usize) -> Self {
        Self {
            success: true,
            message: None,
            modified_range: Some(range),
            new_caret: Some(caret),
            content_changed: true,
        }
    }

    /// Create a failed command result
    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            ..Self::default()
        }
    }

    /// Add a message to the result
    #[must_use]
    pub fn with_message(mut self, message: String) -> Self {
        self.message = Some(message);
        self
    }
}

/// Trait for editor commands
///
/// # Examples
///
/// ```
/// use richtext_editor::{Buffer, BufferCommandExt, CommandResult, EditorCommand, Result};
///
/// #[derive(Debug)]
/// struct ShoutCommand;
///
/// impl EditorCommand for ShoutCommand {
///     fn execute(&self, buffer: &mut Buffer) -> Result<CommandResult> {
///         let end = buffer.last_position();
///         buffer.append_text("!");
///         Ok(CommandResult::success().with_message(format!("appended at {end}")))
///     }
///
///     fn description(&self) -> &str {
///         "Shout"
///     }
/// }
///
/// let mut buffer = Buffer::new();
/// buffer.add_paragraph("Hello");
/// assert!(buffer.run(&ShoutCommand));
/// assert_eq!(buffer.text(), "Hello!");
/// ```
pub trait EditorCommand: core::fmt::Debug + Send + Sync {
    /// Execute the command on the given buffer
    fn execute(&self, buffer: &mut Buffer) -> Result<CommandResult>;

    /// Get a human-readable description of the command
    fn description(&self) -> &str;

    /// Check if this command modifies document content
    fn modifies_content(&self) -> bool {
        true
    }

    /// Get the estimated memory usage of this command
    fn memory_usage(&self) -> usize {
        64
    }
}

/// Commands executed in order as one undo step
#[derive(Debug)]
pub struct BatchCommand {
    /// Commands to execute in order
    pub commands: Vec<Box<dyn EditorCommand>>,
    /// Description of the batch operation
    pub description: String,
}

impl BatchCommand {
    /// Create a new batch command
    pub fn new(description: String) -> Self {
        Self {
            commands: Vec::new(),
            description,
        }
    }

    /// Add a command to the batch
    #[must_use]
    pub fn add_command(mut self, command: Box<dyn EditorCommand>) -> Self {
        self.commands.push(command);
        self
    }

    /// Add multiple commands to the batch
    #[must_use]
    pub fn add_commands(mut self, commands: Vec<Box<dyn EditorCommand>>) -> Self {
        self.commands.extend(commands);
        self
    }

    fn execute_all(&self, buffer: &mut Buffer) -> Result<CommandResult> {
        let mut overall_result = CommandResult::success();
        for command in &self.commands {
            let result = command.execute(buffer)?;

            if !result.success {
                return Ok(CommandResult::failure(format!(
                    "Batch command failed at: {}",
                    command.description()
                )));
            }

            if let Some(range) = result.modified_range {
                overall_result.modified_range = Some(match overall_result.modified_range {
                    Some(existing) => existing.union(&range),
                    None => range,
                });
            }
            if result.new_caret.is_some() {
                overall_result.new_caret = result.new_caret;
            }
            overall_result.content_changed |= result.content_changed;
        }
        Ok(overall_result)
    }
}

impl EditorCommand for BatchCommand {
    fn execute(&self, buffer: &mut Buffer) -> Result<CommandResult> {
        let checkpoint = buffer.begin_checkpoint(&self.description);
        let result = self.execute_all(buffer);
        match &result {
            Ok(outcome) if outcome.success => {
                buffer.end_batch_undo();
            }
            _ => buffer.rollback_batch(checkpoint),
        }
        result
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn memory_usage(&self) -> usize {
        core::mem::size_of::<Self>()
            + self.description.len()
            + self
                .commands
                .iter()
                .map(|c| c.memory_usage())
                .sum::<usize>()
    }
}

impl Buffer {
    /// Execute a command, returning its typed result
    ///
    /// # Errors
    ///
    /// Propagates the command's error; the document is unchanged.
    pub fn execute(&mut self, command: &dyn EditorCommand) -> Result<CommandResult> {
        command.execute(self)
    }

    /// Execute a command, logging any error and reporting success as a bool
    pub fn run(&mut self, command: &dyn EditorCommand) -> bool {
        match command.execute(self) {
            Ok(result) => {
                if !result.success {
                    debug!(
                        command = command.description(),
                        message = result.message.as_deref().unwrap_or(""),
                        "command did not apply"
                    );
                }
                result.success
            }
            Err(err) => {
                debug!(command = command.description(), %err, "command failed");
                false
            }
        }
    }
}

/// Boolean-facade shortcuts for the common commands
pub trait BufferCommandExt {
    /// Combined-style write with [`SetStyleFlags::DEFAULT`]
    fn set_style(&mut self, range: TextRange, style: &TextAttr) -> bool;

    /// Style write with explicit flags
    fn set_style_ex(&mut self, range: TextRange, style: &TextAttr, flags: SetStyleFlags) -> bool;

    /// Delete a range of the root container
    fn delete(&mut self, range: TextRange) -> bool;

    /// Append a paragraph holding `text` to the root container
    fn add_paragraph(&mut self, text: &str) -> bool;

    /// Insert text at a position; `\n` starts a new paragraph
    fn write_text(&mut self, position: usize, text: &str) -> bool;

    /// Insert text before the final paragraph mark
    fn append_text(&mut self, text: &str) -> bool;

    /// Insert a paragraph break
    fn new_line(&mut self, position: usize) -> bool;

    /// Insert an image object
    fn write_image(&mut self, position: usize, image: ImageObject) -> bool;

    /// Insert a field object
    fn write_field(&mut self, position: usize, field_type: &str, display_text: &str) -> bool;

    /// Insert a `rows` x `cols` table
    fn write_table(&mut self, position: usize, rows: usize, cols: usize) -> bool;

    /// Insert a text box holding `text`
    fn write_text_box(&mut self, position: usize, text: &str) -> bool;

    /// Replace a range with text as one undo step
    fn replace(&mut self, range: TextRange, text: &str) -> bool;

    /// Remove all content, leaving one empty paragraph
    fn clear(&mut self) -> bool;

    /// Assign a list style to every paragraph in `range`
    fn set_list_style(
        &mut self,
        range: TextRange,
        list_name: &str,
        flags: SetStyleFlags,
        start_from: u32,
        level: Option<ListLevel>,
    ) -> bool;

    /// Assign a list style and renumber it
    fn number_list(&mut self, range: TextRange, list_name: &str, start_from: u32) -> bool;

    /// Change list levels; positive `promote_by` moves towards the top level
    fn promote_list(&mut self, promote_by: i32, range: TextRange, flags: SetStyleFlags) -> bool;

    /// Remove list membership from every paragraph in `range`
    fn clear_list_style(&mut self, range: TextRange, flags: SetStyleFlags) -> bool;

    /// Renumber the contiguous list around `position`
    fn renumber_list(&mut self, position: usize) -> bool;
}

impl BufferCommandExt for Buffer {
    fn set_style(&mut self, range: TextRange, style: &TextAttr) -> bool {
        self.set_style_ex(range, style, SetStyleFlags::DEFAULT)
    }

    fn set_style_ex(&mut self, range: TextRange, style: &TextAttr, flags: SetStyleFlags) -> bool {
        self.run(&SetStyleCommand::new(range, style.clone()).with_flags(flags))
    }

    fn delete(&mut self, range: TextRange) -> bool {
        self.run(&DeleteRangeCommand::new(range))
    }

    fn add_paragraph(&mut self, text: &str) -> bool {
        self.run(&AddParagraphCommand::new(text.to_string()))
    }

    fn write_text(&mut self, position: usize, text: &str) -> bool {
        self.run(&InsertContentCommand::text(position, text.to_string()))
    }

    fn append_text(&mut self, text: &str) -> bool {
        let position = self.last_position();
        self.write_text(position, text)
    }

    fn new_line(&mut self, position: usize) -> bool {
        self.run(&InsertContentCommand::text(position, "\n".to_string()))
    }

    fn write_image(&mut self, position: usize, image: ImageObject) -> bool {
        self.run(&InsertContentCommand::object(position, Content::Image(image)))
    }

    fn write_field(&mut self, position: usize, field_type: &str, display_text: &str) -> bool {
        let content = Content::Field {
            field_type: field_type.to_string(),
            display_text: display_text.to_string(),
        };
        self.run(&InsertContentCommand::object(position, content))
    }

    fn write_table(&mut self, position: usize, rows: usize, cols: usize) -> bool {
        self.run(&InsertContentCommand::object(position, Content::Table { rows, cols }))
    }

    fn write_text_box(&mut self, position: usize, text: &str) -> bool {
        self.run(&InsertContentCommand::object(
            position,
            Content::TextBox(text.to_string()),
        ))
    }

    fn replace(&mut self, range: TextRange, text: &str) -> bool {
        let batch = BatchCommand::new("Replace".to_string())
            .add_command(Box::new(DeleteRangeCommand::new(range).allow_empty()))
            .add_command(Box::new(InsertContentCommand::text(
                range.normalize().start,
                text.to_string(),
            )));
        self.run(&batch)
    }

    fn clear(&mut self) -> bool {
        self.run(&ClearCommand::new())
    }

    fn set_list_style(
        &mut self,
        range: TextRange,
        list_name: &str,
        flags: SetStyleFlags,
        start_from: u32,
        level: Option<ListLevel>,
    ) -> bool {
        let mut command = SetListStyleCommand::new(range, list_name)
            .with_flags(flags)
            .starting_from(start_from);
        if let Some(level) = level {
            command = command.at_level(level);
        }
        self.run(&command)
    }

    fn number_list(&mut self, range: TextRange, list_name: &str, start_from: u32) -> bool {
        self.set_list_style(
            range,
            list_name,
            SetStyleFlags::WITH_UNDO | SetStyleFlags::RENUMBER,
            start_from,
            None,
        )
    }

    fn promote_list(&mut self, promote_by: i32, range: TextRange, flags: SetStyleFlags) -> bool {
        self.run(&PromoteListCommand::new(promote_by, range).with_flags(flags))
    }

    fn clear_list_style(&mut self, range: TextRange, flags: SetStyleFlags) -> bool {
        self.run(&ClearListStyleCommand::new(range).with_flags(flags))
    }

    fn renumber_list(&mut self, position: usize) -> bool {
        self.run(&RenumberListCommand::new(position))
    }
}
