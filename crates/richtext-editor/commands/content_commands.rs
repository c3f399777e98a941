//! Content insertion and deletion commands
//!
//! Insertion splits the paragraph at the insertion point, so a `\n` in the
//! inserted text becomes a paragraph break. Deletion merges the head of the
//! first touched paragraph with the tail of the last one. The final
//! paragraph mark of a container is never deleted.

use super::{CommandResult, EditorCommand};
use crate::core::{
    BoxObject, Buffer, Container, ContainerPath, Edit, EditorError, FieldObject, ImageObject,
    InlineObject, Paragraph, Result, TableObject,
};
use richtext_core::{TextAttr, TextRange};

/// What an insertion adds
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Text; `\n`, `\r\n` and `\r` start new paragraphs
    Text(String),
    Image(ImageObject),
    Field {
        field_type: String,
        display_text: String,
    },
    /// Table of `rows` x `cols` cells, each holding one empty paragraph
    Table { rows: usize, cols: usize },
    /// Text box holding one paragraph of text
    TextBox(String),
}

impl Content {
    /// Positions the content occupies once inserted
    fn len(&self, normalized_text: &str) -> usize {
        match self {
            Self::Text(_) => normalized_text.chars().count(),
            _ => 1,
        }
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Character attributes given to inserted content
///
/// An open style context wins, then a non-default default style, then the
/// attributes of the content before the insertion point (or after it, at a
/// paragraph start).
fn insertion_attributes(
    default_style: &TextAttr,
    context: Option<&TextAttr>,
    paragraph: &Paragraph,
    offset: usize,
) -> TextAttr {
    if let Some(context) = context.filter(|c| !c.is_default()) {
        return context.character_part();
    }
    if !default_style.is_default() {
        return default_style.character_part();
    }
    let neighbour = if offset > 0 {
        paragraph.child_at(offset - 1)
    } else {
        paragraph.child_at(0)
    };
    neighbour.map_or_else(TextAttr::new, |child| child.attributes().character_part())
}

/// Insert text or an object at a position
#[derive(Debug, Clone, PartialEq)]
pub struct InsertContentCommand {
    pub container: ContainerPath,
    /// Clamped to the container's final mark
    pub position: usize,
    pub content: Content,
    /// Combined style context; overrides inherited attributes when non-empty
    pub style: Option<TextAttr>,
    /// Optional description override
    pub description: Option<String>,
}

impl InsertContentCommand {
    pub fn new(position: usize, content: Content) -> Self {
        Self {
            container: ContainerPath::root(),
            position,
            content,
            style: None,
            description: None,
        }
    }

    /// Insert text
    pub fn text(position: usize, text: String) -> Self {
        Self::new(position, Content::Text(text))
    }

    /// Insert a single object
    pub fn object(position: usize, content: Content) -> Self {
        Self::new(position, content)
    }

    /// Edit a nested container instead of the root
    #[must_use]
    pub fn in_container(mut self, container: ContainerPath) -> Self {
        self.container = container;
        self
    }

    /// Apply a style context to the inserted content
    #[must_use]
    pub fn with_style(mut self, style: TextAttr) -> Self {
        self.style = Some(style);
        self
    }

    /// Set a custom description for this command
    #[must_use]
    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    fn build_object(&self, buffer: &mut Buffer) -> Result<Option<InlineObject>> {
        let object = match &self.content {
            Content::Text(_) => return Ok(None),
            Content::Image(image) => InlineObject::Image(image.clone()),
            Content::Field {
                field_type,
                display_text,
            } => InlineObject::Field(FieldObject::new(field_type.as_str(), display_text.as_str())),
            Content::Table { rows, cols } => {
                if *rows == 0 || *cols == 0 {
                    return Err(EditorError::command_failed("a table needs at least one cell"));
                }
                InlineObject::Table(TableObject::new(*rows, *cols, || {
                    buffer.allocate_container_id()
                }))
            }
            Content::TextBox(text) => {
                let mut container = Container::new(buffer.allocate_container_id());
                let para = Paragraph::with_text(
                    normalize_newlines(text).replace('\n', " "),
                    TextAttr::new(),
                    TextAttr::new(),
                );
                container.splice_paragraphs(0, 0, vec![para])?;
                InlineObject::Box(BoxObject::new(container))
            }
        };
        Ok(Some(object))
    }
}

impl EditorCommand for InsertContentCommand {
    fn execute(&self, buffer: &mut Buffer) -> Result<CommandResult> {
        let text = match &self.content {
            Content::Text(text) => normalize_newlines(text),
            _ => String::new(),
        };
        let added = self.content.len(&text);

        let container = buffer.container(&self.container)?;
        let position = self.position.min(container.last_position());
        if !buffer.policy().can_insert_content(container.id, position) {
            return Err(EditorError::vetoed(format!(
                "insert at {position} in {}",
                self.container
            )));
        }
        if self.container.is_root() {
            if let Some(max) = buffer.max_length() {
                if container.len().max(1) + added > max {
                    return Ok(CommandResult::failure(format!(
                        "maximum length {max} exceeded"
                    )));
                }
            }
        }

        let (index, remove, mut para, offset) = if container.is_empty() {
            (0, 0, Paragraph::new(TextAttr::new()), 0)
        } else {
            let index = container.paragraph_index_at(position).ok_or(
                EditorError::PositionOutOfBounds {
                    position,
                    length: container.len(),
                },
            )?;
            let para = container.paragraphs()[index].clone();
            let offset = position - para.base.range.start;
            (index, 1, para, offset)
        };

        let attributes = insertion_attributes(
            buffer.default_style(),
            self.style.as_ref(),
            &para,
            offset,
        );
        let object = self.build_object(buffer)?;

        let mut produced = match object {
            Some(mut object) => {
                *object.attributes_mut() = attributes;
                para.insert_objects(offset, vec![object]);
                vec![para]
            }
            None => {
                let at_end = offset >= para.text_len();
                let tail = para.split_off(offset);
                let mut segments = text.split('\n');
                if let Some(first) = segments.next() {
                    para.children
                        .push(InlineObject::text(first, attributes.clone()));
                }

                let mut next_attributes = para.attributes().clone();
                if at_end {
                    let next_style = next_attributes
                        .paragraph
                        .paragraph_style_name
                        .as_deref()
                        .and_then(|name| buffer.style_sheets().paragraph_style(name))
                        .and_then(|def| def.next_style.clone());
                    if let Some(next) = next_style {
                        next_attributes.set_paragraph_style_name(next);
                    }
                }

                let mut produced = vec![para];
                for segment in segments {
                    produced.push(Paragraph::with_text(
                        segment,
                        attributes.clone(),
                        next_attributes.clone(),
                    ));
                }
                if let Some(last) = produced.last_mut() {
                    last.children.extend(tail);
                }
                produced
            }
        };

        let context_paragraph = self
            .style
            .as_ref()
            .filter(|s| s.has_paragraph_attributes())
            .map(TextAttr::paragraph_part);
        for para in &mut produced {
            if let Some(extra) = &context_paragraph {
                para.attributes_mut().apply(extra);
            }
            para.merge_runs();
        }

        let range = TextRange::new(position, position + added);
        let caret = position + added;
        let edit = Edit {
            container: self.container.clone(),
            index,
            remove,
            insert: produced,
        };
        if buffer.apply_edit(edit, self.description(), true, Some(range), Some(caret))? {
            Ok(CommandResult::success_with_change(range, caret))
        } else {
            Ok(CommandResult::success())
        }
    }

    fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(match self.content {
            Content::Text(_) => "Insert text",
            Content::Image(_) => "Insert image",
            Content::Field { .. } => "Insert field",
            Content::Table { .. } => "Insert table",
            Content::TextBox(_) => "Insert text box",
        })
    }

    fn memory_usage(&self) -> usize {
        let content = match &self.content {
            Content::Text(text) | Content::TextBox(text) => text.len(),
            Content::Field {
                field_type,
                display_text,
            } => field_type.len() + display_text.len(),
            Content::Image(image) => image.source.len(),
            Content::Table { .. } => 0,
        };
        core::mem::size_of::<Self>()
            + content
            + self.description.as_ref().map_or(0, String::len)
    }
}

/// Append a paragraph to the end of a container
#[derive(Debug, Clone, PartialEq)]
pub struct AddParagraphCommand {
    pub container: ContainerPath,
    pub text: String,
    pub style: Option<TextAttr>,
}

impl AddParagraphCommand {
    pub fn new(text: String) -> Self {
        Self {
            container: ContainerPath::root(),
            text,
            style: None,
        }
    }

    #[must_use]
    pub fn in_container(mut self, container: ContainerPath) -> Self {
        self.container = container;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: TextAttr) -> Self {
        self.style = Some(style);
        self
    }
}

impl EditorCommand for AddParagraphCommand {
    fn execute(&self, buffer: &mut Buffer) -> Result<CommandResult> {
        let container = buffer.container(&self.container)?;
        let (position, text) = if container.is_empty() {
            (0, self.text.clone())
        } else {
            (container.last_position(), format!("\n{}", self.text))
        };
        let mut insert = InsertContentCommand::text(position, text)
            .in_container(self.container.clone())
            .with_description("Add paragraph".to_string());
        insert.style = self.style.clone();
        insert.execute(buffer)
    }

    fn description(&self) -> &str {
        "Add paragraph"
    }
}

/// Delete a range of a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRangeCommand {
    pub container: ContainerPath,
    /// Normalized and clipped before use; the final mark is never deleted
    pub range: TextRange,
    /// Treat an empty range as a successful no-op
    pub allow_empty: bool,
    /// Optional description override
    pub description: Option<String>,
}

impl DeleteRangeCommand {
    pub fn new(range: TextRange) -> Self {
        Self {
            container: ContainerPath::root(),
            range,
            allow_empty: false,
            description: None,
        }
    }

    #[must_use]
    pub fn in_container(mut self, container: ContainerPath) -> Self {
        self.container = container;
        self
    }

    #[must_use]
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// Set a custom description for this command
    #[must_use]
    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }
}

impl EditorCommand for DeleteRangeCommand {
    fn execute(&self, buffer: &mut Buffer) -> Result<CommandResult> {
        let container = buffer.container(&self.container)?;
        let range = self.range.clip(container.last_position());
        if range.is_empty() {
            return Ok(if self.allow_empty {
                CommandResult::success()
            } else {
                CommandResult::failure("nothing to delete".to_string())
            });
        }
        if !buffer.policy().can_delete_range(container.id, range) {
            return Err(EditorError::vetoed(format!("delete {range}")));
        }

        let out_of_bounds = |position| EditorError::PositionOutOfBounds {
            position,
            length: container.len(),
        };
        let first = container
            .paragraph_index_at(range.start)
            .ok_or_else(|| out_of_bounds(range.start))?;
        let last = container
            .paragraph_index_at(range.end)
            .ok_or_else(|| out_of_bounds(range.end))?;

        let head = &container.paragraphs()[first];
        let head_offset = range.start - head.base.range.start;
        let merged = if first == last {
            let mut para = head.clone();
            para.remove_span(head_offset, range.end - head.base.range.start);
            para
        } else {
            let tail = &container.paragraphs()[last];
            let tail_offset = range.end - tail.base.range.start;
            let mut tail = tail.clone();
            let kept_tail = tail.split_off(tail_offset);
            // a head paragraph deleted from its start takes the tail's attributes
            let mut para = if head_offset == 0 {
                Paragraph::new(tail.attributes().clone())
            } else {
                let mut head = head.clone();
                head.split_off(head_offset);
                head
            };
            para.children.extend(kept_tail);
            para
        };
        let mut merged = merged;
        merged.merge_runs();

        let edit = Edit {
            container: self.container.clone(),
            index: first,
            remove: last - first + 1,
            insert: vec![merged],
        };
        let collapsed = TextRange::empty(range.start);
        if buffer.apply_edit(
            edit,
            self.description(),
            true,
            Some(range),
            Some(range.start),
        )? {
            Ok(CommandResult::success_with_change(collapsed, range.start))
        } else {
            Ok(CommandResult::success())
        }
    }

    fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("Delete")
    }
}

/// Remove everything, leaving one empty paragraph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearCommand {
    pub container: ContainerPath,
}

impl ClearCommand {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn in_container(mut self, container: ContainerPath) -> Self {
        self.container = container;
        self
    }
}

impl EditorCommand for ClearCommand {
    fn execute(&self, buffer: &mut Buffer) -> Result<CommandResult> {
        let container = buffer.container(&self.container)?;
        let all = TextRange::new(0, container.len());
        if !all.is_empty() && !buffer.policy().can_delete_range(container.id, all) {
            return Err(EditorError::vetoed("clear"));
        }
        let edit = Edit {
            container: self.container.clone(),
            index: 0,
            remove: container.paragraph_count(),
            insert: vec![Paragraph::new(TextAttr::new())],
        };
        if buffer.apply_edit(edit, "Clear", true, Some(all), Some(0))? {
            Ok(CommandResult::success_with_change(TextRange::empty(0), 0))
        } else {
            Ok(CommandResult::success())
        }
    }

    fn description(&self) -> &str {
        "Clear"
    }
}
