//! List and numbering commands
//!
//! A paragraph belongs to a list when its attributes name a list style. The
//! list level is not stored; it is read back from the paragraph's left
//! indent against the list style's per-level indent table, so promoting a
//! paragraph is just rewriting its indents.

use super::{CommandResult, EditorCommand};
use crate::core::{Buffer, Container, ContainerPath, Edit, EditorError, Paragraph, Result};
use crate::style::{SetStyleFlags, StyleLayers};
use richtext_core::{
    ListLevel, ListStyleDefinition, NumberingKind, StyleSheetStack, TextAttr, TextRange,
    MAX_LIST_LEVELS,
};
use tracing::debug;

/// Look up a list style, falling back to an arabic list of the same name
fn resolve_list(sheets: &StyleSheetStack, name: &str) -> ListStyleDefinition {
    sheets.resolve_list_style(name).unwrap_or_else(|err| {
        debug!(%err, "list style missing, using arabic numbering");
        ListStyleDefinition::new(name, NumberingKind::Arabic)
    })
}

/// Left indent a paragraph ends up with after every style layer
fn effective_left_indent(layers: &StyleLayers<'_>, attributes: &TextAttr) -> i32 {
    layers
        .paragraph_style(attributes)
        .paragraph
        .left_indent
        .unwrap_or(0)
}

/// List style name and level of a paragraph, if it is in a list
fn list_identity(layers: &StyleLayers<'_>, para: &Paragraph) -> Option<(String, ListLevel)> {
    let name = para.attributes().paragraph.list_style_name.clone()?;
    let list = resolve_list(layers.sheets, &name);
    let level = list.find_level_for_indent(effective_left_indent(layers, para.attributes()));
    Some((name, level))
}

/// Per-level counters for sequential numbering
#[derive(Debug, Clone)]
struct ListCounter {
    start_from: u32,
    counters: [Option<u32>; MAX_LIST_LEVELS],
    last_level: Option<ListLevel>,
}

impl ListCounter {
    fn new(start_from: u32) -> Self {
        Self {
            start_from,
            counters: [None; MAX_LIST_LEVELS],
            last_level: None,
        }
    }

    /// Next number at `level`
    ///
    /// Entering a deeper level restarts at 1; returning to a level continues
    /// its count.
    fn next(&mut self, level: ListLevel) -> u32 {
        let number = match self.last_level {
            None => self.start_from,
            Some(previous) if level > previous => 1,
            Some(_) => self.counters[level.index()].map_or(self.start_from, |n| n + 1),
        };
        self.record(level, number);
        number
    }

    /// Note an existing number so the count continues from it
    fn record(&mut self, level: ListLevel, number: u32) {
        let index = level.index();
        self.counters[index] = Some(number);
        for deeper in &mut self.counters[index + 1..] {
            *deeper = None;
        }
        self.last_level = Some(level);
    }
}

/// Rewrite every paragraph `range` touches as one undoable edit
fn rewrite_paragraphs(
    buffer: &mut Buffer,
    path: &ContainerPath,
    range: TextRange,
    flags: SetStyleFlags,
    description: &str,
    mut rewrite: impl FnMut(&StyleLayers<'_>, &mut Paragraph),
) -> Result<CommandResult> {
    let container = buffer.container(path)?;
    let range = range.clip(container.len());
    let Some((first, last)) = container.paragraph_span(range) else {
        return Ok(CommandResult::failure("empty range".to_string()));
    };
    if !buffer.policy().can_modify_range(container.id, range) {
        return Err(EditorError::vetoed(format!("{description} {range}")));
    }

    let layers = buffer.style_layers();
    let mut paragraphs = container.paragraphs()[first..=last].to_vec();
    for para in &mut paragraphs {
        rewrite(&layers, para);
    }

    let edit = Edit {
        container: path.clone(),
        index: first,
        remove: paragraphs.len(),
        insert: paragraphs,
    };
    let record = flags.contains(SetStyleFlags::WITH_UNDO);
    if buffer.apply_edit(edit, description, record, Some(range), None)? {
        Ok(CommandResult {
            success: true,
            modified_range: Some(range),
            content_changed: true,
            ..CommandResult::default()
        })
    } else {
        Ok(CommandResult::success())
    }
}

/// Assign a list style to every paragraph in a range
///
/// Without [`SetStyleFlags::SPECIFY_LEVEL`] each paragraph's level is
/// inferred from its current left indent. Numbered lists are numbered
/// sequentially from `start_from`; without [`SetStyleFlags::RENUMBER`] a
/// paragraph's existing number is kept and the count continues from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetListStyleCommand {
    pub container: ContainerPath,
    pub range: TextRange,
    pub list_name: String,
    pub flags: SetStyleFlags,
    pub start_from: u32,
    pub level: Option<ListLevel>,
}

impl SetListStyleCommand {
    pub fn new(range: TextRange, list_name: impl Into<String>) -> Self {
        Self {
            container: ContainerPath::root(),
            range,
            list_name: list_name.into(),
            flags: SetStyleFlags::DEFAULT,
            start_from: 1,
            level: None,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SetStyleFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn starting_from(mut self, start_from: u32) -> Self {
        self.start_from = start_from;
        self
    }

    /// Put every paragraph at `level`; sets [`SetStyleFlags::SPECIFY_LEVEL`]
    #[must_use]
    pub fn at_level(mut self, level: ListLevel) -> Self {
        self.level = Some(level);
        self.flags |= SetStyleFlags::SPECIFY_LEVEL;
        self
    }

    #[must_use]
    pub fn in_container(mut self, container: ContainerPath) -> Self {
        self.container = container;
        self
    }
}

impl EditorCommand for SetListStyleCommand {
    fn execute(&self, buffer: &mut Buffer) -> Result<CommandResult> {
        let list = resolve_list(buffer.style_sheets(), &self.list_name);
        let fixed_level = self
            .level
            .filter(|_| self.flags.contains(SetStyleFlags::SPECIFY_LEVEL));
        let renumber = self.flags.contains(SetStyleFlags::RENUMBER);
        let mut counter = ListCounter::new(self.start_from);

        rewrite_paragraphs(
            buffer,
            &self.container,
            self.range,
            self.flags,
            self.description(),
            |layers, para| {
                let level = fixed_level.unwrap_or_else(|| {
                    list.find_level_for_indent(effective_left_indent(layers, para.attributes()))
                });
                let existing = para.attributes().paragraph.bullet_number;
                let attributes = para.attributes_mut();
                attributes.apply(&list.combined_style_for_level(level));

                if list.kind.is_numbered() {
                    let number = match existing {
                        Some(number) if !renumber => {
                            counter.record(level, number);
                            number
                        }
                        _ => counter.next(level),
                    };
                    attributes.set_bullet_number(number);
                } else {
                    attributes.paragraph.bullet_number = None;
                }
            },
        )
    }

    fn description(&self) -> &str {
        "Set list style"
    }
}

/// Move list paragraphs up or down the level table
///
/// Positive `promote_by` moves towards the top level. Numbers are left alone
/// unless [`SetStyleFlags::RENUMBER`] is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoteListCommand {
    pub container: ContainerPath,
    pub promote_by: i32,
    pub range: TextRange,
    pub flags: SetStyleFlags,
}

impl PromoteListCommand {
    pub fn new(promote_by: i32, range: TextRange) -> Self {
        Self {
            container: ContainerPath::root(),
            promote_by,
            range,
            flags: SetStyleFlags::DEFAULT,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SetStyleFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn in_container(mut self, container: ContainerPath) -> Self {
        self.container = container;
        self
    }
}

impl EditorCommand for PromoteListCommand {
    fn execute(&self, buffer: &mut Buffer) -> Result<CommandResult> {
        let renumber = self.flags.contains(SetStyleFlags::RENUMBER);
        let mut counters: Vec<(String, ListCounter)> = Vec::new();

        rewrite_paragraphs(
            buffer,
            &self.container,
            self.range,
            self.flags,
            self.description(),
            |layers, para| {
                let Some(name) = para.attributes().paragraph.list_style_name.clone() else {
                    return;
                };
                let list = resolve_list(layers.sheets, &name);
                let level =
                    list.find_level_for_indent(effective_left_indent(layers, para.attributes()));
                let new_level = level.offset(self.promote_by.saturating_neg());
                let attributes = para.attributes_mut();
                attributes.apply(&list.combined_style_for_level(new_level));

                if renumber && list.kind.is_numbered() {
                    let index = match counters.iter().position(|(n, _)| *n == name) {
                        Some(index) => index,
                        None => {
                            let start = attributes.paragraph.bullet_number.unwrap_or(1);
                            counters.push((name, ListCounter::new(start)));
                            counters.len() - 1
                        }
                    };
                    attributes.set_bullet_number(counters[index].1.next(new_level));
                }
            },
        )
    }

    fn description(&self) -> &str {
        if self.promote_by >= 0 {
            "Promote list"
        } else {
            "Demote list"
        }
    }
}

/// Remove list membership from every paragraph in a range
///
/// Indentation implied by the list goes with it; a named paragraph style's
/// own indents are written back afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearListStyleCommand {
    pub container: ContainerPath,
    pub range: TextRange,
    pub flags: SetStyleFlags,
}

impl ClearListStyleCommand {
    pub fn new(range: TextRange) -> Self {
        Self {
            container: ContainerPath::root(),
            range,
            flags: SetStyleFlags::DEFAULT,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SetStyleFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn in_container(mut self, container: ContainerPath) -> Self {
        self.container = container;
        self
    }
}

impl EditorCommand for ClearListStyleCommand {
    fn execute(&self, buffer: &mut Buffer) -> Result<CommandResult> {
        rewrite_paragraphs(
            buffer,
            &self.container,
            self.range,
            self.flags,
            self.description(),
            |layers, para| {
                let attributes = para.attributes_mut();
                attributes.paragraph.clear_list();
                let Some(name) = attributes.paragraph.paragraph_style_name.clone() else {
                    return;
                };
                if let Ok(named) = layers.sheets.resolve_paragraph_style(&name) {
                    attributes.paragraph.left_indent = named.paragraph.left_indent;
                    attributes.paragraph.left_sub_indent = named.paragraph.left_sub_indent;
                }
            },
        )
    }

    fn description(&self) -> &str {
        "Clear list style"
    }
}

/// Renumber the contiguous list around a position
///
/// Numbering restarts from the first paragraph's existing number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenumberListCommand {
    pub position: usize,
}

impl RenumberListCommand {
    pub fn new(position: usize) -> Self {
        Self { position }
    }
}

impl EditorCommand for RenumberListCommand {
    fn execute(&self, buffer: &mut Buffer) -> Result<CommandResult> {
        let Some(range) = buffer.find_range_for_list(self.position) else {
            return Ok(CommandResult::failure(format!(
                "no list at position {}",
                self.position
            )));
        };
        let Some(first) = buffer.root().paragraph_at(range.start) else {
            return Ok(CommandResult::failure("empty document".to_string()));
        };
        let paragraph = &first.attributes().paragraph;
        let start = paragraph.bullet_number.unwrap_or(1);
        let Some(name) = paragraph.list_style_name.clone() else {
            return Ok(CommandResult::failure("not a list".to_string()));
        };
        SetListStyleCommand::new(range, name)
            .with_flags(SetStyleFlags::WITH_UNDO | SetStyleFlags::RENUMBER)
            .starting_from(start)
            .execute(buffer)
    }

    fn description(&self) -> &str {
        "Renumber list"
    }
}

/// Maximal run of paragraphs around `pos` sharing list style and level
fn list_range_in(layers: &StyleLayers<'_>, container: &Container, pos: usize) -> Option<TextRange> {
    let pos = pos.min(container.last_position());
    let index = container.paragraph_index_at(pos)?;
    let paragraphs = container.paragraphs();
    let identity = list_identity(layers, &paragraphs[index])?;

    let same = |para: &Paragraph| list_identity(layers, para).as_ref() == Some(&identity);
    let first = paragraphs[..index]
        .iter()
        .rposition(|p| !same(p))
        .map_or(0, |i| i + 1);
    let last = paragraphs[index + 1..]
        .iter()
        .position(|p| !same(p))
        .map_or(paragraphs.len() - 1, |i| index + i);

    Some(TextRange::new(
        paragraphs[first].base.range.start,
        paragraphs[last].base.range.end,
    ))
}

impl Buffer {
    /// Range covering the contiguous list around `pos`
    ///
    /// Returns `None` when the paragraph at `pos` is not in a list.
    #[must_use]
    pub fn find_range_for_list(&self, pos: usize) -> Option<TextRange> {
        list_range_in(&self.style_layers(), self.root(), pos)
    }

    /// List level of the paragraph at `pos`
    #[must_use]
    pub fn list_level(&self, pos: usize) -> Option<ListLevel> {
        let pos = pos.min(self.last_position());
        let para = self.root().paragraph_at(pos)?;
        list_identity(&self.style_layers(), para).map(|(_, level)| level)
    }
}
