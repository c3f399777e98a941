//! Style application commands
//!
//! [`SetStyleCommand`] writes the paragraph half of a style to every
//! paragraph the range touches and the character half to the objects inside
//! the range, splitting text runs at the range boundaries first. Paragraphs
//! the range covers completely also take the character half on their own
//! attributes, so their paragraph marks and later typing pick it up.

use super::{CommandResult, EditorCommand, SetListStyleCommand};
use crate::core::{Buffer, ContainerPath, Edit, EditorError, Paragraph, Result};
use crate::style::{SetStyleFlags, StyleLayers};
use richtext_core::{CharacterAttrs, CoreError, ParagraphAttrs, TextAttr, TextRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Half {
    Paragraph,
    Character,
}

/// Write one half of a style into `target` according to `flags`
fn write_half(
    target: &mut TextAttr,
    part: &TextAttr,
    flags: SetStyleFlags,
    combined: &TextAttr,
    half: Half,
) {
    if flags.contains(SetStyleFlags::REMOVE) {
        target.remove(part);
        return;
    }
    if flags.contains(SetStyleFlags::RESET) {
        match half {
            Half::Paragraph => target.paragraph = ParagraphAttrs::default(),
            Half::Character => target.character = CharacterAttrs::default(),
        }
        target.apply(part);
        return;
    }
    if flags.contains(SetStyleFlags::OPTIMIZE) {
        target.apply(&part.differences_from(combined));
    } else {
        target.apply(part);
    }
}

/// Apply a style to a range
#[derive(Debug, Clone, PartialEq)]
pub struct SetStyleCommand {
    pub container: ContainerPath,
    pub range: TextRange,
    pub style: TextAttr,
    pub flags: SetStyleFlags,
    /// Optional description override
    pub description: Option<String>,
}

impl SetStyleCommand {
    pub fn new(range: TextRange, style: TextAttr) -> Self {
        Self {
            container: ContainerPath::root(),
            range,
            style,
            flags: SetStyleFlags::DEFAULT,
            description: None,
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

    /// Set a custom description for this command
    #[must_use]
    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    fn style_paragraph(&self, layers: &StyleLayers<'_>, para: &mut Paragraph, range: TextRange) {
        let flags = self.flags;
        let reset = flags.contains(SetStyleFlags::RESET);
        let original_style = layers.paragraph_style(para.attributes());

        if flags.writes_paragraphs() && (reset || self.style.has_paragraph_attributes()) {
            write_half(
                para.attributes_mut(),
                &self.style.paragraph_part(),
                flags,
                &original_style,
                Half::Paragraph,
            );
        }

        if flags.writes_characters() && (reset || self.style.has_character_attributes()) {
            let part = self.style.character_part();
            let start = para.base.range.start;
            let text_len = para.text_len();
            let mark = para.base.range.end - 1;
            let lo = range.start.max(start) - start;
            let hi = range.end.min(mark).max(start) - start;

            let first = para.split_at(lo);
            let end = para.split_at(hi);
            for child in &mut para.children[first..end] {
                let combined = layers.object_style(&original_style, child.attributes());
                write_half(child.attributes_mut(), &part, flags, &combined, Half::Character);
            }

            let whole = lo == 0 && hi == text_len && (text_len > 0 || range.contains(mark));
            if whole {
                write_half(
                    para.attributes_mut(),
                    &part,
                    flags,
                    &original_style,
                    Half::Character,
                );
            }
        }
        para.merge_runs();
    }
}

impl EditorCommand for SetStyleCommand {
    fn execute(&self, buffer: &mut Buffer) -> Result<CommandResult> {
        let container = buffer.container(&self.container)?;
        let range = self.range.clip(container.len());
        if range.is_empty() {
            return Ok(CommandResult::failure("empty range".to_string()));
        }
        if !buffer.policy().can_modify_range(container.id, range) {
            return Err(EditorError::vetoed(format!("style {range}")));
        }
        if !self.flags.writes_paragraphs() && !self.flags.writes_characters() {
            return Ok(CommandResult::success());
        }
        let Some((first, last)) = container.paragraph_span(range) else {
            return Ok(CommandResult::failure("empty range".to_string()));
        };

        let layers = buffer.style_layers();
        let mut paragraphs = container.paragraphs()[first..=last].to_vec();
        for para in &mut paragraphs {
            self.style_paragraph(&layers, para, range);
        }

        let edit = Edit {
            container: self.container.clone(),
            index: first,
            remove: paragraphs.len(),
            insert: paragraphs,
        };
        let record = self.flags.contains(SetStyleFlags::WITH_UNDO);
        if buffer.apply_edit(edit, self.description(), record, Some(range), None)? {
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

    fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("Set style")
    }

    fn memory_usage(&self) -> usize {
        core::mem::size_of::<Self>() + self.description.as_ref().map_or(0, String::len)
    }
}

/// Apply a named character, paragraph or list style to a range
///
/// Character styles are looked up first, then paragraph styles, then list
/// styles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyNamedStyleCommand {
    pub range: TextRange,
    pub name: String,
    pub flags: SetStyleFlags,
}

impl ApplyNamedStyleCommand {
    pub fn new(range: TextRange, name: impl Into<String>) -> Self {
        Self {
            range,
            name: name.into(),
            flags: SetStyleFlags::DEFAULT,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SetStyleFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl EditorCommand for ApplyNamedStyleCommand {
    fn execute(&self, buffer: &mut Buffer) -> Result<CommandResult> {
        let sheets = buffer.style_sheets();
        let mut style = TextAttr::new();
        if sheets.character_style(&self.name).is_some() {
            style.set_character_style_name(self.name.as_str());
            let command = SetStyleCommand::new(self.range, style)
                .with_flags(self.flags | SetStyleFlags::CHARACTERS_ONLY)
                .with_description("Apply character style".to_string());
            return command.execute(buffer);
        }
        if sheets.paragraph_style(&self.name).is_some() {
            style.set_paragraph_style_name(self.name.as_str());
            let command = SetStyleCommand::new(self.range, style)
                .with_flags(self.flags | SetStyleFlags::PARAGRAPHS_ONLY)
                .with_description("Apply paragraph style".to_string());
            return command.execute(buffer);
        }
        if sheets.list_style(&self.name).is_some() {
            return SetListStyleCommand::new(self.range, self.name.as_str())
                .with_flags(self.flags)
                .execute(buffer);
        }
        Err(CoreError::unknown_style(self.name.as_str()).into())
    }

    fn description(&self) -> &str {
        "Apply named style"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::BufferCommandExt;
    use pretty_assertions::assert_eq;
    use richtext_core::{Alignment, CharacterStyleDefinition, StyleSheet};

    fn bold() -> TextAttr {
        let mut a = TextAttr::new();
        a.set_bold(true);
        a
    }

    fn hello_world() -> Buffer {
        let mut buffer = Buffer::new();
        buffer.add_paragraph("Hello");
        buffer.add_paragraph("World");
        buffer.discard_edits();
        buffer
    }

    #[test]
    fn bold_part_of_a_run() {
        let mut buffer = hello_world();
        assert!(buffer.set_style(TextRange::new(1, 3), &bold()));
        let runs = &buffer.root().paragraphs()[0].children;
        assert_eq!(runs.len(), 3);
        assert!(!buffer.combined_style(0).is_bold());
        assert!(buffer.combined_style(1).is_bold());
        assert!(buffer.combined_style(2).is_bold());
        assert!(!buffer.combined_style(3).is_bold());
        assert_eq!(buffer.history_stats().undo_count, 1);
    }

    #[test]
    fn whole_paragraph_marks_take_character_style() {
        let mut buffer = hello_world();
        buffer.set_style(TextRange::new(0, 5), &bold());
        assert!(buffer.root().paragraphs()[0].attributes().is_bold());
        assert!(buffer.combined_style(5).is_bold());
        assert!(!buffer.root().paragraphs()[1].attributes().is_bold());
    }

    #[test]
    fn paragraph_half_applies_to_touched_paragraphs() {
        let mut buffer = hello_world();
        let mut centred = TextAttr::new();
        centred.set_alignment(Alignment::Centre);
        buffer.set_style(TextRange::new(4, 7), &centred);
        let aligned: Vec<_> = buffer
            .root()
            .paragraphs()
            .iter()
            .map(|p| p.attributes().alignment())
            .collect();
        assert_eq!(aligned, vec![Some(Alignment::Centre), Some(Alignment::Centre)]);
    }

    #[test]
    fn only_flags_restrict_halves() {
        let mut buffer = hello_world();
        let mut both = bold();
        both.set_alignment(Alignment::Right);

        buffer.set_style_ex(
            TextRange::new(0, 2),
            &both,
            SetStyleFlags::WITH_UNDO | SetStyleFlags::CHARACTERS_ONLY,
        );
        assert!(buffer.combined_style(0).is_bold());
        assert_eq!(buffer.combined_style(0).alignment(), None);

        buffer.set_style_ex(
            TextRange::new(6, 8),
            &both,
            SetStyleFlags::WITH_UNDO | SetStyleFlags::PARAGRAPHS_ONLY,
        );
        assert!(!buffer.combined_style(6).is_bold());
        assert_eq!(buffer.combined_style(6).alignment(), Some(Alignment::Right));

        let before = buffer.root().clone();
        assert!(buffer.set_style_ex(
            TextRange::new(0, 11),
            &both,
            SetStyleFlags::CHARACTERS_ONLY | SetStyleFlags::PARAGRAPHS_ONLY,
        ));
        assert_eq!(buffer.root(), &before);
    }

    #[test]
    fn remove_unsets_fields() {
        let mut buffer = hello_world();
        let mut styled = bold();
        styled.set_italic(true);
        buffer.set_style(TextRange::new(0, 5), &styled);

        let mut mask = TextAttr::new();
        mask.set_bold(false);
        buffer.set_style_ex(
            TextRange::new(0, 5),
            &mask,
            SetStyleFlags::WITH_UNDO | SetStyleFlags::REMOVE,
        );
        let style = buffer.combined_style(2);
        assert!(!style.is_bold());
        assert!(style.is_italic());
        assert_eq!(style.character.font_weight, None);
    }

    #[test]
    fn reset_clears_before_applying() {
        let mut buffer = hello_world();
        let mut styled = bold();
        styled.set_italic(true);
        buffer.set_style(TextRange::new(0, 5), &styled);

        let mut underline = TextAttr::new();
        underline.set_underline(true);
        buffer.set_style_ex(
            TextRange::new(0, 5),
            &underline,
            SetStyleFlags::WITH_UNDO | SetStyleFlags::RESET | SetStyleFlags::CHARACTERS_ONLY,
        );
        let style = buffer.combined_style(2);
        assert!(style.is_underlined());
        assert!(!style.is_italic());
        assert!(!style.is_bold());
    }

    #[test]
    fn optimize_skips_redundant_writes() {
        let mut buffer = hello_world();
        let flags = SetStyleFlags::WITH_UNDO | SetStyleFlags::OPTIMIZE;
        assert!(buffer.set_style_ex(TextRange::new(0, 5), &bold(), flags));
        assert_eq!(buffer.history_stats().undo_count, 1);
        let after_first = buffer.root().clone();

        assert!(buffer.set_style_ex(TextRange::new(0, 5), &bold(), flags));
        assert_eq!(buffer.history_stats().undo_count, 1);
        assert_eq!(buffer.root(), &after_first);
    }

    #[test]
    fn without_undo_flag_nothing_is_recorded() {
        let mut buffer = hello_world();
        buffer.set_style_ex(TextRange::new(0, 5), &bold(), SetStyleFlags::empty());
        assert!(buffer.combined_style(0).is_bold());
        assert!(!buffer.can_undo());
    }

    #[test]
    fn empty_and_inverted_ranges() {
        let mut buffer = hello_world();
        assert!(!buffer.set_style(TextRange::new(3, 3), &bold()));
        assert!(buffer.set_style(TextRange::new(3, 1), &bold()));
        assert!(buffer.combined_style(1).is_bold());
        assert!(buffer.set_style(TextRange::new(9, 400), &bold()));
        assert!(buffer.combined_style(10).is_bold());
    }

    #[test]
    fn named_styles_by_kind() {
        let mut buffer = hello_world();
        let mut sheet = StyleSheet::with_standard_lists();
        sheet.add_character_style(CharacterStyleDefinition::new("Strong", bold()));
        buffer.set_style_sheet(sheet);

        assert!(buffer.run(&ApplyNamedStyleCommand::new(TextRange::new(0, 5), "Strong")));
        assert!(buffer.combined_style(1).is_bold());

        assert!(buffer.run(&ApplyNamedStyleCommand::new(TextRange::new(6, 8), "Roman")));
        assert!(buffer.root().paragraphs()[1].attributes().has_list());

        let missing = buffer.execute(&ApplyNamedStyleCommand::new(TextRange::new(0, 1), "Nope"));
        assert!(matches!(
            missing,
            Err(EditorError::Core(CoreError::UnknownStyle { .. }))
        ));
    }
}
