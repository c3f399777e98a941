//! Paragraph-scoped attributes

use super::flags::BulletStyle;
use smallvec::SmallVec;

/// Horizontal alignment of a paragraph's lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    #[default]
    Left,
    Right,
    Centre,
    Justified,
}

/// Alignment, indentation, spacing, tab and list attributes
///
/// Lengths are tenths of a millimetre. `left_sub_indent` is added to
/// `left_indent` for every line after the first; a list paragraph draws its
/// bullet in the gap this leaves on the first line.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParagraphAttrs {
    pub alignment: Option<Alignment>,
    pub left_indent: Option<i32>,
    pub left_sub_indent: Option<i32>,
    pub right_indent: Option<i32>,
    pub space_before: Option<i32>,
    pub space_after: Option<i32>,
    /// Tenths of a line, 10 is single spacing
    pub line_spacing: Option<u16>,
    pub tabs: Option<SmallVec<[i32; 8]>>,
    pub paragraph_style_name: Option<String>,
    pub list_style_name: Option<String>,
    pub bullet_style: Option<BulletStyle>,
    pub bullet_number: Option<u32>,
    pub bullet_text: Option<String>,
    pub bullet_name: Option<String>,
    pub outline_level: Option<u8>,
    pub page_break_before: Option<bool>,
}

optional_fields!(ParagraphAttrs {
    alignment,
    left_indent,
    left_sub_indent,
    right_indent,
    space_before,
    space_after,
    line_spacing,
    tabs,
    paragraph_style_name,
    list_style_name,
    bullet_style,
    bullet_number,
    bullet_text,
    bullet_name,
    outline_level,
    page_break_before,
});

impl ParagraphAttrs {
    /// Overwrite every field that `other` sets
    pub fn apply(&mut self, other: &Self) {
        self.apply_fields(other);
    }

    /// Unset every field that `mask` sets
    pub fn remove(&mut self, mask: &Self) {
        self.remove_fields(mask);
    }

    /// Keep only fields that differ from `reference`
    pub fn retain_different(&mut self, reference: &Self) {
        self.retain_different_fields(reference);
    }

    /// Unset fields whose value differs from `other`
    pub fn retain_common(&mut self, other: &Self) {
        self.retain_common_fields(other);
    }

    /// Check whether anything is authored
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.any_field_set()
    }

    /// Check for a list descriptor (named list or a drawn bullet)
    #[must_use]
    pub fn has_list(&self) -> bool {
        self.list_style_name.is_some() || self.bullet_style.is_some_and(BulletStyle::has_bullet)
    }

    /// Unset the list descriptor and the indentation it implies
    pub fn clear_list(&mut self) {
        self.list_style_name = None;
        self.bullet_style = None;
        self.bullet_number = None;
        self.bullet_text = None;
        self.bullet_name = None;
        self.left_indent = None;
        self.left_sub_indent = None;
    }
}
