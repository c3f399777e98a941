//! Style attributes with per-field set/unset semantics
//!
//! A [`TextAttr`] is split into [`CharacterAttrs`] and [`ParagraphAttrs`].
//! Every field is independently unset (`None`, not authored) or set. Merging
//! with [`TextAttr::apply`] overwrites only the fields the other side sets, so
//! stacking basic, paragraph and character layers yields the combined style.
//!
//! Indents and spacing are measured in tenths of a millimetre
//! ([`UNITS_PER_MM`]); font sizes in points.

/// Generates the field-wise set operations shared by the attribute halves
macro_rules! optional_fields {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl $ty {
            pub(crate) fn apply_fields(&mut self, other: &Self) {
                $(
                    if other.$field.is_some() {
                        self.$field.clone_from(&other.$field);
                    }
                )+
            }

            pub(crate) fn remove_fields(&mut self, mask: &Self) {
                $(
                    if mask.$field.is_some() {
                        self.$field = None;
                    }
                )+
            }

            pub(crate) fn retain_different_fields(&mut self, reference: &Self) {
                $(
                    if self.$field.is_some() && self.$field == reference.$field {
                        self.$field = None;
                    }
                )+
            }

            pub(crate) fn retain_common_fields(&mut self, other: &Self) {
                $(
                    if self.$field != other.$field {
                        self.$field = None;
                    }
                )+
            }

            pub(crate) fn any_field_set(&self) -> bool {
                false $( || self.$field.is_some() )+
            }
        }
    };
}

mod character;
pub mod flags;
mod paragraph;

pub use character::{CharacterAttrs, Color, FontWeight};
pub use flags::{BulletStyle, TextEffects};
pub use paragraph::{Alignment, ParagraphAttrs};

/// Indent and spacing units per millimetre
pub const UNITS_PER_MM: i32 = 10;

/// Character and paragraph attributes with independent set/unset fields
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextAttr {
    /// Font, colour, effects and link attributes
    pub character: CharacterAttrs,
    /// Alignment, indentation, spacing and list attributes
    pub paragraph: ParagraphAttrs,
}

impl TextAttr {
    /// Create an attribute set with nothing authored
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite every field that `other` sets
    pub fn apply(&mut self, other: &Self) {
        self.character.apply(&other.character);
        self.paragraph.apply(&other.paragraph);
    }

    /// Return a copy with `other` applied on top
    #[must_use]
    pub fn combined_with(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.apply(other);
        out
    }

    /// Unset every field that `mask` sets; the mask's values are ignored
    pub fn remove(&mut self, mask: &Self) {
        self.character.remove(&mask.character);
        self.paragraph.remove(&mask.paragraph);
    }

    /// Keep only the fields whose value differs from `reference`
    ///
    /// Used to skip writes that would not change the combined style.
    #[must_use]
    pub fn differences_from(&self, reference: &Self) -> Self {
        let mut out = self.clone();
        out.character.retain_different(&reference.character);
        out.paragraph.retain_different(&reference.paragraph);
        out
    }

    /// Unset every field whose value differs between `self` and `other`
    pub fn retain_common(&mut self, other: &Self) {
        self.character.retain_common(&other.character);
        self.paragraph.retain_common(&other.paragraph);
    }

    /// Check that every field set here has the same value in `other`
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.differences_from(other).is_default()
    }

    /// Check that no field is set
    #[must_use]
    pub fn is_default(&self) -> bool {
        !self.has_character_attributes() && !self.has_paragraph_attributes()
    }

    /// Check whether any character-scoped field is set
    #[must_use]
    pub fn has_character_attributes(&self) -> bool {
        self.character.is_set()
    }

    /// Check whether any paragraph-scoped field is set
    #[must_use]
    pub fn has_paragraph_attributes(&self) -> bool {
        self.paragraph.is_set()
    }

    /// Copy holding only the character half
    #[must_use]
    pub fn character_part(&self) -> Self {
        Self {
            character: self.character.clone(),
            paragraph: ParagraphAttrs::default(),
        }
    }

    /// Copy holding only the paragraph half
    #[must_use]
    pub fn paragraph_part(&self) -> Self {
        Self {
            character: CharacterAttrs::default(),
            paragraph: self.paragraph.clone(),
        }
    }

    /// Unset everything
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // Character accessors

    /// Set the font face name
    pub fn set_font_face(&mut self, face: impl Into<String>) -> &mut Self {
        self.character.font_face = Some(face.into());
        self
    }

    /// Font face name, if set
    #[must_use]
    pub fn font_face(&self) -> Option<&str> {
        self.character.font_face.as_deref()
    }

    /// Set the font size in points
    pub fn set_font_size(&mut self, points: f32) -> &mut Self {
        self.character.font_size = Some(points);
        self
    }

    /// Font size in points, if set
    #[must_use]
    pub fn font_size(&self) -> Option<f32> {
        self.character.font_size
    }

    /// Set the weight to bold or normal
    pub fn set_bold(&mut self, bold: bool) -> &mut Self {
        self.character.font_weight = Some(if bold {
            FontWeight::BOLD
        } else {
            FontWeight::NORMAL
        });
        self
    }

    /// Check for a set, bold weight
    #[must_use]
    pub fn is_bold(&self) -> bool {
        self.character.font_weight.is_some_and(FontWeight::is_bold)
    }

    /// Set italic on or off
    pub fn set_italic(&mut self, italic: bool) -> &mut Self {
        self.character.italic = Some(italic);
        self
    }

    /// Check for set, enabled italic
    #[must_use]
    pub fn is_italic(&self) -> bool {
        self.character.italic == Some(true)
    }

    /// Set underline on or off
    pub fn set_underline(&mut self, underline: bool) -> &mut Self {
        self.character.underline = Some(underline);
        self
    }

    /// Check for set, enabled underline
    #[must_use]
    pub fn is_underlined(&self) -> bool {
        self.character.underline == Some(true)
    }

    /// Set the foreground colour
    pub fn set_text_color(&mut self, color: Color) -> &mut Self {
        self.character.text_color = Some(color);
        self
    }

    /// Set the background colour
    pub fn set_background_color(&mut self, color: Color) -> &mut Self {
        self.character.background_color = Some(color);
        self
    }

    /// Set a hyperlink target
    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.character.url = Some(url.into());
        self
    }

    /// Set or clear a single text effect
    pub fn set_text_effect(&mut self, effect: TextEffects, on: bool) -> &mut Self {
        self.character.set_effect(effect, on);
        self
    }

    /// Check whether `effect` is set and enabled
    #[must_use]
    pub fn has_text_effect(&self, effect: TextEffects) -> bool {
        self.character.effect(effect) == Some(true)
    }

    /// Name of the character style to apply
    pub fn set_character_style_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.character.character_style_name = Some(name.into());
        self
    }

    // Paragraph accessors

    /// Set paragraph alignment
    pub fn set_alignment(&mut self, alignment: Alignment) -> &mut Self {
        self.paragraph.alignment = Some(alignment);
        self
    }

    /// Alignment, if set
    #[must_use]
    pub fn alignment(&self) -> Option<Alignment> {
        self.paragraph.alignment
    }

    /// Set left indent and sub-indent (wrapped lines), in tenths of a mm
    pub fn set_left_indent(&mut self, indent: i32, sub_indent: i32) -> &mut Self {
        self.paragraph.left_indent = Some(indent);
        self.paragraph.left_sub_indent = Some(sub_indent);
        self
    }

    /// Set right indent, in tenths of a mm
    pub fn set_right_indent(&mut self, indent: i32) -> &mut Self {
        self.paragraph.right_indent = Some(indent);
        self
    }

    /// Set spacing before and after the paragraph, in tenths of a mm
    pub fn set_paragraph_spacing(&mut self, before: i32, after: i32) -> &mut Self {
        self.paragraph.space_before = Some(before);
        self.paragraph.space_after = Some(after);
        self
    }

    /// Set line spacing in tenths of a line (10 is single spacing)
    pub fn set_line_spacing(&mut self, spacing: u16) -> &mut Self {
        self.paragraph.line_spacing = Some(spacing);
        self
    }

    /// Set tab stops, in tenths of a mm
    pub fn set_tabs(&mut self, tabs: &[i32]) -> &mut Self {
        self.paragraph.tabs = Some(tabs.iter().copied().collect());
        self
    }

    /// Name of the paragraph style to apply
    pub fn set_paragraph_style_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.paragraph.paragraph_style_name = Some(name.into());
        self
    }

    /// Name of the list style the paragraph belongs to
    pub fn set_list_style_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.paragraph.list_style_name = Some(name.into());
        self
    }

    /// Set the bullet rendering style
    pub fn set_bullet_style(&mut self, style: BulletStyle) -> &mut Self {
        self.paragraph.bullet_style = Some(style);
        self
    }

    /// Set the bullet number
    pub fn set_bullet_number(&mut self, number: u32) -> &mut Self {
        self.paragraph.bullet_number = Some(number);
        self
    }

    /// Set the literal bullet symbol
    pub fn set_bullet_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.paragraph.bullet_text = Some(text.into());
        self
    }

    /// Set the standard bullet shape name
    pub fn set_bullet_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.paragraph.bullet_name = Some(name.into());
        self
    }

    /// Check whether the paragraph carries a list descriptor
    #[must_use]
    pub fn has_list(&self) -> bool {
        self.paragraph.has_list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_overwrites_only_set_fields() {
        let mut base = TextAttr::new();
        base.set_font_size(10.0).set_font_face("Serif").set_bold(false);

        let mut layer = TextAttr::new();
        layer.set_bold(true);

        base.apply(&layer);
        assert_eq!(base.font_size(), Some(10.0));
        assert_eq!(base.font_face(), Some("Serif"));
        assert!(base.is_bold());
    }

    #[test]
    fn remove_ignores_mask_values() {
        let mut attr = TextAttr::new();
        attr.set_bold(true).set_italic(true).set_alignment(Alignment::Centre);

        let mut mask = TextAttr::new();
        mask.set_bold(false).set_alignment(Alignment::Left);

        attr.remove(&mask);
        assert_eq!(attr.character.font_weight, None);
        assert_eq!(attr.alignment(), None);
        assert!(attr.is_italic());
    }

    #[test]
    fn differences_and_matches() {
        let mut combined = TextAttr::new();
        combined.set_bold(true).set_font_size(12.0);

        let mut request = TextAttr::new();
        request.set_bold(true);
        assert!(request.matches(&combined));
        assert!(request.differences_from(&combined).is_default());

        request.set_italic(true);
        let diff = request.differences_from(&combined);
        assert!(diff.is_italic());
        assert_eq!(diff.character.font_weight, None);
    }

    #[test]
    fn retain_common_unsets_mixed_fields() {
        let mut a = TextAttr::new();
        a.set_bold(true).set_font_size(10.0);
        let mut b = TextAttr::new();
        b.set_bold(false).set_font_size(10.0);

        a.retain_common(&b);
        assert_eq!(a.character.font_weight, None);
        assert_eq!(a.font_size(), Some(10.0));
    }

    #[test]
    fn halves_are_classified() {
        let mut attr = TextAttr::new();
        assert!(attr.is_default());
        attr.set_left_indent(100, 50);
        assert!(attr.has_paragraph_attributes());
        assert!(!attr.has_character_attributes());
        attr.set_text_effect(TextEffects::STRIKETHROUGH, false);
        assert!(attr.has_character_attributes());

        assert!(attr.paragraph_part().character.effects_mask.is_empty());
        assert!(!attr.character_part().has_paragraph_attributes());
    }

    #[test]
    fn effect_off_is_distinct_from_unset() {
        let mut off = TextAttr::new();
        off.set_text_effect(TextEffects::SUPERSCRIPT, false);

        let mut on = TextAttr::new();
        on.set_text_effect(TextEffects::SUPERSCRIPT, true);
        on.set_text_effect(TextEffects::SHADOW, true);

        on.apply(&off);
        assert!(!on.has_text_effect(TextEffects::SUPERSCRIPT));
        assert!(on.has_text_effect(TextEffects::SHADOW));
        assert_eq!(on.character.effect(TextEffects::SUPERSCRIPT), Some(false));
    }
}
