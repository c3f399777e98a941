//! Character-scoped attributes

use super::flags::TextEffects;

/// An opaque RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// CSS-style font weight (100..=900)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const LIGHT: Self = Self(300);
    pub const NORMAL: Self = Self(400);
    pub const BOLD: Self = Self(700);

    /// Weights from 600 upwards render as bold
    #[must_use]
    pub const fn is_bold(self) -> bool {
        self.0 >= 600
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Font, colour, effect and link attributes
///
/// Effects are a value/mask pair: a bit in `effects_mask` marks the effect as
/// authored and the same bit in `effects` carries its value.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterAttrs {
    pub font_face: Option<String>,
    /// Points
    pub font_size: Option<f32>,
    pub font_weight: Option<FontWeight>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub text_color: Option<Color>,
    pub background_color: Option<Color>,
    pub url: Option<String>,
    pub character_style_name: Option<String>,
    pub effects: TextEffects,
    pub effects_mask: TextEffects,
}

optional_fields!(CharacterAttrs {
    font_face,
    font_size,
    font_weight,
    italic,
    underline,
    text_color,
    background_color,
    url,
    character_style_name,
});

impl CharacterAttrs {
    /// Overwrite every field that `other` sets
    pub fn apply(&mut self, other: &Self) {
        self.apply_fields(other);
        let authored = other.effects_mask;
        self.effects = (self.effects - authored) | (other.effects & authored);
        self.effects_mask |= authored;
    }

    /// Unset every field that `mask` sets
    pub fn remove(&mut self, mask: &Self) {
        self.remove_fields(mask);
        self.effects_mask -= mask.effects_mask;
        self.effects -= mask.effects_mask;
    }

    /// Keep only fields that differ from `reference`
    pub fn retain_different(&mut self, reference: &Self) {
        self.retain_different_fields(reference);
        let same_value = !(self.effects ^ reference.effects);
        let redundant = self.effects_mask & reference.effects_mask & same_value;
        self.effects_mask -= redundant;
        self.effects -= redundant;
    }

    /// Unset fields whose value differs from `other`
    pub fn retain_common(&mut self, other: &Self) {
        self.retain_common_fields(other);
        let same_value = !(self.effects ^ other.effects);
        self.effects_mask &= other.effects_mask & same_value;
        self.effects &= self.effects_mask;
    }

    /// Check whether anything is authored
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.any_field_set() || !self.effects_mask.is_empty()
    }

    /// Author a text effect as on or off
    pub fn set_effect(&mut self, effect: TextEffects, on: bool) {
        self.effects_mask |= effect;
        self.effects.set(effect, on);
    }

    /// Value of an authored effect
    #[must_use]
    pub fn effect(&self, effect: TextEffects) -> Option<bool> {
        self.effects_mask
            .contains(effect)
            .then(|| self.effects.contains(effect))
    }
}
