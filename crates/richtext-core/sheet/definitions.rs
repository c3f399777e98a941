//! Named style definitions
//!
//! Character and paragraph definitions hold a partial [`TextAttr`] and an
//! optional base style they inherit from. List definitions additionally hold
//! one attribute set per nesting level.

use crate::attr::{BulletStyle, TextAttr};
use crate::utils::{CoreError, Result};
use tracing::warn;

/// Number of nesting levels a list style defines
pub const MAX_LIST_LEVELS: usize = 10;

/// Indent step between list levels, in tenths of a mm
pub const LIST_INDENT_STEP: i32 = 60;

/// Common surface of every named definition
pub trait StyleDefinition {
    /// Name the definition is registered under
    fn name(&self) -> &str;

    /// Name of the definition this one inherits from
    fn base_style(&self) -> Option<&str>;

    /// Attributes authored directly on this definition
    fn style(&self) -> &TextAttr;
}

macro_rules! impl_style_definition {
    ($ty:ident) => {
        impl StyleDefinition for $ty {
            fn name(&self) -> &str {
                &self.name
            }

            fn base_style(&self) -> Option<&str> {
                self.base_style.as_deref()
            }

            fn style(&self) -> &TextAttr {
                &self.style
            }
        }
    };
}

/// A named character style
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterStyleDefinition {
    pub name: String,
    pub base_style: Option<String>,
    pub description: Option<String>,
    pub style: TextAttr,
}

impl CharacterStyleDefinition {
    /// Create a definition with the given attributes
    pub fn new(name: impl Into<String>, style: TextAttr) -> Self {
        Self {
            name: name.into(),
            style,
            ..Self::default()
        }
    }

    /// Inherit from another character style
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_style = Some(base.into());
        self
    }
}

/// A named paragraph style
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParagraphStyleDefinition {
    pub name: String,
    pub base_style: Option<String>,
    /// Style applied to the paragraph created by pressing return
    pub next_style: Option<String>,
    pub description: Option<String>,
    pub style: TextAttr,
}

impl ParagraphStyleDefinition {
    /// Create a definition with the given attributes
    pub fn new(name: impl Into<String>, style: TextAttr) -> Self {
        Self {
            name: name.into(),
            style,
            ..Self::default()
        }
    }

    /// Inherit from another paragraph style
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_style = Some(base.into());
        self
    }

    /// Style for the following paragraph
    #[must_use]
    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next_style = Some(next.into());
        self
    }
}

/// A list level clamped to `0..MAX_LIST_LEVELS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListLevel(u8);

impl ListLevel {
    pub const TOP: Self = Self(0);
    pub const DEEPEST: Self = Self((MAX_LIST_LEVELS - 1) as u8);

    /// Clamp any integer to the nearest valid level
    #[must_use]
    pub fn clamped(level: i32) -> Self {
        let max = (MAX_LIST_LEVELS - 1) as i32;
        if !(0..=max).contains(&level) {
            warn!(level, max, "list level out of range, clamping");
        }
        Self(level.clamp(0, max) as u8)
    }

    /// Validate an integer level without clamping
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidListLevel`] outside `0..=9`.
    pub fn try_new(level: i32) -> Result<Self> {
        let max = MAX_LIST_LEVELS - 1;
        if level < 0 || level as usize > max {
            return Err(CoreError::InvalidListLevel { level, max });
        }
        Ok(Self(level as u8))
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Level shifted by `delta`, clamped
    #[must_use]
    pub fn offset(self, delta: i32) -> Self {
        Self::clamped(i32::from(self.0).saturating_add(delta))
    }
}

/// Numbering scheme of a list style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberingKind {
    #[default]
    Arabic,
    Roman,
    Alpha,
    /// Literal symbol bullets
    Symbol,
    /// Named standard bullet shapes
    Standard,
}

impl NumberingKind {
    /// Bullet flags used for this scheme
    #[must_use]
    pub const fn bullet_style(self) -> BulletStyle {
        match self {
            Self::Arabic => BulletStyle::ARABIC.union(BulletStyle::PERIOD),
            Self::Roman => BulletStyle::ROMAN_LOWER.union(BulletStyle::PERIOD),
            Self::Alpha => BulletStyle::LETTERS_LOWER.union(BulletStyle::PERIOD),
            Self::Symbol => BulletStyle::SYMBOL,
            Self::Standard => BulletStyle::STANDARD,
        }
    }

    /// Check whether paragraphs of this scheme carry numbers
    #[must_use]
    pub const fn is_numbered(self) -> bool {
        matches!(self, Self::Arabic | Self::Roman | Self::Alpha)
    }
}

/// A named list style with one attribute set per level
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListStyleDefinition {
    pub name: String,
    pub base_style: Option<String>,
    pub kind: NumberingKind,
    /// Attributes shared by every level
    pub style: TextAttr,
    pub levels: [TextAttr; MAX_LIST_LEVELS],
}

impl ListStyleDefinition {
    /// Create a list style whose levels step by [`LIST_INDENT_STEP`]
    pub fn new(name: impl Into<String>, kind: NumberingKind) -> Self {
        let bullets = kind.bullet_style();
        let levels = core::array::from_fn(|i| {
            let mut attr = TextAttr::new();
            attr.set_left_indent(LIST_INDENT_STEP * i as i32, LIST_INDENT_STEP)
                .set_bullet_style(bullets);
            match kind {
                NumberingKind::Symbol => {
                    attr.set_bullet_text("*");
                }
                NumberingKind::Standard => {
                    attr.set_bullet_name("standard/circle");
                }
                _ => {}
            }
            attr
        });
        Self {
            name: name.into(),
            base_style: None,
            kind,
            style: TextAttr::new(),
            levels,
        }
    }

    /// Attributes of a single level
    #[must_use]
    pub fn level_attributes(&self, level: ListLevel) -> &TextAttr {
        &self.levels[level.index()]
    }

    /// Replace the indents and bullet of a single level
    pub fn set_level_attributes(
        &mut self,
        level: ListLevel,
        left_indent: i32,
        left_sub_indent: i32,
        bullet_style: BulletStyle,
    ) {
        let attr = &mut self.levels[level.index()];
        attr.set_left_indent(left_indent, left_sub_indent)
            .set_bullet_style(bullet_style);
    }

    /// Deepest level whose left indent does not exceed `indent`
    #[must_use]
    pub fn find_level_for_indent(&self, indent: i32) -> ListLevel {
        let mut found = ListLevel::TOP;
        for (i, attr) in self.levels.iter().enumerate() {
            match attr.paragraph.left_indent {
                Some(level_indent) if level_indent <= indent => {
                    found = ListLevel(i as u8);
                }
                Some(_) => break,
                None => {}
            }
        }
        found
    }

    /// Shared attributes with the level's attributes on top
    ///
    /// The result names this list so paragraphs carrying it can be traced
    /// back to their list.
    #[must_use]
    pub fn combined_style_for_level(&self, level: ListLevel) -> TextAttr {
        let mut attr = self.style.combined_with(self.level_attributes(level));
        attr.set_list_style_name(self.name.clone());
        attr
    }
}

impl_style_definition!(CharacterStyleDefinition);
impl_style_definition!(ParagraphStyleDefinition);
impl_style_definition!(ListStyleDefinition);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_step_indentation() {
        let list = ListStyleDefinition::new("Arabic", NumberingKind::Arabic);
        let level3 = list.level_attributes(ListLevel::clamped(3));
        assert_eq!(level3.paragraph.left_indent, Some(180));
        assert_eq!(level3.paragraph.left_sub_indent, Some(60));
        assert!(level3.paragraph.bullet_style.unwrap().is_numbered());
    }

    #[test]
    fn find_level_for_indent_rounds_down() {
        let list = ListStyleDefinition::new("Arabic", NumberingKind::Arabic);
        assert_eq!(list.find_level_for_indent(0), ListLevel::TOP);
        assert_eq!(list.find_level_for_indent(125).index(), 2);
        assert_eq!(list.find_level_for_indent(-40), ListLevel::TOP);
        assert_eq!(list.find_level_for_indent(10_000), ListLevel::DEEPEST);
    }

    #[test]
    fn level_clamping() {
        assert_eq!(ListLevel::clamped(-2), ListLevel::TOP);
        assert_eq!(ListLevel::clamped(42), ListLevel::DEEPEST);
        assert_eq!(ListLevel::clamped(4).offset(-1).index(), 3);
        assert_eq!(ListLevel::DEEPEST.offset(i32::MAX), ListLevel::DEEPEST);
        assert_eq!(ListLevel::TOP.offset(i32::MIN), ListLevel::TOP);
        assert!(ListLevel::try_new(10).is_err());
        assert_eq!(ListLevel::try_new(9).map(ListLevel::index), Ok(9));
    }

    #[test]
    fn combined_level_style_names_list() {
        let mut list = ListStyleDefinition::new("Roman", NumberingKind::Roman);
        list.style.set_font_size(11.0);
        let attr = list.combined_style_for_level(ListLevel::clamped(1));
        assert_eq!(attr.paragraph.list_style_name.as_deref(), Some("Roman"));
        assert_eq!(attr.font_size(), Some(11.0));
        assert_eq!(attr.paragraph.left_indent, Some(60));
    }
}
