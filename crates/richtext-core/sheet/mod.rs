//! Style sheets
//!
//! A [`StyleSheet`] registers named character, paragraph and list styles.
//! Definitions may name a base style; resolving a name walks that chain and
//! merges from the root outwards, so a derived style overrides only what it
//! authors. Unknown base names end the chain, and loops are reported as
//! [`CoreError::CircularStyleInheritance`].
//!
//! A [`StyleSheetStack`] layers sheets: lookups try the most recently pushed
//! sheet first.

pub mod definitions;

pub use definitions::{
    CharacterStyleDefinition, ListLevel, ListStyleDefinition, NumberingKind,
    ParagraphStyleDefinition, StyleDefinition, LIST_INDENT_STEP, MAX_LIST_LEVELS,
};

use crate::attr::TextAttr;
use crate::utils::{create_hash_map, CoreError, HashMap, Result};
use smallvec::SmallVec;
use tracing::debug;

/// Merge a definition chain from its root to `name`
fn resolve_chain<'a, D, F>(name: &str, lookup: F) -> Result<TextAttr>
where
    D: StyleDefinition + 'a,
    F: Fn(&str) -> Option<&'a D>,
{
    let mut chain: SmallVec<[&'a D; 4]> = SmallVec::new();
    let mut current = Some(name);

    while let Some(next) = current {
        let Some(def) = lookup(next) else {
            if chain.is_empty() {
                return Err(CoreError::unknown_style(next));
            }
            debug!(style = name, base = next, "base style not found, ending chain");
            break;
        };
        if chain.iter().any(|seen| seen.name() == def.name()) {
            return Err(CoreError::CircularStyleInheritance {
                name: def.name().to_string(),
            });
        }
        chain.push(def);
        current = def.base_style();
    }

    let mut attr = TextAttr::new();
    for def in chain.iter().rev() {
        attr.apply(def.style());
    }
    Ok(attr)
}

/// Named style definitions for one document
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleSheet {
    pub name: Option<String>,
    character_styles: HashMap<String, CharacterStyleDefinition>,
    paragraph_styles: HashMap<String, ParagraphStyleDefinition>,
    list_styles: HashMap<String, ListStyleDefinition>,
}

impl StyleSheet {
    /// Create an empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            character_styles: create_hash_map(),
            paragraph_styles: create_hash_map(),
            list_styles: create_hash_map(),
        }
    }

    /// Create a sheet holding the five standard list styles
    ///
    /// "Arabic", "Roman", "Alpha", "Bullet" (standard shapes) and "Symbol".
    #[must_use]
    pub fn with_standard_lists() -> Self {
        let mut sheet = Self::new();
        for (name, kind) in [
            ("Arabic", NumberingKind::Arabic),
            ("Roman", NumberingKind::Roman),
            ("Alpha", NumberingKind::Alpha),
            ("Bullet", NumberingKind::Standard),
            ("Symbol", NumberingKind::Symbol),
        ] {
            sheet.add_list_style(ListStyleDefinition::new(name, kind));
        }
        sheet
    }

    /// Register a character style, returning any definition it replaced
    pub fn add_character_style(
        &mut self,
        def: CharacterStyleDefinition,
    ) -> Option<CharacterStyleDefinition> {
        self.character_styles.insert(def.name.clone(), def)
    }

    /// Register a paragraph style, returning any definition it replaced
    pub fn add_paragraph_style(
        &mut self,
        def: ParagraphStyleDefinition,
    ) -> Option<ParagraphStyleDefinition> {
        self.paragraph_styles.insert(def.name.clone(), def)
    }

    /// Register a list style, returning any definition it replaced
    pub fn add_list_style(&mut self, def: ListStyleDefinition) -> Option<ListStyleDefinition> {
        self.list_styles.insert(def.name.clone(), def)
    }

    pub fn remove_character_style(&mut self, name: &str) -> Option<CharacterStyleDefinition> {
        self.character_styles.remove(name)
    }

    pub fn remove_paragraph_style(&mut self, name: &str) -> Option<ParagraphStyleDefinition> {
        self.paragraph_styles.remove(name)
    }

    pub fn remove_list_style(&mut self, name: &str) -> Option<ListStyleDefinition> {
        self.list_styles.remove(name)
    }

    #[must_use]
    pub fn character_style(&self, name: &str) -> Option<&CharacterStyleDefinition> {
        self.character_styles.get(name)
    }

    #[must_use]
    pub fn paragraph_style(&self, name: &str) -> Option<&ParagraphStyleDefinition> {
        self.paragraph_styles.get(name)
    }

    #[must_use]
    pub fn list_style(&self, name: &str) -> Option<&ListStyleDefinition> {
        self.list_styles.get(name)
    }

    /// Sorted names of every registered list style
    #[must_use]
    pub fn list_style_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.list_styles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Total number of definitions
    #[must_use]
    pub fn len(&self) -> usize {
        self.character_styles.len() + self.paragraph_styles.len() + self.list_styles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Character style with its base chain merged
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownStyle`] if `name` is not registered or
    /// [`CoreError::CircularStyleInheritance`] if the base chain loops.
    pub fn resolve_character_style(&self, name: &str) -> Result<TextAttr> {
        resolve_chain(name, |n| self.character_style(n))
    }

    /// Paragraph style with its base chain merged
    ///
    /// # Errors
    ///
    /// See [`Self::resolve_character_style`].
    pub fn resolve_paragraph_style(&self, name: &str) -> Result<TextAttr> {
        resolve_chain(name, |n| self.paragraph_style(n))
    }
}

/// Sheets layered by push/pop; the top sheet is searched first
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheetStack {
    sheets: Vec<StyleSheet>,
}

impl Default for StyleSheetStack {
    fn default() -> Self {
        Self::new(StyleSheet::with_standard_lists())
    }
}

impl StyleSheetStack {
    /// Create a stack holding `base`
    #[must_use]
    pub fn new(base: StyleSheet) -> Self {
        Self { sheets: vec![base] }
    }

    /// Layer a sheet over the current ones
    pub fn push(&mut self, sheet: StyleSheet) {
        self.sheets.push(sheet);
    }

    /// Remove the top sheet; the base sheet is never popped
    pub fn pop(&mut self) -> Option<StyleSheet> {
        if self.sheets.len() > 1 {
            self.sheets.pop()
        } else {
            None
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.sheets.len()
    }

    /// The sheet edits are made against
    #[must_use]
    pub fn top(&self) -> &StyleSheet {
        // `sheets` always holds the base sheet
        &self.sheets[self.sheets.len() - 1]
    }

    pub fn top_mut(&mut self) -> &mut StyleSheet {
        let last = self.sheets.len() - 1;
        &mut self.sheets[last]
    }

    /// Replace the top sheet, returning the previous one
    pub fn replace_top(&mut self, sheet: StyleSheet) -> StyleSheet {
        core::mem::replace(self.top_mut(), sheet)
    }

    #[must_use]
    pub fn character_style(&self, name: &str) -> Option<&CharacterStyleDefinition> {
        self.sheets.iter().rev().find_map(|s| s.character_style(name))
    }

    #[must_use]
    pub fn paragraph_style(&self, name: &str) -> Option<&ParagraphStyleDefinition> {
        self.sheets.iter().rev().find_map(|s| s.paragraph_style(name))
    }

    #[must_use]
    pub fn list_style(&self, name: &str) -> Option<&ListStyleDefinition> {
        self.sheets.iter().rev().find_map(|s| s.list_style(name))
    }

    /// Character style resolved across every layer
    ///
    /// # Errors
    ///
    /// See [`StyleSheet::resolve_character_style`].
    pub fn resolve_character_style(&self, name: &str) -> Result<TextAttr> {
        resolve_chain(name, |n| self.character_style(n))
    }

    /// Paragraph style resolved across every layer
    ///
    /// # Errors
    ///
    /// See [`StyleSheet::resolve_character_style`].
    pub fn resolve_paragraph_style(&self, name: &str) -> Result<TextAttr> {
        resolve_chain(name, |n| self.paragraph_style(n))
    }

    /// List style with list-level base chains resolved
    ///
    /// Shared attributes are inherited; per-level attributes come from the
    /// named definition itself.
    ///
    /// # Errors
    ///
    /// See [`StyleSheet::resolve_character_style`].
    pub fn resolve_list_style(&self, name: &str) -> Result<ListStyleDefinition> {
        let shared = resolve_chain(name, |n| self.list_style(n))?;
        let mut def = self
            .list_style(name)
            .cloned()
            .ok_or_else(|| CoreError::unknown_style(name))?;
        def.style = shared;
        Ok(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn heading_sheet() -> StyleSheet {
        let mut normal = TextAttr::new();
        normal.set_font_face("Serif").set_font_size(10.0);
        let mut heading = TextAttr::new();
        heading.set_font_size(16.0).set_bold(true);

        let mut sheet = StyleSheet::new();
        sheet.add_paragraph_style(ParagraphStyleDefinition::new("Normal", normal));
        sheet.add_paragraph_style(
            ParagraphStyleDefinition::new("Heading", heading)
                .with_base("Normal")
                .with_next("Normal"),
        );
        sheet
    }

    #[test]
    fn base_chain_merges_root_first() {
        let sheet = heading_sheet();
        let resolved = sheet.resolve_paragraph_style("Heading").unwrap();
        assert_eq!(resolved.font_face(), Some("Serif"));
        assert_eq!(resolved.font_size(), Some(16.0));
        assert!(resolved.is_bold());
    }

    #[test]
    fn unknown_and_circular_styles() {
        let mut sheet = heading_sheet();
        assert!(matches!(
            sheet.resolve_paragraph_style("Missing"),
            Err(CoreError::UnknownStyle { .. })
        ));

        sheet.add_character_style(CharacterStyleDefinition::new("A", TextAttr::new()).with_base("B"));
        sheet.add_character_style(CharacterStyleDefinition::new("B", TextAttr::new()).with_base("A"));
        assert!(matches!(
            sheet.resolve_character_style("A"),
            Err(CoreError::CircularStyleInheritance { .. })
        ));
    }

    #[test]
    fn dangling_base_ends_chain() {
        let mut attr = TextAttr::new();
        attr.set_italic(true);
        let mut sheet = StyleSheet::new();
        sheet.add_character_style(CharacterStyleDefinition::new("Emph", attr).with_base("Gone"));
        assert!(sheet.resolve_character_style("Emph").unwrap().is_italic());
    }

    #[test]
    fn standard_lists_registered() {
        let sheet = StyleSheet::with_standard_lists();
        assert_eq!(
            sheet.list_style_names(),
            vec!["Alpha", "Arabic", "Bullet", "Roman", "Symbol"]
        );
        assert_eq!(sheet.list_style("Symbol").unwrap().kind, NumberingKind::Symbol);
    }

    #[test]
    fn stack_searches_top_down() {
        let mut stack = StyleSheetStack::new(heading_sheet());
        let mut overlay = StyleSheet::new();
        let mut attr = TextAttr::new();
        attr.set_font_size(20.0);
        overlay.add_paragraph_style(ParagraphStyleDefinition::new("Heading", attr).with_base("Normal"));
        stack.push(overlay);

        let resolved = stack.resolve_paragraph_style("Heading").unwrap();
        assert_eq!(resolved.font_size(), Some(20.0));
        assert_eq!(resolved.font_face(), Some("Serif"));
        assert!(!resolved.is_bold());

        assert!(stack.pop().is_some());
        assert!(stack.pop().is_none());
        assert_eq!(stack.depth(), 1);
        assert!(stack.resolve_paragraph_style("Heading").unwrap().is_bold());
    }
}
