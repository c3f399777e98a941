//! Combined and uncombined style queries

use crate::core::{Buffer, Container, ContainerPath, InlineObject, Paragraph, Result};
use richtext_core::{StyleSheetStack, TextAttr, TextRange};
use tracing::debug;

/// The document-wide layers beneath every paragraph
#[derive(Debug, Clone, Copy)]
pub struct StyleLayers<'a> {
    pub basic: &'a TextAttr,
    pub sheets: &'a StyleSheetStack,
}

impl<'a> StyleLayers<'a> {
    #[must_use]
    pub fn new(basic: &'a TextAttr, sheets: &'a StyleSheetStack) -> Self {
        Self { basic, sheets }
    }

    /// Basic style, named paragraph style and the paragraph's own attributes
    #[must_use]
    pub fn paragraph_style(&self, attributes: &TextAttr) -> TextAttr {
        let mut style = self.basic.clone();
        if let Some(name) = attributes.paragraph.paragraph_style_name.as_deref() {
            match self.sheets.resolve_paragraph_style(name) {
                Ok(named) => style.apply(&named),
                Err(err) => debug!(%err, "ignoring paragraph style"),
            }
        }
        style.apply(attributes);
        style
    }

    /// Paragraph style with an object's named and direct attributes on top
    #[must_use]
    pub fn object_style(&self, paragraph_style: &TextAttr, attributes: &TextAttr) -> TextAttr {
        let mut style = paragraph_style.clone();
        if let Some(name) = attributes.character.character_style_name.as_deref() {
            match self.sheets.resolve_character_style(name) {
                Ok(named) => style.apply(&named),
                Err(err) => debug!(%err, "ignoring character style"),
            }
        }
        style.apply(attributes);
        style
    }

    /// Combined style at a local offset of a paragraph
    ///
    /// Offsets at or past the text length address the paragraph mark, which
    /// only carries the paragraph layers.
    #[must_use]
    pub fn style_at_offset(&self, paragraph: &Paragraph, offset: usize) -> TextAttr {
        let para_style = self.paragraph_style(paragraph.attributes());
        match paragraph.child_at(offset) {
            Some(child) => self.object_style(&para_style, child.attributes()),
            None => para_style,
        }
    }

    /// Combined style at a container position; clamps to the final mark
    #[must_use]
    pub fn style_at(&self, container: &Container, pos: usize) -> TextAttr {
        let pos = pos.min(container.last_position());
        match container.paragraph_at(pos) {
            Some(para) => self.style_at_offset(para, pos - para.base.range.start),
            None => self.basic.clone(),
        }
    }

    /// Fields whose values agree across every object in `range`
    #[must_use]
    pub fn style_for_range(&self, container: &Container, range: TextRange) -> TextAttr {
        let range = range.normalize().clip(container.len());
        let Some((first, last)) = container.paragraph_span(range) else {
            return self.style_at(container, range.start);
        };

        let mut common: Option<TextAttr> = None;
        let mut merge = |style: TextAttr| match common.as_mut() {
            Some(acc) => acc.retain_common(&style),
            None => common = Some(style),
        };
        for para in &container.paragraphs()[first..=last] {
            let para_style = self.paragraph_style(para.attributes());
            let mut touched = false;
            for child in &para.children {
                if child.range().overlaps(&range) {
                    merge(self.object_style(&para_style, child.attributes()));
                    touched = true;
                }
            }
            if !touched {
                merge(para_style);
            }
        }
        common.unwrap_or_else(|| self.basic.clone())
    }
}

/// Compose the layers for one object, or for a paragraph mark when `object`
/// is `None`
#[must_use]
pub fn combine_layers(
    basic: &TextAttr,
    sheets: &StyleSheetStack,
    paragraph: &TextAttr,
    object: Option<&TextAttr>,
) -> TextAttr {
    let layers = StyleLayers::new(basic, sheets);
    let para_style = layers.paragraph_style(paragraph);
    match object {
        Some(attributes) => layers.object_style(&para_style, attributes),
        None => para_style,
    }
}

/// Raw attributes stored at a position
///
/// Returns the paragraph half of the paragraph's own attributes when `probe`
/// sets any paragraph field, otherwise the character half of the object at
/// `pos` (or of the paragraph, at a paragraph mark).
#[must_use]
pub fn uncombined_in(container: &Container, pos: usize, probe: &TextAttr) -> TextAttr {
    let pos = pos.min(container.last_position());
    let Some(para) = container.paragraph_at(pos) else {
        return TextAttr::new();
    };
    if probe.has_paragraph_attributes() {
        return para.attributes().paragraph_part();
    }
    para.child_at(pos - para.base.range.start)
        .map_or_else(|| para.attributes().character_part(), |child: &InlineObject| {
            child.attributes().character_part()
        })
}

impl Buffer {
    /// Basic style and style sheets as resolver layers
    #[must_use]
    pub fn style_layers(&self) -> StyleLayers<'_> {
        StyleLayers::new(self.basic_style(), self.style_sheets())
    }

    /// Combined style at `pos` of the root container
    #[must_use]
    pub fn combined_style(&self, pos: usize) -> TextAttr {
        self.style_layers().style_at(self.root(), pos)
    }

    /// Combined style at `pos` of a nested container
    ///
    /// # Errors
    ///
    /// Returns [`crate::EditorError::ContainerNotFound`] for stale paths.
    pub fn combined_style_in(&self, path: &ContainerPath, pos: usize) -> Result<TextAttr> {
        let container = self.container(path)?;
        Ok(self.style_layers().style_at(container, pos))
    }

    /// Raw paragraph or character attributes at `pos`, chosen by `probe`
    #[must_use]
    pub fn uncombined_style(&self, pos: usize, probe: &TextAttr) -> TextAttr {
        uncombined_in(self.root(), pos, probe)
    }

    /// # Errors
    ///
    /// Returns [`crate::EditorError::ContainerNotFound`] for stale paths.
    pub fn uncombined_style_in(
        &self,
        path: &ContainerPath,
        pos: usize,
        probe: &TextAttr,
    ) -> Result<TextAttr> {
        Ok(uncombined_in(self.container(path)?, pos, probe))
    }

    /// Attributes shared by everything in `range`
    ///
    /// Fields that differ somewhere in the range are unset.
    #[must_use]
    pub fn style_for_range(&self, range: TextRange) -> TextAttr {
        self.style_layers().style_for_range(self.root(), range)
    }

    /// # Errors
    ///
    /// Returns [`crate::EditorError::ContainerNotFound`] for stale paths.
    pub fn style_for_range_in(&self, path: &ContainerPath, range: TextRange) -> Result<TextAttr> {
        let container = self.container(path)?;
        Ok(self.style_layers().style_for_range(container, range))
    }

    /// Combined paragraph layers of the paragraph covering `pos`
    #[must_use]
    pub fn paragraph_style_at(&self, pos: usize) -> TextAttr {
        let pos = pos.min(self.last_position());
        match self.root().paragraph_at(pos) {
            Some(para) => self.style_layers().paragraph_style(para.attributes()),
            None => self.basic_style().clone(),
        }
    }
}
