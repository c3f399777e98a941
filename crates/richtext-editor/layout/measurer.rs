//! Measurement contract with the rasterizer
//!
//! The layout engine never touches fonts. It asks a [`TextMeasurer`] for
//! per-character advances and object sizes under an already-combined style.

use super::geometry::Size;
use crate::core::{ImageObject, InlineObject};
use richtext_core::TextAttr;

/// Point size assumed when a style leaves the font size unset
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Placeholder box for images that have not been decoded yet
pub const PLACEHOLDER_IMAGE: Size = Size::new(16, 16);

/// Text and object metrics supplied by the host
pub trait TextMeasurer {
    /// Advance width of every character of `text`, in pixels
    fn measure_text(&self, text: &str, style: &TextAttr, font_scale: f64) -> Vec<i32>;

    /// Height of one line of text in `style`
    fn line_height(&self, style: &TextAttr, font_scale: f64) -> i32;

    /// Intrinsic size of an atomic inline object
    ///
    /// Tables and boxes are laid out as nested containers and never reach
    /// the measurer.
    fn object_size(&self, object: &InlineObject, style: &TextAttr, font_scale: f64) -> Size {
        match object {
            InlineObject::Image(image) => image_size(image),
            InlineObject::Field(field) => {
                let width = self
                    .measure_text(&field.display_text, style, font_scale)
                    .iter()
                    .sum();
                Size::new(width, self.line_height(style, font_scale))
            }
            _ => Size::new(0, self.line_height(style, font_scale)),
        }
    }
}

/// Decoded size of an image, or the placeholder box
#[must_use]
pub fn image_size(image: &ImageObject) -> Size {
    image.size.map_or(PLACEHOLDER_IMAGE, |(w, h)| {
        Size::new(w as i32, h as i32)
    })
}

/// Monospaced measurer for headless use and tests
///
/// Every character advances `char_width` at 12pt, scaled by the style's font
/// size and the buffer's font scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPitchMeasurer {
    pub char_width: i32,
    pub line_height: i32,
}

impl Default for FixedPitchMeasurer {
    fn default() -> Self {
        Self {
            char_width: 8,
            line_height: 16,
        }
    }
}

impl FixedPitchMeasurer {
    #[must_use]
    pub const fn new(char_width: i32, line_height: i32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }

    fn scale(style: &TextAttr, font_scale: f64) -> f64 {
        let size = style.font_size().unwrap_or(DEFAULT_FONT_SIZE);
        font_scale * f64::from(size) / f64::from(DEFAULT_FONT_SIZE)
    }

    fn scaled(value: i32, scale: f64) -> i32 {
        ((f64::from(value) * scale).round() as i32).max(1)
    }
}

impl TextMeasurer for FixedPitchMeasurer {
    fn measure_text(&self, text: &str, style: &TextAttr, font_scale: f64) -> Vec<i32> {
        let advance = Self::scaled(self.char_width, Self::scale(style, font_scale));
        text.chars().map(|_| advance).collect()
    }

    fn line_height(&self, style: &TextAttr, font_scale: f64) -> i32 {
        Self::scaled(self.line_height, Self::scale(style, font_scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FieldObject;

    #[test]
    fn fixed_pitch_scales_with_font_size() {
        let m = FixedPitchMeasurer::default();
        let mut style = TextAttr::new();
        assert_eq!(m.measure_text("abc", &style, 1.0), vec![8, 8, 8]);
        style.set_font_size(24.0);
        assert_eq!(m.measure_text("ab", &style, 1.0), vec![16, 16]);
        assert_eq!(m.line_height(&style, 0.5), 16);
    }

    #[test]
    fn objects_measure_intrinsically() {
        let m = FixedPitchMeasurer::default();
        let style = TextAttr::new();
        let unloaded = InlineObject::Image(ImageObject::new("a.png"));
        assert_eq!(m.object_size(&unloaded, &style, 1.0), PLACEHOLDER_IMAGE);
        let loaded = InlineObject::Image(ImageObject::new("a.png").with_size(40, 30));
        assert_eq!(m.object_size(&loaded, &style, 1.0), Size::new(40, 30));
        let field = InlineObject::Field(FieldObject::new("page", "12"));
        assert_eq!(m.object_size(&field, &style, 1.0), Size::new(16, 16));
    }
}
