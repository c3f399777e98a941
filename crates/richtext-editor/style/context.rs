//! Explicit style context for insertion
//!
//! A [`StyleContext`] is a stack of attribute sets owned by the caller and
//! passed to insertion. Each `begin_*` pushes one layer; `end_*` pops the
//! most recent one. Content inserted while layers are open takes their
//! combined attributes.

use richtext_core::{
    Alignment, BulletStyle, Color, ListLevel, ListStyleDefinition, TextAttr,
};

/// Stack of styles applied to newly inserted content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleContext {
    stack: Vec<TextAttr>,
}

macro_rules! end_aliases {
    ($($name:ident),+ $(,)?) => {
        $(
            /// Pop the most recent layer; `false` when none is open
            pub fn $name(&mut self) -> bool {
                self.end_style()
            }
        )+
    };
}

impl StyleContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open layers
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// All open layers merged, oldest first
    #[must_use]
    pub fn combined(&self) -> TextAttr {
        self.stack.iter().fold(TextAttr::new(), |mut acc, layer| {
            acc.apply(layer);
            acc
        })
    }

    /// Push an arbitrary style
    pub fn begin_style(&mut self, style: TextAttr) {
        self.stack.push(style);
    }

    fn begin_with(&mut self, build: impl FnOnce(&mut TextAttr)) {
        let mut attr = TextAttr::new();
        build(&mut attr);
        self.stack.push(attr);
    }

    pub fn begin_bold(&mut self) {
        self.begin_with(|a| {
            a.set_bold(true);
        });
    }

    pub fn begin_italic(&mut self) {
        self.begin_with(|a| {
            a.set_italic(true);
        });
    }

    pub fn begin_underline(&mut self) {
        self.begin_with(|a| {
            a.set_underline(true);
        });
    }

    pub fn begin_font_size(&mut self, points: f32) {
        self.begin_with(|a| {
            a.set_font_size(points);
        });
    }

    pub fn begin_font(&mut self, face: &str) {
        self.begin_with(|a| {
            a.set_font_face(face);
        });
    }

    pub fn begin_text_color(&mut self, color: Color) {
        self.begin_with(|a| {
            a.set_text_color(color);
        });
    }

    pub fn begin_url(&mut self, url: &str) {
        self.begin_with(|a| {
            a.set_url(url);
        });
    }

    pub fn begin_alignment(&mut self, alignment: Alignment) {
        self.begin_with(|a| {
            a.set_alignment(alignment);
        });
    }

    /// Indents in tenths of a millimetre
    pub fn begin_left_indent(&mut self, indent: i32, sub_indent: i32) {
        self.begin_with(|a| {
            a.set_left_indent(indent, sub_indent);
        });
    }

    pub fn begin_right_indent(&mut self, indent: i32) {
        self.begin_with(|a| {
            a.set_right_indent(indent);
        });
    }

    pub fn begin_paragraph_spacing(&mut self, before: i32, after: i32) {
        self.begin_with(|a| {
            a.set_paragraph_spacing(before, after);
        });
    }

    /// Spacing in tenths of a line
    pub fn begin_line_spacing(&mut self, spacing: u16) {
        self.begin_with(|a| {
            a.set_line_spacing(spacing);
        });
    }

    /// Numbered bullet with explicit number and indents
    pub fn begin_numbered_bullet(
        &mut self,
        number: u32,
        left_indent: i32,
        left_sub_indent: i32,
        style: BulletStyle,
    ) {
        self.begin_with(|a| {
            a.set_bullet_number(number)
                .set_bullet_style(style)
                .set_left_indent(left_indent, left_sub_indent);
        });
    }

    /// Literal symbol bullet
    pub fn begin_symbol_bullet(&mut self, symbol: &str, left_indent: i32, left_sub_indent: i32) {
        self.begin_with(|a| {
            a.set_bullet_text(symbol)
                .set_bullet_style(BulletStyle::SYMBOL)
                .set_left_indent(left_indent, left_sub_indent);
        });
    }

    /// Named standard bullet shape
    pub fn begin_standard_bullet(&mut self, name: &str, left_indent: i32, left_sub_indent: i32) {
        self.begin_with(|a| {
            a.set_bullet_name(name)
                .set_bullet_style(BulletStyle::STANDARD)
                .set_left_indent(left_indent, left_sub_indent);
        });
    }

    pub fn begin_character_style(&mut self, name: &str) {
        self.begin_with(|a| {
            a.set_character_style_name(name);
        });
    }

    pub fn begin_paragraph_style(&mut self, name: &str) {
        self.begin_with(|a| {
            a.set_paragraph_style_name(name);
        });
    }

    /// List membership at `level`; `number` only applies to numbered lists
    pub fn begin_list_style(&mut self, list: &ListStyleDefinition, level: ListLevel, number: u32) {
        let mut attr = list.combined_style_for_level(level);
        if list.kind.is_numbered() {
            attr.set_bullet_number(number);
        }
        self.stack.push(attr);
    }

    /// Pop the most recent layer
    ///
    /// Returns `false` when no layer is open.
    pub fn end_style(&mut self) -> bool {
        self.stack.pop().is_some()
    }

    /// Pop every open layer
    pub fn end_all_styles(&mut self) {
        self.stack.clear();
    }

    end_aliases!(
        end_bold,
        end_italic,
        end_underline,
        end_font_size,
        end_font,
        end_text_color,
        end_url,
        end_alignment,
        end_left_indent,
        end_right_indent,
        end_paragraph_spacing,
        end_line_spacing,
        end_numbered_bullet,
        end_symbol_bullet,
        end_standard_bullet,
        end_character_style,
        end_paragraph_style,
        end_list_style,
    );
}
