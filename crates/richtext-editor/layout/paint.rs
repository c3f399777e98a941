//! Painting through a host-supplied [`Painter`]
//!
//! Geometry is fully resolved before any paint call; the painter only draws.

use super::engine::{ContainerLayout, DocumentLayout};
use super::geometry::{Point, Rect};
use crate::core::{Buffer, Container, InlineObject};
use crate::style::StyleLayers;
use richtext_core::TextAttr;

/// Drawing primitives supplied by the host
pub trait Painter {
    /// Draw a run of text whose top-left corner is `origin`
    fn draw_text(&mut self, text: &str, origin: Point, style: &TextAttr);

    /// Draw an image or field in `bounds`
    fn draw_object(&mut self, object: &InlineObject, bounds: Rect);

    /// Draw a list bullet in the first line's indent
    fn draw_bullet(&mut self, bullet: &str, origin: Point, style: &TextAttr);

    /// Outline a nested container
    fn draw_border(&mut self, bounds: Rect);
}

fn paint_container(
    layers: &StyleLayers<'_>,
    container: &Container,
    layout: &ContainerLayout,
    painter: &mut dyn Painter,
) {
    for line in &layout.lines {
        let Some(para) = container.paragraph(line.paragraph) else {
            continue;
        };
        let para_style = layers.paragraph_style(para.attributes());
        if let Some(bullet) = &line.bullet {
            painter.draw_bullet(&bullet.text, bullet.origin, &para_style);
        }

        for child in &para.children {
            let Some(visible) = child.range().intersection(&line.range) else {
                continue;
            };
            if visible.is_empty() {
                continue;
            }
            let origin = Point::new(line.x_of(visible.start), line.y);
            match child {
                InlineObject::Text(run) => {
                    let skip = visible.start - child.range().start;
                    let text: String = run.text.chars().skip(skip).take(visible.len()).collect();
                    let style = layers.object_style(&para_style, child.attributes());
                    painter.draw_text(&text, origin, &style);
                }
                InlineObject::Table(_) | InlineObject::Box(_) => {}
                _ => {
                    let width = line.x_of(visible.end) - origin.x;
                    painter.draw_object(child, Rect::new(origin.x, origin.y, width, line.height));
                }
            }
        }
    }

    for nested in &layout.nested {
        let Some(inner) = nested.path.steps().last().and_then(|step| container.step(step)) else {
            continue;
        };
        painter.draw_border(nested.bounds);
        paint_container(layers, inner, nested, painter);
    }
}

impl DocumentLayout {
    /// Paint every container of `buffer`
    ///
    /// The layout must be current for `buffer`; stale layouts paint whatever
    /// paragraphs still line up.
    pub fn paint(&self, buffer: &Buffer, painter: &mut dyn Painter) {
        paint_container(&buffer.style_layers(), buffer.root(), &self.root, painter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::BufferCommandExt;
    use crate::layout::{FixedPitchMeasurer, LayoutConfig};
    use pretty_assertions::assert_eq;
    use richtext_core::TextRange;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Painter for Recorder {
        fn draw_text(&mut self, text: &str, origin: Point, style: &TextAttr) {
            let weight = if style.is_bold() { "bold" } else { "plain" };
            self.calls.push(format!("text {text:?} at {},{} {weight}", origin.x, origin.y));
        }

        fn draw_object(&mut self, object: &InlineObject, bounds: Rect) {
            self.calls.push(format!("{} {bounds}", object.kind()));
        }

        fn draw_bullet(&mut self, bullet: &str, _origin: Point, _style: &TextAttr) {
            self.calls.push(format!("bullet {bullet}"));
        }

        fn draw_border(&mut self, bounds: Rect) {
            self.calls.push(format!("border {bounds}"));
        }
    }

    fn paint(buffer: &Buffer) -> Vec<String> {
        let layout = DocumentLayout::compute(
            buffer,
            &FixedPitchMeasurer::default(),
            &LayoutConfig::default(),
        );
        let mut recorder = Recorder::default();
        layout.paint(buffer, &mut recorder);
        recorder.calls
    }

    #[test]
    fn runs_paint_with_their_style() {
        let mut buffer = Buffer::new();
        buffer.add_paragraph("abcd");
        let mut bold = TextAttr::new();
        bold.set_bold(true);
        buffer.set_style(TextRange::new(2, 4), &bold);
        buffer.number_list(TextRange::new(0, 4), "Roman", 2);

        assert_eq!(
            paint(&buffer),
            vec![
                "bullet ii.".to_string(),
                "text \"ab\" at 28,5 plain".to_string(),
                "text \"cd\" at 44,5 bold".to_string(),
            ]
        );
    }

    #[test]
    fn objects_and_boxes() {
        let mut buffer = Buffer::new();
        buffer.write_image(0, crate::core::ImageObject::new("x.png").with_size(20, 10));
        buffer.write_text_box(1, "in");

        let calls = paint(&buffer);
        // the line is as tall as the 26px text box beside the image
        assert_eq!(calls[0], "image (5, 5) 20x26");
        assert!(calls[1].starts_with("border"));
        assert!(calls[2].starts_with("text \"in\""));
    }
}
