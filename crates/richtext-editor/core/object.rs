//! Document objects
//!
//! Every object shares an [`ObjectBase`]: a non-owning parent reference (the
//! id of the container whose positions address it), its range within that
//! container and its own attributes. Inline objects are a closed enum; layout
//! and painting dispatch on the variant tag.
//!
//! Non-text objects occupy exactly one position. A paragraph occupies the
//! sum of its children plus one position for its paragraph mark.

use super::container::{Container, ContainerId};
use richtext_core::{TextAttr, TextRange};

/// Character reported for a non-text object in extracted text
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// Storage shared by every object
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectBase {
    /// Container whose positions address this object
    pub parent: Option<ContainerId>,
    /// Range within the parent container, recomputed after every edit
    pub range: TextRange,
    pub attributes: TextAttr,
}

impl ObjectBase {
    #[must_use]
    pub fn with_attributes(attributes: TextAttr) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }
}

/// Capabilities shared by all document objects
pub trait DocumentObject {
    fn base(&self) -> &ObjectBase;

    fn base_mut(&mut self) -> &mut ObjectBase;

    /// Number of positions the object occupies
    fn content_len(&self) -> usize;

    fn parent(&self) -> Option<ContainerId> {
        self.base().parent
    }

    fn range(&self) -> TextRange {
        self.base().range
    }

    fn attributes(&self) -> &TextAttr {
        &self.base().attributes
    }

    fn set_attributes(&mut self, attributes: TextAttr) {
        self.base_mut().attributes = attributes;
    }
}

/// A run of text sharing one set of character attributes
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRun {
    pub base: ObjectBase,
    pub text: String,
}

impl TextRun {
    pub fn new(text: impl Into<String>, attributes: TextAttr) -> Self {
        Self {
            base: ObjectBase::with_attributes(attributes),
            text: text.into(),
        }
    }

    /// Split at a character offset, keeping the head and returning the tail
    pub fn split_off(&mut self, offset: usize) -> Self {
        let byte = byte_offset(&self.text, offset);
        let tail = self.text.split_off(byte);
        Self::new(tail, self.base.attributes.clone())
    }
}

/// An embedded image
///
/// `size` is unknown until the image is decoded; layout uses a placeholder
/// box until then.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageObject {
    pub base: ObjectBase,
    pub source: String,
    /// Pixel size once decoded
    pub size: Option<(u32, u32)>,
}

impl ImageObject {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.size.is_some()
    }
}

/// A field whose displayed text is computed by the host
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldObject {
    pub base: ObjectBase,
    pub field_type: String,
    pub display_text: String,
}

impl FieldObject {
    pub fn new(field_type: impl Into<String>, display_text: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            display_text: display_text.into(),
            ..Self::default()
        }
    }
}

/// A table: rows of cell containers
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableObject {
    pub base: ObjectBase,
    pub rows: Vec<Vec<Container>>,
}

impl TableObject {
    /// Create a `rows` x `cols` table of cells holding one empty paragraph
    pub fn new(rows: usize, cols: usize, mut next_id: impl FnMut() -> ContainerId) -> Self {
        let rows = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| Container::with_empty_paragraph(next_id()))
                    .collect()
            })
            .collect();
        Self {
            base: ObjectBase::default(),
            rows,
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&Container> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Container> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(col))
    }
}

/// A text box: a nested container laid out inline
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxObject {
    pub base: ObjectBase,
    pub container: Container,
}

impl BoxObject {
    #[must_use]
    pub fn new(container: Container) -> Self {
        Self {
            base: ObjectBase::default(),
            container,
        }
    }
}

macro_rules! impl_atomic_object {
    ($($ty:ident),+) => {
        $(
            impl DocumentObject for $ty {
                fn base(&self) -> &ObjectBase {
                    &self.base
                }

                fn base_mut(&mut self) -> &mut ObjectBase {
                    &mut self.base
                }

                fn content_len(&self) -> usize {
                    1
                }
            }
        )+
    };
}

impl_atomic_object!(ImageObject, FieldObject, TableObject, BoxObject);

impl DocumentObject for TextRun {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn content_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Any object that can sit inside a paragraph
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InlineObject {
    Text(TextRun),
    Image(ImageObject),
    Field(FieldObject),
    Table(TableObject),
    Box(BoxObject),
}

impl InlineObject {
    pub fn text(text: impl Into<String>, attributes: TextAttr) -> Self {
        Self::Text(TextRun::new(text, attributes))
    }

    /// Borrow as the shared capability set
    #[must_use]
    pub fn as_object(&self) -> &dyn DocumentObject {
        match self {
            Self::Text(o) => o,
            Self::Image(o) => o,
            Self::Field(o) => o,
            Self::Table(o) => o,
            Self::Box(o) => o,
        }
    }

    pub fn as_object_mut(&mut self) -> &mut dyn DocumentObject {
        match self {
            Self::Text(o) => o,
            Self::Image(o) => o,
            Self::Field(o) => o,
            Self::Table(o) => o,
            Self::Box(o) => o,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.as_object().content_len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn range(&self) -> TextRange {
        self.as_object().range()
    }

    #[must_use]
    pub fn attributes(&self) -> &TextAttr {
        self.as_object().attributes()
    }

    pub fn attributes_mut(&mut self) -> &mut TextAttr {
        &mut self.as_object_mut().base_mut().attributes
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Short tag used in logs and paint calls
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Field(_) => "field",
            Self::Table(_) => "table",
            Self::Box(_) => "box",
        }
    }

    /// Append this object's text; non-text objects contribute U+FFFC
    pub fn push_text(&self, out: &mut String, start: usize, end: usize) {
        match self {
            Self::Text(run) => out.extend(run.text.chars().skip(start).take(end - start)),
            _ if start < end => out.push(OBJECT_REPLACEMENT),
            _ => {}
        }
    }

    /// Containers nested directly inside this object
    pub fn nested_containers(&self) -> Box<dyn Iterator<Item = &Container> + '_> {
        match self {
            Self::Table(table) => Box::new(table.rows.iter().flatten()),
            Self::Box(boxed) => Box::new(core::iter::once(&boxed.container)),
            _ => Box::new(core::iter::empty()),
        }
    }

    pub(crate) fn set_position(&mut self, start: usize, parent: ContainerId) {
        let len = self.len();
        let base = self.as_object_mut().base_mut();
        base.range = TextRange::new(start, start + len);
        base.parent = Some(parent);
    }
}

/// A paragraph: inline children followed by a paragraph mark
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Paragraph {
    pub base: ObjectBase,
    pub children: Vec<InlineObject>,
}

impl DocumentObject for Paragraph {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn content_len(&self) -> usize {
        self.text_len() + 1
    }
}

impl Paragraph {
    /// Create an empty paragraph with the given attributes
    #[must_use]
    pub fn new(attributes: TextAttr) -> Self {
        Self {
            base: ObjectBase::with_attributes(attributes),
            children: Vec::new(),
        }
    }

    /// Create a paragraph holding a single run
    pub fn with_text(text: impl Into<String>, run_attributes: TextAttr, attributes: TextAttr) -> Self {
        let mut para = Self::new(attributes);
        let text = text.into();
        if !text.is_empty() {
            para.children.push(InlineObject::text(text, run_attributes));
        }
        para
    }

    /// Number of positions before the paragraph mark
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.children.iter().map(InlineObject::len).sum()
    }

    /// The paragraph's own attributes
    #[must_use]
    pub fn attributes(&self) -> &TextAttr {
        &self.base.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut TextAttr {
        &mut self.base.attributes
    }

    /// Text with objects as U+FFFC, without the paragraph mark
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.push_text(&mut out, 0, child.len());
        }
        out
    }

    /// Child covering a local offset, and the offset within that child
    #[must_use]
    pub fn locate(&self, offset: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (index, child) in self.children.iter().enumerate() {
            let len = child.len();
            if offset < start + len {
                return Some((index, offset - start));
            }
            start += len;
        }
        None
    }

    /// Child covering a local offset
    #[must_use]
    pub fn child_at(&self, offset: usize) -> Option<&InlineObject> {
        self.locate(offset).map(|(index, _)| &self.children[index])
    }

    /// Make `offset` a child boundary, returning the index of the first child
    /// at or after it
    pub fn split_at(&mut self, offset: usize) -> usize {
        match self.locate(offset) {
            None => self.children.len(),
            Some((index, 0)) => index,
            Some((index, inner)) => {
                // only text runs are longer than one position
                if let InlineObject::Text(run) = &mut self.children[index] {
                    let tail = run.split_off(inner);
                    self.children.insert(index + 1, InlineObject::Text(tail));
                }
                index + 1
            }
        }
    }

    /// Detach the content from `offset` onwards
    pub fn split_off(&mut self, offset: usize) -> Vec<InlineObject> {
        let index = self.split_at(offset);
        self.children.split_off(index)
    }

    /// Insert objects at a local offset
    pub fn insert_objects(&mut self, offset: usize, objects: Vec<InlineObject>) {
        let index = self.split_at(offset);
        self.children.splice(index..index, objects);
    }

    /// Remove the content in `[start, end)` (local offsets)
    pub fn remove_span(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let end = end.min(self.text_len());
        let first = self.split_at(start);
        // splits at `end` only insert at or after `first`
        let last = self.split_at(end);
        if first < last {
            self.children.drain(first..last);
        }
    }

    /// Child index range `[first, last)` exactly covering `[start, end)`
    ///
    /// Both offsets must already be child boundaries.
    #[must_use]
    pub fn children_span(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        let mut pos = 0;
        let mut first = None;
        for (index, child) in self.children.iter().enumerate() {
            if pos == start && first.is_none() {
                first = Some(index);
            }
            pos += child.len();
            if pos == end {
                return first.map(|f| (f, index + 1));
            }
        }
        None
    }

    /// Merge adjacent text runs with equal attributes and drop empty runs
    pub fn merge_runs(&mut self) {
        let mut merged: Vec<InlineObject> = Vec::with_capacity(self.children.len());
        for child in self.children.drain(..) {
            if let InlineObject::Text(run) = &child {
                if run.text.is_empty() {
                    continue;
                }
                if let Some(InlineObject::Text(prev)) = merged.last_mut() {
                    if prev.base.attributes == run.base.attributes {
                        prev.text.push_str(&run.text);
                        continue;
                    }
                }
            }
            merged.push(child);
        }
        self.children = merged;
    }

    /// Recompute the paragraph's and its children's ranges
    pub(crate) fn update_ranges(&mut self, start: usize, parent: ContainerId) {
        let mut pos = start;
        for child in &mut self.children {
            child.set_position(pos, parent);
            pos += child.len();
        }
        self.base.range = TextRange::new(start, pos + 1);
        self.base.parent = Some(parent);
    }
}

/// Byte index of the `offset`-th character
pub(crate) fn byte_offset(text: &str, offset: usize) -> usize {
    text.char_indices().nth(offset).map_or(text.len(), |(byte, _)| byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bold() -> TextAttr {
        let mut attr = TextAttr::new();
        attr.set_bold(true);
        attr
    }

    #[test]
    fn paragraph_length_counts_mark() {
        let mut para = Paragraph::with_text("Héllo", TextAttr::new(), TextAttr::new());
        para.children.push(InlineObject::Image(ImageObject::new("a.png")));
        assert_eq!(para.text_len(), 6);
        assert_eq!(para.content_len(), 7);
        assert_eq!(para.text(), "Héllo\u{FFFC}");
    }

    #[test]
    fn split_at_creates_boundaries() {
        let mut para = Paragraph::with_text("Hello world", TextAttr::new(), TextAttr::new());
        assert_eq!(para.split_at(5), 1);
        assert_eq!(para.children.len(), 2);
        assert_eq!(para.split_at(5), 1);
        assert_eq!(para.split_at(0), 0);
        assert_eq!(para.split_at(11), 2);
        para.merge_runs();
        assert_eq!(para.children.len(), 1);
    }

    #[test]
    fn split_off_and_insert() {
        let mut para = Paragraph::with_text("abcdef", TextAttr::new(), TextAttr::new());
        let tail = para.split_off(2);
        assert_eq!(para.text(), "ab");
        para.insert_objects(2, vec![InlineObject::text("XY", bold())]);
        para.children.extend(tail);
        assert_eq!(para.text(), "abXYcdef");
        assert_eq!(para.children.len(), 3);
    }

    #[test]
    fn remove_span_inside_and_across_runs() {
        let mut para = Paragraph::with_text("abcdef", TextAttr::new(), TextAttr::new());
        para.insert_objects(3, vec![InlineObject::text("XYZ", bold())]);
        assert_eq!(para.text(), "abcXYZdef");

        para.remove_span(2, 7);
        assert_eq!(para.text(), "abef");
        para.merge_runs();
        assert_eq!(para.children.len(), 1);

        para.remove_span(1, 2);
        assert_eq!(para.text(), "af");
        para.remove_span(0, 99);
        assert_eq!(para.text(), "");
    }

    #[test]
    fn merge_keeps_distinct_attributes() {
        let mut para = Paragraph::new(TextAttr::new());
        para.children.push(InlineObject::text("a", TextAttr::new()));
        para.children.push(InlineObject::text("", bold()));
        para.children.push(InlineObject::text("b", bold()));
        para.children.push(InlineObject::text("c", bold()));
        para.merge_runs();
        assert_eq!(para.children.len(), 2);
        assert_eq!(para.text(), "abc");
    }

    #[test]
    fn ranges_follow_children() {
        let mut para = Paragraph::with_text("ab", TextAttr::new(), TextAttr::new());
        para.children.push(InlineObject::Field(FieldObject::new("page", "3")));
        para.update_ranges(10, ContainerId::ROOT);
        assert_eq!(para.base.range, TextRange::new(10, 14));
        assert_eq!(para.children[1].range(), TextRange::new(12, 13));
        assert_eq!(para.children[1].as_object().parent(), Some(ContainerId::ROOT));
    }
}
