//! Containers and container paths
//!
//! A [`Container`] owns an ordered list of paragraphs and addresses its
//! content with positions starting at zero. The buffer's root is a container;
//! so is every table cell and text box. Containers are identified by a
//! [`ContainerId`] that survives edits, and located by a [`ContainerPath`]
//! describing how to reach them from the root.

use super::errors::{EditorError, Result};
use super::object::{ImageObject, InlineObject, Paragraph};
use core::fmt;
use richtext_core::{TextAttr, TextRange};
use smallvec::SmallVec;

/// Stable identity of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerId(pub u32);

impl ContainerId {
    pub const ROOT: Self = Self(0);
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One step from a container into an object nested in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathStep {
    pub paragraph: usize,
    pub child: usize,
    /// `(row, column)` for table cells, `None` for text boxes
    pub cell: Option<(usize, usize)>,
}

/// Route from the root container to a nested one
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ContainerPath(SmallVec<[PathStep; 2]>);

impl ContainerPath {
    /// Path of the root container
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    /// Path one level deeper
    #[must_use]
    pub fn child(&self, step: PathStep) -> Self {
        let mut path = self.clone();
        path.0.push(step);
        path
    }

    /// Path of the enclosing container
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        let mut path = self.clone();
        path.0.pop();
        Some(path)
    }
}

impl fmt::Display for ContainerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for step in &self.0 {
            write!(f, "/{}.{}", step.paragraph, step.child)?;
            if let Some((row, col)) = step.cell {
                write!(f, "[{row},{col}]")?;
            }
        }
        Ok(())
    }
}

/// An ordered, owned list of paragraphs
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Container {
    pub id: ContainerId,
    /// Attributes of the container itself (box or cell styling)
    pub attributes: TextAttr,
    paragraphs: Vec<Paragraph>,
}

impl Container {
    /// Create a container with no paragraphs
    #[must_use]
    pub fn new(id: ContainerId) -> Self {
        Self {
            id,
            attributes: TextAttr::new(),
            paragraphs: Vec::new(),
        }
    }

    /// Create a container holding one empty paragraph
    #[must_use]
    pub fn with_empty_paragraph(id: ContainerId) -> Self {
        let mut container = Self::new(id);
        container.paragraphs.push(Paragraph::new(TextAttr::new()));
        container.update_ranges();
        container
    }

    /// Total number of positions, including every paragraph mark
    #[must_use]
    pub fn len(&self) -> usize {
        self.paragraphs.last().map_or(0, |p| p.base.range.end)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Position of the final paragraph mark (0 when empty)
    #[must_use]
    pub fn last_position(&self) -> usize {
        self.len().saturating_sub(1)
    }

    #[must_use]
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    #[must_use]
    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs.get(index)
    }

    #[must_use]
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Index of the paragraph covering `pos`
    #[must_use]
    pub fn paragraph_index_at(&self, pos: usize) -> Option<usize> {
        if pos >= self.len() {
            return None;
        }
        let index = self
            .paragraphs
            .partition_point(|p| p.base.range.end <= pos);
        (index < self.paragraphs.len()).then_some(index)
    }

    #[must_use]
    pub fn paragraph_at(&self, pos: usize) -> Option<&Paragraph> {
        self.paragraph_index_at(pos).map(|i| &self.paragraphs[i])
    }

    /// Inclusive paragraph index span overlapped by a non-empty range
    #[must_use]
    pub fn paragraph_span(&self, range: TextRange) -> Option<(usize, usize)> {
        let range = range.clip(self.len());
        if range.is_empty() {
            return None;
        }
        let first = self.paragraph_index_at(range.start)?;
        let last = self.paragraph_index_at(range.end - 1)?;
        Some((first, last))
    }

    /// Inline object at `pos`; `None` for paragraph marks
    #[must_use]
    pub fn object_at(&self, pos: usize) -> Option<&InlineObject> {
        let para = self.paragraph_at(pos)?;
        para.child_at(pos - para.base.range.start)
    }

    /// Check whether `pos` is a paragraph's first position
    #[must_use]
    pub fn is_paragraph_start(&self, pos: usize) -> bool {
        self.paragraph_at(pos)
            .is_some_and(|p| p.base.range.start == pos)
    }

    /// Check whether `pos` is a paragraph mark
    #[must_use]
    pub fn is_paragraph_end(&self, pos: usize) -> bool {
        self.paragraph_at(pos)
            .is_some_and(|p| p.base.range.end == pos + 1)
    }

    /// All text, paragraphs joined by `\n`
    #[must_use]
    pub fn text(&self) -> String {
        self.text_range(TextRange::new(0, self.len()))
    }

    /// Text of a range; paragraph marks are `\n` except the final one
    #[must_use]
    pub fn text_range(&self, range: TextRange) -> String {
        let range = range.clip(self.len());
        let mut out = String::new();
        let Some((first, last)) = self.paragraph_span(range) else {
            return out;
        };
        let final_mark = self.last_position();
        for para in &self.paragraphs[first..=last] {
            let start = para.base.range.start;
            let lo = range.start.max(start) - start;
            let hi = range.end.min(para.base.range.end) - start;
            let mut pos = 0;
            for child in &para.children {
                let len = child.len();
                let a = lo.max(pos);
                let b = hi.min(pos + len);
                if a < b {
                    child.push_text(&mut out, a - pos, b - pos);
                }
                pos += len;
            }
            let mark = para.base.range.end - 1;
            if range.contains(mark) && mark != final_mark {
                out.push('\n');
            }
        }
        out
    }

    /// Replace `remove` paragraphs at `index` with `insert`, returning the
    /// removed ones
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PositionOutOfBounds`] if the span does not fit.
    pub fn splice_paragraphs(
        &mut self,
        index: usize,
        remove: usize,
        insert: Vec<Paragraph>,
    ) -> Result<Vec<Paragraph>> {
        let end = index.checked_add(remove).unwrap_or(usize::MAX);
        if end > self.paragraphs.len() {
            return Err(EditorError::PositionOutOfBounds {
                position: end,
                length: self.paragraphs.len(),
            });
        }
        let removed = self.paragraphs.splice(index..end, insert).collect();
        self.update_ranges();
        Ok(removed)
    }

    /// Recompute ranges and parent ids for the whole subtree
    pub fn update_ranges(&mut self) {
        let mut pos = 0;
        let id = self.id;
        for para in &mut self.paragraphs {
            para.update_ranges(pos, id);
            pos = para.base.range.end;
            for child in &mut para.children {
                for nested in child_containers_mut(child) {
                    nested.update_ranges();
                }
            }
        }
    }

    /// Container reached by one path step
    #[must_use]
    pub fn step(&self, step: &PathStep) -> Option<&Container> {
        let child = self.paragraphs.get(step.paragraph)?.children.get(step.child)?;
        match (child, step.cell) {
            (InlineObject::Table(table), Some((row, col))) => table.cell(row, col),
            (InlineObject::Box(boxed), None) => Some(&boxed.container),
            _ => None,
        }
    }

    pub fn step_mut(&mut self, step: &PathStep) -> Option<&mut Container> {
        let child = self
            .paragraphs
            .get_mut(step.paragraph)?
            .children
            .get_mut(step.child)?;
        match (child, step.cell) {
            (InlineObject::Table(table), Some((row, col))) => table.cell_mut(row, col),
            (InlineObject::Box(boxed), None) => Some(&mut boxed.container),
            _ => None,
        }
    }

    /// Follow a path from this container
    #[must_use]
    pub fn resolve(&self, path: &ContainerPath) -> Option<&Container> {
        path.steps()
            .iter()
            .try_fold(self, |container, step| container.step(step))
    }

    pub fn resolve_mut(&mut self, path: &ContainerPath) -> Option<&mut Container> {
        let mut current = self;
        for step in path.steps() {
            current = current.step_mut(step)?;
        }
        Some(current)
    }

    /// Path from this container to the container with `id`
    #[must_use]
    pub fn find_path(&self, id: ContainerId) -> Option<ContainerPath> {
        if self.id == id {
            return Some(ContainerPath::root());
        }
        for (p, para) in self.paragraphs.iter().enumerate() {
            for (c, child) in para.children.iter().enumerate() {
                let found = match child {
                    InlineObject::Table(table) => {
                        table.rows.iter().enumerate().find_map(|(r, row)| {
                            row.iter().enumerate().find_map(|(col, cell)| {
                                cell.find_path(id).map(|sub| (Some((r, col)), sub))
                            })
                        })
                    }
                    InlineObject::Box(boxed) => boxed.container.find_path(id).map(|sub| (None, sub)),
                    _ => None,
                };
                if let Some((cell, sub)) = found {
                    let mut path = ContainerPath::root().child(PathStep {
                        paragraph: p,
                        child: c,
                        cell,
                    });
                    path.0.extend(sub.0);
                    return Some(path);
                }
            }
        }
        None
    }

    /// Visit every image in this subtree, counting the visits that changed it
    pub(crate) fn for_each_image_mut(
        &mut self,
        visit: &mut dyn FnMut(&mut ImageObject) -> bool,
    ) -> usize {
        let mut changed = 0;
        for para in &mut self.paragraphs {
            for child in &mut para.children {
                if let InlineObject::Image(image) = child {
                    changed += usize::from(visit(image));
                    continue;
                }
                for nested in child_containers_mut(child) {
                    changed += nested.for_each_image_mut(visit);
                }
            }
        }
        changed
    }

    /// Largest container id in this subtree
    #[must_use]
    pub fn max_id(&self) -> ContainerId {
        let mut max = self.id;
        for para in &self.paragraphs {
            for child in &para.children {
                for nested in child.nested_containers() {
                    max = max.max(nested.max_id());
                }
            }
        }
        max
    }
}

fn child_containers_mut(child: &mut InlineObject) -> Vec<&mut Container> {
    match child {
        InlineObject::Table(table) => table.rows.iter_mut().flatten().collect(),
        InlineObject::Box(boxed) => vec![&mut boxed.container],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::object::{BoxObject, TableObject};
    use pretty_assertions::assert_eq;

    fn two_paragraphs() -> Container {
        let mut container = Container::new(ContainerId::ROOT);
        container
            .splice_paragraphs(
                0,
                0,
                vec![
                    Paragraph::with_text("Hello", TextAttr::new(), TextAttr::new()),
                    Paragraph::with_text("world", TextAttr::new(), TextAttr::new()),
                ],
            )
            .unwrap();
        container
    }

    #[test]
    fn positions_include_paragraph_marks() {
        let container = two_paragraphs();
        assert_eq!(container.len(), 12);
        assert_eq!(container.last_position(), 11);
        assert_eq!(container.paragraph_index_at(5), Some(0));
        assert_eq!(container.paragraph_index_at(6), Some(1));
        assert_eq!(container.paragraph_index_at(12), None);
        assert!(container.is_paragraph_end(5));
        assert!(container.is_paragraph_start(6));
    }

    #[test]
    fn text_extraction() {
        let container = two_paragraphs();
        assert_eq!(container.text(), "Hello\nworld");
        assert_eq!(container.text_range(TextRange::new(3, 8)), "lo\nwo");
        assert_eq!(container.text_range(TextRange::new(8, 3)), "lo\nwo");
    }

    #[test]
    fn empty_container() {
        let container = Container::new(ContainerId::ROOT);
        assert_eq!(container.len(), 0);
        assert_eq!(container.last_position(), 0);
        assert_eq!(container.text(), "");
        assert!(container.paragraph_span(TextRange::new(0, 4)).is_none());
    }

    #[test]
    fn splice_bounds_checked() {
        let mut container = two_paragraphs();
        assert!(container.splice_paragraphs(1, 5, Vec::new()).is_err());
        let removed = container.splice_paragraphs(0, 1, Vec::new()).unwrap();
        assert_eq!(removed[0].text(), "Hello");
        assert_eq!(container.text(), "world");
        assert_eq!(container.paragraphs()[0].base.range, TextRange::new(0, 6));
    }

    #[test]
    fn nested_paths_resolve() {
        let mut container = two_paragraphs();
        let mut next = 1;
        let table = TableObject::new(2, 2, || {
            next += 1;
            ContainerId(next)
        });
        let boxed = BoxObject::new(Container::with_empty_paragraph(ContainerId(40)));
        let mut para = Paragraph::new(TextAttr::new());
        para.children.push(InlineObject::Table(table));
        para.children.push(InlineObject::Box(boxed));
        container.splice_paragraphs(2, 0, vec![para]).unwrap();

        let cell = container.find_path(ContainerId(5)).unwrap();
        assert_eq!(cell.steps()[0].cell, Some((1, 1)));
        assert_eq!(container.resolve(&cell).map(|c| c.id), Some(ContainerId(5)));

        let boxed = container.find_path(ContainerId(40)).unwrap();
        assert_eq!(boxed.to_string(), "root/2.1");
        assert_eq!(container.max_id(), ContainerId(40));
        assert_eq!(container.resolve(&boxed.parent().unwrap()).map(|c| c.id), Some(ContainerId::ROOT));
    }
}
