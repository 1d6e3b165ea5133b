// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;

use peniko::Color;
use slotmap::SlotMap;

use crate::{
    BulletStyle, ElementStyle, Error, ErrorKind, Font, HorizontalAlignment, Node, NodeChange,
    NodeId, NodeKind, NumberStyle, StyleAttribute,
};

/// A tree of rich-text nodes with contiguous character offsets.
///
/// Nodes live in an arena and are addressed by [`NodeId`]. Nodes are created
/// detached with [`Document::create`] and become part of the content once they are
/// inserted below the root. After every mutation the character count of each
/// ancestor and the offsets of every following sibling are brought up to date, so
/// a node's range is always `offset..offset + character_count` within its parent
/// and the children of an element tile its range without gaps.
#[derive(Debug)]
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(NodeKind::Document));
        Self { nodes, root }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of characters in the document.
    pub fn len(&self) -> usize {
        self.nodes[self.root].character_count
    }

    /// Returns `true` if the document holds no characters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// The kind of a node.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id).map(Node::kind)
    }

    /// The parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    /// The children of a node; empty for leaves and unknown handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], Node::children)
    }

    /// Offset of a node relative to its parent; `0` for unknown handles.
    pub fn offset(&self, id: NodeId) -> usize {
        self.nodes.get(id).map_or(0, Node::offset)
    }

    /// Character count of a node; `0` for unknown handles.
    pub fn character_count(&self, id: NodeId) -> usize {
        self.nodes.get(id).map_or(0, Node::character_count)
    }

    /// Offset of a node relative to the start of the document.
    pub fn document_offset(&self, id: NodeId) -> usize {
        let mut offset = 0;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.nodes.get(id)) {
            offset += node.offset;
            current = node.parent;
        }
        offset
    }

    /// The text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id)?.text()
    }

    /// The style declared on a node.
    pub fn style(&self, id: NodeId) -> Option<&ElementStyle> {
        self.nodes.get(id).map(Node::style)
    }

    /// Iterate over a node and its ancestors, innermost first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        let mut current = Some(id);
        core::iter::from_fn(move || {
            let id = current?;
            let node = self.nodes.get(id)?;
            current = node.parent;
            Some((id, node))
        })
    }

    /// Create a detached node.
    ///
    /// The node does not contribute to the document until it is inserted.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.insert(Node::new(kind))
    }

    /// Insert the detached node `child` into `parent` at position `index`.
    pub fn insert(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<NodeChange, Error> {
        let parent_node = self
            .nodes
            .get(parent)
            .ok_or_else(|| Error::new(ErrorKind::UnknownNode, parent))?;
        if !parent_node.kind.is_element() {
            return Err(Error::new(ErrorKind::NotAnElement, parent));
        }
        if index > parent_node.children.len() {
            return Err(Error::index_out_of_bounds(
                parent,
                index,
                parent_node.children.len(),
            ));
        }
        let child_node = self
            .nodes
            .get(child)
            .ok_or_else(|| Error::new(ErrorKind::UnknownNode, child))?;
        if child_node.parent.is_some() || child == self.root {
            return Err(Error::new(ErrorKind::AlreadyAttached, child));
        }
        if self.ancestors(parent).any(|(id, _)| id == child) {
            return Err(Error::new(ErrorKind::Cycle, child));
        }

        let count = child_node.character_count;
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.insert(index, child);
        self.renumber_from(parent, index);
        self.grow_ancestors(parent, count as isize);

        Ok(NodeChange::NodeInserted { parent, index })
    }

    /// Append the detached node `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<NodeChange, Error> {
        let index = self.children(parent).len();
        self.insert(parent, index, child)
    }

    /// Remove `count` children of `parent` starting at `index`.
    ///
    /// The removed nodes and all of their descendants are dropped from the arena.
    pub fn remove(
        &mut self,
        parent: NodeId,
        index: usize,
        count: usize,
    ) -> Result<NodeChange, Error> {
        let parent_node = self
            .nodes
            .get(parent)
            .ok_or_else(|| Error::new(ErrorKind::UnknownNode, parent))?;
        let len = parent_node.children.len();
        let end = index.saturating_add(count);
        if end > len {
            return Err(Error::index_out_of_bounds(parent, end, len));
        }

        let removed: Vec<NodeId> = self.nodes[parent].children.drain(index..end).collect();
        let mut removed_characters = 0;
        for &id in &removed {
            removed_characters += self.nodes[id].character_count;
            self.free_subtree(id);
        }
        self.renumber_from(parent, index);
        self.grow_ancestors(parent, -(removed_characters as isize));

        Ok(NodeChange::NodesRemoved {
            parent,
            index,
            removed,
        })
    }

    /// Insert `text` into the text node `node` before character `offset`.
    pub fn insert_text(
        &mut self,
        node: NodeId,
        offset: usize,
        text: &str,
    ) -> Result<NodeChange, Error> {
        let current = self.text_mut(node)?;
        let len = current.chars().count();
        if offset > len {
            return Err(Error::range_out_of_bounds(node, offset, len));
        }
        let byte = byte_index(current, offset);
        current.insert_str(byte, text);
        let count = text.chars().count();

        self.nodes[node].character_count += count;
        self.after_resize(node, count as isize);

        Ok(NodeChange::RangeInserted {
            node,
            offset,
            count,
        })
    }

    /// Remove `count` characters from the text node `node` starting at `offset`.
    pub fn remove_text(
        &mut self,
        node: NodeId,
        offset: usize,
        count: usize,
    ) -> Result<NodeChange, Error> {
        let current = self.text_mut(node)?;
        let len = current.chars().count();
        let end = offset.saturating_add(count);
        if end > len {
            return Err(Error::range_out_of_bounds(node, end, len));
        }
        let start_byte = byte_index(current, offset);
        let end_byte = byte_index(current, end);
        current.replace_range(start_byte..end_byte, "");

        self.nodes[node].character_count -= count;
        self.after_resize(node, -(count as isize));

        Ok(NodeChange::RangeRemoved {
            node,
            offset,
            count,
        })
    }

    /// Declare (or clear) the font of an element.
    pub fn set_font(&mut self, node: NodeId, font: Option<Font>) -> Result<NodeChange, Error> {
        self.element_style_mut(node)?.font = font;
        Ok(style_changed(node, StyleAttribute::Font))
    }

    /// Declare (or clear) the text color of an element.
    pub fn set_foreground(
        &mut self,
        node: NodeId,
        color: Option<Color>,
    ) -> Result<NodeChange, Error> {
        self.element_style_mut(node)?.foreground = color;
        Ok(style_changed(node, StyleAttribute::Foreground))
    }

    /// Declare (or clear) the background color of an element.
    pub fn set_background(
        &mut self,
        node: NodeId,
        color: Option<Color>,
    ) -> Result<NodeChange, Error> {
        self.element_style_mut(node)?.background = color;
        Ok(style_changed(node, StyleAttribute::Background))
    }

    /// Turn underlining of an element's text on or off.
    pub fn set_underline(&mut self, node: NodeId, underline: bool) -> Result<NodeChange, Error> {
        self.element_style_mut(node)?.underline = underline;
        Ok(style_changed(node, StyleAttribute::Underline))
    }

    /// Turn striking through of an element's text on or off.
    pub fn set_strikethrough(
        &mut self,
        node: NodeId,
        strikethrough: bool,
    ) -> Result<NodeChange, Error> {
        self.element_style_mut(node)?.strikethrough = strikethrough;
        Ok(style_changed(node, StyleAttribute::Strikethrough))
    }

    /// Set the row alignment of a paragraph.
    pub fn set_alignment(
        &mut self,
        node: NodeId,
        alignment: HorizontalAlignment,
    ) -> Result<NodeChange, Error> {
        self.element_style_mut(node)?.alignment = alignment;
        Ok(style_changed(node, StyleAttribute::Alignment))
    }

    /// Change the ordinal format of a numbered list.
    pub fn set_number_style(
        &mut self,
        node: NodeId,
        style: NumberStyle,
    ) -> Result<NodeChange, Error> {
        let entry = self
            .nodes
            .get_mut(node)
            .ok_or_else(|| Error::new(ErrorKind::UnknownNode, node))?;
        match &mut entry.kind {
            NodeKind::NumberedList(current) => *current = style,
            _ => return Err(Error::new(ErrorKind::NotAList, node)),
        }
        Ok(style_changed(node, StyleAttribute::ListStyle))
    }

    /// Change the glyph of a bulleted list.
    pub fn set_bullet_style(
        &mut self,
        node: NodeId,
        style: BulletStyle,
    ) -> Result<NodeChange, Error> {
        let entry = self
            .nodes
            .get_mut(node)
            .ok_or_else(|| Error::new(ErrorKind::UnknownNode, node))?;
        match &mut entry.kind {
            NodeKind::BulletedList(current) => *current = style,
            _ => return Err(Error::new(ErrorKind::NotAList, node)),
        }
        Ok(style_changed(node, StyleAttribute::ListStyle))
    }

    /// Convenience for building content: create a node of `kind` and append it
    /// to `parent`, returning the new node.
    pub fn append_new(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId, Error> {
        let id = self.create(kind);
        match self.append(parent, id) {
            Ok(_) => Ok(id),
            Err(err) => {
                self.nodes.remove(id);
                Err(err)
            }
        }
    }

    /// Convenience for building content: append a paragraph holding a single
    /// text node to `parent`, returning the paragraph.
    pub fn append_paragraph(
        &mut self,
        parent: NodeId,
        text: impl Into<String>,
    ) -> Result<NodeId, Error> {
        let paragraph = self.append_new(parent, NodeKind::Paragraph)?;
        self.append_new(paragraph, NodeKind::Text(text.into()))?;
        Ok(paragraph)
    }

    fn text_mut(&mut self, node: NodeId) -> Result<&mut String, Error> {
        let entry = self
            .nodes
            .get_mut(node)
            .ok_or_else(|| Error::new(ErrorKind::UnknownNode, node))?;
        match &mut entry.kind {
            NodeKind::Text(text) => Ok(text),
            _ => Err(Error::new(ErrorKind::NotText, node)),
        }
    }

    fn element_style_mut(&mut self, node: NodeId) -> Result<&mut ElementStyle, Error> {
        let entry = self
            .nodes
            .get_mut(node)
            .ok_or_else(|| Error::new(ErrorKind::UnknownNode, node))?;
        if !entry.kind.is_element() {
            return Err(Error::new(ErrorKind::NotAnElement, node));
        }
        Ok(&mut entry.style)
    }

    /// Propagate a change of `node`'s own character count to its siblings and ancestors.
    fn after_resize(&mut self, node: NodeId, delta: isize) {
        let Some(parent) = self.nodes[node].parent else {
            return;
        };
        let index = self.nodes[parent]
            .children
            .iter()
            .position(|&c| c == node)
            .unwrap_or(0);
        self.renumber_from(parent, index + 1);
        self.grow_ancestors(parent, delta);
    }

    /// Recompute the offsets of the children of `parent` from position `index` on.
    fn renumber_from(&mut self, parent: NodeId, index: usize) {
        let children = core::mem::take(&mut self.nodes[parent].children);
        let mut offset = match index.checked_sub(1).and_then(|i| children.get(i)) {
            Some(&prev) => self.nodes[prev].offset + self.nodes[prev].character_count,
            None => 0,
        };
        for &child in &children[index.min(children.len())..] {
            let node = &mut self.nodes[child];
            node.offset = offset;
            offset += node.character_count;
        }
        self.nodes[parent].children = children;
    }

    /// Add `delta` to the character count of `element` and every ancestor, shifting
    /// the siblings that follow each of them.
    fn grow_ancestors(&mut self, element: NodeId, delta: isize) {
        if delta == 0 {
            return;
        }
        let mut current = element;
        loop {
            let node = &mut self.nodes[current];
            node.character_count = node.character_count.saturating_add_signed(delta);
            let Some(parent) = node.parent else {
                break;
            };
            let index = self.nodes[parent]
                .children
                .iter()
                .position(|&c| c == current)
                .unwrap_or(0);
            self.renumber_from(parent, index + 1);
            current = parent;
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut pending = alloc::vec![id];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.remove(id) {
                pending.extend(node.children);
            }
        }
    }
}

fn style_changed(node: NodeId, attribute: StyleAttribute) -> NodeChange {
    NodeChange::StyleChanged { node, attribute }
}

/// Byte index of the character at `offset`, or the length of `text` past the end.
fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(byte, _)| byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn assert_contiguous(doc: &Document, element: NodeId) {
        let mut expected = 0;
        for &child in doc.children(element) {
            assert_eq!(doc.offset(child), expected, "child offsets must be contiguous");
            expected += doc.character_count(child);
            assert_contiguous(doc, child);
        }
        if doc.kind(element).is_some_and(NodeKind::is_element) {
            assert_eq!(
                doc.character_count(element),
                expected,
                "element count must be the sum of its children"
            );
        }
    }

    #[test]
    fn counts_and_offsets_follow_insertion() {
        let mut doc = Document::new();
        let root = doc.root();
        let first = doc.append_paragraph(root, "Hello").unwrap();
        let second = doc.append_paragraph(root, "world!").unwrap();

        assert_eq!(doc.len(), 11);
        assert_eq!(doc.offset(first), 0);
        assert_eq!(doc.offset(second), 5);
        assert_eq!(doc.document_offset(doc.children(second)[0]), 5);
        assert_contiguous(&doc, root);
    }

    #[test]
    fn text_edits_shift_following_siblings() {
        let mut doc = Document::new();
        let root = doc.root();
        let first = doc.append_paragraph(root, "abc").unwrap();
        let second = doc.append_paragraph(root, "def").unwrap();
        let text = doc.children(first)[0];

        let change = doc.insert_text(text, 1, "xyz").unwrap();
        assert_eq!(
            change,
            NodeChange::RangeInserted {
                node: text,
                offset: 1,
                count: 3
            }
        );
        assert_eq!(doc.text(text), Some("axyzbc"));
        assert_eq!(doc.offset(second), 6);

        doc.remove_text(text, 0, 4).unwrap();
        assert_eq!(doc.text(text), Some("bc"));
        assert_eq!(doc.offset(second), 2);
        assert_eq!(doc.len(), 5);
        assert_contiguous(&doc, root);
    }

    #[test]
    fn multibyte_text_counts_scalar_values() {
        let mut doc = Document::new();
        let root = doc.root();
        let paragraph = doc.append_paragraph(root, "héllo wörld").unwrap();
        assert_eq!(doc.character_count(paragraph), 11);

        let text = doc.children(paragraph)[0];
        doc.insert_text(text, 11, " ✓").unwrap();
        assert_eq!(doc.text(text).map(ToString::to_string).as_deref(), Some("héllo wörld ✓"));
        assert_eq!(doc.len(), 13);
    }

    #[test]
    fn removal_frees_subtrees() {
        let mut doc = Document::new();
        let root = doc.root();
        let first = doc.append_paragraph(root, "one").unwrap();
        let text = doc.children(first)[0];
        let second = doc.append_paragraph(root, "two").unwrap();

        let change = doc.remove(root, 0, 1).unwrap();
        assert_eq!(
            change,
            NodeChange::NodesRemoved {
                parent: root,
                index: 0,
                removed: alloc::vec![first],
            }
        );
        assert!(!doc.contains(first));
        assert!(!doc.contains(text));
        assert_eq!(doc.offset(second), 0);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn structural_errors() {
        let mut doc = Document::new();
        let root = doc.root();
        let paragraph = doc.append_paragraph(root, "text").unwrap();
        let text = doc.children(paragraph)[0];

        let orphan = doc.create(NodeKind::Paragraph);
        assert_eq!(
            doc.insert(text, 0, orphan).unwrap_err().kind(),
            ErrorKind::NotAnElement
        );
        assert_eq!(
            doc.insert(root, 5, orphan).unwrap_err().kind(),
            ErrorKind::IndexOutOfBounds
        );
        assert_eq!(
            doc.insert(root, 0, paragraph).unwrap_err().kind(),
            ErrorKind::AlreadyAttached
        );
        assert_eq!(
            doc.remove_text(text, 2, 5).unwrap_err().kind(),
            ErrorKind::RangeOutOfBounds
        );
        assert_eq!(
            doc.set_number_style(paragraph, NumberStyle::UpperRoman)
                .unwrap_err()
                .kind(),
            ErrorKind::NotAList
        );

        let err = doc.remove(root, 0, 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexOutOfBounds);
        let msg = alloc::format!("{err}");
        assert!(msg.contains("out of bounds"), "unexpected message: {msg}");
    }

    #[test]
    fn cycles_are_rejected() {
        let mut doc = Document::new();
        let root = doc.root();
        let list = doc
            .append_new(root, NodeKind::NumberedList(NumberStyle::Decimal))
            .unwrap();
        let item = doc.create(NodeKind::ListItem);
        doc.append(list, item).unwrap();

        let detached = doc.create(NodeKind::ListItem);
        let inner = doc.create(NodeKind::Paragraph);
        doc.append(detached, inner).unwrap();
        assert_eq!(
            doc.insert(inner, 0, detached).unwrap_err().kind(),
            ErrorKind::Cycle
        );
    }

    #[test]
    fn style_changes_report_their_attribute() {
        let mut doc = Document::new();
        let root = doc.root();
        let list = doc
            .append_new(root, NodeKind::BulletedList(BulletStyle::CircleFilled))
            .unwrap();

        let change = doc.set_bullet_style(list, BulletStyle::SquareOutline).unwrap();
        assert_eq!(
            change,
            NodeChange::StyleChanged {
                node: list,
                attribute: StyleAttribute::ListStyle
            }
        );
        assert!(matches!(
            doc.kind(list),
            Some(NodeKind::BulletedList(BulletStyle::SquareOutline))
        ));

        let change = doc.set_underline(list, true).unwrap();
        assert_eq!(change.node(), list);
        assert!(doc.style(list).is_some_and(|s| s.underline));
    }
}
