// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical stacks of blocks.
//!
//! The document, lists and list items place their children top to bottom, each
//! at the full width the stack was given.

use folio_document::{Document, NodeId};

use super::{LayoutContext, ScrollDirection, ViewId, ViewTree, node_preferred_size};
use crate::geometry::Size;
use crate::host::ViewHost;

/// Size of `nodes` stacked at `x`, from the document alone.
pub(super) fn preferred_size(cx: &LayoutContext<'_>, nodes: &[NodeId], x: i32, break_width: i32) -> Size {
    let mut width = 0;
    let mut height: i32 = 0;
    for &node in nodes {
        let size = node_preferred_size(cx, node, 0, break_width);
        width = width.max(size.width);
        height = height.saturating_add(size.height);
    }
    Size::new(x.saturating_add(width), height)
}

impl<H: ViewHost> ViewTree<H> {
    /// Lay `children` out at `break_width` and stack them at `x`.
    pub(super) fn layout_stack(
        &mut self,
        cx: &LayoutContext<'_>,
        children: &[ViewId],
        x: i32,
        break_width: i32,
    ) -> Size {
        let mut width = 0;
        let mut height = 0;
        for &child in children {
            self.layout(cx, child, break_width);
            self.set_location(child, x, height);
            let size = self.bounds(child).size();
            width = width.max(size.width);
            height = height.saturating_add(size.height);
        }
        Size::new(x.saturating_add(width), height)
    }

    pub(super) fn stack_insertion_point(
        &self,
        document: &Document,
        children: &[ViewId],
        x: i32,
        y: i32,
    ) -> Option<usize> {
        let child = children.iter().copied().find(|&child| {
            let bounds = self.bounds(child);
            y >= bounds.y && y < bounds.bottom()
        })?;
        let bounds = self.bounds(child);
        let local = self.insertion_point(document, child, x - bounds.x, y - bounds.y)?;
        Some(self.offset(document, child) + local)
    }

    pub(super) fn stack_next_insertion_point(
        &self,
        document: &Document,
        id: ViewId,
        children: &[ViewId],
        x: i32,
        from: Option<usize>,
        direction: ScrollDirection,
    ) -> Option<usize> {
        let enter = |index: usize| {
            let child = children[index];
            let bounds = self.bounds(child);
            let local =
                self.next_insertion_point(document, child, x - bounds.x, None, direction)?;
            Some(self.offset(document, child) + local)
        };

        let Some(from) = from else {
            return match direction {
                ScrollDirection::Down => (0..children.len()).find_map(enter),
                ScrollDirection::Up => (0..children.len()).rev().find_map(enter),
            };
        };
        if from > self.character_count(document, id) {
            return None;
        }

        let index = self.child_index_at(document, children, from)?;
        let child = children[index];
        let bounds = self.bounds(child);
        let child_offset = self.offset(document, child);
        if let Some(local) = self.next_insertion_point(
            document,
            child,
            x - bounds.x,
            Some(from - child_offset),
            direction,
        ) {
            return Some(child_offset + local);
        }
        match direction {
            ScrollDirection::Down => (index + 1..children.len()).find_map(enter),
            ScrollDirection::Up => (0..index).rev().find_map(enter),
        }
    }

    pub(super) fn stack_row_at(
        &self,
        document: &Document,
        id: ViewId,
        children: &[ViewId],
        offset: usize,
    ) -> Option<usize> {
        if offset > self.character_count(document, id) {
            return None;
        }
        let index = self.child_index_at(document, children, offset)?;
        let child = children[index];
        let local = self.row_at(document, child, offset - self.offset(document, child))?;
        Some(self.stack_row_count(&children[..index]) + local)
    }

    pub(super) fn stack_row_count(&self, children: &[ViewId]) -> usize {
        children.iter().map(|&child| self.row_count(child)).sum()
    }
}
