// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Behavior shared by views with children, and change propagation.

use alloc::vec::Vec;

use folio_document::{Document, NodeChange, StyleAttribute};
use peniko::Color;

use super::{LayoutContext, ViewId, ViewKind, ViewTree};
use crate::error::Error;
use crate::geometry::Bounds;
use crate::host::ViewHost;
use crate::style::effective_background;
use crate::surface::PaintSurface;

impl<H: ViewHost> ViewTree<H> {
    /// Index of the child holding the character at `offset`.
    ///
    /// The position after the last character belongs to the last child.
    pub(super) fn child_index_at(
        &self,
        document: &Document,
        children: &[ViewId],
        offset: usize,
    ) -> Option<usize> {
        let mut end = 0;
        for (index, &child) in children.iter().enumerate() {
            let start = self.offset(document, child);
            end = start + self.character_count(document, child);
            if offset >= start && offset < end {
                return Some(index);
            }
        }
        (offset == end).then(|| children.len().checked_sub(1)).flatten()
    }

    pub(super) fn element_character_bounds(
        &self,
        document: &Document,
        id: ViewId,
        children: &[ViewId],
        offset: usize,
    ) -> Option<Bounds> {
        let index = self.child_index_at(document, children, offset)?;
        let child = children[index];
        let bounds = self.bounds(child);
        let local = self.character_bounds(document, child, offset - self.offset(document, child))?;
        Some(
            local
                .translate(bounds.x, bounds.y)
                .intersect(&Bounds::from_size(self.bounds(id).size())),
        )
    }

    /// Paint the children of `id` that intersect the clip, each over the
    /// background the element inherits.
    pub(super) fn paint_children(
        &self,
        cx: &LayoutContext<'_>,
        id: ViewId,
        children: &[ViewId],
        surface: &mut dyn PaintSurface,
    ) {
        let Some(node) = self.node(id) else {
            return;
        };
        let paint_bounds = Bounds::from_size(self.bounds(id).size()).intersect(&surface.clip_bounds());
        let background = effective_background(cx.document, node);
        for &child in children {
            self.paint_child(cx, child, paint_bounds, background, surface);
        }
    }

    pub(super) fn paint_child(
        &self,
        cx: &LayoutContext<'_>,
        child: ViewId,
        paint_bounds: Bounds,
        background: Option<Color>,
        surface: &mut dyn PaintSurface,
    ) {
        let bounds = self.bounds(child);
        if !bounds.intersects(&paint_bounds) {
            return;
        }
        surface.save();
        if let Some(color) = background {
            surface.fill_rect(bounds, color);
        }
        surface.translate(bounds.x, bounds.y);
        surface.clip(Bounds::from_size(bounds.size()));
        self.paint(cx, child, surface);
        surface.restore();
    }

    /// Child offsets must tile the parent's characters without gaps.
    pub(super) fn check_children(&self, document: &Document, id: ViewId) {
        let Some(node) = self.node(id) else {
            return;
        };
        let mut expected = 0;
        for &child in self.children(id) {
            let offset = self.offset(document, child);
            debug_assert_eq!(offset, expected, "child views must be contiguous");
            if offset != expected {
                tracing::warn!(?child, offset, expected, "child views are not contiguous");
            }
            expected = offset + document.character_count(self.node(child).unwrap_or(node));
        }
        let count = document.character_count(node);
        debug_assert_eq!(expected, count, "child views must cover their parent");
        if expected != count {
            tracing::warn!(?id, expected, count, "child views do not cover their parent");
        }
    }

    /// Bring the views in line with a change of `document`.
    ///
    /// Changes to nodes without a view are ignored. Structural changes and text
    /// edits invalidate the layout up to the root; style changes repaint and, when
    /// they affect metrics, invalidate the styled subtree as well.
    pub fn node_changed(&mut self, document: &Document, change: &NodeChange) -> Result<(), Error> {
        let Some(view) = self.view(change.node()) else {
            tracing::trace!(node = ?change.node(), "change to a node without a view");
            return Ok(());
        };
        match change {
            NodeChange::NodeInserted { parent, index } => {
                let node = *document
                    .children(*parent)
                    .get(*index)
                    .ok_or_else(|| Error::unknown_node(*parent))?;
                self.insert_child(document, view, *index, node)?;
                tracing::debug!(?node, index, "view inserted");
                self.invalidate_up_tree(view);
            }
            NodeChange::NodesRemoved { index, removed, .. } => {
                let dropped: Vec<ViewId> = match self.views.get_mut(view).map(|v| &mut v.kind) {
                    Some(ViewKind::Span(span)) => span.child.take().into_iter().collect(),
                    Some(kind) => kind.children_mut().map_or_else(Vec::new, |children| {
                        let start = (*index).min(children.len());
                        let end = (start + removed.len()).min(children.len());
                        children.drain(start..end).collect()
                    }),
                    None => Vec::new(),
                };
                for child in dropped {
                    self.remove_view(child);
                }
                tracing::debug!(index, count = removed.len(), "views removed");
                self.invalidate_up_tree(view);
            }
            NodeChange::RangeInserted { node, .. } | NodeChange::RangeRemoved { node, .. } => {
                if let Some(ViewKind::Text(text)) = self.views.get_mut(view).map(|v| &mut v.kind) {
                    text.len = document.character_count(*node);
                }
                self.invalidate_up_tree(view);
            }
            NodeChange::StyleChanged { attribute, .. } => match attribute {
                StyleAttribute::Font
                | StyleAttribute::Foreground
                | StyleAttribute::Underline
                | StyleAttribute::Strikethrough => {
                    self.invalidate_down_tree(view);
                    self.invalidate_up_tree(view);
                    self.repaint_view(view);
                }
                StyleAttribute::Background => self.repaint_view(view),
                StyleAttribute::Alignment => self.invalidate_up_tree(view),
                StyleAttribute::ListStyle => {
                    for item in self.children(view).to_vec() {
                        if let Some(item) = self.views.get_mut(item) {
                            item.valid = false;
                        }
                    }
                    self.invalidate_up_tree(view);
                    self.repaint_view(view);
                }
            },
        }
        Ok(())
    }
}
