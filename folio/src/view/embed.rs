// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Views of images and embedded components.

use alloc::sync::Arc;

use folio_document::{Embedded, Extent, NodeId, NodeKind};

use super::paragraph::Piece;
use super::{LayoutContext, ViewId, ViewTree};
use crate::geometry::{Bounds, Size};
use crate::host::ViewHost;
use crate::surface::PaintSurface;

fn content<'a>(cx: &LayoutContext<'a>, node: NodeId) -> Option<&'a Arc<dyn Embedded>> {
    match cx.document.kind(node)? {
        NodeKind::Image(content) | NodeKind::Component(content) => content.as_ref(),
        _ => None,
    }
}

fn size(cx: &LayoutContext<'_>, node: NodeId) -> Size {
    let extent = content(cx, node).map_or(Extent::default(), |c| c.size());
    Size::new(
        i32::try_from(extent.width).unwrap_or(i32::MAX),
        i32::try_from(extent.height).unwrap_or(i32::MAX),
    )
}

pub(super) fn measure(cx: &LayoutContext<'_>, node: NodeId) -> Piece {
    let size = size(cx, node);
    Piece {
        width: size.width,
        height: size.height,
        baseline: None,
        count: 1,
        forced: false,
    }
}

impl<H: ViewHost> ViewTree<H> {
    pub(super) fn layout_embed(&mut self, cx: &LayoutContext<'_>, id: ViewId) -> Size {
        self.node(id).map_or(Size::ZERO, |node| size(cx, node))
    }

    pub(super) fn paint_embed(&self, cx: &LayoutContext<'_>, id: ViewId, surface: &mut dyn PaintSurface) {
        let Some(node) = self.node(id) else {
            return;
        };
        if let Some(content) = content(cx, node) {
            surface.draw_embed(Bounds::from_size(self.bounds(id).size()), content);
        }
    }
}
