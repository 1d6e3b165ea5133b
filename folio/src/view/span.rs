// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Span views.
//!
//! A span carries style for its single inline child and takes the child's size.
//! When the child wraps, the span wraps with it: every continuation of the child
//! is wrapped in a continuation span, so styles keep applying on later rows.

use folio_document::{Document, NodeId};

use super::paragraph::{Piece, measure_inline};
use super::{LayoutContext, View, ViewId, ViewKind, ViewTree};
use crate::geometry::Size;
use crate::host::ViewHost;

#[derive(Clone, Debug, Default)]
pub(crate) struct SpanData {
    pub(crate) child: Option<ViewId>,
    pub(crate) next: Option<ViewId>,
}

pub(super) fn measure(
    cx: &LayoutContext<'_>,
    node: NodeId,
    start: usize,
    break_width: i32,
) -> (Piece, Option<usize>) {
    match cx.document.children(node).first() {
        Some(&child) => measure_inline(cx, child, start, break_width),
        None => (Piece::default(), None),
    }
}

impl<H: ViewHost> ViewTree<H> {
    pub(super) fn layout_span(&mut self, cx: &LayoutContext<'_>, id: ViewId, break_width: i32) -> Size {
        self.discard_chain(id);
        let Some(view) = self.views.get(id) else {
            return Size::ZERO;
        };
        let (node, parent) = (view.node, view.parent);
        let ViewKind::Span(SpanData {
            child: Some(child), ..
        }) = view.kind
        else {
            return Size::ZERO;
        };

        self.layout(cx, child, break_width);
        self.set_location(child, 0, 0);

        if let Some(rest) = self.next(child) {
            let start = self.offset(cx.document, rest);
            let wrapper = ViewKind::Span(SpanData {
                child: Some(rest),
                next: None,
            });
            let next = self.views.insert(View::new(node, parent, start, wrapper));
            if let Some(rest) = self.views.get_mut(rest) {
                rest.parent = Some(next);
            }
            if let Some(ViewKind::Span(span)) = self.views.get_mut(id).map(|v| &mut v.kind) {
                span.next = Some(next);
            }
        }
        self.bounds(child).size()
    }

    pub(super) fn span_insertion_point(
        &self,
        document: &Document,
        span: &SpanData,
        x: i32,
        y: i32,
    ) -> Option<usize> {
        let child = span.child?;
        let bounds = self.bounds(child);
        self.insertion_point(document, child, x - bounds.x, y - bounds.y)
    }
}
