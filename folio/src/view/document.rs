// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::{LayoutContext, ViewId, ViewTree};
use crate::geometry::Size;
use crate::host::ViewHost;

impl<H: ViewHost> ViewTree<H> {
    /// The root stacks its blocks from the top.
    pub(super) fn layout_document(&mut self, cx: &LayoutContext<'_>, id: ViewId, break_width: i32) -> Size {
        let children = self.children(id).to_vec();
        let size = self.layout_stack(cx, &children, 0, break_width);
        self.check_children(cx.document, id);
        size
    }
}
