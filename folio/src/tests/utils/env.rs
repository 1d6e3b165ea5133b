// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec::Vec;

use folio_document::{Document, Embedded, Extent, Font, NodeChange, NodeId, NodeKind};

use crate::{
    Bounds, DisplayList, LayoutContext, MonospaceMeasure, Theme, ViewHost, ViewId, ViewTree,
};

/// Font size of the test theme. With the default [`MonospaceMeasure`] every
/// character is 5 pixels wide, the ascent is 8 and a row is 10 pixels high.
pub(crate) const FONT_SIZE: f32 = 10.0;

/// A host that records what reaches it.
#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
    pub(crate) invalidations: usize,
    pub(crate) repaints: Vec<Bounds>,
}

impl ViewHost for RecordingHost {
    fn invalidate(&mut self) {
        self.invalidations += 1;
    }

    fn repaint(&mut self, region: Bounds) {
        self.repaints.push(region);
    }
}

/// Embedded content with a fixed size.
#[derive(Debug)]
pub(crate) struct Picture(pub(crate) Extent);

impl Embedded for Picture {
    fn size(&self) -> Extent {
        self.0
    }
}

impl Picture {
    pub(crate) fn image(width: u32, height: u32) -> NodeKind {
        NodeKind::Image(Some(Arc::new(Self(Extent::new(width, height)))))
    }
}

pub(crate) struct TestEnv {
    pub(crate) document: Document,
    pub(crate) measure: MonospaceMeasure,
    pub(crate) theme: Theme,
    pub(crate) tree: ViewTree<RecordingHost>,
}

impl TestEnv {
    pub(crate) fn new() -> Self {
        Self {
            document: Document::new(),
            measure: MonospaceMeasure::default(),
            theme: Theme {
                font: Font::new("mono", FONT_SIZE),
                ..Theme::default()
            },
            tree: ViewTree::with_host(RecordingHost::default()),
        }
    }

    pub(crate) fn root_node(&self) -> NodeId {
        self.document.root()
    }

    /// Append a paragraph holding one text node to the document root.
    pub(crate) fn paragraph(&mut self, text: &str) -> NodeId {
        let root = self.document.root();
        self.document.append_paragraph(root, text).unwrap()
    }

    /// The first child of `node`.
    pub(crate) fn first_child(&self, node: NodeId) -> NodeId {
        self.document.children(node)[0]
    }

    pub(crate) fn install(&mut self) -> ViewId {
        self.tree.install(&self.document).unwrap()
    }

    pub(crate) fn root(&self) -> ViewId {
        self.tree.root().unwrap()
    }

    /// The primary view of `node`.
    pub(crate) fn view(&self, node: NodeId) -> ViewId {
        self.tree.view(node).unwrap()
    }

    pub(crate) fn layout(&mut self, break_width: i32) {
        let root = self.root();
        let cx = LayoutContext::new(&self.document, &self.measure, &self.theme);
        self.tree.layout(&cx, root, break_width);
    }

    /// Forward a document change to the tree.
    pub(crate) fn apply(&mut self, change: NodeChange) {
        self.tree.node_changed(&self.document, &change).unwrap();
    }

    pub(crate) fn paint(&self, surface: &mut DisplayList) {
        self.paint_selected(surface, 0..0);
    }

    pub(crate) fn paint_selected(&self, surface: &mut DisplayList, selection: core::ops::Range<usize>) {
        let cx = LayoutContext::new(&self.document, &self.measure, &self.theme)
            .with_selection(selection);
        self.tree.paint(&cx, self.root(), surface);
    }

    /// Characters presented by the document.
    pub(crate) fn character_count(&self) -> usize {
        self.document.character_count(self.document.root())
    }
}
