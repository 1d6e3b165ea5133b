// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The view tree.
//!
//! A [`ViewTree`] mirrors a [`Document`] with one view per presented node, plus
//! the continuation views produced when inline content wraps across rows. Views
//! live in an arena and refer to each other by [`ViewId`]; parents own their
//! children and children only look up their parent.
//!
//! Every view caches its geometry for the last break width it was laid out with.
//! Laying a valid view out again with the same break width does nothing. Changes
//! to the document mark the affected views invalid up to the root, and the next
//! layout pass recomputes only what was invalidated.

mod document;
mod element;
mod embed;
mod list;
mod paragraph;
mod span;
mod stack;
mod text;

use alloc::vec::Vec;
use core::ops::Range;

use folio_document::{Document, NodeId, NodeKind};
use hashbrown::HashMap;
use slotmap::SlotMap;

use crate::error::Error;
use crate::geometry::{Bounds, Point, Size};
use crate::host::ViewHost;
use crate::measure::TextMeasure;
use crate::style::Theme;
use crate::surface::PaintSurface;

use self::list::{ItemData, ListData};
use self::paragraph::{ParagraphData, Piece};
use self::span::SpanData;
use self::text::TextData;

pub(crate) use self::paragraph::TERMINATOR_WIDTH;

slotmap::new_key_type! {
    /// Handle to a view of a [`ViewTree`].
    pub struct ViewId;
}

/// Vertical direction of caret navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Towards the previous row.
    Up,
    /// Towards the next row.
    Down,
}

/// Everything a layout or paint pass reads besides the views themselves.
pub struct LayoutContext<'a> {
    /// The document being presented.
    pub document: &'a Document,
    /// Glyph advances and font metrics.
    pub measure: &'a dyn TextMeasure,
    /// Fallback font and colors.
    pub theme: &'a Theme,
    /// The selected range in document offsets; empty when nothing is selected.
    pub selection: Range<usize>,
}

impl<'a> LayoutContext<'a> {
    /// Create a context without a selection.
    pub fn new(document: &'a Document, measure: &'a dyn TextMeasure, theme: &'a Theme) -> Self {
        Self {
            document,
            measure,
            theme,
            selection: 0..0,
        }
    }

    /// Returns this context with the given selection.
    #[must_use]
    pub fn with_selection(mut self, selection: Range<usize>) -> Self {
        self.selection = selection;
        self
    }
}

impl core::fmt::Debug for LayoutContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutContext")
            .field("theme", &self.theme)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct View {
    pub(crate) node: NodeId,
    pub(crate) parent: Option<ViewId>,
    pub(crate) bounds: Bounds,
    pub(crate) break_width: Option<i32>,
    pub(crate) valid: bool,
    pub(crate) layout_passes: u32,
    /// Characters of the node presented by preceding continuation views.
    pub(crate) start: usize,
    pub(crate) kind: ViewKind,
}

impl View {
    fn new(node: NodeId, parent: Option<ViewId>, start: usize, kind: ViewKind) -> Self {
        Self {
            node,
            parent,
            bounds: Bounds::EMPTY,
            break_width: None,
            valid: false,
            layout_passes: 0,
            start,
            kind,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum ViewKind {
    Document(Vec<ViewId>),
    Paragraph(ParagraphData),
    Span(SpanData),
    Text(TextData),
    List(ListData),
    ListItem(ItemData),
    Embed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ViewClass {
    Document,
    Paragraph,
    Span,
    Text,
    List,
    ListItem,
    Embed,
}

impl ViewKind {
    fn class(&self) -> ViewClass {
        match self {
            Self::Document(_) => ViewClass::Document,
            Self::Paragraph(_) => ViewClass::Paragraph,
            Self::Span(_) => ViewClass::Span,
            Self::Text(_) => ViewClass::Text,
            Self::List(_) => ViewClass::List,
            Self::ListItem(_) => ViewClass::ListItem,
            Self::Embed => ViewClass::Embed,
        }
    }

    fn children(&self) -> &[ViewId] {
        match self {
            Self::Document(children) => children,
            Self::Paragraph(paragraph) => &paragraph.children,
            Self::List(list) => &list.children,
            Self::ListItem(item) => &item.children,
            Self::Span(span) => span.child.as_slice(),
            Self::Text(_) | Self::Embed => &[],
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<ViewId>> {
        match self {
            Self::Document(children) => Some(children),
            Self::Paragraph(paragraph) => Some(&mut paragraph.children),
            Self::List(list) => Some(&mut list.children),
            Self::ListItem(item) => Some(&mut item.children),
            Self::Span(_) | Self::Text(_) | Self::Embed => None,
        }
    }

    fn next(&self) -> Option<ViewId> {
        match self {
            Self::Text(text) => text.next,
            Self::Span(span) => span.next,
            _ => None,
        }
    }

    fn take_next(&mut self) -> Option<ViewId> {
        match self {
            Self::Text(text) => text.next.take(),
            Self::Span(span) => span.next.take(),
            _ => None,
        }
    }
}

/// Returns `true` if a node of kind `child` may be presented inside `parent`.
fn accepts(parent: &NodeKind, child: &NodeKind) -> bool {
    match parent {
        NodeKind::Document | NodeKind::ListItem => matches!(
            child,
            NodeKind::Paragraph | NodeKind::BulletedList(_) | NodeKind::NumberedList(_)
        ),
        NodeKind::BulletedList(_) | NodeKind::NumberedList(_) => {
            matches!(child, NodeKind::ListItem)
        }
        NodeKind::Paragraph | NodeKind::Span => matches!(
            child,
            NodeKind::Text(_) | NodeKind::Span | NodeKind::Image(_) | NodeKind::Component(_)
        ),
        NodeKind::Text(_) | NodeKind::Image(_) | NodeKind::Component(_) => false,
    }
}

/// Preferred size of `node` (from character `start` on) for a hypothetical break
/// width, computed from the document alone.
fn node_preferred_size(cx: &LayoutContext<'_>, node: NodeId, start: usize, break_width: i32) -> Size {
    match cx.document.kind(node) {
        None => Size::ZERO,
        Some(NodeKind::Document) => {
            stack::preferred_size(cx, cx.document.children(node), 0, break_width)
        }
        Some(NodeKind::Paragraph) => paragraph::preferred_size(cx, node, break_width),
        Some(NodeKind::BulletedList(_) | NodeKind::NumberedList(_)) => {
            list::preferred_size(cx, node, break_width)
        }
        Some(NodeKind::ListItem) => list::item_preferred_size(cx, node, break_width),
        Some(NodeKind::Span | NodeKind::Text(_) | NodeKind::Image(_) | NodeKind::Component(_)) => {
            let (piece, _) = paragraph::measure_inline(cx, node, start, break_width);
            Size::new(piece.width, piece.height)
        }
    }
}

/// An arena of views mirroring a document.
///
/// `H` receives the invalidation and repaint requests that reach the root.
#[derive(Debug)]
pub struct ViewTree<H = ()> {
    views: SlotMap<ViewId, View>,
    primary: HashMap<NodeId, ViewId>,
    root: Option<ViewId>,
    origin: Point,
    host: H,
}

impl ViewTree {
    /// Create an empty tree without a host.
    pub fn new() -> Self {
        Self::with_host(())
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ViewHost> ViewTree<H> {
    /// Create an empty tree reporting to `host`.
    pub fn with_host(host: H) -> Self {
        Self {
            views: SlotMap::with_key(),
            primary: HashMap::new(),
            root: None,
            origin: Point::ZERO,
            host,
        }
    }

    /// The host receiving invalidation and repaint requests.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Position of the root view in host coordinates.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Move the root view within the host. Repaint regions are offset by `origin`.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Present `document`, replacing whatever the tree presented before.
    pub fn install(&mut self, document: &Document) -> Result<ViewId, Error> {
        if let Some(root) = self.root.take() {
            self.remove_view(root);
        }
        let root = self.attach_node(document, document.root(), None)?;
        self.root = Some(root);
        tracing::debug!(views = self.views.len(), "installed document");
        self.host.invalidate();
        Ok(root)
    }

    /// Create a parentless view subtree for `node`.
    ///
    /// Fails if the node is unknown or its subtree nests kinds that cannot be
    /// presented; nothing is left behind in that case.
    pub fn attach(&mut self, document: &Document, node: NodeId) -> Result<ViewId, Error> {
        self.attach_node(document, node, None)
    }

    /// Drop a view, its subtree and its continuation views.
    ///
    /// Detaching a child view leaves a gap in its parent; use it on views created
    /// with [`attach`](Self::attach) or on the root.
    pub fn detach(&mut self, view: ViewId) {
        if self.root == Some(view) {
            self.root = None;
        }
        if let Some(parent) = self.views.get(view).and_then(|v| v.parent) {
            if let Some(children) = self.views.get_mut(parent).and_then(|p| p.kind.children_mut()) {
                children.retain(|&c| c != view);
            }
        }
        self.remove_view(view);
    }

    /// The root view, once a document is installed.
    pub fn root(&self) -> Option<ViewId> {
        self.root
    }

    /// The view presenting `node`. For wrapped content this is the first piece.
    pub fn view(&self, node: NodeId) -> Option<ViewId> {
        self.primary.get(&node).copied()
    }

    /// Returns `true` if `id` refers to a live view.
    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(id)
    }

    /// Number of live views, continuation views included.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns `true` if the tree holds no views.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// The node presented by a view.
    pub fn node(&self, id: ViewId) -> Option<NodeId> {
        self.views.get(id).map(|v| v.node)
    }

    /// The parent of a view.
    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.views.get(id)?.parent
    }

    /// Child views of a view, in document order. Continuation views are not
    /// children; reach them with [`next`](Self::next).
    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.views.get(id).map_or(&[], |v| v.kind.children())
    }

    /// The continuation of a wrapped text or span view.
    pub fn next(&self, id: ViewId) -> Option<ViewId> {
        self.views.get(id)?.kind.next()
    }

    /// Bounds of a view in its parent's coordinates.
    pub fn bounds(&self, id: ViewId) -> Bounds {
        self.views.get(id).map_or(Bounds::EMPTY, |v| v.bounds)
    }

    /// Returns `true` if the cached layout of a view is current.
    pub fn is_valid(&self, id: ViewId) -> bool {
        self.views.get(id).is_some_and(|v| v.valid)
    }

    /// The break width of the last layout; `None` before the first.
    pub fn break_width(&self, id: ViewId) -> Option<i32> {
        self.views.get(id)?.break_width
    }

    /// How often the layout of a view was actually recomputed.
    pub fn layout_passes(&self, id: ViewId) -> u32 {
        self.views.get(id).map_or(0, |v| v.layout_passes)
    }

    /// Distance from the top of an inline view to its baseline.
    ///
    /// `None` for views without one (blocks and embedded content).
    pub fn baseline(&self, id: ViewId) -> Option<i32> {
        let view = self.views.get(id)?;
        match &view.kind {
            ViewKind::Text(text) => Some(text.baseline()),
            ViewKind::Span(span) => self.baseline(span.child?),
            _ => None,
        }
    }

    /// Offset of the first character of a view relative to its parent.
    pub fn offset(&self, document: &Document, id: ViewId) -> usize {
        self.views
            .get(id)
            .map_or(0, |v| document.offset(v.node) + v.start)
    }

    /// Number of characters presented by a view.
    pub fn character_count(&self, document: &Document, id: ViewId) -> usize {
        let Some(view) = self.views.get(id) else {
            return 0;
        };
        match &view.kind {
            ViewKind::Text(text) => text.len,
            ViewKind::Span(span) => span
                .child
                .map_or(0, |child| self.character_count(document, child)),
            ViewKind::Embed => 1,
            _ => document.character_count(view.node),
        }
    }

    /// Offset of the first character of a view from the start of the document.
    pub fn document_offset(&self, document: &Document, id: ViewId) -> usize {
        self.views
            .get(id)
            .map_or(0, |v| document.document_offset(v.node) + v.start)
    }

    /// Lay a view out for `break_width`.
    ///
    /// Does nothing if the view is valid and was last laid out with the same break
    /// width. Otherwise the view recomputes its geometry, laying out its children
    /// as needed, and becomes valid.
    pub fn layout(&mut self, cx: &LayoutContext<'_>, id: ViewId, break_width: i32) {
        let Some(view) = self.views.get(id) else {
            return;
        };
        if view.valid && view.break_width == Some(break_width) {
            tracing::trace!(?id, break_width, "layout is current");
            return;
        }

        let size = match view.kind.class() {
            ViewClass::Document => self.layout_document(cx, id, break_width),
            ViewClass::Paragraph => self.layout_paragraph(cx, id, break_width),
            ViewClass::Span => self.layout_span(cx, id, break_width),
            ViewClass::Text => self.layout_text(cx, id, break_width),
            ViewClass::List => self.layout_list(cx, id, break_width),
            ViewClass::ListItem => self.layout_list_item(cx, id, break_width),
            ViewClass::Embed => self.layout_embed(cx, id),
        };
        self.set_size(id, size);

        if let Some(view) = self.views.get_mut(id) {
            view.valid = true;
            view.break_width = Some(break_width);
            view.layout_passes += 1;
            tracing::trace!(?id, break_width, ?size, "laid out");
        }
    }

    /// Size a view would take for `break_width`, without touching any cached state.
    pub fn preferred_size(&self, cx: &LayoutContext<'_>, id: ViewId, break_width: i32) -> Size {
        self.views.get(id).map_or(Size::ZERO, |view| {
            node_preferred_size(cx, view.node, view.start, break_width)
        })
    }

    /// Draw a view into `surface`, whose origin is the top left corner of the view.
    ///
    /// The view must have been laid out.
    pub fn paint(&self, cx: &LayoutContext<'_>, id: ViewId, surface: &mut dyn PaintSurface) {
        let Some(view) = self.views.get(id) else {
            return;
        };
        match view.kind.class() {
            ViewClass::Document | ViewClass::List | ViewClass::Span => {
                self.paint_children(cx, id, view.kind.children(), surface);
            }
            ViewClass::Paragraph => self.paint_paragraph(cx, id, surface),
            ViewClass::ListItem => self.paint_list_item(cx, id, surface),
            ViewClass::Text => self.paint_text(cx, id, surface),
            ViewClass::Embed => self.paint_embed(cx, id, surface),
        }
    }

    /// The character offset under a point in the view's coordinates.
    ///
    /// Returns an offset in `0..character_count`, or `None` when the point is not
    /// over content.
    pub fn insertion_point(&self, document: &Document, id: ViewId, x: i32, y: i32) -> Option<usize> {
        let view = self.views.get(id)?;
        match &view.kind {
            ViewKind::Document(children) => self.stack_insertion_point(document, children, x, y),
            ViewKind::List(list) => self.stack_insertion_point(document, &list.children, x, y),
            ViewKind::ListItem(item) => self.stack_insertion_point(document, &item.children, x, y),
            ViewKind::Paragraph(paragraph) => {
                self.paragraph_insertion_point(document, paragraph, x, y)
            }
            ViewKind::Span(span) => self.span_insertion_point(document, span, x, y),
            ViewKind::Text(text) => text.insertion_point(x),
            ViewKind::Embed => Some(0),
        }
    }

    /// The caret position reached by moving from `from` to the adjacent row in
    /// `direction`, keeping the caret near `x`.
    ///
    /// With `from` set to `None` the caret enters the view from the edge opposite
    /// to `direction`: from the top when moving down, from the bottom when moving
    /// up. Returns `None` when the move leaves the view.
    pub fn next_insertion_point(
        &self,
        document: &Document,
        id: ViewId,
        x: i32,
        from: Option<usize>,
        direction: ScrollDirection,
    ) -> Option<usize> {
        let view = self.views.get(id)?;
        match &view.kind {
            ViewKind::Document(children) => {
                self.stack_next_insertion_point(document, id, children, x, from, direction)
            }
            ViewKind::List(list) => {
                self.stack_next_insertion_point(document, id, &list.children, x, from, direction)
            }
            ViewKind::ListItem(item) => {
                self.stack_next_insertion_point(document, id, &item.children, x, from, direction)
            }
            ViewKind::Paragraph(paragraph) => {
                self.paragraph_next_insertion_point(document, paragraph, x, from, direction)
            }
            ViewKind::Span(span) => {
                let child = span.child?;
                let bounds = self.bounds(child);
                self.next_insertion_point(document, child, x - bounds.x, from, direction)
            }
            ViewKind::Text(text) => match from {
                None => text.insertion_point_within(x),
                Some(_) => None,
            },
            ViewKind::Embed => match from {
                None => Some(0),
                Some(_) => None,
            },
        }
    }

    /// The row holding the character at `offset`.
    pub fn row_at(&self, document: &Document, id: ViewId, offset: usize) -> Option<usize> {
        let view = self.views.get(id)?;
        match &view.kind {
            ViewKind::Document(children) => self.stack_row_at(document, id, children, offset),
            ViewKind::List(list) => self.stack_row_at(document, id, &list.children, offset),
            ViewKind::ListItem(item) => self.stack_row_at(document, id, &item.children, offset),
            ViewKind::Paragraph(paragraph) => paragraph.row_at(offset),
            ViewKind::Span(_) | ViewKind::Text(_) | ViewKind::Embed => None,
        }
    }

    /// Number of rows presented by a view. Inline views have none.
    pub fn row_count(&self, id: ViewId) -> usize {
        let Some(view) = self.views.get(id) else {
            return 0;
        };
        match &view.kind {
            ViewKind::Document(children) => self.stack_row_count(children),
            ViewKind::List(list) => self.stack_row_count(&list.children),
            ViewKind::ListItem(item) => self.stack_row_count(&item.children),
            ViewKind::Paragraph(paragraph) => paragraph.row_count(),
            ViewKind::Span(_) | ViewKind::Text(_) | ViewKind::Embed => 0,
        }
    }

    /// Bounds of the character at `offset`, in the view's coordinates.
    ///
    /// `offset` may equal the character count, which resolves to the position
    /// just after the last character.
    pub fn character_bounds(&self, document: &Document, id: ViewId, offset: usize) -> Option<Bounds> {
        let view = self.views.get(id)?;
        match &view.kind {
            ViewKind::Paragraph(paragraph) => {
                self.paragraph_character_bounds(document, view, paragraph, offset)
            }
            ViewKind::Text(text) => text.character_bounds(offset, view.bounds.height),
            ViewKind::Embed => (offset == 0).then_some(Bounds::from_size(view.bounds.size())),
            ViewKind::Span(span) => {
                let child = span.child?;
                let bounds = self.bounds(child);
                let local = self.character_bounds(document, child, offset)?;
                Some(
                    local
                        .translate(bounds.x, bounds.y)
                        .intersect(&Bounds::from_size(view.bounds.size())),
                )
            }
            kind => self.element_character_bounds(document, id, kind.children(), offset),
        }
    }

    /// Mark a view and all of its ancestors invalid.
    ///
    /// Reaching the root forwards the request to the host.
    pub fn invalidate_up_tree(&mut self, id: ViewId) {
        let mut current = Some(id);
        while let Some(view_id) = current {
            let Some(view) = self.views.get_mut(view_id) else {
                break;
            };
            view.valid = false;
            current = view.parent;
            if current.is_none() && self.root == Some(view_id) {
                self.host.invalidate();
            }
        }
    }

    /// Mark a view and all of its descendants invalid.
    pub fn invalidate_down_tree(&mut self, id: ViewId) {
        let mut pending = alloc::vec![id];
        while let Some(view_id) = pending.pop() {
            if let Some(view) = self.views.get_mut(view_id) {
                view.valid = false;
                pending.extend_from_slice(view.kind.children());
            }
        }
    }

    /// Ask for `region`, in the view's coordinates, to be redrawn.
    pub fn repaint(&mut self, id: ViewId, region: Bounds) {
        let mut region = region;
        let mut current = id;
        loop {
            let Some(view) = self.views.get(current) else {
                return;
            };
            region = region.translate(view.bounds.x, view.bounds.y);
            match view.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        if self.root == Some(current) {
            self.host
                .repaint(region.translate(self.origin.x, self.origin.y));
        }
    }

    /// Ask for the whole area of a view to be redrawn.
    pub fn repaint_view(&mut self, id: ViewId) {
        let size = self.bounds(id).size();
        self.repaint(id, Bounds::from_size(size));
    }

    fn set_size(&mut self, id: ViewId, size: Size) {
        debug_assert!(
            size.width >= 0 && size.height >= 0,
            "view sizes are never negative: {size:?}"
        );
        let size = if size.width < 0 || size.height < 0 {
            tracing::warn!(?id, ?size, "negative view size clamped");
            Size::new(size.width.max(0), size.height.max(0))
        } else {
            size
        };
        if self.bounds(id).size() == size {
            return;
        }
        self.repaint_view(id);
        if let Some(view) = self.views.get_mut(id) {
            view.bounds.width = size.width;
            view.bounds.height = size.height;
        }
        self.repaint_view(id);
    }

    fn set_location(&mut self, id: ViewId, x: i32, y: i32) {
        if self.bounds(id).origin() == Point::new(x, y) {
            return;
        }
        self.repaint_view(id);
        if let Some(view) = self.views.get_mut(id) {
            view.bounds.x = x;
            view.bounds.y = y;
        }
        self.repaint_view(id);
    }

    /// The row piece a laid out inline view contributes to a paragraph.
    fn piece(&self, document: &Document, id: ViewId) -> Piece {
        let bounds = self.bounds(id);
        Piece {
            width: bounds.width,
            height: bounds.height,
            baseline: self.baseline(id),
            count: self.character_count(document, id),
            forced: self.forced(id),
        }
    }

    /// Returns `true` if the view was cut without a line break opportunity.
    fn forced(&self, id: ViewId) -> bool {
        match self.views.get(id).map(|v| &v.kind) {
            Some(ViewKind::Text(text)) => text.forced,
            Some(ViewKind::Span(span)) => span.child.is_some_and(|child| self.forced(child)),
            _ => false,
        }
    }

    fn attach_node(
        &mut self,
        document: &Document,
        node: NodeId,
        parent: Option<ViewId>,
    ) -> Result<ViewId, Error> {
        let entry = document.node(node).ok_or_else(|| Error::unknown_node(node))?;
        let kind = match entry.kind() {
            NodeKind::Document => ViewKind::Document(Vec::new()),
            NodeKind::Paragraph => ViewKind::Paragraph(ParagraphData::default()),
            NodeKind::Span => {
                if let Some(&extra) = entry.children().get(1) {
                    let name = document.kind(extra).map_or("node", NodeKind::name);
                    return Err(Error::unsupported_nesting(extra, name, "span with a child"));
                }
                ViewKind::Span(SpanData::default())
            }
            NodeKind::BulletedList(_) | NodeKind::NumberedList(_) => {
                ViewKind::List(ListData::default())
            }
            NodeKind::ListItem => ViewKind::ListItem(ItemData::default()),
            NodeKind::Text(text) => ViewKind::Text(TextData::new(text.chars().count())),
            NodeKind::Image(_) | NodeKind::Component(_) => ViewKind::Embed,
        };
        let id = self.views.insert(View::new(node, parent, 0, kind));
        self.primary.insert(node, id);

        for (index, &child) in entry.children().iter().enumerate() {
            if let Err(err) = self.insert_child(document, id, index, child) {
                self.remove_view(id);
                return Err(err);
            }
        }
        Ok(id)
    }

    fn insert_child(
        &mut self,
        document: &Document,
        parent: ViewId,
        index: usize,
        node: NodeId,
    ) -> Result<ViewId, Error> {
        let parent_node = self
            .node(parent)
            .ok_or_else(|| Error::not_attached(node))?;
        let parent_kind = document
            .kind(parent_node)
            .ok_or_else(|| Error::unknown_node(parent_node))?;
        let child_kind = document.kind(node).ok_or_else(|| Error::unknown_node(node))?;
        if !accepts(parent_kind, child_kind) {
            return Err(Error::unsupported_nesting(
                node,
                child_kind.name(),
                parent_kind.name(),
            ));
        }
        if let Some(ViewKind::Span(span)) = self.views.get(parent).map(|v| &v.kind) {
            if span.child.is_some() {
                return Err(Error::unsupported_nesting(
                    node,
                    child_kind.name(),
                    "span with a child",
                ));
            }
        }

        let child = self.attach_node(document, node, Some(parent))?;
        if let Some(view) = self.views.get_mut(parent) {
            match &mut view.kind {
                ViewKind::Span(span) => span.child = Some(child),
                kind => {
                    if let Some(children) = kind.children_mut() {
                        children.insert(index.min(children.len()), child);
                    }
                }
            }
        }
        Ok(child)
    }

    /// Free a view with everything it owns.
    fn remove_view(&mut self, id: ViewId) {
        let mut pending = alloc::vec![id];
        while let Some(id) = pending.pop() {
            let Some(view) = self.views.remove(id) else {
                continue;
            };
            if self.primary.get(&view.node) == Some(&id) {
                self.primary.remove(&view.node);
            }
            pending.extend_from_slice(view.kind.children());
            pending.extend(view.kind.next());
        }
    }

    /// Free the continuation views following `id`.
    ///
    /// Only the continuations themselves are freed; the pieces wrapped by
    /// continuation spans belong to their child's chain.
    fn discard_chain(&mut self, id: ViewId) {
        let mut next = self.views.get_mut(id).and_then(|v| v.kind.take_next());
        while let Some(view) = next {
            next = self.views.remove(view).and_then(|v| v.kind.next());
        }
    }
}
