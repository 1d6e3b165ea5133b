// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A text pane: the view tree of a document inside a margin.
//!
//! [`TextPane`] is what a widget toolkit embeds. It owns the [`ViewTree`] of the
//! installed document, maps pane coordinates to document coordinates, decides the
//! break width from the pane width, and tracks the selection with its caret and
//! highlight.

use alloc::vec::Vec;
use core::ops::Range;

use folio_document::{Document, NodeChange};

use crate::error::Error;
use crate::geometry::{Bounds, Insets, Size, round_px};
use crate::host::ViewHost;
use crate::measure::TextMeasure;
use crate::style::Theme;
use crate::surface::PaintSurface;
use crate::view::{LayoutContext, ScrollDirection, ViewId, ViewTree};

/// Pane settings.
#[derive(Clone, Debug)]
pub struct PaneConfig {
    /// Space between the pane edges and the document.
    pub margin: Insets,
    /// Wrap rows at the pane width. When off, rows only end where the
    /// document breaks them.
    pub wrap_text: bool,
    /// Fallback font and colors.
    pub theme: Theme,
}

impl Default for PaneConfig {
    fn default() -> Self {
        Self {
            margin: Insets::uniform(4),
            wrap_text: true,
            theme: Theme::default(),
        }
    }
}

/// The presentation of one document inside a widget.
///
/// ```
/// use folio::{DisplayList, MonospaceMeasure, TextPane};
/// use folio::folio_document::Document;
///
/// let mut document = Document::new();
/// let root = document.root();
/// document.append_paragraph(root, "Hello, world").unwrap();
///
/// let measure = MonospaceMeasure::default();
/// let mut pane = TextPane::new();
/// pane.install(&document).unwrap();
/// pane.layout(&document, &measure, 300);
///
/// let mut surface = DisplayList::default();
/// pane.paint(&document, &measure, &mut surface);
/// assert_eq!(surface.text(), "Hello, world");
/// ```
#[derive(Debug)]
pub struct TextPane<H = ()> {
    tree: ViewTree<H>,
    config: PaneConfig,
    selection: Range<usize>,
    /// Pane width of the last layout.
    width: Option<i32>,
    caret: Bounds,
    selection_area: Vec<Bounds>,
}

impl TextPane {
    /// Create a pane with the default configuration and no host.
    pub fn new() -> Self {
        Self::with_host(())
    }
}

impl Default for TextPane {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ViewHost> TextPane<H> {
    /// Create a pane with the default configuration reporting to `host`.
    pub fn with_host(host: H) -> Self {
        Self::with_config(host, PaneConfig::default())
    }

    /// Create a pane with the given configuration reporting to `host`.
    pub fn with_config(host: H, config: PaneConfig) -> Self {
        let mut tree = ViewTree::with_host(host);
        tree.set_origin(config.margin.origin());
        Self {
            tree,
            config,
            selection: 0..0,
            width: None,
            caret: Bounds::EMPTY,
            selection_area: Vec::new(),
        }
    }

    /// The view tree of the installed document.
    pub fn tree(&self) -> &ViewTree<H> {
        &self.tree
    }

    /// The host receiving invalidation and repaint requests.
    pub fn host(&self) -> &H {
        self.tree.host()
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        self.tree.host_mut()
    }

    /// The current settings.
    pub fn config(&self) -> &PaneConfig {
        &self.config
    }

    /// Present `document`, dropping the views of the previous one and the
    /// selection.
    pub fn install(&mut self, document: &Document) -> Result<ViewId, Error> {
        self.selection = 0..0;
        self.caret = Bounds::EMPTY;
        self.selection_area.clear();
        self.width = None;
        self.tree.install(document)
    }

    /// Change the margin around the document.
    pub fn set_margin(&mut self, margin: Insets) {
        self.config.margin = margin;
        self.tree.set_origin(margin.origin());
        self.invalidate();
    }

    /// Turn wrapping at the pane width on or off.
    pub fn set_wrap_text(&mut self, wrap_text: bool) {
        if self.config.wrap_text != wrap_text {
            self.config.wrap_text = wrap_text;
            self.invalidate();
        }
    }

    /// Change the fallback font and colors.
    ///
    /// Every view depends on the theme, so the whole tree is laid out again.
    pub fn set_theme(&mut self, theme: Theme) {
        self.config.theme = theme;
        if let Some(root) = self.tree.root() {
            self.tree.invalidate_down_tree(root);
            self.tree.invalidate_up_tree(root);
        }
    }

    fn invalidate(&mut self) {
        if let Some(root) = self.tree.root() {
            self.tree.invalidate_up_tree(root);
        }
    }

    fn context<'a>(&'a self, document: &'a Document, measure: &'a dyn TextMeasure) -> LayoutContext<'a> {
        LayoutContext::new(document, measure, &self.config.theme).with_selection(self.selection.clone())
    }

    /// Break width of the document for a pane `width`.
    pub fn break_width(&self, width: i32) -> i32 {
        if self.config.wrap_text {
            (width - self.config.margin.width()).max(0)
        } else {
            i32::MAX
        }
    }

    /// Lay the document out for a pane `width`, then refresh the caret and the
    /// selection highlight.
    pub fn layout(&mut self, document: &Document, measure: &dyn TextMeasure, width: i32) {
        let Some(root) = self.tree.root() else {
            return;
        };
        let break_width = self.break_width(width);
        let cx = LayoutContext::new(document, measure, &self.config.theme);
        self.tree.layout(&cx, root, break_width);
        self.width = Some(width);
        self.update_selection(document);
    }

    /// Size of the pane when nothing forces rows to wrap.
    pub fn preferred_size(&self, document: &Document, measure: &dyn TextMeasure) -> Size {
        let margin = self.config.margin;
        let size = self.document_size(document, measure, i32::MAX);
        Size::new(
            size.width.saturating_add(margin.width()),
            size.height.saturating_add(margin.height()),
        )
    }

    /// Width of the pane when nothing forces rows to wrap.
    pub fn preferred_width(&self, document: &Document, measure: &dyn TextMeasure) -> i32 {
        self.document_size(document, measure, i32::MAX)
            .width
            .saturating_add(self.config.margin.width())
    }

    /// Height of the pane for a given `width`.
    pub fn preferred_height(&self, document: &Document, measure: &dyn TextMeasure, width: i32) -> i32 {
        let break_width = self.break_width(width);
        self.document_size(document, measure, break_width)
            .height
            .saturating_add(self.config.margin.height())
    }

    fn document_size(&self, document: &Document, measure: &dyn TextMeasure, break_width: i32) -> Size {
        let Some(root) = self.tree.root() else {
            return Size::ZERO;
        };
        let cx = LayoutContext::new(document, measure, &self.config.theme);
        self.tree.preferred_size(&cx, root, break_width)
    }

    /// Baseline of the first row of text in pane coordinates.
    pub fn baseline(&self, measure: &dyn TextMeasure) -> i32 {
        let ascent = measure.metrics(&self.config.theme.font).ascent;
        self.config.margin.top + round_px(ascent)
    }

    /// Draw the selection highlight and the document.
    ///
    /// The document is laid out first if it was invalidated since the last
    /// [`layout`](Self::layout).
    pub fn paint(&mut self, document: &Document, measure: &dyn TextMeasure, surface: &mut dyn PaintSurface) {
        let Some(root) = self.tree.root() else {
            return;
        };
        if let Some(width) = self.width {
            self.layout(document, measure, width);
        }

        let selection_background = self.config.theme.selection_background_color;
        for area in &self.selection_area {
            surface.fill_rect(*area, selection_background);
        }

        let margin = self.config.margin;
        let cx = self.context(document, measure);
        surface.save();
        surface.translate(margin.left, margin.top);
        self.tree.paint(&cx, root, surface);
        surface.restore();
    }

    /// The document offset under a point in pane coordinates.
    ///
    /// `x` is clamped into the document. Points above the document resolve to the
    /// first row and points below it to the last row.
    pub fn insertion_point(&self, document: &Document, x: i32, y: i32) -> Option<usize> {
        let root = self.tree.root()?;
        let margin = self.config.margin;
        let bounds = self.tree.bounds(root);
        let x = (x - margin.left).min(bounds.width - 1).max(0);
        if y < margin.top {
            self.tree
                .next_insertion_point(document, root, x, None, ScrollDirection::Down)
        } else if y >= bounds.bottom().saturating_add(margin.top) {
            self.tree
                .next_insertion_point(document, root, x, None, ScrollDirection::Up)
        } else {
            self.tree.insertion_point(document, root, x, y - margin.top)
        }
    }

    /// The caret position on the row above or below `from`, near pane `x`.
    pub fn next_insertion_point(
        &self,
        document: &Document,
        x: i32,
        from: usize,
        direction: ScrollDirection,
    ) -> Option<usize> {
        let root = self.tree.root()?;
        self.tree.next_insertion_point(
            document,
            root,
            x - self.config.margin.left,
            Some(from),
            direction,
        )
    }

    /// The row holding a document offset.
    pub fn row_at(&self, document: &Document, offset: usize) -> Option<usize> {
        let root = self.tree.root()?;
        self.tree.row_at(document, root, offset)
    }

    /// Number of rows of the document.
    pub fn row_count(&self) -> usize {
        self.tree.root().map_or(0, |root| self.tree.row_count(root))
    }

    /// Bounds of the character at a document offset, in pane coordinates.
    pub fn character_bounds(&self, document: &Document, offset: usize) -> Option<Bounds> {
        let root = self.tree.root()?;
        let margin = self.config.margin;
        self.tree
            .character_bounds(document, root, offset)
            .map(|bounds| bounds.translate(margin.left, margin.top))
    }

    /// The selected range of document offsets.
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Select a range of document offsets, clamped to the document.
    pub fn set_selection(&mut self, document: &Document, selection: Range<usize>) {
        let count = document.character_count(document.root());
        let start = selection.start.min(count);
        let end = selection.end.clamp(start, count);
        self.selection = start..end;
        self.update_selection(document);
    }

    /// The caret at the start of the selection, one pixel wide.
    pub fn caret(&self) -> Bounds {
        self.caret
    }

    /// Rectangles covering the selected rows, in pane coordinates.
    ///
    /// A selection within one row is a single rectangle. Otherwise there is one
    /// for the remainder of the first row, one for the rows in between (if any)
    /// and one for the start of the last row.
    pub fn selection_area(&self) -> &[Bounds] {
        &self.selection_area
    }

    /// Bring the views in line with a change of `document`.
    pub fn node_changed(&mut self, document: &Document, change: &NodeChange) -> Result<(), Error> {
        self.tree.node_changed(document, change)?;
        let count = document.character_count(document.root());
        if self.selection.end > count {
            self.selection = self.selection.start.min(count)..count;
        }
        Ok(())
    }

    fn update_selection(&mut self, document: &Document) {
        let Some(root) = self.tree.root() else {
            return;
        };
        if !self.tree.is_valid(root) {
            return;
        }
        let before = self.repaint_region();
        let previous = (self.caret, core::mem::take(&mut self.selection_area));

        let Range { start, end } = self.selection.clone();
        let Some(leading) = self.character_bounds(document, start) else {
            // Nothing to place a caret in.
            self.caret = Bounds::EMPTY;
            if !before.is_empty() {
                self.tree.host_mut().repaint(before);
            }
            return;
        };
        self.caret = Bounds::new(leading.x, leading.y, 1, leading.height);

        let trailing = end
            .checked_sub(1)
            .filter(|_| end > start)
            .and_then(|last| self.character_bounds(document, last));
        if let Some(trailing) = trailing {
            let margin = self.config.margin;
            let width = self.width.unwrap_or(0);
            if leading.y == trailing.y {
                self.selection_area.push(Bounds::new(
                    leading.x,
                    leading.y,
                    trailing.right() - leading.x,
                    trailing.height,
                ));
            } else {
                self.selection_area.push(Bounds::new(
                    leading.x,
                    leading.y,
                    width - margin.right - leading.x,
                    leading.height,
                ));
                if trailing.y > leading.bottom() {
                    self.selection_area.push(Bounds::new(
                        margin.left,
                        leading.bottom(),
                        width - margin.width(),
                        trailing.y - leading.bottom(),
                    ));
                }
                self.selection_area.push(Bounds::new(
                    margin.left,
                    trailing.y,
                    trailing.right() - margin.left,
                    trailing.height,
                ));
            }
        }

        if previous.0 == self.caret && previous.1 == self.selection_area {
            return;
        }
        let region = before.union(&self.repaint_region());
        if !region.is_empty() {
            self.tree.host_mut().repaint(region);
        }
    }

    fn repaint_region(&self) -> Bounds {
        self.selection_area
            .iter()
            .fold(self.caret, |region, area| region.union(area))
    }
}
