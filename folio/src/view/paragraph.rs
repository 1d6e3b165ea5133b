// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paragraph views: breaking inline content into rows.
//!
//! Rows are filled left to right. A child that does not fit after other content
//! starts a new row and is laid out again with the full break width; whatever a
//! child leaves over continues on rows of its own. Segments of a row share a
//! baseline, segments without one sit on the bottom of the row. After the last
//! row comes the terminator, a small box standing for the position just after
//! the last character.

use alloc::vec::Vec;

use folio_document::{Document, HorizontalAlignment, NodeId, NodeKind};
use smallvec::SmallVec;

use super::{LayoutContext, ScrollDirection, View, ViewId, ViewKind, ViewTree, embed, span, text};
use crate::geometry::{Bounds, Size};
use crate::host::ViewHost;
use crate::style::{effective_background, effective_font};
use crate::surface::PaintSurface;

/// Width of the box after the last character of a paragraph.
pub(crate) const TERMINATOR_WIDTH: i32 = 4;

/// What an inline child contributes to a row.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Piece {
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) baseline: Option<i32>,
    pub(crate) count: usize,
    /// Cut where no line break is allowed.
    pub(crate) forced: bool,
}

/// Inline children of a paragraph, as seen by the row builder.
pub(crate) trait InlineSource {
    type Handle: Copy;

    /// Lay out child `index` from its first character for `width`.
    fn first(&mut self, index: usize, width: i32) -> (Self::Handle, Piece);

    /// Lay out what `previous` left over for `width`, if anything.
    fn next(&mut self, previous: Self::Handle, width: i32) -> Option<(Self::Handle, Piece)>;
}

#[derive(Clone, Debug)]
pub(crate) struct Segment<T> {
    pub(crate) handle: T,
    /// Bounds in paragraph coordinates.
    pub(crate) bounds: Bounds,
    pub(crate) baseline: Option<i32>,
    /// Offset of the first character in the paragraph.
    pub(crate) offset: usize,
    pub(crate) count: usize,
}

impl<T> Segment<T> {
    fn end(&self) -> usize {
        self.offset + self.count
    }

    fn contains(&self, offset: usize) -> bool {
        offset >= self.offset && offset < self.end()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Row<T> {
    pub(crate) bounds: Bounds,
    pub(crate) segments: SmallVec<[Segment<T>; 4]>,
}

impl<T> Default for Row<T> {
    fn default() -> Self {
        Self {
            bounds: Bounds::EMPTY,
            segments: SmallVec::new(),
        }
    }
}

impl<T> Row<T> {
    fn start(&self) -> usize {
        self.segments.first().map_or(0, |s| s.offset)
    }

    fn end(&self) -> usize {
        self.segments.last().map_or(0, Segment::end)
    }
}

/// Rows of a paragraph, positioned and aligned.
#[derive(Clone, Debug)]
pub(crate) struct RowLayout<T> {
    pub(crate) rows: Vec<Row<T>>,
    pub(crate) width: i32,
    pub(crate) height: i32,
    /// Right edge of the last segment of the last row.
    pub(crate) end_x: i32,
}

impl<T> RowLayout<T> {
    pub(crate) fn terminator(&self, empty: bool, height: i32) -> Bounds {
        let y = if empty { 0 } else { (self.height - height).max(0) };
        Bounds::new(self.end_x, y, TERMINATOR_WIDTH, height)
    }

    pub(crate) fn size(&self, terminator: &Bounds) -> Size {
        Size::new(
            self.width.saturating_add(TERMINATOR_WIDTH),
            self.height.max(terminator.height),
        )
    }
}

struct RowBuilder<T> {
    rows: Vec<Row<T>>,
    current: Row<T>,
    y: i32,
    offset: usize,
}

impl<T> RowBuilder<T> {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            current: Row::default(),
            y: 0,
            offset: 0,
        }
    }

    fn push(&mut self, handle: T, piece: Piece) {
        let x = self.current.bounds.width;
        self.current.segments.push(Segment {
            handle,
            bounds: Bounds::new(x, 0, piece.width, piece.height),
            baseline: piece.baseline,
            offset: self.offset,
            count: piece.count,
        });
        self.current.bounds.width = x.saturating_add(piece.width);
        self.offset += piece.count;
    }

    fn end_row(&mut self) {
        let mut row = core::mem::take(&mut self.current);
        let height = row.segments.iter().map(|s| s.bounds.height).max().unwrap_or(0);
        let baseline = row.segments.iter().filter_map(|s| s.baseline).max();
        for segment in &mut row.segments {
            segment.bounds.y = match (baseline, segment.baseline) {
                (Some(row_baseline), Some(baseline)) => row_baseline - baseline,
                _ => height - segment.bounds.height,
            };
        }
        let height = row
            .segments
            .iter()
            .map(|s| s.bounds.bottom())
            .max()
            .unwrap_or(0)
            .max(height);
        for segment in &mut row.segments {
            segment.bounds.y += self.y;
        }
        row.bounds.y = self.y;
        row.bounds.height = height;
        self.y = self.y.saturating_add(height);
        self.rows.push(row);
    }

    fn finish(mut self, alignment: HorizontalAlignment) -> RowLayout<T> {
        if !self.current.segments.is_empty() {
            self.end_row();
        }
        let width = self.rows.iter().map(|r| r.bounds.width).max().unwrap_or(0);
        let mut end_x = 0;
        for row in &mut self.rows {
            let mut x = match alignment {
                HorizontalAlignment::Left => 0,
                HorizontalAlignment::Center => (width - row.bounds.width) / 2,
                HorizontalAlignment::Right => width - row.bounds.width,
            };
            row.bounds.x = x;
            for segment in &mut row.segments {
                segment.bounds.x = x;
                x = x.saturating_add(segment.bounds.width);
            }
            end_x = x;
        }
        RowLayout {
            rows: self.rows,
            width,
            height: self.y,
            end_x,
        }
    }
}

/// Break the `children` of `source` into rows of at most `break_width`.
///
/// Each child is first offered the space left on the current row, minus room
/// for the terminator. A child that overflows a non-empty row, or had to be cut
/// without a break opportunity, moves to a new row and is laid out again there.
pub(crate) fn break_rows<S: InlineSource>(
    source: &mut S,
    children: usize,
    break_width: i32,
    alignment: HorizontalAlignment,
) -> RowLayout<S::Handle> {
    let mut builder = RowBuilder::new();
    for index in 0..children {
        let used = builder.current.bounds.width;
        let available = break_width
            .saturating_sub(used.saturating_add(TERMINATOR_WIDTH))
            .max(0);
        let (mut handle, mut piece) = source.first(index, available);
        if used > 0 && (used.saturating_add(piece.width) > break_width || piece.forced) {
            builder.end_row();
            (handle, piece) = source.first(index, break_width.saturating_sub(TERMINATOR_WIDTH).max(0));
        }
        builder.push(handle, piece);

        while let Some((next, piece)) = source.next(handle, break_width) {
            builder.end_row();
            builder.push(next, piece);
            handle = next;
        }
    }
    builder.finish(alignment)
}

/// Row piece of an inline node from character `start` on, with the start of
/// the rest when the node continues on another row.
pub(super) fn measure_inline(
    cx: &LayoutContext<'_>,
    node: NodeId,
    start: usize,
    break_width: i32,
) -> (Piece, Option<usize>) {
    match cx.document.kind(node) {
        Some(NodeKind::Text(_)) => text::measure(cx, node, start, break_width),
        Some(NodeKind::Span) => span::measure(cx, node, start, break_width),
        Some(NodeKind::Image(_) | NodeKind::Component(_)) => (embed::measure(cx, node), None),
        _ => (Piece::default(), None),
    }
}

#[derive(Copy, Clone, Debug)]
struct Cursor {
    node: NodeId,
    rest: Option<usize>,
}

/// Inline children measured straight from the document.
struct MeasureSource<'c, 'a> {
    cx: &'c LayoutContext<'a>,
    children: &'c [NodeId],
}

impl InlineSource for MeasureSource<'_, '_> {
    type Handle = Cursor;

    fn first(&mut self, index: usize, width: i32) -> (Cursor, Piece) {
        let node = self.children[index];
        let (piece, rest) = measure_inline(self.cx, node, 0, width);
        (Cursor { node, rest }, piece)
    }

    fn next(&mut self, previous: Cursor, width: i32) -> Option<(Cursor, Piece)> {
        let start = previous.rest?;
        let (piece, rest) = measure_inline(self.cx, previous.node, start, width);
        Some((
            Cursor {
                node: previous.node,
                rest,
            },
            piece,
        ))
    }
}

/// Inline children laid out as views.
struct ViewSource<'t, 'c, 'a, H> {
    tree: &'t mut ViewTree<H>,
    cx: &'c LayoutContext<'a>,
    children: &'t [ViewId],
}

impl<H: ViewHost> InlineSource for ViewSource<'_, '_, '_, H> {
    type Handle = ViewId;

    fn first(&mut self, index: usize, width: i32) -> (ViewId, Piece) {
        let child = self.children[index];
        self.tree.layout(self.cx, child, width);
        (child, self.tree.piece(self.cx.document, child))
    }

    fn next(&mut self, previous: ViewId, width: i32) -> Option<(ViewId, Piece)> {
        let next = self.tree.next(previous)?;
        self.tree.layout(self.cx, next, width);
        Some((next, self.tree.piece(self.cx.document, next)))
    }
}

fn terminator_height(cx: &LayoutContext<'_>, node: NodeId) -> i32 {
    let font = effective_font(cx.document, node, cx.theme);
    cx.measure.metrics(font).pixel_height()
}

fn alignment(document: &Document, node: NodeId) -> HorizontalAlignment {
    document.style(node).map(|s| s.alignment).unwrap_or_default()
}

pub(super) fn preferred_size(cx: &LayoutContext<'_>, node: NodeId, break_width: i32) -> Size {
    let children = cx.document.children(node);
    let mut source = MeasureSource { cx, children };
    let layout = break_rows(
        &mut source,
        children.len(),
        break_width,
        alignment(cx.document, node),
    );
    let empty = cx.document.character_count(node) == 0;
    let terminator = layout.terminator(empty, terminator_height(cx, node));
    layout.size(&terminator)
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ParagraphData {
    pub(crate) children: Vec<ViewId>,
    rows: Vec<Row<ViewId>>,
    terminator: Bounds,
}

impl ParagraphData {
    fn character_count(&self) -> usize {
        self.rows.last().map_or(0, Row::end)
    }

    pub(crate) fn row_count(&self) -> usize {
        self.rows.len().max(1)
    }

    /// The end position belongs to the last row.
    pub(crate) fn row_at(&self, offset: usize) -> Option<usize> {
        if offset == self.character_count() {
            return Some(self.rows.len().saturating_sub(1));
        }
        self.rows
            .iter()
            .position(|row| offset >= row.start() && offset < row.end())
    }

    fn segments(&self) -> impl Iterator<Item = &Segment<ViewId>> + '_ {
        self.rows.iter().flat_map(|row| row.segments.iter())
    }
}

impl<H: ViewHost> ViewTree<H> {
    pub(super) fn layout_paragraph(&mut self, cx: &LayoutContext<'_>, id: ViewId, break_width: i32) -> Size {
        let Some(view) = self.views.get(id) else {
            return Size::ZERO;
        };
        let node = view.node;
        let children = view.kind.children().to_vec();

        let mut source = ViewSource {
            tree: self,
            cx,
            children: &children,
        };
        let layout = break_rows(
            &mut source,
            children.len(),
            break_width,
            alignment(cx.document, node),
        );
        for segment in layout.rows.iter().flat_map(|row| row.segments.iter()) {
            self.set_location(segment.handle, segment.bounds.x, segment.bounds.y);
        }

        let empty = cx.document.character_count(node) == 0;
        let terminator = layout.terminator(empty, terminator_height(cx, node));
        let size = layout.size(&terminator);
        tracing::trace!(?id, rows = layout.rows.len(), "paragraph rows");
        if let Some(ViewKind::Paragraph(paragraph)) = self.views.get_mut(id).map(|v| &mut v.kind) {
            paragraph.rows = layout.rows;
            paragraph.terminator = terminator;
        }
        self.check_children(cx.document, id);
        size
    }

    pub(super) fn paint_paragraph(&self, cx: &LayoutContext<'_>, id: ViewId, surface: &mut dyn PaintSurface) {
        let Some(view) = self.views.get(id) else {
            return;
        };
        let ViewKind::Paragraph(paragraph) = &view.kind else {
            return;
        };
        let paint_bounds = Bounds::from_size(view.bounds.size()).intersect(&surface.clip_bounds());
        let background = effective_background(cx.document, view.node);
        for segment in paragraph.segments() {
            self.paint_child(cx, segment.handle, paint_bounds, background, surface);
        }
    }

    pub(super) fn paragraph_insertion_point(
        &self,
        document: &Document,
        paragraph: &ParagraphData,
        x: i32,
        y: i32,
    ) -> Option<usize> {
        let count = paragraph.character_count();
        let row = paragraph
            .rows
            .iter()
            .find(|row| y >= row.bounds.y && y < row.bounds.bottom())?;
        let offset = if x < row.bounds.x {
            Some(row.start())
        } else if x >= row.bounds.right() {
            Some(row.end().saturating_sub(1))
        } else {
            row.segments
                .iter()
                .filter(|s| x >= s.bounds.x && x < s.bounds.right())
                .find_map(|s| {
                    let local = self.insertion_point(
                        document,
                        s.handle,
                        x - s.bounds.x,
                        y - s.bounds.y,
                    )?;
                    Some(s.offset + local)
                })
        };
        offset.filter(|&offset| offset < count)
    }

    pub(super) fn paragraph_next_insertion_point(
        &self,
        document: &Document,
        paragraph: &ParagraphData,
        x: i32,
        from: Option<usize>,
        direction: ScrollDirection,
    ) -> Option<usize> {
        let rows = &paragraph.rows;
        let count = paragraph.character_count();
        if rows.is_empty() {
            return from.is_none().then_some(0);
        }

        let current = match from {
            None => None,
            Some(from) if from > count => return None,
            Some(from) if from == count => Some(rows.len() - 1),
            Some(from) => Some(
                rows.iter()
                    .position(|row| from >= row.start() && from < row.end())?,
            ),
        };
        let target = match (current, direction) {
            (None, ScrollDirection::Down) => Some(0),
            (None, ScrollDirection::Up) => rows.len().checked_sub(1),
            (Some(row), ScrollDirection::Down) => Some(row + 1),
            (Some(row), ScrollDirection::Up) => row.checked_sub(1),
        };
        let row = rows.get(target?)?;

        let hit = row
            .segments
            .iter()
            .filter(|s| x >= s.bounds.x && x < s.bounds.right())
            .find_map(|s| {
                let local = self.next_insertion_point(
                    document,
                    s.handle,
                    x - s.bounds.x,
                    None,
                    direction,
                )?;
                Some(s.offset + local)
            });
        if hit.is_some() {
            return hit;
        }
        let end = row.end();
        Some(if end < count { end.saturating_sub(1) } else { end })
    }

    pub(super) fn paragraph_character_bounds(
        &self,
        document: &Document,
        view: &View,
        paragraph: &ParagraphData,
        offset: usize,
    ) -> Option<Bounds> {
        if offset == paragraph.character_count() {
            return Some(paragraph.terminator);
        }
        let segment = paragraph.segments().find(|s| s.contains(offset))?;
        let bounds = self.character_bounds(document, segment.handle, offset - segment.offset)?;
        Some(
            bounds
                .translate(segment.bounds.x, segment.bounds.y)
                .intersect(&Bounds::from_size(view.bounds.size())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-size pieces; `splits` pieces continue on rows of their own.
    struct Blocks {
        pieces: Vec<Piece>,
        splits: Vec<usize>,
    }

    impl InlineSource for Blocks {
        type Handle = (usize, usize);

        fn first(&mut self, index: usize, _width: i32) -> ((usize, usize), Piece) {
            ((index, 0), self.pieces[index])
        }

        fn next(&mut self, (index, part): (usize, usize), _width: i32) -> Option<((usize, usize), Piece)> {
            (part < self.splits[index]).then_some(((index, part + 1), self.pieces[index]))
        }
    }

    fn piece(width: i32, height: i32, baseline: Option<i32>) -> Piece {
        Piece {
            width,
            height,
            baseline,
            count: 1,
            forced: false,
        }
    }

    #[test]
    fn overflowing_pieces_start_a_new_row() {
        let mut source = Blocks {
            pieces: alloc::vec![piece(40, 10, Some(8)); 3],
            splits: alloc::vec![0; 3],
        };
        let layout = break_rows(&mut source, 3, 100, HorizontalAlignment::Left);
        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.rows[0].segments.len(), 2);
        assert_eq!(layout.rows[1].bounds, Bounds::new(0, 10, 40, 10));
        assert_eq!(layout.rows[1].start(), 2);
        assert_eq!(layout.width, 80);
        assert_eq!(layout.height, 20);
        assert_eq!(layout.end_x, 40);
    }

    #[test]
    fn continuations_take_rows_of_their_own() {
        let mut source = Blocks {
            pieces: alloc::vec![piece(30, 10, Some(8))],
            splits: alloc::vec![2],
        };
        let layout = break_rows(&mut source, 1, 100, HorizontalAlignment::Left);
        assert_eq!(layout.rows.len(), 3);
        assert_eq!(layout.rows[2].end(), 3);
    }

    #[test]
    fn segments_share_the_row_baseline() {
        let mut source = Blocks {
            pieces: alloc::vec![piece(10, 10, Some(8)), piece(10, 20, Some(16)), piece(10, 5, None)],
            splits: alloc::vec![0; 3],
        };
        let layout = break_rows(&mut source, 3, 100, HorizontalAlignment::Left);
        let row = &layout.rows[0];
        assert_eq!(row.segments[0].bounds.y, 8);
        assert_eq!(row.segments[1].bounds.y, 0);
        // No baseline: bottom aligned.
        assert_eq!(row.segments[2].bounds.y, 15);
        assert_eq!(row.bounds.height, 20);
    }

    #[test]
    fn rows_align_within_the_widest_row() {
        let mut source = Blocks {
            pieces: alloc::vec![piece(60, 10, Some(8)), piece(40, 10, Some(8))],
            splits: alloc::vec![0; 2],
        };
        let centered = break_rows(&mut source, 2, 80, HorizontalAlignment::Center);
        assert_eq!(centered.rows[1].bounds.x, 10);
        let right = break_rows(&mut source, 2, 80, HorizontalAlignment::Right);
        assert_eq!(right.rows[1].bounds.x, 20);
        assert_eq!(right.end_x, 60);
    }

    #[test]
    fn forced_pieces_never_share_a_row() {
        let mut forced = piece(10, 10, Some(8));
        forced.forced = true;
        let mut source = Blocks {
            pieces: alloc::vec![piece(10, 10, Some(8)), forced],
            splits: alloc::vec![0; 2],
        };
        let layout = break_rows(&mut source, 2, 100, HorizontalAlignment::Left);
        assert_eq!(layout.rows.len(), 2);
    }

    #[test]
    fn terminator_follows_the_last_row() {
        let mut source = Blocks {
            pieces: alloc::vec![piece(30, 10, Some(8))],
            splits: alloc::vec![0],
        };
        let layout = break_rows(&mut source, 1, 100, HorizontalAlignment::Left);
        let terminator = layout.terminator(false, 10);
        assert_eq!(terminator, Bounds::new(30, 0, TERMINATOR_WIDTH, 10));
        assert_eq!(layout.size(&terminator), Size::new(34, 10));

        let empty = break_rows(&mut source, 0, 100, HorizontalAlignment::Left);
        let terminator = empty.terminator(true, 12);
        assert_eq!(terminator, Bounds::new(0, 0, TERMINATOR_WIDTH, 12));
        assert_eq!(empty.size(&terminator), Size::new(TERMINATOR_WIDTH, 12));
    }
}
