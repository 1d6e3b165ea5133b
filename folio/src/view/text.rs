// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Views of text runs.
//!
//! A text view presents the characters of a text node starting at its `start`
//! offset, as many as fit into the break width. Whatever does not fit goes to an
//! unlaid continuation view, which the enclosing paragraph lays out on the
//! following row.

use alloc::vec::Vec;

use folio_document::NodeId;

use super::paragraph::Piece;
use super::{LayoutContext, View, ViewId, ViewKind, ViewTree};
use crate::breaking::fit_line;
use crate::geometry::{Bounds, Point, Size, ceil_px, floor_px, round_px};
use crate::host::ViewHost;
use crate::measure::LineMetrics;
use crate::style::{effective_background, resolve};
use crate::surface::PaintSurface;

#[derive(Clone, Debug, Default)]
pub(crate) struct TextData {
    /// Characters presented by this piece.
    pub(crate) len: usize,
    /// Left edge of every character, followed by the right edge of the last one.
    glyph_x: Vec<f32>,
    ascent: f32,
    pub(crate) forced: bool,
    pub(crate) next: Option<ViewId>,
}

impl TextData {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    pub(crate) fn baseline(&self) -> i32 {
        floor_px(self.ascent)
    }

    fn laid_out(&self) -> usize {
        self.glyph_x.len().saturating_sub(1)
    }

    /// The character whose left half (or right half, for all but the last
    /// character) is under `x`. Points outside the run snap to its ends.
    pub(crate) fn insertion_point(&self, x: i32) -> Option<usize> {
        let count = self.laid_out();
        if count == 0 {
            return None;
        }
        let x = x as f32;
        let index = match self
            .glyph_x
            .windows(2)
            .position(|edges| x >= edges[0] && x < edges[1])
        {
            Some(index) => index,
            None if x < 0.0 => 0,
            None => count - 1,
        };
        let left = self.glyph_x[index];
        let width = self.glyph_x[index + 1] - left;
        if index + 1 < count && x - left > width / 2.0 {
            Some(index + 1)
        } else {
            Some(index)
        }
    }

    /// Like [`insertion_point`](Self::insertion_point), but only for points over
    /// the run.
    pub(crate) fn insertion_point_within(&self, x: i32) -> Option<usize> {
        let right = self.glyph_x.last().copied().unwrap_or(0.0);
        let inside = x >= 0 && (x as f32) < right;
        if inside {
            self.insertion_point(x)
        } else {
            None
        }
    }

    pub(crate) fn character_bounds(&self, offset: usize, height: i32) -> Option<Bounds> {
        let left = *self.glyph_x.get(offset)?;
        let right = *self.glyph_x.get(offset + 1)?;
        Some(Bounds::new(
            floor_px(left),
            0,
            ceil_px(right - left),
            height,
        ))
    }

    fn edge(&self, index: usize) -> i32 {
        self.glyph_x.get(index).copied().map_or(0, round_px)
    }
}

/// A run of characters fitted into a break width.
struct Shaped {
    count: usize,
    forced: bool,
    glyph_x: Vec<f32>,
    metrics: LineMetrics,
    remaining: usize,
}

impl Shaped {
    fn width(&self) -> i32 {
        ceil_px(self.glyph_x.last().copied().unwrap_or(0.0))
    }
}

fn shape(cx: &LayoutContext<'_>, node: NodeId, start: usize, break_width: i32) -> Shaped {
    let text = cx.document.text(node).unwrap_or("");
    let font = resolve(cx.document, node, cx.theme).font;
    let rest = &text[byte_offset(text, start)..];

    let fit = fit_line(rest, break_width as f32, |ch| cx.measure.advance(font, ch));

    let mut glyph_x = Vec::with_capacity(fit.count + 1);
    let mut x = 0.0;
    glyph_x.push(x);
    for ch in rest.chars().take(fit.count) {
        x += cx.measure.advance(font, ch);
        glyph_x.push(x);
    }
    Shaped {
        count: fit.count,
        forced: fit.forced,
        glyph_x,
        metrics: cx.measure.metrics(font),
        remaining: rest.chars().count() - fit.count,
    }
}

/// Row piece of the text of `node` from `start` on, with the start of the rest.
pub(super) fn measure(
    cx: &LayoutContext<'_>,
    node: NodeId,
    start: usize,
    break_width: i32,
) -> (Piece, Option<usize>) {
    let shaped = shape(cx, node, start, break_width);
    let piece = Piece {
        width: shaped.width(),
        height: shaped.metrics.pixel_height(),
        baseline: Some(floor_px(shaped.metrics.ascent)),
        count: shaped.count,
        forced: shaped.forced,
    };
    let rest = (shaped.remaining > 0).then_some(start + shaped.count);
    (piece, rest)
}

/// Byte index of the character at `chars`, or the length of `text`.
pub(super) fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(byte, _)| byte)
}

fn char_slice(text: &str, range: core::ops::Range<usize>) -> &str {
    let start = byte_offset(text, range.start);
    let end = start + byte_offset(&text[start..], range.end - range.start);
    &text[start..end]
}

impl<H: ViewHost> ViewTree<H> {
    pub(super) fn layout_text(&mut self, cx: &LayoutContext<'_>, id: ViewId, break_width: i32) -> Size {
        self.discard_chain(id);
        let Some(view) = self.views.get(id) else {
            return Size::ZERO;
        };
        let (node, start, parent) = (view.node, view.start, view.parent);
        let shaped = shape(cx, node, start, break_width);
        let size = Size::new(shaped.width(), shaped.metrics.pixel_height());

        let next = (shaped.remaining > 0).then(|| {
            let rest = ViewKind::Text(TextData::new(shaped.remaining));
            self.views
                .insert(View::new(node, parent, start + shaped.count, rest))
        });
        if next.is_some() {
            tracing::trace!(?id, count = shaped.count, forced = shaped.forced, "text wraps");
        }

        if let Some(ViewKind::Text(text)) = self.views.get_mut(id).map(|v| &mut v.kind) {
            text.len = shaped.count;
            text.glyph_x = shaped.glyph_x;
            text.ascent = shaped.metrics.ascent;
            text.forced = shaped.forced;
            text.next = next;
        }
        size
    }

    pub(super) fn paint_text(&self, cx: &LayoutContext<'_>, id: ViewId, surface: &mut dyn PaintSurface) {
        let Some(view) = self.views.get(id) else {
            return;
        };
        let ViewKind::Text(data) = &view.kind else {
            return;
        };
        let document = cx.document;
        let Some(text) = document.text(view.node) else {
            return;
        };
        let count = data.laid_out();
        let piece = char_slice(text, view.start..view.start + count);
        let style = resolve(document, view.node, cx.theme);
        let metrics = cx.measure.metrics(style.font);
        let baseline = data.baseline();
        let width = view.bounds.width;
        let height = view.bounds.height;

        let offset = self.document_offset(document, id);
        let selected = cx.selection.start.max(offset)..cx.selection.end.min(offset + count);

        let mut runs = [(0..count, style.foreground), (0..0, style.foreground), (0..0, style.foreground)];
        let mut highlight = None;
        if selected.start < selected.end {
            let (a, b) = (selected.start - offset, selected.end - offset);
            let left = if a == 0 { 0 } else { data.edge(a) };
            let right = if b == count { width } else { data.edge(b) };
            highlight = Some(Bounds::new(left, 0, right - left, height));
            runs = [
                (0..a, style.foreground),
                (a..b, cx.theme.selection_color),
                (b..count, style.foreground),
            ];
            if effective_background(document, view.node).is_some() {
                surface.fill_rect(
                    Bounds::new(left, 0, right - left, height),
                    cx.theme.selection_background_color,
                );
            }
        }

        for (range, color) in runs {
            if range.is_empty() {
                continue;
            }
            let run = char_slice(piece, range.clone());
            surface.draw_text(Point::new(data.edge(range.start), baseline), run, style.font, color);
        }

        let mut decorate = |offset: f32| {
            let y = round_px(metrics.ascent + offset);
            surface.fill_rect(Bounds::new(0, y, width, 1), style.foreground);
            if let Some(highlight) = highlight {
                surface.fill_rect(
                    Bounds::new(highlight.x, y, highlight.width, 1),
                    cx.theme.selection_color,
                );
            }
        };
        if style.underline {
            decorate(metrics.underline_offset);
        }
        if style.strikethrough {
            decorate(metrics.strikethrough_offset);
        }
    }
}
