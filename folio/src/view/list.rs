// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bulleted and numbered lists.
//!
//! A list stacks its items. Every item reserves a label column as wide as the
//! widest label of the list and lays its blocks out to the right of it. Numbered
//! labels are right aligned within the column, bullets sit at its left edge.

use alloc::string::String;
use alloc::vec::Vec;

use folio_document::{Font, NodeId, NodeKind};

use super::{LayoutContext, ViewId, ViewKind, ViewTree, stack};
use crate::geometry::{Bounds, Point, Size, ceil_px, floor_px};
use crate::host::ViewHost;
use crate::numbering::{bullet_label, index_label};
use crate::style::{effective_font, resolve};
use crate::surface::PaintSurface;

#[derive(Clone, Debug, Default)]
pub(crate) struct ListData {
    pub(crate) children: Vec<ViewId>,
    pub(crate) max_index_width: i32,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ItemData {
    pub(crate) children: Vec<ViewId>,
    pub(crate) label: String,
    pub(crate) label_width: i32,
    pub(crate) label_height: i32,
    /// Width of the label column shared by all items of the list.
    pub(crate) column: i32,
    pub(crate) numbered: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Label {
    text: String,
    width: i32,
    height: i32,
}

fn measure_label(cx: &LayoutContext<'_>, font: &Font, text: String) -> Label {
    let width = ceil_px(cx.measure.text_width(font, &text));
    Label {
        width,
        height: cx.measure.metrics(font).pixel_height(),
        text,
    }
}

/// Labels of the items of `list`, with the width of the label column.
fn labels(cx: &LayoutContext<'_>, list: NodeId) -> (Vec<Label>, i32) {
    let document = cx.document;
    let labels: Vec<Label> = document
        .children(list)
        .iter()
        .enumerate()
        .map(|(index, &item)| {
            let font = effective_font(document, item, cx.theme);
            let text = match document.kind(list) {
                Some(NodeKind::NumberedList(style)) => index_label(index + 1, *style),
                Some(NodeKind::BulletedList(style)) => bullet_label(*style).into(),
                _ => String::new(),
            };
            measure_label(cx, font, text)
        })
        .collect();
    let column = labels.iter().map(|l| l.width).max().unwrap_or(0);
    (labels, column)
}

fn item_size(cx: &LayoutContext<'_>, item: NodeId, label: &Label, column: i32, break_width: i32) -> Size {
    let content = stack::preferred_size(
        cx,
        cx.document.children(item),
        column,
        (break_width - column).max(0),
    );
    Size::new(content.width, content.height.max(label.height))
}

pub(super) fn preferred_size(cx: &LayoutContext<'_>, node: NodeId, break_width: i32) -> Size {
    let (labels, column) = labels(cx, node);
    let mut width = 0;
    let mut height: i32 = 0;
    for (&item, label) in cx.document.children(node).iter().zip(&labels) {
        let size = item_size(cx, item, label, column, break_width);
        width = width.max(size.width);
        height = height.saturating_add(size.height);
    }
    Size::new(width, height)
}

pub(super) fn item_preferred_size(cx: &LayoutContext<'_>, node: NodeId, break_width: i32) -> Size {
    let document = cx.document;
    let Some(list) = document.parent(node) else {
        return stack::preferred_size(cx, document.children(node), 0, break_width);
    };
    let (labels, column) = labels(cx, list);
    let index = document.children(list).iter().position(|&item| item == node);
    match index.and_then(|index| labels.get(index)) {
        Some(label) => item_size(cx, node, label, column, break_width),
        None => stack::preferred_size(cx, document.children(node), 0, break_width),
    }
}

impl<H: ViewHost> ViewTree<H> {
    pub(super) fn layout_list(&mut self, cx: &LayoutContext<'_>, id: ViewId, break_width: i32) -> Size {
        let Some(node) = self.node(id) else {
            return Size::ZERO;
        };
        let numbered = matches!(cx.document.kind(node), Some(NodeKind::NumberedList(_)));
        let children = self.children(id).to_vec();
        let (labels, column) = labels(cx, node);

        for (&child, label) in children.iter().zip(labels) {
            let Some(view) = self.views.get_mut(child) else {
                continue;
            };
            let ViewKind::ListItem(item) = &mut view.kind else {
                continue;
            };
            if item.label != label.text
                || item.label_width != label.width
                || item.label_height != label.height
                || item.column != column
                || item.numbered != numbered
            {
                item.label = label.text;
                item.label_width = label.width;
                item.label_height = label.height;
                item.column = column;
                item.numbered = numbered;
                view.valid = false;
            }
        }
        if let Some(ViewKind::List(list)) = self.views.get_mut(id).map(|v| &mut v.kind) {
            list.max_index_width = column;
        }

        let size = self.layout_stack(cx, &children, 0, break_width);
        self.check_children(cx.document, id);
        size
    }

    pub(super) fn layout_list_item(&mut self, cx: &LayoutContext<'_>, id: ViewId, break_width: i32) -> Size {
        let Some(ViewKind::ListItem(item)) = self.views.get(id).map(|v| &v.kind) else {
            return Size::ZERO;
        };
        let (column, label_height) = (item.column, item.label_height);
        let children = item.children.clone();
        let content = self.layout_stack(cx, &children, column, (break_width - column).max(0));
        self.check_children(cx.document, id);
        Size::new(content.width, content.height.max(label_height))
    }

    pub(super) fn paint_list_item(&self, cx: &LayoutContext<'_>, id: ViewId, surface: &mut dyn PaintSurface) {
        let Some(view) = self.views.get(id) else {
            return;
        };
        let ViewKind::ListItem(item) = &view.kind else {
            return;
        };
        if !item.label.is_empty() {
            let style = resolve(cx.document, view.node, cx.theme);
            let ascent = cx.measure.metrics(style.font).ascent;
            let x = if item.numbered {
                item.column - item.label_width
            } else {
                0
            };
            let label = Bounds::new(x, 0, item.label_width, item.label_height);
            if label.intersects(&surface.clip_bounds()) {
                surface.draw_text(
                    Point::new(x, floor_px(ascent)),
                    &item.label,
                    style.font,
                    style.foreground,
                );
            }
        }
        self.paint_children(cx, id, &item.children, surface);
    }

    /// Width of the widest index label of a list view.
    pub fn max_index_text_width(&self, id: ViewId) -> Option<i32> {
        match &self.views.get(id)?.kind {
            ViewKind::List(list) => Some(list.max_index_width),
            _ => None,
        }
    }

    /// The label shown in front of a list item view, as of its last layout.
    pub fn index_label(&self, id: ViewId) -> Option<&str> {
        match &self.views.get(id)?.kind {
            ViewKind::ListItem(item) => Some(&item.label),
            _ => None,
        }
    }
}
