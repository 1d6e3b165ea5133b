// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use folio_document::{Font, NodeId, NodeKind, NumberStyle};
use peniko::color::palette::css;

use super::utils::TestEnv;
use crate::{
    DisplayList, ErrorKind, LayoutContext, LineMetrics, MonospaceMeasure, PaintCommand, Point,
    TextMeasure,
};

#[test]
fn text_edits_invalidate_up_the_tree() {
    let mut env = TestEnv::new();
    let first = env.paragraph("hello");
    let second = env.paragraph("world");
    let text = env.first_child(first);
    env.install();
    env.layout(200);
    let invalidations = env.tree.host().invalidations;

    let change = env.document.insert_text(text, 5, " there").unwrap();
    env.apply(change);
    assert!(!env.tree.is_valid(env.view(text)), "edited text");
    assert!(!env.tree.is_valid(env.view(first)), "its paragraph");
    assert!(!env.tree.is_valid(env.root()), "the root");
    assert!(env.tree.is_valid(env.view(second)), "siblings stay valid");
    assert_eq!(env.tree.host().invalidations, invalidations + 1);

    let passes = env.tree.layout_passes(env.view(second));
    env.layout(200);
    assert_eq!(env.tree.bounds(env.view(text)).width, 55);
    assert_eq!(env.tree.layout_passes(env.view(second)), passes);
}

#[test]
fn removed_text_shortens_the_chain() {
    let mut env = TestEnv::new();
    let paragraph = env.paragraph("hello world foo");
    let text = env.first_child(paragraph);
    env.install();
    env.layout(50);
    assert!(env.tree.next(env.view(text)).is_some(), "wrapped");

    let change = env.document.remove_text(text, 5, 10).unwrap();
    env.apply(change);
    env.layout(50);
    assert!(env.tree.next(env.view(text)).is_none(), "fits again");
    assert_eq!(env.tree.character_count(&env.document, env.view(text)), 5);
    assert_eq!(env.tree.len(), 3);
}

#[test]
fn inserted_nodes_get_views() {
    let mut env = TestEnv::new();
    env.paragraph("first");
    env.install();
    env.layout(200);

    let paragraph = env.document.create(NodeKind::Paragraph);
    let text = env.document.create(NodeKind::Text("zeroth".into()));
    env.document.append(paragraph, text).unwrap();
    let root = env.root_node();
    let change = env.document.insert(root, 0, paragraph).unwrap();
    env.apply(change);

    assert_eq!(env.tree.children(env.root()).len(), 2);
    assert_eq!(env.tree.children(env.root())[0], env.view(paragraph));
    assert_eq!(env.tree.parent(env.view(text)), Some(env.view(paragraph)));
    assert!(!env.tree.is_valid(env.root()), "the root is laid out again");

    env.layout(200);
    let second = env.tree.children(env.root())[1];
    assert_eq!(env.tree.bounds(second).y, 10);
    assert_eq!(env.tree.offset(&env.document, second), 6);
}

#[test]
fn removed_nodes_lose_their_views() {
    let mut env = TestEnv::new();
    let first = env.paragraph("first");
    let second = env.paragraph("second");
    let text = env.first_child(first);
    env.install();
    env.layout(200);
    assert_eq!(env.tree.len(), 5);

    let root = env.root_node();
    let change = env.document.remove(root, 0, 1).unwrap();
    env.apply(change);
    assert!(env.tree.view(first).is_none(), "paragraph view dropped");
    assert!(env.tree.view(text).is_none(), "text view dropped");
    assert_eq!(env.tree.len(), 3);

    env.layout(200);
    assert_eq!(env.tree.bounds(env.view(second)).y, 0);
}

#[test]
fn metric_styles_invalidate_the_subtree() {
    let mut env = TestEnv::new();
    let paragraph = env.paragraph("hello");
    let text = env.first_child(paragraph);
    env.install();
    env.layout(200);

    let change = env
        .document
        .set_font(paragraph, Some(Font::new("mono", 20.0)))
        .unwrap();
    env.apply(change);
    assert!(!env.tree.is_valid(env.view(text)), "text below the change");
    assert!(!env.tree.is_valid(env.root()), "root above the change");

    env.layout(200);
    assert_eq!(env.tree.bounds(env.view(text)).width, 50);
}

#[test]
fn background_changes_only_repaint() {
    let mut env = TestEnv::new();
    let paragraph = env.paragraph("hello");
    env.install();
    env.layout(200);
    env.tree.host_mut().repaints.clear();

    let change = env
        .document
        .set_background(paragraph, Some(css::BEIGE))
        .unwrap();
    env.apply(change);
    assert!(env.tree.is_valid(env.root()), "layout is untouched");
    assert_eq!(
        env.tree.host().repaints,
        [env.tree.bounds(env.view(paragraph))]
    );
}

#[test]
fn list_style_changes_relabel_the_items() {
    let mut env = TestEnv::new();
    let root = env.root_node();
    let list = env
        .document
        .append_new(root, NodeKind::NumberedList(NumberStyle::Decimal))
        .unwrap();
    let mut items = alloc::vec::Vec::new();
    for text in ["a", "b", "c"] {
        let item = env.document.append_new(list, NodeKind::ListItem).unwrap();
        env.document.append_paragraph(item, text).unwrap();
        items.push(item);
    }
    env.install();
    env.layout(200);
    assert_eq!(env.tree.index_label(env.view(items[2])), Some("3. "));

    let change = env
        .document
        .set_number_style(list, NumberStyle::UpperRoman)
        .unwrap();
    env.apply(change);
    for &item in &items {
        assert!(!env.tree.is_valid(env.view(item)), "every item is relabeled");
    }
    env.layout(200);
    assert_eq!(env.tree.index_label(env.view(items[2])), Some("III. "));
    assert_eq!(env.tree.max_index_text_width(env.view(list)), Some(25));

    let content = env.view(env.first_child(items[0]));
    assert_eq!(env.tree.bounds(content).x, 25);
}

#[test]
fn inserted_items_shift_the_numbering() {
    let mut env = TestEnv::new();
    let root = env.root_node();
    let list = env
        .document
        .append_new(root, NodeKind::NumberedList(NumberStyle::LowerAlpha))
        .unwrap();
    let item = env.document.append_new(list, NodeKind::ListItem).unwrap();
    env.document.append_paragraph(item, "old").unwrap();
    env.install();
    env.layout(200);
    assert_eq!(env.tree.index_label(env.view(item)), Some("a. "));

    let front = env.document.create(NodeKind::ListItem);
    let change = env.document.insert(list, 0, front).unwrap();
    env.apply(change);
    env.layout(200);
    assert_eq!(env.tree.index_label(env.view(front)), Some("a. "));
    assert_eq!(env.tree.index_label(env.view(item)), Some("b. "));
}

#[test]
fn unsupported_nesting_is_rejected() {
    let mut env = TestEnv::new();
    let root = env.root_node();
    let text = env
        .document
        .append_new(root, NodeKind::Text("loose".into()))
        .unwrap();
    let err = env.tree.install(&env.document).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedNesting);
    assert_eq!(err.node(), text);
    assert!(env.tree.is_empty(), "nothing is left behind");
}

#[test]
fn spans_hold_a_single_child() {
    let mut env = TestEnv::new();
    let paragraph = env.paragraph("");
    let span = env.document.append_new(paragraph, NodeKind::Span).unwrap();
    env.document
        .append_new(span, NodeKind::Text("one".into()))
        .unwrap();
    env.install();

    let extra = env.document.create(NodeKind::Text("two".into()));
    let change = env.document.append(span, extra).unwrap();
    let err = env.tree.node_changed(&env.document, &change).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedNesting);
    assert!(env.tree.view(extra).is_none(), "no view for the rejected node");
}

#[test]
fn changes_to_unpresented_nodes_are_ignored() {
    let mut env = TestEnv::new();
    env.paragraph("shown");
    env.install();

    let detached = env.document.create(NodeKind::Paragraph);
    let text = env.document.create(NodeKind::Text("hidden".into()));
    let change = env.document.append(detached, text).unwrap();
    env.apply(change);
    assert!(env.tree.view(text).is_none(), "detached content has no view");
}

/// Monospace, except that the "narrow" family is half as wide.
struct NarrowMeasure(MonospaceMeasure);

impl TextMeasure for NarrowMeasure {
    fn advance(&self, font: &Font, ch: char) -> f32 {
        let advance = self.0.advance(font, ch);
        if font.family == "narrow" {
            advance / 2.0
        } else {
            advance
        }
    }

    fn metrics(&self, font: &Font) -> LineMetrics {
        self.0.metrics(font)
    }
}

#[test]
fn narrower_labels_move_within_the_column() {
    let mut env = TestEnv::new();
    let root = env.root_node();
    let list = env
        .document
        .append_new(root, NodeKind::NumberedList(NumberStyle::Decimal))
        .unwrap();
    let items: alloc::vec::Vec<NodeId> = (0..10)
        .map(|_| {
            let item = env.document.append_new(list, NodeKind::ListItem).unwrap();
            env.document.append_paragraph(item, "x").unwrap();
            item
        })
        .collect();
    env.install();
    let measure = NarrowMeasure(MonospaceMeasure::default());
    let layout = |env: &mut TestEnv| {
        let root = env.root();
        let cx = LayoutContext::new(&env.document, &measure, &env.theme);
        env.tree.layout(&cx, root, 200);
    };
    layout(&mut env);

    // Same height and column, only the first label gets narrower.
    let change = env
        .document
        .set_font(items[0], Some(Font::new("narrow", 10.0)))
        .unwrap();
    env.apply(change);
    layout(&mut env);
    assert_eq!(env.tree.max_index_text_width(env.view(list)), Some(20));

    let mut surface = DisplayList::default();
    let cx = LayoutContext::new(&env.document, &measure, &env.theme);
    env.tree.paint(&cx, env.root(), &mut surface);
    let first = surface.commands().iter().find_map(|command| match command {
        PaintCommand::DrawText { origin, text, .. } if text == "1. " => Some(*origin),
        _ => None,
    });
    // "1. " is 8 pixels wide and right aligned in the 20 pixel column.
    assert_eq!(first, Some(Point::new(12, 8)));
}
