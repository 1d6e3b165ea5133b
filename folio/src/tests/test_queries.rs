// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use folio_document::{NodeKind, NumberStyle};

use super::utils::TestEnv;
use crate::{Bounds, ScrollDirection};

/// "hello " and "world foo" on two rows, then "bar" on a third.
fn two_paragraphs() -> TestEnv {
    let mut env = TestEnv::new();
    env.paragraph("hello world foo");
    env.paragraph("bar");
    env.install();
    env.layout(50);
    env
}

#[test]
fn points_map_to_the_character_under_them() {
    let env = two_paragraphs();
    let (tree, document, root) = (&env.tree, &env.document, env.root());

    assert_eq!(tree.insertion_point(document, root, 7, 5), Some(1));
    assert_eq!(tree.insertion_point(document, root, 8, 5), Some(2));
    assert_eq!(tree.insertion_point(document, root, 0, 15), Some(6));
    assert_eq!(tree.insertion_point(document, root, 2, 25), Some(15));
    // The right half of a character moves to the next one.
    assert_eq!(tree.insertion_point(document, root, 3, 25), Some(16));
    assert_eq!(tree.insertion_point(document, root, 3, 100), None);
}

#[test]
fn points_past_a_row_end_map_to_its_last_character() {
    let env = two_paragraphs();
    let (tree, document, root) = (&env.tree, &env.document, env.root());

    assert_eq!(tree.insertion_point(document, root, 40, 5), Some(5));
    assert_eq!(tree.insertion_point(document, root, 100, 15), Some(14));
}

#[test]
fn insertion_points_stay_within_the_document() {
    let env = two_paragraphs();
    let count = env.character_count();
    for x in (-10..80).step_by(3) {
        for y in (-5..40).step_by(2) {
            if let Some(offset) = env.tree.insertion_point(&env.document, env.root(), x, y) {
                assert!(offset < count, "({x}, {y}) maps to {offset}");
            }
        }
    }
}

#[test]
fn caret_moves_between_rows() {
    let env = two_paragraphs();
    let (tree, document, root) = (&env.tree, &env.document, env.root());
    let next = |from, direction| tree.next_insertion_point(document, root, 7, from, direction);

    assert_eq!(next(Some(1), ScrollDirection::Down), Some(7));
    assert_eq!(next(Some(7), ScrollDirection::Up), Some(1));
    // Across paragraphs.
    assert_eq!(next(Some(7), ScrollDirection::Down), Some(16));
    assert_eq!(next(Some(16), ScrollDirection::Up), Some(7));
    // Off the document.
    assert_eq!(next(Some(1), ScrollDirection::Up), None);
    assert_eq!(next(Some(16), ScrollDirection::Down), None);
    assert_eq!(next(Some(19), ScrollDirection::Down), None);
}

#[test]
fn caret_enters_from_the_edges() {
    let env = two_paragraphs();
    let (tree, document, root) = (&env.tree, &env.document, env.root());

    assert_eq!(
        tree.next_insertion_point(document, root, 7, None, ScrollDirection::Down),
        Some(1)
    );
    assert_eq!(
        tree.next_insertion_point(document, root, 7, None, ScrollDirection::Up),
        Some(16)
    );
}

#[test]
fn caret_past_a_row_end_stops_before_the_break() {
    let env = two_paragraphs();
    let (tree, document, root) = (&env.tree, &env.document, env.root());

    assert_eq!(
        tree.next_insertion_point(document, root, 100, Some(7), ScrollDirection::Up),
        Some(5)
    );
}

#[test]
fn rows_are_consistent() {
    let env = two_paragraphs();
    let (tree, document, root) = (&env.tree, &env.document, env.root());
    let rows = tree.row_count(root);
    assert_eq!(rows, 3);

    for offset in 0..=env.character_count() {
        let row = tree.row_at(document, root, offset).unwrap();
        assert!(row < rows, "offset {offset} is on row {row}");
    }
    assert_eq!(tree.row_at(document, root, 5), Some(0));
    assert_eq!(tree.row_at(document, root, 6), Some(1));
    assert_eq!(tree.row_at(document, root, 15), Some(2));
    assert_eq!(tree.row_at(document, root, 18), Some(2));
    assert_eq!(tree.row_at(document, root, 19), None);
}

#[test]
fn character_bounds_follow_the_rows() {
    let env = two_paragraphs();
    let (tree, document, root) = (&env.tree, &env.document, env.root());
    let bounds = |offset| tree.character_bounds(document, root, offset);

    assert_eq!(bounds(0), Some(Bounds::new(0, 0, 5, 10)));
    assert_eq!(bounds(6), Some(Bounds::new(0, 10, 5, 10)));
    assert_eq!(bounds(14), Some(Bounds::new(40, 10, 5, 10)));
    assert_eq!(bounds(15), Some(Bounds::new(0, 20, 5, 10)));
    // The end of the document is the terminator of the last paragraph.
    assert_eq!(bounds(18), Some(Bounds::new(15, 20, 4, 10)));
    assert_eq!(bounds(19), None);

    let first = tree.children(root)[0];
    assert_eq!(
        tree.character_bounds(document, first, 15),
        Some(Bounds::new(45, 10, 4, 10))
    );
}

#[test]
fn hit_testing_agrees_with_character_bounds() {
    let env = two_paragraphs();
    let (tree, document, root) = (&env.tree, &env.document, env.root());
    for offset in 0..env.character_count() {
        let bounds = tree.character_bounds(document, root, offset).unwrap();
        assert_eq!(
            tree.insertion_point(document, root, bounds.x + 1, bounds.y + 1),
            Some(offset)
        );
    }
}

#[test]
fn list_items_are_queried_through_their_column() {
    let mut env = TestEnv::new();
    let root = env.root_node();
    let list = env
        .document
        .append_new(root, NodeKind::NumberedList(NumberStyle::Decimal))
        .unwrap();
    for text in ["ab", "cd", "ef"] {
        let item = env.document.append_new(list, NodeKind::ListItem).unwrap();
        env.document.append_paragraph(item, text).unwrap();
    }
    env.install();
    env.layout(200);
    let (tree, document, root) = (&env.tree, &env.document, env.root());

    // The label column is 15 pixels wide.
    assert_eq!(tree.insertion_point(document, root, 21, 15), Some(3));
    assert_eq!(tree.insertion_point(document, root, 3, 15), Some(2));
    assert_eq!(
        tree.character_bounds(document, root, 3),
        Some(Bounds::new(20, 10, 5, 10))
    );
    assert_eq!(tree.row_count(root), 3);
    assert_eq!(tree.row_at(document, root, 4), Some(2));
    assert_eq!(
        tree.next_insertion_point(document, root, 21, Some(1), ScrollDirection::Down),
        Some(3)
    );
}

#[test]
fn spans_wrap_with_their_content() {
    let mut env = TestEnv::new();
    let root = env.root_node();
    let paragraph = env.document.append_new(root, NodeKind::Paragraph).unwrap();
    let span = env.document.append_new(paragraph, NodeKind::Span).unwrap();
    env.document
        .append_new(span, NodeKind::Text("hello world foo".into()))
        .unwrap();
    env.install();
    env.layout(50);
    let (tree, document) = (&env.tree, &env.document);

    let first = env.view(span);
    let rest = tree.next(first).expect("the span wraps");
    assert_eq!(tree.character_count(document, first), 6);
    assert_eq!(tree.character_count(document, rest), 9);
    assert_eq!(tree.bounds(rest), Bounds::new(0, 10, 45, 10));

    let view = env.view(paragraph);
    assert_eq!(tree.insertion_point(document, view, 0, 15), Some(6));
    assert_eq!(
        tree.character_bounds(document, view, 7),
        Some(Bounds::new(5, 10, 5, 10))
    );
    assert_eq!(
        tree.next_insertion_point(document, view, 7, Some(1), ScrollDirection::Down),
        Some(7)
    );
}

#[test]
fn embeds_are_a_single_character() {
    let mut env = TestEnv::new();
    let paragraph = env.paragraph("ab");
    env.document
        .append_new(paragraph, super::utils::Picture::image(20, 30))
        .unwrap();
    env.install();
    env.layout(200);
    let (tree, document, root) = (&env.tree, &env.document, env.root());

    assert_eq!(tree.insertion_point(document, root, 25, 10), Some(2));
    assert_eq!(
        tree.character_bounds(document, root, 2),
        Some(Bounds::new(10, 0, 20, 30))
    );
}
