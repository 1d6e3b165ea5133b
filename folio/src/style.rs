// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Effective style resolution.

use folio_document::{Document, Font, NodeId};
use peniko::Color;
use peniko::color::palette::css;

/// Fallback presentation values, used where no element declares one.
#[derive(Clone, Debug)]
pub struct Theme {
    /// Font of text without a declared font.
    pub font: Font,
    /// Color of text without a declared foreground.
    pub color: Color,
    /// Color of selected text.
    pub selection_color: Color,
    /// Fill behind selected text.
    pub selection_background_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font: Font::default(),
            color: css::BLACK,
            selection_color: css::WHITE,
            selection_background_color: css::STEEL_BLUE,
        }
    }
}

/// The style a leaf is drawn with, after inheritance.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedStyle<'a> {
    pub(crate) font: &'a Font,
    pub(crate) foreground: Color,
    pub(crate) underline: bool,
    pub(crate) strikethrough: bool,
}

/// Resolve the style of `node` by walking up its ancestors.
///
/// Font and foreground come from the nearest element declaring one, falling back
/// to the theme. Underline and strikethrough apply if any ancestor turns them on.
pub(crate) fn resolve<'a>(document: &'a Document, node: NodeId, theme: &'a Theme) -> ResolvedStyle<'a> {
    let mut font = None;
    let mut foreground = None;
    let mut underline = false;
    let mut strikethrough = false;
    for (_, ancestor) in document.ancestors(node) {
        let style = ancestor.style();
        if font.is_none() {
            font = style.font.as_ref();
        }
        if foreground.is_none() {
            foreground = style.foreground;
        }
        underline |= style.underline;
        strikethrough |= style.strikethrough;
    }
    ResolvedStyle {
        font: font.unwrap_or(&theme.font),
        foreground: foreground.unwrap_or(theme.color),
        underline,
        strikethrough,
    }
}

/// The effective font of `node`.
pub(crate) fn effective_font<'a>(document: &'a Document, node: NodeId, theme: &'a Theme) -> &'a Font {
    document
        .ancestors(node)
        .find_map(|(_, ancestor)| ancestor.style().font.as_ref())
        .unwrap_or(&theme.font)
}

/// The background declared by `node` or its nearest ancestor declaring one.
pub(crate) fn effective_background(document: &Document, node: NodeId) -> Option<Color> {
    document
        .ancestors(node)
        .find_map(|(_, ancestor)| ancestor.style().background)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_document::NodeKind;

    #[test]
    fn styles_inherit_from_the_nearest_declaration() {
        let mut doc = Document::new();
        let root = doc.root();
        let paragraph = doc.append_new(root, NodeKind::Paragraph).unwrap();
        let span = doc.append_new(paragraph, NodeKind::Span).unwrap();
        let text = doc
            .append_new(span, NodeKind::Text("styled".into()))
            .unwrap();

        doc.set_font(root, Some(Font::new("serif", 12.0))).unwrap();
        doc.set_font(span, Some(Font::new("mono", 9.0))).unwrap();
        doc.set_foreground(paragraph, Some(css::RED)).unwrap();
        doc.set_underline(paragraph, true).unwrap();
        doc.set_background(root, Some(css::BEIGE)).unwrap();

        let theme = Theme::default();
        let style = resolve(&doc, text, &theme);
        assert_eq!(style.font.family, "mono");
        assert_eq!(style.foreground.to_rgba8(), css::RED.to_rgba8());
        assert!(style.underline);
        assert!(!style.strikethrough);

        assert_eq!(effective_font(&doc, paragraph, &theme).family, "serif");
        assert!(effective_background(&doc, text).is_some());
    }

    #[test]
    fn theme_fills_in_undeclared_values() {
        let mut doc = Document::new();
        let root = doc.root();
        let paragraph = doc.append_paragraph(root, "plain").unwrap();
        let text = doc.children(paragraph)[0];

        let theme = Theme::default();
        let style = resolve(&doc, text, &theme);
        assert_eq!(style.font, &theme.font);
        assert_eq!(style.foreground.to_rgba8(), theme.color.to_rgba8());
        assert!(effective_background(&doc, text).is_none());
    }
}
