// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style attributes carried by document elements.

use alloc::string::String;

use peniko::Color;

/// A font request.
///
/// Folio never resolves fonts itself; the request is handed to the text measurer
/// and the paint surface as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    /// Family name, e.g. `"sans-serif"`.
    pub family: String,
    /// Size in pixels.
    pub size: f32,
    /// Bold weight.
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
}

impl Font {
    /// Create a regular (non-bold, upright) font request.
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    /// Returns a copy of this font with the bold flag set to `bold`.
    #[must_use]
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Returns a copy of this font with the italic flag set to `italic`.
    #[must_use]
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("sans-serif", 14.0)
    }
}

/// Horizontal alignment of the rows of a paragraph.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Rows start at the left edge.
    #[default]
    Left,
    /// Rows are centered within the widest row.
    Center,
    /// Rows end at the right edge of the widest row.
    Right,
}

/// Glyph used in front of every item of a bulleted list.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BulletStyle {
    /// A filled circle.
    #[default]
    CircleFilled,
    /// An outlined circle.
    CircleOutline,
    /// A filled square.
    SquareFilled,
    /// An outlined square.
    SquareOutline,
}

/// Ordinal format used in front of the items of a numbered list.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NumberStyle {
    /// `1`, `2`, `3`, ...
    #[default]
    Decimal,
    /// `a`, `b`, `c`, ...
    LowerAlpha,
    /// `A`, `B`, `C`, ...
    UpperAlpha,
    /// `i`, `ii`, `iii`, ...
    LowerRoman,
    /// `I`, `II`, `III`, ...
    UpperRoman,
}

/// Presentation attributes declared on an element.
///
/// `None` (and `false`) means "not declared here"; readers resolve the effective
/// value by walking up the ancestors until one declares it.
#[derive(Clone, Debug, Default)]
pub struct ElementStyle {
    /// Font for text content.
    pub font: Option<Font>,
    /// Text color.
    pub foreground: Option<Color>,
    /// Fill painted behind the element's children.
    pub background: Option<Color>,
    /// Underline text content.
    pub underline: bool,
    /// Strike through text content.
    pub strikethrough: bool,
    /// Row alignment; only meaningful on paragraphs.
    pub alignment: HorizontalAlignment,
}

/// Identifies which style attribute a [`NodeChange::StyleChanged`] notification is about.
///
/// [`NodeChange::StyleChanged`]: crate::NodeChange::StyleChanged
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StyleAttribute {
    /// [`ElementStyle::font`].
    Font,
    /// [`ElementStyle::foreground`].
    Foreground,
    /// [`ElementStyle::background`].
    Background,
    /// [`ElementStyle::underline`].
    Underline,
    /// [`ElementStyle::strikethrough`].
    Strikethrough,
    /// [`ElementStyle::alignment`].
    Alignment,
    /// The [`BulletStyle`] or [`NumberStyle`] of a list.
    ListStyle,
}
