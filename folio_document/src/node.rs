// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::{BulletStyle, ElementStyle, NumberStyle};

slotmap::new_key_type! {
    /// Handle to a node of a [`Document`](crate::Document).
    ///
    /// Handles stay valid until the node is removed from the document.
    pub struct NodeId;
}

/// Pixel extent reported by embedded content.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Extent {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Extent {
    /// Create an extent.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Content embedded in the text flow: an image or a foreign component.
///
/// Only the size is consumed during layout. Painting is delegated to the paint
/// surface, which receives the embedded value itself.
pub trait Embedded: Debug {
    /// Intrinsic size of an image, or preferred size of a component.
    fn size(&self) -> Extent;
}

/// The kind of a node, with the kind-specific payload.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// The root of a document. Holds blocks.
    Document,
    /// A block of inline content.
    Paragraph,
    /// An inline wrapper carrying style for its content.
    Span,
    /// A list whose items are prefixed by a bullet glyph.
    BulletedList(BulletStyle),
    /// A list whose items are prefixed by their ordinal.
    NumberedList(NumberStyle),
    /// An item of a list. Holds blocks.
    ListItem,
    /// A run of text.
    Text(String),
    /// An image; `None` when the image is not available.
    Image(Option<Arc<dyn Embedded>>),
    /// An embedded component; `None` when there is no component.
    Component(Option<Arc<dyn Embedded>>),
}

impl NodeKind {
    /// Returns `true` for kinds that hold child nodes.
    pub fn is_element(&self) -> bool {
        !matches!(self, Self::Text(_) | Self::Image(_) | Self::Component(_))
    }

    /// A short, human readable name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Paragraph => "paragraph",
            Self::Span => "span",
            Self::BulletedList(_) => "bulleted list",
            Self::NumberedList(_) => "numbered list",
            Self::ListItem => "list item",
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Component(_) => "component",
        }
    }

    /// Number of characters a leaf of this kind contributes.
    pub(crate) fn leaf_character_count(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            Self::Image(_) | Self::Component(_) => 1,
            _ => 0,
        }
    }
}

/// A node of a [`Document`](crate::Document).
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) offset: usize,
    pub(crate) character_count: usize,
    pub(crate) style: ElementStyle,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        let character_count = kind.leaf_character_count();
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            offset: 0,
            character_count,
            style: ElementStyle::default(),
        }
    }

    /// The kind of this node.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The parent element, or `None` for the root and for detached nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered child nodes. Always empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Offset of this node's first character relative to its parent.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of characters in this node.
    ///
    /// Text counts Unicode scalar values, images and components count as a
    /// single character, and elements count the sum of their children.
    pub fn character_count(&self) -> usize {
        self.character_count
    }

    /// Presentation attributes declared on this node.
    pub fn style(&self) -> &ElementStyle {
        &self.style
    }

    /// The text of a text node.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }
}
