// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use crate::{NodeId, StyleAttribute};

/// A notification describing one mutation of a [`Document`](crate::Document).
///
/// Every mutating method of the document returns the change it made. Observers
/// (such as a view tree) are expected to consume it before the next mutation, so
/// the indices and offsets it carries are relative to the document state right
/// after the mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeChange {
    /// A node was inserted into `parent` at child position `index`.
    NodeInserted {
        /// The element that received the node.
        parent: NodeId,
        /// Child position of the new node.
        index: usize,
    },
    /// Consecutive children starting at `index` were removed from `parent`.
    ///
    /// The removed nodes and their descendants no longer exist in the document;
    /// their handles are reported so observers can drop what they keyed on them.
    NodesRemoved {
        /// The element that lost the nodes.
        parent: NodeId,
        /// Child position of the first removed node.
        index: usize,
        /// Handles of the removed nodes, in their former order.
        removed: Vec<NodeId>,
    },
    /// Characters were inserted into a text node.
    RangeInserted {
        /// The text node.
        node: NodeId,
        /// Character offset of the insertion, relative to the node.
        offset: usize,
        /// Number of inserted characters.
        count: usize,
    },
    /// Characters were removed from a text node.
    RangeRemoved {
        /// The text node.
        node: NodeId,
        /// Character offset of the removal, relative to the node.
        offset: usize,
        /// Number of removed characters.
        count: usize,
    },
    /// A style attribute of an element changed.
    StyleChanged {
        /// The element.
        node: NodeId,
        /// The attribute that changed.
        attribute: StyleAttribute,
    },
}

impl NodeChange {
    /// The node the change was reported on.
    pub fn node(&self) -> NodeId {
        match self {
            Self::NodeInserted { parent, .. } | Self::NodesRemoved { parent, .. } => *parent,
            Self::RangeInserted { node, .. }
            | Self::RangeRemoved { node, .. }
            | Self::StyleChanged { node, .. } => *node,
        }
    }
}
