// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::NodeId;

/// Error returned by the mutating methods of a [`Document`](crate::Document).
///
/// Carries a non-exhaustive [`ErrorKind`] plus the node the operation was
/// addressed to and, for index and range errors, the offending position and the
/// valid upper bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    node: NodeId,
    index: usize,
    limit: usize,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The node the failed operation was addressed to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The offending index or range end, for [`ErrorKind::IndexOutOfBounds`] and
    /// [`ErrorKind::RangeOutOfBounds`].
    pub fn index(&self) -> usize {
        self.index
    }

    /// The largest acceptable value for [`Error::index`].
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub(crate) fn new(kind: ErrorKind, node: NodeId) -> Self {
        Self {
            kind,
            node,
            index: 0,
            limit: 0,
        }
    }

    pub(crate) fn index_out_of_bounds(node: NodeId, index: usize, limit: usize) -> Self {
        Self {
            kind: ErrorKind::IndexOutOfBounds,
            node,
            index,
            limit,
        }
    }

    pub(crate) fn range_out_of_bounds(node: NodeId, end: usize, limit: usize) -> Self {
        Self {
            kind: ErrorKind::RangeOutOfBounds,
            node,
            index: end,
            limit,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::UnknownNode => write!(f, "node {:?} is not part of the document", self.node),
            ErrorKind::NotAnElement => write!(f, "node {:?} cannot hold children", self.node),
            ErrorKind::NotText => write!(f, "node {:?} is not a text node", self.node),
            ErrorKind::IndexOutOfBounds => write!(
                f,
                "child index {} out of bounds for node {:?} with {} children",
                self.index, self.node, self.limit
            ),
            ErrorKind::RangeOutOfBounds => write!(
                f,
                "character range ending at {} out of bounds for node {:?} of length {}",
                self.index, self.node, self.limit
            ),
            ErrorKind::AlreadyAttached => {
                write!(f, "node {:?} already has a parent", self.node)
            }
            ErrorKind::Cycle => write!(
                f,
                "inserting node {:?} would make it its own ancestor",
                self.node
            ),
            ErrorKind::NotAList => write!(f, "node {:?} is not a list", self.node),
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The handle does not refer to a live node.
    UnknownNode,
    /// Children were requested of, or inserted into, a leaf.
    NotAnElement,
    /// A text operation was addressed to a node that is not text.
    NotText,
    /// A child index was past the end of the child list.
    IndexOutOfBounds,
    /// A character range extended past the end of the text.
    RangeOutOfBounds,
    /// The inserted node already has a parent (or is the root).
    AlreadyAttached,
    /// The inserted node is an ancestor of the insertion point.
    Cycle,
    /// A list style was set on a node that is not a list.
    NotAList,
}
