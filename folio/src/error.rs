// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use folio_document::NodeId;

/// Error returned when a view tree cannot mirror a document structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    node: NodeId,
    child: &'static str,
    parent: &'static str,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The node that could not be presented.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub(crate) fn unsupported_nesting(
        node: NodeId,
        child: &'static str,
        parent: &'static str,
    ) -> Self {
        Self {
            kind: ErrorKind::UnsupportedNesting,
            node,
            child,
            parent,
        }
    }

    pub(crate) fn unknown_node(node: NodeId) -> Self {
        Self {
            kind: ErrorKind::UnknownNode,
            node,
            child: "",
            parent: "",
        }
    }

    pub(crate) fn not_attached(node: NodeId) -> Self {
        Self {
            kind: ErrorKind::NotAttached,
            node,
            child: "",
            parent: "",
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::UnsupportedNesting => write!(
                f,
                "a {} cannot be presented inside a {} (node {:?})",
                self.child, self.parent, self.node
            ),
            ErrorKind::UnknownNode => {
                write!(f, "node {:?} is not part of the document", self.node)
            }
            ErrorKind::NotAttached => {
                write!(f, "node {:?} has no view in this tree", self.node)
            }
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The node kind cannot be placed in its parent's kind, or a span would
    /// receive a second child.
    UnsupportedNesting,
    /// The handle does not refer to a live document node.
    UnknownNode,
    /// The node (or the document root) has no view in the tree.
    NotAttached,
}
