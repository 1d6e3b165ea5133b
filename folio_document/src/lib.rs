// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A mutable rich-text document tree.
//!
//! A [`Document`] is an arena of [`Node`]s: elements (the document root,
//! paragraphs, spans, lists and list items) and leaves (text runs, images and
//! embedded components). Every node knows its character count and its offset
//! within its parent, and these are kept contiguous across every edit.
//!
//! Each mutating method returns a [`NodeChange`] describing what happened, which
//! can be forwarded to any observer of the document.
//!
//! ## Features
//!
//! - `std` (enabled by default): Use the standard library.
//! - `libm`: Use floating point implementations from `libm` in `no_std` builds.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("folio_document requires either the `std` or `libm` feature to be enabled");

extern crate alloc;

mod change;
mod document;
mod error;
mod node;
mod style;

pub use peniko::Color;

pub use crate::change::NodeChange;
pub use crate::document::Document;
pub use crate::error::{Error, ErrorKind};
pub use crate::node::{Embedded, Extent, Node, NodeId, NodeKind};
pub use crate::style::{
    BulletStyle, ElementStyle, Font, HorizontalAlignment, NumberStyle, StyleAttribute,
};
