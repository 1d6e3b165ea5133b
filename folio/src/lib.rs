// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Folio lays out, paints and hit-tests rich-text documents.
//!
//! A [`ViewTree`] mirrors a [`Document`](folio_document::Document) with one view
//! per presented node. Paragraphs break their inline content into rows at a
//! break width, lists label their items, and every view caches its layout until
//! a change of the document invalidates it. Queries map between points and
//! character offsets for caret placement and navigation.
//!
//! Folio does not resolve fonts or rasterize anything. Glyph advances and font
//! metrics come from a [`TextMeasure`], and drawing goes to a [`PaintSurface`].
//! [`MonospaceMeasure`] and [`DisplayList`] are simple implementations of both.
//!
//! [`TextPane`] ties it together for a widget: it owns the tree of the installed
//! document, applies a margin and text wrapping, and tracks the selection.
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
compile_error!("folio requires either the `std` or `libm` feature to be enabled");

extern crate alloc;

pub use folio_document;

mod breaking;
mod error;
mod geometry;
mod host;
mod measure;
mod numbering;
mod pane;
mod style;
mod surface;
mod view;

#[cfg(test)]
mod tests;

pub use crate::breaking::{LineFit, fit_line};
pub use crate::error::{Error, ErrorKind};
pub use crate::geometry::{Bounds, Insets, Point, Size};
pub use crate::host::ViewHost;
pub use crate::measure::{LineMetrics, MonospaceMeasure, TextMeasure};
pub use crate::numbering::{bullet_label, index_label, numeral};
pub use crate::pane::{PaneConfig, TextPane};
pub use crate::style::Theme;
pub use crate::surface::{DisplayList, PaintCommand, PaintSurface};
pub use crate::view::{LayoutContext, ScrollDirection, ViewId, ViewTree};
