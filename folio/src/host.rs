// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::geometry::Bounds;

/// The widget that owns a view tree.
///
/// The root view forwards layout invalidation and repaint requests here.
pub trait ViewHost {
    /// The view tree needs a new layout pass.
    fn invalidate(&mut self);

    /// The given region, in widget coordinates, needs to be redrawn.
    fn repaint(&mut self, region: Bounds);
}

/// A host that ignores every request.
impl ViewHost for () {
    fn invalidate(&mut self) {}

    fn repaint(&mut self, _region: Bounds) {}
}
