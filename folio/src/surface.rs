// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The paint surface views draw into.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use folio_document::{Embedded, Font};
use peniko::Color;

use crate::geometry::{Bounds, Point};

/// A drawing target with a translation and clip stack.
///
/// Coordinates passed to the drawing methods are local: they are offset by the
/// accumulated translation before reaching the underlying target.
pub trait PaintSurface {
    /// The current clip rectangle in local coordinates.
    fn clip_bounds(&self) -> Bounds;

    /// Push a copy of the current translation and clip.
    fn save(&mut self);

    /// Pop the translation and clip pushed by the matching [`save`](Self::save).
    fn restore(&mut self);

    /// Move the local origin by `dx` and `dy`.
    fn translate(&mut self, dx: i32, dy: i32);

    /// Intersect the clip with `bounds`, given in local coordinates.
    fn clip(&mut self, bounds: Bounds);

    /// Fill a rectangle.
    fn fill_rect(&mut self, bounds: Bounds, color: Color);

    /// Draw a run of text with its baseline starting at `origin`.
    fn draw_text(&mut self, origin: Point, text: &str, font: &Font, color: Color);

    /// Draw an image or embedded component into `bounds`.
    fn draw_embed(&mut self, bounds: Bounds, content: &Arc<dyn Embedded>);
}

/// A drawing operation recorded by a [`DisplayList`], in surface coordinates.
#[derive(Clone, Debug)]
pub enum PaintCommand {
    /// A filled rectangle, already clipped.
    FillRect {
        /// Filled area.
        bounds: Bounds,
        /// Fill color.
        color: Color,
    },
    /// A run of text.
    DrawText {
        /// Start of the baseline.
        origin: Point,
        /// The characters drawn.
        text: String,
        /// Font of the run.
        font: Font,
        /// Text color.
        color: Color,
    },
    /// An image or embedded component.
    DrawEmbed {
        /// Area given to the content.
        bounds: Bounds,
        /// The content.
        content: Arc<dyn Embedded>,
    },
}

#[derive(Copy, Clone, Debug)]
struct State {
    origin: Point,
    clip: Bounds,
}

/// A [`PaintSurface`] that records what is drawn.
///
/// Useful for tests and for hosts that replay drawing onto another backend.
#[derive(Clone, Debug)]
pub struct DisplayList {
    state: State,
    stack: Vec<State>,
    commands: Vec<PaintCommand>,
}

impl DisplayList {
    /// Create a display list for a viewport of the given bounds.
    pub fn new(viewport: Bounds) -> Self {
        Self {
            state: State {
                origin: Point::ZERO,
                clip: viewport,
            },
            stack: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// The recorded commands, in drawing order.
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the list empty.
    pub fn take_commands(&mut self) -> Vec<PaintCommand> {
        core::mem::take(&mut self.commands)
    }

    /// The concatenated text of every recorded text run.
    pub fn text(&self) -> String {
        self.commands
            .iter()
            .filter_map(|command| match command {
                PaintCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new(Bounds::new(0, 0, i32::MAX, i32::MAX))
    }
}

impl PaintSurface for DisplayList {
    fn clip_bounds(&self) -> Bounds {
        self.state
            .clip
            .translate(-self.state.origin.x, -self.state.origin.y)
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        } else {
            tracing::warn!("unbalanced restore on display list");
        }
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        self.state.origin = self.state.origin.translate(dx, dy);
    }

    fn clip(&mut self, bounds: Bounds) {
        let bounds = bounds.translate(self.state.origin.x, self.state.origin.y);
        self.state.clip = self.state.clip.intersect(&bounds);
    }

    fn fill_rect(&mut self, bounds: Bounds, color: Color) {
        let bounds = bounds
            .translate(self.state.origin.x, self.state.origin.y)
            .intersect(&self.state.clip);
        if !bounds.is_empty() {
            self.commands.push(PaintCommand::FillRect { bounds, color });
        }
    }

    fn draw_text(&mut self, origin: Point, text: &str, font: &Font, color: Color) {
        if text.is_empty() {
            return;
        }
        self.commands.push(PaintCommand::DrawText {
            origin: origin.translate(self.state.origin.x, self.state.origin.y),
            text: text.into(),
            font: font.clone(),
            color,
        });
    }

    fn draw_embed(&mut self, bounds: Bounds, content: &Arc<dyn Embedded>) {
        let bounds = bounds.translate(self.state.origin.x, self.state.origin.y);
        if bounds.intersects(&self.state.clip) {
            self.commands.push(PaintCommand::DrawEmbed {
                bounds,
                content: content.clone(),
            });
        }
    }
}
