// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font metrics.

use folio_document::Font;

use crate::geometry::ceil_px;

/// Vertical metrics of a font, in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LineMetrics {
    /// Distance from the top of a line to the baseline.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the glyphs.
    pub descent: f32,
    /// Extra space below the descent.
    pub leading: f32,
    /// Offset of the underline from the baseline; positive is downwards.
    pub underline_offset: f32,
    /// Offset of the strikethrough from the baseline; negative is upwards.
    pub strikethrough_offset: f32,
}

impl LineMetrics {
    /// Height of a line.
    pub fn height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }

    /// Height of a line, rounded up to whole pixels.
    pub fn pixel_height(&self) -> i32 {
        ceil_px(self.height())
    }
}

/// Source of glyph advances and font metrics.
///
/// Views never resolve fonts; they ask the measurer about every character they
/// lay out, keyed by the effective [`Font`] of the text.
pub trait TextMeasure {
    /// Horizontal advance of `ch` in `font`.
    fn advance(&self, font: &Font, ch: char) -> f32;

    /// Vertical metrics of `font`.
    fn metrics(&self, font: &Font) -> LineMetrics;

    /// Combined advance of every character of `text`.
    fn text_width(&self, font: &Font, text: &str) -> f32 {
        text.chars().map(|ch| self.advance(font, ch)).sum()
    }
}

/// A deterministic measurer in which every character has the same advance.
///
/// All values scale with the font size, which makes layouts easy to predict.
/// Useful for tests and for hosts without a font stack.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MonospaceMeasure {
    /// Advance of every character, as a fraction of the font size.
    pub advance: f32,
    /// Ascent, as a fraction of the font size.
    pub ascent: f32,
    /// Descent, as a fraction of the font size.
    pub descent: f32,
    /// Leading, as a fraction of the font size.
    pub leading: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            advance: 0.5,
            ascent: 0.8,
            descent: 0.2,
            leading: 0.0,
        }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn advance(&self, font: &Font, _ch: char) -> f32 {
        font.size * self.advance
    }

    fn metrics(&self, font: &Font) -> LineMetrics {
        LineMetrics {
            ascent: font.size * self.ascent,
            descent: font.size * self.descent,
            leading: font.size * self.leading,
            underline_offset: font.size * self.descent * 0.5,
            strikethrough_offset: -font.size * self.ascent * 0.35,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monospace_scales_with_font_size() {
        let measure = MonospaceMeasure::default();
        let font = Font::new("mono", 10.0);
        assert_eq!(measure.advance(&font, 'W'), 5.0);
        assert_eq!(measure.text_width(&font, "four"), 20.0);

        let metrics = measure.metrics(&font);
        assert_eq!(metrics.pixel_height(), 10);
        assert_eq!(metrics.ascent, 8.0);
    }
}
