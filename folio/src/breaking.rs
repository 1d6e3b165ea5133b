// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting text runs into a break width.

use icu_segmenter::LineSegmenter;
use icu_segmenter::options::LineBreakOptions;

/// How much of a run fits on the current line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LineFit {
    /// Number of characters that go on the line.
    pub count: usize,
    /// The run was cut where the line break algorithm allows no break.
    pub forced: bool,
}

/// Find how many characters of `text` go on a line of `break_width`.
///
/// Characters are consumed while their right edge stays within the break width.
/// If the whole run fits it is taken as a whole. Otherwise the run is cut at the
/// last line break opportunity at or before the first overflowing character; an
/// overflowing whitespace character stays on the line. When there is no such
/// opportunity the run is cut before the overflowing character, keeping at least
/// one character, and the fit is reported as forced.
pub fn fit_line(text: &str, break_width: f32, mut advance: impl FnMut(char) -> f32) -> LineFit {
    let mut width = 0.0;
    let mut overflow = None;
    let mut count = 0;
    for (byte, ch) in text.char_indices() {
        let w = advance(ch);
        if width + w > break_width {
            overflow = Some((count, byte, ch));
            break;
        }
        width += w;
        count += 1;
    }

    let Some((index, byte, ch)) = overflow else {
        return LineFit {
            count,
            forced: false,
        };
    };

    let limit = if ch.is_whitespace() {
        byte + ch.len_utf8()
    } else {
        byte
    };
    let segmenter = LineSegmenter::new_auto(LineBreakOptions::default());
    let opportunity = segmenter
        .segment_str(text)
        .take_while(|&b| b <= limit)
        .filter(|&b| b > 0)
        .last();

    match opportunity {
        Some(b) => LineFit {
            count: text[..b].chars().count(),
            forced: false,
        },
        None => LineFit {
            count: index.max(1),
            forced: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(text: &str, width: f32) -> LineFit {
        fit_line(text, width, |_| 10.0)
    }

    #[test]
    fn everything_fits() {
        assert_eq!(
            fit("hello", 50.0),
            LineFit {
                count: 5,
                forced: false
            }
        );
        assert_eq!(fit("", 0.0).count, 0);
    }

    #[test]
    fn breaks_after_whitespace() {
        // "hello w|orld": overflow at 'o' (index 7), last opportunity before 'w'.
        assert_eq!(
            fit("hello world", 70.0),
            LineFit {
                count: 6,
                forced: false
            }
        );
    }

    #[test]
    fn overflowing_space_hangs() {
        // The space at index 5 overflows, the break after it is taken.
        assert_eq!(fit("hello world", 50.0).count, 6);
    }

    #[test]
    fn long_words_are_forced() {
        assert_eq!(
            fit("antidisestablishment", 45.0),
            LineFit {
                count: 4,
                forced: true
            }
        );
        assert_eq!(
            fit("word", 0.0),
            LineFit {
                count: 1,
                forced: true
            }
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(fit("ééé ééé", 55.0).count, 4);
    }
}
