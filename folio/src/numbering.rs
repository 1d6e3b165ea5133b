// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index labels of list items.

use alloc::format;
use alloc::string::{String, ToString};

use folio_document::{BulletStyle, NumberStyle};

const ROMAN: [(usize, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Format the 1-based ordinal `n` in the given style, without decoration.
///
/// Alphabetic styles only cover `1..=26`; other values (and `0` for every style
/// but decimal) fall back to decimal digits.
pub fn numeral(n: usize, style: NumberStyle) -> String {
    match style {
        NumberStyle::Decimal => n.to_string(),
        NumberStyle::LowerAlpha => alpha(n).map_or_else(|| n.to_string(), |c| c.to_string()),
        NumberStyle::UpperAlpha => alpha(n).map_or_else(
            || n.to_string(),
            |c| c.to_ascii_uppercase().to_string(),
        ),
        NumberStyle::LowerRoman => roman(n).to_ascii_lowercase(),
        NumberStyle::UpperRoman => roman(n),
    }
}

/// The label shown in front of the `n`th item of a numbered list.
pub fn index_label(n: usize, style: NumberStyle) -> String {
    format!("{}. ", numeral(n, style))
}

/// The label shown in front of every item of a bulleted list.
pub fn bullet_label(style: BulletStyle) -> &'static str {
    match style {
        BulletStyle::CircleFilled => "\u{2022} ",
        BulletStyle::CircleOutline => "\u{25E6} ",
        BulletStyle::SquareFilled => "\u{25AA} ",
        BulletStyle::SquareOutline => "\u{25AB} ",
    }
}

fn alpha(n: usize) -> Option<char> {
    let index = u8::try_from(n.checked_sub(1)?).ok().filter(|i| *i < 26)?;
    Some(char::from(b'a' + index))
}

fn roman(mut n: usize) -> String {
    if n == 0 {
        return n.to_string();
    }
    let mut out = String::new();
    for (value, symbol) in ROMAN {
        while n >= value {
            out.push_str(symbol);
            n -= value;
        }
    }
    out
}
