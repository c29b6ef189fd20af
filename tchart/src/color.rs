/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # Colour strings.
//!
//! The chart files give line colours as strings. The mapper turns them into
//! packed ARGB integers through a [`ColorParser`], so that callers (and tests)
//! can swap in their own parsing.

use crate::{ChartError, Result};

/// Converts a colour string into a packed ARGB value.
pub trait ColorParser {
    fn parse_color(&self, color: &str) -> Result<i32>;
}

impl<F> ColorParser for F
where
    F: Fn(&str) -> Result<i32>,
{
    fn parse_color(&self, color: &str) -> Result<i32> {
        self(color)
    }
}

/// Parses colours the way `android.graphics.Color.parseColor` does.
#[derive(Debug, Default, Clone, Copy)]
pub struct AndroidColorParser;

const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0xFF000000),
    ("darkgray", 0xFF444444),
    ("gray", 0xFF888888),
    ("lightgray", 0xFFCCCCCC),
    ("white", 0xFFFFFFFF),
    ("red", 0xFFFF0000),
    ("green", 0xFF00FF00),
    ("blue", 0xFF0000FF),
    ("yellow", 0xFFFFFF00),
    ("cyan", 0xFF00FFFF),
    ("magenta", 0xFFFF00FF),
    ("aqua", 0xFF00FFFF),
    ("fuchsia", 0xFFFF00FF),
    ("darkgrey", 0xFF444444),
    ("grey", 0xFF888888),
    ("lightgrey", 0xFFCCCCCC),
    ("lime", 0xFF00FF00),
    ("maroon", 0xFF800000),
    ("navy", 0xFF000080),
    ("olive", 0xFF808000),
    ("purple", 0xFF800080),
    ("silver", 0xFFC0C0C0),
    ("teal", 0xFF008080),
];

impl ColorParser for AndroidColorParser {
    fn parse_color(&self, color: &str) -> Result<i32> {
        let unknown = || ChartError::UnknownColor(color.to_owned());

        let argb = match color.strip_prefix('#') {
            Some(hex) => {
                if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(unknown());
                }
                let value = u32::from_str_radix(hex, 16).map_err(|_| unknown())?;
                match hex.len() {
                    6 => value | 0xFF000000,
                    8 => value,
                    _ => return Err(unknown()),
                }
            }
            None => {
                let lower = color.to_ascii_lowercase();
                NAMED_COLORS
                    .iter()
                    .find(|(name, _)| *name == lower)
                    .map(|(_, argb)| *argb)
                    .ok_or_else(unknown)?
            }
        };

        // Same bits as the host's signed `int`.
        Ok(argb as i32)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hex_colors() {
        let p = AndroidColorParser;
        assert_eq!(p.parse_color("#3DC23F").unwrap() as u32, 0xFF3DC23F);
        assert_eq!(p.parse_color("#803dc23f").unwrap() as u32, 0x803DC23F);
        assert_eq!(p.parse_color("#00000000").unwrap(), 0);
        assert_eq!(p.parse_color("#FFFFFF").unwrap(), -1);
    }

    #[test]
    fn test_named_colors() {
        let p = AndroidColorParser;
        assert_eq!(p.parse_color("red").unwrap() as u32, 0xFFFF0000);
        assert_eq!(p.parse_color("Teal").unwrap() as u32, 0xFF008080);
        assert_eq!(p.parse_color("grey").unwrap(), p.parse_color("gray").unwrap());
    }

    #[test]
    fn test_bad_colors() {
        let p = AndroidColorParser;
        for bad in ["", "#", "#FFF", "#12345", "#GGGGGG", "#+12345", "octarine", "#1234567890"] {
            assert!(
                matches!(p.parse_color(bad), Err(ChartError::UnknownColor(_))),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn test_closure_parser() {
        let fake = |_: &str| -> Result<i32> { Ok(7) };
        assert_eq!(fake.parse_color("anything").unwrap(), 7);
    }
}
