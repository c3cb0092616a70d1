// SPDX-License-Identifier: MIT
//
// navtone-color: the color vocabulary shared by every navtone crate.
//
// Two types cover the whole pipeline:
//
//   Rgba → what a computed style string parses to (may be transparent)
//   Rgb  → an opaque 8-bit sRGB color, the only thing the contrast
//          engine ever sees
//
// Parsing accepts the forms a browser hands back from computed styles
// (`rgb()`, `rgba()`, hex, `hsl()`, named colors). Background resolution
// turns `Rgba` into `Rgb` by compositing over whatever sits underneath.

pub mod parse;
pub mod rgb;

pub use parse::{ParseColorError, parse_css_color};
pub use rgb::{Rgb, Rgba, srgb_to_linear};
