// SPDX-License-Identifier: MIT
//
// CSS color parsing.
//
// Computed styles come back from the scene as strings. This module turns
// them into `Rgba` for the forms a browser actually produces, plus the
// ones a hand-written page description is likely to contain:
//
//   rgb(1, 2, 3)        rgba(1, 2, 3, 0.5)      rgb(1 2 3 / 50%)
//   #rgb  #rgba  #rrggbb  #rrggbbaa
//   hsl(30, 50%, 40%)   hsla(30deg 50% 40% / 0.2)
//   transparent  white  black  navy ...   (CSS basic keywords)
//
// Parsing is case-insensitive and tolerant of surrounding whitespace.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::rgb::{Rgb, Rgba, to_u8};

/// Why a color string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("empty color string")]
    Empty,

    #[error("unrecognized color `{0}`")]
    Unrecognized(String),

    #[error("`{function}()` expects {expected} components, got {found}")]
    Arity {
        function: String,
        expected: &'static str,
        found: usize,
    },

    #[error("invalid component `{0}`")]
    Component(String),
}

/// `name(args)` in functional notation, arguments captured raw.
static FUNCTIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(rgba?|hsla?)\(\s*([^()]*?)\s*\)$").expect("functional color pattern is valid")
});

/// Separators between functional arguments: commas, slashes or whitespace.
static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[,/]\s*|\s+").expect("separator pattern is valid"));

/// CSS Color Level 1 basic keywords.
const NAMED: [(&str, Rgb); 17] = [
    ("black", Rgb::new(0, 0, 0)),
    ("silver", Rgb::new(192, 192, 192)),
    ("gray", Rgb::new(128, 128, 128)),
    ("grey", Rgb::new(128, 128, 128)),
    ("white", Rgb::new(255, 255, 255)),
    ("maroon", Rgb::new(128, 0, 0)),
    ("red", Rgb::new(255, 0, 0)),
    ("purple", Rgb::new(128, 0, 128)),
    ("fuchsia", Rgb::new(255, 0, 255)),
    ("green", Rgb::new(0, 128, 0)),
    ("lime", Rgb::new(0, 255, 0)),
    ("olive", Rgb::new(128, 128, 0)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("navy", Rgb::new(0, 0, 128)),
    ("blue", Rgb::new(0, 0, 255)),
    ("teal", Rgb::new(0, 128, 128)),
    ("aqua", Rgb::new(0, 255, 255)),
];

/// Parse a CSS color string.
///
/// # Errors
///
/// Returns a [`ParseColorError`] when the string is empty, uses an
/// unsupported notation, or has malformed components.
///
/// ```
/// use navtone_color::{Rgb, parse_css_color};
///
/// let c = parse_css_color("rgba(10, 20, 30, 0.5)").unwrap();
/// assert_eq!(c.rgb, Rgb::new(10, 20, 30));
/// assert!((c.alpha - 0.5).abs() < 1e-6);
/// ```
pub fn parse_css_color(input: &str) -> Result<Rgba, ParseColorError> {
    let s = input.trim().to_ascii_lowercase();
    if s.is_empty() {
        return Err(ParseColorError::Empty);
    }

    if s == "transparent" {
        return Ok(Rgba::TRANSPARENT);
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ParseColorError::Unrecognized(input.trim().to_owned()));
    }

    if let Some(caps) = FUNCTIONAL.captures(&s) {
        let function = &caps[1];
        let args: Vec<&str> = SEPARATOR.split(&caps[2]).filter(|a| !a.is_empty()).collect();
        if !(3..=4).contains(&args.len()) {
            return Err(ParseColorError::Arity {
                function: function.to_owned(),
                expected: "3 or 4",
                found: args.len(),
            });
        }
        let alpha = args.get(3).map_or(Ok(1.0), |a| parse_alpha(a))?;
        let rgb = if function.starts_with("rgb") {
            Rgb::new(
                parse_channel(args[0])?,
                parse_channel(args[1])?,
                parse_channel(args[2])?,
            )
        } else {
            hsl_to_rgb(
                parse_hue(args[0])?,
                parse_percentage(args[1])?,
                parse_percentage(args[2])?,
            )
        };
        return Ok(Rgba { rgb, alpha });
    }

    NAMED
        .iter()
        .find(|(name, _)| *name == s)
        .map(|(_, rgb)| rgb.opaque())
        .ok_or_else(|| ParseColorError::Unrecognized(input.trim().to_owned()))
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_css_color(s)
    }
}

// ─── Components ──────────────────────────────────────────────────────────────

fn number(s: &str) -> Result<f64, ParseColorError> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseColorError::Component(s.to_owned()))
}

/// `0`–`255` or `0%`–`100%`, clamped and rounded.
fn parse_channel(s: &str) -> Result<u8, ParseColorError> {
    if let Some(pct) = s.strip_suffix('%') {
        return Ok(to_u8(number(pct)? / 100.0 * 255.0));
    }
    Ok(to_u8(number(s)?))
}

/// `0`–`1` or `0%`–`100%`.
#[allow(clippy::cast_possible_truncation)]
fn parse_alpha(s: &str) -> Result<f32, ParseColorError> {
    let v = match s.strip_suffix('%') {
        Some(pct) => number(pct)? / 100.0,
        None => number(s)?,
    };
    Ok(v.clamp(0.0, 1.0) as f32)
}

/// Degrees, with an optional `deg` unit.
fn parse_hue(s: &str) -> Result<f64, ParseColorError> {
    number(s.strip_suffix("deg").unwrap_or(s))
}

/// A mandatory percentage, returned in [0, 1].
fn parse_percentage(s: &str) -> Result<f64, ParseColorError> {
    let pct = s
        .strip_suffix('%')
        .ok_or_else(|| ParseColorError::Component(s.to_owned()))?;
    Ok((number(pct)? / 100.0).clamp(0.0, 1.0))
}

/// HSL → sRGB per CSS Color 4 §7.
fn hsl_to_rgb(hue: f64, sat: f64, light: f64) -> Rgb {
    let h = hue.rem_euclid(360.0);
    let a = sat * light.min(1.0 - light);
    let f = |n: f64| {
        let k = (n + h / 30.0) % 12.0;
        let v = a.mul_add(-(k - 3.0).min(9.0 - k).clamp(-1.0, 1.0), light);
        to_u8(v * 255.0)
    };
    Rgb::new(f(0.0), f(8.0), f(4.0))
}

// ─── Hex ─────────────────────────────────────────────────────────────────────

fn parse_hex(s: &str) -> Option<Rgba> {
    let digits: Vec<u8> = s.bytes().map(hex_digit).collect::<Option<_>>()?;
    let (rgb, a) = match *digits.as_slice() {
        [r, g, b] => ([r * 17, g * 17, b * 17], 255),
        [r, g, b, a] => ([r * 17, g * 17, b * 17], a * 17),
        [r1, r0, g1, g0, b1, b0] => ([r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0], 255),
        [r1, r0, g1, g0, b1, b0, a1, a0] => {
            ([r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0], a1 << 4 | a0)
        }
        _ => return None,
    };
    Some(Rgba {
        rgb: Rgb::new(rgb[0], rgb[1], rgb[2]),
        alpha: f32::from(a) / 255.0,
    })
}

#[inline]
const fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
