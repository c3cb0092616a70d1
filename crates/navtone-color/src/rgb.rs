// SPDX-License-Identifier: MIT
//
// Opaque and translucent 8-bit sRGB colors.
//
// Single-character variable names (r, g, b, a) are the standard
// convention in color math.
#![allow(clippy::many_single_char_names)]
//
// Everything downstream of background resolution works on `Rgb`, which
// has no alpha at all. `Rgba` only lives between parsing a computed style
// string and compositing it over the backdrop.

use std::fmt;

use serde::{Serialize, Serializer};

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// An opaque 8-bit sRGB color.
///
/// Rendered as `rgb(r, g, b)` by [`Display`](fmt::Display) and
/// [`to_css`](Self::to_css), which is also the string form used for
/// serialization. Two `Rgb` values are equal exactly when their channels
/// are equal, so the string form compares the same way.
///
/// ```
/// use navtone_color::Rgb;
///
/// let brick = Rgb::new(178, 34, 34);
/// assert_eq!(brick.to_css(), "rgb(178, 34, 34)");
/// assert_eq!(brick.to_hex(), "#b22222");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A gray with all three channels set to `v`.
    #[inline]
    #[must_use]
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// The channels as an `[r, g, b]` array.
    #[inline]
    #[must_use]
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Apply `f` to each channel.
    #[inline]
    #[must_use]
    pub fn map_channels(self, mut f: impl FnMut(u8) -> u8) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Whether this is pure black or pure white.
    #[inline]
    #[must_use]
    pub fn is_extreme(self) -> bool {
        self == Self::BLACK || self == Self::WHITE
    }

    /// CSS functional notation: `rgb(r, g, b)`.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// Lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Lift to a fully opaque [`Rgba`].
    #[inline]
    #[must_use]
    pub const fn opaque(self) -> Rgba {
        Rgba {
            rgb: self,
            alpha: 1.0,
        }
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ─── Rgba ────────────────────────────────────────────────────────────────────

/// An sRGB color with straight (non-premultiplied) alpha.
#[derive(Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,

    /// Opacity: 0.0 (fully transparent) to 1.0 (fully opaque).
    pub alpha: f32,
}

impl Rgba {
    /// `transparent`, as computed styles report an unset background.
    pub const TRANSPARENT: Self = Self {
        rgb: Rgb::BLACK,
        alpha: 0.0,
    };

    /// Create a color, clamping `alpha` to [0, 1].
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            rgb: Rgb::new(r, g, b),
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Whether this color contributes nothing when painted.
    #[inline]
    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.alpha <= 0.0
    }

    /// Whether this color fully hides whatever is behind it.
    #[inline]
    #[must_use]
    pub fn is_opaque(self) -> bool {
        self.alpha >= 1.0
    }

    /// Paint this color over an opaque `backdrop`.
    ///
    /// Porter-Duff source-over in gamma-encoded sRGB, the same space
    /// browsers composite stacked element backgrounds in.
    #[must_use]
    pub fn over(self, backdrop: Rgb) -> Rgb {
        if self.is_opaque() {
            return self.rgb;
        }
        if self.is_transparent() {
            return backdrop;
        }
        let a = f64::from(self.alpha);
        let mix = |src: u8, dst: u8| to_u8(f64::from(src).mul_add(a, f64::from(dst) * (1.0 - a)));
        Rgb::new(
            mix(self.rgb.r, backdrop.r),
            mix(self.rgb.g, backdrop.g),
            mix(self.rgb.b, backdrop.b),
        )
    }
}

impl fmt::Debug for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            fmt::Debug::fmt(&self.rgb, f)
        } else {
            write!(f, "{:?}@{:.3}", self.rgb, self.alpha)
        }
    }
}

impl From<Rgb> for Rgba {
    fn from(rgb: Rgb) -> Self {
        rgb.opaque()
    }
}

// ─── Gamma ───────────────────────────────────────────────────────────────────

/// Convert a single sRGB component (0.0–1.0) to linear light.
///
/// Uses the 0.03928 breakpoint from the WCAG 2.x relative luminance
/// definition rather than the 0.04045 of IEC 61966-2-1. The two agree
/// for every 8-bit input.
#[inline]
#[must_use]
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.039_28 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Round a float in channel units (0.0–255.0) to a u8.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn to_u8(v: f64) -> u8 {
    // Safe: clamp guarantees 0.0 <= value <= 255.0 before truncation.
    (v + 0.5).clamp(0.0, 255.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────
