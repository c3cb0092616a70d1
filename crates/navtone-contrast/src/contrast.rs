//! WCAG contrast math and the black-or-white text decision.
//!
//! Readability is judged in sRGB relative luminance space, exactly as
//! WCAG 2.1 defines it:
//!
//! - Normal text: contrast ratio >= 4.5:1 (AA)
//! - Candidates: pure white (luminance 1) and pure black (luminance 0)
//!
//! Only the two extremes are ever considered. For any 8-bit background at
//! least one of them reaches ~4.58:1, so with the AA threshold the
//! best-effort branch below is a safety net; stricter thresholds (AAA's
//! 7:1) do reach it for mid-luminance backgrounds.

use navtone_color::{Rgb, srgb_to_linear};

/// WCAG AA minimum contrast for normal-size text.
pub const AA_NORMAL_TEXT: f64 = 4.5;

const WHITE_LUMINANCE: f64 = 1.0;
const BLACK_LUMINANCE: f64 = 0.0;

/// Compute the relative luminance of a color per WCAG 2.1.
///
/// Each channel is normalized to [0, 1] and linearized, then weighted:
///   L = 0.2126 * `R_lin` + 0.7152 * `G_lin` + 0.0722 * `B_lin`
///
/// Returns a value in [0.0, 1.0] where 0 is black and 1 is white. The
/// weighted sum is clamped so rounding can never push white past 1.
#[must_use]
pub fn relative_luminance(color: Rgb) -> f64 {
    let lin = |v: u8| srgb_to_linear(f64::from(v) / 255.0);
    0.2126f64
        .mul_add(lin(color.r), 0.7152f64.mul_add(lin(color.g), 0.0722 * lin(color.b)))
        .clamp(0.0, 1.0)
}

/// Compute the WCAG 2.1 contrast ratio between two luminances.
///
/// Returns a value in [1.0, 21.0]:
///   (`L_lighter` + 0.05) / (`L_darker` + 0.05)
///
/// The result does not depend on argument order.
#[must_use]
pub fn contrast_ratio(l1: f64, l2: f64) -> f64 {
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Which rule picked the text color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// White is at least as good as black and meets the threshold.
    PreferredWhite,
    /// White did not qualify; black meets the threshold.
    ThresholdBlack,
    /// Neither meets the threshold; the higher contrast won.
    BestEffort,
}

/// The chosen text color and the numbers behind the choice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimalTextColor {
    /// Pure white or pure black, nothing in between.
    pub color: Rgb,
    /// `true` when `color` is white.
    pub is_light: bool,
    /// Relative luminance of the background.
    pub luminance: f64,
    /// Contrast of `color` against the background.
    pub contrast_ratio: f64,
    pub tier: Tier,
}

impl OptimalTextColor {
    /// Whether the chosen color reaches `threshold`.
    #[inline]
    #[must_use]
    pub fn meets(&self, threshold: f64) -> bool {
        self.contrast_ratio >= threshold
    }

    fn white(luminance: f64, contrast_ratio: f64, tier: Tier) -> Self {
        Self {
            color: Rgb::WHITE,
            is_light: true,
            luminance,
            contrast_ratio,
            tier,
        }
    }

    fn black(luminance: f64, contrast_ratio: f64, tier: Tier) -> Self {
        Self {
            color: Rgb::BLACK,
            is_light: false,
            luminance,
            contrast_ratio,
            tier,
        }
    }
}

/// Pick black or white text for `background` at the AA threshold.
///
/// See [`optimal_text_color_with_threshold`] for the selection rules.
#[must_use]
pub fn optimal_text_color(background: Rgb) -> OptimalTextColor {
    optimal_text_color_with_threshold(background, AA_NORMAL_TEXT)
}

/// Pick black or white text for `background`.
///
/// In order:
/// 1. white, if its contrast is >= black's and >= `min_contrast`;
/// 2. black, if its contrast is >= `min_contrast`;
/// 3. whichever is higher (ties go to black).
#[must_use]
pub fn optimal_text_color_with_threshold(background: Rgb, min_contrast: f64) -> OptimalTextColor {
    let luminance = relative_luminance(background);
    let white = contrast_ratio(WHITE_LUMINANCE, luminance);
    let black = contrast_ratio(BLACK_LUMINANCE, luminance);

    if white >= black && white >= min_contrast {
        OptimalTextColor::white(luminance, white, Tier::PreferredWhite)
    } else if black >= min_contrast {
        OptimalTextColor::black(luminance, black, Tier::ThresholdBlack)
    } else if white > black {
        OptimalTextColor::white(luminance, white, Tier::BestEffort)
    } else {
        OptimalTextColor::black(luminance, black, Tier::BestEffort)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
