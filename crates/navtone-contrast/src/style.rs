//! Derived text styling: weight, shadow, hover color and tracking.
//!
//! The black/white decision alone is not enough at the extremes of the
//! luminance range: white on near-black and black on near-white both read
//! thinner than they are. These functions compensate, always as a pure
//! function of the background luminance and which text color was picked.
//!
//! [`AdaptiveStyle`] bundles the results into the snapshot a navigation bar
//! renders without further computation.

use bitflags::bitflags;
use navtone_color::Rgb;
use serde::Serialize;

use crate::contrast::optimal_text_color;

// ---------------------------------------------------------------------------
// Font weight
// ---------------------------------------------------------------------------

/// Font weight (400–800) for text over a background of `bg_luminance`.
///
/// White text gets heavier as the background darkens; black text gets
/// heavier as the background lightens.
///
/// ```
/// use navtone_contrast::optimal_font_weight;
///
/// assert_eq!(optimal_font_weight(0.05, true), 700);
/// assert_eq!(optimal_font_weight(0.85, false), 800);
/// ```
#[must_use]
pub fn optimal_font_weight(bg_luminance: f64, is_light: bool) -> u16 {
    if is_light {
        if bg_luminance < 0.1 {
            700
        } else if bg_luminance < 0.2 {
            600
        } else {
            500
        }
    } else if bg_luminance > 0.8 {
        800
    } else if bg_luminance > 0.6 {
        700
    } else if bg_luminance > 0.4 {
        600
    } else {
        500
    }
}

// ---------------------------------------------------------------------------
// Text shadow
// ---------------------------------------------------------------------------

/// CSS `text-shadow` for the chosen text color.
///
/// Light text gets two dark layers, strongest on the darkest backgrounds.
/// Dark text gets two light layers plus a faint 1px dark hairline that
/// keeps glyph edges defined on near-white backgrounds.
#[must_use]
pub fn optimal_text_shadow(is_light: bool, bg_luminance: f64) -> String {
    if is_light {
        let opacity = 2.0f64.mul_add(-bg_luminance, 1.0).max(0.3);
        let blur = if bg_luminance < 0.1 { 3 } else { 2 };
        format!(
            "0 {blur}px {spread}px rgba(0, 0, 0, {o}), 0 1px 2px rgba(0, 0, 0, {o2})",
            spread = blur * 2,
            o = css_number(opacity),
            o2 = css_number(opacity * 0.8),
        )
    } else {
        let opacity = (bg_luminance * 0.5).min(0.4);
        let blur = if bg_luminance > 0.8 { 4 } else { 3 };
        format!(
            "0 {blur}px {spread}px rgba(255, 255, 255, {o}), \
             0 1px 3px rgba(255, 255, 255, {o2}), \
             0 0 1px rgba(0, 0, 0, 0.1)",
            spread = blur * 2,
            o = css_number(opacity),
            o2 = css_number(opacity * 0.9),
        )
    }
}

/// At most three decimals, trailing zeros trimmed: `0.72`, `0.3`, `1`.
fn css_number(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}

// ---------------------------------------------------------------------------
// Hover color
// ---------------------------------------------------------------------------

/// Hover color that stays on the same side of the light/dark divide.
///
/// Light text darkens by `30 + 20·L` per channel but never below 180;
/// dark text lightens by `40 + 30·(1 − L)` but never above 80.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn enhanced_hover_color(color: Rgb, is_light: bool, bg_luminance: f64) -> Rgb {
    let lum = bg_luminance.clamp(0.0, 1.0);
    if is_light {
        // Truncation is floor here: the operand is in [30, 50].
        let adjustment = 20.0f64.mul_add(lum, 30.0) as u8;
        color.map_channels(|c| c.saturating_sub(adjustment).max(180))
    } else {
        // Operand in [40, 70].
        let adjustment = 30.0f64.mul_add(1.0 - lum, 40.0) as u8;
        color.map_channels(|c| c.saturating_add(adjustment).min(80))
    }
}

/// Plain hover shift: 30 darker for light text, 30 lighter for dark text.
#[must_use]
pub fn simple_hover_color(color: Rgb, is_light: bool) -> Rgb {
    if is_light {
        color.map_channels(|c| c.saturating_sub(30))
    } else {
        color.map_channels(|c| c.saturating_add(30))
    }
}

// ---------------------------------------------------------------------------
// Letter spacing
// ---------------------------------------------------------------------------

/// Tracking in `em` for a given weight. Dark text runs one step wider.
#[must_use]
pub fn optimal_letter_spacing(font_weight: u16, is_light: bool) -> f32 {
    match (font_weight, is_light) {
        (700.., true) => 0.02,
        (700.., false) => 0.03,
        (600.., true) => 0.01,
        (600.., false) => 0.02,
        (_, true) => 0.0,
        (_, false) => 0.01,
    }
}

// ---------------------------------------------------------------------------
// AdaptiveStyle
// ---------------------------------------------------------------------------

/// Everything the navigation bar needs to render over one background.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveStyle {
    pub text_color: Rgb,
    pub hover_color: Rgb,
    pub is_light: bool,
    pub font_weight: u16,
    /// CSS `text-shadow` value, or `none`.
    pub text_shadow: String,
    /// Tracking in `em`.
    pub letter_spacing: f32,
    /// The sampled background this style was derived from.
    pub background_color: Rgb,
    pub luminance: f64,
    pub contrast_ratio: f64,
}

/// Hover color of the fixed default sets.
const DEFAULT_HOVER: Rgb = Rgb::gray(200);

impl AdaptiveStyle {
    /// The style before the first sample lands: white text, weight 600,
    /// no shadow, assumed black background.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            text_color: Rgb::WHITE,
            hover_color: DEFAULT_HOVER,
            is_light: true,
            font_weight: 600,
            text_shadow: "none".to_owned(),
            letter_spacing: 0.0,
            background_color: Rgb::BLACK,
            luminance: 0.0,
            contrast_ratio: 21.0,
        }
    }

    /// The pinned style while adaptation is disabled: white text with a
    /// fixed soft shadow.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            text_shadow: "0 2px 4px rgba(0, 0, 0, 0.3)".to_owned(),
            ..Self::initial()
        }
    }

    /// Pin the disabled text settings while keeping this style's sampled
    /// background, luminance and contrast ratio as they were.
    #[must_use]
    pub fn to_disabled(&self) -> Self {
        Self {
            background_color: self.background_color,
            luminance: self.luminance,
            contrast_ratio: self.contrast_ratio,
            ..Self::disabled()
        }
    }

    /// Derive the full style for text over `background`.
    #[must_use]
    pub fn from_background(background: Rgb) -> Self {
        let text = optimal_text_color(background);
        let font_weight = optimal_font_weight(text.luminance, text.is_light);
        Self {
            text_color: text.color,
            hover_color: enhanced_hover_color(text.color, text.is_light, text.luminance),
            is_light: text.is_light,
            font_weight,
            text_shadow: optimal_text_shadow(text.is_light, text.luminance),
            letter_spacing: optimal_letter_spacing(font_weight, text.is_light),
            background_color: background,
            luminance: text.luminance,
            contrast_ratio: text.contrast_ratio,
        }
    }

    /// Letter spacing as a CSS length: `0.02em`.
    #[must_use]
    pub fn letter_spacing_css(&self) -> String {
        format!("{}em", css_number(f64::from(self.letter_spacing)))
    }

    /// Which fields differ between `self` and `other`.
    #[must_use]
    pub fn changes(&self, other: &Self) -> StyleChanges {
        let mut changes = StyleChanges::empty();
        changes.set(StyleChanges::TEXT_COLOR, self.text_color != other.text_color);
        changes.set(StyleChanges::HOVER_COLOR, self.hover_color != other.hover_color);
        changes.set(StyleChanges::IS_LIGHT, self.is_light != other.is_light);
        changes.set(StyleChanges::FONT_WEIGHT, self.font_weight != other.font_weight);
        changes.set(StyleChanges::TEXT_SHADOW, self.text_shadow != other.text_shadow);
        changes.set(
            StyleChanges::LETTER_SPACING,
            self.letter_spacing.to_bits() != other.letter_spacing.to_bits(),
        );
        changes.set(
            StyleChanges::BACKGROUND,
            self.background_color != other.background_color,
        );
        changes.set(
            StyleChanges::LUMINANCE,
            self.luminance.to_bits() != other.luminance.to_bits(),
        );
        changes.set(
            StyleChanges::CONTRAST,
            self.contrast_ratio.to_bits() != other.contrast_ratio.to_bits(),
        );
        changes
    }
}

impl Default for AdaptiveStyle {
    fn default() -> Self {
        Self::initial()
    }
}

bitflags! {
    /// Fields of an [`AdaptiveStyle`] that changed between two snapshots.
    ///
    /// Renderers use this to skip restyling when only diagnostic fields
    /// (luminance, contrast) moved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct StyleChanges: u16 {
        const TEXT_COLOR     = 1 << 0;
        const HOVER_COLOR    = 1 << 1;
        const IS_LIGHT       = 1 << 2;
        const FONT_WEIGHT    = 1 << 3;
        const TEXT_SHADOW    = 1 << 4;
        const LETTER_SPACING = 1 << 5;
        const BACKGROUND     = 1 << 6;
        const LUMINANCE      = 1 << 7;
        const CONTRAST       = 1 << 8;

        /// Fields that alter what is painted.
        const VISUAL = Self::TEXT_COLOR.bits()
            | Self::HOVER_COLOR.bits()
            | Self::FONT_WEIGHT.bits()
            | Self::TEXT_SHADOW.bits()
            | Self::LETTER_SPACING.bits();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Font weight ─────────────────────────────────────────────────

    #[test]
    fn weight_for_light_text_grows_as_background_darkens() {
        assert_eq!(optimal_font_weight(0.05, true), 700);
        assert_eq!(optimal_font_weight(0.15, true), 600);
        assert_eq!(optimal_font_weight(0.3, true), 500);
    }

    #[test]
    fn weight_for_dark_text_grows_as_background_lightens() {
        assert_eq!(optimal_font_weight(0.85, false), 800);
        assert_eq!(optimal_font_weight(0.7, false), 700);
        assert_eq!(optimal_font_weight(0.5, false), 600);
        assert_eq!(optimal_font_weight(0.3, false), 500);
    }

    #[test]
    fn weight_boundaries_are_exclusive() {
        assert_eq!(optimal_font_weight(0.1, true), 600);
        assert_eq!(optimal_font_weight(0.2, true), 500);
        assert_eq!(optimal_font_weight(0.8, false), 700);
        assert_eq!(optimal_font_weight(0.4, false), 500);
    }

    #[test]
    fn weight_stays_in_range() {
        for i in 0..=100 {
            let lum = f64::from(i) / 100.0;
            for light in [true, false] {
                let w = optimal_font_weight(lum, light);
                assert!((400..=800).contains(&w), "{lum} {light} -> {w}");
            }
        }
    }

    // ── Text shadow ─────────────────────────────────────────────────

    #[test]
    fn shadow_light_text_on_black() {
        assert_eq!(
            optimal_text_shadow(true, 0.0),
            "0 3px 6px rgba(0, 0, 0, 1), 0 1px 2px rgba(0, 0, 0, 0.8)"
        );
    }

    #[test]
    fn shadow_light_text_opacity_floor() {
        assert_eq!(
            optimal_text_shadow(true, 0.4),
            "0 2px 4px rgba(0, 0, 0, 0.3), 0 1px 2px rgba(0, 0, 0, 0.24)"
        );
    }

    #[test]
    fn shadow_dark_text_on_white_has_hairline() {
        assert_eq!(
            optimal_text_shadow(false, 1.0),
            "0 4px 8px rgba(255, 255, 255, 0.4), \
             0 1px 3px rgba(255, 255, 255, 0.36), \
             0 0 1px rgba(0, 0, 0, 0.1)"
        );
    }

    #[test]
    fn shadow_dark_text_mid_background() {
        let shadow = optimal_text_shadow(false, 0.5);
        assert!(shadow.starts_with("0 3px 6px rgba(255, 255, 255, 0.25)"), "{shadow}");
        assert!(shadow.contains("rgba(255, 255, 255, 0.225)"), "{shadow}");
    }

    #[test]
    fn css_number_trims() {
        assert_eq!(css_number(1.0), "1");
        assert_eq!(css_number(0.30000000000000004), "0.3");
        assert_eq!(css_number(0.0), "0");
        assert_eq!(css_number(0.1234), "0.123");
    }

    // ── Hover color ─────────────────────────────────────────────────

    #[test]
    fn hover_light_text_darkens() {
        let hover = enhanced_hover_color(Rgb::WHITE, true, 0.0);
        assert_eq!(hover, Rgb::gray(225));
        let hover = enhanced_hover_color(Rgb::WHITE, true, 1.0);
        assert_eq!(hover, Rgb::gray(205));
    }

    #[test]
    fn hover_dark_text_lightens() {
        let hover = enhanced_hover_color(Rgb::BLACK, false, 1.0);
        assert_eq!(hover, Rgb::gray(40));
        let hover = enhanced_hover_color(Rgb::BLACK, false, 0.0);
        assert_eq!(hover, Rgb::gray(70));
    }

    #[test]
    fn hover_never_crosses_the_divide() {
        for v in (0..=255u8).step_by(3) {
            for i in 0..=20 {
                let lum = f64::from(i) / 20.0;
                let light = enhanced_hover_color(Rgb::gray(v), true, lum);
                assert!(light.channels().iter().all(|&c| c >= 180), "{v} {lum}: {light:?}");
                let dark = enhanced_hover_color(Rgb::gray(v), false, lum);
                assert!(dark.channels().iter().all(|&c| c <= 80), "{v} {lum}: {dark:?}");
            }
        }
    }

    #[test]
    fn simple_hover_shifts_by_thirty() {
        assert_eq!(simple_hover_color(Rgb::WHITE, true), Rgb::gray(225));
        assert_eq!(simple_hover_color(Rgb::BLACK, false), Rgb::gray(30));
        assert_eq!(simple_hover_color(Rgb::gray(10), true), Rgb::BLACK);
    }

    // ── Letter spacing ──────────────────────────────────────────────

    #[test]
    fn spacing_tiers() {
        assert_eq!(optimal_letter_spacing(800, true), 0.02);
        assert_eq!(optimal_letter_spacing(700, false), 0.03);
        assert_eq!(optimal_letter_spacing(600, true), 0.01);
        assert_eq!(optimal_letter_spacing(600, false), 0.02);
        assert_eq!(optimal_letter_spacing(500, true), 0.0);
        assert_eq!(optimal_letter_spacing(500, false), 0.01);
    }

    #[test]
    fn dark_text_is_always_tracked_wider() {
        for w in [400, 500, 600, 700, 800] {
            assert!(optimal_letter_spacing(w, false) > optimal_letter_spacing(w, true));
        }
    }

    // ── AdaptiveStyle ───────────────────────────────────────────────

    #[test]
    fn style_over_black() {
        let style = AdaptiveStyle::from_background(Rgb::BLACK);
        assert_eq!(style.text_color, Rgb::WHITE);
        assert_eq!(style.hover_color, Rgb::gray(225));
        assert!(style.is_light);
        assert_eq!(style.font_weight, 700);
        assert_eq!(style.letter_spacing, 0.02);
        assert_eq!(style.background_color, Rgb::BLACK);
        assert_eq!(style.letter_spacing_css(), "0.02em");
    }

    #[test]
    fn style_over_white() {
        let style = AdaptiveStyle::from_background(Rgb::WHITE);
        assert_eq!(style.text_color, Rgb::BLACK);
        assert!(!style.is_light);
        assert_eq!(style.font_weight, 800);
        assert_eq!(style.letter_spacing, 0.03);
        assert!(style.text_shadow.ends_with("rgba(0, 0, 0, 0.1)"));
    }

    #[test]
    fn style_is_reproducible() {
        let bg = Rgb::new(92, 61, 46);
        assert_eq!(
            AdaptiveStyle::from_background(bg),
            AdaptiveStyle::from_background(bg)
        );
    }

    #[test]
    fn defaults() {
        let initial = AdaptiveStyle::initial();
        assert_eq!(initial.text_shadow, "none");
        assert_eq!(initial.font_weight, 600);
        assert_eq!(initial.hover_color, Rgb::gray(200));

        let disabled = AdaptiveStyle::disabled();
        assert_eq!(disabled.text_shadow, "0 2px 4px rgba(0, 0, 0, 0.3)");
        assert_eq!(initial.changes(&disabled), StyleChanges::TEXT_SHADOW);
        assert_eq!(initial.to_disabled(), disabled);
    }

    #[test]
    fn disabling_keeps_the_last_sample() {
        let bg = Rgb::new(0xf5, 0xf0, 0xe8);
        let sampled = AdaptiveStyle::from_background(bg);
        let pinned = sampled.to_disabled();

        assert_eq!(pinned.text_color, Rgb::WHITE);
        assert_eq!(pinned.text_shadow, "0 2px 4px rgba(0, 0, 0, 0.3)");
        assert_eq!(pinned.background_color, bg);
        assert_eq!(pinned.luminance, sampled.luminance);
        assert_eq!(pinned.contrast_ratio, sampled.contrast_ratio);
        assert!(pinned.contrast_ratio < 21.0);
        assert!(!pinned.changes(&sampled).contains(StyleChanges::BACKGROUND));
    }

    #[test]
    fn changes_between_opposites() {
        let dark = AdaptiveStyle::from_background(Rgb::BLACK);
        let light = AdaptiveStyle::from_background(Rgb::WHITE);
        let changes = dark.changes(&light);
        assert!(changes.contains(StyleChanges::VISUAL));
        assert!(changes.contains(StyleChanges::IS_LIGHT | StyleChanges::BACKGROUND));
        assert!(dark.changes(&dark).is_empty());
    }

    #[test]
    fn serializes_with_css_colors() {
        let json = serde_json::to_value(AdaptiveStyle::initial()).unwrap();
        assert_eq!(json["textColor"], "rgb(255, 255, 255)");
        assert_eq!(json["hoverColor"], "rgb(200, 200, 200)");
        assert_eq!(json["fontWeight"], 600);
        assert_eq!(json["isLight"], true);
    }
}
