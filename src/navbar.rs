// SPDX-License-Identifier: MIT
//
// Navbar chrome: turns the published AdaptiveStyle into the inline styles
// the navigation bar paints with.
//
//   logo         → style weight + 100
//   links        → style as published
//   link (hover) → hover color, weight + 100 capped at 900
//   underline    → text color at 0.7 opacity with a soft glow
//
// The bar itself switches to its solid "scrolled" look once the page
// has moved more than 50px.

use navtone_color::Rgb;
use navtone_contrast::AdaptiveStyle;
use serde::Serialize;

/// Scroll offset past which the bar is drawn solid.
pub const SCROLLED_AFTER: f64 = 50.0;

/// Section ids and labels of the navigation links, in display order.
pub const NAV_LINKS: [(&str, &str); 6] = [
    ("home", "Home"),
    ("about", "About"),
    ("menu", "Menu"),
    ("gallery", "Gallery"),
    ("reviews", "Reviews"),
    ("contact", "Contact"),
];

const UNDERLINE_OPACITY: f32 = 0.7;
const MAX_WEIGHT: u16 = 900;

/// Inline text style of one navbar element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub color: Rgb,
    pub font_weight: u16,
    pub text_shadow: String,
    pub letter_spacing: String,
}

impl TextStyle {
    fn from_style(style: &AdaptiveStyle, color: Rgb, font_weight: u16) -> Self {
        Self {
            color,
            font_weight,
            text_shadow: style.text_shadow.clone(),
            letter_spacing: style.letter_spacing_css(),
        }
    }

    /// Render as a CSS declaration block.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "color: {}; font-weight: {}; text-shadow: {}; letter-spacing: {}",
            self.color, self.font_weight, self.text_shadow, self.letter_spacing
        )
    }
}

/// The hover underline under each link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Underline {
    pub color: Rgb,
    pub opacity: f32,
    pub box_shadow: &'static str,
}

/// Everything the navbar paints for one style snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavbarChrome {
    pub scrolled: bool,
    pub logo: TextStyle,
    pub link: TextStyle,
    pub link_hover: TextStyle,
    pub underline: Underline,
    /// Background of the open mobile menu.
    pub mobile_menu_background: &'static str,
    /// Background of a hovered mobile menu entry.
    pub mobile_link_hover_background: &'static str,
    /// Id of the link shown as active.
    pub active: Option<String>,
}

impl NavbarChrome {
    #[must_use]
    pub fn render(style: &AdaptiveStyle, scroll_y: f64, active: Option<&str>) -> Self {
        let scrolled = scroll_y > SCROLLED_AFTER;
        Self {
            scrolled,
            logo: TextStyle::from_style(style, style.text_color, style.font_weight + 100),
            link: TextStyle::from_style(style, style.text_color, style.font_weight),
            link_hover: TextStyle::from_style(
                style,
                style.hover_color,
                (style.font_weight + 100).min(MAX_WEIGHT),
            ),
            underline: Underline {
                color: style.text_color,
                opacity: UNDERLINE_OPACITY,
                box_shadow: if style.is_light {
                    "0 0 4px rgba(255, 255, 255, 0.5)"
                } else {
                    "0 0 4px rgba(0, 0, 0, 0.3)"
                },
            },
            mobile_menu_background: if scrolled {
                "rgba(255, 255, 255, 0.05)"
            } else {
                "rgba(0, 0, 0, 0.1)"
            },
            mobile_link_hover_background: if style.is_light {
                "rgba(255, 255, 255, 0.1)"
            } else {
                "rgba(0, 0, 0, 0.1)"
            },
            active: active
                .filter(|id| NAV_LINKS.iter().any(|(link, _)| link == id))
                .map(str::to_owned),
        }
    }

    /// Label of the active link.
    #[must_use]
    pub fn active_label(&self) -> Option<&'static str> {
        let active = self.active.as_deref()?;
        NAV_LINKS
            .iter()
            .find_map(|&(id, label)| (id == active).then_some(label))
    }
}
