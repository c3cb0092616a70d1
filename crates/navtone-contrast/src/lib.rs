//! # navtone-contrast: readable text over an arbitrary background
//!
//! Given one opaque background color, derives everything a navigation bar
//! needs to stay legible on top of it.
//!
//! # Architecture
//!
//! ```text
//! background Rgb
//!     │
//!     ▼
//! contrast.rs: relative luminance → contrast of white vs black
//!     │        → OptimalTextColor (always pure black or pure white)
//!     ▼
//! style.rs:    font weight, text shadow, hover color, letter spacing
//!     │
//!     ▼
//! AdaptiveStyle: the snapshot a renderer consumes as-is
//! ```
//!
//! Every function here is pure and deterministic: the same background
//! always produces the same style, bit for bit. Nothing logs, nothing
//! allocates beyond the shadow string.

// Single-char math variables are standard in color science.
#![allow(clippy::many_single_char_names)]
// Luminance thresholds are compared with `<`/`>` on purpose.
#![allow(clippy::float_cmp)]

pub mod contrast;
pub mod style;

pub use contrast::{
    AA_NORMAL_TEXT, OptimalTextColor, Tier, contrast_ratio, optimal_text_color,
    optimal_text_color_with_threshold, relative_luminance,
};
pub use style::{
    AdaptiveStyle, StyleChanges, enhanced_hover_color, optimal_font_weight,
    optimal_letter_spacing, optimal_text_shadow, simple_hover_color,
};
