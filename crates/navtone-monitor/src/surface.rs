// SPDX-License-Identifier: MIT
//
// Off-screen pixel sampling for image and gradient backgrounds.
//
// Rendering an element into a canvas is asynchronous in a browser, so a
// surface may answer `Pending` the first time it is asked about an
// element. Completed renders are collected in `poll()`, which the sampler
// calls once at the start of every sample, and handed out on the next
// request for the same element.

use navtone_color::Rgb;
use thiserror::Error;

use crate::geometry::Rect;

/// Why a surface could not produce a pixel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// No rendering backend is available.
    #[error("render surface unavailable: {0}")]
    Unavailable(String),

    /// The element could not be rendered (tainted canvas, zero size, ...).
    #[error("render failed: {0}")]
    RenderFailed(String),
}

/// Result of asking a surface for the pixel at an element's center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceSample {
    Ready(Rgb),
    /// A render has been started and will complete in a later `poll()`.
    Pending,
}

/// Renders elements off-screen and reads back the pixel at their center.
pub trait PixelSurface<E> {
    /// The pixel at the center of `rect`, as painted for `element`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] when the element cannot be rendered.
    fn sample_center(&mut self, element: E, rect: Rect) -> Result<SurfaceSample, SurfaceError>;

    /// Collect renders that completed since the last call. Later
    /// completions for the same element replace earlier ones.
    fn poll(&mut self) {}
}
