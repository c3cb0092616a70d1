// SPDX-License-Identifier: MIT
//
// Color resolvers: turn one element's computed background into a paint
// layer. Which resolver runs depends on the background:
//
//   background-image set → ImageSampleResolver (pixel from a PixelSurface,
//                          falling back to the solid color)
//   otherwise            → SolidColorResolver (parse background-color)
//
// Neither ever fails. A color that cannot be parsed resolves to opaque
// white, so the worst case is dark text on an unknown background.

use navtone_color::{Rgb, Rgba, parse_css_color};
use tracing::{debug, warn};

use crate::scene::{Background, Scene};
use crate::surface::{PixelSurface, SurfaceSample};

/// What one element contributes to the color behind the navbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layer {
    /// Hides everything behind it; the walk stops here.
    Opaque(Rgb),
    /// Composited over whatever the ancestors resolve to.
    Translucent(Rgba),
    /// Contributes nothing; look at the parent.
    Transparent,
}

impl From<Rgba> for Layer {
    fn from(color: Rgba) -> Self {
        if color.is_opaque() {
            Self::Opaque(color.rgb)
        } else if color.is_transparent() {
            Self::Transparent
        } else {
            Self::Translucent(color)
        }
    }
}

/// Resolves an element's background to a [`Layer`].
pub trait ColorResolver<S: Scene> {
    fn resolve(&mut self, scene: &S, element: S::Element, background: &Background) -> Layer;
}

// ─── Solid ───────────────────────────────────────────────────────────────────

/// Parses the computed `background-color`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolidColorResolver;

impl<S: Scene> ColorResolver<S> for SolidColorResolver {
    fn resolve(&mut self, _scene: &S, element: S::Element, background: &Background) -> Layer {
        match parse_css_color(&background.color) {
            Ok(color) => Layer::from(color),
            Err(err) => {
                warn!(?element, color = %background.color, error = %err, "unparseable background color, assuming white");
                Layer::Opaque(Rgb::WHITE)
            }
        }
    }
}

// ─── Image ───────────────────────────────────────────────────────────────────

/// Reads the painted pixel at the element's center from a [`PixelSurface`].
///
/// A pending render or a surface error resolves through
/// [`SolidColorResolver`] for this call only; the next sample asks the
/// surface again.
pub struct ImageSampleResolver<'a, E> {
    surface: &'a mut dyn PixelSurface<E>,
}

impl<'a, E> ImageSampleResolver<'a, E> {
    pub fn new(surface: &'a mut dyn PixelSurface<E>) -> Self {
        Self { surface }
    }
}

impl<S: Scene> ColorResolver<S> for ImageSampleResolver<'_, S::Element> {
    fn resolve(&mut self, scene: &S, element: S::Element, background: &Background) -> Layer {
        let rect = scene.bounding_rect(element);
        match self.surface.sample_center(element, rect) {
            Ok(SurfaceSample::Ready(rgb)) => Layer::Opaque(rgb),
            Ok(SurfaceSample::Pending) => {
                debug!(?element, "image sample pending, using background color");
                SolidColorResolver.resolve(scene, element, background)
            }
            Err(err) => {
                warn!(?element, error = %err, "image sampling failed, using background color");
                SolidColorResolver.resolve(scene, element, background)
            }
        }
    }
}
