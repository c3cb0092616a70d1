// SPDX-License-Identifier: MIT
//
// BackgroundSampler: finds the opaque color painted behind the navbar.
//
//   1. locate the navbar and take the center of its bounding rect
//   2. hit-test that point with the navbar excluded (scoped guard)
//   3. resolve the hit element's background, walking up through
//      transparent and translucent ancestors
//   4. composite the translucent layers over the first opaque one
//
// The document root counts as opaque white when nothing below it is.

use std::fmt;

use navtone_color::{Rgb, Rgba};
use thiserror::Error;
use tracing::{debug, trace};

use crate::geometry::Point;
use crate::resolver::{ColorResolver, ImageSampleResolver, Layer, SolidColorResolver};
use crate::scene::{HitTestSuspension, Scene, SceneError};
use crate::surface::PixelSurface;

/// Color assumed behind the document root.
const CANVAS: Rgb = Rgb::WHITE;

/// Why no background could be sampled this time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    #[error("page has no navigation element")]
    NavbarMissing,

    #[error("nothing rendered behind the navbar at ({}, {})", .point.x, .point.y)]
    NothingBehind { point: Point },

    #[error(transparent)]
    HitTest(#[from] SceneError),
}

/// Samples the effective background behind a scene's navbar.
pub struct BackgroundSampler<E> {
    surface: Option<Box<dyn PixelSurface<E>>>,
}

impl<E> Default for BackgroundSampler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for BackgroundSampler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundSampler")
            .field("surface", &self.surface.is_some())
            .finish()
    }
}

impl<E> BackgroundSampler<E> {
    /// A sampler without a pixel surface: image backgrounds resolve
    /// through their `background-color`.
    #[must_use]
    pub const fn new() -> Self {
        Self { surface: None }
    }

    /// A sampler that reads image and gradient pixels from `surface`.
    #[must_use]
    pub fn with_surface(surface: impl PixelSurface<E> + 'static) -> Self {
        Self {
            surface: Some(Box::new(surface)),
        }
    }

    #[inline]
    #[must_use]
    pub const fn has_surface(&self) -> bool {
        self.surface.is_some()
    }
}

impl<E: Copy + fmt::Debug + 'static> BackgroundSampler<E> {
    /// The opaque color behind the center of the navbar.
    ///
    /// The navbar's hit-testing is restored before this returns, on
    /// success and on every error path.
    ///
    /// # Errors
    ///
    /// - [`SamplingError::NavbarMissing`] if the scene has no navbar.
    /// - [`SamplingError::NothingBehind`] if nothing is rendered at the
    ///   navbar's center once it is excluded.
    /// - [`SamplingError::HitTest`] if the scene query fails.
    pub fn sample<S>(&mut self, scene: &mut S) -> Result<Rgb, SamplingError>
    where
        S: Scene<Element = E>,
    {
        if let Some(surface) = self.surface.as_mut() {
            surface.poll();
        }

        let navbar = scene.navbar().ok_or(SamplingError::NavbarMissing)?;
        let point = scene.bounding_rect(navbar).center();

        let behind = {
            let scene = HitTestSuspension::new(scene, navbar)?;
            scene.element_at(point)?
        };
        let element = behind.ok_or(SamplingError::NothingBehind { point })?;
        trace!(?element, x = point.x, y = point.y, "element behind navbar");

        Ok(self.effective_background(scene, element))
    }

    /// Resolve `element`'s background to an opaque color.
    ///
    /// Fully transparent elements defer to their parent; translucent
    /// ones are composited over it. The walk ends at the first opaque
    /// layer or at the root, which sits on [`CANVAS`].
    pub fn effective_background<S>(&mut self, scene: &S, element: E) -> Rgb
    where
        S: Scene<Element = E>,
    {
        let mut layers: Vec<Rgba> = Vec::new();
        let mut current = Some(element);

        let base = loop {
            let Some(el) = current else {
                break CANVAS;
            };
            match self.resolve_layer(scene, el) {
                Layer::Opaque(rgb) => break rgb,
                Layer::Translucent(color) => layers.push(color),
                Layer::Transparent => {}
            }
            current = scene.parent(el);
        };

        // Innermost layer was pushed first and is painted last.
        layers.iter().rev().fold(base, |backdrop, layer| layer.over(backdrop))
    }

    fn resolve_layer<S>(&mut self, scene: &S, element: E) -> Layer
    where
        S: Scene<Element = E>,
    {
        let background = scene.computed_background(element);
        if !background.has_image() {
            return SolidColorResolver.resolve(scene, element, &background);
        }
        match self.surface.as_deref_mut() {
            Some(surface) => ImageSampleResolver::new(surface).resolve(scene, element, &background),
            None => {
                debug!(?element, "no pixel surface for image background");
                SolidColorResolver.resolve(scene, element, &background)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::page::{Page, PageSurface, SurfaceMode};
    use crate::scene::Background;
    use crate::surface::{SurfaceError, SurfaceSample};

    fn page(body: &str) -> Page {
        let toml = format!(
            r#"
            [viewport]
            width = 1000.0
            height = 800.0

            [nav]
            height = 80.0
            background = "rgba(0, 0, 0, 0.2)"

            {body}
            "#
        );
        Page::from_toml(&toml).unwrap()
    }

    // ── Solid backgrounds ───────────────────────────────────────────

    #[test]
    fn opaque_section() {
        let mut p = page(
            r#"
            [[sections]]
            id = "a"
            height = 900.0
            background = "rgb(10, 20, 30)"
            "#,
        );
        let rgb = BackgroundSampler::new().sample(&mut p).unwrap();
        assert_eq!(rgb, Rgb::new(10, 20, 30));
    }

    #[test]
    fn navbar_own_background_is_ignored() {
        let mut p = page(
            r#"
            [[sections]]
            id = "a"
            height = 900.0
            background = "white"
            "#,
        );
        assert_eq!(BackgroundSampler::new().sample(&mut p).unwrap(), Rgb::WHITE);
    }

    #[test]
    fn transparent_chain_reaches_root() {
        let mut p = Page::from_toml(
            r#"
            [viewport]
            width = 1000.0
            height = 800.0
            background = "rgb(40, 40, 40)"

            [nav]
            height = 80.0

            [[sections]]
            id = "a"
            height = 900.0
            "#,
        )
        .unwrap();
        assert_eq!(BackgroundSampler::new().sample(&mut p).unwrap(), Rgb::gray(40));
    }

    #[test]
    fn transparent_everywhere_is_white() {
        let mut p = page(
            r#"
            [[sections]]
            id = "a"
            height = 900.0
            "#,
        );
        assert_eq!(BackgroundSampler::new().sample(&mut p).unwrap(), Rgb::WHITE);
    }

    #[test]
    fn translucent_layers_composite_over_parent() {
        let mut p = page(
            r#"
            [[sections]]
            id = "a"
            height = 900.0
            background = "rgb(0, 0, 0)"

            [[sections.layers]]
            top = 0.0
            height = 400.0
            background = "rgba(255, 255, 255, 0.5)"
            "#,
        );
        // 255 * 0.5 + 0 * 0.5 = 127.5, rounded half up.
        assert_eq!(BackgroundSampler::new().sample(&mut p).unwrap(), Rgb::gray(128));
    }

    #[test]
    fn unparseable_color_is_white() {
        let mut p = page(
            r#"
            [[sections]]
            id = "a"
            height = 900.0
            background = "color(display-p3 1 0 0)"
            "#,
        );
        assert_eq!(BackgroundSampler::new().sample(&mut p).unwrap(), Rgb::WHITE);
    }

    // ── Images ──────────────────────────────────────────────────────

    const HERO: &str = r##"
        [[sections]]
        id = "hero"
        height = 900.0
        background = "rgb(200, 200, 200)"
        image = "url(hero.jpg)"
        pixel = "#102030"
    "##;

    #[test]
    fn image_without_surface_uses_color() {
        let mut p = page(HERO);
        assert_eq!(BackgroundSampler::new().sample(&mut p).unwrap(), Rgb::gray(200));
    }

    #[test]
    fn image_with_surface_uses_pixel() {
        let mut p = page(HERO);
        let mut sampler = BackgroundSampler::with_surface(PageSurface::new(&p, SurfaceMode::Immediate));
        assert_eq!(sampler.sample(&mut p).unwrap(), Rgb::new(0x10, 0x20, 0x30));
    }

    #[test]
    fn deferred_image_arrives_on_next_sample() {
        let mut p = page(HERO);
        let mut sampler = BackgroundSampler::with_surface(PageSurface::new(&p, SurfaceMode::Deferred));
        assert_eq!(sampler.sample(&mut p).unwrap(), Rgb::gray(200));
        assert_eq!(sampler.sample(&mut p).unwrap(), Rgb::new(0x10, 0x20, 0x30));
    }

    #[test]
    fn surface_error_falls_back_to_color() {
        struct Broken;
        impl PixelSurface<crate::page::PageNode> for Broken {
            fn sample_center(
                &mut self,
                _element: crate::page::PageNode,
                _rect: Rect,
            ) -> Result<SurfaceSample, SurfaceError> {
                Err(SurfaceError::Unavailable("no canvas".into()))
            }
        }
        let mut p = page(HERO);
        let mut sampler = BackgroundSampler::with_surface(Broken);
        assert_eq!(sampler.sample(&mut p).unwrap(), Rgb::gray(200));
    }

    // ── Failures ────────────────────────────────────────────────────

    #[test]
    fn nothing_behind_navbar() {
        // Scrolled so far that no section covers the nav's center.
        let mut p = page(
            r#"
            [[sections]]
            id = "a"
            height = 10.0
            background = "red"
            "#,
        );
        let root = p.root();
        p.set_hit_testable(root, false).unwrap();
        let err = BackgroundSampler::new().sample(&mut p).unwrap_err();
        assert!(matches!(err, SamplingError::NothingBehind { .. }));
    }

    #[test]
    fn hit_test_is_restored_after_failure() {
        let mut p = page(
            r#"
            [[sections]]
            id = "a"
            height = 10.0
            "#,
        );
        let root = p.root();
        p.set_hit_testable(root, false).unwrap();
        let nav = p.navbar().unwrap();
        assert!(BackgroundSampler::new().sample(&mut p).is_err());
        assert!(p.is_hit_testable(nav));
    }

    /// A scene whose hit-test always fails and which records every
    /// hit-testing change.
    struct FailingScene {
        hit_testable: bool,
        toggles: Vec<bool>,
    }

    impl Scene for FailingScene {
        type Element = u8;

        fn navbar(&self) -> Option<u8> {
            Some(0)
        }
        fn bounding_rect(&self, _element: u8) -> Rect {
            Rect::new(0.0, 0.0, 100.0, 50.0)
        }
        fn is_hit_testable(&self, _element: u8) -> bool {
            self.hit_testable
        }
        fn set_hit_testable(&mut self, _element: u8, hit_testable: bool) -> Result<(), SceneError> {
            self.hit_testable = hit_testable;
            self.toggles.push(hit_testable);
            Ok(())
        }
        fn element_at(&self, _point: Point) -> Result<Option<u8>, SceneError> {
            Err(SceneError::HitTest("detached document".into()))
        }
        fn computed_background(&self, _element: u8) -> Background {
            Background::transparent()
        }
        fn parent(&self, _element: u8) -> Option<u8> {
            None
        }
        fn scroll_y(&self) -> f64 {
            0.0
        }
    }

    #[test]
    fn failing_query_restores_hit_testing() {
        let mut scene = FailingScene {
            hit_testable: true,
            toggles: Vec::new(),
        };
        let err = BackgroundSampler::new().sample(&mut scene).unwrap_err();
        assert!(matches!(err, SamplingError::HitTest(_)));
        assert!(scene.hit_testable);
        assert_eq!(scene.toggles, vec![false, true]);
    }

    #[test]
    fn missing_navbar() {
        let mut p = Page::from_toml(
            r#"
            [viewport]
            width = 1000.0
            height = 800.0
            "#,
        )
        .unwrap();
        assert_eq!(
            BackgroundSampler::new().sample(&mut p).unwrap_err(),
            SamplingError::NavbarMissing
        );
    }
}
