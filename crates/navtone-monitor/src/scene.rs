// SPDX-License-Identifier: MIT
//
// The injected view of the rendered page.
//
// The sampler never touches a global document. Everything it needs to
// know about the page goes through this trait: where the navigation bar
// is, which element sits at a point, what an element's computed
// background is, and who its parent is. A browser binding implements it
// over the DOM; `Page` implements it over an in-memory layout.

use std::fmt;
use std::ops::Deref;

use thiserror::Error;
use tracing::warn;

use crate::geometry::{Point, Rect};

/// A failed scene query or mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("element {0} is not part of the scene")]
    UnknownElement(String),

    #[error("hit-test query failed: {0}")]
    HitTest(String),

    #[error("cannot change hit-testing of {element}: {reason}")]
    HitTestMutation { element: String, reason: String },
}

/// An element's computed background, as the style engine reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Background {
    /// Computed `background-color`, e.g. `rgba(0, 0, 0, 0)`.
    pub color: String,
    /// Computed `background-image`; `None` or `"none"` when unset.
    pub image: Option<String>,
}

impl Background {
    /// A background with only a color.
    #[must_use]
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            image: None,
        }
    }

    /// `rgba(0, 0, 0, 0)` and no image, as an unstyled element reports.
    #[must_use]
    pub fn transparent() -> Self {
        Self::solid("rgba(0, 0, 0, 0)")
    }

    /// Whether a background image or gradient is painted.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image
            .as_deref()
            .is_some_and(|image| !image.trim().is_empty() && image.trim() != "none")
    }
}

/// Read access to a rendered page, plus the one mutation the sampler
/// needs (toggling hit-testing on the navigation bar).
pub trait Scene {
    /// Handle to a rendered element.
    type Element: Copy + Eq + fmt::Debug + 'static;

    /// The nearest navigation landmark, if the page has one.
    fn navbar(&self) -> Option<Self::Element>;

    /// Bounding rectangle in viewport coordinates.
    fn bounding_rect(&self, element: Self::Element) -> Rect;

    /// Whether `element` currently takes part in hit-testing.
    fn is_hit_testable(&self, element: Self::Element) -> bool;

    /// Include or exclude `element` from hit-testing.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError`] if the element's hit-testing cannot be changed.
    fn set_hit_testable(&mut self, element: Self::Element, hit_testable: bool)
    -> Result<(), SceneError>;

    /// The topmost hit-testable element under `point`, or `None` when the
    /// point is outside the viewport or nothing is rendered there.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError`] if the hit-test itself fails.
    fn element_at(&self, point: Point) -> Result<Option<Self::Element>, SceneError>;

    /// Computed background of `element`.
    fn computed_background(&self, element: Self::Element) -> Background;

    /// Parent element; `None` for the document root.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// Identified page sections in document order.
    fn sections(&self) -> Vec<(String, Self::Element)> {
        Vec::new()
    }

    /// Vertical scroll offset of the viewport.
    fn scroll_y(&self) -> f64;
}

// ─── HitTestSuspension ───────────────────────────────────────────────────────

/// Excludes one element from hit-testing for as long as the guard lives.
///
/// The previous hit-testing state is restored on drop, whether or not the
/// queries made through the guard succeeded. The guard derefs to the
/// scene so queries go straight through it:
///
/// ```
/// use navtone_monitor::{HitTestSuspension, Page, Scene};
///
/// let mut page = Page::from_toml(r#"
///     [viewport]
///     width = 800.0
///     height = 600.0
///     [nav]
///     height = 60.0
///     [[sections]]
///     id = "home"
///     height = 600.0
///     background = "navy"
/// "#).unwrap();
/// let nav = page.navbar().unwrap();
/// let center = page.bounding_rect(nav).center();
///
/// let behind = {
///     let scene = HitTestSuspension::new(&mut page, nav).unwrap();
///     scene.element_at(center).unwrap()
/// };
/// assert_ne!(behind, Some(nav));
/// assert!(page.is_hit_testable(nav));
/// ```
pub struct HitTestSuspension<'a, S: Scene> {
    scene: &'a mut S,
    element: S::Element,
    previous: bool,
}

impl<'a, S: Scene> HitTestSuspension<'a, S> {
    /// Exclude `element` from hit-testing until the guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError`] if hit-testing cannot be disabled; nothing
    /// needs restoring in that case.
    pub fn new(scene: &'a mut S, element: S::Element) -> Result<Self, SceneError> {
        let previous = scene.is_hit_testable(element);
        scene.set_hit_testable(element, false)?;
        Ok(Self {
            scene,
            element,
            previous,
        })
    }
}

impl<S: Scene> Deref for HitTestSuspension<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.scene
    }
}

impl<S: Scene> Drop for HitTestSuspension<'_, S> {
    fn drop(&mut self) {
        if let Err(err) = self.scene.set_hit_testable(self.element, self.previous) {
            warn!(element = ?self.element, error = %err, "failed to restore hit-testing");
        }
    }
}
