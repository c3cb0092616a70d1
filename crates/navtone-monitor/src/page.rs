// SPDX-License-Identifier: MIT
//
// An in-memory page: a stack of full-width sections under a fixed navbar.
//
// The layout is described in TOML:
//
//   [viewport]                  width, height, optional background
//   [nav]                       height, optional background
//   [[sections]]                id, height, background, image, pixel
//   [[sections.layers]]         top, height, background, image, pixel
//
// Sections stack top to bottom in document order. Layers are children of
// their section, positioned relative to its top, painted above it. The
// navbar is fixed at the top of the viewport and painted above
// everything. `pixel` is what an off-screen render of an image background
// yields at the element's center; `PageSurface` serves it.
//
// Nodes live in one arena in paint order (root first, navbar last), so a
// hit-test is a reverse scan for the first hit-testable node containing
// the point.

use std::collections::HashMap;

use navtone_color::{ParseColorError, Rgb, parse_css_color};
use serde::Deserialize;
use thiserror::Error;

use crate::geometry::{Point, Rect};
use crate::scene::{Background, Scene, SceneError};
use crate::surface::{PixelSurface, SurfaceError, SurfaceSample};

/// What an element without a `background` reports.
const UNSET_BACKGROUND: &str = "rgba(0, 0, 0, 0)";

// ─── Errors ──────────────────────────────────────────────────────────────────

/// An invalid page description.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("malformed page description: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("duplicate section id `{0}`")]
    DuplicateSection(String),

    #[error("{what} must be a positive, finite size (got {value})")]
    InvalidSize { what: String, value: f64 },

    #[error("pixel color of `{id}`: {source}")]
    InvalidPixel { id: String, source: ParseColorError },

    #[error("pixel color of `{0}` must be opaque")]
    TranslucentPixel(String),
}

// ─── Description ─────────────────────────────────────────────────────────────

/// Deserialized page description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageSpec {
    pub viewport: ViewportSpec,
    #[serde(default)]
    pub nav: Option<NavSpec>,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewportSpec {
    pub width: f64,
    pub height: f64,
    /// Background of the document root.
    #[serde(default)]
    pub background: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavSpec {
    pub height: f64,
    #[serde(default)]
    pub background: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionSpec {
    pub id: String,
    pub height: f64,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub pixel: Option<String>,
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerSpec {
    /// Offset from the top of the parent section.
    #[serde(default)]
    pub top: f64,
    pub height: f64,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub pixel: Option<String>,
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// Handle to a node of a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageNode(usize);

#[derive(Debug, Clone)]
struct Node {
    parent: Option<PageNode>,
    /// Document coordinates, or viewport coordinates when `fixed`.
    rect: Rect,
    fixed: bool,
    background: Background,
    pixel: Option<Rgb>,
    hit_testable: bool,
}

/// A laid-out page implementing [`Scene`].
#[derive(Debug, Clone)]
pub struct Page {
    viewport: Rect,
    nodes: Vec<Node>,
    navbar: Option<PageNode>,
    sections: Vec<(String, PageNode)>,
    document_height: f64,
    scroll_y: f64,
}

impl Page {
    /// Parse and lay out a TOML page description.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the TOML is malformed or the description
    /// is invalid.
    pub fn from_toml(source: &str) -> Result<Self, PageError> {
        let spec: PageSpec = toml::from_str(source)?;
        Self::from_spec(&spec)
    }

    /// Lay out a page description.
    ///
    /// # Errors
    ///
    /// - [`PageError::InvalidSize`] for a non-positive or non-finite
    ///   width or height.
    /// - [`PageError::DuplicateSection`] if two sections share an id.
    /// - [`PageError::InvalidPixel`] / [`PageError::TranslucentPixel`]
    ///   for a `pixel` that is not an opaque CSS color.
    pub fn from_spec(spec: &PageSpec) -> Result<Self, PageError> {
        let width = positive("viewport width", spec.viewport.width)?;
        let height = positive("viewport height", spec.viewport.height)?;

        let mut nodes = vec![Node {
            parent: None,
            rect: Rect::new(0.0, 0.0, width, height),
            fixed: false,
            background: background(spec.viewport.background.as_deref(), None),
            pixel: None,
            hit_testable: true,
        }];
        let root = PageNode(0);

        let mut sections: Vec<(String, PageNode)> = Vec::with_capacity(spec.sections.len());
        let mut y = 0.0;
        for section in &spec.sections {
            if sections.iter().any(|(id, _)| *id == section.id) {
                return Err(PageError::DuplicateSection(section.id.clone()));
            }
            let h = positive(&format!("height of section `{}`", section.id), section.height)?;
            let node = PageNode(nodes.len());
            nodes.push(Node {
                parent: Some(root),
                rect: Rect::new(0.0, y, width, h),
                fixed: false,
                background: background(section.background.as_deref(), section.image.clone()),
                pixel: pixel(&section.id, section.pixel.as_deref())?,
                hit_testable: true,
            });

            for (i, layer) in section.layers.iter().enumerate() {
                let name = format!("{}.layers[{i}]", section.id);
                let lh = positive(&format!("height of `{name}`"), layer.height)?;
                nodes.push(Node {
                    parent: Some(node),
                    rect: Rect::new(0.0, y + layer.top, width, lh),
                    fixed: false,
                    background: background(layer.background.as_deref(), layer.image.clone()),
                    pixel: pixel(&name, layer.pixel.as_deref())?,
                    hit_testable: true,
                });
            }

            sections.push((section.id.clone(), node));
            y += h;
        }
        nodes[root.0].rect.height = y.max(height);

        let navbar = match &spec.nav {
            Some(nav) => {
                let h = positive("nav height", nav.height)?;
                nodes.push(Node {
                    parent: Some(root),
                    rect: Rect::new(0.0, 0.0, width, h),
                    fixed: true,
                    background: background(nav.background.as_deref(), None),
                    pixel: None,
                    hit_testable: true,
                });
                Some(PageNode(nodes.len() - 1))
            }
            None => None,
        };

        Ok(Self {
            viewport: Rect::new(0.0, 0.0, width, height),
            nodes,
            navbar,
            sections,
            document_height: y,
            scroll_y: 0.0,
        })
    }

    /// The document root.
    #[must_use]
    pub const fn root(&self) -> PageNode {
        PageNode(0)
    }

    /// The viewport rectangle (origin at 0, 0).
    #[must_use]
    pub const fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Total height of all sections.
    #[must_use]
    pub const fn document_height(&self) -> f64 {
        self.document_height
    }

    /// Largest valid scroll offset.
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport.height).max(0.0)
    }

    /// Scroll to `y`, clamped to `[0, max_scroll]`. Returns the offset
    /// actually applied.
    pub fn scroll_to(&mut self, y: f64) -> f64 {
        self.scroll_y = y.clamp(0.0, self.max_scroll());
        self.scroll_y
    }

    /// Scroll by `dy` pixels. Returns the new offset.
    pub fn scroll_by(&mut self, dy: f64) -> f64 {
        self.scroll_to(self.scroll_y + dy)
    }

    /// Whether the viewport is at the bottom of the document.
    #[must_use]
    pub fn at_bottom(&self) -> bool {
        self.scroll_y >= self.max_scroll()
    }

    /// Change the viewport size. Every node spans the new width; the
    /// scroll offset is clamped to the new range.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::InvalidSize`] for a non-positive size; the
    /// page is unchanged in that case.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), PageError> {
        let width = positive("viewport width", width)?;
        let height = positive("viewport height", height)?;
        self.viewport = Rect::new(0.0, 0.0, width, height);
        for node in &mut self.nodes {
            node.rect.width = width;
        }
        self.nodes[0].rect.height = self.document_height.max(height);
        self.scroll_to(self.scroll_y);
        Ok(())
    }

    /// Section id of `node`, if it is a section.
    #[must_use]
    pub fn section_id(&self, node: PageNode) -> Option<&str> {
        self.sections
            .iter()
            .find_map(|(id, n)| (*n == node).then_some(id.as_str()))
    }

    fn node(&self, element: PageNode) -> Result<&Node, SceneError> {
        self.nodes
            .get(element.0)
            .ok_or_else(|| SceneError::UnknownElement(format!("{element:?}")))
    }

    fn viewport_rect(&self, node: &Node) -> Rect {
        if node.fixed {
            node.rect
        } else {
            node.rect.offset_y(-self.scroll_y)
        }
    }
}

fn positive(what: &str, value: f64) -> Result<f64, PageError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PageError::InvalidSize {
            what: what.to_owned(),
            value,
        })
    }
}

fn background(color: Option<&str>, image: Option<String>) -> Background {
    Background {
        color: color.unwrap_or(UNSET_BACKGROUND).to_owned(),
        image,
    }
}

fn pixel(id: &str, value: Option<&str>) -> Result<Option<Rgb>, PageError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let color = parse_css_color(value).map_err(|source| PageError::InvalidPixel {
        id: id.to_owned(),
        source,
    })?;
    if color.is_opaque() {
        Ok(Some(color.rgb))
    } else {
        Err(PageError::TranslucentPixel(id.to_owned()))
    }
}

impl Scene for Page {
    type Element = PageNode;

    fn navbar(&self) -> Option<PageNode> {
        self.navbar
    }

    fn bounding_rect(&self, element: PageNode) -> Rect {
        self.node(element)
            .map_or_else(|_| Rect::default(), |node| self.viewport_rect(node))
    }

    fn is_hit_testable(&self, element: PageNode) -> bool {
        self.node(element).is_ok_and(|node| node.hit_testable)
    }

    fn set_hit_testable(&mut self, element: PageNode, hit_testable: bool) -> Result<(), SceneError> {
        let node = self
            .nodes
            .get_mut(element.0)
            .ok_or_else(|| SceneError::UnknownElement(format!("{element:?}")))?;
        node.hit_testable = hit_testable;
        Ok(())
    }

    fn element_at(&self, point: Point) -> Result<Option<PageNode>, SceneError> {
        if !self.viewport.contains(point) {
            return Ok(None);
        }
        Ok(self
            .nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, node)| node.hit_testable && self.viewport_rect(node).contains(point))
            .map(|(i, _)| PageNode(i)))
    }

    fn computed_background(&self, element: PageNode) -> Background {
        self.node(element)
            .map_or_else(|_| Background::transparent(), |node| node.background.clone())
    }

    fn parent(&self, element: PageNode) -> Option<PageNode> {
        self.node(element).ok().and_then(|node| node.parent)
    }

    fn sections(&self) -> Vec<(String, PageNode)> {
        self.sections.clone()
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }
}

// ─── PageSurface ─────────────────────────────────────────────────────────────

/// How a [`PageSurface`] delivers renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceMode {
    /// Every sample is ready at once.
    #[default]
    Immediate,
    /// The first request for an element answers `Pending`; the render
    /// completes at the next `poll()`.
    Deferred,
}

/// Serves the `pixel` colors of a [`Page`] as rendered image samples.
#[derive(Debug, Clone)]
pub struct PageSurface {
    mode: SurfaceMode,
    pixels: HashMap<PageNode, Rgb>,
    in_flight: Vec<PageNode>,
    completed: HashMap<PageNode, Rgb>,
}

impl PageSurface {
    /// Capture the pixel colors of `page`. The surface does not borrow
    /// the page.
    #[must_use]
    pub fn new(page: &Page, mode: SurfaceMode) -> Self {
        let pixels = page
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| node.pixel.map(|rgb| (PageNode(i), rgb)))
            .collect();
        Self {
            mode,
            pixels,
            in_flight: Vec::new(),
            completed: HashMap::new(),
        }
    }

    /// Renders started but not yet collected by `poll()`.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

impl PixelSurface<PageNode> for PageSurface {
    fn sample_center(&mut self, element: PageNode, _rect: Rect) -> Result<SurfaceSample, SurfaceError> {
        if let Some(&rgb) = self.completed.get(&element) {
            return Ok(SurfaceSample::Ready(rgb));
        }
        let &rgb = self
            .pixels
            .get(&element)
            .ok_or_else(|| SurfaceError::RenderFailed(format!("{element:?} has no rendered pixels")))?;
        match self.mode {
            SurfaceMode::Immediate => Ok(SurfaceSample::Ready(rgb)),
            SurfaceMode::Deferred => {
                if !self.in_flight.contains(&element) {
                    self.in_flight.push(element);
                }
                Ok(SurfaceSample::Pending)
            }
        }
    }

    fn poll(&mut self) {
        for element in self.in_flight.drain(..) {
            if let Some(&rgb) = self.pixels.get(&element) {
                self.completed.insert(element, rgb);
            }
        }
    }
}
