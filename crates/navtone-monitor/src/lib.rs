// SPDX-License-Identifier: MIT
//
// navtone-monitor: keeps a fixed navigation bar readable while the page
// underneath it scrolls.
//
// Everything environmental is injected:
//
//   Scene        → the rendered page: where the nav is, what is behind it,
//                  what each element's computed background is
//   FrameHost    → time, "run before next repaint", scroll/resize listeners
//   PixelSurface → optional off-screen renderer for image/gradient pixels
//
// The Monitor wires them together. Each frame it checks the throttle,
// asks the BackgroundSampler for the opaque color behind the nav, runs it
// through the contrast engine and publishes the resulting AdaptiveStyle.
// Scroll and resize events bypass the throttle. Deactivating (or dropping)
// the Monitor cancels the pending frame and detaches both listeners.
//
// `Page`, `VirtualHost` and `PageSurface` are complete in-memory
// implementations of the three traits, so the whole loop runs headless.

pub mod config;
pub mod geometry;
pub mod host;
pub mod monitor;
pub mod page;
pub mod resolver;
pub mod sampler;
pub mod scene;
pub mod section;
pub mod surface;

pub use config::MonitorConfig;
pub use geometry::{Point, Rect};
pub use host::{FrameHost, FrameId, ListenerId, ViewportEvent, VirtualHost};
pub use monitor::{Monitor, UpdateOutcome};
pub use page::{Page, PageError, PageNode, PageSpec, PageSurface, SurfaceMode};
pub use resolver::{ColorResolver, ImageSampleResolver, Layer, SolidColorResolver};
pub use sampler::{BackgroundSampler, SamplingError};
pub use scene::{Background, HitTestSuspension, Scene, SceneError};
pub use section::SectionTracker;
pub use surface::{PixelSurface, SurfaceError, SurfaceSample};
