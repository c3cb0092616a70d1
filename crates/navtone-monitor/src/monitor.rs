// SPDX-License-Identifier: MIT
//
// Monitor: the frame-driven loop that keeps the navbar style current.
//
//   Disabled ──activate()──▶ Active ──deactivate()──▶ Disabled
//
// While Active the Monitor holds exactly one outstanding frame and two
// listeners (scroll, resize). Every frame it checks the throttle,
// samples, and re-requests the next frame. Viewport events sample
// immediately. A sample that yields the same background as the last
// applied one publishes nothing.
//
// Deactivation cancels the frame and detaches the listeners before it
// returns, so no later callback can mutate the published style: frame
// ids that are not the outstanding one are ignored.

use std::fmt;
use std::mem;
use std::time::Duration;

use navtone_color::Rgb;
use navtone_contrast::{AdaptiveStyle, StyleChanges};
use tracing::{debug, trace, warn};

use crate::config::MonitorConfig;
use crate::host::{FrameHost, FrameId, ListenerId, ViewportEvent, VirtualHost};
use crate::sampler::BackgroundSampler;
use crate::scene::Scene;
use crate::surface::PixelSurface;

/// Called with the new style and the fields that changed.
type Subscriber = Box<dyn FnMut(&AdaptiveStyle, StyleChanges)>;

/// What a single [`Monitor::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A new style was published.
    Published,
    /// The background matched the last applied one.
    Unchanged,
    /// Sampling failed; the previous style stays.
    Failed,
    /// The Monitor is not active.
    Inactive,
}

#[derive(Debug)]
enum Phase {
    Disabled,
    Active {
        frame: Option<FrameId>,
        listeners: [ListenerId; 2],
    },
}

/// Keeps an [`AdaptiveStyle`] in sync with the background behind a
/// scene's navbar.
pub struct Monitor<S: Scene, H: FrameHost> {
    scene: S,
    host: H,
    config: MonitorConfig,
    sampler: BackgroundSampler<S::Element>,
    phase: Phase,
    style: AdaptiveStyle,
    revision: u64,
    /// Background of the last published style, for deduplication.
    last_background: Option<Rgb>,
    /// When a frame last ran an update (throttle stamp).
    last_tick: Option<Duration>,
    subscribers: Vec<Subscriber>,
}

impl<S: Scene, H: FrameHost> Monitor<S, H> {
    /// A disabled Monitor showing [`AdaptiveStyle::initial`].
    pub fn new(scene: S, host: H, config: MonitorConfig) -> Self {
        Self {
            scene,
            host,
            config,
            sampler: BackgroundSampler::new(),
            phase: Phase::Disabled,
            style: AdaptiveStyle::initial(),
            revision: 0,
            last_background: None,
            last_tick: None,
            subscribers: Vec::new(),
        }
    }

    /// Sample image and gradient backgrounds through `surface`.
    #[must_use]
    pub fn with_surface(mut self, surface: impl PixelSurface<S::Element> + 'static) -> Self {
        self.sampler = BackgroundSampler::with_surface(surface);
        self
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Start monitoring.
    ///
    /// With adaptation disabled the style is pinned with
    /// [`AdaptiveStyle::to_disabled`] and nothing is scheduled. Otherwise
    /// this samples once, requests a frame and subscribes to scroll and
    /// resize. Calling it while already active does nothing.
    pub fn activate(&mut self) {
        if self.is_active() {
            return;
        }
        if !self.config.enabled {
            debug!("adaptive navbar disabled, pinning default style");
            self.pin_disabled();
            return;
        }

        let listeners = [
            self.host.add_listener(ViewportEvent::Scroll),
            self.host.add_listener(ViewportEvent::Resize),
        ];
        let frame = self.host.request_frame();
        self.phase = Phase::Active {
            frame: Some(frame),
            listeners,
        };
        debug!(interval_ms = self.config.update_interval_ms, "navbar monitor active");
        self.update();
    }

    /// Stop monitoring and pin the disabled style.
    ///
    /// The outstanding frame is cancelled and both listeners are removed
    /// before this returns.
    pub fn deactivate(&mut self) {
        self.teardown();
        self.pin_disabled();
    }

    /// Replace the configuration, restarting the loop.
    pub fn reconfigure(&mut self, config: MonitorConfig) {
        self.deactivate();
        self.config = config;
        self.activate();
    }

    fn teardown(&mut self) {
        if let Phase::Active { frame, listeners } = mem::replace(&mut self.phase, Phase::Disabled) {
            if let Some(frame) = frame {
                self.host.cancel_frame(frame);
            }
            for listener in listeners {
                self.host.remove_listener(listener);
            }
            debug!("navbar monitor stopped");
        }
        self.last_background = None;
        self.last_tick = None;
    }

    fn pin_disabled(&mut self) {
        let disabled = self.style.to_disabled();
        if self.style != disabled {
            self.publish(disabled);
        }
    }

    // ─── Host callbacks ──────────────────────────────────────────────────

    /// Deliver an animation frame.
    ///
    /// Only the outstanding frame is honored. It runs an update when the
    /// throttle interval has elapsed since the last frame-driven update
    /// (or none has run yet), then requests the next frame.
    pub fn on_frame(&mut self, id: FrameId) {
        let Phase::Active { frame, .. } = &mut self.phase else {
            trace!(?id, "frame after deactivation ignored");
            return;
        };
        if *frame != Some(id) {
            trace!(?id, "stale frame ignored");
            return;
        }
        *frame = None;

        let now = self.host.now();
        let interval = self.config.update_interval();
        let due = self
            .last_tick
            .is_none_or(|last| now.saturating_sub(last) >= interval);
        if due {
            self.last_tick = Some(now);
            self.update();
        } else {
            trace!("throttled");
        }

        let next = self.host.request_frame();
        if let Phase::Active { frame, .. } = &mut self.phase {
            *frame = Some(next);
        }
    }

    /// Deliver a scroll or resize event. Updates immediately, without
    /// moving the throttle stamp.
    pub fn on_viewport_event(&mut self, event: ViewportEvent) {
        if !self.is_active() {
            return;
        }
        trace!(%event, "viewport event");
        self.update();
    }

    // ─── Update ──────────────────────────────────────────────────────────

    /// Sample the background and publish a new style if it changed.
    pub fn update(&mut self) -> UpdateOutcome {
        if !self.is_active() {
            return UpdateOutcome::Inactive;
        }
        match self.sampler.sample(&mut self.scene) {
            Err(err) => {
                warn!(error = %err, "background sampling failed, keeping current style");
                UpdateOutcome::Failed
            }
            Ok(background) if self.last_background == Some(background) => {
                trace!(%background, "background unchanged");
                UpdateOutcome::Unchanged
            }
            Ok(background) => {
                self.last_background = Some(background);
                self.publish(AdaptiveStyle::from_background(background));
                UpdateOutcome::Published
            }
        }
    }

    fn publish(&mut self, style: AdaptiveStyle) {
        let changes = self.style.changes(&style);
        self.style = style;
        self.revision += 1;
        debug!(
            revision = self.revision,
            background = %self.style.background_color,
            text = %self.style.text_color,
            weight = self.style.font_weight,
            contrast = self.style.contrast_ratio,
            "navbar style published"
        );
        for subscriber in &mut self.subscribers {
            subscriber(&self.style, changes);
        }
    }

    // ─── Read side ───────────────────────────────────────────────────────

    /// The current style snapshot.
    #[must_use]
    pub const fn style(&self) -> &AdaptiveStyle {
        &self.style
    }

    /// Number of styles published so far.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active { .. })
    }

    #[must_use]
    pub const fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Call `f` after every publish with the new style and what changed.
    pub fn subscribe(&mut self, f: impl FnMut(&AdaptiveStyle, StyleChanges) + 'static) {
        self.subscribers.push(Box::new(f));
    }

    #[must_use]
    pub const fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable access to the scene, e.g. to scroll it. Changes are picked
    /// up by the next frame or viewport event.
    pub const fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<S: Scene> Monitor<S, VirtualHost> {
    /// Advance the virtual clock by `dt` and deliver every pending frame.
    pub fn step(&mut self, dt: Duration) {
        self.host.advance(dt);
        for id in self.host.take_frames() {
            self.on_frame(id);
        }
    }

    /// Deliver `event` if a listener for it is registered.
    pub fn dispatch(&mut self, event: ViewportEvent) {
        if self.host.has_listener(event) {
            self.on_viewport_event(event);
        }
    }
}

impl<S: Scene, H: FrameHost> Drop for Monitor<S, H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<S: Scene, H: FrameHost> fmt::Debug for Monitor<S, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("phase", &self.phase)
            .field("config", &self.config)
            .field("revision", &self.revision)
            .field("style", &self.style)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
