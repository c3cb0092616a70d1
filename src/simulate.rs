// SPDX-License-Identifier: MIT
//
// Headless scroll-through of a page.
//
// Each frame:
//
//   scroll by `scroll_step` → Scroll event (immediate update)
//   advance the clock by 1/fps → deliver the frame (throttled update)
//   detect the section under the navbar
//   report if a new style was published or the section changed
//
// Image backgrounds are served by a deferred PageSurface, so the first
// sample over an image uses its background color and the rendered pixel
// lands one frame later, as in a browser.

use std::time::Duration;

use navtone_contrast::AdaptiveStyle;
use navtone_monitor::{
    FrameHost, Monitor, MonitorConfig, Page, PageSurface, Scene, SectionTracker, SurfaceMode,
    ViewportEvent, VirtualHost,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::navbar::NavbarChrome;
use crate::site::SimulationConfig;

/// One reported moment of the simulation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub frame: u64,
    pub time_ms: u64,
    pub scroll_y: f64,
    pub section: Option<String>,
    pub revision: u64,
    pub style: AdaptiveStyle,
    pub chrome: NavbarChrome,
}

/// Totals after a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub frames: u64,
    pub revisions: u64,
    pub reports: u64,
    pub final_scroll_y: f64,
}

/// Drives a Monitor over a [`Page`] with a virtual clock.
pub struct Simulation {
    monitor: Monitor<Page, VirtualHost>,
    tracker: SectionTracker,
    config: SimulationConfig,
    frame: u64,
}

impl Simulation {
    #[must_use]
    pub fn new(page: Page, monitor: MonitorConfig, config: SimulationConfig) -> Self {
        let surface = PageSurface::new(&page, SurfaceMode::Deferred);
        Self {
            monitor: Monitor::new(page, VirtualHost::new(), monitor).with_surface(surface),
            tracker: SectionTracker::new(),
            config,
            frame: 0,
        }
    }

    fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.config.fps.max(1)))
    }

    fn report(&self) -> Report {
        let style = self.monitor.style().clone();
        let scroll_y = self.monitor.scene().scroll_y();
        let section = self.tracker.current().map(str::to_owned);
        let chrome = NavbarChrome::render(&style, scroll_y, section.as_deref());
        Report {
            frame: self.frame,
            time_ms: u64::try_from(self.monitor.host().now().as_millis()).unwrap_or(u64::MAX),
            scroll_y,
            section,
            revision: self.monitor.revision(),
            style,
            chrome,
        }
    }

    /// Scroll from the top to the bottom of the page (or until the frame
    /// cap), calling `emit` for the initial state and every change.
    pub fn run(&mut self, mut emit: impl FnMut(&Report)) -> Summary {
        let dt = self.frame_duration();
        let mut reports = 0;

        self.monitor.activate();
        self.tracker.detect(self.monitor.scene());
        emit(&self.report());
        reports += 1;

        loop {
            if self.config.frames.is_some_and(|cap| self.frame >= cap) {
                debug!(frames = self.frame, "frame cap reached");
                break;
            }
            self.frame += 1;
            let revision = self.monitor.revision();

            let before = self.monitor.scene().scroll_y();
            let after = self.monitor.scene_mut().scroll_by(self.config.scroll_step);
            let moved = after > before;
            if moved {
                self.monitor.dispatch(ViewportEvent::Scroll);
            }
            self.monitor.step(dt);

            let section_changed = self.tracker.detect(self.monitor.scene());
            if section_changed || self.monitor.revision() != revision {
                emit(&self.report());
                reports += 1;
            }

            if !moved {
                debug!(frame = self.frame, "reached the bottom of the page");
                break;
            }
        }

        let summary = Summary {
            frames: self.frame,
            revisions: self.monitor.revision(),
            reports,
            final_scroll_y: self.monitor.scene().scroll_y(),
        };
        self.monitor.deactivate();
        info!(
            frames = summary.frames,
            revisions = summary.revisions,
            "simulation finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navtone_color::Rgb;

    const PAGE: &str = r##"
        [viewport]
        width = 1000.0
        height = 500.0

        [nav]
        height = 80.0

        [[sections]]
        id = "home"
        height = 500.0
        background = "#111111"
        image = "url(hero.jpg)"
        pixel = "#050505"

        [[sections]]
        id = "about"
        height = 500.0
        background = "#fdfaf5"
    "##;

    fn sim(monitor: MonitorConfig, config: SimulationConfig) -> Simulation {
        Simulation::new(Page::from_toml(PAGE).unwrap(), monitor, config)
    }

    fn fast() -> SimulationConfig {
        SimulationConfig {
            fps: 60,
            scroll_step: 100.0,
            frames: None,
        }
    }

    #[test]
    fn scrolls_to_the_bottom_and_stops() {
        let mut s = sim(MonitorConfig::default(), fast());
        let summary = s.run(|_| {});
        // 500px of scroll at 100px per frame, plus the frame that found
        // the bottom.
        assert_eq!(summary.frames, 6);
        assert_eq!(summary.final_scroll_y, 500.0);
        assert!(!s.monitor.is_active());
    }

    #[test]
    fn reports_follow_the_background() {
        let mut s = sim(MonitorConfig::default(), fast());
        let mut reports = Vec::new();
        s.run(|r| reports.push(r.clone()));

        let first = &reports[0];
        assert_eq!(first.frame, 0);
        assert_eq!(first.section.as_deref(), Some("home"));
        // Deferred image: the first sample uses the background color.
        assert_eq!(first.style.background_color, Rgb::gray(0x11));

        assert!(reports.iter().any(|r| r.style.background_color == Rgb::gray(5)));

        let last = reports.last().unwrap();
        assert_eq!(last.section.as_deref(), Some("about"));
        assert!(!last.style.is_light);
        assert!(last.chrome.scrolled);
    }

    #[test]
    fn frame_cap_stops_early() {
        let config = SimulationConfig {
            frames: Some(2),
            ..fast()
        };
        let summary = sim(MonitorConfig::default(), config).run(|_| {});
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.final_scroll_y, 200.0);
    }

    #[test]
    fn report_time_follows_the_virtual_clock() {
        let mut s = sim(MonitorConfig::default(), fast());
        let mut times = Vec::new();
        s.run(|r| times.push((r.frame, r.time_ms)));

        assert_eq!(times[0], (0, 0));
        // 1/60 s per frame, truncated to whole milliseconds.
        for &(frame, time_ms) in &times[1..] {
            assert!(time_ms >= frame * 16 && time_ms <= frame * 17, "{frame}: {time_ms}");
        }
        assert!(times.windows(2).all(|w| w[0].1 < w[1].1));
    }

    #[test]
    fn disabled_monitor_reports_pinned_style_only() {
        let mut s = sim(MonitorConfig::disabled(), fast());
        let mut styles = Vec::new();
        let summary = s.run(|r| styles.push(r.style.clone()));
        assert!(styles.iter().all(|style| *style == AdaptiveStyle::disabled()));
        assert_eq!(summary.revisions, 1);
    }

    #[test]
    fn report_serializes_colors_as_css() {
        let mut s = sim(MonitorConfig::default(), fast());
        let mut json = String::new();
        s.run(|r| {
            if json.is_empty() {
                json = serde_json::to_string(r).unwrap();
            }
        });
        assert!(json.contains(r#""textColor":"rgb(255, 255, 255)""#), "{json}");
        assert!(json.contains(r#""section":"home""#), "{json}");
    }
}
