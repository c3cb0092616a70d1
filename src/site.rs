// SPDX-License-Identifier: MIT
//
// Site files: a page description plus the monitor and simulation settings
// in one TOML document.
//
//   [viewport] / [nav] / [[sections]]   → navtone_monitor::PageSpec
//   [monitor]                           → navtone_monitor::MonitorConfig
//   [simulation]                        → SimulationConfig

use std::fs;
use std::path::Path;

use anyhow::{Context, ensure};
use navtone_monitor::{MonitorConfig, PageSpec};
use serde::Deserialize;

/// How the simulator drives the page.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Frames per second of the virtual display.
    pub fps: u32,
    /// Pixels scrolled per frame.
    pub scroll_step: f64,
    /// Stop after this many frames even if the bottom was not reached.
    pub frames: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            scroll_step: 24.0,
            frames: None,
        }
    }
}

impl SimulationConfig {
    /// Reject settings the simulator cannot run with.
    ///
    /// # Errors
    ///
    /// Fails for a zero frame rate or a non-positive scroll step.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.fps > 0, "simulation fps must be at least 1");
        ensure!(
            self.scroll_step.is_finite() && self.scroll_step > 0.0,
            "simulation scroll_step must be positive (got {})",
            self.scroll_step
        );
        Ok(())
    }
}

/// A parsed site file.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteFile {
    #[serde(flatten)]
    pub page: PageSpec,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl SiteFile {
    /// Read and parse a site file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid site file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read page file: {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("Invalid page file: {}", path.display()))
    }

    /// Parse a site file from TOML source.
    ///
    /// # Errors
    ///
    /// Returns the TOML error for malformed input or unknown settings.
    pub fn parse(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r#"
        [viewport]
        width = 1280.0
        height = 720.0
    "#;

    #[test]
    fn defaults_when_tables_are_missing() {
        let site = SiteFile::parse(MINIMAL).unwrap();
        assert_eq!(site.monitor, MonitorConfig::default());
        assert_eq!(site.simulation, SimulationConfig::default());
        assert!(site.page.sections.is_empty());
        assert!(site.page.nav.is_none());
    }

    #[test]
    fn reads_all_tables() {
        let site = SiteFile::parse(
            r#"
            [viewport]
            width = 1280.0
            height = 720.0

            [monitor]
            update_interval_ms = 50

            [simulation]
            fps = 30
            frames = 10

            [nav]
            height = 72.0

            [[sections]]
            id = "home"
            height = 720.0
            "#,
        )
        .unwrap();
        assert_eq!(site.monitor.update_interval_ms, 50);
        assert!(site.monitor.enabled);
        assert_eq!(
            site.simulation,
            SimulationConfig {
                fps: 30,
                scroll_step: 24.0,
                frames: Some(10),
            }
        );
        assert_eq!(site.page.sections[0].id, "home");
    }

    #[test]
    fn unknown_simulation_key_is_rejected() {
        let source = format!("{MINIMAL}\n[simulation]\nspeed = 3\n");
        assert!(SiteFile::parse(&source).is_err());
    }

    #[test]
    fn validation() {
        assert!(SimulationConfig::default().validate().is_ok());
        let zero_fps = SimulationConfig {
            fps: 0,
            ..SimulationConfig::default()
        };
        assert!(zero_fps.validate().is_err());
        let backwards = SimulationConfig {
            scroll_step: -1.0,
            ..SimulationConfig::default()
        };
        assert!(backwards.validate().is_err());
    }

    #[test]
    fn bundled_restaurant_page_parses() {
        let source = include_str!("../pages/restaurant.toml");
        let site = SiteFile::parse(source).unwrap();
        let ids: Vec<&str> = site.page.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["home", "about", "menu", "gallery", "reviews", "contact", "footer"]
        );
        assert!(navtone_monitor::Page::from_spec(&site.page).is_ok());
    }
}
