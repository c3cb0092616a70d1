// SPDX-License-Identifier: MIT
//
// Monitor configuration. Deserializes from any serde format; the binary
// reads it from the `[monitor]` table of a page file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ─── Monitor Config ──────────────────────────────────────────────────────────

/// How (and whether) the Monitor keeps the navbar style current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// When false the navbar is pinned to the fixed disabled style and
    /// nothing is scheduled.
    pub enabled: bool,

    /// Minimum time between frame-driven updates (milliseconds). Scroll
    /// and resize events are not throttled. Default: 100ms.
    pub update_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            update_interval_ms: 100,
        }
    }
}

impl MonitorConfig {
    /// The default config with adaptation switched off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub const fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }
}
