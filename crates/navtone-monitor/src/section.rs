// SPDX-License-Identifier: MIT
//
// Tracks which page section is currently under the navbar, so the active
// navigation link can be highlighted.

use tracing::debug;

use crate::scene::Scene;

/// Remembers the section the navbar last overlapped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionTracker {
    current: Option<String>,
}

impl SectionTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Id of the section under the navbar, once one has been detected.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Re-detect the current section: the first section, in document
    /// order, whose rect vertically overlaps the navbar's. When no section
    /// overlaps (or there is no navbar) the previous value is kept.
    ///
    /// Returns `true` when the current section changed.
    pub fn detect<S: Scene>(&mut self, scene: &S) -> bool {
        let Some(nav) = scene.navbar() else {
            return false;
        };
        let nav_rect = scene.bounding_rect(nav);
        let found = scene
            .sections()
            .into_iter()
            .find(|&(_, el)| scene.bounding_rect(el).overlaps_vertically(&nav_rect))
            .map(|(id, _)| id);

        match found {
            Some(id) if self.current.as_deref() != Some(id.as_str()) => {
                debug!(section = %id, "current section changed");
                self.current = Some(id);
                true
            }
            _ => false,
        }
    }
}
