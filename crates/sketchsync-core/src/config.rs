//! Session configuration.

use crate::detect::GEOMETRY_TOLERANCE;
use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Duration;

/// Default quiescence interval before a save is dispatched.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Tunables for a whiteboard session. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Milliseconds without edits before the pending save fires.
    pub debounce_ms: u64,
    /// Geometry deltas at or below this are not a change.
    pub geometry_tolerance: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            geometry_tolerance: GEOMETRY_TOLERANCE,
        }
    }
}

impl SessionConfig {
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_geometry_tolerance(mut self, tolerance: f64) -> Self {
        self.geometry_tolerance = tolerance;
        self
    }

    /// The debounce interval as a duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
