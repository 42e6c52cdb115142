//! Viewport configuration
//!
//! Tunables for the controllers, loadable from TOML. Every field defaults,
//! so a host can override just what it needs:
//!
//! ```toml
//! threshold_px = 420.0
//!
//! [odometer]
//! duration_ms = 800
//! ```
//!
//! Parse failures are non-fatal: [`ViewportConfig::from_toml_or_default`]
//! logs a warning and returns defaults, per the workspace error policy.

use crate::derive::{
    DEFAULT_ANCHOR_INSET_PX, DEFAULT_THRESHOLD_PX, ODOMETER_STAGGER_SECS, ODOMETER_VISIBILITY,
};
use serde::Deserialize;
use sightline_core::{Error, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Scroll distance past which floating controls appear
    pub threshold_px: f32,
    /// Inset of the floating-control anchor from the bottom-right corner
    pub anchor_inset_px: f32,
    /// Hub throttle in milliseconds; 0 disables (the default)
    pub throttle_ms: u64,
    pub odometer: OdometerConfig,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            threshold_px: DEFAULT_THRESHOLD_PX,
            anchor_inset_px: DEFAULT_ANCHOR_INSET_PX,
            throttle_ms: 0,
            odometer: OdometerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OdometerConfig {
    /// Height of one digit cell in pixels
    pub digit_height_px: f32,
    /// Per-digit roll duration (after its stagger delay)
    pub duration_ms: u32,
    /// Stagger between consecutive digits, in seconds
    pub stagger_secs: f32,
    /// Visible fraction at which the counter arms and plays
    pub visibility: f32,
}

impl Default for OdometerConfig {
    fn default() -> Self {
        Self {
            digit_height_px: 48.0,
            duration_ms: 600,
            stagger_secs: ODOMETER_STAGGER_SECS,
            visibility: ODOMETER_VISIBILITY,
        }
    }
}

impl ViewportConfig {
    /// Parse from TOML
    pub fn from_toml(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| Error::Config {
            reason: e.to_string(),
        })
    }

    /// Parse from TOML, falling back to defaults on failure
    pub fn from_toml_or_default(input: &str) -> Self {
        match Self::from_toml(input) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "viewport config invalid, using defaults");
                Self::default()
            }
        }
    }

    /// The hub throttle as a duration, `None` when disabled
    pub fn throttle(&self) -> Option<std::time::Duration> {
        (self.throttle_ms > 0).then(|| std::time::Duration::from_millis(self.throttle_ms))
    }
}
