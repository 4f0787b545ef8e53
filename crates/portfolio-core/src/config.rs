#![forbid(unsafe_code)]

//! Controller configuration.
//!
//! Every field has a default matching the shipped page, so a host can pass
//! `{}` or a partial JSON object and override only what its markup differs
//! in. [`PortfolioConfig::from_json`] validates before returning.

use core::time::Duration;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Profile picture ceiling (5 MiB).
pub const PROFILE_MAX_BYTES: u64 = 5 * 1024 * 1024;
/// Company logo ceiling (2 MiB).
pub const LOGO_MAX_BYTES: u64 = 2 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub profile: ProfileBindingConfig,
    pub logos: Vec<LogoBindingConfig>,
    pub observers: ObserverConfig,
    pub timing: TimingConfig,
    pub responsive: ResponsiveConfig,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            profile: ProfileBindingConfig::default(),
            logos: (1..=3).map(LogoBindingConfig::for_slot).collect(),
            observers: ObserverConfig::default(),
            timing: TimingConfig::default(),
            responsive: ResponsiveConfig::default(),
        }
    }
}

impl PortfolioConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let mut inputs = HashSet::new();
        let ids = std::iter::once((
            self.profile.input_id.as_str(),
            self.profile.display_id.as_str(),
            None,
        ))
        .chain(self.logos.iter().map(|logo| {
            (
                logo.input_id.as_str(),
                logo.image_id.as_str(),
                Some(logo.placeholder_id.as_str()),
            )
        }));
        for (input, display, placeholder) in ids {
            if input.is_empty() || display.is_empty() || placeholder.is_some_and(str::is_empty) {
                return Err(ConfigError::invalid("binding element ids must not be empty"));
            }
            if !inputs.insert(input) {
                return Err(ConfigError::invalid(format!(
                    "upload input id {input:?} is bound more than once"
                )));
            }
        }

        if self.profile.max_bytes == 0 || self.logos.iter().any(|logo| logo.max_bytes == 0) {
            return Err(ConfigError::invalid("upload size ceilings must be non-zero"));
        }

        for (name, threshold) in [
            ("reveal_threshold", self.observers.reveal_threshold),
            ("emphasis_threshold", self.observers.emphasis_threshold),
        ] {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::invalid(format!(
                    "{name} must be within 0..=1, got {threshold}"
                )));
            }
        }

        if !self.responsive.breakpoint_px.is_finite() || self.responsive.breakpoint_px <= 0.0 {
            return Err(ConfigError::invalid("responsive breakpoint must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileBindingConfig {
    pub input_id: String,
    pub display_id: String,
    pub max_bytes: u64,
}

impl Default for ProfileBindingConfig {
    fn default() -> Self {
        Self {
            input_id: "profileUpload".to_string(),
            display_id: "profilePic".to_string(),
            max_bytes: PROFILE_MAX_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoBindingConfig {
    pub input_id: String,
    pub image_id: String,
    pub placeholder_id: String,
    pub max_bytes: u64,
}

impl Default for LogoBindingConfig {
    fn default() -> Self {
        Self::for_slot(1)
    }
}

impl LogoBindingConfig {
    /// Ids `logo{slot}Upload`, `logo{slot}Image`, `logo{slot}Placeholder`.
    #[must_use]
    pub fn for_slot(slot: u32) -> Self {
        Self {
            input_id: format!("logo{slot}Upload"),
            image_id: format!("logo{slot}Image"),
            placeholder_id: format!("logo{slot}Placeholder"),
            max_bytes: LOGO_MAX_BYTES,
        }
    }
}

/// Intersection observer options handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub emphasis_threshold: f64,
    pub emphasis_root_margin: String,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: 0.1,
            reveal_root_margin: "0px".to_string(),
            emphasis_threshold: 0.1,
            emphasis_root_margin: "0px 0px -50px 0px".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Scale-down/scale-up confirmation after uploads and contact clicks.
    pub feedback_ms: u64,
    /// Lifetime of one ripple element.
    pub ripple_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            feedback_ms: 150,
            ripple_ms: 600,
        }
    }
}

impl TimingConfig {
    #[must_use]
    pub const fn feedback(&self) -> Duration {
        Duration::from_millis(self.feedback_ms)
    }

    #[must_use]
    pub const fn ripple(&self) -> Duration {
        Duration::from_millis(self.ripple_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsiveConfig {
    /// Viewports strictly narrower than this use the compact size.
    pub breakpoint_px: f64,
    pub compact_size_px: u32,
    pub regular_size_px: u32,
}

impl Default for ResponsiveConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: 480.0,
            compact_size_px: 100,
            regular_size_px: 120,
        }
    }
}

impl ResponsiveConfig {
    #[must_use]
    pub fn profile_size_px(&self, viewport_width: f64) -> u32 {
        if viewport_width < self.breakpoint_px {
            self.compact_size_px
        } else {
            self.regular_size_px
        }
    }
}
