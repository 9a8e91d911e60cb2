#![forbid(unsafe_code)]

//! Navigation bar configuration.
//!
//! Every option has a default, and out-of-range values are clamped by
//! [`NavConfig::sanitized`] rather than rejected: a bad setting degrades
//! the layout, it never stops it.
//!
//! | Option                  | Default | Clamp            |
//! |-------------------------|---------|------------------|
//! | `item_spacing`          | 2       | `..=64`          |
//! | `min_container_width`   | 25      | none             |
//! | `resize_debounce_delay` | 0 ms    | `..=10 s`        |
//! | `expansion_margin`      | 0       | none             |

use std::time::Duration;

/// Largest accepted debounce delay.
pub const MAX_DEBOUNCE_DELAY: Duration = Duration::from_secs(10);

/// Largest accepted padding on each side of an item, in cells.
pub const MAX_ITEM_SPACING: u16 = 64;

/// Layout and resize options for a priority navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavConfig {
    /// Padding on each side of an item, in cells. The first item gets no
    /// left padding.
    pub item_spacing: u16,

    /// Floor for the container width, in cells.
    pub min_container_width: u16,

    /// Quiet period after the last resize before the layout is recomputed.
    /// Zero means "on the next tick".
    pub resize_debounce_delay: Duration,

    /// Spare width, beyond the returning item's own width, required before
    /// an item is pulled back out of overflow.
    pub expansion_margin: u16,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            item_spacing: 2,
            min_container_width: 25,
            resize_debounce_delay: Duration::ZERO,
            expansion_margin: 0,
        }
    }
}

impl NavConfig {
    /// Set the per-side item padding.
    #[must_use]
    pub fn with_item_spacing(mut self, spacing: u16) -> Self {
        self.item_spacing = spacing;
        self
    }

    /// Set the container width floor.
    #[must_use]
    pub fn with_min_container_width(mut self, width: u16) -> Self {
        self.min_container_width = width;
        self
    }

    /// Set the resize debounce delay.
    #[must_use]
    pub fn with_resize_debounce_delay(mut self, delay: Duration) -> Self {
        self.resize_debounce_delay = delay;
        self
    }

    /// Set the debounce delay from a millisecond count of any sign.
    ///
    /// Negative and non-finite values become zero.
    #[must_use]
    pub fn with_resize_debounce_ms(mut self, ms: f64) -> Self {
        self.resize_debounce_delay = delay_from_ms(ms);
        self
    }

    /// Set the expansion margin.
    #[must_use]
    pub fn with_expansion_margin(mut self, margin: u16) -> Self {
        self.expansion_margin = margin;
        self
    }

    /// Copy with every option clamped into its accepted range.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            item_spacing: self.item_spacing.min(MAX_ITEM_SPACING),
            resize_debounce_delay: self.resize_debounce_delay.min(MAX_DEBOUNCE_DELAY),
            ..self
        }
    }

    /// Apply the container width floor to an observed width.
    #[inline]
    #[must_use]
    pub fn effective_container_width(&self, observed: u16) -> u16 {
        observed.max(self.min_container_width)
    }
}

fn delay_from_ms(ms: f64) -> Duration {
    if !ms.is_finite() || ms <= 0.0 {
        return Duration::ZERO;
    }
    let max_ms = MAX_DEBOUNCE_DELAY.as_secs_f64() * 1000.0;
    Duration::from_secs_f64(ms.min(max_ms) / 1000.0)
}

#[cfg(feature = "serde")]
mod file {
    use std::fmt;

    use serde::Deserialize;

    use super::{NavConfig, delay_from_ms};

    /// Error loading a [`NavConfig`] from JSON.
    #[derive(Debug)]
    pub enum ConfigError {
        /// The input is not valid JSON for a config object.
        Parse(serde_json::Error),
    }

    impl fmt::Display for ConfigError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ConfigError::Parse(e) => write!(f, "invalid nav config: {e}"),
            }
        }
    }

    impl std::error::Error for ConfigError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                ConfigError::Parse(e) => Some(e),
            }
        }
    }

    impl From<serde_json::Error> for ConfigError {
        fn from(e: serde_json::Error) -> Self {
            ConfigError::Parse(e)
        }
    }

    /// On-disk shape: every field optional, numbers accepted loosely so that
    /// out-of-range values can be clamped instead of failing the parse.
    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    struct NavConfigFile {
        item_spacing: Option<i64>,
        min_container_width: Option<i64>,
        resize_debounce_delay: Option<f64>,
        expansion_margin: Option<i64>,
    }

    fn clamp_u16(value: i64) -> u16 {
        u16::try_from(value.max(0)).unwrap_or(u16::MAX)
    }

    impl NavConfig {
        /// Parse a JSON object, filling gaps with defaults and clamping.
        ///
        /// Keys use the camelCase names `itemSpacing`, `minContainerWidth`,
        /// `resizeDebounceDelay` (milliseconds), and `expansionMargin`.
        pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
            let file: NavConfigFile = serde_json::from_str(json)?;
            let defaults = NavConfig::default();
            Ok(NavConfig {
                item_spacing: file.item_spacing.map_or(defaults.item_spacing, clamp_u16),
                min_container_width: file
                    .min_container_width
                    .map_or(defaults.min_container_width, clamp_u16),
                resize_debounce_delay: file
                    .resize_debounce_delay
                    .map_or(defaults.resize_debounce_delay, delay_from_ms),
                expansion_margin: file
                    .expansion_margin
                    .map_or(defaults.expansion_margin, clamp_u16),
            }
            .sanitized())
        }
    }
}

#[cfg(feature = "serde")]
pub use file::ConfigError;
