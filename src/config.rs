//! Editor configuration, read from JSON handed over by the host.
//!
//! Every field has a default, so `{}` is a valid configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::accessor::TextStyle;
use crate::consts::{BLINK_INTERVAL_MS, CLICK_SLOP_PX, DOUBLE_CLICK_ARM_MS, TRIPLE_CLICK_WINDOW_MS};
use crate::error::ConfigError;

/// Tuning knobs for text editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Caret blink half-period in milliseconds.
    pub blink_interval_ms: f64,
    /// Delay after entering edit mode before a double-click selects a word.
    pub double_click_arm_ms: f64,
    /// Window after a word selection in which one more click selects all.
    pub triple_click_window_ms: f64,
    /// Screen-space slop within which a press and release count as a click.
    pub click_slop_px: f64,
    /// Whether the host's per-character positions are in user space. When
    /// `false` they are corrected for canvas offset and zoom.
    pub accurate_char_positions: bool,
    /// Width of the drawing content area in user units, used by that
    /// correction.
    pub content_width: f64,
    /// Create styled-box text with the text tool; primitive `<text>` when
    /// `false`.
    pub styled_text: bool,
    /// Style given to newly created text.
    pub default_style: TextStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            blink_interval_ms: BLINK_INTERVAL_MS,
            double_click_arm_ms: DOUBLE_CLICK_ARM_MS,
            triple_click_window_ms: TRIPLE_CLICK_WINDOW_MS,
            click_slop_px: CLICK_SLOP_PX,
            accurate_char_positions: true,
            content_width: 0.0,
            styled_text: true,
            default_style: TextStyle::default(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate configuration JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON and
    /// [`ConfigError::NotPositive`] when a timing, the click slop or the
    /// default font size is not positive.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every interval and size is positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPositive`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("blink_interval_ms", self.blink_interval_ms),
            ("double_click_arm_ms", self.double_click_arm_ms),
            ("triple_click_window_ms", self.triple_click_window_ms),
            ("click_slop_px", self.click_slop_px),
            ("default_style.size", self.default_style.size),
        ];
        for (field, value) in checks {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}
