use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::core::{DurationBounds, Viewport};
use crate::error::{TimelineError, TimelineResult};

pub const DEFAULT_MIN_DURATION_PER_PX_MS: u64 = 250;
pub const DEFAULT_INITIAL_DURATION_PER_PX_MS: u64 = 60_000;
pub const DEFAULT_MAX_DURATION_PER_PX_MS: u64 = 3 * 24 * 60 * 60 * 1_000;
pub const DEFAULT_MIN_TICK_SPACING_PX: f64 = 70.0;
pub const DEFAULT_MAX_TICK_SPACING_PX: f64 = 415.0;
pub const DEFAULT_ZOOM_SENSITIVITY: f64 = 1.0015;
pub const DEFAULT_FADE_OUT_FACTOR: f64 = 1.4;
pub const DEFAULT_DISABLED_OPACITY_THRESHOLD: f64 = 0.2;
pub const DEFAULT_JUMP_VIEWPORT_FRACTION: f64 = 0.25;
pub const DEFAULT_NOW_REFRESH_INTERVAL_MS: u64 = 1_000;

/// Public engine bootstrap configuration.
///
/// Serializable so hosts can keep timeline tuning next to the rest of their
/// settings. Missing fields fall back to the defaults above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineEngineConfig {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default = "default_initial_duration_per_px_ms")]
    pub initial_duration_per_px_ms: u64,
    #[serde(default = "default_min_duration_per_px_ms")]
    pub min_duration_per_px_ms: u64,
    #[serde(default = "default_max_duration_per_px_ms")]
    pub max_duration_per_px_ms: u64,
    #[serde(default = "default_min_tick_spacing_px")]
    pub min_tick_spacing_px: f64,
    #[serde(default = "default_max_tick_spacing_px")]
    pub max_tick_spacing_px: f64,
    #[serde(default = "default_zoom_sensitivity")]
    pub zoom_sensitivity: f64,
    #[serde(default = "default_fade_out_factor")]
    pub fade_out_factor: f64,
    /// Row opacity below which ticks stop reacting to clicks.
    #[serde(default = "default_disabled_opacity_threshold")]
    pub disabled_opacity_threshold: f64,
    /// Share of the viewport width covered by one forward/backward jump.
    #[serde(default = "default_jump_viewport_fraction")]
    pub jump_viewport_fraction: f64,
    #[serde(default = "default_now_refresh_interval_ms")]
    pub now_refresh_interval_ms: u64,
}

impl Default for TimelineEngineConfig {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl TimelineEngineConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            initial_duration_per_px_ms: DEFAULT_INITIAL_DURATION_PER_PX_MS,
            min_duration_per_px_ms: DEFAULT_MIN_DURATION_PER_PX_MS,
            max_duration_per_px_ms: DEFAULT_MAX_DURATION_PER_PX_MS,
            min_tick_spacing_px: DEFAULT_MIN_TICK_SPACING_PX,
            max_tick_spacing_px: DEFAULT_MAX_TICK_SPACING_PX,
            zoom_sensitivity: DEFAULT_ZOOM_SENSITIVITY,
            fade_out_factor: DEFAULT_FADE_OUT_FACTOR,
            disabled_opacity_threshold: DEFAULT_DISABLED_OPACITY_THRESHOLD,
            jump_viewport_fraction: DEFAULT_JUMP_VIEWPORT_FRACTION,
            now_refresh_interval_ms: DEFAULT_NOW_REFRESH_INTERVAL_MS,
        }
    }

    /// Sets the zoom level used when the engine is created.
    #[must_use]
    pub fn with_initial_duration_per_px_ms(mut self, millis: u64) -> Self {
        self.initial_duration_per_px_ms = millis;
        self
    }

    #[must_use]
    pub fn with_duration_per_px_bounds_ms(mut self, min_millis: u64, max_millis: u64) -> Self {
        self.min_duration_per_px_ms = min_millis;
        self.max_duration_per_px_ms = max_millis;
        self
    }

    #[must_use]
    pub fn with_tick_spacing_px(mut self, min_px: f64, max_px: f64) -> Self {
        self.min_tick_spacing_px = min_px;
        self.max_tick_spacing_px = max_px;
        self
    }

    #[must_use]
    pub fn with_zoom_sensitivity(mut self, sensitivity: f64) -> Self {
        self.zoom_sensitivity = sensitivity;
        self
    }

    #[must_use]
    pub fn with_fade_out_factor(mut self, factor: f64) -> Self {
        self.fade_out_factor = factor;
        self
    }

    #[must_use]
    pub fn with_disabled_opacity_threshold(mut self, threshold: f64) -> Self {
        self.disabled_opacity_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_jump_viewport_fraction(mut self, fraction: f64) -> Self {
        self.jump_viewport_fraction = fraction;
        self
    }

    #[must_use]
    pub fn with_now_refresh_interval_ms(mut self, millis: u64) -> Self {
        self.now_refresh_interval_ms = millis;
        self
    }

    pub fn validate(self) -> TimelineResult<Self> {
        self.duration_bounds()?;
        if self.initial_duration_per_px_ms == 0 {
            return Err(TimelineError::InvalidConfig(
                "initial duration per pixel must be > 0".to_owned(),
            ));
        }
        if !self.min_tick_spacing_px.is_finite()
            || !self.max_tick_spacing_px.is_finite()
            || self.min_tick_spacing_px <= 0.0
            || self.max_tick_spacing_px < self.min_tick_spacing_px
        {
            return Err(TimelineError::InvalidConfig(
                "tick spacing must satisfy 0 < min <= max and be finite".to_owned(),
            ));
        }
        if !self.zoom_sensitivity.is_finite() || self.zoom_sensitivity <= 0.0 {
            return Err(TimelineError::InvalidConfig(
                "zoom sensitivity must be finite and > 0".to_owned(),
            ));
        }
        if !self.fade_out_factor.is_finite() || self.fade_out_factor <= 1.0 {
            return Err(TimelineError::InvalidConfig(
                "fade-out factor must be finite and > 1".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&self.disabled_opacity_threshold) {
            return Err(TimelineError::InvalidConfig(
                "disabled opacity threshold must be in [0, 1]".to_owned(),
            ));
        }
        if !self.jump_viewport_fraction.is_finite() || self.jump_viewport_fraction <= 0.0 {
            return Err(TimelineError::InvalidConfig(
                "jump viewport fraction must be finite and > 0".to_owned(),
            ));
        }
        if self.now_refresh_interval_ms == 0 {
            return Err(TimelineError::InvalidConfig(
                "now refresh interval must be > 0".to_owned(),
            ));
        }
        Ok(self)
    }

    pub fn duration_bounds(self) -> TimelineResult<DurationBounds> {
        DurationBounds::new(
            millis_to_delta(self.min_duration_per_px_ms)?,
            millis_to_delta(self.max_duration_per_px_ms)?,
        )
    }

    pub fn initial_duration_per_px(self) -> TimelineResult<TimeDelta> {
        millis_to_delta(self.initial_duration_per_px_ms)
    }

    #[must_use]
    pub fn now_refresh_interval(self) -> std::time::Duration {
        std::time::Duration::from_millis(self.now_refresh_interval_ms)
    }

    pub fn to_json_pretty(self) -> TimelineResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|err| TimelineError::InvalidConfig(format!("serialize config: {err}")))
    }

    /// Parses and validates a JSON config.
    pub fn from_json_str(input: &str) -> TimelineResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|err| TimelineError::InvalidConfig(format!("parse config: {err}")))?;
        config.validate()
    }
}

fn millis_to_delta(millis: u64) -> TimelineResult<TimeDelta> {
    i64::try_from(millis)
        .ok()
        .and_then(TimeDelta::try_milliseconds)
        .ok_or_else(|| {
            TimelineError::InvalidConfig(format!("duration of {millis} ms is out of range"))
        })
}

fn default_initial_duration_per_px_ms() -> u64 {
    DEFAULT_INITIAL_DURATION_PER_PX_MS
}

fn default_min_duration_per_px_ms() -> u64 {
    DEFAULT_MIN_DURATION_PER_PX_MS
}

fn default_max_duration_per_px_ms() -> u64 {
    DEFAULT_MAX_DURATION_PER_PX_MS
}

fn default_min_tick_spacing_px() -> f64 {
    DEFAULT_MIN_TICK_SPACING_PX
}

fn default_max_tick_spacing_px() -> f64 {
    DEFAULT_MAX_TICK_SPACING_PX
}

fn default_zoom_sensitivity() -> f64 {
    DEFAULT_ZOOM_SENSITIVITY
}

fn default_fade_out_factor() -> f64 {
    DEFAULT_FADE_OUT_FACTOR
}

fn default_disabled_opacity_threshold() -> f64 {
    DEFAULT_DISABLED_OPACITY_THRESHOLD
}

fn default_jump_viewport_fraction() -> f64 {
    DEFAULT_JUMP_VIEWPORT_FRACTION
}

fn default_now_refresh_interval_ms() -> u64 {
    DEFAULT_NOW_REFRESH_INTERVAL_MS
}

#[cfg(test)]
mod tests {
    use super::TimelineEngineConfig;
    use crate::core::Viewport;

    #[test]
    fn defaults_validate() {
        let config = TimelineEngineConfig::new(Viewport::new(800, 60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_fade_out_factor_at_or_below_one() {
        let config = TimelineEngineConfig::default().with_fade_out_factor(1.0);
        let err = config.validate().expect_err("factor 1 must fail");
        assert!(format!("{err}").contains("fade-out factor"));
    }

    #[test]
    fn missing_json_fields_use_defaults() {
        let config = TimelineEngineConfig::from_json_str(r#"{ "min_tick_spacing_px": 80.0 }"#)
            .expect("parse");

        assert_eq!(config.min_tick_spacing_px, 80.0);
        assert_eq!(config, TimelineEngineConfig::default().with_tick_spacing_px(80.0, 415.0));
    }
}
