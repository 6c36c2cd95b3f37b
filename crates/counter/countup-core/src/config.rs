//! Counter configuration.
//!
//! Field names on the wire follow the option names a page passes to the
//! counter (`duration`, `fadeIn`, `fadeInTime`, `easing`, `easingFunction`,
//! `devMode`). Every field is optional and falls back to [`CounterConfig::default`].

use serde::{Deserialize, Serialize};

use crate::error::CounterError;

pub const DEFAULT_DURATION_MS: f64 = 2000.0;
pub const DEFAULT_FADE_IN_MS: f64 = 300.0;
pub const DEFAULT_EASING: &str = "linear";

/// Timing, fade and easing settings for one counter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CounterConfig {
    /// Total animation time in milliseconds.
    #[serde(rename = "duration")]
    pub duration_ms: f64,
    /// Fade the element in from opacity 0 when counting starts.
    pub fade_in: bool,
    #[serde(rename = "fadeInTime", alias = "fadeInDuration")]
    pub fade_in_duration_ms: f64,
    /// Use `easing_function` instead of linear interpolation.
    #[serde(rename = "easing", alias = "easingEnabled")]
    pub easing_enabled: bool,
    #[serde(rename = "easingFunction", alias = "easingFunctionId")]
    pub easing_function: String,
    /// Emit diagnostics through the `log` facade.
    pub dev_mode: bool,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            fade_in: false,
            fade_in_duration_ms: DEFAULT_FADE_IN_MS,
            easing_enabled: false,
            easing_function: DEFAULT_EASING.to_string(),
            dev_mode: false,
        }
    }
}

impl CounterConfig {
    /// Parse a JSON options object. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CounterError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_fade_in(mut self, duration_ms: f64) -> Self {
        self.fade_in = true;
        self.fade_in_duration_ms = duration_ms;
        self
    }

    /// Enable easing with the given function id.
    pub fn with_easing(mut self, id: impl Into<String>) -> Self {
        self.easing_enabled = true;
        self.easing_function = id.into();
        self
    }

    pub fn with_dev_mode(mut self, enabled: bool) -> Self {
        self.dev_mode = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = CounterConfig::default();
        assert_eq!(cfg.duration_ms, 2000.0);
        assert!(!cfg.fade_in);
        assert_eq!(cfg.fade_in_duration_ms, 300.0);
        assert!(!cfg.easing_enabled);
        assert_eq!(cfg.easing_function, "linear");
        assert!(!cfg.dev_mode);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = CounterConfig::from_json(r#"{ "duration": 500, "fadeIn": true }"#).unwrap();
        assert_eq!(cfg.duration_ms, 500.0);
        assert!(cfg.fade_in);
        assert_eq!(cfg.fade_in_duration_ms, 300.0);
        assert_eq!(cfg.easing_function, "linear");
    }

    #[test]
    fn accepts_long_option_aliases() {
        let cfg = CounterConfig::from_json(
            r#"{ "fadeInDuration": 120, "easingEnabled": true, "easingFunctionId": "swing" }"#,
        )
        .unwrap();
        assert_eq!(cfg.fade_in_duration_ms, 120.0);
        assert!(cfg.easing_enabled);
        assert_eq!(cfg.easing_function, "swing");
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = CounterConfig::from_json("{ duration: }").unwrap_err();
        assert_eq!(err.category(), "config");
    }
}
