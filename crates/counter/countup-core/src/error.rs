//! Error types for the count-up engine.
//!
//! None of these are returned from the runtime operations on
//! [`Counter`](crate::Counter); they are logged and reflected in the phase. The
//! validator and config parser return them directly.

use serde::{Deserialize, Serialize};

/// Which side of the range an input belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "starting",
            Self::End => "ending",
        }
    }
}

fn invalid_detail(raw: &Option<String>) -> String {
    match raw {
        Some(text) => format!("{text:?} is invalid"),
        None => "is missing".to_string(),
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CounterError {
    /// Start or end value missing, empty or not numeric.
    #[error("The {} value {}", .endpoint.name(), invalid_detail(.raw))]
    InvalidInput {
        endpoint: Endpoint,
        raw: Option<String>,
    },

    /// Named easing function could not be resolved.
    #[error("The easing function {name:?} does not exist, defaulting to no easing")]
    UnresolvedEasing { name: String },

    /// Configuration could not be parsed.
    #[error("Invalid counter configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl CounterError {
    /// Recoverable errors leave the counter usable with degraded behaviour.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnresolvedEasing { .. })
    }

    /// Error category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "validation",
            Self::UnresolvedEasing { .. } => "easing",
            Self::InvalidConfig { .. } => "config",
        }
    }
}

impl From<serde_json::Error> for CounterError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverability() {
        let easing = CounterError::UnresolvedEasing {
            name: "nope".to_string(),
        };
        assert!(easing.is_recoverable());

        let input = CounterError::InvalidInput {
            endpoint: Endpoint::Start,
            raw: Some(String::new()),
        };
        assert!(!input.is_recoverable());
        assert_eq!(input.category(), "validation");
    }

    #[test]
    fn message_names_the_endpoint() {
        let err = CounterError::InvalidInput {
            endpoint: Endpoint::End,
            raw: Some("abc".to_string()),
        };
        assert_eq!(err.to_string(), "The ending value \"abc\" is invalid");

        let err = CounterError::InvalidInput {
            endpoint: Endpoint::Start,
            raw: None,
        };
        assert_eq!(err.to_string(), "The starting value is missing");
    }

    #[test]
    fn serde_roundtrip() {
        let err = CounterError::InvalidConfig {
            reason: "bad".to_string(),
        };
        let s = serde_json::to_string(&err).unwrap();
        let back: CounterError = serde_json::from_str(&s).unwrap();
        assert_eq!(err, back);
    }
}
