use serde::{Deserialize, Serialize};

/// Lifecycle phase of a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No inputs have been read yet.
    Uninitialized,
    /// Inputs failed validation; the counter is inert until reconfigured.
    Invalid,
    Ready,
    Running,
    Finished,
}

impl Phase {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Invalid => "invalid",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Finished => "finished",
        }
    }

    /// Whether `start` may begin a run from this phase.
    #[inline]
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Ready | Self::Finished)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Read-only snapshot of a counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterState {
    pub phase: Phase,
    /// Start and end text as read from the host at the last validation.
    pub start_text: Option<String>,
    pub end_text: Option<String>,
    pub start_value: Option<f64>,
    pub end_value: Option<f64>,
    /// Last value written by a frame; `None` before the first run.
    pub current_value: Option<f64>,
    pub precision: usize,
}
