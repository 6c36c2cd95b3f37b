//! Pure frame stepping.
//!
//! [`advance`] computes what a frame should display from the run state and a
//! timestamp without touching the host; [`Counter::tick`](crate::Counter::tick)
//! applies the result.

use serde::{Deserialize, Serialize};

use crate::easing::EasingFn;
use crate::interp::{interpolate, Sample};
use crate::numeric::format_fixed;
use crate::validate::ValidatedRange;

/// What the driver should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameAction {
    Reschedule,
    Stop,
}

/// Per-run state, created by `start` and dropped when the run ends.
#[derive(Debug, Clone)]
pub struct RunState {
    /// Host timestamp (ms) the run started at.
    pub started_at: f64,
    /// Easing resolved for this run; `None` means linear.
    pub easing: Option<EasingFn>,
}

/// Outcome of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStep {
    /// Displayed value, rounded to the range precision.
    pub value: f64,
    /// `value` rendered fixed-point.
    pub text: String,
    pub progress: f64,
    pub action: FrameAction,
}

/// Elapsed fraction of the duration, never negative. A non-positive or
/// non-finite duration completes immediately.
#[inline]
pub fn progress_at(started_at: f64, now: f64, duration_ms: f64) -> f64 {
    if !(duration_ms > 0.0 && duration_ms.is_finite()) {
        return 1.0;
    }
    ((now - started_at) / duration_ms).max(0.0)
}

pub fn advance(range: &ValidatedRange, run: &RunState, duration_ms: f64, now: f64) -> FrameStep {
    let progress = progress_at(run.started_at, now, duration_ms);
    if progress >= 1.0 {
        return FrameStep {
            value: range.end,
            text: format_fixed(range.end, range.precision),
            progress: 1.0,
            action: FrameAction::Stop,
        };
    }
    let raw = interpolate(
        &Sample {
            start: range.start,
            end: range.end,
            progress,
            elapsed_ms: (now - run.started_at).max(0.0),
            duration_ms,
        },
        run.easing.as_ref(),
    );
    let text = format_fixed(raw, range.precision);
    FrameStep {
        value: text.parse().unwrap_or(raw),
        text,
        progress,
        action: FrameAction::Reschedule,
    }
}
