//! Input validation: turns the raw start/end text into a numeric range.

use serde::{Deserialize, Serialize};

use crate::error::{CounterError, Endpoint};
use crate::numeric::{parse_numeric, precision_for};

/// Start/end pair that passed validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidatedRange {
    /// Start text exactly as read from the host.
    pub start_raw: String,
    pub end_raw: String,
    pub start: f64,
    pub end: f64,
    /// Decimal places used for every value written during a run.
    pub precision: usize,
}

impl ValidatedRange {
    /// True when no animation is needed.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

fn check(endpoint: Endpoint, raw: Option<&str>) -> Result<f64, CounterError> {
    raw.and_then(parse_numeric).ok_or_else(|| CounterError::InvalidInput {
        endpoint,
        raw: raw.map(str::to_string),
    })
}

/// Validate both endpoints (start first) and infer the display precision.
pub fn configure(
    start_raw: Option<&str>,
    end_raw: Option<&str>,
) -> Result<ValidatedRange, CounterError> {
    let start = check(Endpoint::Start, start_raw)?;
    let end = check(Endpoint::End, end_raw)?;
    // Both are Some once parsing succeeded.
    let start_raw = start_raw.unwrap_or_default();
    let end_raw = end_raw.unwrap_or_default();
    Ok(ValidatedRange {
        precision: precision_for(start_raw, end_raw),
        start_raw: start_raw.to_string(),
        end_raw: end_raw.to_string(),
        start,
        end,
    })
}
