//! Count-up core (host-agnostic)
//!
//! Animates a numeric display from a start value to an end value over a fixed
//! duration. The crate owns validation, precision inference, interpolation and
//! the start/run/finish lifecycle; everything that touches a document is behind
//! the ports in [`host`].

/// `log` target for every message the engine emits.
pub const LOG_TARGET: &str = "countup";

// Diagnostics are only emitted in dev mode.
macro_rules! dev_log {
    ($cfg:expr, $level:ident, $($arg:tt)+) => {
        if $cfg.dev_mode {
            log::$level!(target: $crate::LOG_TARGET, $($arg)+);
        }
    };
}

pub mod animator;
pub mod config;
pub mod counter;
pub mod easing;
pub mod error;
pub mod host;
pub mod interp;
pub mod numeric;
pub mod observers;
pub mod state;
pub mod validate;

// Re-exports for consumers (adapters)
pub use animator::{advance, FrameAction, FrameStep, RunState};
pub use config::CounterConfig;
pub use counter::Counter;
pub use easing::{EasingFn, EasingKind, EasingRegistry, EasingResolver};
pub use error::{CounterError, Endpoint};
pub use host::{CounterHost, DisplayPort, FadeComplete, FrameHandle, FrameScheduler, OpacityPort};
pub use observers::Observers;
pub use state::{CounterState, Phase};
pub use validate::{configure, ValidatedRange};

/// Attribute holding the start value on the bound element.
pub const START_ATTRIBUTE: &str = "data-numbercounter-start";
