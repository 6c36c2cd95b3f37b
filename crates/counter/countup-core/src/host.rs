//! Host ports.
//!
//! The counter never touches a document directly. Adapters (wasm/DOM, the
//! test fixtures) implement these traits and hand the implementation to
//! [`Counter`](crate::Counter).

use serde::{Deserialize, Serialize};

/// Opaque id of a scheduled frame callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameHandle(pub i32);

/// Called once an opacity transition has finished.
pub type FadeComplete = Box<dyn FnOnce()>;

/// Text and attribute access on the bound element.
pub trait DisplayPort {
    fn read_text(&self) -> String;
    fn write_text(&mut self, text: &str);
    /// Start value attribute, `None` when absent.
    fn read_start_attribute(&self) -> Option<String>;
    fn write_start_attribute(&mut self, value: &str);
    /// Identifier used in log messages.
    fn element_id(&self) -> Option<String> {
        None
    }
}

/// Visibility control used by the fade-in.
pub trait OpacityPort {
    fn set_opacity(&mut self, value: f64);
    /// Transition opacity to `target` over `duration_ms`, then run `on_complete`.
    fn animate_opacity(
        &mut self,
        target: f64,
        duration_ms: f64,
        on_complete: Option<FadeComplete>,
    );
    fn is_hidden(&self) -> bool;
    fn show(&mut self);
}

/// Per-frame scheduling. The host calls [`Counter::tick`](crate::Counter::tick)
/// with its own timestamp when a scheduled frame fires.
pub trait FrameScheduler {
    /// Current time in milliseconds on the same clock frames are stamped with.
    fn now(&self) -> f64;
    fn schedule_frame(&mut self) -> FrameHandle;
    /// Cancelling a handle that already fired must be a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Everything a counter needs from its host.
pub trait CounterHost: DisplayPort + OpacityPort + FrameScheduler {}

impl<T: DisplayPort + OpacityPort + FrameScheduler> CounterHost for T {}
