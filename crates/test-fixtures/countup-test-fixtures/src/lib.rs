use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

use countup_core::{
    Counter, CounterConfig, DisplayPort, FadeComplete, FrameHandle, FrameScheduler, Observers,
    OpacityPort,
};

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    configs: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = fixtures_root().join(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

pub mod configs {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.configs.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = MANIFEST
            .configs
            .get(name)
            .ok_or_else(|| anyhow!("unknown config fixture '{name}'"))?;
        read_to_string(rel)
    }

    pub fn load(name: &str) -> Result<CounterConfig> {
        let text = json(name)?;
        CounterConfig::from_json(&text)
            .with_context(|| format!("failed to parse config fixture {name}"))
    }
}

/// One opacity request seen by [`RecordingHost`].
#[derive(Clone, Debug, PartialEq)]
pub enum OpacityCall {
    Set(f64),
    Animate { target: f64, duration_ms: f64 },
}

/// In-memory host with a manual clock and frame queue. Every write is recorded.
pub struct RecordingHost {
    pub text: String,
    pub start_attribute: Option<String>,
    pub id: Option<String>,
    pub opacity: f64,
    pub hidden: bool,
    pub clock: f64,

    pub text_writes: Vec<String>,
    pub opacity_calls: Vec<OpacityCall>,
    pub scheduled: Vec<FrameHandle>,
    /// Queued frames withdrawn through `cancel_frame`.
    pub cancelled: Vec<FrameHandle>,
    pub show_calls: usize,

    queued: Vec<FrameHandle>,
    next_handle: i32,
    fades: Vec<FadeComplete>,
}

impl RecordingHost {
    /// Element whose start attribute is `start` and whose text is `text`.
    pub fn new(start: Option<&str>, text: &str) -> Self {
        Self {
            text: text.to_string(),
            start_attribute: start.map(str::to_string),
            id: None,
            opacity: 1.0,
            hidden: false,
            clock: 0.0,
            text_writes: Vec::new(),
            opacity_calls: Vec::new(),
            scheduled: Vec::new(),
            cancelled: Vec::new(),
            show_calls: 0,
            queued: Vec::new(),
            next_handle: 1,
            fades: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_clock(mut self, now: f64) -> Self {
        self.clock = now;
        self
    }

    /// Frames scheduled and not yet fired or cancelled.
    pub fn queued_frames(&self) -> &[FrameHandle] {
        &self.queued
    }

    /// Pop the oldest queued frame and move the clock forward by `frame_ms`.
    /// Returns the timestamp to pass to `tick`.
    pub fn fire_next_frame(&mut self, frame_ms: f64) -> Option<f64> {
        if self.queued.is_empty() {
            return None;
        }
        self.queued.remove(0);
        self.clock += frame_ms;
        Some(self.clock)
    }

    /// Run every pending fade completion. Returns how many ran.
    pub fn complete_fades(&mut self) -> usize {
        let fades = std::mem::take(&mut self.fades);
        let n = fades.len();
        for done in fades {
            done();
        }
        n
    }

    pub fn pending_fades(&self) -> usize {
        self.fades.len()
    }
}

impl fmt::Debug for RecordingHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingHost")
            .field("text", &self.text)
            .field("start_attribute", &self.start_attribute)
            .field("opacity", &self.opacity)
            .field("clock", &self.clock)
            .field("queued", &self.queued)
            .field("pending_fades", &self.fades.len())
            .finish()
    }
}

impl DisplayPort for RecordingHost {
    fn read_text(&self) -> String {
        self.text.clone()
    }

    fn write_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.text_writes.push(self.text.clone());
    }

    fn read_start_attribute(&self) -> Option<String> {
        self.start_attribute.clone()
    }

    fn write_start_attribute(&mut self, value: &str) {
        self.start_attribute = Some(value.to_string());
    }

    fn element_id(&self) -> Option<String> {
        self.id.clone()
    }
}

impl OpacityPort for RecordingHost {
    fn set_opacity(&mut self, value: f64) {
        self.opacity = value;
        self.opacity_calls.push(OpacityCall::Set(value));
    }

    fn animate_opacity(
        &mut self,
        target: f64,
        duration_ms: f64,
        on_complete: Option<FadeComplete>,
    ) {
        // Lands on the target immediately; completion waits for complete_fades().
        self.opacity = target;
        self.opacity_calls.push(OpacityCall::Animate {
            target,
            duration_ms,
        });
        if let Some(done) = on_complete {
            self.fades.push(done);
        }
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn show(&mut self) {
        self.hidden = false;
        self.show_calls += 1;
    }
}

impl FrameScheduler for RecordingHost {
    fn now(&self) -> f64 {
        self.clock
    }

    fn schedule_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.queued.push(handle);
        self.scheduled.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        // Only frames still queued count as cancelled; fired ones are a no-op.
        let before = self.queued.len();
        self.queued.retain(|h| *h != handle);
        if self.queued.len() != before {
            self.cancelled.push(handle);
        }
    }
}

/// Deliver queued frames `frame_ms` apart until the counter stops asking for
/// more (or `max_frames` is hit). Returns the number of frames delivered.
pub fn drive(counter: &mut Counter<RecordingHost>, frame_ms: f64, max_frames: usize) -> usize {
    let mut delivered = 0;
    while delivered < max_frames {
        let Some(now) = counter.host_mut().fire_next_frame(frame_ms) else {
            break;
        };
        counter.tick(now);
        delivered += 1;
    }
    delivered
}

/// Callback invocation seen by an [`ObserverLog`].
#[derive(Clone, Debug, PartialEq)]
pub enum Observed {
    Start,
    Update { value: f64, progress: f64 },
    End,
}

/// Shared log of observer callbacks.
#[derive(Clone, Debug, Default)]
pub struct ObserverLog {
    events: Rc<RefCell<Vec<Observed>>>,
}

impl ObserverLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observers that append to this log.
    pub fn observers(&self) -> Observers {
        let start = self.events.clone();
        let update = self.events.clone();
        let end = self.events.clone();
        Observers::new()
            .on_start(move || start.borrow_mut().push(Observed::Start))
            .on_update(move |value, progress| {
                update
                    .borrow_mut()
                    .push(Observed::Update { value, progress })
            })
            .on_end(move || end.borrow_mut().push(Observed::End))
    }

    pub fn events(&self) -> Vec<Observed> {
        self.events.borrow().clone()
    }

    pub fn count(&self, wanted: &Observed) -> usize {
        self.events.borrow().iter().filter(|e| *e == wanted).count()
    }

    /// Values passed to `on_update`, in order.
    pub fn updates(&self) -> Vec<f64> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Observed::Update { value, .. } => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
