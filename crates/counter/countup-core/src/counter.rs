//! Counter: owns the host, the validated range and the run lifecycle.
//!
//! Methods:
//! - new / attach, reconfigure (validate), start, tick (frame step), stop, reset_display

use crate::animator::{advance, FrameAction, RunState};
use crate::config::CounterConfig;
use crate::easing::{EasingFn, EasingRegistry, EasingResolver};
use crate::error::CounterError;
use crate::host::{CounterHost, FrameHandle};
use crate::observers::Observers;
use crate::state::{CounterState, Phase};
use crate::validate::{configure, ValidatedRange};

/// A count-up animation bound to one host element.
pub struct Counter<H: CounterHost> {
    host: H,
    config: CounterConfig,
    observers: Observers,
    easings: Box<dyn EasingResolver>,

    phase: Phase,
    range: Option<ValidatedRange>,
    current: Option<f64>,
    run: Option<RunState>,
    pending_frame: Option<FrameHandle>,
}

impl<H: CounterHost> Counter<H> {
    /// Create an unconfigured counter. Nothing is read from the host until
    /// [`reconfigure`](Self::reconfigure) runs.
    pub fn new(host: H, config: CounterConfig) -> Self {
        Self {
            host,
            config,
            observers: Observers::default(),
            easings: Box::new(EasingRegistry::new()),
            phase: Phase::Uninitialized,
            range: None,
            current: None,
            run: None,
            pending_frame: None,
        }
    }

    /// Create a counter and validate the values currently on the element.
    pub fn attach(host: H, config: CounterConfig, observers: Observers) -> Self {
        let mut counter = Self::new(host, config).with_observers(observers);
        counter.reconfigure(None, None);
        counter
    }

    pub fn with_observers(mut self, observers: Observers) -> Self {
        self.observers = observers;
        self
    }

    /// Replace the easing table used to resolve `easing_function`.
    pub fn with_easings(mut self, resolver: impl EasingResolver + 'static) -> Self {
        self.easings = Box::new(resolver);
        self
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    #[inline]
    pub fn range(&self) -> Option<&ValidatedRange> {
        self.range.as_ref()
    }

    #[inline]
    pub fn precision(&self) -> usize {
        self.range.as_ref().map_or(0, |r| r.precision)
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Frame currently scheduled with the host, if any.
    #[inline]
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn state(&self) -> CounterState {
        CounterState {
            phase: self.phase,
            start_text: self.range.as_ref().map(|r| r.start_raw.clone()),
            end_text: self.range.as_ref().map(|r| r.end_raw.clone()),
            start_value: self.range.as_ref().map(|r| r.start),
            end_value: self.range.as_ref().map(|r| r.end),
            current_value: self.current,
            precision: self.precision(),
        }
    }

    fn describe(&self) -> String {
        match self.host.element_id() {
            Some(id) => format!("the counter with ID: {id}"),
            None => "the counter".to_string(),
        }
    }

    /// Overwrite the start attribute and/or the displayed end value, then
    /// re-read both from the host and validate them. Omitted values are taken
    /// from whatever the host currently holds. A running animation is
    /// cancelled first.
    pub fn reconfigure(&mut self, start: Option<&str>, end: Option<&str>) {
        self.abandon_run();
        if let Some(s) = start {
            self.host.write_start_attribute(s);
        }
        if let Some(e) = end {
            self.host.write_text(e);
        }
        let start_raw = self.host.read_start_attribute();
        let end_raw = self.host.read_text();
        self.setup(start_raw.as_deref(), Some(end_raw.as_str()));
    }

    fn setup(&mut self, start_raw: Option<&str>, end_raw: Option<&str>) {
        self.current = None;
        match configure(start_raw, end_raw) {
            Ok(range) => {
                self.host.write_text(&range.start_raw);
                if self.config.fade_in {
                    self.host.set_opacity(0.0);
                    if self.host.is_hidden() {
                        self.host.show();
                    }
                }
                self.range = Some(range);
                self.phase = Phase::Ready;
            }
            Err(err) => {
                let who = self.describe();
                dev_log!(
                    self.config,
                    error,
                    "Counter ERROR ({}): {err} for {who}.",
                    err.category()
                );
                dev_log!(
                    self.config,
                    error,
                    "Counter FATAL ERROR: {who} is disabled until it is reconfigured with valid values."
                );
                self.range = None;
                self.phase = Phase::Invalid;
            }
        }
    }

    fn resolve_easing(&self) -> Option<EasingFn> {
        if !self.config.easing_enabled {
            return None;
        }
        let found = self.easings.resolve(&self.config.easing_function);
        if found.is_none() {
            let err = CounterError::UnresolvedEasing {
                name: self.config.easing_function.clone(),
            };
            dev_log!(self.config, info, "Counter Notice: {err}.");
        }
        found
    }

    /// Begin counting. Only valid from `Ready` or `Finished`.
    pub fn start(&mut self) {
        if !self.phase.can_start() {
            if self.phase.is_running() {
                dev_log!(self.config, debug, "start ignored: already running");
            } else {
                let who = self.describe();
                dev_log!(
                    self.config,
                    warn,
                    "Counter Notice: {who} has no valid values ({}); start ignored.",
                    self.phase.name()
                );
            }
            return;
        }
        let Some(range) = self.range.as_ref() else {
            return;
        };

        if range.is_degenerate() {
            dev_log!(
                self.config,
                info,
                "Counter Notice: The starting and ending values are the same, no animation will occur."
            );
            self.current = Some(range.end);
            self.phase = Phase::Finished;
            self.observers.emit_start();
            if self.config.fade_in {
                let on_end = self.observers.on_end.clone();
                self.host.animate_opacity(
                    1.0,
                    self.config.fade_in_duration_ms,
                    Some(Box::new(move || {
                        if let Some(f) = on_end {
                            f();
                        }
                    })),
                );
            } else {
                self.observers.emit_end();
            }
            return;
        }

        let easing = self.resolve_easing();
        let now = self.host.now();
        self.run = Some(RunState {
            started_at: now,
            easing,
        });
        self.phase = Phase::Running;
        self.observers.emit_start();
        if self.config.fade_in {
            self.host.animate_opacity(1.0, self.config.fade_in_duration_ms, None);
        }
        self.tick(now);
    }

    /// Advance the running animation to `now` (host milliseconds).
    ///
    /// Outside `Running` this does nothing and returns [`FrameAction::Stop`].
    pub fn tick(&mut self, now: f64) -> FrameAction {
        if !self.phase.is_running() {
            return FrameAction::Stop;
        }
        // A tick supersedes whatever frame is queued; cancelling one that
        // already fired is a no-op for the host.
        if let Some(handle) = self.pending_frame.take() {
            self.host.cancel_frame(handle);
        }
        let (Some(range), Some(run)) = (self.range.as_ref(), self.run.as_ref()) else {
            return FrameAction::Stop;
        };
        let step = advance(range, run, self.config.duration_ms, now);

        self.host.write_text(&step.text);
        self.current = Some(step.value);
        self.observers.emit_update(step.value, step.progress);

        match step.action {
            FrameAction::Reschedule => {
                let handle = self.host.schedule_frame();
                dev_log!(
                    self.config,
                    trace,
                    "scheduled frame {handle:?} at progress {}",
                    step.progress
                );
                self.pending_frame = Some(handle);
            }
            FrameAction::Stop => {
                self.abandon_run();
                self.phase = Phase::Finished;
                self.observers.emit_end();
            }
        }
        step.action
    }

    /// Halt a running animation where it is. The display keeps the last value
    /// and the counter returns to `Ready`.
    pub fn stop(&mut self) {
        if !self.phase.is_running() {
            return;
        }
        self.abandon_run();
        self.phase = Phase::Ready;
        dev_log!(self.config, info, "Counter Notice: stopped {}.", self.describe());
    }

    /// Write the original start text back to the display. Phase and
    /// configuration are left alone, so a later `start` replays the run.
    pub fn reset_display(&mut self) {
        if let Some(range) = self.range.as_ref() {
            self.host.write_text(&range.start_raw);
            self.current = Some(range.start);
        }
    }

    /// Cancel the pending frame, if any, and drop the run.
    fn abandon_run(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.host.cancel_frame(handle);
        }
        self.run = None;
    }
}

impl<H: CounterHost + std::fmt::Debug> std::fmt::Debug for Counter<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Counter")
            .field("host", &self.host)
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("range", &self.range)
            .field("current", &self.current)
            .field("pending_frame", &self.pending_frame)
            .finish()
    }
}
