//! Optional lifecycle callbacks.

use std::fmt;
use std::rc::Rc;

pub type StartFn = Rc<dyn Fn()>;
/// Receives (displayed value, progress).
pub type UpdateFn = Rc<dyn Fn(f64, f64)>;
pub type EndFn = Rc<dyn Fn()>;

/// Callbacks fired at start, on every written frame and at the end of a run.
/// Any of them may be absent.
#[derive(Clone, Default)]
pub struct Observers {
    pub on_start: Option<StartFn>,
    pub on_update: Option<UpdateFn>,
    pub on_end: Option<EndFn>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start(mut self, f: impl Fn() + 'static) -> Self {
        self.on_start = Some(Rc::new(f));
        self
    }

    pub fn on_update(mut self, f: impl Fn(f64, f64) + 'static) -> Self {
        self.on_update = Some(Rc::new(f));
        self
    }

    pub fn on_end(mut self, f: impl Fn() + 'static) -> Self {
        self.on_end = Some(Rc::new(f));
        self
    }

    #[inline]
    pub(crate) fn emit_start(&self) {
        if let Some(f) = &self.on_start {
            f();
        }
    }

    #[inline]
    pub(crate) fn emit_update(&self, value: f64, progress: f64) {
        if let Some(f) = &self.on_update {
            f(value, progress);
        }
    }

    #[inline]
    pub(crate) fn emit_end(&self) {
        if let Some(f) = &self.on_end {
            f();
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("on_start", &self.on_start.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}
