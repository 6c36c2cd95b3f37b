//! Easing functions and the registry that resolves them by id.
//!
//! Two shapes exist and are tagged explicitly rather than told apart by arity:
//! - [`EasingFn::Progress`] maps progress in [0,1] to eased progress.
//! - [`EasingFn::RawTime`] maps (elapsed, start, delta, duration) straight to
//!   the output value.

pub mod functions;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

pub type ProgressFn = Rc<dyn Fn(f64) -> f64>;
pub type RawTimeFn = Rc<dyn Fn(f64, f64, f64, f64) -> f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingKind {
    Progress,
    RawTime,
}

/// A resolved easing function.
#[derive(Clone)]
pub enum EasingFn {
    Progress(ProgressFn),
    RawTime(RawTimeFn),
}

impl EasingFn {
    pub fn progress(f: impl Fn(f64) -> f64 + 'static) -> Self {
        Self::Progress(Rc::new(f))
    }

    pub fn raw_time(f: impl Fn(f64, f64, f64, f64) -> f64 + 'static) -> Self {
        Self::RawTime(Rc::new(f))
    }

    #[inline]
    pub fn kind(&self) -> EasingKind {
        match self {
            Self::Progress(_) => EasingKind::Progress,
            Self::RawTime(_) => EasingKind::RawTime,
        }
    }
}

impl fmt::Debug for EasingFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EasingFn").field(&self.kind()).finish()
    }
}

/// Resolves easing ids to functions. Adapters implement this to expose
/// host-side easing tables.
pub trait EasingResolver {
    fn resolve(&self, id: &str) -> Option<EasingFn>;
}

/// Named easing table preloaded with the built-in curves.
#[derive(Clone, Default)]
pub struct EasingRegistry {
    functions: HashMap<String, EasingFn>,
}

impl EasingRegistry {
    /// Registry with every built-in curve.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin_functions();
        registry
    }

    pub fn empty() -> Self {
        Self::default()
    }

    fn register_builtin_functions(&mut self) {
        for (name, f) in functions::PROGRESS {
            self.register(*name, EasingFn::progress(*f));
        }
        for (name, f) in functions::RAW_TIME {
            self.register(*name, EasingFn::raw_time(*f));
        }
    }

    /// Register or replace a function under `id`.
    pub fn register(&mut self, id: impl Into<String>, f: EasingFn) {
        self.functions.insert(id.into(), f);
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&EasingFn> {
        self.functions.get(id)
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.functions.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn list_functions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl EasingResolver for EasingRegistry {
    fn resolve(&self, id: &str) -> Option<EasingFn> {
        self.get(id).cloned()
    }
}

impl fmt::Debug for EasingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EasingRegistry")
            .field("functions", &self.list_functions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_tagged_by_shape() {
        let reg = EasingRegistry::new();
        assert_eq!(reg.resolve("swing").unwrap().kind(), EasingKind::Progress);
        assert_eq!(reg.resolve("jswing").unwrap().kind(), EasingKind::Progress);
        assert_eq!(
            reg.resolve("easeOutBounce").unwrap().kind(),
            EasingKind::RawTime
        );
        assert!(reg.resolve("bogus").is_none());
        assert_eq!(reg.list_functions().len(), 33);
    }

    #[test]
    fn custom_registration_replaces_builtin() {
        let mut reg = EasingRegistry::new();
        reg.register("swing", EasingFn::progress(|p| p * p));
        match reg.resolve("swing") {
            Some(EasingFn::Progress(f)) => assert_eq!(f(0.5), 0.25),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_registry_resolves_nothing() {
        let reg = EasingRegistry::empty();
        assert!(!reg.contains("linear"));
        assert!(reg.list_functions().is_empty());
    }
}
