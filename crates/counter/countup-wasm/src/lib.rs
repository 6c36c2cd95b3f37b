use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Reflect, JSON};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Window};

use countup_core::{
    Counter, CounterConfig, DisplayPort, EasingFn, EasingRegistry, EasingResolver, FadeComplete,
    FrameHandle, FrameScheduler, Observers, OpacityPort, LOG_TARGET, START_ATTRIBUTE,
};

/// Timer interval used when the window has no `requestAnimationFrame`.
const FALLBACK_FRAME_MS: i32 = 16;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn parse_config(options: &JsValue) -> Result<CounterConfig, JsError> {
    if jsvalue_is_undefined_or_null(options) {
        return Ok(CounterConfig::default());
    }
    // Functions (the callbacks) are dropped by stringify.
    let text = JSON::stringify(options)
        .map_err(|e| JsError::new(&format!("options stringify error: {:?}", e)))?
        .as_string()
        .ok_or_else(|| JsError::new("options: stringify produced non-string"))?;
    CounterConfig::from_json(&text).map_err(|e| JsError::new(&format!("config error: {e}")))
}

fn callback(options: &JsValue, key: &str) -> Option<Function> {
    if jsvalue_is_undefined_or_null(options) {
        return None;
    }
    Reflect::get(options, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.dyn_into::<Function>().ok())
}

enum Event {
    Start,
    Update { value: f64, progress: f64 },
    End,
}

/// Queues observer events while the counter is borrowed and replays them to
/// the JS callbacks once it is released, so a callback may call back into the
/// counter.
struct Bridge {
    queue: RefCell<Vec<Event>>,
    on_start: Option<Function>,
    on_update: Option<Function>,
    on_end: Option<Function>,
}

impl Bridge {
    fn from_options(options: &JsValue) -> Self {
        Self {
            queue: RefCell::new(Vec::new()),
            on_start: callback(options, "onStart"),
            on_update: callback(options, "onUpdate"),
            on_end: callback(options, "onEnd"),
        }
    }

    fn observers(self: &Rc<Self>) -> Observers {
        let start = Rc::clone(self);
        let update = Rc::clone(self);
        let end = Rc::clone(self);
        Observers::new()
            .on_start(move || start.queue.borrow_mut().push(Event::Start))
            .on_update(move |value, progress| {
                update
                    .queue
                    .borrow_mut()
                    .push(Event::Update { value, progress })
            })
            .on_end(move || end.queue.borrow_mut().push(Event::End))
    }

    fn flush(&self) {
        let events = std::mem::take(&mut *self.queue.borrow_mut());
        for event in events {
            let result = match event {
                Event::Start => self.on_start.as_ref().map(|f| f.call0(&JsValue::UNDEFINED)),
                Event::Update { value, progress } => self.on_update.as_ref().map(|f| {
                    f.call2(
                        &JsValue::UNDEFINED,
                        &JsValue::from_f64(value),
                        &JsValue::from_f64(progress),
                    )
                }),
                Event::End => self.on_end.as_ref().map(|f| f.call0(&JsValue::UNDEFINED)),
            };
            if let Some(Err(err)) = result {
                log::error!(target: LOG_TARGET, "counter callback threw: {:?}", err);
            }
        }
    }
}

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Host ports backed by a DOM element and the window's frame clock.
struct DomHost {
    window: Window,
    element: HtmlElement,
    frame: FrameSlot,
    bridge: Rc<Bridge>,
    use_raf: bool,
}

impl DomHost {
    fn set_style(&self, property: &str, value: &str) {
        if let Err(err) = self.element.style().set_property(property, value) {
            log::warn!(target: LOG_TARGET, "could not set {property}: {:?}", err);
        }
    }

    fn computed_display(&self) -> Option<String> {
        self.window
            .get_computed_style(&self.element)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value("display").ok())
    }
}

impl DisplayPort for DomHost {
    fn read_text(&self) -> String {
        self.element.text_content().unwrap_or_default()
    }

    fn write_text(&mut self, text: &str) {
        self.element.set_text_content(Some(text));
    }

    fn read_start_attribute(&self) -> Option<String> {
        self.element.get_attribute(START_ATTRIBUTE)
    }

    fn write_start_attribute(&mut self, value: &str) {
        if let Err(err) = self.element.set_attribute(START_ATTRIBUTE, value) {
            log::warn!(target: LOG_TARGET, "could not write {START_ATTRIBUTE}: {:?}", err);
        }
    }

    fn element_id(&self) -> Option<String> {
        let id = self.element.id();
        (!id.is_empty()).then_some(id)
    }
}

impl OpacityPort for DomHost {
    fn set_opacity(&mut self, value: f64) {
        self.set_style("transition", "none");
        self.set_style("opacity", &value.to_string());
    }

    fn animate_opacity(
        &mut self,
        target: f64,
        duration_ms: f64,
        on_complete: Option<FadeComplete>,
    ) {
        let ms = duration_ms.max(0.0).round();
        self.set_style("transition", &format!("opacity {ms}ms"));
        // Flush styles so the transition starts from the current opacity.
        let _ = self.element.offset_width();
        self.set_style("opacity", &target.to_string());

        if let Some(done) = on_complete {
            let bridge = Rc::clone(&self.bridge);
            let cb = Closure::once_into_js(move || {
                done();
                bridge.flush();
            });
            let handler: &Function = cb.unchecked_ref();
            let scheduled = self
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(handler, ms as i32);
            if let Err(err) = scheduled {
                log::error!(target: LOG_TARGET, "could not schedule fade completion: {:?}", err);
            }
        }
    }

    fn is_hidden(&self) -> bool {
        self.computed_display().is_some_and(|d| d == "none")
    }

    fn show(&mut self) {
        if let Err(err) = self.element.style().remove_property("display") {
            log::warn!(target: LOG_TARGET, "could not clear display: {:?}", err);
        }
        if self.is_hidden() {
            self.set_style("display", "block");
        }
    }
}

impl FrameScheduler for DomHost {
    fn now(&self) -> f64 {
        self.window
            .performance()
            .map_or_else(js_sys::Date::now, |p| p.now())
    }

    fn schedule_frame(&mut self) -> FrameHandle {
        let slot = self.frame.borrow();
        let Some(cb) = slot.as_ref() else {
            return FrameHandle(0);
        };
        let f: &Function = cb.as_ref().unchecked_ref();
        let requested = if self.use_raf {
            self.window.request_animation_frame(f)
        } else {
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(f, FALLBACK_FRAME_MS)
        };
        requested.map(FrameHandle).unwrap_or_else(|err| {
            log::error!(target: LOG_TARGET, "could not schedule frame: {:?}", err);
            FrameHandle(0)
        })
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.use_raf {
            let _ = self.window.cancel_animation_frame(handle.0);
        } else {
            self.window.clear_timeout_with_handle(handle.0);
        }
    }
}

/// Easing table shared between the counter and the JS registration methods.
struct SharedEasings(Rc<RefCell<EasingRegistry>>);

impl EasingResolver for SharedEasings {
    fn resolve(&self, id: &str) -> Option<EasingFn> {
        self.0.borrow().resolve(id)
    }
}

/// Numeric result of a JS easing call; throws and non-numbers are logged.
fn easing_output(name: &str, result: Result<JsValue, JsValue>) -> Option<f64> {
    match result {
        Ok(v) => {
            let out = v.as_f64();
            if out.is_none() {
                log::warn!(target: LOG_TARGET, "easing {name:?} returned a non-number: {:?}", v);
            }
            out
        }
        Err(err) => {
            log::error!(target: LOG_TARGET, "easing {name:?} threw: {:?}", err);
            None
        }
    }
}

fn js_progress_easing(name: String, f: Function) -> EasingFn {
    EasingFn::progress(move |p| {
        let result = f.call1(&JsValue::UNDEFINED, &JsValue::from_f64(p));
        easing_output(&name, result).unwrap_or(p)
    })
}

fn js_raw_time_easing(name: String, f: Function) -> EasingFn {
    EasingFn::raw_time(move |t, b, c, d| {
        let args = Array::of4(
            &JsValue::from_f64(t),
            &JsValue::from_f64(b),
            &JsValue::from_f64(c),
            &JsValue::from_f64(d),
        );
        let result = f.apply(&JsValue::UNDEFINED, &args);
        easing_output(&name, result).unwrap_or_else(|| b + c * (t / d).min(1.0))
    })
}

/// A count-up animation bound to one DOM element.
#[wasm_bindgen]
pub struct NumberCounter {
    inner: Rc<RefCell<Counter<DomHost>>>,
    bridge: Rc<Bridge>,
    easings: Rc<RefCell<EasingRegistry>>,
}

#[wasm_bindgen]
impl NumberCounter {
    /// Bind to `element` and validate its start attribute and text.
    /// `options` takes the JS option names, e.g.
    ///   new NumberCounter(el, { duration: 1500, easing: true, easingFunction: "swing", onEnd })
    #[wasm_bindgen(constructor)]
    pub fn new(element: HtmlElement, options: JsValue) -> Result<NumberCounter, JsError> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let cfg = parse_config(&options)?;
        if cfg.dev_mode {
            // Only the first counter installs the logger.
            let _ = console_log::init_with_level(log::Level::Trace);
        }
        let window = web_sys::window().ok_or_else(|| JsError::new("no global window"))?;
        let use_raf = Reflect::has(&window, &JsValue::from_str("requestAnimationFrame"))
            .unwrap_or(false);

        let bridge = Rc::new(Bridge::from_options(&options));
        let easings = Rc::new(RefCell::new(EasingRegistry::new()));
        let frame: FrameSlot = Rc::new(RefCell::new(None));
        let host = DomHost {
            window,
            element,
            frame: Rc::clone(&frame),
            bridge: Rc::clone(&bridge),
            use_raf,
        };
        let counter = Counter::new(host, cfg)
            .with_observers(bridge.observers())
            .with_easings(SharedEasings(Rc::clone(&easings)));
        let inner = Rc::new(RefCell::new(counter));

        let weak = Rc::downgrade(&inner);
        let tick_bridge = Rc::clone(&bridge);
        *frame.borrow_mut() = Some(Closure::new(move || {
            let Some(counter) = weak.upgrade() else {
                return;
            };
            {
                let mut counter = counter.borrow_mut();
                let now = counter.host().now();
                counter.tick(now);
            }
            tick_bridge.flush();
        }));

        inner.borrow_mut().reconfigure(None, None);
        bridge.flush();
        Ok(NumberCounter {
            inner,
            bridge,
            easings,
        })
    }

    /// Bind to the element with the given id.
    #[wasm_bindgen(js_name = fromId)]
    pub fn from_id(id: &str, options: JsValue) -> Result<NumberCounter, JsError> {
        let element = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .ok_or_else(|| JsError::new(&format!("no element with id {id:?}")))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| JsError::new(&format!("element {id:?} is not an HTMLElement")))?;
        Self::new(element, options)
    }

    fn with_counter<R>(&self, f: impl FnOnce(&mut Counter<DomHost>) -> R) -> R {
        let out = f(&mut self.inner.borrow_mut());
        self.bridge.flush();
        out
    }

    pub fn start(&self) {
        self.with_counter(|c| c.start());
    }

    pub fn stop(&self) {
        self.with_counter(|c| c.stop());
    }

    /// Advance by hand to `now` (ms on the `performance.now()` clock).
    /// Returns true while more frames are wanted.
    pub fn tick(&self, now: f64) -> bool {
        self.with_counter(|c| c.tick(now)) == countup_core::FrameAction::Reschedule
    }

    #[wasm_bindgen(js_name = resetDisplay)]
    pub fn reset_display(&self) {
        self.with_counter(|c| c.reset_display());
    }

    /// Overwrite the start and/or end value and validate again. Omitted
    /// values are re-read from the element.
    pub fn reconfigure(&self, start: Option<String>, end: Option<String>) {
        self.with_counter(|c| c.reconfigure(start.as_deref(), end.as_deref()));
    }

    pub fn phase(&self) -> String {
        self.inner.borrow().phase().name().to_string()
    }

    pub fn precision(&self) -> u32 {
        self.inner.borrow().precision() as u32
    }

    /// Snapshot `{ phase, startValue, endValue, currentValue, precision }`.
    pub fn state(&self) -> Result<JsValue, JsError> {
        let state = self.inner.borrow().state();
        swb::to_value(&state).map_err(|e| JsError::new(&format!("state error: {e}")))
    }

    /// Register `f(progress) -> easedProgress` under `name`.
    #[wasm_bindgen(js_name = registerProgressEasing)]
    pub fn register_progress_easing(&self, name: String, f: Function) {
        self.easings
            .borrow_mut()
            .register(name.clone(), js_progress_easing(name, f));
    }

    /// Register `f(elapsedMs, start, delta, durationMs) -> value` under `name`.
    #[wasm_bindgen(js_name = registerRawTimeEasing)]
    pub fn register_raw_time_easing(&self, name: String, f: Function) {
        self.easings
            .borrow_mut()
            .register(name.clone(), js_raw_time_easing(name, f));
    }

    #[wasm_bindgen(js_name = listEasings)]
    pub fn list_easings(&self) -> Result<JsValue, JsError> {
        let easings = self.easings.borrow();
        swb::to_value(&easings.list_functions())
            .map_err(|e| JsError::new(&format!("easing list error: {e}")))
    }
}

impl Drop for NumberCounter {
    fn drop(&mut self) {
        // A frame left queued would call into a freed closure.
        if let Ok(mut counter) = self.inner.try_borrow_mut() {
            counter.stop();
        }
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
