use std::cell::RefCell;
use std::sync::Once;

use countup_core::{Counter, CounterConfig, LOG_TARGET};
use countup_test_fixtures::{drive, RecordingHost};
use log::{Level, LevelFilter, Log, Metadata, Record};

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
}

struct Capture;

impl Log for Capture {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target() == LOG_TARGET
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            CAPTURED.with(|c| c.borrow_mut().push((record.level(), record.args().to_string())));
        }
    }

    fn flush(&self) {}
}

static INIT: Once = Once::new();

fn captured() -> Vec<(Level, String)> {
    INIT.call_once(|| {
        log::set_boxed_logger(Box::new(Capture)).expect("logger installed once");
        log::set_max_level(LevelFilter::Trace);
    });
    CAPTURED.with(|c| std::mem::take(&mut *c.borrow_mut()))
}

#[test]
fn invalid_values_are_reported_in_dev_mode() {
    captured();
    let cfg = CounterConfig::default().with_dev_mode(true);
    let host = RecordingHost::new(Some("5"), "abc").with_id("hero");
    let _counter = Counter::attach(host, cfg, Default::default());

    let lines = captured();
    let errors: Vec<&String> = lines
        .iter()
        .filter(|(level, _)| *level == Level::Error)
        .map(|(_, msg)| msg)
        .collect();
    assert_eq!(errors.len(), 2, "{lines:?}");
    assert!(errors[0].contains("ending value"), "{}", errors[0]);
    assert!(errors[0].contains("hero"), "{}", errors[0]);
    assert!(errors[1].contains("FATAL"), "{}", errors[1]);
}

#[test]
fn silent_outside_dev_mode() {
    captured();
    let host = RecordingHost::new(Some(""), "1");
    let mut counter = Counter::attach(host, CounterConfig::default(), Default::default());
    counter.start();
    let cfg = CounterConfig::default().with_easing("nope");
    let mut counter = Counter::attach(RecordingHost::new(Some("0"), "3"), cfg, Default::default());
    counter.start();
    drive(&mut counter, 50.0, 100);
    assert!(captured().is_empty());
}

#[test]
fn notices_for_equal_values_and_unknown_easing() {
    captured();
    let cfg = CounterConfig::default().with_dev_mode(true);
    let mut counter = Counter::attach(RecordingHost::new(Some("2"), "2"), cfg, Default::default());
    counter.start();
    let lines = captured();
    assert!(lines
        .iter()
        .any(|(level, msg)| *level == Level::Info && msg.contains("same")));

    let cfg = CounterConfig::default()
        .with_dev_mode(true)
        .with_easing("easeSideways");
    let mut counter = Counter::attach(RecordingHost::new(Some("0"), "3"), cfg, Default::default());
    counter.start();
    let lines = captured();
    assert!(lines
        .iter()
        .any(|(level, msg)| *level == Level::Info && msg.contains("easeSideways")));
    assert!(lines.iter().any(|(level, _)| *level == Level::Trace));
}

#[test]
fn start_on_invalid_counter_warns() {
    captured();
    let cfg = CounterConfig::default().with_dev_mode(true);
    let mut counter = Counter::attach(RecordingHost::new(None, "3"), cfg, Default::default());
    captured();
    counter.start();
    let lines = captured();
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert_eq!(lines[0].0, Level::Warn);
}
