use countup_core::{Counter, CounterConfig, EasingFn, EasingRegistry, Phase};
use countup_test_fixtures::{configs, drive, ObserverLog, RecordingHost};

fn run(
    start: &str,
    end: &str,
    cfg: CounterConfig,
    frame_ms: f64,
) -> (Counter<RecordingHost>, ObserverLog) {
    let log = ObserverLog::new();
    let host = RecordingHost::new(Some(start), end);
    let mut counter = Counter::attach(host, cfg, log.observers());
    counter.start();
    drive(&mut counter, frame_ms, 10_000);
    (counter, log)
}

fn first_frame_at(start: &str, end: &str, cfg: CounterConfig, at_ms: f64) -> String {
    let host = RecordingHost::new(Some(start), end);
    let mut counter = Counter::attach(host, cfg, Default::default());
    counter.start();
    let now = counter
        .host_mut()
        .fire_next_frame(at_ms)
        .expect("first frame queued");
    counter.tick(now);
    counter.host().text.clone()
}

#[test]
fn every_fixture_config_loads() {
    let keys = configs::keys();
    assert!(keys.contains(&"default".to_string()));
    for key in keys {
        configs::load(&key).unwrap_or_else(|e| panic!("fixture {key}: {e:#}"));
    }
}

#[test]
fn fixture_values_reach_config() {
    let cfg = configs::load("fade_swing").unwrap();
    assert_eq!(cfg.duration_ms, 1500.0);
    assert!(cfg.fade_in);
    assert_eq!(cfg.fade_in_duration_ms, 250.0);
    assert!(cfg.easing_enabled);
    assert_eq!(cfg.easing_function, "swing");
    assert_eq!(configs::load("default").unwrap(), CounterConfig::default());
    assert!(configs::load("no_such_fixture").is_err());
}

#[test]
fn unknown_easing_falls_back_to_linear() {
    let cfg = configs::load("unknown_easing").unwrap();
    assert_eq!(first_frame_at("0", "100", cfg.clone(), 500.0), "50");
    assert_eq!(first_frame_at("0", "100", cfg, 250.0), "25");
}

#[test]
fn disabled_easing_ignores_function_id() {
    let mut cfg = CounterConfig::default()
        .with_duration(1000.0)
        .with_easing("easeInQuad");
    cfg.easing_enabled = false;
    assert_eq!(first_frame_at("0", "100", cfg, 250.0), "25");
}

#[test]
fn swing_eases_ascending_runs() {
    let cfg = CounterConfig::default()
        .with_duration(1000.0)
        .with_easing("swing");
    assert_eq!(first_frame_at("0", "100", cfg.clone(), 250.0), "15");
    assert_eq!(first_frame_at("0", "100", cfg, 500.0), "50");
}

#[test]
fn progress_easing_is_mirrored_when_descending() {
    let cfg = CounterConfig::default()
        .with_duration(1000.0)
        .with_easing("swing");
    assert_eq!(first_frame_at("100", "0", cfg, 250.0), "85");

    let cfg = CounterConfig::default()
        .with_duration(1000.0)
        .with_easing("swing");
    let (counter, log) = run("100", "0", cfg, 16.0);
    let values = log.updates();
    assert!(values.len() > 10);
    assert!(values.windows(2).all(|w| w[0] >= w[1]), "{values:?}");
    assert_eq!(values.last(), Some(&0.0));
    assert_eq!(counter.host().text, "0");
}

#[test]
fn raw_time_easing_descends_monotonically() {
    let cfg = CounterConfig::default()
        .with_duration(900.0)
        .with_easing("easeInOutQuad");
    let (counter, log) = run("250", "-50", cfg, 16.0);
    let values = log.updates();
    assert!(values.windows(2).all(|w| w[0] >= w[1]), "{values:?}");
    assert_eq!(values.first(), Some(&250.0));
    assert_eq!(values.last(), Some(&-50.0));
    assert_eq!(counter.phase(), Phase::Finished);
}

#[test]
fn bounce_fixture_lands_on_end_value() {
    let cfg = configs::load("bounce_out").unwrap();
    let (counter, log) = run("0", "12.5", cfg, 16.0);
    assert_eq!(counter.host().text, "12.5");
    assert!(log.updates().iter().all(|v| (0.0..=12.5).contains(v)));
}

#[test]
fn back_easing_may_overshoot_range() {
    let cfg = CounterConfig::default()
        .with_duration(1000.0)
        .with_easing("easeInBack");
    assert_eq!(first_frame_at("0", "100", cfg.clone(), 200.0), "-5");
    let (counter, _log) = run("0", "100", cfg, 16.0);
    assert_eq!(counter.host().text, "100");
}

#[test]
fn custom_progress_easing_replaces_table() {
    let mut table = EasingRegistry::empty();
    table.register("steps", EasingFn::progress(|p| (p * 4.0).floor() / 4.0));
    let cfg = CounterConfig::default()
        .with_duration(1000.0)
        .with_easing("steps");
    let log = ObserverLog::new();
    let mut counter = Counter::new(RecordingHost::new(Some("0"), "8"), cfg)
        .with_observers(log.observers())
        .with_easings(table);
    counter.reconfigure(None, None);
    counter.start();
    drive(&mut counter, 100.0, 100);

    let mut distinct = log.updates();
    distinct.dedup();
    assert_eq!(distinct, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
}

#[test]
fn custom_raw_time_easing_receives_delta_and_duration() {
    let mut table = EasingRegistry::new();
    table.register(
        "halfway",
        EasingFn::raw_time(|_t, start, delta, _d| start + delta / 2.0),
    );
    let cfg = CounterConfig::default()
        .with_duration(1000.0)
        .with_easing("halfway");
    let log = ObserverLog::new();
    let mut counter = Counter::new(RecordingHost::new(Some("10"), "30"), cfg)
        .with_observers(log.observers())
        .with_easings(table);
    counter.reconfigure(None, None);
    counter.start();
    drive(&mut counter, 200.0, 100);

    let values = log.updates();
    let (last, running) = values.split_last().expect("updates recorded");
    assert!(running.iter().all(|v| *v == 20.0), "{running:?}");
    assert_eq!(*last, 30.0);
}

#[test]
fn decimal_precision_survives_easing() {
    let cfg = CounterConfig::default()
        .with_duration(1000.0)
        .with_easing("easeOutCubic");
    let (counter, _log) = run("0.5", "99.125", cfg, 33.0);
    assert_eq!(counter.precision(), 3);
    for text in &counter.host().text_writes[1..] {
        let decimals = text.split('.').nth(1).map_or(0, str::len);
        assert_eq!(decimals, 3, "{text}");
    }
}
