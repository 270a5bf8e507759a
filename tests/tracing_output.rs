//! Integration tests for the `tracing` adapters.

use tracing::Level;
use tracing_deprecations::infrastructure::mocks::MockCaptureLayer;
use tracing_deprecations::Deprecations;
use tracing_subscriber::layer::SubscriberExt;

#[test]
fn test_log_mode_emits_notice_event() {
    let capture = MockCaptureLayer::new();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    let deprecations = Deprecations::builder()
        .with_mode_name("log")
        .build()
        .unwrap();

    let line = tracing::subscriber::with_default(subscriber, || {
        let line = line!() + 1;
        deprecations.trigger("acme", "ACME-1", format_args!("Use {} instead", "newFn"));
        deprecations.trigger("acme", "ACME-1", format_args!("Use {} instead", "newFn"));
        line
    });

    let events = capture.events_for("deprecations");
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event.level, Level::INFO);
    assert_eq!(event.message, "Use newFn instead");
    assert_eq!(event.fields.get("severity").map(String::as_str), Some("notice"));
    assert_eq!(event.fields.get("package").map(String::as_str), Some("acme"));
    assert_eq!(event.fields.get("link").map(String::as_str), Some("ACME-1"));
    assert_eq!(event.fields.get("line"), Some(&line.to_string()));
    assert!(event.fields["file"].ends_with("tracing_output.rs"));
}

#[test]
fn test_suppressed_warnings_are_trace_events() {
    let capture = MockCaptureLayer::new();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    let deprecations = Deprecations::new();
    deprecations.enable_with_suppressed_warnings();

    tracing::subscriber::with_default(subscriber, || {
        deprecations.trigger("acme", "ACME-2", format_args!("quiet"));
    });

    let events = capture.events_for("deprecations");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::TRACE);
    assert!(events[0].message.starts_with("quiet ("));
    assert!(events[0].message.ends_with(", ACME-2, package acme)"));
}

#[test]
fn test_configuration_changes_are_logged() {
    let capture = MockCaptureLayer::new();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    let deprecations = Deprecations::new();

    tracing::subscriber::with_default(subscriber, || {
        deprecations.enable_with_warnings();
        deprecations.ignore_package("legacy");
        deprecations.disable();
    });

    let events = capture.events_for("tracing_deprecations");
    assert!(events.len() >= 3);
    assert!(events.iter().all(|e| e.level == Level::DEBUG));
}

#[test]
fn test_disabled_mode_emits_nothing() {
    let capture = MockCaptureLayer::new();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    let deprecations = Deprecations::new();

    tracing::subscriber::with_default(subscriber, || {
        deprecations.trigger("acme", "ACME-3", format_args!("silent"));
    });

    assert!(capture.events_for("deprecations").is_empty());
    assert_eq!(deprecations.triggered_deprecations()["ACME-3"], 1);
}
