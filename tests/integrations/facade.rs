//! End-to-end tests for the `Alert` facade and its handler chain.

#[path = "../helpers/mod.rs"]
mod helpers;

use alertbus::formatting::ConsoleFormatter;
use alertbus::{
    Alert, AlertCategory, AlertContext, AlertError, AlertFields, AlertHandler, CallSite, Config,
    ConsoleHandler, TracingHandler,
};
use anyhow::anyhow;
use helpers::capture_writer::CaptureWriter;
use helpers::recording_handler::RecordingHandler;
use serial_test::serial;
use std::sync::Arc;
use tracing_test::traced_test;

#[test]
fn test_raise_error_with_default_handler_writes_console_line() {
    let console = CaptureWriter::default();
    let alert = Alert::new(ConsoleHandler::default().with_writer(console.clone()));

    assert!(alert.raise_error_with("x", anyhow!("y")));

    let lines = console.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("[Error] -> x, y"), "unexpected line: {}", lines[0]);
}

#[test]
fn test_console_timestamp_follows_format() {
    let console = CaptureWriter::default();
    let handler = ConsoleHandler::new(ConsoleFormatter::new("%Y")).with_writer(console.clone());
    let alert = Alert::new(handler);

    assert!(alert.raise_information("ready"));

    let line = &console.lines()[0];
    let (year, rest) = line.split_once(' ').unwrap();
    assert_eq!(year.len(), 4);
    assert!(year.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(rest, "[Information] -> ready");
}

#[test]
fn test_every_sugar_method_reaches_its_hook() {
    let handler = RecordingHandler::default();
    let alert = Alert::new(handler.clone());

    assert!(alert.raise_information("i"));
    assert!(alert.raise_warning("w"));
    assert!(alert.raise_warning_with("w2", anyhow!("we")));
    assert!(alert.raise_error("e"));
    assert!(alert.raise_critical_with("c", anyhow!("ce")));
    assert!(alert.raise_audit("a"));
    assert!(alert.raise_debug("d"));
    assert!(alert.raise_trace("t"));

    let categories: Vec<AlertCategory> = handler.handled().iter().map(|h| h.category).collect();
    assert_eq!(
        categories,
        vec![
            AlertCategory::Information,
            AlertCategory::Warning,
            AlertCategory::Warning,
            AlertCategory::Error,
            AlertCategory::Critical,
            AlertCategory::Audit,
            AlertCategory::Debug,
            AlertCategory::Trace,
        ]
    );
    let handled = handler.handled();
    assert_eq!(handled[2].error.as_deref(), Some("we"));
    assert_eq!(handled[4].message.as_deref(), Some("c"));
}

#[test]
fn test_call_site_points_at_the_raise() {
    let handler = RecordingHandler::default();
    let alert = Alert::new(handler.clone());

    alert.raise_warning("disk nearly full");
    let line = line!() - 1;

    let site = &handler.handled()[0].site;
    assert!(site.file.ends_with("facade.rs"), "unexpected file: {}", site.file);
    assert_eq!(site.line, line);
    assert!(site.member.is_empty());
}

#[test]
fn test_explicit_call_site_is_passed_through() {
    let handler = RecordingHandler::default();
    let alert = Alert::new(handler.clone());

    let site = CallSite::new("checkout", "src/cart.rs", 88);
    assert!(alert.try_raise_at(AlertCategory::Audit, Some(AlertFields::message("paid")), site.clone()));

    assert_eq!(handler.handled()[0].site, site);
}

#[test]
fn test_missing_arguments() {
    let alert = Alert::new(RecordingHandler::default());
    assert!(!alert.try_raise(AlertCategory::Error, None));
    assert!(matches!(
        alert.raise(AlertCategory::Error, None),
        Err(AlertError::Configuration(_))
    ));
}

#[test]
#[traced_test]
fn test_tracing_handler_logs_and_chains_to_console() {
    let console = CaptureWriter::default();
    let alert = Alert::new(TracingHandler::new(
        ConsoleHandler::default().with_writer(console.clone()),
    ));

    assert!(alert.raise_critical_with("primary lost", anyhow!("heartbeat timeout")));

    assert!(logs_contain("primary lost"));
    assert!(logs_contain("heartbeat timeout"));
    assert!(console.lines()[0].ends_with("[Critical] -> primary lost, heartbeat timeout"));
}

#[test]
#[traced_test]
fn test_tracing_handler_rejects_fields_without_message() {
    let alert = Alert::new(TracingHandler::default());
    let mut fields = AlertFields::new();
    fields.insert("user", "7");

    assert!(!alert.try_raise(AlertCategory::Audit, Some(fields.clone())));
    // `raise` logs the failure but does not return it.
    assert!(alert.raise(AlertCategory::Audit, Some(fields)).is_ok());
    assert!(logs_contain("Failed to raise a 'Audit' alert!"));
}

#[test]
fn test_handler_swap_between_raises() {
    let first = RecordingHandler::default();
    let second = RecordingHandler::default();
    let alert = Alert::new(first.clone());

    alert.raise_information("one");
    alert.set_handler(second.clone());
    alert.raise_information("two");

    assert_eq!(first.handled().len(), 1);
    assert_eq!(second.handled().len(), 1);
    assert_eq!(second.handled()[0].message.as_deref(), Some("two"));
}

#[test]
fn test_concurrent_raises_during_swap() {
    let first = RecordingHandler::default();
    let second = RecordingHandler::default();
    let alert = Arc::new(Alert::new(first.clone()));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let alert = alert.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    assert!(alert.raise_audit("tick"));
                }
            })
        })
        .collect();
    alert.set_handler(second.clone());
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(first.handled().len() + second.handled().len(), 200);
}

#[test]
#[serial]
fn test_global_instance_handler_can_be_replaced() {
    let handler = RecordingHandler::default();
    Alert::instance().set_handler(handler.clone());

    assert!(Alert::instance().raise_audit("global"));
    assert_eq!(handler.handled()[0].message.as_deref(), Some("global"));

    Alert::instance().set_handler(ConsoleHandler::default());
}

#[test]
fn test_context_uses_custom_handler() {
    let handler = RecordingHandler::default();
    let context = AlertContext::builder(Config::default())
        .handler(handler.clone())
        .install_standard_listeners(false)
        .build()
        .unwrap();

    assert!(context.alert().raise_error("from context"));
    assert_eq!(handler.handled()[0].category, AlertCategory::Error);
}

#[test]
fn test_handler_trait_object_is_shared() {
    let handler = RecordingHandler::default();
    let alert = Alert::new(handler.clone());

    let current = alert.handler();
    current
        .handle_alert(AlertCategory::Trace, &AlertFields::message("direct"), &CallSite::default())
        .unwrap();

    assert_eq!(handler.handled()[0].category, AlertCategory::Trace);
}
