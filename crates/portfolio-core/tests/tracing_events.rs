#![forbid(unsafe_code)]

//! Structured log events emitted by the controller.
//!
//! Run:
//!   cargo test -p portfolio-core --test tracing_events

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use portfolio_core::memory_dom::MemoryDom;
use portfolio_core::{PortfolioController, SelectedFile, UiEvent};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
}

/// A tracing Layer that records every event.
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.get("message").cloned().unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

fn with_captured_events<F>(f: F) -> Vec<CapturedEvent>
where
    F: FnOnce(),
{
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn find<'a>(events: &'a [CapturedEvent], message: &str) -> Option<&'a CapturedEvent> {
    events.iter().find(|event| event.message == message)
}

fn upload_page() -> (MemoryDom, portfolio_core::NodeId) {
    let mut dom = MemoryDom::new();
    let body = dom.body();
    dom.add(body, "div", Some("profilePic"), &["profile-pic"]);
    let input = dom.add(body, "input", Some("profileUpload"), &[]);
    dom.add(body, "span", None, &["skill-tag"]);
    (dom, input)
}

#[test]
fn initialize_logs_summary_at_info() {
    let events = with_captured_events(|| {
        let (mut dom, _) = upload_page();
        PortfolioController::default().initialize(&mut dom);
    });
    let summary = find(&events, "portfolio initialized").expect("summary event");
    assert_eq!(summary.level, tracing::Level::INFO);
    assert_eq!(summary.fields.get("bindings").map(String::as_str), Some("1"));
    // change on the input plus enter/leave on the tag
    assert_eq!(summary.fields.get("listeners").map(String::as_str), Some("3"));
}

#[test]
fn rejected_upload_logs_reason() {
    let events = with_captured_events(|| {
        let (mut dom, input) = upload_page();
        let mut controller = PortfolioController::default();
        controller.initialize(&mut dom);
        controller.dispatch(
            &mut dom,
            UiEvent::FileSelected {
                input,
                file: Some(SelectedFile::new("text/plain", 10)),
            },
        );
    });
    let rejected = find(&events, "upload rejected").expect("rejection event");
    assert_eq!(rejected.level, tracing::Level::DEBUG);
    assert!(rejected.fields["error"].contains("text/plain"));
}

#[test]
fn superseded_decode_is_logged_and_dropped() {
    let events = with_captured_events(|| {
        let (mut dom, input) = upload_page();
        let mut controller = PortfolioController::default();
        controller.initialize(&mut dom);
        let mut select = |dom: &mut MemoryDom| {
            controller
                .dispatch(
                    dom,
                    UiEvent::FileSelected {
                        input,
                        file: Some(SelectedFile::new("image/png", 10)),
                    },
                )
                .read
                .expect("ticket")
        };
        let first = select(&mut dom);
        let second = select(&mut dom);
        assert!(!controller.complete_upload(&mut dom, first, "data:old"));
        assert!(controller.complete_upload(&mut dom, second, "data:new"));
    });
    assert!(find(&events, "discarding superseded decode").is_some());
    assert_eq!(
        events
            .iter()
            .filter(|event| event.message == "preview rendered")
            .count(),
        1
    );
}

#[test]
fn second_initialize_logs_at_debug_only() {
    let events = with_captured_events(|| {
        let (mut dom, _) = upload_page();
        let mut controller = PortfolioController::default();
        controller.initialize(&mut dom);
        controller.initialize(&mut dom);
    });
    let infos = events
        .iter()
        .filter(|event| event.level == tracing::Level::INFO)
        .count();
    assert_eq!(infos, 1);
    assert!(find(&events, "portfolio already initialized").is_some());
}
