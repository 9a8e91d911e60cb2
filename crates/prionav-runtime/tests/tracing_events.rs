#![forbid(unsafe_code)]

//! Tracing integration: debounce decisions and fit cycles emit events on
//! their documented targets.
//!
//!   cargo test -p prionav-runtime --test tracing_events

use std::sync::{Arc, Mutex};
use std::time::Instant;

use prionav_core::item::{ItemId, sequential_ids};
use prionav_layout::RowMeasurement;
use prionav_runtime::{DebounceHooks, FitShell, NavConfig, NavRuntime, ResizeDebouncer};

use tracing_subscriber::layer::SubscriberExt;

/// A captured event: target plus flattened fields.
#[derive(Debug, Clone)]
struct CapturedEvent {
    target: String,
    fields: Vec<(String, String)>,
}

impl CapturedEvent {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Layer that records every event it sees.
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

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            target: event.metadata().target().to_string(),
            fields: visitor.0,
        });
    }
}

fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

struct Row;

impl FitShell for Row {
    type Measurement = RowMeasurement;

    fn commit(
        &mut self,
        _: &NavConfig,
        width: u16,
        visible: &[ItemId],
        _: &[ItemId],
    ) -> Option<RowMeasurement> {
        Some(RowMeasurement::simulate(width, visible, 0, |_| 20))
    }
}

#[test]
fn debounce_decisions_emit_on_resize_target() {
    let events = with_captured_events(|| {
        let hooks = DebounceHooks::new().with_tracing(true);
        let mut d = ResizeDebouncer::new(std::time::Duration::ZERO).with_hooks(hooks);
        let t0 = Instant::now();
        d.handle_resize_at(80, t0);
        d.handle_resize_at(60, t0);
        d.tick_at(t0);
    });

    let resize: Vec<_> = events
        .iter()
        .filter(|e| e.target == "prionav.resize")
        .collect();
    let actions: Vec<_> = resize.iter().filter_map(|e| e.field("action")).collect();
    assert_eq!(actions, vec!["schedule", "reschedule", "fire"]);
    assert_eq!(resize[2].field("coalesced"), Some("2"));
}

#[test]
fn tracing_disabled_hooks_stay_silent() {
    let events = with_captured_events(|| {
        let mut d = ResizeDebouncer::new(std::time::Duration::ZERO);
        d.handle_resize_at(80, Instant::now());
    });
    assert!(events.iter().all(|e| e.target != "prionav.resize"));
}

#[test]
fn settle_summary_on_nav_target() {
    let events = with_captured_events(|| {
        let mut rt = NavRuntime::new(sequential_ids(4), NavConfig::default());
        rt.mount(50, &mut Row);
        rt.unmount();
    });

    let nav: Vec<_> = events.iter().filter(|e| e.target == "prionav.nav").collect();
    let settled = nav
        .iter()
        .find(|e| e.field("message") == Some("fit cycle settled"))
        .expect("settle summary");
    assert_eq!(settled.field("trigger"), Some("mount"));
    assert_eq!(settled.field("contractions"), Some("2"));
    assert_eq!(settled.field("visible"), Some("2"));
    assert!(nav.iter().any(|e| e.field("message") == Some("unmount")));
}
