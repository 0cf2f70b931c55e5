//! Capture layer for asserting spans and events emitted during tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Layer that stores closed spans and emitted events so tests can inspect
/// instrumentation after the fact.
///
/// Install it with `tracing::subscriber::with_default` around the code under
/// test and keep a clone to read the captures afterwards.
///
/// # Examples
/// ```
/// use bkindex_test_support::tracing::CaptureLayer;
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let layer = CaptureLayer::default();
/// let subscriber = tracing_subscriber::registry().with(layer.clone());
/// tracing::subscriber::with_default(subscriber, || {
///     let _span = tracing::info_span!("demo", answer = 42).entered();
///     tracing::info!(word = "cat", "found");
/// });
/// assert_eq!(layer.spans()[0].name, "demo");
/// assert_eq!(layer.events()[0].fields["word"], "cat");
/// ```
#[derive(Clone, Default)]
pub struct CaptureLayer {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureLayer {
    /// Returns the spans closed so far, in closing order.
    #[must_use]
    pub fn spans(&self) -> Vec<CapturedSpan> {
        lock(&self.spans).clone()
    }

    /// Returns the events emitted so far, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<CapturedEvent> {
        lock(&self.events).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// A closed span with the fields recorded over its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedSpan {
    /// Span name from the callsite metadata.
    pub name: String,
    /// Field values rendered as strings.
    pub fields: HashMap<String, String>,
}

/// An emitted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEvent {
    /// Event level.
    pub level: Level,
    /// Event target, usually the emitting module path.
    pub target: String,
    /// Field values rendered as strings; the message is stored under
    /// `message`.
    pub fields: HashMap<String, String>,
}

struct OpenSpan(CapturedSpan);

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut captured = CapturedSpan {
            name: attrs.metadata().name().to_owned(),
            fields: HashMap::new(),
        };
        attrs.record(&mut FieldVisitor(&mut captured.fields));
        span.extensions_mut().insert(OpenSpan(captured));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        if let Some(OpenSpan(captured)) = extensions.get_mut::<OpenSpan>() {
            values.record(&mut FieldVisitor(&mut captured.fields));
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else {
            return;
        };
        let Some(OpenSpan(captured)) = span.extensions_mut().remove::<OpenSpan>() else {
            return;
        };
        lock(&self.spans).push(captured);
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor(&mut fields));
        lock(&self.events).push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_owned(),
            fields,
        });
    }
}

struct FieldVisitor<'a>(&'a mut HashMap<String, String>);

impl FieldVisitor<'_> {
    fn store(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_owned(), value);
    }
}

impl Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.store(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.store(field, value.to_owned());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.store(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.store(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.store(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.store(field, value.to_string());
    }
}
