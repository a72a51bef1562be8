//! `tracing` bridge.
//!
//! [`RedactingLayer`] turns tracing events into scrublog records: event
//! fields (plus the fields of enclosing spans) become [`Field`]s and go
//! through a [`Logger`], so they are classified and masked like any direct
//! call. Events on scrublog's own diagnostics target are ignored.

use crate::caller::Caller;
use crate::field::{Field, FieldValue};
use crate::logger::Logger;
use sl_common::Level;
use sl_redact::INTERNAL_TARGET;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::field::{Field as TracingField, Visit};
use tracing::span::{Attributes, Id, Record as SpanRecord};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Fields recorded on a span, stored in its extensions.
#[derive(Debug, Default)]
struct SpanFields(Vec<Field<'static>>);

/// Collects tracing values into typed fields.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<Field<'static>>,
}

impl FieldVisitor {
    fn push(&mut self, field: &TracingField, value: FieldValue<'static>) {
        let name = field.name();
        // `record` on an existing span re-sends a field; keep the newest.
        self.fields.retain(|f| f.key() != name);
        self.fields.push(Field::new(name, value));
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.push(field, FieldValue::Str(Cow::Owned(value.to_string())));
        }
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn std::fmt::Debug) {
        let text = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(text);
        } else {
            self.push(field, FieldValue::Str(Cow::Owned(text)));
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.push(field, FieldValue::Int64(value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.push(field, FieldValue::from(value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.push(field, FieldValue::Float64(value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.push(field, FieldValue::Bool(value));
    }
}

/// Map a tracing level onto the four scrublog levels.
pub fn level_from_tracing(level: &tracing::Level) -> Level {
    match *level {
        tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
        tracing::Level::INFO => Level::Info,
        tracing::Level::WARN => Level::Warn,
        tracing::Level::ERROR => Level::Error,
    }
}

/// Tracing layer that writes every event through a [`Logger`].
#[derive(Debug, Clone)]
pub struct RedactingLayer {
    logger: Arc<Logger>,
}

impl RedactingLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        RedactingLayer { logger }
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

impl<S> Layer<S> for RedactingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);

        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(SpanFields(visitor.fields));
        }
    }

    fn on_record(&self, id: &Id, values: &SpanRecord<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        let mut visitor = FieldVisitor {
            message: None,
            fields: extensions
                .remove::<SpanFields>()
                .map(|stored| stored.0)
                .unwrap_or_default(),
        };
        values.record(&mut visitor);
        extensions.insert(SpanFields(visitor.fields));
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target() == INTERNAL_TARGET {
            return;
        }
        let level = level_from_tracing(metadata.level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let mut fields = visitor.fields;

        // Innermost span wins when names collide.
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope {
                if let Some(stored) = span.extensions().get::<SpanFields>() {
                    for field in &stored.0 {
                        if !fields.iter().any(|f| f.key() == field.key()) {
                            fields.push(field.clone());
                        }
                    }
                }
            }
        }

        let mut caller = Caller {
            file: metadata.file().unwrap_or("<unknown>"),
            line: metadata.line().unwrap_or(0),
            function: None,
        };
        if let Some(module) = metadata.module_path() {
            caller = caller.with_function(module);
        }

        let message = visitor.message.unwrap_or_default();
        self.logger.log_with_caller(level, &message, &fields, caller);
    }
}
