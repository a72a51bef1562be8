//! Fuzz target for the record encoder.
//!
//! Arbitrary messages, keys and values must always produce exactly one line
//! of valid JSON, whichever buffer path the encoder takes.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sl_core::buffer::BufferPool;
use sl_core::{Encoder, Field, FieldClassifier, Level, LoggerConfig, Record};

#[derive(Debug, Arbitrary)]
enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

#[derive(Debug, Arbitrary)]
struct Input {
    message: String,
    fields: Vec<(String, Value)>,
}

fuzz_target!(|input: Input| {
    let config = LoggerConfig::default();
    let classifier = FieldClassifier::from_policy(&config.redaction);
    let encoder = Encoder::new(&config, &classifier);
    let pool = BufferPool::new();

    let fields: Vec<Field<'_>> = input
        .fields
        .iter()
        .map(|(key, value)| match value {
            Value::Str(s) => Field::str(key.as_str(), s.as_str()),
            Value::Int(i) => Field::int64(key.as_str(), *i),
            Value::Float(f) => Field::float64(key.as_str(), *f),
            Value::Bool(b) => Field::bool(key.as_str(), *b),
        })
        .collect();
    let record = Record::new(Level::Info, "2024-03-09T08:15:02Z", &input.message, &fields);

    let (line, _path) = encoder.render(&record, &pool, |bytes| bytes.to_vec());
    assert_eq!(line.last(), Some(&b'\n'));
    assert_eq!(line.iter().filter(|&&b| b == b'\n').count(), 1);
    serde_json::from_slice::<serde_json::Value>(&line).expect("encoder emitted invalid JSON");
});
