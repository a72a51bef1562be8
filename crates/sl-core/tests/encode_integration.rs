//! End-to-end record encoding through a `Logger`.

use sl_core::{Field, Level, Logger, LoggerConfig, OutputFormat, RedactionPolicy, SharedBuffer};
use std::io::Write;
use std::time::Duration;

fn logger(config: LoggerConfig) -> (Logger, SharedBuffer) {
    let buffer = SharedBuffer::new();
    (Logger::new(config, buffer.clone()), buffer)
}

fn only_record(buffer: &SharedBuffer) -> serde_json::Value {
    let lines = buffer.lines();
    assert_eq!(lines.len(), 1, "expected one record, got {:?}", lines);
    serde_json::from_str(&lines[0]).expect("record is valid JSON")
}

#[test]
fn login_record_masks_email() {
    let (logger, buffer) = logger(LoggerConfig::default());
    logger.info(
        "login",
        &[Field::str("user_email", "a@b.com"), Field::int64("attempt", 3)],
    );

    let contents = buffer.contents();
    let ts_end = contents.find("\",\"level\"").unwrap();
    assert!(contents.starts_with("{\"timestamp\":\""));
    assert_eq!(
        &contents[ts_end..],
        "\",\"level\":\"info\",\"msg\":\"login\",\"user_email\":\"***PII***\",\"attempt\":3}\n"
    );
}

#[test]
fn pii_masking_disabled_keeps_email() {
    let config = LoggerConfig::default()
        .with_redaction(RedactionPolicy::default().with_mask_pii(false));
    let (logger, buffer) = logger(config);
    logger.info("login", &[Field::str("user_email", "a@b.com")]);
    assert_eq!(only_record(&buffer)["user_email"], "a@b.com");
}

#[test]
fn pii_wins_over_sensitive() {
    let config = LoggerConfig::default().with_redaction({
        let mut policy = RedactionPolicy::default();
        policy.sensitive_patterns.extend(["email"]);
        policy
    });
    let (logger, buffer) = logger(config);
    logger.info("m", &[Field::str("email", "a@b.com")]);
    assert_eq!(only_record(&buffer)["email"], "***PII***");

    // With PII masking off the sensitive match still applies.
    logger.set_pii_masking(false);
    buffer.clear();
    logger.info("m", &[Field::str("email", "a@b.com")]);
    assert_eq!(only_record(&buffer)["email"], "***MASKED***");
}

#[test]
fn public_values_are_byte_identical() {
    let (logger, buffer) = logger(LoggerConfig::default());
    let value = "plain \u{e9}t\u{e9} \u{1F600} <tag>";
    logger.info("m", &[Field::str("comment", value)]);
    assert!(buffer.contents().contains(&format!("\"comment\":\"{}\"", value)));
}

#[test]
fn five_kilobyte_record_is_one_line() {
    let (logger, buffer) = logger(LoggerConfig::default());
    let payload = "y".repeat(5000);
    logger.warn(
        "bulk",
        &[
            Field::str("payload", payload.as_str()),
            Field::str("secret", "nope"),
        ],
    );
    let record = only_record(&buffer);
    assert_eq!(record["payload"].as_str().unwrap(), payload);
    assert_eq!(record["secret"], "***MASKED***");
    assert!(buffer.contents().ends_with("}\n"));
}

#[test]
fn heavily_escaped_record_survives_fallback() {
    let (logger, buffer) = logger(LoggerConfig::default());
    let nasty = "\u{1}\"\\\n".repeat(4000);
    logger.error("nasty", &[Field::str("blob", nasty.as_str())]);
    assert_eq!(only_record(&buffer)["blob"].as_str().unwrap(), nasty);
}

#[test]
fn many_fields_use_every_kind() {
    let (logger, buffer) = logger(LoggerConfig::default().with_component("svc", "3.1.0"));
    let fields: Vec<Field<'_>> = (0..20)
        .map(|i| match i % 4 {
            0 => Field::int64(format!("n{}", i), i),
            1 => Field::float64(format!("f{}", i), i as f64 / 4.0),
            2 => Field::bool(format!("b{}", i), i % 3 == 0),
            _ => Field::duration(format!("d{}", i), Duration::from_millis(i as u64)),
        })
        .collect();
    logger.debug("ignored at info", &fields);
    logger.info("fields", &fields);
    let record = only_record(&buffer);
    assert_eq!(record["n8"], 8);
    assert_eq!(record["f9"], 2.25);
    assert_eq!(record["b6"], true);
    assert_eq!(record["d3"], "3ms");
    assert_eq!(record["component"], "svc");
    assert_eq!(record["version"], "3.1.0");
}

#[test]
fn plain_format_end_to_end() {
    let config = LoggerConfig::default()
        .with_format(OutputFormat::Plain)
        .with_component("api", "1.0")
        .with_level(Level::Debug);
    let (logger, buffer) = logger(config);
    logger.debug("auth", &[Field::str("token", "abc"), Field::int64("uid", 9)]);
    let line = &buffer.lines()[0];
    let (_, rest) = line.split_once(" | ").unwrap();
    assert_eq!(rest, "DEBUG   | api 1.0: auth [token=***MASKED*** uid=9]");
}

#[test]
fn plain_record_with_newlines_is_one_line() {
    let (logger, buffer) = logger(LoggerConfig::default().with_format(OutputFormat::Plain));
    logger.info("a\nb", &[Field::str("note", "x\ny")]);
    logger.info("c\r\nd", &[]);

    let lines = buffer.lines();
    assert_eq!(lines.len(), 2, "{:?}", lines);
    assert!(lines[0].ends_with(r"| INFO    | a\nb [note=x\ny]"), "{}", lines[0]);
    assert!(lines[1].ends_with(r"| INFO    | c\r\nd"), "{}", lines[1]);
}

#[test]
fn config_file_drives_logger() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scrublog.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
level = "warn"
component = "worker"

[redaction]
sensitive_mask = "[redacted]"
"#
    )
    .unwrap();

    let buffer = SharedBuffer::new();
    let logger = Logger::from_config_file(&path, buffer.clone()).unwrap();
    logger.info("dropped", &[]);
    logger.warn("kept", &[Field::str("api_key", "k")]);
    let record = only_record(&buffer);
    assert_eq!(record["api_key"], "[redacted]");
    assert_eq!(record["component"], "worker");
}

#[test]
fn invalid_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scrublog.json");
    std::fs::write(&path, r#"{"redaction":{"pii_mask":""}}"#).unwrap();
    let err = Logger::from_config_file(&path, SharedBuffer::new()).unwrap_err();
    assert_eq!(err.code(), 21);
}

#[test]
fn sink_failures_are_counted() {
    struct Closed;
    impl Write for Closed {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let logger = Logger::new(LoggerConfig::default(), Closed);
    logger.info("a", &[]);
    logger.info("b", &[]);
    assert_eq!(logger.sink_errors(), 2);
}
