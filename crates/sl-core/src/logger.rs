//! Logger facade and process-default logger.
//!
//! A [`Logger`] owns everything an encode call shares: the configuration
//! snapshot, the classifier, the timestamp cache, the buffer pool and the
//! sink. Logging methods return nothing; every failure mode is absorbed
//! (see [`Encoder::render`] and [`Sink`]).

use crate::buffer::BufferPool;
use crate::caller::Caller;
use crate::encode::{Encoder, Record};
use crate::field::Field;
use crate::sink::Sink;
use crate::timestamp::TimestampCache;
use once_cell::sync::Lazy;
use sl_common::{Level, LoggerConfig};
use sl_redact::{FieldClassifier, PatternSet, RedactionPolicy};
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Structured logger writing redacted records to one sink.
pub struct Logger {
    config: RwLock<Arc<LoggerConfig>>,
    min_level: AtomicU8,
    classifier: FieldClassifier,
    clock: TimestampCache,
    pool: BufferPool,
    sink: Sink,
}

impl Logger {
    pub fn new<W: Write + Send + 'static>(config: LoggerConfig, writer: W) -> Self {
        Self::with_sink(config, Sink::new(writer))
    }

    /// Logger writing to stderr.
    pub fn stderr(config: LoggerConfig) -> Self {
        Self::with_sink(config, Sink::stderr())
    }

    pub fn with_sink(config: LoggerConfig, sink: Sink) -> Self {
        Logger {
            min_level: AtomicU8::new(config.level as u8),
            classifier: FieldClassifier::from_policy(&config.redaction),
            config: RwLock::new(Arc::new(config)),
            clock: TimestampCache::new(),
            pool: BufferPool::new(),
            sink,
        }
    }

    /// Load and validate a configuration file, then build a logger on `writer`.
    pub fn from_config_file<P, W>(path: P, writer: W) -> sl_common::Result<Self>
    where
        P: AsRef<Path>,
        W: Write + Send + 'static,
    {
        let config = LoggerConfig::load(path)?;
        Ok(Self::new(config, writer))
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<LoggerConfig> {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validate and swap in a new configuration.
    ///
    /// The classifier is resynchronized; its cache is cleared for each
    /// category whose patterns changed. Encodes already in progress finish
    /// with the snapshot they started with.
    pub fn reconfigure(&self, config: LoggerConfig) -> sl_common::Result<()> {
        config.validate()?;
        self.update(|current| *current = config);
        tracing::debug!(target: sl_redact::INTERNAL_TARGET, "logger reconfigured");
        Ok(())
    }

    fn update(&self, change: impl FnOnce(&mut LoggerConfig)) {
        let mut slot = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = (**slot).clone();
        change(&mut next);
        self.classifier.apply_policy(&next.redaction);
        self.min_level.store(next.level as u8, Ordering::Relaxed);
        *slot = Arc::new(next);
    }

    fn update_redaction(&self, change: impl FnOnce(&mut RedactionPolicy)) {
        self.update(|config| change(&mut config.redaction));
    }

    /// Whether a record at `level` would be written.
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 >= self.min_level.load(Ordering::Relaxed)
    }

    /// Number of records lost to sink write failures.
    pub fn sink_errors(&self) -> u64 {
        self.sink.errors()
    }

    pub fn flush(&self) -> io::Result<()> {
        self.sink.flush()
    }

    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[Field<'_>]) {
        self.log(Level::Debug, message, fields);
    }

    #[track_caller]
    pub fn info(&self, message: &str, fields: &[Field<'_>]) {
        self.log(Level::Info, message, fields);
    }

    #[track_caller]
    pub fn warn(&self, message: &str, fields: &[Field<'_>]) {
        self.log(Level::Warn, message, fields);
    }

    #[track_caller]
    pub fn error(&self, message: &str, fields: &[Field<'_>]) {
        self.log(Level::Error, message, fields);
    }

    /// Log at `level`; below-threshold records cost one atomic load.
    #[track_caller]
    pub fn log(&self, level: Level, message: &str, fields: &[Field<'_>]) {
        if !self.enabled(level) {
            return;
        }
        self.emit(level, message, fields, Caller::here());
    }

    /// Log with an explicit call site instead of the Rust caller.
    pub fn log_with_caller(&self, level: Level, message: &str, fields: &[Field<'_>], caller: Caller) {
        if !self.enabled(level) {
            return;
        }
        self.emit(level, message, fields, caller);
    }

    /// Log key/value pairs collected in a JSON map.
    #[track_caller]
    pub fn log_map(&self, level: Level, message: &str, map: &serde_json::Map<String, serde_json::Value>) {
        if !self.enabled(level) {
            return;
        }
        let fields: Vec<Field<'_>> = map
            .iter()
            .map(|(key, value)| Field::new(key.as_str(), value))
            .collect();
        self.emit(level, message, &fields, Caller::here());
    }

    fn emit(&self, level: Level, message: &str, fields: &[Field<'_>], caller: Caller) {
        let config = self.config();
        if !config.enabled(level) {
            return;
        }
        let caller = config.show_caller.then_some(caller);
        let stamp = self.clock.now(config.timestamp_resolution);
        let record = Record::new(level, stamp.as_str(), message, fields).with_caller(caller.as_ref());
        Encoder::new(&config, &self.classifier).render(&record, &self.pool, |bytes| {
            self.sink.write_record(bytes)
        });
    }

    pub fn add_pii_patterns<I, S>(&self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.update_redaction(|policy| policy.pii_patterns.extend(patterns));
    }

    pub fn add_sensitive_patterns<I, S>(&self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.update_redaction(|policy| policy.sensitive_patterns.extend(patterns));
    }

    pub fn set_pii_patterns(&self, patterns: PatternSet) {
        self.update_redaction(|policy| policy.pii_patterns = patterns);
    }

    pub fn set_sensitive_patterns(&self, patterns: PatternSet) {
        self.update_redaction(|policy| policy.sensitive_patterns = patterns);
    }

    pub fn set_pii_masking(&self, enabled: bool) {
        self.update_redaction(|policy| policy.mask_pii = enabled);
    }

    pub fn set_sensitive_masking(&self, enabled: bool) {
        self.update_redaction(|policy| policy.mask_sensitive = enabled);
    }

    pub fn clear_cache(&self) {
        self.classifier.clear_cache();
    }

    /// Cached classification entries across both categories.
    pub fn cache_len(&self) -> usize {
        self.classifier.cache_len()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config())
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

static DEFAULT_LOGGER: Lazy<RwLock<Arc<Logger>>> =
    Lazy::new(|| RwLock::new(Arc::new(Logger::stderr(LoggerConfig::default()))));

/// The process-default logger: stderr, default configuration, until replaced.
pub fn default_logger() -> Arc<Logger> {
    DEFAULT_LOGGER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replace the process-default logger, returning the previous one.
pub fn set_default_logger(logger: Logger) -> Arc<Logger> {
    let mut slot = DEFAULT_LOGGER.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, Arc::new(logger))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::SharedBuffer;
    use sl_common::{OutputFormat, TimestampResolution};

    fn logger(config: LoggerConfig) -> (Logger, SharedBuffer) {
        let buffer = SharedBuffer::new();
        (Logger::new(config, buffer.clone()), buffer)
    }

    fn parse(line: &str) -> serde_json::Value {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn test_info_record() {
        let (logger, buffer) = logger(LoggerConfig::default());
        logger.info(
            "login",
            &[Field::str("user_email", "a@b.com"), Field::int64("attempt", 3)],
        );
        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        let v = parse(&lines[0]);
        assert_eq!(v["level"], "info");
        assert_eq!(v["msg"], "login");
        assert_eq!(v["user_email"], "***PII***");
        assert_eq!(v["attempt"], 3);
        assert!(v["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_below_threshold_does_no_work() {
        let (logger, buffer) = logger(LoggerConfig::default().with_level(Level::Warn));
        logger.info("skipped", &[Field::str("user_email", "a@b.com")]);
        logger.debug("skipped", &[Field::str("password", "x")]);
        assert!(buffer.contents().is_empty());
        assert_eq!(logger.cache_len(), 0);
        assert_eq!(logger.clock.cached_unit(), None);
        assert_eq!(logger.pool.idle(), 0);

        logger.warn("kept", &[]);
        assert_eq!(buffer.lines().len(), 1);
    }

    #[test]
    fn test_millisecond_timestamps() {
        let config = LoggerConfig::default().with_timestamp_resolution(TimestampResolution::Millis);
        let (logger, buffer) = logger(config);
        let before = chrono::Utc::now();
        logger.info("tick", &[]);
        let after = chrono::Utc::now();

        let v = parse(&buffer.lines()[0]);
        let stamp = v["timestamp"].as_str().unwrap();
        assert_eq!(stamp.len(), "2024-03-09T08:15:02.417Z".len(), "{}", stamp);
        assert_eq!(&stamp[19..20], ".");
        let at = chrono::DateTime::parse_from_rfc3339(stamp).unwrap();
        // Within one cached unit of the call.
        assert!(at.timestamp_millis() >= before.timestamp_millis() - 1);
        assert!(at.timestamp_millis() <= after.timestamp_millis());
    }

    #[test]
    fn test_caller_captured() {
        let (logger, buffer) = logger(LoggerConfig::default().with_caller(true));
        let line = line!() + 1;
        logger.error("failed", &[]);
        let v = parse(&buffer.lines()[0]);
        assert!(v["file"].as_str().unwrap().ends_with("logger.rs"));
        assert_eq!(v["line"], line);
        assert!(v.get("function").is_none());
    }

    #[test]
    fn test_explicit_caller_function() {
        let (logger, buffer) = logger(LoggerConfig::default().with_caller(true));
        let caller = Caller::here().with_function("app::job");
        logger.log_with_caller(Level::Info, "ran", &[], caller);
        let v = parse(&buffer.lines()[0]);
        assert_eq!(v["function"], "app::job");
    }

    #[test]
    fn test_reconfigure() {
        let (logger, buffer) = logger(LoggerConfig::default());
        logger.info("a", &[Field::str("user_email", "a@b.com")]);

        let next = LoggerConfig::default()
            .with_format(OutputFormat::Plain)
            .with_redaction(RedactionPolicy::default().with_mask_pii(false));
        logger.reconfigure(next).unwrap();
        logger.info("b", &[Field::str("user_email", "a@b.com")]);

        let lines = buffer.lines();
        assert!(lines[0].contains("***PII***"));
        assert!(lines[1].ends_with("| b [user_email=a@b.com]"), "{}", lines[1]);
    }

    #[test]
    fn test_reconfigure_rejects_invalid() {
        let (logger, _) = logger(LoggerConfig::default());
        let bad = LoggerConfig::default().with_component("a\nb", "");
        assert!(logger.reconfigure(bad).is_err());
        assert!(logger.config().component.is_empty());
    }

    #[test]
    fn test_pattern_management() {
        let (logger, buffer) = logger(LoggerConfig::default());
        logger.info("m", &[Field::str("tenant", "acme")]);
        logger.add_sensitive_patterns(["tenant"]);
        logger.info("m", &[Field::str("tenant", "acme")]);
        logger.set_sensitive_masking(false);
        logger.info("m", &[Field::str("tenant", "acme")]);

        let lines = buffer.lines();
        assert_eq!(parse(&lines[0])["tenant"], "acme");
        assert_eq!(parse(&lines[1])["tenant"], "***MASKED***");
        assert_eq!(parse(&lines[2])["tenant"], "acme");
        assert!(logger.config().redaction.sensitive_patterns.matches("tenant"));
    }

    #[test]
    fn test_log_map() {
        let (logger, buffer) = logger(LoggerConfig::default());
        let map = serde_json::json!({"ssn": "123", "count": 2, "tags": ["x"]});
        logger.log_map(Level::Info, "map", map.as_object().unwrap());
        let v = parse(&buffer.lines()[0]);
        assert_eq!(v["ssn"], "***PII***");
        assert_eq!(v["count"], 2);
        assert_eq!(v["tags"], serde_json::json!(["x"]));
    }

    #[test]
    fn test_large_record_is_one_line() {
        let (logger, buffer) = logger(LoggerConfig::default());
        let payload = "x".repeat(5000);
        logger.info("big", &[Field::str("payload", payload.as_str())]);
        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(parse(&lines[0])["payload"].as_str().unwrap().len(), 5000);
    }

    #[test]
    fn test_default_logger_replace() {
        let buffer = SharedBuffer::new();
        set_default_logger(Logger::new(LoggerConfig::default(), buffer.clone()));
        default_logger().warn("via default", &[]);
        assert!(buffer.contents().contains("via default"));
    }
}
