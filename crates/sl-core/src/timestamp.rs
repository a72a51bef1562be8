//! Shared "current time" text, reformatted at most once per time unit.
//!
//! The cache keeps the last unit in an atomic marker and the formatted text
//! behind a reader/writer lock. When the unit changes, the thread that wins
//! the compare-and-swap on the marker formats and stores the new text;
//! everyone else keeps reading what is stored, at most one unit off.
//! Readers never block: a contended lock means formatting locally.

use chrono::{DateTime, Utc};
use sl_common::TimestampResolution;
use std::fmt::{self, Write as _};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock};

const STAMP_CAPACITY: usize = 32;

/// A formatted timestamp held inline.
#[derive(Clone, Copy)]
pub struct Stamp {
    bytes: [u8; STAMP_CAPACITY],
    len: u8,
    unit: i64,
    resolution: TimestampResolution,
}

impl Stamp {
    const EMPTY: Stamp = Stamp {
        bytes: [0; STAMP_CAPACITY],
        len: 0,
        unit: i64::MIN,
        resolution: TimestampResolution::Seconds,
    };

    /// Format the start of `unit` at `resolution`.
    fn format(unit: i64, resolution: TimestampResolution) -> Stamp {
        let mut stamp = Stamp {
            unit,
            resolution,
            ..Stamp::EMPTY
        };
        let Some(at) = DateTime::<Utc>::from_timestamp_millis(
            unit.saturating_mul(resolution.unit_millis()),
        ) else {
            return stamp;
        };
        let pattern = match resolution {
            TimestampResolution::Seconds => "%Y-%m-%dT%H:%M:%SZ",
            TimestampResolution::Millis => "%Y-%m-%dT%H:%M:%S%.3fZ",
        };
        if write!(stamp, "{}", at.format(pattern)).is_err() {
            stamp.len = 0;
        }
        stamp
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or_default()
    }
}

impl fmt::Write for Stamp {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let start = self.len as usize;
        let end = start + s.len();
        if end > STAMP_CAPACITY {
            return Err(fmt::Error);
        }
        self.bytes[start..end].copy_from_slice(s.as_bytes());
        self.len = end as u8;
        Ok(())
    }
}

impl fmt::Debug for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Stamp").field(&self.as_str()).finish()
    }
}

/// Timestamp cache shared by every encode call of a logger.
pub struct TimestampCache {
    marker: AtomicI64,
    current: RwLock<Stamp>,
}

impl TimestampCache {
    pub fn new() -> Self {
        TimestampCache {
            marker: AtomicI64::new(i64::MIN),
            current: RwLock::new(Stamp::EMPTY),
        }
    }

    /// Formatted current time.
    pub fn now(&self, resolution: TimestampResolution) -> Stamp {
        self.stamp_at(Utc::now(), resolution)
    }

    /// Formatted text for `at`, served from the cache when `at` falls in the
    /// stored unit.
    pub fn stamp_at(&self, at: DateTime<Utc>, resolution: TimestampResolution) -> Stamp {
        let unit = at.timestamp_millis().div_euclid(resolution.unit_millis());
        let seen = self.marker.load(Ordering::Acquire);

        if seen != unit
            && self
                .marker
                .compare_exchange(seen, unit, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        {
            let stamp = Stamp::format(unit, resolution);
            let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *slot = stamp;
            return stamp;
        }

        // Same unit, or lost the race: read what is stored. A loser accepts
        // text at most one unit away from its own.
        match self.current.try_read() {
            Ok(stored) if stored.resolution == resolution && stored.unit != i64::MIN => {
                if stored.unit == unit || (seen != unit && stored.unit.abs_diff(unit) <= 1) {
                    return *stored;
                }
                Stamp::format(unit, resolution)
            }
            _ => Stamp::format(unit, resolution),
        }
    }

    /// Unit of the stored stamp, `None` before the first format.
    #[cfg(test)]
    pub(crate) fn cached_unit(&self) -> Option<i64> {
        let unit = self.marker.load(Ordering::Acquire);
        (unit != i64::MIN).then_some(unit)
    }
}

impl Default for TimestampCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32, ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, h, m, s).unwrap() + chrono::Duration::milliseconds(ms)
    }

    #[test]
    fn test_seconds_format() {
        let cache = TimestampCache::new();
        let stamp = cache.stamp_at(at(8, 15, 2, 417), TimestampResolution::Seconds);
        assert_eq!(stamp.as_str(), "2024-03-09T08:15:02Z");
    }

    #[test]
    fn test_millis_format() {
        let cache = TimestampCache::new();
        let stamp = cache.stamp_at(at(8, 15, 2, 7), TimestampResolution::Millis);
        assert_eq!(stamp.as_str(), "2024-03-09T08:15:02.007Z");
    }

    #[test]
    fn test_same_unit_served_from_cache() {
        let cache = TimestampCache::new();
        let first = cache.stamp_at(at(8, 15, 2, 0), TimestampResolution::Seconds);
        let second = cache.stamp_at(at(8, 15, 2, 999), TimestampResolution::Seconds);
        assert_eq!(first.as_str(), second.as_str());
        assert_eq!(
            cache.marker.load(Ordering::Relaxed),
            at(8, 15, 2, 0).timestamp()
        );
    }

    #[test]
    fn test_unit_change_reformats() {
        let cache = TimestampCache::new();
        cache.stamp_at(at(8, 15, 2, 0), TimestampResolution::Seconds);
        let next = cache.stamp_at(at(8, 15, 3, 0), TimestampResolution::Seconds);
        assert_eq!(next.as_str(), "2024-03-09T08:15:03Z");
    }

    #[test]
    fn test_resolution_switch() {
        let cache = TimestampCache::new();
        cache.stamp_at(at(1, 0, 0, 0), TimestampResolution::Seconds);
        let ms = cache.stamp_at(at(1, 0, 0, 250), TimestampResolution::Millis);
        assert_eq!(ms.as_str(), "2024-03-09T01:00:00.250Z");
    }

    #[test]
    fn test_now_is_plausible() {
        let cache = TimestampCache::new();
        let stamp = cache.now(TimestampResolution::Seconds);
        assert_eq!(stamp.as_str().len(), "2024-03-09T08:15:02Z".len());
        assert!(stamp.as_str().ends_with('Z'));
    }

    #[test]
    fn test_stale_entry_not_served_for_same_unit() {
        let cache = TimestampCache::new();
        cache.stamp_at(at(8, 0, 0, 0), TimestampResolution::Seconds);
        // Another thread won the marker for 08:00:05 but has not stored yet.
        let later = at(8, 0, 5, 0);
        cache.marker.store(later.timestamp(), Ordering::Release);
        let stamp = cache.stamp_at(later, TimestampResolution::Seconds);
        assert_eq!(stamp.as_str(), "2024-03-09T08:00:05Z");
    }

    fn within_one_unit(resolution: TimestampResolution, spread_ms: i64) {
        let cache = std::sync::Arc::new(TimestampCache::new());
        let base = at(12, 0, 0, 0);
        let handles: Vec<_> = (0..8i64)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    let mut bad = Vec::new();
                    for i in 0..20_000i64 {
                        let input = base + chrono::Duration::milliseconds((i * 37 + t * 101) % spread_ms);
                        let stamp = cache.stamp_at(input, resolution);
                        let parsed = DateTime::parse_from_rfc3339(stamp.as_str()).unwrap();
                        let unit = resolution.unit_millis();
                        let drift = parsed.timestamp_millis().div_euclid(unit)
                            - input.timestamp_millis().div_euclid(unit);
                        if drift.abs() > 1 {
                            bad.push((input, stamp.as_str().to_string()));
                        }
                    }
                    bad
                })
            })
            .collect();
        for handle in handles {
            let bad = handle.join().unwrap();
            assert!(bad.is_empty(), "{:?}", &bad[..bad.len().min(5)]);
        }
    }

    #[test]
    fn test_concurrent_unit_changes_seconds() {
        within_one_unit(TimestampResolution::Seconds, 5_000);
    }

    #[test]
    fn test_concurrent_unit_changes_millis() {
        within_one_unit(TimestampResolution::Millis, 50);
    }

    #[test]
    fn test_concurrent_readers_agree() {
        let cache = std::sync::Arc::new(TimestampCache::new());
        let fixed = at(12, 0, 0, 0);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    (0..200)
                        .map(|_| cache.stamp_at(fixed, TimestampResolution::Seconds).as_str().to_string())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            for s in handle.join().unwrap() {
                assert_eq!(s, "2024-03-09T12:00:00Z");
            }
        }
    }
}
