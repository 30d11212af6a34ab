//! Duration measurement for dump calls.
//!
//! Every enumerator takes an optional [`StopWatchEntry`] and wraps its body
//! in a [`TimeLog`] guard, which reports the elapsed time exactly once when
//! the call returns, on success and on failure alike.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

/// Receives one elapsed-time observation per dump call.
#[cfg_attr(test, mockall::automock)]
pub trait StopWatchEntry {
    fn log_time_entry(&self, elapsed: Duration);
}

/// Scoped timer reporting to a [`StopWatchEntry`] when dropped.
#[must_use = "the elapsed time is recorded when the guard is dropped"]
pub struct TimeLog<'a> {
    start: Instant,
    entry: Option<&'a dyn StopWatchEntry>,
}

impl<'a> TimeLog<'a> {
    pub fn start(entry: Option<&'a dyn StopWatchEntry>) -> Self {
        Self {
            start: Instant::now(),
            entry,
        }
    }
}

impl Drop for TimeLog<'_> {
    fn drop(&mut self) {
        if let Some(entry) = self.entry {
            entry.log_time_entry(self.start.elapsed());
        }
    }
}

/// Snapshot of a [`DumpTimer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimerStats {
    pub calls: u64,
    pub total_us: u64,
    pub max_us: u64,
    pub last_us: u64,
}

impl TimerStats {
    /// Average duration per call in microseconds.
    pub fn avg_us(&self) -> u64 {
        if self.calls == 0 {
            return 0;
        }
        self.total_us / self.calls
    }
}

/// Aggregating [`StopWatchEntry`] backed by atomic counters.
#[derive(Debug)]
pub struct DumpTimer {
    name: String,
    calls: AtomicU64,
    total_us: AtomicU64,
    max_us: AtomicU64,
    last_us: AtomicU64,
}

impl DumpTimer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: AtomicU64::new(0),
            total_us: AtomicU64::new(0),
            max_us: AtomicU64::new(0),
            last_us: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> TimerStats {
        TimerStats {
            calls: self.calls.load(Ordering::Relaxed),
            total_us: self.total_us.load(Ordering::Relaxed),
            max_us: self.max_us.load(Ordering::Relaxed),
            last_us: self.last_us.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
        self.total_us.store(0, Ordering::Relaxed);
        self.max_us.store(0, Ordering::Relaxed);
        self.last_us.store(0, Ordering::Relaxed);
    }
}

impl StopWatchEntry for DumpTimer {
    fn log_time_entry(&self, elapsed: Duration) {
        let us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.total_us.fetch_add(us, Ordering::Relaxed);
        self.max_us.fetch_max(us, Ordering::Relaxed);
        self.last_us.store(us, Ordering::Relaxed);
        debug!(timer = %self.name, elapsed_us = us, "Dump time entry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_time_log_records_once_on_drop() {
        let mut mock = MockStopWatchEntry::new();
        mock.expect_log_time_entry().times(1).return_const(());

        {
            let _time_log = TimeLog::start(Some(&mock));
        }
        mock.checkpoint();
    }

    #[test]
    fn test_time_log_without_entry() {
        let _time_log = TimeLog::start(None);
    }

    #[test]
    fn test_dump_timer_aggregates() {
        let timer = DumpTimer::new("l2");
        timer.log_time_entry(Duration::from_micros(100));
        timer.log_time_entry(Duration::from_micros(300));

        let stats = timer.stats();
        assert_eq!(stats.calls, 2);
        assert_eq!(stats.total_us, 400);
        assert_eq!(stats.max_us, 300);
        assert_eq!(stats.last_us, 300);
        assert_eq!(stats.avg_us(), 200);
    }

    #[test]
    fn test_dump_timer_reset() {
        let timer = DumpTimer::new("l2");
        timer.log_time_entry(Duration::from_millis(1));
        timer.reset();
        assert_eq!(timer.stats(), TimerStats::default());
        assert_eq!(timer.stats().avg_us(), 0);
    }
}
