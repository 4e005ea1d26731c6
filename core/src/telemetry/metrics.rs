use std::sync::Mutex;

/// Counters over pipeline activity: applied fetches, failures, and responses
/// discarded because a newer request superseded them.
#[derive(Debug)]
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Default)]
struct Metrics {
    fetches: usize,
    failures: usize,
    stale_discards: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_fetch(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.fetches += 1;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failures += 1;
        }
    }

    pub fn record_stale_discard(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.stale_discards += 1;
        }
    }

    /// (fetches, failures, stale_discards)
    pub fn snapshot(&self) -> (usize, usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (metrics.fetches, metrics.failures, metrics.stale_discards)
        } else {
            (0, 0, 0)
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
