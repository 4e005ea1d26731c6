use log::{debug, error, info, warn};

/// Thin facade over the `log` macros so pipelines report uniformly.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    pub fn error(&self, message: &str) {
        error!("{}", message);
    }

    pub fn debug(&self, message: &str) {
        debug!("{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
