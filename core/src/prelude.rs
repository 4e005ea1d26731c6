use serde::{Deserialize, Serialize};

/// Minimum magnitude applied when the filter input is missing or invalid.
pub const DEFAULT_MIN_MAGNITUDE: f64 = 3.0;

/// Result limit applied when the filter input is missing or invalid.
pub const DEFAULT_MAX_COUNT: u32 = 50;

/// Filter values owned by the refresh controller and read by the quake
/// pipeline on each invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub min_magnitude: f64,
    pub max_count: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            min_magnitude: DEFAULT_MIN_MAGNITUDE,
            max_count: DEFAULT_MAX_COUNT,
        }
    }
}

impl FilterState {
    /// Parses the two filter text inputs. Unparseable or out-of-range values
    /// fall back to the defaults rather than failing the refresh.
    pub fn from_inputs(min_magnitude: &str, max_count: &str) -> Self {
        let min_magnitude = min_magnitude
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|m| *m >= 0.0)
            .unwrap_or(DEFAULT_MIN_MAGNITUDE);
        let max_count = max_count
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .unwrap_or(DEFAULT_MAX_COUNT);
        Self {
            min_magnitude,
            max_count,
        }
    }
}

/// Common error type for feed pipelines.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("feed credential missing")]
    MissingCredential,
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FeedError::Malformed(err.to_string())
        } else {
            FeedError::Transport(err.to_string())
        }
    }
}

pub type FeedResult<T> = Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_parse_valid_inputs() {
        let filters = FilterState::from_inputs("5", "10");
        assert_eq!(filters.min_magnitude, 5.0);
        assert_eq!(filters.max_count, 10);
    }

    #[test]
    fn filters_fall_back_on_garbage() {
        let filters = FilterState::from_inputs("abc", "");
        assert_eq!(filters.min_magnitude, DEFAULT_MIN_MAGNITUDE);
        assert_eq!(filters.max_count, DEFAULT_MAX_COUNT);
    }

    #[test]
    fn filters_reject_out_of_range_values() {
        let filters = FilterState::from_inputs("-2", "0");
        assert_eq!(filters.min_magnitude, DEFAULT_MIN_MAGNITUDE);
        assert_eq!(filters.max_count, DEFAULT_MAX_COUNT);
    }

    #[test]
    fn filters_accept_fractional_magnitude() {
        let filters = FilterState::from_inputs(" 4.5 ", "25");
        assert_eq!(filters.min_magnitude, 4.5);
        assert_eq!(filters.max_count, 25);
    }
}
