use crate::prelude::FilterState;
use std::time::Duration;

/// Periodic refresh cadence for the quake and news pipelines.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// What caused a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    ApplyFilters,
    Periodic,
}

/// Pipelines a trigger fans out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    Quake,
    Fire,
    News,
}

impl Trigger {
    /// Pipelines re-invoked for this trigger. They are launched together,
    /// do not wait for one another, and may complete in any order.
    pub fn pipelines(self) -> &'static [PipelineKind] {
        match self {
            Trigger::Startup => &[PipelineKind::Quake, PipelineKind::Fire, PipelineKind::News],
            Trigger::ApplyFilters => &[PipelineKind::Quake],
            Trigger::Periodic => &[PipelineKind::Quake, PipelineKind::News],
        }
    }
}

/// Owns the current filter values and the trigger fan-out.
#[derive(Debug, Clone, Default)]
pub struct RefreshController {
    filters: FilterState,
}

impl RefreshController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> FilterState {
        self.filters
    }

    /// Parses the two filter inputs (falling back to the defaults) and keeps
    /// the result as the current filter state.
    pub fn apply_inputs(&mut self, min_magnitude: &str, max_count: &str) -> FilterState {
        self.filters = FilterState::from_inputs(min_magnitude, max_count);
        self.filters
    }
}
