//! Feed-processing core for the disaster map dashboard.
//!
//! Quake, fire, and news feed pipelines over a shared map surface, with
//! typed feed models, explicit application state, and guarded refresh
//! semantics.

pub mod feeds;
pub mod map;
pub mod pipeline;
pub mod prelude;
pub mod telemetry;

pub use prelude::{FeedError, FeedResult, FilterState};
