pub mod fire;
pub mod news;
pub mod quake;
pub mod refresh;
pub mod state;

pub use refresh::{PipelineKind, RefreshController, Trigger, REFRESH_INTERVAL};
pub use state::{DashboardState, PanelContent, RequestToken, ViewKind};
