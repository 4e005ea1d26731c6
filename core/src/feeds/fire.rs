use crate::map::LatLng;
use crate::prelude::FeedResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One satellite fire detection. Interface contract only; no concrete wire
/// format is assumed until a detection feed is wired in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireDetection {
    pub position: LatLng,
    pub confidence: f64,
    pub detected_at: Option<DateTime<Utc>>,
}

/// Seam for whichever satellite fire-detection feed is eventually chosen.
#[async_trait]
pub trait FireFeed {
    async fn fetch_fire_detections(&self) -> FeedResult<Vec<FireDetection>>;
}

/// Placeholder feed: performs no network call and reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubFireFeed;

#[async_trait]
impl FireFeed for StubFireFeed {
    async fn fetch_fire_detections(&self) -> FeedResult<Vec<FireDetection>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_feed_reports_nothing() {
        let detections = StubFireFeed.fetch_fire_detections().await.unwrap();
        assert!(detections.is_empty());
    }
}
