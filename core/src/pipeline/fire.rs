use crate::feeds::fire::{FireDetection, FireFeed};
use crate::map::{GroupId, Shape};
use crate::pipeline::state::DashboardState;
use crate::prelude::FeedResult;
use crate::telemetry::LogManager;
use chrono::Local;

pub async fn run<F: FireFeed + Sync>(feed: &F) -> FeedResult<Vec<FireDetection>> {
    feed.fetch_fire_detections().await
}

/// Applies a fire fetch outcome. An empty result (the stub path) leaves the
/// group untouched; failures are logged as warnings and never reach the
/// user.
pub fn apply(state: &mut DashboardState, outcome: FeedResult<Vec<FireDetection>>) {
    let logger = LogManager::new();
    match outcome {
        Ok(detections) if detections.is_empty() => {}
        Ok(detections) => {
            state.map_mut().clear(GroupId::Fires);
            for detection in &detections {
                state.map_mut().add(
                    GroupId::Fires,
                    Shape::Marker {
                        position: detection.position,
                        popup: popup_text(detection),
                    },
                );
            }
            logger.record(&format!(
                "fire feed applied: {} detections",
                detections.len()
            ));
        }
        Err(err) => {
            logger.warn(&format!("fire feed unavailable: {}", err));
        }
    }
}

fn popup_text(detection: &FireDetection) -> String {
    let detected = detection
        .detected_at
        .map(|stamp| {
            stamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_default();
    format!(
        "Fire detection\nConfidence: {:.0}\n{}",
        detection.confidence, detected
    )
}
