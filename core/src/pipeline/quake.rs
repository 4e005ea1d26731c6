use crate::feeds::quake::{QuakeClient, QuakeEvent};
use crate::map::{GroupId, LatLngBounds, Shape};
use crate::pipeline::state::{DashboardState, PanelContent, RequestToken};
use crate::prelude::{FeedResult, FilterState};
use crate::telemetry::LogManager;
use chrono::Local;

/// Zoom applied when a list entry recenters the viewport on its event.
pub const FOCUS_ZOOM: f64 = 7.0;
/// Padding ratio applied around the fitted quake bounds.
const FIT_PADDING: f64 = 0.2;

pub const EMPTY_MESSAGE: &str = "No earthquakes found.";
pub const FAILURE_MESSAGE: &str = "Earthquake data could not be loaded.";

/// Starts a quake refresh: clears the overlay group, shows the loading
/// indicator before the network call resolves, and issues a fresh token.
pub fn begin(state: &mut DashboardState) -> RequestToken {
    state.map_mut().clear(GroupId::Quakes);
    state.set_quake_panel(PanelContent::Loading);
    state.issue_quake_token()
}

/// The network leg, separated from `begin`/`apply` so callers can run it as
/// a detached task (iced) or await it inline (monitor).
pub async fn fetch(client: &QuakeClient, filters: FilterState) -> FeedResult<Vec<QuakeEvent>> {
    client.fetch(&filters).await
}

/// Applies a fetch outcome. Outcomes whose token is no longer the latest
/// issued are discarded silently; a newer invocation owns the surface.
pub fn apply(state: &mut DashboardState, token: RequestToken, outcome: FeedResult<Vec<QuakeEvent>>) {
    let logger = LogManager::new();
    if !state.quake_token_is_current(token) {
        state.metrics().record_stale_discard();
        logger.debug("discarding stale quake response");
        return;
    }

    match outcome {
        Ok(events) => {
            state.metrics().record_fetch();
            state.map_mut().clear(GroupId::Quakes);
            if events.is_empty() {
                state.set_quake_panel(PanelContent::Message(EMPTY_MESSAGE.to_string()));
                return;
            }

            let mut bounds: Option<LatLngBounds> = None;
            for event in &events {
                state.map_mut().add(
                    GroupId::Quakes,
                    Shape::Marker {
                        position: event.position,
                        popup: popup_text(event),
                    },
                );
                state.map_mut().add(
                    GroupId::Quakes,
                    Shape::Circle {
                        center: event.position,
                        radius_m: event.impact_radius_m(),
                    },
                );
                match bounds.as_mut() {
                    Some(bounds) => bounds.extend(event.position),
                    None => bounds = Some(LatLngBounds::of(event.position)),
                }
            }
            if let Some(bounds) = bounds {
                state.map_mut().fit_bounds(&bounds.pad(FIT_PADDING));
            }
            logger.record(&format!("quake feed applied: {} events", events.len()));
            state.set_quake_panel(PanelContent::Entries(events));
        }
        Err(err) => {
            state.metrics().record_failure();
            logger.error(&format!("quake feed error: {}", err));
            state.set_quake_panel(PanelContent::Message(FAILURE_MESSAGE.to_string()));
        }
    }
}

/// Recenters the viewport on list entry `index` and opens its marker popup.
pub fn focus(state: &mut DashboardState, index: usize) {
    let position = match state.quake_panel().entries().get(index) {
        Some(event) => event.position,
        None => return,
    };
    state.map_mut().set_view(position, FOCUS_ZOOM);
    // marker precedes circle, so the marker of event i sits at shape 2*i
    state.map_mut().open_popup(GroupId::Quakes, index * 2);
}

/// Popup body: place, magnitude, depth, local timestamp, detail link.
pub fn popup_text(event: &QuakeEvent) -> String {
    let occurred = event
        .occurred_at
        .map(|stamp| {
            stamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_default();
    format!(
        "{}\nMagnitude: {}\nDepth: {:.0} km\n{}\n{}",
        event.place_label(),
        event.magnitude_label(),
        event.depth_km,
        occurred,
        event.detail_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::LatLng;
    use crate::prelude::FeedError;
    use chrono::{TimeZone, Utc};

    fn event(lat: f64, lng: f64, magnitude: f64) -> QuakeEvent {
        QuakeEvent {
            position: LatLng::new(lat, lng),
            depth_km: 10.0,
            magnitude: Some(magnitude),
            place: Some("X".to_string()),
            occurred_at: Utc.timestamp_millis_opt(1_700_000_000_000).single(),
            detail_url: "http://u".to_string(),
        }
    }

    #[test]
    fn apply_populates_two_shapes_per_event_in_feed_order() {
        let mut state = DashboardState::new();
        let token = begin(&mut state);
        let events = vec![event(39.0, 35.0, 6.2), event(40.5, 29.1, 4.0)];
        apply(&mut state, token, Ok(events));

        let group = state.map().group(GroupId::Quakes);
        assert_eq!(group.len(), 4);
        assert_eq!(state.quake_panel().entries().len(), 2);
        assert!(matches!(
            group.shapes()[0],
            Shape::Marker { position, .. } if position == LatLng::new(39.0, 35.0)
        ));
        assert!(matches!(
            group.shapes()[1],
            Shape::Circle { radius_m, .. } if radius_m == 62_000.0
        ));
        assert!(matches!(
            group.shapes()[2],
            Shape::Marker { position, .. } if position == LatLng::new(40.5, 29.1)
        ));
    }

    #[test]
    fn apply_empty_result_shows_message_and_keeps_viewport() {
        let mut state = DashboardState::new();
        let before = state.map().viewport();
        let token = begin(&mut state);
        apply(&mut state, token, Ok(Vec::new()));

        assert_eq!(state.quake_panel().message(), Some(EMPTY_MESSAGE));
        assert!(state.map().group(GroupId::Quakes).is_empty());
        assert_eq!(state.map().viewport(), before);
    }

    #[test]
    fn apply_failure_shows_failure_message() {
        let mut state = DashboardState::new();
        let token = begin(&mut state);
        apply(
            &mut state,
            token,
            Err(FeedError::Transport("connection refused".into())),
        );
        assert_eq!(state.quake_panel().message(), Some(FAILURE_MESSAGE));
        assert_eq!(state.metrics().snapshot(), (0, 1, 0));
    }

    #[test]
    fn stale_response_is_discarded_silently() {
        let mut state = DashboardState::new();
        let stale = begin(&mut state);
        let fresh = begin(&mut state);
        apply(&mut state, fresh, Ok(vec![event(39.0, 35.0, 6.2)]));
        apply(&mut state, stale, Ok(vec![event(10.0, 10.0, 1.0)]));

        // the fresh result stays on the surface, the stale one is dropped
        assert_eq!(state.map().group(GroupId::Quakes).len(), 2);
        assert_eq!(state.quake_panel().entries()[0].position.lat, 39.0);
        assert_eq!(state.metrics().snapshot(), (1, 0, 1));
    }

    #[test]
    fn focus_recenters_at_zoom_seven_and_opens_popup() {
        let mut state = DashboardState::new();
        let token = begin(&mut state);
        apply(&mut state, token, Ok(vec![event(39.0, 35.0, 6.2)]));

        focus(&mut state, 0);
        assert_eq!(state.map().viewport().center, LatLng::new(39.0, 35.0));
        assert_eq!(state.map().viewport().zoom, FOCUS_ZOOM);
        assert_eq!(state.map().popup(), Some((GroupId::Quakes, 0)));
    }

    #[test]
    fn focus_on_missing_entry_is_a_no_op() {
        let mut state = DashboardState::new();
        let before = state.map().viewport();
        focus(&mut state, 5);
        assert_eq!(state.map().viewport(), before);
        assert!(state.map().popup().is_none());
    }

    #[test]
    fn popup_lists_place_magnitude_depth_and_link() {
        let text = popup_text(&event(39.0, 35.0, 6.2));
        assert!(text.contains("X"));
        assert!(text.contains("6.2"));
        assert!(text.contains("10"));
        assert!(text.contains("http://u"));
    }

    #[test]
    fn single_feature_scenario_end_to_end() {
        let mut state = DashboardState::new();
        let token = begin(&mut state);
        assert!(matches!(state.quake_panel(), PanelContent::Loading));

        apply(&mut state, token, Ok(vec![event(39.0, 35.0, 6.2)]));
        let group = state.map().group(GroupId::Quakes);
        assert_eq!(group.len(), 2);
        let Shape::Marker { position, popup } = &group.shapes()[0] else {
            panic!("expected marker first");
        };
        assert_eq!(*position, LatLng::new(39.0, 35.0));
        assert!(popup.contains("X") && popup.contains("6.2") && popup.contains("10"));
        assert!(matches!(
            group.shapes()[1],
            Shape::Circle { radius_m, .. } if radius_m == 62_000.0
        ));

        focus(&mut state, 0);
        assert_eq!(state.map().viewport().zoom, 7.0);
    }
}
