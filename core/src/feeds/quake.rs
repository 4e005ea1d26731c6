use crate::map::LatLng;
use crate::prelude::{FeedResult, FilterState};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

/// Base endpoint of the USGS FDSN event service.
pub const USGS_ENDPOINT: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

/// Floor of the impact circle radius in meters.
const MIN_IMPACT_RADIUS_M: f64 = 5_000.0;
/// Meters of impact radius per magnitude unit.
const RADIUS_PER_MAGNITUDE_M: f64 = 10_000.0;
/// Magnitude substituted when the feed omits one.
const FALLBACK_MAGNITUDE: f64 = 3.0;

/// One seismic event mapped out of a feed feature. Transient: rebuilt on
/// every fetch, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct QuakeEvent {
    pub position: LatLng,
    pub depth_km: f64,
    pub magnitude: Option<f64>,
    pub place: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub detail_url: String,
}

impl QuakeEvent {
    /// Display radius of the impact circle in meters. A deliberately crude
    /// visual proxy for affected area, not a physical model.
    pub fn impact_radius_m(&self) -> f64 {
        impact_radius_m(self.magnitude)
    }

    pub fn place_label(&self) -> &str {
        self.place.as_deref().unwrap_or("Unknown location")
    }

    pub fn magnitude_label(&self) -> String {
        match self.magnitude {
            Some(magnitude) => format!("{:.1}", magnitude),
            None => "-".to_string(),
        }
    }
}

/// `max(5000, magnitude * 10000)`, with 3.0 standing in for a missing value.
pub fn impact_radius_m(magnitude: Option<f64>) -> f64 {
    (magnitude.unwrap_or(FALLBACK_MAGNITUDE) * RADIUS_PER_MAGNITUDE_M).max(MIN_IMPACT_RADIUS_M)
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    // [lng, lat, depth_km]; depth may be absent on some events
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    #[serde(default)]
    mag: Option<f64>,
    #[serde(default)]
    place: Option<String>,
    #[serde(default)]
    time: Option<i64>,
    #[serde(default)]
    url: Option<String>,
}

fn event_from_feature(feature: Feature) -> Option<QuakeEvent> {
    let lng = *feature.geometry.coordinates.first()?;
    let lat = *feature.geometry.coordinates.get(1)?;
    let depth_km = feature.geometry.coordinates.get(2).copied().unwrap_or(0.0);
    let occurred_at = feature
        .properties
        .time
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single());
    Some(QuakeEvent {
        position: LatLng::new(lat, lng),
        depth_km,
        magnitude: feature.properties.mag,
        place: feature.properties.place,
        occurred_at,
        detail_url: feature.properties.url.unwrap_or_default(),
    })
}

/// HTTP client for the seismic feed.
#[derive(Debug, Clone)]
pub struct QuakeClient {
    http: reqwest::Client,
    endpoint: String,
}

impl QuakeClient {
    pub fn new() -> Self {
        Self::with_endpoint(USGS_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Full request URL for the given filters, newest events first.
    pub fn request_url(&self, filters: &FilterState) -> String {
        format!(
            "{}?format=geojson&minmagnitude={}&limit={}&orderby=time",
            self.endpoint, filters.min_magnitude, filters.max_count
        )
    }

    /// Fetches and maps the feature collection; features without coordinates
    /// are dropped rather than failing the whole response.
    pub async fn fetch(&self, filters: &FilterState) -> FeedResult<Vec<QuakeEvent>> {
        let response = self.http.get(self.request_url(filters)).send().await?;
        let collection = response.json::<FeatureCollection>().await?;
        Ok(collection
            .features
            .into_iter()
            .filter_map(event_from_feature)
            .collect())
    }
}

impl Default for QuakeClient {
    fn default() -> Self {
        Self::new()
    }
}
