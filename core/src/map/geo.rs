use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Geographic bounding box grown incrementally from shape positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLngBounds {
    /// Degenerate box containing a single point.
    pub fn of(point: LatLng) -> Self {
        Self {
            south: point.lat,
            west: point.lng,
            north: point.lat,
            east: point.lng,
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = LatLng>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bounds = Self::of(iter.next()?);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Grows the box to include `point`.
    pub fn extend(&mut self, point: LatLng) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lng);
        self.east = self.east.max(point.lng);
    }

    /// Returns a copy grown on every side by `ratio` of the respective span.
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_margin = self.lat_span() * ratio;
        let lng_margin = self.lng_span() * ratio;
        Self {
            south: self.south - lat_margin,
            west: self.west - lng_margin,
            north: self.north + lat_margin,
            east: self.east + lng_margin,
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_extend_grows_box() {
        let mut bounds = LatLngBounds::of(LatLng::new(39.0, 35.0));
        bounds.extend(LatLng::new(41.0, 29.0));
        assert_eq!(bounds.south, 39.0);
        assert_eq!(bounds.north, 41.0);
        assert_eq!(bounds.west, 29.0);
        assert_eq!(bounds.east, 35.0);
    }

    #[test]
    fn bounds_pad_adds_span_margin() {
        let bounds = LatLngBounds {
            south: 30.0,
            west: 20.0,
            north: 40.0,
            east: 40.0,
        };
        let padded = bounds.pad(0.2);
        assert_eq!(padded.south, 28.0);
        assert_eq!(padded.north, 42.0);
        assert_eq!(padded.west, 16.0);
        assert_eq!(padded.east, 44.0);
    }

    #[test]
    fn bounds_from_points_handles_empty_and_center() {
        assert!(LatLngBounds::from_points(std::iter::empty()).is_none());
        let bounds =
            LatLngBounds::from_points([LatLng::new(38.0, 26.0), LatLng::new(40.0, 44.0)]).unwrap();
        let center = bounds.center();
        assert_eq!(center.lat, 39.0);
        assert_eq!(center.lng, 35.0);
    }
}
