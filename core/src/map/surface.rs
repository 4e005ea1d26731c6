use crate::map::geo::{LatLng, LatLngBounds};

/// Startup view roughly framing Anatolia.
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 39.0,
    lng: 35.0,
};
pub const DEFAULT_ZOOM: f64 = 5.0;

const MIN_ZOOM: f64 = 2.0;
const MAX_ZOOM: f64 = 12.0;

/// Identifier of a named overlay group on the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupId {
    Quakes,
    Fires,
}

/// One renderable element inside an overlay group.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Marker { position: LatLng, popup: String },
    Circle { center: LatLng, radius_m: f64 },
}

impl Shape {
    pub fn position(&self) -> LatLng {
        match self {
            Shape::Marker { position, .. } => *position,
            Shape::Circle { center, .. } => *center,
        }
    }
}

/// A named, clearable collection of map shapes.
///
/// Pipelines never diff a group: every run clears it and repopulates it from
/// the latest fetch, so it only ever holds markers from one response.
#[derive(Debug, Clone)]
pub struct OverlayGroup {
    shapes: Vec<Shape>,
    visible: bool,
}

impl OverlayGroup {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            visible: true,
        }
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Bounding box over every shape position in the group.
    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(self.shapes.iter().map(Shape::position))
    }
}

impl Default for OverlayGroup {
    fn default() -> Self {
        Self::new()
    }
}

/// The map's current visible center and zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
}

impl Viewport {
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }

    /// Centers on `bounds` and picks the zoom level whose 360-degree world
    /// span still fits the wider of the two axes.
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        self.center = bounds.center();
        let span = bounds.lat_span().max(bounds.lng_span());
        self.zoom = if span > 0.0 {
            (360.0 / span).log2().clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            MAX_ZOOM
        };
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// The single interactive map viewport plus its named overlay groups.
#[derive(Debug, Clone, Default)]
pub struct MapSurface {
    viewport: Viewport,
    quakes: OverlayGroup,
    fires: OverlayGroup,
    open_popup: Option<(GroupId, usize)>,
}

impl MapSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn group(&self, id: GroupId) -> &OverlayGroup {
        match id {
            GroupId::Quakes => &self.quakes,
            GroupId::Fires => &self.fires,
        }
    }

    fn group_mut(&mut self, id: GroupId) -> &mut OverlayGroup {
        match id {
            GroupId::Quakes => &mut self.quakes,
            GroupId::Fires => &mut self.fires,
        }
    }

    /// Empties the group; a popup pointing into it is closed along the way.
    pub fn clear(&mut self, id: GroupId) {
        self.group_mut(id).clear();
        if matches!(self.open_popup, Some((group, _)) if group == id) {
            self.open_popup = None;
        }
    }

    /// Appends a shape and returns its index within the group.
    pub fn add(&mut self, id: GroupId, shape: Shape) -> usize {
        let group = self.group_mut(id);
        group.push(shape);
        group.len() - 1
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.viewport.set_view(center, zoom);
    }

    pub fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        self.viewport.fit_bounds(bounds);
    }

    pub fn set_group_visible(&mut self, id: GroupId, visible: bool) {
        self.group_mut(id).set_visible(visible);
    }

    pub fn open_popup(&mut self, id: GroupId, shape_index: usize) {
        if shape_index < self.group(id).len() {
            self.open_popup = Some((id, shape_index));
        }
    }

    pub fn close_popup(&mut self) {
        self.open_popup = None;
    }

    pub fn popup(&self) -> Option<(GroupId, usize)> {
        self.open_popup
    }
}
