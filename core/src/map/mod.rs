pub mod geo;
pub mod surface;

pub use geo::{LatLng, LatLngBounds};
pub use surface::{GroupId, MapSurface, OverlayGroup, Shape, Viewport};
