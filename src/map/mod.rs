pub mod basemap;
mod geometry;
mod projection;
mod renderer;
mod spatial;

pub use basemap::load_basemap;
pub use projection::{Viewport, AFRICA_CENTER, AFRICA_ZOOM, MAX_ZOOM, MIN_ZOOM};
pub use renderer::{
    marker_radius_px, DisplaySettings, LineString, Lod, MapLayers, MapRenderer, LABEL_ZOOM, MAX_MARKER_PX,
    MIN_MARKER_PX,
};
pub use spatial::SpatialGrid;
