//! # GeoEdit Core
//!
//! Core types shared by the editing layer:
//! - Geometry model (points, lines, polygons, multi-geometries)
//! - Projections and projection surfaces
//! - Vector elements, styles and element identity
//! - Layer events, configuration and errors

pub mod config;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod projection;
pub mod types;

pub use config::EditorConfig;

pub use element::{
    is_same_element, Color, LineStyle, PointStyle, PolygonStyle, Style, VectorElement, NO_ID,
};

pub use error::{ConfigError, Error, Result};

pub use event::{LayerEvent, LayerEventDispatcher};

pub use geometry::{is_closed_ring, Geometry, MapBounds, MapPos};

pub use projection::{
    Epsg3857, Epsg4326, PlanarProjectionSurface, Projection, ProjectionSurface,
    SphericalProjectionSurface, EARTH_RADIUS,
};

pub use types::{
    thread_safe_map, thread_safe_rw_vec, SharedElement, ThreadSafeMap, ThreadSafeRw,
    ThreadSafeRwVec,
};
