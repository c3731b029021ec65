//! Projections and projection surfaces
//!
//! A [`Projection`] converts between the coordinates a data source stores
//! and the internal web-mercator space shared by the whole map. A
//! [`ProjectionSurface`] places internal coordinates on the rendered
//! surface (a plane or a globe) and provides the transforms used to move
//! positions along that surface.
//!
//! ```text
//! map pos --to_internal--> internal pos --calculate_position--> world (DVec3)
//! map pos <-from_internal-- internal pos <--calculate_map_pos-- world (DVec3)
//! ```

use glam::{DMat4, DQuat, DVec3};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::geometry::MapPos;

/// WGS84 equatorial radius in metres.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Conversion between data-source coordinates and internal coordinates.
pub trait Projection: Send + Sync {
    fn name(&self) -> &str;

    fn to_internal(&self, map_pos: MapPos) -> MapPos;

    fn from_internal(&self, internal_pos: MapPos) -> MapPos;
}

/// Web-mercator metres. Internal coordinates are the same values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Epsg3857;

impl Projection for Epsg3857 {
    fn name(&self) -> &str {
        "EPSG:3857"
    }

    fn to_internal(&self, map_pos: MapPos) -> MapPos {
        map_pos
    }

    fn from_internal(&self, internal_pos: MapPos) -> MapPos {
        internal_pos
    }
}

/// Longitude/latitude in degrees.
#[derive(Debug, Clone, Copy, Default)]
pub struct Epsg4326;

impl Projection for Epsg4326 {
    fn name(&self) -> &str {
        "EPSG:4326"
    }

    fn to_internal(&self, map_pos: MapPos) -> MapPos {
        let x = map_pos.x.to_radians() * EARTH_RADIUS;
        let lat = map_pos.y.to_radians();
        let y = (FRAC_PI_4 + lat * 0.5).tan().ln() * EARTH_RADIUS;
        MapPos::with_z(x, y, map_pos.z)
    }

    fn from_internal(&self, internal_pos: MapPos) -> MapPos {
        let lon = (internal_pos.x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (internal_pos.y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees();
        MapPos::with_z(lon, lat, internal_pos.z)
    }
}

/// The rendered surface internal coordinates are placed on.
pub trait ProjectionSurface: Send + Sync {
    /// World position of an internal map position.
    fn calculate_position(&self, internal_pos: MapPos) -> DVec3;

    /// Internal map position of a world position.
    fn calculate_map_pos(&self, pos: DVec3) -> MapPos;

    /// Surface normal at a world position.
    fn calculate_normal(&self, pos: DVec3) -> DVec3;

    /// Transform that moves `pos0` the fraction `t` of the way to `pos1`
    /// along the surface. Points other than `pos0` are moved rigidly.
    fn calculate_translate_matrix(&self, pos0: DVec3, pos1: DVec3, t: f64) -> DMat4;
}

/// Flat map. World coordinates equal internal coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarProjectionSurface;

impl ProjectionSurface for PlanarProjectionSurface {
    fn calculate_position(&self, internal_pos: MapPos) -> DVec3 {
        DVec3::new(internal_pos.x, internal_pos.y, internal_pos.z)
    }

    fn calculate_map_pos(&self, pos: DVec3) -> MapPos {
        MapPos::with_z(pos.x, pos.y, pos.z)
    }

    fn calculate_normal(&self, _pos: DVec3) -> DVec3 {
        DVec3::Z
    }

    fn calculate_translate_matrix(&self, pos0: DVec3, pos1: DVec3, t: f64) -> DMat4 {
        DMat4::from_translation((pos1 - pos0) * t)
    }
}

/// Globe of radius [`EARTH_RADIUS`] centred at the origin. Translation is a
/// rotation about the axis of the great circle through both positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalProjectionSurface;

impl ProjectionSurface for SphericalProjectionSurface {
    fn calculate_position(&self, internal_pos: MapPos) -> DVec3 {
        let lon = internal_pos.x / EARTH_RADIUS;
        let lat = (internal_pos.y / EARTH_RADIUS).sinh().atan();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat) * (EARTH_RADIUS + internal_pos.z)
    }

    fn calculate_map_pos(&self, pos: DVec3) -> MapPos {
        let len = pos.length();
        if len == 0.0 {
            return MapPos::default();
        }
        let dir = pos / len;
        let lat = dir.z.clamp(-1.0, 1.0).asin();
        let lon = dir.y.atan2(dir.x);
        MapPos::with_z(
            lon * EARTH_RADIUS,
            lat.tan().asinh() * EARTH_RADIUS,
            len - EARTH_RADIUS,
        )
    }

    fn calculate_normal(&self, pos: DVec3) -> DVec3 {
        pos.normalize_or_zero()
    }

    fn calculate_translate_matrix(&self, pos0: DVec3, pos1: DVec3, t: f64) -> DMat4 {
        let (Some(dir0), Some(dir1)) = (pos0.try_normalize(), pos1.try_normalize()) else {
            return DMat4::IDENTITY;
        };
        let rotation = DQuat::from_rotation_arc(dir0, dir1);
        DMat4::from_quat(DQuat::IDENTITY.slerp(rotation, t))
    }
}
