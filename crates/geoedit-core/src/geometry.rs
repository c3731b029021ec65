//! Geometry model
//!
//! Immutable value types describing the shape of a vector element. A
//! [`Geometry`] is a tree: points, lines and polygons are leaves holding
//! position sequences, [`Geometry::Multi`] holds child geometries. Editing
//! never mutates a geometry in place; every edit builds a new value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in the coordinate system of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MapPos {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl MapPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: &MapPos) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl fmt::Display for MapPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.3})", self.x, self.y, self.z)
    }
}

/// Axis-aligned bounds of a geometry in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub min: MapPos,
    pub max: MapPos,
}

impl MapBounds {
    fn from_pos(pos: MapPos) -> Self {
        Self { min: pos, max: pos }
    }

    fn expand(&mut self, pos: MapPos) {
        self.min.x = self.min.x.min(pos.x);
        self.min.y = self.min.y.min(pos.y);
        self.min.z = self.min.z.min(pos.z);
        self.max.x = self.max.x.max(pos.x);
        self.max.y = self.max.y.max(pos.y);
        self.max.z = self.max.z.max(pos.z);
    }

    pub fn contains(&self, pos: &MapPos) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }
}

/// Returns true when the ring's first and last positions coincide. A
/// single-position ring is closed, an empty one is not.
pub fn is_closed_ring(ring: &[MapPos]) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => first == last,
        _ => false,
    }
}

/// Vector geometry.
///
/// Polygons hold their outer ring at index 0 followed by holes. A ring is
/// closed iff its first and last positions are equal; both open and closed
/// rings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(MapPos),
    Line(Vec<MapPos>),
    Polygon(Vec<Vec<MapPos>>),
    Multi(Vec<Geometry>),
}

impl Geometry {
    /// Builds a polygon from a single outer ring.
    pub fn polygon(ring: Vec<MapPos>) -> Self {
        Geometry::Polygon(vec![ring])
    }

    /// Visits every stored position in depth-first order.
    pub fn for_each_pos<F: FnMut(&MapPos)>(&self, f: &mut F) {
        match self {
            Geometry::Point(pos) => f(pos),
            Geometry::Line(poses) => poses.iter().for_each(|p| f(p)),
            Geometry::Polygon(rings) => rings.iter().flatten().for_each(|p| f(p)),
            Geometry::Multi(geometries) => {
                for geometry in geometries {
                    geometry.for_each_pos(f);
                }
            }
        }
    }

    /// Returns a copy with every stored position passed through `f`.
    pub fn map_positions<F: Fn(&MapPos) -> MapPos>(&self, f: &F) -> Geometry {
        match self {
            Geometry::Point(pos) => Geometry::Point(f(pos)),
            Geometry::Line(poses) => Geometry::Line(poses.iter().map(f).collect()),
            Geometry::Polygon(rings) => Geometry::Polygon(
                rings
                    .iter()
                    .map(|ring| ring.iter().map(f).collect())
                    .collect(),
            ),
            Geometry::Multi(geometries) => {
                Geometry::Multi(geometries.iter().map(|g| g.map_positions(f)).collect())
            }
        }
    }

    pub fn position_count(&self) -> usize {
        let mut count = 0;
        self.for_each_pos(&mut |_: &MapPos| count += 1);
        count
    }

    pub fn bounds(&self) -> Option<MapBounds> {
        let mut bounds: Option<MapBounds> = None;
        self.for_each_pos(&mut |pos: &MapPos| match bounds.as_mut() {
            Some(b) => b.expand(*pos),
            None => bounds = Some(MapBounds::from_pos(*pos)),
        });
        bounds
    }

    /// Center of the bounding box, used as the anchor of labels and popups.
    pub fn center_pos(&self) -> Option<MapPos> {
        self.bounds().map(|b| {
            MapPos::with_z(
                (b.min.x + b.max.x) * 0.5,
                (b.min.y + b.max.y) * 0.5,
                (b.min.z + b.max.z) * 0.5,
            )
        })
    }
}
