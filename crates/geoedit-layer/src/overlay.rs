//! Overlay handles
//!
//! The overlay of a selected element is a flat sequence of point handles
//! derived from its geometry in depth-first order:
//!
//! ```text
//! line     R0 V R1 V R2            (2n - 1 slots)
//! ring     R0 V R1 V R2 V          (2n slots, last V wraps to R0)
//! closed   R0 V R1 V R2 V [R0]     (2n - 2 slots, duplicate not shown)
//! ```
//!
//! `R` handles sit on vertices, `V` handles on segment midpoints. The slot
//! index of a handle is the addressing scheme of [`crate::mutation`]: even
//! local slots are vertices, odd local slots are midpoints.

use std::sync::Arc;

use geoedit_core::{
    is_closed_ring, Geometry, MapPos, PointStyle, Projection, ProjectionSurface, SharedElement,
    VectorElement,
};

use crate::listener::DragPointStyle;

/// One handle of the derived sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPointSpec {
    pub pos: MapPos,
    pub virtual_point: bool,
}

/// A structural change to the live handle list produced by an edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayDelta {
    Insert {
        index: usize,
        pos: MapPos,
        virtual_point: bool,
    },
    Remove {
        index: usize,
    },
}

/// Handle styles chosen for the current selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayStyles {
    pub normal: Option<PointStyle>,
    pub virtual_point: Option<PointStyle>,
    pub selected: Option<PointStyle>,
}

impl OverlayStyles {
    pub fn get(&self, style: DragPointStyle) -> Option<PointStyle> {
        match style {
            DragPointStyle::Normal => self.normal.clone(),
            DragPointStyle::Virtual => self.virtual_point.clone(),
            DragPointStyle::Selected => self.selected.clone(),
        }
    }

    fn for_spec(&self, virtual_point: bool) -> Option<PointStyle> {
        if virtual_point {
            self.virtual_point.clone()
        } else {
            self.normal.clone()
        }
    }
}

/// Number of slots a line with `len` vertices occupies.
pub fn line_slot_count(len: usize) -> usize {
    (len * 2).saturating_sub(1)
}

/// Number of slots a polygon ring occupies.
pub fn ring_slot_count(ring: &[MapPos]) -> usize {
    if is_closed_ring(ring) {
        ring.len() * 2 - 2
    } else {
        ring.len() * 2
    }
}

/// Total number of slots of a geometry.
pub fn slot_count(geometry: &Geometry) -> usize {
    match geometry {
        Geometry::Point(_) => 1,
        Geometry::Line(poses) => line_slot_count(poses.len()),
        Geometry::Polygon(rings) => rings.iter().map(|r| ring_slot_count(r)).sum(),
        Geometry::Multi(geometries) => geometries.iter().map(slot_count).sum(),
    }
}

/// Derives the handle sequence of a geometry.
pub fn overlay_point_specs(
    geometry: &Geometry,
    projection: &dyn Projection,
    surface: &dyn ProjectionSurface,
) -> Vec<OverlayPointSpec> {
    let mut specs = Vec::with_capacity(slot_count(geometry));
    collect_specs(geometry, projection, surface, &mut specs);
    specs
}

fn collect_specs(
    geometry: &Geometry,
    projection: &dyn Projection,
    surface: &dyn ProjectionSurface,
    specs: &mut Vec<OverlayPointSpec>,
) {
    let real = |pos: MapPos| OverlayPointSpec {
        pos,
        virtual_point: false,
    };
    let midpoint = |a: &MapPos, b: &MapPos| OverlayPointSpec {
        pos: surface_midpoint(a, b, projection, surface),
        virtual_point: true,
    };

    match geometry {
        Geometry::Point(pos) => specs.push(real(*pos)),
        Geometry::Line(poses) => {
            for (i, pos) in poses.iter().enumerate() {
                if i > 0 {
                    specs.push(midpoint(&poses[i - 1], pos));
                }
                specs.push(real(*pos));
            }
        }
        Geometry::Polygon(rings) => {
            for ring in rings {
                let count = if is_closed_ring(ring) {
                    ring.len() - 1
                } else {
                    ring.len()
                };
                for i in 0..count {
                    let next = if i + 1 < ring.len() { i + 1 } else { 0 };
                    specs.push(real(ring[i]));
                    specs.push(midpoint(&ring[i], &ring[next]));
                }
            }
        }
        Geometry::Multi(geometries) => {
            for child in geometries {
                collect_specs(child, projection, surface, specs);
            }
        }
    }
}

/// Midpoint of two map positions along the projection surface.
pub fn surface_midpoint(
    a: &MapPos,
    b: &MapPos,
    projection: &dyn Projection,
    surface: &dyn ProjectionSurface,
) -> MapPos {
    let pos0 = surface.calculate_position(projection.to_internal(*a));
    let pos1 = surface.calculate_position(projection.to_internal(*b));
    let transform = surface.calculate_translate_matrix(pos0, pos1, 0.5);
    projection.from_internal(surface.calculate_map_pos(transform.transform_point3(pos0)))
}

/// Builds the live handle list for `specs`, reusing the handle at the same
/// slot of `existing` so that a dragged handle keeps its identity. The
/// dragged handle gets the selected style.
pub fn build_overlay_points(
    specs: &[OverlayPointSpec],
    existing: &[SharedElement],
    drag_point: Option<&SharedElement>,
    styles: &OverlayStyles,
) -> Vec<SharedElement> {
    specs
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let Some(point) = existing.get(index) else {
                return Arc::new(VectorElement::handle(spec.pos, styles.for_spec(spec.virtual_point)));
            };
            let style = if drag_point.is_some_and(|d| Arc::ptr_eq(d, point)) {
                styles.selected.clone()
            } else {
                styles.for_spec(spec.virtual_point)
            };
            point.set_pos(spec.pos);
            point.set_style(style.map(geoedit_core::Style::Point));
            point.clone()
        })
        .collect()
}

/// Applies edit deltas to the live handle list. Inserted handles are new
/// placeholders that the next overlay sync repositions.
pub fn apply_overlay_deltas(
    points: &mut Vec<SharedElement>,
    deltas: &[OverlayDelta],
    styles: &OverlayStyles,
) {
    for delta in deltas {
        match *delta {
            OverlayDelta::Insert {
                index,
                pos,
                virtual_point,
            } => {
                let handle = Arc::new(VectorElement::handle(pos, styles.for_spec(virtual_point)));
                points.insert(index.min(points.len()), handle);
            }
            OverlayDelta::Remove { index } => {
                if index < points.len() {
                    points.remove(index);
                }
            }
        }
    }
}
