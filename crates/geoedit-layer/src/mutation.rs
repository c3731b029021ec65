//! Geometry mutation
//!
//! Pure functions that build a new geometry from an overlay slot edit. Slot
//! indices follow the layout documented in [`crate::overlay`]. Besides the
//! new geometry each edit reports the [`OverlayDelta`]s that keep the live
//! handle list aligned with the new slot layout until the next overlay sync.

use geoedit_core::{is_closed_ring, Geometry, MapPos, Projection, ProjectionSurface};

use crate::overlay::{line_slot_count, ring_slot_count, OverlayDelta};

/// Result of a slot edit. `geometry` is `None` when the edit removed the
/// whole geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryEdit {
    pub geometry: Option<Geometry>,
    pub overlay_deltas: Vec<OverlayDelta>,
}

/// Moves every position of `geometry` rigidly along the surface so that
/// `origin` lands on `target`.
pub fn translate(
    geometry: &Geometry,
    origin: MapPos,
    target: MapPos,
    projection: &dyn Projection,
    surface: &dyn ProjectionSurface,
) -> Geometry {
    if origin == target {
        return geometry.clone();
    }
    let pos0 = surface.calculate_position(projection.to_internal(origin));
    let pos1 = surface.calculate_position(projection.to_internal(target));
    let transform = surface.calculate_translate_matrix(pos0, pos1, 1.0);
    geometry.map_positions(&|pos: &MapPos| {
        let world = surface.calculate_position(projection.to_internal(*pos));
        projection.from_internal(surface.calculate_map_pos(transform.transform_point3(world)))
    })
}

/// Sets the vertex at an even slot, or inserts a vertex at an odd slot.
pub fn update_point(geometry: &Geometry, index: usize, pos: MapPos) -> GeometryEdit {
    let mut offset = 0;
    let mut overlay_deltas = Vec::new();
    let geometry = update_geometry_point(geometry, &mut offset, index, pos, &mut overlay_deltas);
    GeometryEdit {
        geometry: Some(geometry),
        overlay_deltas,
    }
}

/// Removes the vertex at an even slot. Odd slots are left untouched.
pub fn remove_point(geometry: &Geometry, index: usize) -> GeometryEdit {
    let mut offset = 0;
    let mut overlay_deltas = Vec::new();
    let geometry = remove_geometry_point(geometry, &mut offset, index, &mut overlay_deltas);
    GeometryEdit {
        geometry,
        overlay_deltas,
    }
}

/// Deltas for a vertex inserted at odd slot `index`: the new midpoint after
/// it, then the new vertex at the slot itself.
fn insertion_deltas(index: usize, pos: MapPos, deltas: &mut Vec<OverlayDelta>) {
    deltas.push(OverlayDelta::Insert {
        index: index + 1,
        pos,
        virtual_point: true,
    });
    deltas.push(OverlayDelta::Insert {
        index,
        pos,
        virtual_point: false,
    });
}

fn update_geometry_point(
    geometry: &Geometry,
    offset: &mut usize,
    index: usize,
    pos: MapPos,
    deltas: &mut Vec<OverlayDelta>,
) -> Geometry {
    if index < *offset {
        return geometry.clone();
    }

    let mut points = 0;
    let result = match geometry {
        Geometry::Point(_) => {
            points = 1;
            if index - *offset < points {
                Geometry::Point(pos)
            } else {
                geometry.clone()
            }
        }
        Geometry::Line(poses) => {
            points = line_slot_count(poses.len());
            let local = index - *offset;
            if local < points {
                let mut poses = poses.clone();
                if local % 2 == 0 {
                    poses[local / 2] = pos;
                } else {
                    poses.insert(local / 2 + 1, pos);
                    insertion_deltas(index, pos, deltas);
                }
                Geometry::Line(poses)
            } else {
                geometry.clone()
            }
        }
        Geometry::Polygon(rings) => {
            let mut target = None;
            for (ring_index, ring) in rings.iter().enumerate() {
                *offset += points;
                points = ring_slot_count(ring);
                let local = index - *offset;
                if local < points {
                    target = Some((ring_index, local));
                    break;
                }
            }
            match target {
                Some((ring_index, local)) => {
                    let mut rings = rings.clone();
                    let ring = &mut rings[ring_index];
                    let closed = is_closed_ring(ring);
                    if local % 2 == 0 {
                        ring[local / 2] = pos;
                        if closed && local == 0 {
                            let last = ring.len() - 1;
                            ring[last] = pos;
                        }
                    } else {
                        ring.insert(local / 2 + 1, pos);
                        insertion_deltas(index, pos, deltas);
                    }
                    Geometry::Polygon(rings)
                }
                None => geometry.clone(),
            }
        }
        Geometry::Multi(geometries) => Geometry::Multi(
            geometries
                .iter()
                .map(|child| update_geometry_point(child, offset, index, pos, deltas))
                .collect(),
        ),
    };

    *offset += points;
    result
}

fn remove_geometry_point(
    geometry: &Geometry,
    offset: &mut usize,
    index: usize,
    deltas: &mut Vec<OverlayDelta>,
) -> Option<Geometry> {
    if index < *offset {
        return Some(geometry.clone());
    }

    let mut points = 0;
    let result = match geometry {
        Geometry::Point(_) => {
            points = 1;
            if index - *offset < points {
                None
            } else {
                Some(geometry.clone())
            }
        }
        Geometry::Line(poses) => {
            points = line_slot_count(poses.len());
            let local = index - *offset;
            if local < points && local % 2 == 0 {
                if poses.len() > 2 {
                    let mut poses = poses.clone();
                    poses.remove(local / 2);
                    deltas.push(OverlayDelta::Remove { index });
                    deltas.push(OverlayDelta::Remove {
                        index: if local > 0 { index - 1 } else { index },
                    });
                    Some(Geometry::Line(poses))
                } else {
                    None
                }
            } else {
                Some(geometry.clone())
            }
        }
        Geometry::Polygon(rings) => {
            let mut target = None;
            for (ring_index, ring) in rings.iter().enumerate() {
                *offset += points;
                points = ring_slot_count(ring);
                let local = index - *offset;
                if local < points {
                    target = Some((ring_index, local));
                    break;
                }
            }
            match target {
                Some((ring_index, local)) if local % 2 == 0 => {
                    let mut rings = rings.clone();
                    if points > 6 {
                        let ring = &mut rings[ring_index];
                        let closed = is_closed_ring(ring);
                        ring.remove(local / 2);
                        if closed && local == 0 {
                            let last = ring.len() - 1;
                            ring[last] = ring[0];
                        }
                        deltas.push(OverlayDelta::Remove { index: index + 1 });
                        deltas.push(OverlayDelta::Remove { index });
                        Some(Geometry::Polygon(rings))
                    } else if ring_index > 0 {
                        rings.remove(ring_index);
                        Some(Geometry::Polygon(rings))
                    } else {
                        None
                    }
                }
                _ => Some(geometry.clone()),
            }
        }
        Geometry::Multi(geometries) => {
            let kept: Vec<Geometry> = geometries
                .iter()
                .filter_map(|child| remove_geometry_point(child, offset, index, deltas))
                .collect();
            if kept.is_empty() {
                None
            } else {
                Some(Geometry::Multi(kept))
            }
        }
    };

    *offset += points;
    result
}
