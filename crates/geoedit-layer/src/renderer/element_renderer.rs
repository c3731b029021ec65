//! Double-buffered render set with hit testing
//!
//! Elements are staged with [`ElementRenderer::add_element`] and become the
//! active set on [`ElementRenderer::refresh_elements`]. Drawing and ray
//! queries only look at the active set.

use parking_lot::Mutex;
use std::cmp::Ordering;
use std::sync::Arc;

use geoedit_core::{Geometry, MapPos, Projection, ProjectionSurface, SharedElement};

use super::view_state::{Ray, ViewState};
use super::MapRenderer;

/// An element hit by a ray query.
#[derive(Debug, Clone)]
pub struct RayIntersectedElement {
    pub element: SharedElement,
    /// Hit position in internal coordinates.
    pub hit_pos: MapPos,
    /// Internal-space distance between the hit and the element shape.
    pub distance: f64,
}

#[derive(Default)]
struct RenderBuffers {
    active: Vec<SharedElement>,
    pending: Vec<SharedElement>,
}

pub struct ElementRenderer {
    name: &'static str,
    pick_tolerance_px: f32,
    buffers: Mutex<RenderBuffers>,
}

impl ElementRenderer {
    /// `pick_tolerance_px` is added to each element's rendered radius when
    /// hit testing.
    pub fn new(name: &'static str, pick_tolerance_px: f32) -> Self {
        Self {
            name,
            pick_tolerance_px,
            buffers: Mutex::new(RenderBuffers::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stages an element for the next refresh.
    pub fn add_element(&self, element: SharedElement) {
        let mut buffers = self.buffers.lock();
        if !buffers.pending.iter().any(|e| Arc::ptr_eq(e, &element)) {
            buffers.pending.push(element);
        }
    }

    /// Makes sure an element is part of the active set without a refresh.
    pub fn update_element(&self, element: SharedElement) {
        let mut buffers = self.buffers.lock();
        if !buffers.active.iter().any(|e| Arc::ptr_eq(e, &element)) {
            buffers.active.push(element);
        }
    }

    /// Drops an element from both the active and the staged set.
    pub fn remove_element(&self, element: &SharedElement) -> bool {
        let mut buffers = self.buffers.lock();
        let before = buffers.active.len() + buffers.pending.len();
        buffers.active.retain(|e| !Arc::ptr_eq(e, element));
        buffers.pending.retain(|e| !Arc::ptr_eq(e, element));
        before != buffers.active.len() + buffers.pending.len()
    }

    /// Replaces the active set with the staged elements.
    pub fn refresh_elements(&self) {
        let mut buffers = self.buffers.lock();
        buffers.active = std::mem::take(&mut buffers.pending);
        tracing::trace!("{} render set refreshed ({} elements)", self.name, buffers.active.len());
    }

    pub fn elements(&self) -> Vec<SharedElement> {
        self.buffers.lock().active.clone()
    }

    pub fn element_count(&self) -> usize {
        self.buffers.lock().active.len()
    }

    /// Active elements hit by the ray, nearest first. Invisible and
    /// unstyled elements are skipped.
    pub fn calculate_ray_intersected_elements(
        &self,
        ray: &Ray,
        view_state: &ViewState,
        projection: &dyn Projection,
        surface: &dyn ProjectionSurface,
    ) -> Vec<RayIntersectedElement> {
        let hit_pos = surface.calculate_map_pos(ray.target());
        let units_per_pixel = view_state.units_per_pixel();
        let elements = self.elements();

        let mut results: Vec<RayIntersectedElement> = elements
            .into_iter()
            .filter(|element| element.is_visible())
            .filter_map(|element| {
                let style = element.style()?;
                let radius = (style.pick_radius_px() + self.pick_tolerance_px) as f64 * units_per_pixel;
                let geometry = element.geometry().map_positions(&|p: &MapPos| projection.to_internal(*p));
                let distance = geometry_hit_distance(&geometry, &hit_pos, radius)?;
                Some(RayIntersectedElement {
                    element,
                    hit_pos,
                    distance,
                })
            })
            .collect();

        results.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        results
    }

    /// Draws the visible, styled part of the active set. Returns true when
    /// another frame is needed.
    pub fn on_draw_frame(
        &self,
        _delta_seconds: f32,
        view_state: &ViewState,
        map_renderer: &dyn MapRenderer,
    ) -> bool {
        let drawable: Vec<SharedElement> = self
            .elements()
            .into_iter()
            .filter(|e| e.is_visible() && e.style().is_some())
            .collect();
        map_renderer.draw_elements(&drawable, view_state);
        false
    }
}

/// Distance between `pos` and the geometry when within `radius`.
/// Positions inside a polygon area are at distance zero.
fn geometry_hit_distance(geometry: &Geometry, pos: &MapPos, radius: f64) -> Option<f64> {
    let distance = match geometry {
        Geometry::Point(p) => p.distance_to(pos),
        Geometry::Line(poses) => polyline_distance(poses, false, pos)?,
        Geometry::Polygon(rings) => {
            if point_in_polygon(rings, pos) {
                0.0
            } else {
                rings
                    .iter()
                    .filter_map(|ring| polyline_distance(ring, true, pos))
                    .fold(f64::INFINITY, f64::min)
            }
        }
        Geometry::Multi(geometries) => {
            return geometries
                .iter()
                .filter_map(|g| geometry_hit_distance(g, pos, radius))
                .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        }
    };
    (distance <= radius).then_some(distance)
}

fn polyline_distance(poses: &[MapPos], closed: bool, pos: &MapPos) -> Option<f64> {
    match poses {
        [] => None,
        [single] => Some(single.distance_to(pos)),
        _ => {
            let mut min = poses
                .windows(2)
                .map(|w| segment_distance(&w[0], &w[1], pos))
                .fold(f64::INFINITY, f64::min);
            if closed {
                if let (Some(first), Some(last)) = (poses.first(), poses.last()) {
                    min = min.min(segment_distance(last, first, pos));
                }
            }
            Some(min)
        }
    }
}

fn segment_distance(a: &MapPos, b: &MapPos, pos: &MapPos) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return a.distance_to(pos);
    }
    let t = (((pos.x - a.x) * dx + (pos.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    pos.distance_to(&MapPos::new(a.x + dx * t, a.y + dy * t))
}

/// Even-odd test across all rings, so holes are outside.
fn point_in_polygon(rings: &[Vec<MapPos>], pos: &MapPos) -> bool {
    let mut inside = false;
    for ring in rings {
        let n = ring.len();
        if n < 3 {
            continue;
        }
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (&ring[i], &ring[j]);
            if (a.y > pos.y) != (b.y > pos.y) && pos.x < (b.x - a.x) * (pos.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
    }
    inside
}
