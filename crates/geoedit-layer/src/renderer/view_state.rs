use glam::DVec3;

use geoedit_core::{MapBounds, MapPos};

use crate::touch::ScreenPos;

/// Top-down orthographic camera over a planar surface.
///
/// The screen centre looks at `focus_pos`; one screen pixel covers
/// `units_per_pixel` world units along both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    focus_pos: DVec3,
    units_per_pixel: f64,
    width: u32,
    height: u32,
}

/// A ray in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    pub fn point_at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// The point the ray was cast towards.
    pub fn target(&self) -> DVec3 {
        self.point_at(1.0)
    }
}

impl ViewState {
    pub fn new(focus_pos: DVec3, units_per_pixel: f64, width: u32, height: u32) -> Self {
        Self {
            focus_pos,
            units_per_pixel,
            width,
            height,
        }
    }

    pub fn focus_pos(&self) -> DVec3 {
        self.focus_pos
    }

    pub fn set_focus_pos(&mut self, focus_pos: DVec3) {
        self.focus_pos = focus_pos;
    }

    pub fn units_per_pixel(&self) -> f64 {
        self.units_per_pixel
    }

    pub fn set_units_per_pixel(&mut self, units_per_pixel: f64) {
        self.units_per_pixel = units_per_pixel;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Camera sits above the focus so that the screen height spans a
    /// 90 degree field of view.
    pub fn camera_pos(&self) -> DVec3 {
        self.focus_pos + DVec3::Z * self.camera_height()
    }

    pub fn camera_height(&self) -> f64 {
        (self.units_per_pixel * self.height as f64 * 0.5).max(1.0)
    }

    /// Screen up in world space. The camera is north-up.
    pub fn up_vec(&self) -> DVec3 {
        DVec3::Y
    }

    /// World position under a screen position on the plane through the
    /// focus. `None` while the viewport is empty or the input is not finite.
    pub fn screen_to_world(&self, screen_pos: ScreenPos) -> Option<DVec3> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        if !(self.units_per_pixel.is_finite() && self.units_per_pixel > 0.0) {
            return None;
        }
        if !(screen_pos.x.is_finite() && screen_pos.y.is_finite()) {
            return None;
        }
        let dx = (screen_pos.x as f64 - self.width as f64 * 0.5) * self.units_per_pixel;
        let dy = (self.height as f64 * 0.5 - screen_pos.y as f64) * self.units_per_pixel;
        Some(self.focus_pos + DVec3::new(dx, dy, 0.0))
    }

    pub fn world_to_screen(&self, pos: DVec3) -> ScreenPos {
        let offset = pos - self.focus_pos;
        ScreenPos::new(
            (offset.x / self.units_per_pixel + self.width as f64 * 0.5) as f32,
            (self.height as f64 * 0.5 - offset.y / self.units_per_pixel) as f32,
        )
    }

    /// Ray from the camera through a screen position.
    pub fn screen_ray(&self, screen_pos: ScreenPos) -> Option<Ray> {
        let target = self.screen_to_world(screen_pos)?;
        let origin = self.camera_pos();
        Some(Ray::new(origin, target - origin))
    }

    /// Visible area in world (internal) coordinates.
    pub fn visible_bounds(&self) -> MapBounds {
        let half_w = self.width as f64 * 0.5 * self.units_per_pixel;
        let half_h = self.height as f64 * 0.5 * self.units_per_pixel;
        MapBounds {
            min: MapPos::new(self.focus_pos.x - half_w, self.focus_pos.y - half_h),
            max: MapPos::new(self.focus_pos.x + half_w, self.focus_pos.y + half_h),
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DVec3::ZERO, 1.0, 512, 512)
    }
}
