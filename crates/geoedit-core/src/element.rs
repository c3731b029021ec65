//! Vector elements and their styles
//!
//! A [`VectorElement`] is owned by a data source and shared with layers as
//! `Arc<VectorElement>`. Its geometry is replaced as a whole on every edit,
//! readers always see a complete `Arc<Geometry>`.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::geometry::{Geometry, MapPos};

/// Id of elements that are only identified by reference.
pub const NO_ID: i64 = -1;

/// RGBA colour, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointStyle {
    pub color: Color,
    /// Diameter in screen pixels.
    pub size: f32,
}

impl PointStyle {
    pub fn new(color: Color, size: f32) -> Self {
        Self { color, size }
    }
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            size: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Color,
    /// Width in screen pixels.
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            width: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonStyle {
    pub color: Color,
    pub outline: Option<LineStyle>,
}

impl Default for PolygonStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            outline: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Style {
    Point(PointStyle),
    Line(LineStyle),
    Polygon(PolygonStyle),
}

impl Style {
    /// Half of the rendered footprint in pixels, used for hit testing.
    pub fn pick_radius_px(&self) -> f32 {
        match self {
            Style::Point(style) => style.size * 0.5,
            Style::Line(style) => style.width * 0.5,
            Style::Polygon(style) => style.outline.as_ref().map_or(0.0, |o| o.width * 0.5),
        }
    }
}

/// An editable map element.
#[derive(Debug)]
pub struct VectorElement {
    id: i64,
    geometry: RwLock<Arc<Geometry>>,
    style: RwLock<Option<Style>>,
    visible: AtomicBool,
}

impl VectorElement {
    pub fn new(id: i64, geometry: Geometry, style: Style) -> Self {
        Self {
            id,
            geometry: RwLock::new(Arc::new(geometry)),
            style: RwLock::new(Some(style)),
            visible: AtomicBool::new(true),
        }
    }

    /// Element without a stable id.
    pub fn anonymous(geometry: Geometry, style: Style) -> Self {
        Self::new(NO_ID, geometry, style)
    }

    /// Point element used as a drag handle. A handle without a style is
    /// neither drawn nor hit-testable.
    pub fn handle(pos: MapPos, style: Option<PointStyle>) -> Self {
        Self {
            id: NO_ID,
            geometry: RwLock::new(Arc::new(Geometry::Point(pos))),
            style: RwLock::new(style.map(Style::Point)),
            visible: AtomicBool::new(true),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn geometry(&self) -> Arc<Geometry> {
        self.geometry.read().clone()
    }

    pub fn set_geometry(&self, geometry: impl Into<Arc<Geometry>>) {
        *self.geometry.write() = geometry.into();
    }

    /// Position of a point element, `None` for other geometries.
    pub fn pos(&self) -> Option<MapPos> {
        match *self.geometry() {
            Geometry::Point(pos) => Some(pos),
            _ => None,
        }
    }

    pub fn set_pos(&self, pos: MapPos) {
        self.set_geometry(Geometry::Point(pos));
    }

    pub fn style(&self) -> Option<Style> {
        self.style.read().clone()
    }

    pub fn set_style(&self, style: Option<Style>) {
        *self.style.write() = style;
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Release);
    }
}

/// Element identity as used by selection and removal notifications.
///
/// Two absent elements are the same; the same allocation is the same;
/// otherwise elements match by id unless either has [`NO_ID`].
pub fn is_same_element(a: Option<&Arc<VectorElement>>, b: Option<&Arc<VectorElement>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            if Arc::ptr_eq(a, b) {
                return true;
            }
            if a.id() == NO_ID || b.id() == NO_ID {
                return false;
            }
            a.id() == b.id()
        }
        _ => false,
    }
}
