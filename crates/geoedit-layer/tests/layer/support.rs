//! Shared fixture: a layer attached to a headless renderer and a touch
//! dispatcher, with a listener that records calls and persists edits into
//! the data source.

use glam::DVec3;
use parking_lot::Mutex;
use std::sync::Arc;

use geoedit_core::{
    Epsg3857, Geometry, LineStyle, MapPos, PlanarProjectionSurface, PointStyle, PolygonStyle,
    SharedElement, Style, VectorElement,
};
use geoedit_layer::{
    default_drag_point_style, DragInfo, DragPointStyle, DragResult, EditableVectorLayer,
    HeadlessMapRenderer, LocalVectorDataSource, MapRenderer, ScreenPos, TouchAction,
    TouchDispatcher, TouchHandler, VectorEditEventListener, ViewState,
};

type Hook = Box<dyn Fn() + Send + Sync>;

pub struct RecordingListener {
    source: Arc<LocalVectorDataSource>,
    pub calls: Mutex<Vec<String>>,
    pub accept_select: Mutex<bool>,
    pub handle_styles: Mutex<bool>,
    pub start_result: Mutex<DragResult>,
    pub move_result: Mutex<DragResult>,
    pub end_result: Mutex<DragResult>,
    pub on_move: Mutex<Option<Hook>>,
}

impl RecordingListener {
    pub fn new(source: Arc<LocalVectorDataSource>) -> Self {
        Self {
            source,
            calls: Mutex::new(Vec::new()),
            accept_select: Mutex::new(true),
            handle_styles: Mutex::new(true),
            start_result: Mutex::new(DragResult::Modify),
            move_result: Mutex::new(DragResult::Modify),
            end_result: Mutex::new(DragResult::Modify),
            on_move: Mutex::new(None),
        }
    }

    pub fn set_results(&self, start: DragResult, on_move: DragResult, end: DragResult) {
        *self.start_result.lock() = start;
        *self.move_result.lock() = on_move;
        *self.end_result.lock() = end;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

impl VectorEditEventListener for RecordingListener {
    fn on_element_select(&self, element: &SharedElement) -> bool {
        self.record(format!("select {}", element.id()));
        *self.accept_select.lock()
    }

    fn on_element_deselected(&self, element: &SharedElement) {
        self.record(format!("deselect {}", element.id()));
    }

    fn on_select_drag_point_style(
        &self,
        _element: &SharedElement,
        style: DragPointStyle,
    ) -> Option<PointStyle> {
        if *self.handle_styles.lock() {
            Some(default_drag_point_style(style))
        } else {
            None
        }
    }

    fn on_drag_start(&self, info: &DragInfo) -> DragResult {
        self.record(format!("start {:?}", info.mode));
        *self.start_result.lock()
    }

    fn on_drag_move(&self, info: &DragInfo) -> DragResult {
        self.record(format!("move {:?}", info.mode));
        if let Some(hook) = self.on_move.lock().as_ref() {
            hook();
        }
        *self.move_result.lock()
    }

    fn on_drag_end(&self, info: &DragInfo) -> DragResult {
        self.record(format!("end {:?}", info.mode));
        *self.end_result.lock()
    }

    fn on_element_modify(&self, element: &SharedElement, geometry: Arc<Geometry>) {
        self.record(format!("modify {}", element.id()));
        let _ = self.source.set_geometry(element, geometry);
    }

    fn on_element_delete(&self, element: &SharedElement) {
        self.record(format!("delete {}", element.id()));
        let _ = self.source.remove(element);
    }
}

pub struct Fixture {
    pub source: Arc<LocalVectorDataSource>,
    pub renderer: Arc<HeadlessMapRenderer>,
    pub touch: Arc<TouchDispatcher>,
    pub listener: Arc<RecordingListener>,
    pub layer: Arc<EditableVectorLayer>,
}

impl Fixture {
    /// 200x200 pixel view centred on the origin, one map unit per pixel.
    pub fn new() -> Self {
        let source = Arc::new(LocalVectorDataSource::new(Arc::new(Epsg3857)));
        let renderer = Arc::new(HeadlessMapRenderer::new(
            ViewState::new(DVec3::ZERO, 1.0, 200, 200),
            Some(Arc::new(PlanarProjectionSurface)),
        ));
        let touch = Arc::new(TouchDispatcher::new());
        let listener = Arc::new(RecordingListener::new(source.clone()));

        let layer = EditableVectorLayer::new(source.clone());
        layer.set_vector_edit_event_listener(Some(listener.clone()));
        let map_renderer: Arc<dyn MapRenderer> = renderer.clone();
        let touch_handler: Arc<dyn TouchHandler> = touch.clone();
        layer.set_components(Some(&map_renderer), Some(&touch_handler));

        Self {
            source,
            renderer,
            touch,
            listener,
            layer,
        }
    }

    pub fn add(&self, element: &SharedElement) {
        self.source.add(element.clone());
    }

    pub fn select(&self, element: &SharedElement) {
        self.layer.set_selected_vector_element(Some(element.clone()));
    }

    pub fn down(&self, x: f64, y: f64) -> bool {
        self.touch.dispatch(TouchAction::Pointer1Down, screen(x, y), ScreenPos::default())
    }

    pub fn move_to(&self, x: f64, y: f64) -> bool {
        self.touch.dispatch(TouchAction::Move, screen(x, y), ScreenPos::default())
    }

    pub fn up(&self, x: f64, y: f64) -> bool {
        self.touch.dispatch(TouchAction::Pointer1Up, screen(x, y), ScreenPos::default())
    }

    pub fn overlay_positions(&self) -> Vec<MapPos> {
        self.layer
            .overlay_points()
            .iter()
            .filter_map(|p| p.pos())
            .collect()
    }
}

/// Screen position of a map position in the fixture view.
pub fn screen(x: f64, y: f64) -> ScreenPos {
    ScreenPos::new((x + 100.0) as f32, (100.0 - y) as f32)
}

pub fn p(x: f64, y: f64) -> MapPos {
    MapPos::new(x, y)
}

pub fn point_element(id: i64, pos: MapPos) -> SharedElement {
    Arc::new(VectorElement::new(
        id,
        Geometry::Point(pos),
        Style::Point(PointStyle::default()),
    ))
}

pub fn line_element(id: i64, poses: Vec<MapPos>) -> SharedElement {
    Arc::new(VectorElement::new(
        id,
        Geometry::Line(poses),
        Style::Line(LineStyle::default()),
    ))
}

pub fn polygon_element(id: i64, ring: Vec<MapPos>) -> SharedElement {
    Arc::new(VectorElement::new(
        id,
        Geometry::polygon(ring),
        Style::Polygon(PolygonStyle::default()),
    ))
}
