//! Headless demo: selects a polygon, drags one of its midpoints and then
//! the whole polygon, printing the geometry after each gesture as JSON.
//!
//! Usage: `geoedit [config.json]`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use glam::DVec3;

use geoedit::{
    init_logging, DragInfo, DragResult, EditableVectorLayer, EditorConfig, Epsg3857, Geometry,
    HeadlessMapRenderer, LocalVectorDataSource, MapPos, MapRenderer, PlanarProjectionSurface,
    PolygonStyle, ScreenPos, SharedElement, Style, TouchAction, TouchDispatcher, TouchHandler,
    VectorEditEventListener, VectorElement, ViewState, BUILD_DATE, VERSION,
};

/// Accepts every gesture and writes edits back to the data source.
struct PersistingListener {
    source: Arc<LocalVectorDataSource>,
}

impl VectorEditEventListener for PersistingListener {
    fn on_drag_start(&self, info: &DragInfo) -> DragResult {
        tracing::info!("Drag start ({:?}) at {}", info.mode, info.screen_pos);
        DragResult::Modify
    }

    fn on_drag_move(&self, _info: &DragInfo) -> DragResult {
        DragResult::Modify
    }

    fn on_drag_end(&self, info: &DragInfo) -> DragResult {
        tracing::info!("Drag end ({:?}) at {}", info.mode, info.screen_pos);
        DragResult::Modify
    }

    fn on_element_modify(&self, element: &SharedElement, geometry: Arc<Geometry>) {
        if let Err(e) = self.source.set_geometry(element, geometry) {
            tracing::warn!("Failed to store geometry: {}", e);
        }
    }

    fn on_element_delete(&self, element: &SharedElement) {
        if let Err(e) = self.source.remove(element) {
            tracing::warn!("Failed to delete element: {}", e);
        }
    }
}

fn load_config() -> anyhow::Result<EditorConfig> {
    match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => EditorConfig::load_from_file(&path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(EditorConfig::default()),
    }
}

fn drag(touch: &TouchDispatcher, view_state: &ViewState, path: &[MapPos]) -> bool {
    let to_screen = |pos: &MapPos| view_state.world_to_screen(DVec3::new(pos.x, pos.y, 0.0));
    let (Some(first), Some(last)) = (path.first(), path.last()) else {
        return false;
    };
    let unused = ScreenPos::default();
    let mut consumed = touch.dispatch(TouchAction::Pointer1Down, to_screen(first), unused);
    for pos in &path[1..] {
        consumed &= touch.dispatch(TouchAction::Move, to_screen(pos), unused);
    }
    consumed & touch.dispatch(TouchAction::Pointer1Up, to_screen(last), unused)
}

fn print_geometry(label: &str, element: &SharedElement) -> anyhow::Result<()> {
    let json = serde_json::to_string(&*element.geometry())?;
    println!("{}: {}", label, json);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_logging(&config.log_filter)?;
    tracing::info!("GeoEdit {} (built {})", VERSION, BUILD_DATE);

    let source = Arc::new(LocalVectorDataSource::new(Arc::new(Epsg3857)));
    let view_state = ViewState::new(DVec3::ZERO, 1.0, 400, 400);
    let renderer = Arc::new(HeadlessMapRenderer::new(
        view_state.clone(),
        Some(Arc::new(PlanarProjectionSurface)),
    ));
    let touch = Arc::new(TouchDispatcher::new());

    let layer = EditableVectorLayer::with_config(source.clone(), config)?;
    layer.set_vector_edit_event_listener(Some(Arc::new(PersistingListener {
        source: source.clone(),
    })));
    let map_renderer: Arc<dyn MapRenderer> = renderer.clone();
    let touch_handler: Arc<dyn TouchHandler> = touch.clone();
    layer.set_components(Some(&map_renderer), Some(&touch_handler));

    let square: SharedElement = Arc::new(VectorElement::new(
        1,
        Geometry::polygon(vec![
            MapPos::new(-50.0, -50.0),
            MapPos::new(50.0, -50.0),
            MapPos::new(50.0, 50.0),
            MapPos::new(-50.0, 50.0),
            MapPos::new(-50.0, -50.0),
        ]),
        Style::Polygon(PolygonStyle::default()),
    ));
    source.add(square.clone());
    layer.set_selected_vector_element(Some(square.clone()));
    print_geometry("selected", &square)?;

    // pull the bottom edge midpoint down to make a pentagon
    drag(
        &touch,
        &view_state,
        &[MapPos::new(0.0, -50.0), MapPos::new(0.0, -70.0), MapPos::new(0.0, -90.0)],
    );
    print_geometry("vertex inserted", &square)?;

    // move the body to the right
    drag(
        &touch,
        &view_state,
        &[MapPos::new(0.0, 0.0), MapPos::new(30.0, 0.0), MapPos::new(60.0, 10.0)],
    );
    print_geometry("translated", &square)?;

    let view_state = map_renderer.view_state();
    layer.on_draw_frame(0.0, &view_state);
    tracing::info!(
        "Rendered {} commands, {} overlay handles",
        renderer.take_commands().len(),
        layer.overlay_points().len()
    );
    Ok(())
}
