//! # GeoEdit Layer
//!
//! Interactive geometry editing for a map layer.
//!
//! The selected element of an [`EditableVectorLayer`] gets overlay handles:
//! one per vertex and one per segment midpoint. Dragging a vertex handle
//! moves the vertex, dragging a midpoint inserts a vertex and dragging the
//! element body translates it. A [`VectorEditEventListener`] arbitrates each
//! gesture and persists the resulting geometry.
//!
//! ## Modules
//! - [`layer`]: the editable layer and its drag state machine
//! - [`overlay`]: overlay handle derivation and slot layout
//! - [`mutation`]: geometry edits addressed by overlay slot
//! - [`selection_manager`]: selection state
//! - [`listener`]: edit event listener contract
//! - [`data_source`], [`renderer`], [`touch`]: collaborators

pub mod data_source;
pub mod layer;
pub mod listener;
pub mod mutation;
pub mod overlay;
pub mod renderer;
pub mod selection_manager;
pub mod touch;

pub use data_source::{DataSource, DataSourceListener, ListenerHandle, LocalVectorDataSource};
pub use layer::{DragSession, EditableVectorLayer};
pub use listener::{
    default_drag_point_style, DragInfo, DragMode, DragPointStyle, DragResult,
    VectorEditEventListener,
};
pub use mutation::{remove_point, translate, update_point, GeometryEdit};
pub use overlay::{overlay_point_specs, OverlayDelta, OverlayPointSpec, OverlayStyles};
pub use renderer::{
    ElementRenderer, HeadlessMapRenderer, MapRenderer, Ray, RayIntersectedElement, RenderCommand,
    ViewState,
};
pub use selection_manager::SelectionManager;
pub use touch::{OnTouchListener, ScreenPos, TouchAction, TouchDispatcher, TouchHandler};
