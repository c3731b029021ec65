//! # GeoEdit
//!
//! Interactive vector geometry editing for map layers.
//!
//! ## Architecture
//!
//! GeoEdit is organized as a workspace with multiple crates:
//!
//! 1. **geoedit-core** - Geometry, projections, elements, config, events
//! 2. **geoedit-layer** - Editable layer, overlay handles, drag state machine
//! 3. **geoedit** - Facade and headless demo binary
//!
//! A host attaches an [`EditableVectorLayer`] to its renderer and touch
//! source, installs a [`VectorEditEventListener`] and persists the
//! geometries the listener is handed.

pub use geoedit_core as core;
pub use geoedit_layer as layer;

pub use geoedit_core::{
    is_closed_ring, is_same_element, Color, EditorConfig, Epsg3857, Epsg4326, Error, Geometry,
    LayerEvent, LayerEventDispatcher, LineStyle, MapBounds, MapPos, PlanarProjectionSurface,
    PointStyle, PolygonStyle, Projection, ProjectionSurface, Result, SharedElement,
    SphericalProjectionSurface, Style, VectorElement,
};

pub use geoedit_layer::{
    DataSource, DataSourceListener, DragInfo, DragMode, DragPointStyle, DragResult,
    EditableVectorLayer, HeadlessMapRenderer, LocalVectorDataSource, MapRenderer, ScreenPos,
    TouchAction, TouchDispatcher, TouchHandler, VectorEditEventListener, ViewState,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Pretty console output on stderr, keeping stdout for program output
/// - RUST_LOG environment variable support, falling back to `default_filter`
pub fn init_logging(default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
