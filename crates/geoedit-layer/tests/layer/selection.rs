use std::sync::Arc;

use geoedit_core::{EditorConfig, Epsg3857, LayerEvent};
use geoedit_layer::{EditableVectorLayer, LocalVectorDataSource};

use crate::support::{line_element, p, point_element, Fixture};

#[test]
fn test_select_builds_overlay() {
    let fx = Fixture::new();
    let line = line_element(1, vec![p(-20.0, 0.0), p(20.0, 0.0)]);
    fx.add(&line);
    let mut rx = fx.layer.events().subscribe();

    fx.select(&line);

    let selected = fx.layer.selected_vector_element().unwrap();
    assert!(Arc::ptr_eq(&selected, &line));
    assert_eq!(fx.layer.overlay_points().len(), 3);
    assert_eq!(fx.listener.calls(), vec!["select 1".to_string()]);
    assert_eq!(
        rx.try_recv().unwrap(),
        LayerEvent::SelectionChanged { id: Some(1) }
    );
}

#[test]
fn test_declined_selection_leaves_nothing_selected() {
    let fx = Fixture::new();
    let line = line_element(1, vec![p(-20.0, 0.0), p(20.0, 0.0)]);
    fx.add(&line);
    *fx.listener.accept_select.lock() = false;

    fx.select(&line);

    assert!(fx.layer.selected_vector_element().is_none());
    assert!(fx.layer.overlay_points().is_empty());
    assert_eq!(fx.listener.count("select 1"), 1);
}

#[test]
fn test_reselecting_same_element_is_noop() {
    let fx = Fixture::new();
    let line = line_element(1, vec![p(-20.0, 0.0), p(20.0, 0.0)]);
    fx.add(&line);

    fx.select(&line);
    let handles = fx.layer.overlay_points();
    fx.select(&line);

    assert_eq!(fx.listener.count("select"), 1);
    assert_eq!(fx.listener.count("deselect"), 0);
    assert!(Arc::ptr_eq(&fx.layer.overlay_points()[0], &handles[0]));
}

#[test]
fn test_switching_selection_deselects_previous() {
    let fx = Fixture::new();
    let first = point_element(1, p(0.0, 0.0));
    let second = point_element(2, p(10.0, 10.0));
    fx.add(&first);
    fx.add(&second);

    fx.select(&first);
    fx.select(&second);
    fx.layer.set_selected_vector_element(None);

    assert_eq!(
        fx.listener.calls(),
        vec!["select 1", "deselect 1", "select 2", "deselect 2"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
    );
    assert!(fx.layer.overlay_points().is_empty());
}

#[test]
fn test_selection_abandons_drag() {
    let fx = Fixture::new();
    let first = line_element(1, vec![p(-20.0, 0.0), p(20.0, 0.0)]);
    let second = point_element(2, p(50.0, 50.0));
    fx.add(&first);
    fx.add(&second);
    fx.select(&first);

    assert!(fx.down(-20.0, 0.0));
    assert!(fx.layer.drag_session().started);
    fx.select(&second);

    assert!(!fx.layer.drag_session().started);
    assert!(!fx.move_to(0.0, 40.0));
}

#[test]
fn test_no_listener_means_no_selection() {
    let fx = Fixture::new();
    fx.layer.set_vector_edit_event_listener(None);
    let line = line_element(1, vec![p(-20.0, 0.0), p(20.0, 0.0)]);
    fx.add(&line);

    fx.select(&line);

    assert!(fx.layer.selected_vector_element().is_none());
    assert!(fx.layer.overlay_points().is_empty());
}

#[test]
fn test_with_config_rejects_invalid_config() {
    let source = Arc::new(LocalVectorDataSource::new(Arc::new(Epsg3857)));
    let config = EditorConfig {
        event_channel_capacity: 0,
        ..EditorConfig::default()
    };
    assert!(EditableVectorLayer::with_config(source.clone(), config).is_err());

    let config = EditorConfig {
        overlay_pick_padding_px: 10.0,
        ..EditorConfig::default()
    };
    let layer = EditableVectorLayer::with_config(source, config).unwrap();
    assert_eq!(layer.config().overlay_pick_padding_px, 10.0);
}
