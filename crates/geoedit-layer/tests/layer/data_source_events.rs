use std::sync::Arc;

use geoedit_core::{Geometry, LayerEvent};

use crate::support::{line_element, p, point_element, Fixture};

fn drain(rx: &mut tokio::sync::broadcast::Receiver<LayerEvent>) -> Vec<LayerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn test_removing_selected_element_clears_selection() {
    let fx = Fixture::new();
    let line = line_element(1, vec![p(-20.0, 0.0), p(20.0, 0.0)]);
    fx.add(&line);
    fx.select(&line);
    let mut rx = fx.layer.events().subscribe();

    fx.source.remove(&line).unwrap();

    assert!(fx.layer.selected_vector_element().is_none());
    assert!(fx.layer.overlay_points().is_empty());
    assert_eq!(fx.listener.count("deselect 1"), 1);
    assert!(fx.layer.renderer().elements().is_empty());

    let events = drain(&mut rx);
    assert!(events.contains(&LayerEvent::SelectionChanged { id: None }));
    assert!(events.contains(&LayerEvent::RefreshRequested));

    assert!(!fx.down(-20.0, 0.0));
    assert_eq!(fx.listener.count("start"), 0);
}

#[test]
fn test_removing_other_element_keeps_selection() {
    let fx = Fixture::new();
    let line = line_element(1, vec![p(-20.0, 0.0), p(20.0, 0.0)]);
    let point = point_element(2, p(50.0, 50.0));
    fx.add(&line);
    fx.add(&point);
    fx.select(&line);

    fx.source.remove(&point).unwrap();

    assert!(fx.layer.selected_vector_element().is_some());
    assert_eq!(fx.layer.overlay_points().len(), 3);
    assert_eq!(fx.listener.count("deselect"), 0);
    assert_eq!(fx.layer.renderer().element_count(), 1);
}

#[test]
fn test_remove_all_clears_selection() {
    let fx = Fixture::new();
    let line = line_element(1, vec![p(-20.0, 0.0), p(20.0, 0.0)]);
    fx.add(&line);
    fx.select(&line);

    fx.source.remove_all();

    assert!(fx.layer.selected_vector_element().is_none());
    assert!(fx.layer.overlay_points().is_empty());
    assert_eq!(fx.listener.count("deselect 1"), 1);
    assert_eq!(fx.layer.renderer().element_count(), 0);
}

#[test]
fn test_external_geometry_change_resyncs_overlay() {
    let fx = Fixture::new();
    let line = line_element(
        1,
        vec![p(-60.0, 0.0), p(-20.0, 0.0), p(20.0, 0.0), p(60.0, 0.0)],
    );
    fx.add(&line);
    fx.select(&line);
    assert_eq!(fx.layer.overlay_points().len(), 7);

    fx.source
        .set_geometry(&line, Arc::new(Geometry::Line(vec![p(0.0, 0.0), p(10.0, 10.0)])))
        .unwrap();

    assert_eq!(
        fx.overlay_positions(),
        vec![p(0.0, 0.0), p(5.0, 5.0), p(10.0, 10.0)]
    );
}

#[test]
fn test_added_elements_join_render_set() {
    let fx = Fixture::new();
    fx.source.add_all(vec![
        point_element(1, p(0.0, 0.0)),
        point_element(2, p(10.0, 10.0)),
        point_element(3, p(900.0, 900.0)),
    ]);

    // the third element lies outside the 200x200 view
    assert_eq!(fx.layer.renderer().element_count(), 2);
}

#[test]
fn test_detached_layer_ignores_data_source() {
    let fx = Fixture::new();
    fx.layer.set_components(None, None);
    fx.add(&point_element(1, p(0.0, 0.0)));

    assert_eq!(fx.layer.renderer().element_count(), 0);
    assert!(!fx.down(0.0, 0.0));
}

#[test]
fn test_overlay_follows_selected_copy_when_stored_element_changes() {
    let fx = Fixture::new();
    let vertices = vec![p(-30.0, 0.0), p(-10.0, 0.0), p(10.0, 0.0), p(30.0, 0.0)];
    let stored = line_element(1, vertices.clone());
    let copy = line_element(1, vertices);
    fx.add(&stored);
    fx.select(&copy);
    let before = fx.overlay_positions();
    assert_eq!(before.len(), 7);

    fx.source
        .set_geometry(
            &stored,
            Arc::new(Geometry::Line(vec![p(0.0, 0.0), p(10.0, 10.0)])),
        )
        .unwrap();

    assert_eq!(fx.overlay_positions(), before);
    assert!(Arc::ptr_eq(
        &fx.layer.selected_vector_element().unwrap(),
        &copy
    ));
}
