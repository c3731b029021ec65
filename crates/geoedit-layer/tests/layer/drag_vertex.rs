use std::sync::Arc;

use geoedit_core::{is_closed_ring, Geometry};
use geoedit_layer::DragResult;

use crate::support::{line_element, p, polygon_element, Fixture};

fn four_point_line() -> Vec<geoedit_core::MapPos> {
    vec![p(-60.0, 0.0), p(-20.0, 0.0), p(20.0, 0.0), p(60.0, 0.0)]
}

#[test]
fn test_dragging_midpoint_inserts_vertex() {
    let fx = Fixture::new();
    let line = line_element(1, four_point_line());
    fx.add(&line);
    fx.select(&line);

    let before = fx.layer.overlay_points();
    assert_eq!(before.len(), 7);
    assert_eq!(before[3].pos(), Some(p(0.0, 0.0)));
    let grabbed = before[3].clone();

    assert!(fx.down(0.0, 0.0));
    assert!(fx.layer.drag_session().started);
    assert_eq!(fx.layer.overlay_points().len(), 9);
    // the grabbed midpoint now sits on the inserted vertex
    assert!(Arc::ptr_eq(&fx.layer.overlay_points()[4], &grabbed));

    assert!(fx.move_to(0.0, 30.0));
    assert!(fx.up(0.0, 30.0));

    assert_eq!(
        *line.geometry(),
        Geometry::Line(vec![
            p(-60.0, 0.0),
            p(-20.0, 0.0),
            p(0.0, 30.0),
            p(20.0, 0.0),
            p(60.0, 0.0)
        ])
    );
    assert_eq!(fx.layer.overlay_points().len(), 9);
    assert!(!fx.layer.drag_session().started);
    assert_eq!(fx.listener.count("start"), 1);
    assert_eq!(fx.listener.count("start Vertex"), 1);
}

#[test]
fn test_dragging_vertex_moves_it() {
    let fx = Fixture::new();
    let line = line_element(1, four_point_line());
    fx.add(&line);
    fx.select(&line);

    assert!(fx.down(-20.0, 0.0));
    assert!(fx.move_to(-20.0, 40.0));
    assert!(fx.up(-25.0, 45.0));

    assert_eq!(
        *line.geometry(),
        Geometry::Line(vec![p(-60.0, 0.0), p(-25.0, 45.0), p(20.0, 0.0), p(60.0, 0.0)])
    );
    assert_eq!(fx.overlay_positions()[2], p(-25.0, 45.0));
    assert_eq!(fx.overlay_positions()[1], p(-42.5, 22.5));
}

#[test]
fn test_deleting_vertex_of_closed_pentagon_keeps_closure() {
    let fx = Fixture::new();
    let polygon = polygon_element(
        1,
        vec![
            p(0.0, 0.0),
            p(40.0, 0.0),
            p(50.0, 30.0),
            p(20.0, 50.0),
            p(-10.0, 30.0),
            p(0.0, 0.0),
        ],
    );
    fx.add(&polygon);
    fx.select(&polygon);
    assert_eq!(fx.layer.overlay_points().len(), 10);

    fx.listener
        .set_results(DragResult::Delete, DragResult::Ignore, DragResult::Ignore);
    assert!(fx.down(0.0, 0.0));
    assert!(!fx.layer.drag_session().started);

    let Geometry::Polygon(rings) = &*polygon.geometry() else {
        panic!("expected polygon");
    };
    assert_eq!(
        rings[0],
        vec![p(40.0, 0.0), p(50.0, 30.0), p(20.0, 50.0), p(-10.0, 30.0), p(40.0, 0.0)]
    );
    assert!(is_closed_ring(&rings[0]));
    assert_eq!(fx.layer.overlay_points().len(), 8);
}

#[test]
fn test_deleting_below_minimum_deletes_element() {
    let fx = Fixture::new();
    let line = line_element(1, vec![p(-20.0, 0.0), p(20.0, 0.0)]);
    fx.add(&line);
    fx.select(&line);

    fx.listener
        .set_results(DragResult::Delete, DragResult::Ignore, DragResult::Ignore);
    assert!(fx.down(20.0, 0.0));

    assert_eq!(fx.listener.count("delete 1"), 1);
    assert!(fx.source.is_empty());
    assert!(fx.layer.selected_vector_element().is_none());
    assert!(fx.layer.overlay_points().is_empty());
}

#[test]
fn test_vertex_stop_consumes_touch() {
    let fx = Fixture::new();
    let line = line_element(1, four_point_line());
    fx.add(&line);
    fx.select(&line);

    fx.listener
        .set_results(DragResult::Stop, DragResult::Modify, DragResult::Modify);
    assert!(fx.down(-20.0, 0.0));
    assert!(!fx.layer.drag_session().started);
    assert!(!fx.move_to(0.0, 50.0));
    assert_eq!(*line.geometry(), Geometry::Line(four_point_line()));
}

#[test]
fn test_move_ignore_keeps_session_without_update() {
    let fx = Fixture::new();
    let line = line_element(1, four_point_line());
    fx.add(&line);
    fx.select(&line);

    fx.listener
        .set_results(DragResult::Modify, DragResult::Ignore, DragResult::Ignore);
    assert!(fx.down(20.0, 0.0));
    assert!(!fx.move_to(20.0, 50.0));
    assert!(fx.layer.drag_session().started);
    assert_eq!(*line.geometry(), Geometry::Line(four_point_line()));

    assert!(!fx.up(20.0, 50.0));
    assert!(!fx.layer.drag_session().started);
    assert_eq!(*line.geometry(), Geometry::Line(four_point_line()));
}

#[test]
fn test_move_stop_and_delete_end_session() {
    let fx = Fixture::new();
    let line = line_element(1, four_point_line());
    fx.add(&line);
    fx.select(&line);

    fx.listener
        .set_results(DragResult::Modify, DragResult::Stop, DragResult::Modify);
    assert!(fx.down(20.0, 0.0));
    assert!(fx.move_to(20.0, 50.0));
    assert!(!fx.layer.drag_session().started);
    assert!(!fx.up(20.0, 50.0));

    fx.listener
        .set_results(DragResult::Modify, DragResult::Delete, DragResult::Modify);
    assert!(fx.down(20.0, 0.0));
    assert!(fx.move_to(20.0, 50.0));
    assert!(!fx.layer.drag_session().started);
    assert_eq!(
        *line.geometry(),
        Geometry::Line(vec![p(-60.0, 0.0), p(-20.0, 0.0), p(60.0, 0.0)])
    );
    assert_eq!(fx.layer.overlay_points().len(), 5);
}

#[test]
fn test_missing_listener_makes_layer_inert() {
    let fx = Fixture::new();
    let line = line_element(1, four_point_line());
    fx.add(&line);
    fx.select(&line);
    fx.layer.set_vector_edit_event_listener(None);

    assert!(!fx.down(-20.0, 0.0));
    assert!(!fx.move_to(0.0, 50.0));
    assert!(!fx.up(0.0, 50.0));
    assert_eq!(*line.geometry(), Geometry::Line(four_point_line()));
    assert_eq!(fx.listener.count("start"), 0);
}
