use std::sync::Arc;

use geoedit_core::Color;
use geoedit_layer::{MapRenderer, RenderCommand};

use crate::support::{line_element, p, point_element, Fixture};

fn selected_line_fixture() -> Fixture {
    let fx = Fixture::new();
    let line = line_element(
        1,
        vec![p(-60.0, 0.0), p(-20.0, 0.0), p(20.0, 0.0), p(60.0, 0.0)],
    );
    fx.add(&line);
    fx.select(&line);
    fx.renderer.take_commands();
    fx
}

#[test]
fn test_partial_opacity_blends_overlay_pass() {
    let fx = selected_line_fixture();
    fx.layer.set_opacity(0.5);

    let view_state = fx.renderer.view_state();
    assert!(!fx.layer.on_draw_frame(0.016, &view_state));

    assert_eq!(
        fx.renderer.take_commands(),
        vec![
            RenderCommand::Draw { elements: 1 },
            RenderCommand::ClearAndBind(Color::TRANSPARENT),
            RenderCommand::Draw { elements: 7 },
            RenderCommand::BlendAndUnbind(0.5),
        ]
    );
}

#[test]
fn test_full_opacity_draws_directly() {
    let fx = selected_line_fixture();

    let view_state = fx.renderer.view_state();
    fx.layer.on_draw_frame(0.016, &view_state);

    assert_eq!(
        fx.renderer.take_commands(),
        vec![
            RenderCommand::Draw { elements: 1 },
            RenderCommand::Draw { elements: 7 },
        ]
    );
}

#[test]
fn test_opacity_is_clamped() {
    let fx = Fixture::new();
    fx.layer.set_opacity(3.0);
    assert_eq!(fx.layer.opacity(), 1.0);
    fx.layer.set_opacity(-1.0);
    assert_eq!(fx.layer.opacity(), 0.0);
}

#[test]
fn test_hidden_layer_draws_nothing() {
    let fx = selected_line_fixture();
    fx.layer.set_visible(false);

    let view_state = fx.renderer.view_state();
    assert!(!fx.layer.on_draw_frame(0.016, &view_state));
    assert!(fx.renderer.take_commands().is_empty());
}

#[test]
fn test_selected_element_outside_view_is_rendered() {
    let fx = Fixture::new();
    let far = point_element(1, p(500.0, 500.0));
    let also_far = point_element(2, p(-500.0, 500.0));
    fx.add(&far);
    fx.add(&also_far);
    assert_eq!(fx.layer.renderer().element_count(), 0);

    fx.select(&far);

    let rendered = fx.layer.renderer().elements();
    assert_eq!(rendered.len(), 1);
    assert!(Arc::ptr_eq(&rendered[0], &far));
    assert_eq!(fx.layer.overlay_points().len(), 1);
}

#[test]
fn test_overlay_empty_without_projection_surface() {
    let fx = Fixture::new();
    fx.renderer.set_projection_surface(None);
    let line = line_element(1, vec![p(-20.0, 0.0), p(20.0, 0.0)]);
    fx.add(&line);
    fx.select(&line);

    assert!(fx.layer.selected_vector_element().is_some());
    assert!(fx.layer.overlay_points().is_empty());
    assert!(!fx.down(-20.0, 0.0));
}

#[test]
fn test_overlay_empty_for_invisible_element() {
    let fx = Fixture::new();
    let line = line_element(1, vec![p(-20.0, 0.0), p(20.0, 0.0)]);
    line.set_visible(false);
    fx.add(&line);
    fx.select(&line);

    assert!(fx.layer.overlay_points().is_empty());
}

#[test]
fn test_edits_request_redraws() {
    let fx = selected_line_fixture();
    let before = fx.renderer.redraw_requests();

    assert!(fx.down(-20.0, 0.0));
    assert!(fx.move_to(-20.0, 10.0));

    assert!(fx.renderer.redraw_requests() > before);
}
