//! Layout behavior of the UML shapes, checked through the public API.

use float_cmp::assert_approx_eq;

use stencil::{
    ShapeError,
    draw::{FixedTextMeasure, Scale, Surface, SvgSurface, TextAnchor},
    geometry::{Bounds, Point, Size},
    shape::{Actions, Class, ClassConfig, EndState, EndStateConfig, State, StateConfig, UmlShape},
};

fn surface() -> SvgSurface {
    SvgSurface::new(Box::new(FixedTextMeasure::default()))
}

fn frame(x: f32, y: f32, width: f32, height: f32) -> Bounds {
    Bounds::new_from_top_left(Point::new(x, y), Size::new(width, height))
}

#[test]
fn state_divider_position_and_span() {
    let mut surface = surface();
    let config = StateConfig::new(frame(100.0, 50.0, 240.0, 120.0))
        .with_label("Waiting")
        .with_label_offset(Point::new(12.0, 8.0))
        .with_swimlane_offset_y(20.0);
    let state = State::build(config, &mut surface).unwrap();

    let divider = surface.bounding_box(state.parts().swimlane).unwrap();
    assert_approx_eq!(f32, divider.min_y(), 78.0);
    assert_approx_eq!(f32, divider.max_y(), 78.0);
    assert_approx_eq!(f32, divider.min_x(), 100.0);
    assert_approx_eq!(f32, divider.max_x(), 340.0);
}

#[test]
fn state_without_actions_has_empty_action_text() {
    let mut surface = surface();
    let state = State::build(StateConfig::new(frame(0.0, 0.0, 100.0, 60.0)), &mut surface).unwrap();

    let actions = surface.primitive(state.parts().actions).unwrap();
    assert_eq!(actions.text_content(), Some(""));
}

#[test]
fn state_action_text_format() {
    let mut surface = surface();
    let actions = Actions::new()
        .with_entry("a")
        .with_exit("b")
        .with_inner("g1", "act1");
    let config = StateConfig::new(frame(0.0, 0.0, 100.0, 60.0)).with_actions(actions);
    let state = State::build(config, &mut surface).unwrap();

    let text = surface.primitive(state.parts().actions).unwrap();
    assert_eq!(text.text_content(), Some("entry/ a\nexit/ b\ng1/ act1"));
    assert_eq!(text.attributes().text_anchor(), TextAnchor::Start);
}

#[test]
fn state_zoom_replaces_three_inner_primitives() {
    let mut surface = surface();
    let mut state =
        State::build(StateConfig::new(frame(0.0, 0.0, 100.0, 60.0)).with_label("S"), &mut surface)
            .unwrap();
    let before = state.inner();
    let count = surface.len();

    let scale = Scale::new(1.5, 2.0);
    surface.scale(state.wrapper(), scale).unwrap();
    state.zoom(&mut surface, scale).unwrap();

    let after = state.inner();
    assert_eq!(after.len(), 3);
    assert!(before.iter().all(|id| !after.contains(id)));
    assert_eq!(surface.len(), count);
}

#[test]
fn class_zoom_replaces_five_inner_primitives() {
    let mut surface = surface();
    let config = ClassConfig::new(frame(0.0, 0.0, 160.0, 120.0))
        .with_label("Order")
        .with_attributes(["id", "total"])
        .with_methods(["ship()"]);
    let mut class = Class::build(config, &mut surface).unwrap();
    let before = class.inner();
    let count = surface.len();

    let scale = Scale::uniform(0.5);
    surface.scale(class.wrapper(), scale).unwrap();
    class.zoom(&mut surface, scale).unwrap();

    let after = class.inner();
    assert_eq!(after.len(), 5);
    assert!(before.iter().all(|id| !after.contains(id)));
    assert_eq!(surface.len(), count);
}

#[test]
fn stale_handle_after_zoom_is_rejected() {
    let mut surface = surface();
    let mut class = Class::build(ClassConfig::new(frame(0.0, 0.0, 160.0, 120.0)), &mut surface)
        .unwrap();
    let stale = class.parts().label;
    class.zoom(&mut surface, Scale::uniform(1.0)).unwrap();

    assert!(surface.translate(stale, 1.0, 1.0).is_err());
}

#[test]
fn end_state_is_concentric() {
    let mut surface = surface();
    let end = EndState::build(
        EndStateConfig::new(Point::new(-35.0, 12.5)).with_radius(14.0),
        &mut surface,
    )
    .unwrap();

    let ring = surface.bounding_box(end.wrapper()).unwrap();
    let disc = surface.bounding_box(end.disc()).unwrap();
    assert_eq!(ring.center(), disc.center());
    assert_approx_eq!(f32, disc.width(), 14.0);
}

#[test]
fn degenerate_frame_is_rejected_before_drawing() {
    let mut surface = surface();
    let err = Class::build(ClassConfig::new(frame(0.0, 0.0, -10.0, 40.0)), &mut surface)
        .unwrap_err();

    assert!(matches!(err, ShapeError::InvalidGeometry { object: "Class", .. }));
    assert!(surface.is_empty());
}
