//! Integration tests for the DiagramBuilder API

use stencil::draw::Surface;
use stencil::{
    DiagramBuilder, StencilError,
    config::{AppConfig, StyleConfig, TextMeasureKind},
};

fn builder() -> DiagramBuilder {
    let style = StyleConfig::default().with_text_measure(TextMeasureKind::Fixed);
    DiagramBuilder::new(AppConfig::new(style))
}

const STATES: &str = r#"
    [[shape]]
    kind = "StartState"
    name = "start"
    position = { x = 20.0, y = 60.0 }

    [[shape]]
    kind = "State"
    name = "idle"
    label = "Idle"
    rect = { x = 80.0, y = 20.0, width = 140.0, height = 80.0 }
    actions = { entry = "reset", inner = [["tick", "count"]] }

    [[shape]]
    kind = "EndState"
    name = "done"
    position = { x = 300.0, y = 60.0 }

    [[link]]
    from = "start"
    to = "idle"

    [[link]]
    from = "idle"
    to = "done"
"#;

#[test]
fn test_builder_api_exists() {
    let _builder = DiagramBuilder::default();
}

#[test]
fn test_parse_state_scene() {
    let scene = builder().parse(STATES).expect("Failed to parse scene");
    assert_eq!(scene.shapes().len(), 3);
    assert_eq!(scene.links().len(), 2);
}

#[test]
fn test_render_state_scene() {
    let builder = builder();
    let scene = builder.parse(STATES).expect("Failed to parse scene");
    let svg = builder.render_svg(&scene).expect("Failed to render scene");

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("Idle"));
    assert!(svg.contains("entry/ reset"));
    assert!(svg.contains("tick/ count"));
}

#[test]
fn test_build_counts_primitives() {
    let builder = builder();
    let scene = builder.parse(STATES).unwrap();
    let diagram = builder.build(&scene).unwrap();

    assert_eq!(diagram.len(), 3);
    assert_eq!(diagram.connector_count(), 2);
    // start 1, idle 4, done 2, two links with a head each
    assert_eq!(diagram.surface().len(), 11);
}

#[test]
fn test_zoomed_scene_keeps_primitive_count() {
    let builder = builder();
    let plain = builder.parse(STATES).unwrap();
    let zoomed = builder.parse(&format!("zoom = 2.0\n{STATES}")).unwrap();

    let plain = builder.build(&plain).unwrap();
    let zoomed = builder.build(&zoomed).unwrap();
    assert_eq!(plain.surface().len(), zoomed.surface().len());

    let width = |d: &stencil::Diagram| {
        let wrapper = d.shape("idle").unwrap().wrapper();
        d.surface().bounding_box(wrapper).unwrap().width()
    };
    assert_eq!(width(&zoomed), 2.0 * width(&plain));
}

#[test]
fn test_parse_invalid_scene_returns_error() {
    let result = builder().parse("[[shape]]\nkind = 3\n");
    assert!(matches!(result, Err(StencilError::Scene { .. })));
}

#[test]
fn test_unknown_link_target() {
    let builder = builder();
    let scene = builder
        .parse("[[shape]]\nkind = \"StartState\"\nname = \"s\"\n\n[[link]]\nfrom = \"s\"\nto = \"x\"\n")
        .unwrap();
    let err = builder.render_svg(&scene).unwrap_err();
    assert_eq!(err.to_string(), "Unknown shape `x`");
}

#[test]
fn test_builder_reusability() {
    let builder = builder();
    let scene = builder.parse(STATES).unwrap();

    let first = builder.render_svg(&scene).unwrap();
    let second = builder.render_svg(&scene).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_render_dashed_class_outline() {
    let source = r#"
        [[shape]]
        kind = "Class"
        name = "Shape"
        label = "Shape"
        rect = { x = 0.0, y = 0.0, width = 140.0, height = 100.0 }
        style = { stroke_style = "dashed" }
    "#;

    let builder = builder();
    let scene = builder.parse(source).expect("Failed to parse scene");
    let svg = builder.render_svg(&scene).expect("Failed to render scene");

    assert!(svg.contains("stroke-dasharray=\"5,5\""));
}
