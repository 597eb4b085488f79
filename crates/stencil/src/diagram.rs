//! A set of named shapes and connectors on one SVG surface.
//!
//! [`Diagram`] plays the host role for the shapes: it owns the surface,
//! scales wrappers when the diagram is zoomed and then lets every shape
//! re-derive its inner primitives.

use indexmap::IndexMap;
use log::{debug, info};

use stencil_core::{
    draw::{Attributes, PathSegment, PrimitiveId, Scale, Surface, SvgSurface},
    geometry::Point,
};

use crate::{
    arrows::ArrowStyle,
    config::AppConfig,
    error::{ShapeError, StencilError},
    layout,
    shape::{
        Class, ClassConfig, EndState, EndStateConfig, StartState, StartStateConfig, State,
        StateConfig, UmlShape,
    },
};

/// Space left around the content when rendering.
const MARGIN: f32 = 20.0;

/// A straight connector drawn between two shapes.
#[derive(Debug)]
struct Connector {
    from: String,
    to: String,
    style: ArrowStyle,
    primitives: Vec<PrimitiveId>,
}

/// Named UML shapes and the connectors between them.
///
/// # Examples
///
/// ```
/// # use stencil::{Diagram, arrows::ArrowStyle, shape::{StateConfig, StartStateConfig}};
/// # use stencil::draw::{FixedTextMeasure, SvgSurface};
/// # use stencil::geometry::{Bounds, Point, Size};
/// let surface = SvgSurface::new(Box::new(FixedTextMeasure::default()));
/// let mut diagram = Diagram::with_surface(surface);
///
/// diagram.add_start_state("start", StartStateConfig::new(Point::new(20.0, 60.0)))?;
/// diagram.add_state(
///     "idle",
///     StateConfig::new(Bounds::new_from_top_left(Point::new(80.0, 20.0), Size::new(120.0, 80.0)))
///         .with_label("Idle"),
/// )?;
/// diagram.connect("start", "idle", &ArrowStyle::transition())?;
///
/// assert!(diagram.render_svg().contains("Idle"));
/// # Ok::<(), stencil::StencilError>(())
/// ```
#[derive(Debug)]
pub struct Diagram {
    surface: SvgSurface,
    shapes: IndexMap<String, Box<dyn UmlShape>>,
    connectors: Vec<Connector>,
}

impl Diagram {
    /// Creates an empty diagram styled by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::Config`] if the configured background color
    /// is invalid.
    pub fn new(config: &AppConfig) -> Result<Self, StencilError> {
        let style = config.style();
        let background = style.background_color().map_err(StencilError::Config)?;
        let surface = SvgSurface::new(style.text_measure().to_measure())
            .with_text_definition(style.text_definition())
            .with_background(background);
        Ok(Self::with_surface(surface))
    }

    /// Creates an empty diagram drawing on `surface`.
    pub fn with_surface(surface: SvgSurface) -> Self {
        Self {
            surface,
            shapes: IndexMap::new(),
            connectors: Vec::new(),
        }
    }

    pub fn surface(&self) -> &SvgSurface {
        &self.surface
    }

    pub fn add_state(&mut self, name: &str, config: StateConfig) -> Result<(), StencilError> {
        self.insert(name, |surface| Ok(Box::new(State::build(config, surface)?)))
    }

    pub fn add_start_state(
        &mut self,
        name: &str,
        config: StartStateConfig,
    ) -> Result<(), StencilError> {
        self.insert(name, |surface| {
            Ok(Box::new(StartState::build(config, surface)?))
        })
    }

    pub fn add_end_state(&mut self, name: &str, config: EndStateConfig) -> Result<(), StencilError> {
        self.insert(name, |surface| {
            Ok(Box::new(EndState::build(config, surface)?))
        })
    }

    pub fn add_class(&mut self, name: &str, config: ClassConfig) -> Result<(), StencilError> {
        self.insert(name, |surface| Ok(Box::new(Class::build(config, surface)?)))
    }

    fn insert(
        &mut self,
        name: &str,
        build: impl FnOnce(&mut dyn Surface) -> Result<Box<dyn UmlShape>, ShapeError>,
    ) -> Result<(), StencilError> {
        if self.shapes.contains_key(name) {
            return Err(StencilError::DuplicateShape(name.to_string()));
        }

        let shape = build(&mut self.surface).map_err(|err| StencilError::shape(name, err))?;
        debug!(name = name, object = shape.object(); "Added shape");
        self.shapes.insert(name.to_string(), shape);
        Ok(())
    }

    /// Returns the shape registered under `name`.
    pub fn shape(&self, name: &str) -> Option<&dyn UmlShape> {
        self.shapes.get(name).map(|shape| shape.as_ref())
    }

    /// Iterates over the shapes in insertion order.
    pub fn shapes(&self) -> impl Iterator<Item = (&str, &dyn UmlShape)> {
        self.shapes
            .iter()
            .map(|(name, shape)| (name.as_str(), shape.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of connectors currently drawn.
    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// Draws a straight connector from the boundary of `from` to the
    /// boundary of `to`.
    pub fn connect(&mut self, from: &str, to: &str, style: &ArrowStyle) -> Result<(), StencilError> {
        let mut connector = Connector {
            from: from.to_string(),
            to: to.to_string(),
            style: style.clone(),
            primitives: Vec::new(),
        };
        connector.primitives = draw_connector(&mut self.surface, &self.shapes, &connector)?;

        debug!(from = from, to = to, primitives = connector.primitives.len(); "Connected shapes");
        self.connectors.push(connector);
        Ok(())
    }

    /// Scales every wrapper by `scale`, then lets each shape lay its inner
    /// primitives out again. Connectors are redrawn afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::Config`] without touching the surface when a
    /// factor is zero or not finite.
    pub fn zoom(&mut self, scale: Scale) -> Result<(), StencilError> {
        if [scale.sx(), scale.sy()]
            .iter()
            .any(|factor| !factor.is_finite() || *factor == 0.0)
        {
            return Err(StencilError::Config(format!(
                "zoom factors must be finite and non-zero, got {}x{}",
                scale.sx(),
                scale.sy()
            )));
        }

        info!(sx = scale.sx(), sy = scale.sy(), shapes = self.shapes.len(); "Zooming diagram");

        for (name, shape) in &mut self.shapes {
            self.surface.scale(shape.wrapper(), scale)?;
            shape
                .zoom(&mut self.surface, scale)
                .map_err(|err| StencilError::shape(name.as_str(), err))?;
        }

        for connector in &mut self.connectors {
            for id in connector.primitives.drain(..) {
                self.surface.remove(id)?;
            }
            connector.primitives = draw_connector(&mut self.surface, &self.shapes, connector)?;
        }
        Ok(())
    }

    /// Removes a shape and every connector attached to it.
    pub fn remove(&mut self, name: &str) -> Result<(), StencilError> {
        lookup(&self.shapes, name)?
            .remove(&mut self.surface)
            .map_err(|err| StencilError::shape(name, err))?;
        self.shapes.shift_remove(name);

        let (detached, kept) = std::mem::take(&mut self.connectors)
            .into_iter()
            .partition(|c: &Connector| c.from == name || c.to == name);
        self.connectors = kept;
        for connector in detached {
            for id in connector.primitives {
                self.surface.remove(id)?;
            }
        }

        debug!(name = name; "Removed shape");
        Ok(())
    }

    /// Renders the current surface content as an SVG document string.
    pub fn render_svg(&self) -> String {
        info!(shapes = self.shapes.len(), connectors = self.connectors.len(); "Rendering SVG");
        self.surface.render_svg(MARGIN)
    }
}

fn lookup<'a>(
    shapes: &'a IndexMap<String, Box<dyn UmlShape>>,
    name: &str,
) -> Result<&'a dyn UmlShape, StencilError> {
    shapes
        .get(name)
        .map(|shape| shape.as_ref())
        .ok_or_else(|| StencilError::UnknownShape(name.to_string()))
}

fn draw_connector(
    surface: &mut SvgSurface,
    shapes: &IndexMap<String, Box<dyn UmlShape>>,
    connector: &Connector,
) -> Result<Vec<PrimitiveId>, StencilError> {
    let from = lookup(shapes, &connector.from)?;
    let to = lookup(shapes, &connector.to)?;

    let from_center = surface.bounding_box(from.wrapper())?.center();
    let to_center = surface.bounding_box(to.wrapper())?.center();
    let start = from
        .find_intersection(&*surface, to_center)
        .map_err(|err| StencilError::shape(connector.from.as_str(), err))?;
    let end = to
        .find_intersection(&*surface, from_center)
        .map_err(|err| StencilError::shape(connector.to.as_str(), err))?;

    let delta = end.sub_point(start);
    let length = delta.hypot();
    let direction = if length < 0.001 {
        Point::new(1.0, 0.0)
    } else {
        Point::new(delta.x() / length, delta.y() / length)
    };
    let backwards = Point::new(-direction.x(), -direction.y());

    let style = &connector.style;
    let line_start = along(start, direction, style.start().length());
    let line_end = along(end, backwards, style.end().length());

    let primitives = layout::build_atomically(surface, |surface| {
        let mut primitives = Vec::with_capacity(3);

        let line = surface.path(vec![
            PathSegment::MoveTo(line_start),
            PathSegment::LineTo(line_end),
        ]);
        surface.set_attributes(line, &Attributes::new().with_stroke(style.stroke().clone()))?;
        primitives.push(line);

        for (head, tip, pointing) in [
            (style.start(), start, backwards),
            (style.end(), end, direction),
        ] {
            let outline = head.outline(tip, pointing);
            if outline.is_empty() {
                continue;
            }
            let id = surface.path(outline);
            surface.set_attributes(id, &head.attributes())?;
            primitives.push(id);
        }
        Ok::<_, StencilError>(primitives)
    })?;

    Ok(primitives)
}

fn along(point: Point, direction: Point, distance: f32) -> Point {
    Point::new(
        direction.x().mul_add(distance, point.x()),
        direction.y().mul_add(distance, point.y()),
    )
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use stencil_core::{
        draw::FixedTextMeasure,
        geometry::{Bounds, Size},
    };

    use super::*;
    use crate::shape::Actions;

    fn diagram() -> Diagram {
        Diagram::with_surface(SvgSurface::new(Box::new(FixedTextMeasure::default())))
    }

    fn frame(x: f32, y: f32) -> Bounds {
        Bounds::new_from_top_left(Point::new(x, y), Size::new(120.0, 80.0))
    }

    #[test]
    fn test_add_shapes_in_order() {
        let mut diagram = diagram();
        diagram
            .add_start_state("start", StartStateConfig::new(Point::new(10.0, 50.0)))
            .unwrap();
        diagram.add_state("idle", StateConfig::new(frame(60.0, 10.0))).unwrap();
        diagram.add_end_state("end", EndStateConfig::new(Point::new(250.0, 50.0))).unwrap();
        diagram.add_class("Account", ClassConfig::new(frame(300.0, 10.0))).unwrap();

        let objects: Vec<(&str, &str)> =
            diagram.shapes().map(|(name, shape)| (name, shape.object())).collect();
        assert_eq!(
            objects,
            vec![
                ("start", "StartState"),
                ("idle", "State"),
                ("end", "EndState"),
                ("Account", "Class")
            ]
        );
        // 1 + 4 + 2 + 6
        assert_eq!(diagram.surface().len(), 13);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut diagram = diagram();
        diagram.add_state("idle", StateConfig::new(frame(0.0, 0.0))).unwrap();
        let err = diagram
            .add_class("idle", ClassConfig::new(frame(200.0, 0.0)))
            .unwrap_err();

        assert!(matches!(err, StencilError::DuplicateShape(name) if name == "idle"));
        assert_eq!(diagram.surface().len(), 4);
    }

    #[test]
    fn test_invalid_shape_leaves_no_primitives() {
        let mut diagram = diagram();
        let flat = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 0.0));
        let err = diagram.add_state("flat", StateConfig::new(flat)).unwrap_err();

        assert!(matches!(err, StencilError::Shape { ref name, .. } if name == "flat"));
        assert!(diagram.is_empty());
        assert!(diagram.surface().is_empty());
    }

    #[test]
    fn test_connect_between_boundaries() {
        let mut diagram = diagram();
        diagram.add_state("a", StateConfig::new(frame(0.0, 0.0))).unwrap();
        diagram.add_state("b", StateConfig::new(frame(200.0, 0.0))).unwrap();
        diagram.connect("a", "b", &ArrowStyle::dependency()).unwrap();

        assert_eq!(diagram.connector_count(), 1);
        // line + end head
        assert_eq!(diagram.surface().len(), 10);

        let connector = &diagram.connectors[0];
        let line = diagram.surface().bounding_box(connector.primitives[0]).unwrap();
        assert_approx_eq!(f32, line.min_x(), 120.0);
        assert_approx_eq!(f32, line.max_x(), 190.0);
        assert_approx_eq!(f32, line.min_y(), 40.0);

        let head = diagram.surface().bounding_box(connector.primitives[1]).unwrap();
        assert_approx_eq!(f32, head.max_x(), 200.0);
        assert_approx_eq!(f32, head.min_x(), 190.0);
    }

    #[test]
    fn test_connect_unknown_shape() {
        let mut diagram = diagram();
        diagram.add_state("a", StateConfig::new(frame(0.0, 0.0))).unwrap();
        let err = diagram.connect("a", "missing", &ArrowStyle::transition()).unwrap_err();

        assert!(matches!(err, StencilError::UnknownShape(name) if name == "missing"));
        assert_eq!(diagram.connector_count(), 0);
        assert_eq!(diagram.surface().len(), 4);
    }

    #[test]
    fn test_connect_to_circle_boundary() {
        let mut diagram = diagram();
        diagram
            .add_start_state("start", StartStateConfig::new(Point::new(0.0, 40.0)))
            .unwrap();
        diagram.add_state("s", StateConfig::new(frame(100.0, 0.0))).unwrap();
        diagram.connect("start", "s", &ArrowStyle::transition()).unwrap();

        let line = diagram.surface().bounding_box(diagram.connectors[0].primitives[0]).unwrap();
        assert_approx_eq!(f32, line.min_x(), 10.0);
    }

    #[test]
    fn test_zoom_keeps_primitive_count() {
        let mut diagram = diagram();
        let actions = Actions::new().with_entry("open");
        diagram
            .add_state("s", StateConfig::new(frame(0.0, 0.0)).with_actions(actions))
            .unwrap();
        diagram.add_end_state("end", EndStateConfig::new(Point::new(300.0, 40.0))).unwrap();
        diagram.connect("s", "end", &ArrowStyle::transition()).unwrap();
        let count = diagram.surface().len();

        diagram
            .zoom(Scale::uniform(2.0).with_origin(Point::new(0.0, 0.0)))
            .unwrap();

        assert_eq!(diagram.surface().len(), count);
        let wrapper = diagram.shape("s").unwrap().wrapper();
        let bounds = diagram.surface().bounding_box(wrapper).unwrap();
        assert_approx_eq!(f32, bounds.width(), 240.0);
    }

    #[test]
    fn test_zoom_to_nothing_rejected() {
        let mut diagram = diagram();
        diagram.add_state("s", StateConfig::new(frame(0.0, 0.0))).unwrap();
        let wrapper = diagram.shape("s").unwrap().wrapper();
        let before = diagram.surface().bounding_box(wrapper).unwrap();

        let err = diagram.zoom(Scale::uniform(0.0)).unwrap_err();

        assert!(matches!(err, StencilError::Config(_)));
        assert_eq!(diagram.surface().bounding_box(wrapper).unwrap(), before);
        for id in diagram.shape("s").unwrap().inner() {
            assert!(diagram.surface().contains(id));
        }
        diagram.remove("s").unwrap();
        assert!(diagram.surface().is_empty());
    }

    #[test]
    fn test_remove_shape_and_connectors() {
        let mut diagram = diagram();
        diagram.add_state("a", StateConfig::new(frame(0.0, 0.0))).unwrap();
        diagram.add_state("b", StateConfig::new(frame(200.0, 0.0))).unwrap();
        diagram.connect("a", "b", &ArrowStyle::aggregation()).unwrap();

        diagram.remove("b").unwrap();

        assert!(diagram.shape("b").is_none());
        assert_eq!(diagram.connector_count(), 0);
        assert_eq!(diagram.surface().len(), 4);
        assert!(matches!(diagram.remove("b"), Err(StencilError::UnknownShape(_))));
    }

    #[test]
    fn test_render_svg_contains_layers() {
        let mut diagram = diagram();
        diagram
            .add_class("Account", ClassConfig::new(frame(0.0, 0.0)).with_label("Account"))
            .unwrap();
        let svg = diagram.render_svg();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Account"));
        assert!(svg.contains("data-layer=\"content\""));
        assert!(svg.contains("data-layer=\"text\""));
    }

    #[test]
    fn test_new_rejects_bad_background() {
        let config: AppConfig = toml::from_str("[style]\nbackground_color = \"nope\"").unwrap();
        assert!(matches!(Diagram::new(&config), Err(StencilError::Config(_))));
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use stencil_core::{
        draw::FixedTextMeasure,
        geometry::{Bounds, Size},
    };

    use super::*;
    use crate::shape::Actions;

    fn origin_strategy() -> impl Strategy<Value = Point> {
        (-200.0f32..200.0, -200.0f32..200.0).prop_map(|(x, y)| Point::new(x, y))
    }

    /// Bounding boxes of every shape part and connector, in a stable order.
    fn snapshot(diagram: &Diagram) -> Vec<Bounds> {
        let shape_ids = diagram
            .shapes()
            .flat_map(|(_, shape)| std::iter::once(shape.wrapper()).chain(shape.inner()));
        let connector_ids = diagram
            .connectors
            .iter()
            .flat_map(|connector| connector.primitives.iter().copied());

        shape_ids
            .chain(connector_ids)
            .map(|id| diagram.surface().bounding_box(id).unwrap())
            .collect()
    }

    /// Zooming by 1 leaves every bounding box where it was.
    fn check_identity_zoom(origin: Option<Point>) -> Result<(), TestCaseError> {
        let mut diagram = Diagram::with_surface(SvgSurface::new(Box::new(
            FixedTextMeasure::default(),
        )));
        let frame = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(160.0, 90.0));
        diagram
            .add_state(
                "s",
                StateConfig::new(frame)
                    .with_label("Busy")
                    .with_actions(Actions::new().with_entry("start").with_inner("tick", "count")),
            )
            .unwrap();
        let class_frame = frame.translate(Point::new(0.0, 150.0));
        diagram
            .add_class(
                "c",
                ClassConfig::new(class_frame)
                    .with_label("Job")
                    .with_attributes(["id"])
                    .with_methods(["run()"]),
            )
            .unwrap();
        diagram
            .add_end_state("end", EndStateConfig::new(Point::new(300.0, 60.0)))
            .unwrap();
        diagram
            .add_start_state("start", StartStateConfig::new(Point::new(300.0, 200.0)))
            .unwrap();
        diagram.connect("start", "c", &ArrowStyle::transition()).unwrap();

        let before = snapshot(&diagram);
        let mut scale = Scale::uniform(1.0);
        if let Some(origin) = origin {
            scale = scale.with_origin(origin);
        }
        diagram.zoom(scale).unwrap();
        let after = snapshot(&diagram);

        prop_assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(&after) {
            prop_assert!(approx_eq!(f32, a.min_x(), b.min_x(), epsilon = 0.01));
            prop_assert!(approx_eq!(f32, a.min_y(), b.min_y(), epsilon = 0.01));
            prop_assert!(approx_eq!(f32, a.max_x(), b.max_x(), epsilon = 0.01));
            prop_assert!(approx_eq!(f32, a.max_y(), b.max_y(), epsilon = 0.01));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn identity_zoom(origin in proptest::option::of(origin_strategy())) {
            check_identity_zoom(origin)?;
        }
    }
}
