//! In-memory [`Surface`] that renders to SVG.
//!
//! [`SvgSurface`] keeps every primitive in creation order, measures text with
//! a [`TextMeasure`] at creation time and serializes the live primitives into
//! an SVG document on demand.
//!
//! ```
//! # use stencil_core::draw::{FixedTextMeasure, Surface, SvgSurface};
//! # use stencil_core::geometry::{Bounds, Point, Size};
//! let mut surface = SvgSurface::new(Box::new(FixedTextMeasure::default()));
//! let rect = surface.rectangle(
//!     Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(120.0, 60.0)),
//!     15.0,
//! );
//! let label = surface.text(Point::new(70.0, 20.0), "Idle");
//!
//! assert_eq!(surface.len(), 2);
//! assert!(surface.bounding_box(rect).unwrap().has_area());
//! assert!(surface.render_svg(0.0).contains("Idle"));
//! # let _ = label;
//! ```

use log::{debug, trace};
use svg::{Document, node::element as svg_element};

use crate::{
    color::Color,
    draw::{
        Attributes, LayeredOutput, PathSegment, Primitive, PrimitiveId, PrimitiveKind,
        RenderLayer, Scale, Surface, SurfaceError, TextDefinition, TextMeasure,
    },
    geometry::{Bounds, Point, Size},
};

/// A retained surface whose primitives render to SVG.
#[derive(Debug)]
pub struct SvgSurface {
    primitives: Vec<Option<Primitive>>,
    text_definition: TextDefinition,
    measure: Box<dyn TextMeasure>,
    background: Option<Color>,
}

impl SvgSurface {
    /// Creates an empty surface using `measure` for text metrics.
    pub fn new(measure: Box<dyn TextMeasure>) -> Self {
        Self {
            primitives: Vec::new(),
            text_definition: TextDefinition::default(),
            measure,
            background: None,
        }
    }

    /// Sets the font used for every text primitive (builder style).
    ///
    /// Only affects text created afterwards.
    pub fn with_text_definition(mut self, text_definition: TextDefinition) -> Self {
        self.text_definition = text_definition;
        self
    }

    /// Sets the document background color (builder style).
    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    pub fn text_definition(&self) -> &TextDefinition {
        &self.text_definition
    }

    /// Number of live (not removed) primitives.
    pub fn len(&self) -> usize {
        self.primitives.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a live primitive.
    pub fn primitive(&self, id: PrimitiveId) -> Result<&Primitive, SurfaceError> {
        self.primitives
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(SurfaceError::UnknownPrimitive(id))
    }

    /// Returns true if `id` refers to a live primitive.
    pub fn contains(&self, id: PrimitiveId) -> bool {
        self.primitive(id).is_ok()
    }

    /// Iterates over live primitives in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveId, &Primitive)> {
        self.primitives
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|p| (PrimitiveId::new(i), p)))
    }

    /// Bounding box enclosing every live primitive, or `None` when empty.
    pub fn content_bounds(&self) -> Option<Bounds> {
        self.iter()
            .map(|(_, p)| p.bounding_box())
            .reduce(|acc, b| acc.merge(&b))
    }

    /// Renders every live primitive into layers.
    pub fn render_to_layers(&self) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        for (_, primitive) in self.iter() {
            output.merge(primitive.render_to_layers(&self.text_definition));
        }
        output
    }

    /// Builds an SVG document framing all primitives with `margin` pixels on
    /// every side.
    pub fn to_document(&self, margin: f32) -> Document {
        let content = self
            .content_bounds()
            .unwrap_or_else(|| Bounds::new_from_top_left(Point::default(), Size::default()));
        let min = content.min_point().sub_point(Point::new(margin, margin));
        let width = content.width() + margin * 2.0;
        let height = content.height() + margin * 2.0;

        debug!(width = width, height = height, primitives = self.len(); "Building SVG document");

        let mut output = self.render_to_layers();
        if let Some(background) = &self.background {
            let bg = svg_element::Rectangle::new()
                .set("x", min.x())
                .set("y", min.y())
                .set("width", width)
                .set("height", height)
                .set("fill", background);
            output.add_to_layer(RenderLayer::Background, Box::new(bg));
        }

        output.render().into_iter().fold(
            Document::new()
                .set("viewBox", (min.x(), min.y(), width, height))
                .set("width", width)
                .set("height", height),
            |doc, node| doc.add(node),
        )
    }

    /// Serializes the surface into an SVG string.
    pub fn render_svg(&self, margin: f32) -> String {
        self.to_document(margin).to_string()
    }

    fn insert(&mut self, primitive: Primitive) -> PrimitiveId {
        let id = PrimitiveId::new(self.primitives.len());
        trace!(id:% = id, kind:? = primitive.kind(); "Created primitive");
        self.primitives.push(Some(primitive));
        id
    }

    fn primitive_mut(&mut self, id: PrimitiveId) -> Result<&mut Primitive, SurfaceError> {
        self.primitives
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(SurfaceError::UnknownPrimitive(id))
    }
}

impl Surface for SvgSurface {
    fn rectangle(&mut self, bounds: Bounds, corner_radius: f32) -> PrimitiveId {
        self.insert(Primitive::new(
            PrimitiveKind::Rect { bounds },
            Attributes::new().with_corner_radius(corner_radius),
        ))
    }

    fn circle(&mut self, center: Point, radius: f32) -> PrimitiveId {
        self.insert(Primitive::new(
            PrimitiveKind::Ellipse {
                center,
                rx: radius,
                ry: radius,
            },
            Attributes::new(),
        ))
    }

    fn path(&mut self, segments: Vec<PathSegment>) -> PrimitiveId {
        self.insert(Primitive::new(PrimitiveKind::Path { segments }, Attributes::new()))
    }

    fn text(&mut self, position: Point, content: &str) -> PrimitiveId {
        let size = self.measure.measure(content, &self.text_definition);
        self.insert(Primitive::new(
            PrimitiveKind::Text {
                position,
                content: content.to_string(),
                size,
            },
            Attributes::new(),
        ))
    }

    fn set_attributes(
        &mut self,
        id: PrimitiveId,
        attributes: &Attributes,
    ) -> Result<(), SurfaceError> {
        self.primitive_mut(id)?.set_attributes(attributes);
        Ok(())
    }

    fn bounding_box(&self, id: PrimitiveId) -> Result<Bounds, SurfaceError> {
        Ok(self.primitive(id)?.bounding_box())
    }

    fn translate(&mut self, id: PrimitiveId, dx: f32, dy: f32) -> Result<(), SurfaceError> {
        self.primitive_mut(id)?.translate(Point::new(dx, dy));
        Ok(())
    }

    fn scale(&mut self, id: PrimitiveId, scale: Scale) -> Result<(), SurfaceError> {
        let primitive = self.primitive_mut(id)?;
        let origin = scale
            .origin()
            .unwrap_or_else(|| primitive.bounding_box().center());
        primitive.scale(scale.sx(), scale.sy(), origin);
        Ok(())
    }

    fn remove(&mut self, id: PrimitiveId) -> Result<(), SurfaceError> {
        let slot = self
            .primitives
            .get_mut(id.index())
            .filter(|slot| slot.is_some())
            .ok_or(SurfaceError::UnknownPrimitive(id))?;
        *slot = None;
        trace!(id:% = id; "Removed primitive");
        Ok(())
    }
}
