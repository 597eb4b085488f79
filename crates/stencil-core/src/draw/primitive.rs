//! Retained drawing primitives.
//!
//! A [`Primitive`] is one element on a [`Surface`](crate::draw::Surface): a
//! rectangle, an ellipse, a path or a text block, together with its
//! [`Attributes`]. Primitives know their own bounding box and how to move,
//! scale and render themselves.

use std::fmt::Write as _;

use log::trace;
use serde::Deserialize;
use svg::{node::Text as SvgText, node::element as svg_element};

use crate::{
    apply_stroke,
    color::Color,
    draw::{LayeredOutput, RenderLayer, StrokeDefinition, TextDefinition},
    geometry::{Bounds, Point, Size},
};

/// Horizontal alignment of a text block relative to its anchor point.
///
/// Text is always vertically centered on the anchor point.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    /// Anchor is the left edge of the block
    Start,
    /// Anchor is the horizontal center of the block (default)
    #[default]
    Middle,
    /// Anchor is the right edge of the block
    End,
}

impl TextAnchor {
    /// Returns the SVG `text-anchor` value
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// A bag of optional style attributes.
///
/// Setting attributes on a primitive merges the bag: only fields that are
/// `Some` overwrite the primitive's current values.
///
/// ```
/// # use stencil_core::color::Color;
/// # use stencil_core::draw::{Attributes, TextAnchor};
/// let attrs = Attributes::new()
///     .with_fill(Color::white())
///     .with_text_anchor(TextAnchor::Start);
/// assert_eq!(attrs.fill(), Some(Color::white()));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    fill: Option<Color>,
    stroke: Option<StrokeDefinition>,
    text_anchor: Option<TextAnchor>,
    corner_radius: Option<f32>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_stroke(mut self, stroke: StrokeDefinition) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_text_anchor(mut self, anchor: TextAnchor) -> Self {
        self.text_anchor = Some(anchor);
        self
    }

    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> Option<&StrokeDefinition> {
        self.stroke.as_ref()
    }

    pub fn text_anchor(&self) -> TextAnchor {
        self.text_anchor.unwrap_or_default()
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius.unwrap_or(0.0)
    }

    /// Overwrites every attribute that is set in `other`.
    pub fn merge(&mut self, other: &Attributes) {
        if other.fill.is_some() {
            self.fill = other.fill;
        }
        if other.stroke.is_some() {
            self.stroke.clone_from(&other.stroke);
        }
        if other.text_anchor.is_some() {
            self.text_anchor = other.text_anchor;
        }
        if other.corner_radius.is_some() {
            self.corner_radius = other.corner_radius;
        }
    }
}

/// One command of a path outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    Close,
}

impl PathSegment {
    fn point(self) -> Option<Point> {
        match self {
            Self::MoveTo(p) | Self::LineTo(p) => Some(p),
            Self::Close => None,
        }
    }

    fn map_point(self, f: impl Fn(Point) -> Point) -> Self {
        match self {
            Self::MoveTo(p) => Self::MoveTo(f(p)),
            Self::LineTo(p) => Self::LineTo(f(p)),
            Self::Close => Self::Close,
        }
    }
}

/// Serializes path segments into SVG path data, e.g. `"M 0 0 L 10 0"`.
pub fn path_data(segments: &[PathSegment]) -> String {
    let mut data = String::new();
    for segment in segments {
        if !data.is_empty() {
            data.push(' ');
        }
        // Writing into a String cannot fail.
        let _ = match segment {
            PathSegment::MoveTo(p) => write!(data, "M {} {}", p.x(), p.y()),
            PathSegment::LineTo(p) => write!(data, "L {} {}", p.x(), p.y()),
            PathSegment::Close => write!(data, "Z"),
        };
    }
    data
}

/// The geometry of a primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveKind {
    /// Axis-aligned rectangle; the corner radius lives in [`Attributes`].
    Rect { bounds: Bounds },
    /// Created as a circle; becomes an ellipse under non-uniform scaling.
    Ellipse { center: Point, rx: f32, ry: f32 },
    Path { segments: Vec<PathSegment> },
    /// Text block vertically centered on `position`; `size` is the measured
    /// size of `content`.
    Text {
        position: Point,
        content: String,
        size: Size,
    },
}

/// A drawing primitive with its style attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    kind: PrimitiveKind,
    attributes: Attributes,
}

impl Primitive {
    pub fn new(kind: PrimitiveKind, attributes: Attributes) -> Self {
        Self { kind, attributes }
    }

    pub fn kind(&self) -> &PrimitiveKind {
        &self.kind
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the text content for text primitives.
    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            PrimitiveKind::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    pub(crate) fn set_attributes(&mut self, attributes: &Attributes) {
        self.attributes.merge(attributes);
    }

    /// Returns the axis-aligned bounding box.
    ///
    /// Paths report the box of their points, so a horizontal line has zero
    /// height.
    pub fn bounding_box(&self) -> Bounds {
        match &self.kind {
            PrimitiveKind::Rect { bounds } => *bounds,
            PrimitiveKind::Ellipse { center, rx, ry } => {
                Bounds::new_from_center(*center, Size::new(rx * 2.0, ry * 2.0))
            }
            PrimitiveKind::Path { segments } => {
                let mut points = segments.iter().filter_map(|s| s.point());
                let Some(first) = points.next() else {
                    return Bounds::default();
                };
                points.fold(Bounds::from_corners(first, first), |acc, p| {
                    acc.merge(&Bounds::from_corners(p, p))
                })
            }
            PrimitiveKind::Text { position, size, .. } => {
                let left = match self.attributes.text_anchor() {
                    TextAnchor::Start => position.x(),
                    TextAnchor::Middle => position.x() - size.width() / 2.0,
                    TextAnchor::End => position.x() - size.width(),
                };
                Bounds::new_from_top_left(
                    Point::new(left, position.y() - size.height() / 2.0),
                    *size,
                )
            }
        }
    }

    pub(crate) fn translate(&mut self, offset: Point) {
        match &mut self.kind {
            PrimitiveKind::Rect { bounds } => *bounds = bounds.translate(offset),
            PrimitiveKind::Ellipse { center, .. } => *center = center.add_point(offset),
            PrimitiveKind::Path { segments } => {
                for segment in segments.iter_mut() {
                    *segment = segment.map_point(|p| p.add_point(offset));
                }
            }
            PrimitiveKind::Text { position, .. } => *position = position.add_point(offset),
        }
    }

    /// Scales the primitive about `origin`.
    ///
    /// Rectangle corner radii shrink or grow with the smaller factor, text
    /// keeps its measured size and only moves its anchor.
    pub(crate) fn scale(&mut self, sx: f32, sy: f32, origin: Point) {
        match &mut self.kind {
            PrimitiveKind::Rect { bounds } => {
                *bounds = bounds.scale_about(origin, sx, sy);
                if let Some(radius) = self.attributes.corner_radius.as_mut() {
                    *radius *= sx.abs().min(sy.abs());
                }
            }
            PrimitiveKind::Ellipse { center, rx, ry } => {
                *center = center.scale_about(origin, sx, sy);
                *rx *= sx.abs();
                *ry *= sy.abs();
            }
            PrimitiveKind::Path { segments } => {
                for segment in segments.iter_mut() {
                    *segment = segment.map_point(|p| p.scale_about(origin, sx, sy));
                }
            }
            PrimitiveKind::Text { position, .. } => {
                *position = position.scale_about(origin, sx, sy);
            }
        }
    }

    /// Renders the primitive into the layer matching its kind.
    pub fn render_to_layers(&self, text_definition: &TextDefinition) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let stroke = self.attributes.stroke().cloned().unwrap_or_default();
        let fill = self
            .attributes
            .fill()
            .map_or_else(|| "none".to_string(), |c| c.to_string());

        match &self.kind {
            PrimitiveKind::Rect { bounds } => {
                let radius = self.attributes.corner_radius();
                let rect = svg_element::Rectangle::new()
                    .set("x", bounds.min_x())
                    .set("y", bounds.min_y())
                    .set("width", bounds.width())
                    .set("height", bounds.height())
                    .set("rx", radius)
                    .set("ry", radius)
                    .set("fill", fill);
                output.add_to_layer(RenderLayer::Content, Box::new(apply_stroke!(rect, &stroke)));
            }
            PrimitiveKind::Ellipse { center, rx, ry } => {
                let ellipse = svg_element::Ellipse::new()
                    .set("cx", center.x())
                    .set("cy", center.y())
                    .set("rx", *rx)
                    .set("ry", *ry)
                    .set("fill", fill);
                output.add_to_layer(
                    RenderLayer::Content,
                    Box::new(apply_stroke!(ellipse, &stroke)),
                );
            }
            PrimitiveKind::Path { segments } => {
                let path = svg_element::Path::new()
                    .set("d", path_data(segments))
                    .set("fill", fill);
                output.add_to_layer(RenderLayer::Line, Box::new(apply_stroke!(path, &stroke)));
            }
            PrimitiveKind::Text { position, content, size } => {
                output.add_to_layer(
                    RenderLayer::Text,
                    Box::new(self.render_text(*position, content, *size, text_definition)),
                );
            }
        }

        trace!(kind:? = self.kind; "Rendered primitive");
        output
    }

    fn render_text(
        &self,
        position: Point,
        content: &str,
        size: Size,
        text_definition: &TextDefinition,
    ) -> svg_element::Text {
        let lines: Vec<&str> = content.split('\n').collect();
        let line_height = size.height() / lines.len() as f32;
        let top = position.y() - size.height() / 2.0;

        let mut text = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", position.y())
            .set("text-anchor", self.attributes.text_anchor().to_svg_value())
            .set("dominant-baseline", "central")
            .set("font-family", text_definition.font_family())
            .set("font-size", text_definition.font_size());

        if let Some(color) = self.attributes.fill().or_else(|| text_definition.color().copied()) {
            text = text
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha());
        }

        for (i, line) in lines.into_iter().enumerate() {
            let tspan = svg_element::TSpan::new("")
                .set("x", position.x())
                .set("y", top + line_height * (i as f32 + 0.5))
                .add(SvgText::new(line));
            text = text.add(tspan);
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn text_primitive(anchor: TextAnchor) -> Primitive {
        Primitive::new(
            PrimitiveKind::Text {
                position: Point::new(100.0, 50.0),
                content: "label".to_string(),
                size: Size::new(40.0, 10.0),
            },
            Attributes::new().with_text_anchor(anchor),
        )
    }

    #[test]
    fn test_attributes_merge_only_overwrites_set_fields() {
        let mut attrs = Attributes::new()
            .with_fill(Color::white())
            .with_corner_radius(15.0);
        attrs.merge(&Attributes::new().with_text_anchor(TextAnchor::Start));

        assert_eq!(attrs.fill(), Some(Color::white()));
        assert_eq!(attrs.corner_radius(), 15.0);
        assert_eq!(attrs.text_anchor(), TextAnchor::Start);
    }

    #[test]
    fn test_path_data() {
        let data = path_data(&[
            PathSegment::MoveTo(Point::new(0.0, 5.0)),
            PathSegment::LineTo(Point::new(10.5, 5.0)),
            PathSegment::Close,
        ]);
        assert_eq!(data, "M 0 5 L 10.5 5 Z");
    }

    #[test]
    fn test_text_bounding_box_per_anchor() {
        let middle = text_primitive(TextAnchor::Middle).bounding_box();
        assert_approx_eq!(f32, middle.min_x(), 80.0);
        assert_approx_eq!(f32, middle.min_y(), 45.0);

        let start = text_primitive(TextAnchor::Start).bounding_box();
        assert_approx_eq!(f32, start.min_x(), 100.0);
        assert_approx_eq!(f32, start.min_y(), 45.0);

        let end = text_primitive(TextAnchor::End).bounding_box();
        assert_approx_eq!(f32, end.max_x(), 100.0);
    }

    #[test]
    fn test_path_bounding_box_of_horizontal_line() {
        let line = Primitive::new(
            PrimitiveKind::Path {
                segments: vec![
                    PathSegment::MoveTo(Point::new(10.0, 20.0)),
                    PathSegment::LineTo(Point::new(110.0, 20.0)),
                ],
            },
            Attributes::new(),
        );
        let bounds = line.bounding_box();
        assert_approx_eq!(f32, bounds.min_x(), 10.0);
        assert_approx_eq!(f32, bounds.max_x(), 110.0);
        assert_approx_eq!(f32, bounds.height(), 0.0);
    }

    #[test]
    fn test_ellipse_scale_is_non_uniform() {
        let mut circle = Primitive::new(
            PrimitiveKind::Ellipse {
                center: Point::new(0.0, 0.0),
                rx: 10.0,
                ry: 10.0,
            },
            Attributes::new(),
        );
        circle.scale(2.0, 0.5, Point::default());

        let bounds = circle.bounding_box();
        assert_approx_eq!(f32, bounds.width(), 40.0);
        assert_approx_eq!(f32, bounds.height(), 10.0);
    }

    #[test]
    fn test_rect_scale_shrinks_corner_radius() {
        let mut rect = Primitive::new(
            PrimitiveKind::Rect {
                bounds: Bounds::new_from_top_left(Point::default(), Size::new(100.0, 50.0)),
            },
            Attributes::new().with_corner_radius(15.0),
        );
        rect.scale(0.5, 2.0, Point::default());
        assert_approx_eq!(f32, rect.attributes().corner_radius(), 7.5);
    }

    #[test]
    fn test_render_text_emits_one_tspan_per_line() {
        let text = Primitive::new(
            PrimitiveKind::Text {
                position: Point::new(0.0, 0.0),
                content: "a\nb\nc".to_string(),
                size: Size::new(10.0, 30.0),
            },
            Attributes::new(),
        );
        let rendered: String = text
            .render_to_layers(&TextDefinition::default())
            .render()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(rendered.matches("<tspan").count(), 3);
        assert!(rendered.contains("data-layer=\"text\""));
    }
}
