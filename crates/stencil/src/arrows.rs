//! Arrow style presets for connectors between shapes.
//!
//! Presets are plain values: they describe the heads at either end of a
//! connector and the stroke of its line, and carry no layout behavior.
//!
//! | Preset | Start | End | Line |
//! |--------|-------|-----|------|
//! | [`ArrowStyle::aggregation`] | none | filled diamond | solid |
//! | [`ArrowStyle::dependency`] | none | basic, size 5 | solid |
//! | [`ArrowStyle::generalization`] | none | basic, size 10, white fill | solid |
//! | [`ArrowStyle::transition`] | none | basic, size 5 | solid |

use std::fmt;

use serde::Deserialize;

use stencil_core::{
    color::Color,
    draw::{Attributes, PathSegment, StrokeDefinition},
    geometry::Point,
};

/// The decoration drawn at one end of a connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrowHead {
    None,
    /// Triangle whose length is twice `size` and whose base is `2 * size`.
    Basic { size: f32, fill: Color },
    /// Diamond, 14 long and 10 wide, outlined with a 2px stroke.
    Aggregation,
}

impl ArrowHead {
    /// Triangle head filled black.
    pub fn basic(size: f32) -> Self {
        Self::Basic {
            size,
            fill: Color::black(),
        }
    }

    /// Distance from the tip to the back of the head along the line.
    pub fn length(&self) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Basic { size, .. } => size * 2.0,
            Self::Aggregation => 14.0,
        }
    }

    /// Outline with the tip at `tip`, pointing along the unit vector
    /// `direction`. Returns an empty outline for [`ArrowHead::None`].
    pub fn outline(&self, tip: Point, direction: Point) -> Vec<PathSegment> {
        // Local coordinates: tip at the origin, pointing towards +x.
        let local = match *self {
            Self::None => return Vec::new(),
            Self::Basic { size, .. } => vec![(0.0, 0.0), (-2.0 * size, -size), (-2.0 * size, size)],
            Self::Aggregation => vec![(0.0, 0.0), (-7.0, 5.0), (-14.0, 0.0), (-7.0, -5.0)],
        };

        let (cos, sin) = (direction.x(), direction.y());
        let mut segments: Vec<PathSegment> = local
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let p = Point::new(
                    x.mul_add(cos, -y * sin) + tip.x(),
                    x.mul_add(sin, y * cos) + tip.y(),
                );
                if i == 0 {
                    PathSegment::MoveTo(p)
                } else {
                    PathSegment::LineTo(p)
                }
            })
            .collect();
        segments.push(PathSegment::Close);
        segments
    }

    /// Fill and stroke of the head.
    pub fn attributes(&self) -> Attributes {
        match self {
            Self::None => Attributes::new(),
            Self::Basic { fill, .. } => Attributes::new().with_fill(*fill),
            Self::Aggregation => Attributes::new()
                .with_fill(Color::black())
                .with_stroke(StrokeDefinition::new(Color::black(), 2.0)),
        }
    }
}

/// Heads and line stroke of a connector.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowStyle {
    start: ArrowHead,
    end: ArrowHead,
    stroke: StrokeDefinition,
}

impl ArrowStyle {
    pub fn new(start: ArrowHead, end: ArrowHead, stroke: StrokeDefinition) -> Self {
        Self { start, end, stroke }
    }

    /// Class diagram aggregation: filled diamond at the end.
    pub fn aggregation() -> Self {
        Self::new(ArrowHead::None, ArrowHead::Aggregation, StrokeDefinition::default())
    }

    /// Class diagram dependency: small triangle at the end.
    pub fn dependency() -> Self {
        Self::new(ArrowHead::None, ArrowHead::basic(5.0), StrokeDefinition::default())
    }

    /// Class diagram generalization: large hollow triangle at the end.
    pub fn generalization() -> Self {
        Self::new(
            ArrowHead::None,
            ArrowHead::Basic {
                size: 10.0,
                fill: Color::white(),
            },
            StrokeDefinition::default(),
        )
    }

    /// State chart transition.
    pub fn transition() -> Self {
        Self::new(ArrowHead::None, ArrowHead::basic(5.0), StrokeDefinition::default())
    }

    pub fn start(&self) -> &ArrowHead {
        &self.start
    }

    pub fn end(&self) -> &ArrowHead {
        &self.end
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }
}

/// Named arrow presets, as written in scene files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowPreset {
    Aggregation,
    Dependency,
    Generalization,
    #[default]
    Transition,
}

impl ArrowPreset {
    pub fn style(self) -> ArrowStyle {
        match self {
            Self::Aggregation => ArrowStyle::aggregation(),
            Self::Dependency => ArrowStyle::dependency(),
            Self::Generalization => ArrowStyle::generalization(),
            Self::Transition => ArrowStyle::transition(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Aggregation => "aggregation",
            Self::Dependency => "dependency",
            Self::Generalization => "generalization",
            Self::Transition => "transition",
        }
    }
}

impl fmt::Display for ArrowPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use stencil_core::draw::{StrokeStyle, path_data};

    use super::*;

    #[test]
    fn test_presets_have_no_start_head() {
        for preset in [
            ArrowPreset::Aggregation,
            ArrowPreset::Dependency,
            ArrowPreset::Generalization,
            ArrowPreset::Transition,
        ] {
            let style = preset.style();
            assert_eq!(*style.start(), ArrowHead::None, "{preset}");
            assert_eq!(*style.stroke().style(), StrokeStyle::Solid, "{preset}");
        }
    }

    #[test]
    fn test_preset_end_heads() {
        assert_eq!(*ArrowStyle::aggregation().end(), ArrowHead::Aggregation);
        assert_eq!(*ArrowStyle::dependency().end(), ArrowHead::basic(5.0));
        assert_eq!(*ArrowStyle::transition().end(), ArrowHead::basic(5.0));
        assert_eq!(
            *ArrowStyle::generalization().end(),
            ArrowHead::Basic {
                size: 10.0,
                fill: Color::white()
            }
        );
    }

    #[test]
    fn test_aggregation_head_attributes() {
        let attributes = ArrowHead::Aggregation.attributes();
        assert_eq!(attributes.fill(), Some(Color::black()));
        assert_eq!(attributes.stroke().map(|s| s.width()), Some(2.0));
    }

    #[test]
    fn test_basic_outline_pointing_right() {
        let head = ArrowHead::basic(5.0);
        let outline = head.outline(Point::new(100.0, 50.0), Point::new(1.0, 0.0));
        assert_eq!(path_data(&outline), "M 100 50 L 90 45 L 90 55 Z");
    }

    #[test]
    fn test_outline_rotates_with_direction() {
        let head = ArrowHead::Aggregation;
        let outline = head.outline(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        let PathSegment::LineTo(back) = outline[2] else {
            panic!("expected a line segment");
        };
        assert_approx_eq!(f32, back.x(), 0.0, epsilon = 1e-5);
        assert_approx_eq!(f32, back.y(), -14.0);
    }

    #[test]
    fn test_none_has_no_outline() {
        assert!(ArrowHead::None.outline(Point::default(), Point::new(1.0, 0.0)).is_empty());
        assert_eq!(ArrowHead::None.length(), 0.0);
    }

    #[test]
    fn test_preset_display() {
        assert_eq!(ArrowPreset::default().to_string(), "transition");
        assert_eq!(ArrowPreset::Generalization.to_string(), "generalization");
    }
}
