//! Final state: a ring around a smaller filled disc.

use log::debug;
use serde::Deserialize;

use stencil_core::{
    color::Color,
    draw::{PrimitiveId, Scale, Surface},
    geometry::Point,
};

use crate::{
    config::ShapeStyle,
    error::ShapeError,
    layout,
    shape::{UmlShape, find_ellipse_intersection, validate_finite},
};

fn default_radius() -> f32 {
    10.0
}

/// Construction options of an [`EndState`].
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Position | `(0, 0)` |
/// | Radius | `10` |
/// | Inner radius | half the radius |
/// | Fill | white |
/// | Inner fill | black |
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EndStateConfig {
    #[serde(default)]
    position: Point,

    #[serde(default = "default_radius")]
    radius: f32,

    #[serde(default)]
    inner_radius: Option<f32>,

    #[serde(default)]
    style: ShapeStyle,

    #[serde(default)]
    inner_style: ShapeStyle,
}

impl EndStateConfig {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            radius: default_radius(),
            inner_radius: None,
            style: ShapeStyle::default(),
            inner_style: ShapeStyle::default(),
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_inner_radius(mut self, radius: f32) -> Self {
        self.inner_radius = Some(radius);
        self
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_inner_style(mut self, style: ShapeStyle) -> Self {
        self.inner_style = style;
        self
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// The configured inner radius, or half of [`Self::radius`].
    pub fn inner_radius(&self) -> f32 {
        self.inner_radius.unwrap_or(self.radius / 2.0)
    }

    fn validate(&self) -> Result<(), ShapeError> {
        validate_finite(EndState::OBJECT, "position", self.position.x())?;
        validate_finite(EndState::OBJECT, "position", self.position.y())?;
        validate_finite(EndState::OBJECT, "radius", self.radius)?;
        validate_finite(EndState::OBJECT, "inner radius", self.inner_radius())?;
        if self.radius <= 0.0 || self.inner_radius() <= 0.0 {
            return Err(ShapeError::invalid_geometry(
                EndState::OBJECT,
                format!(
                    "radii must be positive, got {} and {}",
                    self.radius,
                    self.inner_radius()
                ),
            ));
        }
        if self.inner_radius() > self.radius {
            return Err(ShapeError::invalid_geometry(
                EndState::OBJECT,
                format!(
                    "inner radius {} exceeds radius {}",
                    self.inner_radius(),
                    self.radius
                ),
            ));
        }
        Ok(())
    }
}

impl Default for EndStateConfig {
    fn default() -> Self {
        Self::new(Point::default())
    }
}

/// The final state of a state machine.
#[derive(Debug)]
pub struct EndState {
    config: EndStateConfig,
    wrapper: PrimitiveId,
    disc: PrimitiveId,
}

impl EndState {
    pub const OBJECT: &'static str = "EndState";

    pub fn build(config: EndStateConfig, surface: &mut dyn Surface) -> Result<Self, ShapeError> {
        config.validate()?;

        layout::build_atomically(surface, |surface| {
            let wrapper = surface.circle(config.position, config.radius);
            surface.set_attributes(wrapper, &config.style.to_attributes(Color::white()))?;

            let disc = surface.circle(config.position, config.inner_radius());
            surface.set_attributes(disc, &config.inner_style.to_attributes(Color::black()))?;

            debug!(wrapper:% = wrapper, disc:% = disc; "Built end state");
            Ok(Self {
                config,
                wrapper,
                disc,
            })
        })
    }

    pub fn config(&self) -> &EndStateConfig {
        &self.config
    }

    /// The filled inner disc.
    pub fn disc(&self) -> PrimitiveId {
        self.disc
    }
}

impl UmlShape for EndState {
    fn object(&self) -> &'static str {
        Self::OBJECT
    }

    fn wrapper(&self) -> PrimitiveId {
        self.wrapper
    }

    fn inner(&self) -> Vec<PrimitiveId> {
        vec![self.disc]
    }

    /// Applies the host's scale to the inner disc as well.
    fn zoom(&mut self, surface: &mut dyn Surface, scale: Scale) -> Result<(), ShapeError> {
        surface.scale(self.disc, scale)?;
        Ok(())
    }

    fn find_intersection(
        &self,
        surface: &dyn Surface,
        toward: Point,
    ) -> Result<Point, ShapeError> {
        let bounds = surface.bounding_box(self.wrapper)?;
        Ok(find_ellipse_intersection(bounds, toward))
    }
}
