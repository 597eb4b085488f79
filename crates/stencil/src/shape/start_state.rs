//! Initial pseudo-state: a filled disc.

use log::debug;
use serde::Deserialize;

use stencil_core::{
    color::Color,
    draw::{PrimitiveId, Surface},
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

/// Construction options of a [`StartState`]. Filled black unless a fill is
/// configured.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StartStateConfig {
    #[serde(default)]
    position: Point,

    #[serde(default = "default_radius")]
    radius: f32,

    #[serde(default)]
    style: ShapeStyle,
}

impl StartStateConfig {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            radius: default_radius(),
            style: ShapeStyle::default(),
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Default for StartStateConfig {
    fn default() -> Self {
        Self::new(Point::default())
    }
}

/// The initial state of a state machine.
///
/// It has no inner primitives, so zooming leaves it as the host scaled it.
#[derive(Debug)]
pub struct StartState {
    config: StartStateConfig,
    wrapper: PrimitiveId,
}

impl StartState {
    pub const OBJECT: &'static str = "StartState";

    pub fn build(config: StartStateConfig, surface: &mut dyn Surface) -> Result<Self, ShapeError> {
        validate_finite(Self::OBJECT, "position", config.position.x())?;
        validate_finite(Self::OBJECT, "position", config.position.y())?;
        validate_finite(Self::OBJECT, "radius", config.radius)?;
        if config.radius <= 0.0 {
            return Err(ShapeError::invalid_geometry(
                Self::OBJECT,
                format!("radius must be positive, got {}", config.radius),
            ));
        }

        layout::build_atomically(surface, |surface| {
            let wrapper = surface.circle(config.position, config.radius);
            surface.set_attributes(wrapper, &config.style.to_attributes(Color::black()))?;

            debug!(wrapper:% = wrapper; "Built start state");
            Ok(Self { config, wrapper })
        })
    }

    pub fn config(&self) -> &StartStateConfig {
        &self.config
    }
}

impl UmlShape for StartState {
    fn object(&self) -> &'static str {
        Self::OBJECT
    }

    fn wrapper(&self) -> PrimitiveId {
        self.wrapper
    }

    fn inner(&self) -> Vec<PrimitiveId> {
        Vec::new()
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
