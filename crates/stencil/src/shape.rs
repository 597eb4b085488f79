//! UML shapes composed from surface primitives.
//!
//! Every shape owns one *wrapper* primitive, the outline a host application
//! moves and scales, plus a few *inner* primitives it derives from the
//! wrapper's bounding box. Inner primitives are laid out once when the shape
//! is built and again whenever the shape is zoomed.
//!
//! - [`State`] - Rounded rectangle with a name, a divider and an action list
//! - [`StartState`] - Filled initial-state disc
//! - [`EndState`] - Final state: a ring around a filled disc
//! - [`Class`] - Class box with name, attribute and method compartments

mod class;
mod end_state;
mod start_state;
mod state;

pub use class::{Class, ClassConfig, ClassParts};
pub use end_state::{EndState, EndStateConfig};
pub use start_state::{StartState, StartStateConfig};
pub use state::{Actions, InnerAction, State, StateConfig, StateParts};

use std::fmt;

use stencil_core::{
    draw::{PrimitiveId, Scale, Surface},
    geometry::{Bounds, Point},
};

use crate::error::ShapeError;

/// Module tag shared by every shape in this crate.
pub const MODULE: &str = "uml";

/// Common behavior of the composed shapes.
pub trait UmlShape: fmt::Debug {
    /// The object tag, e.g. `"State"`.
    fn object(&self) -> &'static str;

    fn module(&self) -> &'static str {
        MODULE
    }

    /// The outline primitive.
    fn wrapper(&self) -> PrimitiveId;

    /// The derived primitives, in creation order.
    fn inner(&self) -> Vec<PrimitiveId>;

    /// Re-derives the inner primitives after the host scaled the wrapper
    /// with `scale`. Shapes without derived layout do nothing.
    fn zoom(&mut self, _surface: &mut dyn Surface, _scale: Scale) -> Result<(), ShapeError> {
        Ok(())
    }

    /// Find the point where the line from the wrapper's center towards
    /// `toward` leaves the wrapper.
    fn find_intersection(
        &self,
        surface: &dyn Surface,
        toward: Point,
    ) -> Result<Point, ShapeError> {
        let bounds = surface.bounding_box(self.wrapper())?;
        Ok(find_rectangle_intersection(bounds, toward))
    }

    /// Removes the inner primitives and then the wrapper.
    fn remove(&self, surface: &mut dyn Surface) -> Result<(), ShapeError> {
        for id in self.inner() {
            surface.remove(id)?;
        }
        surface.remove(self.wrapper())?;
        Ok(())
    }
}

fn find_rectangle_intersection(bounds: Bounds, toward: Point) -> Point {
    let center = bounds.center();
    let dist = toward.sub_point(center);
    if dist.hypot() < 0.001 {
        return toward;
    }

    let half_width = bounds.width() / 2.0;
    let half_height = bounds.height() / 2.0;

    // Fraction of `dist` needed to reach a vertical or horizontal edge.
    let tx = if dist.x() == 0.0 {
        f32::INFINITY
    } else {
        half_width / dist.x().abs()
    };
    let ty = if dist.y() == 0.0 {
        f32::INFINITY
    } else {
        half_height / dist.y().abs()
    };
    let t = tx.min(ty);

    Point::new(
        dist.x().mul_add(t, center.x()),
        dist.y().mul_add(t, center.y()),
    )
}

/// Intersection with the ellipse inscribed in `bounds`.
pub(crate) fn find_ellipse_intersection(bounds: Bounds, toward: Point) -> Point {
    let center = bounds.center();
    let dist = toward.sub_point(center);
    if dist.hypot() < 0.001 {
        return toward;
    }

    let rx = bounds.width() / 2.0;
    let ry = bounds.height() / 2.0;
    if rx <= 0.0 || ry <= 0.0 {
        return center;
    }

    let t = 1.0 / ((dist.x() / rx).powi(2) + (dist.y() / ry).powi(2)).sqrt();
    Point::new(
        dist.x().mul_add(t, center.x()),
        dist.y().mul_add(t, center.y()),
    )
}

pub(crate) fn validate_finite(
    object: &'static str,
    what: &str,
    value: f32,
) -> Result<(), ShapeError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ShapeError::invalid_geometry(
            object,
            format!("{what} must be finite, got {value}"),
        ))
    }
}

pub(crate) fn validate_frame(object: &'static str, frame: Bounds) -> Result<(), ShapeError> {
    if !frame.has_area() {
        return Err(ShapeError::invalid_geometry(
            object,
            format!(
                "frame must be finite with a positive width and height, got {}x{}",
                frame.width(),
                frame.height()
            ),
        ));
    }
    Ok(())
}
