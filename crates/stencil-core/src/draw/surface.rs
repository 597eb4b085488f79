//! The drawing surface that shapes are composed on.
//!
//! [`Surface`] is the small set of retained-mode operations a shape needs:
//! create a primitive, style it, ask for its bounding box, move it, scale it
//! and remove it. Primitives are referred to by [`PrimitiveId`] handles.

use std::fmt;

use thiserror::Error;

use crate::{
    draw::{Attributes, PathSegment},
    geometry::{Bounds, Point},
};

/// Opaque handle to a primitive on a [`Surface`].
///
/// Handles are never reused, so a handle to a removed primitive stays invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(usize);

impl PrimitiveId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors reported by surface operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("primitive {0} does not exist on this surface")]
    UnknownPrimitive(PrimitiveId),
}

/// Arguments of a scale operation.
///
/// When no origin is given, each primitive is scaled about the center of its
/// own bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    sx: f32,
    sy: f32,
    origin: Option<Point>,
}

impl Scale {
    pub fn new(sx: f32, sy: f32) -> Self {
        Self {
            sx,
            sy,
            origin: None,
        }
    }

    /// Same factor on both axes.
    pub fn uniform(factor: f32) -> Self {
        Self::new(factor, factor)
    }

    /// Scale about a fixed point instead of each primitive's own center.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn sx(&self) -> f32 {
        self.sx
    }

    pub fn sy(&self) -> f32 {
        self.sy
    }

    pub fn origin(&self) -> Option<Point> {
        self.origin
    }

    pub fn is_identity(&self) -> bool {
        self.sx == 1.0 && self.sy == 1.0
    }
}

/// A retained-mode vector drawing surface.
///
/// Creation operations are infallible; operations on an existing primitive
/// fail with [`SurfaceError::UnknownPrimitive`] when the handle is stale.
/// Surfaces are single-threaded and are not meant to be shared.
pub trait Surface {
    /// Creates a rectangle covering `bounds` with rounded corners.
    fn rectangle(&mut self, bounds: Bounds, corner_radius: f32) -> PrimitiveId;

    /// Creates a circle.
    fn circle(&mut self, center: Point, radius: f32) -> PrimitiveId;

    /// Creates a path from move/line commands.
    fn path(&mut self, segments: Vec<PathSegment>) -> PrimitiveId;

    /// Creates a text block, horizontally centered and vertically centered on
    /// `position`.
    fn text(&mut self, position: Point, content: &str) -> PrimitiveId;

    /// Merges `attributes` into the primitive's attributes.
    ///
    /// Changing the text anchor keeps the anchor point, so the text box moves.
    fn set_attributes(&mut self, id: PrimitiveId, attributes: &Attributes)
    -> Result<(), SurfaceError>;

    /// Returns the primitive's current axis-aligned bounding box.
    fn bounding_box(&self, id: PrimitiveId) -> Result<Bounds, SurfaceError>;

    fn translate(&mut self, id: PrimitiveId, dx: f32, dy: f32) -> Result<(), SurfaceError>;

    fn scale(&mut self, id: PrimitiveId, scale: Scale) -> Result<(), SurfaceError>;

    /// Removes the primitive from the surface.
    fn remove(&mut self, id: PrimitiveId) -> Result<(), SurfaceError>;
}
