//! Text and divider placement shared by the shapes.
//!
//! Text is laid out in two passes: the text primitive is created, the surface
//! measures it, and only then is it moved to its final position. A shape
//! never guesses text sizes ahead of time.
//!
//! Shapes are built inside a [`Transaction`], which removes every primitive
//! it created when the build fails half way.

use log::{trace, warn};

use stencil_core::{
    draw::{Attributes, PathSegment, PrimitiveId, Scale, Surface, SurfaceError, TextAnchor},
    geometry::{Bounds, Point},
};

/// Where a text block goes once its size is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Placement {
    /// The block's bounding box top-left corner lands on the point.
    TopLeft(Point),
    /// The block is left-aligned on the point and pushed down by half of its
    /// measured height, so multi-line lists hang below the point.
    List(Point),
}

impl Placement {
    fn anchor(self) -> Point {
        match self {
            Self::TopLeft(p) | Self::List(p) => p,
        }
    }
}

/// Creates a text block and moves it to `placement`.
pub(crate) fn place_text(
    surface: &mut dyn Surface,
    content: &str,
    placement: Placement,
) -> Result<PrimitiveId, SurfaceError> {
    let text = surface.text(placement.anchor(), content);
    let measured = surface.bounding_box(text)?;

    match placement {
        Placement::TopLeft(top_left) => {
            let offset = top_left.sub_point(measured.min_point());
            surface.translate(text, offset.x(), offset.y())?;
        }
        Placement::List(_) => {
            surface.set_attributes(text, &Attributes::new().with_text_anchor(TextAnchor::Start))?;
            surface.translate(text, 0.0, measured.height() / 2.0)?;
        }
    }

    trace!(id:% = text, placement:? = placement, height = measured.height(); "Placed text");
    Ok(text)
}

/// Draws a horizontal divider across the full width of `frame` at `y`.
pub(crate) fn swimlane(surface: &mut dyn Surface, frame: Bounds, y: f32) -> PrimitiveId {
    surface.path(vec![
        PathSegment::MoveTo(Point::new(frame.min_x(), y)),
        PathSegment::LineTo(Point::new(frame.max_x(), y)),
    ])
}

/// Joins lines into a newline-separated text block, dropping empty lines.
pub(crate) fn compose_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter(|line| !line.as_ref().is_empty())
        .map(|line| line.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// A surface wrapper that records every primitive created through it.
pub(crate) struct Transaction<'a> {
    surface: &'a mut dyn Surface,
    created: Vec<PrimitiveId>,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(surface: &'a mut dyn Surface) -> Self {
        Self {
            surface,
            created: Vec::new(),
        }
    }

    /// Removes everything created so far, newest first.
    pub(crate) fn rollback(self) {
        for id in self.created.into_iter().rev() {
            if let Err(err) = self.surface.remove(id) {
                warn!(id:% = id, err:% = err; "Failed to roll back primitive");
            }
        }
    }

    fn record(&mut self, id: PrimitiveId) -> PrimitiveId {
        self.created.push(id);
        id
    }
}

impl Surface for Transaction<'_> {
    fn rectangle(&mut self, bounds: Bounds, corner_radius: f32) -> PrimitiveId {
        let id = self.surface.rectangle(bounds, corner_radius);
        self.record(id)
    }

    fn circle(&mut self, center: Point, radius: f32) -> PrimitiveId {
        let id = self.surface.circle(center, radius);
        self.record(id)
    }

    fn path(&mut self, segments: Vec<PathSegment>) -> PrimitiveId {
        let id = self.surface.path(segments);
        self.record(id)
    }

    fn text(&mut self, position: Point, content: &str) -> PrimitiveId {
        let id = self.surface.text(position, content);
        self.record(id)
    }

    fn set_attributes(
        &mut self,
        id: PrimitiveId,
        attributes: &Attributes,
    ) -> Result<(), SurfaceError> {
        self.surface.set_attributes(id, attributes)
    }

    fn bounding_box(&self, id: PrimitiveId) -> Result<Bounds, SurfaceError> {
        self.surface.bounding_box(id)
    }

    fn translate(&mut self, id: PrimitiveId, dx: f32, dy: f32) -> Result<(), SurfaceError> {
        self.surface.translate(id, dx, dy)
    }

    fn scale(&mut self, id: PrimitiveId, scale: Scale) -> Result<(), SurfaceError> {
        self.surface.scale(id, scale)
    }

    fn remove(&mut self, id: PrimitiveId) -> Result<(), SurfaceError> {
        self.surface.remove(id)?;
        self.created.retain(|created| *created != id);
        Ok(())
    }
}

/// Runs `build` against a [`Transaction`]; on error every primitive the
/// build created is removed before the error is returned.
pub(crate) fn build_atomically<T, E>(
    surface: &mut dyn Surface,
    build: impl FnOnce(&mut dyn Surface) -> Result<T, E>,
) -> Result<T, E> {
    let mut transaction = Transaction::new(surface);
    match build(&mut transaction) {
        Ok(value) => Ok(value),
        Err(err) => {
            transaction.rollback();
            Err(err)
        }
    }
}
