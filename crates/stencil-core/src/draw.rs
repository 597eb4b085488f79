//! Drawing primitives and the surface they live on.
//!
//! Shapes are composed from a handful of retained [`Primitive`]s created on a
//! [`Surface`]. [`SvgSurface`] is the in-memory implementation that measures
//! text and serializes to SVG.

mod layer;
mod primitive;
mod stroke;
mod surface;
mod svg_surface;
mod text;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use primitive::{Attributes, PathSegment, Primitive, PrimitiveKind, TextAnchor, path_data};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use surface::{PrimitiveId, Scale, Surface, SurfaceError};
pub use svg_surface::SvgSurface;
pub use text::{CosmicTextMeasure, FixedTextMeasure, TextDefinition, TextMeasure};
