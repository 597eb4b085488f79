//! Error types for Stencil operations.
//!
//! [`ShapeError`] is reported by a single shape while it is being built,
//! zoomed or removed. [`StencilError`] is the crate-level error that wraps it
//! together with scene loading and diagram bookkeeping failures.

use std::{io, ops::Range};

use thiserror::Error;

use stencil_core::draw::SurfaceError;

/// Errors raised while composing a shape on a surface.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The shape's configuration describes geometry that cannot be laid out.
    #[error("invalid geometry for {object}: {reason}")]
    InvalidGeometry {
        object: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

impl ShapeError {
    pub(crate) fn invalid_geometry(object: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            object,
            reason: reason.into(),
        }
    }
}

/// The main error type for Stencil operations.
///
/// # Diagnostic Variants
///
/// The `Scene` variant keeps the scene source and the byte span reported by
/// the TOML parser, so callers can point at the offending line.
#[derive(Debug, Error)]
pub enum StencilError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{message}")]
    Scene {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Shape `{name}`: {source}")]
    Shape {
        name: String,
        #[source]
        source: ShapeError,
    },

    #[error("Shape `{0}` is already defined")]
    DuplicateShape(String),

    #[error("Unknown shape `{0}`")]
    UnknownShape(String),

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
}

impl StencilError {
    /// Create a new `Scene` error from a TOML parse failure and its source.
    pub fn new_scene_error(err: &toml::de::Error, src: impl Into<String>) -> Self {
        Self::Scene {
            message: err.message().to_string(),
            span: err.span(),
            src: src.into(),
        }
    }

    pub(crate) fn shape(name: impl Into<String>, source: ShapeError) -> Self {
        Self::Shape {
            name: name.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use stencil_core::draw::{Surface, SvgSurface, FixedTextMeasure};

    use super::*;

    #[test]
    fn test_invalid_geometry_message() {
        let err = ShapeError::invalid_geometry("State", "frame has no area");
        assert_eq!(err.to_string(), "invalid geometry for State: frame has no area");
    }

    #[test]
    fn test_shape_error_wraps_surface_error() {
        let mut surface = SvgSurface::new(Box::new(FixedTextMeasure::default()));
        let id = surface.path(Vec::new());
        surface.remove(id).unwrap();
        let surface_err = surface.remove(id).unwrap_err();

        let err = StencilError::shape("Idle", ShapeError::from(surface_err));
        assert!(err.to_string().starts_with("Shape `Idle`: primitive"));
    }

    #[test]
    fn test_scene_error_keeps_span() {
        let src = "[[shape]]\nkind = ";
        let toml_err = toml::from_str::<toml::Table>(src).unwrap_err();
        let err = StencilError::new_scene_error(&toml_err, src);

        let StencilError::Scene { span, src: kept, .. } = err else {
            panic!("expected a scene error");
        };
        assert!(span.is_some());
        assert_eq!(kept, src);
    }
}
