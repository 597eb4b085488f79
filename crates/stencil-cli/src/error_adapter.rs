//! Error adapter for converting StencilError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Scene parse
//! errors carry the scene source and a byte span, so they are rendered with
//! a source snippet; every other error is rendered as a plain message with a
//! diagnostic code.

use std::{fmt, ops::Range};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use stencil::StencilError;

/// Adapter for a scene parse error with its source.
pub struct SceneAdapter<'a> {
    message: &'a str,
    span: Option<&'a Range<usize>>,
    src: &'a str,
}

impl fmt::Debug for SceneAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneAdapter")
            .field("message", &self.message)
            .field("span", &self.span)
            .finish()
    }
}

impl fmt::Display for SceneAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message.trim_end())
    }
}

impl std::error::Error for SceneAdapter<'_> {}

impl MietteDiagnostic for SceneAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("stencil::scene"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(
            "shapes are `[[shape]]` tables with a `kind` of State, StartState, EndState or Class",
        ))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        let span = SourceSpan::new(span.start.into(), span.len());
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some("here".to_string()),
            span,
        ))))
    }
}

/// Adapter for [`StencilError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a StencilError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            StencilError::Io(_) => "stencil::io",
            StencilError::Scene { .. } => "stencil::scene",
            StencilError::Config(_) => "stencil::config",
            StencilError::Shape { .. } => "stencil::shape",
            StencilError::DuplicateShape(_) | StencilError::UnknownShape(_) => "stencil::name",
            StencilError::Surface(_) => "stencil::surface",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            StencilError::DuplicateShape(_) => Some(Box::new("every shape needs a unique `name`")),
            StencilError::UnknownShape(_) => {
                Some(Box::new("links may only refer to shapes declared in the scene"))
            }
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A scene error with source location information.
    Scene(SceneAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Scene(s) => fmt::Display::fmt(s, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Scene(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Scene(s) => s.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Scene(s) => s.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Scene(s) => s.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Scene(s) => s.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`StencilError`] into a [`Reportable`].
pub fn to_reportable(err: &StencilError) -> Reportable<'_> {
    match err {
        StencilError::Scene { message, span, src } => Reportable::Scene(SceneAdapter {
            message,
            span: span.as_ref(),
            src,
        }),
        _ => Reportable::Error(ErrorAdapter(err)),
    }
}

#[cfg(test)]
mod tests {
    use stencil::Scene;

    use super::*;

    #[test]
    fn test_scene_error_has_label() {
        let src = "[[shape]]\nkind = \"Actor\"\nname = \"a\"\n";
        let err = Scene::from_toml(src).unwrap_err();

        let reportable = to_reportable(&err);
        let Reportable::Scene(adapter) = &reportable else {
            panic!("Expected Scene");
        };

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert!(reportable.source_code().is_some());
        assert_eq!(reportable.code().unwrap().to_string(), "stencil::scene");
    }

    #[test]
    fn test_non_scene_error() {
        let err = StencilError::UnknownShape("idle".to_string());

        let reportable = to_reportable(&err);
        match &reportable {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Unknown shape `idle`");
            }
            Reportable::Scene(_) => panic!("Expected Error"),
        }
        assert_eq!(reportable.code().unwrap().to_string(), "stencil::name");
        assert!(reportable.help().is_some());
        assert!(reportable.labels().is_none());
    }

    #[test]
    fn test_rendered_report_mentions_message() {
        let err = StencilError::Config("zoom must be a positive number, got 0".to_string());
        let reportable = to_reportable(&err);

        let mut out = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut out, &reportable)
            .unwrap();
        assert!(out.contains("zoom must be a positive number"));
    }
}
