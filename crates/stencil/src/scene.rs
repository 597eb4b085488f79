//! Scene files: the shapes and links of a diagram written as TOML.
//!
//! ```toml
//! zoom = 1.5
//!
//! [[shape]]
//! kind = "StartState"
//! name = "start"
//! position = { x = 20.0, y = 60.0 }
//!
//! [[shape]]
//! kind = "State"
//! name = "idle"
//! label = "Idle"
//! rect = { x = 80.0, y = 20.0, width = 140.0, height = 80.0 }
//! actions = { entry = "reset", inner = [["tick", "count"]] }
//!
//! [[link]]
//! from = "start"
//! to = "idle"
//! arrow = "transition"
//! ```

use serde::Deserialize;

use crate::{
    arrows::ArrowPreset,
    error::StencilError,
    shape::{ClassConfig, EndStateConfig, StartStateConfig, StateConfig},
};

/// One `[[shape]]` table; `kind` selects the variant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind")]
pub enum ShapeSpec {
    State {
        name: String,
        #[serde(flatten)]
        config: StateConfig,
    },
    StartState {
        name: String,
        #[serde(flatten)]
        config: StartStateConfig,
    },
    EndState {
        name: String,
        #[serde(flatten)]
        config: EndStateConfig,
    },
    Class {
        name: String,
        #[serde(flatten)]
        config: ClassConfig,
    },
}

impl ShapeSpec {
    pub fn name(&self) -> &str {
        match self {
            Self::State { name, .. }
            | Self::StartState { name, .. }
            | Self::EndState { name, .. }
            | Self::Class { name, .. } => name,
        }
    }
}

/// One `[[link]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkSpec {
    from: String,
    to: String,
    #[serde(default)]
    arrow: ArrowPreset,
}

impl LinkSpec {
    pub fn new(from: impl Into<String>, to: impl Into<String>, arrow: ArrowPreset) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            arrow,
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn arrow(&self) -> ArrowPreset {
        self.arrow
    }
}

/// A parsed scene file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Scene {
    #[serde(default, rename = "shape")]
    shapes: Vec<ShapeSpec>,

    #[serde(default, rename = "link")]
    links: Vec<LinkSpec>,

    /// Uniform zoom applied about the origin after every shape and link is
    /// drawn.
    #[serde(default)]
    zoom: Option<f32>,
}

impl Scene {
    /// Parses a scene from TOML source.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::Scene`] with the offending span when the
    /// source is not a valid scene, or [`StencilError::Config`] for a zoom
    /// factor that is not a positive number.
    pub fn from_toml(source: &str) -> Result<Self, StencilError> {
        let scene: Self =
            toml::from_str(source).map_err(|err| StencilError::new_scene_error(&err, source))?;

        if let Some(zoom) = scene.zoom.filter(|zoom| !(zoom.is_finite() && *zoom > 0.0)) {
            return Err(StencilError::Config(format!(
                "zoom must be a positive number, got {zoom}"
            )));
        }
        Ok(scene)
    }

    pub fn shapes(&self) -> &[ShapeSpec] {
        &self.shapes
    }

    pub fn links(&self) -> &[LinkSpec] {
        &self.links
    }

    pub fn zoom(&self) -> Option<f32> {
        self.zoom
    }
}

#[cfg(test)]
mod tests {
    use stencil_core::geometry::Point;

    use super::*;

    #[test]
    fn test_parse_full_scene() {
        let scene = Scene::from_toml(
            r#"
            zoom = 2.0

            [[shape]]
            kind = "StartState"
            name = "start"
            position = { x = 10.0, y = 10.0 }

            [[shape]]
            kind = "State"
            name = "idle"
            label = "Idle"
            rect = { x = 50.0, y = 0.0, width = 100.0, height = 60.0 }

            [[shape]]
            kind = "EndState"
            name = "done"

            [[shape]]
            kind = "Class"
            name = "Account"
            rect = { x = 0.0, y = 100.0, width = 100.0, height = 80.0 }
            attributes = ["id"]

            [[link]]
            from = "start"
            to = "idle"

            [[link]]
            from = "idle"
            to = "done"
            arrow = "dependency"
            "#,
        )
        .unwrap();

        let names: Vec<&str> = scene.shapes().iter().map(ShapeSpec::name).collect();
        assert_eq!(names, ["start", "idle", "done", "Account"]);
        assert_eq!(scene.zoom(), Some(2.0));

        let ShapeSpec::StartState { config, .. } = &scene.shapes()[0] else {
            panic!("expected a start state");
        };
        assert_eq!(config.position(), Point::new(10.0, 10.0));

        assert_eq!(scene.links()[0].arrow(), ArrowPreset::Transition);
        assert_eq!(scene.links()[1].arrow(), ArrowPreset::Dependency);
    }

    #[test]
    fn test_empty_scene() {
        let scene = Scene::from_toml("").unwrap();
        assert!(scene.shapes().is_empty());
        assert!(scene.links().is_empty());
        assert_eq!(scene.zoom(), None);
    }

    #[test]
    fn test_unknown_kind_reports_span() {
        let err = Scene::from_toml("[[shape]]\nkind = \"Actor\"\nname = \"a\"\n").unwrap_err();
        assert!(matches!(err, StencilError::Scene { .. }));
    }

    #[test]
    fn test_state_without_rect_fails() {
        let err = Scene::from_toml("[[shape]]\nkind = \"State\"\nname = \"a\"\n").unwrap_err();
        assert!(err.to_string().contains("rect"));
    }

    #[test]
    fn test_rejects_non_positive_zoom() {
        let err = Scene::from_toml("zoom = 0.0").unwrap_err();
        assert!(matches!(err, StencilError::Config(_)));
    }
}
