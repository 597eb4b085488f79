//! Stencil - UML state-machine and class-diagram shapes.
//!
//! Each shape is composed from primitives on a retained-mode drawing
//! surface: an outline (the *wrapper*) plus labels, dividers and member lists
//! laid out relative to it. When the outline is rescaled the shape rebuilds
//! its derived primitives so that text keeps its size and position.
//!
//! Shapes can be built directly with [`shape::State::build`] and friends,
//! collected in a [`Diagram`], or described in a TOML [`Scene`] and rendered
//! with a [`DiagramBuilder`].

pub mod arrows;
pub mod config;
pub mod shape;

mod diagram;
mod error;
mod layout;
mod scene;

pub use stencil_core::{color, draw, geometry};

pub use diagram::Diagram;
pub use error::{ShapeError, StencilError};
pub use scene::{LinkSpec, Scene, ShapeSpec};

use log::{debug, info, trace};

use stencil_core::{draw::Scale, geometry::Point};

use config::AppConfig;

/// Builder for parsing and rendering Stencil scenes.
///
/// # Examples
///
/// ```rust,no_run
/// use stencil::{DiagramBuilder, config::AppConfig};
///
/// let source = r#"
/// [[shape]]
/// kind = "State"
/// name = "idle"
/// label = "Idle"
/// rect = { x = 0.0, y = 0.0, width = 120.0, height = 80.0 }
/// "#;
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let scene = builder.parse(source).expect("Failed to parse");
/// let svg = builder.render_svg(&scene).expect("Failed to render");
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse TOML source into a [`Scene`].
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::Scene`] for malformed scene files.
    pub fn parse(&self, source: &str) -> Result<Scene, StencilError> {
        info!("Parsing scene");
        let scene = Scene::from_toml(source)?;

        debug!(shapes = scene.shapes().len(), links = scene.links().len(); "Scene parsed successfully");
        trace!(scene:?; "Parsed scene");
        Ok(scene)
    }

    /// Draw every shape and link of `scene` on a fresh [`Diagram`], then
    /// apply the scene's zoom.
    ///
    /// # Errors
    ///
    /// Returns the first shape, link or zoom error; nothing is drawn for a
    /// shape that fails to build.
    pub fn build(&self, scene: &Scene) -> Result<Diagram, StencilError> {
        let mut diagram = Diagram::new(&self.config)?;

        for spec in scene.shapes() {
            match spec {
                ShapeSpec::State { name, config } => diagram.add_state(name, config.clone())?,
                ShapeSpec::StartState { name, config } => {
                    diagram.add_start_state(name, config.clone())?
                }
                ShapeSpec::EndState { name, config } => {
                    diagram.add_end_state(name, config.clone())?
                }
                ShapeSpec::Class { name, config } => diagram.add_class(name, config.clone())?,
            }
        }

        for link in scene.links() {
            trace!(from = link.from(), to = link.to(), arrow:% = link.arrow(); "Drawing link");
            diagram.connect(link.from(), link.to(), &link.arrow().style())?;
        }

        if let Some(factor) = scene.zoom() {
            diagram.zoom(Scale::uniform(factor).with_origin(Point::default()))?;
        }

        Ok(diagram)
    }

    /// Render a scene to an SVG string.
    pub fn render_svg(&self, scene: &Scene) -> Result<String, StencilError> {
        info!(shapes = scene.shapes().len(); "Building diagram");
        let diagram = self.build(scene)?;
        let svg = diagram.render_svg();

        info!("SVG rendered successfully");
        Ok(svg)
    }
}
