//! Class-diagram class: name, attribute compartment and method compartment.

use log::debug;
use serde::Deserialize;

use stencil_core::{
    color::Color,
    draw::{PrimitiveId, Scale, Surface},
    geometry::{Bounds, Point},
};

use crate::{
    config::{ShapeStyle, deserialize_frame},
    error::ShapeError,
    layout::{self, Placement},
    shape::{UmlShape, validate_finite, validate_frame},
};

fn default_label_offset() -> Point {
    Point::new(20.0, 5.0)
}

fn default_swimlane_offset_y() -> f32 {
    18.0
}

fn default_list_offset() -> Point {
    Point::new(5.0, 5.0)
}

/// Construction options of a [`Class`].
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Fill | white |
/// | Label offset | `(20, 5)` |
/// | First swimlane offset | `18` below the label offset |
/// | Attributes offset | `(5, 5)` |
/// | Second swimlane offset | `18` below the attributes |
/// | Methods offset | `(5, 5)` |
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassConfig {
    #[serde(deserialize_with = "deserialize_frame")]
    rect: Bounds,

    #[serde(default)]
    style: ShapeStyle,

    #[serde(default)]
    label: String,

    #[serde(default)]
    attributes: Vec<String>,

    #[serde(default)]
    methods: Vec<String>,

    #[serde(default = "default_label_offset")]
    label_offset: Point,

    #[serde(default = "default_swimlane_offset_y")]
    swimlane1_offset_y: f32,

    #[serde(default = "default_list_offset")]
    attributes_offset: Point,

    #[serde(default = "default_swimlane_offset_y")]
    swimlane2_offset_y: f32,

    #[serde(default = "default_list_offset")]
    methods_offset: Point,
}

impl ClassConfig {
    pub fn new(rect: Bounds) -> Self {
        Self {
            rect,
            style: ShapeStyle::default(),
            label: String::new(),
            attributes: Vec::new(),
            methods: Vec::new(),
            label_offset: default_label_offset(),
            swimlane1_offset_y: default_swimlane_offset_y(),
            attributes_offset: default_list_offset(),
            swimlane2_offset_y: default_swimlane_offset_y(),
            methods_offset: default_list_offset(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_label_offset(mut self, offset: Point) -> Self {
        self.label_offset = offset;
        self
    }

    pub fn with_swimlane_offsets(mut self, first: f32, second: f32) -> Self {
        self.swimlane1_offset_y = first;
        self.swimlane2_offset_y = second;
        self
    }

    pub fn with_attributes_offset(mut self, offset: Point) -> Self {
        self.attributes_offset = offset;
        self
    }

    pub fn with_methods_offset(mut self, offset: Point) -> Self {
        self.methods_offset = offset;
        self
    }

    pub fn rect(&self) -> Bounds {
        self.rect
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    fn validate(&self) -> Result<(), ShapeError> {
        validate_frame(Class::OBJECT, self.rect)?;
        for (what, value) in [
            ("label offset", self.label_offset.x()),
            ("label offset", self.label_offset.y()),
            ("first swimlane offset", self.swimlane1_offset_y),
            ("attributes offset", self.attributes_offset.x()),
            ("attributes offset", self.attributes_offset.y()),
            ("second swimlane offset", self.swimlane2_offset_y),
            ("methods offset", self.methods_offset.x()),
            ("methods offset", self.methods_offset.y()),
        ] {
            validate_finite(Class::OBJECT, what, value)?;
        }
        Ok(())
    }
}

/// The primitives a [`Class`] derives from its wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassParts {
    pub label: PrimitiveId,
    pub swimlane1: PrimitiveId,
    pub attributes: PrimitiveId,
    pub swimlane2: PrimitiveId,
    pub methods: PrimitiveId,
}

/// A class box.
///
/// The second divider and the methods follow the measured height of the
/// attribute list, so longer attribute lists push the methods down.
#[derive(Debug)]
pub struct Class {
    config: ClassConfig,
    wrapper: PrimitiveId,
    parts: ClassParts,
}

impl Class {
    pub const OBJECT: &'static str = "Class";

    /// Builds the class on `surface`.
    ///
    /// Either every primitive is created or, on error, none is left behind.
    pub fn build(config: ClassConfig, surface: &mut dyn Surface) -> Result<Self, ShapeError> {
        config.validate()?;

        layout::build_atomically(surface, |surface| {
            let wrapper = surface.rectangle(config.rect, 0.0);
            surface.set_attributes(wrapper, &config.style.to_attributes(Color::white()))?;
            let parts = Self::compose(&config, wrapper, surface)?;

            debug!(
                label = config.label.as_str(),
                attributes = config.attributes.len(),
                methods = config.methods.len();
                "Built class"
            );
            Ok(Self {
                config,
                wrapper,
                parts,
            })
        })
    }

    pub fn config(&self) -> &ClassConfig {
        &self.config
    }

    pub fn parts(&self) -> ClassParts {
        self.parts
    }

    fn compose(
        config: &ClassConfig,
        wrapper: PrimitiveId,
        surface: &mut dyn Surface,
    ) -> Result<ClassParts, ShapeError> {
        let frame = surface.bounding_box(wrapper)?;
        validate_frame(Self::OBJECT, frame)?;

        let label = layout::place_text(
            surface,
            &config.label,
            Placement::TopLeft(frame.min_point().add_point(config.label_offset)),
        )?;

        let divider1_y = frame.min_y() + config.label_offset.y() + config.swimlane1_offset_y;
        let swimlane1 = layout::swimlane(surface, frame, divider1_y);

        let attributes = layout::place_text(
            surface,
            &layout::compose_lines(&config.attributes),
            Placement::List(Point::new(
                frame.min_x() + config.attributes_offset.x(),
                divider1_y + config.attributes_offset.y(),
            )),
        )?;
        let attributes_height = surface.bounding_box(attributes)?.height();

        let swimlane2 = layout::swimlane(
            surface,
            frame,
            divider1_y + attributes_height + config.swimlane2_offset_y,
        );

        let methods = layout::place_text(
            surface,
            &layout::compose_lines(&config.methods),
            Placement::List(Point::new(
                frame.min_x() + config.methods_offset.x(),
                divider1_y
                    + config.attributes_offset.y()
                    + attributes_height
                    + config.swimlane2_offset_y
                    + config.methods_offset.y(),
            )),
        )?;

        Ok(ClassParts {
            label,
            swimlane1,
            attributes,
            swimlane2,
            methods,
        })
    }
}

impl UmlShape for Class {
    fn object(&self) -> &'static str {
        Self::OBJECT
    }

    fn wrapper(&self) -> PrimitiveId {
        self.wrapper
    }

    fn inner(&self) -> Vec<PrimitiveId> {
        vec![
            self.parts.label,
            self.parts.swimlane1,
            self.parts.attributes,
            self.parts.swimlane2,
            self.parts.methods,
        ]
    }

    /// Lays the compartments out again on the scaled wrapper. On error the
    /// previous compartments stay in place.
    fn zoom(&mut self, surface: &mut dyn Surface, _scale: Scale) -> Result<(), ShapeError> {
        let stale = self.inner();
        self.parts = layout::build_atomically(surface, |surface| {
            Self::compose(&self.config, self.wrapper, surface)
        })?;

        for id in stale {
            surface.remove(id)?;
        }
        Ok(())
    }
}
