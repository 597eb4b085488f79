//! State-machine state: a rounded rectangle with a name, a divider and the
//! state's actions.

use log::debug;
use serde::Deserialize;

use stencil_core::{
    color::Color,
    draw::{Attributes, PrimitiveId, Scale, Surface},
    geometry::{Bounds, Point},
};

use crate::{
    config::{ShapeStyle, deserialize_frame},
    error::ShapeError,
    layout::{self, Placement},
    shape::{UmlShape, validate_finite, validate_frame},
};

/// An `event/ action` pair that is handled without leaving the state.
///
/// Written as a two-element array in scene files: `["press", "beep"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InnerAction(String, String);

impl InnerAction {
    pub fn new(event: impl Into<String>, action: impl Into<String>) -> Self {
        Self(event.into(), action.into())
    }

    pub fn event(&self) -> &str {
        &self.0
    }

    pub fn action(&self) -> &str {
        &self.1
    }
}

/// Entry, exit and inner actions listed below a state's name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Actions {
    #[serde(default)]
    entry: Option<String>,

    #[serde(default)]
    exit: Option<String>,

    #[serde(default)]
    inner: Vec<InnerAction>,
}

impl Actions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, action: impl Into<String>) -> Self {
        self.entry = Some(action.into());
        self
    }

    pub fn with_exit(mut self, action: impl Into<String>) -> Self {
        self.exit = Some(action.into());
        self
    }

    pub fn with_inner(mut self, event: impl Into<String>, action: impl Into<String>) -> Self {
        self.inner.push(InnerAction::new(event, action));
        self
    }

    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    pub fn exit(&self) -> Option<&str> {
        self.exit.as_deref()
    }

    pub fn inner(&self) -> &[InnerAction] {
        &self.inner
    }

    /// Renders the action list: `entry/ ...`, `exit/ ...`, then one
    /// `event/ action` line per inner action.
    ///
    /// ```
    /// # use stencil::shape::Actions;
    /// let actions = Actions::new()
    ///     .with_entry("open")
    ///     .with_inner("tick", "count");
    /// assert_eq!(actions.to_text(), "entry/ open\ntick/ count");
    /// ```
    pub fn to_text(&self) -> String {
        let entry = self
            .entry
            .as_deref()
            .filter(|action| !action.is_empty())
            .map(|action| format!("entry/ {action}"));
        let exit = self
            .exit
            .as_deref()
            .filter(|action| !action.is_empty())
            .map(|action| format!("exit/ {action}"));
        let inner = self
            .inner
            .iter()
            .map(|pair| format!("{}/ {}", pair.event(), pair.action()));

        layout::compose_lines(entry.into_iter().chain(exit).chain(inner))
    }
}

fn default_radius() -> f32 {
    15.0
}

fn default_label_offset() -> Point {
    Point::new(20.0, 5.0)
}

fn default_swimlane_offset_y() -> f32 {
    18.0
}

fn default_actions_offset() -> Point {
    Point::new(5.0, 5.0)
}

/// Construction options of a [`State`].
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Corner radius | `15` |
/// | Fill | white |
/// | Label | `""` |
/// | Label offset | `(20, 5)` |
/// | Swimlane offset | `18` below the label offset |
/// | Actions offset | `(5, 5)` |
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StateConfig {
    #[serde(deserialize_with = "deserialize_frame")]
    rect: Bounds,

    #[serde(default = "default_radius")]
    radius: f32,

    #[serde(default)]
    style: ShapeStyle,

    #[serde(default)]
    label: String,

    #[serde(default)]
    actions: Actions,

    #[serde(default = "default_label_offset")]
    label_offset: Point,

    #[serde(default = "default_swimlane_offset_y")]
    swimlane_offset_y: f32,

    #[serde(default = "default_actions_offset")]
    actions_offset: Point,
}

impl StateConfig {
    /// Creates a configuration for a state occupying `rect`.
    pub fn new(rect: Bounds) -> Self {
        Self {
            rect,
            radius: default_radius(),
            style: ShapeStyle::default(),
            label: String::new(),
            actions: Actions::default(),
            label_offset: default_label_offset(),
            swimlane_offset_y: default_swimlane_offset_y(),
            actions_offset: default_actions_offset(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_actions(mut self, actions: Actions) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
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

    pub fn with_swimlane_offset_y(mut self, offset: f32) -> Self {
        self.swimlane_offset_y = offset;
        self
    }

    pub fn with_actions_offset(mut self, offset: Point) -> Self {
        self.actions_offset = offset;
        self
    }

    pub fn rect(&self) -> Bounds {
        self.rect
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    fn validate(&self) -> Result<(), ShapeError> {
        validate_frame(State::OBJECT, self.rect)?;
        validate_finite(State::OBJECT, "radius", self.radius)?;
        if self.radius < 0.0 {
            return Err(ShapeError::invalid_geometry(
                State::OBJECT,
                format!("radius must not be negative, got {}", self.radius),
            ));
        }
        validate_finite(State::OBJECT, "label offset", self.label_offset.x())?;
        validate_finite(State::OBJECT, "label offset", self.label_offset.y())?;
        validate_finite(State::OBJECT, "swimlane offset", self.swimlane_offset_y)?;
        validate_finite(State::OBJECT, "actions offset", self.actions_offset.x())?;
        validate_finite(State::OBJECT, "actions offset", self.actions_offset.y())
    }
}

/// The primitives a [`State`] derives from its wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateParts {
    pub label: PrimitiveId,
    pub swimlane: PrimitiveId,
    pub actions: PrimitiveId,
}

/// A state of a state machine.
#[derive(Debug)]
pub struct State {
    config: StateConfig,
    wrapper: PrimitiveId,
    parts: StateParts,
}

impl State {
    pub const OBJECT: &'static str = "State";

    /// Builds the state on `surface`.
    ///
    /// Either every primitive is created or, on error, none is left behind.
    pub fn build(config: StateConfig, surface: &mut dyn Surface) -> Result<Self, ShapeError> {
        config.validate()?;

        layout::build_atomically(surface, |surface| {
            let wrapper = surface.rectangle(config.rect, config.radius);
            surface.set_attributes(wrapper, &config.style.to_attributes(Color::white()))?;
            let parts = Self::compose(&config, wrapper, surface)?;

            debug!(label = config.label.as_str(), wrapper:% = wrapper; "Built state");
            Ok(Self {
                config,
                wrapper,
                parts,
            })
        })
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    pub fn parts(&self) -> StateParts {
        self.parts
    }

    fn compose(
        config: &StateConfig,
        wrapper: PrimitiveId,
        surface: &mut dyn Surface,
    ) -> Result<StateParts, ShapeError> {
        let frame = surface.bounding_box(wrapper)?;
        validate_frame(Self::OBJECT, frame)?;

        let label = layout::place_text(
            surface,
            &config.label,
            Placement::TopLeft(frame.min_point().add_point(config.label_offset)),
        )?;

        let divider_y = frame.min_y() + config.label_offset.y() + config.swimlane_offset_y;
        let swimlane = layout::swimlane(surface, frame, divider_y);

        let actions = layout::place_text(
            surface,
            &config.actions.to_text(),
            Placement::List(Point::new(
                frame.min_x() + config.actions_offset.x(),
                divider_y + config.actions_offset.y(),
            )),
        )?;

        Ok(StateParts {
            label,
            swimlane,
            actions,
        })
    }
}

impl UmlShape for State {
    fn object(&self) -> &'static str {
        Self::OBJECT
    }

    fn wrapper(&self) -> PrimitiveId {
        self.wrapper
    }

    fn inner(&self) -> Vec<PrimitiveId> {
        vec![self.parts.label, self.parts.swimlane, self.parts.actions]
    }

    /// Restores the configured corner radius, which scaling distorts, and
    /// lays the label, divider and actions out again on the scaled wrapper.
    ///
    /// The old parts are only removed once the new ones are in place, so a
    /// failed zoom leaves the shape as it was.
    fn zoom(&mut self, surface: &mut dyn Surface, _scale: Scale) -> Result<(), ShapeError> {
        let parts = layout::build_atomically(surface, |surface| {
            Self::compose(&self.config, self.wrapper, surface)
        })?;
        let stale = std::mem::replace(&mut self.parts, parts);

        surface.set_attributes(
            self.wrapper,
            &Attributes::new().with_corner_radius(self.config.radius),
        )?;
        for id in [stale.label, stale.swimlane, stale.actions] {
            surface.remove(id)?;
        }
        Ok(())
    }
}
