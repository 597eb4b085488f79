//! Configuration types for Stencil diagrams.
//!
//! This module provides configuration structures that control how diagrams
//! are styled and how text is measured. All types implement
//! [`serde::Deserialize`] for loading from TOML files.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`StyleConfig`] - Background color, font and text measurement settings.
//! - [`TextMeasureKind`] - Selects the [`TextMeasure`] used for layout.
//! - [`ShapeStyle`] - Fill and stroke overrides carried by every shape.
//!
//! # Example
//!
//! ```
//! # use stencil::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().background_color().is_ok());
//! assert_eq!(config.style().text_definition().font_size(), 12);
//! ```

use serde::{Deserialize, Deserializer};

use stencil_core::{
    color::Color,
    draw::{
        Attributes, CosmicTextMeasure, FixedTextMeasure, StrokeDefinition, StrokeStyle,
        TextDefinition, TextMeasure,
    },
    geometry::{Bounds, Point, Size},
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified style configuration.
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// How text primitives are measured before they are placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMeasureKind {
    /// Shape text with the system fonts through cosmic-text.
    #[default]
    Cosmic,
    /// Fixed per-character metrics; output does not depend on installed fonts.
    Fixed,
}

impl TextMeasureKind {
    /// Creates the [`TextMeasure`] this kind stands for.
    pub fn to_measure(self) -> Box<dyn TextMeasure> {
        match self {
            Self::Cosmic => Box::new(CosmicTextMeasure),
            Self::Fixed => Box::new(FixedTextMeasure::default()),
        }
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Fields that are not set fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background [`Color`] for diagrams, as a color string.
    #[serde(default)]
    background_color: Option<String>,

    #[serde(default)]
    font_family: Option<String>,

    #[serde(default)]
    font_size: Option<u16>,

    #[serde(default)]
    text_measure: TextMeasureKind,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the font used for labels and member lists.
    pub fn text_definition(&self) -> TextDefinition {
        let mut definition = TextDefinition::new();
        if let Some(family) = &self.font_family {
            definition.set_font_family(family);
        }
        if let Some(size) = self.font_size {
            definition.set_font_size(size);
        }
        definition
    }

    pub fn text_measure(&self) -> TextMeasureKind {
        self.text_measure
    }

    /// Sets the text measurement strategy (builder style).
    pub fn with_text_measure(mut self, kind: TextMeasureKind) -> Self {
        self.text_measure = kind;
        self
    }

    /// Sets the font size in points (builder style).
    pub fn with_font_size(mut self, size: u16) -> Self {
        self.font_size = Some(size);
        self
    }
}

/// Fill and stroke overrides for a shape outline.
///
/// Unset fields fall back to the shape kind's own defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ShapeStyle {
    #[serde(default)]
    fill: Option<Color>,

    #[serde(default)]
    stroke: Option<Color>,

    #[serde(default)]
    stroke_width: Option<f32>,

    /// Dash pattern of the outline: `solid`, `dashed`, `dotted` or a dash list.
    #[serde(default)]
    stroke_style: Option<StrokeStyle>,
}

impl ShapeStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_stroke(mut self, stroke: Color) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = Some(width);
        self
    }

    pub fn with_stroke_style(mut self, style: StrokeStyle) -> Self {
        self.stroke_style = Some(style);
        self
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    /// Attributes for an outline, filling with `default_fill` unless a fill
    /// was configured.
    pub(crate) fn to_attributes(&self, default_fill: Color) -> Attributes {
        let mut attributes = Attributes::new().with_fill(self.fill.unwrap_or(default_fill));
        if self.stroke.is_some() || self.stroke_width.is_some() || self.stroke_style.is_some() {
            let mut stroke = StrokeDefinition::default();
            if let Some(color) = self.stroke {
                stroke.set_color(color);
            }
            if let Some(width) = self.stroke_width {
                stroke.set_width(width);
            }
            if let Some(style) = &self.stroke_style {
                stroke.set_style(style.clone());
            }
            attributes = attributes.with_stroke(stroke);
        }
        attributes
    }
}

/// A shape frame as written in scene files: top-left corner plus size.
#[derive(Debug, Deserialize)]
struct FrameSpec {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

/// Deserializes `{ x, y, width, height }` into [`Bounds`].
pub(crate) fn deserialize_frame<'de, D>(deserializer: D) -> Result<Bounds, D::Error>
where
    D: Deserializer<'de>,
{
    let frame = FrameSpec::deserialize(deserializer)?;
    Ok(Bounds::new_from_top_left(
        Point::new(frame.x, frame.y),
        Size::new(frame.width, frame.height),
    ))
}
