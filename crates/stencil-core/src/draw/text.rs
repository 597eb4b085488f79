//! Text styling and measurement.
//!
//! Shapes cannot know how many pixels a label occupies before it is laid out,
//! so every text primitive is measured by a [`TextMeasure`] when it is created.
//!
//! # Overview
//!
//! - [`TextDefinition`] - Font family, size and color shared by text primitives
//! - [`TextMeasure`] - Converts a string into a pixel [`Size`]
//! - [`CosmicTextMeasure`] - Real font metrics and shaping through cosmic-text
//! - [`FixedTextMeasure`] - Deterministic per-character metrics
//!
//! # Quick Start
//!
//! ```
//! # use stencil_core::draw::{FixedTextMeasure, TextDefinition, TextMeasure};
//! let style = TextDefinition::new();
//! let size = FixedTextMeasure::default().measure("entry/ open\nexit/ close", &style);
//! assert!(size.height() > 0.0);
//! ```

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;
use serde::Deserialize;

use crate::{color::Color, geometry::Size};

/// Defines the visual style for text primitives.
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"Arial"` |
/// | Font size | `12` |
/// | Text color | `None` (SVG default, typically black) |
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextDefinition {
    font_family: String,
    font_size: u16,
    color: Option<Color>,
}

impl TextDefinition {
    /// Creates a new text definition with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the font size in points.
    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    /// Sets the font family (e.g., "Arial", "monospace").
    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    /// Sets the text color. `None` leaves the renderer default.
    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 12,
            color: None,
        }
    }
}

/// Measures the rendered size of a possibly multi-line string.
///
/// Implementations must return [`Size::default`] for the empty string, so
/// that blank labels collapse to a zero-sized box.
pub trait TextMeasure: std::fmt::Debug {
    fn measure(&self, content: &str, definition: &TextDefinition) -> Size;
}

/// Deterministic text metrics: every character is `char_width_factor` font
/// sizes wide and every line `line_height_factor` font sizes tall.
///
/// Results are independent of the fonts installed on the machine, which makes
/// this the measure of choice for tests and reproducible output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTextMeasure {
    char_width_factor: f32,
    line_height_factor: f32,
}

impl FixedTextMeasure {
    pub fn new(char_width_factor: f32, line_height_factor: f32) -> Self {
        Self {
            char_width_factor,
            line_height_factor,
        }
    }
}

impl Default for FixedTextMeasure {
    fn default() -> Self {
        Self::new(0.6, 1.2)
    }
}

impl TextMeasure for FixedTextMeasure {
    fn measure(&self, content: &str, definition: &TextDefinition) -> Size {
        if content.is_empty() {
            return Size::default();
        }

        let font_size = f32::from(definition.font_size().max(1));
        let mut line_count = 0usize;
        let mut max_chars = 0usize;
        for line in content.split('\n') {
            line_count += 1;
            max_chars = max_chars.max(line.chars().count());
        }

        Size::new(
            max_chars as f32 * font_size * self.char_width_factor,
            line_count as f32 * font_size * self.line_height_factor,
        )
    }
}

/// Text measurement backed by cosmic-text shaping and the system fonts.
///
/// The underlying [`FontSystem`] is expensive to create, so a single instance
/// is shared by every `CosmicTextMeasure`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosmicTextMeasure;

impl TextMeasure for CosmicTextMeasure {
    fn measure(&self, content: &str, definition: &TextDefinition) -> Size {
        TEXT_MANAGER
            .get_or_init(TextManager::new)
            .calculate_text_size(content, definition)
    }
}

/// Owns the shared cosmic-text [`FontSystem`].
struct TextManager {
    font_system: Mutex<FontSystem>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Calculate the size of text in pixels from shaped layout runs.
    ///
    /// Falls back to an average glyph width estimate when shaping yields no
    /// layout runs.
    fn calculate_text_size(&self, text: &str, text_def: &TextDefinition) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = self.font_system.lock().expect("failed to lock FontSystem");

        // Points to pixels at standard DPI
        let font_size_px = f32::from(text_def.font_size()) * 1.33;
        let metrics = Metrics::new(font_size_px, font_size_px * 1.15);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);
        let attrs = Attrs::new().family(Family::Name(text_def.font_family()));

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        let mut runs = 0usize;
        for run in buffer.layout_runs() {
            runs += 1;
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
        }

        if runs == 0 {
            max_width = text.len() as f32 * (font_size_px * 0.55);
            total_height = metrics.line_height;
        }

        Size::new(max_width, total_height)
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();
