//! CLI logic for the Stencil scene renderer.
//!
//! Reads a TOML scene, draws its shapes and links and writes the SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use stencil::{DiagramBuilder, StencilError};

/// Run the Stencil CLI application
///
/// This function reads the scene file, renders it and writes the resulting
/// SVG to the output file.
///
/// # Errors
///
/// Returns `StencilError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Scene parsing errors
/// - Shape construction and link errors
pub fn run(args: &Args) -> Result<(), StencilError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing scene"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let scene = builder.parse(&source)?;
    let svg = builder.render_svg(&scene)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
