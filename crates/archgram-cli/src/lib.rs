//! CLI logic for the archgram diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::fs;

use log::info;

use archgram::{ArchgramError, DescriptionFormat, DiagramBuilder, presets};

/// Run the archgram CLI application
///
/// Reads the description named by `args.input` (or takes the built-in X
/// Algorithm diagram when there is none), renders it and writes SVG or PNG
/// to the output path.
///
/// # Errors
///
/// Returns `ArchgramError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed or invalid descriptions
/// - Rendering and rasterization errors
pub fn run(args: &Args) -> Result<(), ArchgramError> {
    let format = args.output_format();
    info!(
        input_path = args.input.as_deref().unwrap_or("<built-in>"),
        output_path = args.output,
        format:? = format;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let builder = DiagramBuilder::new(app_config);

    let diagram = match &args.input {
        Some(input) => {
            let source = fs::read_to_string(input)?;
            builder.parse(&source, DescriptionFormat::from_path(input))?
        }
        None => presets::x_algorithm()?,
    };

    match format {
        OutputFormat::Svg => {
            let svg = builder.render_svg(&diagram)?;
            fs::write(&args.output, svg)?;
        }
        OutputFormat::Png => {
            let png = builder.render_png(&diagram, args.scale)?;
            fs::write(&args.output, png)?;
        }
    }

    info!(output_file = args.output; "Diagram exported successfully");

    Ok(())
}
