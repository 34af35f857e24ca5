//! Command-line argument definitions for the archgram CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, output format,
//! configuration file selection, and logging verbosity.

use std::path::Path;

use clap::{Parser, ValueEnum};

use archgram::export::png::DEFAULT_SCALE;

/// Image formats the CLI can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Svg,
    Png,
}

/// Command-line arguments for the archgram diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the diagram description (TOML or JSON)
    #[arg(help = "Path to the input file; renders the built-in X Algorithm diagram when omitted")]
    pub input: Option<String>,

    /// Path to the output file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Output format, inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pixels per diagram unit for PNG output
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    pub scale: f32,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// The requested format, or the one implied by the output path.
    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_else(|| {
            match Path::new(&self.output)
                .extension()
                .and_then(|ext| ext.to_str())
            {
                Some(ext) if ext.eq_ignore_ascii_case("png") => OutputFormat::Png,
                _ => OutputFormat::Svg,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["archgram"]);
        assert_eq!(args.input, None);
        assert_eq!(args.output, "out.svg");
        assert_eq!(args.scale, DEFAULT_SCALE);
        assert_eq!(args.output_format(), OutputFormat::Svg);
    }

    #[test]
    fn test_format_inferred_from_extension() {
        let args = parse(&["archgram", "stack.toml", "-o", "stack.PNG"]);
        assert_eq!(args.input.as_deref(), Some("stack.toml"));
        assert_eq!(args.output_format(), OutputFormat::Png);
    }

    #[test]
    fn test_explicit_format_wins() {
        let args = parse(&["archgram", "-o", "stack.png", "-f", "svg"]);
        assert_eq!(args.output_format(), OutputFormat::Svg);
    }
}
