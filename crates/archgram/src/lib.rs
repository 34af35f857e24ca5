//! Archgram - A generator for layered architecture diagrams.
//!
//! A diagram is a set of named layers, each holding a row of component boxes,
//! plus connections between components. Descriptions are read from TOML or
//! JSON, laid out at fixed positions, drawn onto a [`surface::DrawingSurface`]
//! and exported as SVG or PNG.

pub mod config;
pub mod connection;
pub mod export;
pub mod layout;
pub mod presets;
pub mod render;
pub mod style;
pub mod surface;

mod error;

pub use archgram_core::{color, draw, geometry, identifier, model};

pub use error::ArchgramError;

use std::{ops::Range, path::Path};

use log::{debug, info, trace};

use archgram_core::model::{Diagram, DiagramDescription};

use config::AppConfig;
use render::{DiagramRenderer, RenderReport, RenderSettings};
use surface::{DrawingSurface, SvgSurface};

/// Text formats a diagram description can be written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DescriptionFormat {
    #[default]
    Toml,
    Json,
}

impl DescriptionFormat {
    /// Picks the format from a file extension. Anything other than `.json`
    /// is read as TOML.
    ///
    /// # Examples
    ///
    /// ```
    /// use archgram::DescriptionFormat;
    ///
    /// assert_eq!(DescriptionFormat::from_path("stack.json"), DescriptionFormat::Json);
    /// assert_eq!(DescriptionFormat::from_path("stack.toml"), DescriptionFormat::Toml);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Builder for loading and rendering architecture diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use archgram::{DescriptionFormat, DiagramBuilder, config::AppConfig};
///
/// let source = r#"
///     name = "Tiny"
///
///     [[layers]]
///     name = "Client Layer"
///     color_key = "client"
///     position = { x = 50, y = 50 }
///     components = [{ name = "Web", id = "web" }]
/// "#;
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let diagram = builder
///     .parse(source, DescriptionFormat::Toml)
///     .expect("Failed to parse");
///
/// let svg = builder.render_svg(&diagram).expect("Failed to render");
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

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a diagram description.
    ///
    /// # Errors
    ///
    /// Returns [`ArchgramError::Description`] for malformed input, with the
    /// byte span of the problem when the decoder reports one, and
    /// [`ArchgramError::Model`] when the diagram repeats a component id or
    /// leaves one empty.
    pub fn parse(&self, source: &str, format: DescriptionFormat) -> Result<Diagram, ArchgramError> {
        info!(format:? = format; "Parsing diagram description");

        let description: DiagramDescription = match format {
            DescriptionFormat::Toml => toml::from_str(source).map_err(|err| {
                ArchgramError::new_description_error(err.message(), err.span(), source)
            })?,
            DescriptionFormat::Json => serde_json::from_str(source).map_err(|err| {
                let span = json_error_span(source, err.line(), err.column());
                ArchgramError::new_description_error(err.to_string(), span, source)
            })?,
        };

        let diagram = Diagram::try_from(description)?;

        debug!(
            layers = diagram.layers().len(),
            components = diagram.component_count(),
            connections = diagram.connections().len();
            "Diagram parsed successfully",
        );
        trace!(diagram:?; "Parsed diagram");

        Ok(diagram)
    }

    /// Render `diagram` onto `surface`, replacing anything already on it.
    ///
    /// # Errors
    ///
    /// Returns `ArchgramError` if the configuration is invalid, a color key
    /// cannot be resolved, or the surface rejects a call.
    pub fn render<S>(
        &self,
        diagram: &Diagram,
        surface: &mut S,
    ) -> Result<RenderReport, ArchgramError>
    where
        S: DrawingSurface + ?Sized,
    {
        let settings = RenderSettings::from_config(&self.config)?;
        DiagramRenderer::new(surface, diagram, settings).render_full_diagram()
    }

    /// Render `diagram` to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns `ArchgramError` for the same reasons as [`Self::render`].
    pub fn render_svg(&self, diagram: &Diagram) -> Result<String, ArchgramError> {
        let mut surface = SvgSurface::new();
        let report = self.render(diagram, &mut surface)?;
        info!(
            lines = report.lines_drawn(),
            skipped = report.skipped().len();
            "SVG rendered successfully"
        );
        Ok(surface.to_svg_string())
    }

    /// Render `diagram` to PNG bytes at `scale` pixels per unit.
    ///
    /// # Errors
    ///
    /// Returns `ArchgramError` for the same reasons as [`Self::render_svg`],
    /// or [`ArchgramError::Export`] if rasterization fails.
    pub fn render_png(&self, diagram: &Diagram, scale: f32) -> Result<Vec<u8>, ArchgramError> {
        let svg = self.render_svg(diagram)?;
        export::png::rasterize(&svg, scale)
    }
}

/// Converts serde_json's 1-based line and column into a one-byte span.
fn json_error_span(source: &str, line: usize, column: usize) -> Option<Range<usize>> {
    if line == 0 {
        return None;
    }
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    let offset = (line_start + column.saturating_sub(1)).min(source.len());
    let end = (offset + 1).min(source.len());
    Some(offset..end)
}
