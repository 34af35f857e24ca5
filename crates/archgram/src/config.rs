//! Configuration types for archgram diagram rendering.
//!
//! This module provides configuration structures that control how diagrams
//! are laid out, styled and connected. All types implement
//! [`serde::Deserialize`] and every field has a default, so a configuration
//! file only needs to name what it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Box geometry and spacing of the layout engine.
//! - [`StyleConfig`] - Colors, font family and the unknown color key policy.
//! - [`ConnectionConfig`] - Routing, anchors and stroke of connector lines.
//!
//! # Example
//!
//! ```
//! # use archgram::config::AppConfig;
//! let config: AppConfig = toml::from_str(r#"
//!     [layout]
//!     box_width = 240
//!
//!     [connection]
//!     routing = "curved"
//! "#).unwrap();
//!
//! assert_eq!(config.layout().box_width, 240.0);
//! assert_eq!(config.layout().box_height, 80.0);
//! ```

use serde::Deserialize;

use archgram_core::{
    color::Color,
    draw::{StrokeCap, StrokeDefinition, StrokeStyle},
    geometry::Side,
};

use crate::{connection::Routing, style::UnknownColorKeyPolicy};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Connection configuration section.
    #[serde(default)]
    connection: ConnectionConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, style: StyleConfig, connection: ConnectionConfig) -> Self {
        Self {
            layout,
            style,
            connection,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the connection configuration.
    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }
}

/// Geometry used by the layout engine, in pixels.
///
/// A layer container is `box_width + container_margin` wide and
/// `count * (box_height + spacing) + header_height` tall. Component `i` sits
/// at `(inset_x, header_offset + i * (box_height + spacing))` inside it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub box_width: f32,
    pub box_height: f32,
    pub corner_radius: f32,
    pub spacing: f32,
    pub container_margin: f32,
    pub header_height: f32,
    pub header_offset: f32,
    pub inset_x: f32,
    pub title_offset_x: f32,
    pub title_offset_y: f32,
    pub title_height: f32,
    pub label_inset: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1920.0,
            canvas_height: 1080.0,
            box_width: 200.0,
            box_height: 80.0,
            corner_radius: 12.0,
            spacing: 20.0,
            container_margin: 40.0,
            header_height: 60.0,
            header_offset: 50.0,
            inset_x: 20.0,
            title_offset_x: 20.0,
            title_offset_y: 20.0,
            title_height: 30.0,
            label_inset: 10.0,
        }
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Color fields are CSS color strings; fields that are not set fall back to
/// the built-in palette.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Fill of the main frame behind the whole diagram.
    background_color: Option<String>,

    /// Fill of the layer containers.
    container_color: Option<String>,

    /// Font family for titles and labels.
    font_family: Option<String>,

    /// What to do when a layer names a color key outside the palette.
    unknown_color_key: UnknownColorKeyPolicy,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        parse_optional_color(self.background_color.as_deref())
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the parsed container [`Color`], or `None` if no color is configured.
    pub fn container_color(&self) -> Result<Option<Color>, String> {
        parse_optional_color(self.container_color.as_deref())
            .map_err(|err| format!("Invalid container color in config: {err}"))
    }

    /// Returns the configured font family, if any.
    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }

    pub fn unknown_color_key(&self) -> UnknownColorKeyPolicy {
        self.unknown_color_key
    }

    /// Sets the unknown color key policy (builder style).
    pub fn with_unknown_color_key(mut self, policy: UnknownColorKeyPolicy) -> Self {
        self.unknown_color_key = policy;
        self
    }
}

/// Connector line configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// How the line travels between its endpoints.
    routing: Routing,

    /// Where the line leaves the source component.
    source_anchor: Side,

    /// Where the line enters the target component.
    target_anchor: Side,

    /// Stroke color as a CSS color string.
    color: Option<String>,

    /// Stroke width in pixels.
    width: f32,

    /// Dash style: `solid`, `dashed`, `dotted` or a dasharray.
    style: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            routing: Routing::default(),
            source_anchor: Side::Right,
            target_anchor: Side::Left,
            color: None,
            width: 2.0,
            style: None,
        }
    }
}

impl ConnectionConfig {
    pub fn routing(&self) -> Routing {
        self.routing
    }

    pub fn source_anchor(&self) -> Side {
        self.source_anchor
    }

    pub fn target_anchor(&self) -> Side {
        self.target_anchor
    }

    /// Sets the routing (builder style).
    pub fn with_routing(mut self, routing: Routing) -> Self {
        self.routing = routing;
        self
    }

    /// Builds the connector stroke: rounded caps, translucent black unless
    /// a color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color or dash style is invalid.
    pub fn stroke(&self) -> Result<StrokeDefinition, String> {
        let color = parse_optional_color(self.color.as_deref())
            .map_err(|err| format!("Invalid connection color in config: {err}"))?
            .unwrap_or_else(|| Color::from_rgba(0.0, 0.0, 0.0, 0.6));

        let mut stroke = StrokeDefinition::new(color, self.width);
        stroke.set_cap(StrokeCap::Round);
        if let Some(style) = &self.style {
            stroke.set_style(style.parse::<StrokeStyle>()?);
        }

        Ok(stroke)
    }
}

fn parse_optional_color(value: Option<&str>) -> Result<Option<Color>, String> {
    value.map(Color::new).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.layout().box_width, 200.0);
        assert_eq!(config.layout().header_offset, 50.0);
        assert_eq!(config.style().background_color(), Ok(None));
        assert_eq!(config.style().unknown_color_key(), UnknownColorKeyPolicy::Fallback);
        assert_eq!(config.connection().routing(), Routing::Straight);
        assert_eq!(config.connection().source_anchor(), Side::Right);
        assert_eq!(config.connection().target_anchor(), Side::Left);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.layout(), &LayoutConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [style]
            background_color = "white"
            unknown_color_key = "error"

            [connection]
            routing = "orthogonal"
            source_anchor = "bottom"
            target_anchor = "top"
            width = 3
            style = "dashed"
            "#,
        )
        .unwrap();

        let background = config.style().background_color().unwrap().unwrap();
        assert_eq!(background.to_hex(), "#ffffff");
        assert_eq!(config.style().unknown_color_key(), UnknownColorKeyPolicy::Error);
        assert_eq!(config.connection().routing(), Routing::Orthogonal);
        assert_eq!(config.connection().source_anchor(), Side::Bottom);

        let stroke = config.connection().stroke().unwrap();
        assert_eq!(stroke.width(), 3.0);
        assert_eq!(*stroke.style(), StrokeStyle::Dashed);
    }

    #[test]
    fn test_default_connection_stroke() {
        let stroke = ConnectionConfig::default().stroke().unwrap();

        assert_eq!(stroke.width(), 2.0);
        assert_eq!(stroke.cap(), StrokeCap::Round);
        assert_eq!(stroke.color().to_hex(), "#000000");
        assert!((stroke.color().alpha() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_colors_are_reported() {
        let config: AppConfig = toml::from_str(
            r#"
            [style]
            container_color = "not-a-color"

            [connection]
            color = "also-not-a-color"
            "#,
        )
        .unwrap();

        assert!(
            config
                .style()
                .container_color()
                .unwrap_err()
                .contains("Invalid container color")
        );
        assert!(
            config
                .connection()
                .stroke()
                .unwrap_err()
                .contains("Invalid connection color")
        );
    }

    #[test]
    fn test_unknown_routing_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str(
            r#"
            [connection]
            routing = "zigzag"
            "#,
        );
        assert!(result.is_err());
    }
}
