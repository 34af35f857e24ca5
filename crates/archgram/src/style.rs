//! Styling resolver: maps a layer's color key to the treatment of its boxes.
//!
//! Every component box in a layer shares one [`BoxStyle`], chosen by the
//! layer's symbolic color key. The mapping is a pure function of the key; the
//! only configurable part is what happens to keys outside the palette.

use std::{fmt, str::FromStr};

use log::warn;
use serde::Deserialize;

use archgram_core::{
    color::Color,
    draw::{BoxStyle, DropShadow, Fill, Gradient, StrokeDefinition},
};

use crate::{
    config::StyleConfig,
    error::ArchgramError,
    surface::{DrawingSurface, NodeHandle, SurfaceError},
};

/// The closed palette of layer styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorKey {
    Client,
    Api,
    Product,
    Mixer,
    Ml,
    Data,
}

impl ColorKey {
    pub const ALL: [Self; 6] = [
        Self::Client,
        Self::Api,
        Self::Product,
        Self::Mixer,
        Self::Ml,
        Self::Data,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Api => "api",
            Self::Product => "product",
            Self::Mixer => "mixer",
            Self::Ml => "ml",
            Self::Data => "data",
        }
    }

    /// The fill, stroke and shadow for boxes of this key.
    ///
    /// | Key | Fill | Stroke |
    /// |-----|------|--------|
    /// | `client` | light blue | translucent blue, 1px |
    /// | `api` | white | black at 80%, 2px |
    /// | `product` | blue to purple gradient | none |
    /// | `mixer` | purple to blue gradient | none |
    /// | `ml` | pink to red gradient | none |
    /// | `data` | light gray | black at 10%, 1px |
    ///
    /// Every key gets the subtle drop shadow.
    ///
    /// # Examples
    ///
    /// ```
    /// # use archgram::style::ColorKey;
    /// let style = ColorKey::Product.style();
    ///
    /// let gradient = style.fill().and_then(|fill| fill.gradient()).unwrap();
    /// assert_eq!(gradient.stops().len(), 2);
    /// assert!(style.stroke().is_none());
    /// ```
    pub fn style(self) -> BoxStyle {
        let style = BoxStyle::new().with_shadow(DropShadow::subtle());

        match self {
            Self::Client => style
                .with_fill(Fill::Solid(Color::from_rgb(0.89, 0.95, 0.99)))
                .with_stroke(StrokeDefinition::solid(
                    Color::from_rgba(0.33, 0.67, 0.93, 0.3),
                    1.0,
                )),
            Self::Api => style
                .with_fill(Fill::Solid(Color::from_rgb(1.0, 1.0, 1.0)))
                .with_stroke(StrokeDefinition::solid(
                    Color::from_rgba(0.0, 0.0, 0.0, 0.8),
                    2.0,
                )),
            Self::Product => style.with_fill(Fill::LinearGradient(Gradient::diagonal(
                product_blue(),
                product_purple(),
            ))),
            Self::Mixer => style.with_fill(Fill::LinearGradient(Gradient::diagonal(
                product_purple(),
                product_blue(),
            ))),
            Self::Ml => style.with_fill(Fill::LinearGradient(Gradient::diagonal(
                Color::from_rgb(0.94, 0.58, 0.98),
                Color::from_rgb(0.96, 0.34, 0.42),
            ))),
            Self::Data => style
                .with_fill(Fill::Solid(Color::from_rgb(0.96, 0.96, 0.96)))
                .with_stroke(StrokeDefinition::solid(
                    Color::from_rgba(0.0, 0.0, 0.0, 0.1),
                    1.0,
                )),
        }
    }
}

fn product_blue() -> Color {
    Color::from_rgb(0.4, 0.49, 0.92)
}

fn product_purple() -> Color {
    Color::from_rgb(0.46, 0.29, 0.64)
}

impl FromStr for ColorKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| {
                format!(
                    "unknown color key `{s}`, valid values: client, api, product, mixer, ml, data"
                )
            })
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to do when a layer names a color key outside the palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownColorKeyPolicy {
    /// Log a warning and draw the layer with the neutral fallback style.
    #[default]
    Fallback,
    /// Abort the render.
    Error,
}

/// The neutral style used for unknown color keys: the container gray with a
/// faint border.
pub fn fallback_style() -> BoxStyle {
    BoxStyle::new()
        .with_fill(Fill::Solid(Color::from_rgb(0.98, 0.98, 0.98)))
        .with_stroke(StrokeDefinition::solid(
            Color::from_rgba(0.0, 0.0, 0.0, 0.1),
            1.0,
        ))
        .with_shadow(DropShadow::subtle())
}

/// Resolves color keys to box styles under an [`UnknownColorKeyPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleResolver {
    policy: UnknownColorKeyPolicy,
}

impl StyleResolver {
    pub fn new(policy: UnknownColorKeyPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &StyleConfig) -> Self {
        Self::new(config.unknown_color_key())
    }

    /// Returns the style for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchgramError::Style`] for an unknown key when the policy is
    /// [`UnknownColorKeyPolicy::Error`].
    pub fn resolve(&self, key: &str) -> Result<BoxStyle, ArchgramError> {
        match (key.parse::<ColorKey>(), self.policy) {
            (Ok(color_key), _) => Ok(color_key.style()),
            (Err(_), UnknownColorKeyPolicy::Fallback) => {
                warn!(color_key = key; "Unknown color key, using fallback style");
                Ok(fallback_style())
            }
            (Err(err), UnknownColorKeyPolicy::Error) => Err(ArchgramError::Style(err)),
        }
    }
}

/// Applies every part of `style` to `node`.
pub fn apply_box_style<S>(
    surface: &mut S,
    node: NodeHandle,
    style: &BoxStyle,
) -> Result<(), SurfaceError>
where
    S: DrawingSurface + ?Sized,
{
    if let Some(fill) = style.fill() {
        surface.set_fill(node, fill)?;
    }
    if let Some(stroke) = style.stroke() {
        surface.set_stroke(node, stroke)?;
    }
    if let Some(shadow) = style.shadow() {
        surface.set_shadow(node, shadow)?;
    }
    Ok(())
}
