//! Color handling for archgram diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Colors can be parsed from CSS strings or built from
//! normalized RGBA components, which is how the diagram palette is declared.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{AlphaColor, DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use archgram_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Create a new sRGB `Color` from normalized components in `0.0..=1.0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use archgram_core::color::Color;
    ///
    /// let translucent_black = Color::from_rgba(0.0, 0.0, 0.0, 0.6);
    /// assert_eq!(translucent_black.to_hex(), "#000000");
    /// assert!((translucent_black.alpha() - 0.6).abs() < 1e-6);
    /// ```
    pub fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            color: DynamicColor::from_alpha_color(AlphaColor::<Srgb>::new([r, g, b, a])),
        }
    }

    /// Create a new opaque sRGB `Color` from normalized components.
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::from_rgba(r, g, b, 1.0)
    }

    /// Creates a new color with the specified alpha (transparency) value.
    ///
    /// # Examples
    ///
    /// ```
    /// use archgram_core::color::Color;
    ///
    /// let red = Color::new("red").unwrap();
    /// let semi_transparent_red = red.with_alpha(0.5);
    /// assert_eq!(semi_transparent_red.alpha(), 0.5);
    /// ```
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha (transparency) component of this color, between
    /// 0.0 (fully transparent) and 1.0 (fully opaque).
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Returns the red, green and blue components in the sRGB color space.
    pub fn rgb(&self) -> [f32; 3] {
        let srgb = self.color.to_alpha_color::<Srgb>();
        let [r, g, b, _] = srgb.components;
        [r, g, b]
    }

    /// Returns the opaque `#rrggbb` form of this color.
    ///
    /// Alpha is dropped; SVG output carries it separately as an opacity
    /// attribute so that it is not applied twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use archgram_core::color::Color;
    ///
    /// assert_eq!(Color::from_rgb(1.0, 1.0, 1.0).to_hex(), "#ffffff");
    /// assert_eq!(Color::new("red").unwrap().to_hex(), "#ff0000");
    /// ```
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.rgb().map(channel_to_u8);
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Returns a sanitized, ID-safe string representation of this color.
    ///
    /// The result contains only alphanumeric characters and underscores and
    /// is suitable as part of an SVG `id` attribute.
    pub fn to_id_safe_string(self) -> String {
        let hex = self.to_hex().replace('#', "hex");
        let alpha = (self.alpha().clamp(0.0, 1.0) * 100.0).round() as u8;
        format!("{hex}_a{alpha}")
    }
}

fn channel_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Default for Color {
    fn default() -> Self {
        Self::from_rgb(0.0, 0.0, 0.0)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_color_new() {
        let red = Color::new("#ff0000");
        assert!(red.is_ok());

        let invalid = Color::new("not-a-color");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_color_default() {
        let color = Color::default();
        assert_eq!(color.to_hex(), "#000000");
        assert_approx_eq!(f32, color.alpha(), 1.0);
    }

    #[test]
    fn test_color_from_rgba() {
        let color = Color::from_rgba(0.89, 0.95, 0.99, 1.0);
        let [r, g, b] = color.rgb();
        assert_approx_eq!(f32, r, 0.89, epsilon = 1e-6);
        assert_approx_eq!(f32, g, 0.95, epsilon = 1e-6);
        assert_approx_eq!(f32, b, 0.99, epsilon = 1e-6);
        assert_eq!(color.to_hex(), "#e3f2fc");
    }

    #[test]
    fn test_color_with_alpha() {
        let color = Color::new("red").unwrap();
        let transparent = color.with_alpha(0.5);
        assert!((transparent.alpha() - 0.5).abs() < 0.001);
        assert_eq!(transparent.to_hex(), "#ff0000");
    }

    #[test]
    fn test_to_hex_clamps_out_of_range_channels() {
        let color = Color::from_rgb(1.5, -0.2, 0.5);
        assert_eq!(color.to_hex(), "#ff0080");
    }

    #[test]
    fn test_color_to_id_safe_string() {
        let color = Color::from_rgba(0.0, 0.0, 0.0, 0.6);
        let safe_id = color.to_id_safe_string();
        assert_eq!(safe_id, "hex000000_a60");
        assert!(safe_id.chars().all(|c| c.is_alphanumeric() || c == '_'));
    }

    #[test]
    fn test_color_eq_hash() {
        use std::collections::HashSet;

        let color1 = Color::new("red").unwrap();
        let color2 = Color::new("red").unwrap();
        let color3 = Color::new("blue").unwrap();

        assert_eq!(color1, color2);
        assert_ne!(color1, color3);

        let mut set = HashSet::new();
        set.insert(color1);
        assert!(set.contains(&color2));
        assert!(!set.contains(&color3));
    }
}
