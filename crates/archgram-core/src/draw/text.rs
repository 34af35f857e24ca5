//! Text style definitions for layer titles and component labels.
//!
//! Labels in archgram live inside fixed-size boxes, so a [`TextDefinition`]
//! only needs to describe the font, the fill and how the text is aligned in
//! the box it is given. No measuring or wrapping happens here.

use svg::node::element as svg_element;

use crate::{
    color::Color,
    geometry::{Bounds, Point},
};

/// CSS-style numeric font weight (100..=900).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontWeight(u16);

impl FontWeight {
    pub const REGULAR: Self = Self(400);
    pub const MEDIUM: Self = Self(500);
    pub const SEMI_BOLD: Self = Self(600);
    pub const BOLD: Self = Self(700);

    /// Creates a weight, snapping to the nearest hundred within 100..=900.
    pub fn new(weight: u16) -> Self {
        let snapped = ((weight.clamp(100, 900) + 50) / 100) * 100;
        Self(snapped.min(900))
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::REGULAR
    }
}

/// Horizontal alignment of text within its box.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    #[default]
    Center,
    End,
}

impl TextAlign {
    fn to_svg_anchor(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "middle",
            Self::End => "end",
        }
    }
}

/// Defines the visual style for text elements.
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"Inter"` |
/// | Font size | `14` |
/// | Font weight | `400` |
/// | Color | black |
/// | Alignment | centered, vertically centered |
///
/// # Examples
///
/// ```
/// # use archgram_core::draw::{FontWeight, TextDefinition};
/// # use archgram_core::color::Color;
/// let mut style = TextDefinition::new();
/// style.set_font_size(16);
/// style.set_font_weight(FontWeight::SEMI_BOLD);
/// style.set_color(Color::from_rgba(0.0, 0.0, 0.0, 0.8));
/// assert_eq!(style.font_size(), 16);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_family: String,
    font_size: u16,
    font_weight: FontWeight,
    color: Color,
    align: TextAlign,
}

impl TextDefinition {
    /// Creates a new text definition with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    pub fn set_font_weight(&mut self, weight: FontWeight) {
        self.font_weight = weight;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_align(&mut self, align: TextAlign) {
        self.align = align;
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn font_weight(&self) -> FontWeight {
        self.font_weight
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn align(&self) -> TextAlign {
        self.align
    }

    /// Point at which the text is anchored inside `bounds`: the vertical
    /// center, and the left edge, center or right edge depending on alignment.
    pub fn anchor_in(&self, bounds: Bounds) -> Point {
        let y = bounds.center().y();
        let x = match self.align {
            TextAlign::Start => bounds.min_x(),
            TextAlign::Center => bounds.center().x(),
            TextAlign::End => bounds.max_x(),
        };
        Point::new(x, y)
    }

    /// Renders `content` as an SVG `<text>` element laid out in `bounds`.
    pub fn render_to_svg(&self, content: &str, bounds: Bounds) -> svg_element::Text {
        let anchor = self.anchor_in(bounds);
        svg_element::Text::new(content)
            .set("x", anchor.x())
            .set("y", anchor.y())
            .set("text-anchor", self.align.to_svg_anchor())
            .set("dominant-baseline", "middle")
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("font-weight", self.font_weight.value())
            .set("fill", self.color.to_hex())
            .set("fill-opacity", self.color.alpha())
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: String::from("Inter"),
            font_size: 14,
            font_weight: FontWeight::default(),
            color: Color::default(),
            align: TextAlign::default(),
        }
    }
}
