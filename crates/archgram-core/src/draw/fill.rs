//! Solid and gradient fills.

use svg::node::element as svg_element;

use crate::color::Color;

/// A color stop within a [`Gradient`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    offset: f32,
    color: Color,
}

impl GradientStop {
    /// Creates a stop at `offset` (0.0 = start of the gradient, 1.0 = end).
    pub fn new(offset: f32, color: Color) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// A linear gradient running along an angle, CSS style.
///
/// An angle of 0 degrees points up and angles grow clockwise, so 90 runs
/// left to right and 135 runs diagonally from the top-left corner to the
/// bottom-right corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    angle_degrees: f32,
    stops: Vec<GradientStop>,
}

impl Gradient {
    pub fn new(angle_degrees: f32, stops: Vec<GradientStop>) -> Self {
        Self {
            angle_degrees,
            stops,
        }
    }

    /// A diagonal (135 degree) gradient between two colors.
    ///
    /// # Examples
    ///
    /// ```
    /// use archgram_core::{color::Color, draw::Gradient};
    ///
    /// let gradient = Gradient::diagonal(Color::new("blue").unwrap(), Color::new("purple").unwrap());
    /// assert_eq!(gradient.stops().len(), 2);
    /// assert_eq!(gradient.angle_degrees(), 135.0);
    /// ```
    pub fn diagonal(start: Color, end: Color) -> Self {
        Self::new(
            135.0,
            vec![GradientStop::new(0.0, start), GradientStop::new(1.0, end)],
        )
    }

    pub fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Returns the `(x1, y1, x2, y2)` vector of this gradient in the
    /// `objectBoundingBox` unit square.
    pub fn vector(&self) -> (f32, f32, f32, f32) {
        let radians = self.angle_degrees.to_radians();
        let dx = radians.sin() / 2.0;
        let dy = -radians.cos() / 2.0;
        (0.5 - dx, 0.5 - dy, 0.5 + dx, 0.5 + dy)
    }

    /// Identifier for the SVG definition of this gradient. Equal gradients
    /// share an id.
    pub fn definition_id(&self) -> String {
        let stops: Vec<String> = self
            .stops
            .iter()
            .map(|stop| {
                format!(
                    "{}_{}",
                    stop.color().to_id_safe_string(),
                    (stop.offset() * 100.0).round()
                )
            })
            .collect();
        format!(
            "gradient-{}-{}",
            self.angle_degrees.round(),
            stops.join("-")
        )
    }

    /// Builds the `<linearGradient>` definition for this gradient.
    pub fn to_svg_definition(&self, id: &str) -> svg_element::LinearGradient {
        let (x1, y1, x2, y2) = self.vector();
        let mut element = svg_element::LinearGradient::new()
            .set("id", id)
            .set("x1", round_unit(x1))
            .set("y1", round_unit(y1))
            .set("x2", round_unit(x2))
            .set("y2", round_unit(y2));

        for stop in &self.stops {
            element = element.add(
                svg_element::Stop::new()
                    .set("offset", stop.offset())
                    .set("stop-color", stop.color().to_hex())
                    .set("stop-opacity", stop.color().alpha()),
            );
        }

        element
    }
}

// Keeps trigonometry noise such as 0.99999994 out of the markup.
fn round_unit(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

/// How the interior of a node is painted.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Color),
    LinearGradient(Gradient),
}

impl Fill {
    /// Returns the gradient of this fill, if it is one.
    pub fn gradient(&self) -> Option<&Gradient> {
        match self {
            Self::Solid(_) => None,
            Self::LinearGradient(gradient) => Some(gradient),
        }
    }
}
