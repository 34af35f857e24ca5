//! Drop shadows.

use svg::{Node, node::element as svg_element};

use crate::{color::Color, geometry::Point};

/// A soft drop shadow cast by a node.
///
/// `radius` is the blur radius as host drawing tools express it; SVG's
/// Gaussian blur takes a standard deviation of half that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropShadow {
    color: Color,
    offset: Point,
    radius: f32,
}

impl DropShadow {
    pub fn new(color: Color, offset: Point, radius: f32) -> Self {
        Self {
            color,
            offset,
            radius: radius.max(0.0),
        }
    }

    /// The subtle shadow given to every styled box: black at 10% opacity,
    /// offset 2px down, blurred over 4px.
    pub fn subtle() -> Self {
        Self::new(
            Color::from_rgba(0.0, 0.0, 0.0, 0.1),
            Point::new(0.0, 2.0),
            4.0,
        )
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Identifier for the SVG filter implementing this shadow.
    ///
    /// Equal shadows share an id, so a document needs one filter per distinct
    /// shadow rather than one per node.
    pub fn filter_id(&self) -> String {
        format!(
            "shadow-{}-{}-{}-{}",
            self.color.to_id_safe_string(),
            format_id_number(self.offset.x()),
            format_id_number(self.offset.y()),
            format_id_number(self.radius)
        )
    }

    /// Builds the `<filter>` definition for this shadow.
    pub fn to_svg_filter(&self) -> svg_element::Filter {
        let mut drop_shadow = svg_element::Element::new("feDropShadow");
        drop_shadow.assign("dx", self.offset.x());
        drop_shadow.assign("dy", self.offset.y());
        drop_shadow.assign("stdDeviation", self.radius / 2.0);
        drop_shadow.assign("flood-color", self.color.to_hex());
        drop_shadow.assign("flood-opacity", self.color.alpha());

        svg_element::Filter::new()
            .set("id", self.filter_id())
            .set("x", "-20%")
            .set("y", "-20%")
            .set("width", "140%")
            .set("height", "140%")
            .add(drop_shadow)
    }
}

fn format_id_number(value: f32) -> String {
    format!("{value}").replace(['.', '-'], "_")
}
