//! The combined treatment applied to a styled box.

use crate::draw::{DropShadow, Fill, StrokeDefinition};

/// Fill, stroke and shadow of a box.
///
/// Each part is optional: gradient boxes carry no stroke, and containers
/// carry no shadow.
///
/// # Examples
///
/// ```
/// use archgram_core::{color::Color, draw::{BoxStyle, DropShadow, Fill}};
///
/// let style = BoxStyle::new()
///     .with_fill(Fill::Solid(Color::from_rgb(1.0, 1.0, 1.0)))
///     .with_shadow(DropShadow::subtle());
///
/// assert!(style.fill().is_some());
/// assert!(style.stroke().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxStyle {
    fill: Option<Fill>,
    stroke: Option<StrokeDefinition>,
    shadow: Option<DropShadow>,
}

impl BoxStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_stroke(mut self, stroke: StrokeDefinition) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_shadow(mut self, shadow: DropShadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    pub fn fill(&self) -> Option<&Fill> {
        self.fill.as_ref()
    }

    pub fn stroke(&self) -> Option<&StrokeDefinition> {
        self.stroke.as_ref()
    }

    pub fn shadow(&self) -> Option<&DropShadow> {
        self.shadow.as_ref()
    }
}
