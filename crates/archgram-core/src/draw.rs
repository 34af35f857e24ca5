//! Visual definitions for diagram nodes.
//!
//! These types describe *how* a node looks, independent of the surface that
//! ends up drawing it:
//!
//! - [`Fill`] and [`Gradient`] for solid and linear-gradient fills
//! - [`StrokeDefinition`] for borders and connector lines
//! - [`DropShadow`] for the soft shadow under boxes
//! - [`TextDefinition`] for labels and titles
//! - [`BoxStyle`] bundling the three treatments a styled box receives
//! - [`RenderLayer`] and [`LayeredOutput`] for z-ordered SVG emission

mod fill;
mod layer;
mod shadow;
mod stroke;
mod style;
mod text;

pub use fill::{Fill, Gradient, GradientStop};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use shadow::DropShadow;
pub use stroke::{StrokeCap, StrokeDefinition, StrokeJoin, StrokeStyle};
pub use style::BoxStyle;
pub use text::{FontWeight, TextAlign, TextDefinition};
