//! Export of rendered diagrams to files other than SVG.
//!
//! SVG comes straight from [`SvgSurface`](crate::surface::SvgSurface);
//! everything here starts from that markup.

pub mod png;
