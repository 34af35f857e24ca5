//! PNG rasterization of rendered SVG.

use log::debug;
use resvg::{tiny_skia, usvg};

use crate::error::ArchgramError;

/// Scale used when none is given, matching a 2x device pixel ratio.
pub const DEFAULT_SCALE: f32 = 2.0;

/// Rasterizes `svg` at `scale` and encodes the result as PNG.
///
/// System fonts are loaded so labels render with whatever matches the
/// requested family, falling back to the default sans-serif face.
///
/// # Errors
///
/// Returns [`ArchgramError::Export`] if the scale is not a positive finite
/// number, the markup cannot be parsed, the image would be empty, or PNG
/// encoding fails.
pub fn rasterize(svg: &str, scale: f32) -> Result<Vec<u8>, ArchgramError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ArchgramError::Export(format!(
            "scale must be a positive number, got {scale}"
        )));
    }

    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|err| ArchgramError::Export(format!("failed to parse SVG: {err}")))?;

    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;
    debug!(width = width, height = height, scale = scale; "Rasterizing SVG");

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        ArchgramError::Export(format!("cannot allocate a {width}x{height} image"))
    })?;

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    pixmap
        .encode_png()
        .map_err(|err| ArchgramError::Export(format!("failed to encode PNG: {err}")))
}
