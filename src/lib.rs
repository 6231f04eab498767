//! halftone - fade, shrink and rasterize SVG documents
//!
//! halftone reads an SVG document, rewrites every solid paint to half
//! opacity, halves every path in place, optionally drops paths below a size
//! threshold, and renders the result onto white as a BMP.

mod ast;
mod color;
mod error;
mod geometry;
pub mod intake;
mod parse;
mod passes;
mod path;
mod render;
mod serialize;
mod transform;

pub use ast::*;
pub use color::*;
pub use error::*;
pub use geometry::*;
pub use parse::*;
pub use passes::*;
pub use path::*;
pub use render::*;
pub use serialize::*;
pub use transform::*;

/// Alpha given to every solid paint: half opacity.
pub const ALPHA: u8 = 128;

/// Scale appended to every path: half size.
pub const SCALE_FACTOR: f32 = 0.5;

/// What the tree passes did to a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Solid paints whose alpha was rewritten
    pub paints_faded: usize,
    /// Paths that received the scale transform
    pub paths_scaled: usize,
    /// Paths removed for being too small
    pub paths_pruned: usize,
}

/// Run the fixed sequence of tree passes: alpha, scale, then pruning when a
/// threshold is given.
pub fn apply_passes(doc: &mut Document, min_diagonal: Option<f64>) -> PassReport {
    let paints_faded = apply_alpha(doc, ALPHA);
    let paths_scaled = inject_scale(doc, SCALE_FACTOR);
    let paths_pruned = min_diagonal.map_or(0, |min| prune_small_paths(doc, min));

    let report = PassReport {
        paints_faded,
        paths_scaled,
        paths_pruned,
    };
    log::debug!("{:?}", report);
    report
}

/// Process raw SVG bytes into BMP bytes with the default rasterizer.
pub fn process(svg: &[u8], min_diagonal: Option<f64>) -> Result<Vec<u8>, Error> {
    process_with(&Rasterizer::default(), svg, min_diagonal)
}

/// Process raw SVG bytes into BMP bytes, reusing a rasterizer.
pub fn process_with(
    rasterizer: &Rasterizer,
    svg: &[u8],
    min_diagonal: Option<f64>,
) -> Result<Vec<u8>, Error> {
    let (image, _) = process_to_image(rasterizer, svg, min_diagonal)?;
    Ok(image.to_bmp()?)
}

/// Parse, transform and render, returning the raster and the pass report.
pub fn process_to_image(
    rasterizer: &Rasterizer,
    svg: &[u8],
    min_diagonal: Option<f64>,
) -> Result<(RenderedImage, PassReport), Error> {
    let mut doc = parse_svg_bytes(svg)?;
    let report = apply_passes(&mut doc, min_diagonal);
    let image = rasterizer.render(doc)?;
    Ok((image, report))
}
