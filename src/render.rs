//! Rasterization onto an opaque white background.

use std::collections::HashSet;

use resvg::{tiny_skia, usvg};

use crate::ast::Document;
use crate::error::RenderError;
use crate::parse::parse_view_box;
use crate::serialize::serialize;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Widest bitmap we produce. Wider documents are scaled down to it.
pub const MAX_WIDTH: f64 = 1024.0;

/// Renders documents with a fixed set of usvg options.
pub struct Rasterizer {
    options: usvg::Options<'static>,
}

impl Default for Rasterizer {
    /// No font database: `<text>` is not drawn.
    fn default() -> Self {
        Self {
            options: usvg::Options::default(),
        }
    }
}

impl Rasterizer {
    /// Load the system fonts once so text can be drawn.
    pub fn with_system_fonts() -> Self {
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        log::debug!("loaded {} font faces", options.fontdb.len());
        Self { options }
    }

    /// Render the document, capping its width to [`MAX_WIDTH`], and
    /// composite it over opaque white.
    pub fn render(&self, mut doc: Document) -> Result<RenderedImage, RenderError> {
        if fit_to_max_width(&mut doc, MAX_WIDTH) {
            log::debug!("document scaled down to {}x{}", doc.width, doc.height);
        }

        check_paint_references(&doc)?;
        let (width, height) = canvas_size(doc.width, doc.height)?;

        let mut buf = ryu::Buffer::new();
        doc.root.set_attr("width", buf.format(doc.width));
        doc.root.set_attr("height", buf.format(doc.height));
        // usvg only accepts roots in the SVG namespace
        if doc.root.name.prefix.is_none() && doc.root.get_attr("xmlns").is_none() {
            doc.root.set_attr("xmlns", SVG_NS);
        }

        let tree = usvg::Tree::from_str(&serialize(&doc), &self.options)?;

        let invalid = || RenderError::InvalidSize {
            width: doc.width,
            height: doc.height,
        };
        let mut layer = tiny_skia::Pixmap::new(width, height).ok_or_else(invalid)?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut layer.as_mut());

        let mut canvas = tiny_skia::Pixmap::new(width, height).ok_or_else(invalid)?;
        canvas.fill(tiny_skia::Color::WHITE);
        canvas.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &tiny_skia::PixmapPaint::default(),
            tiny_skia::Transform::identity(),
            None,
        );

        log::debug!("rendered {}x{} canvas", width, height);

        let rgb = canvas
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue()]
            })
            .collect();

        Ok(RenderedImage { width, height, rgb })
    }
}

/// An opaque RGB raster.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl RenderedImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB of the pixel at (x, y), `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.rgb[i], self.rgb[i + 1], self.rgb[i + 2]])
    }

    /// Row-major RGB bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.rgb
    }

    /// Encode as an uncompressed 24-bit BMP.
    pub fn to_bmp(&self) -> Result<Vec<u8>, RenderError> {
        let mut out = Vec::new();
        image::codecs::bmp::BmpEncoder::new(&mut out).encode(
            &self.rgb,
            self.width,
            self.height,
            image::ExtendedColorType::Rgb8,
        )?;
        Ok(out)
    }
}

/// Scale the declared size down so the width is at most `max_width`,
/// keeping the aspect ratio. A `viewBox` matching the old size is added when
/// missing so the content scales with the canvas. Returns whether anything
/// changed.
pub fn fit_to_max_width(doc: &mut Document, max_width: f64) -> bool {
    if doc.width <= max_width {
        return false;
    }

    if doc.root.get_attr("viewBox").and_then(parse_view_box).is_none() {
        let mut buf = ryu::Buffer::new();
        let w = buf.format(doc.width).to_string();
        let h = buf.format(doc.height).to_string();
        doc.root.set_attr("viewBox", format!("0 0 {} {}", w, h));
    }

    let old_width = doc.width;
    doc.width = max_width;
    doc.height = doc.height * max_width / old_width;
    true
}

fn canvas_size(width: f64, height: f64) -> Result<(u32, u32), RenderError> {
    let fits = |v: f64| v.is_finite() && v.ceil() >= 1.0 && v.ceil() <= f64::from(u32::MAX);
    if !fits(width) || !fits(height) {
        return Err(RenderError::InvalidSize { width, height });
    }
    Ok((width.ceil() as u32, height.ceil() as u32))
}

/// Every `url(#id)` paint without a fallback must point at an element that
/// exists in the document.
fn check_paint_references(doc: &Document) -> Result<(), RenderError> {
    let mut ids = HashSet::new();
    doc.for_each_element(|e| {
        if let Some(id) = e.get_attr("id") {
            ids.insert(id.to_string());
        }
    });

    let mut unresolved = None;
    doc.for_each_element(|e| {
        for paint in e.paints().into_iter().flatten() {
            if let Some((id, false)) = paint.url_reference()
                && !ids.contains(id)
                && unresolved.is_none()
            {
                unresolved = Some(paint.to_string());
            }
        }
    });

    match unresolved {
        Some(paint) => Err(RenderError::UnresolvedPaint(paint)),
        None => Ok(()),
    }
}
