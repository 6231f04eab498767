use std::path::PathBuf;

use thiserror::Error;

/// Top-level error returned by the pipeline and the intake helpers.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Intake(#[from] IntakeError),
}

impl Error {
    /// The input was not a well-formed document.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    /// The document parsed but could not be rasterized.
    pub fn is_render(&self) -> bool {
        matches!(self, Error::Render(_))
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("Invalid path data: {0}")]
    InvalidPath(String),

    #[error("Invalid transform: {0}")]
    InvalidTransform(String),
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ParseError::InvalidSvg(format!("Invalid attribute: {}", err))
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid canvas size: {width}x{height}")]
    InvalidSize { width: f64, height: f64 },

    #[error("Unresolved paint reference: {0}")]
    UnresolvedPaint(String),

    #[error("Could not build render tree: {0}")]
    Tree(#[from] resvg::usvg::Error),

    #[error("Bitmap encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("You must provide a SVG file: {} does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("File extension must be .svg: {}", .0.display())]
    BadExtension(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
