//! Paint values: `fill`, `stroke` and `color`.

use std::fmt;

/// An sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            let mut buf = ryu::Buffer::new();
            let alpha = buf.format(f64::from(self.a) / 255.0);
            write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, alpha)
        }
    }
}

/// A paint property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// The `none` keyword
    None,
    /// A solid color
    Solid(Color),
    /// Anything else (`url(#gradient)`, `currentColor`, `inherit`, ...),
    /// kept verbatim
    Other(String),
}

impl Paint {
    pub fn as_solid(&self) -> Option<Color> {
        match self {
            Paint::Solid(c) => Some(*c),
            _ => None,
        }
    }

    /// The id referenced by a `url(#id)` paint, and whether a fallback
    /// paint follows it.
    pub fn url_reference(&self) -> Option<(&str, bool)> {
        let Paint::Other(raw) = self else {
            return None;
        };
        match svgtypes::Paint::from_str(raw) {
            Ok(svgtypes::Paint::FuncIRI(id, fallback)) => Some((id, fallback.is_some())),
            _ => None,
        }
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Paint::None => f.write_str("none"),
            Paint::Solid(c) => c.fmt(f),
            Paint::Other(raw) => f.write_str(raw),
        }
    }
}

/// Parse a paint value. Never fails: unrecognized values become
/// [`Paint::Other`].
pub fn parse_paint(value: &str) -> Paint {
    let value = value.trim();
    match svgtypes::Paint::from_str(value) {
        Ok(svgtypes::Paint::None) => Paint::None,
        Ok(svgtypes::Paint::Color(color)) => Paint::Solid(convert(value, color)),
        _ => Paint::Other(value.to_string()),
    }
}

/// Parse a CSS color: hex notation, `rgb()`/`rgba()`, `hsl()`/`hsla()` or a
/// named color.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    value
        .parse::<svgtypes::Color>()
        .ok()
        .map(|color| convert(value, color))
}

fn convert(value: &str, color: svgtypes::Color) -> Color {
    // `transparent` is white with zero alpha, so fading it stays invisible
    if value.eq_ignore_ascii_case("transparent") {
        return Color::new(255, 255, 255, 0);
    }
    Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_color("#f00"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(parse_color("#0000FF"), Some(Color::rgb(0, 0, 255)));
        assert_eq!(parse_color("#ff000080"), Some(Color::new(255, 0, 0, 128)));
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("#ggg"), None);
    }

    #[test]
    fn test_parse_rgb_functions() {
        assert_eq!(parse_color("rgb(1, 2, 3)"), Some(Color::rgb(1, 2, 3)));
        assert_eq!(
            parse_color("rgba(0,0,255,0.5)"),
            Some(Color::new(0, 0, 255, 128))
        );
        assert_eq!(
            parse_color("rgb(100%, 0%, 0%)"),
            Some(Color::rgb(255, 0, 0))
        );
        assert_eq!(parse_color("rgb(1, 2)"), None);
    }

    #[test]
    fn test_parse_hsl_functions() {
        assert_eq!(parse_color("hsl(240, 100%, 50%)"), Some(Color::rgb(0, 0, 255)));
        assert_eq!(
            parse_paint("hsla(120, 100%, 25%, 0.5)"),
            Paint::Solid(Color::new(0, 128, 0, 128))
        );
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(parse_color("Red"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(parse_color("rebeccapurple"), Some(Color::rgb(102, 51, 153)));
        assert_eq!(parse_color("transparent"), Some(Color::new(255, 255, 255, 0)));
        assert_eq!(parse_color("notacolor"), None);
    }

    #[test]
    fn test_parse_paint_variants() {
        assert_eq!(parse_paint("none"), Paint::None);
        assert_eq!(parse_paint(" blue "), Paint::Solid(Color::rgb(0, 0, 255)));
        assert_eq!(
            parse_paint("url(#grad)"),
            Paint::Other("url(#grad)".into())
        );
        assert_eq!(
            parse_paint("currentColor"),
            Paint::Other("currentColor".into())
        );
    }

    #[test]
    fn test_url_reference() {
        assert_eq!(parse_paint("url(#g)").url_reference(), Some(("g", false)));
        assert_eq!(
            parse_paint("url('#g') red").url_reference(),
            Some(("g", true))
        );
        assert_eq!(parse_paint("red").url_reference(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::rgb(255, 0, 16).to_string(), "#ff0010");
        assert_eq!(
            Color::new(0, 0, 255, 128).to_string(),
            "rgba(0,0,255,0.5019607843137255)"
        );
        assert_eq!(Paint::None.to_string(), "none");
    }
}
