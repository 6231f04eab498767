//! SVG parsing from XML.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::ast::*;
use crate::color::parse_paint;
use crate::error::ParseError;
use crate::path::parse_path;
use crate::transform::parse_transform_list;

/// Size used when neither `width`/`height` nor `viewBox` say anything.
const DEFAULT_SIZE: f64 = 100.0;

/// Parse raw bytes into a Document. The input must be UTF-8.
pub fn parse_svg_bytes(bytes: &[u8]) -> Result<Document, ParseError> {
    parse_svg(std::str::from_utf8(bytes)?)
}

/// Parse an SVG string into a Document.
pub fn parse_svg(svg: &str) -> Result<Document, ParseError> {
    let mut reader = Reader::from_str(svg);

    let root = loop {
        match reader.read_event()? {
            Event::Start(start) => break parse_element(&mut reader, &start)?,
            Event::Empty(start) => break parse_element_start(&start)?,
            Event::Eof => return Err(ParseError::InvalidSvg("No root element found".into())),
            // Declaration, doctype, comments and whitespace before the root
            _ => {}
        }
    };

    if !root.is("svg") {
        return Err(ParseError::InvalidSvg(format!(
            "Root element is <{}>, expected <svg>",
            root.name.full_name()
        )));
    }

    let (width, height) = declared_size(&root);
    log::trace!("parsed document {}x{}", width, height);

    Ok(Document {
        width,
        height,
        root,
    })
}

fn parse_element(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Element, ParseError> {
    let mut element = parse_element_start(start)?;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let child = parse_element(reader, &start)?;
                element.children.push(Node::Element(child));
            }
            Event::Empty(start) => {
                let child = parse_element_start(&start)?;
                element.children.push(Node::Element(child));
            }
            Event::End(_) => break,
            Event::Text(text) => {
                let text = text.unescape()?;
                // Whitespace only matters between siblings
                if !text.trim().is_empty() || !element.children.is_empty() {
                    element.children.push(Node::Text(text.into_owned()));
                }
            }
            Event::Comment(comment) => {
                element
                    .children
                    .push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
            }
            Event::CData(cdata) => {
                element
                    .children
                    .push(Node::CData(String::from_utf8_lossy(&cdata).into_owned()));
            }
            Event::PI(pi) => {
                let content = String::from_utf8_lossy(&pi).into_owned();
                let (target, content) = match content.split_once(char::is_whitespace) {
                    Some((t, r)) => (t.to_string(), Some(r.to_string())),
                    None => (content, None),
                };
                element
                    .children
                    .push(Node::ProcessingInstruction { target, content });
            }
            Event::Eof => {
                return Err(ParseError::InvalidSvg("Unexpected end of file".into()));
            }
            _ => {}
        }
    }

    Ok(element)
}

fn parse_element_start(start: &BytesStart) -> Result<Element, ParseError> {
    let name_bytes = start.name();
    let name = QName::parse(std::str::from_utf8(name_bytes.as_ref())?);

    let mut element = Element::new(name.local.clone());
    element.name = name;

    let mut style = None;
    for attr in start.attributes() {
        let attr = attr?;
        let key = QName::parse(std::str::from_utf8(attr.key.as_ref())?);
        let value = attr.unescape_value()?.into_owned();

        match (key.prefix.as_deref(), key.local.as_str()) {
            (None, "fill") => element.fill = Some(parse_paint(&value)),
            (None, "stroke") => element.stroke = Some(parse_paint(&value)),
            (None, "color") => element.color = Some(parse_paint(&value)),
            (None, "transform") => element.transforms = parse_transform_list(&value)?,
            (None, "style") => style = Some(value),
            _ => element.attributes.push(Attribute { name: key, value }),
        }
    }

    // Inline style beats presentation attributes
    if let Some(style) = style {
        let rest = lift_style_paints(&mut element, &style);
        if !rest.is_empty() {
            element.set_attr("style", rest);
        }
    }

    if element.is_path() {
        let path = parse_path(element.get_attr("d").unwrap_or_default())?;
        element.kind = ElementKind::Path {
            bounds: path.bounds().unwrap_or_default(),
        };
    }

    Ok(element)
}

/// Move `fill`, `stroke` and `color` declarations into the typed fields and
/// return the remaining declarations.
fn lift_style_paints(element: &mut Element, style: &str) -> String {
    let mut rest = Vec::new();

    for decl in style.split(';') {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        let Some((prop, value)) = decl.split_once(':') else {
            rest.push(decl);
            continue;
        };
        let value = value.trim();
        match prop.trim() {
            "fill" => element.fill = Some(parse_paint(value)),
            "stroke" => element.stroke = Some(parse_paint(value)),
            "color" => element.color = Some(parse_paint(value)),
            _ => rest.push(decl),
        }
    }

    rest.join(";")
}

fn declared_size(root: &Element) -> (f64, f64) {
    let view_box = root.get_attr("viewBox").and_then(parse_view_box);
    let width = root
        .get_attr("width")
        .and_then(parse_length)
        .or(view_box.map(|[_, _, w, _]| w))
        .unwrap_or(DEFAULT_SIZE);
    let height = root
        .get_attr("height")
        .and_then(parse_length)
        .or(view_box.map(|[_, _, _, h]| h))
        .unwrap_or(DEFAULT_SIZE);
    (width, height)
}

const UNITS: &[(&str, f64)] = &[
    ("px", 1.0),
    ("in", 96.0),
    ("cm", 96.0 / 2.54),
    ("mm", 96.0 / 25.4),
    ("pt", 4.0 / 3.0),
    ("pc", 16.0),
];

/// Parse an absolute length into px (96 dpi). Relative units give `None`.
pub(crate) fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let (number, scale) = UNITS
        .iter()
        .find_map(|(unit, scale)| value.strip_suffix(unit).map(|n| (n, *scale)))
        .unwrap_or((value, 1.0));
    let px = number.trim().parse::<f64>().ok()? * scale;
    (px.is_finite() && px >= 0.0).then_some(px)
}

pub(crate) fn parse_view_box(value: &str) -> Option<[f64; 4]> {
    let nums: Vec<f64> = value
        .split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|p| !p.is_empty())
        .map(|p| p.parse().ok())
        .collect::<Option<_>>()?;
    match nums.as_slice() {
        &[x, y, w, h] if w > 0.0 && h > 0.0 => Some([x, y, w, h]),
        _ => None,
    }
}
