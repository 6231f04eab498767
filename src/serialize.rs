//! SVG serialization back to XML.

use crate::ast::*;
use crate::transform::serialize_transform_list;

/// Serialize a Document to an SVG string.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    serialize_element(&mut out, &doc.root);
    out
}

fn serialize_element(out: &mut String, elem: &Element) {
    out.push('<');
    out.push_str(&elem.name.full_name());

    for attr in &elem.attributes {
        push_attr(out, &attr.name.full_name(), &attr.value);
    }

    if !elem.transforms.is_empty() {
        push_attr(out, "transform", &serialize_transform_list(&elem.transforms));
    }

    let paints = [
        ("fill", &elem.fill),
        ("stroke", &elem.stroke),
        ("color", &elem.color),
    ];
    for (name, paint) in paints {
        if let Some(paint) = paint {
            push_attr(out, name, &paint.to_string());
        }
    }

    if elem.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &elem.children {
        serialize_node(out, child);
    }
    out.push_str("</");
    out.push_str(&elem.name.full_name());
    out.push('>');
}

fn serialize_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(elem) => serialize_element(out, elem),
        Node::Text(text) => push_escaped_text(out, text),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        Node::ProcessingInstruction { target, content } => {
            out.push_str("<?");
            out.push_str(target);
            if let Some(c) = content {
                out.push(' ');
                out.push_str(c);
            }
            out.push_str("?>");
        }
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for c in value.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

fn push_escaped_text(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
