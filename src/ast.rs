//! SVG document tree.
//!
//! Each element owns its children exclusively. Paint and transform
//! properties are lifted out of the raw attributes into typed fields at parse
//! time; everything else stays in [`Element::attributes`] and is written
//! back unchanged by the serializer.

use crate::color::Paint;
use crate::geometry::Rect;
use crate::transform::Transform;

/// A complete SVG document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Declared width in px
    pub width: f64,
    /// Declared height in px
    pub height: f64,
    /// The root `<svg>` element
    pub root: Element,
}

/// What the passes know about an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementKind {
    /// `<path>`, with the bounding box of its geometry
    Path { bounds: Rect },
    /// `<svg>` and `<g>` containers
    Group,
    /// Every other element
    Other,
}

/// An SVG element.
#[derive(Debug, Clone)]
pub struct Element {
    /// Element name with optional prefix (e.g., "svg", "svg:rect")
    pub name: QName,
    pub kind: ElementKind,
    /// Attributes other than the typed ones below
    pub attributes: Vec<Attribute>,
    pub fill: Option<Paint>,
    pub stroke: Option<Paint>,
    pub color: Option<Paint>,
    /// Transform list, identity when empty
    pub transforms: Vec<Transform>,
    /// Child nodes
    pub children: Vec<Node>,
}

/// A qualified name (possibly with namespace prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }

    /// Parse a qualified name from a string like "prefix:local" or just "local".
    pub fn parse(s: &str) -> Self {
        match s.split_once(':') {
            Some((prefix, local)) => Self {
                prefix: Some(prefix.to_string()),
                local: local.to_string(),
            },
            None => Self::new(s),
        }
    }

    pub fn full_name(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{}:{}", p, self.local),
            None => self.local.clone(),
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// A node in the SVG tree.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
    ProcessingInstruction { target: String, content: Option<String> },
}

impl Element {
    /// A bare element; the kind is derived from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = QName::new(name);
        let kind = match name.local.as_str() {
            "path" => ElementKind::Path {
                bounds: Rect::default(),
            },
            "svg" | "g" => ElementKind::Group,
            _ => ElementKind::Other,
        };
        Self {
            name,
            kind,
            attributes: Vec::new(),
            fill: None,
            stroke: None,
            color: None,
            transforms: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn is_path(&self) -> bool {
        matches!(self.kind, ElementKind::Path { .. })
    }

    /// Bounding box of a path's geometry, before any transform.
    pub fn bounds(&self) -> Option<Rect> {
        match self.kind {
            ElementKind::Path { bounds } => Some(bounds),
            _ => None,
        }
    }

    /// Get an attribute value by local name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.local == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute value.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name.local == name) {
            attr.value = value.into();
        } else {
            self.attributes.push(Attribute {
                name: QName::new(name),
                value: value.into(),
            });
        }
    }

    /// Check if this element has a specific local name.
    pub fn is(&self, name: &str) -> bool {
        self.name.local == name
    }

    /// Mutable access to the three paint slots.
    pub fn paints_mut(&mut self) -> [&mut Option<Paint>; 3] {
        [&mut self.fill, &mut self.stroke, &mut self.color]
    }

    pub fn paints(&self) -> [&Option<Paint>; 3] {
        [&self.fill, &self.stroke, &self.color]
    }

    /// Iterate over child elements only (skip text, comments, etc.).
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }
}

impl Document {
    /// Visit every element depth-first, pre-order.
    pub fn for_each_element(&self, mut f: impl FnMut(&Element)) {
        fn visit(elem: &Element, f: &mut impl FnMut(&Element)) {
            f(elem);
            for child in elem.child_elements() {
                visit(child, f);
            }
        }
        visit(&self.root, &mut f);
    }

    /// Visit every element mutably, depth-first, pre-order.
    pub fn for_each_element_mut(&mut self, mut f: impl FnMut(&mut Element)) {
        fn visit(elem: &mut Element, f: &mut impl FnMut(&mut Element)) {
            f(elem);
            for child in elem.child_elements_mut() {
                visit(child, f);
            }
        }
        visit(&mut self.root, &mut f);
    }

    /// Remove every element below the root for which `doomed` returns true,
    /// together with its subtree. Returns the number of elements removed
    /// (subtree roots only).
    ///
    /// Each parent's children are all visited, in order, before any of them
    /// is removed; removed elements are not descended into. The root itself
    /// is never removed.
    pub fn prune_elements(&mut self, mut doomed: impl FnMut(&Element) -> bool) -> usize {
        fn visit(elem: &mut Element, doomed: &mut impl FnMut(&Element) -> bool) -> usize {
            let mut marked = Vec::new();
            let mut removed = 0;

            for (i, node) in elem.children.iter_mut().enumerate() {
                let Node::Element(child) = node else {
                    continue;
                };
                if doomed(child) {
                    marked.push(i);
                } else {
                    removed += visit(child, doomed);
                }
            }

            removed += marked.len();
            for i in marked.into_iter().rev() {
                elem.children.remove(i);
            }
            removed
        }
        visit(&mut self.root, &mut doomed)
    }

    /// Count elements matching a predicate, root included.
    pub fn count_elements(&self, mut pred: impl FnMut(&Element) -> bool) -> usize {
        let mut n = 0;
        self.for_each_element(|e| {
            if pred(e) {
                n += 1;
            }
        });
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(id: &str, diag: f64) -> Element {
        let mut p = Element::new("path");
        p.kind = ElementKind::Path {
            bounds: Rect::new(0.0, 0.0, diag, 0.0),
        };
        p.set_attr("id", id);
        p
    }

    fn doc(root: Element) -> Document {
        Document {
            width: 100.0,
            height: 100.0,
            root,
        }
    }

    fn ids(doc: &Document) -> Vec<String> {
        let mut out = Vec::new();
        doc.for_each_element(|e| out.push(e.get_attr("id").unwrap_or(e.name.local.as_str()).to_string()));
        out
    }

    #[test]
    fn test_kind_from_name() {
        assert!(Element::new("path").is_path());
        assert_eq!(Element::new("g").kind, ElementKind::Group);
        assert_eq!(Element::new("svg").kind, ElementKind::Group);
        assert_eq!(Element::new("rect").kind, ElementKind::Other);
        assert!(Element::new("rect").bounds().is_none());
    }

    #[test]
    fn test_preorder_traversal() {
        let d = doc(Element::new("svg")
            .with_child(Element::new("g").with_child(path("a", 1.0)).with_child(path("b", 1.0)))
            .with_child(path("c", 1.0)));
        assert_eq!(ids(&d), ["svg", "g", "a", "b", "c"]);
    }

    #[test]
    fn test_prune_adjacent_siblings() {
        // Consecutive doomed siblings must not shift each other out of the scan
        let mut d = doc(Element::new("svg")
            .with_child(path("a", 1.0))
            .with_child(path("b", 1.0))
            .with_child(path("keep", 50.0))
            .with_child(path("c", 1.0)));

        let mut seen = Vec::new();
        let removed = d.prune_elements(|e| {
            seen.push(e.get_attr("id").unwrap_or("").to_string());
            e.bounds().is_some_and(|b| b.diagonal() < 10.0)
        });

        assert_eq!(removed, 3);
        assert_eq!(seen, ["a", "b", "keep", "c"]);
        assert_eq!(ids(&d), ["svg", "keep"]);
    }

    #[test]
    fn test_prune_removes_subtree_but_never_root() {
        let mut d = doc(Element::new("svg")
            .with_child(Element::new("g").with_child(path("inner", 1.0)))
            .with_child(Element::new("defs")));

        let removed = d.prune_elements(|e| e.is("g") || e.is("svg"));
        assert_eq!(removed, 1);
        assert_eq!(ids(&d), ["svg", "defs"]);
    }

    #[test]
    fn test_count_elements() {
        let d = doc(Element::new("svg").with_child(path("a", 1.0)).with_child(path("b", 2.0)));
        assert_eq!(d.count_elements(Element::is_path), 2);
        assert_eq!(d.count_elements(|_| true), 3);
    }
}
