//! Tree passes run by the pipeline.

use crate::ast::*;
use crate::color::Paint;
use crate::geometry::{diagonal, with_alpha};
use crate::transform::Transform;

/// Rewrite the alpha channel of every solid `fill`, `stroke` and `color`.
/// Other paints are left alone. Returns the number of paints rewritten.
pub fn apply_alpha(doc: &mut Document, alpha: u8) -> usize {
    let mut rewritten = 0;
    doc.for_each_element_mut(|elem| {
        for paint in elem.paints_mut() {
            match paint {
                Some(Paint::Solid(color)) => {
                    *color = with_alpha(*color, alpha);
                    rewritten += 1;
                }
                Some(Paint::None) | Some(Paint::Other(_)) | None => {}
            }
        }
    });
    rewritten
}

/// Append `scale(factor)` to the transform list of every `<path>`.
///
/// The scale lands last in the list, so it applies to the path's own
/// coordinates before any transform already present. Each path shrinks
/// about the user-space origin independently; groups are not scaled.
pub fn inject_scale(doc: &mut Document, factor: f32) -> usize {
    let mut scaled = 0;
    doc.for_each_element_mut(|elem| match elem.kind {
        ElementKind::Path { .. } => {
            elem.transforms.push(Transform::scale(f64::from(factor)));
            scaled += 1;
        }
        ElementKind::Group | ElementKind::Other => {}
    });
    scaled
}

/// Remove every `<path>` whose bounding-box diagonal is strictly below
/// `min_diagonal`. Containers are kept even when left empty. Returns the
/// number of paths removed.
pub fn prune_small_paths(doc: &mut Document, min_diagonal: f64) -> usize {
    doc.prune_elements(|elem| match elem.kind {
        ElementKind::Path { bounds } => diagonal(&bounds) < min_diagonal,
        ElementKind::Group | ElementKind::Other => false,
    })
}
