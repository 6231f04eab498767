//! SVG `transform` attribute lists.
//!
//! Lists compose left to right: `A B` maps a point `p` to `A(B(p))`, so the
//! last entry is applied to the geometry first.

use std::fmt;

use svgtypes::{TransformListParser, TransformListToken};

use crate::error::ParseError;

/// One transform function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Matrix([f64; 6]),
    Translate { tx: f64, ty: f64 },
    Scale { sx: f64, sy: f64 },
    Rotate(f64),
    SkewX(f64),
    SkewY(f64),
}

impl Transform {
    /// A uniform scale.
    pub fn scale(factor: f64) -> Self {
        Transform::Scale {
            sx: factor,
            sy: factor,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, args): (&str, Vec<f64>) = match *self {
            Transform::Matrix(m) => ("matrix", m.to_vec()),
            Transform::Translate { tx, ty } => ("translate", vec![tx, ty]),
            Transform::Scale { sx, sy } if sx == sy => ("scale", vec![sx]),
            Transform::Scale { sx, sy } => ("scale", vec![sx, sy]),
            Transform::Rotate(a) => ("rotate", vec![a]),
            Transform::SkewX(a) => ("skewX", vec![a]),
            Transform::SkewY(a) => ("skewY", vec![a]),
        };

        let mut buf = ryu::Buffer::new();
        f.write_str(name)?;
        f.write_str("(")?;
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(buf.format(*arg))?;
        }
        f.write_str(")")
    }
}

/// Serialize a list back to attribute syntax.
pub fn serialize_transform_list(list: &[Transform]) -> String {
    list.iter()
        .map(Transform::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<TransformListToken> for Transform {
    fn from(token: TransformListToken) -> Self {
        match token {
            TransformListToken::Matrix { a, b, c, d, e, f } => Transform::Matrix([a, b, c, d, e, f]),
            TransformListToken::Translate { tx, ty } => Transform::Translate { tx, ty },
            TransformListToken::Scale { sx, sy } => Transform::Scale { sx, sy },
            TransformListToken::Rotate { angle } => Transform::Rotate(angle),
            TransformListToken::SkewX { angle } => Transform::SkewX(angle),
            TransformListToken::SkewY { angle } => Transform::SkewY(angle),
        }
    }
}

/// Parse a `transform` attribute value.
///
/// `rotate(a cx cy)` comes back as `translate(cx cy) rotate(a)
/// translate(-cx -cy)`.
pub fn parse_transform_list(value: &str) -> Result<Vec<Transform>, ParseError> {
    TransformListParser::from(value)
        .map(|token| {
            token
                .map(Transform::from)
                .map_err(|e| ParseError::InvalidTransform(format!("{:?}: {}", value, e)))
        })
        .collect()
}
