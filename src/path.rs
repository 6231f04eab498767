//! SVG path data parsing and bounding boxes.
//!
//! SVG path syntax: https://www.w3.org/TR/SVG/paths.html

use std::f64::consts::PI;

use crate::error::ParseError;
use crate::geometry::{BoundsBuilder, Rect};

/// A parsed SVG path.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub commands: Vec<Command>,
}

/// A path command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// M/m - Move to
    MoveTo { rel: bool, x: f64, y: f64 },
    /// L/l - Line to
    LineTo { rel: bool, x: f64, y: f64 },
    /// H/h - Horizontal line to
    HorizontalTo { rel: bool, x: f64 },
    /// V/v - Vertical line to
    VerticalTo { rel: bool, y: f64 },
    /// C/c - Cubic bezier
    CurveTo {
        rel: bool,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    /// S/s - Smooth cubic bezier
    SmoothCurveTo {
        rel: bool,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    /// Q/q - Quadratic bezier
    QuadTo {
        rel: bool,
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    /// T/t - Smooth quadratic bezier
    SmoothQuadTo { rel: bool, x: f64, y: f64 },
    /// A/a - Arc
    Arc {
        rel: bool,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    /// Z/z - Close path
    ClosePath,
}

/// Parse SVG path data.
pub fn parse_path(d: &str) -> Result<Path, ParseError> {
    PathParser::new(d).parse()
}

type Point = (f64, f64);

impl Path {
    /// Tight axis-aligned bounds of the geometry (curve extrema, not control
    /// points). Transforms and stroke width are not considered. `None` for
    /// an empty path.
    pub fn bounds(&self) -> Option<Rect> {
        let mut bounds = BoundsBuilder::default();
        let mut cur: Point = (0.0, 0.0);
        let mut start: Point = (0.0, 0.0);
        // Control point of the previous curve, for S/T reflection
        let mut last_cubic: Option<Point> = None;
        let mut last_quad: Option<Point> = None;

        for cmd in &self.commands {
            let base = cur;
            let abs = move |rel: bool, x: f64, y: f64| {
                if rel { (base.0 + x, base.1 + y) } else { (x, y) }
            };
            let mut next_cubic = None;
            let mut next_quad = None;

            match *cmd {
                Command::MoveTo { rel, x, y } => {
                    cur = abs(rel, x, y);
                    start = cur;
                    bounds.include(cur.0, cur.1);
                }
                Command::LineTo { rel, x, y } => {
                    cur = abs(rel, x, y);
                    bounds.include(cur.0, cur.1);
                }
                Command::HorizontalTo { rel, x } => {
                    cur.0 = if rel { cur.0 + x } else { x };
                    bounds.include(cur.0, cur.1);
                }
                Command::VerticalTo { rel, y } => {
                    cur.1 = if rel { cur.1 + y } else { y };
                    bounds.include(cur.0, cur.1);
                }
                Command::CurveTo {
                    rel,
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => {
                    let (p1, p2, p3) = (abs(rel, x1, y1), abs(rel, x2, y2), abs(rel, x, y));
                    include_cubic(&mut bounds, cur, p1, p2, p3);
                    next_cubic = Some(p2);
                    cur = p3;
                }
                Command::SmoothCurveTo { rel, x2, y2, x, y } => {
                    let p1 = reflect(last_cubic, cur);
                    let (p2, p3) = (abs(rel, x2, y2), abs(rel, x, y));
                    include_cubic(&mut bounds, cur, p1, p2, p3);
                    next_cubic = Some(p2);
                    cur = p3;
                }
                Command::QuadTo { rel, x1, y1, x, y } => {
                    let (p1, p2) = (abs(rel, x1, y1), abs(rel, x, y));
                    include_quad(&mut bounds, cur, p1, p2);
                    next_quad = Some(p1);
                    cur = p2;
                }
                Command::SmoothQuadTo { rel, x, y } => {
                    let p1 = reflect(last_quad, cur);
                    let p2 = abs(rel, x, y);
                    include_quad(&mut bounds, cur, p1, p2);
                    next_quad = Some(p1);
                    cur = p2;
                }
                Command::Arc {
                    rel,
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    x,
                    y,
                } => {
                    let end = abs(rel, x, y);
                    include_arc(
                        &mut bounds,
                        cur,
                        end,
                        rx,
                        ry,
                        x_axis_rotation,
                        large_arc,
                        sweep,
                    );
                    cur = end;
                }
                Command::ClosePath => {
                    cur = start;
                }
            }

            last_cubic = next_cubic;
            last_quad = next_quad;
        }

        bounds.finish()
    }
}

fn reflect(control: Option<Point>, cur: Point) -> Point {
    match control {
        Some((cx, cy)) => (2.0 * cur.0 - cx, 2.0 * cur.1 - cy),
        None => cur,
    }
}

fn include_cubic(bounds: &mut BoundsBuilder, p0: Point, p1: Point, p2: Point, p3: Point) {
    bounds.include(p0.0, p0.1);
    bounds.include(p3.0, p3.1);

    let eval = |t: f64| {
        let mt = 1.0 - t;
        let at = |a: f64, b: f64, c: f64, d: f64| {
            mt * mt * mt * a + 3.0 * mt * mt * t * b + 3.0 * mt * t * t * c + t * t * t * d
        };
        (at(p0.0, p1.0, p2.0, p3.0), at(p0.1, p1.1, p2.1, p3.1))
    };

    let axes = [(p0.0, p1.0, p2.0, p3.0), (p0.1, p1.1, p2.1, p3.1)];
    for (a0, a1, a2, a3) in axes {
        // Roots of the derivative: a t² + b t + c
        let a = -a0 + 3.0 * a1 - 3.0 * a2 + a3;
        let b = 2.0 * (a0 - 2.0 * a1 + a2);
        let c = a1 - a0;
        for t in quadratic_roots(a, b, c).into_iter().flatten() {
            if t > 0.0 && t < 1.0 {
                let (x, y) = eval(t);
                bounds.include(x, y);
            }
        }
    }
}

fn include_quad(bounds: &mut BoundsBuilder, p0: Point, p1: Point, p2: Point) {
    bounds.include(p0.0, p0.1);
    bounds.include(p2.0, p2.1);

    let axes = [(p0.0, p1.0, p2.0), (p0.1, p1.1, p2.1)];
    for (a0, a1, a2) in axes {
        let denom = a0 - 2.0 * a1 + a2;
        if denom.abs() < f64::EPSILON {
            continue;
        }
        let t = (a0 - a1) / denom;
        if t > 0.0 && t < 1.0 {
            let mt = 1.0 - t;
            let x = mt * mt * p0.0 + 2.0 * mt * t * p1.0 + t * t * p2.0;
            let y = mt * mt * p0.1 + 2.0 * mt * t * p1.1 + t * t * p2.1;
            bounds.include(x, y);
        }
    }
}

fn quadratic_roots(a: f64, b: f64, c: f64) -> [Option<f64>; 2] {
    if a.abs() < 1e-12 {
        if b.abs() < 1e-12 {
            return [None, None];
        }
        return [Some(-c / b), None];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return [None, None];
    }
    let sq = disc.sqrt();
    [Some((-b + sq) / (2.0 * a)), Some((-b - sq) / (2.0 * a))]
}

/// Endpoint-to-center conversion per SVG 1.1 appendix F.6.5, then the
/// ellipse extrema that fall inside the swept angle range.
#[allow(clippy::too_many_arguments)]
fn include_arc(
    bounds: &mut BoundsBuilder,
    from: Point,
    to: Point,
    rx: f64,
    ry: f64,
    x_axis_rotation: f64,
    large_arc: bool,
    sweep: bool,
) {
    bounds.include(from.0, from.1);
    bounds.include(to.0, to.1);

    let (mut rx, mut ry) = (rx.abs(), ry.abs());
    if rx == 0.0 || ry == 0.0 || from == to {
        // Degenerates to a straight line
        return;
    }

    let phi = x_axis_rotation.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    let dx = (from.0 - to.0) / 2.0;
    let dy = (from.1 - to.1) / 2.0;
    let x1p = cos_phi * dx + sin_phi * dy;
    let y1p = -sin_phi * dx + cos_phi * dy;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let num = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
    let den = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
    let mut coef = (num / den).max(0.0).sqrt();
    if large_arc == sweep {
        coef = -coef;
    }
    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;

    let cx = cos_phi * cxp - sin_phi * cyp + (from.0 + to.0) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (from.1 + to.1) / 2.0;

    let angle = |ux: f64, uy: f64, vx: f64, vy: f64| (ux * vy - uy * vx).atan2(ux * vx + uy * vy);
    let theta1 = angle(1.0, 0.0, (x1p - cxp) / rx, (y1p - cyp) / ry);
    let mut delta = angle(
        (x1p - cxp) / rx,
        (y1p - cyp) / ry,
        (-x1p - cxp) / rx,
        (-y1p - cyp) / ry,
    );
    if !sweep && delta > 0.0 {
        delta -= 2.0 * PI;
    } else if sweep && delta < 0.0 {
        delta += 2.0 * PI;
    }

    let point_at = |theta: f64| {
        let (s, c) = theta.sin_cos();
        (
            cx + rx * cos_phi * c - ry * sin_phi * s,
            cy + rx * sin_phi * c + ry * cos_phi * s,
        )
    };

    let tx = (-ry * sin_phi).atan2(rx * cos_phi);
    let ty = (ry * cos_phi).atan2(rx * sin_phi);
    for base in [tx, ty] {
        for k in -2..=2 {
            let theta = base + f64::from(k) * PI;
            if angle_in_sweep(theta, theta1, delta) {
                let (x, y) = point_at(theta);
                bounds.include(x, y);
            }
        }
    }
}

fn angle_in_sweep(theta: f64, start: f64, delta: f64) -> bool {
    let (lo, hi) = if delta >= 0.0 {
        (start, start + delta)
    } else {
        (start + delta, start)
    };
    // Bring theta into [lo, lo + 2π)
    let shifted = lo + (theta - lo).rem_euclid(2.0 * PI);
    shifted <= hi
}

struct PathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PathParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(&mut self) -> Result<Path, ParseError> {
        let mut commands = Vec::new();
        let mut last_cmd: Option<char> = None;

        self.skip_whitespace();

        while !self.is_eof() {
            let cmd = match self.peek() {
                Some(c) if c.is_ascii_alphabetic() => {
                    self.next();
                    last_cmd = Some(c);
                    c
                }
                // Implicit repetition; coordinates after M/m are line-tos
                _ => match last_cmd {
                    Some('M') => 'L',
                    Some('m') => 'l',
                    Some('Z' | 'z') | None => {
                        return Err(self.error("Expected command letter"));
                    }
                    Some(c) => c,
                },
            };

            commands.push(self.parse_command(cmd)?);
            self.skip_whitespace_and_comma();
        }

        if let Some(first) = commands.first()
            && !matches!(first, Command::MoveTo { .. })
        {
            return Err(self.error("Path data must start with a move-to"));
        }

        Ok(Path { commands })
    }

    fn parse_command(&mut self, cmd: char) -> Result<Command, ParseError> {
        let rel = cmd.is_ascii_lowercase();

        Ok(match cmd.to_ascii_lowercase() {
            'm' => {
                let [x, y] = self.numbers::<2>()?;
                Command::MoveTo { rel, x, y }
            }
            'l' => {
                let [x, y] = self.numbers::<2>()?;
                Command::LineTo { rel, x, y }
            }
            'h' => {
                let [x] = self.numbers::<1>()?;
                Command::HorizontalTo { rel, x }
            }
            'v' => {
                let [y] = self.numbers::<1>()?;
                Command::VerticalTo { rel, y }
            }
            'c' => {
                let [x1, y1, x2, y2, x, y] = self.numbers::<6>()?;
                Command::CurveTo {
                    rel,
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                }
            }
            's' => {
                let [x2, y2, x, y] = self.numbers::<4>()?;
                Command::SmoothCurveTo { rel, x2, y2, x, y }
            }
            'q' => {
                let [x1, y1, x, y] = self.numbers::<4>()?;
                Command::QuadTo { rel, x1, y1, x, y }
            }
            't' => {
                let [x, y] = self.numbers::<2>()?;
                Command::SmoothQuadTo { rel, x, y }
            }
            'a' => {
                let [rx, ry, x_axis_rotation] = self.numbers::<3>()?;
                let large_arc = self.parse_flag()?;
                let sweep = self.parse_flag()?;
                let [x, y] = self.numbers::<2>()?;
                Command::Arc {
                    rel,
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    x,
                    y,
                }
            }
            'z' => Command::ClosePath,
            _ => return Err(self.error(&format!("Unknown command: {}", cmd))),
        })
    }

    fn numbers<const N: usize>(&mut self) -> Result<[f64; N], ParseError> {
        let mut out = [0.0; N];
        for slot in &mut out {
            *slot = self.parse_number()?;
        }
        Ok(out)
    }

    fn parse_number(&mut self) -> Result<f64, ParseError> {
        self.skip_whitespace_and_comma();

        let start = self.pos;

        if matches!(self.peek(), Some('-' | '+')) {
            self.next();
        }
        self.skip_digits();
        if self.peek() == Some('.') {
            self.next();
            self.skip_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.next();
            if matches!(self.peek(), Some('-' | '+')) {
                self.next();
            }
            self.skip_digits();
        }

        let s = &self.input[start..self.pos];
        if s.is_empty() {
            return Err(self.error("Expected number"));
        }

        s.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| self.error(&format!("Invalid number: {}", s)))
    }

    fn parse_flag(&mut self) -> Result<bool, ParseError> {
        self.skip_whitespace_and_comma();
        match self.next() {
            Some('0') => Ok(false),
            Some('1') => Ok(true),
            Some(c) => Err(self.error(&format!("Expected flag (0 or 1), got: {}", c))),
            None => Err(self.error("Expected flag")),
        }
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.next();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.next();
        }
    }

    fn skip_whitespace_and_comma(&mut self) {
        self.skip_whitespace();
        if self.peek() == Some(',') {
            self.next();
        }
        self.skip_whitespace();
    }

    fn error(&self, msg: &str) -> ParseError {
        ParseError::InvalidPath(format!("{} at offset {}", msg, self.pos))
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}
