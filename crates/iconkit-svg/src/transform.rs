//! Transforms as written in markup, and the affine matrix they resolve to.

use iconkit_css::{parse_angle, parse_number};
use iconkit_path::parse_number_list;
use std::fmt;
use tracing::trace;

// ==================== Transform ====================

/// A transform list entry. Angles are in degrees.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    Translate { x: f32, y: f32 },
    Scale { x: f32, y: f32 },
    Rotate { angle: f32, center: Option<(f32, f32)> },
    SkewX(f32),
    SkewY(f32),
    /// `matrix(a b c d e f)`.
    Matrix([f32; 6]),
    /// Applied left to right, as written. Never nested.
    Combined(Vec<Transform>),
}

impl Transform {
    /// Sequence `self` then `next`, flattening any `Combined` operands.
    pub fn then(self, next: Transform) -> Transform {
        let mut parts = self.into_parts();
        parts.extend(next.into_parts());
        Transform::Combined(parts)
    }

    fn into_parts(self) -> Vec<Transform> {
        match self {
            Transform::Combined(parts) => parts,
            other => vec![other],
        }
    }

    /// Parse a `transform` attribute or CSS `transform` value.
    ///
    /// Accepts SVG syntax (`rotate(45 12 12)`) and the CSS forms with
    /// units (`rotate(45deg)`, `translateX(4px)`). Returns `None` for
    /// `none`, empty input or any malformed function, so a bad value
    /// reads as an absent attribute.
    pub fn parse(text: &str) -> Option<Transform> {
        let text = text.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("none") {
            return None;
        }

        let mut parts = Vec::new();
        let mut rest = text;
        loop {
            rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
            if rest.is_empty() {
                break;
            }
            let open = rest.find('(')?;
            let close = open + rest[open..].find(')')?;
            let name = rest[..open].trim();
            match transform_function(name, &rest[open + 1..close]) {
                Some(transform) => parts.push(transform),
                None => {
                    trace!(function = name, "Malformed transform function");
                    return None;
                }
            }
            rest = &rest[close + 1..];
        }

        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Transform::Combined(parts)),
        }
    }

    /// Resolve to a single affine matrix.
    pub fn to_matrix(&self) -> Matrix {
        match self {
            Transform::Translate { x, y } => Matrix::identity().translate(*x, *y),
            Transform::Scale { x, y } => Matrix::identity().scale(*x, *y),
            Transform::Rotate { angle, center: None } => {
                Matrix::identity().rotate(angle.to_radians())
            }
            Transform::Rotate {
                angle,
                center: Some((cx, cy)),
            } => Matrix::identity()
                .translate(*cx, *cy)
                .rotate(angle.to_radians())
                .translate(-cx, -cy),
            Transform::SkewX(angle) => Matrix::identity().skew_x(angle.to_radians()),
            Transform::SkewY(angle) => Matrix::identity().skew_y(angle.to_radians()),
            Transform::Matrix([a, b, c, d, e, f]) => Matrix::new(*a, *b, *c, *d, *e, *f),
            Transform::Combined(parts) => parts
                .iter()
                .fold(Matrix::identity(), |acc, part| acc.multiply(&part.to_matrix())),
        }
    }
}

/// Arguments of one function. Unit-free lists go through the path
/// number grammar so packed forms like `translate(10-5)` work.
fn arguments(text: &str, angles: bool) -> Option<Vec<f32>> {
    let has_units = text
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E');
    if !has_units {
        return Some(parse_number_list(text));
    }
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            if angles {
                parse_angle(token)
            } else {
                parse_number(token)
            }
        })
        .collect()
}

fn transform_function(name: &str, args: &str) -> Option<Transform> {
    let name = name.to_ascii_lowercase();
    let is_angle = matches!(name.as_str(), "rotate" | "skewx" | "skewy" | "skew");
    let args = arguments(args, is_angle)?;
    let first = *args.first()?;

    let transform = match (name.as_str(), args.len()) {
        ("translate", 1) => Transform::Translate { x: first, y: 0.0 },
        ("translate", 2) => Transform::Translate {
            x: first,
            y: args[1],
        },
        ("translatex", 1) => Transform::Translate { x: first, y: 0.0 },
        ("translatey", 1) => Transform::Translate { x: 0.0, y: first },
        ("scale", 1) => Transform::Scale { x: first, y: first },
        ("scale", 2) => Transform::Scale {
            x: first,
            y: args[1],
        },
        ("scalex", 1) => Transform::Scale { x: first, y: 1.0 },
        ("scaley", 1) => Transform::Scale { x: 1.0, y: first },
        ("rotate", 1) => Transform::Rotate {
            angle: first,
            center: None,
        },
        ("rotate", 3) => Transform::Rotate {
            angle: first,
            center: Some((args[1], args[2])),
        },
        ("skewx", 1) | ("skew", 1) => Transform::SkewX(first),
        ("skewy", 1) => Transform::SkewY(first),
        ("skew", 2) => Transform::SkewX(first).then(Transform::SkewY(args[1])),
        ("matrix", 6) => Transform::Matrix([args[0], args[1], args[2], args[3], args[4], args[5]]),
        _ => return None,
    };
    Some(transform)
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Translate { x, y } => write!(f, "translate({} {})", x, y),
            Transform::Scale { x, y } => write!(f, "scale({} {})", x, y),
            Transform::Rotate { angle, center: None } => write!(f, "rotate({})", angle),
            Transform::Rotate {
                angle,
                center: Some((cx, cy)),
            } => write!(f, "rotate({} {} {})", angle, cx, cy),
            Transform::SkewX(angle) => write!(f, "skewX({})", angle),
            Transform::SkewY(angle) => write!(f, "skewY({})", angle),
            Transform::Matrix([a, b, c, d, e, g]) => {
                write!(f, "matrix({} {} {} {} {} {})", a, b, c, d, e, g)
            }
            Transform::Combined(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", part)?;
                }
                Ok(())
            }
        }
    }
}

// ==================== Matrix ====================

/// 2D affine transform matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    /// Matrix elements [a, b, c, d, e, f]
    /// Represents: [a c e]
    ///             [b d f]
    ///             [0 0 1]
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Matrix {
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translate(self, tx: f32, ty: f32) -> Self {
        self.multiply(&Matrix::new(1.0, 0.0, 0.0, 1.0, tx, ty))
    }

    pub fn scale(self, sx: f32, sy: f32) -> Self {
        self.multiply(&Matrix::new(sx, 0.0, 0.0, sy, 0.0, 0.0))
    }

    /// Rotate by `angle` radians.
    pub fn rotate(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        self.multiply(&Matrix::new(cos, sin, -sin, cos, 0.0, 0.0))
    }

    pub fn skew_x(self, angle: f32) -> Self {
        self.multiply(&Matrix::new(1.0, 0.0, angle.tan(), 1.0, 0.0, 0.0))
    }

    pub fn skew_y(self, angle: f32) -> Self {
        self.multiply(&Matrix::new(1.0, angle.tan(), 0.0, 1.0, 0.0, 0.0))
    }

    /// `self × other`: `other` is applied to points first.
    pub fn multiply(&self, other: &Matrix) -> Self {
        Matrix {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Matrix::identity()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-4 && (a.1 - b.1).abs() < 1e-4
    }

    #[test]
    fn test_parse_single() {
        assert_eq!(
            Transform::parse("translate(10, 20)"),
            Some(Transform::Translate { x: 10.0, y: 20.0 })
        );
        assert_eq!(
            Transform::parse("scale(2)"),
            Some(Transform::Scale { x: 2.0, y: 2.0 })
        );
        assert_eq!(
            Transform::parse("rotate(45 12 12)"),
            Some(Transform::Rotate {
                angle: 45.0,
                center: Some((12.0, 12.0))
            })
        );
    }

    #[test]
    fn test_parse_list_is_flat() {
        let t = Transform::parse("translate(5) rotate(90), scale(2 3)").unwrap();
        match t {
            Transform::Combined(parts) => {
                assert_eq!(parts.len(), 3);
                assert!(!parts.iter().any(|p| matches!(p, Transform::Combined(_))));
            }
            other => panic!("expected combined, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_css_units() {
        assert_eq!(
            Transform::parse("rotate(0.25turn)"),
            Some(Transform::Rotate {
                angle: 90.0,
                center: None
            })
        );
        assert_eq!(
            Transform::parse("translateX(4px)"),
            Some(Transform::Translate { x: 4.0, y: 0.0 })
        );
    }

    #[test]
    fn test_parse_packed_numbers() {
        assert_eq!(
            Transform::parse("translate(10-5)"),
            Some(Transform::Translate { x: 10.0, y: -5.0 })
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Transform::parse("none"), None);
        assert_eq!(Transform::parse(""), None);
        assert_eq!(Transform::parse("spin(4)"), None);
        assert_eq!(Transform::parse("matrix(1 0 0 1)"), None);
        assert_eq!(Transform::parse("translate(1"), None);
    }

    #[test]
    fn test_then_flattens() {
        let a = Transform::Translate { x: 1.0, y: 0.0 }.then(Transform::SkewX(10.0));
        let b = Transform::Scale { x: 2.0, y: 2.0 }.then(Transform::SkewY(5.0));
        let combined = a.then(b);
        match combined {
            Transform::Combined(parts) => {
                assert_eq!(parts.len(), 4);
                assert_eq!(parts[0], Transform::Translate { x: 1.0, y: 0.0 });
                assert_eq!(parts[3], Transform::SkewY(5.0));
            }
            other => panic!("expected combined, got {:?}", other),
        }
    }

    #[test]
    fn test_matrix_order() {
        // translate then scale: points are scaled first.
        let t = Transform::parse("translate(10 0) scale(2)").unwrap();
        assert!(close(t.to_matrix().apply(1.0, 1.0), (12.0, 2.0)));
    }

    #[test]
    fn test_rotate_about_center() {
        let t = Transform::parse("rotate(90 10 10)").unwrap();
        assert!(close(t.to_matrix().apply(20.0, 10.0), (10.0, 20.0)));
    }

    #[test]
    fn test_matrix_identity() {
        assert!(Matrix::identity().is_identity());
        let (x, y) = Matrix::identity().apply(10.0, 20.0);
        assert_eq!((x, y), (10.0, 20.0));
    }

    #[test]
    fn test_display_reparses() {
        let t = Transform::parse("translate(1 2) rotate(30 4 5) matrix(1 0 0 1 3 4)").unwrap();
        assert_eq!(Transform::parse(&t.to_string()), Some(t));
    }
}
