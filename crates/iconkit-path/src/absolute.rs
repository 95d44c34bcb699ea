//! Conversion of relative and shorthand commands to absolute form.

use crate::PathCommand;

type Point = (f32, f32);

fn reflect(control: Option<Point>, current: Point) -> Point {
    match control {
        Some((cx, cy)) => (2.0 * current.0 - cx, 2.0 * current.1 - cy),
        None => current,
    }
}

/// Resolve every command to absolute `M`, `L`, `C`, `Q`, `A` or `Z`.
///
/// Horizontal/vertical lines become `L`; smooth curves become full curves
/// with the reflected control point. Command count is preserved, so the
/// output lines up index-by-index with the input.
pub fn to_absolute(commands: &[PathCommand]) -> Vec<PathCommand> {
    use PathCommand::*;

    let mut out = Vec::with_capacity(commands.len());
    let mut current: Point = (0.0, 0.0);
    let mut start: Point = (0.0, 0.0);
    let mut last_cubic: Option<Point> = None;
    let mut last_quad: Option<Point> = None;

    for command in commands {
        let mut next_cubic = None;
        let mut next_quad = None;
        let (cx, cy) = current;

        match *command {
            MoveTo(x, y) => {
                current = (x, y);
                start = current;
                out.push(MoveTo(x, y));
            }
            MoveToRel(dx, dy) => {
                current = (cx + dx, cy + dy);
                start = current;
                out.push(MoveTo(current.0, current.1));
            }
            LineTo(x, y) => {
                current = (x, y);
                out.push(LineTo(x, y));
            }
            LineToRel(dx, dy) => {
                current = (cx + dx, cy + dy);
                out.push(LineTo(current.0, current.1));
            }
            HorizontalTo(x) => {
                current = (x, cy);
                out.push(LineTo(x, cy));
            }
            HorizontalToRel(dx) => {
                current = (cx + dx, cy);
                out.push(LineTo(current.0, cy));
            }
            VerticalTo(y) => {
                current = (cx, y);
                out.push(LineTo(cx, y));
            }
            VerticalToRel(dy) => {
                current = (cx, cy + dy);
                out.push(LineTo(cx, current.1));
            }
            CubicTo(x1, y1, x2, y2, x, y) => {
                out.push(CubicTo(x1, y1, x2, y2, x, y));
                next_cubic = Some((x2, y2));
                current = (x, y);
            }
            CubicToRel(x1, y1, x2, y2, x, y) => {
                let (x2, y2) = (cx + x2, cy + y2);
                out.push(CubicTo(cx + x1, cy + y1, x2, y2, cx + x, cy + y));
                next_cubic = Some((x2, y2));
                current = (cx + x, cy + y);
            }
            SmoothCubicTo(x2, y2, x, y) => {
                let (x1, y1) = reflect(last_cubic, current);
                out.push(CubicTo(x1, y1, x2, y2, x, y));
                next_cubic = Some((x2, y2));
                current = (x, y);
            }
            SmoothCubicToRel(x2, y2, x, y) => {
                let (x1, y1) = reflect(last_cubic, current);
                let (x2, y2) = (cx + x2, cy + y2);
                out.push(CubicTo(x1, y1, x2, y2, cx + x, cy + y));
                next_cubic = Some((x2, y2));
                current = (cx + x, cy + y);
            }
            QuadTo(x1, y1, x, y) => {
                out.push(QuadTo(x1, y1, x, y));
                next_quad = Some((x1, y1));
                current = (x, y);
            }
            QuadToRel(x1, y1, x, y) => {
                let (x1, y1) = (cx + x1, cy + y1);
                out.push(QuadTo(x1, y1, cx + x, cy + y));
                next_quad = Some((x1, y1));
                current = (cx + x, cy + y);
            }
            SmoothQuadTo(x, y) => {
                let control = reflect(last_quad, current);
                out.push(QuadTo(control.0, control.1, x, y));
                next_quad = Some(control);
                current = (x, y);
            }
            SmoothQuadToRel(x, y) => {
                let control = reflect(last_quad, current);
                out.push(QuadTo(control.0, control.1, cx + x, cy + y));
                next_quad = Some(control);
                current = (cx + x, cy + y);
            }
            ArcTo(rx, ry, rot, large, sweep, x, y) => {
                out.push(ArcTo(rx, ry, rot, large, sweep, x, y));
                current = (x, y);
            }
            ArcToRel(rx, ry, rot, large, sweep, x, y) => {
                current = (cx + x, cy + y);
                out.push(ArcTo(rx, ry, rot, large, sweep, current.0, current.1));
            }
            Close => {
                current = start;
                out.push(Close);
            }
        }

        last_cubic = next_cubic;
        last_quad = next_quad;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_path;
    use PathCommand::*;

    #[test]
    fn test_relative_lines() {
        let abs = to_absolute(&parse_path("m10 10 h5 v5 l-5 0 z m1 1 l1 1").unwrap());
        assert_eq!(
            abs,
            vec![
                MoveTo(10.0, 10.0),
                LineTo(15.0, 10.0),
                LineTo(15.0, 15.0),
                LineTo(10.0, 15.0),
                Close,
                MoveTo(11.0, 11.0),
                LineTo(12.0, 12.0),
            ]
        );
    }

    #[test]
    fn test_smooth_cubic_reflects_control() {
        let abs = to_absolute(&parse_path("M0 0 C0 10 10 10 10 0 S20 -10 20 0").unwrap());
        assert_eq!(abs[2], CubicTo(10.0, -10.0, 20.0, -10.0, 20.0, 0.0));
    }

    #[test]
    fn test_smooth_quad_without_previous_uses_current_point() {
        let abs = to_absolute(&parse_path("M5 5 T10 10").unwrap());
        assert_eq!(abs[1], QuadTo(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn test_relative_arc() {
        let abs = to_absolute(&parse_path("M10 10 a5 5 0 0 1 10 0").unwrap());
        assert_eq!(abs[1], ArcTo(5.0, 5.0, 0.0, false, true, 20.0, 10.0));
    }
}
