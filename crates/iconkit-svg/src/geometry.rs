//! Viewport geometry: view boxes, lengths and aspect-ratio alignment.

use iconkit_path::parse_number_list;

// ==================== ViewBox ====================

/// SVG viewBox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewBox {
    pub fn new(min_x: f32, min_y: f32, width: f32, height: f32) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Parse a viewBox attribute. Exactly four numbers with a
    /// non-negative size.
    pub fn parse(s: &str) -> Option<Self> {
        match parse_number_list(s).as_slice() {
            [min_x, min_y, width, height] if *width >= 0.0 && *height >= 0.0 => {
                Some(ViewBox::new(*min_x, *min_y, *width, *height))
            }
            _ => None,
        }
    }
}

// ==================== SVG Length ====================

/// SVG length value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SvgLength {
    /// Pixels.
    Px(f32),
    /// Percentage.
    Percent(f32),
    /// Em units.
    Em(f32),
    /// User units (no unit specified).
    User(f32),
}

impl SvgLength {
    /// Parse length string.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (number, make): (&str, fn(f32) -> SvgLength) = if let Some(n) = s.strip_suffix('%') {
            (n, SvgLength::Percent)
        } else if let Some(n) = s.strip_suffix("px") {
            (n, SvgLength::Px)
        } else if let Some(n) = s.strip_suffix("em") {
            (n, SvgLength::Em)
        } else {
            (s, SvgLength::User)
        };
        let value: f32 = number.trim().parse().ok()?;
        value.is_finite().then(|| make(value))
    }

    /// Convert to pixels.
    pub fn to_px(&self, container_size: f32) -> f32 {
        match self {
            SvgLength::Px(v) | SvgLength::User(v) => *v,
            SvgLength::Percent(p) => container_size * p / 100.0,
            SvgLength::Em(em) => em * 16.0, // Default font size
        }
    }
}

// ==================== Aspect ratio ====================

/// Alignment half of `preserveAspectRatio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Stretch to fill, ignoring aspect ratio.
    None,
    XMinYMin,
    XMidYMin,
    XMaxYMin,
    XMinYMid,
    #[default]
    XMidYMid,
    XMaxYMid,
    XMinYMax,
    XMidYMax,
    XMaxYMax,
}

impl Align {
    /// Fractional offsets (0, 0.5 or 1) along each axis.
    pub fn factors(&self) -> (f32, f32) {
        match self {
            Align::None | Align::XMinYMin => (0.0, 0.0),
            Align::XMidYMin => (0.5, 0.0),
            Align::XMaxYMin => (1.0, 0.0),
            Align::XMinYMid => (0.0, 0.5),
            Align::XMidYMid => (0.5, 0.5),
            Align::XMaxYMid => (1.0, 0.5),
            Align::XMinYMax => (0.0, 1.0),
            Align::XMidYMax => (0.5, 1.0),
            Align::XMaxYMax => (1.0, 1.0),
        }
    }
}

/// `preserveAspectRatio="<align> [meet|slice]"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreserveAspectRatio {
    pub align: Align,
    /// `slice` covers the viewport; `meet` (default) fits inside it.
    pub slice: bool,
}

impl PreserveAspectRatio {
    pub fn parse(s: &str) -> Option<Self> {
        let mut words = s.split_whitespace();
        let align = match words.next()? {
            "none" => Align::None,
            "xMinYMin" => Align::XMinYMin,
            "xMidYMin" => Align::XMidYMin,
            "xMaxYMin" => Align::XMaxYMin,
            "xMinYMid" => Align::XMinYMid,
            "xMidYMid" => Align::XMidYMid,
            "xMaxYMid" => Align::XMaxYMid,
            "xMinYMax" => Align::XMinYMax,
            "xMidYMax" => Align::XMidYMax,
            "xMaxYMax" => Align::XMaxYMax,
            _ => return None,
        };
        let slice = match words.next() {
            None | Some("meet") => false,
            Some("slice") => true,
            Some(_) => return None,
        };
        Some(Self { align, slice })
    }

    /// Scale and translation mapping `view_box` into a `width × height`
    /// viewport: `(sx, sy, tx, ty)`.
    pub fn fit(&self, view_box: &ViewBox, width: f32, height: f32) -> (f32, f32, f32, f32) {
        if view_box.width <= 0.0 || view_box.height <= 0.0 {
            return (1.0, 1.0, 0.0, 0.0);
        }
        let sx = width / view_box.width;
        let sy = height / view_box.height;
        if self.align == Align::None {
            return (sx, sy, -view_box.min_x * sx, -view_box.min_y * sy);
        }
        let scale = if self.slice { sx.max(sy) } else { sx.min(sy) };
        let (fx, fy) = self.align.factors();
        let tx = (width - view_box.width * scale) * fx - view_box.min_x * scale;
        let ty = (height - view_box.height * scale) * fy - view_box.min_y * scale;
        (scale, scale, tx, ty)
    }
}

// ==================== Corner radii ====================

/// One elliptical corner radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Radius {
    pub x: f32,
    pub y: f32,
}

/// Per-corner radii of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadii {
    pub top_left: Radius,
    pub top_right: Radius,
    pub bottom_right: Radius,
    pub bottom_left: Radius,
}

impl CornerRadii {
    pub fn uniform(rx: f32, ry: f32) -> Self {
        let r = Radius { x: rx, y: ry };
        Self {
            top_left: r,
            top_right: r,
            bottom_right: r,
            bottom_left: r,
        }
    }

    /// Radii from `rx`/`ry` attributes: a missing one copies the other,
    /// and both are clamped to half the rectangle's size.
    pub fn from_attributes(rx: Option<f32>, ry: Option<f32>, width: f32, height: f32) -> Self {
        let (rx, ry) = match (rx, ry) {
            (Some(rx), Some(ry)) => (rx, ry),
            (Some(r), None) | (None, Some(r)) => (r, r),
            (None, None) => (0.0, 0.0),
        };
        Self::uniform(
            rx.clamp(0.0, (width / 2.0).max(0.0)),
            ry.clamp(0.0, (height / 2.0).max(0.0)),
        )
    }

    pub fn is_zero(&self) -> bool {
        *self == CornerRadii::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewbox_parse() {
        let vb = ViewBox::parse("0 0 100 50").unwrap();
        assert_eq!(vb, ViewBox::new(0.0, 0.0, 100.0, 50.0));

        let vb = ViewBox::parse("10,20,30,40").unwrap();
        assert_eq!(vb.min_x, 10.0);
        assert_eq!(vb.min_y, 20.0);

        assert_eq!(ViewBox::parse("0 0 24"), None);
        assert_eq!(ViewBox::parse("0 0 -1 24"), None);
    }

    #[test]
    fn test_svg_length_parse() {
        assert_eq!(SvgLength::parse("100"), Some(SvgLength::User(100.0)));
        assert_eq!(SvgLength::parse("50px"), Some(SvgLength::Px(50.0)));
        assert_eq!(SvgLength::parse("50%"), Some(SvgLength::Percent(50.0)));
        assert_eq!(SvgLength::parse("1.5em"), Some(SvgLength::Em(1.5)));
        assert_eq!(SvgLength::parse("wide"), None);
        assert_eq!(SvgLength::parse("50%").unwrap().to_px(48.0), 24.0);
    }

    #[test]
    fn test_preserve_aspect_ratio() {
        let par = PreserveAspectRatio::parse("xMinYMax slice").unwrap();
        assert_eq!(par.align, Align::XMinYMax);
        assert!(par.slice);
        assert_eq!(PreserveAspectRatio::parse("xMidYMid bogus"), None);
        assert_eq!(PreserveAspectRatio::parse("center"), None);
    }

    #[test]
    fn test_fit_meet_centers() {
        let vb = ViewBox::new(0.0, 0.0, 24.0, 24.0);
        let (sx, sy, tx, ty) = PreserveAspectRatio::default().fit(&vb, 48.0, 96.0);
        assert_eq!((sx, sy), (2.0, 2.0));
        assert_eq!((tx, ty), (0.0, 24.0));
    }

    #[test]
    fn test_corner_radii_from_attributes() {
        let radii = CornerRadii::from_attributes(Some(4.0), None, 20.0, 6.0);
        assert_eq!(radii.top_left, Radius { x: 4.0, y: 3.0 });
        assert!(CornerRadii::from_attributes(None, None, 10.0, 10.0).is_zero());
    }
}
