//! Paint and the per-element style record.

use crate::transform::Transform;
use iconkit_css::{parse_color, parse_dash_array, parse_number, Color, Declarations};
use tracing::trace;

// ==================== Paint ====================

/// Paint value (fill or stroke).
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// No paint.
    None,
    /// Solid color. `transparent` is a color, not `None`.
    Color(Color),
    /// Reference to a gradient or pattern by id.
    Url(String),
    /// Inherit the host's current color.
    CurrentColor,
}

impl Paint {
    /// Parse a paint value. Unrecognised text yields `None` (the option),
    /// which callers treat as "not specified".
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("none") {
            return Some(Paint::None);
        }
        if value.eq_ignore_ascii_case("currentcolor") {
            return Some(Paint::CurrentColor);
        }
        if let Some(id) = parse_url(value) {
            return Some(Paint::Url(id));
        }
        parse_color(value).map(Paint::Color)
    }

    /// Solid color, if this paint is one.
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Paint::Color(c) => Some(*c),
            _ => None,
        }
    }
}

/// Id referenced by `url(#id)`, ignoring any fallback after the `)`.
pub fn parse_url(value: &str) -> Option<String> {
    let value = value.trim();
    let rest = value
        .get(..4)
        .filter(|head| head.eq_ignore_ascii_case("url("))
        .map(|_| &value[4..])?;
    let close = rest.find(')')?;
    let id = rest[..close]
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim_start_matches('#');
    (!id.is_empty()).then(|| id.to_string())
}

// ==================== Keyword properties ====================

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Line join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    MiterClip,
    Round,
    Bevel,
    Arcs,
}

/// Fill rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

/// Only `none` matters for rendering; every other value displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Inline,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VectorEffect {
    #[default]
    None,
    NonScalingStroke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintLayer {
    Fill,
    Stroke,
    Markers,
}

/// Order in which fill, stroke and markers are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintOrder(pub [PaintLayer; 3]);

impl Default for PaintOrder {
    fn default() -> Self {
        PaintOrder([PaintLayer::Fill, PaintLayer::Stroke, PaintLayer::Markers])
    }
}

impl PaintOrder {
    /// `normal`, or up to three layer names; omitted layers follow in
    /// their default order.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("normal") {
            return Some(Self::default());
        }
        let mut layers = Vec::with_capacity(3);
        for word in value.split_whitespace() {
            let layer = match word.to_ascii_lowercase().as_str() {
                "fill" => PaintLayer::Fill,
                "stroke" => PaintLayer::Stroke,
                "markers" => PaintLayer::Markers,
                _ => return None,
            };
            if layers.contains(&layer) {
                return None;
            }
            layers.push(layer);
        }
        if layers.is_empty() {
            return None;
        }
        for layer in Self::default().0 {
            if !layers.contains(&layer) {
                layers.push(layer);
            }
        }
        Some(PaintOrder([layers[0], layers[1], layers[2]]))
    }
}

fn keyword<T>(value: &str, table: &[(&str, T)]) -> Option<T>
where
    T: Copy,
{
    let value = value.trim();
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value))
        .map(|(_, v)| *v)
}

/// Opacity as a number or percentage, clamped to `[0, 1]`.
pub fn parse_opacity(value: &str) -> Option<f32> {
    let value = value.trim();
    let opacity = match value.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f32>().ok()? / 100.0,
        None => value.parse::<f32>().ok()?,
    };
    opacity.is_finite().then(|| opacity.clamp(0.0, 1.0))
}

// ==================== Style ====================

/// Presentation properties the style record understands.
pub const STYLE_PROPERTIES: &[&str] = &[
    "fill",
    "fill-opacity",
    "fill-rule",
    "stroke",
    "stroke-opacity",
    "stroke-width",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-dasharray",
    "stroke-dashoffset",
    "opacity",
    "transform",
    "paint-order",
    "vector-effect",
    "clip-path",
    "mask",
    "marker-start",
    "marker-mid",
    "marker-end",
    "visibility",
    "display",
];

/// Resolved style of one element. Unset fields inherit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub fill: Option<Paint>,
    pub fill_opacity: Option<f32>,
    pub fill_rule: Option<FillRule>,
    pub stroke: Option<Paint>,
    pub stroke_opacity: Option<f32>,
    pub stroke_width: Option<f32>,
    pub stroke_linecap: Option<LineCap>,
    pub stroke_linejoin: Option<LineJoin>,
    pub stroke_miterlimit: Option<f32>,
    /// Raw list as written; see `iconkit_css::normalize_dash_array`.
    pub stroke_dasharray: Option<Vec<f32>>,
    pub stroke_dashoffset: Option<f32>,
    pub opacity: Option<f32>,
    pub transform: Option<Transform>,
    pub paint_order: Option<PaintOrder>,
    pub vector_effect: Option<VectorEffect>,
    pub clip_path: Option<String>,
    pub mask: Option<String>,
    pub marker_start: Option<String>,
    pub marker_mid: Option<String>,
    pub marker_end: Option<String>,
    pub visibility: Option<Visibility>,
    pub display: Option<DisplayMode>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from resolved declarations. Values that fail to parse leave
    /// their field unset.
    pub fn from_declarations(declarations: &Declarations) -> Self {
        let mut style = Style::new();
        for (property, value) in declarations {
            style.apply(property, value);
        }
        style
    }

    /// Set one property from its text value. Returns whether the
    /// property was recognised and parsed.
    pub fn apply(&mut self, property: &str, value: &str) -> bool {
        let value = value.trim();
        let applied = match property {
            "fill" => set(&mut self.fill, Paint::parse(value)),
            "fill-opacity" => set(&mut self.fill_opacity, parse_opacity(value)),
            "fill-rule" => set(
                &mut self.fill_rule,
                keyword(value, &[("nonzero", FillRule::NonZero), ("evenodd", FillRule::EvenOdd)]),
            ),
            "stroke" => set(&mut self.stroke, Paint::parse(value)),
            "stroke-opacity" => set(&mut self.stroke_opacity, parse_opacity(value)),
            "stroke-width" => set(
                &mut self.stroke_width,
                parse_number(value).filter(|w| *w >= 0.0),
            ),
            "stroke-linecap" => set(
                &mut self.stroke_linecap,
                keyword(
                    value,
                    &[
                        ("butt", LineCap::Butt),
                        ("round", LineCap::Round),
                        ("square", LineCap::Square),
                    ],
                ),
            ),
            "stroke-linejoin" => set(
                &mut self.stroke_linejoin,
                keyword(
                    value,
                    &[
                        ("miter", LineJoin::Miter),
                        ("miter-clip", LineJoin::MiterClip),
                        ("round", LineJoin::Round),
                        ("bevel", LineJoin::Bevel),
                        ("arcs", LineJoin::Arcs),
                    ],
                ),
            ),
            "stroke-miterlimit" => set(
                &mut self.stroke_miterlimit,
                parse_number(value).filter(|m| *m >= 1.0),
            ),
            "stroke-dasharray" => set(&mut self.stroke_dasharray, parse_dash_array(value)),
            "stroke-dashoffset" => set(&mut self.stroke_dashoffset, parse_number(value)),
            "opacity" => set(&mut self.opacity, parse_opacity(value)),
            "transform" => set(&mut self.transform, Transform::parse(value)),
            "paint-order" => set(&mut self.paint_order, PaintOrder::parse(value)),
            "vector-effect" => set(
                &mut self.vector_effect,
                keyword(
                    value,
                    &[
                        ("none", VectorEffect::None),
                        ("non-scaling-stroke", VectorEffect::NonScalingStroke),
                    ],
                ),
            ),
            "clip-path" => set(&mut self.clip_path, parse_url(value)),
            "mask" => set(&mut self.mask, parse_url(value)),
            "marker-start" => set(&mut self.marker_start, parse_url(value)),
            "marker-mid" => set(&mut self.marker_mid, parse_url(value)),
            "marker-end" => set(&mut self.marker_end, parse_url(value)),
            "visibility" => set(
                &mut self.visibility,
                keyword(
                    value,
                    &[
                        ("visible", Visibility::Visible),
                        ("hidden", Visibility::Hidden),
                        ("collapse", Visibility::Collapse),
                    ],
                ),
            ),
            "display" => {
                let mode = if value.eq_ignore_ascii_case("none") {
                    DisplayMode::None
                } else {
                    DisplayMode::Inline
                };
                set(&mut self.display, Some(mode))
            }
            _ => false,
        };
        if !applied && STYLE_PROPERTIES.contains(&property) {
            trace!(property, value, "Ignoring unparseable style value");
        }
        applied
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Style::default()
    }

    /// Overlay `other` on `self`: fields set in `other` win.
    pub fn merge(&mut self, other: &Style) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field.clone();
                    }
                )*
            };
        }
        take!(
            fill,
            fill_opacity,
            fill_rule,
            stroke,
            stroke_opacity,
            stroke_width,
            stroke_linecap,
            stroke_linejoin,
            stroke_miterlimit,
            stroke_dasharray,
            stroke_dashoffset,
            opacity,
            transform,
            paint_order,
            vector_effect,
            clip_path,
            mask,
            marker_start,
            marker_mid,
            marker_end,
            visibility,
            display,
        );
    }

    /// Whether the element renders at all.
    pub fn is_displayed(&self) -> bool {
        self.display != Some(DisplayMode::None)
    }
}

fn set<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *slot = Some(value);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decls(pairs: &[(&str, &str)]) -> Declarations {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_paint_parse() {
        assert_eq!(Paint::parse("none"), Some(Paint::None));
        assert_eq!(Paint::parse("currentColor"), Some(Paint::CurrentColor));
        assert_eq!(
            Paint::parse("url(#gradient)"),
            Some(Paint::Url("gradient".into()))
        );
        assert_eq!(
            Paint::parse("#ff0000"),
            Some(Paint::Color(Color::from_rgb(255, 0, 0)))
        );
        assert_eq!(Paint::parse("not-a-color"), None);
    }

    #[test]
    fn test_transparent_is_not_none() {
        assert_eq!(Paint::parse("transparent"), Some(Paint::Color(Color::TRANSPARENT)));
        assert_ne!(Paint::parse("transparent"), Some(Paint::None));
        assert_ne!(Paint::parse("currentColor"), Some(Paint::None));
    }

    #[test]
    fn test_parse_url_with_fallback() {
        assert_eq!(parse_url("url('#g') red"), Some("g".to_string()));
        assert_eq!(parse_url("url()"), None);
        assert_eq!(parse_url("none"), None);
    }

    #[test]
    fn test_opacity() {
        assert_eq!(parse_opacity("0.5"), Some(0.5));
        assert_eq!(parse_opacity("50%"), Some(0.5));
        assert_eq!(parse_opacity("2"), Some(1.0));
        assert_eq!(parse_opacity("half"), None);
    }

    #[test]
    fn test_from_declarations() {
        let style = Style::from_declarations(&decls(&[
            ("fill", "none"),
            ("stroke", "currentColor"),
            ("stroke-width", "2"),
            ("stroke-linecap", "round"),
            ("stroke-dasharray", "5 3 2"),
            ("clip-path", "url(#clip)"),
            ("transform", "rotate(45)"),
            ("display", "none"),
        ]));
        assert_eq!(style.fill, Some(Paint::None));
        assert_eq!(style.stroke, Some(Paint::CurrentColor));
        assert_eq!(style.stroke_width, Some(2.0));
        assert_eq!(style.stroke_linecap, Some(LineCap::Round));
        assert_eq!(style.stroke_dasharray, Some(vec![5.0, 3.0, 2.0]));
        assert_eq!(style.clip_path.as_deref(), Some("clip"));
        assert!(style.transform.is_some());
        assert!(!style.is_displayed());
    }

    #[test]
    fn test_bad_values_stay_unset() {
        let style = Style::from_declarations(&decls(&[
            ("stroke-width", "wide"),
            ("fill-rule", "sometimes"),
            ("font-weight", "bold"),
        ]));
        assert!(style.is_empty());
    }

    #[test]
    fn test_merge_overrides_set_fields() {
        let mut base = Style::from_declarations(&decls(&[("fill", "red"), ("opacity", "0.5")]));
        let top = Style::from_declarations(&decls(&[("fill", "blue")]));
        base.merge(&top);
        assert_eq!(base.fill, Some(Paint::Color(Color::from_rgb(0, 0, 255))));
        assert_eq!(base.opacity, Some(0.5));
    }

    #[test]
    fn test_paint_order() {
        assert_eq!(
            PaintOrder::parse("stroke"),
            Some(PaintOrder([PaintLayer::Stroke, PaintLayer::Fill, PaintLayer::Markers]))
        );
        assert_eq!(PaintOrder::parse("normal"), Some(PaintOrder::default()));
        assert_eq!(PaintOrder::parse("fill fill"), None);
    }
}
