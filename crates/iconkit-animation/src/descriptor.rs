//! Animation descriptors: one variant per animatable property.

use crate::timing::AnimationTiming;
use iconkit_css::Color;
use iconkit_path::PathCommand;

/// A start value, an end value and the timing that moves between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
    pub timing: AnimationTiming,
}

impl<T> Tween<T> {
    pub fn new(from: T, to: T, timing: AnimationTiming) -> Self {
        Self { from, to, timing }
    }
}

/// Transform function animated by a [`AnimationDescriptor::Transform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Translate,
    TranslateX,
    TranslateY,
    Scale,
    ScaleX,
    ScaleY,
    Rotate,
    SkewX,
    SkewY,
}

impl TransformKind {
    /// Values that leave the shape unchanged.
    pub fn identity(&self) -> [f32; 3] {
        match self {
            TransformKind::Scale | TransformKind::ScaleX | TransformKind::ScaleY => [1.0, 1.0, 0.0],
            _ => [0.0; 3],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::Translate => "translate",
            TransformKind::TranslateX => "translateX",
            TransformKind::TranslateY => "translateY",
            TransformKind::Scale => "scale",
            TransformKind::ScaleX => "scaleX",
            TransformKind::ScaleY => "scaleY",
            TransformKind::Rotate => "rotate",
            TransformKind::SkewX => "skewX",
            TransformKind::SkewY => "skewY",
        }
    }

    /// Parse a transform function name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "translate" => Some(TransformKind::Translate),
            "translatex" => Some(TransformKind::TranslateX),
            "translatey" => Some(TransformKind::TranslateY),
            "scale" => Some(TransformKind::Scale),
            "scalex" => Some(TransformKind::ScaleX),
            "scaley" => Some(TransformKind::ScaleY),
            "rotate" => Some(TransformKind::Rotate),
            "skewx" => Some(TransformKind::SkewX),
            "skewy" => Some(TransformKind::SkewY),
            _ => None,
        }
    }
}

/// Orientation along a motion path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionRotate {
    /// Fixed angle in degrees.
    Fixed(f32),
    /// Follow the path tangent.
    Auto,
    /// Tangent plus 180 degrees.
    AutoReverse,
}

impl Default for MotionRotate {
    fn default() -> Self {
        MotionRotate::Fixed(0.0)
    }
}

/// One animated property of one node.
///
/// Descriptors are built once while parsing and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationDescriptor {
    Opacity(Tween<f32>),
    FillOpacity(Tween<f32>),
    StrokeOpacity(Tween<f32>),
    StrokeWidth(Tween<f32>),
    StrokeDashArray(Tween<Vec<f32>>),
    StrokeDashOffset(Tween<f32>),
    /// Dash-offset reveal. `reverse` is set when the offset grows, which
    /// un-draws the stroke.
    StrokeDraw { tween: Tween<f32>, reverse: bool },
    Cx(Tween<f32>),
    Cy(Tween<f32>),
    R(Tween<f32>),
    Rx(Tween<f32>),
    Ry(Tween<f32>),
    X(Tween<f32>),
    Y(Tween<f32>),
    Width(Tween<f32>),
    Height(Tween<f32>),
    X1(Tween<f32>),
    Y1(Tween<f32>),
    X2(Tween<f32>),
    Y2(Tween<f32>),
    PathMorph(Tween<Vec<PathCommand>>),
    PointsMorph(Tween<Vec<(f32, f32)>>),
    /// Values are the function arguments, padded to three (rotate keeps
    /// its center in slots 1 and 2).
    Transform { kind: TransformKind, tween: Tween<[f32; 3]> },
    Motion { path: Vec<PathCommand>, rotate: MotionRotate, timing: AnimationTiming },
    FillColor(Tween<Color>),
    StrokeColor(Tween<Color>),
}

impl AnimationDescriptor {
    /// Descriptor for a numeric property by its attribute/CSS name.
    pub fn numeric(property: &str, from: f32, to: f32, timing: AnimationTiming) -> Option<Self> {
        let tween = Tween::new(from, to, timing);
        let descriptor = match property {
            "opacity" => AnimationDescriptor::Opacity(tween),
            "fill-opacity" => AnimationDescriptor::FillOpacity(tween),
            "stroke-opacity" => AnimationDescriptor::StrokeOpacity(tween),
            "stroke-width" => AnimationDescriptor::StrokeWidth(tween),
            "stroke-dashoffset" => AnimationDescriptor::StrokeDashOffset(tween),
            "cx" => AnimationDescriptor::Cx(tween),
            "cy" => AnimationDescriptor::Cy(tween),
            "r" => AnimationDescriptor::R(tween),
            "rx" => AnimationDescriptor::Rx(tween),
            "ry" => AnimationDescriptor::Ry(tween),
            "x" => AnimationDescriptor::X(tween),
            "y" => AnimationDescriptor::Y(tween),
            "width" => AnimationDescriptor::Width(tween),
            "height" => AnimationDescriptor::Height(tween),
            "x1" => AnimationDescriptor::X1(tween),
            "y1" => AnimationDescriptor::Y1(tween),
            "x2" => AnimationDescriptor::X2(tween),
            "y2" => AnimationDescriptor::Y2(tween),
            _ => return None,
        };
        Some(descriptor)
    }

    /// Whether `property` names a numeric descriptor.
    pub fn is_numeric_property(property: &str) -> bool {
        Self::numeric(property, 0.0, 0.0, AnimationTiming::default()).is_some()
    }

    /// A stroke-draw reveal; direction is inferred from the offsets.
    pub fn stroke_draw(from: f32, to: f32, timing: AnimationTiming) -> Self {
        AnimationDescriptor::StrokeDraw {
            tween: Tween::new(from, to, timing),
            reverse: to > from,
        }
    }

    pub fn timing(&self) -> &AnimationTiming {
        match self {
            AnimationDescriptor::Opacity(t)
            | AnimationDescriptor::FillOpacity(t)
            | AnimationDescriptor::StrokeOpacity(t)
            | AnimationDescriptor::StrokeWidth(t)
            | AnimationDescriptor::StrokeDashOffset(t)
            | AnimationDescriptor::Cx(t)
            | AnimationDescriptor::Cy(t)
            | AnimationDescriptor::R(t)
            | AnimationDescriptor::Rx(t)
            | AnimationDescriptor::Ry(t)
            | AnimationDescriptor::X(t)
            | AnimationDescriptor::Y(t)
            | AnimationDescriptor::Width(t)
            | AnimationDescriptor::Height(t)
            | AnimationDescriptor::X1(t)
            | AnimationDescriptor::Y1(t)
            | AnimationDescriptor::X2(t)
            | AnimationDescriptor::Y2(t) => &t.timing,
            AnimationDescriptor::StrokeDraw { tween, .. } => &tween.timing,
            AnimationDescriptor::StrokeDashArray(t) => &t.timing,
            AnimationDescriptor::PathMorph(t) => &t.timing,
            AnimationDescriptor::PointsMorph(t) => &t.timing,
            AnimationDescriptor::Transform { tween, .. } => &tween.timing,
            AnimationDescriptor::Motion { timing, .. } => timing,
            AnimationDescriptor::FillColor(t) | AnimationDescriptor::StrokeColor(t) => &t.timing,
        }
    }

    /// Name of the animated attribute or property.
    pub fn property_name(&self) -> &'static str {
        match self {
            AnimationDescriptor::Opacity(_) => "opacity",
            AnimationDescriptor::FillOpacity(_) => "fill-opacity",
            AnimationDescriptor::StrokeOpacity(_) => "stroke-opacity",
            AnimationDescriptor::StrokeWidth(_) => "stroke-width",
            AnimationDescriptor::StrokeDashArray(_) => "stroke-dasharray",
            AnimationDescriptor::StrokeDashOffset(_) | AnimationDescriptor::StrokeDraw { .. } => {
                "stroke-dashoffset"
            }
            AnimationDescriptor::Cx(_) => "cx",
            AnimationDescriptor::Cy(_) => "cy",
            AnimationDescriptor::R(_) => "r",
            AnimationDescriptor::Rx(_) => "rx",
            AnimationDescriptor::Ry(_) => "ry",
            AnimationDescriptor::X(_) => "x",
            AnimationDescriptor::Y(_) => "y",
            AnimationDescriptor::Width(_) => "width",
            AnimationDescriptor::Height(_) => "height",
            AnimationDescriptor::X1(_) => "x1",
            AnimationDescriptor::Y1(_) => "y1",
            AnimationDescriptor::X2(_) => "x2",
            AnimationDescriptor::Y2(_) => "y2",
            AnimationDescriptor::PathMorph(_) => "d",
            AnimationDescriptor::PointsMorph(_) => "points",
            AnimationDescriptor::Transform { .. } => "transform",
            AnimationDescriptor::Motion { .. } => "motion",
            AnimationDescriptor::FillColor(_) => "fill",
            AnimationDescriptor::StrokeColor(_) => "stroke",
        }
    }

    /// `(from, to)` for scalar descriptors.
    pub fn scalar_range(&self) -> Option<(f32, f32)> {
        match self {
            AnimationDescriptor::Opacity(t)
            | AnimationDescriptor::FillOpacity(t)
            | AnimationDescriptor::StrokeOpacity(t)
            | AnimationDescriptor::StrokeWidth(t)
            | AnimationDescriptor::StrokeDashOffset(t)
            | AnimationDescriptor::Cx(t)
            | AnimationDescriptor::Cy(t)
            | AnimationDescriptor::R(t)
            | AnimationDescriptor::Rx(t)
            | AnimationDescriptor::Ry(t)
            | AnimationDescriptor::X(t)
            | AnimationDescriptor::Y(t)
            | AnimationDescriptor::Width(t)
            | AnimationDescriptor::Height(t)
            | AnimationDescriptor::X1(t)
            | AnimationDescriptor::Y1(t)
            | AnimationDescriptor::X2(t)
            | AnimationDescriptor::Y2(t) => Some((t.from, t.to)),
            AnimationDescriptor::StrokeDraw { tween, .. } => Some((tween.from, tween.to)),
            _ => None,
        }
    }
}
