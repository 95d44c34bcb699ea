//! CSS `@keyframes` to animation descriptors.

use crate::descriptor::{AnimationDescriptor, TransformKind, Tween};
use crate::timing::AnimationTiming;
use iconkit_css::{
    parse_angle, parse_color, parse_dash_array, parse_number, AnimationShorthand, Declarations,
    Keyframes, Stylesheet,
};
use iconkit_path::parse_path;
use tracing::trace;

/// Descriptors for every animation in `animations` that names keyframes
/// present in `stylesheet`. Unknown names are skipped.
pub fn resolve_css_animations(
    stylesheet: &Stylesheet,
    animations: &[AnimationShorthand],
    base: &Declarations,
) -> Vec<AnimationDescriptor> {
    let mut descriptors = Vec::new();
    for animation in animations {
        let Some(name) = animation.name.as_deref() else {
            continue;
        };
        match stylesheet.keyframes(name) {
            Some(keyframes) => {
                descriptors.extend(descriptors_from_keyframes(keyframes, animation, base))
            }
            None => trace!(name, "No @keyframes for animation"),
        }
    }
    descriptors
}

/// One descriptor per animated property.
///
/// Only the first and last keyframe holding a property are used. A
/// property set in a single keyframe takes its other end from `base`
/// (the element's resolved declarations), and is skipped without one.
pub fn descriptors_from_keyframes(
    keyframes: &Keyframes,
    animation: &AnimationShorthand,
    base: &Declarations,
) -> Vec<AnimationDescriptor> {
    let timing = AnimationTiming::from_shorthand(animation);
    let mut descriptors = Vec::new();

    for property in keyframes.properties() {
        let Some((from, to)) = endpoint_values(keyframes, property, base) else {
            trace!(property, "Keyframe property has no second value");
            continue;
        };
        match descriptors_for_property(property, from, to, &timing) {
            Some(found) => descriptors.extend(found),
            None => trace!(property, from, to, "Skipping keyframe property"),
        }
    }

    descriptors
}

fn endpoint_values<'a>(
    keyframes: &'a Keyframes,
    property: &str,
    base: &'a Declarations,
) -> Option<(&'a str, &'a str)> {
    let holding: Vec<(f32, &str)> = keyframes
        .frames
        .iter()
        .filter_map(|frame| {
            frame
                .declarations
                .get(property)
                .map(|v| (frame.offset, v.as_str()))
        })
        .collect();

    match holding[..] {
        [] => None,
        [(offset, value)] => {
            let implicit = base.get(property)?.as_str();
            if offset == 0.0 {
                Some((value, implicit))
            } else {
                Some((implicit, value))
            }
        }
        [(_, first), .., (_, last)] => Some((first, last)),
    }
}

fn descriptors_for_property(
    property: &str,
    from: &str,
    to: &str,
    timing: &AnimationTiming,
) -> Option<Vec<AnimationDescriptor>> {
    let timing = timing.clone();
    let single = |d: AnimationDescriptor| Some(vec![d]);

    match property {
        "opacity" | "fill-opacity" | "stroke-opacity" => {
            let d = AnimationDescriptor::numeric(property, parse_opacity(from)?, parse_opacity(to)?, timing)?;
            single(d)
        }
        p if AnimationDescriptor::is_numeric_property(p) => {
            let d = AnimationDescriptor::numeric(p, parse_number(from)?, parse_number(to)?, timing)?;
            single(d)
        }
        "stroke-dasharray" => single(AnimationDescriptor::StrokeDashArray(Tween::new(
            parse_dash_array(from)?,
            parse_dash_array(to)?,
            timing,
        ))),
        "fill" => single(AnimationDescriptor::FillColor(Tween::new(
            parse_color(from)?,
            parse_color(to)?,
            timing,
        ))),
        "stroke" => single(AnimationDescriptor::StrokeColor(Tween::new(
            parse_color(from)?,
            parse_color(to)?,
            timing,
        ))),
        "d" => {
            let from = parse_path(css_path_data(from)?).ok()?;
            let to = parse_path(css_path_data(to)?).ok()?;
            if from.is_empty() || to.is_empty() {
                return None;
            }
            single(AnimationDescriptor::PathMorph(Tween::new(from, to, timing)))
        }
        "transform" => {
            let pairs = zip_transforms(&parse_css_transform(from)?, &parse_css_transform(to)?);
            if pairs.is_empty() {
                return None;
            }
            Some(
                pairs
                    .into_iter()
                    .map(|(kind, from, to)| AnimationDescriptor::Transform {
                        kind,
                        tween: Tween::new(from, to, timing.clone()),
                    })
                    .collect(),
            )
        }
        _ => None,
    }
}

/// Opacity as a number or a percentage.
fn parse_opacity(value: &str) -> Option<f32> {
    let value = value.trim();
    match value.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f32>().ok().map(|v| v / 100.0),
        None => parse_number(value),
    }
}

/// The string inside `path("...")`.
fn css_path_data(value: &str) -> Option<&str> {
    let inner = value
        .trim()
        .strip_prefix("path(")?
        .strip_suffix(')')?
        .trim();
    Some(inner.trim_matches(|c| c == '"' || c == '\''))
}

// ==================== Transform functions ====================

/// Parse a CSS transform list into (kind, arguments). `none` is empty.
fn parse_css_transform(value: &str) -> Option<Vec<(TransformKind, [f32; 3])>> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("none") {
        return Some(Vec::new());
    }

    let mut functions = Vec::new();
    let mut rest = value;
    while !rest.is_empty() {
        let open = rest.find('(')?;
        let close = open + rest[open..].find(')')?;
        let kind = TransformKind::parse(&rest[..open])?;
        let args: Vec<&str> = rest[open + 1..close]
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|a| !a.is_empty())
            .collect();
        functions.push((kind, transform_arguments(kind, &args)?));
        rest = rest[close + 1..].trim_start();
    }
    Some(functions)
}

fn transform_arguments(kind: TransformKind, args: &[&str]) -> Option<[f32; 3]> {
    let first = *args.first()?;
    match kind {
        TransformKind::Translate => {
            let x = parse_number(first)?;
            let y = match args.get(1) {
                Some(y) => parse_number(y)?,
                None => 0.0,
            };
            Some([x, y, 0.0])
        }
        TransformKind::TranslateX | TransformKind::TranslateY => Some([parse_number(first)?, 0.0, 0.0]),
        TransformKind::Scale => {
            let sx = parse_number(first)?;
            let sy = match args.get(1) {
                Some(sy) => parse_number(sy)?,
                None => sx,
            };
            Some([sx, sy, 0.0])
        }
        TransformKind::ScaleX | TransformKind::ScaleY => {
            let s = parse_number(first)?;
            Some([s, s, 0.0])
        }
        TransformKind::Rotate | TransformKind::SkewX | TransformKind::SkewY => {
            Some([parse_angle(first)?, 0.0, 0.0])
        }
    }
}

/// Pair functions position by position. A missing side is the identity of
/// the other side's kind; mismatched kinds are dropped.
fn zip_transforms(
    from: &[(TransformKind, [f32; 3])],
    to: &[(TransformKind, [f32; 3])],
) -> Vec<(TransformKind, [f32; 3], [f32; 3])> {
    let len = from.len().max(to.len());
    let mut pairs = Vec::with_capacity(len);

    for i in 0..len {
        match (from.get(i), to.get(i)) {
            (Some(&(a_kind, a)), Some(&(b_kind, b))) if a_kind == b_kind => pairs.push((a_kind, a, b)),
            (Some(&(a_kind, _)), Some(&(b_kind, _))) => {
                trace!(from = a_kind.name(), to = b_kind.name(), "Mismatched transform functions");
            }
            (Some(&(kind, a)), None) => pairs.push((kind, a, kind.identity())),
            (None, Some(&(kind, b))) => pairs.push((kind, kind.identity(), b)),
            (None, None) => {}
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use iconkit_css::{parse_declarations, Iterations};

    fn sheet(css: &str) -> Stylesheet {
        Stylesheet::parse(css)
    }

    #[test]
    fn test_first_and_last_keyframe_only() {
        let sheet = sheet("@keyframes pulse { 0% { opacity: 0.2 } 50% { opacity: 1 } 100% { opacity: 0.6 } }");
        let animation = AnimationShorthand::parse("pulse 1s infinite");
        let found = descriptors_from_keyframes(sheet.keyframes("pulse").unwrap(), &animation, &Declarations::new());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].scalar_range(), Some((0.2, 0.6)));
        assert_eq!(found[0].timing().iterations, Iterations::Infinite);
    }

    #[test]
    fn test_implicit_value_from_base() {
        let sheet = sheet("@keyframes fade { to { opacity: 0 } }");
        let animation = AnimationShorthand::parse("fade 300ms");
        let base = parse_declarations("opacity: 0.8");
        let found = descriptors_from_keyframes(sheet.keyframes("fade").unwrap(), &animation, &base);
        assert_eq!(found[0].scalar_range(), Some((0.8, 0.0)));

        let none = descriptors_from_keyframes(sheet.keyframes("fade").unwrap(), &animation, &Declarations::new());
        assert!(none.is_empty());
    }

    #[test]
    fn test_transform_keyframes() {
        let sheet = sheet("@keyframes spin { from { transform: rotate(0deg) } to { transform: rotate(1turn) } }");
        let animation = AnimationShorthand::parse("spin 1s linear infinite");
        let found = descriptors_from_keyframes(sheet.keyframes("spin").unwrap(), &animation, &Declarations::new());
        match &found[..] {
            [AnimationDescriptor::Transform { kind, tween }] => {
                assert_eq!(*kind, TransformKind::Rotate);
                assert_eq!(tween.from[0], 0.0);
                assert_eq!(tween.to[0], 360.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_transform_none_and_multiple_functions() {
        let sheet = sheet(
            "@keyframes pop { from { transform: none } to { transform: translate(2px, 4px) scale(1.5) } }",
        );
        let animation = AnimationShorthand::parse("pop 1s");
        let found = descriptors_from_keyframes(sheet.keyframes("pop").unwrap(), &animation, &Declarations::new());
        assert_eq!(found.len(), 2);
        match &found[1] {
            AnimationDescriptor::Transform { kind, tween } => {
                assert_eq!(*kind, TransformKind::Scale);
                assert_eq!(tween.from, [1.0, 1.0, 0.0]);
                assert_eq!(tween.to, [1.5, 1.5, 0.0]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_css_dashoffset_is_plain_offset() {
        let sheet = sheet("@keyframes draw { from { stroke-dashoffset: 100 } to { stroke-dashoffset: 0 } }");
        let animation = AnimationShorthand::parse("draw 2s ease-out forwards");
        let found = descriptors_from_keyframes(sheet.keyframes("draw").unwrap(), &animation, &Declarations::new());
        assert!(matches!(found[0], AnimationDescriptor::StrokeDashOffset(_)));
        assert_eq!(found[0].timing().key_splines, Some([0.0, 0.0, 0.58, 1.0]));
    }

    #[test]
    fn test_colors_paths_and_unknown_properties() {
        let sheet = sheet(
            "@keyframes k { from { fill: red; d: path('M0 0 L1 1'); font-size: 1px } \
             to { fill: blue; d: path('M0 0 L2 2'); font-size: 2px } }",
        );
        let animation = AnimationShorthand::parse("k 1s");
        let found = descriptors_from_keyframes(sheet.keyframes("k").unwrap(), &animation, &Declarations::new());
        let names: Vec<&str> = found.iter().map(|d| d.property_name()).collect();
        assert_eq!(names, vec!["fill", "d"]);
    }

    #[test]
    fn test_resolve_skips_unknown_names() {
        let sheet = sheet("@keyframes a { from { r: 1 } to { r: 2 } }");
        let animations = vec![AnimationShorthand::parse("a 1s"), AnimationShorthand::parse("missing 1s")];
        let found = resolve_css_animations(&sheet, &animations, &Declarations::new());
        assert_eq!(found.len(), 1);
        assert!(matches!(found[0], AnimationDescriptor::R(_)));
    }

    #[test]
    fn test_opacity_percent() {
        assert_eq!(parse_opacity("50%"), Some(0.5));
        assert_eq!(parse_opacity("0.3"), Some(0.3));
    }
}
