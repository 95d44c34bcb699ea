//! SMIL animation elements: `<animate>`, `<animateTransform>` and
//! `<animateMotion>`.

use crate::descriptor::{AnimationDescriptor, MotionRotate, TransformKind, Tween};
use crate::timing::{AnimationTiming, CalcMode};
use iconkit_css::{parse_color, parse_dash_array, parse_number, AnimationFillMode, Iterations};
use iconkit_path::{parse_number_list, parse_path, PathCommand};
use std::collections::HashMap;
use tracing::trace;

/// Parse one animation element into a descriptor.
///
/// `tag` is the element name (any case). Unknown elements, unknown
/// `attributeName` values and unusable values all yield `None`.
///
/// `dur="indefinite"` also yields `None`: the value never leaves its
/// start, so there is nothing to animate. A missing or unparsable `dur`
/// is a zero duration.
pub fn parse_smil(tag: &str, attrs: &HashMap<String, String>) -> Option<AnimationDescriptor> {
    let tag = tag.to_ascii_lowercase();
    if attrs
        .get("dur")
        .is_some_and(|dur| dur.trim().eq_ignore_ascii_case("indefinite"))
    {
        trace!(tag = %tag, "Ignoring animation with indefinite duration");
        return None;
    }
    let descriptor = match tag.as_str() {
        "animate" => parse_animate(attrs),
        "animatetransform" => parse_animate_transform(attrs),
        "animatemotion" => parse_animate_motion(attrs),
        _ => None,
    };
    if descriptor.is_none() {
        trace!(
            tag = %tag,
            attribute = attrs.get("attributeName").map(String::as_str).unwrap_or(""),
            "No descriptor for animation element"
        );
    }
    descriptor
}

/// The id an animation element targets through `href`/`xlink:href`.
pub fn smil_target(attrs: &HashMap<String, String>) -> Option<&str> {
    attrs
        .get("href")
        .or_else(|| attrs.get("xlink:href"))
        .and_then(|href| href.trim().strip_prefix('#'))
        .filter(|id| !id.is_empty())
}

/// Parse a SMIL clock value into milliseconds.
///
/// Accepts `hh:mm:ss(.f)`, `mm:ss(.f)`, and timecounts with `h`, `min`,
/// `s` or `ms`. A bare number is taken as milliseconds.
pub fn parse_clock_value(value: &str) -> Option<f32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if value.contains(':') {
        let parts: Vec<f32> = value
            .split(':')
            .map(|p| p.trim().parse::<f32>().ok())
            .collect::<Option<_>>()?;
        let seconds = match parts[..] {
            [m, s] => m * 60.0 + s,
            [h, m, s] => h * 3600.0 + m * 60.0 + s,
            _ => return None,
        };
        return Some(seconds * 1000.0).filter(|ms| ms.is_finite());
    }

    let (number, factor) = if let Some(n) = value.strip_suffix("ms") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("min") {
        (n, 60_000.0)
    } else if let Some(n) = value.strip_suffix('h') {
        (n, 3_600_000.0)
    } else if let Some(n) = value.strip_suffix('s') {
        (n, 1000.0)
    } else {
        (value, 1.0)
    };
    number
        .trim()
        .parse::<f32>()
        .ok()
        .map(|v| v * factor)
        .filter(|ms| ms.is_finite())
}

// ==================== Timing ====================

fn smil_timing(attrs: &HashMap<String, String>, default_calc_mode: CalcMode) -> AnimationTiming {
    let get = |name: &str| attrs.get(name).map(String::as_str);

    let duration = get("dur").and_then(parse_clock_value).unwrap_or(0.0).max(0.0);

    // Only the first offset of a begin list; event-based begins start at 0.
    let delay = get("begin")
        .and_then(|b| b.split(';').next())
        .map(|b| {
            parse_clock_value(b).unwrap_or_else(|| {
                trace!(begin = b, "Unsupported begin value");
                0.0
            })
        })
        .unwrap_or(0.0);

    let iterations = get("repeatCount")
        .and_then(Iterations::parse)
        .unwrap_or_default();

    let fill_mode = match get("fill").map(str::trim) {
        Some("freeze") => AnimationFillMode::Forwards,
        _ => AnimationFillMode::None,
    };

    let mut timing = AnimationTiming::new(duration)
        .with_delay(delay)
        .with_iterations(iterations)
        .with_fill_mode(fill_mode);

    timing.calc_mode = get("calcMode")
        .and_then(CalcMode::parse)
        .unwrap_or(default_calc_mode);

    if timing.calc_mode == CalcMode::Spline {
        timing.key_splines = get("keySplines").and_then(first_key_spline);
    }

    timing
}

/// First `x1 y1 x2 y2` group of a `keySplines` list.
fn first_key_spline(value: &str) -> Option<[f32; 4]> {
    let first = value.split(';').next()?;
    match parse_number_list(first)[..] {
        [x1, y1, x2, y2, ..] if (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2) => {
            Some([x1, y1, x2, y2])
        }
        _ => None,
    }
}

// ==================== Values ====================

fn value_list(attrs: &HashMap<String, String>) -> Vec<&str> {
    attrs
        .get("values")
        .map(|v| v.split(';').map(str::trim).filter(|v| !v.is_empty()).collect())
        .unwrap_or_default()
}

/// Numeric range: explicit from/to, else min/max of `values`, else
/// from+by, else the first/last available value.
fn numeric_range(attrs: &HashMap<String, String>) -> Option<(f32, f32)> {
    let number = |name: &str| attrs.get(name).and_then(|v| parse_number(v));
    let from = number("from");
    let to = number("to");
    let by = number("by");
    let values: Vec<f32> = value_list(attrs).into_iter().filter_map(parse_number).collect();

    match (from, to, by) {
        (Some(from), Some(to), _) => Some((from, to)),
        _ if values.len() >= 2 => {
            let min = values.iter().copied().fold(f32::INFINITY, f32::min);
            let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            Some((min, max))
        }
        (from, None, Some(by)) => {
            let from = from.unwrap_or(0.0);
            Some((from, from + by))
        }
        _ => {
            let available: Vec<f32> = from.into_iter().chain(to).chain(values).collect();
            Some((*available.first()?, *available.last()?))
        }
    }
}

/// Raw start/end text for list-valued attributes: explicit from/to, else
/// the first and last `values` entries, else whatever is available.
fn endpoints(attrs: &HashMap<String, String>) -> Option<(&str, &str)> {
    let from = attrs.get("from").map(String::as_str);
    let to = attrs.get("to").map(String::as_str);
    if let (Some(from), Some(to)) = (from, to) {
        return Some((from, to));
    }
    let available: Vec<&str> = from.into_iter().chain(value_list(attrs)).chain(to).collect();
    Some((*available.first()?, *available.last()?))
}

// ==================== <animate> ====================

fn parse_animate(attrs: &HashMap<String, String>) -> Option<AnimationDescriptor> {
    let attribute = attrs.get("attributeName")?.trim();
    let timing = smil_timing(attrs, CalcMode::Linear);

    match attribute {
        "stroke-dashoffset" => {
            let (from, to) = numeric_range(attrs)?;
            Some(AnimationDescriptor::stroke_draw(from, to, timing))
        }
        name if AnimationDescriptor::is_numeric_property(name) => {
            let (from, to) = numeric_range(attrs)?;
            AnimationDescriptor::numeric(name, from, to, timing)
        }
        "stroke-dasharray" => {
            let (from, to) = endpoints(attrs)?;
            Some(AnimationDescriptor::StrokeDashArray(Tween::new(
                parse_dash_array(from)?,
                parse_dash_array(to)?,
                timing,
            )))
        }
        "fill" | "stroke" => {
            let (from, to) = endpoints(attrs)?;
            let tween = Tween::new(parse_color(from)?, parse_color(to)?, timing);
            Some(if attribute == "fill" {
                AnimationDescriptor::FillColor(tween)
            } else {
                AnimationDescriptor::StrokeColor(tween)
            })
        }
        "d" => {
            let (from, to) = endpoints(attrs)?;
            let (from, to) = match (parse_path(from), parse_path(to)) {
                (Ok(from), Ok(to)) if !from.is_empty() && !to.is_empty() => (from, to),
                _ => {
                    trace!("Dropping path morph with unusable path data");
                    return None;
                }
            };
            Some(AnimationDescriptor::PathMorph(Tween::new(from, to, timing)))
        }
        "points" => {
            let (from, to) = endpoints(attrs)?;
            let from = iconkit_path::parse_points(from);
            let to = iconkit_path::parse_points(to);
            if from.is_empty() || to.is_empty() {
                return None;
            }
            Some(AnimationDescriptor::PointsMorph(Tween::new(from, to, timing)))
        }
        _ => None,
    }
}

// ==================== <animateTransform> ====================

fn parse_animate_transform(attrs: &HashMap<String, String>) -> Option<AnimationDescriptor> {
    if let Some(attribute) = attrs.get("attributeName") {
        let attribute = attribute.trim();
        if attribute != "transform" && !attribute.ends_with("Transform") {
            return None;
        }
    }

    let kind = match attrs.get("type") {
        Some(t) => TransformKind::parse(t)?,
        None => TransformKind::Translate,
    };
    let timing = smil_timing(attrs, CalcMode::Linear);

    let parse = |text: &str| transform_values(kind, text);
    let from = attrs.get("from").and_then(|v| parse(v.as_str()));
    let to = attrs.get("to").and_then(|v| parse(v.as_str()));
    let by = attrs.get("by").and_then(|v| parse(v.as_str()));
    let values: Vec<[f32; 3]> = value_list(attrs).into_iter().filter_map(parse).collect();

    let (from, to) = match (from, to, by) {
        (Some(from), Some(to), _) => (from, to),
        _ if values.len() >= 2 => {
            let min = values.iter().copied().min_by(|a, b| a[0].total_cmp(&b[0]))?;
            let max = values.iter().copied().max_by(|a, b| a[0].total_cmp(&b[0]))?;
            (min, max)
        }
        (from, None, Some(by)) => {
            let from = from.unwrap_or_else(|| kind.identity());
            (from, [from[0] + by[0], from[1] + by[1], from[2] + by[2]])
        }
        _ => {
            let available: Vec<[f32; 3]> = from.into_iter().chain(to).chain(values).collect();
            (*available.first()?, *available.last()?)
        }
    };

    Some(AnimationDescriptor::Transform {
        kind,
        tween: Tween::new(from, to, timing),
    })
}

/// Arguments of one transform value, padded per kind.
fn transform_values(kind: TransformKind, text: &str) -> Option<[f32; 3]> {
    let numbers = parse_number_list(text);
    let first = *numbers.first()?;
    let second = numbers.get(1).copied();
    let third = numbers.get(2).copied();

    Some(match kind {
        TransformKind::Translate => [first, second.unwrap_or(0.0), 0.0],
        TransformKind::Scale => [first, second.unwrap_or(first), 0.0],
        TransformKind::Rotate => [first, second.unwrap_or(0.0), third.unwrap_or(0.0)],
        _ => [first, 0.0, 0.0],
    })
}

// ==================== <animateMotion> ====================

fn parse_animate_motion(attrs: &HashMap<String, String>) -> Option<AnimationDescriptor> {
    let timing = smil_timing(attrs, CalcMode::Paced);

    let path = match attrs.get("path") {
        Some(data) => match parse_path(data) {
            Ok(path) => path,
            Err(err) => {
                trace!(error = %err, "Dropping animateMotion with bad path");
                return None;
            }
        },
        None => motion_path_from_points(attrs)?,
    };
    if path.is_empty() {
        return None;
    }

    let rotate = match attrs.get("rotate").map(|r| r.trim()) {
        Some("auto") => MotionRotate::Auto,
        Some("auto-reverse") => MotionRotate::AutoReverse,
        Some(angle) => MotionRotate::Fixed(parse_number(angle).unwrap_or(0.0)),
        None => MotionRotate::default(),
    };

    Some(AnimationDescriptor::Motion {
        path,
        rotate,
        timing,
    })
}

/// A polyline path through `values`, or from `from` to `to`/`from + by`.
fn motion_path_from_points(attrs: &HashMap<String, String>) -> Option<Vec<PathCommand>> {
    let point = |text: &str| match parse_number_list(text)[..] {
        [x, y, ..] => Some((x, y)),
        _ => None,
    };

    let values: Vec<(f32, f32)> = value_list(attrs).into_iter().filter_map(point).collect();
    let points = if values.len() >= 2 {
        values
    } else {
        let from = attrs
            .get("from")
            .and_then(|v| point(v.as_str()))
            .unwrap_or((0.0, 0.0));
        let to = match (attrs.get("to"), attrs.get("by")) {
            (Some(to), _) => point(to.as_str())?,
            (None, Some(by)) => {
                let (dx, dy) = point(by.as_str())?;
                (from.0 + dx, from.1 + dy)
            }
            (None, None) => return None,
        };
        vec![from, to]
    };

    let mut path = Vec::with_capacity(points.len());
    for (i, (x, y)) in points.into_iter().enumerate() {
        path.push(if i == 0 {
            PathCommand::MoveTo(x, y)
        } else {
            PathCommand::LineTo(x, y)
        });
    }
    Some(path)
}
