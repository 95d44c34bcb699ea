//! Scene builder: markup to [`Icon`].
//!
//! ```text
//! markup
//!   ├── extract_stylesheet ──> Stylesheet + markup without <style>
//!   ├── href pre-pass ───────> animations keyed by target id
//!   └── Scanner
//!          └── element()       shape / group / container / gradient
//!                 ├── Style    attributes < rules < inline style
//!                 └── animations: child SMIL, href SMIL, CSS keyframes
//! ```

use crate::config::{BuildOptions, PathErrorPolicy};
use crate::geometry::{CornerRadii, PreserveAspectRatio, SvgLength, ViewBox};
use crate::icon::Icon;
use crate::node::{
    Container, Gradient, GradientStop, Image, LinearGradient, Node, Pattern, RadialGradient, Rect,
    SpreadMethod, Symbol, Text, Units, Use,
};
use crate::scanner::{text_content, Scanner, Tag};
use crate::style::{parse_opacity, Paint, Style};
use crate::transform::Transform;
use crate::SvgError;
use iconkit_animation::{parse_smil, resolve_css_animations, smil_target, AnimationDescriptor};
use iconkit_css::{
    animations_from_declarations, extract_stylesheet, parse_number, Color, Declarations,
    StyleTarget, Stylesheet,
};
use iconkit_path::{parse_number_list, parse_path, parse_points};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Elements that produce nodes. Everything else is skipped with its content.
const ELEMENTS: &[&str] = &[
    "path",
    "circle",
    "ellipse",
    "rect",
    "line",
    "polyline",
    "polygon",
    "text",
    "g",
    "a",
    "switch",
    "svg",
    "defs",
    "clippath",
    "mask",
    "symbol",
    "pattern",
    "use",
    "image",
    "lineargradient",
    "radialgradient",
];

fn is_animation(name: &str) -> bool {
    matches!(name, "animate" | "animatetransform" | "animatemotion" | "set")
}

/// Build with default options: the root view box and top-level nodes.
pub fn build(markup: &str) -> Result<(Option<ViewBox>, Vec<Node>), SvgError> {
    let icon = Icon::parse(markup)?;
    Ok((icon.view_box, icon.nodes))
}

/// Nodes and SMIL animations found directly inside one element.
#[derive(Default)]
struct Children {
    nodes: Vec<Node>,
    animations: Vec<AnimationDescriptor>,
}

/// An element whose content is still being scanned.
struct Open<'a> {
    tag: Tag<'a>,
    body: Option<&'a str>,
    attrs: HashMap<String, String>,
    resolved: Resolved,
}

/// One level of the builder's work stack.
#[derive(Default)]
struct Frame<'a> {
    /// `None` for bare content handed to `children`.
    open: Option<Open<'a>>,
    /// `None` when there is no content or it lies past `max_depth`.
    scanner: Option<Scanner<'a>>,
    /// Depth of the elements the scanner yields.
    depth: usize,
    children: Children,
}

/// Resolved style inputs of one element.
struct Resolved {
    style: Style,
    /// Attributes overlaid with stylesheet and inline declarations.
    declarations: Declarations,
    /// Stylesheet and inline declarations only.
    css: Declarations,
}

/// Builds one document. Create a new builder per document.
pub struct SceneBuilder<'o> {
    options: &'o BuildOptions,
    stylesheet: Stylesheet,
    targeted: HashMap<String, Vec<AnimationDescriptor>>,
}

impl<'o> SceneBuilder<'o> {
    pub fn new(options: &'o BuildOptions) -> Self {
        Self {
            options,
            stylesheet: Stylesheet::new(),
            targeted: HashMap::new(),
        }
    }

    /// Parse `markup` into an icon.
    ///
    /// Fails only on invalid path data under
    /// [`PathErrorPolicy::FailDocument`]; everything else malformed is
    /// skipped.
    pub fn build(mut self, markup: &str) -> Result<Icon, SvgError> {
        let (stylesheet, text) = extract_stylesheet(markup);
        self.stylesheet = stylesheet;
        if self.options.smil_animations {
            self.targeted = collect_targeted(&text);
        }

        let mut icon = Icon::default();
        let mut root_seen = false;
        let mut scanner = Scanner::new(&text);
        while let Some(tag) = scanner.next_tag() {
            let body = scanner.element_content(&tag);
            if tag.name == "svg" && !root_seen {
                root_seen = true;
                let children = self.root(&tag, body, &mut icon)?;
                icon.nodes.extend(children);
            } else if is_animation(&tag.name) {
                trace!(tag = %tag.name, "Skipping animation outside any element");
            } else if let Some(node) = self.element(tag, body, 1)? {
                icon.nodes.push(node);
            }
        }

        if !self.targeted.is_empty() {
            trace!(
                targets = ?self.targeted.keys().collect::<Vec<_>>(),
                "Animations reference unknown ids"
            );
        }
        debug!(
            nodes = icon.nodes.len(),
            rules = self.stylesheet.rules.len(),
            keyframes = self.stylesheet.keyframes.len(),
            animated = icon.animated_nodes().len(),
            "Built icon"
        );
        Ok(icon)
    }

    /// Read the root `<svg>` element into `icon`; returns its children.
    fn root(&mut self, tag: &Tag<'_>, body: Option<&str>, icon: &mut Icon) -> Result<Vec<Node>, SvgError> {
        let attrs = tag.attribute_map();
        icon.width = attrs.get("width").and_then(|w| SvgLength::parse(w));
        icon.height = attrs.get("height").and_then(|h| SvgLength::parse(h));
        icon.view_box = attrs.get("viewBox").and_then(|vb| ViewBox::parse(vb));
        if let Some(par) = attrs.get("preserveAspectRatio") {
            icon.preserve_aspect_ratio = PreserveAspectRatio::parse(par).unwrap_or_default();
        }
        let style = self.resolve(&tag.name, &attrs).style;
        icon.style = (!style.is_empty()).then_some(style);

        let children = self.children(body.unwrap_or(""), 1)?;
        if !children.animations.is_empty() {
            trace!(
                count = children.animations.len(),
                "Ignoring animations on the root element"
            );
        }
        Ok(children.nodes)
    }

    fn children<'a>(&mut self, content: &'a str, depth: usize) -> Result<Children, SvgError> {
        let base = Frame {
            scanner: self.scan(content, depth),
            depth,
            ..Frame::default()
        };
        Ok(self.run(base)?.children)
    }

    fn scan<'a>(&self, content: &'a str, depth: usize) -> Option<Scanner<'a>> {
        if depth > self.options.max_depth {
            warn!(depth, max_depth = self.options.max_depth, "Nesting too deep, skipping content");
            return None;
        }
        Some(Scanner::new(content))
    }

    /// Build `base` and everything nested in it. Nesting lives on an
    /// explicit stack, so depth costs heap rather than call stack.
    fn run<'a>(&mut self, base: Frame<'a>) -> Result<Frame<'a>, SvgError> {
        let mut stack = vec![base];
        while let Some(frame) = stack.last_mut() {
            let next = frame.scanner.as_mut().and_then(|scanner| {
                let tag = scanner.next_tag()?;
                let body = scanner.element_content(&tag);
                Some((tag, body))
            });
            match next {
                Some((tag, _)) if is_animation(&tag.name) => {
                    if let Some(animation) = self.child_animation(&tag) {
                        frame.children.animations.push(animation);
                    }
                }
                Some((tag, body)) => {
                    let depth = frame.depth;
                    if let Some(open) = self.open(tag, body, depth) {
                        let child = self.frame(open, depth);
                        stack.push(child);
                    }
                }
                None if stack.len() == 1 => break,
                None => {
                    if let Some(Frame {
                        open: Some(open),
                        children,
                        ..
                    }) = stack.pop()
                    {
                        if let (Some(node), Some(parent)) = (self.finish(open, children)?, stack.last_mut()) {
                            parent.children.nodes.push(node);
                        }
                    }
                }
            }
        }
        Ok(stack.pop().unwrap_or_default())
    }

    /// Work frame for an opened element at `depth`.
    fn frame<'a>(&self, open: Open<'a>, depth: usize) -> Frame<'a> {
        let scanner = open.body.and_then(|content| self.scan(content, depth + 1));
        Frame {
            open: Some(open),
            scanner,
            depth: depth + 1,
            children: Children::default(),
        }
    }

    /// SMIL animation applying to the enclosing element. Animations with
    /// an `href` were collected up front.
    fn child_animation(&self, tag: &Tag<'_>) -> Option<AnimationDescriptor> {
        if !self.options.smil_animations {
            return None;
        }
        let attrs = tag.attribute_map();
        if smil_target(&attrs).is_some() {
            return None;
        }
        parse_smil(&tag.name, &attrs)
    }

    /// Presentation attributes, then matching rules by specificity, then
    /// the inline `style` attribute. Invalid values never clobber valid
    /// ones from a lower layer.
    fn resolve(&self, tag: &str, attrs: &HashMap<String, String>) -> Resolved {
        let target = StyleTarget::new(tag)
            .with_id(attrs.get("id").map(String::as_str))
            .with_class_attr(attrs.get("class").map(String::as_str));
        let css = self
            .stylesheet
            .resolve(&target, attrs.get("style").map(String::as_str));

        let mut style = Style::new();
        for (name, value) in attrs {
            let name = name.as_str();
            if crate::STYLE_PROPERTIES.contains(&name) {
                style.apply(name, value);
            }
        }
        style.merge(&Style::from_declarations(&css));

        let mut declarations: Declarations = attrs
            .iter()
            .filter(|(name, _)| name.as_str() != "style")
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        declarations.extend(css.iter().map(|(k, v)| (k.clone(), v.clone())));

        Resolved {
            style,
            declarations,
            css,
        }
    }

    fn element<'a>(&mut self, tag: Tag<'a>, body: Option<&'a str>, depth: usize) -> Result<Option<Node>, SvgError> {
        let Some(open) = self.open(tag, body, depth) else {
            return Ok(None);
        };
        let base = self.frame(open, depth);
        let frame = self.run(base)?;
        match frame.open {
            Some(open) => self.finish(open, frame.children),
            None => Ok(None),
        }
    }

    fn open<'a>(&self, tag: Tag<'a>, body: Option<&'a str>, depth: usize) -> Option<Open<'a>> {
        if !ELEMENTS.contains(&tag.name.as_str()) {
            trace!(tag = %tag.raw_name, "Skipping unsupported element");
            return None;
        }
        if depth > self.options.max_depth {
            warn!(tag = %tag.raw_name, depth, "Nesting too deep, skipping element");
            return None;
        }
        let attrs = tag.attribute_map();
        let resolved = self.resolve(&tag.name, &attrs);
        Some(Open {
            tag,
            body,
            attrs,
            resolved,
        })
    }

    /// Turn a fully scanned element into its node.
    fn finish(&mut self, open: Open<'_>, children: Children) -> Result<Option<Node>, SvgError> {
        let Open {
            tag,
            body,
            attrs,
            resolved,
        } = open;
        let name = tag.name.as_str();
        let num = |key: &str| attrs.get(key).and_then(|v| parse_number(v));
        let id = attrs.get("id").cloned();

        let node = match name {
            "path" => {
                let d = attrs.get("d").map(|d| d.trim()).unwrap_or("");
                if d.is_empty() {
                    trace!("Dropping path without data");
                    return Ok(None);
                }
                match parse_path(d) {
                    Ok(commands) if commands.is_empty() => return Ok(None),
                    Ok(commands) => Node::Path { commands },
                    Err(error) => match self.options.path_errors {
                        PathErrorPolicy::FailDocument => return Err(error.into()),
                        PathErrorPolicy::DropElement => {
                            warn!(id = ?id, %error, "Dropping path with invalid data");
                            return Ok(None);
                        }
                    },
                }
            }
            "circle" => Node::Circle {
                cx: num("cx").unwrap_or(0.0),
                cy: num("cy").unwrap_or(0.0),
                r: num("r").unwrap_or(0.0),
            },
            "ellipse" => Node::Ellipse {
                cx: num("cx").unwrap_or(0.0),
                cy: num("cy").unwrap_or(0.0),
                rx: num("rx").unwrap_or(0.0),
                ry: num("ry").unwrap_or(0.0),
            },
            "rect" => {
                let width = num("width").unwrap_or(0.0);
                let height = num("height").unwrap_or(0.0);
                Node::Rect(Rect {
                    x: num("x").unwrap_or(0.0),
                    y: num("y").unwrap_or(0.0),
                    width,
                    height,
                    radii: CornerRadii::from_attributes(num("rx"), num("ry"), width, height),
                })
            }
            "line" => Node::Line {
                x1: num("x1").unwrap_or(0.0),
                y1: num("y1").unwrap_or(0.0),
                x2: num("x2").unwrap_or(0.0),
                y2: num("y2").unwrap_or(0.0),
            },
            "polyline" | "polygon" => {
                let points = attrs.get("points").map(|p| parse_points(p)).unwrap_or_default();
                if points.is_empty() {
                    trace!(tag = name, "Dropping shape without points");
                    return Ok(None);
                }
                if name == "polyline" {
                    Node::Polyline { points }
                } else {
                    Node::Polygon { points }
                }
            }
            "text" => {
                let first = |key: &str| {
                    attrs
                        .get(key)
                        .and_then(|v| parse_number_list(v).first().copied())
                };
                let text_property = |key: &str| resolved.declarations.get(key).map(|v| v.trim().to_string());
                Node::Text(Text {
                    x: first("x").unwrap_or(0.0),
                    y: first("y").unwrap_or(0.0),
                    content: body.map(text_content).unwrap_or_default(),
                    font_family: text_property("font-family"),
                    font_size: resolved
                        .declarations
                        .get("font-size")
                        .and_then(|v| parse_number(v)),
                    font_weight: text_property("font-weight"),
                    text_anchor: text_property("text-anchor"),
                })
            }
            "g" | "a" | "switch" | "svg" => Node::Group {
                children: children.nodes,
                style: None,
            },
            "defs" => Node::Defs(Container {
                id,
                children: children.nodes,
            }),
            "clippath" => Node::ClipPath {
                content: Container {
                    id,
                    children: children.nodes,
                },
                units: units(&attrs, "clipPathUnits", Units::UserSpaceOnUse),
            },
            "mask" => Node::Mask {
                content: Container {
                    id,
                    children: children.nodes,
                },
                units: units(&attrs, "maskUnits", Units::ObjectBoundingBox),
            },
            "symbol" => Node::Symbol(Symbol {
                content: Container {
                    id,
                    children: children.nodes,
                },
                view_box: attrs.get("viewBox").and_then(|vb| ViewBox::parse(vb)),
            }),
            "pattern" => Node::Pattern(Pattern {
                content: Container {
                    id,
                    children: children.nodes,
                },
                x: num("x").unwrap_or(0.0),
                y: num("y").unwrap_or(0.0),
                width: num("width").unwrap_or(0.0),
                height: num("height").unwrap_or(0.0),
                units: units(&attrs, "patternUnits", Units::ObjectBoundingBox),
                content_units: units(&attrs, "patternContentUnits", Units::UserSpaceOnUse),
                view_box: attrs.get("viewBox").and_then(|vb| ViewBox::parse(vb)),
                transform: attrs.get("patternTransform").and_then(|t| Transform::parse(t)),
            }),
            "use" => {
                let Some(href) = href(&attrs) else {
                    trace!("Dropping <use> without href");
                    return Ok(None);
                };
                Node::Use(Use {
                    href: href.trim_start_matches('#').to_string(),
                    x: num("x").unwrap_or(0.0),
                    y: num("y").unwrap_or(0.0),
                    width: num("width"),
                    height: num("height"),
                })
            }
            "image" => {
                let Some(href) = href(&attrs) else {
                    trace!("Dropping <image> without href");
                    return Ok(None);
                };
                Node::Image(Image {
                    href: href.to_string(),
                    x: num("x").unwrap_or(0.0),
                    y: num("y").unwrap_or(0.0),
                    width: num("width"),
                    height: num("height"),
                })
            }
            "lineargradient" => {
                let coord = |key: &str, default: f32| {
                    attrs.get(key).and_then(|v| gradient_coordinate(v)).unwrap_or(default)
                };
                Node::LinearGradient(LinearGradient {
                    gradient: self.gradient(id, &attrs, body),
                    x1: coord("x1", 0.0),
                    y1: coord("y1", 0.0),
                    x2: coord("x2", 1.0),
                    y2: coord("y2", 0.0),
                })
            }
            "radialgradient" => {
                let coord = |key: &str| attrs.get(key).and_then(|v| gradient_coordinate(v));
                let cx = coord("cx").unwrap_or(0.5);
                let cy = coord("cy").unwrap_or(0.5);
                Node::RadialGradient(RadialGradient {
                    gradient: self.gradient(id, &attrs, body),
                    cx,
                    cy,
                    r: coord("r").unwrap_or(0.5),
                    fx: coord("fx").unwrap_or(cx),
                    fy: coord("fy").unwrap_or(cy),
                })
            }
            _ => return Ok(None),
        };

        let node = match node {
            Node::Group { children, .. } => Node::Group {
                children,
                style: Some(resolved.style).filter(|s| !s.is_empty()),
            },
            other => other.with_style(resolved.style),
        };

        let mut animations = children.animations;
        if let Some(targeted) = attrs.get("id").and_then(|id| self.targeted.remove(id)) {
            animations.extend(targeted);
        }
        if self.options.css_animations {
            let shorthands = animations_from_declarations(&resolved.css);
            if !shorthands.is_empty() {
                animations.extend(resolve_css_animations(
                    &self.stylesheet,
                    &shorthands,
                    &resolved.declarations,
                ));
            }
        }

        Ok(Some(node.with_animations(animations)))
    }

    fn gradient(&self, id: Option<String>, attrs: &HashMap<String, String>, body: Option<&str>) -> Gradient {
        Gradient {
            id,
            stops: body.map(|b| self.stops(b)).unwrap_or_default(),
            units: units(attrs, "gradientUnits", Units::ObjectBoundingBox),
            spread: attrs
                .get("spreadMethod")
                .and_then(|s| SpreadMethod::parse(s))
                .unwrap_or_default(),
            transform: attrs.get("gradientTransform").and_then(|t| Transform::parse(t)),
            href: href(attrs).map(|h| h.trim_start_matches('#').to_string()),
        }
    }

    /// `<stop>` children. Offsets are clamped and made non-decreasing.
    fn stops(&self, body: &str) -> Vec<GradientStop> {
        let mut stops: Vec<GradientStop> = Vec::new();
        for tag in Scanner::new(body).filter(|t| t.name == "stop") {
            let attrs = tag.attribute_map();
            let declarations = self.resolve(&tag.name, &attrs).declarations;
            let previous = stops.last().map_or(0.0, |s| s.offset);
            let offset = attrs
                .get("offset")
                .and_then(|o| parse_opacity(o))
                .unwrap_or(0.0)
                .max(previous);
            let color = declarations
                .get("stop-color")
                .and_then(|c| Paint::parse(c))
                .filter(|p| matches!(p, Paint::Color(_) | Paint::CurrentColor))
                .unwrap_or(Paint::Color(Color::BLACK));
            let opacity = declarations
                .get("stop-opacity")
                .and_then(|o| parse_opacity(o))
                .unwrap_or(1.0);
            stops.push(GradientStop {
                offset,
                color,
                opacity,
            });
        }
        stops
    }
}

fn href(attrs: &HashMap<String, String>) -> Option<&str> {
    attrs
        .get("href")
        .or_else(|| attrs.get("xlink:href"))
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
}

fn units(attrs: &HashMap<String, String>, key: &str, default: Units) -> Units {
    attrs.get(key).and_then(|u| Units::parse(u)).unwrap_or(default)
}

/// Number or percentage (as a fraction).
fn gradient_coordinate(value: &str) -> Option<f32> {
    let value = value.trim();
    match value.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f32>().ok().map(|p| p / 100.0),
        None => parse_number(value),
    }
}

/// Animations whose `href` names their target, keyed by target id.
fn collect_targeted(text: &str) -> HashMap<String, Vec<AnimationDescriptor>> {
    let mut targeted: HashMap<String, Vec<AnimationDescriptor>> = HashMap::new();
    for tag in Scanner::new(text).filter(|t| is_animation(&t.name)) {
        let attrs = tag.attribute_map();
        let Some(target) = smil_target(&attrs) else {
            continue;
        };
        if let Some(animation) = parse_smil(&tag.name, &attrs) {
            targeted.entry(target.to_string()).or_default().push(animation);
        }
    }
    targeted
}
