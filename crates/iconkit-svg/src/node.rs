//! The scene graph.
//!
//! ```text
//! Node
//!  ├── shapes (Path, Circle, Rect, ...)      geometry only
//!  ├── Group / containers / gradients        children or paint servers
//!  └── decorators
//!         Animated { Styled { shape } }       always in this order
//! ```

use crate::geometry::{CornerRadii, ViewBox};
use crate::style::{Paint, Style};
use crate::transform::Transform;
use iconkit_animation::AnimationDescriptor;
use iconkit_path::PathCommand;

// ==================== Shapes ====================

/// Rectangle (<rect>).
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub radii: CornerRadii,
}

/// Text (<text>), with `tspan` content flattened into one string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    pub x: f32,
    pub y: f32,
    pub content: String,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<String>,
    pub text_anchor: Option<String>,
}

// ==================== Containers ====================

/// Children plus the id other elements use to reference them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Container {
    pub id: Option<String>,
    pub children: Vec<Node>,
}

/// Coordinate system for clip paths, masks, patterns and gradients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    ObjectBoundingBox,
    UserSpaceOnUse,
}

impl Units {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "objectBoundingBox" => Some(Units::ObjectBoundingBox),
            "userSpaceOnUse" => Some(Units::UserSpaceOnUse),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub content: Container,
    pub view_box: Option<ViewBox>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub content: Container,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub units: Units,
    pub content_units: Units,
    pub view_box: Option<ViewBox>,
    pub transform: Option<Transform>,
}

/// Reference to another element (<use>).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Use {
    /// Target id without the leading `#`.
    pub href: String,
    pub x: f32,
    pub y: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

/// Raster or vector image (<image>). The href is kept, never fetched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Image {
    pub href: String,
    pub x: f32,
    pub y: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

// ==================== Gradients ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpreadMethod {
    #[default]
    Pad,
    Reflect,
    Repeat,
}

impl SpreadMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "pad" => Some(SpreadMethod::Pad),
            "reflect" => Some(SpreadMethod::Reflect),
            "repeat" => Some(SpreadMethod::Repeat),
            _ => None,
        }
    }
}

/// A gradient stop. `color` is a solid color or `CurrentColor`.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    /// Clamped to `[0, 1]` and never less than the previous stop.
    pub offset: f32,
    pub color: Paint,
    pub opacity: f32,
}

/// Fields shared by both gradient kinds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gradient {
    pub id: Option<String>,
    pub stops: Vec<GradientStop>,
    pub units: Units,
    pub spread: SpreadMethod,
    pub transform: Option<Transform>,
    /// Template gradient this one inherits stops from.
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub gradient: Gradient,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub gradient: Gradient,
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
    /// Focal point; defaults to the center.
    pub fx: f32,
    pub fy: f32,
}

// ==================== Node ====================

/// A scene graph node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Path { commands: Vec<PathCommand> },
    Circle { cx: f32, cy: f32, r: f32 },
    Ellipse { cx: f32, cy: f32, rx: f32, ry: f32 },
    Rect(Rect),
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
    Polyline { points: Vec<(f32, f32)> },
    Polygon { points: Vec<(f32, f32)> },
    Text(Text),
    /// Children inherit `style`.
    Group { children: Vec<Node>, style: Option<Style> },
    ClipPath { content: Container, units: Units },
    Mask { content: Container, units: Units },
    Defs(Container),
    Symbol(Symbol),
    Use(Use),
    Image(Image),
    Pattern(Pattern),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
    Styled { style: Style, node: Box<Node> },
    Animated {
        animations: Vec<AnimationDescriptor>,
        node: Box<Node>,
    },
}

impl Node {
    pub fn group(children: Vec<Node>) -> Self {
        Node::Group {
            children,
            style: None,
        }
    }

    /// Attach a style. Merges into an existing `Styled` wrapper and stays
    /// inside any `Animated` wrapper. An empty style is a no-op.
    pub fn with_style(self, style: Style) -> Self {
        if style.is_empty() {
            return self;
        }
        match self {
            Node::Animated { animations, node } => Node::Animated {
                animations,
                node: Box::new(node.with_style(style)),
            },
            Node::Styled {
                style: mut existing,
                node,
            } => {
                existing.merge(&style);
                Node::Styled {
                    style: existing,
                    node,
                }
            }
            other => Node::Styled {
                style,
                node: Box::new(other),
            },
        }
    }

    /// Attach animations as the outermost wrapper, appending to an
    /// existing `Animated` list. An empty list is a no-op.
    pub fn with_animations(self, animations: Vec<AnimationDescriptor>) -> Self {
        if animations.is_empty() {
            return self;
        }
        match self {
            Node::Animated {
                animations: mut existing,
                node,
            } => {
                existing.extend(animations);
                Node::Animated {
                    animations: existing,
                    node,
                }
            }
            other => Node::Animated {
                animations,
                node: Box::new(other),
            },
        }
    }

    /// The node under any decorators.
    pub fn inner(&self) -> &Node {
        match self {
            Node::Styled { node, .. } | Node::Animated { node, .. } => node.inner(),
            other => other,
        }
    }

    /// Style from a `Styled` decorator or a group's own style.
    pub fn style(&self) -> Option<&Style> {
        match self {
            Node::Styled { style, .. } => Some(style),
            Node::Animated { node, .. } => node.style(),
            Node::Group { style, .. } => style.as_ref(),
            _ => None,
        }
    }

    pub fn animations(&self) -> &[AnimationDescriptor] {
        match self {
            Node::Animated { animations, .. } => animations,
            _ => &[],
        }
    }

    /// Child nodes of groups and containers.
    pub fn children(&self) -> &[Node] {
        match self.inner() {
            Node::Group { children, .. } => children,
            Node::ClipPath { content, .. } | Node::Mask { content, .. } => &content.children,
            Node::Defs(content) => &content.children,
            Node::Symbol(symbol) => &symbol.content.children,
            Node::Pattern(pattern) => &pattern.content.children,
            _ => &[],
        }
    }

    /// Identifier of referenceable nodes.
    pub fn id(&self) -> Option<&str> {
        match self.inner() {
            Node::ClipPath { content, .. } | Node::Mask { content, .. } => content.id.as_deref(),
            Node::Defs(content) => content.id.as_deref(),
            Node::Symbol(symbol) => symbol.content.id.as_deref(),
            Node::Pattern(pattern) => pattern.content.id.as_deref(),
            Node::LinearGradient(g) => g.gradient.id.as_deref(),
            Node::RadialGradient(g) => g.gradient.id.as_deref(),
            _ => None,
        }
    }

    /// Element name of the inner node.
    pub fn kind(&self) -> &'static str {
        match self.inner() {
            Node::Path { .. } => "path",
            Node::Circle { .. } => "circle",
            Node::Ellipse { .. } => "ellipse",
            Node::Rect(_) => "rect",
            Node::Line { .. } => "line",
            Node::Polyline { .. } => "polyline",
            Node::Polygon { .. } => "polygon",
            Node::Text(_) => "text",
            Node::Group { .. } => "g",
            Node::ClipPath { .. } => "clipPath",
            Node::Mask { .. } => "mask",
            Node::Defs(_) => "defs",
            Node::Symbol(_) => "symbol",
            Node::Use(_) => "use",
            Node::Image(_) => "image",
            Node::Pattern(_) => "pattern",
            Node::LinearGradient(_) => "linearGradient",
            Node::RadialGradient(_) => "radialGradient",
            // inner() never stops at a decorator
            Node::Styled { .. } | Node::Animated { .. } => "decorator",
        }
    }

    /// Depth-first visit of this node and everything below it, including
    /// decorator wrappers.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        match self {
            Node::Styled { node, .. } | Node::Animated { node, .. } => node.walk(visit),
            _ => {
                for child in self.children() {
                    child.walk(visit);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iconkit_animation::{AnimationTiming, Tween};

    fn red() -> Style {
        let mut style = Style::new();
        style.apply("fill", "red");
        style
    }

    fn fade() -> Vec<AnimationDescriptor> {
        vec![AnimationDescriptor::Opacity(Tween::new(
            0.0,
            1.0,
            AnimationTiming::new(500.0),
        ))]
    }

    fn circle() -> Node {
        Node::Circle {
            cx: 5.0,
            cy: 5.0,
            r: 2.0,
        }
    }

    #[test]
    fn test_styled_inside_animated_regardless_of_order() {
        let a = circle().with_style(red()).with_animations(fade());
        let b = circle().with_animations(fade()).with_style(red());
        assert_eq!(a, b);
        match a {
            Node::Animated { node, .. } => assert!(matches!(*node, Node::Styled { .. })),
            other => panic!("expected animated, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_decorations_are_noops() {
        assert_eq!(circle().with_style(Style::new()), circle());
        assert_eq!(circle().with_animations(Vec::new()), circle());
    }

    #[test]
    fn test_repeated_decorators_merge() {
        let mut blue = Style::new();
        blue.apply("stroke", "blue");
        let node = circle()
            .with_style(red())
            .with_style(blue)
            .with_animations(fade())
            .with_animations(fade());
        assert_eq!(node.animations().len(), 2);
        let style = node.style().unwrap();
        assert!(style.fill.is_some() && style.stroke.is_some());
        assert_eq!(node.kind(), "circle");
    }

    #[test]
    fn test_walk_visits_decorated_children() {
        let tree = Node::group(vec![circle().with_style(red()), circle()]);
        let mut circles = 0;
        tree.walk(&mut |n| {
            if matches!(n, Node::Circle { .. }) {
                circles += 1;
            }
        });
        assert_eq!(circles, 2);
    }
}
