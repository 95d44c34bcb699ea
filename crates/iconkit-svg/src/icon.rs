//! The icon document and its typed builder.

use crate::builder::SceneBuilder;
use crate::config::BuildOptions;
use crate::geometry::{CornerRadii, PreserveAspectRatio, SvgLength, ViewBox};
use crate::node::{Node, Rect};
use crate::style::{Paint, Style};
use crate::transform::Matrix;
use crate::SvgError;
use iconkit_path::{parse_path, PathError};

// ==================== Icon ====================

/// A parsed or built icon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Icon {
    pub width: Option<SvgLength>,
    pub height: Option<SvgLength>,
    pub view_box: Option<ViewBox>,
    pub preserve_aspect_ratio: PreserveAspectRatio,
    /// Presentation attributes of the root element.
    pub style: Option<Style>,
    pub nodes: Vec<Node>,
}

impl Icon {
    /// Parse markup with default options.
    pub fn parse(markup: &str) -> Result<Self, SvgError> {
        Self::parse_with(markup, &BuildOptions::default())
    }

    pub fn parse_with(markup: &str, options: &BuildOptions) -> Result<Self, SvgError> {
        SceneBuilder::new(options).build(markup)
    }

    pub fn builder() -> IconBuilder {
        IconBuilder::new()
    }

    /// Get computed size (using viewBox or explicit dimensions).
    pub fn size(&self, container_width: f32, container_height: f32) -> (f32, f32) {
        let width = self
            .width
            .as_ref()
            .map(|l| l.to_px(container_width))
            .or_else(|| self.view_box.as_ref().map(|vb| vb.width))
            .unwrap_or(300.0);

        let height = self
            .height
            .as_ref()
            .map(|l| l.to_px(container_height))
            .or_else(|| self.view_box.as_ref().map(|vb| vb.height))
            .unwrap_or(150.0);

        (width, height)
    }

    /// Matrix mapping icon coordinates into a `width × height` box at
    /// the origin, honouring the view box and `preserveAspectRatio`.
    pub fn viewport_matrix(&self, width: f32, height: f32) -> Matrix {
        match &self.view_box {
            Some(vb) => {
                let (sx, sy, tx, ty) = self.preserve_aspect_ratio.fit(vb, width, height);
                Matrix::identity().translate(tx, ty).scale(sx, sy)
            }
            None => Matrix::identity(),
        }
    }

    /// Depth-first visit of every node.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        for node in &self.nodes {
            node.walk(visit);
        }
    }

    /// Every `Animated` node, in document order.
    pub fn animated_nodes(&self) -> Vec<&Node> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if matches!(node, Node::Animated { .. }) {
                found.push(node);
            }
        });
        found
    }

    pub fn is_animated(&self) -> bool {
        !self.animated_nodes().is_empty()
    }
}

// ==================== Builder ====================

/// Typed construction of an [`Icon`] without markup.
///
/// ```rust
/// use iconkit_svg::{Icon, Paint};
///
/// let icon = Icon::builder()
///     .view_box(0.0, 0.0, 24.0, 24.0)
///     .fill(Paint::None)
///     .stroke(Paint::CurrentColor)
///     .circle(12.0, 12.0, 10.0)
///     .path("M12 6v6l4 2")
///     .unwrap()
///     .build();
/// assert_eq!(icon.nodes.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IconBuilder {
    icon: Icon,
}

impl IconBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.icon.width = Some(SvgLength::User(width));
        self.icon.height = Some(SvgLength::User(height));
        self
    }

    pub fn view_box(mut self, min_x: f32, min_y: f32, width: f32, height: f32) -> Self {
        self.icon.view_box = Some(ViewBox::new(min_x, min_y, width, height));
        self
    }

    pub fn preserve_aspect_ratio(mut self, value: PreserveAspectRatio) -> Self {
        self.icon.preserve_aspect_ratio = value;
        self
    }

    /// Root style; merged with anything set before.
    pub fn style(mut self, style: Style) -> Self {
        self.root_style().merge(&style);
        self
    }

    pub fn fill(mut self, paint: Paint) -> Self {
        self.root_style().fill = Some(paint);
        self
    }

    pub fn stroke(mut self, paint: Paint) -> Self {
        self.root_style().stroke = Some(paint);
        self
    }

    pub fn stroke_width(mut self, width: f32) -> Self {
        self.root_style().stroke_width = Some(width);
        self
    }

    fn root_style(&mut self) -> &mut Style {
        self.icon.style.get_or_insert_with(Style::default)
    }

    pub fn node(mut self, node: Node) -> Self {
        self.icon.nodes.push(node);
        self
    }

    pub fn nodes(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.icon.nodes.extend(nodes);
        self
    }

    /// Add a path from path data. Empty data adds nothing.
    pub fn path(self, data: &str) -> Result<Self, PathError> {
        let commands = parse_path(data)?;
        if commands.is_empty() {
            return Ok(self);
        }
        Ok(self.node(Node::Path { commands }))
    }

    pub fn circle(self, cx: f32, cy: f32, r: f32) -> Self {
        self.node(Node::Circle { cx, cy, r })
    }

    pub fn ellipse(self, cx: f32, cy: f32, rx: f32, ry: f32) -> Self {
        self.node(Node::Ellipse { cx, cy, rx, ry })
    }

    pub fn rect(self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.rounded_rect(x, y, width, height, CornerRadii::default())
    }

    pub fn rounded_rect(self, x: f32, y: f32, width: f32, height: f32, radii: CornerRadii) -> Self {
        self.node(Node::Rect(Rect {
            x,
            y,
            width,
            height,
            radii,
        }))
    }

    pub fn line(self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.node(Node::Line { x1, y1, x2, y2 })
    }

    /// Empty point lists add nothing.
    pub fn polyline(self, points: Vec<(f32, f32)>) -> Self {
        if points.is_empty() {
            return self;
        }
        self.node(Node::Polyline { points })
    }

    /// Empty point lists add nothing.
    pub fn polygon(self, points: Vec<(f32, f32)>) -> Self {
        if points.is_empty() {
            return self;
        }
        self.node(Node::Polygon { points })
    }

    pub fn group(self, children: Vec<Node>, style: Option<Style>) -> Self {
        self.node(Node::Group {
            children,
            style: style.filter(|s| !s.is_empty()),
        })
    }

    pub fn build(self) -> Icon {
        self.icon
    }
}
