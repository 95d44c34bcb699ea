//! # IconKit SVG
//!
//! Icon markup to a typed scene graph.
//!
//! ## Features
//!
//! - **Markup scanning**: non-validating, nesting-aware tag reader
//! - **Shapes**: path, circle, ellipse, rect, line, polyline, polygon, text
//! - **Structure**: groups, defs, clip paths, masks, symbols, patterns,
//!   use, image, linear and radial gradients
//! - **Styling**: presentation attributes, `<style>` rules and inline
//!   styles resolved into one [`Style`] per element
//! - **Animation**: SMIL elements and CSS keyframes attached through the
//!   [`Node::Animated`] decorator
//!
//! ## Architecture
//!
//! ```text
//! Icon
//!  ├── width / height / viewBox / preserveAspectRatio
//!  ├── style (root presentation attributes)
//!  └── nodes
//!         └── Animated { Styled { shape } } | Group { children } | ...
//! ```
//!
//! Only path data is parsed strictly. Everything else that cannot be
//! understood is skipped, so [`SvgError`] carries a single kind of
//! failure.

use iconkit_path::PathError;
use thiserror::Error;

pub mod builder;
pub mod config;
pub mod geometry;
pub mod icon;
pub mod node;
pub mod scanner;
pub mod style;
pub mod transform;

pub use builder::{build, SceneBuilder};
pub use config::{BuildOptions, PathErrorPolicy};
pub use geometry::{Align, CornerRadii, PreserveAspectRatio, Radius, SvgLength, ViewBox};
pub use icon::{Icon, IconBuilder};
pub use node::{
    Container, Gradient, GradientStop, Image, LinearGradient, Node, Pattern, RadialGradient, Rect,
    SpreadMethod, Symbol, Text, Units, Use,
};
pub use scanner::{decode_entities, find_close, parse_attributes, text_content, Scanner, Tag};
pub use style::{
    parse_opacity, parse_url, DisplayMode, FillRule, LineCap, LineJoin, Paint, PaintLayer,
    PaintOrder, Style, VectorEffect, Visibility, STYLE_PROPERTIES,
};
pub use transform::{Matrix, Transform};

pub use iconkit_css::Color;
pub use iconkit_path::PathCommand;

// ==================== Errors ====================

/// Errors that can occur while building a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SvgError {
    #[error("Invalid path data: {0}")]
    InvalidPath(#[from] PathError),
}
