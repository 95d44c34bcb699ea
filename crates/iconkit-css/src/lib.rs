//! # IconKit CSS
//!
//! The CSS subset used by icon markup:
//!
//! - `<style>` extraction from markup ([`extract_stylesheet`])
//! - rule and `@keyframes` parsing ([`Stylesheet::parse`])
//! - universal/tag/class/id selectors with fixed specificity
//! - per-element resolution merging rules and inline `style`
//! - the `animation` shorthand and its longhands
//! - colors and scalar value helpers
//!
//! Nothing here returns an error: unsupported selectors, at-rules and
//! malformed declarations are skipped (and traced), matching how
//! browsers treat author stylesheets.

pub mod animation;
pub mod color;
pub mod extract;
pub mod parser;
pub mod selector;
pub mod values;

pub use animation::{
    animations_from_declarations, parse_animation, AnimationDirection, AnimationFillMode,
    AnimationShorthand, Iterations, PlayState, StepPosition, TimingFunction,
};
pub use color::{named_color, parse_color, Color};
pub use extract::extract_stylesheet;
pub use parser::{parse_declarations, parse_keyframe_offset, Keyframe, Keyframes, Rule, Stylesheet};
pub use selector::{Selector, StyleTarget};
pub use values::{normalize_dash_array, parse_angle, parse_css_time, parse_dash_array, parse_number};

/// Property name to raw value, in source order.
pub type Declarations = indexmap::IndexMap<String, String>;
