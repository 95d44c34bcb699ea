//! # IconKit Animation
//!
//! A single descriptor model for icon animations, whichever syntax they
//! were written in:
//!
//! - SMIL elements (`<animate>`, `<animateTransform>`, `<animateMotion>`)
//!   via [`parse_smil`]
//! - CSS `@keyframes` referenced by the `animation` property via
//!   [`resolve_css_animations`]
//!
//! and a pure timing engine ([`progress_at`], [`sample`]) that maps
//! elapsed time to progress. The engine holds no state, so renderers can
//! scrub, restart or sample out of order.
//!
//! ## Example
//!
//! ```rust
//! use iconkit_animation::{sample, AnimationTiming, Progress};
//!
//! let timing = AnimationTiming::new(1000.0);
//! assert_eq!(sample(&timing, 250.0), Progress::Active(0.25));
//! ```
//!
//! Keyframe lists and `values=` lists are reduced to two endpoints;
//! intermediate points are not modelled.

pub mod descriptor;
pub mod engine;
pub mod keyframes;
pub mod smil;
pub mod timing;

pub use descriptor::{AnimationDescriptor, MotionRotate, TransformKind, Tween};
pub use engine::{completed_iterations, progress_at, sample, Progress};
pub use keyframes::{descriptors_from_keyframes, resolve_css_animations};
pub use smil::{parse_clock_value, parse_smil, smil_target};
pub use timing::{AnimationTiming, CalcMode, Steps};

// Playback enums are shared with the CSS layer.
pub use iconkit_css::{AnimationDirection, AnimationFillMode, Iterations, StepPosition, TimingFunction};
