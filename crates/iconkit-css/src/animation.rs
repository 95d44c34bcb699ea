//! The `animation` shorthand and its longhands.

use crate::parser::split_top_level;
use crate::values::parse_css_time;
use crate::Declarations;
use tracing::trace;

// ==================== Timing Functions ====================

/// CSS timing function (easing).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TimingFunction {
    /// Linear interpolation.
    Linear,
    /// Default ease (0.25, 0.1, 0.25, 1.0).
    #[default]
    Ease,
    /// Ease in (0.42, 0, 1, 1).
    EaseIn,
    /// Ease out (0, 0, 0.58, 1).
    EaseOut,
    /// Ease in-out (0.42, 0, 0.58, 1).
    EaseInOut,
    /// Custom cubic bezier.
    CubicBezier(f32, f32, f32, f32),
    /// Step function.
    Steps(u32, StepPosition),
}

impl TimingFunction {
    /// Parse a keyword or functional timing function.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();

        match s.as_str() {
            "linear" => Some(TimingFunction::Linear),
            "ease" => Some(TimingFunction::Ease),
            "ease-in" => Some(TimingFunction::EaseIn),
            "ease-out" => Some(TimingFunction::EaseOut),
            "ease-in-out" => Some(TimingFunction::EaseInOut),
            "step-start" => Some(TimingFunction::Steps(1, StepPosition::Start)),
            "step-end" => Some(TimingFunction::Steps(1, StepPosition::End)),
            _ => {
                if let Some(inner) = function_body(&s, "cubic-bezier") {
                    let parts: Vec<f32> = inner
                        .split(',')
                        .filter_map(|p| p.trim().parse().ok())
                        .collect();
                    match parts[..] {
                        [x1, y1, x2, y2] if (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2) => {
                            Some(TimingFunction::CubicBezier(x1, y1, x2, y2))
                        }
                        _ => None,
                    }
                } else if let Some(inner) = function_body(&s, "steps") {
                    let mut parts = inner.split(',').map(str::trim);
                    let steps: u32 = parts.next()?.parse().ok().filter(|n| *n > 0)?;
                    let position = match parts.next() {
                        Some(p) => StepPosition::parse(p)?,
                        None => StepPosition::End,
                    };
                    Some(TimingFunction::Steps(steps, position))
                } else {
                    None
                }
            }
        }
    }

    /// The cubic-bezier control points of the named easings.
    pub fn control_points(&self) -> Option<[f32; 4]> {
        match *self {
            TimingFunction::Linear | TimingFunction::Steps(..) => None,
            TimingFunction::Ease => Some([0.25, 0.1, 0.25, 1.0]),
            TimingFunction::EaseIn => Some([0.42, 0.0, 1.0, 1.0]),
            TimingFunction::EaseOut => Some([0.0, 0.0, 0.58, 1.0]),
            TimingFunction::EaseInOut => Some([0.42, 0.0, 0.58, 1.0]),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => Some([x1, y1, x2, y2]),
        }
    }
}

fn function_body<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// Position for step timing function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepPosition {
    /// Jump at the start.
    Start,
    /// Jump at the end (default).
    #[default]
    End,
    /// Jump at both start and end.
    Both,
    /// Jump at neither (CSS jump-none).
    None,
}

impl StepPosition {
    fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "start" | "jump-start" => Some(StepPosition::Start),
            "end" | "jump-end" => Some(StepPosition::End),
            "both" | "jump-both" => Some(StepPosition::Both),
            "none" | "jump-none" => Some(StepPosition::None),
            _ => None,
        }
    }
}

// ==================== Playback ====================

/// Animation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationDirection {
    /// Play forward.
    #[default]
    Normal,
    /// Play backward.
    Reverse,
    /// Alternate forward and backward.
    Alternate,
    /// Alternate backward and forward.
    AlternateReverse,
}

impl AnimationDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(AnimationDirection::Normal),
            "reverse" => Some(AnimationDirection::Reverse),
            "alternate" => Some(AnimationDirection::Alternate),
            "alternate-reverse" => Some(AnimationDirection::AlternateReverse),
            _ => None,
        }
    }
}

/// Animation fill mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationFillMode {
    /// Not applied outside the active interval.
    #[default]
    None,
    /// Hold the end value after the animation ends.
    Forwards,
    /// Apply the start value during the delay.
    Backwards,
    /// Both forwards and backwards.
    Both,
}

impl AnimationFillMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Some(AnimationFillMode::None),
            "forwards" => Some(AnimationFillMode::Forwards),
            "backwards" => Some(AnimationFillMode::Backwards),
            "both" => Some(AnimationFillMode::Both),
            _ => None,
        }
    }

    pub fn fills_backwards(&self) -> bool {
        matches!(self, AnimationFillMode::Backwards | AnimationFillMode::Both)
    }

    pub fn fills_forwards(&self) -> bool {
        matches!(self, AnimationFillMode::Forwards | AnimationFillMode::Both)
    }
}

/// Iteration count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iterations {
    Count(u32),
    Infinite,
}

impl Iterations {
    /// Raw sentinel used by the descriptor wire form.
    pub const INFINITE: i32 = -1;

    /// Parse `infinite`/`indefinite` or a positive number. Fractional counts
    /// round up; anything below one becomes one.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("infinite") || s.eq_ignore_ascii_case("indefinite") {
            return Some(Iterations::Infinite);
        }
        let n: f32 = s.parse().ok().filter(|n: &f32| n.is_finite() && *n >= 0.0)?;
        if n < 1.0 {
            trace!(value = s, "Iteration count below one, using one");
            return Some(Iterations::Count(1));
        }
        Some(Iterations::Count(n.ceil() as u32))
    }

    pub fn to_raw(self) -> i32 {
        match self {
            Iterations::Count(n) => i32::try_from(n).unwrap_or(i32::MAX),
            Iterations::Infinite => Self::INFINITE,
        }
    }

    /// Negative values are infinite; zero counts as one.
    pub fn from_raw(raw: i32) -> Self {
        if raw < 0 {
            Iterations::Infinite
        } else {
            Iterations::Count((raw as u32).max(1))
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Iterations::Infinite)
    }
}

impl Default for Iterations {
    fn default() -> Self {
        Iterations::Count(1)
    }
}

/// Animation play state. Recognized so it is not mistaken for a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Running,
    Paused,
}

// ==================== Shorthand ====================

/// One entry of an `animation` value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationShorthand {
    /// Keyframes name; `None` when absent or `none`.
    pub name: Option<String>,
    pub duration_ms: f32,
    pub delay_ms: f32,
    pub timing_function: TimingFunction,
    pub iterations: Iterations,
    pub direction: AnimationDirection,
    pub fill_mode: AnimationFillMode,
    pub play_state: PlayState,
}

impl AnimationShorthand {
    /// Parse one comma-free entry. Tokens are classified by shape, not
    /// position; the first unclassified token is the name.
    pub fn parse(entry: &str) -> Self {
        let mut animation = AnimationShorthand::default();
        let mut seen_duration = false;
        let mut seen_name = false;

        for token in tokens(entry) {
            if let Some(ms) = parse_css_time(token) {
                if !seen_duration {
                    animation.duration_ms = ms.max(0.0);
                    seen_duration = true;
                } else {
                    animation.delay_ms = ms;
                }
            } else if let Some(iterations) = Iterations::parse(token) {
                animation.iterations = iterations;
            } else if let Some(direction) = AnimationDirection::parse(token) {
                animation.direction = direction;
            } else if let Some(fill_mode) = AnimationFillMode::parse(token) {
                animation.fill_mode = fill_mode;
            } else if let Some(timing) = TimingFunction::parse(token) {
                animation.timing_function = timing;
            } else if token.eq_ignore_ascii_case("running") {
                animation.play_state = PlayState::Running;
            } else if token.eq_ignore_ascii_case("paused") {
                animation.play_state = PlayState::Paused;
            } else if !seen_name {
                animation.name = Some(token.trim_matches(|c| c == '"' || c == '\'').to_string());
                seen_name = true;
            } else {
                trace!(token, "Ignoring extra animation token");
            }
        }

        animation
    }
}

/// Whitespace-separated tokens, keeping `fn(a, b)` groups whole.
fn tokens(entry: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;

    for (i, c) in entry.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    tokens.push(&entry[s..i]);
                }
                continue;
            }
            _ => {}
        }
        start.get_or_insert(i);
    }
    if let Some(s) = start {
        tokens.push(&entry[s..]);
    }

    tokens
}

/// Parse a full `animation` value (comma-separated list).
pub fn parse_animation(value: &str) -> Vec<AnimationShorthand> {
    split_top_level(value, ',')
        .into_iter()
        .map(AnimationShorthand::parse)
        .collect()
}

/// Collect the animations declared on an element.
///
/// Starts from the `animation` shorthand; longhands then override their
/// field, cycling index-wise when a longhand list is shorter. An
/// `animation-name` list fixes the number of animations. Entries without
/// a name are dropped.
pub fn animations_from_declarations(declarations: &Declarations) -> Vec<AnimationShorthand> {
    let mut animations = declarations
        .get("animation")
        .map(|v| parse_animation(v))
        .unwrap_or_default();

    if let Some(names) = declarations.get("animation-name") {
        let names = split_top_level(names, ',');
        animations.resize(names.len(), AnimationShorthand::default());
        for (animation, name) in animations.iter_mut().zip(names) {
            animation.name = Some(name.trim_matches(|c| c == '"' || c == '\'').to_string());
        }
    }

    apply_longhand(&mut animations, declarations, "animation-duration", |a, v| {
        if let Some(ms) = parse_css_time(v) {
            a.duration_ms = ms.max(0.0);
        }
    });
    apply_longhand(&mut animations, declarations, "animation-delay", |a, v| {
        if let Some(ms) = parse_css_time(v) {
            a.delay_ms = ms;
        }
    });
    apply_longhand(&mut animations, declarations, "animation-iteration-count", |a, v| {
        if let Some(iterations) = Iterations::parse(v) {
            a.iterations = iterations;
        }
    });
    apply_longhand(&mut animations, declarations, "animation-direction", |a, v| {
        if let Some(direction) = AnimationDirection::parse(v) {
            a.direction = direction;
        }
    });
    apply_longhand(&mut animations, declarations, "animation-fill-mode", |a, v| {
        if let Some(fill_mode) = AnimationFillMode::parse(v) {
            a.fill_mode = fill_mode;
        }
    });
    apply_longhand(&mut animations, declarations, "animation-timing-function", |a, v| {
        if let Some(timing) = TimingFunction::parse(v) {
            a.timing_function = timing;
        }
    });
    apply_longhand(&mut animations, declarations, "animation-play-state", |a, v| {
        match v.trim().to_ascii_lowercase().as_str() {
            "paused" => a.play_state = PlayState::Paused,
            "running" => a.play_state = PlayState::Running,
            _ => {}
        }
    });

    animations.retain(|a| {
        a.name
            .as_deref()
            .is_some_and(|name| !name.is_empty() && !name.eq_ignore_ascii_case("none"))
    });
    animations
}

fn apply_longhand(
    animations: &mut [AnimationShorthand],
    declarations: &Declarations,
    property: &str,
    apply: impl Fn(&mut AnimationShorthand, &str),
) {
    let Some(value) = declarations.get(property) else {
        return;
    };
    let values = split_top_level(value, ',');
    if values.is_empty() {
        return;
    }
    for (i, animation) in animations.iter_mut().enumerate() {
        apply(animation, values[i % values.len()]);
    }
}
