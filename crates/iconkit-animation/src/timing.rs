//! Timing parameters shared by every descriptor.

use iconkit_css::{
    AnimationDirection, AnimationFillMode, AnimationShorthand, Iterations, StepPosition,
    TimingFunction,
};

/// Interpolation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalcMode {
    #[default]
    Linear,
    Discrete,
    /// Same as linear; only two values are modelled.
    Paced,
    Spline,
}

impl CalcMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "linear" => Some(CalcMode::Linear),
            "discrete" => Some(CalcMode::Discrete),
            "paced" => Some(CalcMode::Paced),
            "spline" => Some(CalcMode::Spline),
            _ => None,
        }
    }
}

/// `steps(n, position)` metadata carried next to a discrete calc mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Steps {
    pub count: u32,
    pub position: StepPosition,
}

/// When and how an animation plays. Times are milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTiming {
    pub duration_ms: f32,
    pub delay_ms: f32,
    pub calc_mode: CalcMode,
    /// Cubic-bezier control points (x1, y1, x2, y2); used under `Spline`.
    pub key_splines: Option<[f32; 4]>,
    pub steps: Option<Steps>,
    pub iterations: Iterations,
    pub direction: AnimationDirection,
    pub fill_mode: AnimationFillMode,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            duration_ms: 0.0,
            delay_ms: 0.0,
            calc_mode: CalcMode::Linear,
            key_splines: None,
            steps: None,
            iterations: Iterations::Count(1),
            direction: AnimationDirection::Normal,
            fill_mode: AnimationFillMode::None,
        }
    }
}

impl AnimationTiming {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            duration_ms,
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_iterations(mut self, iterations: Iterations) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_direction(mut self, direction: AnimationDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_fill_mode(mut self, fill_mode: AnimationFillMode) -> Self {
        self.fill_mode = fill_mode;
        self
    }

    pub fn with_key_splines(mut self, splines: [f32; 4]) -> Self {
        self.calc_mode = CalcMode::Spline;
        self.key_splines = Some(splines);
        self
    }

    /// Map a CSS timing function onto calc mode, key splines and step
    /// metadata.
    pub fn with_timing_function(mut self, timing_function: TimingFunction) -> Self {
        match timing_function {
            TimingFunction::Linear => {
                self.calc_mode = CalcMode::Linear;
                self.key_splines = None;
                self.steps = None;
            }
            TimingFunction::Steps(count, position) => {
                self.calc_mode = CalcMode::Discrete;
                self.key_splines = None;
                self.steps = Some(Steps { count, position });
            }
            other => {
                self.calc_mode = CalcMode::Spline;
                self.key_splines = other.control_points();
                self.steps = None;
            }
        }
        self
    }

    /// Timing for one entry of a CSS `animation` declaration.
    pub fn from_shorthand(animation: &AnimationShorthand) -> Self {
        AnimationTiming::new(animation.duration_ms)
            .with_delay(animation.delay_ms)
            .with_iterations(animation.iterations)
            .with_direction(animation.direction)
            .with_fill_mode(animation.fill_mode)
            .with_timing_function(animation.timing_function)
    }

    /// Total active time, `None` when infinite.
    pub fn active_duration_ms(&self) -> Option<f32> {
        match self.iterations {
            Iterations::Count(n) => Some(self.duration_ms.max(0.0) * n as f32),
            Iterations::Infinite => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_function_mapping() {
        let t = AnimationTiming::default().with_timing_function(TimingFunction::Linear);
        assert_eq!((t.calc_mode, t.key_splines), (CalcMode::Linear, None));

        let t = AnimationTiming::default().with_timing_function(TimingFunction::EaseInOut);
        assert_eq!(t.calc_mode, CalcMode::Spline);
        assert_eq!(t.key_splines, Some([0.42, 0.0, 0.58, 1.0]));

        let t = AnimationTiming::default()
            .with_timing_function(TimingFunction::CubicBezier(0.1, 0.2, 0.3, 0.4));
        assert_eq!(t.key_splines, Some([0.1, 0.2, 0.3, 0.4]));

        let t = AnimationTiming::default()
            .with_timing_function(TimingFunction::Steps(4, StepPosition::Start));
        assert_eq!(t.calc_mode, CalcMode::Discrete);
        assert_eq!(t.key_splines, None);
        assert_eq!(
            t.steps,
            Some(Steps {
                count: 4,
                position: StepPosition::Start
            })
        );
    }

    #[test]
    fn test_from_shorthand() {
        let shorthand = AnimationShorthand::parse("spin 2s 500ms 3 alternate both linear");
        let t = AnimationTiming::from_shorthand(&shorthand);
        assert_eq!(t.duration_ms, 2000.0);
        assert_eq!(t.delay_ms, 500.0);
        assert_eq!(t.iterations, Iterations::Count(3));
        assert_eq!(t.direction, AnimationDirection::Alternate);
        assert_eq!(t.fill_mode, AnimationFillMode::Both);
        assert_eq!(t.calc_mode, CalcMode::Linear);
        assert_eq!(t.active_duration_ms(), Some(6000.0));
    }

    #[test]
    fn test_calc_mode_parse() {
        assert_eq!(CalcMode::parse("spline"), Some(CalcMode::Spline));
        assert_eq!(CalcMode::parse("bogus"), None);
    }
}
