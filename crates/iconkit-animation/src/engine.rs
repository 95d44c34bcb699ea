//! The timing engine: elapsed time to progress, as a pure function.
//!
//! Nothing here keeps state between calls. Renderers may call
//! [`progress_at`] or [`sample`] with any elapsed time, in any order,
//! from any thread, and get the same answer for the same input.

use crate::timing::{AnimationTiming, CalcMode, Steps};
use iconkit_css::{AnimationDirection, Iterations, StepPosition};

/// Result of sampling an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    /// Outside the active interval and not filling; leave the property
    /// at its base value.
    Inactive,
    /// Progress in [0, 1].
    Active(f32),
}

impl Progress {
    pub fn value(self) -> Option<f32> {
        match self {
            Progress::Inactive => None,
            Progress::Active(p) => Some(p),
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Progress::Active(_))
    }
}

/// Progress for `timing` at `elapsed_ms` since the cycle start, given the
/// number of iterations already completed.
///
/// Order of evaluation:
/// 1. before the delay: 0 when filling backwards, else inactive;
/// 2. finite iterations used up: 1 when filling forwards, else inactive;
/// 3. local time within the current iteration;
/// 4. direction (reverse, alternate by iteration parity);
/// 5. easing by calc mode.
///
/// Non-finite elapsed time is inactive.
pub fn progress_at(timing: &AnimationTiming, elapsed_ms: f32, completed_iterations: u32) -> Progress {
    if !elapsed_ms.is_finite() {
        return Progress::Inactive;
    }

    if elapsed_ms < timing.delay_ms {
        return if timing.fill_mode.fills_backwards() {
            Progress::Active(0.0)
        } else {
            Progress::Inactive
        };
    }

    if let Iterations::Count(n) = timing.iterations {
        if completed_iterations >= n {
            return if timing.fill_mode.fills_forwards() {
                Progress::Active(1.0)
            } else {
                Progress::Inactive
            };
        }
    }

    let local = local_time(timing, elapsed_ms);
    let directed = apply_direction(timing.direction, local, completed_iterations);
    let eased = ease(timing, directed);

    Progress::Active(eased.clamp(0.0, 1.0))
}

/// Iterations completed by `elapsed_ms`, derived from time alone.
pub fn completed_iterations(timing: &AnimationTiming, elapsed_ms: f32) -> u32 {
    if !elapsed_ms.is_finite() || elapsed_ms < timing.delay_ms {
        return 0;
    }
    if timing.duration_ms <= 0.0 {
        return match timing.iterations {
            Iterations::Count(n) => n,
            Iterations::Infinite => 0,
        };
    }
    // Float-to-int casts saturate.
    ((elapsed_ms - timing.delay_ms) / timing.duration_ms).floor() as u32
}

/// [`progress_at`] with the iteration count derived from `elapsed_ms`.
pub fn sample(timing: &AnimationTiming, elapsed_ms: f32) -> Progress {
    progress_at(timing, elapsed_ms, completed_iterations(timing, elapsed_ms))
}

fn local_time(timing: &AnimationTiming, elapsed_ms: f32) -> f32 {
    if timing.duration_ms <= 0.0 {
        return 1.0;
    }
    let active = elapsed_ms - timing.delay_ms;
    (active.rem_euclid(timing.duration_ms) / timing.duration_ms).clamp(0.0, 1.0)
}

fn apply_direction(direction: AnimationDirection, t: f32, completed_iterations: u32) -> f32 {
    let odd = completed_iterations % 2 == 1;
    let invert = match direction {
        AnimationDirection::Normal => false,
        AnimationDirection::Reverse => true,
        AnimationDirection::Alternate => odd,
        AnimationDirection::AlternateReverse => !odd,
    };
    if invert {
        1.0 - t
    } else {
        t
    }
}

fn ease(timing: &AnimationTiming, t: f32) -> f32 {
    match timing.calc_mode {
        CalcMode::Linear | CalcMode::Paced => t,
        CalcMode::Discrete => match timing.steps {
            Some(steps) => step_function(steps, t),
            // Two values: the first holds for the first half.
            None => {
                if t < 0.5 {
                    0.0
                } else {
                    1.0
                }
            }
        },
        CalcMode::Spline => match timing.key_splines {
            Some([x1, y1, x2, y2]) => {
                cubic_bezier(x1 as f64, y1 as f64, x2 as f64, y2 as f64, t as f64) as f32
            }
            None => t,
        },
    }
}

/// CSS step easing.
fn step_function(steps: Steps, t: f32) -> f32 {
    let n = steps.count.max(1) as f32;

    match steps.position {
        StepPosition::Start => (t * n).ceil() / n,
        StepPosition::End => (t * n).floor() / n,
        StepPosition::Both => ((t * n).floor() + 1.0).min(n + 1.0) / (n + 1.0),
        StepPosition::None => {
            if n <= 1.0 {
                t
            } else {
                ((t * n).floor().min(n - 1.0)) / (n - 1.0)
            }
        }
    }
}

// ==================== Cubic bezier ====================

/// Solve the curve through (0,0), (x1,y1), (x2,y2), (1,1) for `y` at `x`.
///
/// Newton-Raphson first; bisection when the slope flattens out.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    const EPSILON: f64 = 1e-7;
    let mut t = x;

    for _ in 0..8 {
        let err = bezier_value(x1, x2, t) - x;
        if err.abs() < EPSILON {
            return bezier_value(y1, y2, t);
        }
        let slope = bezier_derivative(x1, x2, t);
        if slope.abs() < 1e-6 {
            break;
        }
        t -= err / slope;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    t = x;
    for _ in 0..64 {
        let value = bezier_value(x1, x2, t);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) / 2.0;
    }

    bezier_value(y1, y2, t)
}

/// B(t) = 3(1-t)^2 t P1 + 3(1-t) t^2 P2 + t^3
fn bezier_value(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

/// B'(t) = 3(1-t)^2 P1 + 6(1-t) t (P2-P1) + 3 t^2 (1-P2)
fn bezier_derivative(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iconkit_css::AnimationFillMode;

    fn one_second() -> AnimationTiming {
        AnimationTiming::new(1000.0).with_fill_mode(AnimationFillMode::Forwards)
    }

    fn approx(p: Progress, expected: f32) -> bool {
        p.value().is_some_and(|v| (v - expected).abs() < 1e-4)
    }

    #[test]
    fn test_linear_forwards() {
        let t = one_second();
        assert_eq!(progress_at(&t, 0.0, 0), Progress::Active(0.0));
        assert_eq!(progress_at(&t, 500.0, 0), Progress::Active(0.5));
        assert_eq!(progress_at(&t, 1500.0, 1), Progress::Active(1.0));
    }

    #[test]
    fn test_without_forwards_fill_ends_inactive() {
        let t = AnimationTiming::new(1000.0);
        assert_eq!(progress_at(&t, 1500.0, 1), Progress::Inactive);
    }

    #[test]
    fn test_delay_and_backwards_fill() {
        let t = AnimationTiming::new(1000.0).with_delay(200.0);
        assert_eq!(progress_at(&t, 100.0, 0), Progress::Inactive);

        let t = t.with_fill_mode(AnimationFillMode::Backwards);
        assert_eq!(progress_at(&t, 100.0, 0), Progress::Active(0.0));
        assert_eq!(progress_at(&t, 700.0, 0), Progress::Active(0.5));
    }

    #[test]
    fn test_alternate_inverts_odd_iterations() {
        let t = AnimationTiming::new(1000.0)
            .with_iterations(Iterations::Count(2))
            .with_direction(AnimationDirection::Alternate);
        assert_eq!(progress_at(&t, 250.0, 0), Progress::Active(0.25));
        assert_eq!(progress_at(&t, 1250.0, 1), Progress::Active(0.75));
    }

    #[test]
    fn test_reverse_and_alternate_reverse() {
        let rev = AnimationTiming::new(1000.0).with_direction(AnimationDirection::Reverse);
        assert_eq!(progress_at(&rev, 250.0, 0), Progress::Active(0.75));

        let alt = AnimationTiming::new(1000.0)
            .with_iterations(Iterations::Infinite)
            .with_direction(AnimationDirection::AlternateReverse);
        assert_eq!(progress_at(&alt, 250.0, 0), Progress::Active(0.75));
        assert_eq!(progress_at(&alt, 1250.0, 1), Progress::Active(0.25));
    }

    #[test]
    fn test_infinite_wraps() {
        let t = AnimationTiming::new(1000.0).with_iterations(Iterations::Infinite);
        assert_eq!(sample(&t, 10_250.0), Progress::Active(0.25));
        assert_eq!(completed_iterations(&t, 10_250.0), 10);
    }

    #[test]
    fn test_zero_duration_is_instant() {
        let t = AnimationTiming::new(0.0).with_fill_mode(AnimationFillMode::Both);
        assert_eq!(progress_at(&t, 0.0, 0), Progress::Active(1.0));
        assert_eq!(sample(&t, 5.0), Progress::Active(1.0));
    }

    #[test]
    fn test_discrete_without_steps_jumps_at_midpoint() {
        let mut t = AnimationTiming::new(1000.0);
        t.calc_mode = CalcMode::Discrete;
        assert_eq!(progress_at(&t, 499.0, 0), Progress::Active(0.0));
        assert_eq!(progress_at(&t, 500.0, 0), Progress::Active(1.0));
    }

    #[test]
    fn test_step_positions() {
        let end = Steps {
            count: 4,
            position: StepPosition::End,
        };
        assert_eq!(step_function(end, 0.24), 0.0);
        assert_eq!(step_function(end, 0.26), 0.25);

        let start = Steps {
            count: 4,
            position: StepPosition::Start,
        };
        assert_eq!(step_function(start, 0.01), 0.25);

        let both = Steps {
            count: 2,
            position: StepPosition::Both,
        };
        assert!((step_function(both, 0.0) - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(step_function(both, 1.0), 1.0);

        let none = Steps {
            count: 3,
            position: StepPosition::None,
        };
        assert_eq!(step_function(none, 0.0), 0.0);
        assert_eq!(step_function(none, 0.5), 0.5);
        assert_eq!(step_function(none, 1.0), 1.0);
    }

    #[test]
    fn test_spline_easing() {
        let t = AnimationTiming::new(1000.0).with_key_splines([0.25, 0.1, 0.25, 1.0]);
        assert_eq!(progress_at(&t, 0.0, 0), Progress::Active(0.0));
        assert!(progress_at(&t, 500.0, 0).value().unwrap() > 0.5);

        let linear_curve = AnimationTiming::new(1000.0).with_key_splines([0.0, 0.0, 1.0, 1.0]);
        assert!(approx(progress_at(&linear_curve, 300.0, 0), 0.3));
    }

    #[test]
    fn test_bezier_solves_at_flat_slope() {
        let y = cubic_bezier(1.0, 0.0, 0.0, 1.0, 0.5);
        assert!((y - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_scrubbing_is_order_independent() {
        let t = AnimationTiming::new(800.0)
            .with_iterations(Iterations::Count(3))
            .with_direction(AnimationDirection::Alternate)
            .with_key_splines([0.42, 0.0, 0.58, 1.0]);
        let forward: Vec<Progress> = [0.0, 400.0, 900.0, 2000.0].iter().map(|e| sample(&t, *e)).collect();
        let backward: Vec<Progress> = [2000.0, 900.0, 400.0, 0.0].iter().map(|e| sample(&t, *e)).collect();
        assert_eq!(forward, backward.into_iter().rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_non_finite_elapsed() {
        let t = one_second();
        assert_eq!(progress_at(&t, f32::NAN, 0), Progress::Inactive);
        assert_eq!(sample(&t, f32::INFINITY), Progress::Inactive);
    }
}
