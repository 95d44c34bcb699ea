//! Property tests for the timing engine.

use iconkit_animation::{
    progress_at, sample, AnimationDirection, AnimationFillMode, AnimationTiming, CalcMode,
    Iterations, Progress, StepPosition, Steps,
};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = AnimationDirection> {
    prop_oneof![
        Just(AnimationDirection::Normal),
        Just(AnimationDirection::Reverse),
        Just(AnimationDirection::Alternate),
        Just(AnimationDirection::AlternateReverse),
    ]
}

fn fill_mode() -> impl Strategy<Value = AnimationFillMode> {
    prop_oneof![
        Just(AnimationFillMode::None),
        Just(AnimationFillMode::Forwards),
        Just(AnimationFillMode::Backwards),
        Just(AnimationFillMode::Both),
    ]
}

fn easing() -> impl Strategy<Value = (CalcMode, Option<[f32; 4]>, Option<Steps>)> {
    prop_oneof![
        Just((CalcMode::Linear, None, None)),
        Just((CalcMode::Paced, None, None)),
        Just((CalcMode::Discrete, None, None)),
        (1u32..12, prop_oneof![
            Just(StepPosition::Start),
            Just(StepPosition::End),
            Just(StepPosition::Both),
            Just(StepPosition::None),
        ])
            .prop_map(|(count, position)| (CalcMode::Discrete, None, Some(Steps { count, position }))),
        (0.0f32..=1.0, -2.0f32..3.0, 0.0f32..=1.0, -2.0f32..3.0)
            .prop_map(|(x1, y1, x2, y2)| (CalcMode::Spline, Some([x1, y1, x2, y2]), None)),
    ]
}

fn timing() -> impl Strategy<Value = AnimationTiming> {
    (
        0.0f32..5000.0,
        -1000.0f32..1000.0,
        prop_oneof![(1u32..6).prop_map(Iterations::Count), Just(Iterations::Infinite)],
        direction(),
        fill_mode(),
        easing(),
    )
        .prop_map(|(duration, delay, iterations, direction, fill_mode, (calc_mode, key_splines, steps))| {
            AnimationTiming {
                duration_ms: duration,
                delay_ms: delay,
                calc_mode,
                key_splines,
                steps,
                iterations,
                direction,
                fill_mode,
            }
        })
}

proptest! {
    #[test]
    fn progress_is_in_unit_range(t in timing(), elapsed in -2000.0f32..60_000.0, done in 0u32..10) {
        if let Progress::Active(p) = progress_at(&t, elapsed, done) {
            prop_assert!((0.0..=1.0).contains(&p), "progress {} out of range", p);
        }
    }

    #[test]
    fn progress_is_pure(t in timing(), elapsed in -2000.0f32..60_000.0, done in 0u32..10) {
        let first = progress_at(&t, elapsed, done);
        let second = progress_at(&t, elapsed, done);
        match (first, second) {
            (Progress::Active(a), Progress::Active(b)) => prop_assert_eq!(a.to_bits(), b.to_bits()),
            (a, b) => prop_assert_eq!(a, b),
        }
    }

    #[test]
    fn sampling_order_does_not_matter(t in timing(), mut times in prop::collection::vec(-2000.0f32..20_000.0, 1..16)) {
        let forward: Vec<Option<u32>> = times.iter().map(|e| sample(&t, *e).value().map(f32::to_bits)).collect();
        times.reverse();
        let mut backward: Vec<Option<u32>> = times.iter().map(|e| sample(&t, *e).value().map(f32::to_bits)).collect();
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn before_delay_only_backwards_fill_is_active(t in timing(), early in 1.0f32..500.0) {
        let p = progress_at(&t, t.delay_ms - early, 0);
        if t.fill_mode.fills_backwards() {
            prop_assert_eq!(p, Progress::Active(0.0));
        } else {
            prop_assert_eq!(p, Progress::Inactive);
        }
    }
}
