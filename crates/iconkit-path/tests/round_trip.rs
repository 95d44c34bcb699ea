//! Property tests for path parsing.

use iconkit_path::{parse_path, to_absolute, to_path_data, PathCommand};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f32> {
    (-10_000i32..10_000).prop_map(|v| v as f32 / 8.0)
}

fn command() -> impl Strategy<Value = PathCommand> {
    prop_oneof![
        (coord(), coord()).prop_map(|(x, y)| PathCommand::LineTo(x, y)),
        (coord(), coord()).prop_map(|(x, y)| PathCommand::LineToRel(x, y)),
        coord().prop_map(PathCommand::HorizontalTo),
        coord().prop_map(PathCommand::VerticalToRel),
        (coord(), coord(), coord(), coord(), coord(), coord())
            .prop_map(|(a, b, c, d, e, f)| PathCommand::CubicTo(a, b, c, d, e, f)),
        (coord(), coord(), coord(), coord())
            .prop_map(|(a, b, c, d)| PathCommand::SmoothCubicToRel(a, b, c, d)),
        (coord(), coord(), coord(), coord()).prop_map(|(a, b, c, d)| PathCommand::QuadTo(a, b, c, d)),
        (coord(), coord()).prop_map(|(x, y)| PathCommand::SmoothQuadTo(x, y)),
        (coord(), coord(), coord(), any::<bool>(), any::<bool>(), coord(), coord()).prop_map(
            |(rx, ry, rot, large, sweep, x, y)| PathCommand::ArcToRel(rx, ry, rot, large, sweep, x, y)
        ),
        Just(PathCommand::Close),
    ]
}

fn path() -> impl Strategy<Value = Vec<PathCommand>> {
    (coord(), coord(), prop::collection::vec(command(), 0..24)).prop_map(|(x, y, rest)| {
        let mut cmds = vec![PathCommand::MoveTo(x, y)];
        for cmd in rest {
            // Numbers straight after Z are invalid, so a subpath restarts with a move.
            if matches!(cmds.last(), Some(PathCommand::Close)) {
                cmds.push(PathCommand::MoveToRel(1.0, 1.0));
            }
            cmds.push(cmd);
        }
        cmds
    })
}

proptest! {
    #[test]
    fn serialized_paths_reparse_identically(cmds in path()) {
        let text = to_path_data(&cmds);
        let reparsed = parse_path(&text).unwrap();
        prop_assert_eq!(reparsed, cmds);
    }

    #[test]
    fn parse_never_panics(text in "[MmLlHhVvCcSsQqTtAaZz0-9 ,.eE+-]{0,64}") {
        let _ = parse_path(&text);
    }

    #[test]
    fn absolute_form_preserves_length(cmds in path()) {
        let abs = to_absolute(&cmds);
        prop_assert_eq!(abs.len(), cmds.len());
        prop_assert!(abs.iter().all(|c| !c.is_relative()));
    }
}
