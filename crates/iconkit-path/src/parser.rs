//! Path data parser.

use crate::cursor::{BadToken, Cursor};
use crate::{PathCommand, PathError};
use tracing::trace;

/// Number of parameters one invocation of a command consumes.
fn arity(command: u8) -> Option<usize> {
    match command.to_ascii_uppercase() {
        b'M' | b'L' | b'T' => Some(2),
        b'H' | b'V' => Some(1),
        b'C' => Some(6),
        b'S' | b'Q' => Some(4),
        b'A' => Some(7),
        b'Z' => Some(0),
        _ => None,
    }
}

impl From<BadToken> for PathError {
    fn from(bad: BadToken) -> Self {
        PathError::InvalidNumber {
            token: bad.token,
            offset: bad.offset,
        }
    }
}

/// Parse path data into commands.
///
/// - Numbers may be separated by whitespace, commas, or nothing.
/// - Extra parameter groups repeat the previous command; after `M`/`m`
///   they become `L`/`l`.
/// - Path data must begin with `M`/`m`; a leading `L`/`l` is accepted too.
/// - Empty (or all-whitespace) input yields no commands.
pub fn parse_path(text: &str) -> Result<Vec<PathCommand>, PathError> {
    let mut cursor = Cursor::new(text);
    let mut commands = Vec::new();

    cursor.skip_separators();
    let Some(first) = cursor.peek() else {
        return Ok(commands);
    };

    let offset = cursor.pos();
    if !first.is_ascii_alphabetic() {
        return Err(PathError::NoLeadingCommand {
            found: cursor.token_at(offset),
            offset,
        });
    }
    if arity(first).is_none() {
        return Err(PathError::UnknownCommand {
            command: first as char,
            offset,
        });
    }
    if !matches!(first, b'M' | b'm' | b'L' | b'l') {
        return Err(PathError::NoLeadingCommand {
            found: (first as char).to_string(),
            offset,
        });
    }
    cursor.bump();

    let mut command = first;
    loop {
        commands.push(parse_invocation(&mut cursor, command)?);

        cursor.skip_separators();
        match cursor.peek() {
            None => break,
            Some(next) if next.is_ascii_alphabetic() => {
                let offset = cursor.pos();
                if arity(next).is_none() {
                    return Err(PathError::UnknownCommand {
                        command: next as char,
                        offset,
                    });
                }
                cursor.bump();
                command = next;
            }
            Some(_) => {
                if arity(command) == Some(0) {
                    return Err(PathError::UnexpectedNumber {
                        command: command as char,
                        offset: cursor.pos(),
                    });
                }
                command = match command {
                    b'M' => b'L',
                    b'm' => b'l',
                    other => other,
                };
            }
        }
    }

    trace!(commands = commands.len(), "parsed path data");
    Ok(commands)
}

/// Parse the parameters of one command invocation.
fn parse_invocation(cursor: &mut Cursor<'_>, command: u8) -> Result<PathCommand, PathError> {
    let expected = arity(command).unwrap_or(0);
    let is_arc = command.to_ascii_uppercase() == b'A';

    let mut args = [0.0_f32; 7];
    let mut flags = [false; 2];

    for i in 0..expected {
        cursor.skip_separators();
        match cursor.peek() {
            Some(b) if !b.is_ascii_alphabetic() => {}
            _ => {
                return Err(PathError::MissingParameters {
                    command: command as char,
                    expected,
                    found: i,
                    offset: cursor.pos(),
                })
            }
        }

        if is_arc && (i == 3 || i == 4) {
            flags[i - 3] = cursor.flag()?;
        } else {
            args[i] = cursor.number()?;
        }
    }

    let [a, b, c, d, e, f, g] = args;
    let [large_arc, sweep] = flags;

    let cmd = match command {
        b'M' => PathCommand::MoveTo(a, b),
        b'm' => PathCommand::MoveToRel(a, b),
        b'L' => PathCommand::LineTo(a, b),
        b'l' => PathCommand::LineToRel(a, b),
        b'H' => PathCommand::HorizontalTo(a),
        b'h' => PathCommand::HorizontalToRel(a),
        b'V' => PathCommand::VerticalTo(a),
        b'v' => PathCommand::VerticalToRel(a),
        b'C' => PathCommand::CubicTo(a, b, c, d, e, f),
        b'c' => PathCommand::CubicToRel(a, b, c, d, e, f),
        b'S' => PathCommand::SmoothCubicTo(a, b, c, d),
        b's' => PathCommand::SmoothCubicToRel(a, b, c, d),
        b'Q' => PathCommand::QuadTo(a, b, c, d),
        b'q' => PathCommand::QuadToRel(a, b, c, d),
        b'T' => PathCommand::SmoothQuadTo(a, b),
        b't' => PathCommand::SmoothQuadToRel(a, b),
        // Arc slots 3 and 4 are the flags; the endpoint lives in slots 5 and 6.
        b'A' => PathCommand::ArcTo(a, b, c, large_arc, sweep, f, g),
        b'a' => PathCommand::ArcToRel(a, b, c, large_arc, sweep, f, g),
        _ => PathCommand::Close,
    };
    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use PathCommand::*;

    #[test]
    fn test_path_parse() {
        let commands = parse_path("M 10 20 L 30 40 Z").unwrap();
        assert_eq!(commands, vec![MoveTo(10.0, 20.0), LineTo(30.0, 40.0), Close]);
    }

    #[test]
    fn test_path_bezier() {
        let commands = parse_path("M 0 0 C 10 20 30 40 50 60").unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1], CubicTo(10.0, 20.0, 30.0, 40.0, 50.0, 60.0));
    }

    #[test]
    fn test_implicit_line_after_move() {
        let commands = parse_path("M0 0 10 10 20 20").unwrap();
        assert_eq!(
            commands,
            vec![MoveTo(0.0, 0.0), LineTo(10.0, 10.0), LineTo(20.0, 20.0)]
        );

        let commands = parse_path("m1 1 2 2").unwrap();
        assert_eq!(commands, vec![MoveToRel(1.0, 1.0), LineToRel(2.0, 2.0)]);
    }

    #[test]
    fn test_implicit_repeat_of_curves() {
        let commands = parse_path("M0 0c1 1 2 2 3 3 4 4 5 5 6 6").unwrap();
        assert_eq!(
            commands,
            vec![
                MoveTo(0.0, 0.0),
                CubicToRel(1.0, 1.0, 2.0, 2.0, 3.0, 3.0),
                CubicToRel(4.0, 4.0, 5.0, 5.0, 6.0, 6.0),
            ]
        );
    }

    #[test]
    fn test_consecutive_decimals() {
        assert_eq!(parse_path("M.5.5").unwrap(), vec![MoveTo(0.5, 0.5)]);
        assert_eq!(
            parse_path("M-5-10l.5-.5").unwrap(),
            vec![MoveTo(-5.0, -10.0), LineToRel(0.5, -0.5)]
        );
    }

    #[test]
    fn test_arc_flags_without_separators() {
        let commands = parse_path("M0 0a25,25 -30 0,1 50,-25").unwrap();
        assert_eq!(commands[1], ArcToRel(25.0, 25.0, -30.0, false, true, 50.0, -25.0));

        let commands = parse_path("M0 0A1 1 0 1150 50").unwrap();
        assert_eq!(commands[1], ArcTo(1.0, 1.0, 0.0, true, true, 50.0, 50.0));

        let commands = parse_path("M0 0a1 1 0 00.5.5").unwrap();
        assert_eq!(commands[1], ArcToRel(1.0, 1.0, 0.0, false, false, 0.5, 0.5));
    }

    #[test]
    fn test_bad_arc_flag() {
        let err = parse_path("M0 0A1 1 0 2 0 5 5").unwrap_err();
        assert!(matches!(err, PathError::InvalidNumber { ref token, .. } if token == "2"));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_path("").unwrap().is_empty());
        assert!(parse_path("  \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_leading_line_is_lenient() {
        assert_eq!(
            parse_path("L1 2 3 4").unwrap(),
            vec![LineTo(1.0, 2.0), LineTo(3.0, 4.0)]
        );
        assert_eq!(parse_path("l1 2").unwrap(), vec![LineToRel(1.0, 2.0)]);
    }

    #[test]
    fn test_no_leading_command() {
        let err = parse_path("10 20").unwrap_err();
        assert!(matches!(err, PathError::NoLeadingCommand { ref found, offset: 0 } if found == "10"));

        let err = parse_path("C1 2 3 4 5 6").unwrap_err();
        assert!(matches!(err, PathError::NoLeadingCommand { .. }));
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_path("M0 0 X5 5").unwrap_err();
        assert_eq!(
            err,
            PathError::UnknownCommand {
                command: 'X',
                offset: 5
            }
        );
        assert!(matches!(parse_path("B1 1"), Err(PathError::UnknownCommand { .. })));
    }

    #[test]
    fn test_missing_parameters() {
        let err = parse_path("M0 0 C1 2 3 4").unwrap_err();
        assert!(matches!(
            err,
            PathError::MissingParameters {
                command: 'C',
                expected: 6,
                found: 4,
                ..
            }
        ));

        let err = parse_path("M0 0 L5 Z").unwrap_err();
        assert!(matches!(err, PathError::MissingParameters { found: 1, .. }));
    }

    #[test]
    fn test_invalid_number() {
        let err = parse_path("M0 0 L5 #").unwrap_err();
        assert!(matches!(err, PathError::InvalidNumber { ref token, .. } if token == "#"));
    }

    #[test]
    fn test_numbers_after_close() {
        let err = parse_path("M0 0 Z 5 5").unwrap_err();
        assert!(matches!(err, PathError::UnexpectedNumber { command: 'Z', .. }));
    }

    #[test]
    fn test_multiple_subpaths_are_flat() {
        let commands = parse_path("M0 0h10v10zM20 20h5z").unwrap();
        assert_eq!(
            commands,
            vec![
                MoveTo(0.0, 0.0),
                HorizontalToRel(10.0),
                VerticalToRel(10.0),
                Close,
                MoveTo(20.0, 20.0),
                HorizontalToRel(5.0),
                Close,
            ]
        );
    }
}
