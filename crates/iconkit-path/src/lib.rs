//! # IconKit Path
//!
//! The SVG path mini-language: typed commands, a strict parser, a
//! canonical serializer and helpers for renderers.
//!
//! ```text
//! "M10 10h5v5z"
//!    └── parse_path
//!           └── [MoveTo(10,10), HorizontalToRel(5), VerticalToRel(5), Close]
//! ```
//!
//! Parsing is strict: path data is the one piece of icon markup whose
//! errors are reported to the caller instead of being skipped.

use std::fmt;
use thiserror::Error;

mod absolute;
mod cursor;
mod numbers;
mod parser;

pub use absolute::to_absolute;
pub use numbers::{parse_number_list, parse_points};
pub use parser::parse_path;

// ==================== Errors ====================

/// Errors raised while parsing path data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("path data must start with a move command, found '{found}' at offset {offset}")]
    NoLeadingCommand { found: String, offset: usize },

    #[error("unknown path command '{command}' at offset {offset}")]
    UnknownCommand { command: char, offset: usize },

    #[error(
        "path command '{command}' needs {expected} parameters, found {found} (offset {offset})"
    )]
    MissingParameters {
        command: char,
        expected: usize,
        found: usize,
        offset: usize,
    },

    #[error("invalid number '{token}' at offset {offset}")]
    InvalidNumber { token: String, offset: usize },

    #[error("path command '{command}' takes no parameters, found a number at offset {offset}")]
    UnexpectedNumber { command: char, offset: usize },
}

impl PathError {
    /// Byte offset into the path data where the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            PathError::NoLeadingCommand { offset, .. }
            | PathError::UnknownCommand { offset, .. }
            | PathError::MissingParameters { offset, .. }
            | PathError::InvalidNumber { offset, .. }
            | PathError::UnexpectedNumber { offset, .. } => *offset,
        }
    }
}

// ==================== Commands ====================

/// A single path command.
///
/// Relative variants carry offsets from the current point; the renderer
/// resolves them (see [`to_absolute`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Move to (absolute).
    MoveTo(f32, f32),
    /// Move to (relative).
    MoveToRel(f32, f32),
    /// Line to (absolute).
    LineTo(f32, f32),
    /// Line to (relative).
    LineToRel(f32, f32),
    /// Horizontal line (absolute).
    HorizontalTo(f32),
    /// Horizontal line (relative).
    HorizontalToRel(f32),
    /// Vertical line (absolute).
    VerticalTo(f32),
    /// Vertical line (relative).
    VerticalToRel(f32),
    /// Cubic bezier (absolute): x1, y1, x2, y2, x, y.
    CubicTo(f32, f32, f32, f32, f32, f32),
    /// Cubic bezier (relative).
    CubicToRel(f32, f32, f32, f32, f32, f32),
    /// Smooth cubic bezier (absolute): x2, y2, x, y.
    SmoothCubicTo(f32, f32, f32, f32),
    /// Smooth cubic bezier (relative).
    SmoothCubicToRel(f32, f32, f32, f32),
    /// Quadratic bezier (absolute): x1, y1, x, y.
    QuadTo(f32, f32, f32, f32),
    /// Quadratic bezier (relative).
    QuadToRel(f32, f32, f32, f32),
    /// Smooth quadratic bezier (absolute).
    SmoothQuadTo(f32, f32),
    /// Smooth quadratic bezier (relative).
    SmoothQuadToRel(f32, f32),
    /// Arc (absolute): rx, ry, x-axis rotation, large-arc, sweep, x, y.
    ArcTo(f32, f32, f32, bool, bool, f32, f32),
    /// Arc (relative).
    ArcToRel(f32, f32, f32, bool, bool, f32, f32),
    /// Close path.
    Close,
}

impl PathCommand {
    /// The command letter used in path data.
    pub fn letter(&self) -> char {
        match self {
            PathCommand::MoveTo(..) => 'M',
            PathCommand::MoveToRel(..) => 'm',
            PathCommand::LineTo(..) => 'L',
            PathCommand::LineToRel(..) => 'l',
            PathCommand::HorizontalTo(..) => 'H',
            PathCommand::HorizontalToRel(..) => 'h',
            PathCommand::VerticalTo(..) => 'V',
            PathCommand::VerticalToRel(..) => 'v',
            PathCommand::CubicTo(..) => 'C',
            PathCommand::CubicToRel(..) => 'c',
            PathCommand::SmoothCubicTo(..) => 'S',
            PathCommand::SmoothCubicToRel(..) => 's',
            PathCommand::QuadTo(..) => 'Q',
            PathCommand::QuadToRel(..) => 'q',
            PathCommand::SmoothQuadTo(..) => 'T',
            PathCommand::SmoothQuadToRel(..) => 't',
            PathCommand::ArcTo(..) => 'A',
            PathCommand::ArcToRel(..) => 'a',
            PathCommand::Close => 'Z',
        }
    }

    /// Whether the coordinates are relative to the current point.
    pub fn is_relative(&self) -> bool {
        self.letter().is_ascii_lowercase()
    }

    /// Whether this command starts a new subpath.
    pub fn is_move(&self) -> bool {
        matches!(self, PathCommand::MoveTo(..) | PathCommand::MoveToRel(..))
    }
}

fn flag(b: bool) -> u8 {
    u8::from(b)
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = self.letter();
        match *self {
            PathCommand::MoveTo(x, y)
            | PathCommand::MoveToRel(x, y)
            | PathCommand::LineTo(x, y)
            | PathCommand::LineToRel(x, y)
            | PathCommand::SmoothQuadTo(x, y)
            | PathCommand::SmoothQuadToRel(x, y) => write!(f, "{letter}{x} {y}"),
            PathCommand::HorizontalTo(v)
            | PathCommand::HorizontalToRel(v)
            | PathCommand::VerticalTo(v)
            | PathCommand::VerticalToRel(v) => write!(f, "{letter}{v}"),
            PathCommand::CubicTo(x1, y1, x2, y2, x, y)
            | PathCommand::CubicToRel(x1, y1, x2, y2, x, y) => {
                write!(f, "{letter}{x1} {y1} {x2} {y2} {x} {y}")
            }
            PathCommand::SmoothCubicTo(a, b, x, y)
            | PathCommand::SmoothCubicToRel(a, b, x, y)
            | PathCommand::QuadTo(a, b, x, y)
            | PathCommand::QuadToRel(a, b, x, y) => write!(f, "{letter}{a} {b} {x} {y}"),
            PathCommand::ArcTo(rx, ry, rot, large, sweep, x, y)
            | PathCommand::ArcToRel(rx, ry, rot, large, sweep, x, y) => write!(
                f,
                "{letter}{rx} {ry} {rot} {} {} {x} {y}",
                flag(large),
                flag(sweep)
            ),
            PathCommand::Close => write!(f, "Z"),
        }
    }
}

/// Serialize commands to canonical path data.
///
/// `parse_path(&to_path_data(cmds))` yields `cmds` again.
pub fn to_path_data(commands: &[PathCommand]) -> String {
    commands
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(PathCommand::MoveTo(10.0, -20.5).to_string(), "M10 -20.5");
        assert_eq!(PathCommand::HorizontalToRel(3.0).to_string(), "h3");
        assert_eq!(
            PathCommand::ArcTo(5.0, 5.0, 0.0, true, false, 10.0, 10.0).to_string(),
            "A5 5 0 1 0 10 10"
        );
        assert_eq!(PathCommand::Close.to_string(), "Z");
    }

    #[test]
    fn test_to_path_data_round_trip() {
        let cmds = parse_path("M0 0 10 10c1 2 3 4 5 6s1 1 2 2a25,25 -30 0,1 50,-25z").unwrap();
        let text = to_path_data(&cmds);
        assert_eq!(parse_path(&text).unwrap(), cmds);
    }

    #[test]
    fn test_letters() {
        assert!(PathCommand::LineToRel(1.0, 1.0).is_relative());
        assert!(!PathCommand::Close.is_relative());
        assert!(PathCommand::MoveToRel(0.0, 0.0).is_move());
    }

    #[test]
    fn test_error_offset() {
        let err = parse_path("M0 0 L5").unwrap_err();
        assert!(matches!(err, PathError::MissingParameters { command: 'L', .. }));
        assert_eq!(err.offset(), 7);
    }
}
