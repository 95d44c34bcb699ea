//! Lenient number-list scanning for attributes such as `points`,
//! `viewBox` and `stroke-dasharray`.

use crate::cursor::Cursor;

/// Read numbers until the first token that is not a number.
///
/// Uses the path tokenizer's number grammar, so `10-5.5.5` reads as
/// `[10, -5.5, 0.5]`. Never fails; malformed input truncates the list.
pub fn parse_number_list(text: &str) -> Vec<f32> {
    let mut cursor = Cursor::new(text);
    let mut out = Vec::new();
    loop {
        cursor.skip_separators();
        if !cursor.at_number_start() {
            break;
        }
        match cursor.number() {
            Ok(value) => out.push(value),
            Err(_) => break,
        }
    }
    out
}

/// Read coordinate pairs. A trailing unpaired coordinate is dropped.
pub fn parse_points(text: &str) -> Vec<(f32, f32)> {
    parse_number_list(text)
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_points() {
        let points = parse_points("10,20 30,40 50,60");
        assert_eq!(points, vec![(10.0, 20.0), (30.0, 40.0), (50.0, 60.0)]);
    }

    #[test]
    fn test_parse_points_drops_odd_tail() {
        assert_eq!(parse_points("1 2 3"), vec![(1.0, 2.0)]);
        assert!(parse_points("").is_empty());
    }

    #[test]
    fn test_number_list_stops_at_garbage() {
        assert_eq!(parse_number_list("0 0 24 24"), vec![0.0, 0.0, 24.0, 24.0]);
        assert_eq!(parse_number_list("5, 3 2 px 7"), vec![5.0, 3.0, 2.0]);
        assert_eq!(parse_number_list("10-5.5.5"), vec![10.0, -5.5, 0.5]);
    }
}
