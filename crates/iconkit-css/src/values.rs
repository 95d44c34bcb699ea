//! Scalar CSS value helpers shared by the stylesheet and SVG layers.

/// Parse a plain number, tolerating a trailing `px` unit.
pub fn parse_number(value: &str) -> Option<f32> {
    let value = value.trim();
    let value = value.strip_suffix("px").unwrap_or(value).trim_end();
    value.parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Parse an angle into degrees. Bare numbers are degrees.
pub fn parse_angle(value: &str) -> Option<f32> {
    let value = value.trim().to_ascii_lowercase();
    let (number, factor) = if let Some(n) = value.strip_suffix("deg") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("grad") {
        (n, 0.9)
    } else if let Some(n) = value.strip_suffix("rad") {
        (n, 180.0 / std::f32::consts::PI)
    } else if let Some(n) = value.strip_suffix("turn") {
        (n, 360.0)
    } else {
        (value.as_str(), 1.0)
    };
    number
        .trim()
        .parse::<f32>()
        .ok()
        .map(|v| v * factor)
        .filter(|v| v.is_finite())
}

/// Parse a CSS `<time>` (`250ms`, `1.5s`) into milliseconds.
///
/// A unit is required; bare numbers are not times in CSS.
pub fn parse_css_time(value: &str) -> Option<f32> {
    let value = value.trim().to_ascii_lowercase();
    let ms = if let Some(n) = value.strip_suffix("ms") {
        n.parse::<f32>().ok()?
    } else if let Some(n) = value.strip_suffix('s') {
        n.parse::<f32>().ok()? * 1000.0
    } else {
        return None;
    };
    ms.is_finite().then_some(ms)
}

/// Parse a `stroke-dasharray` value.
///
/// `none` yields an empty list. Negative or malformed entries make the
/// whole value invalid. Odd-length lists are returned as written; see
/// [`normalize_dash_array`].
pub fn parse_dash_array(value: &str) -> Option<Vec<f32>> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("none") {
        return Some(Vec::new());
    }

    let dashes = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| parse_number(part).filter(|v| *v >= 0.0))
        .collect::<Option<Vec<f32>>>()?;

    if dashes.is_empty() {
        None
    } else {
        Some(dashes)
    }
}

/// Repeat an odd-length dash list so it has an even number of entries.
pub fn normalize_dash_array(dashes: &[f32]) -> Vec<f32> {
    if dashes.len() % 2 == 1 {
        dashes.iter().chain(dashes.iter()).copied().collect()
    } else {
        dashes.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("2"), Some(2.0));
        assert_eq!(parse_number(" 1.5px "), Some(1.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1e99999"), None);
    }

    #[test]
    fn test_parse_angle_units() {
        assert_eq!(parse_angle("90"), Some(90.0));
        assert_eq!(parse_angle("45deg"), Some(45.0));
        assert_eq!(parse_angle("0.5turn"), Some(180.0));
        assert_eq!(parse_angle("100grad"), Some(90.0));
        assert!((parse_angle("3.14159265rad").unwrap() - 180.0).abs() < 1e-3);
        assert_eq!(parse_angle("left"), None);
    }

    #[test]
    fn test_parse_css_time() {
        assert_eq!(parse_css_time("250ms"), Some(250.0));
        assert_eq!(parse_css_time("1.5s"), Some(1500.0));
        assert_eq!(parse_css_time("2S"), Some(2000.0));
        assert_eq!(parse_css_time("2"), None);
        assert_eq!(parse_css_time("spins"), None);
    }

    #[test]
    fn test_parse_dash_array() {
        assert_eq!(parse_dash_array("5 3 2"), Some(vec![5.0, 3.0, 2.0]));
        assert_eq!(parse_dash_array("4px, 2px"), Some(vec![4.0, 2.0]));
        assert_eq!(parse_dash_array("none"), Some(vec![]));
        assert_eq!(parse_dash_array("1 -2"), None);
        assert_eq!(parse_dash_array(""), None);
    }

    #[test]
    fn test_normalize_dash_array() {
        assert_eq!(
            normalize_dash_array(&[5.0, 3.0, 2.0]),
            vec![5.0, 3.0, 2.0, 5.0, 3.0, 2.0]
        );
        let even = [4.0, 2.0];
        assert_eq!(normalize_dash_array(&even), even.to_vec());
        let once = normalize_dash_array(&[1.0]);
        assert_eq!(normalize_dash_array(&once), once);
    }
}
