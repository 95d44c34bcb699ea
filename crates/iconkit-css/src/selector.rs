//! Simple selectors and element matching.

use smallvec::SmallVec;
use std::fmt;

/// A supported selector. Anything more complex is dropped at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `*`
    Universal,
    /// `circle`
    Tag(String),
    /// `.name`
    Class(String),
    /// `#name`
    Id(String),
}

impl Selector {
    /// Parse a single selector, returning `None` for unsupported forms
    /// (compound, combinator, attribute, pseudo-class).
    pub fn parse(text: &str) -> Option<Selector> {
        let text = text.trim();
        if text == "*" {
            return Some(Selector::Universal);
        }
        if let Some(name) = text.strip_prefix('.') {
            return is_identifier(name).then(|| Selector::Class(name.to_string()));
        }
        if let Some(name) = text.strip_prefix('#') {
            return is_identifier(name).then(|| Selector::Id(name.to_string()));
        }
        is_identifier(text).then(|| Selector::Tag(text.to_ascii_lowercase()))
    }

    /// Fixed rank: universal 0, tag 1, class 2, id 3.
    pub fn specificity(&self) -> u8 {
        match self {
            Selector::Universal => 0,
            Selector::Tag(_) => 1,
            Selector::Class(_) => 2,
            Selector::Id(_) => 3,
        }
    }

    pub fn matches(&self, target: &StyleTarget<'_>) -> bool {
        match self {
            Selector::Universal => true,
            Selector::Tag(name) => name.eq_ignore_ascii_case(target.tag),
            Selector::Class(name) => target.classes.iter().any(|c| c == name),
            Selector::Id(name) => target.id == Some(name.as_str()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Universal => write!(f, "*"),
            Selector::Tag(name) => write!(f, "{}", name),
            Selector::Class(name) => write!(f, ".{}", name),
            Selector::Id(name) => write!(f, "#{}", name),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '-' || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-' || !c.is_ascii())
}

/// The parts of an element that selectors look at.
#[derive(Debug, Clone, Default)]
pub struct StyleTarget<'a> {
    pub tag: &'a str,
    pub id: Option<&'a str>,
    pub classes: SmallVec<[&'a str; 4]>,
}

impl<'a> StyleTarget<'a> {
    pub fn new(tag: &'a str) -> Self {
        Self {
            tag,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: Option<&'a str>) -> Self {
        self.id = id.map(str::trim).filter(|id| !id.is_empty());
        self
    }

    /// Add every whitespace-separated name from a `class` attribute.
    pub fn with_class_attr(mut self, classes: Option<&'a str>) -> Self {
        if let Some(classes) = classes {
            self.classes.extend(classes.split_whitespace());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_selectors() {
        assert_eq!(Selector::parse("*"), Some(Selector::Universal));
        assert_eq!(Selector::parse("Circle"), Some(Selector::Tag("circle".into())));
        assert_eq!(Selector::parse(".spin"), Some(Selector::Class("spin".into())));
        assert_eq!(Selector::parse(" #dot "), Some(Selector::Id("dot".into())));
    }

    #[test]
    fn test_unsupported_selectors_dropped() {
        assert_eq!(Selector::parse("g circle"), None);
        assert_eq!(Selector::parse("g > circle"), None);
        assert_eq!(Selector::parse("circle.c"), None);
        assert_eq!(Selector::parse("[fill]"), None);
        assert_eq!(Selector::parse("path:hover"), None);
        assert_eq!(Selector::parse("."), None);
        assert_eq!(Selector::parse("#1a"), None);
    }

    #[test]
    fn test_specificity_order() {
        let ranks: Vec<u8> = ["*", "rect", ".a", "#b"]
            .iter()
            .filter_map(|s| Selector::parse(s))
            .map(|s| s.specificity())
            .collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_matching() {
        let target = StyleTarget::new("circle")
            .with_id(Some("x"))
            .with_class_attr(Some("a  b"));
        assert!(Selector::Universal.matches(&target));
        assert!(Selector::Tag("circle".into()).matches(&target));
        assert!(!Selector::Tag("rect".into()).matches(&target));
        assert!(Selector::Class("b".into()).matches(&target));
        assert!(!Selector::Class("c".into()).matches(&target));
        assert!(Selector::Id("x".into()).matches(&target));
        assert!(!Selector::Id("y".into()).matches(&StyleTarget::new("circle")));
    }
}
