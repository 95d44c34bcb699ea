//! Stylesheet parsing: rules, `@keyframes` and declaration blocks.

use crate::selector::{Selector, StyleTarget};
use crate::Declarations;
use tracing::{debug, trace};

// ==================== Model ====================

/// A rule with a single supported selector.
///
/// Selector lists are split into one rule per member, each with a copy of
/// the declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selector: Selector,
    pub declarations: Declarations,
}

/// One keyframe. `offset` is in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    pub offset: f32,
    pub declarations: Declarations,
}

/// A named `@keyframes` block, frames ordered by offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    pub name: String,
    pub frames: Vec<Keyframe>,
}

impl Keyframes {
    pub fn first(&self) -> Option<&Keyframe> {
        self.frames.first()
    }

    pub fn last(&self) -> Option<&Keyframe> {
        self.frames.last()
    }

    /// Names of every property set in any frame, in first-seen order.
    pub fn properties(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for frame in &self.frames {
            for key in frame.declarations.keys() {
                if !seen.contains(&key.as_str()) {
                    seen.push(key);
                }
            }
        }
        seen
    }
}

/// A parsed stylesheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
    pub keyframes: Vec<Keyframes>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stylesheet. Never fails; anything unsupported is skipped.
    pub fn parse(css: &str) -> Self {
        let css = strip_comments(css);
        let mut sheet = Stylesheet::new();

        for item in Blocks::new(&css) {
            match item {
                Item::Statement(text) => {
                    if !text.is_empty() {
                        trace!(statement = text, "Skipping CSS statement");
                    }
                }
                Item::Block { prelude, body } if prelude.starts_with('@') => {
                    sheet.parse_at_rule(prelude, body);
                }
                Item::Block { prelude, body } => {
                    let declarations = parse_declarations(body);
                    if declarations.is_empty() {
                        continue;
                    }
                    for part in prelude.split(',') {
                        match Selector::parse(part) {
                            Some(selector) => sheet.rules.push(Rule {
                                selector,
                                declarations: declarations.clone(),
                            }),
                            None => trace!(selector = part.trim(), "Dropping unsupported selector"),
                        }
                    }
                }
            }
        }

        debug!(
            rules = sheet.rules.len(),
            keyframes = sheet.keyframes.len(),
            "Parsed stylesheet"
        );

        sheet
    }

    fn parse_at_rule(&mut self, prelude: &str, body: &str) {
        let (keyword, rest) = prelude
            .split_once(char::is_whitespace)
            .unwrap_or((prelude, ""));
        let keyword = keyword.to_ascii_lowercase();

        if !is_keyframes_keyword(&keyword) {
            trace!(at_rule = %keyword, "Skipping at-rule");
            return;
        }

        let name = rest.trim().trim_matches(|c| c == '"' || c == '\'');
        if name.is_empty() {
            trace!("Skipping unnamed @keyframes");
            return;
        }

        let mut frames = Vec::new();
        for item in Blocks::new(body) {
            let Item::Block { prelude, body } = item else {
                continue;
            };
            let declarations = parse_declarations(body);
            for selector in prelude.split(',') {
                match parse_keyframe_offset(selector) {
                    Some(offset) => frames.push(Keyframe {
                        offset,
                        declarations: declarations.clone(),
                    }),
                    None => trace!(selector = selector.trim(), "Dropping keyframe"),
                }
            }
        }
        frames.sort_by(|a, b| a.offset.total_cmp(&b.offset));

        self.keyframes.push(Keyframes {
            name: name.to_string(),
            frames,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.keyframes.is_empty()
    }

    /// Look up keyframes by name. A later definition replaces an earlier one.
    pub fn keyframes(&self, name: &str) -> Option<&Keyframes> {
        self.keyframes.iter().rev().find(|k| k.name == name)
    }

    /// Rules matching `target`, ordered by ascending specificity then
    /// source order.
    pub fn matching_rules(&self, target: &StyleTarget<'_>) -> Vec<&Rule> {
        let mut matched: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|rule| rule.selector.matches(target))
            .collect();
        matched.sort_by_key(|rule| rule.selector.specificity());
        matched
    }

    /// Merge matching rules in specificity order, then the inline `style`
    /// attribute on top.
    pub fn resolve(&self, target: &StyleTarget<'_>, inline: Option<&str>) -> Declarations {
        let mut resolved = Declarations::new();
        for rule in self.matching_rules(target) {
            for (property, value) in &rule.declarations {
                resolved.insert(property.clone(), value.clone());
            }
        }
        if let Some(inline) = inline {
            resolved.extend(parse_declarations(inline));
        }
        resolved
    }
}

fn is_keyframes_keyword(keyword: &str) -> bool {
    keyword == "@keyframes"
        || (keyword.starts_with("@-") && keyword.ends_with("-keyframes"))
}

/// `from` = 0, `to` = 1, `NN%` = NN/100. Out-of-range offsets are invalid.
pub fn parse_keyframe_offset(text: &str) -> Option<f32> {
    let text = text.trim().to_ascii_lowercase();
    let offset = match text.as_str() {
        "from" => 0.0,
        "to" => 1.0,
        _ => text.strip_suffix('%')?.trim().parse::<f32>().ok()? / 100.0,
    };
    (0.0..=1.0).contains(&offset).then_some(offset)
}

// ==================== Declarations ====================

/// Parse a declaration block body (or an inline `style` attribute).
pub fn parse_declarations(body: &str) -> Declarations {
    let mut declarations = Declarations::new();

    for declaration in split_top_level(body, ';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let property = property.trim().to_ascii_lowercase();
        let value = strip_important(value.trim());
        if property.is_empty() || value.is_empty() {
            continue;
        }
        declarations.insert(property, value.to_string());
    }

    declarations
}

/// Remove a trailing `!important`; it carries no extra priority here.
fn strip_important(value: &str) -> &str {
    let lower = value.to_ascii_lowercase();
    match lower.rfind("!important") {
        Some(idx) => value[..idx].trim_end(),
        None => value,
    }
}

/// Split on `separator` outside parentheses and quotes.
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ if c == separator && depth == 0 => {
                    parts.push(&text[start..i]);
                    start = i + c.len_utf8();
                }
                _ => {}
            },
        }
    }
    parts.push(&text[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

// ==================== Block scanning ====================

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut chars = css.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            while let Some(cc) = chars.next() {
                if cc == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    break;
                }
            }
            out.push(' ');
            continue;
        }
        out.push(c);
    }

    out
}

enum Item<'a> {
    /// Text terminated by `;` (or a stray `}`) outside any block.
    Statement(&'a str),
    /// `prelude { body }`. An unclosed block runs to the end of input.
    Block { prelude: &'a str, body: &'a str },
}

struct Blocks<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Blocks<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Item<'a>;

    fn next(&mut self) -> Option<Item<'a>> {
        let rest = &self.src[self.pos..];
        if rest.trim().is_empty() {
            self.pos = self.src.len();
            return None;
        }

        let bytes = rest.as_bytes();
        let mut quote: Option<u8> = None;
        for (i, &b) in bytes.iter().enumerate() {
            if let Some(q) = quote {
                if b == q {
                    quote = None;
                }
                continue;
            }
            match b {
                b'"' | b'\'' => quote = Some(b),
                b';' | b'}' => {
                    self.pos += i + 1;
                    return Some(Item::Statement(rest[..i].trim()));
                }
                b'{' => {
                    let close = matching_brace(bytes, i);
                    self.pos += (close + 1).min(rest.len());
                    return Some(Item::Block {
                        prelude: rest[..i].trim(),
                        body: &rest[i + 1..close],
                    });
                }
                _ => {}
            }
        }

        self.pos = self.src.len();
        Some(Item::Statement(rest.trim()))
    }
}

/// Index of the `}` matching the `{` at `open`, or the input length.
fn matching_brace(bytes: &[u8], open: usize) -> usize {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'"' | b'\'' => quote = Some(b),
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
    }

    bytes.len()
}
