//! Non-validating markup scanner.
//!
//! A byte cursor over the source text that yields opening tags, skips
//! comments, CDATA, declarations and stray close tags, and finds the
//! close tag matching an element by counting nested same-name tags.
//! All delimiters are ASCII, so byte offsets always land on char
//! boundaries.

use std::borrow::Cow;
use std::collections::HashMap;

// ==================== Tags ====================

/// An opening (or self-closing) tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag<'a> {
    /// Lowercased tag name.
    pub name: String,
    /// Name as written.
    pub raw_name: &'a str,
    /// Raw attribute text between the name and `>` (or `/>`).
    pub attributes: &'a str,
    pub self_closing: bool,
    /// Byte offset of `<`.
    pub start: usize,
    /// Byte offset just past `>`.
    pub end: usize,
}

impl Tag<'_> {
    pub fn attribute_map(&self) -> HashMap<String, String> {
        parse_attributes(self.attributes)
    }
}

fn is_name_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b':'
}

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'-' | b'_' | b':' | b'.')
}

/// A tag name must be followed by whitespace, `>` or `/` to count, so
/// `<g` does not match `<glyph`.
fn is_delimiter(c: Option<u8>) -> bool {
    matches!(c, Some(b'>' | b'/') | Some(b' ' | b'\t' | b'\n' | b'\r'))
}

fn starts_with_name(text: &str, name: &str) -> bool {
    text.get(..name.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(name))
        && is_delimiter(text.as_bytes().get(name.len()).copied())
}

/// Offset just past the `>` closing a tag, ignoring `>` inside quoted
/// attribute values.
fn tag_end(src: &str, from: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut quote = None;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match (quote, b) {
            (None, b'"' | b'\'') => quote = Some(b),
            (Some(q), _) if b == q => quote = None,
            (None, b'>') => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// If `src[start..]` opens a comment, CDATA section, declaration or
/// processing instruction, the offset just past it.
fn skip_markup(src: &str, start: usize) -> Option<usize> {
    let rest = &src[start..];
    let past = |terminator: &str, from: usize| {
        rest[from..]
            .find(terminator)
            .map_or(src.len(), |i| start + from + i + terminator.len())
    };
    if rest.starts_with("<!--") {
        Some(past("-->", 4))
    } else if rest.starts_with("<![CDATA[") {
        Some(past("]]>", 9))
    } else if rest.starts_with("<?") {
        Some(past("?>", 2))
    } else if rest.starts_with("<!") {
        // <!DOCTYPE svg [ <!ENTITY ...> ] >
        let bracket = rest.find('[');
        let close = rest.find('>');
        match (bracket, close) {
            (Some(b), Some(c)) if b < c => Some(internal_subset_end(rest, b).map_or(src.len(), |end| start + end)),
            _ => Some(past(">", 2)),
        }
    } else {
        None
    }
}

/// Offset just past the `]` `>` pair closing a declaration whose internal
/// subset opens at `bracket`. Whitespace may separate the two.
fn internal_subset_end(decl: &str, bracket: usize) -> Option<usize> {
    let bytes = decl.as_bytes();
    let mut from = bracket + 1;
    while let Some(rel) = decl[from..].find(']') {
        let after = from + rel + 1;
        let gt = bytes[after..]
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .map_or(bytes.len(), |i| after + i);
        if bytes.get(gt) == Some(&b'>') {
            return Some(gt + 1);
        }
        from = after;
    }
    None
}

// ==================== Scanner ====================

/// Cursor yielding opening tags in document order.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.src.len());
    }

    /// Next opening tag. Close tags, comments, CDATA, `<?…?>` and
    /// `<!…>` are skipped; a `<` that does not start a name is text.
    pub fn next_tag(&mut self) -> Option<Tag<'a>> {
        let src = self.src;
        let bytes = src.as_bytes();
        while let Some(rel) = src[self.pos..].find('<') {
            let start = self.pos + rel;
            if let Some(past) = skip_markup(src, start) {
                self.pos = past;
                continue;
            }
            if bytes.get(start + 1) == Some(&b'/') {
                self.pos = tag_end(src, start).unwrap_or(src.len());
                continue;
            }
            if !bytes.get(start + 1).copied().is_some_and(is_name_start) {
                self.pos = start + 1;
                continue;
            }

            let name_end = bytes[start + 1..]
                .iter()
                .position(|&b| !is_name_char(b))
                .map_or(src.len(), |i| start + 1 + i);
            let Some(end) = tag_end(src, name_end) else {
                self.pos = src.len();
                return None;
            };

            let inner = src[name_end..end - 1].trim_end();
            let (attributes, self_closing) = match inner.strip_suffix('/') {
                Some(attributes) => (attributes, true),
                None => (inner, false),
            };
            let raw_name = &src[start + 1..name_end];
            self.pos = end;
            return Some(Tag {
                name: raw_name.to_ascii_lowercase(),
                raw_name,
                attributes,
                self_closing,
                start,
                end,
            });
        }
        self.pos = src.len();
        None
    }

    /// Content of `tag` and advance past its close tag. Self-closing tags
    /// have no content; an unclosed element runs to the end of input.
    pub fn element_content(&mut self, tag: &Tag<'_>) -> Option<&'a str> {
        if tag.self_closing {
            return None;
        }
        match find_close(self.src, &tag.name, tag.end) {
            Some((content_end, close_end)) => {
                self.pos = close_end;
                Some(&self.src[tag.end..content_end])
            }
            None => {
                self.pos = self.src.len();
                Some(&self.src[tag.end..])
            }
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_tag()
    }
}

/// Find the close tag for an element named `name` whose content starts
/// at `from`. Returns `(content_end, close_end)`: the offset of `</name`
/// and the offset just past its `>`.
///
/// Nested opening tags of the same name increase the depth; the close
/// only counts once the depth returns to zero.
pub fn find_close(src: &str, name: &str, from: usize) -> Option<(usize, usize)> {
    let mut depth = 1usize;
    let mut pos = from;
    while let Some(rel) = src.get(pos..)?.find('<') {
        let start = pos + rel;
        if let Some(past) = skip_markup(src, start) {
            pos = past;
            continue;
        }
        let rest = &src[start + 1..];
        if let Some(after) = rest.strip_prefix('/') {
            if starts_with_name(after, name) {
                let close_end = tag_end(src, start).unwrap_or(src.len());
                depth -= 1;
                if depth == 0 {
                    return Some((start, close_end));
                }
                pos = close_end;
                continue;
            }
        } else if starts_with_name(rest, name) {
            let end = tag_end(src, start + 1 + name.len())?;
            if !src[..end - 1].trim_end().ends_with('/') {
                depth += 1;
            }
            pos = end;
            continue;
        }
        pos = start + 1;
    }
    None
}

// ==================== Attributes ====================

/// Parse `key="value"` / `key='value'` pairs. The last duplicate wins;
/// entities in values are decoded. Unquoted values run to whitespace
/// and bare keys map to an empty string.
pub fn parse_attributes(raw: &str) -> HashMap<String, String> {
    let bytes = raw.as_bytes();
    let len = bytes.len();
    let mut attrs = HashMap::new();
    let mut i = 0;

    loop {
        while i < len && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= len {
            break;
        }

        let key_start = i;
        while i < len && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'/' | b'>') {
            i += 1;
        }
        let key = &raw[key_start..i];
        if key.is_empty() {
            i += 1;
            continue;
        }

        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let value = if i < len && bytes[i] == b'=' {
            i += 1;
            while i < len && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i) {
                Some(&quote @ (b'"' | b'\'')) => {
                    let value_start = i + 1;
                    let value_end = raw[value_start..]
                        .find(quote as char)
                        .map_or(len, |e| value_start + e);
                    i = (value_end + 1).min(len);
                    &raw[value_start..value_end]
                }
                _ => {
                    let value_start = i;
                    while i < len && !bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    &raw[value_start..i]
                }
            }
        } else {
            ""
        };

        attrs.insert(key.to_string(), decode_entities(value).into_owned());
    }

    attrs
}

// ==================== Text ====================

/// Decode the predefined XML entities and numeric character references.
/// Unknown entities are left as written.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| entity(&rest[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// Text of a fragment with all tags removed, entities decoded and
/// whitespace collapsed. CDATA content is kept verbatim.
pub fn text_content(fragment: &str) -> String {
    let mut raw = String::new();
    let mut pos = 0;
    while let Some(rel) = fragment[pos..].find('<') {
        let start = pos + rel;
        raw.push_str(&decode_entities(&fragment[pos..start]));
        if let Some(cdata) = fragment[start..].strip_prefix("<![CDATA[") {
            let body_end = cdata.find("]]>").unwrap_or(cdata.len());
            raw.push_str(&cdata[..body_end]);
        }
        pos = skip_markup(fragment, start)
            .or_else(|| tag_end(fragment, start))
            .unwrap_or(fragment.len());
    }
    raw.push_str(&decode_entities(&fragment[pos..]));
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_tag_basic() {
        let mut scanner = Scanner::new(r#"<svg viewBox="0 0 24 24"><Circle r="4"/></svg>"#);
        let svg = scanner.next_tag().unwrap();
        assert_eq!(svg.name, "svg");
        assert_eq!(svg.attributes, r#" viewBox="0 0 24 24""#);
        assert!(!svg.self_closing);

        let circle = scanner.next_tag().unwrap();
        assert_eq!(circle.name, "circle");
        assert_eq!(circle.raw_name, "Circle");
        assert!(circle.self_closing);
        assert!(scanner.next_tag().is_none());
    }

    #[test]
    fn test_skips_prolog_comments_and_cdata() {
        let src = r#"<?xml version="1.0"?>
<!DOCTYPE svg [ <!ENTITY e "<rect/>"> ]>
<!-- <path d="M0 0"/> -->
<svg><![CDATA[ <line/> ]]><g/></svg>"#;
        let names: Vec<String> = Scanner::new(src).map(|t| t.name).collect();
        assert_eq!(names, vec!["svg", "g"]);
    }

    #[test]
    fn test_doctype_subset_close_allows_whitespace() {
        let src = "<!DOCTYPE svg [ <!ENTITY a 'b]'> ]\n  ><svg><circle r='1'/></svg>";
        let names: Vec<String> = Scanner::new(src).map(|t| t.name).collect();
        assert_eq!(names, vec!["svg", "circle"]);

        let icon = crate::Icon::parse("<!DOCTYPE svg [ <!ENTITY a 'b'> ] ><svg><circle r='1'/></svg>").unwrap();
        assert_eq!(icon.nodes.len(), 1);
    }

    #[test]
    fn test_unterminated_doctype_subset_swallows_input() {
        let names: Vec<String> = Scanner::new("<!DOCTYPE svg [ <!ENTITY a 'b'> <svg/>").map(|t| t.name).collect();
        assert!(names.is_empty());
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        let mut scanner = Scanner::new(r#"<text data-x="a>b">hi</text>"#);
        let tag = scanner.next_tag().unwrap();
        assert_eq!(tag.attribute_map()["data-x"], "a>b");
        assert_eq!(scanner.element_content(&tag), Some("hi"));
    }

    #[test]
    fn test_find_close_counts_nested_same_name() {
        let src = "<g><g><circle/></g><rect/></g><path/>";
        let (content_end, close_end) = find_close(src, "g", 3).unwrap();
        assert_eq!(&src[3..content_end], "<g><circle/></g><rect/>");
        assert_eq!(&src[close_end..], "<path/>");
    }

    #[test]
    fn test_find_close_ignores_prefix_names() {
        let src = "<g><glyph></glyph><g/></g>";
        let (content_end, _) = find_close(src, "g", 3).unwrap();
        assert_eq!(&src[3..content_end], "<glyph></glyph><g/>");
    }

    #[test]
    fn test_find_close_unclosed() {
        assert_eq!(find_close("<g><rect/>", "g", 3), None);
    }

    #[test]
    fn test_element_content_advances() {
        let mut scanner = Scanner::new("<g><rect/></g><circle/>");
        let g = scanner.next_tag().unwrap();
        assert_eq!(scanner.element_content(&g), Some("<rect/>"));
        assert_eq!(scanner.next_tag().unwrap().name, "circle");
    }

    #[test]
    fn test_attributes() {
        let attrs = parse_attributes(r#" a="1" b='two words' c = "3" a="4" d=bare e"#);
        assert_eq!(attrs["a"], "4");
        assert_eq!(attrs["b"], "two words");
        assert_eq!(attrs["c"], "3");
        assert_eq!(attrs["d"], "bare");
        assert_eq!(attrs["e"], "");
    }

    #[test]
    fn test_attribute_entities() {
        let attrs = parse_attributes(r#"title="a &amp; b &lt;c&gt; &#65;&#x42; &bogus;""#);
        assert_eq!(attrs["title"], "a & b <c> AB &bogus;");
    }

    #[test]
    fn test_text_content_flattens_tspans() {
        let text = text_content("Hello <tspan font-weight=\"bold\">big</tspan>\n  world &amp; <![CDATA[<raw>]]>");
        assert_eq!(text, "Hello big world & <raw>");
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        let names: Vec<String> = Scanner::new("a < b <rect/> 1<2").map(|t| t.name).collect();
        assert_eq!(names, vec!["rect"]);
    }
}
