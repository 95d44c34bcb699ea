//! Pulling `<style>` blocks out of markup.

use crate::parser::Stylesheet;
use tracing::trace;

/// Extract every `<style>` block from `markup`.
///
/// Returns the parsed stylesheet (all blocks concatenated in document
/// order) and the markup with the blocks removed. `<![CDATA[ ... ]]>`
/// wrappers inside a block are unwrapped.
pub fn extract_stylesheet(markup: &str) -> (Stylesheet, String) {
    // ASCII lowercasing keeps byte offsets identical.
    let lower = markup.to_ascii_lowercase();
    let mut css = String::new();
    let mut remaining = String::with_capacity(markup.len());
    let mut pos = 0;

    while let Some(start) = find_style_open(&lower, pos) {
        remaining.push_str(&markup[pos..start]);

        let Some(open_end) = lower[start..].find('>').map(|i| start + i + 1) else {
            // `<style` with no end; drop the rest.
            pos = markup.len();
            break;
        };

        if lower[..open_end].ends_with("/>") {
            pos = open_end;
            continue;
        }

        let (content_end, block_end) = match lower[open_end..].find("</style") {
            Some(i) => {
                let close = open_end + i;
                let end = lower[close..]
                    .find('>')
                    .map(|j| close + j + 1)
                    .unwrap_or(markup.len());
                (close, end)
            }
            None => (markup.len(), markup.len()),
        };

        let block = unwrap_cdata(&markup[open_end..content_end]);
        trace!(bytes = block.len(), "Extracted style block");
        css.push_str(block.trim());
        css.push('\n');
        pos = block_end;
    }
    remaining.push_str(&markup[pos..]);

    (Stylesheet::parse(&css), remaining)
}

/// Find `<style` followed by a delimiter, starting at `from`.
fn find_style_open(lower: &str, from: usize) -> Option<usize> {
    let mut search = from;
    while let Some(i) = lower[search..].find("<style") {
        let start = search + i;
        let after = start + "<style".len();
        match lower.as_bytes().get(after) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(start),
            None => return Some(start),
            _ => search = after,
        }
    }
    None
}

fn unwrap_cdata(block: &str) -> String {
    block.replace("<![CDATA[", "").replace("]]>", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_block() {
        let markup = r#"<svg><style>.a { fill: red }</style><circle class="a"/></svg>"#;
        let (sheet, rest) = extract_stylesheet(markup);
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(rest, r#"<svg><circle class="a"/></svg>"#);
    }

    #[test]
    fn test_extract_multiple_blocks_with_cdata() {
        let markup = "<svg><STYLE type=\"text/css\"><![CDATA[ rect { fill: red } ]]></STYLE>\
                      <g/><style>@keyframes k { to { opacity: 0 } }</style></svg>";
        let (sheet, rest) = extract_stylesheet(markup);
        assert_eq!(sheet.rules.len(), 1);
        assert!(sheet.keyframes("k").is_some());
        assert_eq!(rest, "<svg><g/></svg>");
    }

    #[test]
    fn test_styles_lookalike_tag_untouched() {
        let markup = "<styles>x</styles>";
        let (sheet, rest) = extract_stylesheet(markup);
        assert!(sheet.is_empty());
        assert_eq!(rest, markup);
    }

    #[test]
    fn test_self_closing_and_unclosed() {
        let (_, rest) = extract_stylesheet("<svg><style/><path/></svg>");
        assert_eq!(rest, "<svg><path/></svg>");

        let (sheet, rest) = extract_stylesheet("<svg><style>path { fill: red }");
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(rest, "<svg>");
    }

    #[test]
    fn test_no_style_blocks() {
        let (sheet, rest) = extract_stylesheet("<svg/>");
        assert!(sheet.is_empty());
        assert_eq!(rest, "<svg/>");
    }
}
