//! Byte cursor shared by the path parser and the number-list scanners.

/// Why a number could not be read at the cursor.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BadToken {
    pub token: String,
    pub offset: usize,
}

/// Cursor over ASCII-oriented numeric text.
///
/// Only ever stops on ASCII bytes, so every position it reports is a
/// valid `str` boundary.
pub(crate) struct Cursor<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Skip whitespace and commas.
    pub fn skip_separators(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// True if the next byte can begin a number.
    pub fn at_number_start(&self) -> bool {
        matches!(self.peek(), Some(b'0'..=b'9' | b'.' | b'+' | b'-'))
    }

    /// The run of text starting at `offset` up to the next separator,
    /// used to quote the offending token in errors.
    pub fn token_at(&self, offset: usize) -> String {
        let rest = &self.src[offset..];
        let end = rest
            .char_indices()
            .find(|(i, c)| *i > 0 && (c.is_whitespace() || *c == ','))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        rest[..end].to_string()
    }

    /// Read one number.
    ///
    /// A number ends at a sign that does not follow an exponent marker or
    /// at a second decimal point, so `.5.5` reads as `0.5` then `.5` and
    /// `-5-10` as `-5` then `-10`.
    pub fn number(&mut self) -> Result<f32, BadToken> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }

        let mut saw_digits = false;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
            saw_digits = true;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
                saw_digits = true;
            }
        }

        if !saw_digits {
            let token = self.token_at(start);
            self.pos = start;
            return Err(BadToken {
                token,
                offset: start,
            });
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            let exponent_follows = match self.peek_at(1) {
                Some(b'0'..=b'9') => true,
                Some(b'+' | b'-') => matches!(self.peek_at(2), Some(b'0'..=b'9')),
                _ => false,
            };
            if exponent_follows {
                self.pos += 2;
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.pos += 1;
                }
            }
        }

        let text = &self.src[start..self.pos];
        match text.parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(BadToken {
                token: text.to_string(),
                offset: start,
            }),
        }
    }

    /// Read a single-character arc flag (`0` or `1`). No separator is
    /// required after it.
    pub fn flag(&mut self) -> Result<bool, BadToken> {
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                Ok(false)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(BadToken {
                token: self.token_at(self.pos),
                offset: self.pos,
            }),
        }
    }
}
