use crate::{error::Family, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Delim(u8),
    /// Text between delimiters, trimmed. Never empty.
    Text(&'a str),
}

/// Splits a text-format value on a fixed set of single-byte delimiters.
///
/// Whitespace-only runs between delimiters are skipped. Quoted strings are
/// not tokenized: after a `"` delimiter the caller reads the body with
/// [`Tokenizer::quoted`].
#[derive(Debug)]
pub(crate) struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
    delims: &'static [u8],
    family: Family,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(src: &'a str, delims: &'static [u8], family: Family) -> Tokenizer<'a> {
        Tokenizer {
            src,
            pos: 0,
            delims,
            family,
        }
    }

    pub(crate) fn error(&self, detail: impl Into<String>) -> Error {
        Error::invalid_format(self.family, detail)
    }

    /// Returns the next token and the position after it.
    fn scan(&self) -> Option<(Token<'a>, usize)> {
        let bytes = self.src.as_bytes();
        let mut pos = self.pos;

        loop {
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }

            if pos >= bytes.len() {
                return None;
            }

            if self.delims.contains(&bytes[pos]) {
                return Some((Token::Delim(bytes[pos]), pos + 1));
            }

            let start = pos;
            while pos < bytes.len() && !self.delims.contains(&bytes[pos]) {
                pos += 1;
            }

            let text = self.src[start..pos].trim();
            if !text.is_empty() {
                return Some((Token::Text(text), pos));
            }
        }
    }

    pub(crate) fn peek(&self) -> Option<Token<'a>> {
        self.scan().map(|(token, _)| token)
    }

    pub(crate) fn next_token(&mut self) -> Option<Token<'a>> {
        let (token, pos) = self.scan()?;
        self.pos = pos;
        Some(token)
    }

    /// Consume `delim` if it is the next token.
    pub(crate) fn eat(&mut self, delim: u8) -> bool {
        if self.peek() == Some(Token::Delim(delim)) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, delim: u8) -> Result<()> {
        match self.next_token() {
            Some(Token::Delim(d)) if d == delim => Ok(()),
            Some(Token::Delim(d)) => Err(self.error(format!(
                "expected `{}`, found `{}`",
                delim as char, d as char
            ))),
            Some(Token::Text(text)) => Err(self.error(format!(
                "expected `{}`, found `{text}`",
                delim as char
            ))),
            None => Err(self.error(format!("missing `{}`", delim as char))),
        }
    }

    pub(crate) fn text(&mut self) -> Result<&'a str> {
        match self.next_token() {
            Some(Token::Text(text)) => Ok(text),
            Some(Token::Delim(d)) => Err(self.error(format!("unexpected `{}`", d as char))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    pub(crate) fn number(&mut self) -> Result<f64> {
        let text = self.text()?;
        super::parse_float(text, self.family)
    }

    /// Read the body of a quoted string whose opening `"` was just consumed.
    ///
    /// A backslash escapes the next character. With `doubled`, a pair of
    /// quotes stands for one literal quote, as in records and ranges.
    pub(crate) fn quoted(&mut self, doubled: bool) -> Result<String> {
        let rest = &self.src[self.pos..];
        let mut out = String::new();
        let mut chars = rest.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, escaped)) => out.push(escaped),
                    None => break,
                },
                '"' if doubled && matches!(chars.peek(), Some((_, '"'))) => {
                    chars.next();
                    out.push('"');
                }
                '"' => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                c => out.push(c),
            }
        }

        Err(self.error("unterminated quoted string"))
    }

    /// Only whitespace may remain.
    pub(crate) fn finish(&mut self) -> Result<()> {
        match self.next_token() {
            None => Ok(()),
            Some(Token::Delim(d)) => Err(self.error(format!("trailing `{}`", d as char))),
            Some(Token::Text(text)) => Err(self.error(format!("trailing `{text}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_runs() {
        let mut tok = Tokenizer::new(" ( 1 , 2 ) ", b"(,)", Family::Point);
        let tokens: Vec<_> = std::iter::from_fn(|| tok.next_token()).collect();
        assert_eq!(
            tokens,
            [
                Token::Delim(b'('),
                Token::Text("1"),
                Token::Delim(b','),
                Token::Text("2"),
                Token::Delim(b')'),
            ]
        );
    }

    #[test]
    fn quoted_bodies() {
        let mut tok = Tokenizer::new(r#""a ""b"" \\c",x"#, b"\",", Family::Record);
        assert!(tok.eat(b'"'));
        assert_eq!(tok.quoted(true).unwrap(), r#"a "b" \c"#);
        tok.expect(b',').unwrap();
        assert_eq!(tok.text().unwrap(), "x");
        tok.finish().unwrap();

        let mut tok = Tokenizer::new(r#""open"#, b"\"", Family::StringArray);
        tok.expect(b'"').unwrap();
        assert!(tok.quoted(false).unwrap_err().is_invalid_format());
    }
}
