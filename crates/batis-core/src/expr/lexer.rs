use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Bang,
    Minus,
    Plus,
    Star,
    Slash,
    Percent,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    Ne,
    AndAnd,
    OrOr,
}

/// A token and the byte range it covers in the source text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub(crate) token: Token,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

pub(crate) fn tokenize(src: &str) -> Result<Vec<Spanned>> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];

        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;

        let token = match c {
            b'(' => single(&mut pos, Token::LParen),
            b')' => single(&mut pos, Token::RParen),
            b'[' => single(&mut pos, Token::LBracket),
            b']' => single(&mut pos, Token::RBracket),
            b'.' if !bytes.get(pos + 1).is_some_and(u8::is_ascii_digit) => {
                single(&mut pos, Token::Dot)
            }
            b',' => single(&mut pos, Token::Comma),
            b'+' => single(&mut pos, Token::Plus),
            b'-' => single(&mut pos, Token::Minus),
            b'*' => single(&mut pos, Token::Star),
            b'/' => single(&mut pos, Token::Slash),
            b'%' => single(&mut pos, Token::Percent),
            b'<' => pair(bytes, &mut pos, b'=', Token::Le, Token::Lt),
            b'>' => pair(bytes, &mut pos, b'=', Token::Ge, Token::Gt),
            b'!' => pair(bytes, &mut pos, b'=', Token::Ne, Token::Bang),
            b'=' if bytes.get(pos + 1) == Some(&b'=') => {
                pos += 2;
                Token::EqEq
            }
            b'&' if bytes.get(pos + 1) == Some(&b'&') => {
                pos += 2;
                Token::AndAnd
            }
            b'|' if bytes.get(pos + 1) == Some(&b'|') => {
                pos += 2;
                Token::OrOr
            }
            b'"' | b'\'' => Token::Str(string(src, &mut pos)?),
            b'0'..=b'9' | b'.' => number(src, &mut pos)?,
            c if c == b'_' || c.is_ascii_alphabetic() || c >= 0x80 => {
                while pos < bytes.len()
                    && (bytes[pos] == b'_' || bytes[pos].is_ascii_alphanumeric() || bytes[pos] >= 0x80)
                {
                    pos += 1;
                }
                Token::Ident(src[start..pos].to_string())
            }
            _ => {
                return Err(Error::expression_evaluation_failed(
                    src,
                    format!("unexpected character `{}` at offset {start}", c as char),
                ))
            }
        };

        tokens.push(Spanned {
            token,
            start,
            end: pos,
        });
    }

    Ok(tokens)
}

fn single(pos: &mut usize, token: Token) -> Token {
    *pos += 1;
    token
}

fn pair(bytes: &[u8], pos: &mut usize, next: u8, matched: Token, otherwise: Token) -> Token {
    if bytes.get(*pos + 1) == Some(&next) {
        *pos += 2;
        matched
    } else {
        *pos += 1;
        otherwise
    }
}

fn string(src: &str, pos: &mut usize) -> Result<String> {
    let quote = src.as_bytes()[*pos];
    let mut out = String::new();
    let mut chars = src[*pos + 1..].char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    break;
                };
                out.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    other => other,
                });
            }
            c if c as u32 == quote as u32 => {
                *pos += 1 + offset + 1;
                return Ok(out);
            }
            c => out.push(c),
        }
    }

    Err(Error::expression_evaluation_failed(
        src,
        "unterminated string literal",
    ))
}

fn number(src: &str, pos: &mut usize) -> Result<Token> {
    let bytes = src.as_bytes();
    let start = *pos;
    let mut is_float = false;

    while *pos < bytes.len() {
        match bytes[*pos] {
            b'0'..=b'9' | b'_' => *pos += 1,
            b'.' if !is_float && bytes.get(*pos + 1).is_some_and(u8::is_ascii_digit) => {
                is_float = true;
                *pos += 1;
            }
            b'e' | b'E' => {
                is_float = true;
                *pos += 1;
                if matches!(bytes.get(*pos), Some(b'+' | b'-')) {
                    *pos += 1;
                }
            }
            _ => break,
        }
    }

    let text: String = src[start..*pos].chars().filter(|c| *c != '_').collect();
    let invalid = || {
        Error::expression_evaluation_failed(src, format!("invalid number literal `{text}`"))
    };

    if is_float {
        text.parse().map(Token::Float).map_err(|_| invalid())
    } else {
        text.parse().map(Token::Int).map_err(|_| invalid())
    }
}
