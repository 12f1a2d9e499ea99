use super::{impl_pg_conversions, push_field, tokenizer::{Token, Tokenizer}, PgType};
use crate::{error::Family, Result};

use std::ops::Bound;

/// A range of any element type, such as `int4range`, `numrange` or
/// `tstzrange`. Bounds are kept as text in the element type's own format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Range {
    Empty,
    Span { lower: Bound<String>, upper: Bound<String> },
}

impl Range {
    pub fn new(lower: Bound<String>, upper: Bound<String>) -> Range {
        Range::Span { lower, upper }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Range::Empty)
    }

    pub fn lower(&self) -> Bound<&str> {
        match self {
            Range::Empty => Bound::Unbounded,
            Range::Span { lower, .. } => lower.as_ref().map(String::as_str),
        }
    }

    pub fn upper(&self) -> Bound<&str> {
        match self {
            Range::Empty => Bound::Unbounded,
            Range::Span { upper, .. } => upper.as_ref().map(String::as_str),
        }
    }
}

/// Reads a bound up to the next `,` or closing bracket. `None` when the
/// bound is omitted.
fn read_bound(tok: &mut Tokenizer<'_>) -> Result<Option<String>> {
    let mut bound: Option<String> = None;

    loop {
        match tok.peek() {
            Some(Token::Delim(b'"')) => {
                tok.next_token();
                let quoted = tok.quoted(true)?;
                bound.get_or_insert_with(String::new).push_str(&quoted);
            }
            Some(Token::Text(text)) => {
                tok.next_token();
                bound.get_or_insert_with(String::new).push_str(text);
            }
            _ => return Ok(bound),
        }
    }
}

impl PgType for Range {
    const TYPE_NAME: &'static str = "range";
    const ARRAY_TYPE_NAME: &'static str = "range[]";
    const FAMILY: Family = Family::Range;
    const ARRAY_FAMILY: Family = Family::RangeArray;

    fn decode(src: &str) -> Result<Range> {
        if src.trim().eq_ignore_ascii_case("empty") {
            return Ok(Range::Empty);
        }

        let mut tok = Tokenizer::new(src, b"[](),\"", Family::Range);

        let lower_inclusive = match tok.next_token() {
            Some(Token::Delim(b'[')) => true,
            Some(Token::Delim(b'(')) => false,
            _ => return Err(tok.error("expected `[` or `(`")),
        };
        let lower = read_bound(&mut tok)?;
        tok.expect(b',')?;
        let upper = read_bound(&mut tok)?;
        let upper_inclusive = match tok.next_token() {
            Some(Token::Delim(b']')) => true,
            Some(Token::Delim(b')')) => false,
            _ => return Err(tok.error("expected `]` or `)`")),
        };
        tok.finish()?;

        let bound = |value: Option<String>, inclusive| match value {
            None => Bound::Unbounded,
            Some(value) if inclusive => Bound::Included(value),
            Some(value) => Bound::Excluded(value),
        };

        Ok(Range::Span {
            lower: bound(lower, lower_inclusive),
            upper: bound(upper, upper_inclusive),
        })
    }

    fn encode(&self, out: &mut String) {
        let Range::Span { lower, upper } = self else {
            out.push_str("empty");
            return;
        };

        match lower {
            Bound::Included(value) => {
                out.push('[');
                push_field(out, value);
            }
            Bound::Excluded(value) => {
                out.push('(');
                push_field(out, value);
            }
            Bound::Unbounded => out.push('('),
        }
        out.push(',');
        match upper {
            Bound::Included(value) => {
                push_field(out, value);
                out.push(']');
            }
            Bound::Excluded(value) => {
                push_field(out, value);
                out.push(')');
            }
            Bound::Unbounded => out.push(')'),
        }
    }
}

impl_pg_conversions!(Range);
