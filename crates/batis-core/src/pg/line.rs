use super::{impl_pg_conversions, push_float, tokenizer::Tokenizer, PgType};
use crate::{error::Family, Result};

/// `line`: the infinite line `Ax + By + C = 0`, written `{A,B,C}`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line {
    pub const fn new(a: f64, b: f64, c: f64) -> Line {
        Line { a, b, c }
    }
}

impl PgType for Line {
    const TYPE_NAME: &'static str = "line";
    const ARRAY_TYPE_NAME: &'static str = "line[]";
    const FAMILY: Family = Family::Line;
    const ARRAY_FAMILY: Family = Family::LineArray;

    fn decode(src: &str) -> Result<Line> {
        let mut tok = Tokenizer::new(src, b"{,}", Family::Line);
        tok.expect(b'{')?;
        let a = tok.number()?;
        tok.expect(b',')?;
        let b = tok.number()?;
        tok.expect(b',')?;
        let c = tok.number()?;
        tok.expect(b'}')?;
        tok.finish()?;
        Ok(Line { a, b, c })
    }

    fn encode(&self, out: &mut String) {
        out.push('{');
        push_float(out, self.a);
        out.push(',');
        push_float(out, self.b);
        out.push(',');
        push_float(out, self.c);
        out.push('}');
    }
}

impl_pg_conversions!(Line);
