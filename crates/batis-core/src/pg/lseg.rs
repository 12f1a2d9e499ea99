use super::{impl_pg_conversions, tokenizer::Tokenizer, PgType, Point};
use crate::{error::Family, Result};

/// `lseg`: a line segment, `[(x1,y1),(x2,y2)]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Lseg {
    pub start: Point,
    pub end: Point,
}

impl Lseg {
    pub const fn new(start: Point, end: Point) -> Lseg {
        Lseg { start, end }
    }
}

impl PgType for Lseg {
    const TYPE_NAME: &'static str = "lseg";
    const ARRAY_TYPE_NAME: &'static str = "lseg[]";
    const FAMILY: Family = Family::Lseg;
    const ARRAY_FAMILY: Family = Family::LsegArray;

    fn decode(src: &str) -> Result<Lseg> {
        let mut tok = Tokenizer::new(src, b"[(,)]", Family::Lseg);
        tok.expect(b'[')?;
        let start = Point::read(&mut tok)?;
        tok.expect(b',')?;
        let end = Point::read(&mut tok)?;
        tok.expect(b']')?;
        tok.finish()?;
        Ok(Lseg { start, end })
    }

    fn encode(&self, out: &mut String) {
        out.push('[');
        self.start.write(out);
        out.push(',');
        self.end.write(out);
        out.push(']');
    }
}

impl_pg_conversions!(Lseg);
