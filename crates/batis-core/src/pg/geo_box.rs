use super::{impl_pg_conversions, tokenizer::Tokenizer, PgType, Point};
use crate::{error::Family, Result};

/// `box`: two opposite corners, `(x1,y1),(x2,y2)`.
///
/// Arrays of boxes separate elements with `;` since the box text itself
/// contains commas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeoBox {
    pub high: Point,
    pub low: Point,
}

impl GeoBox {
    pub const fn new(high: Point, low: Point) -> GeoBox {
        GeoBox { high, low }
    }
}

impl PgType for GeoBox {
    const TYPE_NAME: &'static str = "box";
    const ARRAY_TYPE_NAME: &'static str = "box[]";
    const FAMILY: Family = Family::Box;
    const ARRAY_FAMILY: Family = Family::BoxArray;
    const ARRAY_DELIM: u8 = b';';

    fn decode(src: &str) -> Result<GeoBox> {
        let mut tok = Tokenizer::new(src, b"(,)", Family::Box);
        let high = Point::read(&mut tok)?;
        tok.expect(b',')?;
        let low = Point::read(&mut tok)?;
        tok.finish()?;
        Ok(GeoBox { high, low })
    }

    fn encode(&self, out: &mut String) {
        self.high.write(out);
        out.push(',');
        self.low.write(out);
    }
}

impl_pg_conversions!(GeoBox);
