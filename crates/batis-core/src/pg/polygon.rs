use super::{impl_pg_conversions, tokenizer::Tokenizer, PgType, Point};
use crate::{error::Family, Result};

/// `polygon`: `((x1,y1),...)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Polygon {
        Polygon { points }
    }
}

impl PgType for Polygon {
    const TYPE_NAME: &'static str = "polygon";
    const ARRAY_TYPE_NAME: &'static str = "polygon[]";
    const FAMILY: Family = Family::Polygon;
    const ARRAY_FAMILY: Family = Family::PolygonArray;

    fn decode(src: &str) -> Result<Polygon> {
        let mut tok = Tokenizer::new(src, b"(,)", Family::Polygon);
        tok.expect(b'(')?;
        let points = Point::read_list(&mut tok, b')')?;
        tok.finish()?;
        Ok(Polygon { points })
    }

    fn encode(&self, out: &mut String) {
        out.push('(');
        Point::write_list(&self.points, out);
        out.push(')');
    }
}

impl_pg_conversions!(Polygon);
