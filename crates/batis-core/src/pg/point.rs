use super::{impl_pg_conversions, push_float, tokenizer::Tokenizer, PgType};
use crate::{error::Family, Result};

/// `point`: `(x,y)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// Read `(x,y)` from a tokenizer that splits on `(`, `,` and `)`.
    pub(crate) fn read(tok: &mut Tokenizer<'_>) -> Result<Point> {
        tok.expect(b'(')?;
        let x = tok.number()?;
        tok.expect(b',')?;
        let y = tok.number()?;
        tok.expect(b')')?;
        Ok(Point { x, y })
    }

    pub(crate) fn write(&self, out: &mut String) {
        out.push('(');
        push_float(out, self.x);
        out.push(',');
        push_float(out, self.y);
        out.push(')');
    }

    /// Points separated by commas, as used in boxes, segments, paths and
    /// polygons. Reads until `close` and consumes it.
    pub(crate) fn read_list(tok: &mut Tokenizer<'_>, close: u8) -> Result<Vec<Point>> {
        let mut points = vec![Point::read(tok)?];
        while tok.eat(b',') {
            points.push(Point::read(tok)?);
        }
        tok.expect(close)?;
        Ok(points)
    }

    pub(crate) fn write_list(points: &[Point], out: &mut String) {
        for (i, point) in points.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            point.write(out);
        }
    }
}

impl PgType for Point {
    const TYPE_NAME: &'static str = "point";
    const ARRAY_TYPE_NAME: &'static str = "point[]";
    const FAMILY: Family = Family::Point;
    const ARRAY_FAMILY: Family = Family::PointArray;

    fn decode(src: &str) -> Result<Point> {
        let mut tok = Tokenizer::new(src, b"(,)", Family::Point);
        let point = Point::read(&mut tok)?;
        tok.finish()?;
        Ok(point)
    }

    fn encode(&self, out: &mut String) {
        self.write(out);
    }
}

impl_pg_conversions!(Point);
