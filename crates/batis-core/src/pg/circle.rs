use super::{impl_pg_conversions, push_float, tokenizer::Tokenizer, PgType, Point};
use crate::{error::Family, Result};

/// `circle`: `<(x,y),r>`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub const fn new(center: Point, radius: f64) -> Circle {
        Circle { center, radius }
    }
}

impl PgType for Circle {
    const TYPE_NAME: &'static str = "circle";
    const ARRAY_TYPE_NAME: &'static str = "circle[]";
    const FAMILY: Family = Family::Circle;
    const ARRAY_FAMILY: Family = Family::CircleArray;

    fn decode(src: &str) -> Result<Circle> {
        let mut tok = Tokenizer::new(src, b"<(,)>", Family::Circle);
        tok.expect(b'<')?;
        let center = Point::read(&mut tok)?;
        tok.expect(b',')?;
        let radius = tok.number()?;
        tok.expect(b'>')?;
        tok.finish()?;
        Ok(Circle { center, radius })
    }

    fn encode(&self, out: &mut String) {
        out.push('<');
        self.center.write(out);
        out.push(',');
        push_float(out, self.radius);
        out.push('>');
    }
}

impl_pg_conversions!(Circle);
