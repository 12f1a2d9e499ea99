use super::{impl_pg_conversions, tokenizer::Tokenizer, PgType, Point};
use crate::{error::Family, Result};

/// `path`: closed paths are written `((x1,y1),...)`, open ones
/// `[(x1,y1),...]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub closed: bool,
    pub points: Vec<Point>,
}

impl Path {
    pub fn open(points: Vec<Point>) -> Path {
        Path {
            closed: false,
            points,
        }
    }

    pub fn closed(points: Vec<Point>) -> Path {
        Path {
            closed: true,
            points,
        }
    }
}

impl PgType for Path {
    const TYPE_NAME: &'static str = "path";
    const ARRAY_TYPE_NAME: &'static str = "path[]";
    const FAMILY: Family = Family::Path;
    const ARRAY_FAMILY: Family = Family::PathArray;

    fn decode(src: &str) -> Result<Path> {
        let mut tok = Tokenizer::new(src, b"[(,)]", Family::Path);
        let closed = if tok.eat(b'[') {
            false
        } else {
            tok.expect(b'(')?;
            true
        };
        let points = Point::read_list(&mut tok, if closed { b')' } else { b']' })?;
        tok.finish()?;
        Ok(Path { closed, points })
    }

    fn encode(&self, out: &mut String) {
        out.push(if self.closed { '(' } else { '[' });
        Point::write_list(&self.points, out);
        out.push(if self.closed { ')' } else { ']' });
    }
}

impl_pg_conversions!(Path);
