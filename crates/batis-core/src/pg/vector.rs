use super::{impl_pg_conversions, tokenizer::Tokenizer, PgType};
use crate::{error::Family, Error, Result};

/// `vector` from the pgvector extension: `[1,2.5,3]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vector(pub Vec<f32>);

impl Vector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

impl From<Vec<f32>> for Vector {
    fn from(src: Vec<f32>) -> Vector {
        Vector(src)
    }
}

impl PgType for Vector {
    const TYPE_NAME: &'static str = "vector";
    const ARRAY_TYPE_NAME: &'static str = "vector[]";
    const FAMILY: Family = Family::Vector;
    const ARRAY_FAMILY: Family = Family::Vector;

    fn decode(src: &str) -> Result<Vector> {
        let mut tok = Tokenizer::new(src, b"[,]", Family::Vector);
        let mut items = Vec::new();

        tok.expect(b'[')?;
        if !tok.eat(b']') {
            loop {
                let text = tok.text()?;
                let item = text.parse::<f32>().map_err(|_| {
                    Error::invalid_format(Family::Vector, format!("`{text}` is not a number"))
                })?;
                items.push(item);

                if tok.eat(b']') {
                    break;
                }
                tok.expect(b',')?;
            }
        }
        tok.finish()?;

        Ok(Vector(items))
    }

    fn encode(&self, out: &mut String) {
        out.push('[');
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&item.to_string());
        }
        out.push(']');
    }
}

impl_pg_conversions!(Vector);
