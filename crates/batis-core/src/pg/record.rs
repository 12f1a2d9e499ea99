use super::{impl_pg_conversions, push_field, tokenizer::{Token, Tokenizer}, PgType};
use crate::{error::Family, Result};

/// An anonymous composite value such as `(1,"a b",)`. Fields are kept as
/// text; `None` is a NULL field.
///
/// A record whose only field is NULL is written `()`, the same text as a
/// record with no fields, and decodes back as the latter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record(pub Vec<Option<String>>);

impl Record {
    pub fn new<I, S>(fields: I) -> Record
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Record(fields.into_iter().map(|f| f.map(Into::into)).collect())
    }

    pub fn fields(&self) -> &[Option<String>] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index)?.as_deref()
    }
}

impl PgType for Record {
    const TYPE_NAME: &'static str = "record";
    const ARRAY_TYPE_NAME: &'static str = "record[]";
    const FAMILY: Family = Family::Record;
    const ARRAY_FAMILY: Family = Family::RecordArray;

    fn decode(src: &str) -> Result<Record> {
        let mut tok = Tokenizer::new(src, b"(,)\"", Family::Record);
        let mut fields = Vec::new();

        tok.expect(b'(')?;
        if tok.eat(b')') {
            tok.finish()?;
            return Ok(Record(fields));
        }

        loop {
            let mut field: Option<String> = None;

            let close = loop {
                match tok.next_token() {
                    Some(Token::Delim(b'"')) => {
                        let quoted = tok.quoted(true)?;
                        field.get_or_insert_with(String::new).push_str(&quoted);
                    }
                    Some(Token::Text(text)) => {
                        field.get_or_insert_with(String::new).push_str(text);
                    }
                    Some(Token::Delim(b',')) => break false,
                    Some(Token::Delim(b')')) => break true,
                    Some(Token::Delim(_)) => return Err(tok.error("unexpected `(`")),
                    None => return Err(tok.error("missing `)`")),
                }
            };

            fields.push(field);
            if close {
                break;
            }
        }
        tok.finish()?;

        Ok(Record(fields))
    }

    fn encode(&self, out: &mut String) {
        out.push('(');
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            if let Some(field) = field {
                push_field(out, field);
            }
        }
        out.push(')');
    }
}

impl_pg_conversions!(Record);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_empty_fields() {
        let record = Record::decode(r#"(1,,"")"#).unwrap();
        assert_eq!(
            record.0,
            [Some("1".to_string()), None, Some(String::new())]
        );
        assert_eq!(record.to_string(), r#"(1,,"")"#);
    }
}
