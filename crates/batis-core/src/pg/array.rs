use super::{
    tokenizer::{Token, Tokenizer},
    PgType,
};
use crate::{convert, driver::ScanType, error::Family, Composite, Error, FromValue, Result, Value};

use std::{fmt, str::FromStr};

/// A one-dimensional PostgreSQL array in text format, such as `{1,2,3}`,
/// `{"a b",NULL}` or `{(1,1),(0,0);(2,2),(1,1)}`.
///
/// Elements are quoted the way the backend quotes them, so element text that
/// is itself quoted (records, points, lines) nests correctly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Array<T>(pub Vec<T>);

impl<T: PgType> Array<T> {
    pub fn new(items: Vec<T>) -> Array<T> {
        Array(items)
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }

    pub fn decode(src: &str) -> Result<Array<T>> {
        split(src, T::ARRAY_DELIM, T::ARRAY_FAMILY)?
            .iter()
            .map(|item| T::decode_element(item.as_deref()))
            .collect::<Result<_>>()
            .map(Array)
    }

    pub fn encode(&self, out: &mut String) {
        out.push('{');
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(T::ARRAY_DELIM as char);
            }
            match item.encode_element() {
                Some(text) => push_element(out, &text, T::ARRAY_DELIM),
                None => out.push_str("NULL"),
            }
        }
        out.push('}');
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(items: Vec<T>) -> Array<T> {
        Array(items)
    }
}

impl<T> std::ops::Deref for Array<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T: PgType> fmt::Display for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.encode(&mut out);
        f.write_str(&out)
    }
}

impl<T: PgType> FromStr for Array<T> {
    type Err = Error;

    fn from_str(src: &str) -> Result<Array<T>> {
        Array::decode(src)
    }
}

impl<T: PgType> From<Array<T>> for Value {
    fn from(src: Array<T>) -> Value {
        Value::Composite(Composite::new(T::ARRAY_TYPE_NAME, src.to_string()))
    }
}

/// Reads array text, or a list a driver already decoded element by element.
impl<T: PgType> FromValue for Array<T> {
    fn scan_type() -> ScanType {
        ScanType::Any
    }

    fn from_value(value: Value) -> Result<Array<T>> {
        match value {
            Value::List(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Null => T::decode_element(None),
                    item => T::decode_element(Some(&convert::to_text(item)?)),
                })
                .collect::<Result<_>>()
                .map(Array),
            value => Array::decode(&convert::to_text(value)?),
        }
    }
}

/// Split `{...}` into raw element text. `None` marks an unquoted `NULL`.
fn split(src: &str, delim: u8, family: Family) -> Result<Vec<Option<String>>> {
    let delims: &'static [u8] = match delim {
        b';' => b"{};\"",
        _ => b"{},\"",
    };
    let mut tok = Tokenizer::new(src, delims, family);
    let mut items = Vec::new();

    tok.expect(b'{')?;
    if tok.eat(b'}') {
        tok.finish()?;
        return Ok(items);
    }

    loop {
        let item = match tok.next_token() {
            Some(Token::Delim(b'"')) => Some(tok.quoted(false)?),
            Some(Token::Text(text)) if text.eq_ignore_ascii_case("NULL") => None,
            Some(Token::Text(text)) => Some(text.to_string()),
            Some(Token::Delim(b'{')) => {
                return Err(tok.error("multi-dimensional arrays are not supported"))
            }
            Some(Token::Delim(d)) => {
                return Err(tok.error(format!("unexpected `{}`", d as char)))
            }
            None => return Err(tok.error("missing `}`")),
        };
        items.push(item);

        match tok.next_token() {
            Some(Token::Delim(b'}')) => break,
            Some(Token::Delim(d)) if d == delim => continue,
            Some(Token::Delim(d)) => {
                return Err(tok.error(format!("unexpected `{}`", d as char)))
            }
            Some(Token::Text(text)) => return Err(tok.error(format!("unexpected `{text}`"))),
            None => return Err(tok.error("missing `}`")),
        }
    }

    tok.finish()?;
    Ok(items)
}

fn push_element(out: &mut String, text: &str, delim: u8) {
    let needs_quotes = text.is_empty()
        || text.eq_ignore_ascii_case("NULL")
        || text.chars().any(|c| {
            c.is_whitespace() || matches!(c, '{' | '}' | '"' | '\\') || c == delim as char
        });

    if !needs_quotes {
        out.push_str(text);
        return;
    }

    out.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

impl PgType for i64 {
    const TYPE_NAME: &'static str = "int8";
    const ARRAY_TYPE_NAME: &'static str = "int8[]";
    const FAMILY: Family = Family::IntArray;
    const ARRAY_FAMILY: Family = Family::IntArray;

    fn decode(src: &str) -> Result<i64> {
        src.trim()
            .parse()
            .map_err(|_| Error::invalid_format(Family::IntArray, format!("`{src}` is not an integer")))
    }

    fn encode(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }
}

impl PgType for f64 {
    const TYPE_NAME: &'static str = "float8";
    const ARRAY_TYPE_NAME: &'static str = "float8[]";
    const FAMILY: Family = Family::FloatArray;
    const ARRAY_FAMILY: Family = Family::FloatArray;

    fn decode(src: &str) -> Result<f64> {
        super::parse_float(src, Family::FloatArray)
    }

    fn encode(&self, out: &mut String) {
        super::push_float(out, *self);
    }
}

impl PgType for bool {
    const TYPE_NAME: &'static str = "bool";
    const ARRAY_TYPE_NAME: &'static str = "bool[]";
    const FAMILY: Family = Family::BoolArray;
    const ARRAY_FAMILY: Family = Family::BoolArray;

    fn decode(src: &str) -> Result<bool> {
        match src.trim().to_ascii_lowercase().as_str() {
            "t" | "true" => Ok(true),
            "f" | "false" => Ok(false),
            _ => Err(Error::invalid_format(
                Family::BoolArray,
                format!("`{src}` is not a boolean"),
            )),
        }
    }

    fn encode(&self, out: &mut String) {
        out.push(if *self { 't' } else { 'f' });
    }
}

impl PgType for String {
    const TYPE_NAME: &'static str = "text";
    const ARRAY_TYPE_NAME: &'static str = "text[]";
    const FAMILY: Family = Family::StringArray;
    const ARRAY_FAMILY: Family = Family::StringArray;

    fn decode(src: &str) -> Result<String> {
        Ok(src.to_string())
    }

    fn encode(&self, out: &mut String) {
        out.push_str(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_array() {
        let array = Array::<i64>::decode("{}").unwrap();
        assert!(array.is_empty());
        assert_eq!(array.to_string(), "{}");
    }

    #[test]
    fn null_elements_need_option() {
        let err = Array::<String>::decode("{a,NULL}").unwrap_err();
        assert_eq!(err.invalid_format_family(), Some(Family::StringArray));

        let array = Array::<Option<String>>::decode("{a,NULL,\"NULL\"}").unwrap();
        assert_eq!(
            array.0,
            [Some("a".to_string()), None, Some("NULL".to_string())]
        );
        assert_eq!(array.to_string(), "{a,NULL,\"NULL\"}");
    }

    #[test]
    fn from_decoded_list() {
        let value = Value::List(vec![Value::I64(1), Value::from("2")]);
        assert_eq!(Array::<i64>::from_value(value).unwrap().0, [1, 2]);
    }
}
