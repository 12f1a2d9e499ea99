//! Codecs for PostgreSQL values that travel in the backend's text format:
//! arrays, geometric types, ranges, anonymous records and `pgvector`
//! vectors.
//!
//! Every codec implements [`PgType`], which gives it a text decoder and
//! encoder, conversions to and from [`Value`], and an [`Array`] form.
//!
//! ```
//! use batis_core::pg::{Array, PgType, Point};
//!
//! let points = Array::<Point>::decode(r#"{"(1,2)","(3.5,-4)"}"#).unwrap();
//! assert_eq!(points.0[1], Point::new(3.5, -4.0));
//! assert_eq!(points.to_string(), r#"{"(1,2)","(3.5,-4)"}"#);
//! ```

mod array;
mod geo_box;
mod circle;
mod line;
mod lseg;
mod path;
mod point;
mod polygon;
mod range;
mod record;
mod tokenizer;
mod vector;

pub use array::Array;
pub use circle::Circle;
pub use geo_box::GeoBox;
pub use line::Line;
pub use lseg::Lseg;
pub use path::Path;
pub use point::Point;
pub use polygon::Polygon;
pub use range::Range;
pub use record::Record;
pub use vector::Vector;

use crate::{error::Family, Error, Result};

/// A value with a PostgreSQL text representation.
pub trait PgType: Sized {
    /// Name of the database type, used as the composite type name.
    const TYPE_NAME: &'static str;

    /// Name of the matching array type.
    const ARRAY_TYPE_NAME: &'static str;

    const FAMILY: Family;

    const ARRAY_FAMILY: Family;

    /// Separator between elements of an array of this type.
    const ARRAY_DELIM: u8 = b',';

    fn decode(src: &str) -> Result<Self>;

    fn encode(&self, out: &mut String);

    /// Decode one array element; `None` is an unquoted `NULL`.
    fn decode_element(src: Option<&str>) -> Result<Self> {
        match src {
            Some(src) => Self::decode(src),
            None => Err(Error::invalid_format(
                Self::ARRAY_FAMILY,
                "NULL element in array of non-nullable type",
            )),
        }
    }

    /// Encode one array element; `None` is written as `NULL`.
    fn encode_element(&self) -> Option<String> {
        let mut out = String::new();
        self.encode(&mut out);
        Some(out)
    }
}

/// Arrays with NULL elements decode into `Array<Option<T>>`.
impl<T: PgType> PgType for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;
    const ARRAY_TYPE_NAME: &'static str = T::ARRAY_TYPE_NAME;
    const FAMILY: Family = T::FAMILY;
    const ARRAY_FAMILY: Family = T::ARRAY_FAMILY;
    const ARRAY_DELIM: u8 = T::ARRAY_DELIM;

    fn decode(src: &str) -> Result<Option<T>> {
        T::decode(src).map(Some)
    }

    fn encode(&self, out: &mut String) {
        match self {
            Some(value) => value.encode(out),
            None => out.push_str("NULL"),
        }
    }

    fn decode_element(src: Option<&str>) -> Result<Option<T>> {
        src.map(T::decode).transpose()
    }

    fn encode_element(&self) -> Option<String> {
        self.as_ref().and_then(PgType::encode_element)
    }
}

/// Encode a codec value into a freshly allocated string.
pub fn to_text<T: PgType>(value: &T) -> String {
    let mut out = String::new();
    value.encode(&mut out);
    out
}

/// Floats are written in their shortest round-trip form without an exponent,
/// with PostgreSQL's spelling of the special values.
pub(crate) fn push_float(out: &mut String, v: f64) {
    use std::fmt::Write;

    if v.is_nan() {
        out.push_str("NaN");
    } else if v == f64::INFINITY {
        out.push_str("Infinity");
    } else if v == f64::NEG_INFINITY {
        out.push_str("-Infinity");
    } else {
        let _ = write!(out, "{v}");
    }
}

pub(crate) fn parse_float(src: &str, family: Family) -> Result<f64> {
    let src = src.trim();
    src.parse()
        .map_err(|_| Error::invalid_format(family, format!("`{src}` is not a number")))
}

/// Quote a record field or range bound when the backend would: empty
/// strings, whitespace, and any of the structural characters. Quotes are
/// doubled and backslashes escaped.
pub(crate) fn push_field(out: &mut String, field: &str) {
    let needs_quotes = field.is_empty()
        || field
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | ',' | '"' | '\\'));

    if !needs_quotes {
        out.push_str(field);
        return;
    }

    out.push('"');
    for c in field.chars() {
        match c {
            '"' => out.push_str("\"\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Implements the conversions every codec shares: `Display`, `FromStr`,
/// `From<T> for Value` and `FromValue`.
macro_rules! impl_pg_conversions {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&$crate::pg::to_text(self))
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::Error;

            fn from_str(src: &str) -> $crate::Result<$ty> {
                <$ty as $crate::pg::PgType>::decode(src)
            }
        }

        impl From<$ty> for $crate::Value {
            fn from(src: $ty) -> $crate::Value {
                $crate::Value::Composite($crate::Composite::new(
                    <$ty as $crate::pg::PgType>::TYPE_NAME,
                    $crate::pg::to_text(&src),
                ))
            }
        }

        impl $crate::FromValue for $ty {
            fn scan_type() -> $crate::driver::ScanType {
                $crate::driver::ScanType::Text
            }

            fn from_value(value: $crate::Value) -> $crate::Result<$ty> {
                let text = $crate::convert::to_text(value)?;
                <$ty as $crate::pg::PgType>::decode(&text)
            }
        }
    };
}

pub(crate) use impl_pg_conversions;
