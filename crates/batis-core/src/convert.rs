//! Conversions from dynamic [`Value`]s into Rust types.

use crate::{driver::ScanType, Error, Result, Value};

use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};

/// A type that a scanned column value can be converted into.
pub trait FromValue: Sized {
    /// The scan type a column must be read as to fill a value of this type.
    fn scan_type() -> ScanType {
        ScanType::Any
    }

    fn from_value(value: Value) -> Result<Self>;
}

pub(crate) fn to_bool(value: Value) -> Result<bool> {
    match value {
        Value::Bool(v) => Ok(v),
        Value::I64(0) => Ok(false),
        Value::I64(1) => Ok(true),
        Value::String(s) => match s.as_str() {
            "t" | "true" | "TRUE" | "1" => Ok(true),
            "f" | "false" | "FALSE" | "0" => Ok(false),
            _ => Err(Error::type_conversion(format!("string {s:?}"), "bool")),
        },
        other => Err(Error::type_conversion(other.type_name(), "bool")),
    }
}

pub(crate) fn to_i64(value: Value) -> Result<i64> {
    match value {
        Value::I64(v) => Ok(v),
        Value::Bool(v) => Ok(v.into()),
        Value::F64(v) if v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 => {
            Ok(v as i64)
        }
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| Error::type_conversion(format!("string {s:?}"), "i64")),
        other => Err(Error::type_conversion(other.type_name(), "i64")),
    }
}

pub(crate) fn to_f64(value: Value) -> Result<f64> {
    match value {
        Value::F64(v) => Ok(v),
        Value::I64(v) => Ok(v as f64),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| Error::type_conversion(format!("string {s:?}"), "f64")),
        other => Err(Error::type_conversion(other.type_name(), "f64")),
    }
}

pub(crate) fn to_text(value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Bytes(bytes) => String::from_utf8(bytes)
            .map_err(|_| Error::type_conversion("non-UTF-8 bytes", "String")),
        Value::Composite(composite) => Ok(composite.text),
        Value::Bool(_)
        | Value::I64(_)
        | Value::F64(_)
        | Value::Timestamp(_)
        | Value::DateTime(_)
        | Value::Date(_) => Ok(value.to_string()),
        other => Err(Error::type_conversion(other.type_name(), "String")),
    }
}

/// Parse text produced by a database into the most precise temporal value it
/// describes.
pub(crate) fn parse_temporal(s: &str) -> Result<Value> {
    let s = s.trim();
    if let Ok(ts) = s.parse::<jiff::Timestamp>() {
        return Ok(Value::Timestamp(ts));
    }
    if let Ok(dt) = s.parse::<jiff::civil::DateTime>() {
        return Ok(Value::DateTime(dt));
    }
    if let Ok(date) = s.parse::<jiff::civil::Date>() {
        return Ok(Value::Date(date));
    }
    Err(Error::type_conversion(format!("string {s:?}"), "timestamp"))
}

pub(crate) fn to_timestamp(value: Value) -> Result<jiff::Timestamp> {
    match value {
        Value::Timestamp(ts) => Ok(ts),
        Value::DateTime(dt) => Ok(dt.to_zoned(jiff::tz::TimeZone::UTC)?.timestamp()),
        Value::Date(date) => Ok(date
            .to_zoned(jiff::tz::TimeZone::UTC)?
            .timestamp()),
        Value::I64(secs) => Ok(jiff::Timestamp::from_second(secs)?),
        Value::String(s) => to_timestamp(parse_temporal(&s)?),
        other => Err(Error::type_conversion(other.type_name(), "timestamp")),
    }
}

pub(crate) fn to_datetime(value: Value) -> Result<jiff::civil::DateTime> {
    match value {
        Value::DateTime(dt) => Ok(dt),
        Value::Timestamp(ts) => Ok(ts.to_zoned(jiff::tz::TimeZone::UTC).datetime()),
        Value::Date(date) => Ok(date.to_datetime(jiff::civil::Time::midnight())),
        Value::String(s) => to_datetime(parse_temporal(&s)?),
        other => Err(Error::type_conversion(other.type_name(), "datetime")),
    }
}

pub(crate) fn to_date(value: Value) -> Result<jiff::civil::Date> {
    match value {
        Value::Date(date) => Ok(date),
        Value::DateTime(dt) => Ok(dt.date()),
        Value::Timestamp(ts) => Ok(ts.to_zoned(jiff::tz::TimeZone::UTC).date()),
        Value::String(s) => to_date(parse_temporal(&s)?),
        other => Err(Error::type_conversion(other.type_name(), "date")),
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Value> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn scan_type() -> ScanType {
        ScanType::Bool
    }

    fn from_value(value: Value) -> Result<bool> {
        to_bool(value)
    }
}

macro_rules! impl_from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn scan_type() -> ScanType {
                    ScanType::I64
                }

                fn from_value(value: Value) -> Result<$ty> {
                    let v = to_i64(value)?;
                    <$ty>::try_from(v)
                        .map_err(|_| Error::type_conversion(format!("integer {v}"), stringify!($ty)))
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn scan_type() -> ScanType {
        ScanType::F64
    }

    fn from_value(value: Value) -> Result<f64> {
        to_f64(value)
    }
}

impl FromValue for f32 {
    fn scan_type() -> ScanType {
        ScanType::F64
    }

    fn from_value(value: Value) -> Result<f32> {
        Ok(to_f64(value)? as f32)
    }
}

impl FromValue for String {
    fn scan_type() -> ScanType {
        ScanType::Text
    }

    fn from_value(value: Value) -> Result<String> {
        to_text(value)
    }
}

impl FromValue for jiff::Timestamp {
    fn scan_type() -> ScanType {
        ScanType::Timestamp
    }

    fn from_value(value: Value) -> Result<jiff::Timestamp> {
        to_timestamp(value)
    }
}

impl FromValue for jiff::civil::DateTime {
    fn scan_type() -> ScanType {
        ScanType::DateTime
    }

    fn from_value(value: Value) -> Result<jiff::civil::DateTime> {
        to_datetime(value)
    }
}

impl FromValue for jiff::civil::Date {
    fn scan_type() -> ScanType {
        ScanType::Date
    }

    fn from_value(value: Value) -> Result<jiff::civil::Date> {
        to_date(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn scan_type() -> ScanType {
        T::scan_type().nullable()
    }

    fn from_value(value: Value) -> Result<Option<T>> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn scan_type() -> ScanType {
        T::scan_type()
    }

    fn from_value(value: Value) -> Result<Box<T>> {
        T::from_value(value).map(Box::new)
    }
}

/// Lists, and byte strings element by element (so `Vec<u8>` reads a blob).
impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Vec<T>> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            Value::Bytes(bytes) => bytes
                .into_iter()
                .map(|b| T::from_value(Value::I64(b.into())))
                .collect(),
            other => Err(Error::type_conversion(other.type_name(), "Vec")),
        }
    }
}

fn map_entries<T: FromValue>(value: Value) -> Result<impl Iterator<Item = Result<(String, T)>>> {
    match value {
        Value::Map(map) => Ok(map
            .into_iter()
            .map(|(k, v)| T::from_value(v).map(|v| (k, v)))),
        other => Err(Error::type_conversion(other.type_name(), "map")),
    }
}

impl<T: FromValue> FromValue for IndexMap<String, T> {
    fn from_value(value: Value) -> Result<IndexMap<String, T>> {
        map_entries(value)?.collect()
    }
}

impl<T: FromValue> FromValue for HashMap<String, T> {
    fn from_value(value: Value) -> Result<HashMap<String, T>> {
        map_entries(value)?.collect()
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: Value) -> Result<BTreeMap<String, T>> {
        map_entries(value)?.collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_check_range() {
        assert_eq!(i32::from_value(Value::I64(7)).unwrap(), 7);
        assert!(u8::from_value(Value::I64(300)).unwrap_err().is_type_conversion());
        assert_eq!(i64::from_value(Value::from("42")).unwrap(), 42);
    }

    #[test]
    fn option_accepts_null() {
        assert_eq!(Option::<i64>::from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<jiff::Timestamp>::scan_type(),
            ScanType::NullTimestamp
        );
    }

    #[test]
    fn strict_timestamp_rejects_null() {
        assert!(ScanType::Timestamp.scan(Value::Null).is_err());
        assert_eq!(
            ScanType::Timestamp.nullable().scan(Value::Null).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn temporal_text() {
        let dt = jiff::civil::DateTime::from_value(Value::from("2024-03-01 10:20:30")).unwrap();
        assert_eq!(dt, jiff::civil::date(2024, 3, 1).at(10, 20, 30, 0));

        let ts = jiff::Timestamp::from_value(Value::from("2024-03-01T10:20:30Z")).unwrap();
        assert_eq!(ts.as_second(), 1709288430);
    }

    #[test]
    fn blobs_into_vec_u8() {
        let bytes = Vec::<u8>::from_value(Value::Bytes(vec![1, 2, 255])).unwrap();
        assert_eq!(bytes, vec![1, 2, 255]);
    }
}
