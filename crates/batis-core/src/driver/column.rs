use crate::{convert, Error, Result, Value};

/// A result column as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub scan_type: ScanType,
}

impl Column {
    pub fn new(name: impl Into<String>, scan_type: ScanType) -> Column {
        Column {
            name: name.into(),
            scan_type,
        }
    }
}

/// The shape a raw column value is converted into before it reaches a
/// destination.
///
/// Every type accepts NULL except the strict timestamp family, which mirrors
/// how database drivers refuse to scan NULL into a plain time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanType {
    /// Keep whatever the driver produced
    Any,
    Bool,
    I64,
    F64,
    Text,
    Bytes,
    /// Instant in time; NULL is an error
    Timestamp,
    /// Civil date-time; NULL is an error
    DateTime,
    /// Civil date; NULL is an error
    Date,
    /// Any member of the timestamp family, or NULL
    NullTimestamp,
}

impl ScanType {
    pub fn is_timestamp(self) -> bool {
        matches!(
            self,
            ScanType::Timestamp | ScanType::DateTime | ScanType::Date
        )
    }

    /// Timestamp-family types become [`ScanType::NullTimestamp`] so that a NULL
    /// does not fail the scan. Everything else is returned unchanged.
    pub fn nullable(self) -> ScanType {
        if self.is_timestamp() {
            ScanType::NullTimestamp
        } else {
            self
        }
    }

    /// Convert a raw driver value into this scan type.
    pub fn scan(self, value: Value) -> Result<Value> {
        if value.is_null() {
            return match self {
                ScanType::Timestamp => Err(Error::type_conversion("NULL", "timestamp")),
                ScanType::DateTime => Err(Error::type_conversion("NULL", "datetime")),
                ScanType::Date => Err(Error::type_conversion("NULL", "date")),
                _ => Ok(Value::Null),
            };
        }

        match self {
            ScanType::Any => Ok(value),
            ScanType::Bool => convert::to_bool(value).map(Value::Bool),
            ScanType::I64 => convert::to_i64(value).map(Value::I64),
            ScanType::F64 => convert::to_f64(value).map(Value::F64),
            ScanType::Text => convert::to_text(value).map(Value::String),
            ScanType::Bytes => match value {
                Value::Bytes(bytes) => Ok(Value::Bytes(bytes)),
                Value::String(s) => Ok(Value::Bytes(s.into_bytes())),
                other => Err(Error::type_conversion(other.type_name(), "bytes")),
            },
            ScanType::Timestamp => convert::to_timestamp(value).map(Value::Timestamp),
            ScanType::DateTime => convert::to_datetime(value).map(Value::DateTime),
            ScanType::Date => convert::to_date(value).map(Value::Date),
            ScanType::NullTimestamp => match value {
                Value::Timestamp(_) | Value::DateTime(_) | Value::Date(_) => Ok(value),
                Value::String(s) => convert::parse_temporal(&s),
                other => Err(Error::type_conversion(other.type_name(), "timestamp")),
            },
        }
    }
}
