use batis_core::{driver::ScanType, Error, Value as CoreValue};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core Batis value.
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a SQLite value within a row to a Batis value. Typing is left
    /// to the column's scan type.
    pub fn from_sql(value: ValueRef<'_>) -> batis_core::Result<Self> {
        let core_value = match value {
            ValueRef::Null => CoreValue::Null,
            ValueRef::Integer(value) => CoreValue::I64(value),
            ValueRef::Real(value) => CoreValue::F64(value),
            ValueRef::Text(value) => CoreValue::String(
                std::str::from_utf8(value)
                    .map_err(Error::driver_operation_failed)?
                    .to_string(),
            ),
            ValueRef::Blob(value) => CoreValue::Bytes(value.to_vec()),
        };

        Ok(Value(core_value))
    }
}

/// Scan type for a declared column type, following SQLite's affinity rules.
/// Expressions have no declared type and keep whatever SQLite returns.
pub(crate) fn scan_type(decl_type: Option<&str>) -> ScanType {
    let Some(decl_type) = decl_type else {
        return ScanType::Any;
    };
    let decl_type = decl_type.to_ascii_uppercase();

    if decl_type.contains("INT") {
        ScanType::I64
    } else if decl_type.contains("BOOL") {
        ScanType::Bool
    } else if decl_type.contains("DATETIME") || decl_type.contains("TIMESTAMP") {
        ScanType::Timestamp
    } else if decl_type.contains("DATE") {
        ScanType::Date
    } else if ["CHAR", "CLOB", "TEXT"]
        .iter()
        .any(|ty| decl_type.contains(ty))
    {
        ScanType::Text
    } else if decl_type.contains("BLOB") {
        ScanType::Bytes
    } else if ["REAL", "FLOA", "DOUB"]
        .iter()
        .any(|ty| decl_type.contains(ty))
    {
        ScanType::F64
    } else {
        ScanType::Any
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use CoreValue::*;

        match &self.0 {
            Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            Bool(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            Bytes(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Blob(&v[..]))),
            Timestamp(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(v.to_string()))),
            DateTime(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(v.to_string()))),
            Date(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(v.to_string()))),
            Composite(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.text.as_bytes()))),
            value @ (List(_) | Map(_)) => Err(rusqlite::Error::ToSqlConversionFailure(Box::new(
                Error::type_conversion(value.type_name(), "sqlite parameter"),
            ))),
        }
    }
}
