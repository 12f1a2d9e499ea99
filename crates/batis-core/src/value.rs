use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};

/// A dynamically typed value flowing through template evaluation, parameter
/// binding and row scanning.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer
    I64(i64),

    /// 64-bit float
    F64(f64),

    /// String value
    String(String),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// An instant in time (`timestamptz`)
    Timestamp(jiff::Timestamp),

    /// A civil date and time without zone (`timestamp`)
    DateTime(jiff::civil::DateTime),

    /// A civil date
    Date(jiff::civil::Date),

    /// A plain sequence. Bound as one parameter per element.
    List(Vec<Value>),

    /// String-keyed map, in insertion order
    Map(IndexMap<String, Value>),

    /// A database-native composite encoded in its text form. Bound as a single
    /// parameter even when the underlying type is sequence shaped.
    Composite(Composite),
}

/// Text encoding of a composite database value, e.g. a PostgreSQL `point`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Composite {
    /// Database type name such as `point`, `int8[]` or `record`.
    pub type_name: &'static str,

    /// The value in the backend's text format.
    pub text: String,
}

impl Composite {
    pub fn new(type_name: &'static str, text: impl Into<String>) -> Composite {
        Composite {
            type_name,
            text: text.into(),
        }
    }
}

impl Value {
    pub const fn null() -> Value {
        Value::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I64(_) => "integer",
            Value::F64(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Timestamp(_) => "timestamp",
            Value::DateTime(_) => "datetime",
            Value::Date(_) => "date",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Composite(composite) => composite.type_name,
        }
    }

    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }
}

/// The plain text form used by `${}` substitution.
impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Bytes(v) => f.write_str(&String::from_utf8_lossy(v)),
            Value::Timestamp(v) => write!(f, "{v}"),
            Value::DateTime(v) => write!(f, "{v}"),
            Value::Date(v) => write!(f, "{v}"),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Map(map) => {
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                Ok(())
            }
            Value::Composite(composite) => f.write_str(&composite.text),
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Value {
        Value::Bool(src)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(src: $ty) -> Value {
                    Value::I64(src.into())
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(src: f32) -> Value {
        Value::F64(src.into())
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Value {
        Value::F64(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Value {
        Value::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Value {
        Value::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Value {
        Value::String(src.to_string())
    }
}

impl From<jiff::Timestamp> for Value {
    fn from(src: jiff::Timestamp) -> Value {
        Value::Timestamp(src)
    }
}

impl From<jiff::civil::DateTime> for Value {
    fn from(src: jiff::civil::DateTime) -> Value {
        Value::DateTime(src)
    }
}

impl From<jiff::civil::Date> for Value {
    fn from(src: jiff::civil::Date) -> Value {
        Value::Date(src)
    }
}

impl From<Composite> for Value {
    fn from(src: Composite) -> Value {
        Value::Composite(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(value: Option<T>) -> Value {
        match value {
            Some(value) => Value::from(value),
            None => Value::Null,
        }
    }
}

impl<T> From<Vec<T>> for Value
where
    Value: From<T>,
{
    fn from(items: Vec<T>) -> Value {
        Value::List(items.into_iter().map(Value::from).collect())
    }
}

impl<T> From<&[T]> for Value
where
    T: Clone,
    Value: From<T>,
{
    fn from(items: &[T]) -> Value {
        Value::List(items.iter().cloned().map(Value::from).collect())
    }
}

impl<T> From<IndexMap<String, T>> for Value
where
    Value: From<T>,
{
    fn from(map: IndexMap<String, T>) -> Value {
        Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
    }
}

impl<T> From<BTreeMap<String, T>> for Value
where
    Value: From<T>,
{
    fn from(map: BTreeMap<String, T>) -> Value {
        Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
    }
}

impl<T> From<HashMap<String, T>> for Value
where
    Value: From<T>,
{
    fn from(map: HashMap<String, T>) -> Value {
        // Sort so that iteration order does not depend on the hasher.
        let sorted: BTreeMap<String, T> = map.into_iter().collect();
        Value::Map(sorted.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(src: serde_json::Value) -> Value {
        use serde_json::Value as Json;

        match src {
            Json::Null => Value::Null,
            Json::Bool(v) => Value::Bool(v),
            Json::Number(n) => match n.as_i64() {
                Some(v) => Value::I64(v),
                None => Value::F64(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(v) => Value::String(v),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_maps_convert_in_key_order() {
        let map: HashMap<String, i64> = [("b", 2), ("c", 3), ("a", 1)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let value = Value::from(map);
        let keys: Vec<_> = value.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(value.get("c"), Some(&Value::I64(3)));
    }

    #[test]
    fn json_objects_keep_their_order() {
        let value = Value::from(serde_json::json!({ "zone": "eu", "id": 7, "active": true }));
        let keys: Vec<_> = value.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zone", "id", "active"]);
    }
}
