use crate::{Error, Result, Value};

use indexmap::IndexMap;
use serde::Serialize;

/// Variable bindings visible to template expressions and markers.
///
/// Each call into a mapped statement owns its scope, so loop variables
/// injected during evaluation never leak into another call.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Scope {
    vars: IndexMap<String, Value>,
}

impl Scope {
    pub fn new() -> Scope {
        Scope::default()
    }

    /// Build a scope from any serializable struct or map.
    ///
    /// The input must serialize to an object; its fields become the top
    /// level variables.
    pub fn from_serialize<T: Serialize + ?Sized>(input: &T) -> Result<Scope> {
        match Value::from(serde_json::to_value(input)?) {
            Value::Map(vars) => Ok(Scope { vars }),
            other => Err(Error::type_conversion(other.type_name(), "Scope")),
        }
    }

    /// Bind `name`, returning whatever was bound before.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.vars.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.shift_remove(name)
    }

    /// Put back a binding saved by an earlier [`Scope::insert`]: rebind it
    /// when there was one, otherwise drop the name.
    pub fn restore(&mut self, name: &str, previous: Option<Value>) {
        match previous {
            Some(value) => {
                self.vars.insert(name.to_string(), value);
            }
            None => {
                self.vars.shift_remove(name);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The whole scope as a map value.
    pub fn into_value(self) -> Value {
        Value::Map(self.vars)
    }
}

impl From<IndexMap<String, Value>> for Scope {
    fn from(vars: IndexMap<String, Value>) -> Scope {
        Scope { vars }
    }
}

impl TryFrom<Value> for Scope {
    type Error = Error;

    fn try_from(value: Value) -> Result<Scope> {
        match value {
            Value::Map(vars) => Ok(Scope { vars }),
            other => Err(Error::type_conversion(other.type_name(), "Scope")),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Scope
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Scope {
        Scope {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Build a [`Scope`] from `key => value` pairs.
///
/// ```
/// let scope = batis_core::args! { "id" => 500, "name" => "ferris" };
/// assert_eq!(scope.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Scope::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut scope = $crate::Scope::new();
        $(
            scope.insert($key, $value);
        )+
        scope
    }};
}
