//! Turning result rows into Rust values.
//!
//! A destination type builds a [`Plan`] from the result columns once, then
//! converts each row with it. Structs get their plan from
//! `#[derive(Record)]`; string-keyed maps and [`Value`] take every column.

mod record;
pub use record::{Builder, Record, RecordField, RecordTable};

use batis_core::{
    driver::{Column, ResultSet, ScanType},
    Error, FromValue, Result, Value,
};

use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};

/// How each column of a result set reaches the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// What the raw column value is converted to first
    pub scan_type: ScanType,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A record field, by index path
    Field(&'static [usize]),

    /// A map entry
    Key(String),

    /// Read and dropped
    Skip,
}

/// A type that can be built from one result row.
pub trait FromRow: Sized {
    fn plan(columns: &[Column]) -> Result<Plan>;

    fn from_row(plan: &Plan, row: Vec<Value>) -> Result<Self>;
}

/// Plan for a [`Record`]. Columns without a matching field are still read,
/// with timestamps relaxed so a NULL does not fail the row.
pub fn record_plan<T: Record>(columns: &[Column]) -> Result<Plan> {
    let table = T::table();

    let slots = columns
        .iter()
        .map(|column| match table.resolve(&column.name) {
            Some(field) => Slot {
                scan_type: field.scan_type,
                target: Target::Field(&field.path),
            },
            None => Slot {
                scan_type: column.scan_type.nullable(),
                target: Target::Skip,
            },
        })
        .collect();

    Ok(Plan { slots })
}

/// Build a record from a row. NULL columns leave the field at its default.
pub fn record_from_row<T: Record>(plan: &Plan, row: Vec<Value>) -> Result<T> {
    let mut record = T::default();

    for (slot, value) in plan.slots.iter().zip(row) {
        let value = slot.scan_type.scan(value)?;
        if value.is_null() {
            continue;
        }

        match &slot.target {
            Target::Field(path) => record.assign(path, value)?,
            Target::Key(_) | Target::Skip => {}
        }
    }

    Ok(record)
}

fn map_plan(columns: &[Column]) -> Plan {
    let slots = columns
        .iter()
        .map(|column| Slot {
            scan_type: column.scan_type.nullable(),
            target: Target::Key(column.name.clone()),
        })
        .collect();

    Plan { slots }
}

/// Column name and value pairs, dropping values `V` cannot hold.
fn map_entries<V: FromValue>(
    plan: &Plan,
    row: Vec<Value>,
) -> Result<impl Iterator<Item = (String, V)> + '_> {
    let mut entries = Vec::with_capacity(row.len());

    for (slot, value) in plan.slots.iter().zip(row) {
        if let Target::Key(key) = &slot.target {
            entries.push((key, slot.scan_type.scan(value)?));
        }
    }

    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| V::from_value(value).ok().map(|v| (key.clone(), v))))
}

impl<V: FromValue> FromRow for IndexMap<String, V> {
    fn plan(columns: &[Column]) -> Result<Plan> {
        Ok(map_plan(columns))
    }

    fn from_row(plan: &Plan, row: Vec<Value>) -> Result<Self> {
        Ok(map_entries(plan, row)?.collect())
    }
}

impl<V: FromValue> FromRow for HashMap<String, V> {
    fn plan(columns: &[Column]) -> Result<Plan> {
        Ok(map_plan(columns))
    }

    fn from_row(plan: &Plan, row: Vec<Value>) -> Result<Self> {
        Ok(map_entries(plan, row)?.collect())
    }
}

impl<V: FromValue> FromRow for BTreeMap<String, V> {
    fn plan(columns: &[Column]) -> Result<Plan> {
        Ok(map_plan(columns))
    }

    fn from_row(plan: &Plan, row: Vec<Value>) -> Result<Self> {
        Ok(map_entries(plan, row)?.collect())
    }
}

/// A row as a [`Value::Map`] of every column.
impl FromRow for Value {
    fn plan(columns: &[Column]) -> Result<Plan> {
        Ok(map_plan(columns))
    }

    fn from_row(plan: &Plan, row: Vec<Value>) -> Result<Self> {
        IndexMap::<String, Value>::from_row(plan, row).map(Value::Map)
    }
}

impl<T: FromRow> FromRow for Box<T> {
    fn plan(columns: &[Column]) -> Result<Plan> {
        T::plan(columns)
    }

    fn from_row(plan: &Plan, row: Vec<Value>) -> Result<Self> {
        T::from_row(plan, row).map(Box::new)
    }
}

/// Scan every row.
pub fn all<T: FromRow>(rows: ResultSet) -> Result<Vec<T>> {
    let plan = T::plan(rows.columns())?;
    rows.map(|row| T::from_row(&plan, row?)).collect()
}

/// Scan the first row, failing with `record_not_found` when there is none.
/// Remaining rows are not read.
pub fn one<T: FromRow>(mut rows: ResultSet) -> Result<T> {
    let plan = T::plan(rows.columns())?;
    match rows.next() {
        Some(row) => T::from_row(&plan, row?),
        None => Err(Error::record_not_found("query returned no results")),
    }
}

/// Scan into a value whose shape is only known at runtime.
///
/// A list receives one map per row, appended after what it already holds.
/// A map or null is replaced by the first row. Any other value cannot hold
/// rows.
pub fn into_value(rows: ResultSet, dst: &mut Value) -> Result<()> {
    match dst {
        Value::List(items) => {
            if let Some(item) = items.iter().find(|item| !item.is_map()) {
                return Err(Error::invalid_destination(format!(
                    "list holds a {}, rows are scanned as maps",
                    item.type_name()
                )));
            }
            items.extend(all::<Value>(rows)?);
            Ok(())
        }
        Value::Map(_) | Value::Null => {
            *dst = one::<Value>(rows)?;
            Ok(())
        }
        other => Err(Error::unsupported_scan_type(other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> ResultSet {
        ResultSet::from_rows(
            vec![
                Column::new("id", ScanType::I64),
                Column::new("name", ScanType::Text),
                Column::new("deleted_at", ScanType::Timestamp),
            ],
            vec![
                vec![Value::I64(1), Value::from("ferris"), Value::Null],
                vec![Value::I64(2), Value::Null, Value::Null],
            ],
        )
    }

    #[test]
    fn maps_keep_values_they_can_hold() {
        let rows: Vec<HashMap<String, i64>> = all(users()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("id"), Some(&1));
        assert!(!rows[0].contains_key("name"));
        assert!(!rows[0].contains_key("deleted_at"));

        let row: IndexMap<String, Option<String>> = one(users()).unwrap();
        assert_eq!(row["id"], Some("1".to_string()));
        assert_eq!(row["name"], Some("ferris".to_string()));
        assert_eq!(row["deleted_at"], None);
    }

    #[test]
    fn values_are_maps_in_column_order() {
        let row: Value = one(users()).unwrap();
        let keys: Vec<&str> = row.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "name", "deleted_at"]);
        assert_eq!(row.get("deleted_at"), Some(&Value::Null));
    }

    #[test]
    fn one_without_rows() {
        let rows = ResultSet::from_rows(vec![Column::new("id", ScanType::I64)], vec![]);
        let err = one::<Value>(rows).unwrap_err();
        assert!(err.is_record_not_found());
    }

    #[test]
    fn into_value_destinations() {
        let mut list = Value::List(vec![]);
        into_value(users(), &mut list).unwrap();
        assert_eq!(list.as_list().unwrap().len(), 2);

        let mut map = Value::Null;
        into_value(users(), &mut map).unwrap();
        assert_eq!(map.get("id"), Some(&Value::I64(1)));

        let mut bad_list = Value::List(vec![Value::I64(1)]);
        let err = into_value(users(), &mut bad_list).unwrap_err();
        assert!(err.is_invalid_destination());

        let mut scalar = Value::I64(0);
        let err = into_value(users(), &mut scalar).unwrap_err();
        assert!(err.is_unsupported_scan_type());
        assert_eq!(err.to_string(), "cannot scan rows into `integer`");

        let mut map = Value::Map(IndexMap::new());
        let empty = ResultSet::from_rows(vec![], vec![]);
        assert!(into_value(empty, &mut map).unwrap_err().is_record_not_found());
    }
}
