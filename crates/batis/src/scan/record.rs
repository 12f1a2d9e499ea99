use batis_core::{driver::ScanType, Result, Value};

use std::collections::HashMap;

/// A struct that rows can be scanned into, usually implemented with
/// `#[derive(Record)]`.
pub trait Record: Default + Send + 'static {
    /// Column lookup table for this type, built once.
    fn table() -> &'static RecordTable;

    /// Store `value` in the field found at `path`.
    fn assign(&mut self, path: &[usize], value: Value) -> Result<()>;
}

/// A field reachable from a record, possibly through embedded records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    pub name: String,
    pub column: String,
    /// Field indices from the outer record down to this field
    pub path: Vec<usize>,
    pub scan_type: ScanType,
}

/// Maps column names to the fields of a record.
#[derive(Debug, Default)]
pub struct RecordTable {
    fields: Vec<RecordField>,

    /// Field names and column names, pointing into `fields`
    index: HashMap<String, usize>,
}

#[derive(Debug, Default)]
pub struct Builder {
    table: RecordTable,
}

impl RecordTable {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    /// Find the field a result column fills.
    ///
    /// A call wrapper such as `count(*)` is cut at the `(` and a table
    /// qualifier before the first `.` is dropped. The rest must match a field
    /// or column name exactly, or else in lowercase.
    pub fn resolve(&self, column: &str) -> Option<&RecordField> {
        let name = column.split('(').next().unwrap_or(column);
        let name = match name.split_once('.') {
            Some((_, rest)) => rest,
            None => name,
        };

        let pos = match self.index.get(name) {
            Some(pos) => Some(pos),
            None => self.index.get(&name.to_lowercase()),
        };
        pos.map(|pos| &self.fields[*pos])
    }
}

impl Builder {
    /// Register a scalar field. Names registered later replace earlier ones.
    pub fn field(
        mut self,
        index: usize,
        name: &str,
        column: &str,
        scan_type: ScanType,
    ) -> Builder {
        self.push(RecordField {
            name: name.to_string(),
            column: column.to_string(),
            path: vec![index],
            scan_type,
        });
        self
    }

    /// Promote every field of `inner`, stored at `index`, into this table.
    pub fn embed(mut self, index: usize, inner: &RecordTable) -> Builder {
        for field in &inner.fields {
            let mut path = Vec::with_capacity(field.path.len() + 1);
            path.push(index);
            path.extend_from_slice(&field.path);

            self.push(RecordField {
                path,
                ..field.clone()
            });
        }
        self
    }

    pub fn build(self) -> RecordTable {
        self.table
    }

    fn push(&mut self, field: RecordField) {
        let pos = self.table.fields.len();
        self.table.index.insert(field.name.clone(), pos);
        self.table.index.insert(field.column.clone(), pos);
        self.table.fields.push(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RecordTable {
        let inner = RecordTable::builder()
            .field(0, "created_at", "created", ScanType::NullTimestamp)
            .build();

        RecordTable::builder()
            .field(0, "id", "id", ScanType::I64)
            .field(1, "user_name", "name", ScanType::Text)
            .embed(2, &inner)
            .build()
    }

    #[test]
    fn field_and_column_names() {
        let table = table();
        assert_eq!(table.resolve("name").unwrap().path, [1]);
        assert_eq!(table.resolve("user_name").unwrap().path, [1]);
        assert_eq!(table.resolve("created").unwrap().path, [2, 0]);
        assert!(table.resolve("missing").is_none());
    }

    #[test]
    fn qualifiers_wrappers_and_case() {
        let table = table();
        assert_eq!(table.resolve("u.name").unwrap().path, [1]);
        assert_eq!(table.resolve("ID").unwrap().path, [0]);
        assert_eq!(table.resolve("id(*)").unwrap().path, [0]);
    }

    #[test]
    fn later_names_win() {
        let table = RecordTable::builder()
            .field(0, "a", "x", ScanType::I64)
            .field(1, "b", "x", ScanType::Text)
            .build();
        assert_eq!(table.resolve("x").unwrap().path, [1]);
        assert_eq!(table.resolve("a").unwrap().path, [0]);
    }
}
