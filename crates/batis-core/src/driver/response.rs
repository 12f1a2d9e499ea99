use super::Column;
use crate::{Result, Value};

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Outcome of a statement that does not return rows
    Count(ExecResult),

    /// Column metadata and a cursor over the returned rows
    Values(ResultSet),
}

/// Outcome of an insert, update or delete.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,

    /// Populated by backends that report it (SQLite, MySQL).
    pub last_insert_id: Option<i64>,
}

/// Rows returned by a query, one `Vec<Value>` per row in column order.
pub struct ResultSet {
    columns: Vec<Column>,
    rows: Box<dyn Iterator<Item = Result<Vec<Value>>> + Send>,
}

impl Response {
    pub fn count(result: ExecResult) -> Response {
        Response {
            rows: Rows::Count(result),
        }
    }

    pub fn result_set(result_set: ResultSet) -> Response {
        Response {
            rows: Rows::Values(result_set),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Rows::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Rows::Values(_))
    }

    /// The exec result; a result set counts as zero affected rows.
    pub fn into_count(self) -> ExecResult {
        match self {
            Rows::Count(result) => result,
            Rows::Values(_) => ExecResult::default(),
        }
    }

    /// The result set; a count becomes an empty set.
    pub fn into_result_set(self) -> ResultSet {
        match self {
            Rows::Values(result_set) => result_set,
            Rows::Count(_) => ResultSet::empty(),
        }
    }
}

impl ResultSet {
    pub fn new(
        columns: Vec<Column>,
        rows: impl Iterator<Item = Result<Vec<Value>>> + Send + 'static,
    ) -> ResultSet {
        ResultSet {
            columns,
            rows: Box::new(rows),
        }
    }

    /// A fully materialized result set.
    pub fn from_rows(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> ResultSet {
        ResultSet::new(columns, rows.into_iter().map(Ok))
    }

    pub fn empty() -> ResultSet {
        ResultSet::from_rows(vec![], vec![])
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_parts(
        self,
    ) -> (
        Vec<Column>,
        Box<dyn Iterator<Item = Result<Vec<Value>>> + Send>,
    ) {
        (self.columns, self.rows)
    }
}

impl Iterator for ResultSet {
    type Item = Result<Vec<Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }
}

impl core::fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("ResultSet")
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}
