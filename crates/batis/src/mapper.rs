use crate::{scan, Db, FromRow};

use batis_core::{driver::ExecResult, Error, Result, Scope, Value};
use batis_sql::{Binder, Bound, Statement, StatementKind};

/// A loaded statement, ready to be bound. Returned by [`Db::mapper`].
#[derive(Debug, Clone, Copy)]
pub struct Mapper<'a> {
    db: &'a Db,
    stmt: &'a Statement,
}

/// A statement bound to its arguments.
///
/// Binding errors are kept and returned by whichever method runs the
/// statement, so nothing reaches the database when binding failed.
#[derive(Debug)]
pub struct Query<'a> {
    db: &'a Db,
    stmt: &'a Statement,
    bound: Result<Bound>,
}

impl<'a> Mapper<'a> {
    pub(crate) fn new(db: &'a Db, stmt: &'a Statement) -> Mapper<'a> {
        Mapper { db, stmt }
    }

    pub fn id(&self) -> &'a str {
        &self.stmt.id
    }

    pub fn kind(&self) -> StatementKind {
        self.stmt.kind
    }

    pub fn statement(&self) -> &'a Statement {
        self.stmt
    }

    /// Evaluate the statement against `args` and bind its markers.
    pub fn bind(&self, args: Scope) -> Query<'a> {
        let binder = Binder::new(self.db.engine(), self.db.fragments());

        Query {
            db: self.db,
            stmt: self.stmt,
            bound: binder.bind(self.stmt, args),
        }
    }
}

impl<'a> Query<'a> {
    /// The SQL and parameters that would be sent.
    pub fn bound(&self) -> Result<&Bound> {
        self.bound.as_ref().map_err(Clone::clone)
    }

    pub fn into_bound(self) -> Result<Bound> {
        self.bound
    }

    /// Run as a query and scan every row.
    pub async fn fetch_all<T: FromRow>(self) -> Result<Vec<T>> {
        let id = self.stmt.id.clone();
        let rows = self.query().await?;
        scan::all(rows).map_err(|err| err.context(format!("scanning `{id}`")))
    }

    /// Run as a query and scan the first row. No rows is a `record_not_found`
    /// error.
    pub async fn fetch_one<T: FromRow>(self) -> Result<T> {
        let id = self.stmt.id.clone();
        let rows = self.query().await?;
        scan::one(rows).map_err(|err| err.context(format!("scanning `{id}`")))
    }

    /// Run as a query and scan into a value shaped at runtime; see
    /// [`scan::into_value`].
    pub async fn fetch_into(self, dst: &mut Value) -> Result<()> {
        let id = self.stmt.id.clone();
        let rows = self.query().await?;
        scan::into_value(rows, dst).map_err(|err| err.context(format!("scanning `{id}`")))
    }

    /// Run an `insert`, `update` or `delete` for its affected-row count.
    pub async fn execute(self) -> Result<ExecResult> {
        if !self.stmt.kind.is_write() {
            return Err(Error::invalid_statement(format!(
                "`{}` is a select and cannot be executed; fetch it instead",
                self.stmt.id
            )));
        }

        let (sql, params) = self.bound?.into_parts();
        self.db.execute(sql, params).await
    }

    async fn query(self) -> Result<batis_core::driver::ResultSet> {
        let (sql, params) = self.bound?.into_parts();
        self.db.query(sql, params).await
    }
}
