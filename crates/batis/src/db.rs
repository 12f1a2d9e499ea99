mod builder;
pub use builder::Builder;

mod connection;
pub(crate) use connection::ConnectionType;

mod pool;
pub use pool::*;

mod transaction;

use crate::{scan, FromRow, Mapper, Registry};

use batis_core::{
    driver::{
        operation::{ExecSql, QuerySql},
        Driver, ExecResult, Operation, Response, ResultSet,
    },
    Error, Evaluate, Result, Value,
};
use batis_sql::Fragments;

use std::{sync::Arc, time::Duration};

/// Shared state between all `Db` clones.
pub(crate) struct Shared {
    pub(crate) registry: Registry,
    pub(crate) fragments: Fragments,
    pub(crate) engine: Arc<dyn Evaluate>,
    pub(crate) pool: Pool,
    pub(crate) query_timeout: Option<Duration>,
}

/// A handle to a database and the statements loaded for it.
///
/// Cloning is cheap. Outside a transaction every operation takes a connection
/// from the pool; inside one, the handle passed to the transaction body is
/// pinned to the transaction's connection.
#[derive(Clone)]
pub struct Db {
    shared: Arc<Shared>,
    connection: ConnectionType,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Look up a loaded statement, trying `select`, `insert`, `update` and
    /// `delete` statements in that order.
    pub fn mapper(&self, id: &str) -> Result<Mapper<'_>> {
        let stmt = self.shared.registry.get(id)?;
        Ok(Mapper::new(self, stmt))
    }

    /// Run SQL written for the driver's placeholder style and scan every row.
    pub async fn raw_query<T: FromRow>(&self, sql: &str, params: Vec<Value>) -> Result<Vec<T>> {
        let rows = self.query(sql.to_string(), params).await?;
        scan::all(rows)
    }

    /// Run SQL that does not return rows.
    pub async fn raw_exec(&self, sql: &str, params: Vec<Value>) -> Result<ExecResult> {
        self.execute(sql.to_string(), params).await
    }

    /// True for the handle given to a transaction body.
    pub fn in_transaction(&self) -> bool {
        self.connection.in_transaction()
    }

    pub fn driver(&self) -> &dyn Driver {
        self.shared.pool.driver()
    }

    pub fn fragments(&self) -> &Fragments {
        &self.shared.fragments
    }

    pub(crate) fn engine(&self) -> &dyn Evaluate {
        &*self.shared.engine
    }

    pub(crate) async fn query(&self, sql: String, params: Vec<Value>) -> Result<ResultSet> {
        log::debug!("query: {sql}; params={params:?}");
        let response = self.exec(QuerySql { sql, params }.into()).await?;
        Ok(response.rows.into_result_set())
    }

    pub(crate) async fn execute(&self, sql: String, params: Vec<Value>) -> Result<ExecResult> {
        log::debug!("exec: {sql}; params={params:?}");
        let response = self.exec(ExecSql { sql, params }.into()).await?;
        Ok(response.rows.into_count())
    }

    /// Send an operation to the driver, bounded by the query timeout.
    async fn exec(&self, op: Operation) -> Result<Response> {
        let fut = self.connection.exec(&self.shared.pool, op);

        match self.shared.query_timeout {
            Some(duration) => tokio::time::timeout(duration, fut)
                .await
                .map_err(|_| Error::timed_out(duration))?,
            None => fut.await,
        }
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("driver", &self.shared.pool.driver())
            .field("statements", &self.shared.registry.len())
            .field("in_transaction", &self.in_transaction())
            .finish()
    }
}
