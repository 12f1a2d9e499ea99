mod value;
pub(crate) use value::Value;

use batis_core::{
    async_trait,
    driver::{
        operation::{Operation, Transaction},
        Column, Driver, ExecResult, Response, ResultSet,
    },
    err, Error, Result,
};
use rusqlite::Connection as RusqliteConnection;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver from a `sqlite:` connection URL. The path
    /// `:memory:` opens an in-memory database.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(err!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            ));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn dialect(&self) -> &str {
        "sqlite"
    }

    async fn connect(&self) -> Result<Box<dyn batis_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }

    /// Every connection to `:memory:` is its own database, so the pool must
    /// hold on to exactly one.
    fn max_connections(&self) -> Option<usize> {
        matches!(self, Self::InMemory).then_some(1)
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;

        Ok(Self { connection })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        log::debug!("opening sqlite database {}", path.as_ref().display());
        let connection =
            RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        Ok(Self { connection })
    }

    fn query(&mut self, sql: &str, params: Vec<batis_core::Value>) -> Result<ResultSet> {
        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(Error::driver_operation_failed)?;

        let columns: Vec<Column> = stmt
            .columns()
            .iter()
            .map(|column| Column::new(column.name(), value::scan_type(column.decl_type())))
            .collect();
        let width = columns.len();

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();
        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        let mut ret = vec![];

        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut items = Vec::with_capacity(width);

                    for index in 0..width {
                        let value = row.get_ref(index).map_err(Error::driver_operation_failed)?;
                        items.push(Value::from_sql(value)?.into_inner());
                    }

                    ret.push(items);
                }
                Ok(None) => break,
                Err(err) => {
                    return Err(Error::driver_operation_failed(err));
                }
            }
        }

        Ok(ResultSet::from_rows(columns, ret))
    }

    fn execute(&mut self, sql: &str, params: Vec<batis_core::Value>) -> Result<ExecResult> {
        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(Error::driver_operation_failed)?;

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();
        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        Ok(ExecResult {
            rows_affected: count as u64,
            last_insert_id: Some(self.connection.last_insert_rowid()),
        })
    }

    fn transaction(&mut self, op: Transaction) -> Result<Response> {
        let sql = match op {
            Transaction::Start => "BEGIN",
            Transaction::Commit => "COMMIT",
            Transaction::Rollback => "ROLLBACK",
        };

        self.connection
            .execute(sql, [])
            .map_err(Error::driver_operation_failed)?;
        Ok(Response::count(ExecResult::default()))
    }
}

#[async_trait]
impl batis_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::QuerySql(op) => self.query(&op.sql, op.params).map(Response::result_set),
            Operation::ExecSql(op) => self.execute(&op.sql, op.params).map(Response::count),
            Operation::Transaction(op) => self.transaction(op),
        }
    }
}
