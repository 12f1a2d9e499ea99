mod statement_cache;
use statement_cache::StatementCache;

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
use postgres_types::ToSql;
use tokio_postgres::{tls::MakeTlsConnect, Client, Config, NoTls, Socket};
use url::Url;

/// PostgreSQL driver. Placeholders are written `$1`, `$2`, ...
#[derive(Debug, Clone)]
pub struct PostgreSQL {
    config: Config,
}

impl PostgreSQL {
    /// Configure the driver from a `postgresql://` (or `postgres://`)
    /// connection URL. Connections are opened without TLS.
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(Error::driver_operation_failed)?;

        if !matches!(url.scheme(), "postgresql" | "postgres") {
            return Err(err!(
                "connection URL does not have a `postgresql` scheme; url={url}"
            ));
        }

        let host = url
            .host_str()
            .ok_or_else(|| err!("missing host in connection URL; url={url}"))?;

        let dbname = url.path().trim_start_matches('/');
        if dbname.is_empty() {
            return Err(err!(
                "no database specified - missing path in connection URL; url={url}"
            ));
        }

        let mut config = Config::new();
        config.host(host);
        config.dbname(dbname);

        if let Some(port) = url.port() {
            config.port(port);
        }

        if !url.username().is_empty() {
            config.user(url.username());
        }

        if let Some(password) = url.password() {
            config.password(password);
        }

        Ok(Self::with_config(config))
    }

    /// Use an existing [`tokio_postgres::Config`].
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[async_trait]
impl Driver for PostgreSQL {
    fn dialect(&self) -> &str {
        "postgres"
    }

    async fn connect(&self) -> Result<Box<dyn batis_core::Connection>> {
        let connection = Connection::connect(&self.config, NoTls).await?;
        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    client: Client,
    statements: StatementCache,
}

impl Connection {
    /// Initialize a connection from an already connected client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            statements: StatementCache::new(),
        }
    }

    /// Connect with the given TLS setup. The connection task is spawned onto
    /// the current Tokio runtime.
    pub async fn connect<T>(config: &Config, tls: T) -> Result<Self>
    where
        T: MakeTlsConnect<Socket> + 'static,
        T::Stream: Send,
    {
        let (client, connection) = config
            .connect(tls)
            .await
            .map_err(Error::driver_operation_failed)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("postgres connection error: {e}");
            }
        });

        Ok(Self::new(client))
    }

    async fn query(&mut self, sql: &str, params: Vec<batis_core::Value>) -> Result<ResultSet> {
        let stmt = self
            .statements
            .prepare(&self.client, sql)
            .await
            .map_err(Error::driver_operation_failed)?;

        let columns: Vec<Column> = stmt
            .columns()
            .iter()
            .map(|column| Column::new(column.name(), value::scan_type(column.type_())))
            .collect();

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();
        let args = params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect::<Vec<_>>();

        let rows = self
            .client
            .query(&stmt, &args)
            .await
            .map_err(Error::driver_operation_failed)?;

        let rows = rows
            .iter()
            .map(|row| {
                (0..row.len())
                    .map(|index| Value::from_row(row, index).map(Value::into_inner))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ResultSet::from_rows(columns, rows))
    }

    /// PostgreSQL has no last-insert id; use `RETURNING` with a select
    /// statement instead.
    async fn execute(&mut self, sql: &str, params: Vec<batis_core::Value>) -> Result<ExecResult> {
        let stmt = self
            .statements
            .prepare(&self.client, sql)
            .await
            .map_err(Error::driver_operation_failed)?;

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();
        let args = params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect::<Vec<_>>();

        let count = self
            .client
            .execute(&stmt, &args)
            .await
            .map_err(Error::driver_operation_failed)?;

        Ok(ExecResult {
            rows_affected: count,
            last_insert_id: None,
        })
    }

    async fn transaction(&mut self, op: Transaction) -> Result<Response> {
        let sql = match op {
            Transaction::Start => "BEGIN",
            Transaction::Commit => "COMMIT",
            Transaction::Rollback => "ROLLBACK",
        };

        self.client
            .batch_execute(sql)
            .await
            .map_err(Error::driver_operation_failed)?;
        Ok(Response::count(ExecResult::default()))
    }
}

#[async_trait]
impl batis_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::QuerySql(op) => self
                .query(&op.sql, op.params)
                .await
                .map(Response::result_set),
            Operation::ExecSql(op) => self.execute(&op.sql, op.params).await.map(Response::count),
            Operation::Transaction(op) => self.transaction(op).await,
        }
    }
}
