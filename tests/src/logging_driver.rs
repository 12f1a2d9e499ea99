use batis_core::{
    async_trait,
    driver::{operation::Transaction, Connection, Driver, Operation, Response},
    Result,
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

/// What a connection was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverOp {
    Query(String),
    Exec(String),
    Begin,
    Commit,
    Rollback,
}

impl From<&Operation> for DriverOp {
    fn from(op: &Operation) -> Self {
        match op {
            Operation::QuerySql(op) => DriverOp::Query(op.sql.clone()),
            Operation::ExecSql(op) => DriverOp::Exec(op.sql.clone()),
            Operation::Transaction(Transaction::Start) => DriverOp::Begin,
            Operation::Transaction(Transaction::Commit) => DriverOp::Commit,
            Operation::Transaction(Transaction::Rollback) => DriverOp::Rollback,
        }
    }
}

pub type OpLog = Arc<Mutex<Vec<DriverOp>>>;

/// Wraps a driver and records every operation its connections execute.
#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,
    ops_log: OpLog,

    /// Added before each query to exercise timeouts
    query_delay: Option<Duration>,
}

impl LoggingDriver {
    pub fn new(driver: impl Driver) -> Self {
        Self {
            inner: Box::new(driver),
            ops_log: OpLog::default(),
            query_delay: None,
        }
    }

    pub fn query_delay(mut self, delay: Duration) -> Self {
        self.query_delay = Some(delay);
        self
    }

    pub fn ops_log_handle(&self) -> OpLog {
        self.ops_log.clone()
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    fn dialect(&self) -> &str {
        self.inner.dialect()
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(LoggingConnection {
            inner: self.inner.connect().await?,
            ops_log: self.ops_log_handle(),
            query_delay: self.query_delay,
        }))
    }

    fn max_connections(&self) -> Option<usize> {
        self.inner.max_connections()
    }
}

#[derive(Debug)]
struct LoggingConnection {
    inner: Box<dyn Connection>,
    ops_log: OpLog,
    query_delay: Option<Duration>,
}

#[async_trait]
impl Connection for LoggingConnection {
    async fn exec(&mut self, operation: Operation) -> Result<Response> {
        let op = DriverOp::from(&operation);

        if let (DriverOp::Query(_), Some(delay)) = (&op, self.query_delay) {
            tokio::time::sleep(delay).await;
        }

        self.ops_log.lock().unwrap().push(op);
        self.inner.exec(operation).await
    }
}
