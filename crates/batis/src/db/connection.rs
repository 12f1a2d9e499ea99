use super::{Pool, PoolConnection};

use batis_core::{
    driver::{Operation, Response},
    Result,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Where a [`Db`](crate::Db) sends its operations.
#[derive(Debug, Clone)]
pub(crate) enum ConnectionType {
    /// A fresh pooled connection per operation
    Pool,

    /// The connection pinned by an open transaction
    Transaction(Arc<Mutex<PoolConnection>>),
}

impl ConnectionType {
    pub(crate) fn in_transaction(&self) -> bool {
        matches!(self, ConnectionType::Transaction(_))
    }

    pub(crate) async fn exec(&self, pool: &Pool, op: Operation) -> Result<Response> {
        match self {
            ConnectionType::Pool => pool.get().await?.exec(op).await,
            ConnectionType::Transaction(conn) => conn.lock().await.exec(op).await,
        }
    }
}
