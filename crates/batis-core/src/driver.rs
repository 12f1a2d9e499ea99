mod column;
pub use column::{Column, ScanType};

pub mod operation;
pub use operation::Operation;

mod response;
pub use response::{ExecResult, Response, ResultSet, Rows};

use crate::{async_trait, Result};

use std::fmt::Debug;

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Backend identifier, e.g. `postgres` or `sqlite`. Mapper documents that
    /// do not declare a `type` inherit it, and it selects the placeholder
    /// style.
    fn dialect(&self) -> &str;

    /// Open a new connection.
    async fn connect(&self) -> Result<Box<dyn Connection>>;

    /// Upper bound on open connections, if the backend needs one.
    fn max_connections(&self) -> Option<usize> {
        None
    }
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a database operation
    async fn exec(&mut self, op: Operation) -> Result<Response>;
}
