use std::collections::HashMap;

use tokio_postgres::{Client, Error, Statement};

/// Prepared statements of one connection, keyed by SQL text. Parameter types
/// are always left for the server to infer.
#[derive(Debug, Default)]
pub(crate) struct StatementCache {
    map: HashMap<String, Statement>,
}

impl StatementCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn prepare(&mut self, client: &Client, sql: &str) -> Result<Statement, Error> {
        if let Some(stmt) = self.map.get(sql) {
            return Ok(stmt.clone());
        }

        let stmt = client.prepare(sql).await?;
        self.map.insert(sql.to_string(), stmt.clone());
        log::trace!("prepared statement #{}: {sql}", self.map.len());
        Ok(stmt)
    }
}
