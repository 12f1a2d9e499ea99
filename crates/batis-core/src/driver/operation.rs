use crate::Value;

#[derive(Debug)]
pub enum Operation {
    /// Run SQL that returns rows
    QuerySql(QuerySql),

    /// Run SQL for its affected-row count
    ExecSql(ExecSql),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySql {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecSql {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    /// Start a transaction
    Start,

    /// Commit a transaction
    Commit,

    /// Rollback a transaction
    Rollback,
}

impl From<QuerySql> for Operation {
    fn from(value: QuerySql) -> Operation {
        Operation::QuerySql(value)
    }
}

impl From<ExecSql> for Operation {
    fn from(value: ExecSql) -> Operation {
        Operation::ExecSql(value)
    }
}

impl From<Transaction> for Operation {
    fn from(value: Transaction) -> Operation {
        Operation::Transaction(value)
    }
}
