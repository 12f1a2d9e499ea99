use std::{ops::Deref, sync::Arc, time::Duration};

use batis_core::{driver::operation::Transaction as TransactionOp, Error, Result};
use tokio::{sync::Mutex, time::timeout};

use crate::{db::ConnectionType, Db};

/// A transaction opened by [`Db::transaction`]. A nested call reuses the
/// transaction it runs in, so only the outermost one issues BEGIN, COMMIT
/// and ROLLBACK.
pub(crate) enum Transaction<'a> {
    Root(Db),
    Nested(&'a Db),
}

impl Transaction<'_> {
    async fn exec(&self, op: TransactionOp) -> Result<()> {
        match self {
            Transaction::Root(db) => {
                log::debug!("transaction {op:?}");
                db.exec(op.into()).await?;
            }
            Transaction::Nested(_) => {}
        }
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        self.exec(TransactionOp::Start).await
    }

    async fn commit(&self) -> Result<()> {
        self.exec(TransactionOp::Commit).await
    }

    async fn rollback(&self) -> Result<()> {
        self.exec(TransactionOp::Rollback).await
    }
}

impl Deref for Transaction<'_> {
    type Target = Db;

    fn deref(&self) -> &Self::Target {
        match self {
            Transaction::Root(db) => db,
            Transaction::Nested(db) => db,
        }
    }
}

impl Db {
    pub(crate) async fn begin(&self) -> Result<Transaction<'_>> {
        let tx = match &self.connection {
            ConnectionType::Pool => {
                let conn = self.shared.pool.get().await?;
                Transaction::Root(Db {
                    shared: self.shared.clone(),
                    connection: ConnectionType::Transaction(Arc::new(Mutex::new(conn))),
                })
            }
            ConnectionType::Transaction(_) => Transaction::Nested(self),
        };

        tx.start().await?;
        Ok(tx)
    }

    /// Run `f` inside a transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back when it
    /// returns `Err`. Statements must go through the `Db` handed to `f` to be
    /// part of the transaction.
    pub async fn transaction<O>(&self, f: impl AsyncFnOnce(&Db) -> Result<O>) -> Result<O> {
        let tx = self.begin().await?;
        let res = f(&tx).await;
        finish(tx, res).await
    }

    /// Like [`Db::transaction`], but rolls back with a `timed_out` error when
    /// `f` does not finish within `duration`.
    pub async fn transaction_with_timeout<O>(
        &self,
        duration: Duration,
        f: impl AsyncFnOnce(&Db) -> Result<O>,
    ) -> Result<O> {
        let tx = self.begin().await?;

        let Ok(res) = timeout(duration, f(&tx)).await else {
            tx.rollback().await?;
            return Err(Error::timed_out(duration).context("transaction"));
        };

        finish(tx, res).await
    }
}

async fn finish<O>(tx: Transaction<'_>, res: Result<O>) -> Result<O> {
    match res {
        Ok(res) => {
            tx.commit().await?;
            Ok(res)
        }
        Err(err) => {
            tx.rollback().await?;
            Err(err)
        }
    }
}
