//! Connection pooling for database connections.

use batis_core::{
    driver::{Connection, Driver},
    Error, Result,
};

use std::ops::{Deref, DerefMut};

/// A connection pool that manages database connections.
#[derive(Debug)]
pub struct Pool {
    inner: deadpool::managed::Pool<Manager>,
}

impl Pool {
    /// Creates a new connection pool from the given driver and checks that a
    /// first connection can be opened.
    pub async fn new(driver: impl Driver) -> Result<Self> {
        let max_connections = driver.max_connections();
        let mut builder = deadpool::managed::Pool::builder(Manager {
            driver: Box::new(driver),
        });

        if let Some(max_connections) = max_connections {
            builder = builder.max_size(max_connections);
        }

        let inner = builder.build().map_err(Error::driver_operation_failed)?;

        let pool = Self { inner };
        drop(pool.get().await?);
        Ok(pool)
    }

    /// Retrieves a connection from the pool.
    pub async fn get(&self) -> Result<PoolConnection> {
        let connection = self.inner.get().await.map_err(|err| match err {
            deadpool::managed::PoolError::Backend(err) => err,
            err => Error::driver_operation_failed(err),
        })?;
        Ok(PoolConnection { inner: connection })
    }

    pub fn driver(&self) -> &dyn Driver {
        self.inner.manager().driver.as_ref()
    }
}

#[derive(Debug)]
struct Manager {
    driver: Box<dyn Driver>,
}

impl deadpool::managed::Manager for Manager {
    type Type = Box<dyn Connection>;
    type Error = Error;

    async fn create(&self) -> Result<Self::Type> {
        log::trace!("opening {} connection", self.driver.dialect());
        self.driver.connect().await
    }

    async fn recycle(
        &self,
        _obj: &mut Self::Type,
        _metrics: &deadpool::managed::Metrics,
    ) -> deadpool::managed::RecycleResult<Self::Error> {
        Ok(())
    }
}

/// A connection retrieved from a pool.
///
/// When dropped, the connection is returned to the pool for reuse.
#[derive(Debug)]
pub struct PoolConnection {
    inner: deadpool::managed::Object<Manager>,
}

impl Deref for PoolConnection {
    type Target = Box<dyn Connection>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PoolConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
