use crate::logging_driver::{DriverOp, LoggingDriver, OpLog};

use batis::{db::Builder, Db, Result};
use batis_driver_sqlite::Sqlite;

/// Tables every test starts with.
pub const SCHEMA: &[&str] = &[
    "CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_name TEXT NOT NULL,
        email TEXT,
        age INTEGER,
        street TEXT,
        city TEXT,
        created_at DATETIME,
        deleted_at DATETIME
    )",
    "CREATE TABLE tags (
        user_id INTEGER NOT NULL,
        tag TEXT NOT NULL
    )",
];

/// A fresh in-memory database with the test schema, logging every driver
/// operation.
pub struct DbTest {
    pub db: Db,
    ops_log: OpLog,
}

impl DbTest {
    /// Load `mapper` and connect.
    pub async fn setup(mapper: &str) -> DbTest {
        Self::try_setup(Db::builder().mapper_str(mapper), LoggingDriver::new(Sqlite::in_memory()))
            .await
            .unwrap()
    }

    pub async fn try_setup(builder: &mut Builder, driver: LoggingDriver) -> Result<DbTest> {
        crate::init_logging();

        let ops_log = driver.ops_log_handle();
        let db = builder.connect(driver).await?;

        for sql in SCHEMA {
            db.raw_exec(sql, vec![]).await?;
        }

        ops_log.lock().unwrap().clear();
        Ok(DbTest { db, ops_log })
    }

    /// Insert a user and return its id.
    pub async fn insert_user(&self, name: &str, age: Option<i64>) -> i64 {
        let res = self
            .db
            .raw_exec(
                "INSERT INTO users (user_name, email, age, street, city, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?)",
                vec![
                    name.into(),
                    format!("{name}@example.com").into(),
                    age.into(),
                    "1 Main St".into(),
                    "Springfield".into(),
                    "2024-05-01T10:00:00Z".into(),
                ],
            )
            .await
            .unwrap();

        res.last_insert_id.unwrap()
    }

    /// Operations executed since setup, or since the last call.
    pub fn take_ops(&self) -> Vec<DriverOp> {
        std::mem::take(&mut *self.ops_log.lock().unwrap())
    }
}
