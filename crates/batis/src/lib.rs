//! Statements written as mapper markup, bound against runtime arguments and
//! scanned into Rust values.
//!
//! ```ignore
//! #[derive(Debug, Default, batis::Record)]
//! struct User {
//!     id: i64,
//!     #[column("user_name")]
//!     name: String,
//! }
//!
//! let db = batis::Db::builder()
//!     .mapper_file("mappers/user.xml")
//!     .connect(driver)
//!     .await?;
//!
//! let user: User = db
//!     .mapper("findUser")?
//!     .bind(batis::args! { "id" => 1 })
//!     .fetch_one()
//!     .await?;
//! ```

pub mod db;
pub use db::Db;

mod mapper;
pub use mapper::{Mapper, Query};

mod registry;
use registry::Registry;

pub mod scan;
pub use scan::{FromRow, Record};

pub use batis_core::{
    args, driver::ExecResult, Error, Evaluate, FromValue, Result, Scope, Value,
};
pub use batis_macros::Record;
pub use batis_sql::{Bound, MapperFile, StatementKind};

#[doc(hidden)]
pub mod codegen_support {
    pub use crate::scan::{
        record_from_row, record_plan, FromRow, Plan, Record, RecordTable,
    };
    pub use batis_core::{driver::Column, Error, FromValue, Result, Value};
}
