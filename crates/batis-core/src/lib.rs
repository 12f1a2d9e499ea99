pub mod convert;
pub use convert::FromValue;

pub mod driver;
pub use driver::Connection;

mod error;
pub use error::{Error, Family, TemplateError};

pub mod expr;
pub use expr::Evaluate;

pub mod pg;

mod scope;
pub use scope::Scope;

mod value;
pub use value::{Composite, Value};

/// A Result type alias that uses Batis's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
