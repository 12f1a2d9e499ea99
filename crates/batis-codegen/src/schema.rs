mod column;
pub(crate) use column::Column;

mod error;
pub(crate) use error::ErrorSet;

mod field;
pub(crate) use field::{Field, FieldTy};

mod record;
pub(crate) use record::Record;
