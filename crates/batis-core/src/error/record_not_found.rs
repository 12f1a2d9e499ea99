use super::Error;

/// Error when a single-record fetch returns no rows.
#[derive(Debug)]
pub(super) struct RecordNotFound {
    context: Option<Box<str>>,
}

impl std::error::Error for RecordNotFound {}

impl core::fmt::Display for RecordNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("record not found")?;
        if let Some(ref ctx) = self.context {
            write!(f, ": {}", ctx)?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates a record not found error with some context about the lookup.
    pub fn record_not_found(context: impl Into<String>) -> Error {
        let context = context.into();
        Error::from(super::ErrorKind::RecordNotFound(RecordNotFound {
            context: (!context.is_empty()).then(|| context.into()),
        }))
    }

    /// Returns `true` if this error is a record not found error.
    pub fn is_record_not_found(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::RecordNotFound(_))
    }
}
