use super::Error;

/// Error when dispatch is asked for a statement id no mapper declared.
#[derive(Debug)]
pub(super) struct StatementNotFound {
    id: Box<str>,
}

impl std::error::Error for StatementNotFound {}

impl core::fmt::Display for StatementNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "statement `{}` not found", self.id)
    }
}

impl Error {
    /// Creates a statement not found error.
    pub fn statement_not_found(id: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::StatementNotFound(StatementNotFound {
            id: id.into().into(),
        }))
    }

    /// Returns `true` if this error is a statement not found error.
    pub fn is_statement_not_found(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::StatementNotFound(_))
    }
}
