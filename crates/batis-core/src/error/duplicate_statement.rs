use super::Error;

/// Error when two mapper documents declare a statement with the same id.
#[derive(Debug)]
pub(super) struct DuplicateStatement {
    id: Box<str>,
}

impl std::error::Error for DuplicateStatement {}

impl core::fmt::Display for DuplicateStatement {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "statement `{}` redeclared", self.id)
    }
}

impl Error {
    /// Creates a duplicate statement error.
    pub fn duplicate_statement(id: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateStatement(DuplicateStatement {
            id: id.into().into(),
        }))
    }

    /// Returns `true` if this error is a duplicate statement error.
    pub fn is_duplicate_statement(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::DuplicateStatement(_))
    }
}
