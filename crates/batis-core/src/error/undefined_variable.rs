use super::Error;

/// Error when a `#{}` or `${}` marker refers to a name absent from scope.
#[derive(Debug)]
pub(super) struct UndefinedVariable {
    name: Box<str>,
}

impl std::error::Error for UndefinedVariable {}

impl core::fmt::Display for UndefinedVariable {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "undefined variable: {}", self.name)
    }
}

impl Error {
    /// Creates an undefined variable error.
    pub fn undefined_variable(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UndefinedVariable(UndefinedVariable {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is an undefined variable error.
    pub fn is_undefined_variable(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::UndefinedVariable(_))
    }
}
