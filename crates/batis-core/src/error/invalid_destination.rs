use super::Error;

/// Error when a dynamic scan destination has a shape rows cannot be written
/// into.
#[derive(Debug)]
pub(super) struct InvalidDestination {
    message: Box<str>,
}

impl std::error::Error for InvalidDestination {}

impl core::fmt::Display for InvalidDestination {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid scan destination: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid destination error.
    pub fn invalid_destination(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidDestination(InvalidDestination {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid destination error.
    pub fn is_invalid_destination(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::InvalidDestination(_))
    }
}
