use super::Error;

/// Error when a mapper document cannot be loaded.
///
/// This occurs when:
/// - The document is not well-formed XML
/// - The root element is not `<mapper>`
/// - A statement element is missing its `id`
/// - An element appears that the template language does not know
#[derive(Debug)]
pub(super) struct InvalidMapper {
    message: Box<str>,
}

impl std::error::Error for InvalidMapper {}

impl core::fmt::Display for InvalidMapper {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid mapper: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid mapper error.
    pub fn invalid_mapper(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidMapper(InvalidMapper {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid mapper error.
    pub fn is_invalid_mapper(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::InvalidMapper(_))
    }
}
