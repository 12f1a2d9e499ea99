use super::Error;

/// Error when a value cannot be converted to the expected type.
#[derive(Debug)]
pub(super) struct TypeConversion {
    from: Box<str>,
    to_type: &'static str,
}

impl std::error::Error for TypeConversion {}

impl core::fmt::Display for TypeConversion {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot convert {} to {}", self.from, self.to_type)
    }
}

impl Error {
    /// Creates a type conversion error. `from` describes the source value.
    pub fn type_conversion(from: impl Into<String>, to_type: &'static str) -> Error {
        Error::from(super::ErrorKind::TypeConversion(TypeConversion {
            from: from.into().into(),
            to_type,
        }))
    }

    /// Returns `true` if this error is a type conversion error.
    pub fn is_type_conversion(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::TypeConversion(_))
    }
}
