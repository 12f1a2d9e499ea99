use super::Error;

/// Error when rows are scanned into a type that cannot hold a row.
#[derive(Debug)]
pub(super) struct UnsupportedScanType {
    type_name: &'static str,
}

impl std::error::Error for UnsupportedScanType {}

impl core::fmt::Display for UnsupportedScanType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot scan rows into `{}`", self.type_name)
    }
}

impl Error {
    /// Creates an unsupported scan type error.
    pub fn unsupported_scan_type(type_name: &'static str) -> Error {
        Error::from(super::ErrorKind::UnsupportedScanType(UnsupportedScanType {
            type_name,
        }))
    }

    /// Returns `true` if this error is an unsupported scan type error.
    pub fn is_unsupported_scan_type(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::UnsupportedScanType(_))
    }
}
