use super::Error;
use std::time::Duration;

/// Error when a statement or transaction exceeds its configured timeout.
#[derive(Debug)]
pub(super) struct TimedOut {
    duration: Duration,
}

impl std::error::Error for TimedOut {}

impl core::fmt::Display for TimedOut {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "timed out after {:?}", self.duration)
    }
}

impl Error {
    /// Creates a timeout error.
    pub fn timed_out(duration: Duration) -> Error {
        Error::from(super::ErrorKind::TimedOut(TimedOut { duration }))
    }

    /// Returns `true` if this error is a timeout.
    pub fn is_timed_out(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::TimedOut(_))
    }
}
