mod adhoc;
mod driver_operation_failed;
mod duplicate_statement;
mod expression_evaluation_failed;
mod invalid_destination;
mod invalid_format;
mod invalid_mapper;
mod invalid_statement;
mod record_not_found;
mod statement_not_found;
mod template;
mod timed_out;
mod type_conversion;
mod undefined_variable;
mod unsupported_scan_type;

use adhoc::AdhocError;
use driver_operation_failed::DriverOperationFailed;
use duplicate_statement::DuplicateStatement;
use expression_evaluation_failed::ExpressionEvaluationFailed;
use invalid_destination::InvalidDestination;
use invalid_format::InvalidFormat;
use invalid_mapper::InvalidMapper;
use invalid_statement::InvalidStatement;
use record_not_found::RecordNotFound;
use statement_not_found::StatementNotFound;
use std::sync::Arc;
use timed_out::TimedOut;
use type_conversion::TypeConversion;
use undefined_variable::UndefinedVariable;
use unsupported_scan_type::UnsupportedScanType;

pub use invalid_format::Family;
pub use template::TemplateError;

/// Early-return with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Build an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur while loading, binding, executing or scanning a
/// mapped statement.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let kind = match consequent.inner {
            Some(inner) => match Arc::try_unwrap(inner) {
                Ok(inner) => inner.kind,
                // Shared consequents keep their message but lose identity.
                Err(shared) => ErrorKind::Adhoc(AdhocError::new(shared.kind.to_string())),
            },
            None => ErrorKind::Unknown,
        };

        Error {
            inner: Some(Arc::new(ErrorInner {
                kind,
                cause: Some(self),
            })),
        }
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }

    /// Returns the kind of the innermost error in the context chain.
    fn root_kind(&self) -> &ErrorKind {
        self.chain()
            .last()
            .map(Error::kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::DriverOperationFailed(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(&**err),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    DriverOperationFailed(DriverOperationFailed),
    DuplicateStatement(DuplicateStatement),
    ExpressionEvaluationFailed(ExpressionEvaluationFailed),
    InvalidDestination(InvalidDestination),
    InvalidFormat(InvalidFormat),
    InvalidMapper(InvalidMapper),
    InvalidStatement(InvalidStatement),
    RecordNotFound(RecordNotFound),
    StatementNotFound(StatementNotFound),
    Template(TemplateError),
    TimedOut(TimedOut),
    TypeConversion(TypeConversion),
    UndefinedVariable(UndefinedVariable),
    UnsupportedScanType(UnsupportedScanType),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            DriverOperationFailed(err) => core::fmt::Display::fmt(err, f),
            DuplicateStatement(err) => core::fmt::Display::fmt(err, f),
            ExpressionEvaluationFailed(err) => core::fmt::Display::fmt(err, f),
            InvalidDestination(err) => core::fmt::Display::fmt(err, f),
            InvalidFormat(err) => core::fmt::Display::fmt(err, f),
            InvalidMapper(err) => core::fmt::Display::fmt(err, f),
            InvalidStatement(err) => core::fmt::Display::fmt(err, f),
            RecordNotFound(err) => core::fmt::Display::fmt(err, f),
            StatementNotFound(err) => core::fmt::Display::fmt(err, f),
            Template(err) => core::fmt::Display::fmt(err, f),
            TimedOut(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            UndefinedVariable(err) => core::fmt::Display::fmt(err, f),
            UnsupportedScanType(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown batis error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<jiff::Error> for Error {
    fn from(err: jiff::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        // Ensure Error stays at one word (size of pointer/Arc)
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("test error: {}", 42));
        assert_eq!(err.to_string(), "test error: 42");
    }

    #[test]
    fn error_chain_display() {
        let root = Error::from_args(format_args!("root cause"));
        let mid = Error::from_args(format_args!("middle context"));
        let top = Error::from_args(format_args!("top context"));

        let chained = root.context(mid).context(top);
        assert_eq!(
            chained.to_string(),
            "top context: middle context: root cause"
        );
    }

    #[test]
    fn predicates_look_through_context() {
        let err = Error::record_not_found("statement=findById").context(err!("fetch_one"));
        assert!(err.is_record_not_found());
        assert_eq!(err.to_string(), "fetch_one: record not found: statement=findById");
    }

    #[test]
    fn anyhow_bridge() {
        let anyhow_err = anyhow::anyhow!("something failed");
        let our_err: Error = anyhow_err.into();
        assert_eq!(our_err.to_string(), "something failed");
    }

    #[test]
    fn template_errors_are_distinguishable() {
        let err = Error::template(TemplateError::ElifWithoutIf);
        assert_eq!(err.template_error(), Some(&TemplateError::ElifWithoutIf));
        assert_eq!(err.to_string(), "elif must follow an if statement");

        let err = Error::template(TemplateError::RefIdNotFound("columns".into()));
        assert_eq!(
            err.to_string(),
            "sql fragment with id `columns` not found"
        );
    }

    #[test]
    fn invalid_format_names_family() {
        let err = Error::invalid_format(Family::Circle, "missing `>`");
        assert_eq!(err.invalid_format_family(), Some(Family::Circle));
        assert_eq!(err.to_string(), "invalid circle value: missing `>`");
        assert!(!err.is_record_not_found());
    }

    #[test]
    fn undefined_variable_message() {
        let err = Error::undefined_variable("user.name");
        assert!(err.is_undefined_variable());
        assert_eq!(err.to_string(), "undefined variable: user.name");
    }
}
