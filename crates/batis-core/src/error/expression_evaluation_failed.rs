use super::Error;

/// Error when a template expression cannot be parsed or evaluated.
///
/// Examples: a syntax error in a `test` attribute, comparing a string with a
/// number, indexing past the end of a list.
#[derive(Debug)]
pub(super) struct ExpressionEvaluationFailed {
    expr: Box<str>,
    message: Box<str>,
}

impl std::error::Error for ExpressionEvaluationFailed {}

impl core::fmt::Display for ExpressionEvaluationFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "failed to evaluate `{}`: {}",
            self.expr, self.message
        )
    }
}

impl Error {
    /// Creates an expression evaluation error.
    pub fn expression_evaluation_failed(
        expr: impl Into<String>,
        message: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::ExpressionEvaluationFailed(
            ExpressionEvaluationFailed {
                expr: expr.into().into(),
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an expression evaluation error.
    pub fn is_expression_evaluation_failed(&self) -> bool {
        matches!(
            self.root_kind(),
            super::ErrorKind::ExpressionEvaluationFailed(_)
        )
    }
}
