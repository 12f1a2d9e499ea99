use super::Error;

/// Structural errors raised while evaluating a statement template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// `<elif>` with no preceding `<if>` among its siblings.
    ElifWithoutIf,
    /// `<else>` with no preceding `<if>` among its siblings.
    ElseWithoutIf,
    /// `<when>` outside of a `<choose>`.
    WhenWithoutChoose,
    /// `<otherwise>` outside of a `<choose>`.
    OtherwiseWithoutChoose,
    ForeachNeedsCollection,
    ForeachNeedsItem,
    /// The `<foreach>` collection evaluated to something that is neither a
    /// list nor a map.
    NotArrayOrMap(String),
    IncludeNeedsRefId,
    RefIdNotFound(String),
    ElementNotSupported(String),
}

impl std::error::Error for TemplateError {}

impl core::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use TemplateError::*;

        match self {
            ElifWithoutIf => f.write_str("elif must follow an if statement"),
            ElseWithoutIf => f.write_str("else must follow an if statement"),
            WhenWithoutChoose => f.write_str("when must be inside a choose statement"),
            OtherwiseWithoutChoose => f.write_str("otherwise must be inside a choose statement"),
            ForeachNeedsCollection => f.write_str("foreach requires a `collection` attribute"),
            ForeachNeedsItem => f.write_str("foreach requires an `item` attribute"),
            NotArrayOrMap(expr) => {
                write!(f, "foreach collection `{expr}` is not an array or map")
            }
            IncludeNeedsRefId => f.write_str("include requires a `refid` attribute"),
            RefIdNotFound(id) => write!(f, "sql fragment with id `{id}` not found"),
            ElementNotSupported(name) => write!(f, "element `{name}` is not supported"),
        }
    }
}

impl Error {
    /// Creates a template structure error.
    pub fn template(err: TemplateError) -> Error {
        Error::from(super::ErrorKind::Template(err))
    }

    /// Returns the template error if this is one.
    pub fn template_error(&self) -> Option<&TemplateError> {
        match self.root_kind() {
            super::ErrorKind::Template(err) => Some(err),
            _ => None,
        }
    }
}
