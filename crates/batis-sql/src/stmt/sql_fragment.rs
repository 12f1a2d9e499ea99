use super::Node;

/// `<sql id="...">`: a reusable piece of raw SQL. Evaluating it registers the
/// text and produces no output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFragment {
    pub id: String,
    pub text: String,
}

impl SqlFragment {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> SqlFragment {
        SqlFragment {
            id: id.into(),
            text: text.into(),
        }
    }
}

impl From<SqlFragment> for Node {
    fn from(value: SqlFragment) -> Node {
        Node::Sql(value)
    }
}
