//! The parsed form of a mapped statement: a tree of directive nodes.

mod choose;
pub use choose::{Choose, Otherwise, When};

mod cond;
pub use cond::{Elif, Else, If};

mod foreach;
pub use foreach::Foreach;

mod include;
pub use include::Include;

mod sql_fragment;
pub use sql_fragment::SqlFragment;

mod statement;
pub use statement::{Statement, StatementKind, TYPE_ATTR};

mod trim;
pub use trim::{Trim, Where};

/// One node of a statement body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Raw SQL text, possibly containing `#{}` and `${}` markers.
    Text(String),
    If(If),
    Elif(Elif),
    Else(Else),
    Choose(Choose),
    When(When),
    Otherwise(Otherwise),
    Foreach(Foreach),
    Trim(Trim),
    Where(Where),
    Include(Include),
    Sql(SqlFragment),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Node {
        Node::Text(text.into())
    }

    /// The markup element name this node was read from.
    pub fn element_name(&self) -> &'static str {
        match self {
            Node::Text(_) => "#text",
            Node::If(_) => "if",
            Node::Elif(_) => "elif",
            Node::Else(_) => "else",
            Node::Choose(_) => "choose",
            Node::When(_) => "when",
            Node::Otherwise(_) => "otherwise",
            Node::Foreach(_) => "foreach",
            Node::Trim(_) => "trim",
            Node::Where(_) => "where",
            Node::Include(_) => "include",
            Node::Sql(_) => "sql",
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Node {
        Node::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Node {
        Node::Text(value)
    }
}
