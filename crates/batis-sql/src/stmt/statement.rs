use super::Node;

use indexmap::IndexMap;
use std::fmt;

/// Attribute naming the backend a statement is written for.
pub const TYPE_ATTR: &str = "type";

/// A top-level `select`, `insert`, `update` or `delete` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub id: String,

    pub kind: StatementKind,

    /// Element attributes, values trimmed. Includes `id`.
    pub attrs: IndexMap<String, String>,

    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl Statement {
    pub fn new(kind: StatementKind, id: impl Into<String>, children: Vec<Node>) -> Statement {
        let id = id.into();
        let mut attrs = IndexMap::new();
        attrs.insert("id".to_string(), id.clone());

        Statement {
            id,
            kind,
            attrs,
            children,
        }
    }

    pub fn select(id: impl Into<String>, children: Vec<Node>) -> Statement {
        Statement::new(StatementKind::Select, id, children)
    }

    pub fn insert(id: impl Into<String>, children: Vec<Node>) -> Statement {
        Statement::new(StatementKind::Insert, id, children)
    }

    pub fn update(id: impl Into<String>, children: Vec<Node>) -> Statement {
        Statement::new(StatementKind::Update, id, children)
    }

    pub fn delete(id: impl Into<String>, children: Vec<Node>) -> Statement {
        Statement::new(StatementKind::Delete, id, children)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// The backend type this statement binds for, if any.
    pub fn dialect(&self) -> Option<&str> {
        self.attr(TYPE_ATTR).filter(|t| !t.trim().is_empty())
    }

    pub fn with_dialect(mut self, dialect: impl Into<String>) -> Statement {
        self.attrs.insert(TYPE_ATTR.to_string(), dialect.into());
        self
    }

    /// Use `dialect` unless the statement names its own.
    pub fn inherit_dialect(&mut self, dialect: &str) {
        if self.dialect().is_none() {
            self.attrs.insert(TYPE_ATTR.to_string(), dialect.to_string());
        }
    }

    pub fn is_select(&self) -> bool {
        self.kind == StatementKind::Select
    }
}

impl StatementKind {
    pub fn from_element(name: &str) -> Option<StatementKind> {
        match name {
            "select" => Some(StatementKind::Select),
            "insert" => Some(StatementKind::Insert),
            "update" => Some(StatementKind::Update),
            "delete" => Some(StatementKind::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        }
    }

    pub fn is_write(self) -> bool {
        !matches!(self, StatementKind::Select)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
