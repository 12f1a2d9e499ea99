use super::Node;

/// `<trim prefix="..." prefixOverrides="a|b">`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trim {
    /// Written before the trimmed body when non-empty.
    pub prefix: String,

    /// Leading tokens stripped from the body, compared case-insensitively.
    pub prefix_overrides: Vec<String>,

    pub children: Vec<Node>,
}

impl Trim {
    /// Parse a `|`-separated override list. Entries are trimmed and
    /// lowercased; blank entries are dropped.
    pub fn parse_overrides(src: &str) -> Vec<String> {
        src.split('|')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// `<where>`: emits `WHERE` followed by its body, minus a leading `AND` or
/// `OR`, but only when the body is not blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Where {
    pub children: Vec<Node>,
}

impl Node {
    pub fn where_(children: Vec<Node>) -> Node {
        Where { children }.into()
    }

    pub fn trim(prefix: impl Into<String>, prefix_overrides: &str, children: Vec<Node>) -> Node {
        Trim {
            prefix: prefix.into(),
            prefix_overrides: Trim::parse_overrides(prefix_overrides),
            children,
        }
        .into()
    }
}

impl From<Trim> for Node {
    fn from(value: Trim) -> Node {
        Node::Trim(value)
    }
}

impl From<Where> for Node {
    fn from(value: Where) -> Node {
        Node::Where(value)
    }
}
