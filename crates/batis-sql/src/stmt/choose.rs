use super::Node;

/// `<choose>`: the first matching `<when>` child wins, `<otherwise>` fires
/// when none did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choose {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct When {
    pub test: String,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Otherwise {
    pub children: Vec<Node>,
}

impl Node {
    pub fn choose(children: Vec<Node>) -> Node {
        Choose { children }.into()
    }

    pub fn when(test: impl Into<String>, children: Vec<Node>) -> Node {
        When {
            test: test.into(),
            children,
        }
        .into()
    }

    pub fn otherwise(children: Vec<Node>) -> Node {
        Otherwise { children }.into()
    }
}

impl From<Choose> for Node {
    fn from(value: Choose) -> Node {
        Node::Choose(value)
    }
}

impl From<When> for Node {
    fn from(value: When) -> Node {
        Node::When(value)
    }
}

impl From<Otherwise> for Node {
    fn from(value: Otherwise) -> Node {
        Node::Otherwise(value)
    }
}
