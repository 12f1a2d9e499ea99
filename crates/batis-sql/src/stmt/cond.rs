use super::Node;

/// `<if test="...">`: starts a conditional run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct If {
    pub test: String,
    pub children: Vec<Node>,
}

/// `<elif test="...">`: only valid after an `<if>` or another `<elif>` in the
/// same sibling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elif {
    pub test: String,
    pub children: Vec<Node>,
}

/// `<else>`: fires when no earlier branch of the run matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Else {
    pub children: Vec<Node>,
}

impl Node {
    pub fn if_(test: impl Into<String>, children: Vec<Node>) -> Node {
        If {
            test: test.into(),
            children,
        }
        .into()
    }

    pub fn elif(test: impl Into<String>, children: Vec<Node>) -> Node {
        Elif {
            test: test.into(),
            children,
        }
        .into()
    }

    pub fn else_(children: Vec<Node>) -> Node {
        Else { children }.into()
    }
}

impl From<If> for Node {
    fn from(value: If) -> Node {
        Node::If(value)
    }
}

impl From<Elif> for Node {
    fn from(value: Elif) -> Node {
        Node::Elif(value)
    }
}

impl From<Else> for Node {
    fn from(value: Else) -> Node {
        Node::Else(value)
    }
}
