use super::Node;

/// `<foreach collection="..." item="..." index="..." separator="...">`.
///
/// `collection` and `item` are required, but a missing one is only reported
/// when the loop is evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Foreach {
    /// Expression producing the list or map to iterate.
    pub collection: Option<String>,

    /// Name the current element is bound to.
    pub item: Option<String>,

    /// Name the current position (or map key) is bound to.
    pub index: Option<String>,

    /// Text placed between iterations. Empty means direct concatenation.
    pub separator: String,

    pub children: Vec<Node>,
}

impl Foreach {
    pub fn new(collection: impl Into<String>, item: impl Into<String>) -> Foreach {
        Foreach {
            collection: Some(collection.into()),
            item: Some(item.into()),
            ..Foreach::default()
        }
    }

    pub fn index(mut self, index: impl Into<String>) -> Foreach {
        self.index = Some(index.into());
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Foreach {
        self.separator = separator.into();
        self
    }

    pub fn children(mut self, children: Vec<Node>) -> Foreach {
        self.children = children;
        self
    }
}

impl From<Foreach> for Node {
    fn from(value: Foreach) -> Node {
        Node::Foreach(value)
    }
}
