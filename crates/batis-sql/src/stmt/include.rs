use super::Node;

/// `<include refid="..." alias="..." value="...">`: splices a registered SQL
/// fragment, replacing `${alias}` in it with `value`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Include {
    pub refid: String,
    pub alias: String,
    pub value: String,
}

impl Node {
    pub fn include(refid: impl Into<String>) -> Node {
        Include {
            refid: refid.into(),
            ..Include::default()
        }
        .into()
    }
}

impl From<Include> for Node {
    fn from(value: Include) -> Node {
        Node::Include(value)
    }
}
