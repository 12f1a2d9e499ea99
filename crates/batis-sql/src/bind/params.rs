use super::Flavor;

use batis_core::Value;

pub trait Params {
    fn push(&mut self, param: Value) -> Placeholder;
}

/// One-based position of a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(pub usize);

impl Params for Vec<Value> {
    fn push(&mut self, value: Value) -> Placeholder {
        Vec::push(self, value);
        Placeholder(self.len())
    }
}

impl Placeholder {
    pub fn write(self, flavor: Flavor, dst: &mut String) {
        use std::fmt::Write;

        let _ = match flavor {
            Flavor::Postgresql => write!(dst, "${}", self.0),
            Flavor::SqlServer => write!(dst, "@p{}", self.0),
            Flavor::Oracle => write!(dst, ":{}", self.0),
            Flavor::Question => write!(dst, "?"),
        };
    }
}
