pub mod bind;
pub use bind::{Binder, Bound, Flavor, Params, Placeholder};

pub mod eval;
pub use eval::Evaluator;

mod fragments;
pub use fragments::Fragments;

mod marker;

pub mod mapper;
pub use mapper::MapperFile;

pub mod stmt;
pub use stmt::{Node, Statement, StatementKind};
