//! Turns an evaluated statement into positional SQL plus its parameters.

mod flavor;
pub use flavor::Flavor;

mod params;
pub use params::{Params, Placeholder};

use crate::{
    marker::{self, Sigil},
    Evaluator, Fragments, Statement,
};

use batis_core::{Error, Evaluate, Result, Scope, Value};

/// A statement ready for the driver: SQL in the target dialect and the values
/// for its placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Bound {
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

/// Binds statements against a shared expression engine and fragment
/// registry.
#[derive(Debug, Clone, Copy)]
pub struct Binder<'a> {
    engine: &'a dyn Evaluate,
    fragments: &'a Fragments,
}

impl<'a> Binder<'a> {
    pub fn new(engine: &'a dyn Evaluate, fragments: &'a Fragments) -> Binder<'a> {
        Binder { engine, fragments }
    }

    /// Evaluate `stmt` against `scope` and bind its markers.
    ///
    /// The placeholder style comes from the statement's `type` attribute.
    /// `#{}` markers whose value is a list expand to one placeholder per
    /// element; composite values bind as a single parameter.
    pub fn bind(&self, stmt: &Statement, mut scope: Scope) -> Result<Bound> {
        let flavor = Flavor::from_dialect(stmt.dialect().unwrap_or_default());

        let mut evaluator = Evaluator::new(self.engine, self.fragments);
        let text = evaluator
            .eval(&stmt.children, &mut scope)
            .map_err(|err| err.context(format!("evaluating `{}`", stmt.id)))?;

        let mut params = Vec::<Value>::new();

        let sql = marker::replace(&text, |sigil, expr| {
            let Some(value) = self.engine.evaluate(expr, &scope)? else {
                return Err(Error::undefined_variable(evaluator.original_name(expr)));
            };

            match (sigil, value) {
                (Sigil::Param, Value::List(items)) => {
                    let mut holders = String::new();
                    for (i, item) in items.into_iter().enumerate() {
                        if i > 0 {
                            holders.push_str(", ");
                        }
                        Params::push(&mut params, item).write(flavor, &mut holders);
                    }
                    Ok(holders)
                }
                (Sigil::Param, value) => {
                    let mut holder = String::new();
                    Params::push(&mut params, value).write(flavor, &mut holder);
                    Ok(holder)
                }
                (Sigil::Literal, value) => Ok(value.to_string()),
            }
        })
        .map_err(|err| err.context(format!("binding `{}`", stmt.id)))?;

        Ok(Bound {
            sql: normalize(&sql),
            params,
        })
    }
}

/// Line breaks become spaces, runs of spaces collapse to one, and the ends
/// are trimmed.
pub fn normalize(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut space = false;

    for c in sql.chars() {
        if matches!(c, ' ' | '\n' | '\r' | '\t') {
            space = true;
            continue;
        }
        if space && !out.is_empty() {
            out.push(' ');
        }
        space = false;
        out.push(c);
    }

    out
}
