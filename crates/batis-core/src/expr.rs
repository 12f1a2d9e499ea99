//! The expression language used by `test` attributes, `foreach` collections
//! and `#{}` / `${}` markers.

mod eval;
mod lexer;
mod parser;

use crate::{Result, Scope, Value};

use lexer::{tokenize, Token};
use parser::Expr;
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, PoisonError, RwLock},
};

/// Contract between the template machinery and an expression engine.
pub trait Evaluate: Debug + Send + Sync + 'static {
    /// Evaluate `expr` against `scope`.
    ///
    /// Returns `Ok(None)` when the expression names something that is not
    /// bound. That is distinct from a bound null, which is `Some(Value::Null)`.
    fn evaluate(&self, expr: &str, scope: &Scope) -> Result<Option<Value>>;

    /// Evaluate `expr` as a condition. Anything other than `true` is false.
    fn evaluate_bool(&self, expr: &str, scope: &Scope) -> Result<bool> {
        Ok(matches!(self.evaluate(expr, scope)?, Some(Value::Bool(true))))
    }

    /// Rewrite every root reference to the variable `from` in `expr` so it
    /// refers to the expression `to` instead. Field names, string literals
    /// and function names are left alone.
    fn rename_root(&self, expr: &str, from: &str, to: &str) -> Result<String>;
}

/// The default expression engine. Parsed expressions are cached by source
/// text.
#[derive(Debug, Default)]
pub struct Engine {
    cache: RwLock<HashMap<String, Arc<Expr>>>,
}

impl Engine {
    pub fn new() -> Engine {
        Engine::default()
    }

    fn compile(&self, src: &str) -> Result<Arc<Expr>> {
        if let Some(expr) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(src)
        {
            return Ok(expr.clone());
        }

        let expr = Arc::new(parser::parse(src)?);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(src.to_string(), expr.clone());
        Ok(expr)
    }
}

impl Evaluate for Engine {
    fn evaluate(&self, expr: &str, scope: &Scope) -> Result<Option<Value>> {
        let compiled = self.compile(expr.trim())?;
        eval::Eval { src: expr, scope }.eval(&compiled)
    }

    fn rename_root(&self, expr: &str, from: &str, to: &str) -> Result<String> {
        let tokens = tokenize(expr)?;
        let mut out = String::with_capacity(expr.len() + to.len());
        let mut last = 0;

        for (i, tok) in tokens.iter().enumerate() {
            let Token::Ident(ident) = &tok.token else {
                continue;
            };

            if ident != from || parser::is_keyword(ident) {
                continue;
            }

            let after_dot = i > 0 && tokens[i - 1].token == Token::Dot;
            let is_call = tokens.get(i + 1).map(|t| &t.token) == Some(&Token::LParen);

            if after_dot || is_call {
                continue;
            }

            out.push_str(&expr[last..tok.start]);
            out.push_str(to);
            last = tok.end;
        }

        out.push_str(&expr[last..]);
        Ok(out)
    }
}
