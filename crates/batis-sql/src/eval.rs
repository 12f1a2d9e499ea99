//! Walks a statement tree against a scope and produces SQL text that still
//! contains `#{}` / `${}` markers.

use crate::{
    marker,
    stmt::{Foreach, Include, Node, Trim, Where},
    Fragments,
};

use batis_core::{Error, Evaluate, Result, Scope, TemplateError, Value};

/// Tree-walking template evaluator.
///
/// The scope is mutated while loops run: the loop's `item` and `index` names
/// are bound for each iteration and restored afterwards. Index values are
/// additionally stored under a fresh synthetic key that stays in the scope,
/// and markers produced inside the loop are rewritten to refer to it (and to
/// `collection[i]` for the item), so the binder resolves them after the loop
/// variables are gone.
#[derive(Debug)]
pub struct Evaluator<'a> {
    engine: &'a dyn Evaluate,
    fragments: &'a Fragments,

    /// Rewritten loop references and the names they replaced, used to make
    /// error messages refer to what the author wrote.
    aliases: Vec<(String, String)>,
}

/// Tracks the `if`/`elif`/`else` and `choose`/`when`/`otherwise` runs among
/// one list of siblings.
#[derive(Debug, Default)]
struct Run {
    if_seen: bool,
    if_matched: bool,
    when_seen: bool,
    when_matched: bool,
}

impl<'a> Evaluator<'a> {
    pub fn new(engine: &'a dyn Evaluate, fragments: &'a Fragments) -> Evaluator<'a> {
        Evaluator {
            engine,
            fragments,
            aliases: Vec::new(),
        }
    }

    /// Evaluate `nodes` in order and return the produced text.
    pub fn eval(&mut self, nodes: &[Node], scope: &mut Scope) -> Result<String> {
        self.eval_nodes(nodes, scope, false)
    }

    /// Replace rewritten loop references in `expr` with the names the
    /// statement author used.
    pub fn original_name(&self, expr: &str) -> String {
        let mut out = expr.to_string();
        for (rewritten, original) in self.aliases.iter().rev() {
            out = replace_root(&out, rewritten, original);
        }
        out
    }

    fn eval_nodes(&mut self, nodes: &[Node], scope: &mut Scope, in_choose: bool) -> Result<String> {
        let mut out = String::with_capacity(128);
        let mut run = Run::default();

        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::If(node) => {
                    run.if_seen = true;
                    run.if_matched = self.test(&node.test, scope)?;
                    if run.if_matched {
                        self.padded(&node.children, scope, &mut out)?;
                    }
                }
                Node::Elif(node) => {
                    if !run.if_seen {
                        return Err(Error::template(TemplateError::ElifWithoutIf));
                    }
                    if run.if_matched {
                        continue;
                    }
                    run.if_matched = self.test(&node.test, scope)?;
                    if run.if_matched {
                        self.padded(&node.children, scope, &mut out)?;
                    }
                }
                Node::Else(node) => {
                    if !run.if_seen {
                        return Err(Error::template(TemplateError::ElseWithoutIf));
                    }
                    if run.if_matched {
                        continue;
                    }
                    self.padded(&node.children, scope, &mut out)?;
                }
                Node::Choose(node) => {
                    let inner = self.eval_nodes(&node.children, scope, true)?;
                    push_padded(&mut out, &inner);
                }
                Node::When(node) => {
                    if !in_choose {
                        return Err(Error::template(TemplateError::WhenWithoutChoose));
                    }
                    run.when_seen = true;
                    if run.when_matched {
                        continue;
                    }
                    run.when_matched = self.test(&node.test, scope)?;
                    if run.when_matched {
                        self.padded(&node.children, scope, &mut out)?;
                    }
                }
                Node::Otherwise(node) => {
                    if !in_choose || !run.when_seen {
                        return Err(Error::template(TemplateError::OtherwiseWithoutChoose));
                    }
                    if run.when_matched {
                        continue;
                    }
                    self.padded(&node.children, scope, &mut out)?;
                }
                Node::Foreach(node) => self.foreach(node, scope, &mut out)?,
                Node::Trim(node) => self.trim(node, scope, &mut out)?,
                Node::Where(node) => self.where_clause(node, scope, &mut out)?,
                Node::Include(node) => self.include(node, &mut out)?,
                Node::Sql(node) => {
                    self.fragments.insert(&node.id, &node.text);
                }
            }
        }

        Ok(out)
    }

    /// A blank test never matches.
    fn test(&self, test: &str, scope: &Scope) -> Result<bool> {
        if test.trim().is_empty() {
            return Ok(false);
        }
        self.engine.evaluate_bool(test, scope)
    }

    fn padded(&mut self, children: &[Node], scope: &mut Scope, out: &mut String) -> Result<()> {
        let inner = self.eval_nodes(children, scope, false)?;
        push_padded(out, &inner);
        Ok(())
    }

    fn foreach(&mut self, node: &Foreach, scope: &mut Scope, out: &mut String) -> Result<()> {
        let Some(collection) = node.collection.as_deref().map(str::trim).filter(|s| !s.is_empty())
        else {
            return Err(Error::template(TemplateError::ForeachNeedsCollection));
        };
        let Some(item) = node.item.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return Err(Error::template(TemplateError::ForeachNeedsItem));
        };
        let index = node.index.as_deref().map(str::trim).filter(|s| !s.is_empty());

        // Elements are addressed through the collection expression so the
        // engine's own indexing rules apply.
        let base = if is_path(collection) {
            collection.to_string()
        } else {
            format!("({collection})")
        };

        let positions: Vec<(String, Value)> = match self.engine.evaluate(collection, scope)? {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::List(items)) => (0..items.len())
                .map(|i| (format!("{base}[{i}]"), Value::I64(i as i64)))
                .collect(),
            Some(Value::Map(map)) => map
                .keys()
                .map(|key| (format!("{base}[{}]", quote(key)), Value::from(key.as_str())))
                .collect(),
            Some(_) => {
                return Err(Error::template(TemplateError::NotArrayOrMap(
                    collection.to_string(),
                )))
            }
        };

        if positions.is_empty() {
            return Ok(());
        }

        let mut texts = Vec::with_capacity(positions.len());

        for (item_expr, position) in positions {
            let value = self
                .engine
                .evaluate(&item_expr, scope)?
                .unwrap_or(Value::Null);

            let saved_item = scope.insert(item, value);
            let mut saved_index = None;
            let mut index_key = None;

            if let Some(index) = index {
                let key = synthetic_key();
                scope.insert(key.clone(), position.clone());
                saved_index = Some(scope.insert(index, position));
                index_key = Some(key);
            }

            let evaluated = self.eval_nodes(&node.children, scope, false);

            scope.restore(item, saved_item);
            if let (Some(index), Some(saved)) = (index, saved_index) {
                scope.restore(index, saved);
            }

            let mut index_renamed = false;
            let mut item_renamed = false;

            let text = marker::replace(&evaluated?, |sigil, expr| {
                let mut expr = expr.to_string();
                if let (Some(index), Some(key)) = (index, &index_key) {
                    let renamed = self.engine.rename_root(&expr, index, key)?;
                    index_renamed |= renamed != expr;
                    expr = renamed;
                }
                let renamed = self.engine.rename_root(&expr, item, &item_expr)?;
                item_renamed |= renamed != expr;
                Ok(format!("{}{{{renamed}}}", sigil.as_char()))
            })?;

            // Only references this iteration produced are mapped back.
            if let (Some(index), Some(key), true) = (index, index_key, index_renamed) {
                self.aliases.push((key, index.to_string()));
            }
            if item_renamed {
                self.aliases.push((item_expr, item.to_string()));
            }
            texts.push(text);
        }

        push_padded(out, &texts.join(&node.separator));
        Ok(())
    }

    fn trim(&mut self, node: &Trim, scope: &mut Scope, out: &mut String) -> Result<()> {
        let inner = self.eval_nodes(&node.children, scope, false)?;
        let mut inner = inner.trim();

        for prefix in &node.prefix_overrides {
            if starts_with_ignore_case(inner, prefix) {
                inner = &inner[prefix.len()..];
            }
        }

        if !node.prefix.is_empty() {
            out.push_str(&node.prefix);
            out.push(' ');
        }
        push_padded(out, inner);
        Ok(())
    }

    fn where_clause(&mut self, node: &Where, scope: &mut Scope, out: &mut String) -> Result<()> {
        let inner = self.eval_nodes(&node.children, scope, false)?;
        let mut inner = inner.trim();

        for keyword in ["and", "or"] {
            if starts_with_keyword(inner, keyword) {
                inner = inner[keyword.len()..].trim_start();
                break;
            }
        }

        if !inner.is_empty() {
            out.push_str(" WHERE ");
            out.push_str(inner);
            out.push(' ');
        }
        Ok(())
    }

    fn include(&mut self, node: &Include, out: &mut String) -> Result<()> {
        if node.refid.is_empty() {
            return Err(Error::template(TemplateError::IncludeNeedsRefId));
        }

        let Some(mut text) = self.fragments.get(&node.refid) else {
            return Err(Error::template(TemplateError::RefIdNotFound(
                node.refid.clone(),
            )));
        };

        if !node.alias.is_empty() {
            text = text.replace(&format!("${{{}}}", node.alias), &node.value);
        }

        push_padded(out, &text);
        Ok(())
    }
}

fn push_padded(out: &mut String, inner: &str) {
    out.push(' ');
    out.push_str(inner);
    out.push(' ');
}

/// Replace occurrences of `from` that start an expression path: not preceded
/// by an identifier character or `.`, and not followed by an identifier
/// character.
fn replace_root(src: &str, from: &str, to: &str) -> String {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';

    let mut out = String::with_capacity(src.len());
    let mut last = 0;

    for (pos, _) in src.match_indices(from) {
        let before = src[..pos].chars().next_back();
        let after = src[pos + from.len()..].chars().next();

        if before.is_some_and(|c| is_ident(c) || c == '.') || after.is_some_and(is_ident) {
            continue;
        }

        out.push_str(&src[last..pos]);
        out.push_str(to);
        last = pos + from.len();
    }

    out.push_str(&src[last..]);
    out
}

fn synthetic_key() -> String {
    format!("_{}", uuid::Uuid::new_v4().simple())
}

/// Identifiers, field access and indexing, which can be indexed again
/// without parentheses.
fn is_path(expr: &str) -> bool {
    expr.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '[' | ']' | '"'))
}

fn quote(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    out.push('"');
    for c in key.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// `and`/`or` followed by whitespace, `(` or the end of the text.
fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    starts_with_ignore_case(text, keyword)
        && text[keyword.len()..]
            .chars()
            .next()
            .map_or(true, |c| c.is_whitespace() || c == '(')
}
