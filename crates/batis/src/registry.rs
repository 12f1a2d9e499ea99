use batis_core::{Error, Result};
use batis_sql::{Statement, StatementKind};

use indexmap::IndexMap;

/// Loaded statements, one namespace per statement kind.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    select: IndexMap<String, Statement>,
    insert: IndexMap<String, Statement>,
    update: IndexMap<String, Statement>,
    delete: IndexMap<String, Statement>,
}

impl Registry {
    /// Register `stmt`. Reusing an id within the same kind is an error.
    pub(crate) fn insert(&mut self, stmt: Statement) -> Result<()> {
        let statements = self.kind_mut(stmt.kind);

        if statements.contains_key(&stmt.id) {
            return Err(Error::duplicate_statement(&stmt.id));
        }

        log::trace!("registered {} statement `{}`", stmt.kind, stmt.id);
        statements.insert(stmt.id.clone(), stmt);
        Ok(())
    }

    /// Find `id`, trying selects first, then inserts, updates and deletes.
    pub(crate) fn get(&self, id: &str) -> Result<&Statement> {
        [&self.select, &self.insert, &self.update, &self.delete]
            .into_iter()
            .find_map(|statements| statements.get(id))
            .ok_or_else(|| Error::statement_not_found(id))
    }

    pub(crate) fn len(&self) -> usize {
        self.select.len() + self.insert.len() + self.update.len() + self.delete.len()
    }

    fn kind_mut(&mut self, kind: StatementKind) -> &mut IndexMap<String, Statement> {
        match kind {
            StatementKind::Select => &mut self.select,
            StatementKind::Insert => &mut self.insert,
            StatementKind::Update => &mut self.update,
            StatementKind::Delete => &mut self.delete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batis_sql::Node;

    #[test]
    fn ids_are_unique_per_kind() {
        let mut registry = Registry::default();
        registry
            .insert(Statement::select("user", vec![Node::text("SELECT 1")]))
            .unwrap();
        registry
            .insert(Statement::delete("user", vec![Node::text("DELETE")]))
            .unwrap();

        let err = registry
            .insert(Statement::select("user", vec![]))
            .unwrap_err();
        assert!(err.is_duplicate_statement());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn selects_are_found_first() {
        let mut registry = Registry::default();
        registry.insert(Statement::delete("user", vec![])).unwrap();
        registry.insert(Statement::update("user", vec![])).unwrap();
        assert_eq!(registry.get("user").unwrap().kind, StatementKind::Update);

        registry.insert(Statement::select("user", vec![])).unwrap();
        assert_eq!(registry.get("user").unwrap().kind, StatementKind::Select);

        assert!(registry.get("nope").unwrap_err().is_statement_not_found());
    }
}
