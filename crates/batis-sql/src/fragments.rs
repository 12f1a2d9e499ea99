use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

/// Registry of reusable SQL fragments keyed by id.
///
/// Filled from `<sql>` elements when mappers load, and again whenever a
/// nested `<sql>` node is evaluated. Clones share the same storage, so it is
/// safe to register and read from concurrent evaluations.
#[derive(Debug, Clone, Default)]
pub struct Fragments {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl Fragments {
    pub fn new() -> Fragments {
        Fragments::default()
    }

    /// Register `text` under `id`, returning the text it replaced.
    pub fn insert(&self, id: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.into(), text.into())
    }

    pub fn get(&self, id: &str) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
