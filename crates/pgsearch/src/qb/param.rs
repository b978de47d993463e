//! Named parameter storage for search builders.

use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A clone-friendly bound value.
#[derive(Clone)]
pub struct Param(pub(crate) Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Create a new parameter from any ToSql value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Get a reference to the inner value as a ToSql trait object.
    pub fn as_ref(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl std::fmt::Debug for Param {
    // `ToSql: Debug`, so the bound value itself is shown.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&*self.0, f)
    }
}

/// Insertion-ordered mapping from parameter name to bound value.
///
/// The position of a key is its slot: slot `n` (1-based) renders as `$n` in
/// numbered SQL. Re-binding an existing key replaces the value but keeps the
/// slot.
#[derive(Clone, Default)]
pub struct ParamMap {
    entries: Vec<(String, Param)>,
}

impl ParamMap {
    /// Create a new empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` and return its 1-based slot.
    pub fn insert(&mut self, key: impl Into<String>, param: Param) -> usize {
        let key = key.into();
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries[pos].1 = param;
            return pos + 1;
        }
        self.entries.push((key, param));
        self.entries.len()
    }

    /// Look up the value bound to `key`.
    pub fn get(&self, key: &str) -> Option<&Param> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, p)| p)
    }

    /// Whether `key` is bound.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no parameter is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parameter names in slot order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(name, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p))
    }

    /// Values in slot order, as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.entries.iter().map(|(_, p)| p.as_ref()).collect()
    }
}

impl std::fmt::Debug for ParamMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
