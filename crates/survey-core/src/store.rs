//! Generic keyed store, one instance per object kind
//!
//! Maps uuids to live handles. Registering under an existing uuid replaces
//! the previous handle, and lookups of unknown uuids return `None`.

use indexmap::IndexMap;

/// Uuid-keyed store of handles for a single object kind
#[derive(Debug, Clone)]
pub struct KindStore<T> {
    kind: &'static str,
    entries: IndexMap<String, T>,
}

impl<T: Clone> KindStore<T> {
    /// Create an empty store for `kind`
    #[inline]
    #[must_use]
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: IndexMap::new(),
        }
    }

    /// Kind name used in log events
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Insert or replace the handle for `uuid`
    ///
    /// An empty uuid is ignored. Returns the replaced handle, if any.
    pub fn register(&mut self, uuid: &str, entry: T) -> Option<T> {
        if uuid.is_empty() {
            tracing::warn!(kind = self.kind, "ignoring registration without uuid");
            return None;
        }
        let previous = self.entries.insert(uuid.to_owned(), entry);
        if previous.is_some() {
            tracing::debug!(kind = self.kind, uuid, "replaced registered object");
        } else {
            tracing::debug!(kind = self.kind, uuid, "registered object");
        }
        previous
    }

    /// Current handle for `uuid`
    #[must_use]
    pub fn get(&self, uuid: &str) -> Option<T> {
        let found = self.entries.get(uuid).cloned();
        tracing::trace!(kind = self.kind, uuid, found = found.is_some(), "lookup");
        found
    }

    /// Remove the handle for `uuid`, returning it when present
    pub fn unregister(&mut self, uuid: &str) -> Option<T> {
        let removed = self.entries.swap_remove(uuid);
        if removed.is_some() {
            tracing::debug!(kind = self.kind, uuid, "unregistered object");
        }
        removed
    }

    /// Remove every handle
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!(kind = self.kind, count = self.entries.len(), "clearing store");
        }
        self.entries.clear();
    }

    /// Whether a handle is registered for `uuid`
    #[inline]
    #[must_use]
    pub fn contains(&self, uuid: &str) -> bool {
        self.entries.contains_key(uuid)
    }

    /// Number of registered handles
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered uuids
    pub fn uuids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
