//! Generic in-memory table.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

/// Thread-safe, cloneable in-memory key-value table.
///
/// All operations are synchronous and never hold the lock across an
/// `.await`. `parking_lot::RwLock` does not poison, so a panicking writer
/// cannot wedge the table.
#[derive(Debug)]
pub struct Table<K, V> {
    data: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Clone for Table<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Table<K, V> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.data.write().insert(key, value)
    }

    /// Insert a record unless an existing record conflicts with it.
    ///
    /// The conflict scan and the insert run under one write lock. On conflict
    /// the conflicting record is returned and nothing is written.
    pub fn insert_unique(&self, key: K, value: V, conflicts: impl Fn(&V) -> bool) -> Result<(), V> {
        let mut guard = self.data.write();
        if let Some(existing) = guard.values().find(|v| conflicts(v)) {
            return Err(existing.clone());
        }
        guard.insert(key, value);
        Ok(())
    }

    /// Insert a record after removing every other record that `same` matches.
    ///
    /// Enforces a secondary uniqueness key at write time.
    pub fn upsert_by(&self, key: K, value: V, same: impl Fn(&V) -> bool) {
        let mut guard = self.data.write();
        guard.retain(|k, v| *k == key || !same(v));
        guard.insert(key, value);
    }

    /// Atomically edit the record at `key`, starting from the default when absent.
    ///
    /// `f` also sees every other record, so it can check keys that span
    /// records. It works on a copy; the copy is written back only when `f`
    /// returns `Ok`, so a failed edit leaves the table untouched.
    pub fn modify_or_default<R, E>(
        &self,
        key: K,
        f: impl FnOnce(&mut V, &HashMap<K, V>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        V: Default,
    {
        let mut guard = self.data.write();
        let original = guard.remove(&key);
        let mut value = original.clone().unwrap_or_default();
        match f(&mut value, &*guard) {
            Ok(result) => {
                guard.insert(key, value);
                Ok(result)
            }
            Err(err) => {
                if let Some(original) = original {
                    guard.insert(key, original);
                }
                Err(err)
            }
        }
    }

    /// Retrieve a record by key.
    pub fn get(&self, key: &K) -> Option<V> {
        self.data.read().get(key).cloned()
    }

    /// All records matching a predicate.
    pub fn filter(&self, pred: impl Fn(&V) -> bool) -> Vec<V> {
        self.data.read().values().filter(|v| pred(v)).cloned().collect()
    }

    /// List all records.
    pub fn list(&self) -> Vec<V> {
        self.data.read().values().cloned().collect()
    }

    /// Remove a record by key.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.data.write().remove(key)
    }

    /// Remove every record matching a predicate, returning them.
    pub fn remove_where(&self, pred: impl Fn(&V) -> bool) -> Vec<V> {
        let mut guard = self.data.write();
        let keys: Vec<K> = guard
            .iter()
            .filter(|(_, v)| pred(v))
            .map(|(k, _)| k.clone())
            .collect();
        keys.iter().filter_map(|k| guard.remove(k)).collect()
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
