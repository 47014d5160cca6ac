use crate::models::Operation;
use dashmap::DashMap;
use std::sync::Arc;

/// Resolved operation sets keyed by role id.
///
/// Only role definitions are cached; they change rarely and every write
/// through [`crate::RoleDefinitions`] invalidates the affected entry.
/// Bundle membership is always read live so revocations apply immediately.
///
/// Each role carries a generation bumped on invalidation. A fill records the
/// generation it started from and is dropped if an edit landed in between.
#[derive(Debug, Default)]
pub struct RoleOperationCache {
    entries: DashMap<i64, Arc<Vec<Operation>>>,
    generations: DashMap<i64, u64>,
}

impl RoleOperationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role_id: i64) -> Option<Arc<Vec<Operation>>> {
        self.entries.get(&role_id).map(|entry| Arc::clone(entry.value()))
    }

    /// Read before loading a role from storage; pass the value to [`Self::insert`].
    pub fn generation(&self, role_id: i64) -> u64 {
        *self.generations.entry(role_id).or_insert(0)
    }

    /// Store a loaded set unless the role was invalidated after `generation`
    /// was read. Returns whether the entry was kept.
    pub fn insert(&self, role_id: i64, generation: u64, operations: Arc<Vec<Operation>>) -> bool {
        let current = self.generations.entry(role_id).or_insert(0);
        if *current != generation {
            return false;
        }
        self.entries.insert(role_id, operations);
        true
    }

    pub fn invalidate(&self, role_id: i64) {
        let mut current = self.generations.entry(role_id).or_insert(0);
        *current += 1;
        self.entries.remove(&role_id);
    }

    pub fn clear(&self) {
        for mut current in self.generations.iter_mut() {
            *current += 1;
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
