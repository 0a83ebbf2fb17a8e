use contracts::system::users::User;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory directory cache keyed by staff number.
/// Bulk imports drop every entry; reads repopulate it lazily.
#[derive(Clone, Default)]
pub struct DirectoryCache {
    entries: Arc<RwLock<HashMap<String, User>>>,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, staff_id: &str) -> Option<User> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(staff_id).cloned()
    }

    pub fn put(&self, user: User) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(user.staff_id.clone(), user);
    }

    /// Drops every cached record, returns how many were held
    pub fn invalidate_all(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let dropped = entries.len();
        entries.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn invalidate_clears_all_clones() {
        let cache = DirectoryCache::new();
        let shared = cache.clone();
        cache.put(User::new_for_insert("1".into(), "A".into(), Utc::now()));
        cache.put(User::new_for_insert("2".into(), "B".into(), Utc::now()));

        assert_eq!(shared.len(), 2);
        assert_eq!(shared.get("1").map(|u| u.full_name), Some("A".to_string()));
        assert_eq!(shared.invalidate_all(), 2);
        assert!(cache.is_empty());
    }
}
