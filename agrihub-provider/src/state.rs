//! Process-local cache state owned by one provider.

use agrihub_model::{DocumentEntity, DomainType, Resource};
use std::collections::HashSet;

/// An id-unique, ordered list of cached resources.
///
/// Order carries no meaning beyond "newly created first".
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Resource> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection. Repeated ids keep their first occurrence.
    pub fn replace_all(&mut self, items: Vec<T>) {
        let mut seen = HashSet::with_capacity(items.len());
        self.items = items
            .into_iter()
            .filter(|item| seen.insert(item.id().to_string()))
            .collect();
    }

    /// Inserts at the front, dropping any stale copy with the same id.
    pub fn prepend(&mut self, item: T) {
        self.items.retain(|i| i.id() != item.id());
        self.items.insert(0, item);
    }

    /// Swaps in `item` at the position of the entry with the same id.
    /// Returns false if no such entry is cached.
    pub fn replace(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|i| i.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id() != id);
        self.items.len() != before
    }

    /// Removes every listed id, returning how many were cached.
    pub fn remove_many(&mut self, ids: &[String]) -> usize {
        let doomed: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let before = self.items.len();
        self.items.retain(|i| !doomed.contains(i.id()));
        before - self.items.len()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn by_foreign_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a T> + 'a {
        self.items
            .iter()
            .filter(move |i| i.foreign_key() == Some(key))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

/// Everything a provider caches for its domain.
#[derive(Debug, Clone)]
pub struct ProviderState<E> {
    pub entities: Collection<E>,
    pub documents: Collection<DocumentEntity>,
    pub types: Collection<DomainType>,
    pub(crate) fetches_in_flight: usize,
    pub(crate) uploads_in_flight: usize,
    pub(crate) error: Option<String>,
}

impl<E> Default for ProviderState<E> {
    fn default() -> Self {
        Self {
            entities: Collection::default(),
            documents: Collection::default(),
            types: Collection::default(),
            fetches_in_flight: 0,
            uploads_in_flight: 0,
            error: None,
        }
    }
}

impl<E> ProviderState<E> {
    /// True while at least one fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.fetches_in_flight > 0
    }

    /// True while a file-bearing create or update is in flight.
    pub fn is_uploading_file(&self) -> bool {
        self.uploads_in_flight > 0
    }

    /// Message of the last failed operation, until the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrihub_model::DomainEntity;
    use pretty_assertions::assert_eq;

    fn e(id: &str) -> DomainEntity {
        DomainEntity::new(id, format!("entity {id}"))
    }

    fn ids(c: &Collection<DomainEntity>) -> Vec<&str> {
        c.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn replace_all_drops_duplicates_and_stale_entries() {
        let mut c = Collection::new();
        c.replace_all(vec![e("old")]);
        c.replace_all(vec![e("1"), e("2"), e("1")]);
        assert_eq!(ids(&c), vec!["1", "2"]);
    }

    #[test]
    fn replace_all_keeps_first_copy_of_repeated_id() {
        let mut c = Collection::new();
        let mut items: Vec<_> = (0..2000).map(|n| e(&n.to_string())).collect();
        items.push(DomainEntity::new("0", "late duplicate"));
        c.replace_all(items);
        assert_eq!(c.len(), 2000);
        assert_eq!(c.get("0").unwrap().name, "entity 0");
    }

    #[test]
    fn prepend_puts_new_first_and_keeps_ids_unique() {
        let mut c = Collection::new();
        c.replace_all(vec![e("1"), e("2")]);
        c.prepend(e("3"));
        assert_eq!(ids(&c), vec!["3", "1", "2"]);
        c.prepend(e("2"));
        assert_eq!(ids(&c), vec!["2", "3", "1"]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut c = Collection::new();
        c.replace_all(vec![e("1"), e("2"), e("3")]);
        assert!(c.replace(DomainEntity::new("2", "renamed")));
        assert_eq!(ids(&c), vec!["1", "2", "3"]);
        assert_eq!(c.get("2").unwrap().name, "renamed");
        assert!(!c.replace(e("9")));
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn remove_many_counts_cached_ids_only() {
        let mut c = Collection::new();
        c.replace_all(vec![e("1"), e("2"), e("3")]);
        let removed = c.remove_many(&["1".to_string(), "3".to_string(), "x".to_string()]);
        assert_eq!(removed, 2);
        assert_eq!(ids(&c), vec!["2"]);
        assert!(!c.remove("1"));
    }

    #[test]
    fn foreign_key_lookup() {
        let mut c = Collection::new();
        c.replace_all(vec![e("1").with_type("t1"), e("2").with_type("t2"), e("3").with_type("t1")]);
        let matched: Vec<_> = c.by_foreign_key("t1").map(|i| i.id.as_str()).collect();
        assert_eq!(matched, vec!["1", "3"]);
        assert_eq!(c.by_foreign_key("none").count(), 0);
    }

    #[test]
    fn default_state_is_idle() {
        let state = ProviderState::<DomainEntity>::default();
        assert!(!state.is_loading());
        assert!(!state.is_uploading_file());
        assert_eq!(state.error(), None);
    }
}
