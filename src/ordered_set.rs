//! Insertion-ordered deduplicating string set.
//!
//! Used for article tags and visited feed links, where output order must
//! follow encounter order but duplicates must be suppressed.

use std::collections::HashSet;

/// A set of strings that remembers insertion order.
#[derive(Debug, Default)]
pub struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning true if it was not already present.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Consume the set, yielding the values in insertion order.
    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_insertion_order() {
        let mut set = OrderedSet::new();
        set.insert("rust");
        set.insert("python");
        set.insert("go");
        assert_eq!(set.into_vec(), vec!["rust", "python", "go"]);
    }

    #[test]
    fn test_duplicates_suppressed() {
        let mut set = OrderedSet::new();
        assert!(set.insert("python"));
        assert!(!set.insert("python"));
        assert_eq!(set.len(), 1);
        assert!(set.contains("python"));
    }
}
