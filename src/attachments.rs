// src/attachments.rs
use log::debug;
use serde::Serialize;

use crate::path_tree::normalize;

/// A file the user attached: its absolute path and full text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub path: String,
    pub content: String,
}

/// Insertion-ordered attachments keyed by normalized path, so `/a//b.txt`
/// and `/a/b.txt` are the same attachment.
///
/// Iteration order is the order files were added, which is also the order
/// their contents appear in the rendered scripts block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentStore {
    entries: Vec<Attachment>,
}

impl AttachmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attachment. Returns `false` and leaves the store untouched if
    /// the path is already attached; the first content wins.
    pub fn add(&mut self, path: impl Into<String>, content: impl Into<String>) -> bool {
        let path = normalize(&path.into());
        if self.position(&path).is_some() {
            debug!("Ignoring duplicate attachment: {}", path);
            return false;
        }

        let content = content.into();
        debug!("Attached {} ({} bytes)", path, content.len());
        self.entries.push(Attachment { path, content });
        true
    }

    /// Removes an attachment. Returns `false` if the path was not attached.
    pub fn remove(&mut self, path: &str) -> bool {
        match self.position(path) {
            Some(index) => {
                self.entries.remove(index);
                debug!("Removed attachment: {}", path);
                true
            }
            None => false,
        }
    }

    fn position(&self, path: &str) -> Option<usize> {
        let key = normalize(path);
        self.entries.iter().position(|entry| entry.path == key)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.position(path).is_some()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.position(path)
            .map(|index| self.entries[index].content.as_str())
    }

    /// Attachments in insertion order.
    pub fn list(&self) -> &[Attachment] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|entry| (entry.path.as_str(), entry.content.as_str()))
    }

    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.path.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(paths: &[&str]) -> AttachmentStore {
        let mut store = AttachmentStore::new();
        for path in paths {
            store.add(*path, format!("content of {path}"));
        }
        store
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let store = store_with(&["/z.txt", "/a.txt", "/m.txt"]);
        assert_eq!(store.paths(), vec!["/z.txt", "/a.txt", "/m.txt"]);
    }

    #[test]
    fn test_duplicate_add_keeps_first_content() {
        let mut store = AttachmentStore::new();
        assert!(store.add("/p.txt", "first"));
        assert!(!store.add("/p.txt", "second"));
        assert_eq!(store.get("/p.txt"), Some("first"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_equivalent_paths_are_one_attachment() {
        let mut store = AttachmentStore::new();
        assert!(store.add("/proj/a.txt", "one"));
        assert!(!store.add("/proj//a.txt", "two"));
        assert!(!store.add("/proj/./sub/../a.txt", "three"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("/proj//a.txt"), Some("one"));
        assert_eq!(store.paths(), vec!["/proj/a.txt"]);
        assert_eq!(crate::path_tree::build_tree(&store.paths()), "a.txt");

        assert!(store.remove("/proj/./a.txt"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_then_remove_restores_previous_state() {
        let mut store = store_with(&["/a.txt", "/b.txt"]);
        let before = store.clone();

        store.add("/c.txt", "new");
        assert!(store.remove("/c.txt"));
        assert_eq!(store, before);
    }

    #[test]
    fn test_remove_keeps_order_of_remaining() {
        let mut store = store_with(&["/a.txt", "/b.txt", "/c.txt"]);
        store.remove("/b.txt");
        assert_eq!(store.paths(), vec!["/a.txt", "/c.txt"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = store_with(&["/a.txt"]);
        assert!(!store.remove("/missing.txt"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_large_content_is_not_truncated() {
        let mut store = AttachmentStore::new();
        let big = "x".repeat(5 * 1024 * 1024);
        store.add("/big.txt", big.clone());
        assert_eq!(store.get("/big.txt").map(str::len), Some(big.len()));
    }
}
