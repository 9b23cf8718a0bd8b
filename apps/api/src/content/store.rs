//! The content document store.
//!
//! All editable site copy lives in one JSON file keyed by page name. Reads
//! parse the whole file; writes replace exactly one top-level page and
//! commit by writing a temp file in the same directory and renaming it over
//! the original, so a crash mid-write never leaves a torn document.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use thiserror::Error;

/// The fixed set of editable top-level pages. A write targeting any other
/// key is rejected before the file is touched.
pub const PAGE_KEYS: [&str; 7] = [
    "home", "services", "solutions", "about", "careers", "contact", "siteInfo",
];

/// The full content document: page name -> page subtree.
pub type Document = Map<String, Value>;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("'{0}' is not an editable page")]
    InvalidPage(String),

    #[error("path '{0}' does not resolve")]
    PathNotFound(String),

    #[error("content I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("content document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub fn is_valid_page(page: &str) -> bool {
    PAGE_KEYS.contains(&page)
}

/// Write seam between the edit session and the persisted document, so the
/// save flow is testable without a filesystem.
pub trait ContentSink {
    fn replace_page(&self, page: &str, data: Value) -> Result<(), ContentError>;
}

#[derive(Clone)]
pub struct ContentStore {
    path: PathBuf,
    /// Serializes in-process writers so a read-modify-write of the document
    /// never interleaves. Cross-process overlap stays last-writer-wins at
    /// page granularity.
    write_lock: Arc<Mutex<()>>,
}

impl ContentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ContentStore {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Parses and returns the entire document.
    pub fn load(&self) -> Result<Document, ContentError> {
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Replaces one page's subtree and persists the whole document
    /// atomically. Unknown page names fail with `InvalidPage` and leave the
    /// file untouched.
    pub fn replace_page(&self, page: &str, data: Value) -> Result<(), ContentError> {
        if !is_valid_page(page) {
            return Err(ContentError::InvalidPage(page.to_string()));
        }

        let _guard = self.write_lock.lock().expect("content write lock poisoned");

        let mut document = self.load()?;
        document.insert(page.to_string(), data);
        self.persist(&document)
    }

    fn persist(&self, document: &Document) -> Result<(), ContentError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, document)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl ContentSink for ContentStore {
    fn replace_page(&self, page: &str, data: Value) -> Result<(), ContentError> {
        ContentStore::replace_page(self, page, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded_store(dir: &Path) -> ContentStore {
        let path = dir.join("site.json");
        let document = json!({
            "home": {"hero": {"title": "Welcome"}},
            "services": {},
            "solutions": {},
            "about": {"values": [{"title": "Care"}]},
            "careers": {},
            "contact": {},
            "siteInfo": {"name": "Curanova"}
        });
        std::fs::write(&path, serde_json::to_string_pretty(&document).unwrap()).unwrap();
        ContentStore::new(path)
    }

    #[test]
    fn test_replace_page_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path());

        let new_about = json!({"values": [{"title": "Integrity"}], "mission": {"title": "Why"}});
        store.replace_page("about", new_about.clone()).unwrap();

        let document = store.load().unwrap();
        assert_eq!(document["about"], new_about);
        // Sibling pages are untouched.
        assert_eq!(document["home"]["hero"]["title"], "Welcome");
    }

    #[test]
    fn test_every_declared_page_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path());

        for page in PAGE_KEYS {
            let marker = json!({"marker": page});
            store.replace_page(page, marker.clone()).unwrap();
            assert_eq!(store.load().unwrap()[page], marker);
        }
    }

    #[test]
    fn test_unknown_page_rejected_and_document_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path());
        let before = store.load().unwrap();

        let err = store
            .replace_page("nonexistent-page", json!({"x": 1}))
            .unwrap_err();
        assert!(matches!(err, ContentError::InvalidPage(p) if p == "nonexistent-page"));
        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn test_page_key_check_is_case_sensitive() {
        assert!(is_valid_page("siteInfo"));
        assert!(!is_valid_page("siteinfo"));
        assert!(!is_valid_page("Home"));
        assert!(!is_valid_page(""));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.load(), Err(ContentError::Io(_))));
    }

    #[test]
    fn test_malformed_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = ContentStore::new(path);
        assert!(matches!(store.load(), Err(ContentError::Malformed(_))));
    }
}
