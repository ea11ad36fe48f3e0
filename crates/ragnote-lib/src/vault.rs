use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::NOTE_EXTENSIONS;
use crate::error::{RagError, Result};

/// A note and its full text. Read-only for the duration of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub content: String,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// Source of documents consumed by the pipeline.
pub trait DocumentStore {
    /// Identifiers of every document, in a stable order.
    fn list_documents(&self) -> Result<Vec<String>>;

    /// Full text of one document.
    fn read_document(&self, id: &str) -> Result<String>;
}

/// Read every listed document. Documents that cannot be read (missing,
/// unreadable, not UTF-8) are skipped with a warning; only a failure to
/// list the store fails the call.
pub fn load_documents(store: &dyn DocumentStore) -> Result<Vec<Document>> {
    let ids = store.list_documents()?;
    let mut documents = Vec::with_capacity(ids.len());
    for id in ids {
        match store.read_document(&id) {
            Ok(content) => documents.push(Document { id, content }),
            Err(err) => warn!(document = %id, error = %err, "Skipping unreadable document"),
        }
    }
    debug!(documents = documents.len(), "Documents loaded");
    Ok(documents)
}

/// Notes stored as `.md`/`.txt` files under a root directory.
///
/// Identifiers are `/`-separated paths relative to the root. Hidden entries
/// (`.obsidian`, `.git`, dotfiles) are ignored.
pub struct DirectoryVault {
    root: PathBuf,
}

impl DirectoryVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn relative_id(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<_> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        Some(parts.join("/"))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn is_note(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            NOTE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

impl DocumentStore for DirectoryVault {
    fn list_documents(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Err(RagError::Store {
                location: self.root.display().to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "vault directory not found"),
            });
        }

        let mut ids = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e));
        for entry in walker {
            let entry = entry.map_err(|err| RagError::Store {
                location: err.path().map_or_else(
                    || self.root.display().to_string(),
                    |p| p.display().to_string(),
                ),
                source: err.into(),
            })?;
            if entry.file_type().is_file()
                && is_note(entry.path())
                && let Some(id) = self.relative_id(entry.path())
            {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    fn read_document(&self, id: &str) -> Result<String> {
        let path = self.root.join(id);
        fs::read_to_string(&path).map_err(|source| RagError::Store {
            location: path.display().to_string(),
            source,
        })
    }
}

/// Documents held in memory, listed in insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemoryVault {
    documents: Vec<Document>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, replacing any existing one with the same id.
    #[must_use]
    pub fn with_note(mut self, id: &str, content: &str) -> Self {
        self.insert(Document::new(id, content));
        self
    }

    pub fn insert(&mut self, document: Document) {
        match self.documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => self.documents.push(document),
        }
    }
}

impl DocumentStore for MemoryVault {
    fn list_documents(&self) -> Result<Vec<String>> {
        Ok(self.documents.iter().map(|d| d.id.clone()).collect())
    }

    fn read_document(&self, id: &str) -> Result<String> {
        self.documents
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.content.clone())
            .ok_or_else(|| RagError::Store {
                location: id.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such document"),
            })
    }
}
