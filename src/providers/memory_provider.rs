use crate::error::{NoteError, Result};
use crate::providers::provider::{EntryKind, VaultProvider};
use std::collections::BTreeMap;
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Folder,
    Note(String),
}

/// In-memory vault for tests and headless use.
/// Does NOT persist data.
#[derive(Default)]
pub struct MemoryVaultProvider {
    entries: BTreeMap<String, Entry>,
}

// Same mapping the file system applies: empty segments collapse.
fn key(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

impl MemoryVaultProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(mut self, path: &str) -> Self {
        self.insert_folders(&key(path));
        self
    }

    pub fn with_note(mut self, path: &str, contents: &str) -> Self {
        let path = key(path);
        if let Some((parent, _)) = path.rsplit_once('/') {
            self.insert_folders(parent);
        }
        self.entries.insert(path, Entry::Note(contents.to_string()));
        self
    }

    /// Every stored path, folders included, in sorted order.
    pub fn paths(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert_folders(&mut self, path: &str) {
        let mut current = String::new();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            self.entries.entry(current.clone()).or_insert(Entry::Folder);
        }
    }
}

impl VaultProvider for MemoryVaultProvider {
    fn entry_kind(&self, path: &str) -> Result<Option<EntryKind>> {
        Ok(self.entries.get(&key(path)).map(|entry| match entry {
            Entry::Folder => EntryKind::Folder,
            Entry::Note(_) => EntryKind::Note,
        }))
    }

    fn create_folder(&mut self, path: &str) -> Result<()> {
        let path = key(path);
        let mut current = String::new();
        for segment in path.split('/') {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            if let Some(Entry::Note(_)) = self.entries.get(&current) {
                return Err(NoteError::Storage(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} is a note", current),
                )));
            }
        }
        self.insert_folders(&path);
        Ok(())
    }

    fn create_note(&mut self, path: &str, contents: &str) -> Result<()> {
        let path = key(path);
        if self.entries.contains_key(&path) {
            return Err(NoteError::Storage(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", path),
            )));
        }
        if let Some((parent, _)) = path.rsplit_once('/') {
            if self.entries.get(parent) != Some(&Entry::Folder) {
                return Err(NoteError::Storage(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("folder {} does not exist", parent),
                )));
            }
        }
        self.entries.insert(path, Entry::Note(contents.to_string()));
        Ok(())
    }

    fn read_note(&self, path: &str) -> Result<Option<String>> {
        Ok(match self.entries.get(&key(path)) {
            Some(Entry::Note(contents)) => Some(contents.clone()),
            _ => None,
        })
    }
}
