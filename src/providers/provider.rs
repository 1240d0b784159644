use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    Note,
}

/// Storage behind a vault. Paths are vault-relative strings exactly as they
/// appear in links.
pub trait VaultProvider {
    fn entry_kind(&self, path: &str) -> Result<Option<EntryKind>>;
    /// Creates the folder and any missing parents. Succeeds if it already exists.
    fn create_folder(&mut self, path: &str) -> Result<()>;
    /// Creates a new note. Never overwrites an existing entry.
    fn create_note(&mut self, path: &str, contents: &str) -> Result<()>;
    fn read_note(&self, path: &str) -> Result<Option<String>>;
}
