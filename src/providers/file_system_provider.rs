use crate::error::{NoteError, Result};
use crate::providers::provider::{EntryKind, VaultProvider};
use log::debug;
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

pub struct FileSystemVaultProvider {
    root: PathBuf,
}

impl FileSystemVaultProvider {
    pub fn new<P: AsRef<Path>>(root: P) -> FileSystemVaultProvider {
        FileSystemVaultProvider {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Maps a vault path onto disk. Leading slashes stay inside the vault and
    /// `..` is refused so nothing can be written outside of it.
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        let mut resolved = self.root.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir | Component::RootDir => {}
                Component::ParentDir | Component::Prefix(_) => {
                    return Err(NoteError::InvalidConfig(format!(
                        "path {} points outside of the vault",
                        path
                    )));
                }
            }
        }
        Ok(resolved)
    }
}

impl VaultProvider for FileSystemVaultProvider {
    fn entry_kind(&self, path: &str) -> Result<Option<EntryKind>> {
        let full_path = self.resolve(path)?;
        match fs::metadata(&full_path) {
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Folder)),
            Ok(_) => Ok(Some(EntryKind::Note)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn create_folder(&mut self, path: &str) -> Result<()> {
        let full_path = self.resolve(path)?;
        debug!("creating folder {}", full_path.display());
        fs::create_dir_all(&full_path)?;
        Ok(())
    }

    fn create_note(&mut self, path: &str, contents: &str) -> Result<()> {
        let full_path = self.resolve(path)?;
        debug!("creating note {}", full_path.display());
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    fn read_note(&self, path: &str) -> Result<Option<String>> {
        let full_path = self.resolve(path)?;
        match fs::read_to_string(&full_path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}
