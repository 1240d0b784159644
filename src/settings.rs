use crate::error::{NoteError, Result};
use crate::note::FolderShortcut;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn default_folders() -> Vec<FolderShortcut> {
    vec![FolderShortcut::new("default")]
}

/// Persisted shortcut list. A missing `folders` key falls back to the
/// default list; an explicit empty list stays empty.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_folders")]
    pub folders: Vec<FolderShortcut>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            folders: default_folders(),
        }
    }
}

impl Settings {
    pub fn parse(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn render(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Positions (0-based) of shortcuts with an empty path. These are kept,
    /// but no command is registered for them.
    pub fn empty_entries(&self) -> Vec<usize> {
        self.folders
            .iter()
            .enumerate()
            .filter(|(_, folder)| folder.is_empty())
            .map(|(index, _)| index)
            .collect()
    }
}

pub trait SettingsStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Settings>>;
    fn save(&mut self, settings: &Settings) -> Result<()>;
}

pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        TomlSettingsStore {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load(&self) -> Result<Option<Settings>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(Settings::parse(&contents)?)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        let content = settings.render()?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp_file = self.path.clone().into_os_string();
        tmp_file.push(".tmp");
        let tmp_file = PathBuf::from(tmp_file);
        fs::write(&tmp_file, content)?;
        fs::rename(&tmp_file, &self.path)?;
        debug!("saved settings to {}", self.path.display());
        Ok(())
    }
}

/// Keeps settings in memory only.
#[derive(Default)]
pub struct MemorySettingsStore {
    saved: Option<Settings>,
    pub fail_saves: bool,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        MemorySettingsStore {
            saved: Some(settings),
            fail_saves: false,
        }
    }

    pub fn saved(&self) -> Option<&Settings> {
        self.saved.as_ref()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<Settings>> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        if self.fail_saves {
            return Err(NoteError::Storage(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "settings store is read-only",
            )));
        }
        self.saved = Some(settings.clone());
        Ok(())
    }
}

/// The ordered list of folder shortcuts. Every edit lands in memory first and
/// is then saved as a whole; when the save fails the in-memory list still
/// holds the edit and remains authoritative for the session.
pub struct FolderRegistry<S: SettingsStore> {
    settings: Settings,
    store: S,
}

impl<S: SettingsStore> FolderRegistry<S> {
    pub fn load(store: S) -> Result<Self> {
        let settings = match store.load()? {
            Some(settings) => settings,
            None => {
                debug!("no saved settings, using defaults");
                Settings::default()
            }
        };

        for index in settings.empty_entries() {
            warn!("folder shortcut {} has an empty path", index + 1);
        }

        Ok(FolderRegistry { settings, store })
    }

    pub fn list(&self) -> &[FolderShortcut] {
        &self.settings.folders
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn add(&mut self, path: impl Into<String>) -> Result<()> {
        self.settings.folders.push(FolderShortcut::new(path));
        self.save()
    }

    pub fn remove_at(&mut self, index: usize) -> Result<FolderShortcut> {
        self.check_index(index)?;
        let removed = self.settings.folders.remove(index);
        self.save()?;
        Ok(removed)
    }

    pub fn update(&mut self, index: usize, path: impl Into<String>) -> Result<()> {
        self.check_index(index)?;
        self.settings.folders[index].folder_path = path.into();
        self.save()
    }

    pub fn save(&mut self) -> Result<()> {
        self.store.save(&self.settings)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.settings.folders.len() {
            return Err(NoteError::InvalidConfig(format!(
                "no folder shortcut at position {} ({} configured)",
                index + 1,
                self.settings.folders.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths<S: SettingsStore>(registry: &FolderRegistry<S>) -> Vec<&str> {
        registry
            .list()
            .iter()
            .map(|folder| folder.folder_path.as_str())
            .collect()
    }

    #[test]
    fn test_first_run_uses_default_folder() {
        let registry = FolderRegistry::load(MemorySettingsStore::new()).unwrap();
        assert_eq!(paths(&registry), vec!["default"]);
    }

    #[test]
    fn test_missing_key_merges_over_defaults() {
        assert_eq!(Settings::parse("").unwrap(), Settings::default());
        assert!(Settings::parse("folders = []").unwrap().folders.is_empty());
    }

    #[test]
    fn test_settings_use_folder_name_key() {
        let settings = Settings::parse("[[folders]]\nfolderName = \"Ideas\"\n").unwrap();
        assert_eq!(settings.folders, vec![FolderShortcut::new("Ideas")]);
        let rendered = settings.render().unwrap();
        assert!(rendered.contains("folderName = \"Ideas\""));
    }

    #[test]
    fn test_add_then_list() {
        let mut registry = FolderRegistry::load(MemorySettingsStore::new()).unwrap();
        registry.add("notes").unwrap();
        assert_eq!(paths(&registry), vec!["default", "notes"]);
        assert_eq!(registry.store().saved(), Some(registry.settings()));
    }

    #[test]
    fn test_remove_at() {
        let mut registry = FolderRegistry::load(MemorySettingsStore::new()).unwrap();
        registry.add("notes").unwrap();
        let removed = registry.remove_at(0).unwrap();
        assert_eq!(removed, FolderShortcut::new("default"));
        assert_eq!(paths(&registry), vec!["notes"]);
    }

    #[test]
    fn test_update_accepts_empty_path() {
        let mut registry = FolderRegistry::load(MemorySettingsStore::new()).unwrap();
        registry.update(0, "").unwrap();
        assert_eq!(registry.settings().empty_entries(), vec![0]);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut registry = FolderRegistry::load(MemorySettingsStore::new()).unwrap();
        assert!(matches!(
            registry.remove_at(3),
            Err(NoteError::InvalidConfig(_))
        ));
        assert!(matches!(
            registry.update(1, "x"),
            Err(NoteError::InvalidConfig(_))
        ));
        assert_eq!(paths(&registry), vec!["default"]);
    }

    #[test]
    fn test_failed_save_keeps_memory_state() {
        let mut registry = FolderRegistry::load(MemorySettingsStore::new()).unwrap();
        registry.store_mut().fail_saves = true;

        assert!(matches!(registry.add("notes"), Err(NoteError::Storage(_))));
        assert_eq!(paths(&registry), vec!["default", "notes"]);
        assert_eq!(registry.store().saved(), None);
    }

    #[test]
    fn test_toml_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut registry = FolderRegistry::load(TomlSettingsStore::new(&path)).unwrap();
        registry.add("Ideas").unwrap();
        registry.add("Journal/2024").unwrap();
        registry.remove_at(0).unwrap();

        let reloaded = FolderRegistry::load(TomlSettingsStore::new(&path)).unwrap();
        assert_eq!(paths(&reloaded), vec!["Ideas", "Journal/2024"]);
        let temp_file = dir.path().join("nested").join("settings.toml.tmp");
        assert!(!temp_file.exists());
    }

    #[test]
    fn test_toml_store_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "folders = 3").unwrap();
        assert!(matches!(
            FolderRegistry::load(TomlSettingsStore::new(&path)),
            Err(NoteError::SettingsFormat(_))
        ));
    }
}
