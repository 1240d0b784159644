use crate::actions::ValidationPolicy;
use crate::error::{NoteError, Result};
use log::LevelFilter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use toml::Table;
use toml::Value;

pub const CONFIG_ENV_VAR: &str = "FOLDER_NOTES_CONFIG";
const CONFIG_FILE_NAME: &str = ".folder_notes.toml";

fn _expand_homedir(path: String) -> String {
    if path.starts_with('~') {
        match home::home_dir() {
            Some(home_dir) => path.replacen('~', &home_dir.to_string_lossy(), 1),
            None => path,
        }
    } else {
        path
    }
}

fn get_str(config: &Table, key: &str, default: &str) -> Result<String> {
    match config.get(key) {
        None => Ok(default.to_string()),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(NoteError::InvalidConfig(format!(
            "{} must be a string, found {}",
            key,
            other.type_str()
        ))),
    }
}

fn default_editor() -> String {
    std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string())
}

/// Where the config file lives unless overridden.
pub fn default_config_path() -> PathBuf {
    let mut config_file = home::home_dir().unwrap_or_default();
    config_file.push(CONFIG_FILE_NAME);
    config_file
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    vault_directory: String,
    settings_file: String,
    validation: ValidationPolicy,
    editor: String,
    log_file: String,
    log_level: LevelFilter,
}

impl Config {
    /// Resolves every field on its own, falling back to its default when the
    /// key is absent.
    pub fn new(config: Table) -> Result<Self> {
        let vault_directory = get_str(&config, "vault_directory", "~/vault/")?;
        let settings_file = get_str(&config, "settings_file", ".folder-notes/settings.toml")?;
        let validation = get_str(&config, "validation", "strict")?;
        let editor = get_str(&config, "editor", &default_editor())?;
        let log_file = get_str(&config, "log_file", "~/.folder_notes.log")?;
        let log_level = get_str(&config, "log_level", "info")?;

        let validation = ValidationPolicy::from_str(&validation)?;
        let log_level = LevelFilter::from_str(&log_level).map_err(|_| {
            NoteError::InvalidConfig(format!("unknown log_level {}", log_level))
        })?;

        Ok(Config {
            vault_directory: _expand_homedir(vault_directory),
            settings_file: _expand_homedir(settings_file),
            validation,
            editor,
            log_file: _expand_homedir(log_file),
            log_level,
        })
    }

    /// Reads a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let table = match fs::read_to_string(path) {
            Ok(contents) => contents.parse::<Table>().map_err(|error| {
                NoteError::InvalidConfig(format!(
                    "unable to parse {}, make sure it is valid toml: {}",
                    path.display(),
                    error
                ))
            })?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => Table::new(),
            Err(error) => return Err(error.into()),
        };

        Config::new(table)
    }

    pub fn generate() -> Table {
        let mut table = Table::new();
        table.insert(
            String::from("vault_directory"),
            Value::String(String::from("~/vault/")),
        );
        table.insert(
            String::from("settings_file"),
            Value::String(String::from(".folder-notes/settings.toml")),
        );
        table.insert(
            String::from("validation"),
            Value::String(String::from("strict")),
        );
        table.insert(String::from("editor"), Value::String(String::from("vi")));
        table.insert(
            String::from("log_file"),
            Value::String(String::from("~/.folder_notes.log")),
        );
        table.insert(
            String::from("log_level"),
            Value::String(String::from("info")),
        );

        table
    }

    /// The resolved values, in the same shape as the file.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.insert(
            String::from("vault_directory"),
            Value::String(self.vault_directory.clone()),
        );
        table.insert(
            String::from("settings_file"),
            Value::String(self.get_settings_path().to_string_lossy().into_owned()),
        );
        table.insert(
            String::from("validation"),
            Value::String(self.validation.to_string()),
        );
        table.insert(String::from("editor"), Value::String(self.editor.clone()));
        table.insert(
            String::from("log_file"),
            Value::String(self.log_file.clone()),
        );
        table.insert(
            String::from("log_level"),
            Value::String(self.log_level.to_string().to_lowercase()),
        );
        table
    }

    pub fn get_vault_directory(&self) -> &str {
        &self.vault_directory
    }

    /// Relative settings paths live inside the vault.
    pub fn get_settings_path(&self) -> PathBuf {
        let settings_file = Path::new(&self.settings_file);
        if settings_file.is_absolute() {
            settings_file.to_path_buf()
        } else {
            Path::new(&self.vault_directory).join(settings_file)
        }
    }

    pub fn get_validation(&self) -> ValidationPolicy {
        self.validation
    }

    pub fn get_editor(&self) -> &str {
        &self.editor
    }

    pub fn get_log_file(&self) -> &str {
        &self.log_file
    }

    pub fn get_log_level(&self) -> LevelFilter {
        self.log_level
    }
}
