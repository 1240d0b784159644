use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteError {
    #[error("Invalid note name: {0}")]
    InvalidName(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Could not parse settings: {0}")]
    SettingsFormat(#[from] toml::de::Error),

    #[error("Could not serialize settings: {0}")]
    SettingsSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, NoteError>;
