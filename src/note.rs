use serde::{Deserialize, Serialize};

pub const NOTE_EXTENSION: &str = ".md";

/// One configured destination folder. Serialized as `folderName` to stay
/// compatible with settings written by earlier releases.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FolderShortcut {
    #[serde(rename = "folderName", default)]
    pub folder_path: String,
}

impl FolderShortcut {
    pub fn new(folder_path: impl Into<String>) -> Self {
        FolderShortcut {
            folder_path: folder_path.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.folder_path.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRequest {
    pub raw_name: String,
    pub target_folder: FolderShortcut,
}

impl NoteRequest {
    pub fn new(raw_name: impl Into<String>, target_folder: FolderShortcut) -> Self {
        NoteRequest {
            raw_name: raw_name.into(),
            target_folder,
        }
    }
}

/// Outcome of a successful note creation. `created` is false when the note
/// already existed and was reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteResult {
    pub path: String,
    pub display_name: String,
    pub created: bool,
}

/// Vault-relative path of a note. Plain concatenation, no normalization:
/// links embed this exact string.
pub fn note_path(folder: &FolderShortcut, name: &str) -> String {
    format!("{}/{}{}", folder.folder_path, name, NOTE_EXTENSION)
}
