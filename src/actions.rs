use crate::editor::Editor;
use crate::error::{NoteError, Result};
use crate::link::Wikilink;
use crate::note::{note_path, FolderShortcut, NoteRequest, NoteResult};
use crate::notice::{Notice, Notifier};
use crate::prompt::NamePrompt;
use crate::providers::provider::{EntryKind, VaultProvider};

use log::{debug, info, warn};
use std::fmt;
use std::str::FromStr;

/// Characters a note name may not contain under [`ValidationPolicy::Strict`].
pub const DISALLOWED_CHARS: &[char] = &[
    ':', ';', ',', '.', '?', '*', '!', '(', ')', '[', ']', '{', '}', '<', '>', '/', '\\', '|',
    '\'', '"', '`', '~',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    #[default]
    Strict,
    Permissive,
}

impl ValidationPolicy {
    pub fn check(&self, name: &str) -> Result<()> {
        match self {
            ValidationPolicy::Permissive => Ok(()),
            ValidationPolicy::Strict => match name.chars().find(|c| DISALLOWED_CHARS.contains(c)) {
                Some(c) => Err(NoteError::InvalidName(format!(
                    "'{}' contains the disallowed character '{}'",
                    name, c
                ))),
                None => Ok(()),
            },
        }
    }
}

impl FromStr for ValidationPolicy {
    type Err = NoteError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "strict" => Ok(ValidationPolicy::Strict),
            "permissive" => Ok(ValidationPolicy::Permissive),
            other => Err(NoteError::InvalidConfig(format!(
                "unknown validation policy {}, expected strict or permissive",
                other
            ))),
        }
    }
}

impl fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationPolicy::Strict => write!(f, "strict"),
            ValidationPolicy::Permissive => write!(f, "permissive"),
        }
    }
}

/// Creates the note a request describes, or finds the one already there.
///
/// Returns `Ok(None)` for a blank name: nothing is touched. Validation runs
/// before any vault access, so a rejected name never mutates the vault.
pub fn create_note<T: VaultProvider + ?Sized>(
    vault: &mut T,
    request: &NoteRequest,
    policy: ValidationPolicy,
) -> Result<Option<NoteResult>> {
    let name = request.raw_name.trim();
    policy.check(name)?;

    if name.is_empty() {
        debug!("note name is empty. nothing to create.");
        return Ok(None);
    }

    let folder = &request.target_folder;
    if folder.is_empty() {
        return Err(NoteError::InvalidConfig(String::from(
            "the target folder path is empty",
        )));
    }

    let path = note_path(folder, name);

    match vault.entry_kind(&folder.folder_path)? {
        Some(EntryKind::Folder) => {}
        Some(EntryKind::Note) => {
            return Err(NoteError::InvalidConfig(format!(
                "{} exists but is not a folder",
                folder.folder_path
            )));
        }
        None => {
            info!("creating missing folder {}", folder.folder_path);
            vault.create_folder(&folder.folder_path)?;
        }
    }

    let created = match vault.entry_kind(&path)? {
        Some(EntryKind::Note) => {
            debug!("note {} already exists, reusing it", path);
            false
        }
        Some(EntryKind::Folder) => {
            return Err(NoteError::InvalidName(format!(
                "{} is a folder, not a note",
                path
            )));
        }
        None => {
            vault.create_note(&path, "")?;
            info!("created note {}", path);
            true
        }
    };

    Ok(Some(NoteResult {
        path,
        display_name: name.to_string(),
        created,
    }))
}

/// Where the candidate note name comes from.
pub enum NameSource<'a> {
    FromSelection(String),
    FromPrompt(&'a mut dyn NamePrompt),
}

impl<'a> NameSource<'a> {
    /// A non-empty selection wins, otherwise the prompt is used.
    pub fn pick(editor: &dyn Editor, prompt: &'a mut dyn NamePrompt) -> Self {
        match editor.selection() {
            Some(selection) if !selection.is_empty() => {
                NameSource::FromSelection(selection.to_string())
            }
            _ => NameSource::FromPrompt(prompt),
        }
    }
}

/// How a single note command invocation ended.
#[derive(Debug)]
pub enum Outcome {
    /// The selection was replaced by a link to the note.
    Linked(NoteResult),
    /// The note was opened in the editor.
    Opened(NoteResult),
    /// The name was blank.
    Skipped,
    /// The prompt was dismissed.
    Cancelled,
    Failed(NoteError),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn note(&self) -> Option<&NoteResult> {
        match self {
            Outcome::Linked(result) | Outcome::Opened(result) => Some(result),
            _ => None,
        }
    }
}

/// Runs one note command against `folder`. Errors are reported through
/// `notifier` and returned as [`Outcome::Failed`], never propagated.
///
/// A note named from the selection is linked in place of it; a note named at
/// the prompt is opened instead.
pub fn run_note_command<T: VaultProvider + ?Sized>(
    vault: &mut T,
    folder: &FolderShortcut,
    editor: &mut dyn Editor,
    prompt: &mut dyn NamePrompt,
    notifier: &mut dyn Notifier,
    policy: ValidationPolicy,
) -> Outcome {
    match execute(vault, folder, editor, prompt, notifier, policy) {
        Ok(outcome) => outcome,
        Err(error) => {
            warn!("note command for {} failed: {}", folder.folder_path, error);
            notifier.notify(Notice::error(error.to_string()));
            Outcome::Failed(error)
        }
    }
}

fn execute<T: VaultProvider + ?Sized>(
    vault: &mut T,
    folder: &FolderShortcut,
    editor: &mut dyn Editor,
    prompt: &mut dyn NamePrompt,
    notifier: &mut dyn Notifier,
    policy: ValidationPolicy,
) -> Result<Outcome> {
    let (raw_name, from_selection) = match NameSource::pick(&*editor, prompt) {
        NameSource::FromSelection(text) => (text, true),
        NameSource::FromPrompt(prompt) => match prompt.ask()? {
            Some(text) => (text, false),
            None => {
                debug!("prompt dismissed. nothing to create.");
                return Ok(Outcome::Cancelled);
            }
        },
    };

    let request = NoteRequest::new(raw_name, folder.clone());
    let result = match create_note(vault, &request, policy)? {
        Some(result) => result,
        None => return Ok(Outcome::Skipped),
    };

    if !result.created {
        notifier.notify(Notice::info(format!(
            "{} already exists, linking instead",
            result.path
        )));
    }

    if from_selection {
        editor.replace_selection(&Wikilink::to_note(&result).to_string())?;
        Ok(Outcome::Linked(result))
    } else {
        editor.open_note(&result.path)?;
        Ok(Outcome::Opened(result))
    }
}
