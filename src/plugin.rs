use crate::actions::{run_note_command, Outcome, ValidationPolicy};
use crate::editor::Editor;
use crate::error::{NoteError, Result};
use crate::note::FolderShortcut;
use crate::notice::{Notice, Notifier};
use crate::prompt::NamePrompt;
use crate::providers::provider::VaultProvider;
use crate::settings::{FolderRegistry, SettingsStore};

use log::{debug, info, warn};

pub const COMMAND_ID_PREFIX: &str = "create-note-from-highlight-";

/// A note command bound to one folder shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCommand {
    pub id: String,
    pub name: String,
    pub folder: FolderShortcut,
}

impl NoteCommand {
    pub fn for_folder(folder: &FolderShortcut) -> Self {
        NoteCommand {
            id: format!("{}{}", COMMAND_ID_PREFIX, folder.folder_path),
            name: format!("Create note in folder {}", folder.folder_path),
            folder: folder.clone(),
        }
    }
}

/// Derives one command per usable shortcut, in registry order. Empty paths
/// are skipped and the first shortcut wins when two share an id.
pub fn register_commands(folders: &[FolderShortcut]) -> Vec<NoteCommand> {
    let mut commands: Vec<NoteCommand> = Vec::new();
    for (index, folder) in folders.iter().enumerate() {
        if folder.is_empty() {
            warn!(
                "not registering a command for folder shortcut {}: empty path",
                index + 1
            );
            continue;
        }

        let command = NoteCommand::for_folder(folder);
        if commands.iter().any(|existing| existing.id == command.id) {
            warn!(
                "duplicate folder shortcut {}, keeping the first",
                folder.folder_path
            );
            continue;
        }

        debug!("registered command {}", command.id);
        commands.push(command);
    }
    commands
}

/// A running instance. Commands are derived once at start: registry edits
/// made through [`Handle::registry_mut`] only show up as commands after a
/// restart.
pub struct Handle<V: VaultProvider, S: SettingsStore> {
    vault: V,
    registry: FolderRegistry<S>,
    commands: Vec<NoteCommand>,
    policy: ValidationPolicy,
}

pub fn start<V: VaultProvider, S: SettingsStore>(
    vault: V,
    store: S,
    policy: ValidationPolicy,
) -> Result<Handle<V, S>> {
    let registry = FolderRegistry::load(store)?;
    let commands = register_commands(registry.list());
    info!(
        "started with {} folder shortcuts, {} commands, {} validation",
        registry.list().len(),
        commands.len(),
        policy
    );

    Ok(Handle {
        vault,
        registry,
        commands,
        policy,
    })
}

/// Unregisters every command and hands back the collaborators.
pub fn stop<V: VaultProvider, S: SettingsStore>(handle: Handle<V, S>) -> (V, FolderRegistry<S>) {
    info!("stopping, unregistering {} commands", handle.commands.len());
    (handle.vault, handle.registry)
}

impl<V: VaultProvider, S: SettingsStore> Handle<V, S> {
    pub fn commands(&self) -> &[NoteCommand] {
        &self.commands
    }

    pub fn command(&self, id: &str) -> Option<&NoteCommand> {
        self.commands.iter().find(|command| command.id == id)
    }

    /// Looks a command up by id, or by the folder path it was derived from.
    pub fn resolve(&self, target: &str) -> Option<&NoteCommand> {
        self.command(target).or_else(|| {
            self.commands
                .iter()
                .find(|command| command.folder.folder_path == target)
        })
    }

    pub fn registry_mut(&mut self) -> &mut FolderRegistry<S> {
        &mut self.registry
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn invoke(
        &mut self,
        id: &str,
        editor: &mut dyn Editor,
        prompt: &mut dyn NamePrompt,
        notifier: &mut dyn Notifier,
    ) -> Outcome {
        let folder = match self.command(id) {
            Some(command) => command.folder.clone(),
            None => {
                let error = NoteError::InvalidConfig(format!("no command registered as {}", id));
                notifier.notify(Notice::error(error.to_string()));
                return Outcome::Failed(error);
            }
        };

        debug!("invoking {}", id);
        run_note_command(
            &mut self.vault,
            &folder,
            editor,
            prompt,
            notifier,
            self.policy,
        )
    }
}
