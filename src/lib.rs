//! Create notes inside configured vault folders, named after the current
//! selection or a prompt, and link back to them.
//!
//! The workflow lives in [`actions`]. Everything it talks to sits behind a
//! trait: [`providers::VaultProvider`] for storage, [`editor::Editor`] for the
//! selection, [`prompt::NamePrompt`] for asking and [`notice::Notifier`] for
//! user-facing messages. [`plugin::start`] wires them to the folder shortcuts
//! kept by [`settings::FolderRegistry`].

pub mod actions;
pub mod config;
pub mod editor;
pub mod error;
pub mod link;
pub mod note;
pub mod notice;
pub mod plugin;
pub mod prompt;
pub mod providers;
pub mod settings;

pub use actions::{create_note, run_note_command, NameSource, Outcome, ValidationPolicy};
pub use error::{NoteError, Result};
pub use link::Wikilink;
pub use note::{FolderShortcut, NoteRequest, NoteResult};
