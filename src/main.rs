use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use folder_notes::actions::Outcome;
use folder_notes::config::{default_config_path, Config, CONFIG_ENV_VAR};
use folder_notes::editor::{BufferEditor, StdioEditor};
use folder_notes::error::NoteError;
use folder_notes::notice::{Notice, Notifier, TerminalNotifier};
use folder_notes::plugin::{self, NoteCommand};
use folder_notes::prompt::{FixedPrompt, NamePrompt, TerminalPrompt};
use folder_notes::providers::FileSystemVaultProvider;
use folder_notes::settings::{FolderRegistry, TomlSettingsStore};
use log::{debug, error, warn, LevelFilter};
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode, Stdio};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Create notes in vault folders and link back to them",
    long_about = None
)]
struct Args {
    /// Config file, defaults to ~/.folder_notes.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List the note commands, one per folder shortcut
    Commands,

    /// Run a note command, by id or by folder
    Run {
        target: String,

        /// Selected text. Piped stdin is used when absent.
        #[arg(long, conflicts_with_all = ["file", "range"])]
        selection: Option<String>,

        /// Document holding the selection
        #[arg(long, requires = "range")]
        file: Option<PathBuf>,

        /// Selected byte range in --file, as START:END
        #[arg(long, requires = "file")]
        range: Option<String>,

        /// Answer the name prompt without asking
        #[arg(long)]
        name: Option<String>,
    },

    /// Manage folder shortcuts
    Folders {
        #[command(subcommand)]
        action: FolderAction,
    },

    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum FolderAction {
    List,
    Add { path: String },
    /// Remove the shortcut at INDEX (1-based)
    Remove { index: usize },
    /// Change the path of the shortcut at INDEX (1-based)
    Set { index: usize, path: String },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print a sample config file
    Generate,
    /// Print the resolved configuration
    Show,
}

fn config_path(args: &Args) -> PathBuf {
    match &args.config {
        Some(path) => path.clone(),
        None => env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path),
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        config.get_log_level()
    };

    if let Err(error) = simple_logging::log_to_file(config.get_log_file(), level) {
        simple_logging::log_to_stderr(level);
        warn!("could not log to {}: {}", config.get_log_file(), error);
    }
}

fn launch_editor(filename: &Path, editor: &str) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts.next().context("no editor configured")?;
    let status = Command::new(program)
        .args(parts)
        .arg(filename)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .status()
        .with_context(|| format!("failed to launch editor {}", editor))?;

    if !status.success() {
        warn!("editor {} exited with {}", editor, status);
    }
    Ok(())
}

fn parse_range(range: &str) -> Result<Range<usize>> {
    let (start, end) = range
        .split_once(':')
        .with_context(|| format!("range {} must look like START:END", range))?;
    let start = start.trim().parse::<usize>().context("invalid range start")?;
    let end = end.trim().parse::<usize>().context("invalid range end")?;
    Ok(start..end)
}

/// Raw bytes, so undecodable input can still be handed back untouched.
fn piped_selection() -> Result<Option<Vec<u8>>> {
    let stdin = io::stdin();
    if termion::is_tty(&stdin) {
        return Ok(None);
    }

    let mut buffer = Vec::new();
    stdin
        .lock()
        .read_to_end(&mut buffer)
        .context("could not read the selection from stdin")?;
    Ok(Some(buffer))
}

fn list_commands(config: &Config) -> Result<ExitCode> {
    let handle = plugin::start(
        FileSystemVaultProvider::new(config.get_vault_directory()),
        TomlSettingsStore::new(config.get_settings_path()),
        config.get_validation(),
    )?;

    for NoteCommand { id, name, .. } in handle.commands() {
        println!("{}\t{}", id, name);
    }
    plugin::stop(handle);
    Ok(ExitCode::SUCCESS)
}

fn run_note(
    config: &Config,
    target: String,
    selection: Option<String>,
    file: Option<PathBuf>,
    range: Option<String>,
    name: Option<String>,
) -> Result<ExitCode> {
    let mut handle = plugin::start(
        FileSystemVaultProvider::new(config.get_vault_directory()),
        TomlSettingsStore::new(config.get_settings_path()),
        config.get_validation(),
    )?;

    let id = match handle.resolve(&target) {
        Some(command) => command.id.clone(),
        None => target,
    };

    let mut prompt: Box<dyn NamePrompt> = match name {
        Some(name) => Box::new(FixedPrompt(Some(name))),
        None => Box::new(TerminalPrompt::default()),
    };
    let stderr = io::stderr();
    let colored = termion::is_tty(&stderr);
    let mut notifier = TerminalNotifier::new(stderr, colored);

    let outcome = match (file, range) {
        (Some(file), Some(range)) => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("could not read {}", file.display()))?;
            let mut editor = BufferEditor::new(text, parse_range(&range)?)?;
            let outcome = handle.invoke(&id, &mut editor, prompt.as_mut(), &mut notifier);
            if let Outcome::Linked(_) = outcome {
                fs::write(&file, editor.text())
                    .with_context(|| format!("could not write {}", file.display()))?;
            }
            outcome
        }
        _ => {
            let selection = match selection {
                Some(selection) => Ok(Some(selection)),
                None => match piped_selection()? {
                    Some(bytes) => String::from_utf8(bytes).map(Some),
                    None => Ok(None),
                },
            };

            match selection {
                Ok(selection) => {
                    let mut editor = StdioEditor::new(selection, io::stdout());
                    let outcome = handle.invoke(&id, &mut editor, prompt.as_mut(), &mut notifier);
                    if let Some(path) = editor.opened() {
                        debug!("stdio editor asked to open {}", path);
                    }
                    editor.finish()?;
                    outcome
                }
                Err(undecodable) => {
                    let mut stdout = io::stdout();
                    stdout.write_all(undecodable.as_bytes())?;
                    stdout.flush()?;

                    let error =
                        NoteError::InvalidName(String::from("the selection is not valid UTF-8"));
                    notifier.notify(Notice::error(error.to_string()));
                    Outcome::Failed(error)
                }
            }
        }
    };

    match &outcome {
        Outcome::Opened(result) => {
            let note_file = handle.vault().resolve(&result.path)?;
            launch_editor(&note_file, config.get_editor())?;
        }
        Outcome::Failed(error) => error!("{} failed: {}", id, error),
        other => debug!("{} finished: {:?}", id, other),
    }

    plugin::stop(handle);
    if outcome.is_failure() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn manage_folders(config: &Config, action: FolderAction) -> Result<ExitCode> {
    let store = TomlSettingsStore::new(config.get_settings_path());
    let mut registry = FolderRegistry::load(store)?;

    match action {
        FolderAction::List => {
            for (index, folder) in registry.list().iter().enumerate() {
                if folder.is_empty() {
                    println!("{}\t<empty>", index + 1);
                } else {
                    println!("{}\t{}", index + 1, folder.folder_path);
                }
            }
        }
        FolderAction::Add { path } => {
            registry.add(path.clone())?;
            println!("Added folder shortcut {}: {}", registry.list().len(), path);
        }
        FolderAction::Remove { index } => {
            if index == 0 {
                bail!("folder shortcuts are numbered from 1");
            }
            let removed = registry.remove_at(index - 1)?;
            println!("Removed folder shortcut {}: {}", index, removed.folder_path);
        }
        FolderAction::Set { index, path } => {
            if index == 0 {
                bail!("folder shortcuts are numbered from 1");
            }
            registry.update(index - 1, path.clone())?;
            println!("Folder shortcut {} is now {}", index, path);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run(args: Args) -> Result<ExitCode> {
    let config_file = config_path(&args);
    let config = Config::load(&config_file)
        .with_context(|| format!("could not load {}", config_file.display()))?;
    init_logging(&config, args.verbose);
    debug!("loaded config from {}", config_file.display());

    match args.command {
        Cmd::Commands => list_commands(&config),
        Cmd::Run {
            target,
            selection,
            file,
            range,
            name,
        } => run_note(&config, target, selection, file, range, name),
        Cmd::Folders { action } => manage_folders(&config, action),
        Cmd::Config { action } => {
            let table = match action {
                ConfigAction::Generate => Config::generate(),
                ConfigAction::Show => config.to_table(),
            };
            print!("{}", toml::to_string(&table)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}
