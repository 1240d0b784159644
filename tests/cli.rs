#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Env {
    temp: TempDir,
    config: PathBuf,
}

impl Env {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let vault = temp.path().join("vault");
        fs::create_dir_all(&vault).unwrap();

        let config = temp.path().join("folder_notes.toml");
        fs::write(
            &config,
            format!(
                "vault_directory = {:?}\nlog_file = {:?}\neditor = \"true\"\n",
                vault.to_str().unwrap(),
                temp.path().join("fnote.log").to_str().unwrap()
            ),
        )
        .unwrap();

        Env { temp, config }
    }

    fn vault(&self) -> PathBuf {
        self.temp.path().join("vault")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("fnote"));
        cmd.env("FOLDER_NOTES_CONFIG", self.config.as_os_str());
        cmd
    }

    fn add_folder(&self, path: &str) {
        self.cmd().args(["folders", "add", path]).assert().success();
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_folder_shortcuts_persist_in_order() {
    let env = Env::new();
    env.add_folder("Ideas");
    env.add_folder("Journal");

    env.cmd()
        .args(["folders", "list"])
        .assert()
        .success()
        .stdout("1\tdefault\n2\tIdeas\n3\tJournal\n");

    env.cmd()
        .args(["folders", "remove", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Removed folder shortcut 1: default",
        ));

    env.cmd()
        .args(["folders", "list"])
        .assert()
        .success()
        .stdout("1\tIdeas\n2\tJournal\n");

    let settings = read(&env.vault().join(".folder-notes").join("settings.toml"));
    assert!(settings.contains("folderName = \"Ideas\""));
}

#[test]
fn test_remove_out_of_range_fails() {
    let env = Env::new();
    env.cmd()
        .args(["folders", "remove", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no folder shortcut at position 5"));
}

#[test]
fn test_commands_are_derived_from_folders() {
    let env = Env::new();
    env.add_folder("Ideas");

    env.cmd()
        .arg("commands")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "create-note-from-highlight-Ideas\tCreate note in folder Ideas",
        ))
        .stdout(predicate::str::contains(
            "create-note-from-highlight-default",
        ));
}

#[test]
fn test_selection_becomes_link_and_note() {
    let env = Env::new();
    env.add_folder("Ideas");

    env.cmd()
        .args(["run", "Ideas", "--selection", "My Idea"])
        .assert()
        .success()
        .stdout("[[Ideas/My Idea.md|My Idea]]");

    let note = env.vault().join("Ideas").join("My Idea.md");
    assert!(env.vault().join("Ideas").is_dir());
    assert_eq!(read(&note), "");
}

#[test]
fn test_piped_selection_is_filtered() {
    let env = Env::new();
    env.add_folder("Ideas");

    env.cmd()
        .args(["run", "create-note-from-highlight-Ideas"])
        .write_stdin("My Idea\n")
        .assert()
        .success()
        .stdout("[[Ideas/My Idea.md|My Idea]]\n");
}

#[test]
fn test_invalid_selection_is_echoed_back() {
    let env = Env::new();
    env.add_folder("Ideas");

    env.cmd()
        .args(["run", "Ideas"])
        .write_stdin("Bad:Name\n")
        .assert()
        .failure()
        .stdout("Bad:Name\n")
        .stderr(predicate::str::contains("disallowed character ':'"));

    assert!(!env.vault().join("Ideas").exists());
}

#[test]
fn test_undecodable_selection_is_echoed_back() {
    let env = Env::new();
    env.add_folder("Ideas");
    let selection: &'static [u8] = b"Caf\xe9 Idea\n";

    env.cmd()
        .args(["run", "Ideas"])
        .write_stdin(selection)
        .assert()
        .failure()
        .stdout(selection)
        .stderr(predicate::str::contains("not valid UTF-8"));

    assert!(!env.vault().join("Ideas").exists());
}

#[test]
fn test_existing_note_is_reused() {
    let env = Env::new();
    env.add_folder("Ideas");
    fs::create_dir_all(env.vault().join("Ideas")).unwrap();
    fs::write(env.vault().join("Ideas").join("My Idea.md"), "keep me").unwrap();

    env.cmd()
        .args(["run", "Ideas", "--selection", "My Idea"])
        .assert()
        .success()
        .stdout("[[Ideas/My Idea.md|My Idea]]")
        .stderr(predicate::str::contains("already exists, linking instead"));

    assert_eq!(
        read(&env.vault().join("Ideas").join("My Idea.md")),
        "keep me"
    );
}

#[test]
fn test_file_selection_is_replaced_in_place() {
    let env = Env::new();
    env.add_folder("Ideas");
    let document = env.temp.path().join("today.md");
    fs::write(&document, "Thinking about My Idea again").unwrap();

    env.cmd()
        .args(["run", "Ideas", "--file"])
        .arg(&document)
        .args(["--range", "15:22"])
        .assert()
        .success();

    assert_eq!(
        read(&document),
        "Thinking about [[Ideas/My Idea.md|My Idea]] again"
    );
}

#[test]
fn test_prompt_answer_opens_note() {
    let env = Env::new();
    env.add_folder("Ideas");
    fs::create_dir_all(env.vault().join("Ideas")).unwrap();

    env.cmd()
        .args(["run", "Ideas", "--name", "Second Note"])
        .assert()
        .success()
        .stdout("");

    assert!(env.vault().join("Ideas").join("Second Note.md").is_file());
}

#[test]
fn test_blank_name_creates_nothing() {
    let env = Env::new();
    env.add_folder("Ideas");

    env.cmd()
        .args(["run", "Ideas", "--name", "   "])
        .assert()
        .success();

    assert!(!env.vault().join("Ideas").exists());
}

#[test]
fn test_unknown_command_fails() {
    let env = Env::new();

    env.cmd()
        .args(["run", "Nowhere", "--selection", "My Idea"])
        .assert()
        .failure()
        .stdout("My Idea")
        .stderr(predicate::str::contains("no command registered as Nowhere"));
}

#[test]
fn test_config_generate_prints_defaults() {
    let env = Env::new();
    env.cmd()
        .args(["config", "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("validation = \"strict\""));
}
