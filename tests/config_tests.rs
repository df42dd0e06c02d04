use std::fs;

use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use linksift::cli::Cli;
use linksift::config::{default_template, Config, ConfigFile};
use linksift::keyboard::UiAction;

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

#[test]
fn generated_template_round_trips_and_covers_everything() {
    let parsed: ConfigFile = toml::from_str(&default_template()).unwrap();
    for action in UiAction::ALL {
        assert!(
            parsed.keys.contains_key(action.name()),
            "template is missing action {:?}",
            action.name()
        );
    }
    let names: Vec<&str> = parsed.palettes.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["default", "mono"]);
}

#[test]
fn absent_file_means_builtin_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = ConfigFile::load(&dir.path().join("nope.toml"));
    assert!(loaded.keys.is_empty());
    assert!(loaded.palettes.is_empty());
}

#[test]
fn malformed_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "keys = \"this is not a table\"").unwrap();
    let loaded = ConfigFile::load(&path);
    assert!(loaded.keys.is_empty(), "malformed sections fall back, no panic");
}

#[test]
fn file_overlays_only_the_keys_it_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[keys]\ndown = \"n\"\n").unwrap();
    let file = ConfigFile::load(&path);
    let config = Config::assemble(&Cli::parse_from(["linksift"]), file);

    assert_eq!(config.keymap.lookup(&key('n')), Some(UiAction::Down));
    assert_eq!(config.keymap.lookup(&key('j')), None, "rebinding drops the default");
    // Unnamed actions keep their defaults.
    assert_eq!(config.keymap.lookup(&key('q')), Some(UiAction::Quit));
    assert_eq!(config.keymap.lookup(&key('/')), Some(UiAction::Search));
    // No palettes in the file: builtins survive.
    assert_eq!(config.palettes.len(), 2);
}

#[test]
fn config_palettes_extend_the_builtins() {
    let toml_text = r#"
        [[palettes]]
        name = "paper"

        [palettes.header]
        fg = "black"
        bg = "white"
        bold = true

        [palettes.footer]
        fg = "black"
        bg = "white"

        [palettes.status]
        fg = "red"
        bg = "white"

        [palettes.msgtext]
        fg = "black"
        bg = "white"

        [palettes.ellipsis]
        fg = "gray"
        bg = "white"

        [palettes.url]
        fg = "blue"
        bg = "white"

        [palettes.index]
        fg = "red"
        bg = "white"

        [palettes.focus]
        fg = "white"
        bg = "blue"

        [palettes.search]
        fg = "white"
        bg = "cyan"
    "#;
    let file: ConfigFile = toml::from_str(toml_text).unwrap();
    let config = Config::assemble(&Cli::parse_from(["linksift"]), file);
    let names: Vec<&str> = config.palettes.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["default", "mono", "paper"]);
}

#[test]
fn cli_flags_flow_into_the_session_config() {
    let cli = Cli::parse_from([
        "linksift",
        "--reverse",
        "--single",
        "--nohelp",
        "--width",
        "100",
        "--run-safe",
        "handler {}",
        "--pipe",
    ]);
    let config = Config::assemble(&cli, ConfigFile::default());
    assert!(config.reverse);
    assert!(config.single);
    assert!(config.nohelp);
    assert!(config.pipe);
    assert_eq!(config.width, 100);
    assert_eq!(config.run_safe.as_deref(), Some("handler {}"));
    assert_eq!(config.run, None);
}
