//! Configuration: a TOML file with a `[keys]` binding map and a list of
//! `[[palettes]]`, overlaid on built-in defaults. The assembled `Config` is
//! immutable for the session and injected into the chooser at construction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::{LinksiftError, Result};
use crate::keyboard::KeyMap;
use crate::theme::{self, Palette};

/// The on-disk shape of the config file. Both sections are optional;
/// whatever is present overlays the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub keys: BTreeMap<String, String>,
    #[serde(default)]
    pub palettes: Vec<Palette>,
}

impl ConfigFile {
    /// Load the config file if it exists. A malformed file falls back to
    /// defaults with a warning; only an unreadable existing file is an
    /// error anywhere else in the program, and even that is tolerated here.
    pub fn load(path: &PathBuf) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                tracing::warn!("cannot read {}: {}; using defaults", path.display(), err);
                return Self::default();
            }
        };
        match toml::from_str(&text) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!("malformed config {}: {}; using defaults", path.display(), err);
                Self::default()
            }
        }
    }
}

/// Session configuration: the parsed config file merged with CLI flags.
#[derive(Debug, Clone)]
pub struct Config {
    pub keymap: KeyMap,
    pub palettes: Vec<Palette>,
    /// Display width; 0 means "use the terminal width".
    pub width: u16,
    pub reverse: bool,
    pub compact: bool,
    pub nohelp: bool,
    pub single: bool,
    pub whitespace_off: bool,
    pub pipe: bool,
    pub run: Option<String>,
    pub run_safe: Option<String>,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self::assemble(cli, ConfigFile::load(&config_path()))
    }

    pub fn assemble(cli: &Cli, file: ConfigFile) -> Self {
        Self {
            keymap: KeyMap::with_overrides(&file.keys),
            palettes: theme::merge_palettes(file.palettes),
            width: cli.width,
            reverse: cli.reverse,
            compact: cli.compact,
            nohelp: cli.nohelp,
            single: cli.single,
            whitespace_off: cli.whitespace_off,
            pipe: cli.pipe,
            run: cli.run.clone(),
            run_safe: cli.run_safe.clone(),
        }
    }
}

/// `$XDG_CONFIG_HOME/linksift/config.toml` (or the platform equivalent).
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("linksift")
        .join("config.toml")
}

/// Render the full default configuration as a commented template.
pub fn default_template() -> String {
    let defaults = ConfigFile {
        keys: KeyMap::default_labels(),
        palettes: theme::builtin_palettes(),
    };
    let body = toml::to_string_pretty(&defaults).expect("defaults serialize");
    format!(
        "# linksift configuration\n\
         #\n\
         # [keys] maps action names to key labels (\"ctrl+l\", \"f1\", \"G\", ...).\n\
         # An empty string unbinds the action.\n\
         #\n\
         # [[palettes]] entries are cycled in order at runtime; a palette\n\
         # reusing a built-in name (\"default\", \"mono\") replaces it.\n\n{}",
        body
    )
}

/// `--genconf`: write the template and report where it went.
pub fn write_template() -> Result<PathBuf> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| LinksiftError::Config(format!("cannot create {}: {}", parent.display(), e)))?;
    }
    fs::write(&path, default_template())
        .map_err(|e| LinksiftError::Config(format!("cannot write {}: {}", path.display(), e)))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_round_trips_through_the_parser() {
        let parsed: ConfigFile = toml::from_str(&default_template()).unwrap();
        assert_eq!(parsed.keys.get("quit").map(String::as_str), Some("q"));
        assert_eq!(parsed.palettes.len(), 2);
        assert_eq!(parsed.palettes[0].name, "default");
    }

    #[test]
    fn empty_file_means_defaults() {
        let parsed: ConfigFile = toml::from_str("").unwrap();
        assert!(parsed.keys.is_empty());
        assert!(parsed.palettes.is_empty());
    }
}
