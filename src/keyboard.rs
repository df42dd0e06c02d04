//! Key handling: parse key labels from the config file, map keypresses to
//! chooser actions, and describe bindings for the help overlay.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::BTreeMap;
use std::fmt;

/// Everything the chooser can be asked to do from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Down,
    Up,
    Top,
    Bottom,
    Open,
    Queue,
    OpenQueue,
    OpenQueueWindows,
    Context,
    Shorten,
    ShortenAll,
    ToggleEscape,
    Search,
    CycleHandler,
    CyclePalette,
    Clipboard,
    Primary,
    Help,
    Redraw,
    Quit,
}

impl UiAction {
    pub const ALL: &'static [UiAction] = &[
        UiAction::Down,
        UiAction::Up,
        UiAction::Top,
        UiAction::Bottom,
        UiAction::Open,
        UiAction::Queue,
        UiAction::OpenQueue,
        UiAction::OpenQueueWindows,
        UiAction::Context,
        UiAction::Shorten,
        UiAction::ShortenAll,
        UiAction::ToggleEscape,
        UiAction::Search,
        UiAction::CycleHandler,
        UiAction::CyclePalette,
        UiAction::Clipboard,
        UiAction::Primary,
        UiAction::Help,
        UiAction::Redraw,
        UiAction::Quit,
    ];

    /// The name used in the config file's `[keys]` section.
    pub fn name(self) -> &'static str {
        match self {
            UiAction::Down => "down",
            UiAction::Up => "up",
            UiAction::Top => "top",
            UiAction::Bottom => "bottom",
            UiAction::Open => "open",
            UiAction::Queue => "queue",
            UiAction::OpenQueue => "open_queue",
            UiAction::OpenQueueWindows => "open_queue_windows",
            UiAction::Context => "context",
            UiAction::Shorten => "shorten",
            UiAction::ShortenAll => "shorten_all",
            UiAction::ToggleEscape => "escape",
            UiAction::Search => "search",
            UiAction::CycleHandler => "cycle_handler",
            UiAction::CyclePalette => "cycle_palette",
            UiAction::Clipboard => "clipboard",
            UiAction::Primary => "primary",
            UiAction::Help => "help",
            UiAction::Redraw => "redraw",
            UiAction::Quit => "quit",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            UiAction::Down => "Move down",
            UiAction::Up => "Move up",
            UiAction::Top => "Jump to first link",
            UiAction::Bottom => "Jump to last link",
            UiAction::Open => "Open the selected link",
            UiAction::Queue => "Add/remove link in queue",
            UiAction::OpenQueue => "Open all queued links",
            UiAction::OpenQueueWindows => "Open queued links in new windows",
            UiAction::Context => "Toggle context display",
            UiAction::Shorten => "Toggle shortened URL (selected)",
            UiAction::ShortenAll => "Toggle shortened URLs (all)",
            UiAction::ToggleEscape => "Toggle raw/decoded URL display",
            UiAction::Search => "Incremental search",
            UiAction::CycleHandler => "Cycle link handler",
            UiAction::CyclePalette => "Cycle color palette",
            UiAction::Clipboard => "Copy link to clipboard",
            UiAction::Primary => "Copy link to primary selection",
            UiAction::Help => "Toggle this help",
            UiAction::Redraw => "Redraw the screen",
            UiAction::Quit => "Quit",
        }
    }

    fn default_keys(self) -> &'static [&'static str] {
        match self {
            UiAction::Down => &["j", "down"],
            UiAction::Up => &["k", "up"],
            UiAction::Top => &["g", "home"],
            UiAction::Bottom => &["G", "end"],
            UiAction::Open => &["enter"],
            UiAction::Queue => &["a"],
            UiAction::OpenQueue => &["o"],
            UiAction::OpenQueueWindows => &["O"],
            UiAction::Context => &["c"],
            UiAction::Shorten => &["s"],
            UiAction::ShortenAll => &["S"],
            UiAction::ToggleEscape => &["u"],
            UiAction::Search => &["/"],
            UiAction::CycleHandler => &["b"],
            UiAction::CyclePalette => &["p"],
            UiAction::Clipboard => &["C"],
            UiAction::Primary => &["P"],
            UiAction::Help => &["f1", "?"],
            UiAction::Redraw => &["ctrl+l"],
            UiAction::Quit => &["q"],
        }
    }
}

/// A key with modifiers, parseable from config labels like `ctrl+l`,
/// `enter`, `f1`, or `G`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyPress {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Parse a config key label. Modifiers are joined with `+`; the final
    /// part is the key itself. Single characters are case-sensitive.
    pub fn parse(label: &str) -> Result<Self, String> {
        let parts: Vec<&str> = label.split('+').collect();
        let (mod_parts, key_part) = match parts.split_last() {
            Some((key, mods)) if !key.is_empty() => (mods, *key),
            _ => return Err(format!("invalid key label: {:?}", label)),
        };

        let mut mods = KeyModifiers::NONE;
        for part in mod_parts {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => mods |= KeyModifiers::CONTROL,
                "alt" => mods |= KeyModifiers::ALT,
                "shift" => mods |= KeyModifiers::SHIFT,
                other => return Err(format!("unknown modifier: {:?}", other)),
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "escape" | "esc" => KeyCode::Esc,
            "enter" | "return" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            lower if lower.starts_with('f') && lower.len() > 1 => {
                let n: u8 = lower[1..]
                    .parse()
                    .map_err(|_| format!("invalid key label: {:?}", label))?;
                if (1..=12).contains(&n) {
                    KeyCode::F(n)
                } else {
                    return Err(format!("invalid function key: {:?}", label));
                }
            }
            _ if key_part.chars().count() == 1 => {
                // Keep the original case so `G` and `g` stay distinct.
                KeyCode::Char(key_part.chars().next().unwrap())
            }
            other => return Err(format!("unknown key: {:?}", other)),
        };

        Ok(Self::new(code, mods))
    }

    /// Whether an incoming key event matches this binding. For character
    /// keys the shift modifier is folded into the character itself, so `G`
    /// matches shift+g as terminals actually report it.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if self.code != event.code {
            return false;
        }
        let strip = |m: KeyModifiers| {
            if matches!(self.code, KeyCode::Char(_)) {
                m - KeyModifiers::SHIFT
            } else {
                m
            }
        };
        strip(self.mods) == strip(event.modifiers)
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("alt".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("shift".to_string());
        }
        let key = match self.code {
            KeyCode::Esc => "esc".to_string(),
            KeyCode::Enter => "enter".to_string(),
            KeyCode::Tab => "tab".to_string(),
            KeyCode::Backspace => "backspace".to_string(),
            KeyCode::Delete => "del".to_string(),
            KeyCode::Home => "home".to_string(),
            KeyCode::End => "end".to_string(),
            KeyCode::PageUp => "pgup".to_string(),
            KeyCode::PageDown => "pgdn".to_string(),
            KeyCode::Up => "up".to_string(),
            KeyCode::Down => "down".to_string(),
            KeyCode::Left => "left".to_string(),
            KeyCode::Right => "right".to_string(),
            KeyCode::F(n) => format!("f{}", n),
            KeyCode::Char(' ') => "space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            _ => "?".to_string(),
        };
        parts.push(key);
        write!(f, "{}", parts.join("+"))
    }
}

/// The active binding table: defaults overlaid with config `[keys]`.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(KeyPress, UiAction)>,
}

impl KeyMap {
    /// Build from the config's `[keys]` section. A rebound action loses all
    /// of its default keys; an empty label unbinds the action entirely.
    /// Unknown action names and unparseable labels are warnings, not errors.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut bindings = Vec::new();
        for &action in UiAction::ALL {
            match overrides.get(action.name()) {
                Some(label) if label.is_empty() => {}
                Some(label) => match KeyPress::parse(label) {
                    Ok(key) => bindings.push((key, action)),
                    Err(err) => {
                        tracing::warn!("ignoring binding for {}: {}", action.name(), err);
                        for key in action.default_keys() {
                            bindings.push((KeyPress::parse(key).unwrap(), action));
                        }
                    }
                },
                None => {
                    for key in action.default_keys() {
                        bindings.push((KeyPress::parse(key).unwrap(), action));
                    }
                }
            }
        }
        for name in overrides.keys() {
            if !UiAction::ALL.iter().any(|a| a.name() == name) {
                tracing::warn!("unknown action in [keys]: {:?}", name);
            }
        }
        Self { bindings }
    }

    pub fn lookup(&self, event: &KeyEvent) -> Option<UiAction> {
        self.bindings
            .iter()
            .find(|(key, _)| key.matches(event))
            .map(|&(_, action)| action)
    }

    /// The first bound key for an action, for the help overlay.
    pub fn key_for(&self, action: UiAction) -> Option<String> {
        self.bindings
            .iter()
            .find(|&&(_, a)| a == action)
            .map(|(key, _)| key.to_string())
    }

    /// The default `[keys]` section, used by the config template.
    pub fn default_labels() -> BTreeMap<String, String> {
        UiAction::ALL
            .iter()
            .map(|a| (a.name().to_string(), a.default_keys()[0].to_string()))
            .collect()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::with_overrides(&BTreeMap::new())
    }
}
