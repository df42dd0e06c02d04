//! The chooser's state machine, kept free of any terminal handle so every
//! transition is testable with an injected configuration.
//!
//! The shell (`chooser::Chooser`) feeds `UiAction`s in and executes the
//! returned `Effect`s; the state machine owns the cursor, queue, toggles,
//! search, and mode flags. All mutation happens synchronously per action.

use crate::config::Config;
use crate::dispatch::HandlerMode;
use crate::extract::LinkEntry;
use crate::keyboard::UiAction;

/// Modal state. `Listing` is the default; `Searching` captures keystrokes
/// into the pattern. The help overlay and the queue are orthogonal flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Listing,
    Searching,
}

/// What the shell must do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Force a full terminal repaint.
    Redraw,
    /// Dispatch these targets through the active handler, in order.
    Open {
        targets: Vec<String>,
        new_window: bool,
    },
    /// Copy to clipboard or primary selection.
    Copy { text: String, primary: bool },
    Quit,
}

pub struct ChooserState {
    entries: Vec<LinkEntry>,
    /// Indices into `entries` in display order (reverse is a pure view
    /// transform; `entries` itself is never reordered).
    visible: Vec<usize>,
    cursor: usize,
    /// Queued entry indices, insertion-ordered, membership unique.
    queue: Vec<usize>,
    mode: Mode,
    search_pattern: String,
    search_origin: usize,
    digits: String,
    pub show_context: bool,
    pub help_visible: bool,
    pub palette_idx: usize,
    palette_count: usize,
    pub handler: HandlerMode,
    has_command: bool,
    status: Option<String>,
    single: bool,
    quitting: bool,
}

impl ChooserState {
    pub fn new(entries: Vec<LinkEntry>, config: &Config, initial_handler: HandlerMode, has_command: bool) -> Self {
        let mut visible: Vec<usize> = (0..entries.len()).collect();
        if config.reverse {
            visible.reverse();
        }
        Self {
            entries,
            visible,
            cursor: 0,
            queue: Vec::new(),
            mode: Mode::Listing,
            search_pattern: String::new(),
            search_origin: 0,
            digits: String::new(),
            show_context: !config.compact,
            help_visible: false,
            palette_idx: 0,
            palette_count: config.palettes.len().max(1),
            handler: initial_handler,
            has_command,
            status: None,
            single: config.single,
            quitting: false,
        }
    }

    // --- read accessors used by the renderer and tests ---

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn search_pattern(&self) -> &str {
        &self.search_pattern
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.quitting
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Entries in display order as (display index, entry, queued, under cursor).
    pub fn visible_entries(&self) -> impl Iterator<Item = (usize, &LinkEntry, bool, bool)> {
        self.visible.iter().enumerate().map(move |(pos, &idx)| {
            (
                pos + 1,
                &self.entries[idx],
                self.queue.contains(&idx),
                pos == self.cursor,
            )
        })
    }

    pub fn entry_under_cursor(&self) -> Option<&LinkEntry> {
        self.visible.get(self.cursor).map(|&idx| &self.entries[idx])
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    // --- numeric jump ---

    /// Digits accumulate until a lull or the next action commits them.
    pub fn push_digit(&mut self, digit: char) {
        debug_assert!(digit.is_ascii_digit());
        self.status = None;
        self.digits.push(digit);
    }

    pub fn has_pending_digits(&self) -> bool {
        !self.digits.is_empty()
    }

    /// Jump to the accumulated display index (1-based), if it exists.
    pub fn commit_digits(&mut self) {
        if self.digits.is_empty() {
            return;
        }
        if let Ok(n) = self.digits.parse::<usize>() {
            if n >= 1 && n <= self.visible.len() {
                self.cursor = n - 1;
            } else {
                self.status = Some(format!("no link [{}]", n));
            }
        }
        self.digits.clear();
    }

    // --- incremental search ---

    pub fn search_input(&mut self, c: char) {
        self.search_pattern.push(c);
        self.apply_search();
    }

    pub fn search_backspace(&mut self) {
        self.search_pattern.pop();
        self.apply_search();
    }

    /// Enter: keep the cursor where the search put it.
    pub fn search_commit(&mut self) {
        self.mode = Mode::Listing;
        self.search_pattern.clear();
    }

    /// Escape: discard the cursor move.
    pub fn search_cancel(&mut self) {
        self.cursor = self.search_origin;
        self.mode = Mode::Listing;
        self.search_pattern.clear();
    }

    /// Move the cursor to the nearest visible entry at or after the search
    /// origin whose text contains the pattern, wrapping past the end.
    fn apply_search(&mut self) {
        if self.search_pattern.is_empty() || self.visible.is_empty() {
            self.cursor = self.search_origin;
            return;
        }
        let needle = self.search_pattern.to_lowercase();
        let len = self.visible.len();
        for step in 0..len {
            let pos = (self.search_origin + step) % len;
            let entry = &self.entries[self.visible[pos]];
            if entry.text.to_lowercase().contains(&needle) {
                self.cursor = pos;
                return;
            }
        }
        self.cursor = self.search_origin;
    }

    // --- the transition table ---

    pub fn apply(&mut self, action: UiAction) -> Effect {
        self.status = None;
        self.commit_digits();
        if self.visible.is_empty() && needs_entries(action) {
            return Effect::None;
        }
        match action {
            UiAction::Down => {
                self.cursor = (self.cursor + 1) % self.visible.len();
                Effect::None
            }
            UiAction::Up => {
                self.cursor = (self.cursor + self.visible.len() - 1) % self.visible.len();
                Effect::None
            }
            UiAction::Top => {
                self.cursor = 0;
                Effect::None
            }
            UiAction::Bottom => {
                self.cursor = self.visible.len() - 1;
                Effect::None
            }
            UiAction::Open => {
                let target = self.entries[self.visible[self.cursor]].target();
                Effect::Open {
                    targets: vec![target],
                    new_window: false,
                }
            }
            UiAction::Queue => {
                let idx = self.visible[self.cursor];
                match self.queue.iter().position(|&q| q == idx) {
                    Some(pos) => {
                        self.queue.remove(pos);
                        self.status = Some(format!("removed from queue ({} queued)", self.queue.len()));
                    }
                    None => {
                        self.queue.push(idx);
                        self.status = Some(format!("queued ({} queued)", self.queue.len()));
                    }
                }
                Effect::None
            }
            UiAction::OpenQueue | UiAction::OpenQueueWindows => {
                if self.queue.is_empty() {
                    self.status = Some("queue is empty".to_string());
                    return Effect::None;
                }
                let targets = self
                    .queue
                    .drain(..)
                    .map(|idx| self.entries[idx].target())
                    .collect();
                Effect::Open {
                    targets,
                    new_window: action == UiAction::OpenQueueWindows,
                }
            }
            UiAction::Context => {
                self.show_context = !self.show_context;
                Effect::None
            }
            UiAction::Shorten => {
                let idx = self.visible[self.cursor];
                self.entries[idx].shortened = !self.entries[idx].shortened;
                Effect::None
            }
            UiAction::ShortenAll => {
                for entry in &mut self.entries {
                    entry.shortened = !entry.shortened;
                }
                Effect::None
            }
            UiAction::ToggleEscape => {
                for entry in &mut self.entries {
                    entry.escaped = !entry.escaped;
                }
                Effect::None
            }
            UiAction::Search => {
                self.mode = Mode::Searching;
                self.search_pattern.clear();
                self.search_origin = self.cursor;
                Effect::None
            }
            UiAction::CycleHandler => {
                self.handler = self.handler.next(self.has_command);
                self.status = Some(format!("link handler: {}", self.handler.label()));
                Effect::None
            }
            UiAction::CyclePalette => {
                self.palette_idx = (self.palette_idx + 1) % self.palette_count;
                Effect::Redraw
            }
            UiAction::Clipboard => Effect::Copy {
                text: self.entries[self.visible[self.cursor]].target(),
                primary: false,
            },
            UiAction::Primary => Effect::Copy {
                text: self.entries[self.visible[self.cursor]].target(),
                primary: true,
            },
            UiAction::Help => {
                self.help_visible = !self.help_visible;
                Effect::None
            }
            UiAction::Redraw => Effect::Redraw,
            UiAction::Quit => {
                self.quitting = true;
                Effect::Quit
            }
        }
    }

    /// The shell reports how an `Open` or `Copy` effect went. A successful
    /// dispatch in single-shot mode ends the session.
    pub fn note_dispatch(&mut self, succeeded: usize, failed: usize) {
        if failed > 0 {
            self.status = Some(format!("{} dispatched, {} failed", succeeded, failed));
        } else if succeeded > 1 {
            self.status = Some(format!("opened {} links", succeeded));
        }
        if succeeded > 0 && failed == 0 && self.single {
            self.quitting = true;
        }
    }
}

/// Actions that are meaningless on an empty result list.
fn needs_entries(action: UiAction) -> bool {
    !matches!(
        action,
        UiAction::Help | UiAction::Redraw | UiAction::Quit | UiAction::CyclePalette | UiAction::CycleHandler
    )
}
