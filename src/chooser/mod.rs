//! The interactive chooser: owns the terminal, renders the result list,
//! and drives the state machine in `state` from keypresses.
//!
//! crossterm is built with `use-dev-tty`, so keys come from /dev/tty and a
//! message piped on stdin never competes with the event loop.

pub mod state;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};

use crate::clipboard::ClipboardManager;
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::extract::LinkEntry;
use crate::keyboard::UiAction;
use crate::theme::{Palette, UiRole};

use state::{ChooserState, Effect, Mode};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// How long digits accumulate before a numeric jump fires on its own.
const DIGIT_TIMEOUT: Duration = Duration::from_millis(1000);
const IDLE_TICK: Duration = Duration::from_millis(250);

pub struct Chooser {
    state: ChooserState,
    config: Config,
    dispatcher: Dispatcher,
    clipboard: ClipboardManager,
}

impl Chooser {
    pub fn new(entries: Vec<LinkEntry>, config: Config) -> Self {
        let dispatcher = Dispatcher::new(config.run.clone(), config.run_safe.clone(), config.pipe);
        let state = ChooserState::new(
            entries,
            &config,
            dispatcher.initial_mode(),
            dispatcher.has_command(),
        );
        Self {
            state,
            config,
            dispatcher,
            clipboard: ClipboardManager::new(),
        }
    }

    /// Set up the terminal, run the session, and always restore the
    /// terminal afterwards.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut Term) -> Result<()> {
        loop {
            terminal.draw(|f| render(f, &self.state, &self.config))?;

            let timeout = if self.state.has_pending_digits() {
                DIGIT_TIMEOUT
            } else {
                IDLE_TICK
            };
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key, terminal)?;
                    }
                    _ => {}
                }
            } else if self.state.has_pending_digits() {
                self.state.commit_digits();
            }

            if self.state.should_quit() {
                return Ok(());
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, terminal: &mut Term) -> Result<()> {
        if self.state.mode() == Mode::Searching {
            match key.code {
                KeyCode::Esc => self.state.search_cancel(),
                KeyCode::Enter => self.state.search_commit(),
                KeyCode::Backspace => self.state.search_backspace(),
                KeyCode::Char(c) => self.state.search_input(c),
                _ => {}
            }
            return Ok(());
        }

        if let Some(action) = self.config.keymap.lookup(&key) {
            let effect = self.state.apply(action);
            self.execute(effect, terminal)?;
        } else if let KeyCode::Char(c) = key.code {
            if c.is_ascii_digit() {
                self.state.push_digit(c);
            }
        }
        Ok(())
    }

    fn execute(&mut self, effect: Effect, terminal: &mut Term) -> Result<()> {
        match effect {
            Effect::None | Effect::Quit => {}
            Effect::Redraw => {
                terminal.clear()?;
            }
            Effect::Open { targets, new_window } => {
                if new_window {
                    tracing::debug!("new-window dispatch requested; handler decides");
                }
                let total = targets.len();
                let mut succeeded = 0;
                let mut last_error = None;
                for target in targets {
                    match self.dispatcher.dispatch(self.state.handler, &target) {
                        Ok(()) => succeeded += 1,
                        Err(err) => last_error = Some(err.to_string()),
                    }
                }
                self.state.note_dispatch(succeeded, total - succeeded);
                if let Some(err) = last_error {
                    self.state.set_status(err);
                }
                // The external process may have scribbled on the screen.
                terminal.clear()?;
            }
            Effect::Copy { text, primary } => {
                let result = if primary {
                    self.clipboard.copy_primary(&text)
                } else {
                    self.clipboard.copy(&text)
                };
                match result {
                    Ok(()) => {
                        self.state.set_status(if primary {
                            "copied to primary selection"
                        } else {
                            "copied to clipboard"
                        });
                        self.state.note_dispatch(1, 0);
                    }
                    Err(err) => self.state.set_status(err.to_string()),
                }
            }
        }
        Ok(())
    }
}

fn render(f: &mut Frame, state: &ChooserState, config: &Config) {
    let palette = &config.palettes[state.palette_idx % config.palettes.len()];
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.size());

    render_header(f, chunks[0], state, palette);
    render_body(f, chunks[1], state, config, palette);
    render_footer(f, chunks[2], state, config, palette);

    if state.help_visible {
        render_help(f, config, palette);
    }
}

fn render_header(f: &mut Frame, area: Rect, state: &ChooserState, palette: &Palette) {
    let count = state.visible_len();
    let noun = if count == 1 { "link" } else { "links" };
    let mut header = format!(" {} {} | handler: {}", count, noun, state.handler.label());
    if state.queue_len() > 0 {
        header.push_str(&format!(" | {} queued", state.queue_len()));
    }
    f.render_widget(
        Paragraph::new(header).style(palette.style(UiRole::Header)),
        area,
    );
}

fn render_body(f: &mut Frame, area: Rect, state: &ChooserState, config: &Config, palette: &Palette) {
    if state.is_empty() {
        f.render_widget(
            Paragraph::new("No links found").style(palette.style(UiRole::MsgText)),
            area,
        );
        return;
    }

    let width = if config.width > 0 {
        config.width as usize
    } else {
        area.width.saturating_sub(8) as usize
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_line = 0;
    let mut first = true;
    for (display_idx, entry, queued, under_cursor) in state.visible_entries() {
        if state.show_context && !entry.context.is_empty() {
            if !first && !config.whitespace_off {
                lines.push(Line::styled("…", palette.style(UiRole::Ellipsis)));
            }
            for context_line in entry.context.lines() {
                lines.push(Line::styled(
                    context_line.to_string(),
                    palette.style(UiRole::MsgText),
                ));
            }
        }
        first = false;

        let entry_style = if under_cursor && state.mode() == Mode::Searching {
            palette.style(UiRole::Search)
        } else if under_cursor {
            palette.style(UiRole::Focus)
        } else {
            palette.style(UiRole::Url)
        };
        let marker = if queued { "+" } else { " " };
        cursor_line = if under_cursor { lines.len() } else { cursor_line };
        lines.push(Line::from(vec![
            Span::styled(format!("[{}]", display_idx), palette.style(UiRole::Index)),
            Span::styled(marker, palette.style(UiRole::Index)),
            Span::styled(entry.display_text(width), entry_style),
        ]));
    }

    let total = lines.len() as u16;
    let height = area.height.max(1);
    let wanted = (cursor_line as u16).saturating_sub(height / 2);
    let offset = wanted.min(total.saturating_sub(height));
    f.render_widget(
        Paragraph::new(Text::from(lines)).scroll((offset, 0)),
        area,
    );
}

fn render_footer(f: &mut Frame, area: Rect, state: &ChooserState, config: &Config, palette: &Palette) {
    let (text, style): (String, Style) = if state.mode() == Mode::Searching {
        (
            format!("/{}", state.search_pattern()),
            palette.style(UiRole::Status),
        )
    } else if let Some(status) = state.status() {
        (status.to_string(), palette.style(UiRole::Status))
    } else if config.nohelp {
        (String::new(), palette.style(UiRole::Footer))
    } else {
        (
            " j/k move  Enter open  a queue  o open queue  / search  F1 help  q quit".to_string(),
            palette.style(UiRole::Footer),
        )
    };
    f.render_widget(Paragraph::new(text).style(style), area);
}

fn render_help(f: &mut Frame, config: &Config, palette: &Palette) {
    let mut lines: Vec<Line> = Vec::new();
    for &action in UiAction::ALL {
        let key = config.keymap.key_for(action).unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<10}", key), palette.style(UiRole::Index)),
            Span::styled(action.describe(), palette.style(UiRole::MsgText)),
        ]));
    }

    let height = (lines.len() as u16 + 2).min(f.size().height);
    let width = 46.min(f.size().width);
    let area = Rect {
        x: f.size().width.saturating_sub(width) / 2,
        y: f.size().height.saturating_sub(height) / 2,
        width,
        height,
    };
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" keys ")
                .style(palette.style(UiRole::MsgText)),
        ),
        area,
    );
}
