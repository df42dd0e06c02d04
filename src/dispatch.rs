//! Dispatch: hands a chosen link to the outside world.
//!
//! The handler is a closed set of strategies cycled at runtime: the default
//! browser opener, a desktop opener utility, and the user's `--run` /
//! `--run-safe` command. Safe mode never touches a shell; the URL travels
//! as one literal argv element or on stdin, so shell metacharacters in
//! URLs are inert.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::{LinksiftError, Result};

/// Which strategy opens the next link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerMode {
    /// The default browser, via the `webbrowser` crate (honors `$BROWSER`).
    Browser,
    /// A desktop opener utility (`xdg-open`).
    Opener,
    /// The configured `--run` / `--run-safe` command.
    Command,
}

impl HandlerMode {
    pub fn label(self) -> &'static str {
        match self {
            HandlerMode::Browser => "browser",
            HandlerMode::Opener => "xdg-open",
            HandlerMode::Command => "command",
        }
    }

    /// The next handler in the rotation; `Command` is skipped when no
    /// command was configured for it.
    pub fn next(self, has_command: bool) -> HandlerMode {
        match self {
            HandlerMode::Browser => HandlerMode::Opener,
            HandlerMode::Opener if has_command => HandlerMode::Command,
            HandlerMode::Opener => HandlerMode::Browser,
            HandlerMode::Command => HandlerMode::Browser,
        }
    }
}

pub struct Dispatcher {
    run: Option<String>,
    run_safe: Option<String>,
    pipe: bool,
}

impl Dispatcher {
    pub fn new(run: Option<String>, run_safe: Option<String>, pipe: bool) -> Self {
        Self { run, run_safe, pipe }
    }

    pub fn has_command(&self) -> bool {
        self.run.is_some() || self.run_safe.is_some()
    }

    /// A configured command takes precedence over the browser, matching the
    /// expectation that `--run ...` means "run this instead".
    pub fn initial_mode(&self) -> HandlerMode {
        if self.has_command() {
            HandlerMode::Command
        } else {
            HandlerMode::Browser
        }
    }

    /// Dispatch one target synchronously. The chooser blocks until the
    /// handler returns; failures are reported, never fatal.
    pub fn dispatch(&self, mode: HandlerMode, target: &str) -> Result<()> {
        tracing::debug!("dispatching {} via {}", target, mode.label());
        match mode {
            HandlerMode::Browser => webbrowser::open(target)
                .map_err(|e| LinksiftError::Dispatch(format!("browser: {}", e))),
            HandlerMode::Opener => {
                let status = Command::new("xdg-open")
                    .arg(target)
                    .status()
                    .map_err(|e| LinksiftError::Dispatch(format!("xdg-open: {}", e)))?;
                if status.success() {
                    Ok(())
                } else {
                    Err(LinksiftError::Dispatch(format!("xdg-open exited with {}", status)))
                }
            }
            HandlerMode::Command => self.run_command(target),
        }
    }

    fn run_command(&self, target: &str) -> Result<()> {
        let (template, safe) = match (&self.run_safe, &self.run) {
            (Some(t), _) => (t.as_str(), true),
            (None, Some(t)) => (t.as_str(), false),
            (None, None) => {
                return Err(LinksiftError::Dispatch("no command configured".to_string()))
            }
        };

        let mut command = if safe {
            build_safe_command(template, target, self.pipe)?
        } else {
            build_shell_command(template, target, self.pipe)
        };

        let mut child = if self.pipe {
            let mut child = command
                .stdin(Stdio::piped())
                .spawn()
                .map_err(|e| LinksiftError::Dispatch(format!("{}: {}", template, e)))?;
            // Dropping the handle closes the pipe; the child must see EOF
            // before wait() or it may block forever. A child that exits
            // without reading stdin is fine, so broken pipes are ignored.
            if let Some(mut stdin) = child.stdin.take() {
                if let Err(e) = stdin.write_all(target.as_bytes()) {
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        return Err(LinksiftError::Dispatch(format!("pipe: {}", e)));
                    }
                }
            }
            child
        } else {
            command
                .spawn()
                .map_err(|e| LinksiftError::Dispatch(format!("{}: {}", template, e)))?
        };

        let status = child
            .wait()
            .map_err(|e| LinksiftError::Dispatch(format!("{}: {}", template, e)))?;
        if status.success() {
            Ok(())
        } else {
            Err(LinksiftError::Dispatch(format!(
                "{} exited with {}",
                template, status
            )))
        }
    }
}

/// Shell mode: the template is handed to `sh -c` with `{}` substituted.
/// With `--pipe` the URL is not substituted; it arrives on stdin instead.
pub fn build_shell_command(template: &str, target: &str, pipe: bool) -> Command {
    let line = if pipe {
        template.to_string()
    } else {
        template.replace("{}", target)
    };
    let mut command = Command::new("sh");
    command.arg("-c").arg(line);
    command
}

/// Safe mode: the template is split on whitespace and executed directly.
/// `{}` is replaced inside a single argv element, so the URL can never be
/// re-interpreted by a shell.
pub fn build_safe_command(template: &str, target: &str, pipe: bool) -> Result<Command> {
    let mut words = template.split_whitespace();
    let program = words
        .next()
        .ok_or_else(|| LinksiftError::Dispatch("empty command template".to_string()))?;
    let mut command = Command::new(program);
    for word in words {
        if pipe {
            command.arg(word);
        } else {
            command.arg(word.replace("{}", target));
        }
    }
    Ok(command)
}
