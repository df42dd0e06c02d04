use clap::Parser;
use std::path::PathBuf;

/// Linksift - extract and open URLs from emails and text streams
#[derive(Parser, Debug, Clone)]
#[command(name = "linksift")]
#[command(about = "Extract URLs/email addresses from a message and choose one to open")]
#[command(version)]
pub struct Cli {
    /// Don't display the context of each URL
    #[arg(short, long)]
    pub compact: bool,

    /// Reverse the display order of URLs and context
    #[arg(short = 'R', long)]
    pub reverse: bool,

    /// Don't start the interactive UI; print URLs to stdout
    #[arg(short = 'n', long = "no-browser")]
    pub no_browser: bool,

    /// Remove duplicate URLs from the list
    #[arg(short, long)]
    pub dedupe: bool,

    /// Custom regex used for all matching, replacing the default URL matcher.
    /// For example: --regex 'https?://.+\.\w+'
    #[arg(short = 'E', long)]
    pub regex: Option<String>,

    /// Command to run on the selected URL instead of opening it in a browser.
    /// `{}` is replaced by the URL; the command is interpreted by the shell.
    /// For example: --run 'echo {} | xclip -i'
    #[arg(short, long)]
    pub run: Option<String>,

    /// Like --run, but executed without a shell. `{}` is replaced by the URL
    /// as a single argument, so shell metacharacters in URLs are harmless.
    #[arg(short = 'f', long = "run-safe")]
    pub run_safe: Option<String>,

    /// Pipe the URL to the command given by --run or --run-safe via stdin
    #[arg(short, long)]
    pub pipe: bool,

    /// Hide the help hint bar by default
    #[arg(short = 'H', long)]
    pub nohelp: bool,

    /// Quit after opening or copying a single link
    #[arg(short, long)]
    pub single: bool,

    /// Display width (0 = terminal width)
    #[arg(short, long, default_value_t = 0)]
    pub width: u16,

    /// Don't display empty lines and ellipses between context blocks
    #[arg(short = 'W', long = "whitespace-off")]
    pub whitespace_off: bool,

    /// Also scan link-bearing message headers (List-*, Link, Archived-At)
    #[arg(long)]
    pub headers: bool,

    /// Write the default config file and exit
    #[arg(short, long)]
    pub genconf: bool,

    /// Filename of the message to parse (defaults to standard input)
    pub message: Option<PathBuf>,
}
