use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use linksift::cli::Cli;
use linksift::config::{self, Config};
use linksift::extract::{self, Extractor};
use linksift::message;
use linksift::Chooser;

fn main() -> Result<()> {
    // Logs go to stderr and stay quiet unless RUST_LOG says otherwise;
    // the interactive session owns the terminal.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.genconf {
        let path = config::write_template()?;
        println!("Wrote config to {}", path.display());
        return Ok(());
    }

    // The message is consumed and buffered in full before any interactive
    // reading starts, so the stdin handoff to the TUI is safe.
    let raw = message::read_input(cli.message.as_deref())?;
    let parsed = message::parse(&raw, cli.headers);

    let extractor = Extractor::new(cli.regex.as_deref(), !cli.compact)?;
    let mut entries = extractor.extract(&parsed);
    if cli.dedupe {
        entries = extract::dedupe(entries);
    }

    if cli.no_browser {
        let mut targets: Vec<String> = entries.iter().map(|e| e.target()).collect();
        if cli.reverse {
            targets.reverse();
        }
        for target in targets {
            println!("{}", target);
        }
        return Ok(());
    }

    let config = Config::from_cli(&cli);
    Chooser::new(entries, config).run()
}
