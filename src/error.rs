use thiserror::Error;

/// Error taxonomy for linksift.
///
/// `Input`, `Pattern` and `Config` (when the file is unreadable rather than
/// malformed) occur before the interactive loop starts and are fatal.
/// `Dispatch` occurs inside the loop and is always recovered into a status
/// message by the chooser.
#[derive(Error, Debug)]
pub enum LinksiftError {
    #[error("unable to read input: {0}")]
    Input(#[from] std::io::Error),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("dispatch failed: {0}")]
    Dispatch(String),
}

pub type Result<T> = std::result::Result<T, LinksiftError>;
