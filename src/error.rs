//! Error types for startup (config and asset loading).
//!
//! Everything that happens after startup is in-memory state manipulation and
//! cannot fail.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Filesystem error outside of image decoding (config file, log file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A tile or sprite image is missing or cannot be decoded.
    #[error("failed to load asset {}: {source}", path.display())]
    Asset {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The RON config file does not parse.
    #[error("config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// The config parses but describes an unplayable game.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type GameResult<T> = Result<T, GameError>;
