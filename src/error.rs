// src/error.rs
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading {path}: not valid UTF-8 text")]
    NotUtf8 { path: PathBuf },

    #[error("Unknown placeholder {{{name}}} in template")]
    UnknownPlaceholder { name: String },

    #[error("Malformed template at byte {position}: {reason}")]
    MalformedTemplate { position: usize, reason: String },

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Invalid config {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}
