use std::path::PathBuf;

/// Errors surfaced by Codemate. Everything else (unknown extensions, unterminated
/// comments, empty input) is absorbed into the result shape.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid comment dialect for '{extension}': {reason}")]
    Configuration { extension: String, reason: String },

    #[error("could not read {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
