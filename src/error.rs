use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Format error: {0}")]
    Format(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{} can't be opened: {source}", path.display())]
    ResourceMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} can't be loaded: {reason}", path.display())]
    UnsupportedAudio { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether the error aborts the run. Keysound failures only silence
    /// the affected sound.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::ResourceMissing { .. } | Error::UnsupportedAudio { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
