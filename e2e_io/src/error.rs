use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("log {path:?} is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },
    #[error("file pattern {0:?} has no {{index}} placeholder")]
    Pattern(String),
}

pub type Result<T> = std::result::Result<T, IoError>;
