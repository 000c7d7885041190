//! Conversion errors.
//!
//! Every failure here ends up in front of the viewer as an `{error}`
//! message, so `Display` is written for a human reading a browser tab.

use std::{io, path::PathBuf, string::FromUtf8Error};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The converter could not be spawned or exited unsuccessfully.
    #[error("{0:#}")]
    Converter(anyhow::Error),

    /// The converter produced a document we cannot read.
    #[error("unreadable converter output: {0}")]
    Output(#[from] serde_json::Error),

    /// A file a viewer asked for could not be read.
    #[error("cannot read `{}`: {}", .path.display(), .source)]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Piped bytes or converter output are not UTF-8.
    #[error("content is not valid UTF-8")]
    Encoding(#[from] FromUtf8Error),

    /// A blocking conversion task panicked or was cancelled.
    #[error("conversion worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ConvertError {
    pub fn unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileUnreadable {
            path: path.into(),
            source,
        }
    }
}
