use std::error::Error as StdError;

use thiserror::Error;

use crate::input_format::InputFormat;

/// audiolift's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// audiolift's crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs.
///
/// A video without an audio track is *not* an error; see [`crate::extract::Outcome::NoAudio`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported video file '{filename}' (expected one of: {})", InputFormat::extensions_list())]
    UnsupportedInput { filename: String },

    #[error("unknown output format '{0}' (expected one of: mp3, wav, aac, ogg)")]
    UnknownFormat(String),

    #[error("unknown bitrate '{0}' (expected one of: 96k, 128k, 192k, 256k, 320k)")]
    UnknownBitrate(String),

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}
