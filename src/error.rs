// src/error.rs

use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a download run.
#[derive(Debug, Error)]
pub enum Error {
    /// The API answered with a status outside 2xx.
    #[error("GET {url} returned {status}: {body}")]
    RemoteRequest {
        url: String,
        status: u16,
        body: String,
    },

    /// The body was not a JSON array of `{id, data}` items we can write.
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("writing {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("serializing CSV to {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("configuration error: {message}")]
    Config { message: String },

    /// No status was received (connect, DNS, TLS, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedResponse {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
