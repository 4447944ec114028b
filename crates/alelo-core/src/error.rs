use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid profile name: '{0}'")]
    InvalidName(String),

    #[error("Profile name already in use: {0}")]
    NameConflict(String),

    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Unable to read profile {}, delete it and create again", path.display())]
    CorruptProfile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid CPF/password")]
    InvalidCredentials,

    #[error("Unexpected login response: {0}")]
    ProtocolError(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to read credentials: {0}")]
    Input(#[source] std::io::Error),

    #[error("Failed to sign gateway token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Could not find the user home directory")]
    HomeDirUnavailable,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
