use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read credentials from {}: {source}", .path.display())]
    ConfigFile { path: PathBuf, source: io::Error },

    #[error("cannot locate home directory for the credentials file")]
    HomeDirectory,

    #[error("cannot read text file {}: {source}", .path.display())]
    ReadText { path: PathBuf, source: io::Error },

    #[error("cannot write audio to {}: {source}", .path.display())]
    WriteOutput { path: PathBuf, source: io::Error },

    #[error("cannot print voice listing: {0}")]
    Listing(#[source] io::Error),

    #[error("invalid service region {0:?}")]
    InvalidRegion(String),

    #[error("cannot sign request: {0}")]
    Signing(String),

    #[error("request to speech service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("speech service returned {status}: {message}")]
    Service { status: StatusCode, message: String },

    #[error("unexpected response from speech service: {0}")]
    Decode(#[from] serde_json::Error),
}
