use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};

/// Name of the credentials dotfile in the user's home directory.
pub const CONFIG_FILE_NAME: &str = ".ivonaapi";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

// Keep the secret out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// `~/.ivonaapi`
pub fn default_config_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .ok_or(Error::HomeDirectory)
}

/// Use the flag values when both are set, otherwise read the config file
/// (`~/.ivonaapi` unless `config_path` is given): line 1 is the access
/// key, line 2 the secret key. A missing line keeps the corresponding flag
/// value.
#[instrument(skip(access_key, secret_key))]
pub async fn resolve(
    access_key: Option<&str>,
    secret_key: Option<&str>,
    config_path: Option<&Path>,
) -> Result<Credentials> {
    let access_key = access_key.unwrap_or_default();
    let secret_key = secret_key.unwrap_or_default();

    if !access_key.is_empty() && !secret_key.is_empty() {
        debug!("Using credentials from flags");
        return Ok(Credentials {
            access_key: access_key.to_owned(),
            secret_key: secret_key.to_owned(),
        });
    }

    let config_path = match config_path {
        Some(path) => path.to_owned(),
        None => default_config_path()?,
    };
    let contents = match tokio::fs::read_to_string(&config_path).await {
        Ok(contents) => contents,
        Err(source) => {
            return Err(Error::ConfigFile {
                path: config_path,
                source,
            })
        }
    };
    debug!("Read credentials from {}", config_path.display());

    let mut lines = contents.lines();
    let credentials = Credentials {
        access_key: lines.next().unwrap_or(access_key).to_owned(),
        secret_key: lines.next().unwrap_or(secret_key).to_owned(),
    };

    if credentials.access_key.is_empty() || credentials.secret_key.is_empty() {
        warn!("Credentials file {} is incomplete", config_path.display());
    }

    Ok(credentials)
}
