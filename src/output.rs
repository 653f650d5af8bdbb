use std::path::Path;

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

use crate::error::{Error, Result};

/// Permissions for newly created audio files: owner rw, group and others r.
pub const OUTPUT_MODE: u32 = 0o644;

/// Write `audio` to `path`, creating or truncating it.
#[instrument(skip(audio), fields(len = audio.len()))]
pub async fn write_audio(path: &Path, audio: &[u8]) -> Result<()> {
    let err = |source| Error::WriteOutput {
        path: path.to_owned(),
        source,
    };

    let mut options = OpenOptions::new();
    options.create(true).truncate(true).write(true);
    #[cfg(unix)]
    options.mode(OUTPUT_MODE);

    let mut file = options.open(path).await.map_err(err)?;
    file.write_all(audio).await.map_err(err)?;
    file.flush().await.map_err(err)?;

    info!("Wrote {} bytes to {}", audio.len(), path.display());
    Ok(())
}
