//! Streaming download of JPL kernels (feature `jpl-download`).

use camino::Utf8Path;
use tokio::{fs::File, io::AsyncWriteExt};
use tokio_stream::StreamExt;

use crate::skytime_errors::SkytimeError;

/// Stream `url` into `path` chunk by chunk; kernels weigh up to a few hundred MB.
async fn download_big_file(url: &str, path: &Utf8Path) -> Result<(), SkytimeError> {
    let response = reqwest::get(url).await?.error_for_status()?;
    let mut file = File::create(path).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    Ok(())
}

/// Download a kernel into `path`, creating the parent directories.
///
/// A partial file is removed when the transfer fails, so that a later open does not pick
/// up a truncated kernel.
pub fn download_kernel(url: &str, path: &Utf8Path) -> Result<(), SkytimeError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(%url, %path, "downloading JPL ephemeris");
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(download_big_file(url, path));

    match &result {
        Ok(()) => tracing::info!(%path, "download complete"),
        Err(_) if path.exists() => {
            if let Err(err) = std::fs::remove_file(path) {
                tracing::warn!(%path, error = %err, "unable to remove a partial download");
            }
        }
        Err(_) => {}
    }
    result
}
