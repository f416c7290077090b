//! Locating the server through its address file.

use std::path::Path;
use std::time::Duration;

use nim_protocol::BootstrapRecord;
use tracing::warn;

use crate::error::ClientError;

/// Default wait before the single retry of an unreadable address file.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Read the address file, retrying once after `retry_delay`.
///
/// A missing file usually means the server has not started yet. A file
/// that exists but does not parse fails immediately.
pub async fn load(path: &Path, retry_delay: Duration) -> Result<BootstrapRecord, ClientError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) => {
            warn!(path = %path.display(), "failure accessing server address file: {}; retry in {:?}", e, retry_delay);
            eprintln!("nim: failure accessing server address file: retry in {}s", retry_delay.as_secs());
            tokio::time::sleep(retry_delay).await;
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| address_file_error(path, e))?
        }
    };

    contents
        .parse::<BootstrapRecord>()
        .map_err(|e| address_file_error(path, e))
}

fn address_file_error(path: &Path, reason: impl std::fmt::Display) -> ClientError {
    ClientError::AddressFile {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
