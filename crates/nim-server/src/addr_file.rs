//! The bootstrap address file clients read to find the server.

use std::io;
use std::path::PathBuf;

use nim_protocol::BootstrapRecord;
use tracing::{info, warn};

/// A written address file. Call [`AddressFile::remove`] on shutdown.
#[derive(Debug)]
pub struct AddressFile {
    path: PathBuf,
}

impl AddressFile {
    /// Write `record` to `path`, replacing any stale file.
    pub fn write(path: impl Into<PathBuf>, record: &BootstrapRecord) -> io::Result<Self> {
        let path = path.into();
        std::fs::write(&path, record.to_string())?;
        info!(path = %path.display(), %record, "address file written");
        Ok(AddressFile { path })
    }

    /// Delete the file. A file that is already gone is not an error.
    pub fn remove(self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "address file removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), "could not remove address file: {}", e),
        }
    }
}
