//! Temporary artifact hosting.
//!
//! Rendered PNGs are parked in a shared directory under timestamped names,
//! served once and deleted, or swept after the retention window. The file
//! name is the only index: no metadata lives outside the directory.

mod error;
mod name;

pub use error::StoreError;
pub use name::{timestamp_of, unix_millis, ArtifactName, ARTIFACT_EXTENSION};

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Age after which an unclaimed artifact is deleted (5 hours).
pub const RETENTION_WINDOW_MS: u64 = 5 * 60 * 60 * 1000;

/// URL path under which artifacts are retrieved.
pub const DOWNLOAD_PATH: &str = "api/download";

/// Attempts at minting a non-colliding name before giving up.
const STORE_ATTEMPTS: usize = 4;

/// A freshly stored artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub name: ArtifactName,
    /// Retrieval URL for the single-use download.
    pub url: String,
}

/// Outcome of an expiry sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub deleted_count: usize,
    /// Entries left in place because their name carries no timestamp.
    pub skipped_count: usize,
}

/// Directory-backed store for temporary artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    base_url: String,
}

impl ArtifactStore {
    /// Create a store rooted at `dir`.
    /// Does not create the directory; `store` creates it on demand.
    pub fn new(dir: PathBuf, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { dir, base_url }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Retrieval URL for an artifact name.
    pub fn url_for(&self, name: &ArtifactName) -> String {
        format!("{}/{}/{}", self.base_url, DOWNLOAD_PATH, name)
    }

    /// Store a payload under a fresh name stamped with the current time.
    pub fn store(&self, payload: &[u8]) -> Result<StoredArtifact, StoreError> {
        self.store_at(payload, unix_millis())
    }

    /// Store a payload under a fresh name stamped with `now_ms`.
    ///
    /// Creates the store directory if absent. Files are created exclusively,
    /// so a name collision retries with a new suffix rather than overwriting.
    pub fn store_at(&self, payload: &[u8], now_ms: u64) -> Result<StoredArtifact, StoreError> {
        if payload.is_empty() {
            return Err(StoreError::EmptyPayload);
        }
        fs::create_dir_all(&self.dir)?;

        let mut last_err = None;
        for _ in 0..STORE_ATTEMPTS {
            let name = ArtifactName::generate(now_ms);
            let path = self.dir.join(name.as_str());
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    if let Err(e) = file.write_all(payload).and_then(|_| file.sync_all()) {
                        let _ = fs::remove_file(&path);
                        return Err(e.into());
                    }
                    log::info!("Stored artifact {} ({} bytes)", path.display(), payload.len());
                    let url = self.url_for(&name);
                    return Ok(StoredArtifact { name, url });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    log::warn!("Artifact name collision on {}, retrying", name);
                    last_err = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(last_err
            .unwrap_or_else(|| std::io::Error::new(ErrorKind::AlreadyExists, "name collision"))
            .into())
    }

    /// Read an artifact and delete it.
    ///
    /// The file is first renamed to a private claim name, so among concurrent
    /// callers exactly one gets the payload and the rest see `NotFound`. The
    /// payload is returned even if deleting the claimed file fails; that
    /// failure is only logged and the sweep reclaims the leftover.
    pub fn retrieve_and_remove(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let name = ArtifactName::parse(name)?;
        let path = self.dir.join(name.as_str());
        let suffix: [u8; 4] = rand::random();
        let claimed = self
            .dir
            .join(format!("{}.{}.claim", name, hex::encode(suffix)));

        match fs::rename(&path, &claimed) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    name: name.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        }

        let payload = fs::read(&claimed);

        match fs::remove_file(&claimed) {
            Ok(()) => log::info!("Deleted artifact after download: {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("Artifact {} already removed", path.display())
            }
            Err(e) => log::error!("Error deleting {} after download: {}", claimed.display(), e),
        }

        Ok(payload?)
    }

    /// Delete every artifact older than the retention window.
    pub fn sweep(&self) -> Result<SweepReport, StoreError> {
        self.sweep_at(unix_millis())
    }

    /// Delete every entry whose name timestamp is older than
    /// `now_ms - RETENTION_WINDOW_MS`.
    ///
    /// Entries without a parsable timestamp are skipped with a warning.
    /// Per-entry failures never abort the sweep; only an unreadable store
    /// directory fails the call. A missing directory reports zero deletions.
    pub fn sweep_at(&self, now_ms: u64) -> Result<SweepReport, StoreError> {
        let mut report = SweepReport::default();

        if !self.dir.exists() {
            log::info!(
                "Sweep: directory {} does not exist, nothing to clean up",
                self.dir.display()
            );
            return Ok(report);
        }

        let cutoff = now_ms.saturating_sub(RETENTION_WINDOW_MS);

        for entry in fs::read_dir(&self.dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::error!("Sweep: error reading entry in {}: {}", self.dir.display(), e);
                    continue;
                }
            };
            let path = entry.path();

            match entry.file_type() {
                Ok(ft) if ft.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    log::error!("Sweep: error inspecting {}: {}", path.display(), e);
                    continue;
                }
            }

            let file_name = entry.file_name();
            let Some(timestamp) = file_name.to_str().and_then(timestamp_of) else {
                log::warn!(
                    "Sweep: skipping {} due to invalid timestamp in filename",
                    path.display()
                );
                report.skipped_count += 1;
                continue;
            };

            if timestamp >= cutoff {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    log::info!("Sweep: deleted expired artifact {}", path.display());
                    report.deleted_count += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::debug!("Sweep: {} already removed", path.display())
                }
                Err(e) => log::error!("Sweep: error deleting {}: {}", path.display(), e),
            }
        }

        Ok(report)
    }

    /// Retrieval URLs of all stored artifacts, oldest first.
    ///
    /// A missing store directory yields an empty list.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .list_names()?
            .iter()
            .map(|name| self.url_for(name))
            .collect())
    }

    /// Names of all stored artifacts, sorted.
    pub fn list_names(&self) -> Result<Vec<ArtifactName>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let Ok(entry) = entry else {
                continue;
            };
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if let Ok(name) = ArtifactName::parse(&file_name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}
