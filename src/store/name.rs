//! Artifact file names.
//!
//! Names have the form `{unix_ms}_{8 hex}.png`; creation time is recovered
//! from the leading segment alone.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use super::error::StoreError;

/// File extension of stored artifacts.
pub const ARTIFACT_EXTENSION: &str = "png";

/// Number of random bytes in the name suffix (two hex chars each).
const SUFFIX_BYTES: usize = 4;

/// A validated artifact file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactName(String);

impl ArtifactName {
    /// Mint a fresh name for an artifact created at `now_ms`.
    pub fn generate(now_ms: u64) -> Self {
        let suffix: [u8; SUFFIX_BYTES] = rand::random();
        Self(format!(
            "{}_{}.{}",
            now_ms,
            hex::encode(suffix),
            ARTIFACT_EXTENSION
        ))
    }

    /// Validate a caller-supplied name.
    ///
    /// Only bare file names with the artifact extension are accepted, so a
    /// name can never address anything outside the store directory.
    pub fn parse(name: &str) -> Result<Self, StoreError> {
        let invalid = || StoreError::InvalidName {
            name: name.to_string(),
        };

        let stem = name
            .strip_suffix(ARTIFACT_EXTENSION)
            .and_then(|s| s.strip_suffix('.'))
            .ok_or_else(invalid)?;
        if stem.is_empty()
            || stem.starts_with('.')
            || name.contains(['/', '\\', '\0'])
            || name.contains("..")
        {
            return Err(invalid());
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creation time encoded in the name, if the leading segment is numeric.
    pub fn timestamp_ms(&self) -> Option<u64> {
        timestamp_of(&self.0)
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArtifactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse the creation timestamp from any file name.
///
/// Reads the leading run of ASCII digits of the segment before the first
/// `_`. Returns `None` when that segment does not start with a digit.
pub fn timestamp_of(name: &str) -> Option<u64> {
    let segment = name.split('_').next().unwrap_or("");
    let digits_end = segment
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(segment.len());
    segment[..digits_end].parse().ok()
}

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
