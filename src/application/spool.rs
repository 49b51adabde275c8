//! Spool file management for in-flight takes
//!
//! A take is written to a fixed-name file in the cache directory and
//! renamed to an epoch-millis name when it is handed to the uploader.
//! Finalized spools are deleted after the upload attempt; the sweep
//! catches files orphaned by a crashed process.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::domain::recording::AudioEncoding;

/// Stem of the fixed-name active spool file
const ACTIVE_STEM: &str = "voice-relay";

/// Finalized spools older than this are considered orphaned
const STALE_AFTER_SECS: u64 = 24 * 60 * 60;

/// Cache-directory spool for recorded takes
#[derive(Debug, Clone)]
pub struct SpoolDir {
    dir: PathBuf,
}

impl SpoolDir {
    /// Create the spool under the platform cache directory
    pub fn in_cache_dir() -> io::Result<Self> {
        let dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("voice-relay");
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Create a spool rooted at an explicit directory
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The spool directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the fixed-name file the current take is written to
    pub fn active_path(&self, encoding: AudioEncoding) -> PathBuf {
        self.dir
            .join(format!("{}.{}", ACTIVE_STEM, encoding.extension()))
    }

    /// Rename the active file to its epoch-millis upload name.
    /// The extension is dropped; the MIME type travels with the upload.
    pub fn finalize(&self, active: &Path) -> io::Result<PathBuf> {
        let staged = self.dir.join(epoch_millis().to_string());
        fs::rename(active, &staged)?;
        Ok(staged)
    }

    /// Remove finalized spools orphaned by a crashed process.
    /// Returns the number of files removed.
    pub fn sweep_stale(&self) -> usize {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("unable to read spool directory: {e}");
                return 0;
            }
        };

        let now = epoch_millis();
        let stale_before = now.saturating_sub(u128::from(STALE_AFTER_SECS) * 1000);
        let mut removed = 0;

        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            // Finalized spools are named by their epoch millis
            let timestamp: u128 = match path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.parse().ok())
            {
                Some(ts) => ts,
                None => continue,
            };

            if timestamp < stale_before {
                match fs::remove_file(&path) {
                    Ok(()) => removed += 1,
                    Err(e) => debug!("unable to remove stale spool {}: {e}", path.display()),
                }
            }
        }

        removed
    }
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_path_uses_encoding_extension() {
        let spool = SpoolDir::at("/tmp/spool");
        assert_eq!(
            spool.active_path(AudioEncoding::Flac),
            PathBuf::from("/tmp/spool/voice-relay.flac")
        );
        assert_eq!(
            spool.active_path(AudioEncoding::Wav),
            PathBuf::from("/tmp/spool/voice-relay.wav")
        );
    }

    #[test]
    fn finalize_renames_to_epoch_millis() {
        let dir = tempfile::tempdir().unwrap();
        let spool = SpoolDir::at(dir.path());

        let active = spool.active_path(AudioEncoding::Wav);
        fs::write(&active, b"pcm").unwrap();

        let staged = spool.finalize(&active).unwrap();
        assert!(staged.exists());
        assert!(!active.exists());

        let name = staged.file_name().unwrap().to_str().unwrap();
        assert!(name.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(fs::read(&staged).unwrap(), b"pcm");
    }

    #[test]
    fn finalize_missing_active_fails() {
        let dir = tempfile::tempdir().unwrap();
        let spool = SpoolDir::at(dir.path());
        let active = spool.active_path(AudioEncoding::Flac);
        assert!(spool.finalize(&active).is_err());
    }

    #[test]
    fn sweep_removes_only_stale_spools() {
        let dir = tempfile::tempdir().unwrap();
        let spool = SpoolDir::at(dir.path());

        // Orphan from two days ago
        let stale = epoch_millis() - 2 * 24 * 60 * 60 * 1000;
        fs::write(dir.path().join(stale.to_string()), b"old").unwrap();
        // Fresh finalized spool
        fs::write(dir.path().join(epoch_millis().to_string()), b"new").unwrap();
        // Active spool is never swept
        fs::write(dir.path().join("voice-relay.flac"), b"live").unwrap();

        assert_eq!(spool.sweep_stale(), 1);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn sweep_on_missing_directory_is_harmless() {
        let spool = SpoolDir::at("/nonexistent/voice-relay-spool");
        assert_eq!(spool.sweep_stale(), 0);
    }
}
