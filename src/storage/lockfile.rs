//! Data-directory lock
//!
//! sled allows a single process per database. The lock file records the
//! owning PID so a second `bma-engine` pointed at the same data directory
//! fails fast with an actionable message instead of a sled I/O error.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// PID lock file in the data directory, removed on drop.
#[derive(Debug)]
pub struct ProcessLock {
    lock_path: PathBuf,
    owned: bool,
}

impl ProcessLock {
    const LOCK_FILE_NAME: &'static str = ".bma-engine.lock";

    /// Acquire the lock for `data_dir`, creating the directory if needed.
    ///
    /// Stale locks (owner no longer running) are replaced.
    pub fn acquire<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {data_dir:?}"))?;

        let lock_path = data_dir.join(Self::LOCK_FILE_NAME);

        if lock_path.exists() {
            match Self::read_owner(&lock_path) {
                Ok(pid) if pid != std::process::id() && Self::is_running(pid) => {
                    bail!(
                        "Another bma-engine instance (PID {pid}) owns {data_dir:?}.\n\
                         Stop it, or remove the stale lock file if it is not running:\n\
                         rm {lock_path:?}"
                    );
                }
                Ok(_) => {
                    tracing::info!(path = ?lock_path, "Replacing stale lock file");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Unreadable lock file, replacing it");
                }
            }
            let _ = fs::remove_file(&lock_path);
        }

        let pid = std::process::id();
        fs::write(&lock_path, format!("{pid}\n"))
            .with_context(|| format!("Failed to write lock file: {lock_path:?}"))?;
        tracing::debug!(pid, path = ?lock_path, "Acquired data directory lock");

        Ok(Self {
            lock_path,
            owned: true,
        })
    }

    fn read_owner(lock_path: &Path) -> Result<u32> {
        let contents = fs::read_to_string(lock_path).context("Failed to read lock file")?;
        contents
            .trim()
            .parse()
            .context("Failed to parse PID from lock file")
    }

    #[cfg(unix)]
    fn is_running(pid: u32) -> bool {
        fs::read_to_string(format!("/proc/{pid}/cmdline"))
            .map(|cmdline| cmdline.contains("bma-engine"))
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    fn is_running(_pid: u32) -> bool {
        true
    }

    /// Release the lock (also done on drop)
    pub fn release(&mut self) {
        if self.owned {
            if let Err(e) = fs::remove_file(&self.lock_path) {
                tracing::warn!(error = %e, "Failed to remove lock file");
            }
            self.owned = false;
        }
    }

    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for ProcessLock {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lock_file_holds_our_pid() {
        let dir = tempdir().unwrap();
        let lock = ProcessLock::acquire(dir.path()).unwrap();
        let pid: u32 = fs::read_to_string(lock.path()).unwrap().trim().parse().unwrap();
        assert_eq!(pid, std::process::id());
    }

    #[test]
    fn lock_released_on_drop() {
        let dir = tempdir().unwrap();
        let path = {
            let lock = ProcessLock::acquire(dir.path()).unwrap();
            lock.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn stale_and_garbage_locks_are_replaced() {
        let dir = tempdir().unwrap();
        let lock_path = dir.path().join(ProcessLock::LOCK_FILE_NAME);

        fs::write(&lock_path, "999999999\n").unwrap();
        drop(ProcessLock::acquire(dir.path()).unwrap());

        fs::write(&lock_path, "not-a-pid").unwrap();
        assert!(ProcessLock::acquire(dir.path()).is_ok());
    }
}
