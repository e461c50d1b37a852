//! Cross-process write lock for a data directory.
//!
//! A session holds the lock from the moment it re-reads the snapshot until
//! its write has landed, so a `tl` command and a running board never commit
//! over each other's changes. The lock file itself stays in place; only the
//! `flock` on it comes and goes.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Name of the lock file inside the data directory
pub const LOCK_FILE: &str = ".lock";

/// How long a writer waits for another process before giving up
pub const DEFAULT_WAIT: Duration = Duration::from_secs(2);

const RETRY_EVERY: Duration = Duration::from_millis(10);

/// Error type for the store lock
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("could not lock {path}: {source}")]
    Flock { path: PathBuf, source: io::Error },
    #[error("{path} is held by another tally process (waited {waited:?})")]
    Busy { path: PathBuf, waited: Duration },
}

/// Exclusive hold on a data directory. Released when dropped.
#[derive(Debug)]
pub struct StoreLock {
    _file: File,
}

impl StoreLock {
    /// Take the lock on `dir`, retrying for up to `wait`.
    pub fn acquire(dir: &Path, wait: Duration) -> Result<Self, LockError> {
        let started = Instant::now();
        let (path, file) = open_lock_file(dir)?;
        loop {
            let taken = lock_exclusive(&file).map_err(|source| LockError::Flock {
                path: path.clone(),
                source,
            })?;
            if taken {
                return Ok(StoreLock { _file: file });
            }
            let waited = started.elapsed();
            if waited >= wait {
                log::warn!(
                    "event=lock_busy path={} waited_ms={}",
                    path.display(),
                    waited.as_millis()
                );
                return Err(LockError::Busy { path, waited });
            }
            std::thread::sleep(RETRY_EVERY);
        }
    }

    /// Take the lock only if nobody holds it right now.
    pub fn try_acquire(dir: &Path) -> Result<Option<Self>, LockError> {
        let (path, file) = open_lock_file(dir)?;
        match lock_exclusive(&file) {
            Ok(true) => Ok(Some(StoreLock { _file: file })),
            Ok(false) => Ok(None),
            Err(source) => Err(LockError::Flock { path, source }),
        }
    }
}

fn open_lock_file(dir: &Path) -> Result<(PathBuf, File), LockError> {
    let path = dir.join(LOCK_FILE);
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&path)
        .map_err(|source| LockError::Open {
            path: path.clone(),
            source,
        })?;
    Ok((path, file))
}

/// Non-blocking exclusive `flock`. `Ok(false)` when another descriptor
/// holds it.
#[cfg(unix)]
fn lock_exclusive(file: &File) -> io::Result<bool> {
    use std::os::unix::io::AsRawFd;

    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        return Ok(true);
    }
    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(code) if code == libc::EWOULDBLOCK || code == libc::EINTR => Ok(false),
        _ => Err(err),
    }
}

#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> io::Result<bool> {
    Ok(true)
}
