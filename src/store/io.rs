//! Collection file IO primitives.
//!
//! - Restrictive file permissions (0600) for data and lock files.
//! - One read-modify-write at a time via an exclusive advisory lock held
//!   from the read through the rename.
//! - Crash-safe writes via the write-temp, fsync, atomic-rename pattern.
//!
//! Bytes in, bytes out: parsing and schema live in the stores.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

#[cfg(unix)]
use std::os::unix::io::AsRawFd;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

/// Held for the duration of a read or write; released on drop.
#[derive(Debug)]
pub struct StoreLock {
    #[allow(dead_code)]
    file: File,
}

impl StoreLock {
    pub fn acquire(lock_path: &Path, mode: LockMode) -> Result<Self, StoreIoError> {
        ensure_parent_dir(lock_path)?;

        #[cfg(unix)]
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .mode(0o600)
            .open(lock_path)?;

        #[cfg(not(unix))]
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)?;

        set_permissions_0600(lock_path)?;
        lock_file(&file, mode)?;
        Ok(Self { file })
    }
}

#[derive(Debug, Error)]
pub enum StoreIoError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported platform for file locking")]
    UnsupportedPlatform,

    #[error("failed to acquire file lock")]
    LockFailed,

    #[error("store path has no parent directory")]
    NoParentDir,
}

pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut p = path.as_os_str().to_os_string();
    p.push(".lock");
    PathBuf::from(p)
}

/// Read the whole file, or `None` if it does not exist yet.
pub fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>, StoreIoError> {
    let _lock = StoreLock::acquire(&lock_path_for(path), LockMode::Shared)?;
    read_unlocked(path)
}

/// Read, transform and atomically replace the file under one exclusive lock.
///
/// `apply` sees the current bytes (`None` if the file does not exist yet) and
/// returns the replacement plus a value handed back to the caller. If it
/// fails, the file is left untouched.
pub fn update_bytes_atomic<R, E, F>(path: &Path, apply: F) -> Result<R, E>
where
    E: From<StoreIoError>,
    F: FnOnce(Option<Vec<u8>>) -> Result<(Vec<u8>, R), E>,
{
    let _lock = StoreLock::acquire(&lock_path_for(path), LockMode::Exclusive)?;
    let current = read_unlocked(path)?;
    let (bytes, outcome) = apply(current)?;
    write_unlocked(path, &bytes)?;
    Ok(outcome)
}

fn read_unlocked(path: &Path) -> Result<Option<Vec<u8>>, StoreIoError> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(Some(buf))
}

/// Caller must hold the exclusive lock.
fn write_unlocked(path: &Path, bytes: &[u8]) -> Result<(), StoreIoError> {
    ensure_parent_dir(path)?;

    let dir = path.parent().ok_or(StoreIoError::NoParentDir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;

    tmp.as_file_mut().write_all(bytes)?;
    tmp.as_file_mut().sync_all()?;

    #[cfg(unix)]
    tmp.as_file()
        .set_permissions(fs::Permissions::from_mode(0o600))?;

    let _persisted = tmp.persist(path).map_err(std::io::Error::from)?;
    set_permissions_0600(path)?;

    fsync_dir(dir)?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<(), StoreIoError> {
    let parent = path.parent().ok_or(StoreIoError::NoParentDir)?;
    fs::create_dir_all(parent)?;
    Ok(())
}

fn set_permissions_0600(path: &Path) -> Result<(), StoreIoError> {
    #[cfg(unix)]
    {
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

fn fsync_dir(dir: &Path) -> Result<(), StoreIoError> {
    #[cfg(unix)]
    {
        let file = File::open(dir)?;
        file.sync_all()?;
    }
    #[cfg(not(unix))]
    let _ = dir;
    Ok(())
}

fn lock_file(file: &File, mode: LockMode) -> Result<(), StoreIoError> {
    #[cfg(unix)]
    {
        let op = match mode {
            LockMode::Shared => libc::LOCK_SH,
            LockMode::Exclusive => libc::LOCK_EX,
        };

        // SAFETY: the descriptor belongs to `file`, which outlives this call.
        let rc = unsafe { libc::flock(file.as_raw_fd(), op) };
        if rc == 0 {
            Ok(())
        } else {
            Err(StoreIoError::LockFailed)
        }
    }

    #[cfg(not(unix))]
    {
        let _ = file;
        let _ = mode;
        Err(StoreIoError::UnsupportedPlatform)
    }
}
