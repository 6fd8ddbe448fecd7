//! # File I/O
//!
//! Reading and writing project and geometry files:
//! - **Atomic saves**: write a sibling `.tmp`, fsync, rename over the target
//! - **File locking**: an OS lock plus a `.lock` sidecar naming the holder
//! - **Version validation**: project files from a newer schema are refused
//!
//! Both file kinds are pretty-printed JSON. Geometry files hold a bare
//! [`GeometryRecord`] so they can be shared between projects.
//!
//! ## Example
//!
//! ```rust,no_run
//! use trestle_core::file_io::{load_project, save_project, FileLock};
//! use trestle_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Engineer", "25-001", "Civil 101");
//! let path = Path::new("bridge.json");
//!
//! let lock = FileLock::acquire(path, "engineer@example.com")?;
//! save_project(&project, path)?;
//! drop(lock);
//!
//! let reloaded = load_project(path)?;
//! assert_eq!(reloaded.meta.id, project.meta.id);
//! # Ok::<(), trestle_core::errors::CalcError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};
use crate::section::GeometryRecord;

/// Age after which a lock from another machine is treated as abandoned.
const STALE_LOCK_HOURS: i64 = 24;

// ============================================================================
// Locking
// ============================================================================

/// Contents of a `.lock` sidecar file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Who holds the lock (email or username)
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process.
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: machine_name(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// Whether the holder has gone away.
    ///
    /// On the same machine the holder's pid is checked where the platform
    /// allows it; any lock older than a day is stale.
    pub fn is_stale(&self) -> bool {
        if Utc::now() - self.locked_at > Duration::hours(STALE_LOCK_HOURS) {
            return true;
        }
        self.machine == machine_name() && !process_alive(self.pid)
    }

    fn holder(&self) -> String {
        format!("{} ({})", self.user_id, self.machine)
    }
}

fn machine_name() -> String {
    ["HOSTNAME", "HOST", "COMPUTERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(target_os = "linux")]
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}", pid)).exists()
}

#[cfg(not(target_os = "linux"))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// Exclusive lock on a file, released on drop.
///
/// Holds an OS lock (fs2) on the sidecar for process safety and writes
/// [`LockInfo`] into it so other users can see who has the file open.
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
    lock_path: PathBuf,
    _handle: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire the lock for `path`.
    ///
    /// Fails with [`CalcError::FileLocked`] when a live holder exists.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        if let Some(existing) = FileLock::check(path) {
            return Err(CalcError::file_locked(
                path.display().to_string(),
                existing.holder(),
                existing.locked_at.to_rfc3339(),
            ));
        }

        let lock_path = lock_path_for(path);
        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| io_error("create lock", &lock_path, e))?;

        handle.try_lock_exclusive().map_err(|_| {
            CalcError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        let info = LockInfo::new(user_id);
        let json = serde_json::to_string_pretty(&info).map_err(CalcError::serialization)?;
        handle
            .write_all(json.as_bytes())
            .and_then(|_| handle.sync_all())
            .map_err(|e| io_error("write lock", &lock_path, e))?;

        log::debug!("locked {} for {}", path.display(), info.user_id);
        Ok(FileLock {
            path: path.to_path_buf(),
            lock_path,
            _handle: handle,
            info,
        })
    }

    /// The live holder of `path`, if any, without taking the lock.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let contents = fs::read_to_string(lock_path_for(path)).ok()?;
        let info: LockInfo = serde_json::from_str(&contents).ok()?;
        if info.is_stale() {
            log::warn!("ignoring stale lock on {} held by {}", path.display(), info.holder());
            None
        } else {
            Some(info)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `bridge.json` → `bridge.json.lock`
fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

// ============================================================================
// Reading and Writing
// ============================================================================

fn io_error(operation: &str, path: &Path, err: std::io::Error) -> CalcError {
    CalcError::file_error(operation, path.display().to_string(), err.to_string())
}

/// Write `contents` next to `path`, fsync, then rename over `path`.
fn write_atomic(path: &Path, contents: &str) -> CalcResult<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let mut tmp = File::create(&tmp_path).map_err(|e| io_error("create temp file", &tmp_path, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|_| tmp.sync_all())
        .map_err(|e| io_error("write temp file", &tmp_path, e))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_error("rename to final", path, e)
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> CalcResult<T> {
    let contents = fs::read_to_string(path).map_err(|e| io_error("read", path, e))?;
    serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("invalid JSON in {}: {}", path.display(), e)))
}

/// Save a project atomically.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(project).map_err(CalcError::serialization)?;
    write_atomic(path, &json)?;
    log::info!("saved project {} to {}", project.meta.job_id, path.display());
    Ok(())
}

/// Load a project and check its schema version.
///
/// # Errors
///
/// * `FileError` - the file cannot be read
/// * `SerializationError` - the file is not a valid project
/// * `VersionMismatch` - the file was written by an incompatible schema
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let project: Project = read_json(path)?;
    validate_version(&project.meta.version)?;
    Ok(project)
}

/// Load a project and report who, if anyone, holds its lock.
pub fn load_project_with_lock_check(path: &Path) -> CalcResult<(Project, Option<LockInfo>)> {
    let project = load_project(path)?;
    Ok((project, FileLock::check(path)))
}

/// Save bare cross-section geometry atomically.
pub fn save_geometry(record: &GeometryRecord, path: &Path) -> CalcResult<()> {
    write_atomic(path, &record.to_json()?)
}

/// Load bare cross-section geometry.
pub fn load_geometry(path: &Path) -> CalcResult<GeometryRecord> {
    read_json(path)
}

/// A file's schema is compatible when its major version matches and, while
/// the schema is pre-1.0, its minor version is not newer than ours.
pub fn validate_version(file_version: &str) -> CalcResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file = parse(file_version);
    let current = parse(SCHEMA_VERSION);

    let compatible = match (file.as_slice(), current.as_slice()) {
        ([f_major, f_rest @ ..], [c_major, c_rest @ ..]) if f_major == c_major => {
            *c_major != 0 || f_rest.first().unwrap_or(&0) <= c_rest.first().unwrap_or(&0)
        }
        _ => false,
    };

    if compatible {
        Ok(())
    } else {
        Err(CalcError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        })
    }
}
