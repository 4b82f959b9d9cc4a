//! File-based locking using flock(2), scoped to a report path.
//!
//! Two concurrent runs appending to the same report would interleave
//! records, so a run takes `<report>.lock` for its whole lifetime.

use anyhow::{bail, Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// An exclusive run lock. Released on drop (file close releases flock).
#[derive(Debug)]
pub struct RunLock {
    _file: File,
}

impl RunLock {
    /// Acquire `<report>.lock` without blocking. Fails if another run
    /// already holds it.
    pub fn acquire(report_path: &Path) -> Result<Self> {
        let lock_path = lock_path_for(report_path);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("open lock file {}", lock_path.display()))?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self { _file: file }),
            Err(ref e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    // fs2 on Linux may return EAGAIN instead of WouldBlock
                    || e.raw_os_error() == Some(11) =>
            {
                bail!(
                    "another provisioning run is already writing {}",
                    report_path.display()
                )
            }
            Err(e) => Err(e).with_context(|| format!("lock {}", lock_path.display())),
        }
    }
}

fn lock_path_for(report_path: &Path) -> PathBuf {
    let mut os = report_path.as_os_str().to_os_string();
    os.push(".lock");
    PathBuf::from(os)
}
