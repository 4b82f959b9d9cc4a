//! Durable provisioning report and its timestamped archive copy.
//!
//! The report is the record of what actually happened on the controller, so
//! its write discipline is strict: every record is flushed as soon as it is
//! appended, and the whole file is synced before the run ends.

use crate::constants::{ARCHIVE_PREFIX, ARCHIVE_TIMESTAMP_FORMAT, REPORT_FILE_MODE};
use crate::models::outcome::ProvisioningOutcome;
use crate::util::fs as report_fs;
use anyhow::{bail, Context, Result};
use chrono::Local;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only writer for the per-unit outcome records.
pub struct ReportWriter {
    file: File,
    path: PathBuf,
}

impl ReportWriter {
    /// Create (or truncate) the report file with restrictive permissions;
    /// it holds live passphrases.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                report_fs::ensure_dir(parent)?;
            }
        }
        let file =
            File::create(path).with_context(|| format!("create report {}", path.display()))?;
        report_fs::set_permissions(path, REPORT_FILE_MODE)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Append one record and flush it immediately, so a crash loses at most
    /// the in-flight record.
    pub fn append(&mut self, outcome: &ProvisioningOutcome) -> Result<()> {
        writeln!(self.file, "{}", outcome.record_line())
            .with_context(|| format!("write report {}", self.path.display()))?;
        self.file
            .flush()
            .with_context(|| format!("flush report {}", self.path.display()))
    }

    /// Force the report to stable storage and close it.
    pub fn finish(self) -> Result<()> {
        self.file
            .sync_all()
            .with_context(|| format!("sync report {}", self.path.display()))
    }
}

/// Copy the completed report to `subnet_<policyId>_<YYYYMMDDHHMMSS>.txt` in
/// the report's directory. The report itself stays in place.
pub fn archive(report_path: &Path, group_policy_id: &str) -> Result<PathBuf> {
    let stamp = Local::now().format(ARCHIVE_TIMESTAMP_FORMAT);
    let name = format!("{}_{}_{}.txt", ARCHIVE_PREFIX, group_policy_id, stamp);
    let dir = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let archive_path = dir.join(name);

    let contents = std::fs::read(report_path)
        .with_context(|| format!("read report {}", report_path.display()))?;

    // Write through a temp file so a half-written archive never appears
    // under the final name.
    let mut tmp = tempfile::Builder::new()
        .prefix("subnet-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .context("create archive temp file")?;
    tmp.write_all(&contents)
        .with_context(|| format!("write archive {}", archive_path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync archive {}", archive_path.display()))?;
    if let Err(e) = tmp.persist(&archive_path) {
        bail!("persist archive {}: {}", archive_path.display(), e);
    }
    report_fs::set_permissions(&archive_path, REPORT_FILE_MODE)?;

    Ok(archive_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn outcome(unit: &str, succeeded: bool) -> ProvisioningOutcome {
        ProvisioningOutcome {
            unit: unit.into(),
            passphrase: "aB3!xyzw".into(),
            group_policy_id: "102".into(),
            succeeded,
        }
    }

    #[test]
    fn test_append_writes_one_line_per_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.txt");
        let mut writer = ReportWriter::create(&path).unwrap();
        writer.append(&outcome("101", true)).unwrap();
        writer.append(&outcome("102", false)).unwrap();
        writer.finish().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "101,aB3!xyzw,102,success\n102,aB3!xyzw,102,failure\n");
    }

    #[test]
    fn test_append_is_visible_before_finish() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.txt");
        let mut writer = ReportWriter::create(&path).unwrap();
        writer.append(&outcome("101", true)).unwrap();

        // Flushed per line; readable while the writer is still open.
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with("success\n"));
    }

    #[test]
    fn test_create_truncates_previous_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.txt");
        fs::write(&path, "stale\n").unwrap();
        let writer = ReportWriter::create(&path).unwrap();
        writer.finish().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_archive_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.txt");
        fs::write(&path, "101,aB3!xyzw,102,success\n").unwrap();

        let archive_path = archive(&path, "102").unwrap();
        assert_eq!(fs::read(&path).unwrap(), fs::read(&archive_path).unwrap());
        assert!(path.exists());
    }

    #[test]
    fn test_archive_name_carries_policy_and_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.txt");
        fs::write(&path, "").unwrap();

        let archive_path = archive(&path, "gp_42").unwrap();
        let name = archive_path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("subnet_gp_42_"));
        assert!(name.ends_with(".txt"));
        let stamp = name
            .trim_start_matches("subnet_gp_42_")
            .trim_end_matches(".txt");
        assert_eq!(stamp.len(), 14);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(archive_path.parent(), path.parent());
    }
}
