//! Sequential batch loop: unit identifiers in, outcome records out.

use crate::api::IdentityPskClient;
use crate::core::passphrase;
use crate::core::provision::Provisioner;
use crate::core::report::{self, ReportWriter};
use crate::core::run_lock::RunLock;
use crate::models::outcome::{BatchSummary, ProvisioningOutcome};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Result of a completed batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    pub summary: BatchSummary,
    pub archive_path: PathBuf,
}

/// Drives the whole provisioning pass for one unit list.
///
/// Units are processed strictly in input order, one at a time; the only
/// waits are the provisioner's backoff sleeps.
pub struct BatchRunner<C: IdentityPskClient> {
    provisioner: Provisioner<C>,
    passphrase_length: usize,
    output_path: PathBuf,
}

impl<C: IdentityPskClient> BatchRunner<C> {
    pub fn new(provisioner: Provisioner<C>, passphrase_length: usize, output_path: &Path) -> Self {
        Self {
            provisioner,
            passphrase_length,
            output_path: output_path.to_path_buf(),
        }
    }

    /// Provision every unit in `input_path` and report each outcome.
    ///
    /// Per-unit failures are recorded, not propagated; report I/O errors
    /// abort the run, since a broken output stream invalidates it.
    pub fn run(&self, input_path: &Path) -> Result<BatchOutcome> {
        let _lock = RunLock::acquire(&self.output_path)?;

        // Open the unit list before touching the report, so a missing input
        // never truncates a previous run's output.
        let input = File::open(input_path)
            .with_context(|| format!("open unit list {}", input_path.display()))?;
        let reader = BufReader::new(input);

        let mut writer = ReportWriter::create(&self.output_path)?;
        let mut summary = BatchSummary::default();
        let group_policy_id = self.provisioner.target().group_policy_id.clone();

        for line in reader.lines() {
            let line =
                line.with_context(|| format!("read unit list {}", input_path.display()))?;
            // Blank lines are not filtered; an empty unit name is still
            // provisioned and reported.
            let unit = line.trim().to_string();

            let passphrase = passphrase::generate(self.passphrase_length)?;
            let succeeded = self.provisioner.provision(&unit, &passphrase);

            let outcome = ProvisioningOutcome {
                unit,
                passphrase,
                group_policy_id: group_policy_id.clone(),
                succeeded,
            };
            writer.append(&outcome)?;
            summary.record(succeeded);
        }

        writer.finish()?;
        let archive_path = report::archive(&self.output_path, &group_policy_id)?;

        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            archive = %archive_path.display(),
            "batch run complete"
        );

        Ok(BatchOutcome {
            summary,
            archive_path,
        })
    }
}
