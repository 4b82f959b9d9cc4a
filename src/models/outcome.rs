//! Per-unit provisioning outcome records.

use serde::Serialize;

/// Result of provisioning a single unit. Created once per unit and
/// serialized to the report immediately; never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisioningOutcome {
    pub unit: String,
    pub passphrase: String,
    pub group_policy_id: String,
    pub succeeded: bool,
}

impl ProvisioningOutcome {
    /// Report record: `unit,passphrase,policyId,success|failure`.
    ///
    /// Comma-delimited with no escaping; the passphrase alphabet excludes
    /// the comma so fields can never collide with the delimiter.
    pub fn record_line(&self) -> String {
        format!(
            "{},{},{},{}",
            self.unit,
            self.passphrase,
            self.group_policy_id,
            if self.succeeded { "success" } else { "failure" }
        )
    }
}

/// Aggregate counts for a completed batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, succeeded: bool) {
        self.total += 1;
        if succeeded {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_line_success() {
        let outcome = ProvisioningOutcome {
            unit: "101".into(),
            passphrase: "aB3!xyzw".into(),
            group_policy_id: "102".into(),
            succeeded: true,
        };
        assert_eq!(outcome.record_line(), "101,aB3!xyzw,102,success");
    }

    #[test]
    fn test_record_line_failure() {
        let outcome = ProvisioningOutcome {
            unit: "204".into(),
            passphrase: "Zx9#qrst".into(),
            group_policy_id: "gp_7".into(),
            succeeded: false,
        };
        assert_eq!(outcome.record_line(), "204,Zx9#qrst,gp_7,failure");
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = BatchSummary::default();
        summary.record(true);
        summary.record(false);
        summary.record(true);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
    }
}
