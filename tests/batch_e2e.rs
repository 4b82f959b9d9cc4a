use ipsk_provisioner::api::{ApiError, IdentityPskClient, IdentityPskResponse, ProvisionTarget};
use ipsk_provisioner::core::batch::BatchRunner;
use ipsk_provisioner::core::provision::{Provisioner, RetryPolicy};
use std::cell::RefCell;
use std::fs;
use tempfile::TempDir;

/// Succeeds for every unit except `failing_unit`, counting all calls.
struct ScriptedClient {
    failing_unit: String,
    calls: RefCell<Vec<String>>,
}

impl IdentityPskClient for &ScriptedClient {
    fn create_identity_psk(
        &self,
        _target: &ProvisionTarget,
        name: &str,
        _passphrase: &str,
    ) -> Result<IdentityPskResponse, ApiError> {
        self.calls.borrow_mut().push(name.to_string());
        if name == self.failing_unit {
            return Err(ApiError::Http {
                status: 502,
                body: "Bad Gateway".into(),
            });
        }
        Ok(IdentityPskResponse::default())
    }
}

#[test]
fn mixed_batch_reports_and_archives_every_unit() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("apartments.txt");
    let output = dir.path().join("output.txt");
    fs::write(&input, "101\n102\n").unwrap();

    let client = ScriptedClient {
        failing_unit: "102".into(),
        calls: RefCell::new(Vec::new()),
    };
    let target = ProvisionTarget {
        network_id: "N_1234".into(),
        ssid_number: 0,
        group_policy_id: "102".into(),
    };
    let provisioner =
        Provisioner::with_sleep(&client, RetryPolicy::new(3), target, Box::new(|_| {}));
    let runner = BatchRunner::new(provisioner, 8, &output);

    let outcome = runner.run(&input).unwrap();
    assert_eq!(outcome.summary.total, 2);
    assert_eq!(outcome.summary.succeeded, 1);
    assert_eq!(outcome.summary.failed, 1);

    // One call for the success, three (exhausted retries) for the failure.
    let calls = client.calls.borrow();
    assert_eq!(calls.iter().filter(|u| *u == "101").count(), 1);
    assert_eq!(calls.iter().filter(|u| *u == "102").count(), 3);

    let contents = fs::read_to_string(&output).unwrap();
    let records: Vec<&str> = contents.lines().collect();
    assert_eq!(records.len(), 2);
    for (record, expected) in records.iter().zip(["101,", "102,"]) {
        assert!(record.starts_with(expected));
        let fields: Vec<&str> = record.split(',').collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[1].len(), 8);
        assert_eq!(fields[2], "102");
    }
    assert!(records[0].ends_with(",success"));
    assert!(records[1].ends_with(",failure"));

    // The archive is a byte-identical snapshot left next to the report.
    assert_eq!(
        fs::read(&output).unwrap(),
        fs::read(&outcome.archive_path).unwrap()
    );
    assert_eq!(outcome.archive_path.parent(), output.parent());
    let archive_name = outcome
        .archive_path
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(archive_name.starts_with("subnet_102_"));
    assert!(archive_name.ends_with(".txt"));
}
