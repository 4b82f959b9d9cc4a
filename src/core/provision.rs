//! Bounded retry with exponential backoff around the identity PSK capability.

use crate::api::{IdentityPskClient, ProvisionTarget};
use crate::constants::DEFAULT_MAX_RETRIES;
use std::time::Duration;

/// Retry bounds and backoff schedule for provisioning calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Delay after a failed attempt, 0-indexed: 1s, 2s, 4s, ...
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_secs(1u64.checked_shl(attempt).unwrap_or(u64::MAX))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

type SleepFn = Box<dyn Fn(Duration)>;

/// Drives the identity PSK capability with retries.
///
/// The sleep function is injectable so the backoff schedule can be asserted
/// in tests without waiting on a real clock.
pub struct Provisioner<C: IdentityPskClient> {
    client: C,
    policy: RetryPolicy,
    target: ProvisionTarget,
    sleep: SleepFn,
}

impl<C: IdentityPskClient> Provisioner<C> {
    pub fn new(client: C, policy: RetryPolicy, target: ProvisionTarget) -> Self {
        Self::with_sleep(client, policy, target, Box::new(std::thread::sleep))
    }

    pub fn with_sleep(
        client: C,
        policy: RetryPolicy,
        target: ProvisionTarget,
        sleep: SleepFn,
    ) -> Self {
        Self {
            client,
            policy,
            target,
            sleep,
        }
    }

    pub fn target(&self) -> &ProvisionTarget {
        &self.target
    }

    /// Try to commit one credential on the remote controller.
    ///
    /// Returns true once an attempt both transports cleanly and carries no
    /// application-level errors; false after the policy is exhausted. A
    /// unit's failure must never abort the batch, so API errors stay here.
    pub fn provision(&self, unit: &str, passphrase: &str) -> bool {
        for attempt in 0..self.policy.max_attempts {
            match self.client.create_identity_psk(&self.target, unit, passphrase) {
                Ok(response) if !response.has_errors() => {
                    tracing::info!(unit = %unit, "created identity PSK");
                    return true;
                }
                Ok(response) => {
                    tracing::warn!(
                        unit = %unit,
                        attempt = attempt + 1,
                        max_attempts = self.policy.max_attempts,
                        errors = ?response.errors,
                        "dashboard rejected identity PSK"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        unit = %unit,
                        attempt = attempt + 1,
                        max_attempts = self.policy.max_attempts,
                        error = %e,
                        "identity PSK attempt failed"
                    );
                }
            }

            // No sleep after the final attempt.
            if attempt + 1 < self.policy.max_attempts {
                (self.sleep)(self.policy.backoff(attempt));
            }
        }

        tracing::error!(
            unit = %unit,
            attempts = self.policy.max_attempts,
            "failed to create identity PSK, giving up"
        );
        false
    }
}
