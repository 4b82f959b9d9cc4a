//! Runtime configuration assembled once at startup.
//!
//! Components never read ambient environment state; everything they need is
//! resolved here and passed down by reference. Required settings are
//! validated together so the operator sees every missing name in one
//! message instead of one per run.

use crate::api::ProvisionTarget;
use crate::constants::{
    API_KEY_ENV_VAR, DEFAULT_APARTMENT_FILE, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES,
    DEFAULT_OUTPUT_FILE, DEFAULT_PASSPHRASE_LENGTH, DEFAULT_SSID_NUMBER, GROUP_POLICY_ID_ENV_VAR,
    MIN_PASSPHRASE_LENGTH, NETWORK_ID_ENV_VAR,
};
use std::path::PathBuf;
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the environment variables {} must be set", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("max retries must be at least 1")]
    RetriesOutOfRange,

    #[error("passphrase length must be at least {min}, got {0}", min = MIN_PASSPHRASE_LENGTH)]
    LengthOutOfRange(usize),
}

/// Optional knobs, usually supplied by CLI flags with env fallbacks.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub max_retries: u32,
    pub passphrase_length: usize,
    pub base_url: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_APARTMENT_FILE),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            max_retries: DEFAULT_MAX_RETRIES,
            passphrase_length: DEFAULT_PASSPHRASE_LENGTH,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Fully resolved configuration for one provisioning run.
#[derive(Debug)]
pub struct Config {
    pub api_key: Zeroizing<String>,
    pub network_id: String,
    pub group_policy_id: String,
    pub base_url: String,
    pub max_retries: u32,
    pub passphrase_length: usize,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub ssid_number: u8,
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn from_env(options: RunOptions) -> Result<Self, ConfigError> {
        Self::from_lookup(options, |name| std::env::var(name).ok())
    }

    /// Resolve configuration through an explicit lookup function, so the
    /// missing-variable contract is testable without mutating process env.
    ///
    /// An unset variable and an empty one are both treated as missing.
    pub fn from_lookup(
        options: RunOptions,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let api_key = require(&lookup, API_KEY_ENV_VAR, &mut missing);
        let network_id = require(&lookup, NETWORK_ID_ENV_VAR, &mut missing);
        let group_policy_id = require(&lookup, GROUP_POLICY_ID_ENV_VAR, &mut missing);
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        if options.max_retries == 0 {
            return Err(ConfigError::RetriesOutOfRange);
        }
        // Rejecting bad lengths here keeps the batch loop free of
        // generation errors.
        if options.passphrase_length < MIN_PASSPHRASE_LENGTH {
            return Err(ConfigError::LengthOutOfRange(options.passphrase_length));
        }

        Ok(Self {
            api_key: Zeroizing::new(api_key),
            network_id,
            group_policy_id,
            base_url: options.base_url,
            max_retries: options.max_retries,
            passphrase_length: options.passphrase_length,
            input_path: options.input,
            output_path: options.output,
            ssid_number: DEFAULT_SSID_NUMBER,
        })
    }

    /// The fixed scope every credential in this run is created under.
    pub fn target(&self) -> ProvisionTarget {
        ProvisionTarget {
            network_id: self.network_id.clone(),
            ssid_number: self.ssid_number,
            group_policy_id: self.group_policy_id.clone(),
        }
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> String {
    match lookup(name) {
        Some(value) if !value.is_empty() => value,
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_env(name: &str) -> Option<String> {
        match name {
            API_KEY_ENV_VAR => Some("0123456789abcdef".into()),
            NETWORK_ID_ENV_VAR => Some("N_1234".into()),
            GROUP_POLICY_ID_ENV_VAR => Some("102".into()),
            _ => None,
        }
    }

    #[test]
    fn test_all_missing_reported_in_one_error() {
        let err = Config::from_lookup(RunOptions::default(), |_| None).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec![
                API_KEY_ENV_VAR,
                NETWORK_ID_ENV_VAR,
                GROUP_POLICY_ID_ENV_VAR
            ])
        );
        let message = err.to_string();
        assert!(message.contains("MERAKI_API_KEY"));
        assert!(message.contains("NETWORK_ID"));
        assert!(message.contains("GROUP_POLICY_ID"));
    }

    #[test]
    fn test_partial_env_reports_only_missing() {
        let err = Config::from_lookup(RunOptions::default(), |name| {
            (name == API_KEY_ENV_VAR).then(|| "key".to_string())
        })
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec![NETWORK_ID_ENV_VAR, GROUP_POLICY_ID_ENV_VAR])
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let err = Config::from_lookup(RunOptions::default(), |name| {
            if name == NETWORK_ID_ENV_VAR {
                Some(String::new())
            } else {
                full_env(name)
            }
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(vec![NETWORK_ID_ENV_VAR]));
    }

    #[test]
    fn test_resolves_with_defaults() {
        let config = Config::from_lookup(RunOptions::default(), full_env).unwrap();
        assert_eq!(config.network_id, "N_1234");
        assert_eq!(config.group_policy_id, "102");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.passphrase_length, 8);
        assert_eq!(config.input_path, PathBuf::from("apartments.txt"));
        assert_eq!(config.output_path, PathBuf::from("output.txt"));
        assert_eq!(config.ssid_number, 0);
    }

    #[test]
    fn test_zero_retries_rejected() {
        let options = RunOptions {
            max_retries: 0,
            ..Default::default()
        };
        assert_eq!(
            Config::from_lookup(options, full_env).unwrap_err(),
            ConfigError::RetriesOutOfRange
        );
    }

    #[test]
    fn test_short_passphrase_length_rejected() {
        let options = RunOptions {
            passphrase_length: 3,
            ..Default::default()
        };
        assert_eq!(
            Config::from_lookup(options, full_env).unwrap_err(),
            ConfigError::LengthOutOfRange(3)
        );
    }

    #[test]
    fn test_target_carries_run_scope() {
        let config = Config::from_lookup(RunOptions::default(), full_env).unwrap();
        let target = config.target();
        assert_eq!(target.network_id, "N_1234");
        assert_eq!(target.ssid_number, 0);
        assert_eq!(target.group_policy_id, "102");
    }
}
