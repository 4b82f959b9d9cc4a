//! Dashboard API surface for identity PSK creation.
//!
//! The `IdentityPskClient` trait abstracts the controller's REST API so the
//! retry and batch logic can be exercised against fakes. `DashboardClient`
//! is the production implementation.

use crate::constants::API_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use zeroize::Zeroizing;

/// Scope every credential is created under. Fixed for the lifetime of a
/// run; built once from configuration rather than re-read per call.
#[derive(Debug, Clone)]
pub struct ProvisionTarget {
    pub network_id: String,
    pub ssid_number: u8,
    pub group_policy_id: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("dashboard returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateIdentityPskBody<'a> {
    name: &'a str,
    passphrase: &'a str,
    group_policy_id: &'a str,
}

/// Response body of the identityPsks create call.
///
/// The dashboard reports application-level failures through an `errors`
/// array, which can appear even alongside a 2xx status. Other fields are
/// kept only as far as logging needs them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityPskResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl IdentityPskResponse {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Capability to create a named identity PSK credential.
pub trait IdentityPskClient {
    fn create_identity_psk(
        &self,
        target: &ProvisionTarget,
        name: &str,
        passphrase: &str,
    ) -> Result<IdentityPskResponse, ApiError>;
}

/// Blocking HTTP client against the dashboard REST API.
pub struct DashboardClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: Zeroizing<String>,
}

impl DashboardClient {
    pub fn new(base_url: &str, api_key: Zeroizing<String>) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

impl IdentityPskClient for DashboardClient {
    fn create_identity_psk(
        &self,
        target: &ProvisionTarget,
        name: &str,
        passphrase: &str,
    ) -> Result<IdentityPskResponse, ApiError> {
        let url = format!(
            "{}/networks/{}/wireless/ssids/{}/identityPsks",
            self.base_url, target.network_id, target.ssid_number
        );
        tracing::debug!(url = %url, unit = %name, "creating identity PSK");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.as_str())
            .json(&CreateIdentityPskBody {
                name,
                passphrase,
                group_policy_id: &target.group_policy_id,
            })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json()?)
    }
}
