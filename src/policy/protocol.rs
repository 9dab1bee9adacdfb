//! Wire types exchanged with the policy host.
//!
//! The host delivers a validation request envelope and expects a validation
//! response; settings are pre-flighted with a separate call answered by a
//! settings validation response. Only the envelope fields the policy reads
//! are modelled, everything else is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;

use crate::crd::Sql;
use crate::error::{Error, Result};
use crate::settings::Settings;

/// Envelope delivered by the host for each admission request
#[derive(Debug, Deserialize)]
pub struct ValidationRequest {
    /// Policy settings, embedded verbatim
    #[serde(default)]
    pub settings: Option<Box<RawValue>>,

    /// The Kubernetes admission request being judged
    #[serde(default)]
    pub request: KubernetesAdmissionRequest,
}

/// The subset of a Kubernetes AdmissionRequest the policy looks at.
///
/// `uid`, `operation` and `dryRun` only feed log context, so they are kept as
/// untyped JSON and any value is tolerated.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesAdmissionRequest {
    #[serde(default)]
    pub uid: Value,

    #[serde(default)]
    pub operation: Value,

    #[serde(default)]
    pub dry_run: Value,

    /// Raw JSON of the object under admission
    #[serde(default)]
    pub object: Option<Box<RawValue>>,
}

impl ValidationRequest {
    /// Decode the envelope from the bytes handed over by the host
    pub fn from_slice(payload: &[u8]) -> Result<Self> {
        serde_json::from_slice(payload).map_err(Error::InvalidRequest)
    }

    /// Parse the embedded settings. Absent settings place no restriction.
    pub fn settings(&self) -> Result<Settings> {
        match &self.settings {
            Some(raw) => Ok(Settings::parse(raw.get().as_bytes())?),
            None => Ok(Settings::default()),
        }
    }

    /// Decode the object under admission
    pub fn sql(&self) -> Result<Sql> {
        let raw = self
            .request
            .object
            .as_ref()
            .ok_or(Error::MissingField("request.object"))?;
        Sql::from_json(raw.get())
    }

    /// Whether the admission request is a dry run
    pub fn dry_run(&self) -> bool {
        self.request.dry_run.as_bool().unwrap_or(false)
    }
}

/// Decision on an admission request
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidationResponse {
    pub accepted: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Set only when the input could not be decoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl ValidationResponse {
    /// Accept the request
    pub fn accept() -> Self {
        Self {
            accepted: true,
            message: None,
            code: None,
        }
    }

    /// Reject the request
    pub fn reject(message: impl Into<String>, code: Option<u16>) -> Self {
        Self {
            accepted: false,
            message: Some(message.into()),
            code,
        }
    }

    /// Encode for the host
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Outcome of a settings pre-flight
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SettingsValidationResponse {
    pub valid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SettingsValidationResponse {
    /// Accept the settings
    pub fn accept() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    /// Reject the settings
    pub fn reject(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }

    /// Encode for the host
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
