//! Policy settings.
//!
//! Settings are supplied by the operator when the policy is deployed and are
//! independent of any admission request. They are parsed fresh on every call,
//! both by the settings validation entry point and by request validation.
//!
//! Example:
//! ```json
//! { "allowed_sizes": ["medium", "large"] }
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors raised while reading or checking settings
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Payload is not valid JSON or a field has the wrong type
    #[error(transparent)]
    Parse(#[from] serde_json::Error),

    /// Payload is valid JSON but not an object
    #[error("settings must be a JSON object")]
    NotAnObject,
}

/// Configuration of the SQL size policy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Settings {
    /// Sizes an Sql resource may request. An empty list places no restriction.
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Vec<String>")]
    pub allowed_sizes: Vec<String>,
}

impl Settings {
    /// Parse settings from a raw JSON payload.
    ///
    /// A missing or `null` `allowed_sizes` key yields an empty allow-list.
    /// Unknown keys are ignored.
    pub fn parse(payload: &[u8]) -> Result<Self, SettingsError> {
        let value: serde_json::Value = serde_json::from_slice(payload)?;
        match value {
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::Object(_) => Ok(serde_json::from_value(value)?),
            _ => Err(SettingsError::NotAnObject),
        }
    }

    /// Semantic checks on already parsed settings.
    ///
    /// `Ok(false)` rejects without detail, `Err` rejects with one. Every
    /// well-formed allow-list is currently accepted.
    pub fn validate(&self) -> Result<bool, SettingsError> {
        Ok(true)
    }

    /// Whether `size` may be requested under these settings.
    ///
    /// Comparison is exact and case-sensitive.
    pub fn is_size_allowed(&self, size: &str) -> bool {
        self.allowed_sizes.is_empty() || self.allowed_sizes.iter().any(|allowed| allowed == size)
    }

    /// JSON schema of the settings payload.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Settings)).unwrap_or_default()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
