//! Sql resource definition.
//!
//! Only the fields the policy reads are modelled. `metadata` and `spec` are
//! optional so that objects missing them decode cleanly and are rejected
//! with a structural error instead of faulting.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sql is a database claim submitted for admission.
///
/// Example:
/// ```yaml
/// apiVersion: devopstoolkitseries.com/v1alpha1
/// kind: Sql
/// metadata:
///   name: my-db
///   namespace: production
/// spec:
///   id: my-db
///   parameters:
///     version: "14"
///     size: medium
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sql {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<SqlSpec>,
}

/// Desired state of an Sql resource
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SqlSpec {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub parameters: SqlSpecParameters,
}

/// Provisioning parameters
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SqlSpecParameters {
    /// Database engine version
    #[serde(default)]
    pub version: String,

    /// Provisioning size, the field restricted by the policy
    #[serde(default)]
    pub size: String,
}

impl Sql {
    /// Kind name of the resource
    pub const KIND: &'static str = "Sql";

    /// Decode an Sql object from its raw JSON text
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(Error::DecodeObject)
    }

    /// `metadata.name`, empty when unset
    pub fn name(&self) -> Result<&str> {
        let metadata = self
            .metadata
            .as_ref()
            .ok_or(Error::MissingField("metadata"))?;
        Ok(metadata.name.as_deref().unwrap_or_default())
    }

    /// `metadata.namespace`, if the object carries one
    pub fn namespace(&self) -> Option<&str> {
        self.metadata.as_ref()?.namespace.as_deref()
    }

    /// `spec.parameters.size`, empty when unset
    pub fn size(&self) -> Result<&str> {
        let spec = self.spec.as_ref().ok_or(Error::MissingField("spec"))?;
        Ok(spec.parameters.size.as_str())
    }
}
