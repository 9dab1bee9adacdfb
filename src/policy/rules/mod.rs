//! Admission rules applied to a decoded Sql resource.
//!
//! Each rule inspects a [`ValidationContext`] and returns a
//! [`ValidationResult`]. Rules run in order and the first denial wins.

pub mod allowed_sizes;

use crate::crd::Sql;
use crate::error::Result;
use crate::settings::Settings;

/// Result of a validation check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub allowed: bool,
    /// Machine-readable reason for denial (if not allowed)
    pub reason: Option<String>,
    /// Message reported to the requester (if not allowed)
    pub message: Option<String>,
}

impl ValidationResult {
    /// Create an allowed result
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
            message: None,
        }
    }

    /// Create a denied result
    pub fn denied(reason: &str, message: &str) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.to_string()),
            message: Some(message.to_string()),
        }
    }
}

/// Context for validation
#[derive(Debug)]
pub struct ValidationContext<'a> {
    /// `metadata.name` of the resource
    pub name: &'a str,
    /// `metadata.namespace` of the resource
    pub namespace: Option<&'a str>,
    /// Requested `spec.parameters.size`
    pub size: &'a str,
    /// Settings the policy was deployed with
    pub settings: &'a Settings,
    /// Whether this is a dry-run request
    pub dry_run: bool,
}

impl<'a> ValidationContext<'a> {
    /// Build a context, failing if the resource lacks `metadata` or `spec`
    pub fn new(resource: &'a Sql, settings: &'a Settings, dry_run: bool) -> Result<Self> {
        Ok(Self {
            name: resource.name()?,
            namespace: resource.namespace(),
            size: resource.size()?,
            settings,
            dry_run,
        })
    }
}

/// Run all rules
pub fn validate_all(ctx: &ValidationContext<'_>) -> ValidationResult {
    let result = allowed_sizes::validate(ctx);
    if !result.allowed {
        return result;
    }

    ValidationResult::allowed()
}
