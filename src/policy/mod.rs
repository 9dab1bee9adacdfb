//! Policy entry points.
//!
//! The host calls two independent functions, both bytes in and bytes out:
//! - [`validate_settings`]: pre-flight of a settings payload
//! - [`validate`]: decision on one admission request
//!
//! Neither function fails on bad input. Undecodable input becomes a rejection
//! carrying code 400; a size outside the allow-list becomes a rejection
//! without code. The only error surfaced is a failure to encode the response.

pub mod protocol;
pub mod rules;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::settings::Settings;
use rules::{ValidationContext, ValidationResult, validate_all};

pub use protocol::{SettingsValidationResponse, ValidationRequest, ValidationResponse};

/// Encoded response handed back to the host
pub type CallResult = serde_json::Result<Vec<u8>>;

/// Validate an admission request and encode the decision
pub fn validate(payload: &[u8]) -> CallResult {
    evaluate(payload).to_bytes()
}

/// Validate a settings payload and encode the outcome
pub fn validate_settings(payload: &[u8]) -> CallResult {
    evaluate_settings(payload).to_bytes()
}

/// Decide on an admission request
pub fn evaluate(payload: &[u8]) -> ValidationResponse {
    match decide(payload) {
        Ok(result) if result.allowed => ValidationResponse::accept(),
        Ok(result) => deny(&result),
        Err(e) => {
            warn!(error = %e, "rejecting undecodable validation request");
            ValidationResponse::reject(e.to_string(), Some(e.code()))
        }
    }
}

/// Turn a rule denial into a rejection without code. The reason is logged,
/// only the message reaches the host.
fn deny(result: &ValidationResult) -> ValidationResponse {
    let reason = result.reason.as_deref().unwrap_or("ValidationFailed");
    let message = result.message.as_deref().unwrap_or_default();
    info!(reason = %reason, message = %message, "Admission request denied");
    ValidationResponse::reject(message, None)
}

fn decide(payload: &[u8]) -> Result<ValidationResult> {
    let request = ValidationRequest::from_slice(payload)?;
    let settings = request.settings()?;
    let resource = request.sql()?;
    let ctx = ValidationContext::new(&resource, &settings, request.dry_run())?;

    debug!(
        uid = %request.request.uid,
        operation = %request.request.operation,
        name = %ctx.name,
        namespace = ?ctx.namespace,
        dry_run = ctx.dry_run,
        "validating SQL object"
    );

    Ok(validate_all(&ctx))
}

/// Check a settings payload
pub fn evaluate_settings(payload: &[u8]) -> SettingsValidationResponse {
    info!("validating settings");

    let settings = match Settings::parse(payload) {
        Ok(settings) => settings,
        Err(e) => {
            warn!(error = %e, "rejecting settings");
            return SettingsValidationResponse::reject(format!(
                "Provided settings are not valid: {}",
                e
            ));
        }
    };

    match settings.validate() {
        Ok(true) => SettingsValidationResponse::accept(),
        Ok(false) => {
            warn!("rejecting settings");
            SettingsValidationResponse::reject("Provided settings are not valid")
        }
        Err(e) => {
            warn!(error = %e, "rejecting settings");
            SettingsValidationResponse::reject(format!("Provided settings are not valid: {}", e))
        }
    }
}
