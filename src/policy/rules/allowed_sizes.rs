//! Size allow-list rule.
//!
//! Denies an Sql resource whose `spec.parameters.size` is not listed in
//! `allowed_sizes`. An empty allow-list denies nothing.

use tracing::info;

use super::{ValidationContext, ValidationResult};

/// Reason attached to size denials
pub const REASON: &str = "SizeNotAllowed";

/// Validate the requested size against the allow-list
pub fn validate(ctx: &ValidationContext<'_>) -> ValidationResult {
    if ctx.settings.is_size_allowed(ctx.size) {
        return ValidationResult::allowed();
    }

    info!(
        name = %ctx.name,
        allowed_sizes = %ctx.settings.allowed_sizes.join(","),
        "rejecting SQL object"
    );

    ValidationResult::denied(
        REASON,
        &format!(
            "The '{}' name is on the deny list. The spec.parameters.size cannot be '{}'",
            ctx.name, ctx.size
        ),
    )
}
