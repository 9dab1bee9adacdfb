//! Error types for request validation.
//!
//! Every variant is a structural failure: the input could not be decoded
//! into something the policy can judge. A policy veto is not an error.

use thiserror::Error;

use crate::settings::SettingsError;

/// Code attached to rejections caused by undecodable input
pub const BAD_REQUEST: u16 = 400;

/// Error type for request validation
#[derive(Error, Debug)]
pub enum Error {
    /// The validation request envelope is not valid JSON
    #[error(transparent)]
    InvalidRequest(serde_json::Error),

    /// The settings embedded in the envelope cannot be parsed
    #[error(transparent)]
    InvalidSettings(#[from] SettingsError),

    /// The target object cannot be decoded as an Sql resource
    #[error("Cannot decode SQL object: {0}")]
    DecodeObject(serde_json::Error),

    /// The target object lacks a required section
    #[error("Cannot decode SQL object: missing field `{0}`")]
    MissingField(&'static str),
}

impl Error {
    /// Code reported to the host alongside the rejection
    pub fn code(&self) -> u16 {
        match self {
            Error::InvalidRequest(_)
            | Error::InvalidSettings(_)
            | Error::DecodeObject(_)
            | Error::MissingField(_) => BAD_REQUEST,
        }
    }
}

/// Result type alias for request validation
pub type Result<T> = std::result::Result<T, Error>;
