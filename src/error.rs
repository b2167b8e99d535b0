//! Unified error handling for the openpr library.
//!
//! This module provides the error hierarchy using `thiserror` for better
//! programmatic error handling and more informative error messages.
//!
//! ## Error Categories
//!
//! - [`ApiError`]: Errors from the Azure DevOps pull request API call
//! - [`ConfigError`]: Errors from configuration loading and validation
//!
//! Every error is terminal for the invocation: nothing is retried or
//! recovered locally.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the openpr library.
#[derive(Error, Debug)]
pub enum OpenprError {
    /// An error occurred while talking to the Azure DevOps API.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// An error occurred while loading or validating configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by the single pull-request-creation call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS failure, refused
    /// connection, timeout, reset).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with something other than 201 Created.
    #[error("pull request creation failed with status {status}")]
    RequestFailed {
        /// HTTP status code returned by the service.
        status: u16,
        /// Raw response body, reported verbatim.
        body: String,
    },

    /// The service answered 201 but the body was not the expected JSON.
    #[error("failed to parse API response: {message}")]
    ParseError {
        /// Description of the parse failure.
        message: String,
    },
}

/// Errors that can occur during configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No personal access token was found in any configuration source.
    #[error(
        "a PAT must be provided via --pat, the ENCODED_PAT environment variable, or the config file"
    )]
    MissingCredential,

    /// A required configuration field is missing from every source.
    #[error("{field} is required")]
    MissingRequired {
        /// Name of the missing field.
        field: String,
    },

    /// Failed to read the configuration file.
    #[error("failed to read config file at {path}: {message}")]
    FileRead {
        /// Path to the config file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Failed to parse the configuration file.
    #[error("failed to parse config file at {path}: {message}")]
    FileParse {
        /// Path to the config file.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// An invalid value was provided for a configuration field.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// Name of the field with the invalid value.
        field: String,
        /// Description of why the value is invalid.
        message: String,
    },
}

/// Type alias for Results using OpenprError.
pub type OpenprResult<T> = std::result::Result<T, OpenprError>;
