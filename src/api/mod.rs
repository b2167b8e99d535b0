//! Azure DevOps API client module.
//!
//! This module provides the client that performs the one API interaction
//! this tool exists for: creating a pull request.
//!
//! ## Features
//!
//! - A single POST against the `pullrequests` REST resource
//! - HTTP Basic authentication with an empty username and the PAT as
//!   password
//! - A bounded request timeout; no retries
//! - A trait seam ([`PullRequestOperations`]) so the operation can be
//!   mocked in tests

mod client;
pub mod traits;

// Re-export the client and the operations trait
pub use client::AzureDevOpsClient;
pub use traits::PullRequestOperations;
