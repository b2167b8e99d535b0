//! Trait for the pull request creation operation.
//!
//! The trait abstracts the one API operation to enable:
//! - Mocking for unit tests
//! - Alternative implementations
//! - Easier testing of async code

use async_trait::async_trait;

use crate::api::AzureDevOpsClient;
use crate::error::ApiError;
use crate::models::{CreatedPullRequest, NewPullRequest};

/// Trait for pull request creation.
///
/// Implemented by the real [`AzureDevOpsClient`] and by mock
/// implementations in tests.
#[async_trait]
pub trait PullRequestOperations: Send + Sync {
    /// Creates a pull request from the given request body.
    ///
    /// Implementations perform at most one remote call per invocation and
    /// never retry.
    async fn create_pull_request(
        &self,
        request: &NewPullRequest,
    ) -> Result<CreatedPullRequest, ApiError>;
}

#[async_trait]
impl PullRequestOperations for AzureDevOpsClient {
    async fn create_pull_request(
        &self,
        request: &NewPullRequest,
    ) -> Result<CreatedPullRequest, ApiError> {
        AzureDevOpsClient::create_pull_request(self, request).await
    }
}
