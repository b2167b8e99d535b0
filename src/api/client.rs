//! Azure DevOps API client implementation.
//!
//! This module provides the HTTP client that submits the single
//! pull-request-creation call against the Azure DevOps REST API.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, ConfigError, OpenprError};
use crate::models::{CreatedPullRequest, NewPullRequest};

/// REST API version the `pullrequests` resource is addressed with.
pub const API_VERSION: &str = "7.1-preview.1";

/// Bound on the whole request, connect included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Azure DevOps API client for pull request creation.
///
/// The client is bound to one organization, project, and repository; the
/// endpoint URL is built once at construction. Authentication is HTTP
/// Basic with an empty username and the PAT as password, which is how the
/// Azure DevOps REST API consumes personal access tokens.
///
/// # Example
///
/// ```rust,no_run
/// use openpr::AzureDevOpsClient;
/// use openpr::models::NewPullRequest;
/// use secrecy::SecretString;
/// use url::Url;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let organization = Url::parse("https://dev.azure.com/my-org")?;
/// let client = AzureDevOpsClient::new(
///     &organization,
///     "my-project",
///     "my-repo",
///     SecretString::from("my-pat".to_string()),
/// )?;
///
/// let request = NewPullRequest::for_branches("feature/login", "main");
/// let created = client.create_pull_request(&request).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AzureDevOpsClient {
    http: reqwest::Client,
    endpoint: Url,
    organization: Url,
    project: String,
    repository: String,
    pat: SecretString,
}

impl AzureDevOpsClient {
    /// Creates a new client with the default 30-second request timeout.
    ///
    /// # Arguments
    ///
    /// * `organization` - Azure DevOps organization URL
    /// * `project` - Azure DevOps project name
    /// * `repository` - Repository ID or name within the project
    /// * `pat` - Personal Access Token for authentication
    ///
    /// # Security
    ///
    /// The PAT stays wrapped in a `SecretString` and is only exposed at
    /// the moment the Basic auth header is built.
    pub fn new(
        organization: &Url,
        project: &str,
        repository: &str,
        pat: SecretString,
    ) -> Result<Self, OpenprError> {
        Self::with_timeout(organization, project, repository, pat, DEFAULT_TIMEOUT)
    }

    /// Creates a new client with an explicit request timeout.
    pub fn with_timeout(
        organization: &Url,
        project: &str,
        repository: &str,
        pat: SecretString,
        timeout: Duration,
    ) -> Result<Self, OpenprError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Transport)?;

        let endpoint = pull_requests_url(organization, project, repository)?;

        Ok(Self {
            http,
            endpoint,
            organization: organization.clone(),
            project: project.to_string(),
            repository: repository.to_string(),
            pat,
        })
    }

    /// Returns the organization URL.
    pub fn organization(&self) -> &Url {
        &self.organization
    }

    /// Returns the project name.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Returns the repository ID or name.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Creates a pull request.
    ///
    /// Sends exactly one POST; nothing is retried. A 201 response is the
    /// sole success condition. Any other status is returned as
    /// [`ApiError::RequestFailed`] carrying the status code and the raw
    /// response body; failures before an HTTP response arrives surface as
    /// [`ApiError::Transport`].
    ///
    /// The operation is not idempotent: invoking it again for the same
    /// source branch asks the service for a duplicate pull request.
    pub async fn create_pull_request(
        &self,
        request: &NewPullRequest,
    ) -> Result<CreatedPullRequest, ApiError> {
        debug!(
            endpoint = %self.endpoint,
            source = %request.source_ref_name,
            target = %request.target_ref_name,
            "submitting pull request creation"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .basic_auth("", Some(self.pat.expose_secret()))
            .json(request)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "pull request creation rejected");
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(ApiError::Transport)?;
        let created: CreatedPullRequest =
            serde_json::from_str(&body).map_err(|e| ApiError::ParseError {
                message: e.to_string(),
            })?;

        debug!(pull_request_id = ?created.pull_request_id, "pull request created");
        Ok(created)
    }
}

/// Builds the `pullrequests` endpoint URL for a repository.
///
/// Path segments are pushed individually so names with spaces (project
/// names commonly have them) are percent-encoded correctly.
fn pull_requests_url(
    organization: &Url,
    project: &str,
    repository: &str,
) -> Result<Url, ConfigError> {
    let mut url = organization.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| ConfigError::InvalidValue {
                field: "organization".to_string(),
                message: format!("'{organization}' cannot serve as a base URL"),
            })?;
        segments.pop_if_empty();
        segments.push(project);
        segments.extend(["_apis", "git", "repositories"]);
        segments.push(repository);
        segments.push("pullrequests");
    }
    url.query_pairs_mut().append_pair("api-version", API_VERSION);
    Ok(url)
}
