//! # openpr
//!
//! A small pipeline automation library and CLI for opening Azure DevOps pull
//! requests. One invocation performs exactly one API call: it builds a
//! pull-request-creation request for a source branch, submits it to the
//! configured organization and project, and reports the outcome through the
//! process exit status.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use openpr::AzureDevOpsClient;
//! use openpr::models::NewPullRequest;
//! use secrecy::SecretString;
//! use url::Url;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let organization = Url::parse("https://dev.azure.com/my-org")?;
//! let client = AzureDevOpsClient::new(
//!     &organization,
//!     "my-project",
//!     "my-repo",
//!     SecretString::from("my-pat".to_string()),
//! )?;
//!
//! let request = NewPullRequest::for_branches("feature/login", "main");
//! let created = client.create_pull_request(&request).await?;
//! println!("created PR #{:?}", created.pull_request_id);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod provenance;
pub mod runner;

// Re-export commonly used types for convenience
pub use api::AzureDevOpsClient;
pub use config::{Config, ResolvedConfig};
pub use error::OpenprError;
pub use models::Args;
pub use runner::{CreateRunner, ExitCode, RunResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
