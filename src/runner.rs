//! Single-shot runner for the pull request creation operation.
//!
//! The runner executes the one operation without user interaction — it is
//! written for pipeline and CI usage. Outcome lines go to its writer
//! (stdout in the binary) with a distinguishing prefix, and the result
//! carries an exit code for the process to terminate with.

use std::io::{self, Write};

use tracing::{info, warn};

use crate::api::PullRequestOperations;
use crate::config::ResolvedConfig;
use crate::error::ApiError;
use crate::models::NewPullRequest;

/// Prefix on every user-facing outcome line.
pub const OUTPUT_PREFIX: &str = "[openpr]";

/// Exit codes for the CLI.
///
/// Per the tool's contract every failure — missing credential, transport
/// error, or a non-201 response — terminates with the same general error
/// code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// The pull request was created.
    Success = 0,

    /// Any failure: configuration, transport, or a rejected request.
    GeneralError = 1,
}

impl ExitCode {
    /// Returns the numeric exit code value.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Returns a human-readable description of the exit code.
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Pull request created",
            ExitCode::GeneralError => "Pull request creation failed",
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code())
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Result of one invocation.
#[derive(Debug)]
pub struct RunResult {
    /// Exit code for the operation.
    pub exit_code: ExitCode,
    /// Optional failure message.
    pub message: Option<String>,
}

impl RunResult {
    /// Creates a successful result.
    pub fn success() -> Self {
        Self {
            exit_code: ExitCode::Success,
            message: None,
        }
    }

    /// Creates an error result.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::GeneralError,
            message: Some(message.into()),
        }
    }

    /// Returns true if the operation was successful.
    pub fn is_success(&self) -> bool {
        matches!(self.exit_code, ExitCode::Success)
    }
}

/// Runner that performs the single pull-request-creation exchange.
///
/// Generic over its output writer so tests can capture the outcome lines.
pub struct CreateRunner<W: Write = io::Stdout> {
    config: ResolvedConfig,
    output: W,
}

impl CreateRunner<io::Stdout> {
    /// Creates a runner that writes outcome lines to stdout.
    pub fn new(config: ResolvedConfig) -> Self {
        Self::with_writer(config, io::stdout())
    }
}

impl<W: Write> CreateRunner<W> {
    /// Creates a runner with a custom writer.
    pub fn with_writer(config: ResolvedConfig, output: W) -> Self {
        Self { config, output }
    }

    fn emit(&mut self, message: &str) {
        let _ = writeln!(self.output, "{OUTPUT_PREFIX} {message}");
    }

    /// Runs the pull request creation.
    ///
    /// Exactly one request is issued through `ops`; there are two terminal
    /// outcomes, success and failure, and nothing is retried.
    pub async fn run(&mut self, ops: &dyn PullRequestOperations) -> RunResult {
        let request = NewPullRequest::for_branches(
            &self.config.source_branch,
            &self.config.target_branch,
        );

        self.emit(&format!(
            "Creating pull request from '{}' to '{}' in repo '{}'",
            self.config.source_branch, self.config.target_branch, self.config.repository
        ));

        match ops.create_pull_request(&request).await {
            Ok(created) => {
                let url = created.url.as_deref().unwrap_or("no URL in response");
                self.emit(&format!("Pull request created: {url}"));
                info!(pull_request_id = ?created.pull_request_id, "pull request created");
                RunResult::success()
            }
            Err(ApiError::RequestFailed { status, body }) => {
                self.emit(&format!("Failed to create pull request: {status}"));
                self.emit(&format!("Response: {body}"));
                warn!(status, "pull request creation rejected");
                RunResult::error(format!(
                    "pull request creation failed with status {status}"
                ))
            }
            Err(err) => {
                self.emit(&format!("Request failed: {err}"));
                warn!(error = %err, "pull request creation did not complete");
                RunResult::error(err.to_string())
            }
        }
    }
}
