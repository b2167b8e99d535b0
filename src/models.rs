//! CLI arguments and wire-format data models.
//!
//! The request and response types here mirror the JSON shapes of the Azure
//! DevOps `pullrequests` REST resource: camelCase field names on the wire,
//! snake_case in Rust.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Description attached to every pull request this tool opens.
pub const AUTO_DESCRIPTION: &str = "This PR was created automatically by the pipeline.";

/// Command line arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "openpr",
    version,
    about = "Create an Azure DevOps pull request from a pipeline"
)]
pub struct Args {
    /// Repository ID or name
    #[arg(long, alias = "repository_id", help_heading = "Azure DevOps Connection")]
    pub repository_id: String,

    /// Source branch name, without the refs/heads/ prefix
    #[arg(long, alias = "source_branch", help_heading = "Branch Configuration")]
    pub source_branch: String,

    /// Personal Access Token (falls back to the ENCODED_PAT environment variable)
    #[arg(short = 't', long, help_heading = "Azure DevOps Connection")]
    pub pat: Option<String>,

    /// Target branch to merge into [default: main]
    #[arg(long, help_heading = "Branch Configuration")]
    pub target_branch: Option<String>,

    /// Azure DevOps organization URL
    #[arg(short, long, help_heading = "Azure DevOps Connection")]
    pub organization: Option<String>,

    /// Azure DevOps project name
    #[arg(short, long, help_heading = "Azure DevOps Connection")]
    pub project: Option<String>,

    /// Enable diagnostic logging at this level (trace, debug, info, warn, error)
    #[arg(long, help_heading = "Logging")]
    pub log_level: Option<String>,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, help_heading = "Logging")]
    pub log_file: Option<PathBuf>,

    /// Diagnostic log format (text, json)
    #[arg(long, help_heading = "Logging")]
    pub log_format: Option<String>,
}

/// Formats a branch name as a full git ref.
pub fn branch_ref(branch: &str) -> String {
    format!("refs/heads/{branch}")
}

/// Reviewer entry in a pull request creation request.
///
/// The tool never pre-assigns reviewers, so this only exists to give the
/// `reviewers` array its wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reviewer {
    /// Identity ID of the reviewer.
    pub id: String,
}

/// Request body for creating a pull request.
///
/// Constructed fresh per invocation and discarded after the call returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPullRequest {
    /// Full ref of the branch containing the proposed changes.
    pub source_ref_name: String,
    /// Full ref of the branch the changes merge into.
    pub target_ref_name: String,
    /// Pull request title.
    pub title: String,
    /// Pull request description.
    pub description: String,
    /// Reviewers to pre-assign. Always empty.
    pub reviewers: Vec<Reviewer>,
}

impl NewPullRequest {
    /// Builds the creation request for a source and target branch.
    ///
    /// The title is derived from the source branch and the description is
    /// the fixed [`AUTO_DESCRIPTION`] text.
    pub fn for_branches(source_branch: &str, target_branch: &str) -> Self {
        Self {
            source_ref_name: branch_ref(source_branch),
            target_ref_name: branch_ref(target_branch),
            title: format!("Auto-generated PR for {source_branch}"),
            description: AUTO_DESCRIPTION.to_string(),
            reviewers: Vec::new(),
        }
    }
}

/// Subset of the pull request resource returned on a 201 response.
///
/// Both fields are tolerated as absent; the service contract only
/// guarantees them on well-formed success responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPullRequest {
    /// Numeric ID of the created pull request.
    #[serde(default)]
    pub pull_request_id: Option<i32>,
    /// REST URL of the created pull request.
    #[serde(default)]
    pub url: Option<String>,
}
