//! Configuration management for openpr.
//!
//! Configuration is assembled from four layers, highest precedence first:
//! CLI arguments, environment variables, a TOML config file following the
//! XDG Base Directory specification, and built-in defaults. Every resolved
//! value remembers which layer it came from (see [`crate::provenance`]).
//!
//! The built-in organization and project defaults reproduce the fixed
//! endpoint the pipeline has always targeted, so a bare
//! `openpr --repository-id ... --source-branch ...` keeps its historical
//! meaning.

use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use url::Url;

use crate::error::{ConfigError, OpenprError};
use crate::models::Args;
use crate::provenance::Sourced;

/// Organization URL used when no other source provides one.
pub const DEFAULT_ORGANIZATION: &str = "https://dev.azure.com/tetrapak-tpps";

/// Project used when no other source provides one.
pub const DEFAULT_PROJECT: &str = "Platform and Process";

/// Branch pull requests merge into when no other source provides one.
pub const DEFAULT_TARGET_BRANCH: &str = "main";

/// Environment variable consulted for the PAT when --pat is absent.
pub const PAT_ENV_VAR: &str = "ENCODED_PAT";

/// Temporary struct for deserializing the TOML configuration file.
#[derive(Debug, Clone, Deserialize, Default)]
struct ConfigFile {
    pub organization: Option<String>,
    pub project: Option<String>,
    pub target_branch: Option<String>,
    pub pat: Option<String>,
}

/// Partial configuration collected from a single layer.
///
/// Layers are combined with [`Config::merge`]; fields left `None` by one
/// layer fall through to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Azure DevOps organization URL.
    pub organization: Option<Sourced<String>>,
    /// Azure DevOps project name.
    pub project: Option<Sourced<String>>,
    /// Branch pull requests merge into.
    pub target_branch: Option<Sourced<String>>,
    /// Personal access token for authenticating with Azure DevOps.
    pub pat: Option<Sourced<String>>,
}

impl Config {
    fn empty() -> Self {
        Self {
            organization: None,
            project: None,
            target_branch: None,
            pat: None,
        }
    }

    /// Built-in defaults, the lowest-precedence layer.
    ///
    /// The PAT has no default; it must come from an explicit source.
    pub fn defaults() -> Self {
        Self {
            organization: Some(Sourced::defaulted(DEFAULT_ORGANIZATION.to_string())),
            project: Some(Sourced::defaulted(DEFAULT_PROJECT.to_string())),
            target_branch: Some(Sourced::defaulted(DEFAULT_TARGET_BRANCH.to_string())),
            pat: None,
        }
    }

    /// Load configuration from the XDG config directory.
    ///
    /// A missing file is not an error; an unreadable or unparseable one is.
    pub fn load_from_file() -> Result<Self, ConfigError> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::empty());
        };
        if !path.exists() {
            return Ok(Self::empty());
        }

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::FileRead {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::FileParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            organization: file.organization.map(Sourced::file),
            project: file.project.map(Sourced::file),
            target_branch: file.target_branch.map(Sourced::file),
            pat: file.pat.map(Sourced::file),
        })
    }

    /// Load configuration from environment variables.
    pub fn load_from_env() -> Self {
        Self {
            organization: std::env::var("OPENPR_ORGANIZATION").ok().map(Sourced::env),
            project: std::env::var("OPENPR_PROJECT").ok().map(Sourced::env),
            target_branch: std::env::var("OPENPR_TARGET_BRANCH").ok().map(Sourced::env),
            pat: std::env::var(PAT_ENV_VAR).ok().map(Sourced::env),
        }
    }

    /// Build a configuration layer from CLI argument values.
    pub fn from_args(args: &Args) -> Self {
        Self {
            organization: args.organization.clone().map(Sourced::cli),
            project: args.project.clone().map(Sourced::cli),
            target_branch: args.target_branch.clone().map(Sourced::cli),
            pat: args.pat.clone().map(Sourced::cli),
        }
    }

    /// Merge this config with another, preferring values from `other`.
    pub fn merge(self, other: Self) -> Self {
        Self {
            organization: other.organization.or(self.organization),
            project: other.project.or(self.project),
            target_branch: other.target_branch.or(self.target_branch),
            pat: other.pat.or(self.pat),
        }
    }

    /// Resolve the full configuration for one invocation.
    ///
    /// Combines all four layers and validates the result. Fails before any
    /// network activity when the PAT is absent or empty.
    pub fn resolve(args: &Args) -> Result<ResolvedConfig, OpenprError> {
        let merged = Self::defaults()
            .merge(Self::load_from_file()?)
            .merge(Self::load_from_env())
            .merge(Self::from_args(args));
        merged.into_resolved(args)
    }

    fn into_resolved(self, args: &Args) -> Result<ResolvedConfig, OpenprError> {
        let organization = self.organization.ok_or_else(|| ConfigError::MissingRequired {
            field: "organization".to_string(),
        })?;
        let project = self.project.ok_or_else(|| ConfigError::MissingRequired {
            field: "project".to_string(),
        })?;
        let target_branch = self.target_branch.ok_or_else(|| ConfigError::MissingRequired {
            field: "target_branch".to_string(),
        })?;

        // An empty PAT would produce a confusing 203/401 from the service;
        // treat it the same as an absent one.
        let pat = self
            .pat
            .filter(|pat| !pat.value().is_empty())
            .ok_or(ConfigError::MissingCredential)?;

        tracing::debug!(
            organization = %organization,
            organization_source = organization.source().as_str(),
            project = %project,
            project_source = project.source().as_str(),
            target_branch = %target_branch,
            target_branch_source = target_branch.source().as_str(),
            pat_source = pat.source().as_str(),
            repository = %args.repository_id,
            source_branch = %args.source_branch,
            "resolved configuration"
        );

        let organization_url =
            Url::parse(organization.value()).map_err(|e| ConfigError::InvalidValue {
                field: "organization".to_string(),
                message: e.to_string(),
            })?;

        Ok(ResolvedConfig {
            organization: organization_url,
            project: project.into_value(),
            repository: args.repository_id.clone(),
            source_branch: args.source_branch.clone(),
            target_branch: target_branch.into_value(),
            pat: SecretString::from(pat.into_value()),
        })
    }

    /// Path of the config file under the XDG config directory.
    fn config_path() -> Option<PathBuf> {
        let base = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
        Some(base.join("openpr").join("config.toml"))
    }
}

/// Fully validated configuration for one invocation.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Azure DevOps organization URL.
    pub organization: Url,
    /// Azure DevOps project name.
    pub project: String,
    /// Repository ID or name.
    pub repository: String,
    /// Source branch name, without the refs/heads/ prefix.
    pub source_branch: String,
    /// Target branch name, without the refs/heads/ prefix.
    pub target_branch: String,
    /// Personal access token. Redacted from Debug output.
    pub pat: SecretString,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provenance::ValueSource;
    use clap::Parser;
    use serial_test::file_serial;
    use std::env;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec![
            "openpr",
            "--repository-id",
            "repo-1",
            "--source-branch",
            "feature/x",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn clear_env() {
        unsafe {
            env::remove_var("OPENPR_ORGANIZATION");
            env::remove_var("OPENPR_PROJECT");
            env::remove_var("OPENPR_TARGET_BRANCH");
            env::remove_var(PAT_ENV_VAR);
        }
    }

    /// # Config Defaults
    ///
    /// Tests that the default layer contains the fixed endpoint values.
    ///
    /// ## Test Scenario
    /// - Builds the defaults layer
    ///
    /// ## Expected Outcome
    /// - Organization, project, and target branch carry their defaults
    /// - The PAT has no default
    #[test]
    fn test_defaults() {
        let config = Config::defaults();

        assert_eq!(
            config.organization,
            Some(Sourced::defaulted(DEFAULT_ORGANIZATION.to_string()))
        );
        assert_eq!(
            config.project,
            Some(Sourced::defaulted(DEFAULT_PROJECT.to_string()))
        );
        assert_eq!(
            config.target_branch,
            Some(Sourced::defaulted("main".to_string()))
        );
        assert_eq!(config.pat, None);
    }

    /// # Load Config from Environment Variables
    ///
    /// Tests loading configuration from environment variables, including
    /// the ENCODED_PAT credential fallback.
    ///
    /// ## Test Scenario
    /// - Sets all supported environment variables
    /// - Loads configuration from the environment
    ///
    /// ## Expected Outcome
    /// - All values are picked up and tagged with the env source
    #[test]
    #[file_serial(env_tests)]
    fn test_load_from_env() {
        unsafe {
            env::set_var("OPENPR_ORGANIZATION", "https://dev.azure.com/env-org");
            env::set_var("OPENPR_PROJECT", "EnvProject");
            env::set_var("OPENPR_TARGET_BRANCH", "develop");
            env::set_var(PAT_ENV_VAR, "env-pat");
        }

        let config = Config::load_from_env();

        assert_eq!(
            config.organization,
            Some(Sourced::env("https://dev.azure.com/env-org".to_string()))
        );
        assert_eq!(config.project, Some(Sourced::env("EnvProject".to_string())));
        assert_eq!(
            config.target_branch,
            Some(Sourced::env("develop".to_string()))
        );
        assert_eq!(config.pat, Some(Sourced::env("env-pat".to_string())));

        clear_env();
    }

    #[test]
    #[file_serial(env_tests)]
    fn test_load_from_env_no_variables() {
        clear_env();

        let config = Config::load_from_env();

        assert_eq!(config.organization, None);
        assert_eq!(config.project, None);
        assert_eq!(config.target_branch, None);
        assert_eq!(config.pat, None);
    }

    /// # Config Merge Precedence
    ///
    /// Tests that merging prefers the higher-precedence layer while keeping
    /// lower-layer values where the higher layer is silent.
    ///
    /// ## Test Scenario
    /// - Merges a defaults layer with a partial override layer
    ///
    /// ## Expected Outcome
    /// - Override values win, untouched fields keep their defaults
    #[test]
    fn test_merge_other_takes_precedence() {
        let base = Config::defaults();
        let other = Config {
            organization: None,
            project: Some(Sourced::cli("Override".to_string())),
            target_branch: None,
            pat: Some(Sourced::cli("cli-pat".to_string())),
        };

        let merged = base.merge(other);

        assert_eq!(
            merged.organization,
            Some(Sourced::defaulted(DEFAULT_ORGANIZATION.to_string()))
        );
        assert_eq!(merged.project, Some(Sourced::cli("Override".to_string())));
        assert_eq!(
            merged.target_branch,
            Some(Sourced::defaulted("main".to_string()))
        );
        assert_eq!(merged.pat, Some(Sourced::cli("cli-pat".to_string())));
    }

    /// # Load Config from File
    ///
    /// Tests loading configuration from a TOML file in the XDG directory.
    ///
    /// ## Test Scenario
    /// - Writes a config file under a temporary XDG_CONFIG_HOME
    /// - Loads configuration from the file
    ///
    /// ## Expected Outcome
    /// - All file values are loaded and tagged with the file source
    #[test]
    #[file_serial(env_tests)]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let openpr_dir = temp_dir.path().join("openpr");
        fs::create_dir_all(&openpr_dir).unwrap();
        fs::write(
            openpr_dir.join("config.toml"),
            r#"
organization = "https://dev.azure.com/file-org"
project = "FileProject"
target_branch = "release"
pat = "file-pat"
"#,
        )
        .unwrap();

        let original_xdg = env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        let result = Config::load_from_file();

        match original_xdg {
            Some(val) => unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            },
            None => unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            },
        }

        let config = result.unwrap();
        assert_eq!(
            config.organization,
            Some(Sourced::file("https://dev.azure.com/file-org".to_string()))
        );
        assert_eq!(
            config.project,
            Some(Sourced::file("FileProject".to_string()))
        );
        assert_eq!(
            config.target_branch,
            Some(Sourced::file("release".to_string()))
        );
        assert_eq!(config.pat, Some(Sourced::file("file-pat".to_string())));
        assert_eq!(config.pat.unwrap().source(), ValueSource::File);
    }

    #[test]
    #[file_serial(env_tests)]
    fn test_load_from_file_missing_returns_empty() {
        let temp_dir = TempDir::new().unwrap();
        let original_xdg = env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        let result = Config::load_from_file();

        match original_xdg {
            Some(val) => unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            },
            None => unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            },
        }

        let config = result.unwrap();
        assert_eq!(config, Config::empty());
    }

    #[test]
    #[file_serial(env_tests)]
    fn test_load_from_file_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let openpr_dir = temp_dir.path().join("openpr");
        fs::create_dir_all(&openpr_dir).unwrap();
        fs::write(openpr_dir.join("config.toml"), "organization = [broken").unwrap();

        let original_xdg = env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        let result = Config::load_from_file();

        match original_xdg {
            Some(val) => unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            },
            None => unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            },
        }

        assert!(matches!(result, Err(ConfigError::FileParse { .. })));
    }

    /// # Resolve Without a Credential
    ///
    /// Tests that resolution fails with the credential error when no PAT is
    /// available from any source.
    ///
    /// ## Test Scenario
    /// - No --pat flag, no ENCODED_PAT variable, no config file
    ///
    /// ## Expected Outcome
    /// - Resolution fails with ConfigError::MissingCredential
    #[test]
    #[file_serial(env_tests)]
    fn test_resolve_missing_credential() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let original_xdg = env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        let result = Config::resolve(&args(&[]));

        match original_xdg {
            Some(val) => unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            },
            None => unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            },
        }

        assert!(matches!(
            result,
            Err(OpenprError::Config(ConfigError::MissingCredential))
        ));
    }

    /// # Resolve With an Empty Credential
    ///
    /// An empty PAT string is as useless as an absent one and must be
    /// rejected before any network activity.
    #[test]
    #[file_serial(env_tests)]
    fn test_resolve_empty_credential_rejected() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let original_xdg = env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        let result = Config::resolve(&args(&["--pat", ""]));

        match original_xdg {
            Some(val) => unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            },
            None => unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            },
        }

        assert!(matches!(
            result,
            Err(OpenprError::Config(ConfigError::MissingCredential))
        ));
    }

    /// # Full Resolution
    ///
    /// Tests resolution with a CLI PAT over the built-in defaults, and CLI
    /// overrides taking precedence over the environment.
    #[test]
    #[file_serial(env_tests)]
    fn test_resolve_defaults_and_cli_precedence() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let original_xdg = env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_dir.path());
            env::set_var("OPENPR_TARGET_BRANCH", "env-target");
        }

        let resolved = Config::resolve(&args(&[
            "--pat",
            "cli-pat",
            "--target-branch",
            "cli-target",
        ]));

        match original_xdg {
            Some(val) => unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            },
            None => unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            },
        }
        clear_env();

        let resolved = resolved.unwrap();
        assert_eq!(resolved.organization.as_str(), DEFAULT_ORGANIZATION);
        assert_eq!(resolved.project, DEFAULT_PROJECT);
        assert_eq!(resolved.repository, "repo-1");
        assert_eq!(resolved.source_branch, "feature/x");
        assert_eq!(resolved.target_branch, "cli-target");
    }

    #[test]
    #[file_serial(env_tests)]
    fn test_resolve_invalid_organization_url() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let original_xdg = env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        let result = Config::resolve(&args(&[
            "--pat",
            "cli-pat",
            "--organization",
            "not a url",
        ]));

        match original_xdg {
            Some(val) => unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            },
            None => unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            },
        }

        assert!(matches!(
            result,
            Err(OpenprError::Config(ConfigError::InvalidValue { .. }))
        ));
    }
}
