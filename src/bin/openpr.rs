use clap::Parser;
use std::process;

use openpr::logging::{self, LogConfig};
use openpr::runner::{CreateRunner, ExitCode, OUTPUT_PREFIX};
use openpr::{Args, AzureDevOpsClient, Config};

#[tokio::main]
async fn main() -> process::ExitCode {
    let args = Args::parse();

    // Hold the guard until exit so buffered diagnostics flush.
    let _log_guard = logging::init_logging(LogConfig::from_cli(
        args.log_level.as_deref(),
        args.log_file.clone(),
        args.log_format.as_deref(),
    ));

    // Resolve configuration from CLI args, environment variables, and the
    // config file. A missing or empty PAT fails here, before any network
    // activity.
    let config = match Config::resolve(&args) {
        Ok(config) => config,
        Err(err) => {
            println!("{OUTPUT_PREFIX} {err}");
            return ExitCode::GeneralError.into();
        }
    };

    let client = match AzureDevOpsClient::new(
        &config.organization,
        &config.project,
        &config.repository,
        config.pat.clone(),
    ) {
        Ok(client) => client,
        Err(err) => {
            println!("{OUTPUT_PREFIX} {err}");
            return ExitCode::GeneralError.into();
        }
    };

    let mut runner = CreateRunner::new(config);
    let result = runner.run(&client).await;

    if let Some(message) = &result.message {
        tracing::debug!(%message, "run finished");
    }

    result.exit_code.into()
}
