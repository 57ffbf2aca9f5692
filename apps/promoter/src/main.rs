//! # Promoter
//!
//! Command-line entry point.
//!
//! ## Usage
//!
//! ```bash
//! # Register reports/experiment_info.json as a new version of my_model, move it to Staging
//! promoter
//!
//! # Explicit registry, model and stage
//! promoter -u http://mlflow.internal:5000 -n churn -s Production --archive-existing
//!
//! # Inspect without contacting the registry
//! promoter locator -i reports/experiment_info.json
//! promoter config -c promoter.toml
//! ```

use clap::Parser;
use promoter::{cli, logging};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = cli::Cli::parse();
    let settings = cli.resolve_settings();

    let error_log = match &settings {
        Ok(settings) => settings.error_log.clone(),
        Err(_) => cli.fallback_error_log(),
    };
    logging::init(logging::LogFormat::from_env(), &error_log);

    let command = cli.command.unwrap_or_default();
    let outcome = match settings {
        Ok(settings) => cli::execute(command, &settings, cli.json_mode).await,
        Err(e) => Err(e),
    };

    // Failures are reported, not turned into a non-zero exit status.
    if let Err(e) = outcome {
        tracing::error!("Model registration process failed: {}", e);
        println!("{}", cli::failure_line(&e, cli.json_mode));
    }
}
