//! CLI binary for factline.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use factline_core::{Region, ReportFormatter};
use factline_runtime::{ConfigError, FactCheckConfig, FactCheckError, FactChecker, Settings};

/// Factline: check news headlines against live evidence.
#[derive(Parser)]
#[command(name = "factline", version, about)]
struct Cli {
    /// Path to a YAML settings file. Secrets always come from the environment.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fact-check a single headline.
    Check {
        /// The headline to verify.
        headline: String,

        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show trending topics for a region.
    Trending {
        /// local (India) or international.
        #[arg(short, long, default_value = "international")]
        region: Region,

        #[arg(long)]
        json: bool,
    },

    /// Show which providers are configured.
    Status {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "factline=debug,factline_core=debug,factline_runtime=debug"
    } else {
        "factline=info,factline_core=info,factline_runtime=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if let Some(hint) = remediation(&e) {
                eprintln!("\n{hint}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let checker = build_checker(cli.config.as_deref())?;
    tracing::debug!(checker = ?checker, "Fact checker ready");

    match cli.command {
        Command::Check { headline, json } => {
            let report = checker
                .fact_check(&headline)
                .await
                .context("fact-check failed")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", ReportFormatter::format(&report));
            }
        }
        Command::Trending { region, json } => {
            let report = checker.trending_topics(region).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", ReportFormatter::format_trending(&report));
            }
        }
        Command::Status { json } => {
            let status = checker.status();
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("{}", ReportFormatter::format_status(&status));
            }
        }
    }

    Ok(())
}

fn build_checker(settings_path: Option<&std::path::Path>) -> anyhow::Result<FactChecker> {
    let mut config = FactCheckConfig::from_env().context("failed to load configuration")?;

    if let Some(path) = settings_path {
        let mut settings = Settings::from_yaml_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?;
        // An explicit model override in the environment beats the file
        if let Ok(model) = std::env::var(factline_runtime::config::MODEL_ENV) {
            if !model.trim().is_empty() {
                settings.model = model.trim().to_string();
            }
        }
        config = config.with_settings(settings);
    }

    FactChecker::from_config(config).context("failed to initialise fact checker")
}

/// A short fix-it line for errors the user can resolve themselves.
fn remediation(err: &anyhow::Error) -> Option<&'static str> {
    let config_error = err
        .chain()
        .find_map(|cause| {
            cause.downcast_ref::<ConfigError>().or_else(|| match cause.downcast_ref::<FactCheckError>() {
                Some(FactCheckError::Config(inner)) => Some(inner),
                _ => None,
            })
        })?;

    Some(match config_error {
        ConfigError::MissingCredential { .. } => {
            "Set GEMINI_API_KEY in your environment. NEWS_API_KEY is optional and enables NewsAPI search."
        }
        ConfigError::InvalidValue { .. } | ConfigError::Yaml(_) => {
            "Check the settings file passed with --config; unknown keys are rejected."
        }
        ConfigError::Io(_) => "Make sure the settings file exists and is readable.",
    })
}
