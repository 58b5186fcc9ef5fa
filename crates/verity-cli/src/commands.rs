//! CLI command definitions, dispatch, and output rendering.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;
use verity_core::{
    evaluate, route, Assessment, Confidence, Evaluation, Outcome, Record, RecordPair,
};
use verity_runtime::{FixtureSource, LogSink, Pipeline, PipelineRun};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// verity - reconcile provider directory records.
#[derive(Parser)]
#[command(
    name = "verity",
    version,
    about = "Compare provider directory records and route them to verification or review.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Result output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the verification workflow for a provider id.
    ///
    /// Exits with status 2 when the provider is flagged for review.
    Check {
        /// Provider id (must be positive).
        #[arg(allow_negative_numbers = true)]
        id: i64,

        /// Fixture table replacing the built-in one.
        #[arg(long, env = "VERITY_FIXTURES")]
        fixtures: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Compare two record files (YAML or JSON by extension).
    Compare {
        /// System-of-record entry.
        #[arg(long)]
        reference: PathBuf,

        /// Independently observed entry.
        #[arg(long)]
        observed: PathBuf,

        /// Baseline confidence hint, penalized per discrepancy.
        #[arg(long, allow_negative_numbers = true)]
        baseline: Option<i64>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the outcome for a confidence score.
    Route {
        /// Confidence score (clamped into 0..=100).
        #[arg(allow_negative_numbers = true)]
        confidence: i64,
    },

    /// List the fixture table.
    Fixtures {
        /// Fixture table replacing the built-in one.
        #[arg(long, env = "VERITY_FIXTURES")]
        fixtures: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match cli.verbose {
        0 => "warn",
        1 => "verity_runtime=info,verity_core=info,warn",
        _ => "verity_runtime=debug,verity_core=debug,info",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Check {
            id,
            fixtures,
            format,
        } => {
            let source = load_fixtures(fixtures)?;
            let pipeline = Pipeline::builder()
                .source(Arc::new(source))
                .sink(Arc::new(LogSink::new()))
                .build()?;

            let run = pipeline.run(id).await?;
            emit(format, &run, render_run)?;

            Ok(match run.outcome {
                Outcome::Verified => ExitCode::SUCCESS,
                Outcome::Flagged => ExitCode::from(2),
            })
        }

        Command::Compare {
            reference,
            observed,
            baseline,
            format,
        } => {
            let pair = RecordPair {
                reference: Record::from_path(&reference)
                    .with_context(|| format!("Failed to load {}", reference.display()))?,
                observed: Record::from_path(&observed)
                    .with_context(|| format!("Failed to load {}", observed.display()))?,
                baseline: baseline.map(Confidence::clamped),
            };
            debug!(baseline = ?pair.baseline, "Comparing record files");

            let evaluation = evaluate(&pair);
            emit(format, &evaluation, render_evaluation)?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Route { confidence } => {
            println!("{}", route(Confidence::clamped(confidence)));
            Ok(ExitCode::SUCCESS)
        }

        Command::Fixtures { fixtures } => {
            let source = load_fixtures(fixtures)?;
            print!("{}", render_fixtures(&source));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_fixtures(path: Option<PathBuf>) -> Result<FixtureSource> {
    match path {
        Some(path) => FixtureSource::from_yaml_file(&path)
            .with_context(|| format!("Failed to load fixtures from {}", path.display())),
        None => FixtureSource::builtin().context("Failed to load built-in fixtures"),
    }
}

fn emit<T: Serialize>(format: OutputFormat, value: &T, render: fn(&T) -> String) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => print!("{}", render(value)),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

fn render_assessment(out: &mut String, outcome: Outcome, assessment: &Assessment) {
    let _ = writeln!(
        out,
        "{} (confidence {})",
        outcome.as_str().to_uppercase(),
        assessment.confidence
    );

    if assessment.discrepancies.is_empty() {
        let _ = writeln!(out, "  no discrepancies");
    } else {
        let _ = writeln!(out, "  discrepancies:");
        for d in &assessment.discrepancies {
            let _ = writeln!(
                out,
                "    - {}: reference='{}' observed='{}'",
                d.field, d.reference_value, d.observed_value
            );
        }
    }
}

fn render_run(run: &PipelineRun) -> String {
    let mut out = format!("Provider {}: ", run.provider_id);
    render_assessment(&mut out, run.outcome, &run.assessment);

    let steps: Vec<&str> = run.steps.iter().map(|s| s.as_str()).collect();
    let _ = writeln!(out, "  steps: {}", steps.join(" -> "));
    let _ = writeln!(out, "{}", run.message);
    out
}

fn render_evaluation(evaluation: &Evaluation) -> String {
    let mut out = String::new();
    render_assessment(&mut out, evaluation.outcome, &evaluation.assessment);
    out
}

fn render_fixtures(source: &FixtureSource) -> String {
    let mut out = String::new();
    for fixture in source.fixtures() {
        let _ = writeln!(
            out,
            "{:>6}  {:<20}  baseline {:>3}  {}",
            fixture.reference.id,
            fixture.reference.name,
            fixture
                .baseline
                .map(|b| b.to_string())
                .unwrap_or_else(|| "-".to_string()),
            fixture.scenario
        );
    }
    if let Some(fallback) = source.fallback() {
        let _ = writeln!(out, "{:>6}  {}", "*", fallback.scenario);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_id_parses() {
        let cli = Cli::try_parse_from(["verity", "check", "-5"]).unwrap();
        assert!(matches!(cli.command, Command::Check { id: -5, .. }));
    }

    #[tokio::test]
    async fn test_render_flagged_run() {
        let pipeline = Pipeline::builder()
            .source(Arc::new(FixtureSource::builtin().unwrap()))
            .build()
            .unwrap();
        let run = pipeline.run(2001).await.unwrap();
        let text = render_run(&run);

        assert!(text.starts_with("Provider 2001: FLAGGED (confidence 73)"));
        assert!(text.contains("phone: reference='+91-40-2789-4567' observed='+91-40-2789-4568'"));
        assert!(text.contains("fetch_provider -> scrape_web -> quality_assurance -> flag_review"));
    }

    #[test]
    fn test_render_fixtures_lists_fallback() {
        let text = render_fixtures(&FixtureSource::builtin().unwrap());
        assert_eq!(text.lines().count(), 9);
        assert!(text.contains("Dr. Amit Patel"));
        assert!(text.lines().last().unwrap().contains("Phone mismatch"));
    }
}
