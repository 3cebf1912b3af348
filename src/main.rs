use clap::{Args, Parser, Subcommand};
use decision_splitter::adapters::ai::ResilientInferenceClient;
use decision_splitter::application::{AnalysisError, ResolveDecisionCommand, ResolveDecisionHandler};
use decision_splitter::config::{AppConfig, ConfigError, ValidationError};
use decision_splitter::domain::decision::{parse_factors, Alpha, OptionDraft};
use decision_splitter::ports::{AIError, CancelSignal};
use decision_splitter::telemetry::{self, TelemetryError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "decision-splitter",
    about = "Compare two options by weighted pros/cons and emotional sentiment",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score two options and print the recommendation
    Analyze(AnalyzeArgs),
    /// Show how a pros/cons file is parsed into weighted factors
    Parse {
        /// File with one factor per line, optionally suffixed `| weight`
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[command(flatten)]
    a: OptionAArgs,
    #[command(flatten)]
    b: OptionBArgs,
    /// Emotional weight in [0, 1] (defaults to the configured value)
    #[arg(long)]
    alpha: Option<f64>,
    /// Print the full record as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct OptionAArgs {
    /// Name of option A
    #[arg(long = "a-name")]
    name: String,
    /// File of pros for option A
    #[arg(long = "a-pros")]
    pros_file: Option<PathBuf>,
    /// File of cons for option A
    #[arg(long = "a-cons")]
    cons_file: Option<PathBuf>,
    /// Inline pro for option A, e.g. "Cheaper | 8" (repeatable)
    #[arg(long = "a-pro")]
    pros: Vec<String>,
    /// Inline con for option A (repeatable)
    #[arg(long = "a-con")]
    cons: Vec<String>,
}

#[derive(Args, Debug)]
struct OptionBArgs {
    /// Name of option B
    #[arg(long = "b-name")]
    name: String,
    /// File of pros for option B
    #[arg(long = "b-pros")]
    pros_file: Option<PathBuf>,
    /// File of cons for option B
    #[arg(long = "b-cons")]
    cons_file: Option<PathBuf>,
    /// Inline pro for option B (repeatable)
    #[arg(long = "b-pro")]
    pros: Vec<String>,
    /// Inline con for option B (repeatable)
    #[arg(long = "b-con")]
    cons: Vec<String>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("--alpha must be within [0, 1], got {0}")]
    Alpha(f64),
    #[error("failed to build inference client: {0}")]
    Inference(#[from] AIError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze(args) => run_analyze(args).await,
        Command::Parse { file } => run_parse(&file),
    }
}

async fn run_analyze(args: AnalyzeArgs) -> Result<(), CliError> {
    let config = AppConfig::load()?;
    config.validate()?;
    telemetry::init(&config.telemetry)?;

    let alpha = match args.alpha {
        Some(value) => Alpha::try_new(value).map_err(|_| CliError::Alpha(value))?,
        None => config.scoring.alpha()?,
    };

    let draft_a = OptionDraft::new(
        args.a.name,
        factor_text(args.a.pros_file.as_deref(), &args.a.pros)?,
        factor_text(args.a.cons_file.as_deref(), &args.a.cons)?,
    );
    let draft_b = OptionDraft::new(
        args.b.name,
        factor_text(args.b.pros_file.as_deref(), &args.b.pros)?,
        factor_text(args.b.cons_file.as_deref(), &args.b.cons)?,
    );

    let client = ResilientInferenceClient::from_config(&config.ai)?;
    info!(
        model = config.ai.model.as_str(),
        credentials = client.usable_credentials(),
        %alpha,
        "Starting analysis"
    );
    let handler = ResolveDecisionHandler::new(Arc::new(client), alpha);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received; cancelling analysis");
            let _ = shutdown_tx.send(true);
        }
    });

    let record = handler
        .handle(
            ResolveDecisionCommand::from_drafts(&draft_a, &draft_b),
            &CancelSignal::from_watch(shutdown_rx),
        )
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", record.summary());
    }
    Ok(())
}

fn run_parse(file: &Path) -> Result<(), CliError> {
    let text = read_file(file)?;
    for factor in parse_factors(&text) {
        println!("{:>2}  {}", factor.weight().value(), factor.item());
    }
    Ok(())
}

/// File contents followed by inline entries, one factor per line.
fn factor_text(file: Option<&Path>, inline: &[String]) -> Result<String, CliError> {
    let mut lines = Vec::new();
    if let Some(path) = file {
        lines.push(read_file(path)?);
    }
    lines.extend(inline.iter().cloned());
    Ok(lines.join("\n"))
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
