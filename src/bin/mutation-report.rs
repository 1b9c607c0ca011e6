use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use banking_agent::config::{load_config, MutationConfig};
use banking_agent::mutation::{
    parse_file, render_json, render_markdown, summarize, MutationRunner, MutationSummary,
};

#[derive(Parser)]
#[command(name = "mutation-report")]
#[command(about = "Summarize mutation-testing dumps as Markdown or JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

#[derive(clap::Args)]
struct Output {
    /// Output format.
    #[arg(short, long, value_enum, default_value = "markdown")]
    format: Format,

    /// Fail (exit 1) when the mutation score is below this percentage.
    #[arg(long)]
    min_score: Option<f64>,

    /// Write the report here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report on an existing dump (flat JSON, paired-list JSON or NDJSON)
    Report {
        dump: PathBuf,
        #[command(flatten)]
        output: Output,
    },
    /// Run the mutation tool, then report on its dump
    Run {
        /// Configuration file with a [mutation] section.
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        output: Output,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "banking_agent=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether the score requirement (if any) was met.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Report { dump, output } => report(&dump, &output),
        Commands::Run { config, output } => {
            let mutation = match config {
                Some(path) => load_config(&path)?.mutation,
                None => MutationConfig::default(),
            };
            let dump = MutationRunner::new(mutation).run()?;
            report(&dump, &output)
        }
    }
}

fn report(dump: &Path, output: &Output) -> Result<bool, Box<dyn std::error::Error>> {
    let parsed = parse_file(dump)?;
    let summary = summarize(&parsed);
    tracing::info!(
        format = %summary.format,
        mutants = summary.totals.total,
        skipped = summary.skipped,
        "Dump parsed"
    );

    let text = match output.format {
        Format::Markdown => render_markdown(&summary, output.min_score),
        Format::Json => render_json(&summary)?,
    };

    match &output.output {
        Some(path) => std::fs::write(path, text)?,
        None => println!("{}", text),
    }

    Ok(verdict(&summary, output.min_score))
}

fn verdict(summary: &MutationSummary, min_score: Option<f64>) -> bool {
    min_score.map_or(true, |min| summary.meets(min))
}
