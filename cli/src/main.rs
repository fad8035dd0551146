//! Stegsight CLI
//!
//! Steganalysis scanning tool for image files and directories.

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use stegsight_core::report::{export_file_name, format_file_size};
use stegsight_core::{
    scan_paths, BatchSummary, ExportDocument, ImageReport, Metrics, PipelineConfig, StegError,
    StegResult, SteganalysisPipeline, Status, EMBEDDING_METHODS,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stegsight")]
#[command(author = "Stegsight Team")]
#[command(version)]
#[command(about = "Stegsight - heuristic steganalysis for images", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze image files or directories
    Scan {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// JSON pipeline configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Minimum status to report
        #[arg(long, value_enum, default_value_t = MinStatus::Clean)]
        min_status: MinStatus,
    },

    /// Analyze images and write the results as a JSON document
    Export {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Output file (defaults to steganalysis_results_<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON pipeline configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List known embedding methods
    Methods,

    /// List the analyzers run on every image
    Analyzers {
        /// JSON pipeline configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MinStatus {
    Clean,
    Suspicious,
    Detected,
}

impl From<MinStatus> for Status {
    fn from(value: MinStatus) -> Self {
        match value {
            MinStatus::Clean => Status::Clean,
            MinStatus::Suspicious => Status::Suspicious,
            MinStatus::Detected => Status::Detected,
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn status_color(status: Status) -> colored::ColoredString {
    match status {
        Status::Detected => "DETECTED".red().bold(),
        Status::Suspicious => "SUSPICIOUS".yellow(),
        Status::Clean => "CLEAN".green(),
    }
}

fn load_config(path: Option<&Path>) -> StegResult<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_file(path),
        None => Ok(PipelineConfig::default()),
    }
}

/// Scan and split outcomes into reports and printed failures
fn analyze(
    paths: &[PathBuf],
    recursive: bool,
    config: PipelineConfig,
) -> StegResult<Vec<ImageReport>> {
    let outcomes = scan_paths(paths, recursive, config)?;
    let mut reports = Vec::with_capacity(outcomes.len());

    for (path, outcome) in outcomes {
        match outcome {
            Ok(report) => reports.push(report),
            Err(e) => eprintln!("{} {}: {}", "Error".red(), path.display(), e),
        }
    }

    Ok(reports)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("{}: {}", "Error".red(), e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> StegResult<()> {
    match command {
        Commands::Scan {
            paths,
            recursive,
            format,
            config,
            min_status,
        } => {
            let min_status = Status::from(min_status);
            let config = load_config(config.as_deref())?;
            let reports = analyze(&paths, recursive, config)?;
            let summary = BatchSummary::from_reports(&reports);

            let shown: Vec<&ImageReport> = reports
                .iter()
                .filter(|r| r.status() >= min_status)
                .collect();

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&shown)?);
                }
                OutputFormat::Text => {
                    print_banner();
                    print_reports(&shown);
                    if summary.total > 1 {
                        print_summary(&summary);
                    }
                }
            }
        }

        Commands::Export {
            paths,
            recursive,
            output,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let reports = analyze(&paths, recursive, config)?;

            if reports.is_empty() {
                return Err(StegError::InvalidParams("No results to export".to_string()));
            }

            let path =
                output.unwrap_or_else(|| PathBuf::from(export_file_name(Local::now().date_naive())));
            ExportDocument::new(&reports).write_to(&path)?;
            println!(
                "Exported {} results to: {}",
                reports.len().to_string().bold(),
                path.display()
            );
        }

        Commands::Methods => {
            println!();
            println!("{}", "Known Embedding Methods:".green().bold());
            println!();

            for method in &EMBEDDING_METHODS {
                println!(
                    "  {} {} detectability: {:<10} signature: {}",
                    "●".cyan(),
                    format!("{:<16}", method.name).white().bold(),
                    method.detectability.to_string(),
                    method.signature.to_string().dimmed()
                );
            }
        }

        Commands::Analyzers { config } => {
            let pipeline = SteganalysisPipeline::new(load_config(config.as_deref())?);
            let weights = pipeline.aggregator().weights();

            println!();
            println!("{}", "Analyzers:".green().bold());
            println!();

            for analyzer in pipeline.registry().analyzers() {
                println!(
                    "  {} {} ({}, weight {:.2})",
                    "●".cyan(),
                    analyzer.method().white().bold(),
                    analyzer.key(),
                    weights.weight(analyzer.key())
                );
                println!("    {}", analyzer.description().dimmed());
            }
        }
    }

    Ok(())
}

fn print_banner() {
    println!();
    println!("{}", "╔══════════════════════════════════════════════════════════════════╗".cyan());
    println!("{}", "║             STEGSIGHT - Steganalysis Scan                        ║".cyan());
    println!("{}", "║             Heuristic scores, not forensic proof.                ║".cyan());
    println!("{}", "╚══════════════════════════════════════════════════════════════════╝".cyan());
    println!();
}

fn print_reports(reports: &[&ImageReport]) {
    if reports.is_empty() {
        println!("{}", "No images to report".dimmed());
        return;
    }

    for report in reports {
        let analysis = &report.analysis;
        let method = analysis
            .detected_method
            .as_deref()
            .map(|m| format!(" [{}]", m).magenta().to_string())
            .unwrap_or_default();

        println!(
            "  [{}] {}{}",
            status_color(report.status()),
            report.filename.white().bold(),
            method
        );
        println!("    Confidence: {:.1}%", analysis.confidence);
        println!("    File Size: {}", format_file_size(report.file_size));
        println!("    Dimensions: {}", report.dimensions);

        for detail in analysis.details.values() {
            match &detail.metrics {
                Metrics::ChiSquare { score } => println!("    Chi-Square Score: {:.2}", score),
                Metrics::Rs { ratio, .. } => println!("    RS Ratio: {:.3}", ratio),
                Metrics::Histogram { anomalies } => {
                    println!("    Histogram Anomalies: {}", anomalies)
                }
                _ => {}
            }
        }

        if analysis.status != Status::Clean {
            for detail in analysis.details.values() {
                println!(
                    "    {} {:<20} {:>5.1}%  {}",
                    "-".dimmed(),
                    detail.method.as_str(),
                    detail.confidence,
                    detail.description.dimmed()
                );
            }
        }

        println!();
    }
}

fn print_summary(summary: &BatchSummary) {
    println!("{}", "Batch Summary".green().bold());
    println!("  Total:      {}", summary.total);
    println!("  Clean:      {}", summary.clean.to_string().green());
    println!("  Suspicious: {}", summary.suspicious.to_string().yellow());
    println!("  Detected:   {}", summary.detected.to_string().red().bold());

    if summary.detected > 0 {
        println!();
        println!(
            "{}",
            format!("⚠ {} of {} images show embedding signatures", summary.detected, summary.total)
                .red()
                .bold()
        );
    }
}
