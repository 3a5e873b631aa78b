use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use cxmetrics::cli::{Cli, Commands, GoldenCommand, OutputFormat};
use cxmetrics::config::{resolve_config, AnalysisConfig};
use cxmetrics::golden::{run_suite, GoldenComparator, SuiteResult};
use cxmetrics::io::{bless_fixture_dir, discover_sources, load_fixture_dir, load_sources};
use cxmetrics::metrics::MetricReport;
use cxmetrics::pipeline::{analyze_batch, BatchOutcome};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CXMETRICS_LOG";

/// Exit status when analysis ran but found failures or mismatches.
const EXIT_FAILURES: u8 = 1;
/// Exit status for usage, configuration or I/O errors.
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    let config = resolve_config(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Analyze {
            paths,
            format,
            long_method_threshold,
            count_logical_operators,
        } => {
            let mut config = config;
            if let Some(threshold) = long_method_threshold {
                config = config.with_long_method_threshold(threshold);
            }
            if count_logical_operators {
                config = config.with_logical_operators(true);
            }
            config.validate()?;
            handle_analyze(&paths, format, &config)
        }
        Commands::Golden { action } => match action {
            GoldenCommand::Check { dir, format } => handle_golden_check(&dir, format, config),
            GoldenCommand::Bless { dir } => handle_golden_bless(&dir, &config),
        },
    }
}

fn handle_analyze(
    paths: &[PathBuf],
    format: OutputFormat,
    config: &AnalysisConfig,
) -> Result<ExitCode> {
    let found = discover_sources(paths)?;
    tracing::info!("Analyzing {} source files", found.len());
    let units = load_sources(&found);
    let outcomes = analyze_batch(&units, config);

    match format {
        OutputFormat::Json => print_json(&outcomes)?,
        OutputFormat::Text => outcomes.iter().for_each(print_text),
    }

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 || units.len() < found.len() {
        eprintln!(
            "{} {} of {} sources could not be analyzed",
            "warning:".yellow().bold(),
            failed + (found.len() - units.len()),
            found.len()
        );
        return Ok(ExitCode::from(EXIT_FAILURES));
    }
    Ok(ExitCode::SUCCESS)
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a MetricReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn print_json(outcomes: &[BatchOutcome]) -> Result<()> {
    let entries: Vec<JsonEntry> = outcomes
        .iter()
        .map(|outcome| JsonEntry {
            source: &outcome.label,
            report: outcome.result.as_ref().ok(),
            error: outcome.result.as_ref().err().map(|e| e.to_string()),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn print_text(outcome: &BatchOutcome) {
    let report = match &outcome.result {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{} {}: {}", "error:".red().bold(), outcome.label, err);
            return;
        }
    };
    println!("{} ({})", outcome.label.bold(), report.language);
    print_units(report);
}

fn print_units(report: &MetricReport) {
    println!(
        "  {:<40} {:>4} {:>5} {:>6} {:>6} {:>7}",
        "unit", "cyc", "nest", "stmts", "lines", "params"
    );
    for unit in &report.units {
        let name = if unit.long_method {
            format!("{} [long]", unit.name).yellow().to_string()
        } else {
            unit.name.clone()
        };
        println!(
            "  {:<40} {:>4} {:>5} {:>6} {:>6} {:>7}",
            name, unit.cyclomatic, unit.max_nesting, unit.statements, unit.lines, unit.parameters
        );
    }
    let summary = &report.summary;
    println!(
        "  {} units, {} lines ({} code, {} comment), total cyclomatic {}, {} long\n",
        summary.units,
        summary.total_lines,
        summary.real_lines,
        summary.comment_lines,
        summary.total_cyclomatic,
        summary.long_methods
    );
}

fn handle_golden_check(dir: &Path, format: OutputFormat, config: AnalysisConfig) -> Result<ExitCode> {
    let loaded = load_fixture_dir(dir)?;
    let comparator = GoldenComparator::new(config);
    let result = run_suite(&loaded.fixtures, &loaded.ids(), &comparator);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_suite(&result),
    }

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FAILURES)
    })
}

fn print_suite(result: &SuiteResult) {
    for id in &result.passed {
        println!("{} {}", "PASS".green().bold(), id);
    }
    for (id, mismatches) in &result.failed {
        println!("{} {}", "FAIL".red().bold(), id);
        for mismatch in mismatches {
            println!("    {mismatch}");
        }
    }
    for (id, error) in &result.errors {
        println!("{} {}: {}", "ERROR".red().bold(), id, error);
    }
    println!(
        "\n{} passed, {} failed, {} errors",
        result.passed.len(),
        result.failed.len(),
        result.errors.len()
    );
}

fn handle_golden_bless(dir: &Path, config: &AnalysisConfig) -> Result<ExitCode> {
    let written = bless_fixture_dir(dir, config)?;
    println!("Blessed {} golden artifacts in {}", written.len(), dir.display());
    Ok(ExitCode::SUCCESS)
}
