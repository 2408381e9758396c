use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use searchunused::analysis::{AnalysisOptions, Finding};
use searchunused::config::Config;
use searchunused::discovery::FileFinder;
use searchunused::refactor::SafeFixer;
use searchunused::report::{self, ReportOptions, Reporter};
use searchunused::Error;

/// SearchUnused - Fast unused variable detection for Java
#[derive(Parser, Debug)]
#[command(name = "searchunused")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory (or a single Java file) to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target directories to analyze (can be specified multiple times)
    #[arg(short, long)]
    target: Vec<PathBuf>,

    /// Patterns to exclude (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Output file (for json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Apply the first fix alternative of every finding
    #[arg(long)]
    fix: bool,

    /// Interactive mode for fixes (pick an alternative for each finding)
    #[arg(long)]
    interactive: bool,

    /// Dry run - show which fixes would be applied without changing files
    #[arg(long)]
    dry_run: bool,

    /// Names starting with this prefix are treated as intentionally unused
    #[arg(long, value_name = "PREFIX")]
    unused_prefix: Option<String>,

    /// Also report fields set by dependency injection (@Inject, @Autowired)
    #[arg(long)]
    report_injected_fields: bool,

    /// Enable parallel processing for faster analysis (enabled by default)
    #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
    parallel: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(clap::ValueEnum, Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Compact,
    Json,
}

impl From<&OutputFormat> for report::ReportFormat {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => report::ReportFormat::Terminal,
            OutputFormat::Compact => report::ReportFormat::Compact,
            OutputFormat::Json => report::ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle shell completions
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose, cli.quiet);

    info!("SearchUnused v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    run_analysis(&config, &cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        // Try to load from default locations
        let root = if cli.path.is_file() {
            cli.path.parent().unwrap_or(Path::new("."))
        } else {
            cli.path.as_path()
        };
        Config::from_default_locations(root)?
    };

    // Override with CLI arguments
    if !cli.target.is_empty() {
        config.targets = cli.target.clone();
    }
    if !cli.exclude.is_empty() {
        config.exclude.extend(cli.exclude.clone());
    }
    if let Some(prefix) = &cli.unused_prefix {
        config.analysis.unused_name_prefix = prefix.clone();
    }
    if cli.report_injected_fields {
        config.analysis.report_injected_fields = true;
    }

    Ok(config)
}

fn run_analysis(config: &Config, cli: &Cli) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;

    let start_time = Instant::now();
    let options = AnalysisOptions::from_config(&config.analysis)?;

    // Step 1: Discover files
    info!("Discovering files...");
    let finder = FileFinder::new(config);
    let files = finder.find_files(&cli.path)?;

    info!("Found {} files to analyze", files.len());

    if files.is_empty() {
        if !cli.quiet {
            println!("{}", "No Java files found.".yellow());
        }
        return Ok(());
    }

    // Step 2: Analyze each compilation unit
    let results: Vec<Vec<Finding>> = if cli.parallel {
        if !cli.quiet {
            eprintln!(
                "{}",
                format!("⚡ Parallel mode: analyzing {} files...", files.len()).cyan()
            );
        }
        files
            .par_iter()
            .map(|file| analyze_or_skip(file, &options))
            .collect()
    } else {
        let pb = if cli.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(files.len() as u64)
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .into_diagnostic()?
                .progress_chars("#>-"),
        );

        let results = files
            .iter()
            .map(|file| {
                let findings = analyze_or_skip(file, &options);
                pb.inc(1);
                findings
            })
            .collect();
        pb.finish_and_clear();
        results
    };

    let findings: Vec<Finding> = results.into_iter().flatten().collect();
    info!("Found {} issues", findings.len());

    // Step 3: Report results
    let report_options = ReportOptions {
        output_path: cli.output.clone(),
        base_path: Some(cli.path.clone()),
    };
    let reporter = Reporter::with_options((&cli.format).into(), report_options);
    reporter.report(&findings)?;

    // Step 4: Apply fixes if requested
    if cli.fix || cli.dry_run || cli.interactive {
        let fixer = SafeFixer::new(cli.interactive, cli.dry_run);
        fixer.fix(&findings)?;
    }

    let elapsed = start_time.elapsed();
    if !cli.quiet {
        eprintln!(
            "{}",
            format!(
                "⏱  Analyzed {} files in {:.2}s",
                files.len(),
                elapsed.as_secs_f64()
            )
            .dimmed()
        );
    }

    Ok(())
}

/// Analyze one file; unreadable or unparsable files are logged and skipped
fn analyze_or_skip(file: &Path, options: &AnalysisOptions) -> Vec<Finding> {
    match searchunused::analyze_file(file, options) {
        Ok(findings) => {
            debug!("{}: {} findings", file.display(), findings.len());
            findings
        }
        Err(Error::Syntax { line, column }) => {
            warn!(
                "Skipping {}: syntax error at {}:{}",
                file.display(),
                line,
                column
            );
            Vec::new()
        }
        Err(e) => {
            warn!("Skipping {}: {}", file.display(), e);
            Vec::new()
        }
    }
}
