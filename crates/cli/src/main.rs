use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nb2prod_pipeline::{Notebook, NotebookPipeline, PipelineConfig};
use nb2prod_protocol::{serialize_json_pretty, FunctionCandidate, NoCandidateReason, NotebookAnalysis};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

mod report;

#[derive(Parser)]
#[command(name = "nb2prod")]
#[command(about = "Find notebook cells that can become production functions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// TOML configuration file (analyzer, grouper, parallel)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze cell dependencies, issues and function candidates
    Analyze(AnalyzeArgs),

    /// Render function candidates as Python source
    Extract(ExtractArgs),

    /// Print the JSON schema of the analysis output
    Schema,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Path to the .ipynb file
    notebook: PathBuf,

    /// Include imports and a per-cell breakdown
    #[arg(long)]
    detailed: bool,

    /// Output JSON instead of the text report
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ExtractArgs {
    /// Path to the .ipynb file
    notebook: PathBuf,

    /// Output JSON (candidates plus rendered source)
    #[arg(long)]
    json: bool,

    /// Write the rendered module here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct ExtractOutput<'a> {
    candidates: &'a [FunctionCandidate],
    no_candidate_reasons: &'a [NoCandidateReason],
    source: String,
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers
    let json_output = match &cli.command {
        Commands::Analyze(args) => args.json,
        Commands::Extract(args) => args.json,
        Commands::Schema => true,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Analyze(args) => run_analyze(args, cli.config.as_deref())?,
        Commands::Extract(args) => run_extract(args, cli.config.as_deref())?,
        Commands::Schema => run_schema()?,
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn analyze_notebook(path: &Path, config: Option<&Path>) -> Result<(Notebook, NotebookAnalysis)> {
    let config = load_config(config)?;
    let notebook = Notebook::from_path(path)
        .with_context(|| format!("Failed to load notebook {}", path.display()))?;
    let pipeline = NotebookPipeline::new(config).context("Invalid pipeline configuration")?;
    let analysis = pipeline
        .run_notebook(&notebook)
        .with_context(|| format!("Failed to analyze {}", path.display()))?;
    Ok((notebook, analysis))
}

fn run_analyze(args: AnalyzeArgs, config: Option<&Path>) -> Result<()> {
    let (notebook, analysis) = analyze_notebook(&args.notebook, config)?;

    if args.json {
        println!("{}", serialize_json_pretty(&analysis)?);
    } else {
        print!(
            "{}",
            report::render_analysis_report(&notebook, &analysis, args.detailed)
        );
    }
    Ok(())
}

fn run_extract(args: ExtractArgs, config: Option<&Path>) -> Result<()> {
    let (notebook, analysis) = analyze_notebook(&args.notebook, config)?;
    let source = report::render_extraction(&notebook, &analysis);

    if let Some(output) = &args.output {
        fs::write(output, &source)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        log::info!(
            "Wrote {} function(s) to {}",
            analysis.candidates.len(),
            output.display()
        );
    }

    if args.json {
        let out = ExtractOutput {
            candidates: &analysis.candidates,
            no_candidate_reasons: &analysis.no_candidate_reasons,
            source,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if args.output.is_none() {
        print!("{source}");
    }
    Ok(())
}

fn run_schema() -> Result<()> {
    let schema = schemars::schema_for!(NotebookAnalysis);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
