use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use cinedex::config::{default_config_path, load_config, Config};
use cinedex::organize::{load_metadata, OrganizePass, Organizer};
use cinedex::pipeline::{ConsoleProgress, ExtractionPipeline, PipelineConfig, ProgressReporter};
use cinedex::report::{OrganizationReport, BATCH_REPORT_FILE};
use cinedex::{BatchOptions, BatchRunner, SourceSelection};

#[derive(Parser, Debug)]
#[command(name = "cinedex", version, about = "Emby/Jellyfin movie metadata extractor and poster organizer")]
struct Cli {
    /// JSON config file (default: <user config dir>/cinedex/config.json when present)
    #[arg(long, global = true, env = "CINEDEX_CONFIG")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract movie metadata from the library databases
    Extract {
        #[command(flatten)]
        paths: ExtractPaths,
        /// Copy cached images into the output tree
        #[arg(long)]
        images: bool,
        /// Write a JSON report per source
        #[arg(long)]
        report: bool,
    },
    /// Organize extracted metadata and images into browsable directories
    Organize {
        /// Extraction output directory
        #[arg(long)]
        input: PathBuf,
        /// Organized output directory
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value = "both")]
        source: SourceSelection,
        #[command(flatten)]
        passes: PassFlags,
        /// Write organization_report.json
        #[arg(long)]
        report: bool,
    },
    /// Extract, organize everything and write a batch summary
    Batch {
        #[command(flatten)]
        paths: ExtractPaths,
        /// Do not copy images during extraction
        #[arg(long)]
        no_images: bool,
        /// Only organize by name, year and genre
        #[arg(long)]
        no_full_org: bool,
        /// Remove *.tmp, *.temp and *.log files from the output afterwards
        #[arg(long)]
        cleanup: bool,
    },
}

#[derive(Args, Debug)]
struct ExtractPaths {
    #[arg(long, default_value = "both")]
    source: SourceSelection,
    /// Directory holding the media server config trees
    #[arg(long)]
    config_dir: Option<PathBuf>,
    /// Output directory
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PassFlags {
    #[arg(long)]
    by_name: bool,
    #[arg(long)]
    by_year: bool,
    #[arg(long)]
    by_genre: bool,
    #[arg(long)]
    by_rating: bool,
    #[arg(long)]
    high_quality: bool,
    #[arg(long)]
    missing_images: bool,
    /// Run every organization pass
    #[arg(long)]
    all: bool,
}

impl PassFlags {
    fn selected(&self) -> Vec<OrganizePass> {
        if self.all {
            return OrganizePass::ALL.to_vec();
        }
        [
            (self.by_name, OrganizePass::ByName),
            (self.by_year, OrganizePass::ByYear),
            (self.by_genre, OrganizePass::ByGenre),
            (self.by_rating, OrganizePass::ByRating),
            (self.high_quality, OrganizePass::HighQuality),
            (self.missing_images, OrganizePass::MissingImages),
        ]
        .into_iter()
        .filter_map(|(on, pass)| on.then_some(pass))
        .collect()
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    // Bridge `log` records from the library reader.
    tracing_log::LogTracer::init().context("Failed to install log bridge")?;
    Ok(())
}

fn resolve_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return load_config(path)
            .with_context(|| format!("Invalid config file {}", path.display()));
    }

    match default_config_path().filter(|p| p.is_file()) {
        Some(path) => {
            debug!("Using config {}", path.display());
            load_config(&path).with_context(|| format!("Invalid config file {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

fn pipeline_config(config: &Config, paths: &ExtractPaths) -> PipelineConfig {
    let mut pipeline = PipelineConfig::from_config(config);
    if let Some(dir) = &paths.config_dir {
        pipeline.config_directory = dir.clone();
    }
    if let Some(dir) = &paths.output {
        pipeline.output_directory = dir.clone();
    }
    pipeline
}

fn run_extract(config: &Config, paths: &ExtractPaths, images: bool, report: bool) -> Result<()> {
    let mut pipeline_config = pipeline_config(config, paths);
    pipeline_config.copy_images = images;
    pipeline_config.generate_report = report;
    let output = pipeline_config.output_directory.clone();

    let progress = ConsoleProgress;
    let pipeline = ExtractionPipeline::new(pipeline_config);
    let results = pipeline
        .run_all(&config.sources, paths.source, &progress)
        .with_context(|| format!("Cannot write to {}", output.display()))?;

    for (outcome, ctx) in &results {
        if let Some(report) = &ctx.report {
            println!("\n{}", report);
        }
        if let Some(summary) = ctx.images {
            println!("{} images copied, {} failed", summary.copied, summary.failed);
        }
        if let Some(error) = &outcome.error {
            println!("{} skipped: {}", outcome.kind, error);
        }
    }

    println!("\nOutput: {}", output.display());
    Ok(())
}

fn run_organize(
    input: &Path,
    output: &Path,
    source: SourceSelection,
    passes: &[OrganizePass],
    report: bool,
) -> Result<()> {
    if passes.is_empty() {
        bail!("No organization selected; pass --all or at least one of --by-name, --by-year, --by-genre, --by-rating, --high-quality, --missing-images");
    }

    let progress = ConsoleProgress;
    let loaded = load_metadata(input, source);
    for error in &loaded.errors {
        progress.report(cinedex::pipeline::ProgressEvent::Warning {
            message: error.to_string(),
        });
    }
    for (kind, count) in &loaded.per_source {
        println!("Loaded {} {} movies", count, kind);
    }
    info!("{} movies loaded", loaded.movies.len());

    let organizer = Organizer::new(output);
    organizer
        .prepare()
        .with_context(|| format!("Cannot write to {}", output.display()))?;

    for outcome in organizer.run_passes(passes, &loaded.movies, &progress) {
        println!(
            "{}: {} placed, {} images copied, {} failed",
            outcome.pass,
            outcome.placed,
            outcome.images_copied,
            outcome.copy_failures + outcome.failed_placements
        );
    }

    if report {
        let summary = OrganizationReport::build(&loaded.movies, output);
        let path = organizer.write_report(&summary)?;
        println!("\n{}", summary);
        println!("Report: {}", path.display());
    }

    println!("\nOutput: {}", output.display());
    Ok(())
}

fn run_batch(config: &Config, paths: &ExtractPaths, options: BatchOptions) -> Result<()> {
    let pipeline_config = pipeline_config(config, paths);
    let output = pipeline_config.output_directory.clone();

    let outcome = BatchRunner::new(pipeline_config, config.sources.clone())
        .run(options, &ConsoleProgress)
        .with_context(|| format!("Batch run in {} failed", output.display()))?;

    for (_, ctx) in &outcome.extraction {
        if let Some(report) = &ctx.report {
            println!("\n{}", report);
        }
    }
    println!("\n{}", outcome.organization);
    println!("\n{}", outcome.report);
    if let Some(cleaned) = outcome.cleaned {
        println!("{} temporary files removed", cleaned);
    }
    println!("Report: {}", output.join(BATCH_REPORT_FILE).display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = resolve_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Extract {
            paths,
            images,
            report,
        } => run_extract(&config, paths, *images, *report),
        Commands::Organize {
            input,
            output,
            source,
            passes,
            report,
        } => run_organize(input, output, *source, &passes.selected(), *report),
        Commands::Batch {
            paths,
            no_images,
            no_full_org,
            cleanup,
        } => run_batch(
            &config,
            paths,
            BatchOptions {
                selection: paths.source,
                copy_images: !*no_images,
                full_organization: !*no_full_org,
                cleanup: *cleanup,
            },
        ),
    }
}
