use anyhow::{Context, Result};
use clap::Parser;
use docstyle::{
    find_source_files, process_files, write_stats, CommandMarker, CommentStyle, EngineConfig,
    ReplaceMode, RunStats, Strategy,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "docstyle")]
#[command(about = "Convert documentation comments in C and C++ sources between styles")]
#[command(version)]
struct Args {
    /// Root directory to scan for C/C++ sources
    root_dir: PathBuf,

    /// TOML configuration file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Conversion strategy (normalize, markers, substitute)
    #[arg(long)]
    strategy: Option<Strategy>,

    /// Target comment style, e.g. javadoc_block or cpp_line
    #[arg(long)]
    style: Option<CommentStyle>,

    /// How new comments are placed (replace, append, append_inline)
    #[arg(long)]
    mode: Option<ReplaceMode>,

    /// Target command marker for the markers strategy (backslash, at)
    #[arg(long)]
    marker: Option<CommandMarker>,

    /// Regex for the substitute strategy
    #[arg(long, requires = "replacement")]
    pattern: Option<String>,

    /// Replacement for the substitute strategy
    #[arg(long)]
    replacement: Option<String>,

    /// Leave Doxygen-style comments untouched
    #[arg(long)]
    skip_doxygen: bool,

    /// Report what would change without writing files
    #[arg(long)]
    dry_run: bool,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Stats output file path
    #[arg(long, default_value = "run_stats.json")]
    stats_out: PathBuf,
}

impl Args {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(style) = self.style {
            config.style = style;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(marker) = self.marker {
            config.marker = marker;
        }
        if self.pattern.is_some() {
            config.pattern = self.pattern.clone();
            config.replacement = self.replacement.clone();
        }
        config.skip_doxygen |= self.skip_doxygen;
        config.fail_fast |= self.fail_fast;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let run_start = SystemTime::now();
    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    if !args.root_dir.exists() {
        anyhow::bail!("Root directory does not exist: {}", args.root_dir.display());
    }
    if !args.root_dir.is_dir() {
        anyhow::bail!("Root path is not a directory: {}", args.root_dir.display());
    }

    let config = args.engine_config()?;
    let pipeline = Arc::new(config.build_pipeline().context("Invalid engine configuration")?);
    info!(
        strategy = %config.strategy,
        style = %config.style,
        mode = %config.mode,
        "Pipeline ready"
    );

    let paths = find_source_files(&args.root_dir, config.discovery_config()).await?;
    println!("docstyle v{} - found {} source files", env!("CARGO_PKG_VERSION"), paths.len());

    let progress = if args.no_progress {
        None
    } else {
        let pb = ProgressBar::new(paths.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} {wide_msg}")
                .context("Invalid progress template")?,
        );
        Some(pb)
    };

    let process_config = config.process_config(args.dry_run);
    let stats = process_files(pipeline, paths, &process_config, progress.as_ref()).await;
    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let run_stats = RunStats::new(run_start, stats);
    write_stats(&args.stats_out, &run_stats).await?;

    println!("Processed {} files:", run_stats.files_processed);
    println!("  Comments converted: {}", run_stats.comments_converted);
    println!("  Comments skipped: {}", run_stats.comments_skipped);
    println!("  Comments failed: {}", run_stats.comments_failed);
    if args.dry_run {
        println!("  Dry run, no files written");
    } else {
        println!("  Files written: {}", run_stats.files_written);
    }
    for file in run_stats.file_stats.iter().filter(|s| s.status == "failed") {
        println!("  Failed: {} ({})", file.path, file.error.as_deref().unwrap_or("unknown error"));
    }
    println!("Stats written to {}", args.stats_out.display());

    if args.fail_fast && (run_stats.files_failed > 0 || run_stats.comments_failed > 0) {
        anyhow::bail!("Stopped on first failure (--fail-fast)");
    }
    Ok(())
}
