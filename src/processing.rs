// WHY: File layer over the pipeline. Conversion may block on a backend call, so each
// buffer is converted on the blocking pool while reads and writes stay async

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use crate::pipeline::{ConversionReport, Pipeline};
use crate::replacer::ReplaceMode;

/// Per-file processing statistics
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    /// File path as given to the processor
    pub path: String,
    /// Comments the extractor found
    pub comments_found: u64,
    pub converted: u64,
    pub skipped: u64,
    pub failed: u64,
    /// Whether the file was rewritten
    pub written: bool,
    pub processing_time_ms: u64,
    /// `success`, `partial` (some comments failed) or `failed`
    pub status: String,
    /// Error message if processing failed
    pub error: Option<String>,
}

impl FileStats {
    fn from_report(path: &Path, report: &ConversionReport, written: bool, started: Instant) -> Self {
        let status = if report.has_failures() { "partial" } else { "success" };
        Self {
            path: path.display().to_string(),
            comments_found: report.total() as u64,
            converted: report.converted as u64,
            skipped: report.skipped.len() as u64,
            failed: report.failed.len() as u64,
            written,
            processing_time_ms: started.elapsed().as_millis() as u64,
            status: status.to_string(),
            error: None,
        }
    }

    fn failed(path: &Path, error: &anyhow::Error, started: Instant) -> Self {
        Self {
            path: path.display().to_string(),
            comments_found: 0,
            converted: 0,
            skipped: 0,
            failed: 0,
            written: false,
            processing_time_ms: started.elapsed().as_millis() as u64,
            status: "failed".to_string(),
            error: Some(format!("{error:#}")),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Whole-run statistics written by `--stats-out`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Seconds since the Unix epoch when the run started
    pub run_start: u64,
    pub total_processing_time_ms: u64,
    pub files_processed: u64,
    pub files_written: u64,
    pub files_failed: u64,
    pub comments_converted: u64,
    pub comments_skipped: u64,
    pub comments_failed: u64,
    pub file_stats: Vec<FileStats>,
}

impl RunStats {
    pub fn new(run_start: SystemTime, file_stats: Vec<FileStats>) -> Self {
        let sum = |field: fn(&FileStats) -> u64| file_stats.iter().map(field).sum::<u64>();
        Self {
            run_start: run_start
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
            total_processing_time_ms: run_start
                .elapsed()
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default(),
            files_processed: file_stats.len() as u64,
            files_written: file_stats.iter().filter(|s| s.written).count() as u64,
            files_failed: file_stats.iter().filter(|s| s.status == "failed").count() as u64,
            comments_converted: sum(|s| s.converted),
            comments_skipped: sum(|s| s.skipped),
            comments_failed: sum(|s| s.failed),
            file_stats,
        }
    }
}

/// Configuration for batch processing
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub mode: ReplaceMode,
    /// Stop scheduling files after the first file that does not fully succeed
    pub fail_fast: bool,
    /// Convert without writing
    pub dry_run: bool,
    /// Files converted at once
    pub concurrency: usize,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            mode: ReplaceMode::Replace,
            fail_fast: false,
            dry_run: false,
            concurrency: num_cpus::get(),
        }
    }
}

/// Converted file together with whether it was written
#[derive(Debug, Clone)]
pub struct FileConversion {
    pub path: PathBuf,
    pub report: ConversionReport,
    pub written: bool,
}

/// Read `path` and convert it without writing anything
pub async fn preview_file(pipeline: Arc<Pipeline>, path: &Path, mode: ReplaceMode) -> Result<(String, ConversionReport)> {
    let original = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let source = original.clone();
    let report = tokio::task::spawn_blocking(move || pipeline.convert_with_report(&source, mode))
        .await
        .context("Conversion task did not complete")?
        .with_context(|| format!("Failed to convert {}", path.display()))?;
    Ok((original, report))
}

/// Convert one file and write the result to `target`, or back to `path`
///
/// Nothing is written when conversion leaves the text unchanged.
pub async fn convert_file(
    pipeline: Arc<Pipeline>,
    path: &Path,
    mode: ReplaceMode,
    target: Option<&Path>,
) -> Result<FileConversion> {
    let (original, report) = preview_file(pipeline, path, mode).await?;
    let destination = target.unwrap_or(path);

    let written = report.output != original;
    if written {
        tokio::fs::write(destination, &report.output)
            .await
            .with_context(|| format!("Failed to write {}", destination.display()))?;
        debug!("Wrote {} converted comments to {}", report.converted, destination.display());
    } else {
        debug!("No changes for {}", path.display());
    }

    Ok(FileConversion {
        path: path.to_path_buf(),
        report,
        written,
    })
}

async fn process_one(pipeline: Arc<Pipeline>, path: PathBuf, config: &ProcessConfig) -> FileStats {
    let started = Instant::now();
    let outcome = if config.dry_run {
        preview_file(pipeline, &path, config.mode)
            .await
            .map(|(_, report)| (report, false))
    } else {
        convert_file(pipeline, &path, config.mode, None)
            .await
            .map(|conversion| (conversion.report, conversion.written))
    };

    match outcome {
        Ok((report, written)) => {
            for failure in &report.failed {
                warn!("{} {}: {}", path.display(), failure.range, failure.reason);
            }
            FileStats::from_report(&path, &report, written, started)
        }
        Err(e) => {
            warn!("Failed to process {}: {:#}", path.display(), e);
            FileStats::failed(&path, &e, started)
        }
    }
}

/// Convert many files concurrently
///
/// Returns stats for every file that was processed; under `fail_fast` no new
/// file is started after the first one that does not fully succeed.
pub async fn process_files(
    pipeline: Arc<Pipeline>,
    paths: Vec<PathBuf>,
    config: &ProcessConfig,
    progress: Option<&ProgressBar>,
) -> Vec<FileStats> {
    let total = paths.len();
    info!("Processing {} files with concurrency {}", total, config.concurrency.max(1));

    let mut results = stream::iter(paths)
        .map(|path| process_one(Arc::clone(&pipeline), path, config))
        .buffer_unordered(config.concurrency.max(1));

    let mut all_stats = Vec::with_capacity(total);
    while let Some(stats) = results.next().await {
        if let Some(pb) = progress {
            pb.inc(1);
            pb.set_message(stats.path.clone());
        }
        let stop = config.fail_fast && !stats.is_success();
        all_stats.push(stats);
        if stop {
            warn!("Stopping after failure (fail-fast), {} of {} files done", all_stats.len(), total);
            break;
        }
    }
    all_stats
}

/// Write run stats as pretty JSON
pub async fn write_stats(path: &Path, stats: &RunStats) -> Result<()> {
    let content = serde_json::to_string_pretty(stats)?;
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write stats to {}", path.display()))?;
    info!("Wrote stats for {} files to {}", stats.files_processed, path.display());
    Ok(())
}
