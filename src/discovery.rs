use anyhow::Result;
use futures::stream::{self, Stream, StreamExt};
use glob::glob;
use ignore::{WalkBuilder, WalkState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Extensions of C and C++ sources and headers
pub const DEFAULT_EXTENSIONS: &[&str] = &["c", "h", "cc", "cpp", "cxx", "hh", "hpp", "hxx"];

/// Configuration for source discovery
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Stop at the first inaccessible path instead of recording it
    pub fail_fast: bool,
    /// File extensions to pick up, without the leading dot
    pub extensions: Vec<String>,
    /// Skip paths excluded by `.gitignore` (parallel walker only)
    pub respect_gitignore: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            respect_gitignore: true,
        }
    }
}

impl DiscoveryConfig {
    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
    }
}

/// Result of file discovery validation
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    pub error: Option<String>,
}

impl FileValidation {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Discovers source files recursively under `root_dir` with one glob per
/// configured extension.
///
/// Yields files extension by extension; order within an extension follows
/// `glob`.
pub fn discover_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let root_path = root_dir.as_ref().to_path_buf();

    stream::unfold(
        DiscoveryState::new(root_path, config),
        |mut state| async move {
            state.next_file().await.map(|result| (result, state))
        },
    )
}

/// Parallel directory traversal with `ignore::WalkBuilder`
///
/// Paths are streamed while the walk is still running.
pub fn discover_files_parallel(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let root_path = root_dir.as_ref().to_path_buf();
    let config = Arc::new(config);
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        info!("Starting directory traversal in: {}", root_path.display());
        let traversal_start = std::time::Instant::now();

        let walker = WalkBuilder::new(&root_path)
            .threads((num_cpus::get() / 2).max(1))
            .follow_links(false)
            .hidden(false)
            .ignore(config.respect_gitignore)
            .git_ignore(config.respect_gitignore)
            .build_parallel();

        let (path_tx, path_rx) = std::sync::mpsc::channel();
        let walk_config = Arc::clone(&config);

        // the walker blocks, keep it off the runtime
        std::thread::spawn(move || {
            walker.run(|| {
                let path_tx = path_tx.clone();
                let walk_config = Arc::clone(&walk_config);
                Box::new(move |result| {
                    if let Ok(entry) = result {
                        let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
                        if is_file && walk_config.matches(entry.path()) {
                            debug!("Found source file: {}", entry.path().display());
                            if path_tx.send(entry.path().to_path_buf()).is_err() {
                                return WalkState::Quit;
                            }
                        }
                    }
                    WalkState::Continue
                })
            });
        });

        let mut file_count = 0;
        while let Ok(path) = path_rx.recv() {
            file_count += 1;
            match validate_file(path, &config).await {
                Ok(validation) => {
                    if tx.send(Ok(validation)).is_err() {
                        debug!("Receiver dropped, stopping discovery");
                        break;
                    }
                }
                Err(e) => {
                    if tx.send(Err(e)).is_err() {
                        debug!("Receiver dropped, stopping discovery");
                    }
                    break;
                }
            }
        }

        info!(
            "Discovery completed in {}ms, streamed {} files",
            traversal_start.elapsed().as_millis(),
            file_count
        );
    });

    stream::unfold(rx, |mut receiver| async move {
        receiver.recv().await.map(|result| (result, receiver))
    })
}

/// Check that `path` is a readable regular file
///
/// Inaccessible paths are recorded on the validation, or returned as `Err`
/// under `fail_fast`.
async fn validate_file(path: PathBuf, config: &DiscoveryConfig) -> Result<FileValidation> {
    match fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => Ok(FileValidation { path, error: None }),
        Ok(_) => {
            let error = format!("Path is not a file: {}", path.display());
            warn!("{}", error);
            Ok(FileValidation {
                path,
                error: Some(error),
            })
        }
        Err(e) => {
            let error = format!("Cannot access file {}: {}", path.display(), e);
            warn!("{}", error);
            if config.fail_fast {
                Err(anyhow::anyhow!(error))
            } else {
                Ok(FileValidation {
                    path,
                    error: Some(error),
                })
            }
        }
    }
}

/// Internal state for sequential discovery
struct DiscoveryState {
    root_dir: PathBuf,
    config: DiscoveryConfig,
    /// Index of the next extension to glob for
    next_extension: usize,
    glob_iter: Option<glob::Paths>,
}

impl DiscoveryState {
    fn new(root_dir: PathBuf, config: DiscoveryConfig) -> Self {
        Self {
            root_dir,
            config,
            next_extension: 0,
            glob_iter: None,
        }
    }

    async fn next_file(&mut self) -> Option<Result<FileValidation>> {
        loop {
            if self.glob_iter.is_none() {
                let extension = self.config.extensions.get(self.next_extension)?;
                self.next_extension += 1;
                let pattern = format!("{}/**/*.{}", self.root_dir.display(), extension);
                debug!("Globbing with pattern: {}", pattern);
                match glob(&pattern) {
                    Ok(paths) => self.glob_iter = Some(paths),
                    Err(e) => {
                        return Some(Err(anyhow::anyhow!("Invalid glob pattern {}: {}", pattern, e)));
                    }
                }
            }

            let glob_iter = self.glob_iter.as_mut()?;
            match glob_iter.next() {
                Some(Ok(path)) => {
                    debug!("Found file: {}", path.display());
                    return Some(validate_file(path, &self.config).await);
                }
                Some(Err(e)) => {
                    let error_msg = format!("Glob iteration error: {e}");
                    warn!("{}", error_msg);
                    if self.config.fail_fast {
                        return Some(Err(anyhow::anyhow!(error_msg)));
                    }
                }
                None => self.glob_iter = None,
            }
        }
    }
}

async fn collect(stream: impl Stream<Item = Result<FileValidation>>) -> Result<Vec<FileValidation>> {
    let mut files = Vec::new();
    let mut stream = Box::pin(stream);
    while let Some(result) = stream.next().await {
        files.push(result?);
    }

    let valid_count = files.iter().filter(|f| f.is_valid()).count();
    let invalid_count = files.len() - valid_count;
    if invalid_count > 0 {
        warn!("Found {} files with validation issues", invalid_count);
    }
    info!("File discovery summary: {} valid, {} invalid", valid_count, invalid_count);
    Ok(files)
}

/// Collect all sequentially discovered files
pub async fn collect_discovered_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    collect(discover_files(root_dir, config)).await
}

/// Collect all files found by the parallel walker
pub async fn collect_discovered_files_parallel(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    collect(discover_files_parallel(root_dir, config)).await
}

/// Valid source paths under `root_dir`, sorted
pub async fn find_source_files(root_dir: impl AsRef<Path>, config: DiscoveryConfig) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = collect_discovered_files_parallel(root_dir, config)
        .await?
        .into_iter()
        .filter(FileValidation::is_valid)
        .map(|v| v.path)
        .collect();
    paths.sort();
    Ok(paths)
}
