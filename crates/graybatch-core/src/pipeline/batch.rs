//! Batch orchestration: directory setup, discovery and bounded fan-out.
//!
//! Every discovered file becomes one blocking conversion job. A semaphore
//! caps how many run at once; the runner joins all of them before returning.
//! With `FailurePolicy::Abort` the first failure cancels whatever has not
//! started yet and is returned to the caller. Jobs already running are left
//! to finish on their own and their outputs are not cleaned up.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::{Config, FailurePolicy};
use crate::error::{PipelineError, PipelineResult};
use crate::types::{BatchSummary, ConvertedImage, FileFailure};

use super::discovery::{DiscoveredFile, FileDiscovery};
use super::processor::ImageConverter;

/// Concurrency and failure handling for a batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum conversions running at once
    pub workers: usize,
    /// What to do when one file fails
    pub failure_policy: FailurePolicy,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: crate::config::ProcessingConfig::default().workers(),
            failure_policy: FailurePolicy::Abort,
        }
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The input directory did not exist and was created; nothing was converted.
    InputDirCreated(PathBuf),
    /// Every discovered file was handled.
    Completed(BatchSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirState {
    Existing,
    Created,
}

/// Runs the whole input → output conversion.
pub struct BatchRunner {
    input_dir: PathBuf,
    output_dir: PathBuf,
    options: BatchOptions,
    discovery: FileDiscovery,
}

impl BatchRunner {
    /// Create a runner from the resolved configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_options(
            config.input_dir(),
            config.output_dir(),
            BatchOptions {
                workers: config.processing.workers(),
                failure_policy: config.processing.failure_policy,
            },
        )
    }

    pub fn with_options(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        options: BatchOptions,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            options: BatchOptions {
                workers: options.workers.max(1),
                ..options
            },
            discovery: FileDiscovery::new(),
        }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Set up directories, discover files and convert them all.
    ///
    /// A missing input directory is created and the run stops there.
    pub async fn run(&self) -> PipelineResult<RunOutcome> {
        if ensure_dir(&self.input_dir)? == DirState::Created {
            tracing::info!("Input directory created: {:?}", self.input_dir);
            return Ok(RunOutcome::InputDirCreated(self.input_dir.clone()));
        }
        if ensure_dir(&self.output_dir)? == DirState::Created {
            tracing::info!("Output directory created: {:?}", self.output_dir);
        }

        let files = self.discovery.discover(&self.input_dir)?;
        if files.is_empty() {
            tracing::info!("No PNG files found in {:?}", self.input_dir);
        } else {
            tracing::info!(
                "Found {} PNG file(s) to convert ({} bytes, {} worker(s))",
                files.len(),
                FileDiscovery::total_size(&files),
                self.options.workers
            );
        }

        let summary = self.convert_all(files).await?;
        Ok(RunOutcome::Completed(summary))
    }

    /// Convert a list of files with bounded concurrency.
    pub async fn convert_all(&self, files: Vec<DiscoveredFile>) -> PipelineResult<BatchSummary> {
        let start = Instant::now();
        let discovered = files.len();
        let semaphore = Arc::new(Semaphore::new(self.options.workers));
        let converter = Arc::new(ImageConverter::new(&self.output_dir));
        let mut tasks = JoinSet::new();

        for file in files {
            let semaphore = semaphore.clone();
            let converter = converter.clone();
            tasks.spawn(async move {
                let path = file.path;
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return Err(PipelineError::Join {
                            path,
                            message: "batch cancelled".to_string(),
                        })
                    }
                };
                let task_path = path.clone();
                match tokio::task::spawn_blocking(move || converter.convert(&task_path)).await {
                    Ok(result) => result,
                    Err(e) => Err(PipelineError::Join {
                        path,
                        message: e.to_string(),
                    }),
                }
            });
        }

        let mut summary = BatchSummary {
            discovered,
            ..Default::default()
        };

        while let Some(joined) = tasks.join_next().await {
            let result = joined.unwrap_or_else(|e| {
                Err(PipelineError::Join {
                    path: self.input_dir.clone(),
                    message: e.to_string(),
                })
            });

            match result {
                Ok(converted) => record_success(&mut summary, converted),
                Err(e) => match self.options.failure_policy {
                    FailurePolicy::Abort => {
                        semaphore.close();
                        tasks.abort_all();
                        return Err(e);
                    }
                    FailurePolicy::Isolate => {
                        tracing::error!("Failed: {:?} - {}", e.path(), e);
                        summary.failed += 1;
                        summary.failures.push(FileFailure {
                            path: e.path().to_path_buf(),
                            message: e.to_string(),
                        });
                    }
                },
            }
        }

        summary.outputs.sort();
        summary.failures.sort_by(|a, b| a.path.cmp(&b.path));
        summary.total_seconds = start.elapsed().as_secs_f64();
        if summary.total_seconds > 0.0 {
            summary.images_per_second = summary.succeeded as f64 / summary.total_seconds;
        }
        Ok(summary)
    }
}

fn record_success(summary: &mut BatchSummary, converted: ConvertedImage) {
    tracing::info!(
        "Image ready: {} (from {}, {} ms)",
        converted.output_path.display(),
        converted.input_path.display(),
        converted.elapsed_ms
    );
    summary.succeeded += 1;
    summary.outputs.push(converted.output_path);
}

/// Make sure `path` is a directory, creating it (group-writable) if absent.
fn ensure_dir(path: &Path) -> PipelineResult<DirState> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(DirState::Existing),
        Ok(_) => Err(PipelineError::CreateDir {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "path exists and is not a directory",
            ),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            create_dir(path).map_err(|e| PipelineError::CreateDir {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok(DirState::Created)
        }
        Err(e) => Err(PipelineError::CreateDir {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(unix)]
fn create_dir(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o775)
        .create(path)
}

#[cfg(not(unix))]
fn create_dir(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}
