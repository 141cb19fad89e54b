//! The `graybatch convert` command, also run when no command is given.

use clap::{Args, ValueEnum};
use graybatch_core::{BatchRunner, BatchSummary, Config, FailurePolicy, RunOutcome};
use std::path::{Path, PathBuf};

/// Arguments for the `convert` command.
#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    /// Directory scanned for *.png files [default: ./input/]
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory receiving the grayscale copies [default: ./output/]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of files converted at once [default: available cores]
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// What to do when a file cannot be converted
    #[arg(long, value_enum)]
    pub on_error: Option<OnError>,

    /// Print the batch summary as JSON on stdout
    #[arg(long)]
    pub summary: bool,
}

/// CLI spelling of the failure policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OnError {
    /// Stop the whole batch at the first failure (default)
    Abort,
    /// Report failed files and convert the rest
    Isolate,
}

impl From<OnError> for FailurePolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::Abort => FailurePolicy::Abort,
            OnError::Isolate => FailurePolicy::Isolate,
        }
    }
}

/// Execute the convert command.
pub async fn execute(args: ConvertArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = build_config(&args, config_path)?;
    tracing::debug!(
        "Input {:?}, output {:?}, policy {}",
        config.input_dir(),
        config.output_dir(),
        config.processing.failure_policy
    );

    let summary = match BatchRunner::new(&config).run().await? {
        RunOutcome::InputDirCreated(dir) => {
            tracing::info!("Drop PNG files into {:?} and run again", dir);
            return Ok(());
        }
        RunOutcome::Completed(summary) => summary,
    };

    log_summary(&summary);
    if args.summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    if !summary.is_clean() {
        anyhow::bail!(
            "{} of {} file(s) could not be converted",
            summary.failed,
            summary.discovered
        );
    }
    Ok(())
}

/// Load the config file and apply command-line overrides.
fn build_config(args: &ConvertArgs, config_path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = super::load_config(config_path)?;
    apply_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut Config, args: &ConvertArgs) {
    if let Some(input) = &args.input {
        config.paths.input_dir = input.clone();
    }
    if let Some(output) = &args.output {
        config.paths.output_dir = output.clone();
    }
    if let Some(parallel) = args.parallel {
        config.processing.parallel_workers = Some(parallel);
    }
    if let Some(on_error) = args.on_error {
        config.processing.failure_policy = on_error.into();
    }
}

fn log_summary(summary: &BatchSummary) {
    if summary.discovered == 0 {
        return;
    }
    tracing::info!(
        "Converted {}/{} image(s) in {:.2}s ({:.1} img/sec)",
        summary.succeeded,
        summary.discovered,
        summary.total_seconds,
        summary.images_per_second
    );
    for failure in &summary.failures {
        tracing::warn!("  {:?}: {}", failure.path, failure.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_args_default_is_empty() {
        let args = ConvertArgs::default();
        assert!(args.input.is_none());
        assert!(args.output.is_none());
        assert!(args.parallel.is_none());
        assert!(args.on_error.is_none());
        assert!(!args.summary);
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut config = Config::default();
        let args = ConvertArgs {
            input: Some(PathBuf::from("scans")),
            output: Some(PathBuf::from("scans-gray")),
            parallel: Some(3),
            on_error: Some(OnError::Isolate),
            summary: false,
        };

        apply_overrides(&mut config, &args);

        assert_eq!(config.paths.input_dir, PathBuf::from("scans"));
        assert_eq!(config.paths.output_dir, PathBuf::from("scans-gray"));
        assert_eq!(config.processing.workers(), 3);
        assert_eq!(config.processing.failure_policy, FailurePolicy::Isolate);
    }

    #[test]
    fn no_overrides_keep_defaults() {
        let mut config = Config::default();
        apply_overrides(&mut config, &ConvertArgs::default());

        assert_eq!(config.paths.input_dir, PathBuf::from("./input/"));
        assert_eq!(config.processing.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn build_config_rejects_zero_workers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let args = ConvertArgs {
            parallel: Some(0),
            ..Default::default()
        };
        let err = build_config(&args, Some(&path)).unwrap_err();
        assert!(err.to_string().contains("parallel_workers"));
    }

    #[tokio::test]
    async fn execute_first_run_then_convert() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");

        let args = || ConvertArgs {
            input: Some(input.clone()),
            output: Some(output.clone()),
            parallel: Some(2),
            ..Default::default()
        };

        execute(args(), Some(&config_path)).await.unwrap();
        assert!(input.is_dir());
        assert!(!output.exists());

        image::RgbaImage::from_pixel(3, 3, image::Rgba([30, 60, 90, 255]))
            .save_with_format(input.join("x.png"), image::ImageFormat::Png)
            .unwrap();
        execute(args(), Some(&config_path)).await.unwrap();
        assert!(output.join("x.png").is_file());
    }

    fn corrupt_batch(dir: &Path, on_error: OnError) -> (PathBuf, ConvertArgs) {
        let config_path = dir.join("config.toml");
        std::fs::write(&config_path, "").unwrap();
        let input = dir.join("in");
        std::fs::create_dir(&input).unwrap();

        image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]))
            .save_with_format(input.join("good.png"), image::ImageFormat::Png)
            .unwrap();
        std::fs::write(input.join("broken.png"), b"\x89PNG\r\n\x1a\ntruncated").unwrap();

        let args = ConvertArgs {
            input: Some(input),
            output: Some(dir.join("out")),
            parallel: Some(1),
            on_error: Some(on_error),
            summary: false,
        };
        (config_path, args)
    }

    #[tokio::test]
    async fn execute_fails_on_corrupt_png_under_abort() {
        let dir = tempfile::tempdir().unwrap();
        let (config_path, args) = corrupt_batch(dir.path(), OnError::Abort);

        let err = execute(args, Some(&config_path)).await.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("could not be decoded"), "{msg}");
        assert!(msg.contains("broken.png"), "{msg}");
    }

    #[tokio::test]
    async fn execute_fails_after_converting_the_rest_under_isolate() {
        let dir = tempfile::tempdir().unwrap();
        let (config_path, args) = corrupt_batch(dir.path(), OnError::Isolate);

        let err = execute(args, Some(&config_path)).await.unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 file(s) could not be converted");
        assert!(dir.path().join("out").join("good.png").is_file());
        assert!(!dir.path().join("out").join("broken.png").exists());
    }
}
