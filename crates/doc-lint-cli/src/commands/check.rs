//! Check command implementation.

use anyhow::{Context, Result};
use doc_lint_core::{Config, InMemoryRegistry, Runner};
use doc_lint_validators::Preset;
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Extension of the source files handed to validators.
const SOURCE_EXTENSION: &str = "rb";

/// Arguments of the check command.
pub struct CheckArgs {
    /// Files or directories to check.
    pub paths: Vec<PathBuf>,
    /// Registry dump to load.
    pub registry: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated validator names.
    pub validators_filter: Option<String>,
    /// Validator preset.
    pub preset: Preset,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// Where the configuration comes from.
    pub source: ConfigSource,
}

/// Runs the check command.
pub fn run(args: &CheckArgs) -> Result<()> {
    let mut config = load_config(&args.source)?;
    config
        .all_validators
        .exclude
        .extend(args.exclude.iter().cloned());

    let files = expand_paths(&args.paths, &config.all_validators.exclude)?;
    if files.is_empty() {
        tracing::warn!("No .{} files found under {:?}", SOURCE_EXTENSION, args.paths);
        return Ok(());
    }

    let registry = match &args.registry {
        Some(path) => InMemoryRegistry::from_file(path)
            .with_context(|| format!("Failed to load registry: {}", path.display()))?,
        None => {
            tracing::info!("No registry given; in-process validators have no objects to check");
            InMemoryRegistry::default()
        }
    };

    let mut builder = Runner::builder()
        .config(config)
        .validators(args.preset.validators())
        .registry(registry)
        .files(files);

    if let Some(filter) = &args.validators_filter {
        builder = builder.only(filter.split(',').map(str::trim).filter(|s| !s.is_empty()));
    }

    let runner = builder.build();

    tracing::info!(
        "Checking {:?} with {} validators",
        args.paths,
        runner.validator_count()
    );

    let aggregate = runner.run().context("Check failed")?;

    super::output::print(&aggregate, args.format)?;

    let code = aggregate.exit_code();
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => Ok(Config::default()),
        other => {
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

/// Directory used to look up project configuration.
#[must_use]
pub fn project_dir(paths: &[PathBuf]) -> PathBuf {
    match paths.first() {
        Some(p) if p.is_dir() => p.clone(),
        Some(p) => p
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        None => PathBuf::from("."),
    }
}

/// Expands files and directories into the sorted list of source files,
/// honoring `.gitignore` and the exclude globs.
fn expand_paths(paths: &[PathBuf], exclude: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }

        let mut overrides = OverrideBuilder::new(path);
        for pattern in exclude {
            overrides
                .add(&format!("!{pattern}"))
                .with_context(|| format!("Invalid exclude pattern: {pattern}"))?;
        }

        let walker = WalkBuilder::new(path)
            .overrides(overrides.build().context("Invalid exclude patterns")?)
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let entry_path = entry.path();
            if entry_path.is_file()
                && entry_path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
            {
                files.push(entry_path.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}
