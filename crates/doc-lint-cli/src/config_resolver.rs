//! Locating the configuration file.
//!
//! Candidates are tried in order:
//!
//! 1. `--config` (taken as-is, even if missing)
//! 2. `doc-lint.toml` or `.doc-lint.toml` in the checked directory or the
//!    nearest ancestor that has one
//! 3. `config.toml` in the global directory (`$DOC_LINT_CONFIG_DIR`, else
//!    `~/.doc-lint/`)
//! 4. built-in defaults

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project directory or one of its ancestors.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Path of the configuration file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` for [`ConfigSource::Global`].
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["doc-lint.toml", ".doc-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Env var overriding the global config directory.
pub const CONFIG_DIR_ENV: &str = "DOC_LINT_CONFIG_DIR";

/// Finds the configuration for a run rooted at `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with(project_dir, explicit, global_config_dir())
}

fn resolve_with(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_project_config(project_dir) {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, |candidate| {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        })
}

/// Nearest project config at or above `start`.
fn find_project_config(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    start.ancestors().find_map(|dir| {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// The global config directory: `$DOC_LINT_CONFIG_DIR`, else `~/.doc-lint`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".doc-lint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn canonical(tmp: &TempDir, name: &str) -> PathBuf {
        tmp.path().canonicalize().unwrap().join(name)
    }

    #[test]
    fn explicit_wins_and_is_not_checked() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("doc-lint.toml"), "").unwrap();

        let result = resolve_with(tmp.path(), Some(Path::new("/nonexistent.toml")), None);
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.toml"))
        );
    }

    #[test]
    fn plain_name_preferred_over_dot_name() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".doc-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_with(tmp.path(), None, None),
            ConfigSource::Project(canonical(&tmp, ".doc-lint.toml"))
        );

        fs::write(tmp.path().join("doc-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_with(tmp.path(), None, None),
            ConfigSource::Project(canonical(&tmp, "doc-lint.toml"))
        );
    }

    #[test]
    fn found_in_ancestor_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("doc-lint.toml"), "").unwrap();
        let nested = tmp.path().join("lib/widgets");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            resolve_with(&nested, None, None),
            ConfigSource::Project(canonical(&tmp, "doc-lint.toml"))
        );
    }

    #[test]
    fn global_used_only_without_project_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_with(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(
            result,
            ConfigSource::Global(global.path().join("config.toml"))
        );

        fs::write(project.path().join("doc-lint.toml"), "").unwrap();
        let result = resolve_with(project.path(), None, Some(global.path().to_path_buf()));
        assert!(matches!(result, ConfigSource::Project(_)));
    }

    #[test]
    fn empty_global_dir_means_defaults() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let result = resolve_with(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Default);
        assert_eq!(resolve_with(project.path(), None, None), ConfigSource::Default);
    }

    #[test]
    fn source_accessors() {
        let p = PathBuf::from("/tmp/doc-lint.toml");
        assert!(ConfigSource::Default.path().is_none());
        assert_eq!(ConfigSource::Project(p.clone()).path(), Some(p.as_path()));
        assert!(ConfigSource::Global(p.clone()).is_global());
        assert!(!ConfigSource::Explicit(p).is_global());
    }
}
