//! Locates the `star-lint` configuration for a checked path.
//!
//! Lookup order:
//!
//! 1. `--config` flag, used as given
//! 2. `star-lint.toml` or `.star-lint.toml` in the checked directory or any
//!    ancestor, stopping at the dbt project root (the directory holding
//!    `dbt_project.yml`)
//! 3. `config.toml` in the global directory (`$STAR_LINT_CONFIG_DIR`, else
//!    `~/.star-lint/`)
//! 4. built-in defaults
//!
//! Running `star-lint check models/staging` from inside a dbt project
//! therefore picks up the `star-lint.toml` next to `dbt_project.yml`.

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the checked directory or one of its ancestors.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found; built-in defaults apply.
    Default,
}

impl ConfigSource {
    /// Returns the config file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` if the config came from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

/// File names recognised as project config, in order of preference.
const PROJECT_CONFIG_NAMES: &[&str] = &["star-lint.toml", ".star-lint.toml"];

/// Marker file of a dbt project root.
const DBT_PROJECT_FILE: &str = "dbt_project.yml";

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration for `target`, a model file or directory.
#[must_use]
pub fn resolve(target: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with_global(target, explicit, global_config_dir())
}

fn resolve_with_global(
    target: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_project_config(&search_start(target)) {
        tracing::debug!("Using project config {}", found.display());
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, |found| {
            tracing::debug!("Using global config {}", found.display());
            ConfigSource::Global(found)
        })
}

/// Absolute directory the upward search starts from.
fn search_start(target: &Path) -> PathBuf {
    let absolute = if target.is_absolute() {
        target.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| target.to_path_buf(), |cwd| cwd.join(target))
    };

    if absolute.is_file() {
        absolute
            .parent()
            .map_or_else(|| absolute.clone(), Path::to_path_buf)
    } else {
        absolute
    }
}

/// Walks from `start` up through its ancestors looking for a project config.
///
/// The dbt project root is the last directory searched.
fn find_project_config(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let found = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file());
        if found.is_some() {
            return found;
        }

        if dir.join(DBT_PROJECT_FILE).is_file() {
            tracing::debug!("Reached dbt project root {}", dir.display());
            return None;
        }
    }
    None
}

/// Returns the global config directory: `$STAR_LINT_CONFIG_DIR`, else
/// `~/.star-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var_os("STAR_LINT_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".star-lint")))
}
