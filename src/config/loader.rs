use std::fs;
use std::path::{Path, PathBuf};

use super::AnalysisConfig;
use crate::errors::ConfigError;

pub const CONFIG_FILE_NAME: &str = ".cxmetrics.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse and validate config from TOML text. `path` is only used in errors.
pub fn parse_config(contents: &str, path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let config = toml::from_str::<AnalysisConfig>(contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit file.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&contents, path)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Search `start` and its ancestors for a config file.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Resolve the effective config: explicit file, else discovered file, else defaults.
pub fn resolve_config(
    explicit: Option<&Path>,
    search_from: &Path,
) -> Result<AnalysisConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match find_config_file(search_from) {
        Some(path) => load_config(&path),
        None => {
            tracing::debug!(
                "No {} found within {} directories of {}. Using defaults.",
                CONFIG_FILE_NAME,
                MAX_TRAVERSAL_DEPTH,
                search_from.display()
            );
            Ok(AnalysisConfig::default())
        }
    }
}
