use crate::core::{Language, SourceUnit};
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MAX_REPORTED_SKIPS: usize = 10;

/// Expand files and directories into C/C++ sources, sorted by path.
///
/// Explicit files must have a recognized extension; directory entries
/// without one are ignored.
pub fn discover_sources(paths: &[PathBuf]) -> Result<Vec<(PathBuf, Language)>> {
    let mut found = Vec::new();

    for path in paths {
        if path.is_file() {
            match Language::from_path(path) {
                Some(language) => found.push((path.clone(), language)),
                None => bail!("{} is not a C or C++ source file", path.display()),
            }
        } else if path.is_dir() {
            found.extend(walk_directory(path));
        } else {
            bail!("{} does not exist", path.display());
        }
    }

    found.sort();
    found.dedup();
    Ok(found)
}

fn walk_directory(root: &Path) -> Vec<(PathBuf, Language)> {
    let mut skipped = 0usize;
    let entries: Vec<(PathBuf, Language)> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                if skipped < MAX_REPORTED_SKIPS {
                    tracing::warn!("Skipping directory entry: {}", err);
                }
                skipped += 1;
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let language = Language::from_path(entry.path())?;
            Some((entry.into_path(), language))
        })
        .collect();

    if skipped > MAX_REPORTED_SKIPS {
        tracing::warn!(
            "Skipped {} additional directory entries",
            skipped - MAX_REPORTED_SKIPS
        );
    }
    entries
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

/// Read discovered sources. Unreadable files are logged and skipped.
pub fn load_sources(found: &[(PathBuf, Language)]) -> Vec<SourceUnit> {
    found
        .iter()
        .filter_map(|(path, language)| match super::read_file(path) {
            Ok(text) => Some(SourceUnit::new(*language, text).with_origin(path)),
            Err(err) => {
                tracing::warn!("{:#}", err);
                None
            }
        })
        .collect()
}
