//! Directory-backed golden fixtures: `<id>.c` or `<id>.cpp` next to
//! `<id>.golden.json`.

use crate::config::AnalysisConfig;
use crate::core::Language;
use crate::golden::{render_golden, GoldenFixture, InMemoryFixtures};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const GOLDEN_SUFFIX: &str = ".golden.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureFile {
    pub id: String,
    pub language: Language,
    pub source_path: PathBuf,
    pub golden_path: PathBuf,
}

impl FixtureFile {
    pub fn has_golden(&self) -> bool {
        self.golden_path.is_file()
    }
}

/// Fixture sources found in a directory. Sources without a readable golden
/// artifact are listed in `files` but absent from `fixtures`, so comparing
/// them yields `FixtureNotFound`.
#[derive(Debug, Clone, Default)]
pub struct LoadedFixtures {
    pub files: Vec<FixtureFile>,
    pub fixtures: InMemoryFixtures,
}

impl LoadedFixtures {
    pub fn ids(&self) -> Vec<String> {
        self.files.iter().map(|f| f.id.clone()).collect()
    }
}

/// List fixture sources directly inside `dir`, sorted by id.
pub fn scan_fixture_dir(dir: &Path) -> Result<Vec<FixtureFile>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry =
            entry.with_context(|| format!("Failed to list fixtures in {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let (Some(language), Some(id)) = (
            Language::from_path(path),
            path.file_stem().and_then(|s| s.to_str()),
        ) else {
            continue;
        };
        files.push(FixtureFile {
            id: id.to_string(),
            language,
            source_path: path.to_path_buf(),
            golden_path: dir.join(format!("{id}{GOLDEN_SUFFIX}")),
        });
    }
    files.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(files)
}

pub fn load_fixture_dir(dir: &Path) -> Result<LoadedFixtures> {
    let files = scan_fixture_dir(dir)?;
    let mut fixtures = InMemoryFixtures::new();

    for file in &files {
        if !file.has_golden() {
            tracing::warn!("Fixture {} has no golden artifact", file.id);
            continue;
        }
        let (source, expected) = match read_pair(file) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!("Skipping fixture {}: {:#}", file.id, e);
                continue;
            }
        };
        fixtures.insert(GoldenFixture::new(
            file.id.clone(),
            file.language,
            source,
            expected,
        ));
    }

    tracing::debug!(
        "Loaded {} fixtures from {}",
        fixtures.len(),
        dir.display()
    );
    Ok(LoadedFixtures { files, fixtures })
}

fn read_pair(file: &FixtureFile) -> Result<(String, String)> {
    Ok((
        super::read_file(&file.source_path)?,
        super::read_file(&file.golden_path)?,
    ))
}

/// Regenerate every golden artifact in `dir`. Returns the paths written.
pub fn bless_fixture_dir(dir: &Path, config: &AnalysisConfig) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for file in scan_fixture_dir(dir)? {
        let source = super::read_file(&file.source_path)?;
        let golden = render_golden(&file.id, &source, file.language, config)
            .with_context(|| format!("Cannot bless {}", file.source_path.display()))?;
        super::write_file(&file.golden_path, &golden)?;
        tracing::info!("Blessed {}", file.golden_path.display());
        written.push(file.golden_path);
    }
    Ok(written)
}
