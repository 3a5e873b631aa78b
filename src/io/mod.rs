//! File-system edge: source discovery and fixture directories.
//!
//! Everything past this module works on text already in memory.

pub mod discovery;
pub mod fixtures;

pub use discovery::{discover_sources, load_sources};
pub use fixtures::{
    bless_fixture_dir, load_fixture_dir, scan_fixture_dir, FixtureFile, LoadedFixtures,
    GOLDEN_SUFFIX,
};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
