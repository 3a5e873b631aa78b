// Test utility module for cxmetrics integration tests
#![allow(dead_code)]

use cxmetrics::config::AnalysisConfig;
use cxmetrics::core::Language;
use cxmetrics::metrics::{MetricReport, UnitMetrics};
use cxmetrics::pipeline::analyze;
use std::path::PathBuf;

pub fn golden_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/golden")
}

pub fn analyze_c(source: &str) -> MetricReport {
    analyze_with(source, Language::C, &AnalysisConfig::default())
}

pub fn analyze_cpp(source: &str) -> MetricReport {
    analyze_with(source, Language::Cpp, &AnalysisConfig::default())
}

pub fn analyze_with(source: &str, language: Language, config: &AnalysisConfig) -> MetricReport {
    analyze(source, language, config)
        .unwrap_or_else(|e| panic!("analysis failed: {e}\n--- source ---\n{source}"))
}

/// The single unit of a one-function snippet.
pub fn only_unit(report: &MetricReport) -> &UnitMetrics {
    assert_eq!(report.units.len(), 1, "expected one unit, got {:?}", report.units);
    &report.units[0]
}

/// Copy the golden fixture directory into a scratch dir.
pub fn copy_golden_dir() -> tempfile::TempDir {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    for entry in std::fs::read_dir(golden_dir()).expect("Failed to list golden dir") {
        let entry = entry.expect("Failed to read dir entry");
        std::fs::copy(entry.path(), temp_dir.path().join(entry.file_name()))
            .expect("Failed to copy fixture");
    }
    temp_dir
}

/// A C function whose body is `statements` plain statements.
pub fn c_function_with_statements(statements: usize) -> String {
    let mut source = String::from("int f(int x) {\n");
    for _ in 0..statements {
        source.push_str("    x++;\n");
    }
    source.push_str("}\n");
    source
}
