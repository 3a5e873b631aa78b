//! Metrics calculation module
//!
//! Pure function from a `StructuralModel` to a `MetricReport`. The engine
//! is language-ignorant: it only sees normalized statements.
//!
//! - **Cyclomatic complexity**: 1 + if/else-if arms + loops + non-default
//!   `case` labels + `catch` clauses, plus the configurable extras
//! - **Max nesting**: deepest chain of nested control constructs
//! - **Statements**: every normalized statement except `Block` wrappers
//! - **Long method**: statements (or lines) strictly above the threshold
//! - **File smells**: long parameter lists, message chains and excessive
//!   comments, each against its configured threshold

pub mod engine;
pub mod report;

pub use engine::unit_metrics;
pub use report::{Distribution, FileSummary, Hundredths, MetricReport, UnitMetrics};

use crate::config::AnalysisConfig;
use crate::normalize::StructuralModel;

pub fn compute(model: &StructuralModel, config: &AnalysisConfig) -> MetricReport {
    let units: Vec<UnitMetrics> = model
        .units
        .iter()
        .map(|unit| unit_metrics(unit, config))
        .collect();

    let lines = &model.lines;
    let summary = FileSummary {
        units: units.len(),
        total_lines: lines.total_lines,
        real_lines: lines.real_lines,
        comment_lines: lines.comment_lines,
        total_cyclomatic: units.iter().map(|u| u.cyclomatic).sum(),
        max_nesting: units.iter().map(|u| u.max_nesting).max().unwrap_or(0),
        long_methods: units.iter().filter(|u| u.long_method).count(),
        long_parameter_lists: units
            .iter()
            .filter(|u| u.parameters > config.long_parameter_list_threshold)
            .count(),
        message_chains: model
            .call_chains
            .iter()
            .filter(|&&calls| calls >= config.message_chain_threshold)
            .count(),
        excessive_comments: lines.comment_lines > config.excessive_comments_threshold,
        comment_ratio: Hundredths::ratio(lines.comment_lines as u64, lines.real_lines as u64),
        parameters: Distribution::of(units.iter().map(|u| u.parameters as u64)),
        cyclomatic: Distribution::of(units.iter().map(|u| u64::from(u.cyclomatic))),
        unit_real_lines: Distribution::of(units.iter().map(|u| u.real_lines as u64)),
    };

    MetricReport {
        language: model.language,
        summary,
        units,
    }
}
