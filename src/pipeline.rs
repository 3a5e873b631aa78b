//! End-to-end analysis: text → CST → Structural Model → `MetricReport`.
//!
//! Each call is a pure function of (text, language, config). Batches run on
//! the rayon pool with no shared mutable state; a failing source only fails
//! its own entry.

use crate::config::AnalysisConfig;
use crate::core::{Language, SourceUnit};
use crate::errors::AnalysisError;
use crate::frontend::parse_source;
use crate::metrics::{compute, MetricReport};
use crate::normalize::normalize;
use rayon::prelude::*;
use std::path::PathBuf;

pub fn analyze(
    text: &str,
    language: Language,
    config: &AnalysisConfig,
) -> Result<MetricReport, AnalysisError> {
    let cst = parse_source(text, language)?;
    let model = normalize(&cst)?;
    drop(cst);
    Ok(compute(&model, config))
}

pub fn analyze_unit(
    unit: &SourceUnit,
    config: &AnalysisConfig,
) -> Result<MetricReport, AnalysisError> {
    let _span = tracing::debug_span!("analyze", source = %unit.label()).entered();
    let result = analyze(unit.text(), unit.language(), config);
    if let Err(e) = &result {
        tracing::warn!("Skipping {}: {}", unit.label(), e);
    }
    result
}

/// Outcome for one source of a batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub origin: Option<PathBuf>,
    pub label: String,
    pub result: Result<MetricReport, AnalysisError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Analyze independent sources in parallel. Output order matches input order.
pub fn analyze_batch(units: &[SourceUnit], config: &AnalysisConfig) -> Vec<BatchOutcome> {
    let outcomes: Vec<BatchOutcome> = units
        .par_iter()
        .map(|unit| BatchOutcome {
            origin: unit.origin().map(|p| p.to_path_buf()),
            label: unit.label(),
            result: analyze_unit(unit, config),
        })
        .collect();

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    tracing::info!(
        sources = outcomes.len(),
        failed,
        "batch analysis finished"
    );
    outcomes
}
