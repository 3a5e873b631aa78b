use super::comparator::{ComparisonOutcome, FieldMismatch, GoldenComparator};
use super::fixture::FixtureSource;
use crate::errors::GoldenError;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Aggregate of a suite run, keyed by fixture id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SuiteResult {
    pub passed: BTreeSet<String>,
    pub failed: BTreeMap<String, Vec<FieldMismatch>>,
    /// Fixtures that could not be compared at all.
    pub errors: BTreeMap<String, GoldenError>,
}

impl SuiteResult {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.errors.is_empty()
    }

    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len() + self.errors.len()
    }

    fn record(&mut self, id: String, outcome: Result<ComparisonOutcome, GoldenError>) {
        match outcome {
            Ok(ComparisonOutcome::Match) => {
                self.passed.insert(id);
            }
            Ok(ComparisonOutcome::Mismatch(mismatch)) => {
                self.failed.insert(id, mismatch.mismatches);
            }
            Err(error) => {
                self.errors.insert(id, error);
            }
        }
    }
}

/// Compare every fixture in `ids` in parallel. One fixture's failure never
/// affects another; the merge is keyed, so completion order is irrelevant.
pub fn run_suite(
    source: &dyn FixtureSource,
    ids: &[String],
    comparator: &GoldenComparator,
) -> SuiteResult {
    let _span = tracing::debug_span!("golden_suite", fixtures = ids.len()).entered();

    let outcomes: Vec<_> = ids
        .par_iter()
        .map(|id| (id.clone(), comparator.compare_id(source, id)))
        .collect();

    let mut result = SuiteResult::default();
    for (id, outcome) in outcomes {
        result.record(id, outcome);
    }

    tracing::info!(
        passed = result.passed.len(),
        failed = result.failed.len(),
        errors = result.errors.len(),
        "golden suite finished"
    );
    result
}

/// Run every fixture `source` knows about.
pub fn run_all(source: &dyn FixtureSource, comparator: &GoldenComparator) -> SuiteResult {
    run_suite(source, &source.ids(), comparator)
}
