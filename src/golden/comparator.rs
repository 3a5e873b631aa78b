use super::fixture::{FixtureSource, GoldenFixture};
use crate::config::AnalysisConfig;
use crate::core::Language;
use crate::errors::GoldenError;
use crate::metrics::MetricReport;
use crate::pipeline::analyze;
use serde::Serialize;

/// Unit label used for file-level fields.
pub const FILE_UNIT: &str = "<file>";

/// One differing field between the stored and the freshly computed report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldMismatch {
    pub unit: String,
    pub field: String,
    pub expected: String,
    pub actual: String,
}

impl FieldMismatch {
    fn new(
        unit: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            unit: unit.into(),
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl std::fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}: expected {}, got {}",
            self.unit, self.field, self.expected, self.actual
        )
    }
}

/// Every difference found for one fixture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GoldenMismatch {
    pub fixture: String,
    pub mismatches: Vec<FieldMismatch>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComparisonOutcome {
    Match,
    Mismatch(GoldenMismatch),
}

impl ComparisonOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, ComparisonOutcome::Match)
    }
}

/// Canonical text of a report: pretty JSON in declaration order, one
/// trailing newline.
pub fn to_canonical_json(report: &MetricReport) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(report)?;
    text.push('\n');
    Ok(text)
}

/// Produce the golden artifact for a new or updated fixture.
pub fn render_golden(
    id: &str,
    source: &str,
    language: Language,
    config: &AnalysisConfig,
) -> Result<String, GoldenError> {
    let report = analyze(source, language, config).map_err(|source| GoldenError::Analysis {
        id: id.to_string(),
        source,
    })?;
    to_canonical_json(&report).map_err(|e| GoldenError::MalformedGolden {
        id: id.to_string(),
        message: e.to_string(),
    })
}

/// Field-by-field diff. Never stops at the first difference.
pub fn diff_reports(expected: &MetricReport, actual: &MetricReport) -> Vec<FieldMismatch> {
    let mut mismatches = Vec::new();

    if expected.language != actual.language {
        mismatches.push(FieldMismatch::new(
            FILE_UNIT,
            "language",
            expected.language.to_string(),
            actual.language.to_string(),
        ));
    }
    diff_fields(
        FILE_UNIT,
        expected.summary.field_values(),
        actual.summary.field_values(),
        &mut mismatches,
    );

    let paired = expected.units.len().max(actual.units.len());
    for index in 0..paired {
        match (expected.units.get(index), actual.units.get(index)) {
            (Some(want), Some(got)) => {
                diff_fields(&want.name, want.field_values(), got.field_values(), &mut mismatches)
            }
            (Some(want), None) => {
                mismatches.push(FieldMismatch::new(&want.name, "unit", "present", "missing"))
            }
            (None, Some(got)) => {
                mismatches.push(FieldMismatch::new(&got.name, "unit", "missing", "present"))
            }
            (None, None) => {}
        }
    }

    mismatches
}

fn diff_fields(
    unit: &str,
    expected: Vec<(&'static str, String)>,
    actual: Vec<(&'static str, String)>,
    out: &mut Vec<FieldMismatch>,
) {
    for ((field, want), (_, got)) in expected.into_iter().zip(actual) {
        if want != got {
            out.push(FieldMismatch::new(unit, field, want, got));
        }
    }
}

/// Runs the pipeline on a fixture and diffs against its stored artifact.
#[derive(Clone, Debug, Default)]
pub struct GoldenComparator {
    config: AnalysisConfig,
}

impl GoldenComparator {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn compare(&self, fixture: &GoldenFixture) -> Result<ComparisonOutcome, GoldenError> {
        let actual = analyze(&fixture.source, fixture.language, &self.config).map_err(|source| {
            GoldenError::Analysis {
                id: fixture.id.clone(),
                source,
            }
        })?;

        let expected: MetricReport =
            serde_json::from_str(&fixture.expected).map_err(|e| GoldenError::MalformedGolden {
                id: fixture.id.clone(),
                message: e.to_string(),
            })?;

        let mismatches = diff_reports(&expected, &actual);
        if mismatches.is_empty() {
            return Ok(ComparisonOutcome::Match);
        }

        tracing::debug!(
            fixture = %fixture.id,
            mismatches = mismatches.len(),
            "golden mismatch"
        );
        Ok(ComparisonOutcome::Mismatch(GoldenMismatch {
            fixture: fixture.id.clone(),
            mismatches,
        }))
    }

    /// Look up `id` in `source` and compare it.
    pub fn compare_id(
        &self,
        source: &dyn FixtureSource,
        id: &str,
    ) -> Result<ComparisonOutcome, GoldenError> {
        let fixture = source.fixture(id)?;
        self.compare(&fixture)
    }
}
