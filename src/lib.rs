// Export modules for library usage
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod frontend;
pub mod golden;
pub mod io;
pub mod metrics;
pub mod normalize;
pub mod pipeline;

// Re-export commonly used types
pub use crate::config::{AnalysisConfig, LongMethodMeasure};
pub use crate::core::{Language, SourceUnit, Span};
pub use crate::errors::{AnalysisError, ConfigError, GoldenError, NormalizationError, ParseError};

pub use crate::golden::{
    render_golden, run_suite, ComparisonOutcome, FieldMismatch, FixtureSource, GoldenComparator,
    GoldenFixture, GoldenMismatch, InMemoryFixtures, SuiteResult,
};

pub use crate::metrics::{Distribution, FileSummary, Hundredths, MetricReport, UnitMetrics};

pub use crate::pipeline::{analyze, analyze_batch, analyze_unit, BatchOutcome};
