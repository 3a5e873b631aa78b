//! Golden comparator: regression checks against stored canonical reports.
//!
//! A mismatch is a result, not an error. `GoldenError` is reserved for
//! fixtures that cannot be compared (absent, unparsable source, malformed
//! artifact).

pub mod comparator;
pub mod fixture;
pub mod suite;

pub use comparator::{
    diff_reports, render_golden, to_canonical_json, ComparisonOutcome, FieldMismatch,
    GoldenComparator, GoldenMismatch, FILE_UNIT,
};
pub use fixture::{FixtureSource, GoldenFixture, InMemoryFixtures};
pub use suite::{run_all, run_suite, SuiteResult};
