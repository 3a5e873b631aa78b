//! Metric report types and their canonical field order.

use crate::core::Language;
use crate::normalize::UnitKind;
use serde::{Deserialize, Serialize};

/// Metrics for one structural unit. Field order is the serialization order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitMetrics {
    pub name: String,
    pub kind: UnitKind,
    pub start_line: usize,
    pub end_line: usize,
    pub parameters: usize,
    pub cyclomatic: u32,
    pub max_nesting: u32,
    pub statements: usize,
    pub lines: usize,
    pub real_lines: usize,
    pub long_method: bool,
    pub branches: u32,
    pub loops: u32,
    pub lambdas: u32,
}

impl UnitMetrics {
    /// `(field, rendered value)` pairs in declaration order, for diffing.
    pub fn field_values(&self) -> Vec<(&'static str, String)> {
        let kind = match self.kind {
            UnitKind::Function => "function",
            UnitKind::Method => "method",
            UnitKind::Lambda => "lambda",
        };
        vec![
            ("name", self.name.clone()),
            ("kind", kind.to_string()),
            ("start_line", self.start_line.to_string()),
            ("end_line", self.end_line.to_string()),
            ("parameters", self.parameters.to_string()),
            ("cyclomatic", self.cyclomatic.to_string()),
            ("max_nesting", self.max_nesting.to_string()),
            ("statements", self.statements.to_string()),
            ("lines", self.lines.to_string()),
            ("real_lines", self.real_lines.to_string()),
            ("long_method", self.long_method.to_string()),
            ("branches", self.branches.to_string()),
            ("loops", self.loops.to_string()),
            ("lambdas", self.lambdas.to_string()),
        ]
    }
}

/// A two-decimal quantity stored as an exact integer count of hundredths,
/// so serialized reports never carry floating point. `125` means `1.25`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hundredths(pub u64);

impl Hundredths {
    pub fn whole(value: u64) -> Self {
        Self(value * 100)
    }

    /// `numerator / denominator` rounded to two decimals, ties to even.
    /// A zero denominator yields zero.
    pub fn ratio(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            return Self(0);
        }
        let scaled = numerator * 100;
        let quotient = scaled / denominator;
        let twice_remainder = (scaled % denominator) * 2;
        let round_up = twice_remainder > denominator
            || (twice_remainder == denominator && quotient % 2 == 1);
        Self(quotient + u64::from(round_up))
    }
}

impl std::fmt::Display for Hundredths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// min/max/mean/median of one per-unit measure across a file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub min: u64,
    pub max: u64,
    pub mean: Hundredths,
    pub median: Hundredths,
}

impl Distribution {
    /// All zero for an empty input.
    pub fn of(values: impl IntoIterator<Item = u64>) -> Self {
        let mut values: Vec<u64> = values.into_iter().collect();
        values.sort_unstable();
        let (Some(&min), Some(&max)) = (values.first(), values.last()) else {
            return Self::default();
        };

        let count = values.len();
        let middle = count / 2;
        let median = if count % 2 == 1 {
            Hundredths::whole(values[middle])
        } else {
            Hundredths((values[middle - 1] + values[middle]) * 50)
        };

        Self {
            min,
            max,
            mean: Hundredths::ratio(values.iter().sum(), count as u64),
            median,
        }
    }

    fn field_values(&self, names: [&'static str; 4]) -> [(&'static str, String); 4] {
        let [min, max, mean, median] = names;
        [
            (min, self.min.to_string()),
            (max, self.max.to_string()),
            (mean, self.mean.to_string()),
            (median, self.median.to_string()),
        ]
    }
}

/// File-level aggregate over all units plus line statistics and the
/// file-level smells.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub units: usize,
    pub total_lines: usize,
    pub real_lines: usize,
    pub comment_lines: usize,
    pub total_cyclomatic: u32,
    pub max_nesting: u32,
    pub long_methods: usize,
    /// Units whose parameter count exceeds the configured limit.
    pub long_parameter_lists: usize,
    /// Receiver chains with at least the configured number of calls.
    pub message_chains: usize,
    pub excessive_comments: bool,
    /// Comment lines per real line of code.
    pub comment_ratio: Hundredths,
    pub parameters: Distribution,
    pub cyclomatic: Distribution,
    pub unit_real_lines: Distribution,
}

impl FileSummary {
    pub fn field_values(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("units", self.units.to_string()),
            ("total_lines", self.total_lines.to_string()),
            ("real_lines", self.real_lines.to_string()),
            ("comment_lines", self.comment_lines.to_string()),
            ("total_cyclomatic", self.total_cyclomatic.to_string()),
            ("max_nesting", self.max_nesting.to_string()),
            ("long_methods", self.long_methods.to_string()),
            ("long_parameter_lists", self.long_parameter_lists.to_string()),
            ("message_chains", self.message_chains.to_string()),
            ("excessive_comments", self.excessive_comments.to_string()),
            ("comment_ratio", self.comment_ratio.to_string()),
        ];
        fields.extend(self.parameters.field_values([
            "parameters.min",
            "parameters.max",
            "parameters.mean",
            "parameters.median",
        ]));
        fields.extend(self.cyclomatic.field_values([
            "cyclomatic.min",
            "cyclomatic.max",
            "cyclomatic.mean",
            "cyclomatic.median",
        ]));
        fields.extend(self.unit_real_lines.field_values([
            "unit_real_lines.min",
            "unit_real_lines.max",
            "unit_real_lines.mean",
            "unit_real_lines.median",
        ]));
        fields
    }
}

/// Per-source-unit report; `units` ordered by source position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricReport {
    pub language: Language,
    pub summary: FileSummary,
    pub units: Vec<UnitMetrics>,
}

impl MetricReport {
    pub fn unit(&self, name: &str) -> Option<&UnitMetrics> {
        self.units.iter().find(|u| u.name == name)
    }

    pub fn long_methods(&self) -> impl Iterator<Item = &UnitMetrics> {
        self.units.iter().filter(|u| u.long_method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> UnitMetrics {
        UnitMetrics {
            name: "f".into(),
            kind: UnitKind::Function,
            start_line: 1,
            end_line: 3,
            parameters: 0,
            cyclomatic: 1,
            max_nesting: 0,
            statements: 1,
            lines: 3,
            real_lines: 3,
            long_method: false,
            branches: 0,
            loops: 0,
            lambdas: 0,
        }
    }

    #[test]
    fn test_field_values_follow_serialization_order() {
        let unit = unit();
        let json = serde_json::to_string(&unit).unwrap();
        let mut last = 0;
        for (field, _) in unit.field_values() {
            let at = json.find(&format!("\"{field}\"")).unwrap();
            assert!(at >= last, "{field} out of order");
            last = at;
        }
    }

    #[test]
    fn test_summary_field_values_follow_serialization_order() {
        let summary = FileSummary::default();
        let json = serde_json::to_string(&summary).unwrap();
        let mut last = 0;
        for (field, _) in summary.field_values() {
            let key = field.rsplit('.').next().unwrap();
            let at = json[last..].find(&format!("\"{key}\"")).unwrap() + last;
            last = at;
        }
        assert_eq!(summary.field_values().len(), 11 + 3 * 4);
    }

    #[test]
    fn test_hundredths_round_half_to_even() {
        assert_eq!(Hundredths::ratio(17, 92), Hundredths(18));
        assert_eq!(Hundredths::ratio(20, 7), Hundredths(286));
        assert_eq!(Hundredths::ratio(1, 200), Hundredths(0));
        assert_eq!(Hundredths::ratio(3, 200), Hundredths(2));
        assert_eq!(Hundredths::ratio(5, 0), Hundredths(0));
        assert_eq!(Hundredths(125).to_string(), "1.25");
        assert_eq!(Hundredths(7).to_string(), "0.07");
    }

    #[test]
    fn test_distribution_mean_and_median() {
        let even = Distribution::of([2, 0, 1, 2]);
        assert_eq!(even.min, 0);
        assert_eq!(even.max, 2);
        assert_eq!(even.mean, Hundredths(125));
        assert_eq!(even.median, Hundredths(150));

        let odd = Distribution::of([1, 4, 6, 4, 1, 3, 1]);
        assert_eq!(odd.median, Hundredths::whole(3));
        assert_eq!(odd.mean, Hundredths(286));

        assert_eq!(Distribution::of(Vec::new()), Distribution::default());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_value(unit()).unwrap();
        assert_eq!(json["kind"], "function");
        assert_eq!(unit().field_values()[1].1, "function");
    }
}
