//! Single structural walk per unit.
//!
//! Every `StatementKind` has a defined contribution, so nothing here fails.

use super::report::UnitMetrics;
use crate::config::{AnalysisConfig, LongMethodMeasure};
use crate::normalize::{NormalizedStatement, StatementKind, StructuralUnit};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Tally {
    decision_points: u32,
    max_nesting: u32,
    statements: usize,
    branches: u32,
    loops: u32,
}

struct Walker<'a> {
    config: &'a AnalysisConfig,
    tally: Tally,
}

impl Walker<'_> {
    fn walk(&mut self, statements: &[NormalizedStatement], depth: u32) {
        for statement in statements {
            debug_assert_eq!(statement.depth, depth, "stored depth disagrees with walk");
            self.visit(statement, depth);
        }
    }

    fn visit(&mut self, statement: &NormalizedStatement, depth: u32) {
        if self.config.count_conditional_expressions {
            self.tally.decision_points += statement.conditional_expressions;
        }

        match &statement.kind {
            StatementKind::Sequential => self.tally.statements += 1,
            StatementKind::Block(children) => self.walk(children, depth),
            StatementKind::If { arms, otherwise } => {
                self.enter_control(depth);
                let arm_count = arms.len() as u32;
                self.tally.decision_points += arm_count;
                self.tally.branches += arm_count;
                if self.config.count_logical_operators {
                    self.tally.decision_points +=
                        arms.iter().map(|arm| arm.logical_operators).sum::<u32>();
                }
                if self.config.count_else_branch && otherwise.is_some() {
                    self.tally.decision_points += 1;
                }
                for arm in arms {
                    self.walk(&arm.body, depth + 1);
                }
                if let Some(otherwise) = otherwise {
                    self.walk(otherwise, depth + 1);
                }
            }
            StatementKind::Loop {
                logical_operators,
                body,
                ..
            } => {
                self.enter_control(depth);
                self.tally.decision_points += 1;
                self.tally.loops += 1;
                self.logical(*logical_operators);
                self.walk(body, depth + 1);
            }
            StatementKind::Switch {
                case_count,
                has_default,
                logical_operators,
                body,
            } => {
                self.enter_control(depth);
                self.tally.decision_points += case_count;
                self.tally.branches += case_count;
                if self.config.count_default_label && *has_default {
                    self.tally.decision_points += 1;
                }
                self.logical(*logical_operators);
                self.walk(body, depth + 1);
            }
            StatementKind::TryCatch {
                catch_count,
                body,
                handlers,
            } => {
                self.enter_control(depth);
                self.tally.decision_points += catch_count;
                self.tally.branches += catch_count;
                self.walk(body, depth + 1);
                for handler in handlers {
                    self.walk(handler, depth + 1);
                }
            }
        }
    }

    /// A control construct at `depth` opens nesting level `depth + 1`.
    fn enter_control(&mut self, depth: u32) {
        self.tally.statements += 1;
        self.tally.max_nesting = self.tally.max_nesting.max(depth + 1);
    }

    fn logical(&mut self, operators: u32) {
        if self.config.count_logical_operators {
            self.tally.decision_points += operators;
        }
    }
}

/// Metrics for one unit under `config`.
pub fn unit_metrics(unit: &StructuralUnit, config: &AnalysisConfig) -> UnitMetrics {
    let mut walker = Walker {
        config,
        tally: Tally::default(),
    };
    walker.walk(&unit.body, 0);
    let tally = walker.tally;

    let lines = unit.span.line_count();
    let measured = match config.long_method_measure {
        LongMethodMeasure::Statements => tally.statements,
        LongMethodMeasure::Lines => lines,
    };

    UnitMetrics {
        name: unit.name.clone(),
        kind: unit.kind,
        start_line: unit.span.start_line,
        end_line: unit.span.end_line,
        parameters: unit.parameter_count,
        cyclomatic: 1 + tally.decision_points,
        max_nesting: tally.max_nesting,
        statements: tally.statements,
        lines,
        real_lines: unit.real_lines,
        long_method: measured > config.long_method_threshold,
        branches: tally.branches,
        loops: tally.loops,
        lambdas: unit.lambda_count,
    }
}
