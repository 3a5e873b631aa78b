//! Language-agnostic structural model consumed by the metrics engine.

use crate::core::{Language, Span};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Function,
    Method,
    /// Lambda bound outside any callable.
    Lambda,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopKind {
    For,
    While,
    Do,
}

/// One arm of an `if`/`else if` chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionalArm {
    pub logical_operators: u32,
    pub body: Vec<NormalizedStatement>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatementKind {
    Sequential,
    If {
        arms: Vec<ConditionalArm>,
        otherwise: Option<Vec<NormalizedStatement>>,
    },
    Loop {
        kind: LoopKind,
        logical_operators: u32,
        body: Vec<NormalizedStatement>,
    },
    Switch {
        case_count: u32,
        has_default: bool,
        logical_operators: u32,
        body: Vec<NormalizedStatement>,
    },
    TryCatch {
        catch_count: u32,
        body: Vec<NormalizedStatement>,
        handlers: Vec<Vec<NormalizedStatement>>,
    },
    Block(Vec<NormalizedStatement>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedStatement {
    pub kind: StatementKind,
    pub span: Span,
    /// Control constructs enclosing this statement within its unit.
    pub depth: u32,
    /// `?:` expressions in this statement's own expressions.
    pub conditional_expressions: u32,
}

impl NormalizedStatement {
    pub fn is_control(&self) -> bool {
        !matches!(
            self.kind,
            StatementKind::Sequential | StatementKind::Block(_)
        )
    }

    /// Statements nested directly inside this one, in source order.
    pub fn nested(&self) -> Box<dyn Iterator<Item = &NormalizedStatement> + '_> {
        match &self.kind {
            StatementKind::Sequential => Box::new(std::iter::empty()),
            StatementKind::If { arms, otherwise } => Box::new(
                arms.iter()
                    .flat_map(|arm| arm.body.iter())
                    .chain(otherwise.iter().flatten()),
            ),
            StatementKind::Loop { body, .. }
            | StatementKind::Switch { body, .. }
            | StatementKind::Block(body) => Box::new(body.iter()),
            StatementKind::TryCatch { body, handlers, .. } => {
                Box::new(body.iter().chain(handlers.iter().flatten()))
            }
        }
    }
}

/// One analyzable callable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuralUnit {
    pub name: String,
    pub kind: UnitKind,
    pub parameter_count: usize,
    pub body: Vec<NormalizedStatement>,
    pub span: Span,
    /// Name of the enclosing class, if any. Not an ownership link.
    pub enclosing_type: Option<String>,
    pub lambda_count: u32,
    pub real_lines: usize,
}

/// File-level line statistics carried past CST disposal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineStats {
    pub total_lines: usize,
    pub real_lines: usize,
    pub comment_lines: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuralModel {
    pub language: Language,
    /// Sorted by span start.
    pub units: Vec<StructuralUnit>,
    pub lines: LineStats,
    /// Calls per receiver chain anywhere in the file, in source order.
    pub call_chains: Vec<u32>,
}
