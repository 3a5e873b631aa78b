//! Flattening of CST statements into `NormalizedStatement`s.

use super::model::{ConditionalArm, LoopKind, NormalizedStatement, StatementKind};
use crate::errors::NormalizationError;
use crate::frontend::{CstKind, CstNode, Role};

type Result<T> = std::result::Result<T, NormalizationError>;

/// Statements, blocks and lambda bodies nested deeper than this are rejected
/// instead of exhausting the stack.
pub const MAX_STATEMENT_NESTING: u32 = 128;

/// Builds the statement list of one unit. Lambdas met on the way are merged
/// into the unit as `Block`s and counted.
#[derive(Default)]
pub struct StatementBuilder {
    lambda_count: u32,
    /// Statements currently open on the call stack.
    open: u32,
}

/// Labels seen in one switch body.
#[derive(Default)]
struct CaseLabels {
    count: u32,
    has_default: bool,
}

impl StatementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lambda_count(&self) -> u32 {
        self.lambda_count
    }

    /// Normalize a function or lambda body found at `depth`.
    pub fn body(&mut self, body: &CstNode, depth: u32) -> Result<Vec<NormalizedStatement>> {
        match body.kind {
            CstKind::Compound => self.sequence(&body.children, depth),
            _ => {
                let mut out = Vec::new();
                self.statement(body, depth, &mut out)?;
                Ok(out)
            }
        }
    }

    fn sequence(&mut self, nodes: &[CstNode], depth: u32) -> Result<Vec<NormalizedStatement>> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            self.statement(node, depth, &mut out)?;
        }
        Ok(out)
    }

    fn statement(
        &mut self,
        node: &CstNode,
        depth: u32,
        out: &mut Vec<NormalizedStatement>,
    ) -> Result<()> {
        self.nested(node, |builder| builder.map_statement(node, depth, out))
    }

    /// Run `f` one nesting level deeper, failing once the limit is reached.
    fn nested<T>(&mut self, node: &CstNode, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.open >= MAX_STATEMENT_NESTING {
            return Err(NormalizationError::new(
                node.kind.describe(),
                node.span.start,
                format!("nested more than {MAX_STATEMENT_NESTING} levels deep"),
            ));
        }
        self.open += 1;
        let result = f(self);
        self.open -= 1;
        result
    }

    fn map_statement(
        &mut self,
        node: &CstNode,
        depth: u32,
        out: &mut Vec<NormalizedStatement>,
    ) -> Result<()> {
        match node.kind {
            CstKind::Directive => Ok(()),
            CstKind::Compound => {
                let children = self.sequence(&node.children, depth)?;
                out.push(block(node, depth, children));
                Ok(())
            }
            CstKind::ConditionalGroup => {
                let mut children = Vec::new();
                for item in group_items(node) {
                    self.statement(item, depth, &mut children)?;
                }
                out.push(block(node, depth, children));
                Ok(())
            }
            CstKind::Labeled => {
                for child in node.children.iter().filter(|c| c.kind != CstKind::Identifier) {
                    self.statement(child, depth, out)?;
                }
                Ok(())
            }
            CstKind::If => self.if_chain(node, depth, out),
            CstKind::For | CstKind::RangeFor | CstKind::While | CstKind::Do => {
                self.loop_statement(node, depth, out)
            }
            CstKind::Switch => self.switch_statement(node, depth, out),
            CstKind::Try => self.try_statement(node, depth, out),
            CstKind::Case | CstKind::Catch | CstKind::ElseClause => Err(NormalizationError::new(
                node.kind.describe(),
                node.span.start,
                "appears outside of its enclosing construct",
            )),
            _ => {
                let conditional_expressions = count_conditionals(node);
                out.push(NormalizedStatement {
                    kind: StatementKind::Sequential,
                    span: node.span,
                    depth,
                    conditional_expressions,
                });
                self.merge_lambdas(node, depth, out)
            }
        }
    }

    fn if_chain(
        &mut self,
        node: &CstNode,
        depth: u32,
        out: &mut Vec<NormalizedStatement>,
    ) -> Result<()> {
        let mut arms = Vec::new();
        let mut otherwise = None;
        let mut conditional_expressions = 0;
        let mut header_lambdas = Vec::new();
        let mut current = node;

        loop {
            let condition = current.child_with_role(Role::Condition);
            if let Some(condition) = condition {
                conditional_expressions += count_conditionals(condition);
                self.merge_lambdas(condition, depth, &mut header_lambdas)?;
            }
            let consequence = required(current, Role::Consequence, "missing consequence")?;
            arms.push(ConditionalArm {
                logical_operators: condition.map(count_logical).unwrap_or(0),
                body: self.branch(consequence, depth + 1)?,
            });

            let Some(alternative) = current.child_with_role(Role::Alternative) else {
                break;
            };
            let inner = if alternative.kind == CstKind::ElseClause {
                alternative.children.first().ok_or_else(|| {
                    NormalizationError::new(
                        alternative.kind.describe(),
                        alternative.span.start,
                        "else without a statement",
                    )
                })?
            } else {
                alternative
            };
            if inner.kind == CstKind::If {
                current = inner;
            } else {
                otherwise = Some(self.branch(inner, depth + 1)?);
                break;
            }
        }

        out.extend(header_lambdas);
        out.push(NormalizedStatement {
            kind: StatementKind::If { arms, otherwise },
            span: node.span,
            depth,
            conditional_expressions,
        });
        Ok(())
    }

    fn loop_statement(
        &mut self,
        node: &CstNode,
        depth: u32,
        out: &mut Vec<NormalizedStatement>,
    ) -> Result<()> {
        let kind = match node.kind {
            CstKind::While => LoopKind::While,
            CstKind::Do => LoopKind::Do,
            _ => LoopKind::For,
        };
        let body_node = required(node, Role::Body, "missing loop body")?;
        let logical_operators = node
            .child_with_role(Role::Condition)
            .map(count_logical)
            .unwrap_or(0);

        let mut conditional_expressions = 0;
        for header in node.children.iter().filter(|c| c.role != Some(Role::Body)) {
            conditional_expressions += count_conditionals(header);
            self.merge_lambdas(header, depth, out)?;
        }

        let body = self.branch(body_node, depth + 1)?;
        out.push(NormalizedStatement {
            kind: StatementKind::Loop {
                kind,
                logical_operators,
                body,
            },
            span: node.span,
            depth,
            conditional_expressions,
        });
        Ok(())
    }

    fn switch_statement(
        &mut self,
        node: &CstNode,
        depth: u32,
        out: &mut Vec<NormalizedStatement>,
    ) -> Result<()> {
        let body_node = required(node, Role::Body, "missing switch body")?;
        let condition = node.child_with_role(Role::Condition);
        let logical_operators = condition.map(count_logical).unwrap_or(0);
        let conditional_expressions = condition.map(count_conditionals).unwrap_or(0);
        if let Some(condition) = condition {
            self.merge_lambdas(condition, depth, out)?;
        }

        let mut labels = CaseLabels::default();
        let mut body = Vec::new();
        self.switch_items(&body_node.children, depth + 1, &mut labels, &mut body)?;

        out.push(NormalizedStatement {
            kind: StatementKind::Switch {
                case_count: labels.count,
                has_default: labels.has_default,
                logical_operators,
                body,
            },
            span: node.span,
            depth,
            conditional_expressions,
        });
        Ok(())
    }

    /// Items of a switch body. Labels inside conditional-compilation groups
    /// still belong to the switch; the group itself becomes a `Block`.
    fn switch_items<'n>(
        &mut self,
        items: impl IntoIterator<Item = &'n CstNode>,
        depth: u32,
        labels: &mut CaseLabels,
        body: &mut Vec<NormalizedStatement>,
    ) -> Result<()> {
        for item in items {
            match item.kind {
                CstKind::Case => {
                    if item.child_with_role(Role::Value).is_some() {
                        labels.count += 1;
                    } else {
                        labels.has_default = true;
                    }
                    for stmt in item.children.iter().filter(|c| c.role != Some(Role::Value)) {
                        self.statement(stmt, depth, body)?;
                    }
                }
                CstKind::ConditionalGroup => {
                    let mut children = Vec::new();
                    self.nested(item, |builder| {
                        builder.switch_items(group_items(item), depth, labels, &mut children)
                    })?;
                    body.push(block(item, depth, children));
                }
                _ => self.statement(item, depth, body)?,
            }
        }
        Ok(())
    }

    fn try_statement(
        &mut self,
        node: &CstNode,
        depth: u32,
        out: &mut Vec<NormalizedStatement>,
    ) -> Result<()> {
        let body_node = required(node, Role::Body, "missing try body")?;
        let body = self.branch(body_node, depth + 1)?;

        let mut handlers = Vec::new();
        for clause in node.children_of_kind(CstKind::Catch) {
            let handler = required(clause, Role::Body, "missing catch body")?;
            handlers.push(self.branch(handler, depth + 1)?);
        }

        out.push(NormalizedStatement {
            kind: StatementKind::TryCatch {
                catch_count: handlers.len() as u32,
                body,
                handlers,
            },
            span: node.span,
            depth,
            conditional_expressions: 0,
        });
        Ok(())
    }

    /// Body of a control construct: braces are transparent here.
    fn branch(&mut self, node: &CstNode, depth: u32) -> Result<Vec<NormalizedStatement>> {
        self.body(node, depth)
    }

    /// Emit one `Block` per lambda found in `node`'s expressions.
    fn merge_lambdas(
        &mut self,
        node: &CstNode,
        depth: u32,
        out: &mut Vec<NormalizedStatement>,
    ) -> Result<()> {
        let mut lambdas = Vec::new();
        collect_lambdas(node, &mut lambdas);
        for lambda in lambdas {
            self.lambda_count += 1;
            let children = match lambda.child_with_role(Role::Body) {
                Some(body) => self.body(body, depth)?,
                None => Vec::new(),
            };
            out.push(block(lambda, depth, children));
        }
        Ok(())
    }
}

fn block(node: &CstNode, depth: u32, children: Vec<NormalizedStatement>) -> NormalizedStatement {
    NormalizedStatement {
        kind: StatementKind::Block(children),
        span: node.span,
        depth,
        conditional_expressions: 0,
    }
}

fn required<'n>(node: &'n CstNode, role: Role, message: &str) -> Result<&'n CstNode> {
    node.child_with_role(role).ok_or_else(|| {
        NormalizationError::new(node.kind.describe(), node.span.start, message.to_string())
    })
}

/// Statements of a conditional-compilation group, without its condition.
fn group_items(group: &CstNode) -> impl Iterator<Item = &CstNode> {
    group
        .children
        .iter()
        .filter(|c| !matches!(c.role, Some(Role::Condition) | Some(Role::Name)))
        .filter(|c| c.kind != CstKind::Identifier)
}

/// Outermost lambdas below `node` in source order; nested ones are reached
/// when their enclosing lambda body is normalized.
fn collect_lambdas<'n>(node: &'n CstNode, out: &mut Vec<&'n CstNode>) {
    let mut pending: Vec<&CstNode> = node.children.iter().rev().collect();
    while let Some(child) = pending.pop() {
        if child.kind == CstKind::Lambda {
            out.push(child);
        } else {
            pending.extend(child.children.iter().rev());
        }
    }
}

fn outside_lambdas(node: &CstNode) -> bool {
    node.kind != CstKind::Lambda
}

pub(crate) fn count_logical(node: &CstNode) -> u32 {
    node.count_where(&|n| n.kind == CstKind::LogicalExpression, &outside_lambdas)
}

pub(crate) fn count_conditionals(node: &CstNode) -> u32 {
    node.count_where(&|n| n.kind == CstKind::ConditionalExpression, &outside_lambdas)
}
