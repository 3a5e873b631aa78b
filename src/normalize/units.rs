//! Discovery of analyzable callables in a CST.

use super::model::{StructuralUnit, UnitKind};
use super::statements::StatementBuilder;
use crate::errors::NormalizationError;
use crate::frontend::{CstKind, CstNode, LineIndex, Role};
use std::collections::BTreeSet;

const SCOPE_SEPARATOR: &str = "::";
const ANONYMOUS_LAMBDA: &str = "<lambda>";

#[derive(Debug, Clone)]
enum Scope {
    Namespace(String),
    Type(String),
}

impl Scope {
    fn name(&self) -> &str {
        match self {
            Scope::Namespace(name) | Scope::Type(name) => name,
        }
    }
}

/// Pending traversal step. Scopes are closed by an explicit `Leave` so the
/// walk needs no recursion.
enum Step<'n> {
    Visit(&'n CstNode),
    FreeLambda {
        lambda: &'n CstNode,
        parent: &'n CstNode,
    },
    Leave,
}

/// Walks namespaces and type bodies collecting one `StructuralUnit` per
/// function definition with a body and per lambda bound outside any callable.
pub struct UnitCollector<'c> {
    lines: &'c LineIndex,
    scopes: Vec<Scope>,
    /// Qualified names of namespaces opened so far, with every prefix.
    namespaces: BTreeSet<String>,
    units: Vec<StructuralUnit>,
}

impl<'c> UnitCollector<'c> {
    pub fn new(lines: &'c LineIndex) -> Self {
        Self {
            lines,
            scopes: Vec::new(),
            namespaces: BTreeSet::new(),
            units: Vec::new(),
        }
    }

    pub fn collect(mut self, root: &CstNode) -> Result<Vec<StructuralUnit>, NormalizationError> {
        let mut steps = vec![Step::Visit(root)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Leave => {
                    self.scopes.pop();
                }
                Step::FreeLambda { lambda, parent } => self.free_lambda(lambda, parent)?,
                Step::Visit(node) => self.visit(node, &mut steps)?,
            }
        }
        Ok(self.units)
    }

    fn visit<'n>(
        &mut self,
        node: &'n CstNode,
        steps: &mut Vec<Step<'n>>,
    ) -> Result<(), NormalizationError> {
        let scope = match node.kind {
            CstKind::FunctionDefinition => return self.function(node),
            CstKind::Namespace => node
                .child_with_role(Role::Name)
                .and_then(CstNode::text)
                .map(|name| Scope::Namespace(name.to_string())),
            CstKind::TypeSpecifier => node
                .child_with_role(Role::Name)
                .and_then(CstNode::text)
                .map(|name| Scope::Type(name.to_string())),
            _ => None,
        };
        if let Some(scope) = scope {
            if let Scope::Namespace(name) = &scope {
                self.register_namespace(name);
            }
            self.scopes.push(scope);
            steps.push(Step::Leave);
        }

        let scoped = matches!(node.kind, CstKind::Namespace | CstKind::TypeSpecifier);
        for child in node.children.iter().rev() {
            if scoped && child.role == Some(Role::Name) {
                continue;
            }
            if child.kind == CstKind::Lambda {
                steps.push(Step::FreeLambda {
                    lambda: child,
                    parent: node,
                });
            } else {
                steps.push(Step::Visit(child));
            }
        }
        Ok(())
    }

    /// Record `name` (possibly `a::b`) opened in the current scope.
    fn register_namespace(&mut self, name: &str) {
        let full = self.qualify(name);
        let mut prefix = String::new();
        for segment in full.split(SCOPE_SEPARATOR) {
            if !prefix.is_empty() {
                prefix.push_str(SCOPE_SEPARATOR);
            }
            prefix.push_str(segment);
            self.namespaces.insert(prefix.clone());
        }
    }

    /// Whether an out-of-line qualifier names a namespace rather than a type.
    fn is_namespace(&self, qualifier: &str) -> bool {
        self.namespaces.contains(qualifier) || self.namespaces.contains(&self.qualify(qualifier))
    }

    fn function(&mut self, node: &CstNode) -> Result<(), NormalizationError> {
        let Some(body) = node.child_with_role(Role::Body) else {
            return Ok(());
        };

        let declarator = node
            .child_with_role(Role::Declarator)
            .ok_or_else(|| unnamed(node))?;
        let function_declarator = find_function_declarator(declarator);
        let raw_name = function_declarator
            .and_then(|fd| fd.child_with_role(Role::Declarator))
            .or_else(|| (declarator.kind == CstKind::Identifier).then_some(declarator))
            .and_then(declarator_name)
            .ok_or_else(|| unnamed(node))?;

        let parameter_count = function_declarator
            .and_then(|fd| fd.child_with_role(Role::Parameters))
            .map(count_parameters)
            .unwrap_or(0);

        let enclosing_type = self.innermost_type().or_else(|| {
            raw_name
                .rsplit_once(SCOPE_SEPARATOR)
                .map(|(qualifier, _)| qualifier)
                .filter(|qualifier| !self.is_namespace(qualifier))
                .map(str::to_string)
        });
        let kind = if enclosing_type.is_some() {
            UnitKind::Method
        } else {
            UnitKind::Function
        };

        let mut builder = StatementBuilder::new();
        let statements = builder.body(body, 0)?;
        self.push_unit(StructuralUnit {
            name: self.qualify(&raw_name),
            kind,
            parameter_count,
            body: statements,
            span: node.span,
            enclosing_type,
            lambda_count: builder.lambda_count(),
            real_lines: 0,
        });
        Ok(())
    }

    /// A lambda outside any callable becomes a unit of its own, named after
    /// the declarator it initializes.
    fn free_lambda(&mut self, lambda: &CstNode, parent: &CstNode) -> Result<(), NormalizationError> {
        let name = parent
            .child_with_role(Role::Declarator)
            .filter(|d| d.kind == CstKind::Identifier)
            .and_then(CstNode::text)
            .unwrap_or(ANONYMOUS_LAMBDA);

        let parameter_count = lambda
            .child_with_role(Role::Declarator)
            .and_then(|d| d.child_with_role(Role::Parameters))
            .map(count_parameters)
            .unwrap_or(0);

        let mut builder = StatementBuilder::new();
        let statements = match lambda.child_with_role(Role::Body) {
            Some(body) => builder.body(body, 0)?,
            None => Vec::new(),
        };
        self.push_unit(StructuralUnit {
            name: self.qualify(name),
            kind: UnitKind::Lambda,
            parameter_count,
            body: statements,
            span: lambda.span,
            enclosing_type: self.innermost_type(),
            lambda_count: builder.lambda_count(),
            real_lines: 0,
        });
        Ok(())
    }

    fn push_unit(&mut self, mut unit: StructuralUnit) {
        unit.real_lines = self
            .lines
            .real_lines_between(unit.span.start_line, unit.span.end_line);
        self.units.push(unit);
    }

    fn innermost_type(&self) -> Option<String> {
        self.scopes.iter().rev().find_map(|scope| match scope {
            Scope::Type(name) => Some(name.clone()),
            Scope::Namespace(_) => None,
        })
    }

    fn qualify(&self, name: &str) -> String {
        self.scopes
            .iter()
            .map(Scope::name)
            .chain(std::iter::once(name))
            .collect::<Vec<_>>()
            .join(SCOPE_SEPARATOR)
    }
}

fn unnamed(node: &CstNode) -> NormalizationError {
    NormalizationError::new(
        node.kind.describe(),
        node.span.start,
        "declarator does not name the function",
    )
}

/// Innermost function declarator under a (possibly pointer or reference)
/// declarator chain. `int (*get(void))(int)` resolves to `get(void)`.
fn find_function_declarator(node: &CstNode) -> Option<&CstNode> {
    if node.kind == CstKind::Identifier {
        return None;
    }
    if node.kind == CstKind::FunctionDeclarator {
        let nested = node
            .child_with_role(Role::Declarator)
            .and_then(find_function_declarator);
        return nested.or(Some(node));
    }
    node.child_with_role(Role::Declarator)
        .or_else(|| node.children_of_kind(CstKind::FunctionDeclarator).next())
        .or_else(|| node.children.iter().rev().find(|c| c.kind == CstKind::Other))
        .and_then(find_function_declarator)
}

fn declarator_name(node: &CstNode) -> Option<String> {
    if node.kind == CstKind::Identifier {
        let text = node.text()?;
        // `operator int()` arrives as one conversion-operator node.
        let name = text.split_once('(').map_or(text, |(head, _)| head).trim();
        return (!name.is_empty()).then(|| name.to_string());
    }
    node.child_with_role(Role::Declarator)
        .or_else(|| node.children_of_kind(CstKind::Identifier).next())
        .and_then(declarator_name)
}

fn count_parameters(list: &CstNode) -> usize {
    let params: Vec<&CstNode> = list.children_of_kind(CstKind::Parameter).collect();
    match params.as_slice() {
        [only] if is_void(only) => 0,
        _ => params.len(),
    }
}

fn is_void(param: &CstNode) -> bool {
    param.child_with_role(Role::Declarator).is_none()
        && param
            .child_with_role(Role::Type)
            .and_then(CstNode::text)
            .is_some_and(|t| t == "void")
}
