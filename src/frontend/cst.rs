//! Owned, language-independent concrete structure tree.

use crate::core::{Language, Span};
use std::collections::BTreeSet;

/// Node categories the normalizer understands. Everything else is `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CstKind {
    TranslationUnit,
    Namespace,
    /// class / struct / union
    TypeSpecifier,
    EnumSpecifier,
    Template,
    FunctionDefinition,
    FunctionDeclarator,
    ParameterList,
    Parameter,
    Lambda,
    Compound,
    If,
    ElseClause,
    For,
    RangeFor,
    While,
    Do,
    Switch,
    Case,
    Try,
    Catch,
    Labeled,
    Call,
    /// `a.b` and `a->b`
    FieldAccess,
    /// `&&`, `||` and their alternative spellings.
    LogicalExpression,
    ConditionalExpression,
    /// Any name-like node; `text` holds its source.
    Identifier,
    PrimitiveType,
    /// Opaque preprocessor directive.
    Directive,
    /// `#if`/`#ifdef`/`#else` region whose children are kept.
    ConditionalGroup,
    Other,
}

impl CstKind {
    /// Kinds whose source text is captured and whose children are dropped.
    pub fn captures_text(&self) -> bool {
        matches!(self, CstKind::Identifier | CstKind::PrimitiveType)
    }

    pub fn describe(&self) -> &'static str {
        match self {
            CstKind::TranslationUnit => "translation unit",
            CstKind::Namespace => "namespace",
            CstKind::TypeSpecifier => "type specifier",
            CstKind::EnumSpecifier => "enum",
            CstKind::Template => "template",
            CstKind::FunctionDefinition => "function definition",
            CstKind::FunctionDeclarator => "function declarator",
            CstKind::ParameterList => "parameter list",
            CstKind::Parameter => "parameter",
            CstKind::Lambda => "lambda",
            CstKind::Compound => "compound statement",
            CstKind::If => "if statement",
            CstKind::ElseClause => "else clause",
            CstKind::For => "for statement",
            CstKind::RangeFor => "range-based for statement",
            CstKind::While => "while statement",
            CstKind::Do => "do statement",
            CstKind::Switch => "switch statement",
            CstKind::Case => "case label",
            CstKind::Try => "try statement",
            CstKind::Catch => "catch clause",
            CstKind::Labeled => "labeled statement",
            CstKind::Call => "call expression",
            CstKind::FieldAccess => "field expression",
            CstKind::LogicalExpression => "logical expression",
            CstKind::ConditionalExpression => "conditional expression",
            CstKind::Identifier => "identifier",
            CstKind::PrimitiveType => "primitive type",
            CstKind::Directive => "preprocessor directive",
            CstKind::ConditionalGroup => "conditional compilation group",
            CstKind::Other => "node",
        }
    }
}

/// Field a child occupies in its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Name,
    Declarator,
    Parameters,
    Body,
    Condition,
    Consequence,
    Alternative,
    Value,
    Type,
    /// Function expression of a call.
    Callee,
    /// Object of a field access, operand of unary expressions.
    Operand,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CstNode {
    pub kind: CstKind,
    pub span: Span,
    pub role: Option<Role>,
    pub text: Option<String>,
    pub children: Vec<CstNode>,
}

impl CstNode {
    pub fn child_with_role(&self, role: Role) -> Option<&CstNode> {
        self.children.iter().find(|c| c.role == Some(role))
    }

    pub fn children_of_kind(&self, kind: CstKind) -> impl Iterator<Item = &CstNode> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Counts matching nodes without descending into nodes rejected by
    /// `enter`. Uses an explicit stack; expression trees can be very deep.
    pub fn count_where(
        &self,
        matches: &dyn Fn(&CstNode) -> bool,
        enter: &dyn Fn(&CstNode) -> bool,
    ) -> u32 {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += u32::from(matches(node));
            if enter(node) {
                pending.extend(&node.children);
            }
        }
        count
    }
}

impl Drop for CstNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Per-line classification of the source text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineIndex {
    /// `code[i]` is true when line `i + 1` has non-comment, non-blank text.
    code: Vec<bool>,
    comment_lines: BTreeSet<usize>,
}

impl LineIndex {
    pub fn new(code: Vec<bool>, comment_lines: BTreeSet<usize>) -> Self {
        Self {
            code,
            comment_lines,
        }
    }

    pub fn total_lines(&self) -> usize {
        self.code.len()
    }

    pub fn comment_lines(&self) -> usize {
        self.comment_lines.len()
    }

    pub fn real_lines(&self) -> usize {
        self.code.iter().filter(|c| **c).count()
    }

    /// Code lines within the inclusive 1-based range.
    pub fn real_lines_between(&self, start_line: usize, end_line: usize) -> usize {
        if start_line == 0 || start_line > end_line {
            return 0;
        }
        let end = end_line.min(self.code.len());
        self.code
            .get(start_line - 1..end)
            .map(|lines| lines.iter().filter(|c| **c).count())
            .unwrap_or(0)
    }
}

/// Parse result for one source unit.
#[derive(Clone, Debug)]
pub struct Cst {
    pub language: Language,
    pub root: CstNode,
    pub lines: LineIndex,
}
