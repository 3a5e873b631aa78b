//! tree-sitter driver and conversion into the owned CST.

use super::cst::{Cst, CstKind, CstNode, LineIndex, Role};
use super::grammar::{grammar_for, Grammar};
use crate::core::{Language, Span};
use crate::errors::ParseError;
use std::collections::BTreeSet;
use tree_sitter::{Node, Parser};

const SNIPPET_LIMIT: usize = 40;

/// Parse `source` with the grammar registered for `language`.
pub fn parse_source(source: &str, language: Language) -> Result<Cst, ParseError> {
    let grammar = grammar_for(language);
    let mut parser = Parser::new();
    parser
        .set_language(&(grammar.ts_language)())
        .map_err(|e| ParseError::new(0, 1, 1, format!("failed to load {language} grammar: {e}")))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::new(0, 1, 1, "parser produced no syntax tree"))?;
    let root = tree.root_node();

    if root.has_error() {
        let error = first_error(root)
            .map(|node| error_at(node, source))
            .unwrap_or_else(|| ParseError::new(0, 1, 1, "syntax error"));
        return Err(error);
    }

    let mut converter = Converter {
        source,
        grammar,
        comments: Vec::new(),
    };
    let root = converter
        .convert(root)
        .ok_or_else(|| ParseError::new(0, 1, 1, "parser produced an empty syntax tree"))?;
    let lines = index_lines(source, &converter.comments);

    Ok(Cst {
        language,
        root,
        lines,
    })
}

/// A node whose kept children are still being converted.
struct OpenNode<'t> {
    node: CstNode,
    pending: std::vec::IntoIter<(Node<'t>, Option<Role>)>,
}

struct Converter<'s> {
    source: &'s str,
    grammar: &'static Grammar,
    comments: Vec<Span>,
}

impl Converter<'_> {
    /// Depth-first conversion on an explicit stack; children are attached to
    /// their parent as they finish, so tree depth never reaches the call stack.
    fn convert<'t>(&mut self, root: Node<'t>) -> Option<CstNode> {
        let mut stack = vec![self.open(root, None)];
        let mut finished = None;

        while let Some(mut top) = stack.pop() {
            if let Some((child, role)) = top.pending.next() {
                stack.push(top);
                stack.push(self.open(child, role));
                continue;
            }
            match stack.last_mut() {
                Some(parent) => parent.node.children.push(top.node),
                None => finished = Some(top.node),
            }
        }
        finished
    }

    fn open<'t>(&mut self, node: Node<'t>, role: Option<Role>) -> OpenNode<'t> {
        let kind = self.classify(node);
        let text = if kind.captures_text() {
            node.utf8_text(self.source.as_bytes())
                .ok()
                .map(collapse_whitespace)
        } else {
            None
        };

        let mut pending = Vec::new();
        let keep_children = !kind.captures_text() && kind != CstKind::Directive;
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                if self.grammar.is_comment(child.kind()) {
                    self.comments.push(span_of(child));
                } else if keep_children && child.is_named() {
                    let child_role = cursor.field_name().and_then(|f| self.grammar.role_of(f));
                    pending.push((child, child_role));
                } else {
                    self.harvest_comments(child);
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }

        OpenNode {
            node: CstNode {
                kind,
                span: span_of(node),
                role,
                text,
                children: Vec::with_capacity(pending.len()),
            },
            pending: pending.into_iter(),
        }
    }

    fn classify(&self, node: Node) -> CstKind {
        if node.kind() == self.grammar.binary_expression {
            let operator = node
                .child_by_field_name("operator")
                .and_then(|op| op.utf8_text(self.source.as_bytes()).ok());
            return match operator {
                Some(op) if self.grammar.is_logical_operator(op) => CstKind::LogicalExpression,
                _ => CstKind::Other,
            };
        }
        self.grammar.kind_of(node.kind())
    }

    /// Record comments below a node whose children are not kept.
    fn harvest_comments(&mut self, node: Node) {
        let mut pending = vec![node];
        while let Some(node) = pending.pop() {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if self.grammar.is_comment(child.kind()) {
                    self.comments.push(span_of(child));
                } else {
                    pending.push(child);
                }
            }
        }
    }
}

fn span_of(node: Node) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    // Nodes that swallow their trailing newline end at column 0 of the next row.
    let end_row = if end.column == 0 && end.row > start.row {
        end.row - 1
    } else {
        end.row
    };
    Span::new(node.start_byte(), node.end_byte(), start.row + 1, end_row + 1)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First ERROR or MISSING node in document order.
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        pending.extend(children.into_iter().rev());
    }
    None
}

fn error_at(node: Node, source: &str) -> ParseError {
    let position = node.start_position();
    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let snippet: String = source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or_default()
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(SNIPPET_LIMIT)
            .collect();
        format!("unexpected syntax `{}`", snippet.trim())
    };
    ParseError::new(node.start_byte(), position.row + 1, position.column + 1, message)
}

/// Classify each line as code or not after blanking out comments.
fn index_lines(source: &str, comments: &[Span]) -> LineIndex {
    let mut masked = source.as_bytes().to_vec();
    let mut comment_lines = BTreeSet::new();

    for comment in comments {
        let end = comment.end.min(masked.len());
        for byte in masked.get_mut(comment.start..end).into_iter().flatten() {
            if *byte != b'\n' && *byte != b'\r' {
                *byte = b' ';
            }
        }
        comment_lines.extend(comment.start_line..=comment.end_line);
    }

    let masked = String::from_utf8_lossy(&masked);
    let code = masked.lines().map(|line| !line.trim().is_empty()).collect();
    LineIndex::new(code, comment_lines)
}
