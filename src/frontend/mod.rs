//! Lexical/syntactic front-end: source text to CST.
//!
//! Parsing is a pure function of the text and language. Comments never
//! reach the tree (their lines are indexed separately) and preprocessor
//! directives stay opaque.

pub mod cst;
pub mod grammar;
pub mod parser;

pub use cst::{Cst, CstKind, CstNode, LineIndex, Role};
pub use grammar::{grammar_for, Grammar, CPP_GRAMMAR, C_GRAMMAR};
pub use parser::parse_source;

use crate::core::SourceUnit;
use crate::errors::ParseError;

pub fn parse(unit: &SourceUnit) -> Result<Cst, ParseError> {
    parse_source(unit.text(), unit.language())
}
