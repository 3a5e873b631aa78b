//! Per-language grammar tables.
//!
//! A table maps tree-sitter node kinds and field names onto the shared
//! `CstKind`/`Role` vocabulary. Supporting another language means adding a
//! table here and a `Language` variant; nothing downstream changes.

use super::cst::{CstKind, Role};
use crate::core::Language;

pub struct Grammar {
    pub language: Language,
    pub ts_language: fn() -> tree_sitter::Language,
    pub node_kinds: &'static [(&'static str, CstKind)],
    pub fields: &'static [(&'static str, Role)],
    pub comment_kinds: &'static [&'static str],
    /// Node kind whose `operator` field decides between logical and other binaries.
    pub binary_expression: &'static str,
    pub logical_operators: &'static [&'static str],
}

impl Grammar {
    pub fn kind_of(&self, ts_kind: &str) -> CstKind {
        self.node_kinds
            .iter()
            .find(|(name, _)| *name == ts_kind)
            .map(|(_, kind)| *kind)
            .unwrap_or(CstKind::Other)
    }

    pub fn role_of(&self, field: &str) -> Option<Role> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, role)| *role)
    }

    pub fn is_comment(&self, ts_kind: &str) -> bool {
        self.comment_kinds.contains(&ts_kind)
    }

    pub fn is_logical_operator(&self, operator: &str) -> bool {
        self.logical_operators.contains(&operator)
    }
}

pub fn grammar_for(language: Language) -> &'static Grammar {
    match language {
        Language::C => &C_GRAMMAR,
        Language::Cpp => &CPP_GRAMMAR,
    }
}

fn c_language() -> tree_sitter::Language {
    tree_sitter_c::LANGUAGE.into()
}

fn cpp_language() -> tree_sitter::Language {
    tree_sitter_cpp::LANGUAGE.into()
}

static COMMON_FIELDS: &[(&str, Role)] = &[
    ("name", Role::Name),
    ("declarator", Role::Declarator),
    ("parameters", Role::Parameters),
    ("body", Role::Body),
    ("condition", Role::Condition),
    ("consequence", Role::Consequence),
    ("alternative", Role::Alternative),
    ("value", Role::Value),
    ("default_value", Role::Value),
    ("type", Role::Type),
    ("function", Role::Callee),
    ("argument", Role::Operand),
];

static C_NODE_KINDS: &[(&str, CstKind)] = &[
    ("translation_unit", CstKind::TranslationUnit),
    ("function_definition", CstKind::FunctionDefinition),
    ("function_declarator", CstKind::FunctionDeclarator),
    ("parameter_list", CstKind::ParameterList),
    ("parameter_declaration", CstKind::Parameter),
    ("variadic_parameter", CstKind::Parameter),
    ("compound_statement", CstKind::Compound),
    ("if_statement", CstKind::If),
    ("else_clause", CstKind::ElseClause),
    ("for_statement", CstKind::For),
    ("while_statement", CstKind::While),
    ("do_statement", CstKind::Do),
    ("switch_statement", CstKind::Switch),
    ("case_statement", CstKind::Case),
    ("labeled_statement", CstKind::Labeled),
    ("conditional_expression", CstKind::ConditionalExpression),
    ("call_expression", CstKind::Call),
    ("field_expression", CstKind::FieldAccess),
    ("struct_specifier", CstKind::TypeSpecifier),
    ("union_specifier", CstKind::TypeSpecifier),
    ("enum_specifier", CstKind::EnumSpecifier),
    ("identifier", CstKind::Identifier),
    ("field_identifier", CstKind::Identifier),
    ("type_identifier", CstKind::Identifier),
    ("statement_identifier", CstKind::Identifier),
    ("primitive_type", CstKind::PrimitiveType),
    ("preproc_include", CstKind::Directive),
    ("preproc_def", CstKind::Directive),
    ("preproc_function_def", CstKind::Directive),
    ("preproc_call", CstKind::Directive),
    ("preproc_if", CstKind::ConditionalGroup),
    ("preproc_ifdef", CstKind::ConditionalGroup),
    ("preproc_else", CstKind::ConditionalGroup),
    ("preproc_elif", CstKind::ConditionalGroup),
    ("preproc_elifdef", CstKind::ConditionalGroup),
];

static CPP_NODE_KINDS: &[(&str, CstKind)] = &[
    ("translation_unit", CstKind::TranslationUnit),
    ("namespace_definition", CstKind::Namespace),
    ("class_specifier", CstKind::TypeSpecifier),
    ("struct_specifier", CstKind::TypeSpecifier),
    ("union_specifier", CstKind::TypeSpecifier),
    ("enum_specifier", CstKind::EnumSpecifier),
    ("template_declaration", CstKind::Template),
    ("function_definition", CstKind::FunctionDefinition),
    ("function_declarator", CstKind::FunctionDeclarator),
    ("parameter_list", CstKind::ParameterList),
    ("parameter_declaration", CstKind::Parameter),
    ("optional_parameter_declaration", CstKind::Parameter),
    ("variadic_parameter_declaration", CstKind::Parameter),
    ("variadic_parameter", CstKind::Parameter),
    ("lambda_expression", CstKind::Lambda),
    ("compound_statement", CstKind::Compound),
    ("if_statement", CstKind::If),
    ("else_clause", CstKind::ElseClause),
    ("for_statement", CstKind::For),
    ("for_range_loop", CstKind::RangeFor),
    ("while_statement", CstKind::While),
    ("do_statement", CstKind::Do),
    ("switch_statement", CstKind::Switch),
    ("case_statement", CstKind::Case),
    ("try_statement", CstKind::Try),
    ("catch_clause", CstKind::Catch),
    ("labeled_statement", CstKind::Labeled),
    ("conditional_expression", CstKind::ConditionalExpression),
    ("call_expression", CstKind::Call),
    ("field_expression", CstKind::FieldAccess),
    ("identifier", CstKind::Identifier),
    ("field_identifier", CstKind::Identifier),
    ("type_identifier", CstKind::Identifier),
    ("statement_identifier", CstKind::Identifier),
    ("namespace_identifier", CstKind::Identifier),
    ("nested_namespace_specifier", CstKind::Identifier),
    ("qualified_identifier", CstKind::Identifier),
    ("destructor_name", CstKind::Identifier),
    ("operator_name", CstKind::Identifier),
    ("operator_cast", CstKind::Identifier),
    ("template_function", CstKind::Identifier),
    ("template_type", CstKind::Identifier),
    ("primitive_type", CstKind::PrimitiveType),
    ("preproc_include", CstKind::Directive),
    ("preproc_def", CstKind::Directive),
    ("preproc_function_def", CstKind::Directive),
    ("preproc_call", CstKind::Directive),
    ("preproc_if", CstKind::ConditionalGroup),
    ("preproc_ifdef", CstKind::ConditionalGroup),
    ("preproc_else", CstKind::ConditionalGroup),
    ("preproc_elif", CstKind::ConditionalGroup),
    ("preproc_elifdef", CstKind::ConditionalGroup),
];

pub static C_GRAMMAR: Grammar = Grammar {
    language: Language::C,
    ts_language: c_language,
    node_kinds: C_NODE_KINDS,
    fields: COMMON_FIELDS,
    comment_kinds: &["comment"],
    binary_expression: "binary_expression",
    logical_operators: &["&&", "||"],
};

pub static CPP_GRAMMAR: Grammar = Grammar {
    language: Language::Cpp,
    ts_language: cpp_language,
    node_kinds: CPP_NODE_KINDS,
    fields: COMMON_FIELDS,
    comment_kinds: &["comment"],
    binary_expression: "binary_expression",
    logical_operators: &["&&", "||", "and", "or"],
};
