//! Normalizer: CST to language-agnostic Structural Model.
//!
//! Unit discovery (`units`) finds callables and their scopes; statement
//! flattening (`statements`) maps each body onto the small set of
//! `StatementKind`s the metrics engine understands. The CST is not retained
//! past this stage.

pub mod chains;
pub mod model;
pub mod statements;
pub mod units;

pub use model::{
    ConditionalArm, LineStats, LoopKind, NormalizedStatement, StatementKind, StructuralModel,
    StructuralUnit, UnitKind,
};
pub use statements::{StatementBuilder, MAX_STATEMENT_NESTING};
pub use units::UnitCollector;

use crate::errors::NormalizationError;
use crate::frontend::Cst;

pub fn normalize(cst: &Cst) -> Result<StructuralModel, NormalizationError> {
    let mut units = UnitCollector::new(&cst.lines).collect(&cst.root)?;
    units.sort_by_key(|unit| unit.span.start);

    tracing::debug!(
        language = %cst.language,
        units = units.len(),
        "normalized translation unit"
    );

    Ok(StructuralModel {
        language: cst.language,
        units,
        lines: LineStats {
            total_lines: cst.lines.total_lines(),
            real_lines: cst.lines.real_lines(),
            comment_lines: cst.lines.comment_lines(),
        },
        call_chains: chains::call_chains(&cst.root),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Language;
    use crate::frontend::parse_source;

    fn model(source: &str, language: Language) -> StructuralModel {
        let cst = parse_source(source, language).unwrap();
        normalize(&cst).unwrap()
    }

    #[test]
    fn test_c_functions_and_parameter_counts() {
        let source = "int add(int a, int b) { return a + b; }\n\
                      void noop(void) {}\n\
                      int decl(int x);\n";
        let model = model(source, Language::C);
        let names: Vec<_> = model.units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["add", "noop"]);
        assert_eq!(model.units[0].parameter_count, 2);
        assert_eq!(model.units[1].parameter_count, 0);
        assert_eq!(model.units[0].kind, UnitKind::Function);
        assert_eq!(model.lines.total_lines, 3);
    }

    #[test]
    fn test_cpp_scopes_qualify_names() {
        let source = r#"
namespace geo {
class Shape {
public:
    double area() const { return w * h; }
private:
    double w, h;
};
double Shape::scale(double f) { return f; }
}
"#;
        let model = model(source, Language::Cpp);
        let area = &model.units[0];
        assert_eq!(area.name, "geo::Shape::area");
        assert_eq!(area.kind, UnitKind::Method);
        assert_eq!(area.enclosing_type.as_deref(), Some("Shape"));

        let scale = &model.units[1];
        assert_eq!(scale.name, "geo::Shape::scale");
        assert_eq!(scale.kind, UnitKind::Method);
        assert_eq!(scale.enclosing_type.as_deref(), Some("Shape"));
        assert_eq!(scale.parameter_count, 1);
    }

    #[test]
    fn test_lambda_body_is_merged_into_enclosing_unit() {
        let source = r#"
int run(int n) {
    auto twice = [](int x) { if (x > 0) { return x * 2; } return 0; };
    return twice(n);
}
"#;
        let model = model(source, Language::Cpp);
        assert_eq!(model.units.len(), 1);
        let run = &model.units[0];
        assert_eq!(run.lambda_count, 1);
        assert_eq!(run.body.len(), 3);
        assert_eq!(run.body[0].kind, StatementKind::Sequential);
        let StatementKind::Block(lambda_body) = &run.body[1].kind else {
            panic!("expected merged lambda block, got {:?}", run.body[1].kind);
        };
        assert!(matches!(lambda_body[0].kind, StatementKind::If { .. }));
        assert_eq!(lambda_body[0].depth, 0);
    }

    #[test]
    fn test_file_scope_lambda_is_its_own_unit() {
        let model = model("auto square = [](int x) { return x * x; };\n", Language::Cpp);
        assert_eq!(model.units.len(), 1);
        assert_eq!(model.units[0].name, "square");
        assert_eq!(model.units[0].kind, UnitKind::Lambda);
        assert_eq!(model.units[0].parameter_count, 1);
    }

    #[test]
    fn test_else_if_chain_flattens_into_arms() {
        let source = "int sign(int x) {\n\
                      if (x > 0) return 1;\n\
                      else if (x < 0) return -1;\n\
                      else return 0;\n\
                      }\n";
        let model = model(source, Language::C);
        let body = &model.units[0].body;
        assert_eq!(body.len(), 1);
        let StatementKind::If { arms, otherwise } = &body[0].kind else {
            panic!("expected if chain");
        };
        assert_eq!(arms.len(), 2);
        assert!(otherwise.is_some());
        assert_eq!(arms[0].body[0].depth, 1);
    }

    #[test]
    fn test_switch_counts_labels() {
        let source = "int f(int x) {\n\
                      switch (x) { case 1: return 1; case 2: case 3: return 2; default: return 0; }\n\
                      }\n";
        let model = model(source, Language::C);
        let StatementKind::Switch {
            case_count,
            has_default,
            body,
            ..
        } = &model.units[0].body[0].kind
        else {
            panic!("expected switch");
        };
        assert_eq!(*case_count, 3);
        assert!(*has_default);
        assert_eq!(body.len(), 3);
    }

    #[test]
    fn test_case_outside_switch_is_a_normalization_error() {
        let source = "void f(int x) { case 1: x++; }\n";
        let cst = parse_source(source, Language::C).unwrap();
        let err = normalize(&cst).unwrap_err();
        assert_eq!(err.construct, "case label");
        assert_eq!(err.offset, source.find("case").unwrap());
    }

    #[test]
    fn test_bodiless_definitions_are_skipped() {
        let source = "struct A {\n    A() = default;\n    void g();\n};\n";
        let model = model(source, Language::Cpp);
        assert!(model.units.is_empty());
    }

    #[test]
    fn test_namespace_qualifier_is_not_a_type() {
        let source = "namespace a { void f(); }\n\
                      void a::f() {}\n\
                      struct S { void g(); };\n\
                      void S::g() {}\n";
        let model = model(source, Language::Cpp);
        assert_eq!(model.units[0].name, "a::f");
        assert_eq!(model.units[0].kind, UnitKind::Function);
        assert_eq!(model.units[0].enclosing_type, None);
        assert_eq!(model.units[1].name, "S::g");
        assert_eq!(model.units[1].kind, UnitKind::Method);
        assert_eq!(model.units[1].enclosing_type.as_deref(), Some("S"));
    }

    #[test]
    fn test_nested_namespace_qualifiers_resolve_from_scope() {
        let source = "namespace outer::inner { int h(); }\n\
                      namespace outer { int inner::h() { return 0; } }\n";
        let model = model(source, Language::Cpp);
        assert_eq!(model.units.len(), 1);
        assert_eq!(model.units[0].name, "outer::inner::h");
        assert_eq!(model.units[0].kind, UnitKind::Function);
    }

    #[test]
    fn test_case_labels_inside_conditional_groups_belong_to_switch() {
        let source = indoc::indoc! {"
            int f(int x) {
                switch (x) {
                case 1:
                    return 1;
            #ifdef EXTRA
                case 2:
                    return 2;
            #else
                case 3:
                    return 3;
            #endif
                default:
                    return 0;
                }
            }
        "};
        let model = model(source, Language::C);
        let StatementKind::Switch {
            case_count,
            has_default,
            body,
            ..
        } = &model.units[0].body[0].kind
        else {
            panic!("expected switch");
        };
        assert_eq!(*case_count, 3);
        assert!(*has_default);
        assert!(body
            .iter()
            .any(|s| matches!(s.kind, StatementKind::Block(_)) && s.depth == 1));
    }

    #[test]
    fn test_excessive_nesting_is_a_normalization_error() {
        let depth = MAX_STATEMENT_NESTING as usize + 10;
        let source = format!("void f(void) {{ {}{} }}\n", "{ ".repeat(depth), "} ".repeat(depth));
        let cst = parse_source(&source, Language::C).unwrap();
        let err = normalize(&cst).unwrap_err();
        assert_eq!(err.construct, "compound statement");
        assert!(err.message.contains("nested"));
    }

    #[test]
    fn test_call_chains_are_recorded() {
        let source = "void f(void) { obj.a().field.b().c().d(); g(); }\n";
        assert_eq!(model(source, Language::C).call_chains, vec![4, 1]);
    }

    #[test]
    fn test_units_sorted_by_position() {
        let source = "namespace a { void z() {} }\nvoid b() {}\n";
        let model = model(source, Language::Cpp);
        let names: Vec<_> = model.units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["a::z", "b"]);
    }
}
