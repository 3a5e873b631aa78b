mod common;

use common::{analyze_c, analyze_cpp, analyze_with, c_function_with_statements, only_unit};
use cxmetrics::config::{AnalysisConfig, LongMethodMeasure};
use cxmetrics::core::{Language, SourceUnit};
use cxmetrics::errors::AnalysisError;
use cxmetrics::normalize::UnitKind;
use cxmetrics::pipeline::{analyze, analyze_batch};
use indoc::indoc;
use pretty_assertions::assert_eq;

#[test]
fn test_calculate_scenario() {
    let report = analyze_c(indoc! {"
        int calculate(int a, int b, int c, int d, int e) {
            if (a < 0 || b < 0) {
                return 0;
            }
            int sum = 0;
            for (int i = 0; i < c; i++) {
                sum += a + b;
            }
            while (d > 0) {
                sum += d;
                d--;
            }
            return sum + e;
        }
    "});
    let unit = only_unit(&report);
    assert_eq!(unit.cyclomatic, 4);
    assert_eq!(unit.max_nesting, 1);
    assert_eq!(unit.branches, 1);
    assert_eq!(unit.loops, 2);
    assert_eq!(unit.parameters, 5);
}

#[test]
fn test_for_if_while_nests_three_deep() {
    let report = analyze_c(indoc! {"
        void walk(int n) {
            int shallow = 0;
            if (n) { shallow++; }
            for (int i = 0; i < n; i++) {
                if (i % 2) {
                    while (n > i) {
                        n--;
                    }
                }
            }
            shallow--;
        }
    "});
    assert_eq!(only_unit(&report).max_nesting, 3);
}

#[test]
fn test_else_if_chain_counts_two_branches() {
    let report = analyze_c(indoc! {"
        int classify(int len) {
            if (len == 0) {
                return 0;
            } else if (len > 10) {
                return 2;
            } else {
                return 1;
            }
        }
    "});
    let unit = only_unit(&report);
    assert_eq!(unit.branches, 2);
    assert_eq!(unit.cyclomatic, 3);
    assert_eq!(unit.statements, 4);
}

#[test]
fn test_switch_cases_count_and_default_does_not() {
    let with_default = analyze_c(indoc! {"
        int pick(int t) {
            switch (t) {
                case 1: return 10;
                case 2: return 20;
                default: return 0;
            }
        }
    "});
    let without_default = analyze_c(indoc! {"
        int pick(int t) {
            switch (t) {
                case 1: return 10;
                case 2: return 20;
            }
            return 0;
        }
    "});
    assert_eq!(only_unit(&with_default).cyclomatic, 3);
    assert_eq!(only_unit(&without_default).cyclomatic, 3);
    assert_eq!(only_unit(&with_default).branches, 2);
}

#[test]
fn test_case_labels_under_ifdef_count_toward_the_switch() {
    let report = analyze_c(indoc! {"
        int decode(int op) {
            switch (op) {
            case 1:
                return 10;
        #ifdef WITH_EXT
            case 2:
                return 20;
        #else
            case 3:
                return 30;
        #endif
            default:
                return 0;
            }
        }
    "});
    let unit = only_unit(&report);
    assert_eq!(unit.cyclomatic, 4);
    assert_eq!(unit.branches, 3);
    assert_eq!(unit.max_nesting, 1);
}

#[test]
fn test_namespace_qualified_definition_is_a_function() {
    let report = analyze_cpp(indoc! {"
        namespace a { void f(); }
        void a::g() {}
    "});
    let unit = only_unit(&report);
    assert_eq!(unit.name, "a::g");
    assert_eq!(unit.kind, UnitKind::Function);
}

#[test]
fn test_catch_clauses_add_branches() {
    let report = analyze_cpp(indoc! {"
        int guarded() {
            try {
                return risky();
            } catch (const std::out_of_range& e) {
                return -1;
            } catch (...) {
                return -2;
            }
        }
    "});
    let unit = only_unit(&report);
    assert_eq!(unit.cyclomatic, 3);
    assert_eq!(unit.branches, 2);
    assert_eq!(unit.max_nesting, 1);
}

#[test]
fn test_long_method_boundary() {
    let config = AnalysisConfig::default();
    let threshold = config.long_method_threshold;

    let at = analyze_c(&c_function_with_statements(threshold));
    let over = analyze_c(&c_function_with_statements(threshold + 1));
    assert_eq!(only_unit(&at).statements, threshold);
    assert!(!only_unit(&at).long_method);
    assert!(only_unit(&over).long_method);
}

#[test]
fn test_long_method_by_line_span() {
    let config = AnalysisConfig {
        long_method_measure: LongMethodMeasure::Lines,
        ..AnalysisConfig::default().with_long_method_threshold(4)
    };
    let report = analyze_with(&c_function_with_statements(3), Language::C, &config);
    // signature + 3 statements + closing brace
    assert_eq!(only_unit(&report).lines, 5);
    assert!(only_unit(&report).long_method);
}

#[test]
fn test_logical_operators_only_in_conditions() {
    let source = indoc! {"
        int both(int a, int b) {
            int t = a && b;
            if (a && (b || t)) {
                return 1;
            }
            return 0;
        }
    "};
    let plain = analyze_c(source);
    let counting = analyze_with(
        source,
        Language::C,
        &AnalysisConfig::default().with_logical_operators(true),
    );
    assert_eq!(only_unit(&plain).cyclomatic, 2);
    assert_eq!(only_unit(&counting).cyclomatic, 4);
}

#[test]
fn test_conditional_expressions_counted_when_enabled() {
    let source = indoc! {"
        int pick(int a) {
            int b = a ? 1 : (a > 2 ? 2 : 3);
            if (a ? 1 : 0) {
                return b;
            }
            return 0;
        }
    "};
    let plain = analyze_c(source);
    let counting = analyze_with(
        source,
        Language::C,
        &AnalysisConfig::default().with_conditional_expressions(true),
    );
    assert_eq!(only_unit(&plain).cyclomatic, 2);
    assert_eq!(only_unit(&counting).cyclomatic, 5);
}

#[test]
fn test_conditional_expression_in_condition_lambda_counted_once() {
    let source = indoc! {"
        int gate(int a) {
            if ([](int v) { return v ? 1 : 0; }(a)) {
                return 1;
            }
            return 0;
        }
    "};
    let plain = analyze_cpp(source);
    let counting = analyze_with(
        source,
        Language::Cpp,
        &AnalysisConfig::default().with_conditional_expressions(true),
    );
    assert_eq!(only_unit(&plain).cyclomatic, 2);
    assert_eq!(only_unit(&plain).lambdas, 1);
    // only through the merged lambda body, not the `if` condition
    assert_eq!(only_unit(&counting).cyclomatic, 3);
}

#[test]
fn test_comments_and_directives_do_not_affect_metrics() {
    let bare = analyze_c("int f(int x) {\n    if (x) return 1;\n    return 0;\n}\n");
    let noisy = analyze_c(indoc! {"
        #include <stdio.h>
        #define LIMIT 4
        /* leading block */
        int f(int x) { // trailing
            if (x) return 1; /* if (y) */
            return 0;
        }
    "});
    let (a, b) = (only_unit(&bare), only_unit(&noisy));
    assert_eq!(a.cyclomatic, b.cyclomatic);
    assert_eq!(a.statements, b.statements);
    assert_eq!(a.max_nesting, b.max_nesting);
    assert_eq!(noisy.summary.comment_lines, 3);
}

#[test]
fn test_lambda_control_flow_attributed_to_enclosing_method() {
    let report = analyze_cpp(indoc! {"
        class Widget {
        public:
            int apply(int v) {
                auto clamp = [](int x) {
                    if (x > 10) { return 10; }
                    return x;
                };
                return clamp(v);
            }
        };
    "});
    let unit = only_unit(&report);
    assert_eq!(unit.name, "Widget::apply");
    assert_eq!(unit.lambdas, 1);
    assert_eq!(unit.cyclomatic, 2);
    // the lambda's `if` sits at the enclosing statement's depth
    assert_eq!(unit.max_nesting, 1);
}

#[test]
fn test_out_of_line_method_definition() {
    let report = analyze_cpp(indoc! {"
        namespace io {
        int Reader::next(char* buf, int len) {
            for (int i = 0; i < len; i++) { buf[i] = 0; }
            return len;
        }
        }
    "});
    let unit = only_unit(&report);
    assert_eq!(unit.name, "io::Reader::next");
    assert_eq!(unit.parameters, 2);
    assert_eq!(unit.loops, 1);
}

#[test]
fn test_units_ordered_by_source_position() {
    let report = analyze_c(indoc! {"
        int zeta(void) { return 0; }
        int alpha(void) { return 1; }
        int mid(void) { return 2; }
    "});
    let names: Vec<_> = report.units.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_parse_error_is_located() {
    let source = "int ok(void) { return 0; }\nint broken(int x) { return x + ; }\n";
    let err = analyze(source, Language::C, &AnalysisConfig::default()).unwrap_err();
    let AnalysisError::Parse(parse) = err else {
        panic!("expected parse error, got {err:?}");
    };
    assert_eq!(parse.line, 2);
}

#[test]
fn test_empty_source_yields_empty_report() {
    let report = analyze_cpp("");
    assert!(report.units.is_empty());
    assert_eq!(report.summary.units, 0);
    assert_eq!(report.summary.total_cyclomatic, 0);
}

fn else_if_ladder(arms: usize) -> String {
    let mut source = String::from("int ladder(int x) {\n    if (x == 0) return 0;\n");
    for i in 1..arms {
        source.push_str(&format!("    else if (x == {i}) return {i};\n"));
    }
    source.push_str("    return -1;\n}\n");
    source
}

#[test]
fn test_long_else_if_ladder_is_flat() {
    let report = analyze_c(&else_if_ladder(5000));
    let unit = only_unit(&report);
    assert_eq!(unit.branches, 5000);
    assert_eq!(unit.cyclomatic, 5001);
    assert_eq!(unit.max_nesting, 1);
}

#[test]
fn test_very_long_expression_is_analyzed() {
    let terms = vec!["1"; 20_000].join(" + ");
    let report = analyze_c(&format!("int sum(void) {{\n    return {terms};\n}}\n"));
    let unit = only_unit(&report);
    assert_eq!(unit.cyclomatic, 1);
    assert_eq!(unit.statements, 1);
}

#[test]
fn test_batch_survives_deep_sources() {
    let units = vec![
        SourceUnit::new(Language::C, else_if_ladder(5000)),
        SourceUnit::new(Language::C, "int ok(void) { return 0; }\n"),
    ];
    let outcomes = analyze_batch(&units, &AnalysisConfig::default());
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.is_ok()));
}
