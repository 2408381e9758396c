//! Integration tests for the unused-declaration analysis
//!
//! These tests run the full pipeline over the Java fixtures and check which
//! declarations are reported.

use searchunused::analysis::collector::collect;
use searchunused::analysis::resolver::resolve;
use searchunused::analysis::{AnalysisOptions, Finding, Issue, SymbolKind};
use searchunused::parser::{JavaParser, Parser};
use searchunused::syntax::SourceText;
use searchunused::{analyze_file, analyze_source};
use std::path::PathBuf;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/java")
}

fn analyze_fixture(filename: &str) -> Vec<Finding> {
    let path = fixtures_path().join(filename);
    if !path.exists() {
        panic!("Fixture not found: {:?}", path);
    }
    analyze_file(&path, &AnalysisOptions::default()).expect("Failed to analyze fixture")
}

/// (name, issue, line) of every finding
fn summarize(findings: &[Finding]) -> Vec<(String, Issue, usize)> {
    findings
        .iter()
        .map(|f| (f.name.clone(), f.issue, f.location.line))
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

mod scenario_tests {
    use super::*;

    #[test]
    fn test_pure_local_reported() {
        let findings = analyze_fixture("PureLocal.java");
        assert_eq!(
            summarize(&findings),
            vec![("unused".to_string(), Issue::UnusedVariable, 5)]
        );
        assert_eq!(findings[0].symbol_kind, SymbolKind::LocalVariable);
        assert_eq!(
            findings[0].message,
            "The local variable 'unused' is never read."
        );
    }

    #[test]
    fn test_side_effecting_local_reported() {
        let findings = analyze_fixture("SideEffectLocal.java");
        assert_eq!(
            summarize(&findings),
            vec![("result".to_string(), Issue::UnusedVariable, 7)]
        );
    }

    #[test]
    fn test_private_parameter_reported() {
        let findings = analyze_fixture("PrivateParam.java");
        assert_eq!(
            summarize(&findings),
            vec![("ignoredValue".to_string(), Issue::UnusedParameter, 8)]
        );
    }

    #[test]
    fn test_public_parameter_reported() {
        let findings = analyze_fixture("PublicParam.java");
        assert_eq!(
            summarize(&findings),
            vec![("times".to_string(), Issue::UnusedParameter, 4)]
        );
    }

    #[test]
    fn test_only_second_window_reported() {
        let findings = analyze_fixture("Reassigned.java");
        assert_eq!(
            summarize(&findings),
            vec![("value".to_string(), Issue::DeadAssignment, 7)]
        );
        assert_eq!(
            findings[0].message,
            "The assignment to this local variable 'value' is never read."
        );
    }

    #[test]
    fn test_used_exempt_field_reported_as_suppressed() {
        let findings = analyze_fixture("SuppressedField.java");
        assert_eq!(
            summarize(&findings),
            vec![("_ignored".to_string(), Issue::SuppressedButUsed, 4)]
        );
        assert_eq!(findings[0].severity, Issue::SuppressedButUsed.default_severity());
    }

    #[test]
    fn test_native_method_aborts_unit() {
        assert!(analyze_fixture("NativeMethod.java").is_empty());
    }

    #[test]
    fn test_findings_carry_file() {
        let findings = analyze_fixture("PureLocal.java");
        assert!(findings[0].location.file.ends_with("PureLocal.java"));
    }
}

// ============================================================================
// Read/write classification
// ============================================================================

mod classification_tests {
    use super::*;

    #[test]
    fn test_mixed_fixture() {
        let findings = analyze_fixture("Mixed.java");
        assert_eq!(
            summarize(&findings),
            vec![
                ("hits".to_string(), Issue::UnusedField, 6),
                ("item".to_string(), Issue::UnusedVariable, 11),
                ("other".to_string(), Issue::UnusedVariable, 14),
                ("y".to_string(), Issue::DeadAssignment, 25),
                ("n".to_string(), Issue::UnusedVariable, 34),
                ("name".to_string(), Issue::UnusedParameter, 44),
            ]
        );
    }

    #[test]
    fn test_reads_are_never_reported() {
        // Every declaration here is read in each of its windows
        let source = r#"
class Reads {
    private int field = 1;

    int run(int[] values, int index) {
        int a = 1;
        int b = 2;
        values[a] = b;
        int c = 3;
        foo(c = 4);
        int d = 5;
        if (d > 0) { d = 6; }
        int e = field;
        return e + d + index;
    }

    int foo(int v) { return v; }
}
"#;
        let findings = analyze_source(source, &AnalysisOptions::default()).unwrap();
        assert!(findings.is_empty(), "unexpected findings: {:?}", summarize(&findings));
    }

    #[test]
    fn test_return_of_assignment_is_a_read() {
        let source = "class A {\n  int f() {\n    int x;\n    return x = 3;\n  }\n}\n";
        let findings = analyze_source(source, &AnalysisOptions::default()).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn test_conditional_reassignment_keeps_window() {
        let source = "class A {\n  int f(boolean c) {\n    int x = 1;\n    if (c) {\n      x = 2;\n    }\n    return x;\n  }\n}\n";
        let findings = analyze_source(source, &AnalysisOptions::default()).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn test_window_partition() {
        let source = "class A {\n  int f() {\n    int x = 0;\n    x = 1;\n    x = 2;\n    x = 3;\n    return x;\n  }\n}\n";
        let text = SourceText::new(source);
        let unit = JavaParser::new().parse(&text).unwrap();
        let options = AnalysisOptions::default();
        let collection = collect(&unit, &options).unwrap();
        let usages = resolve(&unit, &collection);
        let x = collection
            .declarations
            .iter()
            .find(|d| d.name() == "x")
            .unwrap();
        let usage = usages.get(x.symbol).unwrap();

        // Three unconditional reassignments give four windows
        assert_eq!(usage.windows.len(), 4);
        let reads: Vec<bool> = usage.windows.iter().map(|w| w.read).collect();
        assert_eq!(reads, vec![false, false, false, true]);
        assert_eq!(usage.unused_windows(), vec![0, 1, 2]);
    }

    #[test]
    fn test_inner_class_reads_outer_field() {
        let source = "class A {\n  private int shared;\n  class B {\n    int get() { return shared; }\n  }\n}\n";
        let findings = analyze_source(source, &AnalysisOptions::default()).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn test_syntax_error_is_an_error() {
        let result = analyze_source("class A { void f( { }", &AnalysisOptions::default());
        assert!(matches!(result, Err(searchunused::Error::Syntax { .. })));
    }
}
