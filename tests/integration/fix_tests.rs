//! Integration tests for fix synthesis
//!
//! Every fix is applied to the fixture text and the result is checked, either
//! against the expected source or by running the analysis again.

use searchunused::analysis::{AnalysisOptions, Finding, Issue};
use searchunused::{analyze_source, Fix};
use std::fs;
use std::path::PathBuf;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/java")
}

fn load_fixture(filename: &str) -> String {
    let path = fixtures_path().join(filename);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Fixture {:?}: {}", path, e))
}

fn analyze(source: &str) -> Vec<Finding> {
    analyze_source(source, &AnalysisOptions::default()).expect("Failed to analyze source")
}

fn only_finding(source: &str) -> Finding {
    let mut findings = analyze(source);
    assert_eq!(findings.len(), 1, "expected exactly one finding");
    findings.remove(0)
}

fn apply(fix: &Fix, source: &str) -> String {
    fix.apply(source).expect("Fix should apply cleanly")
}

// ============================================================================
// Scenario fixes
// ============================================================================

#[test]
fn test_pure_local_single_fix() {
    let source = load_fixture("PureLocal.java");
    let finding = only_finding(&source);
    assert_eq!(finding.fixes.len(), 1);
    assert_eq!(
        finding.fixes[0].description,
        "Remove unused local variable 'unused'"
    );

    let fixed = apply(&finding.fixes[0], &source);
    assert_eq!(fixed, source.replace("        int unused = 42;\n", ""));
}

#[test]
fn test_side_effect_local_two_fixes() {
    let source = load_fixture("SideEffectLocal.java");
    let finding = only_finding(&source);
    assert_eq!(finding.fixes.len(), 2);

    let keep = apply(&finding.fixes[0], &source);
    assert!(finding.fixes[0].description.ends_with("(keeping side effects)"));
    assert!(keep.contains("        next();\n"));
    assert!(!keep.contains("result"));

    let strip = apply(&finding.fixes[1], &source);
    assert!(finding.fixes[1].description.ends_with("(also removes side effects)"));
    assert!(strip.contains("    public void run() {\n    }\n"));
}

#[test]
fn test_private_param_removed_everywhere() {
    let source = load_fixture("PrivateParam.java");
    let finding = only_finding(&source);
    assert_eq!(finding.fixes.len(), 1);

    let fixed = apply(&finding.fixes[0], &source);
    assert!(fixed.contains("return add(1, 3) + add(4, 6);"));
    assert!(fixed.contains("private int add(int a, int c)"));
    assert!(analyze(&fixed).is_empty());
}

#[test]
fn test_public_param_renamed() {
    let source = load_fixture("PublicParam.java");
    let finding = only_finding(&source);
    assert_eq!(finding.fixes.len(), 1);
    assert_eq!(finding.fixes[0].description, "Rename 'times' to '_times'");

    let fixed = apply(&finding.fixes[0], &source);
    assert!(fixed.contains("public String greet(String name, int _times)"));
    assert!(analyze(&fixed).is_empty());
}

#[test]
fn test_dead_assignment_removed() {
    let source = load_fixture("Reassigned.java");
    let finding = only_finding(&source);
    assert_eq!(finding.fixes.len(), 1);
    assert_eq!(finding.fixes[0].description, "Remove dead assignment to 'value'");

    let fixed = apply(&finding.fixes[0], &source);
    assert_eq!(fixed, source.replace("        value = 2;\n", ""));
}

#[test]
fn test_suppressed_field_unmarked() {
    let source = load_fixture("SuppressedField.java");
    let finding = only_finding(&source);
    assert_eq!(finding.issue, Issue::SuppressedButUsed);
    assert_eq!(finding.fixes.len(), 1);
    assert_eq!(finding.fixes[0].description, "Rename '_ignored' to 'ignored'");

    let fixed = apply(&finding.fixes[0], &source);
    assert!(!fixed.contains("_ignored"));
    assert!(fixed.contains("return ignored * ignored;"));
    assert!(analyze(&fixed).is_empty());
}

#[test]
fn test_varargs_arguments_dropped() {
    let source = load_fixture("Varargs.java");
    let finding = only_finding(&source);
    assert_eq!(finding.name, "args");
    assert_eq!(finding.fixes.len(), 1);

    let fixed = apply(&finding.fixes[0], &source);
    assert!(fixed.contains("log(\"a\");\n        log(\"b\");\n        log(\"c\");"));
    assert!(fixed.contains("private void log(String message)"));
}

#[test]
fn test_mixed_surviving_reassignment_redeclared() {
    let source = load_fixture("Mixed.java");
    let findings = analyze(&source);
    let y = findings
        .iter()
        .find(|f| f.name == "y")
        .expect("y should be reported");
    assert_eq!(y.fixes.len(), 1);

    let fixed = apply(&y.fixes[0], &source);
    assert!(fixed.contains("        int y = 6;\n        if (flag) y = 7;\n"));
    assert!(!fixed.contains("int y = 5;"));
}

#[test]
fn test_compound_writes_removed_with_declaration() {
    let source = load_fixture("Mixed.java");
    let findings = analyze(&source);
    let n = findings
        .iter()
        .find(|f| f.name == "n")
        .expect("n should be reported");

    let fixed = apply(&n.fixes[0], &source);
    assert!(!fixed.contains("int n = 0;"));
    assert!(!fixed.contains("n += 2;"));
}

// ============================================================================
// Every fix removes its finding
// ============================================================================

const FIXTURES: &[&str] = &[
    "PureLocal.java",
    "SideEffectLocal.java",
    "PrivateParam.java",
    "PublicParam.java",
    "Reassigned.java",
    "SuppressedField.java",
    "Varargs.java",
    "Mixed.java",
];

#[test]
fn test_every_fix_resolves_its_finding() {
    for fixture in FIXTURES {
        let source = load_fixture(fixture);
        for finding in analyze(&source) {
            for fix in &finding.fixes {
                let fixed = apply(fix, &source);
                let after = analyze_source(&fixed, &AnalysisOptions::default()).unwrap_or_else(|e| {
                    panic!("{}: '{}' produced unparsable code: {}", fixture, fix.description, e)
                });
                assert!(
                    !after
                        .iter()
                        .any(|f| f.name == finding.name && f.issue == finding.issue),
                    "{}: '{}' did not resolve the finding\n{}",
                    fixture,
                    fix.description,
                    fixed
                );
            }
        }
    }
}

#[test]
fn test_fix_edits_do_not_overlap() {
    for fixture in FIXTURES {
        let source = load_fixture(fixture);
        for finding in analyze(&source) {
            for fix in &finding.fixes {
                for (i, a) in fix.edits.iter().enumerate() {
                    for b in &fix.edits[i + 1..] {
                        assert!(
                            !a.conflicts_with(b),
                            "{}: '{}' has conflicting edits",
                            fixture,
                            fix.description
                        );
                    }
                }
            }
        }
    }
}

// ============================================================================
// Renames that would not compile are not offered
// ============================================================================

#[test]
fn test_colliding_renames_keep_findings_without_fixes() {
    let source = "class A {\n  public void f(int count) {\n    int _count = 1;\n    System.out.println(_count);\n  }\n}\n";
    let findings = analyze(source);
    let summary: Vec<(&str, Issue, usize)> = findings
        .iter()
        .map(|f| (f.name.as_str(), f.issue, f.fixes.len()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("count", Issue::UnusedParameter, 0),
            ("_count", Issue::SuppressedButUsed, 0),
        ]
    );
}

#[test]
fn test_foreign_field_reference_blocks_rename() {
    let source = "class A {\n  private int _x;\n  int f(B b) {\n    return b._x;\n  }\n}\nclass B {\n  int _x;\n}\n";
    let finding = only_finding(source);
    assert_eq!(finding.issue, Issue::SuppressedButUsed);
    assert!(finding.fixes.is_empty());
}

#[test]
fn test_hoisted_argument_keeps_call_order() {
    let source = "class A {\n  private int total;\n  void run() {\n    add(1, next());\n    add(2, next());\n  }\n  private void add(int amount, int ignored) {\n    total += amount;\n  }\n  int next() {\n    return total;\n  }\n}\n";
    let finding = only_finding(source);
    assert_eq!(finding.name, "ignored");
    assert_eq!(finding.fixes.len(), 2);

    let keep = apply(&finding.fixes[0], source);
    assert!(keep.contains("    next();\n    add(1);\n    next();\n    add(2);\n"));
    assert!(analyze(&keep).is_empty());
}
