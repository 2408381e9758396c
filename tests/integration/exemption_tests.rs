//! Integration tests for exemptions and analysis configuration

use searchunused::analysis::{AnalysisOptions, Finding, Issue};
use searchunused::config::AnalysisConfig;
use searchunused::{analyze_file, analyze_source};
use std::path::PathBuf;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/java")
}

fn analyze_fixture_with(filename: &str, options: &AnalysisOptions) -> Vec<Finding> {
    analyze_file(&fixtures_path().join(filename), options).expect("Failed to analyze fixture")
}

fn options_from(config: AnalysisConfig) -> AnalysisOptions {
    AnalysisOptions::from_config(&config).expect("valid configuration")
}

fn names(findings: &[Finding]) -> Vec<&str> {
    findings.iter().map(|f| f.name.as_str()).collect()
}

// ============================================================================
// Built-in exemptions
// ============================================================================

#[test]
fn test_exemptions_fixture_is_clean() {
    let findings = analyze_fixture_with("Exemptions.java", &AnalysisOptions::default());
    assert!(findings.is_empty(), "unexpected findings: {:?}", names(&findings));
}

#[test]
fn test_injected_field_reported_on_request() {
    let options = options_from(AnalysisConfig {
        report_injected_fields: true,
        ..AnalysisConfig::default()
    });
    let findings = analyze_fixture_with("Exemptions.java", &options);
    assert_eq!(names(&findings), vec!["injected"]);
    assert_eq!(findings[0].issue, Issue::UnusedField);
    assert_eq!(findings[0].location.line, 14);
    // Removing an injection point changes the wiring; no edit is offered
    assert!(findings[0].fixes.is_empty());
}

#[test]
fn test_unread_prefixed_name_is_silent() {
    let source = "class A {\n  void f() {\n    int _scratch = compute();\n  }\n  int compute() { return 1; }\n}\n";
    let findings = analyze_source(source, &AnalysisOptions::default()).unwrap();
    assert!(findings.is_empty());
}

#[test]
fn test_read_prefixed_name_is_flagged() {
    let source = "class A {\n  int f() {\n    int _scratch = 1;\n    return _scratch;\n  }\n}\n";
    let findings = analyze_source(source, &AnalysisOptions::default()).unwrap();
    assert_eq!(names(&findings), vec!["_scratch"]);
    assert_eq!(findings[0].issue, Issue::SuppressedButUsed);
}

#[test]
fn test_suppress_warnings_on_class_covers_members() {
    let source = "@SuppressWarnings(\"unused\")\nclass A {\n  private int field;\n  void f(int p) { int x = 1; }\n}\n";
    let findings = analyze_source(source, &AnalysisOptions::default()).unwrap();
    assert!(findings.is_empty());
}

#[test]
fn test_suppress_warnings_other_value_ignored() {
    let source = "class A {\n  @SuppressWarnings(\"rawtypes\")\n  private int field;\n}\n";
    let findings = analyze_source(source, &AnalysisOptions::default()).unwrap();
    assert_eq!(names(&findings), vec!["field"]);
}

#[test]
fn test_override_parameters_exempt() {
    let source = "class A implements Runnable {\n  @Override\n  public boolean equals(Object other) { return false; }\n  public void run() {}\n}\n";
    let findings = analyze_source(source, &AnalysisOptions::default()).unwrap();
    assert!(findings.is_empty());
}

#[test]
fn test_non_private_field_not_a_candidate() {
    let source = "class A {\n  int packageField;\n  protected int inherited;\n  public int open;\n}\n";
    let findings = analyze_source(source, &AnalysisOptions::default()).unwrap();
    assert!(findings.is_empty());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_custom_prefix() {
    let options = options_from(AnalysisConfig {
        unused_name_prefix: "unused".to_string(),
        ..AnalysisConfig::default()
    });

    assert!(analyze_fixture_with("PureLocal.java", &options).is_empty());

    let findings = analyze_fixture_with("PublicParam.java", &options);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].fixes[0].description, "Rename 'times' to 'unusedTimes'");
}

#[test]
fn test_exempt_name_patterns() {
    let options = options_from(AnalysisConfig {
        exempt_name_patterns: vec!["^ignored".to_string()],
        ..AnalysisConfig::default()
    });
    assert!(analyze_fixture_with("PrivateParam.java", &options).is_empty());
}

#[test]
fn test_invalid_pattern_is_an_error() {
    let result = AnalysisOptions::from_config(&AnalysisConfig {
        exempt_name_patterns: vec!["(".to_string()],
        ..AnalysisConfig::default()
    });
    assert!(matches!(result, Err(searchunused::Error::Pattern { .. })));
}

#[test]
fn test_method_annotation_exempts_parameters() {
    let source = "class A {\n  @Callback\n  private void on(int code) {}\n}\n";

    let findings = analyze_source(source, &AnalysisOptions::default()).unwrap();
    assert_eq!(names(&findings), vec!["code"]);

    let options = options_from(AnalysisConfig {
        method_annotations_exempting_parameters: vec!["com.example.Callback".to_string()],
        ..AnalysisConfig::default()
    });
    assert!(analyze_source(source, &options).unwrap().is_empty());
}

#[test]
fn test_non_private_parameters_can_be_skipped() {
    let options = options_from(AnalysisConfig {
        check_non_private_parameters: false,
        ..AnalysisConfig::default()
    });

    assert!(analyze_fixture_with("PublicParam.java", &options).is_empty());
    // Private methods are still checked
    assert_eq!(
        names(&analyze_fixture_with("PrivateParam.java", &options)),
        vec!["ignoredValue"]
    );
}

#[test]
fn test_skipped_non_private_parameter_still_gets_dead_assignments() {
    let options = options_from(AnalysisConfig {
        check_non_private_parameters: false,
        ..AnalysisConfig::default()
    });
    let source = "class A {\n  public int f(int x) {\n    int y = x;\n    x = 2;\n    return y;\n  }\n}\n";
    let findings = analyze_source(source, &options).unwrap();
    assert_eq!(names(&findings), vec!["x"]);
    assert_eq!(findings[0].issue, Issue::DeadAssignment);
    assert_eq!(findings[0].location.line, 4);
}
