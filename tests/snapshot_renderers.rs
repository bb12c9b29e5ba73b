//! Snapshot tests for output renderers.
//!
//! Each test renders a fixed stored record through a renderer and
//! compares the output against expected fixture files or content.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use coddoc::models::documentation::{ClassDoc, FunctionDoc, ParameterDoc, ReturnDoc};
use coddoc::models::review::{
    ConcernSeverity, Issue, IssueCategory, IssueSeverity, Priority, SecurityConcern, Suggestion,
};
use coddoc::models::{
    BackendName, DocumentationResult, NewRecord, RecordSummary, ReviewResult, StoredRecord,
};
use coddoc::output::OutputRenderer;
use coddoc::output::json::JsonRenderer;
use coddoc::output::terminal::TerminalRenderer;
use coddoc::providers::BackendInfo;
use coddoc::store::{Page, PageRequest};

const FIXED_ID: &str = "6f1c2d1e-8a4b-4c8e-9f00-0123456789ab";

fn fixed_id() -> Uuid {
    Uuid::parse_str(FIXED_ID).unwrap()
}

/// Standard review used across the snapshot tests.
fn test_review() -> StoredRecord<ReviewResult> {
    StoredRecord::assign(
        NewRecord {
            code: "def divide(a, b):\n    return a / b\n".into(),
            language: "python".into(),
            filename: Some("math_utils.py".into()),
            doc_style: None,
            backend: BackendName::Anthropic,
            payload: ReviewResult {
                summary: "Compact helper with an unguarded division.".into(),
                quality_score: 6.5,
                issues: vec![Issue {
                    severity: IssueSeverity::High,
                    category: IssueCategory::Bug,
                    description: "Division by zero raises ZeroDivisionError.".into(),
                    line_number: Some(2),
                    suggestion: "Check that b is non-zero before dividing.".into(),
                }],
                suggestions: vec![Suggestion {
                    title: "Add type hints".into(),
                    description: "Annotate parameters and return type.".into(),
                    code_example: Some("def divide(a: float, b: float) -> float:".into()),
                    priority: Priority::Low,
                }],
                security_concerns: vec![SecurityConcern {
                    severity: ConcernSeverity::Low,
                    title: "Unvalidated input".into(),
                    description: "Callers may pass arbitrary objects.".into(),
                    recommendation: "Validate numeric input at the boundary.".into(),
                }],
            },
        },
        fixed_id(),
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap(),
    )
}

fn test_documentation() -> StoredRecord<DocumentationResult> {
    let area = FunctionDoc {
        name: "area".into(),
        description: "Area of the rectangle.".into(),
        parameters: vec![],
        returns: ReturnDoc {
            type_name: "float".into(),
            description: "width times height".into(),
        },
        examples: vec!["Rect(2, 3).area()".into()],
    };
    StoredRecord::assign(
        NewRecord {
            code: "class Rect: ...".into(),
            language: "python".into(),
            filename: Some("shapes.py".into()),
            doc_style: Some("numpy".into()),
            backend: BackendName::Gemini,
            payload: DocumentationResult {
                overview: "Simple geometry helpers.".into(),
                functions: vec![FunctionDoc {
                    name: "scale".into(),
                    description: "Scale a rectangle.".into(),
                    parameters: vec![ParameterDoc {
                        name: "factor".into(),
                        type_name: "float".into(),
                        description: "multiplier".into(),
                    }],
                    returns: ReturnDoc {
                        type_name: "Rect".into(),
                        description: "a new rectangle".into(),
                    },
                    examples: vec![],
                }],
                classes: vec![ClassDoc {
                    name: "Rect".into(),
                    description: "Axis-aligned rectangle.".into(),
                    attributes: vec![ParameterDoc {
                        name: "width".into(),
                        type_name: "float".into(),
                        description: "horizontal size".into(),
                    }],
                    methods: vec![area],
                }],
                usage_examples: vec!["r = Rect(2, 3)\nprint(r.area())".into()],
            },
        },
        fixed_id(),
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap(),
    )
}

#[test]
fn snapshot_json_renderer() {
    let renderer = JsonRenderer;
    let output = renderer.review(&test_review());

    let actual: serde_json::Value = serde_json::from_str(&output).unwrap();
    let expected_str =
        std::fs::read_to_string("tests/fixtures/expected_review_output.json").unwrap();
    let expected: serde_json::Value = serde_json::from_str(&expected_str).unwrap();

    pretty_assertions::assert_eq!(actual, expected);
}

#[test]
fn json_review_reads_back_into_the_same_record() {
    let record = test_review();
    let output = JsonRenderer.review(&record);
    let parsed: StoredRecord<ReviewResult> = serde_json::from_str(&output).unwrap();
    pretty_assertions::assert_eq!(parsed, record);
}

#[test]
fn json_renderer_omits_missing_line_number_as_null() {
    let mut record = test_review();
    record.payload.issues[0].line_number = None;
    let value: serde_json::Value = serde_json::from_str(&JsonRenderer.review(&record)).unwrap();
    assert!(value["payload"]["issues"][0]["line_number"].is_null());
}

#[test]
fn json_renderer_empty_listing() {
    let page: Page<RecordSummary> = Page::slice(Vec::new(), PageRequest::default());
    let value: serde_json::Value =
        serde_json::from_str(&JsonRenderer.records("reviews", &page)).unwrap();
    assert_eq!(value["items"], serde_json::json!([]));
    assert_eq!(value["total"], 0);
    assert_eq!(value["page"], 1);
}

#[test]
fn json_renderer_providers_are_wrapped() {
    let backends = vec![BackendInfo {
        id: "gemini",
        display_name: "Google Gemini",
        supported_models: vec!["gemini-2.0-flash"],
        is_default: true,
    }];
    let value: serde_json::Value =
        serde_json::from_str(&JsonRenderer.providers(&backends)).unwrap();
    assert_eq!(value["providers"][0]["id"], "gemini");
    assert_eq!(value["providers"][0]["is_default"], true);
}

#[test]
fn snapshot_terminal_review() {
    colored::control::set_override(false);
    let output = TerminalRenderer.review(&test_review());

    assert!(output.contains("Review of math_utils.py (python, via anthropic)"));
    assert!(output.contains(FIXED_ID));
    assert!(output.contains("Quality 6.5/10"));
    assert!(output.contains("high bug at line 2"));
    assert!(output.contains("→ Check that b is non-zero before dividing."));
    assert!(output.contains("low Unvalidated input"));
    assert!(output.contains("     def divide(a: float, b: float) -> float:"));
    assert!(output.contains("1 issue, 1 security concern, 1 suggestion"));
}

#[test]
fn terminal_review_without_issues() {
    colored::control::set_override(false);
    let mut record = test_review();
    record.payload.issues.clear();
    record.payload.suggestions.clear();
    let output = TerminalRenderer.review(&record);

    assert!(output.contains("No issues found."));
    assert!(output.contains("0 issues, 1 security concern, 0 suggestions"));
}

#[test]
fn snapshot_terminal_documentation() {
    colored::control::set_override(false);
    let output = TerminalRenderer.documentation(&test_documentation());

    assert!(output.contains("Documentation for shapes.py (python, via gemini)"));
    assert!(output.contains("Simple geometry helpers."));
    assert!(output.contains("Functions"));
    assert!(output.contains("· factor (float) multiplier"));
    assert!(output.contains("→ Rect a new rectangle"));
    assert!(output.contains("Classes"));
    assert!(output.contains("· width horizontal size"));
    assert!(output.contains("e.g. Rect(2, 3).area()"));
    assert!(output.contains("   print(r.area())"));
    assert!(output.contains("style: numpy"));
}

#[test]
fn terminal_empty_listing() {
    colored::control::set_override(false);
    let page: Page<RecordSummary> = Page::slice(Vec::new(), PageRequest::new(3, 10).unwrap());
    let output = TerminalRenderer.records("reviews", &page);
    assert!(output.contains("No reviews found (page 3 of 1, 0 total)."));
}
