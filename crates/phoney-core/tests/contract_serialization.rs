use phoney_core::{
    ErrorBody, ErrorKind, FieldPath, GenerateRequest, GenerateResponse, IssueCode,
    ValidateResponse, ValidationIssue, ValidationReport,
};
use schemars::schema_for;
use serde_json::json;

#[test]
fn generate_response_serializes_null_errors() {
    let response = GenerateResponse {
        documents: vec![json!({"name": "Jane Doe"})],
        errors: None,
        requested_count: 1,
        generated_count: 1,
        locale: "en_US".to_string(),
        seed: Some(7),
        execution_time_ms: 0,
        generator_usage: Default::default(),
    };

    let value = serde_json::to_value(&response).expect("serialize response");
    assert!(value["errors"].is_null());
    assert_eq!(value["documents"][0]["name"], "Jane Doe");
    assert_eq!(value["seed"], 7);
}

#[test]
fn validate_response_mirrors_report() {
    let mut report = ValidationReport::default();
    report.push_error(ValidationIssue::new(
        IssueCode::GeneratorNotFound,
        &FieldPath::root().key("x"),
        Some("bogus_gen"),
        "generator 'bogus_gen' not found",
    ));

    let response = ValidateResponse::from(report);
    assert!(!response.valid);
    assert_eq!(response.errors.len(), 1);
    assert_eq!(
        response.errors[0].offending_generator_name.as_deref(),
        Some("bogus_gen")
    );
}

#[test]
fn request_rejects_unknown_fields() {
    let result: Result<GenerateRequest, _> =
        serde_json::from_value(json!({"template": {}, "count": 1, "unique": true}));
    assert!(result.is_err());
}

#[test]
fn error_body_round_trips_kind() {
    let body = ErrorBody {
        kind: ErrorKind::TemplateStructureError,
        message: "count must be between 1 and 100".to_string(),
        issues: Vec::new(),
    };
    let value = serde_json::to_value(&body).expect("serialize body");
    assert_eq!(value["kind"], "template_structure_error");
}

#[test]
fn request_json_schema_names_template_field() {
    let schema = serde_json::to_value(schema_for!(GenerateRequest)).expect("serialize schema");
    assert!(schema["properties"]["template"].is_object());
    assert!(schema["properties"]["count"].is_object());
}
