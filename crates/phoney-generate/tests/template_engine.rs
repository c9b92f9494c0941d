use std::sync::atomic::AtomicBool;

use chrono::NaiveDate;
use rand::RngCore;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

use phoney_core::{ErrorKind, IssueCode};
use phoney_generate::errors::{GeneratorError, INTERNAL_ERROR_MESSAGE};
use phoney_generate::generators::{GeneratedValue, Generator, GeneratorContext};
use phoney_generate::params::ParamMap;
use phoney_generate::{GenerateOptions, GenerationError, GeneratorRegistry, TemplateEngine};

fn options() -> GenerateOptions {
    GenerateOptions {
        reference_date: NaiveDate::from_ymd_opt(2024, 6, 1),
        concurrency: 4,
        ..GenerateOptions::default()
    }
}

fn engine() -> TemplateEngine {
    TemplateEngine::new(options())
}

fn digest(documents: &[Value]) -> String {
    let bytes = serde_json::to_vec(documents).expect("serialize documents");
    hex::encode(Sha256::digest(&bytes))
}

fn ecommerce_template() -> Value {
    json!({
        "customer": {
            "user_id": "{{uuid4}}",
            "name": "{{name}}",
            "email": "{{email}}",
            "join_date": "{{date_between:start_date=-2y,end_date=today}}",
            "address": {
                "street": "{{street_address}}",
                "city": "{{city}}",
                "zip": "{{zipcode}}"
            }
        },
        "order": {
            "products": "{{[catch_phrase]:count=3}}",
            "quantities": "{{[random_int]:count=3,min=1,max=5}}",
            "total": "{{pydecimal:left_digits=3,right_digits=2,positive=true}}",
            "status": "{{random_element:elements=pending|shipped|delivered|returned}}"
        },
        "note": "Ordered by {{first_name}} {{last_name}}",
        "version": 2,
        "active": true
    })
}

fn assert_same_shape(template: &Value, document: &Value) {
    match (template, document) {
        (Value::Object(expected), Value::Object(actual)) => {
            let expected_keys: Vec<&String> = expected.keys().collect();
            let actual_keys: Vec<&String> = actual.keys().collect();
            assert_eq!(expected_keys, actual_keys);
            for (key, child) in expected {
                assert_same_shape(child, &actual[key]);
            }
        }
        (Value::Array(expected), Value::Array(actual)) => {
            assert_eq!(expected.len(), actual.len());
            for (child, produced) in expected.iter().zip(actual) {
                assert_same_shape(child, produced);
            }
        }
        (Value::String(_), _) => {}
        (expected, actual) => assert_eq!(expected, actual),
    }
}

#[test]
fn documents_preserve_template_shape() {
    let template = ecommerce_template();
    let response = engine()
        .generate_bulk(&template, 5, None, Some(42))
        .expect("generate");
    assert_eq!(response.documents.len(), 5);
    assert_eq!(response.generated_count, 5);
    assert_eq!(response.requested_count, 5);
    assert!(response.errors.is_none());
    for document in &response.documents {
        assert_same_shape(&template, document);
        assert_eq!(document["order"]["products"].as_array().map(Vec::len), Some(3));
        assert!(document["order"]["total"].is_f64());
        assert!(document["note"].as_str().unwrap().starts_with("Ordered by "));
    }
}

#[test]
fn seeded_batches_are_byte_identical() {
    let template = ecommerce_template();
    let first = engine()
        .generate_bulk(&template, 20, Some("en_US"), Some(1234))
        .expect("first run");
    let second = engine()
        .generate_bulk(&template, 20, Some("en-us"), Some(1234))
        .expect("second run");
    assert_eq!(digest(&first.documents), digest(&second.documents));
    assert_eq!(first.generator_usage, second.generator_usage);

    let other_seed = engine()
        .generate_bulk(&template, 20, None, Some(4321))
        .expect("other seed");
    assert_ne!(digest(&first.documents), digest(&other_seed.documents));
}

#[test]
fn seeded_dates_follow_the_reference_date() {
    let template = json!({"born": "{{date_of_birth}}", "seen": "{{unix_time}}"});
    let pinned = |date| {
        TemplateEngine::new(GenerateOptions {
            reference_date: NaiveDate::from_ymd_opt(2024, 6, date),
            ..options()
        })
        .generate_bulk(&template, 5, None, Some(99))
        .expect("dated batch")
    };
    assert_eq!(pinned(1).documents, pinned(1).documents);
    assert_ne!(pinned(1).documents, pinned(2).documents);
}

#[test]
fn seeded_items_differ_from_each_other() {
    let response = engine()
        .generate_bulk(&json!({"id": "{{uuid4}}"}), 10, None, Some(7))
        .expect("generate");
    let mut ids: Vec<&str> = response
        .documents
        .iter()
        .map(|doc| doc["id"].as_str().unwrap())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 10);
}

#[test]
fn single_placeholder_keeps_numeric_type() {
    let response = engine()
        .generate_bulk(&json!({"age": "{{random_int:min=1,max=10}}"}), 10, None, None)
        .expect("generate");
    for document in response.documents {
        let age = document["age"].as_i64().expect("age is a number");
        assert!((1..=10).contains(&age));
    }
}

#[test]
fn array_placeholder_expands_inside_bulk() {
    let response = engine()
        .generate_bulk(&json!({"tags": "{{[word]:count=3}}"}), 1, None, Some(3))
        .expect("generate");
    let tags = response.documents[0]["tags"].as_array().expect("array");
    assert_eq!(tags.len(), 3);
    assert!(tags.iter().all(Value::is_string));
    assert_eq!(response.generator_usage.get("word"), Some(&3));
}

#[test]
fn count_boundaries() {
    let engine = engine();
    let template = json!({"n": "{{name}}"});
    let max = engine.options().max_count;
    for count in [0, max + 1] {
        let err = engine
            .generate_bulk(&template, count, None, None)
            .expect_err("out of range");
        assert_eq!(err.kind(), ErrorKind::TemplateStructureError);
    }
    assert_eq!(engine.generate_bulk(&template, 1, None, None).unwrap().documents.len(), 1);
    assert_eq!(
        engine.generate_bulk(&template, max, None, None).unwrap().documents.len(),
        max
    );
}

#[test]
fn unknown_generator_is_a_client_error_with_suggestions() {
    let err = engine()
        .generate_bulk(&json!({"x": "{{frist_name}}"}), 3, None, None)
        .expect_err("unknown generator");
    assert!(err.is_client_error());
    let issue = err.to_issue().expect("issue");
    assert_eq!(issue.code, IssueCode::GeneratorNotFound);
    assert_eq!(issue.field_path, "x");
    assert_eq!(issue.offending_generator_name.as_deref(), Some("frist_name"));
    assert!(issue.suggestions.contains(&"first_name".to_string()));
    assert!(issue.suggestions.len() <= 3);
}

#[test]
fn float_range_overflowing_f64_is_a_parameter_error() {
    let huge = format!("1{}.0", "0".repeat(308));
    let template = json!({"x": format!("{{{{pyfloat:min_value=-{huge},max_value={huge}}}}}")});
    let err = engine()
        .generate_bulk(&template, 1, None, Some(1))
        .expect_err("span overflows");
    assert_eq!(err.kind(), ErrorKind::ParameterError);
    assert!(err.is_client_error());
}

#[test]
fn unsupported_locale_is_rejected() {
    let err = engine()
        .generate_bulk(&json!({"n": "{{name}}"}), 1, Some("xx_XX"), None)
        .expect_err("bad locale");
    assert_eq!(err.kind(), ErrorKind::UnsupportedLocale);
}

#[test]
fn locale_is_reported_in_canonical_form() {
    let response = engine()
        .generate_bulk(&json!({"n": "{{name}}"}), 1, Some("pt-br"), Some(1))
        .expect("generate");
    assert_eq!(response.locale, "pt_BR");
    assert_eq!(response.seed, Some(1));
}

#[test]
fn validator_is_pure_and_collects_every_problem() {
    let engine = engine();
    let template = json!({
        "name": "{{name}}",
        "invalid_field": "{{nonexistent_generator}}",
        "bad_params": "{{random_int:invalid_param=true}}",
        "mixed": "x {{[word]:count=2}}"
    });
    let before = template.clone();
    let response = engine.validate_template(&template);
    assert_eq!(template, before);
    assert!(!response.valid);
    let codes: Vec<IssueCode> = response.errors.iter().map(|issue| issue.code).collect();
    assert!(codes.contains(&IssueCode::GeneratorNotFound));
    assert!(codes.contains(&IssueCode::ParameterError));
    assert!(codes.contains(&IssueCode::TemplateStructure));
    assert_eq!(response.detected_fields.len(), 4);
}

#[test]
fn validator_accepts_a_clean_template() {
    let response = engine().validate_template(&ecommerce_template());
    assert!(response.valid, "{:?}", response.errors);
    assert!(response.errors.is_empty());
}

struct FailingGenerator;

impl Generator for FailingGenerator {
    fn id(&self) -> &'static str {
        "always_fails"
    }

    fn provider(&self) -> &'static str {
        "test"
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext,
        _params: &ParamMap<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        Err(GeneratorError::Failed("backing store unavailable".to_string()))
    }
}

struct PanickingGenerator;

impl Generator for PanickingGenerator {
    fn id(&self) -> &'static str {
        "always_panics"
    }

    fn provider(&self) -> &'static str {
        "test"
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext,
        _params: &ParamMap<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        panic!("unexpected state")
    }
}

#[test]
fn generator_failures_are_internal_and_opaque() {
    let mut registry = GeneratorRegistry::new();
    registry.register_generator(Box::new(FailingGenerator));
    registry.register_generator(Box::new(PanickingGenerator));
    let engine = TemplateEngine::with_registry(registry, options());

    for template in [json!({"a": "{{always_fails}}"}), json!({"a": "{{always_panics}}"})] {
        let err = engine
            .generate_bulk(&template, 2, None, Some(1))
            .expect_err("generator failure");
        assert!(matches!(err, GenerationError::Internal { .. }));
        assert!(!err.is_client_error());
        let body = err.to_error_body();
        assert_eq!(body.kind, ErrorKind::InternalError);
        assert_eq!(body.message, INTERNAL_ERROR_MESSAGE);
    }
}

#[test]
fn cancelled_batch_returns_no_documents() {
    let cancel = AtomicBool::new(true);
    let err = engine()
        .generate_with_cancel(&json!({"n": "{{name}}"}), 10, None, Some(1), &cancel)
        .expect_err("cancelled");
    assert_eq!(err.kind(), ErrorKind::Cancelled);
}
