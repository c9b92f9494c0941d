use chrono::NaiveDate;
use serde_json::{Map, json};

use phoney_generate::generators::{GeneratedValue, GeneratorContext, LocaleKey};
use phoney_generate::{GenerateOptions, GeneratorRegistry, TemplateEngine};

fn ctx(locale: LocaleKey) -> GeneratorContext {
    GeneratorContext {
        locale,
        today: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default(),
    }
}

#[test]
fn generator_ids_are_sorted_and_unique() {
    let registry = GeneratorRegistry::new();
    let ids = registry.generator_ids();
    assert!(!ids.is_empty());

    let mut sorted = ids.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(ids, sorted);
}

#[test]
fn every_generator_runs_without_params() {
    let registry = GeneratorRegistry::new();
    let params = Map::new();
    for info in registry.catalog() {
        if info.params.iter().any(|param| param.required) {
            continue;
        }
        let generator = registry.generator(info.name).expect("catalog entry resolves");
        let value = registry.invoke(generator, &ctx(LocaleKey::EnUs), 17, &params);
        assert!(value.is_ok(), "{} failed: {:?}", info.name, value);
    }
}

#[test]
fn every_locale_generates_localized_text() {
    let registry = GeneratorRegistry::new();
    let generator = registry.resolve("city").expect("city exists");
    for locale in LocaleKey::SUPPORTED {
        let value = registry
            .invoke(generator, &ctx(*locale), 3, &Map::new())
            .expect("generate city");
        assert!(matches!(value, GeneratedValue::Text(ref text) if !text.is_empty()));
    }
}

#[test]
fn common_template_vocabulary_resolves() {
    let registry = GeneratorRegistry::new();
    for name in [
        "name", "email", "phone", "uuid4", "uuid", "random_int", "pydecimal", "date_between",
        "street_address", "zipcode", "catch_phrase", "company", "job", "word", "text",
        "user_name", "url", "currency_code", "random_number", "ssn", "slug", "bool", "datetime",
    ] {
        assert!(registry.resolve(name).is_some(), "{name} should resolve");
    }
}

#[test]
fn catalog_serializes_for_listing() {
    let engine = TemplateEngine::new(GenerateOptions::default());
    let catalog = serde_json::to_value(engine.registry().catalog()).expect("serialize catalog");
    let random_int = catalog
        .as_array()
        .and_then(|entries| entries.iter().find(|entry| entry["name"] == "random_int"))
        .expect("random_int listed");
    assert_eq!(random_int["provider"], json!("number"));
    assert!(random_int["aliases"]
        .as_array()
        .is_some_and(|aliases| aliases.contains(&json!("integer"))));
}
