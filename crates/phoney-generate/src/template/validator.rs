use phoney_core::{DetectedField, FieldPath, IssueCode, ValidationIssue, ValidationReport};
use serde_json::{Map, Value};

use crate::errors::GenerationError;
use crate::generators::GeneratorRegistry;
use crate::model::GenerateOptions;
use crate::params::{coerce_params, validate_params};
use crate::template::parser::{PlaceholderToken, parse_placeholders};
use crate::template::{ARRAY_MIXED_MESSAGE, take_array_count};

/// Checks a template without generating anything.
///
/// Every problem becomes an entry in the report; validation never fails
/// and never invokes a generator.
pub struct TemplateValidator<'a> {
    registry: &'a GeneratorRegistry,
    options: &'a GenerateOptions,
}

impl<'a> TemplateValidator<'a> {
    pub fn new(registry: &'a GeneratorRegistry, options: &'a GenerateOptions) -> Self {
        Self { registry, options }
    }

    pub fn validate(&self, template: &Value) -> ValidationReport {
        let mut report = ValidationReport::default();
        self.visit(template, &FieldPath::root(), &mut report);
        if report.detected_fields.is_empty() {
            report.push_error(ValidationIssue::new(
                IssueCode::NoPlaceholders,
                &FieldPath::root(),
                None,
                "no placeholders found in template",
            ));
        }
        report
    }

    fn visit(&self, value: &Value, path: &FieldPath, report: &mut ValidationReport) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.visit(child, &path.key(key), report);
                }
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.visit(item, &path.index(index), report);
                }
            }
            Value::String(text) => self.check_leaf(text, path, report),
            _ => {}
        }
    }

    fn check_leaf(&self, text: &str, path: &FieldPath, report: &mut ValidationReport) {
        let tokens: Vec<PlaceholderToken<'_>> = parse_placeholders(text).collect();
        let standalone = matches!(tokens.as_slice(), [token] if token.covers(text));
        if !standalone {
            if let Some(array) = tokens.iter().find(|token| token.is_array()) {
                report.push_error(ValidationIssue::new(
                    IssueCode::TemplateStructure,
                    path,
                    Some(array.generator_name),
                    ARRAY_MIXED_MESSAGE,
                ));
            }
        }
        for token in &tokens {
            self.check_token(token, path, report);
        }
    }

    fn check_token(
        &self,
        token: &PlaceholderToken<'_>,
        path: &FieldPath,
        report: &mut ValidationReport,
    ) {
        let name = token.generator_name;
        let generator = self.registry.resolve(name);
        match generator {
            None => {
                let suggestions = self.registry.suggest(name, self.options.suggestion_limit);
                report.push_error(
                    ValidationIssue::new(
                        IssueCode::GeneratorNotFound,
                        path,
                        Some(name),
                        format!("generator '{name}' not found"),
                    )
                    .with_suggestions(suggestions),
                );
            }
            Some(generator) if name.contains('.') => {
                report.push_warning(ValidationIssue::new(
                    IssueCode::NestedReference,
                    path,
                    Some(name),
                    format!(
                        "nested reference '{name}' resolved to generator '{}'",
                        generator.id()
                    ),
                ));
            }
            Some(_) => {}
        }

        let mut params = match coerce_params(token.raw_params.iter().copied()) {
            Ok(params) => Some(params),
            Err(err) => {
                report.push_error(ValidationIssue::new(
                    IssueCode::ParameterError,
                    path,
                    Some(name),
                    err.to_string(),
                ));
                None
            }
        };

        let mut array_count = None;
        if token.is_array() {
            if let Some(params) = params.as_mut() {
                match take_array_count(params, self.options.max_array_count, path, name) {
                    Ok(count) => {
                        array_count = Some(count as i64);
                        if count > self.options.array_warn_threshold {
                            report.push_warning(ValidationIssue::new(
                                IssueCode::LargeArray,
                                path,
                                Some(name),
                                format!("array count {count} is large and may slow generation"),
                            ));
                        }
                    }
                    Err(err) => report.push_error(count_issue(&err, path, name)),
                }
            }
        }

        if let (Some(generator), Some(params)) = (generator, params.as_ref()) {
            if let Err(err) = validate_params(params, generator.params(), generator.id()) {
                report.push_error(ValidationIssue::new(
                    IssueCode::ParameterError,
                    path,
                    Some(name),
                    err.to_string(),
                ));
            }
        }

        report.push_field(DetectedField {
            field_path: path.to_string(),
            generator: name.to_string(),
            kind: token.kind,
            parameters: params.unwrap_or_else(Map::new),
            array_count,
        });
    }
}

fn count_issue(err: &GenerationError, path: &FieldPath, generator: &str) -> ValidationIssue {
    let code = match err {
        GenerationError::TemplateStructure { .. } => IssueCode::TemplateStructure,
        _ => IssueCode::InvalidArrayCount,
    };
    let message = match err {
        GenerationError::Parameter { message, .. }
        | GenerationError::TemplateStructure { message, .. } => message.clone(),
        other => other.to_string(),
    };
    ValidationIssue::new(code, path, Some(generator), message)
}
