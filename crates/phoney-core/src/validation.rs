use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::path::FieldPath;

/// Syntax variant of a placeholder token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    /// `{{generator}}`
    Scalar,
    /// `{{generator:key=value,...}}`
    Parameterized,
    /// `{{[generator]:count=N,...}}`
    Array,
}

/// Machine-readable category of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    GeneratorNotFound,
    ParameterError,
    InvalidArrayCount,
    TemplateStructure,
    NoPlaceholders,
    UnsupportedLocale,
    NestedReference,
    LargeArray,
}

/// Structured validation issue with location and suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationIssue {
    /// Dot/bracket path of the offending leaf (e.g. `user.contacts[0].email`).
    pub field_path: String,
    /// Generator named by the offending placeholder, when there is one.
    pub offending_generator_name: Option<String>,
    pub message: String,
    /// Nearest known generator names, best match first.
    #[serde(default)]
    pub suggestions: Vec<String>,
    pub code: IssueCode,
}

impl ValidationIssue {
    pub fn new(
        code: IssueCode,
        path: &FieldPath,
        generator: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field_path: path.to_string(),
            offending_generator_name: generator.map(str::to_string),
            message: message.into(),
            suggestions: Vec::new(),
            code,
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }
}

/// A placeholder discovered while validating a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectedField {
    pub field_path: String,
    pub generator: String,
    pub kind: PlaceholderKind,
    /// Coerced keyword parameters, excluding an array's `count`.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_count: Option<i64>,
}

/// Aggregated validation report with errors, warnings and detected fields.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub detected_fields: Vec<DetectedField>,
}

impl ValidationReport {
    /// Returns true when there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push_error(&mut self, issue: ValidationIssue) {
        self.errors.push(issue);
    }

    pub fn push_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    pub fn push_field(&mut self, field: DetectedField) {
        self.detected_fields.push(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_serializes_with_snake_case_code() {
        let issue = ValidationIssue::new(
            IssueCode::GeneratorNotFound,
            &FieldPath::root().key("x"),
            Some("bogus_gen"),
            "generator 'bogus_gen' not found",
        )
        .with_suggestions(vec!["bothify".to_string()]);

        let json = serde_json::to_value(&issue).expect("serialize issue");
        assert_eq!(json["code"], "generator_not_found");
        assert_eq!(json["field_path"], "x");
        assert_eq!(json["offending_generator_name"], "bogus_gen");
        assert_eq!(json["suggestions"][0], "bothify");
    }

    #[test]
    fn report_is_ok_only_without_errors() {
        let mut report = ValidationReport::default();
        report.push_warning(ValidationIssue::new(
            IssueCode::LargeArray,
            &FieldPath::root(),
            None,
            "large array",
        ));
        assert!(report.is_ok());

        report.push_error(ValidationIssue::new(
            IssueCode::NoPlaceholders,
            &FieldPath::root(),
            None,
            "no placeholders found in template",
        ));
        assert!(!report.is_ok());
    }
}
