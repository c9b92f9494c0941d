use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::validation::{DetectedField, ValidationIssue, ValidationReport};

/// Output encoding for generated documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

/// Bulk generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GenerateRequest {
    /// Arbitrary JSON document whose string leaves may contain placeholders.
    pub template: Value,
    /// Number of documents to produce.
    #[serde(default = "default_count")]
    pub count: usize,
    /// Locale for generated values; the engine default applies when absent.
    #[serde(default)]
    pub locale: Option<String>,
    /// Base seed; the same seed reproduces the same batch.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub format: OutputFormat,
}

impl GenerateRequest {
    pub fn new(template: Value, count: usize) -> Self {
        Self {
            template,
            count,
            locale: None,
            seed: None,
            format: OutputFormat::Json,
        }
    }
}

fn default_count() -> usize {
    1
}

/// Result of a successful bulk generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GenerateResponse {
    pub documents: Vec<Value>,
    /// Always `null` on success; structured failures use [`ErrorBody`].
    pub errors: Option<Vec<ValidationIssue>>,
    pub requested_count: usize,
    pub generated_count: usize,
    pub locale: String,
    pub seed: Option<u64>,
    pub execution_time_ms: u64,
    /// Invocation count per canonical generator name.
    #[serde(default)]
    pub generator_usage: BTreeMap<String, u64>,
}

/// Template validation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidateRequest {
    pub template: Value,
}

/// Template validation outcome. `valid` is true iff `errors` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    #[serde(default)]
    pub warnings: Vec<ValidationIssue>,
    #[serde(default)]
    pub detected_fields: Vec<DetectedField>,
}

impl From<ValidationReport> for ValidateResponse {
    fn from(report: ValidationReport) -> Self {
        Self {
            valid: report.is_ok(),
            errors: report.errors,
            warnings: report.warnings,
            detected_fields: report.detected_fields,
        }
    }
}

/// Category of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    GeneratorNotFound,
    ParameterError,
    TemplateStructureError,
    UnsupportedLocale,
    Cancelled,
    InternalError,
}

impl ErrorKind {
    /// Client errors are caused by the submitted template or settings.
    pub fn is_client_error(self) -> bool {
        !matches!(self, ErrorKind::Cancelled | ErrorKind::InternalError)
    }
}

/// Structured failure returned to callers instead of partial output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default)]
    pub issues: Vec<ValidationIssue>,
}

const REQUEST_KEYS: &[&str] = &["template", "count", "locale", "seed", "format"];

/// Parse a request payload that is either a full [`GenerateRequest`] or a bare
/// template document.
///
/// A JSON object is read as a request when it has a `template` key and every
/// other key is a request field; anything else is treated as the template.
pub fn parse_generate_request(payload: &str, default_count: usize) -> Result<GenerateRequest> {
    let value: Value = serde_json::from_str(payload)?;
    let is_request = value.as_object().is_some_and(|map| {
        map.contains_key("template") && map.keys().all(|key| REQUEST_KEYS.contains(&key.as_str()))
    });

    if is_request {
        let request: GenerateRequest = serde_json::from_value(value)?;
        return Ok(request);
    }

    if !(value.is_object() || value.is_array()) {
        return Err(Error::InvalidRequest(
            "template must be a JSON object or array".to_string(),
        ));
    }
    Ok(GenerateRequest::new(value, default_count))
}
