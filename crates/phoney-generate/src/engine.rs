use std::sync::atomic::AtomicBool;
use std::time::Instant;

use phoney_core::{GenerateRequest, GenerateResponse, ValidateResponse};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::GenerationError;
use crate::generators::{GeneratorRegistry, LocaleKey};
use crate::model::{GenerateOptions, GenerationContext};
use crate::template::{BulkGenerator, TemplateValidator};

/// Entry point for generating and validating templates.
pub struct TemplateEngine {
    registry: GeneratorRegistry,
    options: GenerateOptions,
}

impl TemplateEngine {
    /// Engine over the built-in generator registry.
    pub fn new(options: GenerateOptions) -> Self {
        Self::with_registry(GeneratorRegistry::new(), options)
    }

    pub fn with_registry(registry: GeneratorRegistry, options: GenerateOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate `count` documents from `template`.
    ///
    /// `locale` falls back to the configured default. With a `seed` the whole
    /// batch is reproducible as long as the reference date is fixed too:
    /// relative date generators (`date`, `date_between`, `date_of_birth`,
    /// `unix_time` and friends) count from
    /// [`GenerateOptions::reference_date`], which defaults to today in UTC.
    pub fn generate_bulk(
        &self,
        template: &Value,
        count: usize,
        locale: Option<&str>,
        seed: Option<u64>,
    ) -> Result<GenerateResponse, GenerationError> {
        self.generate_with_cancel(template, count, locale, seed, &AtomicBool::new(false))
    }

    pub fn generate_request(
        &self,
        request: &GenerateRequest,
        cancel: &AtomicBool,
    ) -> Result<GenerateResponse, GenerationError> {
        self.generate_with_cancel(
            &request.template,
            request.count,
            request.locale.as_deref(),
            request.seed,
            cancel,
        )
    }

    pub fn generate_with_cancel(
        &self,
        template: &Value,
        count: usize,
        locale: Option<&str>,
        seed: Option<u64>,
        cancel: &AtomicBool,
    ) -> Result<GenerateResponse, GenerationError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let locale = self.resolve_locale(locale)?;
        let base = GenerationContext::new(locale, seed, self.options.resolved_reference_date());

        info!(run_id = %run_id, count, locale = %locale, seed, "generate request");
        let output = BulkGenerator::new(&self.registry, &self.options)
            .generate_with_cancel(template, count, &base, cancel)
            .inspect_err(|err| {
                warn!(run_id = %run_id, kind = ?err.kind(), error = %err, "generate request failed");
            })?;

        let execution_time_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            generated = output.documents.len(),
            execution_time_ms,
            "generate request finished"
        );
        Ok(GenerateResponse {
            generated_count: output.documents.len(),
            documents: output.documents,
            errors: None,
            requested_count: count,
            locale: locale.as_str().to_string(),
            seed,
            execution_time_ms,
            generator_usage: output.generator_usage,
        })
    }

    /// Validate `template` without generating data.
    pub fn validate_template(&self, template: &Value) -> ValidateResponse {
        let report = TemplateValidator::new(&self.registry, &self.options).validate(template);
        info!(
            valid = report.is_ok(),
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            fields = report.detected_fields.len(),
            "template validated"
        );
        ValidateResponse::from(report)
    }

    fn resolve_locale(&self, requested: Option<&str>) -> Result<LocaleKey, GenerationError> {
        let name = requested.unwrap_or(&self.options.default_locale);
        LocaleKey::parse(name).ok_or_else(|| GenerationError::UnsupportedLocale(name.to_string()))
    }
}
