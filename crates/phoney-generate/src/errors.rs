use phoney_core::{ErrorBody, ErrorKind, IssueCode, ValidationIssue};
use thiserror::Error;

use crate::params::ParamError;

/// Message returned to callers in place of internal failure details.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal generator failure";

/// Errors emitted by the template engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generator '{name}' not found at '{path}'")]
    GeneratorNotFound {
        path: String,
        name: String,
        suggestions: Vec<String>,
    },
    #[error("parameter error at '{path}': {message}")]
    Parameter {
        path: String,
        generator: Option<String>,
        message: String,
    },
    #[error("template structure error at '{path}': {message}")]
    TemplateStructure { path: String, message: String },
    #[error("unsupported locale '{0}'")]
    UnsupportedLocale(String),
    #[error("generator '{generator}' failed at '{path}': {message}")]
    Internal {
        path: String,
        generator: String,
        message: String,
    },
    #[error("generation cancelled")]
    Cancelled,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised by a single generator invocation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Params(#[from] ParamError),
    #[error("{0}")]
    Failed(String),
}

impl GenerationError {
    pub fn parameter(path: impl Into<String>, generator: Option<&str>, err: ParamError) -> Self {
        GenerationError::Parameter {
            path: path.into(),
            generator: generator.map(str::to_string),
            message: err.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::GeneratorNotFound { .. } => ErrorKind::GeneratorNotFound,
            GenerationError::Parameter { .. } => ErrorKind::ParameterError,
            GenerationError::TemplateStructure { .. } => ErrorKind::TemplateStructureError,
            GenerationError::UnsupportedLocale(_) => ErrorKind::UnsupportedLocale,
            GenerationError::Cancelled => ErrorKind::Cancelled,
            GenerationError::Internal { .. }
            | GenerationError::Io(_)
            | GenerationError::Json(_)
            | GenerationError::Csv(_) => ErrorKind::InternalError,
        }
    }

    /// True when the failure was caused by the submitted template or request.
    pub fn is_client_error(&self) -> bool {
        self.kind().is_client_error()
    }

    /// The structured issue describing a client error.
    pub fn to_issue(&self) -> Option<ValidationIssue> {
        let issue = match self {
            GenerationError::GeneratorNotFound {
                path,
                name,
                suggestions,
            } => ValidationIssue {
                field_path: path.clone(),
                offending_generator_name: Some(name.clone()),
                message: format!("generator '{name}' not found"),
                suggestions: suggestions.clone(),
                code: IssueCode::GeneratorNotFound,
            },
            GenerationError::Parameter {
                path,
                generator,
                message,
            } => ValidationIssue {
                field_path: path.clone(),
                offending_generator_name: generator.clone(),
                message: message.clone(),
                suggestions: Vec::new(),
                code: IssueCode::ParameterError,
            },
            GenerationError::TemplateStructure { path, message } => ValidationIssue {
                field_path: path.clone(),
                offending_generator_name: None,
                message: message.clone(),
                suggestions: Vec::new(),
                code: IssueCode::TemplateStructure,
            },
            GenerationError::UnsupportedLocale(locale) => ValidationIssue {
                field_path: "locale".to_string(),
                offending_generator_name: None,
                message: format!("unsupported locale '{locale}'"),
                suggestions: Vec::new(),
                code: IssueCode::UnsupportedLocale,
            },
            _ => return None,
        };
        Some(issue)
    }

    /// Structured body for callers. Internal details never leave the engine.
    pub fn to_error_body(&self) -> ErrorBody {
        let kind = self.kind();
        let message = if kind == ErrorKind::InternalError {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        };
        ErrorBody {
            kind,
            message,
            issues: self.to_issue().into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_error_body_hides_details() {
        let err = GenerationError::Internal {
            path: "user.email".to_string(),
            generator: "email".to_string(),
            message: "index out of bounds".to_string(),
        };
        let body = err.to_error_body();
        assert_eq!(body.kind, ErrorKind::InternalError);
        assert_eq!(body.message, INTERNAL_ERROR_MESSAGE);
        assert!(body.issues.is_empty());
        assert!(!err.is_client_error());
    }

    #[test]
    fn not_found_carries_suggestions_into_issue() {
        let err = GenerationError::GeneratorNotFound {
            path: "x".to_string(),
            name: "frist_name".to_string(),
            suggestions: vec!["first_name".to_string()],
        };
        let issue = err.to_issue().expect("client error has an issue");
        assert_eq!(issue.offending_generator_name.as_deref(), Some("frist_name"));
        assert_eq!(issue.suggestions, vec!["first_name".to_string()]);
        assert!(err.is_client_error());
    }
}
