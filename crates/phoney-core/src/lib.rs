//! Core contracts shared by the Phoney template engine and its callers.
//!
//! This crate defines the request/response envelopes, structured validation
//! issues and the field path notation used to point at a location inside a
//! template document.

pub mod error;
pub mod path;
pub mod request;
pub mod validation;

pub use error::{Error, Result};
pub use path::FieldPath;
pub use request::{
    ErrorBody, ErrorKind, GenerateRequest, GenerateResponse, OutputFormat, ValidateRequest,
    ValidateResponse, parse_generate_request,
};
pub use validation::{DetectedField, IssueCode, PlaceholderKind, ValidationIssue, ValidationReport};

/// Current contract version for request/response payloads.
pub const CONTRACT_VERSION: &str = "0.1";

/// Locale used when a request does not name one.
pub const DEFAULT_LOCALE: &str = "en_US";
