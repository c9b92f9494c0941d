//! Template engine for Phoney.
//!
//! This crate turns JSON templates whose string leaves carry `{{generator}}`
//! placeholders into populated documents, in bulk and optionally seeded, and
//! validates templates without generating anything.

pub mod engine;
pub mod errors;
pub mod generators;
pub mod model;
pub mod output;
pub mod params;
pub mod seed;
pub mod suggest;
pub mod template;

pub use engine::TemplateEngine;
pub use errors::GenerationError;
pub use generators::{GeneratedValue, GeneratorRegistry, LocaleKey};
pub use model::{GenerateOptions, GenerationContext};
pub use template::{
    BulkGenerator, BulkOutput, PlaceholderToken, TemplateValidator, TemplateWalker,
    parse_placeholders,
};
