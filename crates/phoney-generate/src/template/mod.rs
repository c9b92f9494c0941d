//! Template processing: placeholder scanning, the tree walker that fills a
//! single document, bulk generation and side-effect-free validation.

use phoney_core::FieldPath;
use serde_json::{Map, Value};

use crate::errors::GenerationError;
use crate::params::ParamError;

mod bulk;
mod parser;
mod validator;
mod walker;

pub use bulk::{BulkGenerator, BulkOutput};
pub use parser::{PlaceholderToken, Placeholders, parse_placeholders};
pub use validator::TemplateValidator;
pub use walker::{TemplateWalker, WalkOutput};

/// Key reserved for the element count of an array placeholder.
pub const COUNT_PARAM: &str = "count";

pub(crate) const ARRAY_MIXED_MESSAGE: &str =
    "array placeholder must be the only content of its value";

/// Remove and check the `count` of an array placeholder. A missing count
/// means one element.
pub(crate) fn take_array_count(
    params: &mut Map<String, Value>,
    max: usize,
    path: &FieldPath,
    generator: &str,
) -> Result<usize, GenerationError> {
    let Some(raw) = params.remove(COUNT_PARAM) else {
        return Ok(1);
    };
    let count = match raw.as_i64() {
        Some(count) if count > 0 => count as u64,
        _ => {
            let value = match &raw {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            return Err(GenerationError::parameter(
                path.to_string(),
                Some(generator),
                ParamError::InvalidCount { value },
            ));
        }
    };
    if count > max as u64 {
        return Err(GenerationError::TemplateStructure {
            path: path.to_string(),
            message: format!("array count {count} exceeds the maximum of {max}"),
        });
    }
    Ok(count as usize)
}
