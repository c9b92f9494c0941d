//! Placeholder parameters: coercion of raw `key=value` text into typed
//! keyword arguments, and validation against a generator's declared specs.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Parameter problems raised while coercing or validating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("parameter '{raw}' has an empty key")]
    EmptyKey { raw: String },
    #[error("parameter '{raw}' is not a key=value pair")]
    MissingSeparator { raw: String },
    #[error("{generator}: unknown parameter '{key}'")]
    UnknownKey { generator: String, key: String },
    #[error("{generator}: invalid value for parameter '{key}'")]
    InvalidValue { generator: String, key: String },
    #[error("{generator}: missing required parameter '{key}'")]
    MissingRequired { generator: String, key: String },
    #[error("array count must be a positive integer, got '{value}'")]
    InvalidCount { value: String },
    #[error("{0}")]
    Constraint(String),
}

/// Split a raw `key=value` parameter and coerce its value.
///
/// The split happens on the first `=` only. Values are coerced in the order
/// boolean (`true`/`false`, any case), integer, decimal, then string. A value
/// wrapped in matching single or double quotes always stays a string, with
/// the quotes removed.
pub fn coerce_param(raw: &str) -> Result<(String, Value), ParamError> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(ParamError::MissingSeparator {
            raw: raw.to_string(),
        });
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(ParamError::EmptyKey {
            raw: raw.to_string(),
        });
    }
    Ok((key.to_string(), coerce_value(value.trim())))
}

/// Coerce every raw parameter in order. A repeated key keeps its last value.
pub fn coerce_params<'a, I>(raw_params: I) -> Result<Map<String, Value>, ParamError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut params = Map::new();
    for raw in raw_params {
        let (key, value) = coerce_param(raw)?;
        params.insert(key, value);
    }
    Ok(params)
}

fn coerce_value(text: &str) -> Value {
    if let Some(unquoted) = strip_quotes(text) {
        return Value::String(unquoted.to_string());
    }
    if text.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if is_integer_literal(text) {
        if let Ok(value) = text.parse::<i64>() {
            return Value::Number(value.into());
        }
    }
    if is_integer_literal(text) || is_decimal_literal(text) {
        if let Some(number) = text.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(number);
        }
    }
    Value::String(text.to_string())
}

fn strip_quotes(text: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|quote| {
        text.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })
}

fn unsigned(text: &str) -> &str {
    text.strip_prefix(['+', '-']).unwrap_or(text)
}

fn is_integer_literal(text: &str) -> bool {
    let digits = unsigned(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal_literal(text: &str) -> bool {
    let Some((whole, fraction)) = unsigned(text).split_once('.') else {
        return false;
    };
    !(whole.is_empty() && fraction.is_empty())
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Bool,
    Int,
    Float,
    String,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::Bool => "bool",
            ParamKind::Int => "int",
            ParamKind::Float => "float",
            ParamKind::String => "string",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ParamSpec {
    pub key: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

impl ParamSpec {
    pub const fn new(key: &'static str, kind: ParamKind, required: bool) -> Self {
        Self {
            key,
            kind,
            required,
        }
    }
}

/// Read-only view over validated parameters.
#[derive(Clone, Copy, Debug)]
pub struct ParamMap<'a> {
    map: &'a Map<String, Value>,
}

/// Check `params` against `specs`: every key must be declared, values must
/// have the declared kind and required keys must be present.
pub fn validate_params<'a>(
    params: &'a Map<String, Value>,
    specs: &[ParamSpec],
    ctx: &str,
) -> Result<ParamMap<'a>, ParamError> {
    for (key, value) in params {
        let Some(spec) = specs.iter().find(|spec| spec.key == key.as_str()) else {
            return Err(ParamError::UnknownKey {
                generator: ctx.to_string(),
                key: key.clone(),
            });
        };
        if !kind_matches(spec.kind, value) {
            return Err(ParamError::InvalidValue {
                generator: ctx.to_string(),
                key: key.clone(),
            });
        }
    }

    for spec in specs {
        if spec.required && !params.contains_key(spec.key) {
            return Err(ParamError::MissingRequired {
                generator: ctx.to_string(),
                key: spec.key.to_string(),
            });
        }
    }

    Ok(ParamMap { map: params })
}

fn kind_matches(kind: ParamKind, value: &Value) -> bool {
    match kind {
        ParamKind::Bool => value.is_boolean(),
        ParamKind::Int => value.as_i64().is_some(),
        ParamKind::Float => value.as_f64().is_some(),
        // Values such as `42` are coerced to numbers; string params accept them verbatim.
        ParamKind::String => value.is_string() || value.is_number() || value.is_boolean(),
    }
}

impl<'a> ParamMap<'a> {
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.map.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.map.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.map.get(key).and_then(Value::as_bool)
    }

    /// String value, rendering coerced numbers and booleans back to text.
    pub fn get_text(&self, key: &str) -> Option<String> {
        match self.map.get(key)? {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            Value::Bool(value) => Some(value.to_string()),
            _ => None,
        }
    }
}
