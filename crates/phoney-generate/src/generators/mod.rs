//! Generator registry: named value producers addressed by placeholders.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::errors::GeneratorError;
use crate::params::{ParamError, ParamMap, ParamSpec, validate_params};
use crate::suggest::nearest_names;

pub mod faker;
pub mod locales;
pub mod primitives;

pub use locales::LocaleKey;

/// A single generated value, before it is placed into a document.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    List(Vec<GeneratedValue>),
}

impl GeneratedValue {
    /// JSON form used when the value fills a whole leaf.
    pub fn into_json(self) -> Value {
        match self {
            GeneratedValue::Null => Value::Null,
            GeneratedValue::Bool(value) => Value::Bool(value),
            GeneratedValue::Int(value) => Value::Number(value.into()),
            GeneratedValue::Float(value) => Number::from_f64(value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            GeneratedValue::List(values) => {
                Value::Array(values.into_iter().map(GeneratedValue::into_json).collect())
            }
            other => Value::String(other.to_string()),
        }
    }
}

impl fmt::Display for GeneratedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratedValue::Null => Ok(()),
            GeneratedValue::Bool(value) => write!(f, "{value}"),
            GeneratedValue::Int(value) => write!(f, "{value}"),
            GeneratedValue::Float(value) => write!(f, "{value}"),
            GeneratedValue::Text(value) => f.write_str(value),
            GeneratedValue::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            GeneratedValue::Time(value) => write!(f, "{}", value.format("%H:%M:%S")),
            GeneratedValue::Timestamp(value) => write!(f, "{}", value.format("%Y-%m-%dT%H:%M:%S")),
            GeneratedValue::List(values) => {
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
        }
    }
}

/// Settings visible to a generator during one invocation.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorContext {
    pub locale: LocaleKey,
    /// Anchor for relative date expressions.
    pub today: NaiveDate,
}

pub trait Generator: Send + Sync {
    fn id(&self) -> &'static str;

    /// Family shown in the catalog, e.g. `person` or `internet`.
    fn provider(&self) -> &'static str;

    fn params(&self) -> &'static [ParamSpec] {
        &[]
    }

    fn generate(
        &self,
        ctx: &GeneratorContext,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError>;
}

/// Catalog entry describing one generator.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorInfo {
    pub name: &'static str,
    pub provider: &'static str,
    pub params: Vec<ParamInfo>,
    pub aliases: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParamInfo {
    pub key: &'static str,
    pub kind: &'static str,
    pub required: bool,
}

/// Read-only after construction; shared across worker threads.
pub struct GeneratorRegistry {
    generators: BTreeMap<&'static str, Box<dyn Generator>>,
    aliases: BTreeMap<&'static str, &'static str>,
}

const ALIASES: &[(&str, &str)] = &[
    ("full_name", "name"),
    ("person", "name"),
    ("username", "user_name"),
    ("user", "user_name"),
    ("mail", "email"),
    ("phone", "phone_number"),
    ("telephone", "phone_number"),
    ("mobile", "cell_number"),
    ("street", "street_address"),
    ("zip", "zipcode"),
    ("postal", "postcode"),
    ("website", "url"),
    ("domain", "domain_name"),
    ("ip", "ipv4"),
    ("datetime", "date_time"),
    ("timestamp", "unix_time"),
    ("number", "random_int"),
    ("integer", "random_int"),
    ("float", "pyfloat"),
    ("decimal", "pydecimal"),
    ("profession", "job"),
    ("color", "color_name"),
    ("uuid", "uuid4"),
    ("guid", "uuid4"),
    ("bool", "pybool"),
];

impl GeneratorRegistry {
    /// Registry with every built-in generator and alias.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        faker::register(&mut registry);
        primitives::register(&mut registry);
        for &(alias, target) in ALIASES {
            registry.register_alias(alias, target);
        }
        registry
    }

    pub fn empty() -> Self {
        Self {
            generators: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }

    pub fn register_generator(&mut self, generator: Box<dyn Generator>) {
        self.generators.insert(generator.id(), generator);
    }

    /// Register `alias` for an existing generator. Unknown targets are ignored.
    pub fn register_alias(&mut self, alias: &'static str, target: &'static str) {
        if self.generators.contains_key(target) && !self.generators.contains_key(alias) {
            self.aliases.insert(alias, target);
        }
    }

    pub fn generator(&self, id: &str) -> Option<&dyn Generator> {
        self.generators.get(id).map(|generator| generator.as_ref())
    }

    /// Resolve a placeholder name to a generator.
    ///
    /// Names are matched case-insensitively with `-` and spaces read as `_`,
    /// first against canonical ids, then aliases. A dotted name such as
    /// `person.first_name` falls back to its last segment.
    pub fn resolve(&self, name: &str) -> Option<&dyn Generator> {
        let normalized = normalize_name(name);
        if let Some(found) = self.lookup(&normalized) {
            return Some(found);
        }
        let (_, last) = normalized.rsplit_once('.')?;
        self.lookup(last)
    }

    fn lookup(&self, name: &str) -> Option<&dyn Generator> {
        self.generator(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|target| self.generator(target))
        })
    }

    /// Invoke `generator` with a random stream seeded from `seed`.
    ///
    /// Parameters are checked against the generator's declared specs first.
    /// A panicking generator is reported as [`GeneratorError::Failed`].
    pub fn invoke(
        &self,
        generator: &dyn Generator,
        ctx: &GeneratorContext,
        seed: u64,
        params: &Map<String, Value>,
    ) -> Result<GeneratedValue, GeneratorError> {
        let params = validate_params(params, generator.params(), generator.id())?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        catch_unwind(AssertUnwindSafe(|| {
            generator.generate(ctx, &params, &mut rng)
        }))
        .unwrap_or_else(|panic| Err(GeneratorError::Failed(panic_message(panic))))
    }

    /// Known names closest to `name`, best match first.
    pub fn suggest(&self, name: &str, limit: usize) -> Vec<String> {
        let candidates = self
            .generators
            .keys()
            .chain(self.aliases.keys())
            .copied();
        nearest_names(&normalize_name(name), candidates, limit)
    }

    pub fn generator_ids(&self) -> Vec<&'static str> {
        self.generators.keys().copied().collect()
    }

    pub fn catalog(&self) -> Vec<GeneratorInfo> {
        self.generators
            .values()
            .map(|generator| GeneratorInfo {
                name: generator.id(),
                provider: generator.provider(),
                params: generator
                    .params()
                    .iter()
                    .map(|spec| ParamInfo {
                        key: spec.key,
                        kind: spec.kind.as_str(),
                        required: spec.required,
                    })
                    .collect(),
                aliases: self
                    .aliases
                    .iter()
                    .filter(|(_, target)| **target == generator.id())
                    .map(|(alias, _)| *alias)
                    .collect(),
            })
            .collect()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Integer parameter with a default, checked against an inclusive range.
pub(crate) fn bounded(
    params: &ParamMap<'_>,
    key: &str,
    default: i64,
    min: i64,
    max: i64,
) -> Result<usize, GeneratorError> {
    let value = params.get_i64(key).unwrap_or(default);
    if !(min..=max).contains(&value) {
        return Err(constraint(format!("{key} must be between {min} and {max}")));
    }
    Ok(value as usize)
}

pub(crate) fn constraint(message: impl Into<String>) -> GeneratorError {
    GeneratorError::Params(ParamError::Constraint(message.into()))
}

fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic during generation".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> GeneratorContext {
        GeneratorContext {
            locale: LocaleKey::EnUs,
            today: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        }
    }

    struct Panicking;

    impl Generator for Panicking {
        fn id(&self) -> &'static str {
            "panicking"
        }

        fn provider(&self) -> &'static str {
            "test"
        }

        fn generate(
            &self,
            _ctx: &GeneratorContext,
            _params: &ParamMap<'_>,
            _rng: &mut dyn RngCore,
        ) -> Result<GeneratedValue, GeneratorError> {
            panic!("boom")
        }
    }

    #[test]
    fn resolve_is_tolerant_of_case_separators_and_aliases() {
        let registry = GeneratorRegistry::new();
        assert_eq!(registry.resolve("FIRST_NAME").unwrap().id(), "first_name");
        assert_eq!(registry.resolve("first-name").unwrap().id(), "first_name");
        assert_eq!(registry.resolve("phone").unwrap().id(), "phone_number");
        assert_eq!(registry.resolve("person.first_name").unwrap().id(), "first_name");
        assert!(registry.resolve("bogus_gen").is_none());
    }

    #[test]
    fn invoke_is_deterministic_for_a_seed() {
        let registry = GeneratorRegistry::new();
        let generator = registry.resolve("name").unwrap();
        let params = Map::new();
        let first = registry.invoke(generator, &ctx(), 7, &params).unwrap();
        let second = registry.invoke(generator, &ctx(), 7, &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invoke_rejects_undeclared_params() {
        let registry = GeneratorRegistry::new();
        let generator = registry.resolve("random_int").unwrap();
        let mut params = Map::new();
        params.insert("invalid_param".to_string(), Value::Bool(true));
        let err = registry.invoke(generator, &ctx(), 1, &params).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::Params(ParamError::UnknownKey { .. })
        ));
    }

    #[test]
    fn invoke_contains_panics() {
        let mut registry = GeneratorRegistry::empty();
        registry.register_generator(Box::new(Panicking));
        let generator = registry.resolve("panicking").unwrap();
        let err = registry.invoke(generator, &ctx(), 1, &Map::new()).unwrap_err();
        assert!(matches!(err, GeneratorError::Failed(message) if message == "boom"));
    }

    #[test]
    fn suggest_covers_aliases_and_canonical_names() {
        let registry = GeneratorRegistry::new();
        let suggestions = registry.suggest("frist_name", 3);
        assert_eq!(suggestions.first().map(String::as_str), Some("first_name"));
        assert!(suggestions.len() <= 3);
    }

    #[test]
    fn catalog_lists_aliases_with_their_target() {
        let registry = GeneratorRegistry::new();
        let catalog = registry.catalog();
        let uuid = catalog.iter().find(|info| info.name == "uuid4").unwrap();
        assert!(uuid.aliases.contains(&"guid"));
        assert_eq!(catalog.len(), registry.generator_ids().len());
    }

    #[test]
    fn display_joins_lists_and_formats_dates() {
        let value = GeneratedValue::List(vec![
            GeneratedValue::Text("a".to_string()),
            GeneratedValue::Int(2),
        ]);
        assert_eq!(value.to_string(), "a, 2");
        let date = GeneratedValue::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(date.to_string(), "2024-01-05");
        assert_eq!(date.into_json(), Value::String("2024-01-05".to_string()));
    }
}
