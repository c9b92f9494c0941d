use std::collections::BTreeMap;

use phoney_core::FieldPath;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{Map, Value};
use tracing::error;

use crate::errors::{GenerationError, GeneratorError};
use crate::generators::{GeneratedValue, Generator, GeneratorContext, GeneratorRegistry};
use crate::model::{GenerateOptions, GenerationContext};
use crate::params::coerce_params;
use crate::seed;
use crate::template::parser::{PlaceholderToken, parse_placeholders};
use crate::template::{ARRAY_MIXED_MESSAGE, take_array_count};

/// Populated document plus per-generator invocation counts.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkOutput {
    pub document: Value,
    pub usage: BTreeMap<String, u64>,
}

/// Fills one document from a template by structural recursion.
pub struct TemplateWalker<'a> {
    registry: &'a GeneratorRegistry,
    options: &'a GenerateOptions,
}

/// Random stream and bookkeeping for one document.
struct ItemState {
    rng: ChaCha8Rng,
    generator_ctx: GeneratorContext,
    usage: BTreeMap<String, u64>,
}

impl ItemState {
    fn new(ctx: &GenerationContext) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(ctx.item_seed()),
            generator_ctx: GeneratorContext {
                locale: ctx.locale,
                today: ctx.reference_date,
            },
            usage: BTreeMap::new(),
        }
    }

    /// Seed for the next placeholder, in traversal order.
    fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn record(&mut self, generator: &str, calls: u64) {
        *self.usage.entry(generator.to_string()).or_insert(0) += calls;
    }
}

impl<'a> TemplateWalker<'a> {
    pub fn new(registry: &'a GeneratorRegistry, options: &'a GenerateOptions) -> Self {
        Self { registry, options }
    }

    pub fn walk(&self, template: &Value, ctx: &GenerationContext) -> Result<Value, GenerationError> {
        self.walk_with_usage(template, ctx)
            .map(|output| output.document)
    }

    pub fn walk_with_usage(
        &self,
        template: &Value,
        ctx: &GenerationContext,
    ) -> Result<WalkOutput, GenerationError> {
        let mut state = ItemState::new(ctx);
        let document = self.walk_value(template, &FieldPath::root(), &mut state)?;
        Ok(WalkOutput {
            document,
            usage: state.usage,
        })
    }

    fn walk_value(
        &self,
        value: &Value,
        path: &FieldPath,
        state: &mut ItemState,
    ) -> Result<Value, GenerationError> {
        match value {
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, child) in map {
                    out.insert(key.clone(), self.walk_value(child, &path.key(key), state)?);
                }
                Ok(Value::Object(out))
            }
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| self.walk_value(item, &path.index(index), state))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::String(text) => self.walk_string(text, path, state),
            other => Ok(other.clone()),
        }
    }

    fn walk_string(
        &self,
        text: &str,
        path: &FieldPath,
        state: &mut ItemState,
    ) -> Result<Value, GenerationError> {
        let tokens: Vec<PlaceholderToken<'_>> = parse_placeholders(text).collect();
        match tokens.as_slice() {
            [] => Ok(Value::String(text.to_string())),
            [token] if token.covers(text) && token.is_array() => {
                self.expand_array(token, path, state)
            }
            [token] if token.covers(text) => Ok(self.produce(token, path, state)?.into_json()),
            _ => {
                if let Some(array) = tokens.iter().find(|token| token.is_array()) {
                    return Err(GenerationError::TemplateStructure {
                        path: path.to_string(),
                        message: format!("{ARRAY_MIXED_MESSAGE} ('{}')", array.generator_name),
                    });
                }
                let mut rendered = String::with_capacity(text.len());
                let mut cursor = 0;
                for token in &tokens {
                    rendered.push_str(&text[cursor..token.span.start]);
                    let value = self.produce(token, path, state)?;
                    rendered.push_str(&value.to_string());
                    cursor = token.span.end;
                }
                rendered.push_str(&text[cursor..]);
                Ok(Value::String(rendered))
            }
        }
    }

    fn produce(
        &self,
        token: &PlaceholderToken<'_>,
        path: &FieldPath,
        state: &mut ItemState,
    ) -> Result<GeneratedValue, GenerationError> {
        let generator = self.resolve(token, path)?;
        let params = coerce_params(token.raw_params.iter().copied()).map_err(|err| {
            GenerationError::parameter(path.to_string(), Some(token.generator_name), err)
        })?;
        let seed = state.next_seed();
        let value = self
            .registry
            .invoke(generator, &state.generator_ctx, seed, &params)
            .map_err(|err| invocation_error(err, path, generator.id()))?;
        state.record(generator.id(), 1);
        Ok(value)
    }

    fn expand_array(
        &self,
        token: &PlaceholderToken<'_>,
        path: &FieldPath,
        state: &mut ItemState,
    ) -> Result<Value, GenerationError> {
        let generator = self.resolve(token, path)?;
        let mut params = coerce_params(token.raw_params.iter().copied()).map_err(|err| {
            GenerationError::parameter(path.to_string(), Some(token.generator_name), err)
        })?;
        let count = take_array_count(
            &mut params,
            self.options.max_array_count,
            path,
            token.generator_name,
        )?;

        let token_seed = state.next_seed();
        let mut elements = Vec::with_capacity(count);
        for index in 0..count {
            let value = self
                .registry
                .invoke(
                    generator,
                    &state.generator_ctx,
                    seed::element_seed(token_seed, index),
                    &params,
                )
                .map_err(|err| invocation_error(err, &path.index(index), generator.id()))?;
            elements.push(value.into_json());
        }
        state.record(generator.id(), count as u64);
        Ok(Value::Array(elements))
    }

    fn resolve(
        &self,
        token: &PlaceholderToken<'_>,
        path: &FieldPath,
    ) -> Result<&'a dyn Generator, GenerationError> {
        self.registry
            .resolve(token.generator_name)
            .ok_or_else(|| GenerationError::GeneratorNotFound {
                path: path.to_string(),
                name: token.generator_name.to_string(),
                suggestions: self
                    .registry
                    .suggest(token.generator_name, self.options.suggestion_limit),
            })
    }
}

fn invocation_error(err: GeneratorError, path: &FieldPath, generator: &str) -> GenerationError {
    match err {
        GeneratorError::Params(err) => {
            GenerationError::parameter(path.to_string(), Some(generator), err)
        }
        GeneratorError::Failed(message) => {
            error!(path = %path, generator, error = %message, "generator failed");
            GenerationError::Internal {
                path: path.to_string(),
                generator: generator.to_string(),
                message,
            }
        }
    }
}
