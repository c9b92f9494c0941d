use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::GenerationError;
use crate::generators::GeneratorRegistry;
use crate::model::{GenerateOptions, GenerationContext};
use crate::template::walker::{TemplateWalker, WalkOutput};

/// Documents of one batch in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkOutput {
    pub documents: Vec<Value>,
    pub generator_usage: BTreeMap<String, u64>,
}

type Slot = Option<Result<WalkOutput, GenerationError>>;

/// Generates `count` independent documents from one template.
///
/// Items are spread over scoped worker threads in contiguous chunks. The
/// first failure stops every worker and fails the batch; no partial output
/// is ever returned.
pub struct BulkGenerator<'a> {
    registry: &'a GeneratorRegistry,
    options: &'a GenerateOptions,
}

impl<'a> BulkGenerator<'a> {
    pub fn new(registry: &'a GeneratorRegistry, options: &'a GenerateOptions) -> Self {
        Self { registry, options }
    }

    pub fn generate(
        &self,
        template: &Value,
        count: usize,
        base: &GenerationContext,
    ) -> Result<BulkOutput, GenerationError> {
        self.generate_with_cancel(template, count, base, &AtomicBool::new(false))
    }

    /// Like [`generate`](Self::generate), abandoning the batch once `cancel`
    /// is set.
    pub fn generate_with_cancel(
        &self,
        template: &Value,
        count: usize,
        base: &GenerationContext,
        cancel: &AtomicBool,
    ) -> Result<BulkOutput, GenerationError> {
        let max = self.options.max_count;
        if count == 0 || count > max {
            return Err(GenerationError::TemplateStructure {
                path: "count".to_string(),
                message: format!("count must be between 1 and {max}, got {count}"),
            });
        }

        let started = Instant::now();
        let workers = self.options.concurrency.clamp(1, count);
        info!(
            count,
            workers,
            locale = %base.locale,
            seeded = base.base_seed.is_some(),
            "bulk generation started"
        );

        let walker = TemplateWalker::new(self.registry, self.options);
        let mut slots: Vec<Slot> = (0..count).map(|_| None).collect();
        let abort = AtomicBool::new(false);
        if workers == 1 {
            run_chunk(&walker, template, base, 0, &mut slots, &abort, cancel);
        } else {
            let chunk_size = count.div_ceil(workers);
            std::thread::scope(|scope| {
                for (chunk_index, chunk) in slots.chunks_mut(chunk_size).enumerate() {
                    let walker = &walker;
                    let abort = &abort;
                    scope.spawn(move || {
                        run_chunk(
                            walker,
                            template,
                            base,
                            chunk_index * chunk_size,
                            chunk,
                            abort,
                            cancel,
                        );
                    });
                }
            });
        }

        if cancel.load(Ordering::Relaxed) {
            warn!(count, "bulk generation cancelled");
            return Err(GenerationError::Cancelled);
        }

        // Slots left empty by an aborted worker only matter when no item failed.
        let mut documents = Vec::with_capacity(count);
        let mut generator_usage = BTreeMap::new();
        let mut incomplete = false;
        for (item_index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(Ok(output)) => {
                    for (generator, calls) in output.usage {
                        *generator_usage.entry(generator).or_insert(0) += calls;
                    }
                    documents.push(output.document);
                }
                Some(Err(err)) => {
                    warn!(item_index, error = %err, "bulk generation failed");
                    return Err(err);
                }
                None => incomplete = true,
            }
        }
        if incomplete {
            return Err(GenerationError::Cancelled);
        }

        info!(
            count,
            duration_ms = started.elapsed().as_millis() as u64,
            "bulk generation finished"
        );
        Ok(BulkOutput {
            documents,
            generator_usage,
        })
    }
}

/// Fill `slots` with items `first_index..`. Stops early when `abort` or
/// `cancel` is set and raises `abort` on the first failure.
fn run_chunk(
    walker: &TemplateWalker<'_>,
    template: &Value,
    base: &GenerationContext,
    first_index: usize,
    slots: &mut [Slot],
    abort: &AtomicBool,
    cancel: &AtomicBool,
) {
    for (offset, slot) in slots.iter_mut().enumerate() {
        if abort.load(Ordering::Relaxed) || cancel.load(Ordering::Relaxed) {
            return;
        }
        let item_index = first_index + offset;
        let result = walker.walk_with_usage(template, &base.for_item(item_index));
        let failed = result.is_err();
        debug!(item_index, failed, "document generated");
        *slot = Some(result);
        if failed {
            abort.store(true, Ordering::Relaxed);
        }
    }
}
