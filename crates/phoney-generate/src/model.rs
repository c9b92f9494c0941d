use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::generators::LocaleKey;
use crate::seed;

/// Options for the template engine. Fixed for the lifetime of a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Locale used when a request does not name one.
    pub default_locale: String,
    /// Largest number of documents a single request may ask for.
    pub max_count: usize,
    /// Largest `count` accepted by an array placeholder.
    pub max_array_count: usize,
    /// Array counts above this produce a validation warning.
    pub array_warn_threshold: usize,
    /// Worker threads used for bulk generation.
    pub concurrency: usize,
    /// Suggestions attached to a "generator not found" error.
    pub suggestion_limit: usize,
    /// Anchor for relative dates such as `-30d`; the current UTC date when unset.
    pub reference_date: Option<NaiveDate>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            default_locale: phoney_core::DEFAULT_LOCALE.to_string(),
            max_count: 100,
            max_array_count: 1000,
            array_warn_threshold: 100,
            concurrency: default_concurrency(),
            suggestion_limit: 3,
            reference_date: None,
        }
    }
}

impl GenerateOptions {
    /// Anchor for relative dates. Unset means today in UTC, so seeded output
    /// containing dates changes from one day to the next.
    pub fn resolved_reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8))
        .unwrap_or(1)
}

/// Per-item generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationContext {
    pub locale: LocaleKey,
    pub base_seed: Option<u64>,
    /// Position within the batch, starting at 0.
    pub item_index: usize,
    pub reference_date: NaiveDate,
}

impl GenerationContext {
    pub fn new(locale: LocaleKey, base_seed: Option<u64>, reference_date: NaiveDate) -> Self {
        Self {
            locale,
            base_seed,
            item_index: 0,
            reference_date,
        }
    }

    /// Context for the item at `item_index` of the same batch.
    pub fn for_item(&self, item_index: usize) -> Self {
        Self { item_index, ..*self }
    }

    /// Seed for this item's random stream. Unseeded contexts draw a fresh one.
    pub fn item_seed(&self) -> u64 {
        match self.base_seed {
            Some(base) => seed::item_seed(base, self.item_index),
            None => rand::random(),
        }
    }
}
