/*!
 * Batch translation processing.
 *
 * Entries are grouped into fixed-size batches of text, sent one batch at a
 * time in order, and merged back with a `Reassembler`.
 */

use log::{debug, info};
use std::time::Instant;

use crate::errors::{SubtitleError, TranslationError};
use crate::subtitle_processor::SubtitleEntry;

use super::core::TranslationService;
use super::reassembly::Reassembler;

/// Group entry texts into batches of at most `batch_size`.
/// Only the last batch may be shorter; no entries yields no batches.
pub fn split_into_batches(entries: &[SubtitleEntry], batch_size: usize) -> Result<Vec<Vec<String>>, SubtitleError> {
    if batch_size == 0 {
        return Err(SubtitleError::InvalidBatchSize(batch_size));
    }

    Ok(entries
        .chunks(batch_size)
        .map(|chunk| chunk.iter().map(|entry| entry.text.clone()).collect())
        .collect())
}

/// Batch translator for processing subtitle entries in batches
pub struct BatchTranslator {
    /// The translation service to use
    service: TranslationService,

    /// Maximum number of texts per request
    batch_size: usize,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(service: TranslationService, batch_size: usize) -> Self {
        Self { service, batch_size }
    }

    /// Group the entry texts into this translator's batch size
    pub fn split(&self, entries: &[SubtitleEntry]) -> Result<Vec<Vec<String>>, SubtitleError> {
        split_into_batches(entries, self.batch_size)
    }

    /// Translate all entries, one batch at a time.
    ///
    /// `progress_callback` receives (completed batches, total batches) after
    /// every accepted batch. Any terminal failure aborts the whole run and no
    /// partial result is returned.
    pub async fn translate_entries(
        &self,
        entries: &[SubtitleEntry],
        progress_callback: impl Fn(usize, usize),
    ) -> Result<Vec<SubtitleEntry>, TranslationError> {
        let batches = self.split(entries)?;
        self.translate_batches(entries, &batches, progress_callback).await
    }

    /// Translate batches produced by `split` for the same entries
    pub async fn translate_batches(
        &self,
        entries: &[SubtitleEntry],
        batches: &[Vec<String>],
        progress_callback: impl Fn(usize, usize),
    ) -> Result<Vec<SubtitleEntry>, TranslationError> {
        let total_batches = batches.len();
        info!(
            "Translating {} entries in {} batch(es) to {}",
            entries.len(),
            total_batches,
            self.service.target_language()
        );

        let mut reassembler = Reassembler::new(entries);
        for (batch_index, batch) in batches.iter().enumerate() {
            let start_time = Instant::now();
            let translations = self.service.translate_batch(batch).await?;
            reassembler.apply_batch(translations)?;

            debug!("Batch {} of {} completed in {:?}", batch_index + 1, total_batches, start_time.elapsed());
            progress_callback(batch_index + 1, total_batches);
        }

        reassembler.finish()
    }
}
