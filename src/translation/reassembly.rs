/*!
 * Positional merge of translated batches back into subtitle entries.
 */

use crate::errors::TranslationError;
use crate::subtitle_processor::SubtitleEntry;

use super::formatting::normalize_block_text;

/// Read cursor over the parsed entries.
///
/// Each applied batch replaces the text of the next `batch.len()` entries,
/// in order. Translations are normalized so they cannot contain a blank
/// line. The source slice is never modified.
#[derive(Debug)]
pub struct Reassembler<'a> {
    source: &'a [SubtitleEntry],
    cursor: usize,
    output: Vec<SubtitleEntry>,
}

impl<'a> Reassembler<'a> {
    pub fn new(source: &'a [SubtitleEntry]) -> Self {
        Self {
            source,
            cursor: 0,
            output: Vec::with_capacity(source.len()),
        }
    }

    /// Entries not yet covered by an applied batch
    pub fn remaining(&self) -> usize {
        self.source.len() - self.cursor
    }

    /// Consume the next translated batch
    pub fn apply_batch(&mut self, translations: Vec<String>) -> Result<(), TranslationError> {
        if translations.len() > self.remaining() {
            return Err(TranslationError::Misaligned(format!(
                "batch of {} translations but only {} entries remain",
                translations.len(),
                self.remaining()
            )));
        }

        let end = self.cursor + translations.len();
        self.output.extend(
            self.source[self.cursor..end]
                .iter()
                .zip(translations)
                .map(|(entry, text)| SubtitleEntry {
                    seq_num: entry.seq_num.clone(),
                    timeline: entry.timeline.clone(),
                    text: normalize_block_text(&text),
                }),
        );
        self.cursor = end;
        Ok(())
    }

    /// Finish, requiring every entry to have been translated
    pub fn finish(self) -> Result<Vec<SubtitleEntry>, TranslationError> {
        if self.cursor != self.source.len() {
            return Err(TranslationError::Misaligned(format!(
                "{} of {} entries left without a translation",
                self.remaining(),
                self.source.len()
            )));
        }
        Ok(self.output)
    }
}
