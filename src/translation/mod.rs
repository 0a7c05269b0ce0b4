/*!
 * Batch translation of subtitle text through a remote text service.
 *
 * - `batch`: grouping entries into batches and driving them in order
 * - `core`: the translation client with its bounded retry loop
 * - `rate_limiter`: minimum spacing between outgoing requests
 * - `prompts`: the prompt embedding each batch
 * - `response`: extracting and validating the returned JSON array
 * - `reassembly`: merging translations back into entries
 * - `formatting`: cleanup of inline override tags before translation
 */

// Re-export main types for easier usage
pub use self::batch::{BatchTranslator, split_into_batches};
pub use self::core::{AttemptOutcome, TranslationService};
pub use self::prompts::PromptTemplate;
pub use self::rate_limiter::RateLimiter;
pub use self::reassembly::Reassembler;

// Submodules
pub mod batch;
pub mod core;
pub mod formatting;
pub mod prompts;
pub mod rate_limiter;
pub mod reassembly;
pub mod response;
