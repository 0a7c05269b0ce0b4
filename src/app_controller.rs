use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::{FileManager, InputKind};
use crate::media::{self, TrackSelector};
use crate::providers::{self, Provider};
use crate::subtitle_processor::{SubtitleCollection, SUBTITLE_EXTENSION};
use crate::translation::formatting;
use crate::translation::{BatchTranslator, TranslationService};

// @module: Application controller for subtitle translation

/// Stage reached by a translation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Parsed,
    Batched,
    Translating,
    Reassembled,
    Written,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Parsed => "parsed",
            Self::Batched => "batched",
            Self::Translating => "translating",
            Self::Reassembled => "reassembled",
            Self::Written => "written",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks the current stage so failures can say where they happened
#[derive(Debug)]
struct StageTracker {
    stage: PipelineStage,
}

impl StageTracker {
    fn new() -> Self {
        Self { stage: PipelineStage::Idle }
    }

    fn advance(&mut self, stage: PipelineStage) {
        debug!("Pipeline: {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    fn fail<E: fmt::Display>(&mut self, err: E) -> E {
        error!("Pipeline failed (last stage: {}): {}", self.stage, err);
        self.stage = PipelineStage::Failed;
        err
    }
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller, rejecting invalid configuration up front
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Output path for a given input
    pub fn output_path_for(&self, input_file: &Path) -> PathBuf {
        FileManager::generate_output_path(input_file, &self.config.target_language, SUBTITLE_EXTENSION)
    }

    /// Run the whole workflow for one input file.
    ///
    /// Returns the written path, or `None` when an existing translation was
    /// left in place.
    pub async fn run(
        &self,
        input_file: &Path,
        selector: &dyn TrackSelector,
        force_overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        let start_time = Instant::now();

        let output_path = self.output_path_for(input_file);
        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {}, translation already exists at {} (use -f to force overwrite)",
                input_file.display(),
                output_path.display()
            );
            return Ok(None);
        }

        let provider = providers::create_provider(&self.config.translation)?;
        let raw_text = self.load_subtitle_text(input_file, selector).await?;
        let written = self
            .run_with_provider(provider, input_file, &raw_text, &output_path)
            .await?;

        info!("Translation completed in {}.", Self::format_duration(start_time.elapsed()));
        Ok(Some(written))
    }

    /// Read a subtitle file directly, or extract the chosen stream from a container
    pub async fn load_subtitle_text(&self, input_file: &Path, selector: &dyn TrackSelector) -> Result<String> {
        match FileManager::detect_input_kind(input_file)? {
            InputKind::Subtitle => {
                info!("Detected subtitle file, skipping extraction");
                Ok(FileManager::read_to_string(input_file)?)
            }
            InputKind::Container => {
                let tracks = media::text_tracks(media::list_subtitle_tracks(input_file).await?);
                if tracks.is_empty() {
                    return Err(AppError::Extraction(format!(
                        "No text subtitle tracks found in {}",
                        input_file.display()
                    ))
                    .into());
                }

                let stream_index = selector.select(&tracks)?;
                info!("Extracting subtitle stream {}", stream_index);
                Ok(media::extract_subtitle_text(input_file, stream_index).await?)
            }
        }
    }

    /// Translate raw subtitle text and write the result to `output_path`
    pub async fn run_with_provider(
        &self,
        provider: Arc<dyn Provider>,
        source_file: &Path,
        raw_text: &str,
        output_path: &Path,
    ) -> Result<PathBuf> {
        let mut tracker = StageTracker::new();

        let result = self.translate_text(provider, source_file, raw_text, &mut tracker).await;
        let translated = result.map_err(|e| tracker.fail(e))?;

        translated
            .write_to_srt(output_path)
            .map_err(|e| tracker.fail(e))
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        tracker.advance(PipelineStage::Written);

        info!("Success: {}", output_path.display());
        tracker.advance(PipelineStage::Done);
        Ok(output_path.to_path_buf())
    }

    /// Parse, translate and reassemble, without touching the filesystem
    pub async fn translate_subtitles(
        &self,
        provider: Arc<dyn Provider>,
        source_file: &Path,
        raw_text: &str,
    ) -> Result<SubtitleCollection> {
        let mut tracker = StageTracker::new();
        let result = self.translate_text(provider, source_file, raw_text, &mut tracker).await;
        result.map_err(|e| tracker.fail(e))
    }

    async fn translate_text(
        &self,
        provider: Arc<dyn Provider>,
        source_file: &Path,
        raw_text: &str,
        tracker: &mut StageTracker,
    ) -> Result<SubtitleCollection> {
        let mut subtitles = SubtitleCollection::from_srt_string(source_file.to_path_buf(), raw_text)?;
        if self.config.translation.common.strip_formatting_tags {
            subtitles.entries = formatting::clean_entries(subtitles.entries);
        }
        tracker.advance(PipelineStage::Parsed);
        info!("Parsed {} subtitle entries", subtitles.entries.len());

        let batch_size = self.config.translation.common.batch_size;
        info!(
            "Using {} with batches of up to {} entries",
            provider.describe(),
            batch_size
        );
        let service = TranslationService::from_config(&self.config, provider);
        let translator = BatchTranslator::new(service, batch_size);
        let batches = translator.split(&subtitles.entries)?;
        tracker.advance(PipelineStage::Batched);

        let progress_bar = Self::progress_bar();
        tracker.advance(PipelineStage::Translating);
        let translated = translator
            .translate_batches(&subtitles.entries, &batches, |done, total| {
                progress_bar.set_length(total as u64);
                progress_bar.set_position(done as u64);
            })
            .await;
        progress_bar.finish_and_clear();
        let entries = translated?;
        tracker.advance(PipelineStage::Reassembled);

        Ok(SubtitleCollection::new(source_file.to_path_buf(), entries))
    }

    fn progress_bar() -> ProgressBar {
        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({percent}%) {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("=>-"));
        progress_bar
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
