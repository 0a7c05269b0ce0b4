/*!
 * Integration tests for the full translation pipeline.
 *
 * Parse, batch, translate through the mock provider, reassemble and write.
 */

use anyhow::Result;
use std::sync::Arc;

use subtrans::app_controller::Controller;
use subtrans::media::FixedTrack;
use subtrans::providers::mock::{MockProvider, MockReply, MOCK_PREFIX};
use subtrans::subtitle_processor::parse_srt_string;
use crate::common;

/// Test that three entries with batch size two are translated in two requests and written
#[tokio::test]
async fn test_run_with_provider_withThreeEntries_shouldWriteTranslatedFile() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = Controller::with_config(common::test_config("French", 2))?;
    let output = controller.output_path_for(&input);
    let mock = Arc::new(MockProvider::working());

    let written = controller
        .run_with_provider(mock.clone(), &input, common::SAMPLE_SRT, &output)
        .await?;

    assert_eq!(written, temp_dir.path().join("movie_French.srt"));
    assert_eq!(mock.request_count(), 2);

    let source = parse_srt_string(common::SAMPLE_SRT);
    let translated = parse_srt_string(&std::fs::read_to_string(&written)?);
    assert_eq!(translated.len(), source.len());
    for (original, result) in source.iter().zip(&translated) {
        assert_eq!(result.seq_num, original.seq_num);
        assert_eq!(result.timeline, original.timeline);
        assert_eq!(result.text, format!("{}{}", MOCK_PREFIX, original.text));
    }
    Ok(())
}

/// Test that blank lines in a translation cannot split an entry in the written file
#[tokio::test]
async fn test_run_with_provider_withBlankLineInTranslation_shouldKeepEntryIntact() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = Controller::with_config(common::test_config("French", 10))?;
    let output = controller.output_path_for(&input);
    let mock = Arc::new(MockProvider::scripted(vec![MockReply::Text(
        r#"["Un\n\nDeux", "2", "Trois"]"#.to_string(),
    )]));

    controller.run_with_provider(mock, &input, common::SAMPLE_SRT, &output).await?;

    let written = parse_srt_string(&std::fs::read_to_string(&output)?);
    let texts: Vec<&str> = written.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["Un\nDeux", "2", "Trois"]);
    let seq: Vec<&str> = written.iter().map(|e| e.seq_num.as_str()).collect();
    assert_eq!(seq, vec!["1", "2", "3"]);
    Ok(())
}

/// Test that a failed run leaves no output file behind
#[tokio::test]
async fn test_run_with_provider_withFailingProvider_shouldNotWriteOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = Controller::with_config(common::test_config("French", 2))?;
    let output = controller.output_path_for(&input);

    let result = controller
        .run_with_provider(Arc::new(MockProvider::failing()), &input, common::SAMPLE_SRT, &output)
        .await;

    assert!(result.is_err());
    assert!(!output.exists());
    Ok(())
}

/// Test that persistent length mismatches abort the run after the attempt budget
#[tokio::test]
async fn test_run_with_provider_withLengthMismatch_shouldAbortAfterRetries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = Controller::with_config(common::test_config("French", 50))?;
    let output = controller.output_path_for(&input);
    let mock = Arc::new(MockProvider::length_mismatch());

    let result = controller.run_with_provider(mock.clone(), &input, common::SAMPLE_SRT, &output).await;

    assert!(result.is_err());
    assert_eq!(mock.request_count(), 3);
    assert!(!output.exists());
    Ok(())
}

/// Test that override tags are removed before the text reaches the provider
#[tokio::test]
async fn test_translate_subtitles_withOverrideTags_shouldStripThem() -> Result<()> {
    let controller = Controller::with_config(common::test_config("German", 10))?;
    let mock = Arc::new(MockProvider::working());
    let raw = "1\n00:00:01,000 --> 00:00:02,000\n{\\an8}Up   here\n";

    let collection = controller.translate_subtitles(mock.clone(), "clip.srt".as_ref(), raw).await?;

    assert_eq!(MockProvider::texts_from_prompt(&mock.prompts()[0]), vec!["Up here"]);
    assert_eq!(collection.entries[0].text, format!("{}Up here", MOCK_PREFIX));
    Ok(())
}

/// Test that input without subtitle blocks fails before any request
#[tokio::test]
async fn test_translate_subtitles_withNoBlocks_shouldFailWithoutRequests() -> Result<()> {
    let controller = Controller::with_config(common::test_config("German", 10))?;
    let mock = Arc::new(MockProvider::working());

    let result = controller.translate_subtitles(mock.clone(), "empty.srt".as_ref(), "nothing here\n").await;

    assert!(result.is_err());
    assert_eq!(mock.request_count(), 0);
    Ok(())
}

/// Test that an existing translation is left alone unless forced
#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipWithoutForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let existing = common::create_test_file(temp_dir.path(), "movie_French.srt", "keep me")?;
    let controller = Controller::with_config(common::test_config("French", 10))?;

    let outcome = controller.run(&input, &FixedTrack(0), false).await?;

    assert!(outcome.is_none());
    assert_eq!(std::fs::read_to_string(existing)?, "keep me");
    Ok(())
}

/// Test that subtitle files are read directly without extraction
#[tokio::test]
async fn test_load_subtitle_text_withSrtInput_shouldReadFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = Controller::with_config(common::test_config("French", 10))?;

    let text = controller.load_subtitle_text(&input, &FixedTrack(0)).await?;

    assert_eq!(text, common::SAMPLE_SRT);
    Ok(())
}

/// Test that the pipeline can be driven from synchronous code
#[test]
fn test_translate_subtitles_withBlockingRuntime_shouldTranslate() -> Result<()> {
    let controller = Controller::with_config(common::test_config("Dutch", 2))?;
    let mock = Arc::new(MockProvider::working());

    let collection = tokio_test::block_on(controller.translate_subtitles(
        mock.clone(),
        "movie.srt".as_ref(),
        common::SAMPLE_SRT,
    ))?;

    assert_eq!(collection.entries.len(), 3);
    assert_eq!(mock.request_count(), 2);
    Ok(())
}

/// Test that invalid configuration is rejected before anything runs
#[test]
fn test_with_config_withMissingApiKey_shouldFail() {
    let mut config = common::test_config("French", 10);
    config.translation.api_key.clear();

    assert!(Controller::with_config(config).is_err());
}
