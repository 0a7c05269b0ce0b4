use log::{debug, error, warn};
use serde_json::Value;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use crate::errors::AppError;

// @module: Subtitle stream discovery and extraction through ffprobe/ffmpeg

// @const: Upper bound for a single ffprobe run
const PROBE_TIMEOUT: Duration = Duration::from_secs(60);

// @const: Upper bound for a single ffmpeg extraction
const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(120);

/// Information about a subtitle stream inside a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrack {
    /// Absolute stream index within the container
    pub index: usize,
    /// The codec name of the stream
    pub codec_name: String,
    /// The language tag, if any
    pub language: Option<String>,
    /// The title tag, if any
    pub title: Option<String>,
}

impl SubtitleTrack {
    /// Bitmap subtitles (PGS/VobSub) cannot be rendered as text
    pub fn is_bitmap(&self) -> bool {
        matches!(
            self.codec_name.as_str(),
            "hdmv_pgs_subtitle" | "dvd_subtitle" | "dvb_subtitle" | "xsub"
        )
    }
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Language: {}, Codec: {}, Title: {}",
            self.language.as_deref().unwrap_or("unknown"),
            self.codec_name,
            self.title.as_deref().unwrap_or("No title")
        )
    }
}

/// Parse the JSON printed by `ffprobe -show_streams -select_streams s`
pub fn parse_ffprobe_streams(json: &str) -> Result<Vec<SubtitleTrack>, AppError> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(json)
        .map_err(|e| AppError::Extraction(format!("Failed to parse ffprobe output: {}", e)))?;

    let streams = match value.get("streams").and_then(|s| s.as_array()) {
        Some(streams) => streams,
        None => return Ok(Vec::new()),
    };

    let tracks = streams
        .iter()
        .filter(|stream| {
            stream
                .get("codec_type")
                .and_then(|v| v.as_str())
                .is_none_or(|kind| kind == "subtitle")
        })
        .filter_map(|stream| {
            let index = stream.get("index").and_then(|v| v.as_u64())? as usize;
            let tag = |name: &str| {
                stream
                    .get("tags")
                    .and_then(|t| t.get(name))
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())
            };
            Some(SubtitleTrack {
                index,
                codec_name: stream
                    .get("codec_name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown")
                    .to_string(),
                language: tag("language"),
                title: tag("title"),
            })
        })
        .collect();

    Ok(tracks)
}

/// List subtitle tracks in a media container
pub async fn list_subtitle_tracks<P: AsRef<Path>>(container: P) -> Result<Vec<SubtitleTrack>, AppError> {
    let container = container.as_ref();

    let ffprobe = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_streams", "-select_streams", "s"])
        .arg(container)
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(PROBE_TIMEOUT, ffprobe)
        .await
        .map_err(|_| AppError::Extraction(format!("ffprobe timed out after {:?}", PROBE_TIMEOUT)))?
        .map_err(|e| AppError::Extraction(format!("Failed to execute ffprobe: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("ffprobe failed: {}", stderr);
        return Err(AppError::Extraction(format!("ffprobe failed on {}: {}", container.display(), stderr.trim())));
    }

    parse_ffprobe_streams(&String::from_utf8_lossy(&output.stdout))
}

/// Extract one subtitle stream as block-format text
pub async fn extract_subtitle_text<P: AsRef<Path>>(container: P, stream_index: usize) -> Result<String, AppError> {
    let container = container.as_ref();
    debug!("Extracting stream {} from {}", stream_index, container.display());

    let ffmpeg = Command::new("ffmpeg")
        .args(["-nostdin", "-v", "error", "-i"])
        .arg(container)
        .args(["-map", &format!("0:{}", stream_index), "-f", "srt", "pipe:1"])
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(EXTRACTION_TIMEOUT, ffmpeg)
        .await
        .map_err(|_| AppError::Extraction(format!("ffmpeg timed out after {:?}", EXTRACTION_TIMEOUT)))?
        .map_err(|e| AppError::Extraction(format!("Failed to execute ffmpeg: {}", e)))?;

    if !output.status.success() {
        let filtered = filter_ffmpeg_stderr(&String::from_utf8_lossy(&output.stderr));
        error!("Subtitle extraction failed: {}", filtered);
        return Err(AppError::Extraction(format!("ffmpeg extraction failed: {}", filtered)));
    }

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    if text.trim().is_empty() {
        return Err(AppError::Extraction(format!(
            "Extracted output is empty, no subtitles found in stream {}",
            stream_index
        )));
    }

    Ok(text)
}

/// Keep only the meaningful lines of ffmpeg's stderr
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error".to_string()
    } else {
        meaningful.join("\n")
    }
}

/// Chooses which stream to translate
pub trait TrackSelector {
    /// Return the stream index of the chosen track
    fn select(&self, tracks: &[SubtitleTrack]) -> Result<usize, AppError>;
}

/// Always picks the given stream index
#[derive(Debug, Clone, Copy)]
pub struct FixedTrack(pub usize);

impl TrackSelector for FixedTrack {
    fn select(&self, tracks: &[SubtitleTrack]) -> Result<usize, AppError> {
        tracks
            .iter()
            .find(|t| t.index == self.0)
            .map(|t| t.index)
            .ok_or_else(|| {
                let available: Vec<String> = tracks.iter().map(|t| t.index.to_string()).collect();
                AppError::Extraction(format!(
                    "No text subtitle track with stream index {} (available: {})",
                    self.0,
                    available.join(", ")
                ))
            })
    }
}

/// Asks the user on the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractiveSelector;

impl TrackSelector for InteractiveSelector {
    fn select(&self, tracks: &[SubtitleTrack]) -> Result<usize, AppError> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        prompt_choice(tracks, stdin.lock(), stdout.lock())
    }
}

/// Print a numbered menu and read a 1-based choice until a valid one is given
pub fn prompt_choice<R: BufRead, W: Write>(
    tracks: &[SubtitleTrack],
    mut input: R,
    mut output: W,
) -> Result<usize, AppError> {
    if tracks.is_empty() {
        return Err(AppError::Extraction("No subtitle tracks to choose from".to_string()));
    }

    writeln!(output, "\nSubtitle tracks:")?;
    writeln!(output, "{}", "-".repeat(50))?;
    for (number, track) in tracks.iter().enumerate() {
        writeln!(output, "{}. {}", number + 1, track)?;
    }

    loop {
        write!(output, "\nSelect subtitle number: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(AppError::Extraction("No subtitle track selected".to_string()));
        }

        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=tracks.len()).contains(&choice) => return Ok(tracks[choice - 1].index),
            Ok(_) => writeln!(output, "Invalid selection. Please try again.")?,
            Err(_) => writeln!(output, "Please enter a valid number.")?,
        }
    }
}

/// Drop bitmap tracks, warning about each skipped one
pub fn text_tracks(tracks: Vec<SubtitleTrack>) -> Vec<SubtitleTrack> {
    let (text, bitmap): (Vec<_>, Vec<_>) = tracks.into_iter().partition(|t| !t.is_bitmap());
    for track in &bitmap {
        warn!("Skipping bitmap subtitle track {} ({})", track.index, track.codec_name);
    }
    text
}
