use std::fmt;
use std::path::{Path, PathBuf};
use log::{debug, warn};

use crate::errors::{AppError, SubtitleError};
use crate::file_utils::FileManager;

// @module: Subtitle parsing and serialization

/// Marker that identifies the timeline line of a block
pub const TIMELINE_MARKER: &str = "-->";

/// Extension of the block format read and written by this module
pub const SUBTITLE_EXTENSION: &str = "srt";

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number, carried through verbatim
    pub seq_num: String,

    // @field: Verbatim "start --> end" line
    pub timeline: String,

    // @field: Subtitle text, lines joined with '\n'
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(seq_num: impl Into<String>, timeline: impl Into<String>, text: impl Into<String>) -> Self {
        SubtitleEntry {
            seq_num: seq_num.into(),
            timeline: timeline.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{}", self.timeline)?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Block being accumulated by the parser
#[derive(Default)]
struct PendingBlock {
    seq_num: Option<String>,
    timeline: Option<String>,
    lines: Vec<String>,
}

impl PendingBlock {
    fn take_entry(&mut self) -> Option<SubtitleEntry> {
        let pending = std::mem::take(self);
        pending.seq_num.map(|seq_num| SubtitleEntry {
            seq_num,
            timeline: pending.timeline.unwrap_or_default(),
            text: pending.lines.join("\n"),
        })
    }
}

fn is_sequence_number(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}

/// Parse block-format subtitle text into entries, in input order.
///
/// Lines are trimmed before classification. A block is emitted when a blank
/// line (or the end of input) follows a sequence number. Lines seen while no
/// sequence number is pending are dropped, so blocks without a numeric first
/// line disappear from the output.
pub fn parse_srt_string(content: &str) -> Vec<SubtitleEntry> {
    let mut entries = Vec::new();
    let mut pending = PendingBlock::default();
    let mut dropped_lines = 0usize;

    for (line_no, raw) in content.lines().enumerate() {
        let line = raw.trim().trim_start_matches('\u{feff}');

        if line.is_empty() {
            if let Some(entry) = pending.take_entry() {
                entries.push(entry);
            }
            continue;
        }

        if pending.seq_num.is_none() {
            if is_sequence_number(line) {
                pending.seq_num = Some(line.to_string());
            } else {
                debug!("Dropping line {} outside of a numbered block: {}", line_no + 1, line);
                dropped_lines += 1;
            }
            continue;
        }

        if pending.timeline.is_none() && line.contains(TIMELINE_MARKER) {
            pending.timeline = Some(line.to_string());
        } else {
            pending.lines.push(line.to_string());
        }
    }

    if let Some(entry) = pending.take_entry() {
        entries.push(entry);
    }

    if dropped_lines > 0 {
        warn!("Dropped {} line(s) that did not belong to a numbered subtitle block", dropped_lines);
    }

    entries
}

/// Serialize entries back to block format
pub fn to_srt_string(entries: &[SubtitleEntry]) -> String {
    entries.iter().map(ToString::to_string).collect()
}

/// Collection of subtitle entries with metadata
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create a new subtitle collection
    pub fn new(source_file: PathBuf, entries: Vec<SubtitleEntry>) -> Self {
        SubtitleCollection { source_file, entries }
    }

    /// Parse raw block text, failing when no entry could be recognized
    pub fn from_srt_string(source_file: PathBuf, content: &str) -> Result<Self, SubtitleError> {
        let entries = parse_srt_string(content);
        if entries.is_empty() {
            return Err(SubtitleError::NoEntries(source_file.display().to_string()));
        }
        Ok(Self::new(source_file, entries))
    }

    /// Render the collection in block format
    pub fn to_srt_string(&self) -> String {
        to_srt_string(&self.entries)
    }

    /// Write subtitles to an SRT file; the file only appears once fully written
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<(), AppError> {
        FileManager::write_atomically(path, &self.to_srt_string())
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
