/*!
 * Text cleanup applied before translation.
 *
 * Subtitle tracks extracted from containers often carry inline override
 * tags (`{\an8}`, `{\i1}`) that confuse the model and do not belong in the
 * translated block text.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::subtitle_processor::SubtitleEntry;

/// Inline override blocks: `{\an8}`, `{\pos(10,20)}`, ...
static OVERRIDE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{[^}]*\}").unwrap()
});

/// Runs of horizontal whitespace
static HORIZONTAL_SPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t]+").unwrap()
});

/// Remove override tags and collapse spacing, line by line.
/// Lines left empty by the cleanup are dropped.
pub fn strip_override_tags(text: &str) -> String {
    text.lines()
        .map(|line| {
            let stripped = OVERRIDE_TAG_REGEX.replace_all(line, "");
            HORIZONTAL_SPACE_REGEX.replace_all(&stripped, " ").trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trim every line of a translated text and drop blank ones.
/// A blank line inside an entry would end the block when written.
pub fn normalize_block_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Clean the text of every entry, leaving numbering and timing alone
pub fn clean_entries(entries: Vec<SubtitleEntry>) -> Vec<SubtitleEntry> {
    entries
        .into_iter()
        .map(|entry| SubtitleEntry {
            text: strip_override_tags(&entry.text),
            ..entry
        })
        .collect()
}
