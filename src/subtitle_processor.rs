use std::fmt;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use log::{warn, debug};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// @module: Subtitle import and the dual-language interval model

// @const: SRT timecode line, accepts ',' or '.' before the milliseconds
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2})[,.](\d{3})").unwrap()
});

// @const: Inline markup such as <i> or <font color=...>
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]*>").unwrap()
});

/// Separator used when two lines are merged into one sentence
pub const MERGE_SEPARATOR: &str = " ";

// @struct: One cue of a single-language SRT file
#[derive(Debug, Clone, PartialEq)]
pub struct SrtCue {
    // @field: Sequence number after parsing (1-based, renumbered)
    pub seq_num: usize,

    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Cue text, lines joined by a space, tags removed
    pub text: String,
}

impl SrtCue {
    pub fn new(seq_num: usize, start: f64, end: f64, text: impl Into<String>) -> Self {
        Self { seq_num, start, end, text: text.into() }
    }

    /// Length of the time range shared with another cue, zero when disjoint
    pub fn overlap_with(&self, other: &SrtCue) -> f64 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end - start).max(0.0)
    }
}

impl fmt::Display for SrtCue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", format_timestamp(self.start), format_timestamp(self.end))?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// A subtitle interval carrying both languages.
///
/// `id` is stable for the lifetime of the line: merges of other lines never
/// touch it, and a merge keeps the left line's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtitle {
    pub id: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds (exclusive)
    pub end: f64,
    pub text_primary: String,
    pub text_secondary: String,
}

impl Subtitle {
    pub fn new(
        id: impl Into<String>,
        start: f64,
        end: f64,
        text_primary: impl Into<String>,
        text_secondary: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            text_primary: text_primary.into(),
            text_secondary: text_secondary.into(),
        }
    }

    /// `start <= time < end`
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Combine this line with its successor, keeping this line's id
    pub fn merged_with(&self, next: &Subtitle) -> Subtitle {
        Subtitle {
            id: self.id.clone(),
            start: self.start,
            end: next.end,
            text_primary: join_texts(&self.text_primary, &next.text_primary),
            text_secondary: join_texts(&self.text_secondary, &next.text_secondary),
        }
    }
}

fn join_texts(left: &str, right: &str) -> String {
    format!("{}{}{}", left, MERGE_SEPARATOR, right)
}

/// Generate a fresh opaque id
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parse SRT content into cues.
///
/// Malformed blocks are skipped rather than reported: an uncovered time range
/// simply shows up as a gap during playback.
pub fn parse_srt(content: &str) -> Vec<SrtCue> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut cues = Vec::new();

    for (block_idx, block) in normalized.split("\n\n").enumerate() {
        let lines: Vec<&str> = block
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.is_empty() {
            continue;
        }

        // Numbered blocks carry the timecode on the second line; tolerate
        // files where the counter is missing.
        let (time_line_idx, caps) = match TIMESTAMP_REGEX.captures(lines[0]) {
            Some(caps) => (0, caps),
            None => match lines.get(1).and_then(|line| TIMESTAMP_REGEX.captures(line)) {
                Some(caps) => (1, caps),
                None => {
                    debug!("Skipping SRT block {} without a timecode", block_idx + 1);
                    continue;
                }
            },
        };

        let text_lines = &lines[time_line_idx + 1..];
        if text_lines.is_empty() {
            debug!("Skipping SRT block {} without text", block_idx + 1);
            continue;
        }

        let joined = text_lines.join(" ");
        let text = TAG_REGEX.replace_all(&joined, "").trim().to_string();

        let start = parse_timestamp_captures(&caps, 1);
        let end = parse_timestamp_captures(&caps, 5);

        cues.push(SrtCue::new(cues.len() + 1, start, end, text));
    }

    // Keep source order for equal starts
    cues.sort_by(|a, b| a.start.total_cmp(&b.start));

    let overlap_count = cues
        .windows(2)
        .filter(|pair| pair[0].end > pair[1].start)
        .count();
    if overlap_count > 0 {
        warn!("Found {} overlapping subtitle entries", overlap_count);
    }

    for (i, cue) in cues.iter_mut().enumerate() {
        cue.seq_num = i + 1;
    }

    cues
}

/// Parse two parallel SRT texts into the dual-language interval list
///
/// The primary file defines the timing; every primary cue is paired with the
/// secondary cue it overlaps the most.
pub fn merge_dual_srt(primary: &str, secondary: &str) -> Vec<Subtitle> {
    let primary_cues = parse_srt(primary);
    let secondary_cues = parse_srt(secondary);

    debug!(
        "Pairing {} primary cues with {} secondary cues",
        primary_cues.len(),
        secondary_cues.len()
    );

    pair_by_overlap(&primary_cues, &secondary_cues)
}

/// Pair cues by maximum positive time overlap, first candidate wins ties
pub fn pair_by_overlap(primary: &[SrtCue], secondary: &[SrtCue]) -> Vec<Subtitle> {
    primary
        .iter()
        .map(|cue| {
            let mut best_match = "";
            let mut max_overlap = 0.0;

            for candidate in secondary {
                let overlap = cue.overlap_with(candidate);
                if overlap > max_overlap {
                    max_overlap = overlap;
                    best_match = &candidate.text;
                }
            }

            Subtitle::new(generate_id(), cue.start, cue.end, cue.text.clone(), best_match)
        })
        .collect()
}

/// Read an SRT file as text
pub fn read_srt_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read subtitle file: {}", path.display()))
}

fn parse_timestamp_captures(caps: &regex::Captures, start_idx: usize) -> f64 {
    let part = |offset: usize| -> f64 {
        caps.get(start_idx + offset)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    part(0) * 3600.0 + part(1) * 60.0 + part(2) + part(3) / 1000.0
}

/// Format seconds as an SRT timestamp (HH:MM:SS,mmm)
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Format seconds as a player clock (MM:SS, hours prepended when needed)
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() { seconds.max(0.0).floor() as u64 } else { 0 };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
