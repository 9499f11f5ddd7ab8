//! Section extraction
//!
//! Slices the model's free-text reply into one block of text per
//! [`SectionMarker`]. Matching is plain, case-sensitive substring search.
//! A marker that cannot be found yields [`NO_INFORMATION`] for its section;
//! extraction never fails.
//!
//! Content starts right after the marker label, so a `HEADER:` line leaves
//! its colon at the front of the section. [`strip_header_colon`] removes it
//! when the caller asks for that.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::markers::SectionMarker;
use super::NO_INFORMATION;

/// How section boundaries are located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Each section runs from its marker to the first occurrence of the next
    /// marker in the fixed order. Assumes the reply lists sections in order.
    #[default]
    Sequential,
    /// All markers are located first and each section ends at whichever
    /// found marker follows it in the text.
    Positional,
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(ExtractionMode::Sequential),
            "positional" => Ok(ExtractionMode::Positional),
            other => Err(format!(
                "unknown extraction mode '{}' (expected 'sequential' or 'positional')",
                other
            )),
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMode::Sequential => f.write_str("sequential"),
            ExtractionMode::Positional => f.write_str("positional"),
        }
    }
}

/// Text belonging to one section, trimmed. Empty when the marker was found
/// but nothing followed it; [`NO_INFORMATION`] when the marker is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedSection {
    pub marker: SectionMarker,
    pub content: String,
}

/// Extract the text between `start_marker` and `end_marker`.
///
/// `end_marker = None` means "to the end of the text". If the end marker
/// does not occur after the start marker the section also runs to the end.
pub fn extract_section(text: &str, start_marker: &str, end_marker: Option<&str>) -> String {
    let Some(content_start) = content_start(text, start_marker) else {
        return NO_INFORMATION.to_string();
    };

    let rest = &text[content_start..];
    let content = match end_marker.and_then(|end| rest.find(end)) {
        Some(end) => &rest[..end],
        None => rest,
    };

    content.trim().to_string()
}

/// Extract all four sections in display order.
pub fn extract_sections(text: &str, mode: ExtractionMode) -> Vec<ExtractedSection> {
    match mode {
        ExtractionMode::Sequential => SectionMarker::ALL
            .iter()
            .map(|marker| ExtractedSection {
                marker: *marker,
                content: extract_section(text, marker.label(), marker.next().map(|m| m.label())),
            })
            .collect(),
        ExtractionMode::Positional => extract_positional(text),
    }
}

fn extract_positional(text: &str) -> Vec<ExtractedSection> {
    // (marker start, content start) for every marker present in the text
    let found: Vec<(SectionMarker, Option<(usize, usize)>)> = SectionMarker::ALL
        .iter()
        .map(|marker| {
            let span = text
                .find(marker.label())
                .and_then(|start| content_start(text, marker.label()).map(|content| (start, content)));
            (*marker, span)
        })
        .collect();

    found
        .iter()
        .map(|(marker, span)| {
            let content = match span {
                None => NO_INFORMATION.to_string(),
                Some((_, content_start)) => {
                    let end = found
                        .iter()
                        .filter_map(|(_, other)| other.map(|(start, _)| start))
                        .filter(|start| *start >= *content_start)
                        .min()
                        .unwrap_or(text.len());
                    text[*content_start..end].trim().to_string()
                }
            };
            ExtractedSection { marker: *marker, content }
        })
        .collect()
}

/// Drop one leading `:` left over from a `HEADER:` line and re-trim.
///
/// The sentinel and colon-free content pass through unchanged.
pub fn strip_header_colon(content: &str) -> &str {
    match content.strip_prefix(':') {
        Some(rest) => rest.trim(),
        None => content,
    }
}

/// Byte offset just past the first occurrence of `marker`.
fn content_start(text: &str, marker: &str) -> Option<usize> {
    if marker.is_empty() {
        return None;
    }
    Some(text.find(marker)? + marker.len())
}
