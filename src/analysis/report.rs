//! Report assembly
//!
//! Pure functions from a model reply (or an error message) to the display
//! structures the templates render.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::extractor::{extract_sections, strip_header_colon, ExtractionMode};
use super::formatter::format_section;
use super::markers::SectionMarker;
use super::NO_INFORMATION;

/// Raw model reply for one uploaded document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDocument {
    pub analysis_text: String,
    pub file_name: String,
    pub completed_at: DateTime<Utc>,
}

impl AnalysisDocument {
    pub fn new(analysis_text: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            analysis_text: analysis_text.into(),
            file_name: file_name.into(),
            completed_at: Utc::now(),
        }
    }
}

/// One section ready for display. `html` is already escaped.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedSection {
    pub marker: SectionMarker,
    pub html: String,
    /// True when the section shows the "No information found." sentinel
    pub is_empty: bool,
}

impl RenderedSection {
    pub fn title(&self) -> &'static str {
        self.marker.title()
    }

    pub fn icon(&self) -> &'static str {
        self.marker.icon()
    }

    pub fn css_class(&self) -> &'static str {
        self.marker.css_class()
    }
}

/// The four sections in fixed order plus footer metadata.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub sections: Vec<RenderedSection>,
    pub file_name: String,
    pub completed_at: String,
}

/// Standalone error display; replaces the report entirely.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorView {
    pub icon: &'static str,
    pub message: String,
}

/// How a reply is sliced before formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOptions {
    pub mode: ExtractionMode,
    /// Drop the `:` a `HEADER:` line leaves at the start of each section
    pub strip_header_colon: bool,
}

impl From<ExtractionMode> for ReportOptions {
    fn from(mode: ExtractionMode) -> Self {
        Self {
            mode,
            strip_header_colon: false,
        }
    }
}

pub fn render_report(document: &AnalysisDocument, options: impl Into<ReportOptions>) -> AnalysisReport {
    let options = options.into();
    let sections = extract_sections(&document.analysis_text, options.mode)
        .into_iter()
        .map(|section| {
            let content = if options.strip_header_colon {
                strip_header_colon(&section.content)
            } else {
                section.content.as_str()
            };
            let html = format_section(Some(content));
            RenderedSection {
                marker: section.marker,
                is_empty: html == NO_INFORMATION,
                html,
            }
        })
        .collect();

    AnalysisReport {
        sections,
        file_name: document.file_name.clone(),
        completed_at: document.completed_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    }
}

pub fn render_error(message: impl Into<String>) -> ErrorView {
    ErrorView {
        icon: "❌",
        message: message.into(),
    }
}
