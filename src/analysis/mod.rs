//! Analysis report pipeline
//!
//! Turns the model's unstructured reply into a fixed four-section report.
//!
//! ## Stages
//! 1. `extractor` - slice the reply at the section markers
//! 2. `formatter` - bullets to lists, line breaks to `<br>`, everything escaped
//! 3. `report` - assemble sections and footer, or an error view
//!
//! None of these stages can fail: missing data degrades to [`NO_INFORMATION`].

pub mod extractor;
pub mod formatter;
pub mod markers;
pub mod report;

/// Shown for any section the model reply does not cover.
pub const NO_INFORMATION: &str = "No information found.";

pub use extractor::{extract_section, extract_sections, strip_header_colon, ExtractedSection, ExtractionMode};
pub use formatter::{blocks_to_html, format_blocks, format_section, FormattedBlock};
pub use markers::SectionMarker;
pub use report::{
    render_error, render_report, AnalysisDocument, AnalysisReport, ErrorView, RenderedSection, ReportOptions,
};
