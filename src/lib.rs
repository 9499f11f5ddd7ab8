//! Legal Risk Analyzer
//!
//! Upload a contract (PDF or image), have a generative model review it, and
//! get back a report with four fixed sections: key points, suspicious
//! elements, risk assessment, recommendations.
//!
//! - `analysis/`: section extraction, formatting and report assembly (pure)
//! - `upload`: multipart intake, type/size checks, scoped temp staging
//! - `ai_client`: model trait and the Gemini implementation
//! - `api_server`: Axum router and handlers
//! - `web/`: Askama page handlers
//!
//! Everything except `analysis` sits behind the `api` feature (on by default).

pub mod analysis;

#[cfg(feature = "api")]
pub mod ai_client;
#[cfg(feature = "api")]
pub mod api_server;
#[cfg(feature = "api")]
pub mod config;
#[cfg(feature = "api")]
pub mod upload;
#[cfg(feature = "api")]
pub mod web;

// Re-export commonly used types
pub use analysis::{
    extract_section, extract_sections, format_section, render_error, render_report, AnalysisDocument,
    AnalysisReport, ExtractionMode, ReportOptions, SectionMarker, NO_INFORMATION,
};

#[cfg(feature = "api")]
pub use ai_client::{AnalysisModel, DocumentPayload, GeminiClient, ModelError};
#[cfg(feature = "api")]
pub use api_server::{create_router, AppError, AppState};
#[cfg(feature = "api")]
pub use config::Config;
#[cfg(feature = "api")]
pub use upload::{DocumentKind, UploadError, MAX_UPLOAD_BYTES};
