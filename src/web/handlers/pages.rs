// Page handlers for HTML rendering with Askama

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::analysis::{render_error, AnalysisReport, ErrorView};
use crate::upload::MAX_UPLOAD_BYTES;

// ============================================================================
// Home Page
// ============================================================================

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub accepted_types: String,
    pub max_upload_mb: usize,
}

pub async fn home_page() -> Response {
    let template = HomeTemplate {
        title: "Legal Document Risk Analyzer".to_string(),
        accepted_types: "PDF, JPEG, PNG".to_string(),
        max_upload_mb: MAX_UPLOAD_BYTES / (1024 * 1024),
    };
    render_html(StatusCode::OK, &template)
}

// ============================================================================
// Report
// ============================================================================

/// Four-section report, no page chrome (htmx swap target).
#[derive(Template)]
#[template(path = "partials/report.html")]
pub struct ReportFragment {
    pub report: AnalysisReport,
}

#[derive(Template)]
#[template(path = "pages/report_page.html")]
pub struct ReportPage {
    pub title: String,
    pub report: AnalysisReport,
}

pub fn report_response(report: AnalysisReport, fragment_only: bool) -> Response {
    if fragment_only {
        render_html(StatusCode::OK, &ReportFragment { report })
    } else {
        let title = format!("Analysis of {}", report.file_name);
        render_html(StatusCode::OK, &ReportPage { title, report })
    }
}

// ============================================================================
// Error
// ============================================================================

#[derive(Template)]
#[template(path = "partials/error.html")]
pub struct ErrorFragment {
    pub error: ErrorView,
}

#[derive(Template)]
#[template(path = "pages/error_page.html")]
pub struct ErrorPage {
    pub title: String,
    pub error: ErrorView,
}

pub fn error_response(status: StatusCode, message: String, fragment_only: bool) -> Response {
    let error = render_error(message);
    if fragment_only {
        render_html(status, &ErrorFragment { error })
    } else {
        let title = "Analysis failed".to_string();
        render_html(status, &ErrorPage { title, error })
    }
}

fn render_html<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Template error: {}", e)).into_response()
        }
    }
}
